use tracing::{debug, error, info};

use crate::api::ApiClient;
use crate::error::ClientError;
use crate::models::{Activity, ActivityPayload, Category, PageResult};
use crate::pagination::PageCursor;
use crate::requests::{FetchGuard, FetchTicket};

/// Catalog browsing state: the category page, the activity listing, and the
/// category filter feeding the booking flow. Selecting a category switches
/// the activity listing into a filtered, unpaginated mode; selecting ALL
/// (`None`) reverts to the paginated endpoint with a fresh fetch rather
/// than reusing filtered results.
pub struct CatalogBrowser {
    client: ApiClient,
    categories: Vec<Category>,
    activities: Vec<Activity>,
    categories_cursor: PageCursor,
    activities_cursor: PageCursor,
    selected_category: Option<i64>,
    categories_guard: FetchGuard,
    activities_guard: FetchGuard,
}

impl CatalogBrowser {
    pub fn new(client: ApiClient, per_page: u32) -> Self {
        CatalogBrowser {
            client,
            categories: Vec::new(),
            activities: Vec::new(),
            categories_cursor: PageCursor::new(per_page),
            activities_cursor: PageCursor::new(per_page),
            selected_category: None,
            categories_guard: FetchGuard::default(),
            activities_guard: FetchGuard::default(),
        }
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn activities(&self) -> &[Activity] {
        &self.activities
    }

    pub fn categories_cursor(&self) -> &PageCursor {
        &self.categories_cursor
    }

    pub fn activities_cursor(&self) -> &PageCursor {
        &self.activities_cursor
    }

    pub fn selected_category(&self) -> Option<i64> {
        self.selected_category
    }

    // Categories

    /// Issues a ticket for a category-listing fetch. Callers running the
    /// request in their own task pair this with [`apply_categories`].
    ///
    /// [`apply_categories`]: CatalogBrowser::apply_categories
    pub fn begin_categories_fetch(&mut self) -> FetchTicket {
        self.categories_guard.begin()
    }

    pub fn apply_categories(
        &mut self,
        ticket: FetchTicket,
        outcome: Result<PageResult<Category>, ClientError>,
    ) {
        if !self.categories_guard.is_current(ticket) {
            debug!("Discarding superseded category listing response");
            return;
        }
        match outcome {
            Ok(page) => {
                self.categories = page.data;
                self.categories_cursor.set_total_page(page.last_page);
            }
            Err(err) => {
                error!("Error fetching categories: {err}");
                self.categories.clear();
            }
        }
    }

    pub async fn refresh_categories(&mut self) {
        let ticket = self.begin_categories_fetch();
        let outcome = self.client.get_categories(&self.categories_cursor).await;
        self.apply_categories(ticket, outcome);
    }

    pub async fn next_categories(&mut self) {
        if self.categories_cursor.next() {
            self.refresh_categories().await;
        }
    }

    pub async fn prev_categories(&mut self) {
        if self.categories_cursor.prev() {
            self.refresh_categories().await;
        }
    }

    // Activities

    pub fn begin_activities_fetch(&mut self) -> FetchTicket {
        self.activities_guard.begin()
    }

    pub fn apply_activities_page(
        &mut self,
        ticket: FetchTicket,
        outcome: Result<PageResult<Activity>, ClientError>,
    ) {
        if !self.activities_guard.is_current(ticket) {
            debug!("Discarding superseded activity listing response");
            return;
        }
        match outcome {
            Ok(page) => {
                self.activities = page.data;
                self.activities_cursor.set_total_page(page.last_page);
            }
            Err(err) => {
                error!("Error fetching activities: {err}");
                self.activities.clear();
            }
        }
    }

    pub fn apply_filtered_activities(
        &mut self,
        ticket: FetchTicket,
        outcome: Result<Vec<Activity>, ClientError>,
    ) {
        if !self.activities_guard.is_current(ticket) {
            debug!("Discarding superseded activity listing response");
            return;
        }
        match outcome {
            // The activities cursor is left untouched: its page count is
            // stale and unused for as long as the filter is active.
            Ok(activities) => self.activities = activities,
            Err(err) => {
                error!("Error fetching activities: {err}");
                self.activities.clear();
            }
        }
    }

    pub async fn refresh_activities(&mut self) {
        let ticket = self.begin_activities_fetch();
        match self.selected_category {
            Some(category_id) => {
                let outcome = self.client.get_activities_by_category(category_id).await;
                self.apply_filtered_activities(ticket, outcome);
            }
            None => {
                let outcome = self.client.get_activities_page(&self.activities_cursor).await;
                self.apply_activities_page(ticket, outcome);
            }
        }
    }

    /// Paging applies only in unfiltered mode; while a category filter is
    /// active the full filtered set is already loaded.
    pub async fn next_activities(&mut self) {
        if self.selected_category.is_some() {
            return;
        }
        if self.activities_cursor.next() {
            self.refresh_activities().await;
        }
    }

    pub async fn prev_activities(&mut self) {
        if self.selected_category.is_some() {
            return;
        }
        if self.activities_cursor.prev() {
            self.refresh_activities().await;
        }
    }

    pub async fn select_category(&mut self, category: Option<i64>) {
        self.selected_category = category;
        self.refresh_activities().await;
    }

    /// Initial load: both listings, independently. The two fetches carry no
    /// ordering guarantee relative to each other.
    pub async fn refresh(&mut self) {
        self.refresh_categories().await;
        self.refresh_activities().await;
    }

    pub async fn activity_detail(&self, activity_id: i64) -> Result<Activity, ClientError> {
        match self.client.get_activity(activity_id).await {
            Ok(activity) => Ok(activity),
            Err(err) => {
                error!("Error fetching activity details: {err}");
                Err(err)
            }
        }
    }

    /// Captures the chosen activity for the payment step, overwriting any
    /// previously staged choice. Capacity is not checked here even when the
    /// listing shows the activity full; the service re-validates when the
    /// payment flow starts.
    pub async fn reserve(&self, activity_id: i64) {
        self.client.session().stage_reservation(activity_id).await;
        info!("Staged reservation for activity {activity_id}");
    }

    // Admin management. Every successful mutation invalidates the cached
    // page by refetching the current listing.

    pub async fn create_category(&mut self, name: &str) -> Result<(), ClientError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ClientError::Validation(
                "Category name cannot be empty".to_string(),
            ));
        }
        self.client.create_category(name).await?;
        self.refresh_categories().await;
        Ok(())
    }

    pub async fn rename_category(&mut self, category_id: i64, name: &str) -> Result<(), ClientError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ClientError::Validation(
                "Category name cannot be empty".to_string(),
            ));
        }
        self.client.update_category(category_id, name).await?;
        self.refresh_categories().await;
        Ok(())
    }

    pub async fn delete_category(&mut self, category_id: i64) -> Result<(), ClientError> {
        self.client.delete_category(category_id).await?;
        self.refresh_categories().await;
        Ok(())
    }

    pub async fn create_activity(&mut self, payload: &ActivityPayload) -> Result<(), ClientError> {
        if payload.title.trim().is_empty() {
            return Err(ClientError::Validation(
                "Activity title cannot be empty".to_string(),
            ));
        }
        self.client.create_activity(payload).await?;
        self.refresh_activities().await;
        Ok(())
    }

    pub async fn update_activity(
        &mut self,
        activity_id: i64,
        payload: &ActivityPayload,
    ) -> Result<(), ClientError> {
        self.client.update_activity(activity_id, payload).await?;
        self.refresh_activities().await;
        Ok(())
    }

    pub async fn delete_activity(&mut self, activity_id: i64) -> Result<(), ClientError> {
        self.client.delete_activity(activity_id).await?;
        self.refresh_activities().await;
        Ok(())
    }
}
