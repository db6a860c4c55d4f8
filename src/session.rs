use std::sync::Arc;

use tokio::sync::RwLock;

use crate::constants::ROLE_ADMIN;
use crate::models::UserProfile;

#[derive(Debug, Default)]
struct SessionState {
    token: Option<String>,
    profile: Option<UserProfile>,
    selected_activity_id: Option<i64>,
}

/// Session-scoped state shared by every component that needs the bearer
/// token, the user's role, or the reservation handoff. Cheap to clone;
/// all clones observe the same state.
#[derive(Clone, Default)]
pub struct Session {
    inner: Arc<RwLock<SessionState>>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn authenticate(&self, token: String) {
        let mut state = self.inner.write().await;
        state.token = Some(token);
    }

    pub async fn set_profile(&self, profile: UserProfile) {
        let mut state = self.inner.write().await;
        state.profile = Some(profile);
    }

    pub async fn token(&self) -> Option<String> {
        self.inner.read().await.token.clone()
    }

    pub async fn profile(&self) -> Option<UserProfile> {
        self.inner.read().await.profile.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.inner.read().await.token.is_some()
    }

    pub async fn is_admin(&self) -> bool {
        self.inner
            .read()
            .await
            .profile
            .as_ref()
            .is_some_and(|profile| profile.role == ROLE_ADMIN)
    }

    /// Invalidation hook for 401 responses: drops credentials and profile.
    /// A staged reservation is not credential state and survives.
    pub async fn invalidate(&self) {
        let mut state = self.inner.write().await;
        state.token = None;
        state.profile = None;
    }

    /// Stages an activity for the payment flow, overwriting any prior
    /// selection. One reservation handoff at a time.
    pub async fn stage_reservation(&self, activity_id: i64) {
        let mut state = self.inner.write().await;
        state.selected_activity_id = Some(activity_id);
    }

    /// Reads the staged reservation. The payment step consumes it by
    /// reading; the value is not cleared.
    pub async fn staged_reservation(&self) -> Option<i64> {
        self.inner.read().await.selected_activity_id
    }
}
