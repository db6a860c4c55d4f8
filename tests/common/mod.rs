#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use axum::extract::{Multipart, Path, Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use serde_json::{Value, json};
use tokio::sync::Mutex;

use sportres_client::{ApiClient, Session};

pub const TEST_TOKEN: &str = "test-token";
pub const TEST_EMAIL: &str = "user@test.dev";
pub const TEST_PASSWORD: &str = "secret";

type Reply = Result<Json<Value>, (StatusCode, Json<Value>)>;

// ---------------------------------------------------------------------------
// Mock reservation service
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct MockState {
    pub categories: Vec<Value>,
    pub activities: Vec<Value>,
    pub transactions: Vec<Value>,
    pub role: String,
    pub fail_listings: bool,
    pub fail_uploads: bool,
    pub upload_counter: u64,
}

#[derive(Default)]
pub struct Hits {
    pub categories_paginated: AtomicU64,
    pub categories_unpaginated: AtomicU64,
    pub activities_paginated: AtomicU64,
    pub activities_filtered: AtomicU64,
    pub activity_detail: AtomicU64,
    pub my_transactions: AtomicU64,
    pub all_transactions: AtomicU64,
    pub cancels: AtomicU64,
    pub status_updates: AtomicU64,
    pub uploads: AtomicU64,
    pub proof_updates: AtomicU64,
}

#[derive(Clone)]
pub struct MockApi {
    pub state: Arc<Mutex<MockState>>,
    pub hits: Arc<Hits>,
}

impl MockApi {
    pub fn new(state: MockState) -> Self {
        MockApi {
            state: Arc::new(Mutex::new(state)),
            hits: Arc::new(Hits::default()),
        }
    }
}

fn unauthorized() -> (StatusCode, Json<Value>) {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "message": "Unauthorized" })),
    )
}

fn require_auth(headers: &HeaderMap) -> Result<(), (StatusCode, Json<Value>)> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());
    if token == Some(&format!("Bearer {}", TEST_TOKEN)) {
        Ok(())
    } else {
        Err(unauthorized())
    }
}

fn paginate(items: &[Value], params: &HashMap<String, String>) -> Value {
    let per_page: usize = params
        .get("per_page")
        .and_then(|v| v.parse().ok())
        .unwrap_or(5);
    let page: usize = params
        .get("page")
        .and_then(|v| v.parse().ok())
        .unwrap_or(1)
        .max(1);
    let last_page = items.len().div_ceil(per_page).max(1);
    let start = (page - 1) * per_page;
    let slice: Vec<Value> = items.iter().skip(start).take(per_page).cloned().collect();
    json!({
        "error": false,
        "result": { "data": slice, "last_page": last_page, "current_page": page }
    })
}

async fn login(Json(payload): Json<Value>) -> Reply {
    if payload["email"].as_str() != Some(TEST_EMAIL)
        || payload["password"].as_str() != Some(TEST_PASSWORD)
    {
        return Err(unauthorized());
    }
    Ok(Json(json!({ "data": { "token": TEST_TOKEN } })))
}

async fn me(State(api): State<MockApi>, headers: HeaderMap) -> Reply {
    require_auth(&headers)?;
    let state = api.state.lock().await;
    Ok(Json(json!({
        "data": { "name": "Test User", "email": TEST_EMAIL, "role": state.role }
    })))
}

async fn list_categories(
    State(api): State<MockApi>,
    Query(params): Query<HashMap<String, String>>,
) -> Reply {
    let state = api.state.lock().await;
    let unpaginated = params.get("is_paginate").map(String::as_str) == Some("false");
    if unpaginated {
        api.hits.categories_unpaginated.fetch_add(1, Ordering::SeqCst);
    } else {
        api.hits.categories_paginated.fetch_add(1, Ordering::SeqCst);
    }
    if state.fail_listings {
        return Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "message": "Internal error" })),
        ));
    }
    if unpaginated {
        Ok(Json(json!({ "error": false, "result": state.categories })))
    } else {
        Ok(Json(paginate(&state.categories, &params)))
    }
}

async fn list_activities(
    State(api): State<MockApi>,
    Query(params): Query<HashMap<String, String>>,
) -> Reply {
    let state = api.state.lock().await;
    if state.fail_listings {
        return Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "message": "Internal error" })),
        ));
    }
    if let Some(category_id) = params.get("sport_category_id") {
        api.hits.activities_filtered.fetch_add(1, Ordering::SeqCst);
        let filtered: Vec<Value> = state
            .activities
            .iter()
            .filter(|a| a["sport_category"]["id"].to_string() == *category_id)
            .cloned()
            .collect();
        Ok(Json(json!({ "error": false, "result": filtered })))
    } else {
        api.hits.activities_paginated.fetch_add(1, Ordering::SeqCst);
        Ok(Json(paginate(&state.activities, &params)))
    }
}

async fn activity_detail(State(api): State<MockApi>, Path(id): Path<i64>) -> Reply {
    api.hits.activity_detail.fetch_add(1, Ordering::SeqCst);
    let state = api.state.lock().await;
    state
        .activities
        .iter()
        .find(|a| a["id"].as_i64() == Some(id))
        .map(|a| Json(json!({ "error": false, "result": a })))
        .ok_or((
            StatusCode::NOT_FOUND,
            Json(json!({ "message": "Activity not found" })),
        ))
}

async fn my_transactions(State(api): State<MockApi>, headers: HeaderMap) -> Reply {
    require_auth(&headers)?;
    api.hits.my_transactions.fetch_add(1, Ordering::SeqCst);
    let state = api.state.lock().await;
    if state.fail_listings {
        return Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "message": "Internal error" })),
        ));
    }
    Ok(Json(json!({ "error": false, "result": state.transactions })))
}

async fn all_transactions(State(api): State<MockApi>, headers: HeaderMap) -> Reply {
    require_auth(&headers)?;
    api.hits.all_transactions.fetch_add(1, Ordering::SeqCst);
    let state = api.state.lock().await;
    Ok(Json(json!({ "error": false, "result": state.transactions })))
}

async fn cancel_transaction(
    State(api): State<MockApi>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Reply {
    require_auth(&headers)?;
    api.hits.cancels.fetch_add(1, Ordering::SeqCst);
    let mut state = api.state.lock().await;
    let Some(transaction) = state
        .transactions
        .iter_mut()
        .find(|t| t["id"].as_i64() == Some(id))
    else {
        return Err((
            StatusCode::NOT_FOUND,
            Json(json!({ "message": "Transaction not found" })),
        ));
    };
    if transaction["status"].as_str() != Some("pending") {
        return Err((
            StatusCode::CONFLICT,
            Json(json!({ "message": "Transaction can no longer be cancelled" })),
        ));
    }
    transaction["status"] = json!("cancelled");
    Ok(Json(json!({ "error": false, "message": "Cancelled" })))
}

async fn update_status(
    State(api): State<MockApi>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(payload): Json<Value>,
) -> Reply {
    require_auth(&headers)?;
    api.hits.status_updates.fetch_add(1, Ordering::SeqCst);
    let mut state = api.state.lock().await;
    let Some(transaction) = state
        .transactions
        .iter_mut()
        .find(|t| t["id"].as_i64() == Some(id))
    else {
        return Err((
            StatusCode::NOT_FOUND,
            Json(json!({ "message": "Transaction not found" })),
        ));
    };
    transaction["status"] = payload["status"].clone();
    Ok(Json(json!({ "error": false, "message": "Updated" })))
}

async fn upload_image(State(api): State<MockApi>, mut multipart: Multipart) -> Reply {
    api.hits.uploads.fetch_add(1, Ordering::SeqCst);
    let mut state = api.state.lock().await;
    if state.fail_uploads {
        return Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "message": "Upload failed" })),
        ));
    }
    let mut received = false;
    while let Some(field) = multipart.next_field().await.expect("multipart field") {
        if field.name() == Some("file") {
            let bytes = field.bytes().await.expect("field bytes");
            received = !bytes.is_empty();
        }
    }
    if !received {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(json!({ "message": "No file provided" })),
        ));
    }
    state.upload_counter += 1;
    let url = format!("https://storage.test/proof-{}.png", state.upload_counter);
    Ok(Json(json!({ "error": false, "result": url })))
}

async fn update_proof(
    State(api): State<MockApi>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(payload): Json<Value>,
) -> Reply {
    require_auth(&headers)?;
    api.hits.proof_updates.fetch_add(1, Ordering::SeqCst);
    let mut state = api.state.lock().await;
    let Some(transaction) = state
        .transactions
        .iter_mut()
        .find(|t| t["id"].as_i64() == Some(id))
    else {
        return Err((
            StatusCode::NOT_FOUND,
            Json(json!({ "message": "Transaction not found" })),
        ));
    };
    transaction["proof_payment_url"] = payload["proof_payment_url"].clone();
    Ok(Json(json!({ "error": false, "message": "Proof updated" })))
}

async fn create_category(
    State(api): State<MockApi>,
    headers: HeaderMap,
    Json(payload): Json<Value>,
) -> Reply {
    require_auth(&headers)?;
    let mut state = api.state.lock().await;
    let next_id = state
        .categories
        .iter()
        .filter_map(|c| c["id"].as_i64())
        .max()
        .unwrap_or(0)
        + 1;
    state
        .categories
        .push(json!({ "id": next_id, "name": payload["name"] }));
    Ok(Json(json!({ "error": false, "message": "Created" })))
}

async fn update_category(
    State(api): State<MockApi>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(payload): Json<Value>,
) -> Reply {
    require_auth(&headers)?;
    let mut state = api.state.lock().await;
    let Some(category) = state
        .categories
        .iter_mut()
        .find(|c| c["id"].as_i64() == Some(id))
    else {
        return Err((
            StatusCode::NOT_FOUND,
            Json(json!({ "message": "Category not found" })),
        ));
    };
    category["name"] = payload["name"].clone();
    Ok(Json(json!({ "error": false, "message": "Updated" })))
}

async fn delete_category(
    State(api): State<MockApi>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Reply {
    require_auth(&headers)?;
    let mut state = api.state.lock().await;
    state.categories.retain(|c| c["id"].as_i64() != Some(id));
    Ok(Json(json!({ "error": false, "message": "Deleted" })))
}

async fn create_activity(
    State(api): State<MockApi>,
    headers: HeaderMap,
    Json(payload): Json<Value>,
) -> Reply {
    require_auth(&headers)?;
    let mut state = api.state.lock().await;
    let next_id = state
        .activities
        .iter()
        .filter_map(|a| a["id"].as_i64())
        .max()
        .unwrap_or(0)
        + 1;
    let category_id = payload["sport_category_id"].as_i64().unwrap_or(0);
    let mut activity = activity_json(next_id, "created", category_id, 10, 0);
    activity["title"] = payload["title"].clone();
    state.activities.push(activity);
    Ok(Json(json!({ "error": false, "message": "Created" })))
}

async fn update_activity(
    State(api): State<MockApi>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(payload): Json<Value>,
) -> Reply {
    require_auth(&headers)?;
    let mut state = api.state.lock().await;
    let Some(activity) = state
        .activities
        .iter_mut()
        .find(|a| a["id"].as_i64() == Some(id))
    else {
        return Err((
            StatusCode::NOT_FOUND,
            Json(json!({ "message": "Activity not found" })),
        ));
    };
    activity["title"] = payload["title"].clone();
    Ok(Json(json!({ "error": false, "message": "Updated" })))
}

async fn delete_activity(
    State(api): State<MockApi>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Reply {
    require_auth(&headers)?;
    let mut state = api.state.lock().await;
    state.activities.retain(|a| a["id"].as_i64() != Some(id));
    Ok(Json(json!({ "error": false, "message": "Deleted" })))
}

fn router(api: MockApi) -> Router {
    Router::new()
        .route("/login", post(login))
        .route("/me", get(me))
        .route(
            "/sport-categories",
            get(list_categories),
        )
        .route("/sport-categories/create", post(create_category))
        .route("/sport-categories/update/{id}", post(update_category))
        .route("/sport-categories/delete/{id}", delete(delete_category))
        .route("/sport-activities", get(list_activities).post(create_activity))
        .route("/sport-activities/{id}", get(activity_detail))
        .route("/sport-activities/update/{id}", put(update_activity))
        .route("/sport-activities/delete/{id}", delete(delete_activity))
        .route("/my-transaction", get(my_transactions))
        .route("/all-transaction", get(all_transactions))
        .route("/transaction/cancel/{id}", post(cancel_transaction))
        .route("/transaction/update-status/{id}", post(update_status))
        .route("/transaction/update-proof-payment/{id}", post(update_proof))
        .route("/upload-image", post(upload_image))
        .with_state(api)
}

// ---------------------------------------------------------------------------
// Harness
// ---------------------------------------------------------------------------

pub struct TestHarness {
    pub api: MockApi,
    pub base_url: String,
    pub client: ApiClient,
    pub session: Session,
}

impl TestHarness {
    pub async fn login(&self) -> anyhow::Result<()> {
        self.client
            .login(TEST_EMAIL, TEST_PASSWORD)
            .await
            .map_err(|e| anyhow::anyhow!("login failed: {}", e))?;
        Ok(())
    }
}

pub async fn setup(state: MockState) -> anyhow::Result<TestHarness> {
    let api = MockApi::new(state);
    let app = router(api.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let base_url = format!("http://{}", listener.local_addr()?);
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("mock api server");
    });

    let session = Session::new();
    let client = ApiClient::new(base_url.clone(), session.clone());
    Ok(TestHarness {
        api,
        base_url,
        client,
        session,
    })
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub fn category_json(id: i64, name: &str) -> Value {
    json!({ "id": id, "name": name })
}

pub fn activity_json(id: i64, title: &str, category_id: i64, slot: u32, booked: u32) -> Value {
    let participants: Vec<Value> = (0..booked)
        .map(|i| {
            json!({
                "id": i,
                "user": { "name": format!("Player {}", i), "email": format!("player{}@test.dev", i) }
            })
        })
        .collect();
    json!({
        "id": id,
        "title": title,
        "description": "Casual session, all levels welcome",
        "sport_category": { "id": category_id, "name": format!("Category {}", category_id) },
        "activity_date": "2026-03-14",
        "start_time": "08:00:00",
        "end_time": "10:00:00",
        "address": "Jl. Sudirman No. 1",
        "price": 150000.0,
        "price_discount": 200000.0,
        "slot": slot,
        "participants": participants,
        "organizer": { "name": "SportRes" },
        "city": { "city_name_full": "Kota Jakarta Selatan", "province": { "province_name": "DKI Jakarta" } },
        "map_url": "https://maps.test/venue-1"
    })
}

pub fn transaction_json(id: i64, status: &str, order_date: &str) -> Value {
    json!({
        "id": id,
        "invoice_id": format!("INV/{:08}", id),
        "order_date": order_date,
        "expired_date": "2026-03-20T00:00:00.000000Z",
        "total_amount": 150000.0,
        "status": status,
        "proof_payment_url": null,
        "transaction_items": {
            "title": format!("Booking {}", id),
            "sport_activities": {
                "activity_date": "2026-03-14",
                "start_time": "08:00:00",
                "end_time": "10:00:00",
                "address": "Jl. Sudirman No. 1"
            }
        }
    })
}

pub fn user_state() -> MockState {
    MockState {
        role: "user".to_string(),
        ..MockState::default()
    }
}

pub fn admin_state() -> MockState {
    MockState {
        role: "admin".to_string(),
        ..MockState::default()
    }
}
