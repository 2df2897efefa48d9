//! In-process pet store served by axum on an ephemeral port.

#![allow(clippy::unwrap_used, dead_code)]

use std::collections::{BTreeMap, HashMap};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use axum::Json;
use axum::Router;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use serde_json::{Value, json};
use tokio::net::TcpListener;

#[derive(Default)]
struct Store {
    pets: Mutex<BTreeMap<i64, Value>>,
    requests: Mutex<Vec<String>>,
    next_id: AtomicI64,
    fail_creates: AtomicBool,
}

impl Store {
    fn record(&self, line: String) {
        self.requests.lock().unwrap().push(line);
    }
}

type Shared = Arc<Store>;

fn not_found(message: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({"code": 1, "type": "error", "message": message})),
    )
        .into_response()
}

async fn create(State(store): State<Shared>, Json(mut pet): Json<Value>) -> Response {
    store.record("POST /pet".to_string());
    if store.fail_creates.load(Ordering::SeqCst) {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }

    let id = match pet.get("id").and_then(Value::as_i64) {
        Some(id) => id,
        None => {
            let id = store.next_id.fetch_add(1, Ordering::SeqCst);
            pet["id"] = json!(id);
            id
        }
    };
    store.pets.lock().unwrap().insert(id, pet.clone());
    Json(pet).into_response()
}

async fn update(State(store): State<Shared>, Json(pet): Json<Value>) -> Response {
    store.record("PUT /pet".to_string());
    let Some(id) = pet.get("id").and_then(Value::as_i64) else {
        return StatusCode::BAD_REQUEST.into_response();
    };
    store.pets.lock().unwrap().insert(id, pet.clone());
    Json(pet).into_response()
}

async fn find_by_status(
    State(store): State<Shared>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    let status = params.get("status").cloned().unwrap_or_default();
    store.record(format!("GET /pet/findByStatus?status={status}"));
    let pets: Vec<Value> = store
        .pets
        .lock()
        .unwrap()
        .values()
        .filter(|pet| pet["status"] == status.as_str())
        .cloned()
        .collect();
    Json(Value::Array(pets))
}

async fn fetch(State(store): State<Shared>, Path(id): Path<String>) -> Response {
    store.record(format!("GET /pet/{id}"));
    let Ok(id) = id.parse::<i64>() else {
        return not_found("invalid id");
    };
    match store.pets.lock().unwrap().get(&id) {
        Some(pet) => Json(pet.clone()).into_response(),
        None => not_found("Pet not found"),
    }
}

async fn remove(State(store): State<Shared>, Path(id): Path<String>) -> Response {
    store.record(format!("DELETE /pet/{id}"));
    let removed = id
        .parse::<i64>()
        .ok()
        .and_then(|id| store.pets.lock().unwrap().remove(&id));
    match removed {
        Some(_) => Json(json!({"code": 200, "type": "unknown", "message": id})).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Handle to a running mock store.
pub struct MockPetStore {
    /// Base URL to hand to the scenarios, e.g. `http://127.0.0.1:1234/v2`.
    pub base_url: String,
    store: Shared,
}

impl MockPetStore {
    /// Starts the store seeded with one available pet (id 1).
    pub async fn start() -> Self {
        let store = Shared::default();
        store.next_id.store(1_000_000, Ordering::SeqCst);
        store.pets.lock().unwrap().insert(
            1,
            json!({"id": 1, "name": "doggie", "status": "available", "photoUrls": []}),
        );

        let app = Router::new()
            .route("/v2/pet", post(create).put(update))
            .route("/v2/pet/findByStatus", get(find_by_status))
            .route("/v2/pet/{id}", get(fetch).delete(remove))
            .with_state(Arc::clone(&store));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr: SocketAddr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{addr}/v2"),
            store,
        }
    }

    /// Makes every subsequent create answer 500.
    pub fn fail_creates(&self) {
        self.store.fail_creates.store(true, Ordering::SeqCst);
    }

    /// Requests received so far, as `METHOD path`.
    pub fn requests(&self) -> Vec<String> {
        self.store.requests.lock().unwrap().clone()
    }

    /// Current stored value of a pet.
    pub fn pet(&self, id: i64) -> Option<Value> {
        self.store.pets.lock().unwrap().get(&id).cloned()
    }
}

/// Base URL of a port nothing listens on.
pub async fn unreachable_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}/v2")
}
