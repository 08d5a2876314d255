//! In-memory products backend used by the client integration tests.
//!
//! # Design
//! Implements the same HTTP contract as the real inventory service: list,
//! create and delete under `/products/`, JSON bodies, FastAPI-style
//! `{"detail": ...}` error payloads. Every response — including errors —
//! carries the `X-Replica-ID` and `X-Upstream-Server` headers, attached by
//! a response-mapping layer so handlers stay unaware of them. The replica
//! identity is configured per app instance, letting tests simulate requests
//! served by different replicas (or by a replica that omits a header).

use std::sync::{
    atomic::{AtomicI64, Ordering},
    Arc,
};

use axum::{
    extract::{Path, State},
    http::{HeaderValue, StatusCode},
    middleware,
    response::Response,
    routing::{delete, get},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::{net::TcpListener, sync::RwLock};

pub const REPLICA_ID_HEADER: &str = "X-Replica-ID";
pub const UPSTREAM_SERVER_HEADER: &str = "X-Upstream-Server";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub in_stock: bool,
}

#[derive(Deserialize)]
pub struct CreateProduct {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    #[serde(default = "default_in_stock")]
    pub in_stock: bool,
}

fn default_in_stock() -> bool {
    true
}

/// Identity advertised in response headers. A `None` field makes the app
/// omit that header entirely, which tests use to exercise the client's
/// last-known-good tracking.
#[derive(Clone, Debug)]
pub struct ReplicaIdentity {
    pub replica_id: Option<String>,
    pub upstream_server: Option<String>,
}

impl Default for ReplicaIdentity {
    fn default() -> Self {
        Self {
            replica_id: Some("replica-1".to_string()),
            upstream_server: Some("10.0.0.1:8000".to_string()),
        }
    }
}

pub type Db = Arc<RwLock<Vec<Product>>>;

#[derive(Clone)]
struct AppState {
    db: Db,
    next_id: Arc<AtomicI64>,
}

pub fn app() -> Router {
    app_with_identity(ReplicaIdentity::default())
}

pub fn app_with_identity(identity: ReplicaIdentity) -> Router {
    let state = AppState {
        db: Arc::new(RwLock::new(Vec::new())),
        next_id: Arc::new(AtomicI64::new(1)),
    };
    Router::new()
        .route("/products/", get(list_products).post(create_product))
        .route("/products/{id}", delete(delete_product))
        .layer(middleware::map_response(move |response: Response| {
            let identity = identity.clone();
            async move { stamp_identity(response, &identity) }
        }))
        .with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

pub async fn run_with_identity(
    listener: TcpListener,
    identity: ReplicaIdentity,
) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with_identity(identity)).await
}

/// Attach the replica headers to an outgoing response. Runs on every
/// response regardless of status, matching the infrastructure the real
/// backend sits behind.
fn stamp_identity(mut response: Response, identity: &ReplicaIdentity) -> Response {
    let headers = response.headers_mut();
    if let Some(id) = &identity.replica_id {
        if let Ok(value) = HeaderValue::from_str(id) {
            headers.insert(REPLICA_ID_HEADER, value);
        }
    }
    if let Some(upstream) = &identity.upstream_server {
        if let Ok(value) = HeaderValue::from_str(upstream) {
            headers.insert(UPSTREAM_SERVER_HEADER, value);
        }
    }
    response
}

async fn list_products(State(state): State<AppState>) -> Json<Vec<Product>> {
    let products = state.db.read().await;
    Json(products.clone())
}

async fn create_product(
    State(state): State<AppState>,
    Json(input): Json<CreateProduct>,
) -> (StatusCode, Json<Product>) {
    let product = Product {
        id: state.next_id.fetch_add(1, Ordering::SeqCst),
        name: input.name,
        description: input.description,
        price: input.price,
        in_stock: input.in_stock,
    };
    state.db.write().await.push(product.clone());
    (StatusCode::CREATED, Json(product))
}

async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Product>, (StatusCode, Json<serde_json::Value>)> {
    let mut products = state.db.write().await;
    let position = products.iter().position(|p| p.id == id).ok_or((
        StatusCode::NOT_FOUND,
        Json(json!({"detail": "Product not found"})),
    ))?;
    Ok(Json(products.remove(position)))
}
