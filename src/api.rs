use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{get, patch},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;
use tracing::{debug, warn};

use crate::error::{AppError, AppResult, FieldError};
use crate::menu::Menu;
use crate::order::{Order, OrderStatus, OrderStore};
use crate::validation::CreateOrderRequest;

#[derive(Debug, Serialize, Deserialize)]
pub struct WelcomeResponse {
    pub message: String,
    pub menu: String,
    pub health: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub total_orders: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: String,
}

#[derive(Clone, Default)]
pub struct AppState {
    pub store: OrderStore,
}

impl AppState {
    pub fn new(store: OrderStore) -> Self {
        Self { store }
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/menu", get(get_menu))
        .route("/orders", get(list_orders).post(create_order))
        .route("/orders/:order_id", get(get_order).delete(cancel_order))
        .route("/orders/:order_id/status", patch(update_order_status))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn root() -> Json<WelcomeResponse> {
    Json(WelcomeResponse {
        message: "Welcome to the Coffee Shop API!".to_string(),
        menu: "/menu".to_string(),
        health: "/health".to_string(),
    })
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: Utc::now(),
        total_orders: state.store.len().await,
    })
}

async fn get_menu() -> Json<Menu> {
    Json(Menu::load())
}

async fn create_order(
    State(state): State<AppState>,
    request: Result<Json<CreateOrderRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Order>)> {
    let Json(request) = request?;
    let spec = request.validate().map_err(|err| {
        warn!(error = %err, "rejected order");
        err
    })?;

    let order = state.store.create(spec).await;
    Ok((StatusCode::CREATED, Json(order)))
}

async fn list_orders(State(state): State<AppState>) -> Json<Vec<Order>> {
    let orders = state.store.list().await;
    debug!(count = orders.len(), "listing orders");
    Json(orders)
}

async fn get_order(
    State(state): State<AppState>,
    Path(order_id): Path<String>,
) -> AppResult<Json<Order>> {
    Ok(Json(state.store.get(&order_id).await?))
}

async fn update_order_status(
    State(state): State<AppState>,
    Path(order_id): Path<String>,
    request: Result<Json<StatusUpdateRequest>, JsonRejection>,
) -> AppResult<Json<Order>> {
    let Json(request) = request?;
    let status: OrderStatus = request.status.parse().map_err(|_| {
        AppError::Validation(vec![FieldError::new(
            "status",
            format!("'{}' is not a valid order status", request.status),
        )])
    })?;

    let order = state
        .store
        .update_status(&order_id, status)
        .await
        .map_err(|err| {
            warn!(order_id = %order_id, error = %err, "status update refused");
            err
        })?;
    Ok(Json(order))
}

async fn cancel_order(
    State(state): State<AppState>,
    Path(order_id): Path<String>,
) -> AppResult<Json<Order>> {
    let order = state.store.cancel(&order_id).await.map_err(|err| {
        warn!(order_id = %order_id, error = %err, "cancel refused");
        err
    })?;
    Ok(Json(order))
}
