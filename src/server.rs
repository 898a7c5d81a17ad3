//! HTTP surface over the dish and order actors.
//!
//! Request bodies carry the payload under `data`; successful responses wrap
//! the result the same way. Errors render as `{ "status", "message" }`.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{Method, StatusCode, Uri},
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};

use crate::clients::{DishClient, OrderClient};
use crate::domain::{Dish, Order};
use crate::error::ApiError;
use crate::validation::Payload;

/// Shared application state for the API server.
#[derive(Clone)]
pub struct AppState {
    pub dishes: DishClient,
    pub orders: OrderClient,
}

/// Incoming `{ "data": ... }` body. A missing `data` is an empty payload.
#[derive(Debug, Deserialize)]
pub struct RequestEnvelope {
    #[serde(default)]
    pub data: Value,
}

/// Outgoing `{ "data": ... }` body.
#[derive(Debug, Serialize)]
pub struct DataEnvelope<T> {
    pub data: T,
}

type ApiResult<T> = Result<Json<DataEnvelope<T>>, ApiError>;

fn data<T>(value: T) -> Json<DataEnvelope<T>> {
    Json(DataEnvelope { data: value })
}

fn payload(body: Result<Json<RequestEnvelope>, JsonRejection>) -> Result<Payload, ApiError> {
    match body {
        Ok(Json(envelope)) => Ok(Payload::from_value(envelope.data)),
        Err(rejection) => {
            warn!(error = %rejection, "Malformed request body");
            Err(ApiError::Validation(rejection.body_text()))
        }
    }
}

/// Route ids that are not positive integers can never match a stored entity.
fn route_id(resource: &'static str, raw: &str) -> Result<u64, ApiError> {
    raw.parse::<u64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| ApiError::not_found(resource, raw))
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/dishes", get(list_dishes).post(create_dish))
        .route("/dishes/{dish_id}", get(read_dish).put(update_dish))
        .route("/orders", get(list_orders).post(create_order))
        .route(
            "/orders/{order_id}",
            get(read_order).put(update_order).delete(delete_order),
        )
        .fallback(path_not_found)
        .method_not_allowed_fallback(method_not_allowed)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Serves until `shutdown` resolves.
pub async fn serve(
    bind_address: SocketAddr,
    state: AppState,
    shutdown: impl std::future::Future<Output = ()> + Send + 'static,
) -> anyhow::Result<()> {
    let listener = TcpListener::bind(bind_address).await?;
    let actual_addr = listener.local_addr()?;
    info!(bind = %actual_addr, "listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}

// --- Dishes ---

async fn list_dishes(State(state): State<AppState>) -> ApiResult<Vec<Dish>> {
    state.dishes.list_dishes().await.map(data)
}

async fn create_dish(
    State(state): State<AppState>,
    body: Result<Json<RequestEnvelope>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let dish = state.dishes.create_dish(payload(body)?).await?;
    Ok((StatusCode::CREATED, data(dish)))
}

async fn read_dish(State(state): State<AppState>, Path(dish_id): Path<String>) -> ApiResult<Dish> {
    let id = route_id("Dish", &dish_id)?;
    state.dishes.get_dish(id).await.map(data)
}

async fn update_dish(
    State(state): State<AppState>,
    Path(dish_id): Path<String>,
    body: Result<Json<RequestEnvelope>, JsonRejection>,
) -> ApiResult<Dish> {
    let id = route_id("Dish", &dish_id)?;
    state.dishes.update_dish(id, payload(body)?).await.map(data)
}

// --- Orders ---

async fn list_orders(State(state): State<AppState>) -> ApiResult<Vec<Order>> {
    state.orders.list_orders().await.map(data)
}

async fn create_order(
    State(state): State<AppState>,
    body: Result<Json<RequestEnvelope>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let order = state.orders.create_order(payload(body)?).await?;
    Ok((StatusCode::CREATED, data(order)))
}

async fn read_order(State(state): State<AppState>, Path(order_id): Path<String>) -> ApiResult<Order> {
    let id = route_id("Order", &order_id)?;
    state.orders.get_order(id).await.map(data)
}

async fn update_order(
    State(state): State<AppState>,
    Path(order_id): Path<String>,
    body: Result<Json<RequestEnvelope>, JsonRejection>,
) -> ApiResult<Order> {
    let id = route_id("Order", &order_id)?;
    state.orders.update_order(id, payload(body)?).await.map(data)
}

async fn delete_order(
    State(state): State<AppState>,
    Path(order_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = route_id("Order", &order_id)?;
    state.orders.delete_order(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// --- Fallbacks ---

async fn path_not_found(uri: Uri) -> ApiError {
    ApiError::RouteNotFound(uri.path().to_string())
}

async fn method_not_allowed(method: Method, uri: Uri) -> ApiError {
    ApiError::MethodNotAllowed {
        method: method.to_string(),
        path: uri.path().to_string(),
    }
}
