use axum::{
    routing::{get, put},
    Router,
    extract::{State, Path},
    http::StatusCode,
    Json
};
use std::sync::Arc;
use serde_json::Value;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use common::model::City;
use crate::services::{AppError, CatalogService};

pub async fn list_cities(
    State(service): State<Arc<CatalogService>>,
) -> Json<Vec<City>> {
    Json(service.list().await)
}

pub async fn create_city(
    State(service): State<Arc<CatalogService>>,
    Json(payload): Json<Value>,
) -> Result<(StatusCode, Json<City>), AppError> {
    let city = service.create(payload).await?;
    Ok((StatusCode::CREATED, Json(city)))
}

pub async fn update_city(
    Path(id): Path<String>,
    State(service): State<Arc<CatalogService>>,
    Json(payload): Json<Value>,
) -> Result<Json<City>, AppError> {
    // A non-numeric id can never match a stored city.
    let id: i64 = id.trim().parse().map_err(|_| AppError::not_found(&id))?;

    let city = service.update(id, payload).await?;
    Ok(Json(city))
}

// Define all API routes
pub fn routes(service: Arc<CatalogService>) -> Router {
    Router::new()
        .route("/api/cities", get(list_cities).post(create_city))
        .route("/api/cities/{id}", put(update_city))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}
