pub mod catalog;
pub use catalog::CatalogService;

use axum::{
    response::IntoResponse,
    http::StatusCode,
    Json
};
use tracing::{debug, error};
use crate::api::models::ErrorBody;

pub struct AppError(pub common::Error);

impl AppError {
    pub fn not_found(id: &str) -> Self {
        AppError(common::Error::NotFound(id.to_string()))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status_code, message) = match &self.0 {
            common::Error::NotFound(_) => (StatusCode::NOT_FOUND, "City not found".to_string()),
            common::Error::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            common::Error::Persistence(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to save city data".to_string(),
            ),
            other => (StatusCode::INTERNAL_SERVER_ERROR, other.to_string()),
        };

        if status_code.is_server_error() {
            error!(error = %self.0, "Request failed");
        } else {
            debug!(error = %self.0, "Request rejected");
        }

        let body = Json(ErrorBody::new(message));
        (status_code, body).into_response()
    }
}

impl From<common::Error> for AppError {
    fn from(err: common::Error) -> Self {
        AppError(err)
    }
}
