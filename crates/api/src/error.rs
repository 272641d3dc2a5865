use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid selection: {0}")]
    InvalidSelection(String),
    #[error("invalid chart query: {0}")]
    InvalidChartQuery(String),
    #[error("chart width and height must be finite and positive")]
    InvalidChartSize,
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::InvalidSelection(_) | Self::InvalidChartQuery(_) | Self::InvalidChartSize => {
                StatusCode::BAD_REQUEST
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
