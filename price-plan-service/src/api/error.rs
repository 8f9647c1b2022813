use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use pricing_core::PricingError;
use serde_json::json;

use crate::validation::ValidationError;

#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Pricing(#[from] PricingError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("no readings stored for meter '{0}'")]
    UnknownMeter(String),
    #[error("limit must not be negative, got {0}")]
    InvalidLimit(i64),
    #[error("invalid reading value '{0}'")]
    InvalidReadingValue(String),
    #[error("invalid reading time: {0}")]
    InvalidReadingTime(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Pricing(PricingError::NoConsumption { .. }) | Self::UnknownMeter(_) => {
                StatusCode::NOT_FOUND
            }
            Self::Pricing(
                PricingError::InvalidPlanConfiguration(_)
                | PricingError::EmptyReadings
                | PricingError::InvalidElapsedTime(_),
            ) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Validation(_)
            | Self::InvalidLimit(_)
            | Self::InvalidReadingValue(_)
            | Self::InvalidReadingTime(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn type_name(&self) -> &'static str {
        match self {
            Self::Pricing(PricingError::NoConsumption { .. }) => "no_consumption",
            Self::Pricing(PricingError::InvalidPlanConfiguration(_)) => {
                "invalid_plan_configuration"
            }
            Self::Pricing(PricingError::EmptyReadings | PricingError::InvalidElapsedTime(_)) => {
                "internal_error"
            }
            Self::Validation(_) => "invalid_readings",
            Self::UnknownMeter(_) => "unknown_meter",
            Self::InvalidLimit(_) => "invalid_limit",
            Self::InvalidReadingValue(_) | Self::InvalidReadingTime(_) => "invalid_reading",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        let body = Json(json!({
            "error": {
                "message": self.to_string(),
                "type": self.type_name(),
            }
        }));

        (status, body).into_response()
    }
}
