//! Error to HTTP response mapping

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;
use tracing::warn;

use crate::feed::error::FeedError;
use crate::registration::error::{PageError, SynthesisError};

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error(transparent)]
    Synthesis(#[from] SynthesisError),

    #[error(transparent)]
    Page(#[from] PageError),

    #[error("{0}")]
    BadRequest(String),
}

impl BridgeError {
    /// Maps each failure onto the status the client should see: upstream
    /// statuses pass through untouched, synthesis failures are dependency
    /// failures, a population timeout is retryable.
    fn status(&self) -> StatusCode {
        match self {
            BridgeError::Synthesis(e) | BridgeError::Page(PageError::Synthesis(e)) => {
                synthesis_status(e)
            }
            BridgeError::Page(PageError::NotFound(_)) => StatusCode::NOT_FOUND,
            BridgeError::Page(PageError::Timeout(_)) => StatusCode::SERVICE_UNAVAILABLE,
            BridgeError::Page(PageError::Store(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            BridgeError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            BridgeError::Synthesis(_) => "synthesis_failed",
            BridgeError::Page(PageError::NotFound(_)) => "page_not_found",
            BridgeError::Page(PageError::Timeout(_)) => "page_not_ready",
            BridgeError::Page(_) => "page_error",
            BridgeError::BadRequest(_) => "bad_request",
        }
    }
}

fn synthesis_status(error: &SynthesisError) -> StatusCode {
    match error {
        SynthesisError::Upstream(FeedError::Status(status)) => {
            StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
        }
        SynthesisError::Upstream(FeedError::NoPackages(_)) => StatusCode::NOT_FOUND,
        SynthesisError::Upstream(_) | SynthesisError::Malformed(_) => StatusCode::BAD_GATEWAY,
        // An empty result under the latest-first query shape is an upstream
        // invariant violation, not a missing package
        SynthesisError::NoVersionsFound(_) => StatusCode::BAD_GATEWAY,
        SynthesisError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for BridgeError {
    fn into_response(self) -> Response {
        let status = self.status();
        warn!("request failed with {status}: {self}");

        let body = Json(json!({
            "error": self.to_string(),
            "code": self.code(),
        }));

        if matches!(self, BridgeError::Page(PageError::Timeout(_))) {
            // Tell clients to retry rather than give up: the background
            // population may still be running
            (status, [("Retry-After", "5")], body).into_response()
        } else {
            (status, body).into_response()
        }
    }
}
