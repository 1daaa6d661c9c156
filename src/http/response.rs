//! Error responses.
//!
//! Client-supplied input that names an unknown locale or cannot be turned
//! into a URL is a `400`. Everything else is a configuration problem and
//! maps to `500`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::error::LocaleError;

impl LocaleError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            LocaleError::InvalidLocale { .. } | LocaleError::InvalidUrl { .. } => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for LocaleError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "Locale handling failed");
        } else {
            tracing::debug!(error = %self, "Rejected request");
        }
        (status, self.to_string()).into_response()
    }
}
