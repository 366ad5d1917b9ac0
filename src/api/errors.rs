// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use tracing::error;

use crate::image::ImageProxyError;
use crate::search::{AggregateError, SourceId};

/// JSON body of every error response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, serde_json::Value>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    MissingParameter(String),
    UnknownSite {
        site: String,
        valid_sites: Vec<String>,
    },
    InvalidImageUrl(String),
    Upstream {
        status: u16,
        message: String,
    },
    InternalError(String),
}

impl ApiError {
    pub fn unknown_site(site: &str) -> Self {
        ApiError::UnknownSite {
            site: site.to_string(),
            valid_sites: SourceId::ALL.iter().map(|s| s.as_str().to_string()).collect(),
        }
    }

    pub fn to_response(&self) -> ErrorResponse {
        let (error, message, details) = match self {
            ApiError::MissingParameter(name) => {
                let mut details = HashMap::new();
                details.insert(
                    "parameter".to_string(),
                    serde_json::Value::String(name.clone()),
                );
                (
                    "missing_parameter",
                    format!("Query parameter '{}' is required", name),
                    Some(details),
                )
            }
            ApiError::UnknownSite { site, valid_sites } => {
                let mut details = HashMap::new();
                details.insert(
                    "valid_sites".to_string(),
                    serde_json::Value::Array(
                        valid_sites
                            .iter()
                            .map(|s| serde_json::Value::String(s.clone()))
                            .collect(),
                    ),
                );
                (
                    "unknown_site",
                    format!(
                        "Unknown site '{}'. Valid sites: {}",
                        site,
                        valid_sites.join(", ")
                    ),
                    Some(details),
                )
            }
            ApiError::InvalidImageUrl(msg) => ("invalid_url", msg.clone(), None),
            ApiError::Upstream { status, message } => {
                let mut details = HashMap::new();
                details.insert(
                    "upstream_status".to_string(),
                    serde_json::Value::Number((*status).into()),
                );
                ("upstream_error", message.clone(), Some(details))
            }
            ApiError::InternalError(msg) => ("internal_error", msg.clone(), None),
        };

        ErrorResponse {
            error: error.to_string(),
            message,
            details,
        }
    }

    /// HTTP status for this error
    ///
    /// Upstream error statuses are mirrored; an upstream status that is not
    /// itself an error maps to 502.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingParameter(_)
            | ApiError::UnknownSite { .. }
            | ApiError::InvalidImageUrl(_) => StatusCode::BAD_REQUEST,
            ApiError::Upstream { status, .. } => StatusCode::from_u16(*status)
                .ok()
                .filter(|s| s.is_client_error() || s.is_server_error())
                .unwrap_or(StatusCode::BAD_GATEWAY),
            ApiError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::MissingParameter(name) => write!(f, "Missing parameter: {}", name),
            ApiError::UnknownSite { site, .. } => write!(f, "Unknown site: {}", site),
            ApiError::InvalidImageUrl(msg) => write!(f, "Invalid image URL: {}", msg),
            ApiError::Upstream { status, message } => {
                write!(f, "Upstream error {}: {}", status, message)
            }
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!("Request failed: {}", self);
        }
        (status, Json(self.to_response())).into_response()
    }
}

impl From<AggregateError> for ApiError {
    fn from(err: AggregateError) -> Self {
        match err {
            AggregateError::MissingQuery => ApiError::MissingParameter("q".to_string()),
        }
    }
}

impl From<ImageProxyError> for ApiError {
    fn from(err: ImageProxyError) -> Self {
        match err {
            ImageProxyError::InvalidUrl { reason } => ApiError::InvalidImageUrl(reason),
            ImageProxyError::Upstream { status } => ApiError::Upstream {
                status,
                message: format!("Image host returned status {}", status),
            },
            other => ApiError::InternalError(other.to_string()),
        }
    }
}
