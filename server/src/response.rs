//! The JSON envelope every endpoint answers with.

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use ontology_engine::{EngineError, ErrorKind};
use ontology_types::Timestamp;
use serde::{Deserialize, Serialize};
use tracing::error;

/// `{code, message, data?, errors?, timestamp}`
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ApiResponse<T> {
    pub code: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ErrorItem>,
    pub timestamp: String,
}

/// A field-level failure.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ErrorItem {
    pub field: String,
    pub message: String,
}

impl<T> ApiResponse<T> {
    pub fn success(data: Option<T>) -> Self {
        Self {
            code: StatusCode::OK.as_u16(),
            message: "success".to_string(),
            data,
            errors: Vec::new(),
            timestamp: Timestamp::now().to_rfc3339(),
        }
    }
}

/// A 200 response carrying `data`.
pub fn ok<T: Serialize>(data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse::success(Some(data)))
}

/// A 200 response with no `data`.
pub fn ok_empty() -> Json<ApiResponse<()>> {
    Json(ApiResponse::success(None))
}

/// A window of a listing, echoing the requested bounds.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct PageData<T> {
    pub items: Vec<T>,
    pub total: usize,
    pub offset: usize,
    pub limit: usize,
}

/// An error rendered through the envelope.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
    errors: Vec<ErrorItem>,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
            errors: Vec::new(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
            errors: Vec::new(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
            errors: Vec::new(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Validation | ErrorKind::FieldValidation | ErrorKind::BadRequest => {
            StatusCode::BAD_REQUEST
        }
        ErrorKind::SchemaNotLoaded => StatusCode::SERVICE_UNAVAILABLE,
        ErrorKind::Io => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        let errors = match &err {
            EngineError::Field(field) => vec![ErrorItem {
                field: field.field.clone(),
                message: field.kind.to_string(),
            }],
            _ => Vec::new(),
        };
        Self {
            status: status_for(err.kind()),
            message: err.to_string(),
            errors,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(format!("invalid request body: {}", rejection.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::bad_request(format!("invalid query: {}", rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(status = %self.status, message = %self.message, "request failed");
        }
        let body = ApiResponse::<()> {
            code: self.status.as_u16(),
            message: self.message,
            data: None,
            errors: self.errors,
            timestamp: Timestamp::now().to_rfc3339(),
        };
        (self.status, Json(body)).into_response()
    }
}
