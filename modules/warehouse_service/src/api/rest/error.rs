//! HTTP error mapping to RFC-9457 Problem Details

use crate::contract::WarehouseError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// RFC-9457 Problem Details for HTTP API errors
#[derive(Debug, Serialize)]
pub struct Problem {
    /// A URI reference that identifies the problem type
    #[serde(rename = "type")]
    pub type_uri: String,

    /// A short, human-readable summary of the problem type
    pub title: String,

    /// The HTTP status code
    pub status: u16,

    /// A human-readable explanation specific to this occurrence
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl Problem {
    /// Create a new Problem Details response
    pub fn new(status: StatusCode, title: impl Into<String>) -> Self {
        Self {
            type_uri: format!("https://httpstatuses.io/{}", status.as_u16()),
            title: title.into(),
            status: status.as_u16(),
            detail: None,
        }
    }

    /// Add detail message
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

impl IntoResponse for Problem {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let mut response = (status, Json(self)).into_response();
        response.headers_mut().insert(
            axum::http::header::CONTENT_TYPE,
            axum::http::HeaderValue::from_static("application/problem+json"),
        );
        response
    }
}

impl From<WarehouseError> for Problem {
    fn from(error: WarehouseError) -> Self {
        map_domain_error(error)
    }
}

/// Map domain errors to HTTP Problem Details
pub fn map_domain_error(error: WarehouseError) -> Problem {
    match error {
        WarehouseError::NotFound { resource, id } => {
            Problem::new(StatusCode::NOT_FOUND, format!("{resource} Not Found"))
                .with_detail(format!("{resource} with id '{id}' was not found"))
        }

        WarehouseError::AlreadyFinalized { coming_table_id } => {
            Problem::new(StatusCode::CONFLICT, "Shipment Already Finalized").with_detail(format!(
                "coming table '{coming_table_id}' is finished and cannot be modified"
            ))
        }

        WarehouseError::UnknownBarcode { barcode } => {
            Problem::new(StatusCode::UNPROCESSABLE_ENTITY, "Unknown Barcode")
                .with_detail(format!("no product is registered with barcode '{barcode}'"))
        }

        WarehouseError::Validation { message } => {
            Problem::new(StatusCode::BAD_REQUEST, "Validation Error").with_detail(message)
        }

        // Cause was already logged where it was wrapped
        WarehouseError::Store { operation } => {
            Problem::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
                .with_detail(format!("failed to {operation}"))
        }
    }
}

/// Turn an extractor rejection (bad path id, query or JSON body) into a 400
pub fn map_rejection(rejection: impl std::fmt::Display) -> Problem {
    map_domain_error(WarehouseError::validation(rejection.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn every_error_kind_has_its_status() {
        let cases = [
            (WarehouseError::not_found("branch", Uuid::nil()), 404),
            (
                WarehouseError::AlreadyFinalized {
                    coming_table_id: Uuid::nil(),
                },
                409,
            ),
            (
                WarehouseError::UnknownBarcode {
                    barcode: "999".into(),
                },
                422,
            ),
            (WarehouseError::validation("bad"), 400),
            (
                WarehouseError::Store {
                    operation: "list branches".into(),
                },
                500,
            ),
        ];

        for (error, status) in cases {
            let problem = map_domain_error(error);
            assert_eq!(problem.status, status);
            assert_eq!(problem.type_uri, format!("https://httpstatuses.io/{status}"));
        }
    }

    #[test]
    fn store_detail_names_operation_only() {
        let problem = map_domain_error(WarehouseError::Store {
            operation: "list branches".into(),
        });
        assert_eq!(problem.detail.as_deref(), Some("failed to list branches"));
    }

    #[test]
    fn problem_serializes_type_field() {
        let json = serde_json::to_value(Problem::new(StatusCode::NOT_FOUND, "x")).unwrap();
        assert_eq!(json["type"], "https://httpstatuses.io/404");
        assert!(json.get("detail").is_none());
    }
}
