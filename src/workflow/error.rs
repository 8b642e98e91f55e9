use thiserror::Error;

use crate::database::DatabaseError;
use crate::error::ApiError;

/// Terminal outcomes of a workflow other than success. Exactly one is
/// produced per request; the first failing step wins.
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("{0}")]
    InvalidShape(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error(transparent)]
    Internal(#[from] DatabaseError),
}

impl WorkflowError {
    /// Map to the HTTP error, replacing internal detail with `failure`.
    pub fn into_api_error(self, failure: &str) -> ApiError {
        match self {
            WorkflowError::Unauthorized => ApiError::unauthorized(),
            WorkflowError::InvalidShape(msg) => ApiError::bad_request(msg),
            WorkflowError::NotFound(msg) => ApiError::not_found(msg),
            WorkflowError::Conflict(msg) => ApiError::conflict(msg),
            WorkflowError::Internal(err) => {
                tracing::error!(error = %err, "{}", failure);
                ApiError::internal_server_error(failure)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn internal_errors_hide_detail() {
        let err = WorkflowError::Internal(DatabaseError::QueryError("relation \"teams\" does not exist".to_string()));
        let api = err.into_api_error("Failed to create team");
        assert_eq!(api.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(api.message(), "Failed to create team");
    }

    #[test]
    fn client_errors_keep_their_message() {
        let api = WorkflowError::NotFound("Team not found".to_string()).into_api_error("Failed to create result");
        assert_eq!(api.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(api.message(), "Team not found");
    }
}
