use common_http_errors::ApiError;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SecurityError {
    #[error("username and password are required")] MissingCredentials,
    #[error("invalid credentials")]                InvalidCredentials,
    #[error("login required")]                     NotAuthenticated,
    #[error("unauthorized - missing required role")] Forbidden,
}

impl From<SecurityError> for ApiError {
    fn from(e: SecurityError) -> Self {
        match e {
            SecurityError::MissingCredentials => ApiError::BadRequest {
                code: "missing_credentials",
                trace_id: None,
                message: Some(e.to_string()),
            },
            SecurityError::InvalidCredentials => ApiError::Unauthorized { code: "invalid_credentials", trace_id: None },
            SecurityError::NotAuthenticated => ApiError::Unauthorized { code: "not_authenticated", trace_id: None },
            SecurityError::Forbidden => ApiError::Forbidden { trace_id: None },
        }
    }
}
