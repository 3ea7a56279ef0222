use crate::errors::{
    api_error::ApiResult,
    domain::{self, classify_io_error, DomainError, ErrorCode, IoErrorHint},
};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ListingErrorCode {
    InvalidPath,
    NotFound,
    NotDirectory,
    PermissionDenied,
    IoError,
}

impl ErrorCode for ListingErrorCode {
    fn as_code_str(self) -> &'static str {
        match self {
            Self::InvalidPath => "invalid_path",
            Self::NotFound => "not_found",
            Self::NotDirectory => "not_directory",
            Self::PermissionDenied => "permission_denied",
            Self::IoError => "io_error",
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct ListingError {
    code: ListingErrorCode,
    message: String,
}

impl ListingError {
    pub(crate) fn new(code: ListingErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub(crate) fn from_io_error(context: &str, error: std::io::Error) -> Self {
        let code = match classify_io_error(&error) {
            IoErrorHint::NotFound => ListingErrorCode::NotFound,
            IoErrorHint::PermissionDenied => ListingErrorCode::PermissionDenied,
            _ => ListingErrorCode::IoError,
        };
        Self::new(code, format!("{context}: {error}"))
    }
}

impl fmt::Display for ListingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ListingError {}

impl DomainError for ListingError {
    fn code_str(&self) -> &'static str {
        self.code.as_code_str()
    }

    fn message(&self) -> &str {
        &self.message
    }
}

pub(crate) type ListingResult<T> = Result<T, ListingError>;

pub(crate) fn map_api_result<T>(result: ListingResult<T>) -> ApiResult<T> {
    domain::map_api_result(result)
}
