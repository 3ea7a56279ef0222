use crate::errors::{
    api_error::ApiResult,
    domain::{self, classify_io_error, DomainError, ErrorCode, IoErrorHint},
};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FsErrorCode {
    InvalidInput,
    InvalidPath,
    NotFound,
    PermissionDenied,
    DestinationExists,
    TrashFailed,
    OpenFailed,
    IoError,
}

impl ErrorCode for FsErrorCode {
    fn as_code_str(self) -> &'static str {
        match self {
            Self::InvalidInput => "invalid_input",
            Self::InvalidPath => "invalid_path",
            Self::NotFound => "not_found",
            Self::PermissionDenied => "permission_denied",
            Self::DestinationExists => "destination_exists",
            Self::TrashFailed => "trash_failed",
            Self::OpenFailed => "open_failed",
            Self::IoError => "io_error",
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct FsError {
    code: FsErrorCode,
    message: String,
}

impl FsError {
    pub(crate) fn new(code: FsErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub(crate) fn from_io_error(context: &str, error: std::io::Error) -> Self {
        let code = match classify_io_error(&error) {
            IoErrorHint::NotFound => FsErrorCode::NotFound,
            IoErrorHint::PermissionDenied => FsErrorCode::PermissionDenied,
            IoErrorHint::AlreadyExists => FsErrorCode::DestinationExists,
            IoErrorHint::InvalidInput => FsErrorCode::InvalidInput,
            IoErrorHint::Other => FsErrorCode::IoError,
        };
        Self::new(code, format!("{context}: {error}"))
    }

    pub(crate) fn code(&self) -> FsErrorCode {
        self.code
    }
}

impl fmt::Display for FsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for FsError {}

impl DomainError for FsError {
    fn code_str(&self) -> &'static str {
        self.code.as_code_str()
    }

    fn message(&self) -> &str {
        &self.message
    }
}

pub(crate) type FsResult<T> = Result<T, FsError>;

pub(crate) fn map_api_result<T>(result: FsResult<T>) -> ApiResult<T> {
    domain::map_api_result(result)
}
