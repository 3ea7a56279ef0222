use crate::errors::{
    api_error::ApiResult,
    domain::{self, classify_io_error, DomainError, ErrorCode, IoErrorHint},
};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TransferErrorCode {
    InvalidInput,
    InvalidPath,
    NotFound,
    NotDirectory,
    PermissionDenied,
    SelfReferential,
    DestinationExists,
    SymlinkUnsupported,
    StepFailed,
    Cancelled,
    IoError,
    TaskFailed,
}

impl ErrorCode for TransferErrorCode {
    fn as_code_str(self) -> &'static str {
        match self {
            Self::InvalidInput => "invalid_input",
            Self::InvalidPath => "invalid_path",
            Self::NotFound => "not_found",
            Self::NotDirectory => "not_directory",
            Self::PermissionDenied => "permission_denied",
            Self::SelfReferential => "self_referential",
            Self::DestinationExists => "destination_exists",
            Self::SymlinkUnsupported => "symlink_unsupported",
            Self::StepFailed => "transfer_step_failed",
            Self::Cancelled => "cancelled",
            Self::IoError => "io_error",
            Self::TaskFailed => "task_failed",
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct TransferError {
    code: TransferErrorCode,
    message: String,
}

impl TransferError {
    pub(crate) fn new(code: TransferErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub(crate) fn from_io_error(context: &str, error: std::io::Error) -> Self {
        let code = match classify_io_error(&error) {
            IoErrorHint::NotFound => TransferErrorCode::NotFound,
            IoErrorHint::PermissionDenied => TransferErrorCode::PermissionDenied,
            IoErrorHint::AlreadyExists => TransferErrorCode::DestinationExists,
            IoErrorHint::InvalidInput => TransferErrorCode::InvalidInput,
            IoErrorHint::Other => TransferErrorCode::IoError,
        };
        Self::new(code, format!("{context}: {error}"))
    }

    pub(crate) fn code(&self) -> TransferErrorCode {
        self.code
    }
}

impl fmt::Display for TransferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for TransferError {}

impl DomainError for TransferError {
    fn code_str(&self) -> &'static str {
        self.code.as_code_str()
    }

    fn message(&self) -> &str {
        &self.message
    }
}

pub(crate) type TransferResult<T> = Result<T, TransferError>;

pub(crate) fn map_api_result<T>(result: TransferResult<T>) -> ApiResult<T> {
    domain::map_api_result(result)
}
