use crate::errors::{
    api_error::ApiResult,
    domain::{self, DomainError, ErrorCode},
};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ClipboardErrorCode {
    InvalidInput,
    InvalidMode,
    NotFound,
    StateLockFailed,
}

impl ErrorCode for ClipboardErrorCode {
    fn as_code_str(self) -> &'static str {
        match self {
            Self::InvalidInput => "invalid_input",
            Self::InvalidMode => "invalid_mode",
            Self::NotFound => "not_found",
            Self::StateLockFailed => "state_lock_failed",
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct ClipboardError {
    code: ClipboardErrorCode,
    message: String,
}

impl ClipboardError {
    pub(crate) fn new(code: ClipboardErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for ClipboardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ClipboardError {}

impl DomainError for ClipboardError {
    fn code_str(&self) -> &'static str {
        self.code.as_code_str()
    }

    fn message(&self) -> &str {
        &self.message
    }
}

pub(crate) type ClipboardResult<T> = Result<T, ClipboardError>;

pub(crate) fn map_api_result<T>(result: ClipboardResult<T>) -> ApiResult<T> {
    domain::map_api_result(result)
}
