use crate::errors::{
    api_error::ApiResult,
    domain::{self, DomainError, ErrorCode},
};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum IndexErrorCode {
    InvalidPath,
    NotReady,
    WalkFailed,
    StateLockFailed,
    SnapshotFailed,
}

impl ErrorCode for IndexErrorCode {
    fn as_code_str(self) -> &'static str {
        match self {
            Self::InvalidPath => "invalid_path",
            Self::NotReady => "index_not_ready",
            Self::WalkFailed => "index_walk_failed",
            Self::StateLockFailed => "index_lock_failed",
            Self::SnapshotFailed => "index_snapshot_failed",
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct IndexError {
    code: IndexErrorCode,
    message: String,
}

impl IndexError {
    pub(crate) fn new(code: IndexErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    #[cfg(test)]
    pub(crate) fn code(&self) -> IndexErrorCode {
        self.code
    }
}

impl fmt::Display for IndexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for IndexError {}

impl DomainError for IndexError {
    fn code_str(&self) -> &'static str {
        self.code.as_code_str()
    }

    fn message(&self) -> &str {
        &self.message
    }
}

pub(crate) type IndexResult<T> = Result<T, IndexError>;

pub(crate) fn map_api_result<T>(result: IndexResult<T>) -> ApiResult<T> {
    domain::map_api_result(result)
}
