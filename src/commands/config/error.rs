use crate::errors::{
    api_error::ApiResult,
    domain::{self, DomainError, ErrorCode},
};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ConfigErrorCode {
    IoError,
    ParseFailed,
    SerializeFailed,
    NoDataDir,
}

impl ErrorCode for ConfigErrorCode {
    fn as_code_str(self) -> &'static str {
        match self {
            Self::IoError => "io_error",
            Self::ParseFailed => "parse_failed",
            Self::SerializeFailed => "serialize_failed",
            Self::NoDataDir => "no_data_dir",
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct ConfigError {
    code: ConfigErrorCode,
    message: String,
}

impl ConfigError {
    pub(crate) fn new(code: ConfigErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ConfigError {}

impl DomainError for ConfigError {
    fn code_str(&self) -> &'static str {
        self.code.as_code_str()
    }

    fn message(&self) -> &str {
        &self.message
    }
}

pub(crate) type ConfigResult<T> = Result<T, ConfigError>;

pub(crate) fn map_api_result<T>(result: ConfigResult<T>) -> ApiResult<T> {
    domain::map_api_result(result)
}
