use crate::errors::{
    api_error::ApiResult,
    domain::{
        self, classify_io_error, classify_message_by_patterns, DomainError, ErrorCode, IoErrorHint,
    },
};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ArchiveErrorCode {
    InvalidInput,
    InvalidPath,
    NotFound,
    PermissionDenied,
    /// An encrypted entry was hit without a password.
    PasswordRequired,
    InvalidPassword,
    FileExists,
    ZipError,
    IoError,
}

impl ErrorCode for ArchiveErrorCode {
    fn as_code_str(self) -> &'static str {
        match self {
            Self::InvalidInput => "invalid_input",
            Self::InvalidPath => "invalid_path",
            Self::NotFound => "not_found",
            Self::PermissionDenied => "permission_denied",
            Self::PasswordRequired => "password_required",
            Self::InvalidPassword => "invalid_password",
            Self::FileExists => "file_exists",
            Self::ZipError => "zip_error",
            Self::IoError => "io_error",
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct ArchiveError {
    code: ArchiveErrorCode,
    message: String,
}

impl ArchiveError {
    pub(crate) fn new(code: ArchiveErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub(crate) fn from_io_error(context: &str, error: std::io::Error) -> Self {
        let code = match classify_io_error(&error) {
            IoErrorHint::NotFound => ArchiveErrorCode::NotFound,
            IoErrorHint::PermissionDenied => ArchiveErrorCode::PermissionDenied,
            IoErrorHint::AlreadyExists => ArchiveErrorCode::FileExists,
            _ => ArchiveErrorCode::IoError,
        };
        Self::new(code, format!("{context}: {error}"))
    }

    /// The zip crate surfaces password problems as plain messages; scan for
    /// them so the frontend can prompt instead of showing a raw error.
    pub(crate) fn from_zip_error(context: &str, error: zip::result::ZipError) -> Self {
        let message = error.to_string();
        let code = classify_message_by_patterns(
            &message,
            &[
                (ArchiveErrorCode::PasswordRequired, &["password required"]),
                (ArchiveErrorCode::InvalidPassword, &["invalid password"]),
            ],
            ArchiveErrorCode::ZipError,
        );
        Self::new(code, format!("{context}: {message}"))
    }

    pub(crate) fn code(&self) -> ArchiveErrorCode {
        self.code
    }
}

impl fmt::Display for ArchiveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ArchiveError {}

impl DomainError for ArchiveError {
    fn code_str(&self) -> &'static str {
        self.code.as_code_str()
    }

    fn message(&self) -> &str {
        &self.message
    }
}

pub(crate) type ArchiveResult<T> = Result<T, ArchiveError>;

pub(crate) fn map_api_result<T>(result: ArchiveResult<T>) -> ApiResult<T> {
    domain::map_api_result(result)
}
