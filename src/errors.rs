use thiserror::Error;

/// Auth form validation failures. The first failing rule wins; messages are
/// shown to the user verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Email and password are required")]
    MissingCredentials,
    #[error("Please enter a valid email address")]
    InvalidEmail,
    #[error("Password must be at least 6 characters")]
    PasswordTooShort,
    #[error("Name is required")]
    MissingName,
    #[error("Passwords do not match")]
    PasswordMismatch,
}

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Please upload a CSV file")]
    InvalidType,
    #[error("Server error: {0}")]
    ServerError(u16),
    #[error("Analysis service is not responding")]
    Unreachable,
    #[error("{0}")]
    Local(String),
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("No data available to export")]
    NoData,
    #[error("Failed to render chart snapshot: {0}")]
    RenderFailure(String),
}
