use thiserror::Error;

pub type Result<T, E = ClipError> = std::result::Result<T, E>;

/// Every failure a boundary operation can surface.
///
/// Validation variants are raised before any storage access. Not-found and
/// conflict variants come back from the stores verbatim. `Storage` wraps
/// anything else the substrate reports.
#[derive(Debug, Error)]
pub enum ClipError {
    #[error("message content must not be empty")]
    InvalidContent,

    #[error("limit must be between 1 and 1000, got {0}")]
    InvalidLimit(i64),

    #[error("start of time range is after its end")]
    InvalidTimeRange,

    #[error("invalid user: {0}")]
    InvalidUser(String),

    #[error("message not found")]
    MessageNotFound,

    #[error("message is already pinned")]
    AlreadyPinned,

    #[error("message is not pinned")]
    NotPinned,

    #[error("resource already exists")]
    AlreadyExists,

    #[error("storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

impl ClipError {
    /// Stable machine-readable name for the error class.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidContent => "invalid_content",
            Self::InvalidLimit(_) => "invalid_limit",
            Self::InvalidTimeRange => "invalid_range",
            Self::InvalidUser(_) => "invalid_user",
            Self::MessageNotFound => "not_found",
            Self::AlreadyPinned => "already_pinned",
            Self::NotPinned => "not_pinned",
            Self::AlreadyExists => "already_exists",
            Self::Storage(_) => "storage",
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidContent | Self::InvalidLimit(_) | Self::InvalidTimeRange | Self::InvalidUser(_)
        )
    }
}
