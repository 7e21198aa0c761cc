use clipboard_core::ClipError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("row not found")]
    NotFound,

    #[error("message already pinned")]
    AlreadyPinned,

    #[error("message not pinned")]
    NotPinned,

    #[error("unique constraint violated")]
    AlreadyExists,

    #[error("corrupt row: {0}")]
    Corrupt(String),

    #[error("database lock poisoned: {0}")]
    LockPoisoned(String),

    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
}

impl From<DbError> for ClipError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound => ClipError::MessageNotFound,
            DbError::AlreadyPinned => ClipError::AlreadyPinned,
            DbError::NotPinned => ClipError::NotPinned,
            DbError::AlreadyExists => ClipError::AlreadyExists,
            other => ClipError::Storage(anyhow::Error::new(other)),
        }
    }
}

/// True for primary-key and UNIQUE violations, false for every other
/// failure including foreign-key violations.
pub(crate) fn is_unique_violation(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(e, _) => {
            e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                || e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
        }
        _ => false,
    }
}
