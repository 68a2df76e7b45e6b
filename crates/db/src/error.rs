#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("unknown schema revision {0}")]
    UnknownRevision(String),
    #[error("revision {revision} expects {expected:?} before it, found {found:?}")]
    BrokenChain {
        revision: String,
        expected: Option<String>,
        found: Option<String>,
    },
}

pub type Result<T> = std::result::Result<T, DbError>;
