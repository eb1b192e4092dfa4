use thiserror::Error;

/// The returned error type.
#[derive(Debug, Error)]
pub enum Error {
    /// The movie or fragment box tree is internally inconsistent. Fatal to
    /// the current initialization; the iterator is left empty.
    #[error("{0}")]
    Malformed(String),

    /// Packed sample auxiliary information could not be parsed. Recoverable;
    /// the consumer may skip the affected run.
    #[error("invalid sample auxiliary information: {0}")]
    AuxInfo(String),
}

/// `Result` type returned when traversing sample runs.
pub type Result<T> = std::result::Result<T, Error>;

/// Creates an `Error::Malformed` from a format string (like `anyhow::anyhow!`).
/// Use in `.ok_or_else(|| err!("message"))`.
#[macro_export]
macro_rules! err {
    ($($arg:tt)*) => {
        $crate::Error::Malformed(format!($($arg)*))
    };
}

/// Creates an `Error::Malformed` and returns early (like `anyhow::bail!`).
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::err!($($arg)*))
    };
}
