//! Definitions of errors that the filter compiler can encounter

/// A [`std::result::Result`] that has the crate [`Error`] as the error variant
pub type FilterResult<T, E = Error> = std::result::Result<T, E>;

/// All the types of errors that the filter compiler can run into.
///
/// Compilation itself only ever fails with [`Error::BadRequest`]. Everything else a coordinator
/// can send us degrades to an unsupported filter instead of an error.
#[non_exhaustive]
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The coordinator sent a structurally invalid request: a column reference that does not
    /// address any column of the scanned column set.
    #[error("Column index out of bound: {index}, should in [0,{column_count})")]
    BadRequest { index: i64, column_count: usize },

    /// The value payload of a literal or column reference could not be decoded
    #[error("Invalid expression payload: {0}")]
    InvalidPayload(String),

    /// Invalid filter settings
    #[error("Invalid filter settings: {0}")]
    InvalidConfig(String),
}

// Convenience constructors for Error types that take a String argument
impl Error {
    pub fn bad_request(index: i64, column_count: usize) -> Self {
        Self::BadRequest {
            index,
            column_count,
        }
    }

    pub fn invalid_payload(msg: impl ToString) -> Self {
        Self::InvalidPayload(msg.to_string())
    }

    pub fn invalid_config(msg: impl ToString) -> Self {
        Self::InvalidConfig(msg.to_string())
    }

    /// True if this error signals a structurally invalid request.
    pub fn is_bad_request(&self) -> bool {
        matches!(self, Self::BadRequest { .. })
    }
}
