use std::path::PathBuf;

use thiserror::Error;

pub type LeukiResult<T> = Result<T, LeukiError>;

#[derive(Debug, Error)]
pub enum LeukiError {
    /// Date cell does not match `dd.MM.yyyy`. The row itself stays editable.
    #[error("malformed date `{value}`: expected dd.MM.yyyy")]
    MalformedDate { value: String },

    /// A plot was requested but no blood sample carries a usable date.
    #[error("no blood sample has a valid date entry")]
    NoValidDates,

    #[error("cannot read or write `{}`: {reason}", path.display())]
    UnreadableOrMissingFile { path: PathBuf, reason: String },

    #[error("invalid document: {0}")]
    InvalidDocument(String),

    #[error("invalid viewport size: width={width}, height={height}")]
    InvalidViewport { width: u32, height: u32 },

    #[error("row {row} out of range for table of {len} rows")]
    RowOutOfRange { row: usize, len: usize },

    #[error("invalid data: {0}")]
    InvalidData(String),
}
