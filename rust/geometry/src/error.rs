use thiserror::Error;

/// Result type for station geometry operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building stations or resolving frames
#[derive(Error, Debug)]
pub enum Error {
    #[error("{field} value must be between {min} and {max}, got {value}")]
    InvalidConfiguration {
        field: &'static str,
        value: i32,
        min: i32,
        max: i32,
    },

    #[error("cell record {index} is missing the '{key}' identifier; records need sl, l and w")]
    MissingCellIdentifier { index: usize, key: &'static str },

    #[error("cell record {index} has a non-integer '{key}' identifier: {value}")]
    InvalidCellIdentifier {
        index: usize,
        key: &'static str,
        value: String,
    },

    #[error("unsupported cell info shape: {0}")]
    UnsupportedRecordShape(String),

    #[error("invalid cell info JSON: {0}")]
    InvalidJson(String),

    #[error("table row {row} has {found} values, expected {expected}")]
    RaggedTable {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("no transform path from frame '{from}' to frame '{to}'")]
    FrameNotFound { from: String, to: String },

    #[error("transform '{from}' -> '{to}' is already registered with different values")]
    ConflictingTransform { from: String, to: String },

    #[error("rotation for '{from}' -> '{to}' is not orthonormal")]
    NonOrthonormal { from: String, to: String },

    #[error("Geometry source error: {0}")]
    Core(#[from] dt_lite_core::Error),
}
