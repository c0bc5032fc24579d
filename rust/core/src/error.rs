// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for geometry source lookups.

use crate::ids::RawId;

/// Result type alias for geometry source operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while querying a geometry source.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No chamber is registered at the requested position.
    #[error("no chamber at wheel {wheel}, sector {sector}, station {station}")]
    UnknownChamber { wheel: i32, sector: i32, station: i32 },

    /// A raw identifier is not known to the geometry source.
    #[error("unknown raw id {0}")]
    UnknownId(RawId),

    /// A raw identifier does not follow the DT bit layout.
    #[error("raw id {0:#010x} is not a DT identifier")]
    InvalidRawId(u32),

    /// A DT field does not fit in its bit range.
    #[error("{field} value {value} does not fit in a DT raw id")]
    FieldOutOfRange { field: &'static str, value: i32 },

    /// The same raw id was inserted twice into a geometry table.
    #[error("duplicate raw id {0}")]
    DuplicateId(RawId),

    /// Geometry table (de)serialization error.
    #[error("geometry table serialization error: {0}")]
    Json(String),

    /// I/O error while reading a geometry table.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Json(e.to_string())
    }
}
