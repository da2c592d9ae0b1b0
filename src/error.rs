/*!
error module defines the error types used in aspath-topology.
*/
use std::{io, num::ParseIntError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TopologyError {
    /// No dump file path was given, or the given path is empty.
    ///
    /// ## Occurs during:
    ///  - Argument handling of the `paths` and `records` commands
    #[error("no mrt path provided")]
    MissingDumpPath,
    /// The output limit argument is not an integer.
    #[error("invalid limit {value:?}: {source}")]
    InvalidLimit {
        value: String,
        #[source]
        source: ParseIntError,
    },
    /// The requested dump format is neither `mrt`, `json` nor `auto`.
    #[error("unrecognized dump format {0:?}, expected one of: auto, mrt, json")]
    UnknownFormat(String),
    /// The dump file could not be opened by the decoder backing the chosen format.
    ///
    /// ## Occurs during:
    ///  - Opening a dump file with bgpkit-parser or oneio
    #[error("unable to open {path}: {reason}")]
    OpenFailed { path: String, reason: String },
    /// Binary MRT decoding was requested but the crate was built without the `mrt` feature.
    #[error("binary MRT input requires the `mrt` feature")]
    MrtUnsupported,
    #[error(transparent)]
    IoError(#[from] io::Error),
    #[error(transparent)]
    JsonError(#[from] serde_json::Error),
}

impl TopologyError {
    pub(crate) fn open_failed(path: &str, reason: impl ToString) -> Self {
        TopologyError::OpenFailed {
            path: path.to_string(),
            reason: reason.to_string(),
        }
    }
}
