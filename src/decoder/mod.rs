/*!
Record decoders turning a dump file into a stream of [Record]s.

Two formats are supported:
- `mrt`: binary MRT dumps, decoded by [bgpkit_parser] (requires the `mrt` feature)
- `json`: records in the JSON layout of [Record], either exported by this crate or produced by
  mrtparse-based `mrt2json` scripts

Both decoders are lazy: records are produced as the consumer pulls them. A stream that breaks
part way yields the error as its last item, so a pass can fail instead of stopping early.
*/
pub mod json;
#[cfg(feature = "mrt")]
pub mod mrt;

use crate::error::TopologyError;
use crate::models::Record;
use log::debug;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// A boxed, single-pass stream of decoded records.
pub type RecordStream = Box<dyn Iterator<Item = Result<Record, TopologyError>>>;

const COMPRESSION_SUFFIXES: [&str; 6] = ["gz", "bz2", "bz", "xz", "lz4", "zst"];
const JSON_SUFFIXES: [&str; 3] = ["json", "ndjson", "jsonl"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DumpFormat {
    /// Choose by file name: JSON suffixes select [DumpFormat::Json], anything else
    /// [DumpFormat::Mrt].
    #[default]
    Auto,
    Mrt,
    Json,
}

impl DumpFormat {
    /// Resolves [DumpFormat::Auto] against a file path. Explicit formats are returned unchanged.
    pub fn resolve(self, path: &str) -> DumpFormat {
        match self {
            DumpFormat::Auto => {
                let mut parts = path.rsplit('.');
                let mut ext = parts.next().unwrap_or_default().to_ascii_lowercase();
                if COMPRESSION_SUFFIXES.contains(&ext.as_str()) {
                    ext = parts.next().unwrap_or_default().to_ascii_lowercase();
                }
                if JSON_SUFFIXES.contains(&ext.as_str()) {
                    DumpFormat::Json
                } else {
                    DumpFormat::Mrt
                }
            }
            other => other,
        }
    }
}

impl FromStr for DumpFormat {
    type Err = TopologyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(DumpFormat::Auto),
            "mrt" => Ok(DumpFormat::Mrt),
            "json" => Ok(DumpFormat::Json),
            _ => Err(TopologyError::UnknownFormat(s.to_string())),
        }
    }
}

impl Display for DumpFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            DumpFormat::Auto => "auto",
            DumpFormat::Mrt => "mrt",
            DumpFormat::Json => "json",
        };
        write!(f, "{}", name)
    }
}

/// Opens a dump file and returns the stream of records it contains.
///
/// An empty path is reported as [TopologyError::MissingDumpPath].
pub fn open_records(path: &str, format: DumpFormat) -> Result<RecordStream, TopologyError> {
    if path.is_empty() {
        return Err(TopologyError::MissingDumpPath);
    }

    let format = format.resolve(path);
    debug!("opening {} as {} dump", path, format);
    match format {
        DumpFormat::Json => Ok(Box::new(json::open_json(path)?)),
        #[cfg(feature = "mrt")]
        _ => Ok(Box::new(mrt::open_mrt(path)?)),
        #[cfg(not(feature = "mrt"))]
        _ => Err(TopologyError::MrtUnsupported),
    }
}
