//! JSON passthrough of decoded records.
use crate::dedup::Limit;
use crate::error::TopologyError;
use crate::io::broken_pipe_or;
use crate::models::Record;
use std::io::Write;

/// Writes up to `limit` records as JSON, one object per line, or as indented objects with
/// `pretty`. The output reads back through the JSON decoder.
pub fn export_records<W, I>(
    writer: &mut W,
    records: I,
    limit: Limit,
    pretty: bool,
) -> Result<u64, TopologyError>
where
    W: Write,
    I: IntoIterator<Item = Record>,
{
    let max = match limit {
        Limit::Unbounded => usize::MAX,
        Limit::AtMost(n) => n,
    };

    let mut count = 0;
    for record in records.into_iter().take(max) {
        let json = match pretty {
            true => serde_json::to_string_pretty(&record)?,
            false => serde_json::to_string(&record)?,
        };
        if let Err(e) = writeln!(writer, "{}", json) {
            return broken_pipe_or(e, count);
        }
        count += 1;
    }
    match writer.flush() {
        Ok(()) => Ok(count),
        Err(e) => broken_pipe_or(e, count),
    }
}
