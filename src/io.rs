//! Line-oriented input and output of the path, node and link passes.
use crate::error::TopologyError;
use log::{debug, error};
use std::io::{BufRead, BufReader, ErrorKind, Write};

/// Opens a line source: stdin for `None` or `-`, otherwise a file read through `oneio`, which
/// handles local and remote paths and `.gz`/`.bz2` compression.
pub fn open_lines(path: Option<&str>) -> Result<Box<dyn BufRead>, TopologyError> {
    match path {
        None | Some("-") => Ok(Box::new(std::io::stdin().lock())),
        Some(path) => {
            let reader =
                oneio::get_reader(path).map_err(|e| TopologyError::open_failed(path, e))?;
            Ok(Box::new(BufReader::new(reader)))
        }
    }
}

/// Lazily yields the lines of a reader.
///
/// A read error, including input that is not valid UTF-8, is yielded once and ends the stream.
/// Callers collect it with [itertools::process_results] so the pass fails instead of stopping
/// early with partial output.
pub fn lines_of<R: BufRead>(reader: R) -> impl Iterator<Item = Result<String, TopologyError>> {
    let mut failed = false;
    reader.lines().map_while(move |line| {
        if failed {
            return None;
        }
        if let Err(e) = &line {
            error!("failed to read input line: {}", e);
            failed = true;
        }
        Some(line.map_err(TopologyError::from))
    })
}

/// Writes each item on its own line and returns the number written.
///
/// A closed downstream pipe stops writing without an error, so the pass can be cut short with
/// `head` and friends.
pub fn write_lines<W, I>(writer: &mut W, lines: I) -> Result<u64, TopologyError>
where
    W: Write,
    I: IntoIterator<Item = String>,
{
    let mut count = 0;
    for line in lines {
        if let Err(e) = writeln!(writer, "{}", line) {
            return broken_pipe_or(e, count);
        }
        count += 1;
    }
    match writer.flush() {
        Ok(()) => Ok(count),
        Err(e) => broken_pipe_or(e, count),
    }
}

pub(crate) fn broken_pipe_or(e: std::io::Error, count: u64) -> Result<u64, TopologyError> {
    if e.kind() == ErrorKind::BrokenPipe {
        debug!("output closed after {} lines", count);
        Ok(count)
    } else {
        Err(e.into())
    }
}
