//! JSON record decoder.
//!
//! Accepts either a single JSON array of records (as written by `mrt2json` scripts) or a stream
//! of concatenated JSON objects, one per line or pretty-printed, as written by the `records`
//! command. Array input is read into memory before decoding; object streams are decoded one
//! record at a time.
use crate::error::TopologyError;
use crate::models::Record;
use log::{debug, error, warn};
use serde_json::de::IoRead;
use serde_json::{StreamDeserializer, Value};
use std::io::{BufRead, BufReader, Read};

/// Opens a JSON dump, local or remote, plain or compressed, through `oneio`.
pub fn open_json(path: &str) -> Result<JsonRecords<Box<dyn Read + Send>>, TopologyError> {
    let reader = oneio::get_reader(path).map_err(|e| TopologyError::open_failed(path, e))?;
    JsonRecords::from_reader(reader)
}

enum Source<R: Read> {
    Array(std::vec::IntoIter<Value>),
    Stream(StreamDeserializer<'static, IoRead<BufReader<R>>, Value>),
    Done,
}

/// Iterator over records decoded from JSON.
///
/// A value that is not a record (e.g. a bare string, or a record whose `rib_entries` is not a
/// list) is logged and skipped. A syntax error is yielded as the last item, since the decoder
/// cannot resync.
pub struct JsonRecords<R: Read> {
    source: Source<R>,
    count: u64,
}

impl<R: Read> JsonRecords<R> {
    pub fn from_reader(reader: R) -> Result<Self, TopologyError> {
        let mut reader = BufReader::new(reader);
        let source = match first_significant_byte(&mut reader)? {
            None => Source::Done,
            Some(b'[') => {
                let values: Vec<Value> = serde_json::from_reader(reader)?;
                debug!("read JSON array of {} records", values.len());
                Source::Array(values.into_iter())
            }
            Some(_) => Source::Stream(serde_json::Deserializer::from_reader(reader).into_iter()),
        };
        Ok(JsonRecords { source, count: 0 })
    }
}

impl<R: Read> Iterator for JsonRecords<R> {
    type Item = Result<Record, TopologyError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let next = match &mut self.source {
                Source::Array(values) => values.next().map(Ok),
                Source::Stream(stream) => stream.next(),
                Source::Done => None,
            };
            let value = match next {
                None => return None,
                Some(Ok(value)) => value,
                Some(Err(e)) => {
                    error!("JSON record stream broken after {} records: {}", self.count, e);
                    self.source = Source::Done;
                    return Some(Err(e.into()));
                }
            };

            self.count += 1;
            match serde_json::from_value::<Record>(value) {
                Ok(record) => return Some(Ok(record)),
                Err(e) => {
                    warn!("skipping malformed record #{}: {}", self.count, e);
                }
            }
        }
    }
}

/// Skips leading whitespace and returns the next byte without consuming it.
fn first_significant_byte<R: BufRead>(reader: &mut R) -> std::io::Result<Option<u8>> {
    loop {
        let buf = reader.fill_buf()?;
        if buf.is_empty() {
            return Ok(None);
        }
        match buf.iter().position(|b| !b.is_ascii_whitespace()) {
            Some(pos) => {
                let byte = buf[pos];
                reader.consume(pos);
                return Ok(Some(byte));
            }
            None => {
                let len = buf.len();
                reader.consume(len);
            }
        }
    }
}
