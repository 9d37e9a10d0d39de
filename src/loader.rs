//! CSV event loader and streaming interface.
//!
//! Streams MBO events from a CSV file without loading the whole file into
//! memory. The expected column layout is:
//!
//! ```text
//! ts_event,ts_rtt,ts_instrument,side,action,level,order_id,price,size,channel,sequence
//! ```
//!
//! with a single header row. Decode failures become
//! [`BookError::MalformedRecord`] carrying the 1-based line number; with
//! `skip_invalid(true)` they are logged and counted instead of surfaced.
//!
//! This loader handles file I/O and record decoding only. Book-level
//! anomalies (duplicate adds, unknown cancels) are the engine's job.

use std::path::{Path, PathBuf};

use csv::StringRecord;

use crate::error::{BookError, Result};
use crate::types::{Action, MboEvent, Side};

/// I/O buffer size for file reading. The csv default is small enough that
/// syscall overhead shows up on large replay files.
pub const IO_BUFFER_SIZE: usize = 1024 * 1024;

/// Number of columns in an input record.
const FIELD_COUNT: usize = 11;

/// Statistics for CSV loading.
#[derive(Debug, Clone, Default)]
pub struct LoaderStats {
    /// Records successfully decoded
    pub records_read: u64,

    /// Records skipped due to decode failures (skip_invalid mode)
    pub records_skipped: u64,
}

/// Streaming CSV loader for MBO event files.
#[derive(Debug, Clone)]
pub struct CsvLoader {
    path: PathBuf,
    skip_invalid: bool,
}

impl CsvLoader {
    /// Create a loader for the given file.
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if !path.is_file() {
            return Err(BookError::Io(format!(
                "input file not found: {}",
                path.display()
            )));
        }
        Ok(Self {
            path,
            skip_invalid: false,
        })
    }

    /// Skip records that fail to decode instead of returning an error.
    pub fn skip_invalid(mut self, skip: bool) -> Self {
        self.skip_invalid = skip;
        self
    }

    /// Open the file and return a streaming event iterator.
    pub fn iter_events(&self) -> Result<EventIterator> {
        let reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .buffer_capacity(IO_BUFFER_SIZE)
            .from_path(&self.path)?;
        Ok(EventIterator {
            records: reader.into_records(),
            skip_invalid: self.skip_invalid,
            stats: LoaderStats::default(),
        })
    }

    /// Load every event into memory at once.
    pub fn load_events(&self) -> Result<Vec<MboEvent>> {
        self.iter_events()?.collect()
    }
}

/// Streaming iterator over decoded MBO events.
pub struct EventIterator {
    records: csv::StringRecordsIntoIter<std::fs::File>,
    skip_invalid: bool,
    stats: LoaderStats,
}

impl EventIterator {
    /// Loading statistics so far.
    pub fn stats(&self) -> &LoaderStats {
        &self.stats
    }
}

impl Iterator for EventIterator {
    type Item = Result<MboEvent>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let record = match self.records.next()? {
                Ok(r) => r,
                Err(e) => {
                    if self.skip_invalid {
                        log::warn!("Skipping unreadable record: {e}");
                        self.stats.records_skipped += 1;
                        continue;
                    }
                    return Some(Err(e.into()));
                }
            };

            let line = record.position().map(|p| p.line()).unwrap_or(0);
            match parse_record(&record, line) {
                Ok(ev) => {
                    self.stats.records_read += 1;
                    return Some(Ok(ev));
                }
                Err(e) => {
                    if self.skip_invalid {
                        log::warn!("Skipping malformed record at line {line}: {e}");
                        self.stats.records_skipped += 1;
                        continue;
                    }
                    return Some(Err(e));
                }
            }
        }
    }
}

fn parse_record(record: &StringRecord, line: u64) -> Result<MboEvent> {
    if record.len() != FIELD_COUNT {
        return Err(BookError::MalformedRecord {
            line,
            reason: format!("expected {FIELD_COUNT} fields, got {}", record.len()),
        });
    }

    let side_byte = parse_flag(record, 3, "side", line)?;
    let action_byte = parse_flag(record, 4, "action", line)?;

    Ok(MboEvent {
        ts_event: parse_field(record, 0, "ts_event", line)?,
        ts_rtt: parse_field(record, 1, "ts_rtt", line)?,
        ts_instrument: parse_field(record, 2, "ts_instrument", line)?,
        side: Side::from_byte(side_byte).ok_or(BookError::InvalidSide(side_byte as char))?,
        action: Action::from_byte(action_byte)
            .ok_or(BookError::InvalidAction(action_byte as char))?,
        level_hint: parse_field(record, 5, "level", line)?,
        order_id: parse_field(record, 6, "order_id", line)?,
        price: parse_field(record, 7, "price", line)?,
        size: parse_field(record, 8, "size", line)?,
        channel: parse_field(record, 9, "channel", line)?,
        sequence: parse_field(record, 10, "sequence", line)?,
    })
}

fn parse_field<T: std::str::FromStr>(
    record: &StringRecord,
    idx: usize,
    name: &str,
    line: u64,
) -> Result<T> {
    let raw = record.get(idx).unwrap_or("");
    raw.parse().map_err(|_| BookError::MalformedRecord {
        line,
        reason: format!("invalid {name}: {raw:?}"),
    })
}

fn parse_flag(record: &StringRecord, idx: usize, name: &str, line: u64) -> Result<u8> {
    let raw = record.get(idx).unwrap_or("");
    match raw.as_bytes().first() {
        Some(&b) if raw.len() == 1 => Ok(b),
        _ => Err(BookError::MalformedRecord {
            line,
            reason: format!("invalid {name}: {raw:?}"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;
    use tempfile::NamedTempFile;

    const HEADER: &str =
        "ts_event,ts_rtt,ts_instrument,side,action,level,order_id,price,size,channel,sequence";

    fn write_csv(lines: &[&str]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{HEADER}").unwrap();
        for line in lines {
            writeln!(file, "{line}").unwrap();
        }
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_basic() {
        let file = write_csv(&[
            "1000,1001,1002,B,A,0,7,100,10,2,1",
            "2000,2001,2002,A,A,0,8,105,5,2,2",
        ]);

        let loader = CsvLoader::new(file.path()).unwrap();
        let events = loader.load_events().unwrap();

        assert_eq!(events.len(), 2);
        assert_eq!(events[0].order_id, 7);
        assert_eq!(events[0].side, Side::Bid);
        assert_eq!(events[0].action, Action::Add);
        assert_eq!(events[0].price, 100);
        assert_eq!(events[1].side, Side::Ask);
        assert_eq!(events[1].sequence, 2);
    }

    #[test]
    fn test_missing_file() {
        assert!(CsvLoader::new("/nonexistent/input.csv").is_err());
    }

    #[test]
    fn test_malformed_field_errors_with_line() {
        let file = write_csv(&["1000,1001,1002,B,A,0,seven,100,10,2,1"]);

        let loader = CsvLoader::new(file.path()).unwrap();
        let err = loader.load_events().unwrap_err();
        match err {
            BookError::MalformedRecord { line, reason } => {
                assert_eq!(line, 2);
                assert!(reason.contains("order_id"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_skip_invalid() {
        let file = write_csv(&[
            "1000,1001,1002,B,A,0,7,100,10,2,1",
            "bad,row",
            "2000,2001,2002,A,A,0,8,105,5,2,2",
        ]);

        let loader = CsvLoader::new(file.path()).unwrap().skip_invalid(true);
        let mut iter = loader.iter_events().unwrap();
        let events: Vec<MboEvent> = iter.by_ref().map(|r| r.unwrap()).collect();

        assert_eq!(events.len(), 2);
        assert_eq!(iter.stats().records_read, 2);
        assert_eq!(iter.stats().records_skipped, 1);
    }

    #[test]
    fn test_unknown_side_rejected() {
        let file = write_csv(&["1000,1001,1002,X,A,0,7,100,10,2,1"]);

        let loader = CsvLoader::new(file.path()).unwrap();
        assert!(loader.load_events().is_err());
    }

    #[test]
    fn test_clear_marker_parses() {
        let file = write_csv(&["0,0,0,R,C,0,0,0,0,0,0"]);

        let loader = CsvLoader::new(file.path()).unwrap();
        let events = loader.load_events().unwrap();
        assert!(events[0].is_clear_marker());
    }
}
