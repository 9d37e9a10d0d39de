//! CSV output for depth snapshot rows.

use std::path::Path;

use crate::error::Result;
use crate::types::MbpRow;

/// Output column layout, one row per (snapshot, side, depth level).
const HEADER: [&str; 9] = [
    "ts_event",
    "ts_rtt",
    "ts_instrument",
    "side",
    "level",
    "price",
    "size",
    "channel",
    "sequence",
];

/// Write snapshot rows to a CSV file, replacing any existing content.
pub fn write_mbp_csv(path: impl AsRef<Path>, rows: &[MbpRow]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(HEADER)?;
    for row in rows {
        writer.write_record([
            row.ts_event.to_string(),
            row.ts_rtt.to_string(),
            row.ts_instrument.to_string(),
            (row.side.to_byte() as char).to_string(),
            row.depth.to_string(),
            row.price.to_string(),
            row.size.to_string(),
            row.channel.to_string(),
            row.sequence.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Side;
    use tempfile::NamedTempFile;

    fn row(side: Side, depth: u8, price: i64, size: u32) -> MbpRow {
        MbpRow {
            ts_event: 1_000,
            ts_rtt: 2_000,
            ts_instrument: 3_000,
            side,
            depth,
            price,
            size,
            channel: 2,
            sequence: 42,
        }
    }

    #[test]
    fn test_header_and_rows() {
        let file = NamedTempFile::new().unwrap();
        let rows = vec![row(Side::Bid, 1, 100, 10), row(Side::Ask, 1, 101, 5)];
        write_mbp_csv(file.path(), &rows).unwrap();

        let content = std::fs::read_to_string(file.path()).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(
            lines[0],
            "ts_event,ts_rtt,ts_instrument,side,level,price,size,channel,sequence"
        );
        assert_eq!(lines[1], "1000,2000,3000,B,1,100,10,2,42");
        assert_eq!(lines[2], "1000,2000,3000,A,1,101,5,2,42");
    }

    #[test]
    fn test_empty_rows_writes_header_only() {
        let file = NamedTempFile::new().unwrap();
        write_mbp_csv(file.path(), &[]).unwrap();

        let content = std::fs::read_to_string(file.path()).unwrap();
        assert_eq!(content.lines().count(), 1);
    }
}
