//! Top-N depth snapshot extraction.
//!
//! Materializes one side of a ladder into MBP output rows whenever the
//! engine signals a book-changing mutation. Rows carry the triggering
//! event's timestamps, channel, and feed sequence number; depth ranks start
//! at 1 and an empty ladder produces no rows at all.

use crate::book::ladder::PriceLadder;
use crate::types::{MboEvent, MbpRow, DEPTH_LEVELS};

/// Extracts point-in-time depth views from a ladder.
#[derive(Debug, Clone)]
pub struct SnapshotEmitter {
    depth: usize,
}

impl Default for SnapshotEmitter {
    fn default() -> Self {
        Self::new(DEPTH_LEVELS)
    }
}

impl SnapshotEmitter {
    /// Create an emitter producing up to `depth` levels per side.
    pub fn new(depth: usize) -> Self {
        Self { depth }
    }

    /// Depth levels emitted per side.
    #[inline]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Append one row per populated level of `ladder` to `out`, in ladder
    /// order, stamped from the triggering event. Returns the row count.
    pub fn emit_side(
        &self,
        ladder: &PriceLadder,
        trigger: &MboEvent,
        out: &mut Vec<MbpRow>,
    ) -> usize {
        let mut emitted = 0;
        for (depth, (price, level)) in ladder.top_levels(self.depth).enumerate() {
            out.push(MbpRow {
                ts_event: trigger.ts_event,
                ts_rtt: trigger.ts_rtt,
                ts_instrument: trigger.ts_instrument,
                side: ladder.side(),
                depth: depth as u8 + 1,
                price,
                size: level.total_size(),
                channel: trigger.channel,
                sequence: trigger.sequence,
            });
            emitted += 1;
        }
        emitted
    }
}
