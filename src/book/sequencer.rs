//! Execution-sequence correlation state machine.
//!
//! Exchange feeds report one execution as three separate messages (a Trade
//! announcement, a Fill attribution, and a finalizing Cancel) rather than a
//! single atomic mutation. The sequencer correlates that triple into exactly
//! one liquidity-reducing book mutation, applied only at finalization, so a
//! snapshot taken between the legs never observes a half-applied trade.
//!
//! Correlation is keyed by side alone: a Fill advances the earliest
//! `TradeSeen` pending on the other side, and a Cancel completes the earliest
//! open pending on its own side. Overlapping in-flight trades on the same
//! side are therefore not detected as a conflict; a second pending is opened
//! silently. Feeds that interleave executions per side need a carried
//! correlation identifier instead.

use crate::types::Side;

/// Progress of an in-flight execution sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingState {
    /// Trade announced, awaiting the Fill attribution.
    TradeSeen,
    /// Fill matched, awaiting the completing Cancel.
    FillSeen,
}

/// An announced execution awaiting finalization.
#[derive(Debug, Clone, Copy)]
pub struct PendingExecution {
    /// Side of the Trade event itself (the completing Cancel carries it too).
    pub aggressor: Side,
    /// Opposite side: the ladder whose resting liquidity will be reduced.
    pub resting: Side,
    /// Execution price recorded from the Trade event.
    pub price: i64,
    /// Execution quantity recorded from the Trade event.
    pub size: u32,
    /// Order id carried by the matched Fill. Diagnostics only; correctness
    /// does not depend on it.
    pub fill_order_id: Option<u64>,
    /// Current progress through the three-leg protocol.
    pub state: PendingState,
}

/// Correlates (Trade, Fill, Cancel) triples into single book mutations.
#[derive(Debug, Clone, Default)]
pub struct ExecutionSequencer {
    pending: Vec<PendingExecution>,
}

impl ExecutionSequencer {
    /// Create a sequencer with no open pendings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a Trade announcement. Neutral-side trades do not touch the
    /// book and open no pending. Returns whether a pending was opened.
    pub fn on_trade(&mut self, side: Side, price: i64, size: u32) -> bool {
        let resting = match side.opposite() {
            Some(s) => s,
            None => return false,
        };
        self.pending.push(PendingExecution {
            aggressor: side,
            resting,
            price,
            size,
            fill_order_id: None,
            state: PendingState::TradeSeen,
        });
        true
    }

    /// Attribute a Fill to the earliest awaiting pending on the other side.
    /// An unmatched Fill is a no-op (assumed to correlate to a trade already
    /// resolved). Returns whether a pending advanced.
    pub fn on_fill(&mut self, side: Side, order_id: u64) -> bool {
        for p in self.pending.iter_mut() {
            if p.state == PendingState::TradeSeen && p.aggressor != side {
                p.fill_order_id = Some(order_id);
                p.state = PendingState::FillSeen;
                return true;
            }
        }
        false
    }

    /// Resolve a Cancel against the open pendings.
    ///
    /// When the Cancel's side matches the earliest open pending's trade side
    /// it is the completing leg: the pending is retired and returned so the
    /// caller can apply the deferred liquidity reduction. Otherwise `None`:
    /// the Cancel is an ordinary resting-order cancellation.
    pub fn on_cancel(&mut self, side: Side) -> Option<PendingExecution> {
        let pos = self.pending.iter().position(|p| p.aggressor == side)?;
        Some(self.pending.remove(pos))
    }

    /// Number of in-flight (not yet completed) executions.
    #[inline]
    pub fn open_count(&self) -> usize {
        self.pending.len()
    }

    /// Drop all in-flight state.
    pub fn clear(&mut self) {
        self.pending.clear();
    }
}
