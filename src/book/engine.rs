//! Book-state engine: event dispatch and snapshot triggering.
//!
//! One `BookEngine` instance owns all mutable book state for one instrument:
//! the order index, both price ladders, the execution sequencer, and the
//! accumulated output rows. Processing is a deterministic fold over a
//! strictly-ordered event sequence; each event is handled to completion
//! (including any snapshot it triggers) before the next is considered.
//!
//! Snapshot policy: a snapshot is emitted after any event that actually
//! mutated ladder state: a successful Add, a plain Cancel that removed an
//! order, or a Cancel that completed a trade sequence. Trade and Fill events
//! never mutate the ladders directly and never trigger a snapshot on their
//! own.

use crate::book::ladder::PriceLadder;
use crate::book::order_index::OrderIndex;
use crate::book::sequencer::{ExecutionSequencer, PendingExecution};
use crate::book::snapshot::SnapshotEmitter;
use crate::error::{BookError, Result};
use crate::types::{Action, MboEvent, MbpRow, Order, Side, DEPTH_LEVELS};
use crate::warnings::{WarningCategory, WarningTracker};

/// Configuration for engine behavior.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Depth levels per side in emitted snapshots
    pub depth: usize,

    /// Whether to validate events before processing
    pub validate_events: bool,

    /// Whether to log recovered anomalies via the `log` facade
    pub log_warnings: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            depth: DEPTH_LEVELS,
            validate_events: true,
            log_warnings: true,
        }
    }
}

impl EngineConfig {
    /// Create a config with the given snapshot depth.
    pub fn new(depth: usize) -> Self {
        Self {
            depth,
            ..Default::default()
        }
    }

    /// Enable/disable event validation.
    pub fn with_validation(mut self, validate: bool) -> Self {
        self.validate_events = validate;
        self
    }

    /// Enable/disable warning logs.
    pub fn with_logging(mut self, log: bool) -> Self {
        self.log_warnings = log;
        self
    }
}

/// Statistics for monitoring a replay run.
#[derive(Debug, Clone, Default)]
pub struct EngineStats {
    /// Total events processed (including no-op markers)
    pub events_processed: u64,

    /// Events that triggered a snapshot
    pub snapshots_emitted: u64,

    /// Output rows appended
    pub rows_emitted: u64,

    /// Add events skipped because the order id already existed
    pub duplicate_orders: u64,

    /// Plain cancels referencing an unknown order (treated as no-ops)
    pub unknown_cancels: u64,

    /// Trade announcements that opened a pending execution
    pub trades_opened: u64,

    /// Execution sequences finalized by a completing cancel
    pub trades_completed: u64,

    /// Bootstrap clear-book markers observed
    pub clear_events: u64,

    /// Events rejected by validation (treated as no-ops)
    pub invalid_events: u64,

    /// Number of live orders
    pub active_orders: usize,

    /// Number of price levels (bid side)
    pub bid_levels: usize,

    /// Number of price levels (ask side)
    pub ask_levels: usize,
}

/// Which ladders an event handler actually mutated.
#[derive(Debug, Clone, Copy, Default)]
struct SideChange {
    bid: bool,
    ask: bool,
}

impl SideChange {
    fn none() -> Self {
        Self::default()
    }

    fn one(side: Side) -> Self {
        Self {
            bid: side.is_bid(),
            ask: side.is_ask(),
        }
    }

    fn both() -> Self {
        Self {
            bid: true,
            ask: true,
        }
    }

    fn any(self) -> bool {
        self.bid || self.ask
    }
}

/// Rebuilds a depth-of-book view from a single instrument's MBO stream.
#[derive(Debug, Clone)]
pub struct BookEngine {
    config: EngineConfig,

    /// Authoritative order state, keyed by order id
    index: OrderIndex,

    /// Bid ladder (prices enumerate descending)
    bids: PriceLadder,

    /// Ask ladder (prices enumerate ascending)
    asks: PriceLadder,

    /// Trade/Fill/Cancel correlation state
    sequencer: ExecutionSequencer,

    /// Top-N extraction
    emitter: SnapshotEmitter,

    /// Accumulated output rows, append-only
    output: Vec<MbpRow>,

    /// Monitoring counters
    stats: EngineStats,

    /// Recovered-fault records
    warnings: WarningTracker,
}

impl Default for BookEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl BookEngine {
    /// Create an engine emitting 10 depth levels per side.
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    /// Create an engine with custom configuration.
    pub fn with_config(config: EngineConfig) -> Self {
        let emitter = SnapshotEmitter::new(config.depth);
        Self {
            config,
            index: OrderIndex::new(),
            bids: PriceLadder::new(Side::Bid),
            asks: PriceLadder::new(Side::Ask),
            sequencer: ExecutionSequencer::new(),
            emitter,
            output: Vec::new(),
            stats: EngineStats::default(),
            warnings: WarningTracker::new(),
        }
    }

    /// Process a single MBO event and update book state.
    ///
    /// Returns the number of output rows the event produced. Recoverable
    /// data faults (duplicate add, unknown cancel, field values that fail
    /// validation) are absorbed here: they are logged, recorded as
    /// warnings, and the event becomes a no-op. A replay never aborts on
    /// one bad event.
    pub fn process_event(&mut self, ev: &MboEvent) -> Result<usize> {
        // Bootstrap marker: never routed to any handler
        if ev.is_clear_marker() {
            self.stats.events_processed += 1;
            self.stats.clear_events += 1;
            return Ok(0);
        }

        if self.config.validate_events {
            if let Err(e) = ev.validate() {
                self.stats.events_processed += 1;
                self.stats.invalid_events += 1;
                if self.config.log_warnings {
                    log::warn!("Invalid event at seq {}: {e}; event skipped", ev.sequence);
                }
                self.warnings.record(
                    WarningCategory::InvalidEvent,
                    e.to_string(),
                    Some(ev.ts_event),
                    Some(ev.order_id),
                    Some(ev.sequence),
                );
                return Ok(0);
            }
        }

        let changed = match ev.action {
            Action::Add => self.handle_add(ev),
            Action::Cancel => self.handle_cancel(ev),
            Action::Trade => {
                if self.sequencer.on_trade(ev.side, ev.price, ev.size) {
                    self.stats.trades_opened += 1;
                }
                SideChange::none()
            }
            Action::Fill => {
                self.sequencer.on_fill(ev.side, ev.order_id);
                SideChange::none()
            }
        };

        let mut rows = 0;
        if changed.bid {
            rows += self.emitter.emit_side(&self.bids, ev, &mut self.output);
        }
        if changed.ask {
            rows += self.emitter.emit_side(&self.asks, ev, &mut self.output);
        }

        self.stats.events_processed += 1;
        if changed.any() {
            self.stats.snapshots_emitted += 1;
            self.stats.rows_emitted += rows as u64;
        }
        self.stats.active_orders = self.index.len();
        self.stats.bid_levels = self.bids.len();
        self.stats.ask_levels = self.asks.len();

        Ok(rows)
    }

    /// Add a new resting order to the book.
    fn handle_add(&mut self, ev: &MboEvent) -> SideChange {
        let ladder = match ev.side {
            Side::Bid => &mut self.bids,
            Side::Ask => &mut self.asks,
            // Non-directional adds never reach the book
            Side::Neutral | Side::Reserved => return SideChange::none(),
        };

        let order = Order {
            side: ev.side,
            price: ev.price,
            size: ev.size,
        };
        if let Err(BookError::DuplicateOrder(id)) = self.index.insert(ev.order_id, order) {
            self.stats.duplicate_orders += 1;
            if self.config.log_warnings {
                log::warn!(
                    "Add for existing order {} at seq {}; event skipped",
                    id,
                    ev.sequence
                );
            }
            self.warnings.record(
                WarningCategory::DuplicateOrder,
                format!("Add for existing order {id}"),
                Some(ev.ts_event),
                Some(id),
                Some(ev.sequence),
            );
            return SideChange::none();
        }

        ladder.add_order(ev.price, ev.order_id, ev.size);
        SideChange::one(ev.side)
    }

    /// Resolve a Cancel: either the completing leg of an execution
    /// sequence, or an ordinary resting-order cancellation.
    fn handle_cancel(&mut self, ev: &MboEvent) -> SideChange {
        if let Some(pending) = self.sequencer.on_cancel(ev.side) {
            // The reduction lands on one ladder but the execution clears
            // interest on both: emit both sides.
            return if self.apply_execution(ev, &pending) {
                self.stats.trades_completed += 1;
                SideChange::both()
            } else {
                SideChange::none()
            };
        }

        match self.index.remove(ev.order_id) {
            Ok(order) => {
                let ladder = match order.side {
                    Side::Bid => &mut self.bids,
                    _ => &mut self.asks,
                };
                ladder.remove_order(order.price, ev.order_id);
                SideChange::one(order.side)
            }
            Err(_) => {
                // Already gone or never seen: a no-op, not an error
                self.stats.unknown_cancels += 1;
                if self.config.log_warnings {
                    log::debug!(
                        "Cancel for unknown order {} at seq {}; ignored",
                        ev.order_id,
                        ev.sequence
                    );
                }
                self.warnings.record(
                    WarningCategory::OrderNotFound,
                    format!("Cancel for unknown order {}", ev.order_id),
                    Some(ev.ts_event),
                    Some(ev.order_id),
                    Some(ev.sequence),
                );
                SideChange::none()
            }
        }
    }

    /// Apply a finalized execution to the resting ladder: the oldest
    /// constituent at the recorded price absorbs the recorded quantity.
    /// Returns whether the book actually changed.
    fn apply_execution(&mut self, ev: &MboEvent, pending: &PendingExecution) -> bool {
        let ladder = match pending.resting {
            Side::Bid => &mut self.bids,
            _ => &mut self.asks,
        };

        let front = ladder
            .level_at(pending.price)
            .and_then(|level| level.front_order());
        let (order_id, size) = match front {
            Some(f) => f,
            None => {
                if self.config.log_warnings {
                    log::warn!(
                        "Completed trade at price {} found no resting level; ignored",
                        pending.price
                    );
                }
                self.warnings.record(
                    WarningCategory::InconsistentState,
                    format!("No resting level at price {} for completed trade", pending.price),
                    Some(ev.ts_event),
                    pending.fill_order_id,
                    Some(ev.sequence),
                );
                return false;
            }
        };

        let new_size = size.saturating_sub(pending.size);
        if new_size == 0 {
            ladder.remove_order(pending.price, order_id);
            let _ = self.index.remove(order_id);
        } else {
            ladder.reduce_order(pending.price, order_id, pending.size);
            let _ = self.index.reduce(order_id, new_size);
        }
        true
    }

    /// Accumulated output rows, in emission order.
    pub fn rows(&self) -> &[MbpRow] {
        &self.output
    }

    /// Consume the engine, yielding the output rows.
    pub fn into_rows(self) -> Vec<MbpRow> {
        self.output
    }

    /// Current statistics.
    pub fn stats(&self) -> &EngineStats {
        &self.stats
    }

    /// Warnings recorded so far.
    pub fn warnings(&self) -> &WarningTracker {
        &self.warnings
    }

    /// Number of live orders.
    pub fn order_count(&self) -> usize {
        self.index.len()
    }

    /// Number of bid price levels.
    pub fn bid_levels(&self) -> usize {
        self.bids.len()
    }

    /// Number of ask price levels.
    pub fn ask_levels(&self) -> usize {
        self.asks.len()
    }

    /// Bid ladder, best price first.
    pub fn bid_ladder(&self) -> &PriceLadder {
        &self.bids
    }

    /// Ask ladder, best price first.
    pub fn ask_ladder(&self) -> &PriceLadder {
        &self.asks
    }

    /// Reset to a clean state for replay or test isolation.
    pub fn reset(&mut self) {
        self.index.clear();
        self.bids.clear();
        self.asks.clear();
        self.sequencer.clear();
        self.output.clear();
        self.stats = EngineStats::default();
        self.warnings.clear();
    }
}
