//! Order book reconstruction core.
//!
//! - [`order_index`]: authoritative per-order state, keyed by order id
//! - [`ladder`]: price-sorted aggregate levels with FIFO constituent queues
//! - [`sequencer`]: Trade/Fill/Cancel execution correlation
//! - [`engine`]: event dispatch, state ownership, snapshot triggering
//! - [`snapshot`]: top-N depth extraction into output rows

pub mod engine;
pub mod ladder;
pub mod order_index;
pub mod sequencer;
pub mod snapshot;

pub use engine::{BookEngine, EngineConfig, EngineStats};
pub use ladder::{PriceLadder, PriceLevel};
pub use order_index::OrderIndex;
pub use sequencer::{ExecutionSequencer, PendingExecution, PendingState};
pub use snapshot::SnapshotEmitter;
