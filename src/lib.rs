//! # MBP Reconstructor
//!
//! Deterministic MBO → MBP(10) order book reconstruction.
//!
//! This library replays a Market-By-Order (MBO) event stream and rebuilds
//! the aggregated Market-By-Price (MBP) view of the book, emitting a
//! top-10-levels-per-side depth snapshot after every book-changing event.
//!
//! ## Features
//!
//! - **MBO → MBP reconstruction**: per-order events folded into price-level
//!   aggregates with price-time (FIFO) priority
//! - **Three-leg execution protocol**: Trade → Fill → Cancel triples are
//!   correlated and applied as a single book mutation at finalization
//! - **Graceful degradation**: duplicate adds and unknown cancels are
//!   logged, tracked, and skipped rather than aborting the replay
//! - **Streaming CSV I/O**: memory-efficient loading with per-line error
//!   recovery
//!
//! ## Quick Start
//!
//! ```rust
//! use mbp_reconstructor::{Action, BookEngine, MboEvent, Side};
//!
//! let mut engine = BookEngine::new();
//!
//! let event = MboEvent {
//!     ts_event: 1_000,
//!     ts_rtt: 1_001,
//!     ts_instrument: 1_002,
//!     side: Side::Bid,
//!     action: Action::Add,
//!     level_hint: 0,
//!     order_id: 7,
//!     price: 100,
//!     size: 10,
//!     channel: 0,
//!     sequence: 1,
//! };
//!
//! let rows = engine.process_event(&event).unwrap();
//! assert_eq!(rows, 1);
//! assert_eq!(engine.rows()[0].price, 100);
//! ```
//!
//! ### Replaying a CSV file
//!
//! ```ignore
//! use mbp_reconstructor::{BookEngine, CsvLoader, write_mbp_csv};
//!
//! let loader = CsvLoader::new("mbo_input.csv")?.skip_invalid(true);
//! let mut engine = BookEngine::new();
//!
//! for event in loader.iter_events()? {
//!     engine.process_event(&event?)?;
//! }
//!
//! write_mbp_csv("mbp_output.csv", engine.rows())?;
//! println!("rows emitted: {}", engine.stats().rows_emitted);
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`types`] | Core types: `MboEvent`, `MbpRow`, `Action`, `Side`, `DEPTH_LEVELS` |
//! | [`book`] | Reconstruction core: `BookEngine`, `PriceLadder`, `ExecutionSequencer` |
//! | [`loader`] | Streaming CSV input: `CsvLoader` |
//! | [`writer`] | CSV snapshot output |
//! | [`warnings`] | Recovered-fault tracking: `WarningTracker` |
//! | [`error`] | Error types: `BookError` |

pub mod book;
pub mod error;
pub mod loader;
pub mod types;
pub mod warnings;
pub mod writer;

pub use book::{
    BookEngine, EngineConfig, EngineStats, ExecutionSequencer, OrderIndex, PendingExecution,
    PendingState, PriceLadder, PriceLevel, SnapshotEmitter,
};
pub use error::{BookError, Result};
pub use loader::{CsvLoader, EventIterator, LoaderStats};
pub use types::{Action, MboEvent, MbpRow, Order, Side, DEPTH_LEVELS};
pub use warnings::{Warning, WarningCategory, WarningSummary, WarningTracker};
pub use writer::write_mbp_csv;
