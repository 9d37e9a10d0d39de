//! Core data types for MBO events and MBP output rows.
//!
//! These types are designed to be:
//! - Memory efficient (use smallest types possible)
//! - Cache-friendly (fixed-size fields, `Copy` everywhere)
//! - Faithful to the wire format (byte-tagged action/side codes)

use serde::{Deserialize, Serialize};

/// Number of depth levels emitted per side in an MBP snapshot.
pub const DEPTH_LEVELS: usize = 10;

/// MBO action type (what happened to the order).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Action {
    /// Add new order to book
    Add = b'A',
    /// Cancel/remove order (or complete an execution sequence)
    Cancel = b'C',
    /// Trade announcement (first leg of an execution sequence)
    Trade = b'T',
    /// Fill attribution (second leg of an execution sequence)
    Fill = b'F',
}

impl Action {
    /// Parse action from a byte.
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            b'A' => Some(Action::Add),
            b'C' => Some(Action::Cancel),
            b'T' => Some(Action::Trade),
            b'F' => Some(Action::Fill),
            _ => None,
        }
    }

    /// Convert to byte representation.
    pub fn to_byte(self) -> u8 {
        self as u8
    }
}

/// Order side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Side {
    /// Buy order (bid)
    Bid = b'B',
    /// Sell order (ask)
    Ask = b'A',
    /// Non-directional (used for some trade types)
    Neutral = b'N',
    /// Reserved marker side; paired with Cancel it flags stream start
    Reserved = b'R',
}

impl Side {
    /// Parse side from a byte.
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            b'B' => Some(Side::Bid),
            b'A' => Some(Side::Ask),
            b'N' => Some(Side::Neutral),
            b'R' => Some(Side::Reserved),
            _ => None,
        }
    }

    /// Convert to byte representation.
    pub fn to_byte(self) -> u8 {
        self as u8
    }

    /// Check if this is a bid.
    #[inline(always)]
    pub fn is_bid(self) -> bool {
        matches!(self, Side::Bid)
    }

    /// Check if this is an ask.
    #[inline(always)]
    pub fn is_ask(self) -> bool {
        matches!(self, Side::Ask)
    }

    /// The opposite book side. Only meaningful for `Bid`/`Ask`.
    #[inline]
    pub fn opposite(self) -> Option<Side> {
        match self {
            Side::Bid => Some(Side::Ask),
            Side::Ask => Some(Side::Bid),
            Side::Neutral | Side::Reserved => None,
        }
    }
}

/// Market By Order (MBO) input event.
///
/// One record per order-level action, consumed once, in strict arrival order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MboEvent {
    /// Event timestamp (nanoseconds since epoch)
    pub ts_event: u64,

    /// Feed round-trip/latency timestamp
    pub ts_rtt: u64,

    /// Instrument timestamp
    pub ts_instrument: u64,

    /// Order side
    pub side: Side,

    /// Order action (add, cancel, trade, fill)
    pub action: Action,

    /// Depth-level hint carried by the feed (informational only)
    pub level_hint: u8,

    /// Unique order identifier
    pub order_id: u64,

    /// Price in integer ticks
    pub price: i64,

    /// Order size in shares/contracts
    pub size: u32,

    /// Feed channel
    pub channel: u8,

    /// Feed sequence number; copied verbatim onto output rows
    pub sequence: u64,
}

impl MboEvent {
    /// Validate the fields that the book engine relies on.
    ///
    /// Only applies to events that mutate the book; marker events
    /// (clear-book, neutral trades) carry zeroed fields by design.
    pub fn validate(&self) -> crate::error::Result<()> {
        use crate::error::BookError;

        if self.price < 0 {
            return Err(BookError::InvalidPrice(self.price));
        }
        if self.action == Action::Add && self.size == 0 {
            return Err(BookError::InvalidSize(0));
        }
        Ok(())
    }

    /// True for the bootstrap "clear book" marker (Cancel on the reserved
    /// side), which must not be routed to any handler.
    #[inline]
    pub fn is_clear_marker(&self) -> bool {
        self.action == Action::Cancel && self.side == Side::Reserved
    }
}

/// Market By Price (MBP) output row: one depth level of one side at one
/// point in time. Append-only; never mutated or reordered after creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MbpRow {
    /// Timestamp of the triggering event
    pub ts_event: u64,

    /// Feed round-trip/latency timestamp of the triggering event
    pub ts_rtt: u64,

    /// Instrument timestamp of the triggering event
    pub ts_instrument: u64,

    /// Book side this row describes (`Bid` or `Ask` only)
    pub side: Side,

    /// Depth rank, 1 = best price
    pub depth: u8,

    /// Level price in integer ticks
    pub price: i64,

    /// Aggregate resting size at this level
    pub size: u32,

    /// Feed channel of the triggering event
    pub channel: u8,

    /// Sequence number, sourced from the triggering event's feed sequence
    pub sequence: u64,
}

/// Order information stored in the index.
///
/// Minimal representation; the ladders reference orders by id only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Order {
    pub side: Side,
    pub price: i64,
    pub size: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_from_byte() {
        assert_eq!(Action::from_byte(b'A'), Some(Action::Add));
        assert_eq!(Action::from_byte(b'C'), Some(Action::Cancel));
        assert_eq!(Action::from_byte(b'T'), Some(Action::Trade));
        assert_eq!(Action::from_byte(b'F'), Some(Action::Fill));
        assert_eq!(Action::from_byte(b'X'), None);
    }

    #[test]
    fn test_action_to_byte() {
        assert_eq!(Action::Add.to_byte(), b'A');
        assert_eq!(Action::Cancel.to_byte(), b'C');
        assert_eq!(Action::Trade.to_byte(), b'T');
        assert_eq!(Action::Fill.to_byte(), b'F');
    }

    #[test]
    fn test_side_from_byte() {
        assert_eq!(Side::from_byte(b'B'), Some(Side::Bid));
        assert_eq!(Side::from_byte(b'A'), Some(Side::Ask));
        assert_eq!(Side::from_byte(b'N'), Some(Side::Neutral));
        assert_eq!(Side::from_byte(b'R'), Some(Side::Reserved));
        assert_eq!(Side::from_byte(b'X'), None);
    }

    #[test]
    fn test_side_checks() {
        assert!(Side::Bid.is_bid());
        assert!(!Side::Ask.is_bid());
        assert!(Side::Ask.is_ask());
        assert!(!Side::Neutral.is_bid());
        assert!(!Side::Neutral.is_ask());
    }

    #[test]
    fn test_side_opposite() {
        assert_eq!(Side::Bid.opposite(), Some(Side::Ask));
        assert_eq!(Side::Ask.opposite(), Some(Side::Bid));
        assert_eq!(Side::Neutral.opposite(), None);
        assert_eq!(Side::Reserved.opposite(), None);
    }

    #[test]
    fn test_clear_marker() {
        let mut ev = MboEvent {
            ts_event: 1,
            ts_rtt: 0,
            ts_instrument: 0,
            side: Side::Reserved,
            action: Action::Cancel,
            level_hint: 0,
            order_id: 0,
            price: 0,
            size: 0,
            channel: 0,
            sequence: 0,
        };
        assert!(ev.is_clear_marker());

        ev.side = Side::Bid;
        assert!(!ev.is_clear_marker());

        ev.side = Side::Reserved;
        ev.action = Action::Add;
        assert!(!ev.is_clear_marker());
    }

    #[test]
    fn test_event_validation() {
        let mut ev = MboEvent {
            ts_event: 1,
            ts_rtt: 1,
            ts_instrument: 1,
            side: Side::Bid,
            action: Action::Add,
            level_hint: 1,
            order_id: 10,
            price: 100,
            size: 5,
            channel: 0,
            sequence: 1,
        };
        assert!(ev.validate().is_ok());

        ev.price = -1;
        assert!(ev.validate().is_err());

        ev.price = 100;
        ev.size = 0;
        assert!(ev.validate().is_err());

        // Zero size is fine for non-Add actions
        ev.action = Action::Cancel;
        assert!(ev.validate().is_ok());
    }
}
