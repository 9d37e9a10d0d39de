//! Price-sorted aggregate ladders with FIFO price levels.
//!
//! One `PriceLadder` per book side: a `BTreeMap` keeps prices sorted, and
//! enumeration runs descending for bids / ascending for asks. Each level
//! holds its constituent orders in arrival order (`IndexMap`), so partial
//! executions absorb the oldest constituent first: true price-time
//! priority, not numeric-identifier order.
//!
//! # Invariant
//!
//! A level's cached `total_size` always equals the sum of its constituent
//! order sizes, and a level with no constituents never remains in the
//! ladder. Both are enforced by the encapsulated mutation methods and
//! checked in debug builds via `verify_invariant()`.

use std::collections::BTreeMap;

use indexmap::IndexMap;

use crate::types::Side;

/// A price level: constituent orders in arrival order plus a cached
/// aggregate size for O(1) queries.
#[derive(Debug, Clone, Default)]
pub struct PriceLevel {
    /// Orders in FIFO (arrival) order: order_id → size
    orders: IndexMap<u64, u32>,
    /// Cached total size (invariant: == orders.values().sum())
    total_size: u32,
}

impl PriceLevel {
    fn new() -> Self {
        Self::default()
    }

    /// Add an order to the back of the queue.
    fn add_order(&mut self, order_id: u64, size: u32) {
        // Re-adding an id re-queues it at the back
        if let Some(old) = self.orders.shift_remove(&order_id) {
            self.total_size = self.total_size.saturating_sub(old);
        }
        self.orders.insert(order_id, size);
        self.total_size = self.total_size.saturating_add(size);

        #[cfg(debug_assertions)]
        self.verify_invariant();
    }

    /// Remove an order from the queue, preserving the order of the rest.
    fn remove_order(&mut self, order_id: u64) -> Option<u32> {
        let size = self.orders.shift_remove(&order_id)?;
        self.total_size = self.total_size.saturating_sub(size);

        #[cfg(debug_assertions)]
        self.verify_invariant();

        Some(size)
    }

    /// Reduce an order's size by `delta`, returning the new size.
    fn reduce_order(&mut self, order_id: u64, delta: u32) -> Option<u32> {
        let size = self.orders.get_mut(&order_id)?;
        let actual = delta.min(*size);
        *size -= actual;
        let new_size = *size;
        self.total_size = self.total_size.saturating_sub(actual);

        #[cfg(debug_assertions)]
        self.verify_invariant();

        Some(new_size)
    }

    /// The oldest constituent (front of the arrival queue).
    #[inline]
    pub fn front_order(&self) -> Option<(u64, u32)> {
        self.orders.first().map(|(&id, &size)| (id, size))
    }

    /// Cached aggregate size (O(1)).
    #[inline]
    pub fn total_size(&self) -> u32 {
        self.total_size
    }

    /// Number of constituent orders.
    #[inline]
    pub fn order_count(&self) -> usize {
        self.orders.len()
    }

    /// Check if the level has no orders.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Iterate constituents in arrival order.
    pub fn iter(&self) -> impl Iterator<Item = (&u64, &u32)> {
        self.orders.iter()
    }

    /// Verify the aggregate-size invariant.
    #[cfg(debug_assertions)]
    pub fn verify_invariant(&self) {
        let actual: u32 = self.orders.values().fold(0u32, |acc, &v| acc.saturating_add(v));
        debug_assert_eq!(
            actual, self.total_size,
            "PriceLevel invariant violated: actual={}, cached={}",
            actual, self.total_size
        );
    }

    #[cfg(not(debug_assertions))]
    pub fn verify_invariant(&self) {}
}

/// Price-sorted mapping price → level for one book side.
///
/// The `BTreeMap` stores prices ascending; bid enumeration reverses it so
/// that `top_levels` always yields best-first.
#[derive(Debug, Clone)]
pub struct PriceLadder {
    side: Side,
    levels: BTreeMap<i64, PriceLevel>,
}

impl PriceLadder {
    /// Create an empty ladder for one side. `side` must be `Bid` or `Ask`.
    pub fn new(side: Side) -> Self {
        debug_assert!(side.is_bid() || side.is_ask());
        Self {
            side,
            levels: BTreeMap::new(),
        }
    }

    /// The side this ladder aggregates.
    #[inline]
    pub fn side(&self) -> Side {
        self.side
    }

    /// Add an order, creating the level at its sorted position if absent.
    /// O(log L) in the number of distinct price levels.
    pub fn add_order(&mut self, price: i64, order_id: u64, size: u32) {
        self.levels
            .entry(price)
            .or_insert_with(PriceLevel::new)
            .add_order(order_id, size);
    }

    /// Remove an order from its level; deletes the level when it empties.
    /// Returns the removed size, or `None` if the price/order is unknown.
    pub fn remove_order(&mut self, price: i64, order_id: u64) -> Option<u32> {
        let level = self.levels.get_mut(&price)?;
        let size = level.remove_order(order_id)?;
        if level.is_empty() {
            self.levels.remove(&price);
        }
        Some(size)
    }

    /// Reduce an order's size in place without touching queue membership.
    /// Returns the new size, or `None` if the price/order is unknown.
    pub fn reduce_order(&mut self, price: i64, order_id: u64, delta: u32) -> Option<u32> {
        let level = self.levels.get_mut(&price)?;
        level.reduce_order(order_id, delta)
    }

    /// The level resting at `price`, if any.
    #[inline]
    pub fn level_at(&self, price: i64) -> Option<&PriceLevel> {
        self.levels.get(&price)
    }

    /// Up to `n` levels in ladder order (best price first). Finite and
    /// restartable; yields fewer than `n` if the ladder is shallower.
    pub fn top_levels(&self, n: usize) -> impl Iterator<Item = (i64, &PriceLevel)> + '_ {
        let iter: Box<dyn Iterator<Item = (&i64, &PriceLevel)>> = match self.side {
            Side::Bid => Box::new(self.levels.iter().rev()),
            _ => Box::new(self.levels.iter()),
        };
        iter.take(n).map(|(&price, level)| (price, level))
    }

    /// Best price on this side (highest bid / lowest ask).
    pub fn best_price(&self) -> Option<i64> {
        match self.side {
            Side::Bid => self.levels.keys().next_back().copied(),
            _ => self.levels.keys().next().copied(),
        }
    }

    /// Number of distinct price levels.
    #[inline]
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// True when the ladder holds no levels.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Remove all levels.
    pub fn clear(&mut self) {
        self.levels.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_creates_level() {
        let mut ladder = PriceLadder::new(Side::Bid);
        ladder.add_order(100, 1, 10);

        assert_eq!(ladder.len(), 1);
        let level = ladder.level_at(100).unwrap();
        assert_eq!(level.total_size(), 10);
        assert_eq!(level.order_count(), 1);
    }

    #[test]
    fn test_aggregate_size_across_orders() {
        let mut ladder = PriceLadder::new(Side::Bid);
        ladder.add_order(100, 1, 10);
        ladder.add_order(100, 2, 5);

        assert_eq!(ladder.len(), 1);
        assert_eq!(ladder.level_at(100).unwrap().total_size(), 15);
    }

    #[test]
    fn test_empty_level_eagerly_removed() {
        let mut ladder = PriceLadder::new(Side::Ask);
        ladder.add_order(100, 1, 10);

        assert_eq!(ladder.remove_order(100, 1), Some(10));
        assert!(ladder.is_empty());
        assert!(ladder.level_at(100).is_none());
    }

    #[test]
    fn test_remove_unknown() {
        let mut ladder = PriceLadder::new(Side::Ask);
        ladder.add_order(100, 1, 10);

        assert_eq!(ladder.remove_order(100, 99), None);
        assert_eq!(ladder.remove_order(200, 1), None);
        assert_eq!(ladder.level_at(100).unwrap().total_size(), 10);
    }

    #[test]
    fn test_reduce_adjusts_aggregate_only() {
        let mut ladder = PriceLadder::new(Side::Ask);
        ladder.add_order(100, 1, 10);
        ladder.add_order(100, 2, 5);

        assert_eq!(ladder.reduce_order(100, 1, 4), Some(6));
        let level = ladder.level_at(100).unwrap();
        assert_eq!(level.total_size(), 11);
        assert_eq!(level.order_count(), 2);
    }

    #[test]
    fn test_bid_ordering_descending() {
        let mut ladder = PriceLadder::new(Side::Bid);
        for (i, price) in [101, 99, 100, 103, 102].iter().enumerate() {
            ladder.add_order(*price, i as u64 + 1, 1);
        }

        let prices: Vec<i64> = ladder.top_levels(10).map(|(p, _)| p).collect();
        assert_eq!(prices, vec![103, 102, 101, 100, 99]);
        assert_eq!(ladder.best_price(), Some(103));
    }

    #[test]
    fn test_ask_ordering_ascending() {
        let mut ladder = PriceLadder::new(Side::Ask);
        for (i, price) in [101, 99, 100, 103, 102].iter().enumerate() {
            ladder.add_order(*price, i as u64 + 1, 1);
        }

        let prices: Vec<i64> = ladder.top_levels(10).map(|(p, _)| p).collect();
        assert_eq!(prices, vec![99, 100, 101, 102, 103]);
        assert_eq!(ladder.best_price(), Some(99));
    }

    #[test]
    fn test_top_levels_truncates() {
        let mut ladder = PriceLadder::new(Side::Bid);
        for price in 1..=15 {
            ladder.add_order(price, price as u64, 1);
        }

        let top: Vec<i64> = ladder.top_levels(10).map(|(p, _)| p).collect();
        assert_eq!(top.len(), 10);
        assert_eq!(top[0], 15);
        assert_eq!(top[9], 6);
    }

    #[test]
    fn test_top_levels_restartable() {
        let mut ladder = PriceLadder::new(Side::Ask);
        ladder.add_order(100, 1, 1);
        ladder.add_order(101, 2, 2);

        let first: Vec<_> = ladder.top_levels(10).map(|(p, _)| p).collect();
        let second: Vec<_> = ladder.top_levels(10).map(|(p, _)| p).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_fifo_front_order() {
        let mut ladder = PriceLadder::new(Side::Ask);
        // id 5 arrives before id 2: arrival order, not id order
        ladder.add_order(100, 5, 10);
        ladder.add_order(100, 2, 20);

        let level = ladder.level_at(100).unwrap();
        assert_eq!(level.front_order(), Some((5, 10)));

        // Removing the front promotes the next arrival
        let mut ladder2 = ladder.clone();
        ladder2.remove_order(100, 5);
        assert_eq!(
            ladder2.level_at(100).unwrap().front_order(),
            Some((2, 20))
        );
    }

    #[test]
    fn test_level_invariant_after_mutations() {
        let mut ladder = PriceLadder::new(Side::Bid);
        ladder.add_order(100, 1, 10);
        ladder.add_order(100, 2, 20);
        ladder.add_order(100, 3, 30);
        ladder.reduce_order(100, 2, 5);
        ladder.remove_order(100, 1);

        let level = ladder.level_at(100).unwrap();
        level.verify_invariant();
        assert_eq!(level.total_size(), 45);
        assert_eq!(level.front_order(), Some((2, 15)));
    }
}
