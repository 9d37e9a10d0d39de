//! Authoritative order-id index.
//!
//! Maps each live order identifier to its current (side, price, remaining
//! size). Orders are owned here exclusively; the price ladders reference them
//! by identifier only. All operations are O(1) amortized (ahash-based).

use ahash::AHashMap;

use crate::error::{BookError, Result};
use crate::types::Order;

/// Map from order identifier to its current state.
#[derive(Debug, Clone, Default)]
pub struct OrderIndex {
    orders: AHashMap<u64, Order>,
}

impl OrderIndex {
    /// Create a new empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new order.
    ///
    /// Fails with `DuplicateOrder` if the identifier already exists; callers
    /// must treat that as a data-integrity fault, not a normal outcome.
    pub fn insert(&mut self, order_id: u64, order: Order) -> Result<()> {
        if self.orders.contains_key(&order_id) {
            return Err(BookError::DuplicateOrder(order_id));
        }
        self.orders.insert(order_id, order);
        Ok(())
    }

    /// Look up an order by identifier.
    #[inline]
    pub fn get(&self, order_id: u64) -> Result<Order> {
        self.orders
            .get(&order_id)
            .copied()
            .ok_or(BookError::OrderNotFound(order_id))
    }

    /// Remove an order, returning it.
    pub fn remove(&mut self, order_id: u64) -> Result<Order> {
        self.orders
            .remove(&order_id)
            .ok_or(BookError::OrderNotFound(order_id))
    }

    /// Set an order's remaining size. A new size of zero removes the order.
    pub fn reduce(&mut self, order_id: u64, new_size: u32) -> Result<()> {
        if new_size == 0 {
            self.remove(order_id)?;
            return Ok(());
        }
        let order = self
            .orders
            .get_mut(&order_id)
            .ok_or(BookError::OrderNotFound(order_id))?;
        order.size = new_size;
        Ok(())
    }

    /// Check if an order exists.
    #[inline]
    pub fn contains(&self, order_id: u64) -> bool {
        self.orders.contains_key(&order_id)
    }

    /// Number of live orders.
    #[inline]
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    /// True when no orders are live.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Clear all orders.
    pub fn clear(&mut self) {
        self.orders.clear();
    }
}
