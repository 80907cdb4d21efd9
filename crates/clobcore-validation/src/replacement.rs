//! Replacement priority between two orders with the same id.
//!
//! A new order may replace a resting one with the same [`OrderId`] only if
//! it has strictly higher priority and keeps the fields a replacement is not
//! allowed to change. What "higher priority" means is owned by the order book,
//! so it is a trait; [`GoodTilThenHash`] is the book's default rule.
//!
//! [`OrderId`]: clobcore_types::OrderId

use std::cmp::Ordering;

use clobcore_types::{ClobError, Order, Result};

/// Orders two orders with the same id by replacement priority.
pub trait ReplacementPriority: Send + Sync {
    /// `Ordering::Less` means `replacement` outranks `existing`.
    fn compare(&self, existing: &Order, replacement: &Order) -> Ordering;
}

/// Later expiration wins; equal expirations fall back to order hash bytes so
/// the result is total and identical on every node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GoodTilThenHash;

impl ReplacementPriority for GoodTilThenHash {
    fn compare(&self, existing: &Order, replacement: &Order) -> Ordering {
        existing
            .good_til_value()
            .cmp(&replacement.good_til_value())
            .then_with(|| existing.order_hash().cmp(&replacement.order_hash()))
    }
}

/// Check that `replacement` may replace `existing`.
///
/// Only size, price, and a later expiration may change.
pub fn validate_replacement(
    existing: &Order,
    replacement: &Order,
    priority: &dyn ReplacementPriority,
) -> Result<()> {
    let invalid = |reason: &'static str| ClobError::InvalidReplacement {
        order_id: replacement.order_id.clone(),
        reason,
    };
    if existing.order_id != replacement.order_id {
        return Err(invalid("order ids differ"));
    }
    if priority.compare(existing, replacement) != Ordering::Less {
        return Err(invalid("replacement order is not higher priority"));
    }
    if existing.side != replacement.side {
        return Err(invalid("cannot change side"));
    }
    if existing.time_in_force != replacement.time_in_force {
        return Err(invalid("cannot change time in force"));
    }
    if existing.reduce_only != replacement.reduce_only {
        return Err(invalid("cannot change reduce-only"));
    }
    Ok(())
}
