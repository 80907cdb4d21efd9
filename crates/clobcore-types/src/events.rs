//! Per-block summary handed from one block to the next.

use serde::{Deserialize, Serialize};

use crate::{OrderId, Result, canonical_bytes};

/// What happened to orders in a committed block.
///
/// Built once per block from the finalized operations queue plus the
/// end-of-block expiry and trigger passes, then consumed at the start of the
/// next block to bring the in-memory book in line with chain state. Never
/// mutated after it is built.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessProposerMatchesEvents {
    pub block_height: u32,
    /// Stateful orders placed in the block and still live at its end.
    pub placed_stateful_orders: Vec<OrderId>,
    /// Stateful cancellations not superseded by a later re-placement.
    pub stateful_order_cancellations: Vec<OrderId>,
    pub expired_stateful_order_ids: Vec<OrderId>,
    pub order_ids_filled_in_last_block: Vec<OrderId>,
    pub removed_stateful_order_ids: Vec<OrderId>,
    pub conditional_order_ids_triggered_in_last_block: Vec<OrderId>,

    // Legacy fields. Must stay empty.
    pub placed_long_term_order_ids: Vec<OrderId>,
    pub placed_stateful_cancellation_order_ids: Vec<OrderId>,
    pub placed_conditional_order_ids: Vec<OrderId>,
}

impl ProcessProposerMatchesEvents {
    #[must_use]
    pub fn empty(block_height: u32) -> Self {
        Self {
            block_height,
            ..Self::default()
        }
    }

    /// Bytes handed to the storage layer at block commit.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        canonical_bytes(self)
    }

    /// Read back a record stored by [`encode`](Self::encode).
    ///
    /// # Errors
    /// [`ClobError::Serialization`](crate::ClobError::Serialization) if the
    /// bytes are not a record.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Id lists that must be duplicate-free, with their field names.
    #[must_use]
    pub fn unique_id_lists(&self) -> [(&'static str, &[OrderId]); 6] {
        [
            ("placed_stateful_orders", &self.placed_stateful_orders),
            (
                "stateful_order_cancellations",
                &self.stateful_order_cancellations,
            ),
            ("expired_stateful_order_ids", &self.expired_stateful_order_ids),
            (
                "order_ids_filled_in_last_block",
                &self.order_ids_filled_in_last_block,
            ),
            ("removed_stateful_order_ids", &self.removed_stateful_order_ids),
            (
                "conditional_order_ids_triggered_in_last_block",
                &self.conditional_order_ids_triggered_in_last_block,
            ),
        ]
    }

    /// Legacy id lists, with their field names.
    #[must_use]
    pub fn deprecated_id_lists(&self) -> [(&'static str, &[OrderId]); 3] {
        [
            ("placed_long_term_order_ids", &self.placed_long_term_order_ids),
            (
                "placed_stateful_cancellation_order_ids",
                &self.placed_stateful_cancellation_order_ids,
            ),
            (
                "placed_conditional_order_ids",
                &self.placed_conditional_order_ids,
            ),
        ]
    }
}
