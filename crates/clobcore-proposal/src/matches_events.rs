//! Cross-block reconciliation of what a committed block did to orders.
//!
//! [`reconcile`] builds the per-block [`ProcessProposerMatchesEvents`] from
//! the finalized operations queue. [`validate`] checks a record read back at
//! the start of the next block before the in-memory book is updated from it.

use std::collections::{BTreeSet, HashSet};

use clobcore_types::{ClobError, ClobMatch, Operation, OrderId, ProcessProposerMatchesEvents, Result};

/// Check events recorded for the block at `current_block_height`.
///
/// The height must match, legacy fields must be empty, and no id list may
/// repeat an id.
pub fn validate(events: &ProcessProposerMatchesEvents, current_block_height: u32) -> Result<()> {
    check(events, current_block_height).inspect_err(|err| {
        tracing::warn!(
            block_height = events.block_height,
            current_block_height,
            error = %err,
            "Proposer matches events rejected"
        );
    })
}

fn check(events: &ProcessProposerMatchesEvents, current_block_height: u32) -> Result<()> {
    if events.block_height != current_block_height {
        return Err(ClobError::BlockHeightMismatch {
            expected: current_block_height,
            actual: events.block_height,
        });
    }

    for (field, ids) in events.deprecated_id_lists() {
        if !ids.is_empty() {
            return Err(ClobError::DeprecatedFieldPopulated { field });
        }
    }

    for (field, ids) in events.unique_id_lists() {
        let mut seen = HashSet::with_capacity(ids.len());
        for id in ids {
            if !seen.insert(id) {
                return Err(ClobError::DuplicateEventOrderId {
                    field,
                    order_id: id.clone(),
                });
            }
        }
    }
    Ok(())
}

/// Summarize a finalized operations queue for the block at `block_height`.
///
/// A stateful placement followed by a cancellation of the same id drops the
/// placement, and the reverse drops the cancellation; the survivor keeps the
/// position of its last occurrence. Filled ids are sorted. Expired and
/// triggered lists are left for the end-of-block passes to fill.
#[must_use]
pub fn reconcile(operations: &[Operation], block_height: u32) -> ProcessProposerMatchesEvents {
    let mut placed: Vec<OrderId> = Vec::new();
    let mut cancelled: Vec<OrderId> = Vec::new();
    let mut filled: BTreeSet<OrderId> = BTreeSet::new();
    let mut removed: Vec<OrderId> = Vec::new();

    for op in operations {
        match op {
            Operation::OrderPlacement(msg) if msg.order.order_id.is_stateful() => {
                let id = &msg.order.order_id;
                cancelled.retain(|c| c != id);
                placed.retain(|p| p != id);
                placed.push(id.clone());
            }
            Operation::OrderCancellation(msg) if msg.order_id.is_stateful() => {
                let id = &msg.order_id;
                placed.retain(|p| p != id);
                cancelled.retain(|c| c != id);
                cancelled.push(id.clone());
            }
            Operation::Match(ClobMatch::Orders(m)) => {
                filled.insert(m.taker_order_id.clone());
                filled.extend(m.fills.iter().map(|f| f.maker_order_id.clone()));
            }
            Operation::Match(ClobMatch::PerpetualLiquidation(m)) => {
                filled.extend(m.fills.iter().map(|f| f.maker_order_id.clone()));
            }
            Operation::OrderRemoval(removal) => {
                if !removed.contains(&removal.order_id) {
                    removed.push(removal.order_id.clone());
                }
            }
            _ => {}
        }
    }

    let events = ProcessProposerMatchesEvents {
        block_height,
        placed_stateful_orders: placed,
        stateful_order_cancellations: cancelled,
        order_ids_filled_in_last_block: filled.into_iter().collect(),
        removed_stateful_order_ids: removed,
        ..ProcessProposerMatchesEvents::default()
    };

    tracing::info!(
        block_height,
        operations = operations.len(),
        placed = events.placed_stateful_orders.len(),
        cancelled = events.stateful_order_cancellations.len(),
        filled = events.order_ids_filled_in_last_block.len(),
        removed = events.removed_stateful_order_ids.len(),
        "Proposer matches events reconciled"
    );
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use clobcore_types::{
        MakerFill, MatchOrders, MatchPerpetualLiquidation, MsgCancelOrder, MsgPlaceOrder,
        OrderRemoval, OrderRemovalReason, Side, fixtures,
    };

    const GTBT: u32 = 1_700_000_600;

    fn long_term(client_id: u32) -> clobcore_types::Order {
        fixtures::long_term_order(fixtures::alice(), client_id, Side::Buy, 10, 100, GTBT)
    }

    fn place(order: clobcore_types::Order) -> Operation {
        Operation::OrderPlacement(MsgPlaceOrder::new(order))
    }

    fn cancel(id: &OrderId) -> Operation {
        Operation::OrderCancellation(MsgCancelOrder::stateful(id.clone(), GTBT))
    }

    #[test]
    fn empty_events_validate() {
        validate(&ProcessProposerMatchesEvents::empty(7), 7).unwrap();
    }

    #[test]
    fn height_mismatch() {
        let err = validate(&ProcessProposerMatchesEvents::empty(6), 7).unwrap_err();
        assert!(matches!(
            err,
            ClobError::BlockHeightMismatch {
                expected: 7,
                actual: 6
            }
        ));
        assert_eq!(err.kind(), clobcore_types::ErrorKind::CrossBlock);
    }

    #[test]
    fn deprecated_fields_must_be_empty() {
        let mut events = ProcessProposerMatchesEvents::empty(7);
        events.placed_conditional_order_ids.push(long_term(0).order_id);
        assert!(matches!(
            validate(&events, 7),
            Err(ClobError::DeprecatedFieldPopulated {
                field: "placed_conditional_order_ids"
            })
        ));
    }

    #[test]
    fn duplicate_ids_rejected() {
        let mut events = ProcessProposerMatchesEvents::empty(7);
        let id = long_term(0).order_id;
        events.removed_stateful_order_ids = vec![id.clone(), id];
        assert!(matches!(
            validate(&events, 7),
            Err(ClobError::DuplicateEventOrderId {
                field: "removed_stateful_order_ids",
                ..
            })
        ));
    }

    #[test]
    fn same_id_in_different_lists_is_fine() {
        let mut events = ProcessProposerMatchesEvents::empty(7);
        let id = long_term(0).order_id;
        events.order_ids_filled_in_last_block.push(id.clone());
        events.removed_stateful_order_ids.push(id);
        validate(&events, 7).unwrap();
    }

    #[test]
    fn cancellation_after_placement_wins() {
        let a = long_term(0);
        let b = long_term(1);
        let ops = vec![place(a.clone()), place(b.clone()), cancel(&a.order_id)];
        let events = reconcile(&ops, 3);
        assert_eq!(events.placed_stateful_orders, vec![b.order_id]);
        assert_eq!(events.stateful_order_cancellations, vec![a.order_id]);
    }

    #[test]
    fn placement_after_cancellation_wins() {
        let a = long_term(0);
        let ops = vec![cancel(&a.order_id), place(a.clone())];
        let events = reconcile(&ops, 3);
        assert_eq!(events.placed_stateful_orders, vec![a.order_id]);
        assert!(events.stateful_order_cancellations.is_empty());
    }

    #[test]
    fn replacement_keeps_last_position() {
        let a = long_term(0);
        let b = long_term(1);
        let mut a2 = a.clone();
        a2.quantums = 20;
        let events = reconcile(&[place(a.clone()), place(b.clone()), place(a2)], 3);
        assert_eq!(events.placed_stateful_orders, vec![b.order_id, a.order_id]);
        validate(&events, 3).unwrap();
    }

    #[test]
    fn short_term_orders_are_not_tracked() {
        let order = fixtures::short_term_order(fixtures::bob(), 0, Side::Sell, 5, 100, 20);
        let ops = vec![
            place(order.clone()),
            Operation::OrderCancellation(MsgCancelOrder::short_term(order.order_id, 20)),
        ];
        let events = reconcile(&ops, 3);
        assert!(events.placed_stateful_orders.is_empty());
        assert!(events.stateful_order_cancellations.is_empty());
    }

    #[test]
    fn filled_ids_sorted_and_unique() {
        let taker = fixtures::short_term_order(fixtures::dave(), 0, Side::Buy, 10, 100, 20);
        let maker_a = fixtures::short_term_id(fixtures::bob(), 1, 0);
        let maker_b = fixtures::short_term_id(fixtures::alice(), 2, 0);
        let fill = |id: &OrderId| MakerFill {
            maker_order_id: id.clone(),
            fill_amount: 1,
        };
        let ops = vec![
            Operation::Match(ClobMatch::Orders(MatchOrders {
                taker_order_id: taker.order_id.clone(),
                taker_order_hash: taker.order_hash(),
                fills: vec![fill(&maker_a), fill(&maker_b)],
            })),
            Operation::Match(ClobMatch::PerpetualLiquidation(MatchPerpetualLiquidation {
                liquidated: fixtures::carl(),
                clob_pair_id: 0,
                perpetual_id: 0,
                total_size: 10,
                side: Side::Buy,
                fills: vec![fill(&maker_a)],
            })),
        ];
        let events = reconcile(&ops, 3);
        let mut expected = vec![taker.order_id, maker_a, maker_b];
        expected.sort();
        assert_eq!(events.order_ids_filled_in_last_block, expected);
        validate(&events, 3).unwrap();
    }

    #[test]
    fn removals_in_queue_order() {
        let a = long_term(0).order_id;
        let b = long_term(1).order_id;
        let removal = |order_id: &OrderId| {
            Operation::OrderRemoval(OrderRemoval {
                order_id: order_id.clone(),
                removal_reason: OrderRemovalReason::Undercollateralized,
            })
        };
        let events = reconcile(&[removal(&b), removal(&a), removal(&b)], 3);
        assert_eq!(events.removed_stateful_order_ids, vec![b, a]);
        assert!(events.expired_stateful_order_ids.is_empty());
        assert!(events.conditional_order_ids_triggered_in_last_block.is_empty());
    }
}
