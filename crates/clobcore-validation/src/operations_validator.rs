//! Stateless validation of a proposed operations queue.
//!
//! Run by every node over the queue a proposer put in its block, before any
//! operation is applied. Only checks that need no chain state live here.

use std::collections::HashMap;

use clobcore_types::{
    ClobError, ClobMatch, Operation, Order, OrderId, OrderRemoval,
    OrderRemovalReason, Result,
};

use crate::{
    address::SubaccountIdValidator,
    match_validator::{validate_deleveraging, validate_liquidation_fills, validate_match_orders_fills},
    message_validator::MessageValidator,
    replacement::{ReplacementPriority, validate_replacement},
};

/// Validate every operation in `ops`, in queue order.
///
/// Short-term placements are tracked by id: placing the identical order
/// twice is a duplicate, and a second placement with the same id must be a
/// valid replacement of the first.
pub fn validate_proposed_operations<S: SubaccountIdValidator>(
    ops: &[Operation],
    validator: &MessageValidator<S>,
    priority: &dyn ReplacementPriority,
) -> Result<()> {
    let mut short_term: HashMap<&OrderId, &Order> = HashMap::new();

    for op in ops {
        match op {
            Operation::OrderPlacement(msg) => {
                validator.validate_place_order_basic(msg)?;
                let order = &msg.order;
                if order.order_id.is_short_term() {
                    if let Some(existing) = short_term.get(&order.order_id) {
                        if existing.order_hash() == order.order_hash() {
                            return Err(ClobError::DuplicateOrder {
                                order_id: order.order_id.clone(),
                            });
                        }
                        validate_replacement(existing, order, priority)?;
                    }
                    short_term.insert(&order.order_id, order);
                }
            }
            Operation::OrderCancellation(msg) => validator.validate_cancel_order_basic(msg)?,
            Operation::Match(m) => validate_clob_match(m, validator)?,
            Operation::PreexistingStatefulOrder(order_id) => {
                validator.validate_subaccount_id(&order_id.subaccount_id)?;
                order_id.must_be_stateful()?;
            }
            Operation::OrderRemoval(removal) => validate_order_removal(removal, validator)?,
        }
    }
    Ok(())
}

fn validate_clob_match<S: SubaccountIdValidator>(
    m: &ClobMatch,
    validator: &MessageValidator<S>,
) -> Result<()> {
    match m {
        ClobMatch::Orders(orders) => {
            validator.validate_subaccount_id(&orders.taker_order_id.subaccount_id)?;
            for fill in &orders.fills {
                validator.validate_subaccount_id(&fill.maker_order_id.subaccount_id)?;
            }
            validate_match_orders_fills(orders)
        }
        ClobMatch::PerpetualLiquidation(liquidation) => {
            validator.validate_subaccount_id(&liquidation.liquidated)?;
            for fill in &liquidation.fills {
                validator.validate_subaccount_id(&fill.maker_order_id.subaccount_id)?;
            }
            validate_liquidation_fills(liquidation)
        }
        ClobMatch::PerpetualDeleveraging(deleveraging) => {
            validator.validate_subaccount_id(&deleveraging.liquidated)?;
            for fill in &deleveraging.fills {
                validator.validate_subaccount_id(&fill.offsetting_subaccount_id)?;
            }
            validate_deleveraging(deleveraging)
        }
    }
}

fn validate_order_removal<S: SubaccountIdValidator>(
    removal: &OrderRemoval,
    validator: &MessageValidator<S>,
) -> Result<()> {
    validator.validate_subaccount_id(&removal.order_id.subaccount_id)?;
    removal.order_id.must_be_stateful()?;
    if removal.removal_reason == OrderRemovalReason::Unspecified {
        return Err(ClobError::InvalidOrderRemoval {
            order_id: removal.order_id.clone(),
            reason: "removal reason must be specified",
        });
    }
    Ok(())
}
