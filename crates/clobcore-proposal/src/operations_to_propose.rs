//! The operations queue of the block under construction.
//!
//! Every operation gets a nonce, its position in the block's execution
//! order. Order placements and re-affirmed stateful orders have their nonce
//! reserved when the order reaches the book ([`assign_nonce_to_order`]), so
//! a placement keeps the position of its arrival even if it only enters the
//! queue later when it matches. Everything else takes the next nonce when it
//! is inserted.
//!
//! Reading the queue yields operations in ascending nonce order. That is the
//! order the settlement engine applies them in.
//!
//! All failures are returned as errors. Those classified
//! [`ErrorKind::QueueInvariant`](clobcore_types::ErrorKind) mean the caller
//! assembling the block has a bug and the block should be abandoned.
//!
//! [`assign_nonce_to_order`]: OperationsToPropose::assign_nonce_to_order

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use clobcore_types::{
    ClobError, ClobMatch, MakerFill, MatchOrders, MatchPerpetualDeleveraging,
    MatchPerpetualLiquidation, MatchableOrder, MsgCancelOrder, MsgPlaceOrder, Operation,
    OperationHash, Order, OrderHash, OrderId, OrderRemoval, OrderRemovalReason, Result,
};
use clobcore_validation::{
    validate_deleveraging, validate_liquidation_fills, validate_match_orders_fills,
};

/// A maker order together with the amount it filled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MakerFillWithOrder {
    pub order: Order,
    pub fill_amount: u64,
}

impl MakerFillWithOrder {
    #[must_use]
    pub fn new(order: Order, fill_amount: u64) -> Self {
        Self { order, fill_amount }
    }
}

/// Operations to propose in the next block.
#[derive(Debug, Default)]
pub struct OperationsToPropose {
    /// Nonce of every operation that holds one, queued or only reserved.
    nonces: HashMap<OperationHash, u64>,
    /// Queued operations by nonce.
    queue: BTreeMap<u64, Operation>,
    /// Hashes of queued operations.
    queued: HashSet<OperationHash>,
    /// Ids with a queued placement or re-affirmation.
    placed_ids: HashSet<OrderId>,
    /// Order behind every placement or re-affirmation nonce.
    reserved_orders: HashMap<OperationHash, (OrderId, OrderHash)>,
    /// Hashes of the orders holding those nonces, by id.
    reserved_by_id: HashMap<OrderId, Vec<OrderHash>>,
    /// Orders that went through the add-to-orderbook collateral check.
    collat_check: BTreeSet<OrderHash>,
    next_nonce: u64,
    sealed: bool,
}

impl OperationsToPropose {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // -----------------------------------------------------------------------
    // Nonce reservation
    // -----------------------------------------------------------------------

    /// Reserve the next nonce for an order arriving on the book.
    ///
    /// `preexisting` marks a stateful order placed in an earlier block,
    /// which enters the queue as a re-affirmation instead of a placement.
    pub fn assign_nonce_to_order(&mut self, order: &Order, preexisting: bool) -> Result<u64> {
        let op = placement_operation(order, preexisting)?;
        let hash = op.hash();
        if let Some(&nonce) = self.nonces.get(&hash) {
            return Err(reject(ClobError::NonceAlreadyAssigned {
                order_id: order.order_id.clone(),
                nonce,
            }));
        }

        let nonce = self.next_nonce;
        self.next_nonce += 1;
        self.nonces.insert(hash, nonce);
        self.reserve(hash, order);

        tracing::debug!(
            nonce,
            order_id = %order.order_id,
            preexisting,
            "Nonce reserved"
        );
        Ok(nonce)
    }

    /// Release the placement nonce of an order that left the book without
    /// entering the queue.
    pub fn remove_order_placement_nonce(&mut self, order: &Order) -> Result<()> {
        self.remove_nonce(order, false)
    }

    /// Release the re-affirmation nonce of a preexisting stateful order.
    pub fn remove_preexisting_stateful_order_nonce(&mut self, order: &Order) -> Result<()> {
        self.remove_nonce(order, true)
    }

    fn remove_nonce(&mut self, order: &Order, preexisting: bool) -> Result<()> {
        let hash = placement_operation(order, preexisting)?.hash();
        let nonce = self.nonce_of(&hash, &order.order_id)?;
        if self.queue.contains_key(&nonce) {
            return Err(reject(ClobError::NonceStillQueued {
                order_id: order.order_id.clone(),
                nonce,
            }));
        }
        self.nonces.remove(&hash);
        self.release_reservation(&hash);
        Ok(())
    }

    /// Nonce reserved for `order`'s placement, if any.
    #[must_use]
    pub fn order_placement_nonce(&self, order: &Order) -> Option<u64> {
        let op = Operation::OrderPlacement(MsgPlaceOrder::new(order.clone()));
        self.nonces.get(&op.hash()).copied()
    }

    /// Whether `operation` holds a nonce, queued or reserved.
    #[must_use]
    pub fn does_operation_have_nonce(&self, operation: &Operation) -> bool {
        self.nonces.contains_key(&operation.hash())
    }

    /// Whether the placement of `order` is queued. The order must hold a
    /// placement nonce.
    pub fn is_order_placement_in_queue(&self, order: &Order) -> Result<bool> {
        self.is_in_queue(order, false)
    }

    /// Whether the re-affirmation of `order` is queued. The order must be
    /// stateful and hold a re-affirmation nonce.
    pub fn is_preexisting_stateful_order_in_queue(&self, order: &Order) -> Result<bool> {
        self.is_in_queue(order, true)
    }

    fn is_in_queue(&self, order: &Order, preexisting: bool) -> Result<bool> {
        let hash = placement_operation(order, preexisting)?.hash();
        let nonce = self.nonce_of(&hash, &order.order_id)?;
        Ok(self.queue.contains_key(&nonce))
    }

    /// For a stateful maker: `true` if it holds a re-affirmation nonce,
    /// `false` if it was placed in this block.
    pub fn is_maker_order_preexisting_stateful_order(&self, order: &Order) -> Result<bool> {
        order.must_be_stateful_order()?;
        if self.order_placement_nonce(order).is_some() {
            return Ok(false);
        }
        let hash = placement_operation(order, true)?.hash();
        self.nonce_of(&hash, &order.order_id).map(|_| true)
    }

    fn nonce_of(&self, hash: &OperationHash, order_id: &OrderId) -> Result<u64> {
        self.nonces.get(hash).copied().ok_or_else(|| {
            reject(ClobError::MissingNonce {
                order_id: order_id.clone(),
            })
        })
    }

    fn reserve(&mut self, hash: OperationHash, order: &Order) {
        let order_hash = order.order_hash();
        self.reserved_orders
            .insert(hash, (order.order_id.clone(), order_hash));
        self.reserved_by_id
            .entry(order.order_id.clone())
            .or_default()
            .push(order_hash);
    }

    fn release_reservation(&mut self, hash: &OperationHash) {
        let Some((order_id, order_hash)) = self.reserved_orders.remove(hash) else {
            return;
        };
        if let Some(hashes) = self.reserved_by_id.get_mut(&order_id) {
            if let Some(pos) = hashes.iter().position(|h| *h == order_hash) {
                hashes.swap_remove(pos);
            }
            if hashes.is_empty() {
                self.reserved_by_id.remove(&order_id);
            }
        }
    }

    // -----------------------------------------------------------------------
    // Insertion
    // -----------------------------------------------------------------------

    /// Queue a placement. Its nonce must have been reserved.
    pub fn add_order_placement(&mut self, order: &Order) -> Result<u64> {
        self.insert(Operation::OrderPlacement(MsgPlaceOrder::new(order.clone())))
    }

    /// Queue the re-affirmation of a stateful order from an earlier block.
    /// Its nonce must have been reserved.
    pub fn add_preexisting_stateful_order(&mut self, order: &Order) -> Result<u64> {
        order.must_be_stateful_order()?;
        self.insert(Operation::PreexistingStatefulOrder(order.order_id.clone()))
    }

    pub fn add_order_cancellation(&mut self, cancel: MsgCancelOrder) -> Result<u64> {
        self.insert(Operation::OrderCancellation(cancel))
    }

    /// Queue the match of `taker` against resting makers.
    ///
    /// A regular taker becomes a `MatchOrders`; a liquidation taker becomes a
    /// `MatchPerpetualLiquidation` sized by its quantums. The regular taker
    /// and every maker must be the exact orders that hold a placement or
    /// re-affirmation nonce.
    pub fn add_match(
        &mut self,
        taker: &MatchableOrder,
        maker_fills: &[MakerFillWithOrder],
    ) -> Result<u64> {
        if self.sealed {
            return Err(reject(ClobError::QueueSealed));
        }
        if let MatchableOrder::Order(order) = taker {
            self.require_order_nonce(&order.order_id, &order.order_hash())
                .map_err(reject)?;
        }
        for maker in maker_fills {
            self.require_order_nonce(&maker.order.order_id, &maker.order.order_hash())
                .map_err(reject)?;
        }

        let fills: Vec<MakerFill> = maker_fills
            .iter()
            .map(|m| MakerFill {
                maker_order_id: m.order.order_id.clone(),
                fill_amount: m.fill_amount,
            })
            .collect();

        let clob_match = match taker {
            MatchableOrder::Order(order) => ClobMatch::Orders(MatchOrders {
                taker_order_id: order.order_id.clone(),
                taker_order_hash: order.order_hash(),
                fills,
            }),
            MatchableOrder::Liquidation(liquidation) => {
                ClobMatch::PerpetualLiquidation(MatchPerpetualLiquidation {
                    liquidated: liquidation.liquidated_subaccount_id.clone(),
                    clob_pair_id: liquidation.clob_pair_id,
                    perpetual_id: liquidation.perpetual_id,
                    total_size: liquidation.quantums,
                    side: liquidation.side,
                    fills,
                })
            }
        };
        self.insert(Operation::Match(clob_match))
    }

    pub fn add_deleveraging(&mut self, deleveraging: MatchPerpetualDeleveraging) -> Result<u64> {
        self.insert(Operation::Match(ClobMatch::PerpetualDeleveraging(
            deleveraging,
        )))
    }

    pub fn add_order_removal(
        &mut self,
        order_id: OrderId,
        removal_reason: OrderRemovalReason,
    ) -> Result<u64> {
        self.insert(Operation::OrderRemoval(OrderRemoval {
            order_id,
            removal_reason,
        }))
    }

    /// Queue `op` and return its nonce.
    ///
    /// Placements and re-affirmations use their reserved nonce; every other
    /// operation takes the next one. Nothing is consumed on failure.
    pub fn insert(&mut self, op: Operation) -> Result<u64> {
        if self.sealed {
            return Err(reject(ClobError::QueueSealed));
        }

        let hash = op.hash();
        if self.queued.contains(&hash) {
            return Err(reject(ClobError::DuplicateOperation { hash }));
        }

        self.check_references(&op)?;

        let reserved = match &op {
            Operation::OrderPlacement(msg) => Some(self.nonce_of(&hash, &msg.order.order_id)?),
            Operation::PreexistingStatefulOrder(order_id) => Some(self.nonce_of(&hash, order_id)?),
            _ => {
                if self.nonces.contains_key(&hash) {
                    return Err(reject(ClobError::DuplicateOperation { hash }));
                }
                None
            }
        };
        let nonce = reserved.unwrap_or(self.next_nonce);
        if self.queue.contains_key(&nonce) {
            return Err(reject(ClobError::NonceCollision { nonce }));
        }

        if reserved.is_none() {
            self.nonces.insert(hash, nonce);
            self.next_nonce += 1;
        }
        match &op {
            Operation::OrderPlacement(msg) => {
                self.placed_ids.insert(msg.order.order_id.clone());
            }
            Operation::PreexistingStatefulOrder(order_id) => {
                self.placed_ids.insert(order_id.clone());
            }
            _ => {}
        }
        self.queued.insert(hash);

        tracing::debug!(
            nonce,
            kind = op.kind_name(),
            hash = %hash.short(),
            "Operation queued"
        );
        self.queue.insert(nonce, op);
        Ok(nonce)
    }

    fn check_references(&self, op: &Operation) -> Result<()> {
        let result = match op {
            Operation::OrderPlacement(_) => Ok(()),
            Operation::PreexistingStatefulOrder(order_id) => order_id.must_be_stateful(),
            Operation::OrderCancellation(msg) => {
                if self.placed_ids.contains(&msg.order_id) {
                    Ok(())
                } else {
                    Err(ClobError::OrderPlacementNotInQueue {
                        order_id: msg.order_id.clone(),
                    })
                }
            }
            Operation::Match(ClobMatch::Orders(m)) => validate_match_orders_fills(m)
                .and_then(|()| self.require_order_nonce(&m.taker_order_id, &m.taker_order_hash))
                .and_then(|()| self.require_maker_nonces(&m.fills)),
            Operation::Match(ClobMatch::PerpetualLiquidation(m)) => {
                validate_liquidation_fills(m).and_then(|()| self.require_maker_nonces(&m.fills))
            }
            Operation::Match(ClobMatch::PerpetualDeleveraging(m)) => validate_deleveraging(m),
            Operation::OrderRemoval(removal) => {
                removal.order_id.must_be_stateful().and_then(|()| {
                    if removal.removal_reason == OrderRemovalReason::Unspecified {
                        Err(ClobError::InvalidOrderRemoval {
                            order_id: removal.order_id.clone(),
                            reason: "removal reason unspecified",
                        })
                    } else {
                        Ok(())
                    }
                })
            }
        };
        result.map_err(reject)
    }

    /// The order with this id and content holds a placement or
    /// re-affirmation nonce.
    fn require_order_nonce(&self, order_id: &OrderId, order_hash: &OrderHash) -> Result<()> {
        let held = self
            .reserved_by_id
            .get(order_id)
            .is_some_and(|hashes| hashes.contains(order_hash));
        if held {
            Ok(())
        } else {
            Err(ClobError::MissingNonce {
                order_id: order_id.clone(),
            })
        }
    }

    /// Fill records carry only maker ids, so some order with each id must
    /// hold a nonce.
    fn require_maker_nonces(&self, fills: &[MakerFill]) -> Result<()> {
        fills.iter().try_for_each(|fill| {
            if self.reserved_by_id.contains_key(&fill.maker_order_id) {
                Ok(())
            } else {
                Err(ClobError::MissingNonce {
                    order_id: fill.maker_order_id.clone(),
                })
            }
        })
    }

    // -----------------------------------------------------------------------
    // Collateral check set
    // -----------------------------------------------------------------------

    /// Record that `order` went through the add-to-orderbook collateral
    /// check this block.
    pub fn add_to_orderbook_collat_check_orders(&mut self, order: &Order) -> Result<()> {
        if !self.collat_check.insert(order.order_hash()) {
            return Err(reject(ClobError::DuplicateCollatCheckOrder {
                order_id: order.order_id.clone(),
            }));
        }
        Ok(())
    }

    /// Order hashes that went through the collateral check, ascending by
    /// hash bytes.
    #[must_use]
    pub fn orders_with_add_to_orderbook_collat_check(&self) -> Vec<OrderHash> {
        self.collat_check.iter().copied().collect()
    }

    // -----------------------------------------------------------------------
    // Reading and lifecycle
    // -----------------------------------------------------------------------

    /// Queued operations in ascending nonce order.
    #[must_use]
    pub fn operations_queue(&self) -> Vec<Operation> {
        self.queue.values().cloned().collect()
    }

    /// Queued operations with their nonces, ascending.
    pub fn iter(&self) -> impl Iterator<Item = (u64, &Operation)> {
        self.queue.iter().map(|(nonce, op)| (*nonce, op))
    }

    /// Freeze the queue. Nothing can be inserted until it is cleared.
    pub fn seal(&mut self) -> Result<()> {
        if self.sealed {
            return Err(reject(ClobError::QueueSealed));
        }
        self.sealed = true;
        tracing::debug!(operations = self.queue.len(), "Operations queue sealed");
        Ok(())
    }

    /// Take the final queue in ascending nonce order. The queue must be
    /// sealed and stays sealed.
    pub fn drain(&mut self) -> Result<Vec<Operation>> {
        if !self.sealed {
            return Err(reject(ClobError::QueueNotSealed));
        }
        let queue = std::mem::take(&mut self.queue);
        self.release_queued(&queue);
        Ok(queue.into_values().collect())
    }

    /// Drop every queued operation and its nonce, empty the collateral check
    /// set, and unseal.
    ///
    /// Nonces reserved for orders that never entered the queue survive:
    /// those orders still rest on the book and may match in a later block.
    pub fn clear_operations_queue(&mut self) -> Result<()> {
        for (&nonce, op) in &self.queue {
            let assigned = self.nonces.get(&op.hash()).copied();
            if assigned != Some(nonce) {
                return Err(reject(ClobError::Internal(format!(
                    "queued operation {op} at nonce {nonce} has assigned nonce {assigned:?}"
                ))));
            }
        }
        let queue = std::mem::take(&mut self.queue);
        self.release_queued(&queue);
        self.collat_check.clear();
        self.sealed = false;
        Ok(())
    }

    fn release_queued(&mut self, queue: &BTreeMap<u64, Operation>) {
        for op in queue.values() {
            let hash = op.hash();
            self.nonces.remove(&hash);
            self.queued.remove(&hash);
            match op {
                Operation::OrderPlacement(msg) => {
                    self.placed_ids.remove(&msg.order.order_id);
                    self.release_reservation(&hash);
                }
                Operation::PreexistingStatefulOrder(order_id) => {
                    self.placed_ids.remove(order_id);
                    self.release_reservation(&hash);
                }
                _ => {}
            }
        }
    }

    #[must_use]
    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// The nonce the next reservation or insertion will take.
    #[must_use]
    pub fn next_nonce(&self) -> u64 {
        self.next_nonce
    }
}

fn placement_operation(order: &Order, preexisting: bool) -> Result<Operation> {
    if preexisting {
        order.must_be_stateful_order()?;
        Ok(Operation::PreexistingStatefulOrder(order.order_id.clone()))
    } else {
        Ok(Operation::OrderPlacement(MsgPlaceOrder::new(order.clone())))
    }
}

fn reject(err: ClobError) -> ClobError {
    tracing::warn!(
        error = %err,
        unrecoverable = err.is_unrecoverable(),
        "Operations queue rejected request"
    );
    err
}
