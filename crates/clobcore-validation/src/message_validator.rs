//! Stateless validation of place, cancel, and batch-cancel messages.
//!
//! Rules run in a fixed order and the first failure is returned, so two
//! nodes given the same message always report the same error.
//!
//! ## Place order
//!
//! 1. Subaccount id well formed, then order flags recognized
//! 2. Side is BUY or SELL
//! 3. Quantums and subticks non-zero
//! 4. Expiration matches the order kind and sits inside its window
//! 5. Time-in-force is not FILL_OR_KILL
//! 6. Long-term orders are not IOC
//! 7. Reduce-only only on short-term orders
//! 8. Conditional fields present exactly on conditional orders
//! 9. TWAP schedule present exactly on TWAP orders, within bounds
//! 10. Builder code address and fee
//! 11. Order router address
//!
//! The `_basic` variants skip the block-relative part of rule 4 and only
//! require the expiration to be set and non-zero. They are used where no
//! block context is available, such as checking a proposed operations queue.

use std::collections::HashSet;

use chrono::TimeDelta;
use clobcore_types::{
    BlockContext, ClobError, ConditionType, GoodTilOneof, MsgBatchCancel, MsgCancelOrder,
    MsgPlaceOrder, Order, OrderId, OrderKind, OrderValidationParams, Result, Side, SubaccountId,
    TimeInForce,
};

use crate::address::{Bech32SubaccountValidator, SubaccountIdValidator, validate_address};

/// How much of the expiration rule to apply.
#[derive(Debug, Clone, Copy)]
enum ExpirationCheck<'a> {
    /// Set and non-zero only.
    Basic,
    /// Set, non-zero, not expired, and inside the window.
    Block(&'a BlockContext),
}

/// Validates user messages against [`OrderValidationParams`].
#[derive(Debug, Clone)]
pub struct MessageValidator<S = Bech32SubaccountValidator> {
    params: OrderValidationParams,
    subaccounts: S,
}

impl MessageValidator<Bech32SubaccountValidator> {
    /// Validator with bech32 subaccount checks derived from `params`.
    #[must_use]
    pub fn new(params: OrderValidationParams) -> Self {
        let subaccounts = Bech32SubaccountValidator::from_params(&params);
        Self {
            params,
            subaccounts,
        }
    }
}

impl Default for MessageValidator<Bech32SubaccountValidator> {
    fn default() -> Self {
        Self::new(OrderValidationParams::default())
    }
}

impl<S: SubaccountIdValidator> MessageValidator<S> {
    /// Validator with a caller-supplied subaccount id check.
    pub fn with_subaccount_validator(params: OrderValidationParams, subaccounts: S) -> Self {
        Self {
            params,
            subaccounts,
        }
    }

    #[must_use]
    pub fn params(&self) -> &OrderValidationParams {
        &self.params
    }

    pub fn validate_subaccount_id(&self, subaccount_id: &SubaccountId) -> Result<()> {
        self.subaccounts.validate(subaccount_id)
    }

    /// Subaccount check followed by flag classification.
    pub fn validate_order_id(&self, order_id: &OrderId) -> Result<OrderKind> {
        self.validate_subaccount_id(&order_id.subaccount_id)?;
        order_id.kind()
    }

    // -----------------------------------------------------------------------
    // Place order
    // -----------------------------------------------------------------------

    pub fn validate_place_order(&self, msg: &MsgPlaceOrder, block: &BlockContext) -> Result<()> {
        self.validate_order(&msg.order, ExpirationCheck::Block(block))
    }

    pub fn validate_place_order_basic(&self, msg: &MsgPlaceOrder) -> Result<()> {
        self.validate_order(&msg.order, ExpirationCheck::Basic)
    }

    fn validate_order(&self, order: &Order, check: ExpirationCheck<'_>) -> Result<()> {
        let order_id = &order.order_id;

        // 1.
        let kind = self.validate_order_id(order_id)?;

        // 2.
        if order.side == Side::Unspecified {
            return Err(ClobError::InvalidOrderSide {
                order_id: order_id.clone(),
            });
        }

        // 3.
        if order.quantums == 0 {
            return Err(ClobError::ZeroQuantums {
                order_id: order_id.clone(),
            });
        }
        if order.subticks == 0 {
            return Err(ClobError::ZeroSubticks {
                order_id: order_id.clone(),
            });
        }

        // 4.
        self.validate_expiration(order_id, kind, order.good_til_oneof, check)?;

        // 5.
        if order.time_in_force == TimeInForce::FillOrKill {
            return Err(ClobError::FillOrKillRemoved {
                order_id: order_id.clone(),
            });
        }

        // 6.
        if kind == OrderKind::LongTerm && order.time_in_force == TimeInForce::Ioc {
            return Err(ClobError::LongTermOrderImmediateExecution {
                order_id: order_id.clone(),
            });
        }

        // 7.
        if order.reduce_only && kind.is_stateful() {
            return Err(ClobError::StatefulReduceOnlyDisabled {
                order_id: order_id.clone(),
            });
        }

        // 8.
        Self::validate_conditional_fields(order, kind)?;

        // 9.
        self.validate_twap_parameters(order, kind)?;

        // 10.
        if let Some(builder) = &order.builder_code_parameters {
            validate_address(
                "builder",
                &builder.builder_address,
                &self.params.address_prefix,
            )?;
            if builder.fee_ppm == 0 || builder.fee_ppm > self.params.max_builder_code_fee_ppm {
                return Err(ClobError::InvalidBuilderFeePpm {
                    order_id: order_id.clone(),
                    fee_ppm: builder.fee_ppm,
                    max: self.params.max_builder_code_fee_ppm,
                });
            }
        }

        // 11. An empty router address means none.
        if let Some(router) = order.order_router_address.as_deref().filter(|r| !r.is_empty()) {
            validate_address("order router", router, &self.params.address_prefix)?;
        }

        Ok(())
    }

    fn validate_conditional_fields(order: &Order, kind: OrderKind) -> Result<()> {
        let order_id = &order.order_id;
        if kind == OrderKind::Conditional {
            if order.condition_type == ConditionType::Unspecified {
                return Err(ClobError::InvalidConditionalOrder {
                    order_id: order_id.clone(),
                    reason: "condition type must be specified",
                });
            }
            if order.conditional_order_trigger_subticks == 0 {
                return Err(ClobError::InvalidConditionalOrder {
                    order_id: order_id.clone(),
                    reason: "trigger subticks must be non-zero",
                });
            }
        } else if order.condition_type != ConditionType::Unspecified
            || order.conditional_order_trigger_subticks != 0
        {
            return Err(ClobError::ConditionalFieldsOnNonConditional {
                order_id: order_id.clone(),
            });
        }
        Ok(())
    }

    fn validate_twap_parameters(&self, order: &Order, kind: OrderKind) -> Result<()> {
        let order_id = &order.order_id;
        let Some(twap) = order.twap_parameters else {
            if kind == OrderKind::Twap {
                return Err(ClobError::MissingTwapParameters {
                    order_id: order_id.clone(),
                });
            }
            return Ok(());
        };
        if kind != OrderKind::Twap {
            return Err(ClobError::TwapParametersOnNonTwap {
                order_id: order_id.clone(),
            });
        }

        let p = &self.params;
        if twap.interval < p.min_twap_interval_secs || twap.interval > p.max_twap_interval_secs {
            return Err(ClobError::TwapIntervalOutOfRange {
                order_id: order_id.clone(),
                interval: twap.interval,
                min: p.min_twap_interval_secs,
                max: p.max_twap_interval_secs,
            });
        }
        if twap.duration < p.min_twap_duration_secs || twap.duration > p.max_twap_duration_secs {
            return Err(ClobError::TwapDurationOutOfRange {
                order_id: order_id.clone(),
                duration: twap.duration,
                min: p.min_twap_duration_secs,
                max: p.max_twap_duration_secs,
            });
        }
        if twap.duration.checked_rem(twap.interval) != Some(0) {
            return Err(ClobError::TwapDurationNotMultipleOfInterval {
                order_id: order_id.clone(),
                duration: twap.duration,
                interval: twap.interval,
            });
        }
        if twap.price_tolerance >= p.max_twap_price_tolerance_ppm {
            return Err(ClobError::TwapPriceToleranceTooHigh {
                order_id: order_id.clone(),
                price_tolerance: twap.price_tolerance,
                max: p.max_twap_price_tolerance_ppm,
            });
        }
        Ok(())
    }

    fn validate_expiration(
        &self,
        order_id: &OrderId,
        kind: OrderKind,
        good_til: Option<GoodTilOneof>,
        check: ExpirationCheck<'_>,
    ) -> Result<()> {
        if kind.is_stateful() {
            let good_til_block_time = match good_til {
                Some(GoodTilOneof::GoodTilBlockTime(t)) if t != 0 => t,
                _ => {
                    return Err(ClobError::MissingGoodTilBlockTime {
                        order_id: order_id.clone(),
                    });
                }
            };
            if let ExpirationCheck::Block(block) = check {
                let now = block.unix_seconds();
                if i64::from(good_til_block_time) <= now {
                    return Err(ClobError::GoodTilBlockTimeExpired {
                        order_id: order_id.clone(),
                        good_til_block_time,
                        block_time: now,
                    });
                }
                let max = self.stateful_window_end(block);
                if i64::from(good_til_block_time) > max {
                    return Err(ClobError::GoodTilBlockTimeExceedsStatefulOrderTimeWindow {
                        order_id: order_id.clone(),
                        good_til_block_time,
                        max,
                    });
                }
            }
        } else {
            let good_til_block = match good_til {
                Some(GoodTilOneof::GoodTilBlock(b)) if b != 0 => b,
                _ => {
                    return Err(ClobError::MissingGoodTilBlock {
                        order_id: order_id.clone(),
                    });
                }
            };
            if let ExpirationCheck::Block(block) = check {
                self.validate_good_til_block(good_til_block, block)
                    .map_err(|bound| match bound {
                        BlockBound::Expired => ClobError::GoodTilBlockExpired {
                            order_id: order_id.clone(),
                            good_til_block,
                            current_height: block.height,
                        },
                        BlockBound::TooFar(max) => ClobError::GoodTilBlockExceedsShortBlockWindow {
                            order_id: order_id.clone(),
                            good_til_block,
                            max,
                        },
                    })?;
            }
        }
        Ok(())
    }

    fn validate_good_til_block(
        &self,
        good_til_block: u32,
        block: &BlockContext,
    ) -> std::result::Result<(), BlockBound> {
        if good_til_block < block.height {
            return Err(BlockBound::Expired);
        }
        let max = block.height.saturating_add(self.params.short_block_window);
        if good_til_block > max {
            return Err(BlockBound::TooFar(max));
        }
        Ok(())
    }

    /// Latest admissible `GoodTilBlockTime` for orders placed in `block`.
    fn stateful_window_end(&self, block: &BlockContext) -> i64 {
        i64::try_from(self.params.stateful_order_time_window_secs)
            .ok()
            .and_then(TimeDelta::try_seconds)
            .and_then(|window| block.time.checked_add_signed(window))
            .map_or(i64::MAX, |end| end.timestamp())
    }

    // -----------------------------------------------------------------------
    // Cancel order
    // -----------------------------------------------------------------------

    pub fn validate_cancel_order(&self, msg: &MsgCancelOrder, block: &BlockContext) -> Result<()> {
        let kind = self.validate_order_id(&msg.order_id)?;
        self.validate_expiration(
            &msg.order_id,
            kind,
            msg.good_til_oneof,
            ExpirationCheck::Block(block),
        )
    }

    pub fn validate_cancel_order_basic(&self, msg: &MsgCancelOrder) -> Result<()> {
        let kind = self.validate_order_id(&msg.order_id)?;
        self.validate_expiration(&msg.order_id, kind, msg.good_til_oneof, ExpirationCheck::Basic)
    }

    // -----------------------------------------------------------------------
    // Batch cancel
    // -----------------------------------------------------------------------

    pub fn validate_batch_cancel(&self, msg: &MsgBatchCancel, block: &BlockContext) -> Result<()> {
        self.validate_subaccount_id(&msg.subaccount_id)?;

        if msg.short_term_cancels.is_empty() {
            return Err(ClobError::InvalidBatchCancel {
                reason: "batch is empty".to_string(),
            });
        }

        let total = msg.total_cancels();
        let max = self.params.max_batch_cancel_size;
        if total > max as usize {
            return Err(ClobError::BatchCancelTooLarge {
                total: u32::try_from(total).unwrap_or(u32::MAX),
                max,
            });
        }

        let mut seen = HashSet::with_capacity(total);
        for batch in &msg.short_term_cancels {
            if batch.client_ids.is_empty() {
                return Err(ClobError::InvalidBatchCancel {
                    reason: format!("no client ids for CLOB pair {}", batch.clob_pair_id),
                });
            }
            for &client_id in &batch.client_ids {
                if !seen.insert((batch.clob_pair_id, client_id)) {
                    return Err(ClobError::BatchCancelDuplicateClientId {
                        clob_pair_id: batch.clob_pair_id,
                        client_id,
                    });
                }
            }
        }

        if msg.good_til_block == 0 {
            return Err(ClobError::InvalidBatchCancel {
                reason: "good_til_block must be non-zero".to_string(),
            });
        }
        self.validate_good_til_block(msg.good_til_block, block)
            .map_err(|bound| ClobError::InvalidBatchCancel {
                reason: match bound {
                    BlockBound::Expired => format!(
                        "good_til_block {} is before current height {}",
                        msg.good_til_block, block.height
                    ),
                    BlockBound::TooFar(max) => format!(
                        "good_til_block {} exceeds short block window (max {max})",
                        msg.good_til_block
                    ),
                },
            })
    }
}

/// Which side of the short-block window a `GoodTilBlock` fell out of.
enum BlockBound {
    Expired,
    TooFar(u32),
}
