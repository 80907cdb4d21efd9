//! Governance configuration validators.
//!
//! Each function checks a whole proposed record and returns the first
//! violated constraint. Nothing here mutates the record, so a rejected update
//! leaves the stored configuration untouched.

use std::collections::HashSet;

use rust_decimal::Decimal;

use clobcore_types::{
    BlockRateLimitConfiguration, ClobError, EquityTierBounds, EquityTierLimitConfiguration,
    LiquidationsConfig, RateLimitBounds, Result, constants::ONE_MILLION,
};

/// Every entry needs `limit` and `num_blocks` in `(0, max]` for its stream,
/// and no two entries of one stream may share `num_blocks`.
pub fn validate_rate_limit_config(
    config: &BlockRateLimitConfiguration,
    bounds: &RateLimitBounds,
) -> Result<()> {
    for (kind, entries) in config.lists() {
        let (max_limit, max_num_blocks) = bounds.maxima(kind);
        let mut seen = HashSet::with_capacity(entries.len());
        for entry in entries {
            for (field, value, max) in [
                ("limit", entry.limit, max_limit),
                ("num_blocks", entry.num_blocks, max_num_blocks),
            ] {
                if value == 0 || value > max {
                    return Err(ClobError::RateLimitOutOfBounds {
                        kind,
                        field,
                        value,
                        max,
                    });
                }
            }
            if !seen.insert(entry.num_blocks) {
                return Err(ClobError::DuplicateRateLimitNumBlocks {
                    kind,
                    num_blocks: entry.num_blocks,
                });
            }
        }
    }
    Ok(())
}

/// Tiers are checked in ascending `usd_tnc_required` order.
pub fn validate_equity_tier_config(
    config: &EquityTierLimitConfiguration,
    bounds: &EquityTierBounds,
) -> Result<()> {
    for (kind, tiers) in config.lists() {
        let mut sorted: Vec<_> = tiers.iter().collect();
        sorted.sort_by(|a, b| a.usd_tnc_required.cmp(&b.usd_tnc_required));

        for (i, tier) in sorted.iter().enumerate() {
            if tier.limit > bounds.max_limit {
                return Err(ClobError::EquityTierLimitTooHigh {
                    kind,
                    limit: tier.limit,
                    max: bounds.max_limit,
                });
            }
            if tier.usd_tnc_required < Decimal::ZERO {
                return Err(ClobError::NegativeEquityTierRequirement {
                    kind,
                    usd_tnc_required: tier.usd_tnc_required,
                });
            }
            if i > 0 && sorted[i - 1].usd_tnc_required == tier.usd_tnc_required {
                return Err(ClobError::DuplicateEquityTierRequirement {
                    kind,
                    usd_tnc_required: tier.usd_tnc_required,
                });
            }
        }
    }
    Ok(())
}

/// `min_position_notional_liquidated` is not constrained.
pub fn validate_liquidations_config(config: &LiquidationsConfig) -> Result<()> {
    let invalid = |field: &'static str, value: u64, reason: &'static str| {
        Err(ClobError::InvalidLiquidationsConfig {
            field,
            value,
            reason,
        })
    };

    let fee = config.max_liquidation_fee_ppm;
    if fee == 0 || fee > ONE_MILLION {
        return invalid("max_liquidation_fee_ppm", fee.into(), "must be in (0, 1000000]");
    }

    let portion = config.position_block_limits.max_position_portion_liquidated_ppm;
    if portion == 0 || portion > ONE_MILLION {
        return invalid(
            "max_position_portion_liquidated_ppm",
            portion.into(),
            "must be in (0, 1000000]",
        );
    }

    let subaccount = &config.subaccount_block_limits;
    if subaccount.max_notional_liquidated == 0 {
        return invalid("max_notional_liquidated", 0, "must be positive");
    }
    if subaccount.max_quantums_insurance_lost == 0 {
        return invalid("max_quantums_insurance_lost", 0, "must be positive");
    }

    let price = &config.fillable_price_config;
    if price.bankruptcy_adjustment_ppm < ONE_MILLION {
        return invalid(
            "bankruptcy_adjustment_ppm",
            price.bankruptcy_adjustment_ppm.into(),
            "must be at least 1000000",
        );
    }
    if price.spread_to_maintenance_margin_ratio_ppm == 0 {
        return invalid("spread_to_maintenance_margin_ratio_ppm", 0, "must be positive");
    }

    Ok(())
}
