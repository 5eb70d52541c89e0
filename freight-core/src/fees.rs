//! Fee resolution for courier contracts.
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::RouteCatalog;
use crate::route::PricingRule;

/// Reasons a quote cannot be produced for a request.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FeeError {
    #[error("unknown route '{route}'")]
    UnknownRoute { route: String },
    #[error("volume too large for '{route}': {attempted} m3 requested, cap is {max_volume} m3")]
    VolumeExceeded {
        route: String,
        attempted: f64,
        max_volume: f64,
    },
    #[error("{field} must be a finite, non-negative amount (got {value})")]
    InvalidInput { field: &'static str, value: f64 },
    #[error("reward for '{route}' is not a finite amount")]
    RewardOverflow { route: String },
}

/// How the reward was arrived at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pricing {
    /// Fixed fee, volume and collateral ignored
    Flat,
    /// Volume fee plus collateral fee, floored at the minimum reward
    Volumetric,
}

/// Rates applied to a quote. Both are zero when a flat rate applied.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateStructure {
    #[serde(rename = "m3Rate")]
    pub per_volume_rate: f64,
    #[serde(rename = "collateralRate")]
    pub collateral_rate: f64,
}

impl RateStructure {
    #[must_use]
    pub const fn flat() -> Self {
        Self {
            per_volume_rate: 0.0,
            collateral_rate: 0.0,
        }
    }
}

/// A priced contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeResult {
    pub route: String,
    pub reward: f64,
    pub max_m3: f64,
    pub max_collateral: f64,
    pub rate_structure: RateStructure,
    pub pricing: Pricing,
}

impl FeeResult {
    fn from_rule(route: &str, rule: &PricingRule, reward: f64, pricing: Pricing) -> Self {
        let rate_structure = match pricing {
            Pricing::Flat => RateStructure::flat(),
            Pricing::Volumetric => RateStructure {
                per_volume_rate: rule.per_volume_rate,
                collateral_rate: rule.collateral_rate,
            },
        };
        Self {
            route: route.to_string(),
            reward,
            max_m3: rule.max_volume,
            max_collateral: rule.max_collateral,
            rate_structure,
            pricing,
        }
    }

    #[must_use]
    pub const fn is_flat(&self) -> bool {
        matches!(self.pricing, Pricing::Flat)
    }

    /// Whether `collateral_isk` is above the route's advisory ceiling. The
    /// ceiling is informational; pricing never rejects on it.
    #[must_use]
    pub fn exceeds_collateral_advisory(&self, collateral_isk: f64) -> bool {
        collateral_isk > self.max_collateral
    }
}

/// Price a contract of `desired_volume` m3 and `desired_collateral` (in the
/// catalog's collateral unit) on `route`.
///
/// A route with a flat rate charges exactly that rate and skips every other
/// check. Otherwise the volume must fit under the route cap and the reward is
/// `volume * per_volume_rate + collateral * collateral_rate`, floored at the
/// route's minimum reward.
///
/// # Errors
///
/// Returns an error if the route is unknown, the volume exceeds the route
/// cap, an input is negative or non-finite, or the reward overflows.
pub fn compute_fee(
    catalog: &RouteCatalog,
    route: &str,
    desired_volume: f64,
    desired_collateral: f64,
) -> Result<FeeResult, FeeError> {
    let rule = catalog.get(route).ok_or_else(|| FeeError::UnknownRoute {
        route: route.to_string(),
    })?;

    if let Some(flat_rate) = rule.active_flat_rate() {
        return Ok(FeeResult::from_rule(route, rule, flat_rate, Pricing::Flat));
    }

    check_input("desired_volume", desired_volume)?;
    check_input("desired_collateral", desired_collateral)?;

    if desired_volume > rule.max_volume {
        return Err(FeeError::VolumeExceeded {
            route: route.to_string(),
            attempted: desired_volume,
            max_volume: rule.max_volume,
        });
    }

    let collateral_isk = desired_collateral * catalog.collateral_unit();
    let volume_fee = desired_volume * rule.per_volume_rate;
    let collateral_fee = collateral_isk * rule.collateral_rate;
    let reward = (volume_fee + collateral_fee).max(rule.min_reward);
    if !reward.is_finite() {
        return Err(FeeError::RewardOverflow {
            route: route.to_string(),
        });
    }

    Ok(FeeResult::from_rule(route, rule, reward, Pricing::Volumetric))
}

fn check_input(field: &'static str, value: f64) -> Result<(), FeeError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(FeeError::InvalidInput { field, value })
    }
}
