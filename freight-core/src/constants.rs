//! Centralized pricing defaults and wire constants for courier contracts.
//!
//! Per-route overrides live in the route table; anything a route leaves out
//! resolves to one of these values.

// Route defaults -------------------------------------------------------------
pub const DEFAULT_COLLATERAL_RATE: f64 = 0.0075; // 0.75%
pub const DEFAULT_MIN_REWARD: f64 = 30e6;
pub const DEFAULT_MAX_COLLATERAL: f64 = 100e9;
pub const DEFAULT_MAX_VOLUME: f64 = 350_000.0;
pub const DEFAULT_ROUND_TRIP: bool = false;

/// Reduced minimum reward used on trade-hub routes.
pub const REDUCED_MIN_REWARD: f64 = 10e6;

/// Collateral is entered in millions of ISK.
pub const MILLIONS: f64 = 1e6;

// Canonical route keys -------------------------------------------------------
pub const ROUTE_SEP_ONE_WAY: &str = " ➠ ";
pub const ROUTE_SEP_ROUND_TRIP: &str = " ⮂ ";

// Contract terms -------------------------------------------------------------
pub const CONTRACT_ACCEPT_DAYS: u16 = 14;
pub const CONTRACT_COMPLETE_DAYS: u16 = 7;
pub const CONTRACT_CORPORATION: &str = "Northern Freight Unlimited";
pub const CONTRACT_CORPORATION_TICKER: &str = "NOFU";
