//! Northern Freight courier pricing
//!
//! Platform-agnostic fee calculation for courier contracts: an immutable
//! catalog of route pricing rules and a pure resolver that turns a route,
//! a cargo volume and a collateral value into a reward.

pub mod catalog;
pub mod constants;
pub mod fees;
pub mod numbers;
pub mod quote;
pub mod route;

use anyhow::Context;

// Re-export commonly used types
pub use catalog::{CatalogError, RouteCatalog, RouteTable};
pub use fees::{FeeError, FeeResult, Pricing, RateStructure, compute_fee};
pub use quote::{ContractTerms, QuoteSheet, describe_rate_structure, format_isk, format_percent};
pub use route::{PricingRule, RawDestination, RouteDefaults, RouteGroup, RouteKey};

/// Trait for abstracting where a route table comes from.
/// The embedded table is provided by [`StaticRoutes`].
pub trait RouteSource {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load the authored route table.
    ///
    /// # Errors
    ///
    /// Returns an error if the table cannot be read or parsed.
    fn load_route_table(&self) -> Result<RouteTable, Self::Error>;

    /// Human-readable origin of the table, used in error context.
    fn describe(&self) -> String;
}

/// The route table compiled into this crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticRoutes;

impl RouteSource for StaticRoutes {
    type Error = serde_json::Error;

    fn load_route_table(&self) -> Result<RouteTable, Self::Error> {
        RouteTable::load_from_static()
    }

    fn describe(&self) -> String {
        "built-in route table".to_string()
    }
}

/// Load a route table from `source` and build the catalog from it. Call
/// once at startup and share the result.
///
/// # Errors
///
/// Returns an error if the table cannot be loaded or fails validation.
pub fn open_catalog<S: RouteSource>(source: &S) -> anyhow::Result<RouteCatalog> {
    let table = source
        .load_route_table()
        .with_context(|| format!("loading {}", source.describe()))?;
    RouteCatalog::build(table).with_context(|| format!("validating {}", source.describe()))
}
