//! Route catalog: the immutable, validated set of pricing rules.
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::OnceLock;
use thiserror::Error;

use crate::constants::MILLIONS;
use crate::fees::{FeeError, FeeResult, compute_fee};
use crate::route::{PricingRule, RouteDefaults, RouteGroup, RouteKey};

const DEFAULT_ROUTE_DATA: &str = include_str!("../data/routes.json");

/// Errors raised while loading a route table. A catalog is never built from a
/// table that produces one of these.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CatalogError {
    #[error("route table is malformed: {reason}")]
    Malformed { reason: String },
    #[error("route '{route}' has no per_volume_rate")]
    MissingVolumeRate { route: String },
    #[error("route '{route}' is defined more than once")]
    DuplicateRoute { route: String },
    #[error("route '{route}': {field} must be a finite, non-negative amount (got {value})")]
    InvalidField {
        route: String,
        field: &'static str,
        value: f64,
    },
    #[error("collateral_unit must be a finite amount above zero (got {value})")]
    InvalidCollateralUnit { value: f64 },
    #[error("default route '{route}' is not in the catalog")]
    UnknownDefaultRoute { route: String },
}

impl From<serde_json::Error> for CatalogError {
    fn from(err: serde_json::Error) -> Self {
        Self::Malformed {
            reason: err.to_string(),
        }
    }
}

/// Route table as authored: defaults, collateral scaling and routes grouped
/// by origin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RouteTable {
    #[serde(default)]
    pub defaults: RouteDefaults,
    /// ISK per unit of collateral entered by the customer
    #[serde(default = "RouteTable::default_collateral_unit")]
    pub collateral_unit: f64,
    #[serde(default)]
    pub default_route: Option<String>,
    #[serde(default)]
    pub routes: Vec<RouteGroup>,
}

impl RouteTable {
    const fn default_collateral_unit() -> f64 {
        MILLIONS
    }

    /// Table with the given routes and every other setting at its default.
    #[must_use]
    pub fn new(routes: Vec<RouteGroup>) -> Self {
        Self {
            defaults: RouteDefaults::default(),
            collateral_unit: Self::default_collateral_unit(),
            default_route: None,
            routes,
        }
    }

    /// Parse a route table from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON does not describe a route table.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// The route table compiled into the crate.
    ///
    /// # Errors
    ///
    /// Returns an error if the embedded asset cannot be parsed.
    pub fn load_from_static() -> Result<Self, serde_json::Error> {
        Self::from_json(DEFAULT_ROUTE_DATA)
    }
}

/// Immutable set of pricing rules keyed by canonical route key.
#[derive(Debug, Clone)]
pub struct RouteCatalog {
    rules: HashMap<RouteKey, PricingRule>,
    options: Vec<RouteKey>,
    defaults: RouteDefaults,
    collateral_unit: f64,
    default_route: Option<RouteKey>,
}

impl RouteCatalog {
    /// Resolve and validate every rule in `table`.
    ///
    /// # Errors
    ///
    /// Returns an error if a rule is incomplete or invalid, two rules share a
    /// canonical key, the collateral unit is not a positive amount, or the
    /// default route names no rule.
    pub fn build(table: RouteTable) -> Result<Self, CatalogError> {
        let RouteTable {
            defaults,
            collateral_unit,
            default_route,
            routes,
        } = table;

        if !collateral_unit.is_finite() || collateral_unit <= 0.0 {
            return Err(CatalogError::InvalidCollateralUnit {
                value: collateral_unit,
            });
        }

        let mut rules = HashMap::new();
        for group in &routes {
            for raw in &group.destinations {
                let rule = PricingRule::resolve(&group.origin, raw, &defaults)?;
                match rules.entry(rule.key()) {
                    Entry::Occupied(slot) => {
                        return Err(CatalogError::DuplicateRoute {
                            route: slot.key().to_string(),
                        });
                    }
                    Entry::Vacant(slot) => {
                        slot.insert(rule);
                    }
                }
            }
        }

        let mut options: Vec<RouteKey> = rules.keys().cloned().collect();
        options.sort();

        let default_route = match default_route {
            Some(route) => match rules.get_key_value(route.as_str()) {
                Some((key, _)) => Some(key.clone()),
                None => return Err(CatalogError::UnknownDefaultRoute { route }),
            },
            None => None,
        };

        Ok(Self {
            rules,
            options,
            defaults,
            collateral_unit,
            default_route,
        })
    }

    /// Parse and build a catalog from a JSON route table.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or the table fails validation.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        Self::build(RouteTable::from_json(json)?)
    }

    /// The catalog compiled into the crate, built on first use and shared for
    /// the rest of the process.
    ///
    /// # Errors
    ///
    /// Returns the load error if the embedded table is invalid.
    pub fn builtin() -> Result<&'static Self, CatalogError> {
        static CATALOG: OnceLock<Result<RouteCatalog, CatalogError>> = OnceLock::new();
        CATALOG
            .get_or_init(|| Self::from_json(DEFAULT_ROUTE_DATA))
            .as_ref()
            .map_err(Clone::clone)
    }

    #[must_use]
    pub fn get(&self, route: &str) -> Option<&PricingRule> {
        self.rules.get(route)
    }

    /// Look a rule up by its parts rather than by key.
    #[must_use]
    pub fn find(&self, origin: &str, destination: &str, round_trip: bool) -> Option<&PricingRule> {
        self.get(RouteKey::new(origin, destination, round_trip).as_str())
    }

    #[must_use]
    pub fn contains(&self, route: &str) -> bool {
        self.rules.contains_key(route)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rules in route-option order.
    pub fn rules(&self) -> impl Iterator<Item = &PricingRule> {
        self.options.iter().filter_map(|key| self.rules.get(key))
    }

    /// Canonical keys in ascending code-point order.
    #[must_use]
    pub fn route_keys(&self) -> &[RouteKey] {
        &self.options
    }

    /// Sorted route picklist for selection UIs.
    #[must_use]
    pub fn route_options(&self) -> Vec<String> {
        self.options.iter().map(ToString::to_string).collect()
    }

    /// Route preselected in pickers: the configured default, else the first
    /// option.
    #[must_use]
    pub fn default_route(&self) -> Option<&RouteKey> {
        self.default_route.as_ref().or_else(|| self.options.first())
    }

    #[must_use]
    pub const fn defaults(&self) -> &RouteDefaults {
        &self.defaults
    }

    #[must_use]
    pub const fn collateral_unit(&self) -> f64 {
        self.collateral_unit
    }

    /// Price a contract on `route`. See [`compute_fee`].
    ///
    /// # Errors
    ///
    /// Returns an error if the route is unknown, the volume exceeds the route
    /// cap, an input is negative or non-finite, or the reward overflows.
    pub fn compute_fee(
        &self,
        route: &str,
        desired_volume: f64,
        desired_collateral: f64,
    ) -> Result<FeeResult, FeeError> {
        compute_fee(self, route, desired_volume, desired_collateral)
    }
}
