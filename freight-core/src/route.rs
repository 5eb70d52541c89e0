//! Pricing rules, route defaults and canonical route keys.
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

use crate::catalog::CatalogError;
use crate::constants::{
    DEFAULT_COLLATERAL_RATE, DEFAULT_MAX_COLLATERAL, DEFAULT_MAX_VOLUME, DEFAULT_MIN_REWARD,
    DEFAULT_ROUND_TRIP, ROUTE_SEP_ONE_WAY, ROUTE_SEP_ROUND_TRIP,
};

/// Values substituted for any field a route leaves unspecified.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RouteDefaults {
    #[serde(default = "RouteDefaults::default_collateral_rate")]
    pub collateral_rate: f64,
    #[serde(default = "RouteDefaults::default_min_reward")]
    pub min_reward: f64,
    #[serde(default = "RouteDefaults::default_max_volume")]
    pub max_volume: f64,
    #[serde(default = "RouteDefaults::default_max_collateral")]
    pub max_collateral: f64,
    #[serde(default = "RouteDefaults::default_round_trip")]
    pub round_trip: bool,
}

impl RouteDefaults {
    const fn default_collateral_rate() -> f64 {
        DEFAULT_COLLATERAL_RATE
    }

    const fn default_min_reward() -> f64 {
        DEFAULT_MIN_REWARD
    }

    const fn default_max_volume() -> f64 {
        DEFAULT_MAX_VOLUME
    }

    const fn default_max_collateral() -> f64 {
        DEFAULT_MAX_COLLATERAL
    }

    const fn default_round_trip() -> bool {
        DEFAULT_ROUND_TRIP
    }
}

impl Default for RouteDefaults {
    fn default() -> Self {
        Self {
            collateral_rate: Self::default_collateral_rate(),
            min_reward: Self::default_min_reward(),
            max_volume: Self::default_max_volume(),
            max_collateral: Self::default_max_collateral(),
            round_trip: Self::default_round_trip(),
        }
    }
}

/// A destination as authored in the route table. Only `destination` and
/// `per_volume_rate` are mandatory; `per_volume_rate` is checked when the
/// rule is resolved so the error can name the route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct RawDestination {
    pub destination: String,
    #[serde(default)]
    pub per_volume_rate: Option<f64>,
    #[serde(default)]
    pub collateral_rate: Option<f64>,
    #[serde(default)]
    pub min_reward: Option<f64>,
    #[serde(default)]
    pub max_volume: Option<f64>,
    #[serde(default)]
    pub max_collateral: Option<f64>,
    #[serde(default)]
    pub round_trip: Option<bool>,
    #[serde(default)]
    pub flat_rate: Option<f64>,
}

impl RawDestination {
    /// Minimal destination carrying only the required fields.
    #[must_use]
    pub fn new(destination: impl Into<String>, per_volume_rate: f64) -> Self {
        Self {
            destination: destination.into(),
            per_volume_rate: Some(per_volume_rate),
            ..Self::default()
        }
    }
}

/// One origin and every destination priced from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RouteGroup {
    pub origin: String,
    #[serde(default)]
    pub destinations: Vec<RawDestination>,
}

/// Fully resolved fee terms for one origin/destination pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingRule {
    pub origin: String,
    pub destination: String,
    /// ISK per m3
    pub per_volume_rate: f64,
    /// Fraction of collateral charged on top of the volume fee
    pub collateral_rate: f64,
    pub min_reward: f64,
    pub max_volume: f64,
    /// Advisory only, never enforced when pricing
    pub max_collateral: f64,
    pub round_trip: bool,
    pub flat_rate: Option<f64>,
}

impl PricingRule {
    /// Resolve an authored destination against the table defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the destination has no `per_volume_rate`, names an
    /// empty location, or carries a negative or non-finite amount.
    pub fn resolve(
        origin: &str,
        raw: &RawDestination,
        defaults: &RouteDefaults,
    ) -> Result<Self, CatalogError> {
        let round_trip = raw.round_trip.unwrap_or(defaults.round_trip);
        let key = RouteKey::new(origin, &raw.destination, round_trip);

        if origin.trim().is_empty() || raw.destination.trim().is_empty() {
            return Err(CatalogError::Malformed {
                reason: format!("route '{key}' has an empty origin or destination"),
            });
        }

        let Some(per_volume_rate) = raw.per_volume_rate else {
            return Err(CatalogError::MissingVolumeRate {
                route: key.to_string(),
            });
        };

        let rule = Self {
            origin: origin.to_string(),
            destination: raw.destination.clone(),
            per_volume_rate,
            collateral_rate: raw.collateral_rate.unwrap_or(defaults.collateral_rate),
            min_reward: raw.min_reward.unwrap_or(defaults.min_reward),
            max_volume: raw.max_volume.unwrap_or(defaults.max_volume),
            max_collateral: raw.max_collateral.unwrap_or(defaults.max_collateral),
            round_trip,
            // zero is how the table spells "no flat rate"
            flat_rate: raw.flat_rate.filter(|rate| *rate != 0.0),
        };
        rule.validate(&key)?;
        Ok(rule)
    }

    fn validate(&self, key: &RouteKey) -> Result<(), CatalogError> {
        let amounts = [
            ("per_volume_rate", Some(self.per_volume_rate)),
            ("collateral_rate", Some(self.collateral_rate)),
            ("min_reward", Some(self.min_reward)),
            ("max_volume", Some(self.max_volume)),
            ("max_collateral", Some(self.max_collateral)),
            ("flat_rate", self.flat_rate),
        ];
        for (field, value) in amounts {
            let Some(value) = value else { continue };
            if !value.is_finite() || value < 0.0 {
                return Err(CatalogError::InvalidField {
                    route: key.to_string(),
                    field,
                    value,
                });
            }
        }
        Ok(())
    }

    /// Canonical key of this rule.
    #[must_use]
    pub fn key(&self) -> RouteKey {
        RouteKey::new(&self.origin, &self.destination, self.round_trip)
    }

    /// Flat fee when one is in force: a finite amount strictly above zero.
    #[must_use]
    pub fn active_flat_rate(&self) -> Option<f64> {
        self.flat_rate.filter(|rate| rate.is_finite() && *rate > 0.0)
    }

    #[must_use]
    pub fn is_flat(&self) -> bool {
        self.active_flat_rate().is_some()
    }
}

#[must_use]
pub const fn separator(round_trip: bool) -> &'static str {
    if round_trip {
        ROUTE_SEP_ROUND_TRIP
    } else {
        ROUTE_SEP_ONE_WAY
    }
}

/// Canonical string identity of a route: `origin`, a direction glyph, then
/// `destination`. Ordering is plain code-point order of the string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RouteKey(String);

impl RouteKey {
    #[must_use]
    pub fn new(origin: &str, destination: &str, round_trip: bool) -> Self {
        let sep = separator(round_trip);
        Self(format!("{origin}{sep}{destination}"))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }

    /// Split a key string into `(origin, destination, round_trip)`.
    #[must_use]
    pub fn parse(key: &str) -> Option<(&str, &str, bool)> {
        if let Some((origin, destination)) = key.split_once(ROUTE_SEP_ONE_WAY) {
            return Some((origin, destination, false));
        }
        key.split_once(ROUTE_SEP_ROUND_TRIP)
            .map(|(origin, destination)| (origin, destination, true))
    }
}

impl fmt::Display for RouteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for RouteKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for RouteKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<RouteKey> for String {
    fn from(value: RouteKey) -> Self {
        value.0
    }
}
