//! Static room configuration and property fixtures.
//!
//! A room is created from three collaborator-supplied documents: the
//! config (tokens, starting funds, rates, building pool sizes), the
//! property fixtures, and the message templates. The engine treats all
//! three as trusted inputs and never re-validates them beyond presence.

use serde::{Deserialize, Serialize};

/// Monetary amount. Signed so intermediate arithmetic never wraps; the
/// rule validator guarantees balances stay non-negative.
pub type Money = i64;

/// Value rates applied to property base costs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rates {
    /// Mortgage value as a fraction of the purchase price.
    pub mortgage: f64,
    /// Resale value of a building as a fraction of its build cost.
    pub building: f64,
    /// Interest charged on the mortgage value when unmortgaging.
    pub interest: f64,
}

impl Default for Rates {
    fn default() -> Self {
        Self {
            mortgage: 0.5,
            building: 0.5,
            interest: 0.1,
        }
    }
}

/// Apply a rate to a monetary value, rounding to the nearest unit.
#[must_use]
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
pub fn scaled(value: Money, rate: f64) -> Money {
    (value as f64 * rate).round() as Money
}

/// Static game configuration, fixed for the lifetime of a room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// The finite set of tokens players may join with.
    pub player_tokens: Vec<String>,
    /// Funds seeded into the bank at game creation.
    pub bank_start: Money,
    /// Balance granted to each joining player (drawn from the bank).
    pub player_start: Money,
    /// Rates for derived property values.
    pub rates: Rates,
    /// Size of the shared house pool.
    pub houses_available: u32,
    /// Size of the shared hotel pool.
    pub hotels_available: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            player_tokens: [
                "top-hat",
                "automobile",
                "thimble",
                "battleship",
                "scottish-terrier",
                "boot",
                "wheelbarrow",
                "cat",
            ]
            .map(String::from)
            .to_vec(),
            bank_start: 15_140,
            player_start: 1_500,
            rates: Rates::default(),
            houses_available: 32,
            hotels_available: 12,
        }
    }
}

/// Purchase, build, and rent costs for one property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Costs {
    /// Purchase price from the bank.
    pub price: Money,
    /// Cost of adding one building.
    pub build: Money,
    /// Rent table indexed by building count (hotel at index 5).
    ///
    /// Railroads and utilities index this by properties owned in the
    /// group instead.
    pub rent: [Money; 6],
}

/// Collaborator-supplied seed for one property, loaded at room setup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyFixture {
    /// Display name, e.g. "Oriental Avenue". The property id is its slug.
    pub name: String,
    /// Color or category group, e.g. "orange", "railroad", "utility".
    pub group: String,
    /// Cost structure.
    pub costs: Costs,
}

/// Derive a property id from its display name ("Oriental Avenue" becomes
/// "oriental-avenue").
#[must_use]
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}
