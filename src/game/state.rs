//! The authoritative game-state snapshot and its read-only selectors.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::game::auction::Auction;
use crate::game::config::{Config, PropertyFixture};
use crate::game::notice::Notice;
use crate::game::player::{Owner, Player, Token};
use crate::game::property::{self, Property};
use crate::game::trade::Trade;
use crate::game::Money;

/// Complete state of one game room.
///
/// A snapshot is immutable from the caller's perspective: the dispatch
/// pipeline is the only mutation path and always returns a fresh state,
/// leaving the input untouched on rejection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    /// Players keyed by token. Never removed, only flagged bankrupt.
    pub players: BTreeMap<Token, Player>,
    /// Properties keyed by id. Created once at room setup.
    pub properties: BTreeMap<String, Property>,
    /// The bank's funds.
    pub bank: Money,
    /// Houses remaining in the shared pool.
    pub houses: u32,
    /// Hotels remaining in the shared pool.
    pub hotels: u32,
    /// The open auction, if any.
    pub auction: Option<Auction>,
    /// Pending trades keyed by pair id.
    pub trades: BTreeMap<String, Trade>,
    /// Notice for the last accepted action; overwritten, not accumulated.
    pub notice: Option<Notice>,
}

impl GameState {
    /// Create the initial state for a room from its static configuration
    /// and property fixtures.
    #[must_use]
    pub fn new(config: &Config, fixtures: &[PropertyFixture]) -> Self {
        let properties = fixtures
            .iter()
            .map(Property::from_fixture)
            .map(|p| (p.id.clone(), p))
            .collect();

        Self {
            players: BTreeMap::new(),
            properties,
            bank: config.bank_start,
            houses: config.houses_available,
            hotels: config.hotels_available,
            auction: None,
            trades: BTreeMap::new(),
            notice: None,
        }
    }

    /// Look up a player by token.
    #[must_use]
    pub fn player(&self, token: &str) -> Option<&Player> {
        self.players.get(token)
    }

    /// Look up a property by id.
    #[must_use]
    pub fn property(&self, id: &str) -> Option<&Property> {
        self.properties.get(id)
    }

    /// All properties in a group, in id order.
    #[must_use]
    pub fn group(&self, group: &str) -> Vec<&Property> {
        self.properties
            .values()
            .filter(|p| p.group == group)
            .collect()
    }

    /// Look up a pending trade by id.
    #[must_use]
    pub fn trade(&self, id: &str) -> Option<&Trade> {
        self.trades.get(id)
    }

    /// All properties owned by a player, in id order.
    #[must_use]
    pub fn properties_owned_by(&self, token: &str) -> Vec<&Property> {
        self.properties
            .values()
            .filter(|p| p.owner.token() == Some(token))
            .collect()
    }

    /// Whether the property's group is fully held by its owner.
    #[must_use]
    pub fn is_monopoly(&self, id: &str) -> bool {
        self.property(id)
            .is_some_and(|p| property::is_monopoly(&self.group(&p.group)))
    }

    /// Base rent for a property from the current snapshot.
    ///
    /// Standard groups index the rent table by building count, doubled
    /// for an unimproved monopoly. Railroads and utilities index by the
    /// owner's holdings in the group; for utilities the caller scales
    /// the result by the dice total.
    #[must_use]
    pub fn rent(&self, id: &str) -> Option<Money> {
        let property = self.property(id)?;
        let group = self.group(&property.group);

        if property.is_special_group() {
            let owned = group.iter().filter(|p| p.owner == property.owner).count();
            return property.costs.rent.get(owned.checked_sub(1)?).copied();
        }

        let base = property.costs.rent[usize::from(property.buildings)];
        if property.buildings == 0 && property::is_monopoly(&group) {
            Some(base * 2)
        } else {
            Some(base)
        }
    }

    /// The conserved ledger total: bank funds plus all player balances.
    ///
    /// Constant across every transition except game creation, joins
    /// (zero-sum against the bank, so also constant), and bankruptcy
    /// write-offs to the bank.
    #[must_use]
    pub fn ledger_total(&self) -> Money {
        self.bank + self.players.values().map(|p| p.balance).sum::<Money>()
    }
}

/// Invariant violation found by [`check_invariants`].
#[derive(Debug, Clone)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub message: String,
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Invariant violation: {}", self.message)
    }
}

impl std::error::Error for InvariantViolation {}

/// Check structural invariants of a state snapshot.
///
/// These should never trigger for states produced by the dispatch
/// pipeline; they are bug detectors for tests and the replay checker.
#[must_use]
pub fn check_invariants(state: &GameState, config: &Config) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();
    let mut push = |message: String| violations.push(InvariantViolation { message });

    if state.bank < 0 {
        push(format!("Bank balance {} is negative", state.bank));
    }

    if state.houses > config.houses_available {
        push(format!(
            "House pool {} exceeds configured size {}",
            state.houses, config.houses_available
        ));
    }
    if state.hotels > config.hotels_available {
        push(format!(
            "Hotel pool {} exceeds configured size {}",
            state.hotels, config.hotels_available
        ));
    }

    for player in state.players.values() {
        if player.bankrupt {
            if player.balance != 0 {
                push(format!(
                    "Bankrupt player {} has balance {}",
                    player.token, player.balance
                ));
            }
            let owned = state.properties_owned_by(&player.token).len();
            if owned > 0 {
                push(format!(
                    "Bankrupt player {} still owns {owned} properties",
                    player.token
                ));
            }
        } else if player.balance < 0 {
            push(format!(
                "Player {} has negative balance {}",
                player.token, player.balance
            ));
        }
    }

    for property in state.properties.values() {
        if property.buildings > property::HOTEL {
            push(format!(
                "{} carries {} buildings",
                property.id, property.buildings
            ));
        }
        if property.is_special_group() && property.is_improved() {
            push(format!("{} group property {} is improved", property.group, property.id));
        }
    }

    // Even-building within each standard group
    let mut groups: BTreeMap<&str, (u8, u8)> = BTreeMap::new();
    for property in state.properties.values() {
        if property.is_special_group() {
            continue;
        }
        let entry = groups
            .entry(property.group.as_str())
            .or_insert((u8::MAX, u8::MIN));
        entry.0 = entry.0.min(property.buildings);
        entry.1 = entry.1.max(property.buildings);
    }
    for (group, (min, max)) in groups {
        if max > min + 1 {
            push(format!(
                "Group {group} buildings spread from {min} to {max}"
            ));
        }
    }

    if let Some(auction) = &state.auction {
        match state.property(&auction.property) {
            None => push(format!("Auction references unknown property {}", auction.property)),
            Some(p) if p.owner != Owner::Bank => {
                push(format!("Auctioned property {} already has an owner", p.id));
            }
            Some(_) => {}
        }
    }

    for trade in state.trades.values() {
        for token in [&trade.initiator, &trade.counterparty] {
            if state.player(token).is_none() {
                push(format!("Trade {} references unknown player {token}", trade.id));
            }
        }
    }

    violations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::config::Costs;

    fn fixtures() -> Vec<PropertyFixture> {
        let costs = Costs {
            price: 100,
            build: 50,
            rent: [6, 30, 90, 270, 400, 550],
        };
        vec![
            PropertyFixture {
                name: "Oriental Avenue".into(),
                group: "lightblue".into(),
                costs,
            },
            PropertyFixture {
                name: "Vermont Avenue".into(),
                group: "lightblue".into(),
                costs,
            },
            PropertyFixture {
                name: "Reading Railroad".into(),
                group: "railroad".into(),
                costs: Costs {
                    price: 200,
                    build: 0,
                    rent: [25, 50, 100, 200, 0, 0],
                },
            },
        ]
    }

    fn state() -> GameState {
        GameState::new(&Config::default(), &fixtures())
    }

    #[test]
    fn test_new_seeds_properties_and_pool() {
        let state = state();
        assert_eq!(state.properties.len(), 3);
        assert_eq!(state.bank, Config::default().bank_start);
        assert_eq!(state.houses, 32);
        assert_eq!(state.hotels, 12);
        assert!(state.players.is_empty());
        assert!(state.auction.is_none());
    }

    #[test]
    fn test_selectors() {
        let mut state = state();
        state
            .players
            .insert("top-hat".into(), Player::new("Player 1", "top-hat", 1500));

        assert!(state.player("top-hat").is_some());
        assert!(state.player("thimble").is_none());
        assert!(state.property("oriental-avenue").is_some());
        assert_eq!(state.group("lightblue").len(), 2);
        assert!(state.properties_owned_by("top-hat").is_empty());
    }

    #[test]
    fn test_rent_standard_group() {
        let mut state = state();
        state
            .properties
            .get_mut("oriental-avenue")
            .unwrap()
            .owner = Owner::from("top-hat");

        // Not a monopoly: base rent
        assert_eq!(state.rent("oriental-avenue"), Some(6));

        // Monopoly with no buildings: doubled
        state.properties.get_mut("vermont-avenue").unwrap().owner = Owner::from("top-hat");
        assert_eq!(state.rent("oriental-avenue"), Some(12));

        // Buildings: plain table lookup
        state
            .properties
            .get_mut("oriental-avenue")
            .unwrap()
            .buildings = 2;
        assert_eq!(state.rent("oriental-avenue"), Some(90));
    }

    #[test]
    fn test_rent_railroad_counts_holdings() {
        let mut state = state();
        state
            .properties
            .get_mut("reading-railroad")
            .unwrap()
            .owner = Owner::from("top-hat");
        assert_eq!(state.rent("reading-railroad"), Some(25));
    }

    #[test]
    fn test_ledger_total() {
        let mut state = state();
        let bank = state.bank;
        state
            .players
            .insert("top-hat".into(), Player::new("Player 1", "top-hat", 1500));
        assert_eq!(state.ledger_total(), bank + 1500);
    }

    #[test]
    fn test_invariants_clean_state() {
        let state = state();
        assert!(check_invariants(&state, &Config::default()).is_empty());
    }

    #[test]
    fn test_invariants_detect_uneven_group() {
        let mut state = state();
        state
            .properties
            .get_mut("oriental-avenue")
            .unwrap()
            .buildings = 3;
        let violations = check_invariants(&state, &Config::default());
        assert!(violations.iter().any(|v| v.message.contains("spread")));
    }

    #[test]
    fn test_invariants_detect_bankrupt_owner() {
        let mut state = state();
        let mut player = Player::new("Player 1", "top-hat", 0);
        player.bankrupt = true;
        state.players.insert("top-hat".into(), player);
        state
            .properties
            .get_mut("oriental-avenue")
            .unwrap()
            .owner = Owner::from("top-hat");

        let violations = check_invariants(&state, &Config::default());
        assert!(violations.iter().any(|v| v.message.contains("still owns")));
    }
}
