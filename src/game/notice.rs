//! Notices and message templates.
//!
//! Every accepted action produces a notice: a template id, the rendered
//! message, and the references it was rendered from. The notice is
//! attached transiently to the state and overwritten by the next action.
//!
//! Templates are keyed `notices.<id>` and `errors.<key>` and interpolate
//! `{path}` placeholders (`{player.name}`, `{property.name}`, `{amount}`,
//! ...) against the resolved action context. The table is supplied at
//! room creation; a builtin English table backs the CLI and tests.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::game::player::Token;
use crate::game::Money;

/// References the notice message was rendered from, for presentation
/// layers that want more than the flat string.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NoticeMeta {
    /// The acting player's token.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player: Option<Token>,
    /// The counterparty token (or `"bank"` for bankruptcy write-offs).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub other: Option<String>,
    /// The property involved.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property: Option<String>,
    /// The resolved amount moved by the action.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<Money>,
}

/// Human-readable description of the last accepted action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    /// Template id, e.g. `player.joined`.
    pub id: String,
    /// Rendered message.
    pub message: String,
    /// References used while rendering.
    pub meta: NoticeMeta,
}

/// Message template table for one room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Templates {
    map: BTreeMap<String, String>,
}

/// Builtin English templates. Rooms may replace the table wholesale.
const BUILTIN: &[(&str, &str)] = &[
    ("notices.player.joined", "{player.name} joined the game"),
    (
        "notices.player.transfer-to",
        "{player.name} received {amount} from the bank",
    ),
    (
        "notices.player.transfer-from",
        "{player.name} paid the bank {amount}",
    ),
    (
        "notices.player.transfer-with",
        "{player.name} paid {other.name} {amount}",
    ),
    ("notices.player.bankrupt", "{player.name} went bankrupt"),
    (
        "notices.player.other-bankrupt",
        "{player.name} went bankrupt and settled with {other.name}",
    ),
    (
        "notices.property.bought",
        "{player.name} bought {property.name} for {amount}",
    ),
    (
        "notices.property.improved",
        "{player.name} improved {property.name}",
    ),
    (
        "notices.property.unimproved",
        "{player.name} unimproved {property.name}",
    ),
    (
        "notices.property.unimproved-group",
        "{player.name} sold every building in the {group} group",
    ),
    (
        "notices.property.mortgaged",
        "{player.name} mortgaged {property.name}",
    ),
    (
        "notices.property.unmortgaged",
        "{player.name} unmortgaged {property.name}",
    ),
    (
        "notices.property.paid-rent",
        "{player.name} paid {amount} rent for {property.name}",
    ),
    ("notices.auction.new", "{property.name} is up for auction"),
    (
        "notices.auction.bid",
        "{player.name} bid {amount} on {property.name}",
    ),
    (
        "notices.auction.conceded",
        "{player.name} conceded the auction for {property.name}",
    ),
    (
        "notices.auction.closed",
        "{player.name} won {property.name} at auction for {amount}",
    ),
    (
        "notices.auction.unsold",
        "The auction for {property.name} closed with no bids",
    ),
    (
        "notices.trade.new",
        "{player.name} proposed a trade with {other.name}",
    ),
    (
        "notices.trade.declined",
        "{player.name} declined the trade with {other.name}",
    ),
    (
        "notices.trade.accepted",
        "{player.name} accepted the trade with {other.name}",
    ),
    ("errors.player-not-found", "Player not found"),
    ("errors.bankrupt", "{player.name} is bankrupt"),
    ("errors.token-in-use", "Token {player.token} already in use"),
    ("errors.invalid-token", "Invalid token {player.token}"),
    ("errors.bank-insufficient", "Bank has insufficient funds"),
    (
        "errors.insufficient-balance",
        "{player.name} has an insufficient balance",
    ),
    ("errors.negative-amount", "Amount must not be negative"),
    ("errors.same-player", "Cannot target yourself"),
    ("errors.property-not-found", "Unknown property"),
    (
        "errors.property-owned",
        "{property.name} already has an owner",
    ),
    (
        "errors.not-own-property",
        "{player.name} does not own {property.name}",
    ),
    (
        "errors.own-property",
        "{player.name} already owns {property.name}",
    ),
    ("errors.cannot-improve", "Cannot improve a {group} property"),
    ("errors.not-monopoly", "{group} is not a monopoly"),
    ("errors.fully-improved", "{property.name} is fully improved"),
    ("errors.not-improved", "{property.name} is not improved"),
    ("errors.build-evenly", "Must build the {group} group evenly"),
    (
        "errors.unimprove-evenly",
        "Must unimprove the {group} group evenly",
    ),
    ("errors.houses-unavailable", "Not enough houses available"),
    ("errors.hotels-unavailable", "Not enough hotels available"),
    ("errors.is-mortgaged", "{property.name} is mortgaged"),
    ("errors.not-mortgaged", "{property.name} is not mortgaged"),
    (
        "errors.has-improvements",
        "{player.name} still has improved properties",
    ),
    (
        "errors.has-unmortgaged",
        "{player.name} still has unmortgaged properties",
    ),
    (
        "errors.auction-in-progress",
        "An auction is already in progress",
    ),
    ("errors.no-auction", "There is no open auction"),
    (
        "errors.bid-too-low",
        "Bid must exceed the current highest bid",
    ),
    (
        "errors.already-conceded",
        "{player.name} has already conceded",
    ),
    ("errors.trade-not-found", "Trade not found"),
    (
        "errors.trade-exists",
        "A trade with {other.name} is already pending",
    ),
    (
        "errors.not-party",
        "{player.name} is not part of this trade",
    ),
];

impl Templates {
    /// The builtin English table.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            map: BUILTIN
                .iter()
                .map(|&(k, v)| (k.to_owned(), v.to_owned()))
                .collect(),
        }
    }

    /// Build from a collaborator-supplied table.
    #[must_use]
    pub fn from_map(map: BTreeMap<String, String>) -> Self {
        Self { map }
    }

    /// Render the template at `key` with `{path}` placeholders replaced
    /// from `vars`.
    ///
    /// A missing key is a collaborator contract violation, not a core
    /// error: the key itself is returned so the caller still gets a
    /// stable string. Unknown placeholders are left in place.
    #[must_use]
    pub fn render(&self, key: &str, vars: &BTreeMap<&str, String>) -> String {
        let Some(template) = self.map.get(key) else {
            return key.to_owned();
        };
        interpolate(template, vars)
    }
}

impl Default for Templates {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Replace `{path}` placeholders in `template` with values from `vars`.
fn interpolate(template: &str, vars: &BTreeMap<&str, String>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open..];
        if let Some(close) = after.find('}') {
            let path = &after[1..close];
            match vars.get(path) {
                Some(value) => out.push_str(value),
                None => out.push_str(&after[..=close]),
            }
            rest = &after[close + 1..];
        } else {
            out.push_str(after);
            rest = "";
        }
    }
    out.push_str(rest);
    out
}
