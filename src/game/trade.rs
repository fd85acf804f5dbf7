//! Player-to-player trades.

use serde::{Deserialize, Serialize};

use crate::game::player::Token;
use crate::game::Money;

/// One side of a trade: properties and cash moving in one direction.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TradeSide {
    /// Property ids changing hands.
    #[serde(default)]
    pub properties: Vec<String>,
    /// Cash moving alongside the properties.
    #[serde(default)]
    pub amount: Money,
}

/// A pending trade between two players.
///
/// Trades are immutable once created; a single settling action either
/// accepts (atomic multi-asset swap) or declines (discard) them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trade {
    /// Deterministic id: `"{initiator}:{counterparty}"`. One pending
    /// trade is allowed per ordered pair.
    pub id: String,
    /// The proposing player.
    pub initiator: Token,
    /// The player who may accept or decline.
    pub counterparty: Token,
    /// What the initiator gives up.
    pub offer: TradeSide,
    /// What the initiator asks for in return.
    pub request: TradeSide,
}

/// Deterministic trade id for an ordered player pair.
#[must_use]
pub fn trade_id(initiator: &str, counterparty: &str) -> String {
    format!("{initiator}:{counterparty}")
}

impl Trade {
    /// Create a pending trade between two players.
    #[must_use]
    pub fn new(
        initiator: impl Into<Token>,
        counterparty: impl Into<Token>,
        offer: TradeSide,
        request: TradeSide,
    ) -> Self {
        let initiator = initiator.into();
        let counterparty = counterparty.into();
        Self {
            id: trade_id(&initiator, &counterparty),
            initiator,
            counterparty,
            offer,
            request,
        }
    }

    /// Whether the token belongs to either party of the trade.
    #[must_use]
    pub fn is_party(&self, token: &str) -> bool {
        self.initiator == token || self.counterparty == token
    }
}
