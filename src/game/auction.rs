//! Auctions for unowned properties.

use serde::{Deserialize, Serialize};

use crate::game::player::Token;
use crate::game::Money;

/// A single bid in an open auction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bid {
    /// The bidding player.
    pub token: Token,
    /// The amount bid.
    pub amount: Money,
}

/// An open auction for a bank-owned property.
///
/// At most one auction exists per room; it lives in
/// `GameState::auction` while open and the slot is cleared on close.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Auction {
    /// The property being auctioned.
    pub property: String,
    /// Bid history in submission order. Rules force each bid to exceed
    /// the previous highest, so the last entry is the winning candidate.
    pub bids: Vec<Bid>,
    /// Players who have withdrawn from the auction.
    pub conceded: Vec<Token>,
}

impl Auction {
    /// Open a new auction for a property.
    #[must_use]
    pub fn new(property: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            bids: Vec::new(),
            conceded: Vec::new(),
        }
    }

    /// The current highest bid, if anyone has bid.
    #[must_use]
    pub fn highest(&self) -> Option<&Bid> {
        self.bids.iter().max_by_key(|bid| bid.amount)
    }

    /// Whether the player has conceded this auction.
    #[must_use]
    pub fn has_conceded(&self, token: &str) -> bool {
        self.conceded.iter().any(|t| t == token)
    }
}
