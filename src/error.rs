//! Rule-violation errors raised by the dispatch pipeline.
//!
//! There is exactly one error category at the engine boundary: a rule
//! violation. Every violation is recoverable - the caller keeps the
//! untouched input state and may retry with a corrected action. Malformed
//! references (unknown player, property, or trade) are violations too,
//! never panics.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable identifier for a rule violation.
///
/// The key form (`RuleErrorKind::key`) selects the `errors.<key>` message
/// template and is safe to match on across versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RuleErrorKind {
    /// The referenced player has not joined the game.
    PlayerNotFound,
    /// The acting player has already gone bankrupt.
    Bankrupt,
    /// Another player already joined with this token.
    TokenInUse,
    /// The token is not part of the configured token set.
    InvalidToken,
    /// The bank cannot cover the requested amount.
    BankInsufficient,
    /// The paying player cannot cover the requested amount.
    InsufficientBalance,
    /// A transfer amount was negative.
    NegativeAmount,
    /// Two distinct players were required but one token was given twice.
    SamePlayer,
    /// The referenced property does not exist.
    PropertyNotFound,
    /// The property already has an owner.
    PropertyOwned,
    /// The acting player does not own the property.
    NotPropertyOwner,
    /// The acting player owns the property themselves.
    OwnProperty,
    /// Railroads and utilities cannot carry buildings.
    CannotImprove,
    /// The property's group is not a monopoly.
    NotMonopoly,
    /// The property already carries a hotel.
    FullyImproved,
    /// The property carries no buildings to remove.
    NotImproved,
    /// Adding a building would break the even-building rule.
    BuildEvenly,
    /// Removing a building would break the even-building rule.
    UnimproveEvenly,
    /// The shared house pool cannot cover the action.
    HousesUnavailable,
    /// The shared hotel pool cannot cover the action.
    HotelsUnavailable,
    /// The property is mortgaged.
    IsMortgaged,
    /// The property is not mortgaged.
    NotMortgaged,
    /// A property in the group carries buildings.
    HasImprovements,
    /// The player still holds unmortgaged properties.
    HasUnmortgaged,
    /// An auction is already in progress.
    AuctionInProgress,
    /// No auction is currently open.
    NoAuction,
    /// The bid does not exceed the current highest bid.
    BidTooLow,
    /// The player already conceded this auction.
    AlreadyConceded,
    /// The referenced trade does not exist.
    TradeNotFound,
    /// A trade between these players is already pending.
    TradeExists,
    /// The acting player is not a party to the trade.
    NotParty,
}

impl RuleErrorKind {
    /// Stable kebab-case key, used for `errors.<key>` template lookups.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::PlayerNotFound => "player-not-found",
            Self::Bankrupt => "bankrupt",
            Self::TokenInUse => "token-in-use",
            Self::InvalidToken => "invalid-token",
            Self::BankInsufficient => "bank-insufficient",
            Self::InsufficientBalance => "insufficient-balance",
            Self::NegativeAmount => "negative-amount",
            Self::SamePlayer => "same-player",
            Self::PropertyNotFound => "property-not-found",
            Self::PropertyOwned => "property-owned",
            Self::NotPropertyOwner => "not-own-property",
            Self::OwnProperty => "own-property",
            Self::CannotImprove => "cannot-improve",
            Self::NotMonopoly => "not-monopoly",
            Self::FullyImproved => "fully-improved",
            Self::NotImproved => "not-improved",
            Self::BuildEvenly => "build-evenly",
            Self::UnimproveEvenly => "unimprove-evenly",
            Self::HousesUnavailable => "houses-unavailable",
            Self::HotelsUnavailable => "hotels-unavailable",
            Self::IsMortgaged => "is-mortgaged",
            Self::NotMortgaged => "not-mortgaged",
            Self::HasImprovements => "has-improvements",
            Self::HasUnmortgaged => "has-unmortgaged",
            Self::AuctionInProgress => "auction-in-progress",
            Self::NoAuction => "no-auction",
            Self::BidTooLow => "bid-too-low",
            Self::AlreadyConceded => "already-conceded",
            Self::TradeNotFound => "trade-not-found",
            Self::TradeExists => "trade-exists",
            Self::NotParty => "not-party",
        }
    }
}

/// A rejected action: the violated rule plus a templated message.
///
/// The message is rendered from the room's `errors.<key>` template against
/// the resolved action context, so it is ready for presentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleError {
    /// Which rule was violated.
    pub kind: RuleErrorKind,
    /// Human-readable message, interpolated from the room templates.
    pub message: String,
}

impl RuleError {
    /// Create a rule error with an already-rendered message.
    #[must_use]
    pub fn new(kind: RuleErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for RuleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for RuleError {}

/// Result type for rule checks and dispatch.
pub type RuleResult<T> = Result<T, RuleError>;
