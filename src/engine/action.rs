//! The action vocabulary.
//!
//! Actions arrive over the wire as JSON objects tagged by a
//! SCREAMING_SNAKE `type` field. Unknown types are inert no-ops: the
//! decoder surfaces them as `None` so callers leave the state untouched
//! without raising an error.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::game::{Money, TradeSide};

/// A player-submitted action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Action {
    /// A player joins the game, drawing the starting balance from the
    /// bank.
    #[serde(rename = "JOIN_GAME")]
    JoinGame {
        /// Display name.
        name: String,
        /// Token to join with, from the configured set.
        token: String,
    },

    /// The bank pays a player.
    #[serde(rename = "MAKE_TRANSFER_TO")]
    MakeTransferTo {
        /// Receiving player.
        token: String,
        /// Amount to transfer.
        amount: Money,
    },

    /// A player pays the bank.
    #[serde(rename = "MAKE_TRANSFER_FROM")]
    MakeTransferFrom {
        /// Paying player.
        token: String,
        /// Amount to transfer.
        amount: Money,
    },

    /// A player pays another player.
    #[serde(rename = "MAKE_TRANSFER_WITH")]
    MakeTransferWith {
        /// Paying player.
        token: String,
        /// Receiving player.
        other: String,
        /// Amount to transfer.
        amount: Money,
    },

    /// A player exits the game, settling assets with another player or
    /// the bank.
    #[serde(rename = "CLAIM_BANKRUPTCY")]
    ClaimBankruptcy {
        /// The bankrupt player.
        token: String,
        /// Settlement target; the bank when absent.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        other: Option<String>,
    },

    /// A player buys an unowned property from the bank.
    #[serde(rename = "BUY_PROPERTY")]
    BuyProperty {
        /// Buying player.
        token: String,
        /// Property id.
        property: String,
        /// Purchase amount; defaults to the listed price.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        amount: Option<Money>,
    },

    /// A player adds a building to a property.
    #[serde(rename = "IMPROVE_PROPERTY")]
    ImproveProperty {
        /// Owning player.
        token: String,
        /// Property id.
        property: String,
    },

    /// A player removes a building from a property.
    #[serde(rename = "UNIMPROVE_PROPERTY")]
    UnimproveProperty {
        /// Owning player.
        token: String,
        /// Property id.
        property: String,
    },

    /// A player sells every building in one of their groups at once,
    /// collecting the summed refunds in a single atomic step.
    #[serde(rename = "UNIMPROVE_GROUP")]
    UnimproveGroup {
        /// Owning player.
        token: String,
        /// Group name.
        group: String,
    },

    /// A player mortgages a property for immediate cash.
    #[serde(rename = "MORTGAGE_PROPERTY")]
    MortgageProperty {
        /// Owning player.
        token: String,
        /// Property id.
        property: String,
    },

    /// A player lifts a mortgage, paying principal plus interest.
    #[serde(rename = "UNMORTGAGE_PROPERTY")]
    UnmortgageProperty {
        /// Owning player.
        token: String,
        /// Property id.
        property: String,
    },

    /// A player pays rent to a property's owner.
    #[serde(rename = "PAY_RENT")]
    PayRent {
        /// Paying player.
        token: String,
        /// Property id.
        property: String,
        /// Dice total scaling utility rent; supplied by the caller,
        /// never stored. Ignored for other groups.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        dice: Option<u32>,
    },

    /// Open an auction for an unowned property.
    #[serde(rename = "NEW_AUCTION")]
    NewAuction {
        /// Property id.
        property: String,
    },

    /// A player bids in the open auction.
    #[serde(rename = "BID")]
    Bid {
        /// Bidding player.
        token: String,
        /// Bid amount; must exceed the current highest bid.
        amount: Money,
    },

    /// A player withdraws from the open auction.
    #[serde(rename = "CONCEDE_AUCTION")]
    ConcedeAuction {
        /// Conceding player.
        token: String,
    },

    /// Close the open auction, selling to the highest bidder if any.
    #[serde(rename = "CLOSE_AUCTION")]
    CloseAuction,

    /// A player proposes a trade with another player.
    #[serde(rename = "NEW_TRADE")]
    NewTrade {
        /// Proposing player.
        token: String,
        /// Counterparty.
        other: String,
        /// What the proposer gives up.
        #[serde(default)]
        offer: TradeSide,
        /// What the proposer asks for.
        #[serde(default)]
        request: TradeSide,
    },

    /// Either party discards a pending trade.
    #[serde(rename = "DECLINE_TRADE")]
    DeclineTrade {
        /// Declining player.
        token: String,
        /// Trade id.
        trade: String,
    },

    /// The counterparty accepts a pending trade; assets swap atomically.
    #[serde(rename = "ACCEPT_OFFER")]
    AcceptOffer {
        /// Accepting player (must be the counterparty).
        token: String,
        /// Trade id.
        trade: String,
    },
}

/// Action discriminant, used to key the rule table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    /// `JOIN_GAME`
    JoinGame,
    /// `MAKE_TRANSFER_TO`
    MakeTransferTo,
    /// `MAKE_TRANSFER_FROM`
    MakeTransferFrom,
    /// `MAKE_TRANSFER_WITH`
    MakeTransferWith,
    /// `CLAIM_BANKRUPTCY`
    ClaimBankruptcy,
    /// `BUY_PROPERTY`
    BuyProperty,
    /// `IMPROVE_PROPERTY`
    ImproveProperty,
    /// `UNIMPROVE_PROPERTY`
    UnimproveProperty,
    /// `UNIMPROVE_GROUP`
    UnimproveGroup,
    /// `MORTGAGE_PROPERTY`
    MortgageProperty,
    /// `UNMORTGAGE_PROPERTY`
    UnmortgageProperty,
    /// `PAY_RENT`
    PayRent,
    /// `NEW_AUCTION`
    NewAuction,
    /// `BID`
    Bid,
    /// `CONCEDE_AUCTION`
    ConcedeAuction,
    /// `CLOSE_AUCTION`
    CloseAuction,
    /// `NEW_TRADE`
    NewTrade,
    /// `DECLINE_TRADE`
    DeclineTrade,
    /// `ACCEPT_OFFER`
    AcceptOffer,
}

/// Wire names of every known action type.
const WIRE_TYPES: &[&str] = &[
    "JOIN_GAME",
    "MAKE_TRANSFER_TO",
    "MAKE_TRANSFER_FROM",
    "MAKE_TRANSFER_WITH",
    "CLAIM_BANKRUPTCY",
    "BUY_PROPERTY",
    "IMPROVE_PROPERTY",
    "UNIMPROVE_PROPERTY",
    "UNIMPROVE_GROUP",
    "MORTGAGE_PROPERTY",
    "UNMORTGAGE_PROPERTY",
    "PAY_RENT",
    "NEW_AUCTION",
    "BID",
    "CONCEDE_AUCTION",
    "CLOSE_AUCTION",
    "NEW_TRADE",
    "DECLINE_TRADE",
    "ACCEPT_OFFER",
];

impl Action {
    /// The action's discriminant.
    #[must_use]
    pub fn kind(&self) -> ActionKind {
        match self {
            Self::JoinGame { .. } => ActionKind::JoinGame,
            Self::MakeTransferTo { .. } => ActionKind::MakeTransferTo,
            Self::MakeTransferFrom { .. } => ActionKind::MakeTransferFrom,
            Self::MakeTransferWith { .. } => ActionKind::MakeTransferWith,
            Self::ClaimBankruptcy { .. } => ActionKind::ClaimBankruptcy,
            Self::BuyProperty { .. } => ActionKind::BuyProperty,
            Self::ImproveProperty { .. } => ActionKind::ImproveProperty,
            Self::UnimproveProperty { .. } => ActionKind::UnimproveProperty,
            Self::UnimproveGroup { .. } => ActionKind::UnimproveGroup,
            Self::MortgageProperty { .. } => ActionKind::MortgageProperty,
            Self::UnmortgageProperty { .. } => ActionKind::UnmortgageProperty,
            Self::PayRent { .. } => ActionKind::PayRent,
            Self::NewAuction { .. } => ActionKind::NewAuction,
            Self::Bid { .. } => ActionKind::Bid,
            Self::ConcedeAuction { .. } => ActionKind::ConcedeAuction,
            Self::CloseAuction => ActionKind::CloseAuction,
            Self::NewTrade { .. } => ActionKind::NewTrade,
            Self::DeclineTrade { .. } => ActionKind::DeclineTrade,
            Self::AcceptOffer { .. } => ActionKind::AcceptOffer,
        }
    }

    /// Decode a wire action.
    ///
    /// Returns `Ok(None)` when the `type` tag is missing or unknown
    /// (inert no-op). Malformed payloads for known types are decode
    /// errors.
    ///
    /// # Errors
    ///
    /// Returns a JSON error if a known action type carries a malformed
    /// payload.
    pub fn from_value(value: &Value) -> Result<Option<Self>, serde_json::Error> {
        let Some(kind) = value.get("type").and_then(Value::as_str) else {
            return Ok(None);
        };
        if !WIRE_TYPES.contains(&kind) {
            return Ok(None);
        }
        serde_json::from_value(value.clone()).map(Some)
    }
}
