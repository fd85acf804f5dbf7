//! Resolved action context.
//!
//! Before any rule runs, the dispatcher resolves every reference an
//! action carries (player, counterparty, property, trade, open auction)
//! against the current snapshot, and computes the monetary amount the
//! action moves. Rules and reducers read the resolved context instead of
//! re-deriving it, so every stage of the pipeline agrees on the same
//! values.
//!
//! Missing references resolve to `None` rather than failing here; the
//! presence rules at the head of each rule list turn them into the
//! appropriate violations.

use crate::game::{
    trade_id, Auction, Config, GameState, Money, Player, Property, Trade, TradeSide,
    GROUP_UTILITY,
};

use crate::engine::action::Action;

/// References and inputs resolved from one action against one snapshot.
#[derive(Debug)]
pub struct Meta<'a> {
    /// The snapshot the action is applied to.
    pub state: &'a GameState,
    /// The room's static configuration.
    pub config: &'a Config,
    /// The acting player's token, as given in the action.
    pub token: Option<&'a str>,
    /// The acting player, when the token resolves.
    pub player: Option<&'a Player>,
    /// The counterparty token, as given (or derived from a trade).
    pub other_token: Option<&'a str>,
    /// The counterparty, when the token resolves.
    pub other: Option<&'a Player>,
    /// The referenced property, when the id resolves.
    pub property: Option<&'a Property>,
    /// Every property in the referenced group, in id order. Derived
    /// from the referenced property, or named directly by the action.
    pub group: Vec<&'a Property>,
    /// The referenced pending trade. For `NEW_TRADE` this is the
    /// already-pending trade for the same pair, if any.
    pub trade: Option<&'a Trade>,
    /// The open auction, if any.
    pub auction: Option<&'a Auction>,
    /// What the initiator gives up, for trade actions.
    pub offer: Option<&'a TradeSide>,
    /// What the initiator asks for, for trade actions.
    pub request: Option<&'a TradeSide>,
    /// Caller-supplied dice total scaling utility rent.
    pub dice: Option<u32>,
    /// The amount the action moves, resolved by [`resolve_amount`].
    pub amount: Money,
}

impl<'a> Meta<'a> {
    /// Resolve an action's references against a snapshot.
    #[must_use]
    pub fn build(state: &'a GameState, config: &'a Config, action: &'a Action) -> Self {
        let mut meta = Self {
            state,
            config,
            token: None,
            player: None,
            other_token: None,
            other: None,
            property: None,
            group: Vec::new(),
            trade: None,
            auction: state.auction.as_ref(),
            offer: None,
            request: None,
            dice: None,
            amount: 0,
        };

        match action {
            Action::JoinGame { token, .. }
            | Action::MakeTransferTo { token, .. }
            | Action::MakeTransferFrom { token, .. }
            | Action::ConcedeAuction { token } => {
                meta.token = Some(token);
            }
            Action::MakeTransferWith { token, other, .. } => {
                meta.token = Some(token);
                meta.other_token = Some(other);
            }
            Action::ClaimBankruptcy { token, other } => {
                meta.token = Some(token);
                // A missing or "bank" counterparty settles with the bank.
                meta.other_token = other.as_deref().filter(|t| *t != "bank");
            }
            Action::BuyProperty {
                token, property, ..
            }
            | Action::ImproveProperty { token, property }
            | Action::UnimproveProperty { token, property }
            | Action::MortgageProperty { token, property }
            | Action::UnmortgageProperty { token, property } => {
                meta.token = Some(token);
                meta.property = state.property(property);
            }
            Action::PayRent {
                token,
                property,
                dice,
            } => {
                meta.token = Some(token);
                meta.property = state.property(property);
                meta.dice = *dice;
            }
            Action::UnimproveGroup { token, group } => {
                meta.token = Some(token);
                meta.group = state.group(group);
            }
            Action::NewAuction { property } => {
                meta.property = state.property(property);
            }
            Action::Bid { token, .. } => {
                meta.token = Some(token);
            }
            Action::CloseAuction => {}
            Action::NewTrade {
                token,
                other,
                offer,
                request,
            } => {
                meta.token = Some(token);
                meta.other_token = Some(other);
                meta.trade = state.trade(&trade_id(token, other));
                meta.offer = Some(offer);
                meta.request = Some(request);
            }
            Action::DeclineTrade { token, trade } | Action::AcceptOffer { token, trade } => {
                meta.token = Some(token);
                meta.trade = state.trade(trade);
                if let Some(trade) = meta.trade {
                    meta.other_token = Some(if trade.initiator == *token {
                        &trade.counterparty
                    } else {
                        &trade.initiator
                    });
                    meta.offer = Some(&trade.offer);
                    meta.request = Some(&trade.request);
                }
            }
        }

        // Auction actions reference the auctioned property implicitly.
        if matches!(
            action,
            Action::Bid { .. } | Action::ConcedeAuction { .. } | Action::CloseAuction
        ) {
            meta.property = meta.auction.and_then(|a| state.property(&a.property));
        }

        meta.player = meta.token.and_then(|t| state.player(t));
        meta.other = meta.other_token.and_then(|t| state.player(t));
        if let Some(property) = meta.property {
            meta.group = state.group(&property.group);
        }

        meta
    }
}

/// A monetary amount carried by an action: either a literal from the
/// wire payload or a function of the resolved context.
#[derive(Debug, Clone, Copy)]
pub enum Calc {
    /// The amount is taken verbatim from the action.
    Literal(Money),
    /// The amount is derived from the resolved context.
    Computed(fn(&Meta<'_>) -> Option<Money>),
}

impl Calc {
    /// Resolve against the context. Computed amounts whose inputs are
    /// missing resolve to `0`; the presence rules reject those actions
    /// before the amount is ever used.
    #[must_use]
    pub fn resolve(&self, meta: &Meta<'_>) -> Money {
        match self {
            Self::Literal(amount) => *amount,
            Self::Computed(f) => f(meta).unwrap_or(0),
        }
    }
}

/// The amount each action moves.
#[must_use]
pub fn amount_calc(action: &Action) -> Calc {
    match action {
        Action::JoinGame { .. } => Calc::Computed(starting_balance),
        Action::MakeTransferTo { amount, .. }
        | Action::MakeTransferFrom { amount, .. }
        | Action::MakeTransferWith { amount, .. }
        | Action::Bid { amount, .. } => Calc::Literal(*amount),
        Action::ClaimBankruptcy { .. } => Calc::Computed(player_balance),
        Action::BuyProperty {
            amount: Some(amount),
            ..
        } => Calc::Literal(*amount),
        Action::BuyProperty { amount: None, .. } => Calc::Computed(purchase_price),
        Action::ImproveProperty { .. } => Calc::Computed(build_cost),
        Action::UnimproveProperty { .. } => Calc::Computed(building_refund),
        Action::UnimproveGroup { .. } => Calc::Computed(group_refund),
        Action::MortgageProperty { .. } => Calc::Computed(mortgage_principal),
        Action::UnmortgageProperty { .. } => Calc::Computed(unmortgage_cost),
        Action::PayRent { .. } => Calc::Computed(rent_due),
        Action::CloseAuction => Calc::Computed(winning_bid),
        Action::NewAuction { .. }
        | Action::ConcedeAuction { .. }
        | Action::NewTrade { .. }
        | Action::DeclineTrade { .. }
        | Action::AcceptOffer { .. } => Calc::Literal(0),
    }
}

/// Resolve the amount an action moves against its context.
#[must_use]
pub fn resolve_amount(action: &Action, meta: &Meta<'_>) -> Money {
    amount_calc(action).resolve(meta)
}

fn starting_balance(meta: &Meta<'_>) -> Option<Money> {
    Some(meta.config.player_start)
}

fn player_balance(meta: &Meta<'_>) -> Option<Money> {
    meta.player.map(|p| p.balance)
}

fn purchase_price(meta: &Meta<'_>) -> Option<Money> {
    meta.property.map(|p| p.costs.price)
}

fn build_cost(meta: &Meta<'_>) -> Option<Money> {
    meta.property.map(|p| p.costs.build)
}

fn building_refund(meta: &Meta<'_>) -> Option<Money> {
    meta.property
        .map(|p| p.building_value(&meta.config.rates))
}

/// Refund for liquidating a whole group: the per-building resale value
/// summed over every building in the group, a hotel counting as five.
fn group_refund(meta: &Meta<'_>) -> Option<Money> {
    let rates = &meta.config.rates;
    Some(
        meta.group
            .iter()
            .map(|p| Money::from(p.buildings) * p.building_value(rates))
            .sum(),
    )
}

fn mortgage_principal(meta: &Meta<'_>) -> Option<Money> {
    meta.property
        .map(|p| p.mortgage_value(&meta.config.rates))
}

fn unmortgage_cost(meta: &Meta<'_>) -> Option<Money> {
    let rates = &meta.config.rates;
    meta.property
        .map(|p| p.mortgage_value(rates) + p.interest(rates))
}

fn rent_due(meta: &Meta<'_>) -> Option<Money> {
    let property = meta.property?;
    let rent = meta.state.rent(&property.id)?;
    if property.group == GROUP_UTILITY {
        Some(rent * Money::from(meta.dice.unwrap_or(0)))
    } else {
        Some(rent)
    }
}

fn winning_bid(meta: &Meta<'_>) -> Option<Money> {
    Some(meta.auction?.highest().map_or(0, |bid| bid.amount))
}
