//! State reducers.
//!
//! Once an action passes its rule list, the dispatcher snapshots
//! everything the transition needs into a [`Resolution`] and hands a
//! cloned state to the slice reducers. Each reducer owns one slice of
//! the snapshot (players, properties, bank, building pool, auction,
//! trades) and applies the action without consulting the others; the
//! resolution carries every cross-slice value so no reducer depends on
//! another having run first.
//!
//! Reducers assume a validated action. They guard lookups with `if let`
//! rather than panicking, so a reducer fed an unvalidated action
//! degrades to a partial no-op instead of poisoning the process.

use std::collections::BTreeMap;

use crate::engine::action::Action;
use crate::engine::meta::Meta;
use crate::game::{
    improvement_plan, unimprovement_plan, Auction, Bid, GameState, ImprovementPlan, Money,
    Owner, Player, Property, Token, Trade,
};

/// Cross-slice values resolved from a validated action.
#[derive(Debug, Clone, Default)]
pub struct Resolution {
    /// The amount the action moves.
    pub amount: Money,
    /// Settlement target for a bankruptcy claim.
    pub beneficiary: Owner,
    /// Recipient of a rent payment.
    pub recipient: Owner,
    /// Winning bid when closing an auction.
    pub winner: Option<Bid>,
    /// The auctioned property id, for auction-closing actions.
    pub auction_property: Option<String>,
    /// Whether this action closes the auction without a sale.
    pub unsold: bool,
    /// Building-pool adjustment for improvement actions.
    pub plan: ImprovementPlan,
    /// Snapshot of the trade being settled.
    pub trade: Option<Trade>,
}

impl Resolution {
    /// Resolve the cross-slice values for a validated action.
    #[must_use]
    pub fn from_meta(action: &Action, meta: &Meta<'_>) -> Self {
        let mut res = Self {
            amount: meta.amount,
            ..Self::default()
        };

        match action {
            Action::ClaimBankruptcy { .. } => {
                res.beneficiary = meta
                    .other_token
                    .map_or(Owner::Bank, |t| Owner::Player(t.to_owned()));
            }
            Action::PayRent { .. } => {
                if let Some(property) = meta.property {
                    res.recipient = property.owner.clone();
                }
            }
            Action::ImproveProperty { .. } => {
                if let Some(property) = meta.property {
                    res.plan = improvement_plan(property.buildings);
                }
            }
            Action::UnimproveProperty { .. } => {
                if let Some(property) = meta.property {
                    res.plan = unimprovement_plan(property.buildings);
                }
            }
            Action::UnimproveGroup { .. } => {
                // Bulk liquidation: hotels go straight back to the hotel
                // pool, never through the four-house swap.
                for property in &meta.group {
                    if property.is_fully_improved() {
                        res.plan.hotels -= 1;
                    } else {
                        res.plan.houses -= i32::from(property.buildings);
                    }
                }
            }
            Action::CloseAuction => {
                if let Some(auction) = meta.auction {
                    res.winner = auction.highest().cloned();
                    res.auction_property = Some(auction.property.clone());
                    res.unsold = res.winner.is_none();
                }
            }
            Action::ConcedeAuction { .. } => {
                // The auction dies unsold once every solvent player has
                // conceded; conceding drops the player's own bids, so no
                // live bid can remain.
                if let Some(auction) = meta.auction {
                    res.unsold = meta
                        .state
                        .players
                        .values()
                        .filter(|p| !p.bankrupt)
                        .all(|p| {
                            auction.has_conceded(&p.token)
                                || meta.token == Some(p.token.as_str())
                        });
                }
            }
            Action::DeclineTrade { .. } | Action::AcceptOffer { .. } => {
                res.trade = meta.trade.cloned();
            }
            _ => {}
        }

        res
    }
}

/// Apply a validated action to a snapshot, slice by slice.
pub(crate) fn apply(state: &mut GameState, action: &Action, res: &Resolution) {
    reduce_players(&mut state.players, action, res);
    reduce_properties(&mut state.properties, action, res);
    reduce_bank(&mut state.bank, action, res);
    reduce_pool(&mut state.houses, &mut state.hotels, action, res);
    reduce_auction(&mut state.auction, action, res);
    reduce_trades(&mut state.trades, action);
}

fn reduce_players(players: &mut BTreeMap<Token, Player>, action: &Action, res: &Resolution) {
    match action {
        Action::JoinGame { name, token } => {
            players.insert(token.clone(), Player::new(name, token, res.amount));
        }
        Action::MakeTransferTo { token, .. }
        | Action::UnimproveProperty { token, .. }
        | Action::UnimproveGroup { token, .. }
        | Action::MortgageProperty { token, .. } => {
            if let Some(player) = players.get_mut(token) {
                player.credit(res.amount);
            }
        }
        Action::MakeTransferFrom { token, .. }
        | Action::BuyProperty { token, .. }
        | Action::ImproveProperty { token, .. }
        | Action::UnmortgageProperty { token, .. } => {
            if let Some(player) = players.get_mut(token) {
                player.debit(res.amount);
            }
        }
        Action::MakeTransferWith { token, other, .. } => {
            if let Some(player) = players.get_mut(token) {
                player.debit(res.amount);
            }
            if let Some(other) = players.get_mut(other) {
                other.credit(res.amount);
            }
        }
        Action::ClaimBankruptcy { token, .. } => {
            if let Owner::Player(beneficiary) = &res.beneficiary
                && let Some(other) = players.get_mut(beneficiary)
            {
                other.credit(res.amount);
            }
            if let Some(player) = players.get_mut(token) {
                player.go_bankrupt();
            }
        }
        Action::PayRent { token, .. } => {
            if let Some(player) = players.get_mut(token) {
                player.debit(res.amount);
            }
            if let Owner::Player(owner) = &res.recipient
                && let Some(owner) = players.get_mut(owner)
            {
                owner.credit(res.amount);
            }
        }
        Action::CloseAuction => {
            if let Some(winner) = &res.winner
                && let Some(player) = players.get_mut(&winner.token)
            {
                player.debit(winner.amount);
            }
        }
        Action::AcceptOffer { .. } => {
            if let Some(trade) = &res.trade {
                // Net cash from the initiator's perspective.
                let net = trade.request.amount - trade.offer.amount;
                settle(players, &trade.initiator, net);
                settle(players, &trade.counterparty, -net);
            }
        }
        _ => {}
    }
}

/// Apply a signed net to a balance, skipping zero so cash-less actions
/// leave the balance history untouched.
fn settle(players: &mut BTreeMap<Token, Player>, token: &str, net: Money) {
    if net == 0 {
        return;
    }
    if let Some(player) = players.get_mut(token) {
        if net > 0 {
            player.credit(net);
        } else {
            player.debit(-net);
        }
    }
}

fn reduce_properties(
    properties: &mut BTreeMap<String, Property>,
    action: &Action,
    res: &Resolution,
) {
    match action {
        Action::BuyProperty {
            token, property, ..
        } => {
            if let Some(property) = properties.get_mut(property) {
                property.owner = Owner::Player(token.clone());
            }
        }
        Action::ImproveProperty { property, .. } => {
            if let Some(property) = properties.get_mut(property) {
                property.buildings += 1;
            }
        }
        Action::UnimproveProperty { property, .. } => {
            if let Some(property) = properties.get_mut(property) {
                property.buildings -= 1;
            }
        }
        Action::UnimproveGroup { group, .. } => {
            for property in properties.values_mut() {
                if property.group == *group {
                    property.buildings = 0;
                }
            }
        }
        Action::MortgageProperty { property, .. } => {
            if let Some(property) = properties.get_mut(property) {
                property.mortgaged = true;
            }
        }
        Action::UnmortgageProperty { property, .. } => {
            if let Some(property) = properties.get_mut(property) {
                property.mortgaged = false;
            }
        }
        Action::ClaimBankruptcy { token, .. } => {
            // The whole estate moves; mortgage flags travel with it.
            for property in properties.values_mut() {
                if property.owner.token() == Some(token) {
                    property.owner = res.beneficiary.clone();
                }
            }
        }
        Action::CloseAuction => {
            if let Some(id) = &res.auction_property
                && let Some(winner) = &res.winner
                && let Some(property) = properties.get_mut(id)
            {
                property.owner = Owner::Player(winner.token.clone());
            }
        }
        Action::AcceptOffer { .. } => {
            if let Some(trade) = &res.trade {
                for id in &trade.offer.properties {
                    if let Some(property) = properties.get_mut(id) {
                        property.owner = Owner::Player(trade.counterparty.clone());
                    }
                }
                for id in &trade.request.properties {
                    if let Some(property) = properties.get_mut(id) {
                        property.owner = Owner::Player(trade.initiator.clone());
                    }
                }
            }
        }
        _ => {}
    }
}

fn reduce_bank(bank: &mut Money, action: &Action, res: &Resolution) {
    match action {
        Action::JoinGame { .. }
        | Action::MakeTransferTo { .. }
        | Action::UnimproveProperty { .. }
        | Action::UnimproveGroup { .. }
        | Action::MortgageProperty { .. } => *bank -= res.amount,
        Action::MakeTransferFrom { .. }
        | Action::BuyProperty { .. }
        | Action::ImproveProperty { .. }
        | Action::UnmortgageProperty { .. } => *bank += res.amount,
        // Bankruptcy to the bank is a write-off, not a transfer: the
        // balance vanishes from the ledger and the bank gains nothing.
        Action::PayRent { .. } => {
            if res.recipient == Owner::Bank {
                *bank += res.amount;
            }
        }
        Action::CloseAuction => {
            if res.winner.is_some() {
                *bank += res.amount;
            }
        }
        _ => {}
    }
}

fn reduce_pool(houses: &mut u32, hotels: &mut u32, action: &Action, res: &Resolution) {
    if matches!(
        action,
        Action::ImproveProperty { .. }
            | Action::UnimproveProperty { .. }
            | Action::UnimproveGroup { .. }
    ) {
        draw(houses, res.plan.houses);
        draw(hotels, res.plan.hotels);
    }
}

/// Take from (positive) or return to (negative) a pool counter. The pool
/// rules guarantee positive draws are covered.
fn draw(pool: &mut u32, count: i32) {
    if count >= 0 {
        *pool -= count.unsigned_abs();
    } else {
        *pool += count.unsigned_abs();
    }
}

fn reduce_auction(auction: &mut Option<Auction>, action: &Action, res: &Resolution) {
    match action {
        Action::NewAuction { property } => {
            *auction = Some(Auction::new(property.clone()));
        }
        Action::Bid { token, amount } => {
            if let Some(auction) = auction {
                auction.bids.push(Bid {
                    token: token.clone(),
                    amount: *amount,
                });
            }
        }
        Action::ConcedeAuction { token } => {
            if res.unsold {
                *auction = None;
            } else if let Some(auction) = auction {
                auction.bids.retain(|bid| bid.token != *token);
                auction.conceded.push(token.clone());
            }
        }
        Action::CloseAuction => {
            *auction = None;
        }
        Action::ClaimBankruptcy { token, .. } => {
            // A bankrupt player's standing bids must never win.
            if let Some(auction) = auction {
                auction.bids.retain(|bid| bid.token != *token);
            }
        }
        _ => {}
    }
}

fn reduce_trades(trades: &mut BTreeMap<String, Trade>, action: &Action) {
    match action {
        Action::NewTrade {
            token,
            other,
            offer,
            request,
        } => {
            let trade = Trade::new(token.clone(), other.clone(), offer.clone(), request.clone());
            trades.insert(trade.id.clone(), trade);
        }
        Action::DeclineTrade { trade, .. } | Action::AcceptOffer { trade, .. } => {
            trades.remove(trade);
        }
        Action::ClaimBankruptcy { token, .. } => {
            trades.retain(|_, trade| !trade.is_party(token));
        }
        _ => {}
    }
}
