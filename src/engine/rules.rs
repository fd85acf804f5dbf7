//! The rule-validation tables.
//!
//! Each action kind maps to an ordered list of rule functions. A rule
//! inspects the resolved context and either passes or names the violated
//! rule; the first failure rejects the whole action. Presence rules run
//! first, so later rules may assume their references resolve and simply
//! pass when they do not.

use crate::error::RuleErrorKind;
use crate::game::{self, improvement_plan, unimprovement_plan, Owner};

use crate::engine::action::ActionKind;
use crate::engine::meta::Meta;

/// A single validation rule.
pub type Rule = fn(&Meta<'_>) -> Result<(), RuleErrorKind>;

/// The ordered rule list for an action kind.
#[must_use]
pub fn rules_for(kind: ActionKind) -> &'static [Rule] {
    match kind {
        ActionKind::JoinGame => &[token_valid, token_unused, bank_covers_amount],
        ActionKind::MakeTransferTo => &[
            player_joined,
            player_solvent,
            non_negative_amount,
            bank_covers_amount,
        ],
        ActionKind::MakeTransferFrom => &[
            player_joined,
            player_solvent,
            non_negative_amount,
            player_covers_amount,
        ],
        ActionKind::MakeTransferWith => &[
            player_joined,
            player_solvent,
            other_joined,
            other_solvent,
            distinct_players,
            non_negative_amount,
            player_covers_amount,
        ],
        ActionKind::ClaimBankruptcy => &[
            player_joined,
            player_solvent,
            other_joined,
            other_solvent,
            distinct_players,
            assets_unimproved,
            assets_mortgaged,
        ],
        ActionKind::BuyProperty => &[
            player_joined,
            player_solvent,
            property_known,
            property_unowned,
            non_negative_amount,
            player_covers_amount,
        ],
        ActionKind::ImproveProperty => &[
            player_joined,
            player_solvent,
            property_known,
            player_owns_property,
            improvable,
            property_unmortgaged,
            group_is_monopoly,
            not_fully_improved,
            builds_evenly,
            pool_covers_improvement,
            player_covers_amount,
        ],
        ActionKind::UnimproveProperty => &[
            player_joined,
            player_solvent,
            property_known,
            player_owns_property,
            improvable,
            property_improved,
            removes_evenly,
            pool_covers_removal,
            bank_covers_amount,
        ],
        ActionKind::UnimproveGroup => &[
            player_joined,
            player_solvent,
            group_known,
            player_owns_group,
            group_improved,
            bank_covers_amount,
        ],
        ActionKind::MortgageProperty => &[
            player_joined,
            player_solvent,
            property_known,
            player_owns_property,
            property_unmortgaged,
            group_unimproved,
            bank_covers_amount,
        ],
        ActionKind::UnmortgageProperty => &[
            player_joined,
            player_solvent,
            property_known,
            player_owns_property,
            property_mortgaged,
            player_covers_amount,
        ],
        ActionKind::PayRent => &[
            player_joined,
            player_solvent,
            property_known,
            not_own_property,
            property_unmortgaged,
            player_covers_amount,
        ],
        ActionKind::NewAuction => &[property_known, property_unowned, no_open_auction],
        ActionKind::Bid => &[
            player_joined,
            player_solvent,
            auction_open,
            not_conceded,
            bid_beats_highest,
            player_covers_amount,
        ],
        ActionKind::ConcedeAuction => &[player_joined, player_solvent, auction_open, not_conceded],
        ActionKind::CloseAuction => &[auction_open, winner_covers_bid],
        ActionKind::NewTrade => &[
            player_joined,
            player_solvent,
            other_joined,
            other_solvent,
            distinct_players,
            no_pending_trade,
            trade_amounts_non_negative,
            offer_owned_by_player,
            request_owned_by_other,
            traded_properties_unimproved,
            offer_within_balance,
        ],
        ActionKind::DeclineTrade => &[player_joined, player_solvent, trade_known, actor_is_party],
        ActionKind::AcceptOffer => &[
            player_joined,
            player_solvent,
            trade_known,
            actor_is_counterparty,
            initiator_solvent,
            trade_assets_owned,
            traded_properties_unimproved,
            trade_covered,
        ],
    }
}

fn token_valid(meta: &Meta<'_>) -> Result<(), RuleErrorKind> {
    let Some(token) = meta.token else {
        return Ok(());
    };
    if meta.config.player_tokens.iter().any(|t| t == token) {
        Ok(())
    } else {
        Err(RuleErrorKind::InvalidToken)
    }
}

fn token_unused(meta: &Meta<'_>) -> Result<(), RuleErrorKind> {
    if meta.player.is_some() {
        Err(RuleErrorKind::TokenInUse)
    } else {
        Ok(())
    }
}

fn player_joined(meta: &Meta<'_>) -> Result<(), RuleErrorKind> {
    if meta.player.is_none() {
        Err(RuleErrorKind::PlayerNotFound)
    } else {
        Ok(())
    }
}

fn player_solvent(meta: &Meta<'_>) -> Result<(), RuleErrorKind> {
    match meta.player {
        Some(player) if player.bankrupt => Err(RuleErrorKind::Bankrupt),
        _ => Ok(()),
    }
}

fn other_joined(meta: &Meta<'_>) -> Result<(), RuleErrorKind> {
    if meta.other_token.is_some() && meta.other.is_none() {
        Err(RuleErrorKind::PlayerNotFound)
    } else {
        Ok(())
    }
}

fn other_solvent(meta: &Meta<'_>) -> Result<(), RuleErrorKind> {
    match meta.other {
        Some(other) if other.bankrupt => Err(RuleErrorKind::Bankrupt),
        _ => Ok(()),
    }
}

fn distinct_players(meta: &Meta<'_>) -> Result<(), RuleErrorKind> {
    match (meta.token, meta.other_token) {
        (Some(a), Some(b)) if a == b => Err(RuleErrorKind::SamePlayer),
        _ => Ok(()),
    }
}

fn non_negative_amount(meta: &Meta<'_>) -> Result<(), RuleErrorKind> {
    if meta.amount < 0 {
        Err(RuleErrorKind::NegativeAmount)
    } else {
        Ok(())
    }
}

fn player_covers_amount(meta: &Meta<'_>) -> Result<(), RuleErrorKind> {
    match meta.player {
        Some(player) if player.balance < meta.amount => {
            Err(RuleErrorKind::InsufficientBalance)
        }
        _ => Ok(()),
    }
}

fn bank_covers_amount(meta: &Meta<'_>) -> Result<(), RuleErrorKind> {
    if meta.state.bank < meta.amount {
        Err(RuleErrorKind::BankInsufficient)
    } else {
        Ok(())
    }
}

fn property_known(meta: &Meta<'_>) -> Result<(), RuleErrorKind> {
    if meta.property.is_none() {
        Err(RuleErrorKind::PropertyNotFound)
    } else {
        Ok(())
    }
}

fn property_unowned(meta: &Meta<'_>) -> Result<(), RuleErrorKind> {
    match meta.property {
        Some(property) if property.owner != Owner::Bank => Err(RuleErrorKind::PropertyOwned),
        _ => Ok(()),
    }
}

fn player_owns_property(meta: &Meta<'_>) -> Result<(), RuleErrorKind> {
    match meta.property {
        Some(property) if property.owner.token() != meta.token => {
            Err(RuleErrorKind::NotPropertyOwner)
        }
        _ => Ok(()),
    }
}

fn not_own_property(meta: &Meta<'_>) -> Result<(), RuleErrorKind> {
    match meta.property {
        Some(property) if property.owner.token() == meta.token => {
            Err(RuleErrorKind::OwnProperty)
        }
        _ => Ok(()),
    }
}

fn improvable(meta: &Meta<'_>) -> Result<(), RuleErrorKind> {
    match meta.property {
        Some(property) if property.is_special_group() => Err(RuleErrorKind::CannotImprove),
        _ => Ok(()),
    }
}

fn group_is_monopoly(meta: &Meta<'_>) -> Result<(), RuleErrorKind> {
    if meta.property.is_some() && !game::is_monopoly(&meta.group) {
        Err(RuleErrorKind::NotMonopoly)
    } else {
        Ok(())
    }
}

fn not_fully_improved(meta: &Meta<'_>) -> Result<(), RuleErrorKind> {
    match meta.property {
        Some(property) if property.is_fully_improved() => Err(RuleErrorKind::FullyImproved),
        _ => Ok(()),
    }
}

fn property_improved(meta: &Meta<'_>) -> Result<(), RuleErrorKind> {
    match meta.property {
        Some(property) if !property.is_improved() => Err(RuleErrorKind::NotImproved),
        _ => Ok(()),
    }
}

fn builds_evenly(meta: &Meta<'_>) -> Result<(), RuleErrorKind> {
    match meta.property {
        Some(property) if !game::improves_evenly(&meta.group, property) => {
            Err(RuleErrorKind::BuildEvenly)
        }
        _ => Ok(()),
    }
}

fn removes_evenly(meta: &Meta<'_>) -> Result<(), RuleErrorKind> {
    match meta.property {
        Some(property) if !game::unimproves_evenly(&meta.group, property) => {
            Err(RuleErrorKind::UnimproveEvenly)
        }
        _ => Ok(()),
    }
}

fn property_unmortgaged(meta: &Meta<'_>) -> Result<(), RuleErrorKind> {
    match meta.property {
        Some(property) if property.mortgaged => Err(RuleErrorKind::IsMortgaged),
        _ => Ok(()),
    }
}

fn property_mortgaged(meta: &Meta<'_>) -> Result<(), RuleErrorKind> {
    match meta.property {
        Some(property) if !property.mortgaged => Err(RuleErrorKind::NotMortgaged),
        _ => Ok(()),
    }
}

fn group_unimproved(meta: &Meta<'_>) -> Result<(), RuleErrorKind> {
    if game::any_improved(&meta.group) {
        Err(RuleErrorKind::HasImprovements)
    } else {
        Ok(())
    }
}

fn group_known(meta: &Meta<'_>) -> Result<(), RuleErrorKind> {
    if meta.group.is_empty() {
        Err(RuleErrorKind::PropertyNotFound)
    } else {
        Ok(())
    }
}

fn player_owns_group(meta: &Meta<'_>) -> Result<(), RuleErrorKind> {
    if meta.group.iter().all(|p| p.owner.token() == meta.token) {
        Ok(())
    } else {
        Err(RuleErrorKind::NotPropertyOwner)
    }
}

fn group_improved(meta: &Meta<'_>) -> Result<(), RuleErrorKind> {
    if game::any_improved(&meta.group) {
        Ok(())
    } else {
        Err(RuleErrorKind::NotImproved)
    }
}

/// Pool check for adding a building, including the four-house swap when
/// stepping up to a hotel.
fn pool_covers_improvement(meta: &Meta<'_>) -> Result<(), RuleErrorKind> {
    let Some(property) = meta.property else {
        return Ok(());
    };
    let plan = improvement_plan(property.buildings);
    check_pool(meta, plan.houses, plan.hotels)
}

/// Pool check for removing a building; breaking a hotel back into four
/// houses needs the houses available.
fn pool_covers_removal(meta: &Meta<'_>) -> Result<(), RuleErrorKind> {
    let Some(property) = meta.property else {
        return Ok(());
    };
    let plan = unimprovement_plan(property.buildings);
    check_pool(meta, plan.houses, plan.hotels)
}

fn check_pool(meta: &Meta<'_>, houses: i32, hotels: i32) -> Result<(), RuleErrorKind> {
    if houses > 0 && meta.state.houses < houses.unsigned_abs() {
        return Err(RuleErrorKind::HousesUnavailable);
    }
    if hotels > 0 && meta.state.hotels < hotels.unsigned_abs() {
        return Err(RuleErrorKind::HotelsUnavailable);
    }
    Ok(())
}

/// Bankruptcy requires the estate to be liquidated of buildings first.
fn assets_unimproved(meta: &Meta<'_>) -> Result<(), RuleErrorKind> {
    let Some(token) = meta.token else {
        return Ok(());
    };
    let owned = meta.state.properties_owned_by(token);
    if game::any_improved(&owned) {
        Err(RuleErrorKind::HasImprovements)
    } else {
        Ok(())
    }
}

/// Bankruptcy also requires every remaining title to be mortgaged, so
/// the estate carries no rent income into the settlement.
fn assets_mortgaged(meta: &Meta<'_>) -> Result<(), RuleErrorKind> {
    let Some(token) = meta.token else {
        return Ok(());
    };
    if meta
        .state
        .properties_owned_by(token)
        .iter()
        .any(|p| !p.mortgaged)
    {
        Err(RuleErrorKind::HasUnmortgaged)
    } else {
        Ok(())
    }
}

fn no_open_auction(meta: &Meta<'_>) -> Result<(), RuleErrorKind> {
    if meta.auction.is_some() {
        Err(RuleErrorKind::AuctionInProgress)
    } else {
        Ok(())
    }
}

fn auction_open(meta: &Meta<'_>) -> Result<(), RuleErrorKind> {
    if meta.auction.is_none() {
        Err(RuleErrorKind::NoAuction)
    } else {
        Ok(())
    }
}

fn not_conceded(meta: &Meta<'_>) -> Result<(), RuleErrorKind> {
    match (meta.auction, meta.token) {
        (Some(auction), Some(token)) if auction.has_conceded(token) => {
            Err(RuleErrorKind::AlreadyConceded)
        }
        _ => Ok(()),
    }
}

fn bid_beats_highest(meta: &Meta<'_>) -> Result<(), RuleErrorKind> {
    let Some(auction) = meta.auction else {
        return Ok(());
    };
    let highest = auction.highest().map_or(0, |bid| bid.amount);
    if meta.amount > highest {
        Ok(())
    } else {
        Err(RuleErrorKind::BidTooLow)
    }
}

/// A bid is validated against the bidder's balance when placed, but the
/// money may be gone by the time the auction closes. Re-check at
/// settlement so the winner is never debited below zero.
fn winner_covers_bid(meta: &Meta<'_>) -> Result<(), RuleErrorKind> {
    let Some(auction) = meta.auction else {
        return Ok(());
    };
    let Some(bid) = auction.highest() else {
        return Ok(());
    };
    match meta.state.player(&bid.token) {
        Some(player) if player.balance < bid.amount => {
            Err(RuleErrorKind::InsufficientBalance)
        }
        _ => Ok(()),
    }
}

fn no_pending_trade(meta: &Meta<'_>) -> Result<(), RuleErrorKind> {
    if meta.trade.is_some() {
        Err(RuleErrorKind::TradeExists)
    } else {
        Ok(())
    }
}

fn trade_known(meta: &Meta<'_>) -> Result<(), RuleErrorKind> {
    if meta.trade.is_none() {
        Err(RuleErrorKind::TradeNotFound)
    } else {
        Ok(())
    }
}

fn actor_is_party(meta: &Meta<'_>) -> Result<(), RuleErrorKind> {
    match (meta.trade, meta.token) {
        (Some(trade), Some(token)) if !trade.is_party(token) => Err(RuleErrorKind::NotParty),
        _ => Ok(()),
    }
}

fn actor_is_counterparty(meta: &Meta<'_>) -> Result<(), RuleErrorKind> {
    match (meta.trade, meta.token) {
        (Some(trade), Some(token)) if trade.counterparty != token => {
            Err(RuleErrorKind::NotParty)
        }
        _ => Ok(()),
    }
}

fn initiator_solvent(meta: &Meta<'_>) -> Result<(), RuleErrorKind> {
    let Some(trade) = meta.trade else {
        return Ok(());
    };
    match meta.state.player(&trade.initiator) {
        Some(initiator) if initiator.bankrupt => Err(RuleErrorKind::Bankrupt),
        _ => Ok(()),
    }
}

fn trade_amounts_non_negative(meta: &Meta<'_>) -> Result<(), RuleErrorKind> {
    let negative = meta.offer.is_some_and(|side| side.amount < 0)
        || meta.request.is_some_and(|side| side.amount < 0);
    if negative {
        Err(RuleErrorKind::NegativeAmount)
    } else {
        Ok(())
    }
}

fn side_owned_by(meta: &Meta<'_>, ids: &[String], owner: Option<&str>) -> bool {
    ids.iter().all(|id| {
        meta.state
            .property(id)
            .is_some_and(|p| p.owner.token() == owner)
    })
}

fn offer_owned_by_player(meta: &Meta<'_>) -> Result<(), RuleErrorKind> {
    let Some(offer) = meta.offer else {
        return Ok(());
    };
    if side_owned_by(meta, &offer.properties, meta.token) {
        Ok(())
    } else {
        Err(RuleErrorKind::NotPropertyOwner)
    }
}

fn request_owned_by_other(meta: &Meta<'_>) -> Result<(), RuleErrorKind> {
    let Some(request) = meta.request else {
        return Ok(());
    };
    if side_owned_by(meta, &request.properties, meta.other_token) {
        Ok(())
    } else {
        Err(RuleErrorKind::NotPropertyOwner)
    }
}

/// On acceptance, both sides must still own what the trade names; the
/// assets may have moved since the proposal.
fn trade_assets_owned(meta: &Meta<'_>) -> Result<(), RuleErrorKind> {
    let Some(trade) = meta.trade else {
        return Ok(());
    };
    let offer_ok = side_owned_by(meta, &trade.offer.properties, Some(&trade.initiator));
    let request_ok = side_owned_by(meta, &trade.request.properties, Some(&trade.counterparty));
    if offer_ok && request_ok {
        Ok(())
    } else {
        Err(RuleErrorKind::NotPropertyOwner)
    }
}

/// A traded title must come from an unimproved group; a monopoly with
/// buildings cannot change hands piecemeal.
fn traded_properties_unimproved(meta: &Meta<'_>) -> Result<(), RuleErrorKind> {
    let sides = [meta.offer, meta.request];
    let improved = sides.into_iter().flatten().any(|side| {
        side.properties.iter().any(|id| {
            meta.state
                .property(id)
                .is_some_and(|p| game::any_improved(&meta.state.group(&p.group)))
        })
    });
    if improved {
        Err(RuleErrorKind::HasImprovements)
    } else {
        Ok(())
    }
}

fn offer_within_balance(meta: &Meta<'_>) -> Result<(), RuleErrorKind> {
    match (meta.player, meta.offer) {
        (Some(player), Some(offer)) if player.balance < offer.amount => {
            Err(RuleErrorKind::InsufficientBalance)
        }
        _ => Ok(()),
    }
}

/// Both parties must cover the cash their side of the trade moves.
fn trade_covered(meta: &Meta<'_>) -> Result<(), RuleErrorKind> {
    let Some(trade) = meta.trade else {
        return Ok(());
    };
    let initiator_covers = meta
        .state
        .player(&trade.initiator)
        .is_some_and(|p| p.balance >= trade.offer.amount);
    let counterparty_covers = meta
        .state
        .player(&trade.counterparty)
        .is_some_and(|p| p.balance >= trade.request.amount);
    if initiator_covers && counterparty_covers {
        Ok(())
    } else {
        Err(RuleErrorKind::InsufficientBalance)
    }
}
