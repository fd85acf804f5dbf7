//! The dispatch pipeline.
//!
//! One entry point turns a snapshot plus an action into the next
//! snapshot: resolve references, validate against the rule table, then
//! reduce a clone slice by slice and attach the notice. Rejections
//! render their message from the room's `errors.<key>` template and
//! leave the input snapshot untouched, so dispatch is all-or-nothing.

use std::collections::BTreeMap;

use crate::error::{RuleError, RuleResult};
use crate::game::{Config, GameState, Notice, NoticeMeta, Templates};

use crate::engine::action::Action;
use crate::engine::meta::{resolve_amount, Meta};
use crate::engine::reducers::{self, Resolution};
use crate::engine::rules::rules_for;

/// Apply an action to a snapshot, producing the next snapshot.
///
/// The returned state carries the notice for the accepted action in
/// `GameState::notice`.
///
/// # Errors
///
/// Returns a [`RuleError`] when a rule rejects the action; the input
/// snapshot is left untouched.
pub fn dispatch(
    state: &GameState,
    action: &Action,
    config: &Config,
    templates: &Templates,
) -> RuleResult<GameState> {
    let mut meta = Meta::build(state, config, action);
    meta.amount = resolve_amount(action, &meta);

    for rule in rules_for(action.kind()) {
        if let Err(kind) = rule(&meta) {
            let vars = context_vars(&meta, meta.amount);
            let message = templates.render(&format!("errors.{}", kind.key()), &vars);
            return Err(RuleError::new(kind, message));
        }
    }

    let res = Resolution::from_meta(action, &meta);
    let notice = build_notice(action, &meta, &res, templates);

    let mut next = state.clone();
    reducers::apply(&mut next, action, &res);
    next.notice = Some(notice);
    Ok(next)
}

/// Template variables from the resolved context. Unresolved player names
/// fall back to the raw token so rejection messages still render.
fn context_vars(meta: &Meta<'_>, amount: crate::game::Money) -> BTreeMap<&'static str, String> {
    let mut vars = BTreeMap::new();

    if let Some(token) = meta.token {
        vars.insert("player.token", token.to_owned());
        vars.insert(
            "player.name",
            meta.player
                .map_or_else(|| token.to_owned(), |p| p.name.clone()),
        );
    }
    if let Some(token) = meta.other_token {
        vars.insert("other.token", token.to_owned());
        vars.insert(
            "other.name",
            meta.other
                .map_or_else(|| token.to_owned(), |p| p.name.clone()),
        );
    }
    if let Some(property) = meta.property {
        vars.insert("property.id", property.id.clone());
        vars.insert("property.name", property.name.clone());
    }
    if let Some(group) = meta
        .property
        .map(|p| &p.group)
        .or_else(|| meta.group.first().map(|p| &p.group))
    {
        vars.insert("group", group.clone());
    }
    vars.insert("amount", amount.to_string());
    vars
}

/// Select and render the notice for an accepted action.
fn build_notice(
    action: &Action,
    meta: &Meta<'_>,
    res: &Resolution,
    templates: &Templates,
) -> Notice {
    let id = match action {
        Action::JoinGame { .. } => "player.joined",
        Action::MakeTransferTo { .. } => "player.transfer-to",
        Action::MakeTransferFrom { .. } => "player.transfer-from",
        Action::MakeTransferWith { .. } => "player.transfer-with",
        Action::ClaimBankruptcy { .. } => {
            if meta.other_token.is_some() {
                "player.other-bankrupt"
            } else {
                "player.bankrupt"
            }
        }
        Action::BuyProperty { .. } => "property.bought",
        Action::ImproveProperty { .. } => "property.improved",
        Action::UnimproveProperty { .. } => "property.unimproved",
        Action::UnimproveGroup { .. } => "property.unimproved-group",
        Action::MortgageProperty { .. } => "property.mortgaged",
        Action::UnmortgageProperty { .. } => "property.unmortgaged",
        Action::PayRent { .. } => "property.paid-rent",
        Action::NewAuction { .. } => "auction.new",
        Action::Bid { .. } => "auction.bid",
        Action::ConcedeAuction { .. } => {
            if res.unsold {
                "auction.unsold"
            } else {
                "auction.conceded"
            }
        }
        Action::CloseAuction => {
            if res.winner.is_some() {
                "auction.closed"
            } else {
                "auction.unsold"
            }
        }
        Action::NewTrade { .. } => "trade.new",
        Action::DeclineTrade { .. } => "trade.declined",
        Action::AcceptOffer { .. } => "trade.accepted",
    };

    let mut vars = context_vars(meta, res.amount);
    let mut player = meta.token.map(String::from);

    // A closing auction speaks for the winner, not the (absent) actor.
    if let (Action::CloseAuction, Some(winner)) = (action, &res.winner) {
        player = Some(winner.token.clone());
        vars.insert("player.token", winner.token.clone());
        vars.insert(
            "player.name",
            meta.state
                .player(&winner.token)
                .map_or_else(|| winner.token.clone(), |p| p.name.clone()),
        );
    }

    let other = match action {
        Action::ClaimBankruptcy { .. } => Some(res.beneficiary.as_str().to_owned()),
        _ => meta.other_token.map(String::from),
    };

    Notice {
        id: id.to_owned(),
        message: templates.render(&format!("notices.{id}"), &vars),
        meta: NoticeMeta {
            player,
            other,
            property: meta.property.map(|p| p.id.clone()),
            amount: Some(res.amount),
        },
    }
}
