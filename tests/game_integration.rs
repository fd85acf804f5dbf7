//! End-to-end session tests against the public engine API.
//!
//! Each test drives a fresh room through a realistic action sequence
//! and checks balances, ownership, and notices along the way.
//!
//! Run with: cargo test --test game_integration

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use banker::engine::{Action, Engine};
use banker::error::RuleErrorKind;
use banker::game::{Config, Costs, GameState, Owner, PropertyFixture, TradeSide};

fn fixtures() -> Vec<PropertyFixture> {
    let lightblue = Costs {
        price: 100,
        build: 50,
        rent: [6, 30, 90, 270, 400, 550],
    };
    vec![
        PropertyFixture {
            name: "Oriental Avenue".into(),
            group: "lightblue".into(),
            costs: lightblue,
        },
        PropertyFixture {
            name: "Vermont Avenue".into(),
            group: "lightblue".into(),
            costs: lightblue,
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
        PropertyFixture {
            name: "B. & O. Railroad".into(),
            group: "railroad".into(),
            costs: Costs {
                price: 200,
                build: 0,
                rent: [25, 50, 100, 200, 0, 0],
            },
        },
        PropertyFixture {
            name: "Electric Company".into(),
            group: "utility".into(),
            costs: Costs {
                price: 150,
                build: 0,
                rent: [4, 10, 0, 0, 0, 0],
            },
        },
    ]
}

fn join(name: &str, token: &str) -> Action {
    Action::JoinGame {
        name: name.into(),
        token: token.into(),
    }
}

fn buy(token: &str, property: &str) -> Action {
    Action::BuyProperty {
        token: token.into(),
        property: property.into(),
        amount: None,
    }
}

/// A room with two joined players.
fn two_player_room() -> (Engine, GameState) {
    let engine = Engine::default();
    let mut state = engine.new_game(&fixtures());
    state = engine.apply(&state, &join("Player 1", "top-hat")).unwrap();
    state = engine
        .apply(&state, &join("Player 2", "automobile"))
        .unwrap();
    (engine, state)
}

#[test]
fn test_join_draws_starting_balance_from_bank() {
    let engine = Engine::default();
    let config = Config::default();
    let state = engine.new_game(&fixtures());
    let total = state.ledger_total();

    let state = engine.apply(&state, &join("Player 1", "top-hat")).unwrap();
    assert_eq!(state.players["top-hat"].balance, config.player_start);
    assert_eq!(state.bank, config.bank_start - config.player_start);
    assert_eq!(state.ledger_total(), total);
}

#[test]
fn test_duplicate_token_rejected() {
    let (engine, state) = two_player_room();
    let err = engine
        .apply(&state, &join("Player 3", "top-hat"))
        .unwrap_err();
    assert_eq!(err.kind, RuleErrorKind::TokenInUse);
}

#[test]
fn test_unknown_token_rejected() {
    let engine = Engine::default();
    let state = engine.new_game(&fixtures());
    let err = engine
        .apply(&state, &join("Player 1", "race-car"))
        .unwrap_err();
    assert_eq!(err.kind, RuleErrorKind::InvalidToken);
}

#[test]
fn test_transfers_move_money_between_parties() {
    let (engine, mut state) = two_player_room();

    state = engine
        .apply(
            &state,
            &Action::MakeTransferTo {
                token: "top-hat".into(),
                amount: 200,
            },
        )
        .unwrap();
    assert_eq!(state.players["top-hat"].balance, 1700);

    state = engine
        .apply(
            &state,
            &Action::MakeTransferWith {
                token: "top-hat".into(),
                other: "automobile".into(),
                amount: 700,
            },
        )
        .unwrap();
    assert_eq!(state.players["top-hat"].balance, 1000);
    assert_eq!(state.players["automobile"].balance, 2200);

    let err = engine
        .apply(
            &state,
            &Action::MakeTransferFrom {
                token: "top-hat".into(),
                amount: 1001,
            },
        )
        .unwrap_err();
    assert_eq!(err.kind, RuleErrorKind::InsufficientBalance);
}

#[test]
fn test_negative_transfer_rejected() {
    let (engine, state) = two_player_room();
    let err = engine
        .apply(
            &state,
            &Action::MakeTransferTo {
                token: "top-hat".into(),
                amount: -5,
            },
        )
        .unwrap_err();
    assert_eq!(err.kind, RuleErrorKind::NegativeAmount);
}

#[test]
fn test_improve_requires_full_group() {
    let (engine, mut state) = two_player_room();
    state = engine.apply(&state, &buy("top-hat", "oriental-avenue")).unwrap();

    let err = engine
        .apply(
            &state,
            &Action::ImproveProperty {
                token: "top-hat".into(),
                property: "oriental-avenue".into(),
            },
        )
        .unwrap_err();
    assert_eq!(err.kind, RuleErrorKind::NotMonopoly);
}

#[test]
fn test_improvement_lifecycle_and_even_building() {
    let (engine, mut state) = two_player_room();
    state = engine.apply(&state, &buy("top-hat", "oriental-avenue")).unwrap();
    state = engine.apply(&state, &buy("top-hat", "vermont-avenue")).unwrap();

    let improve = |property: &str| Action::ImproveProperty {
        token: "top-hat".into(),
        property: property.into(),
    };

    state = engine.apply(&state, &improve("oriental-avenue")).unwrap();
    assert_eq!(state.properties["oriental-avenue"].buildings, 1);
    assert_eq!(state.houses, 31);

    // A second house on the same lot would break the even spread
    let err = engine.apply(&state, &improve("oriental-avenue")).unwrap_err();
    assert_eq!(err.kind, RuleErrorKind::BuildEvenly);

    state = engine.apply(&state, &improve("vermont-avenue")).unwrap();
    state = engine.apply(&state, &improve("oriental-avenue")).unwrap();
    assert_eq!(state.properties["oriental-avenue"].buildings, 2);

    // Removal must come off the top of the group
    let err = engine
        .apply(
            &state,
            &Action::UnimproveProperty {
                token: "top-hat".into(),
                property: "vermont-avenue".into(),
            },
        )
        .unwrap_err();
    assert_eq!(err.kind, RuleErrorKind::UnimproveEvenly);

    state = engine
        .apply(
            &state,
            &Action::UnimproveProperty {
                token: "top-hat".into(),
                property: "oriental-avenue".into(),
            },
        )
        .unwrap();
    assert_eq!(state.notice.as_ref().unwrap().id, "property.unimproved");
    assert_eq!(state.properties["oriental-avenue"].buildings, 1);
    // 3 improvements drew 3 houses; the removal returned one
    assert_eq!(state.houses, 30);
}

#[test]
fn test_unimprove_group_liquidates_in_one_action() {
    let (engine, mut state) = two_player_room();
    state = engine.apply(&state, &buy("top-hat", "oriental-avenue")).unwrap();
    state = engine.apply(&state, &buy("top-hat", "vermont-avenue")).unwrap();

    let improve = |property: &str| Action::ImproveProperty {
        token: "top-hat".into(),
        property: property.into(),
    };
    state = engine.apply(&state, &improve("oriental-avenue")).unwrap();
    state = engine.apply(&state, &improve("vermont-avenue")).unwrap();
    state = engine.apply(&state, &improve("oriental-avenue")).unwrap();
    assert_eq!(state.houses, 29);

    let balance = state.players["top-hat"].balance;
    let bank = state.bank;
    state = engine
        .apply(
            &state,
            &Action::UnimproveGroup {
                token: "top-hat".into(),
                group: "lightblue".into(),
            },
        )
        .unwrap();

    // Three buildings sold back at 25 apiece, in one atomic step
    assert_eq!(state.properties["oriental-avenue"].buildings, 0);
    assert_eq!(state.properties["vermont-avenue"].buildings, 0);
    assert_eq!(state.houses, 32);
    assert_eq!(state.players["top-hat"].balance, balance + 75);
    assert_eq!(state.bank, bank - 75);
    let notice = state.notice.as_ref().unwrap();
    assert_eq!(notice.id, "property.unimproved-group");
    assert_eq!(
        notice.message,
        "Player 1 sold every building in the lightblue group"
    );
}

#[test]
fn test_unimprove_group_rejected_for_other_players_group() {
    let (engine, mut state) = two_player_room();
    state = engine.apply(&state, &buy("top-hat", "oriental-avenue")).unwrap();
    state = engine.apply(&state, &buy("top-hat", "vermont-avenue")).unwrap();

    let err = engine
        .apply(
            &state,
            &Action::UnimproveGroup {
                token: "automobile".into(),
                group: "lightblue".into(),
            },
        )
        .unwrap_err();
    assert_eq!(err.kind, RuleErrorKind::NotPropertyOwner);
}

#[test]
fn test_rent_doubles_on_unimproved_monopoly() {
    let (engine, mut state) = two_player_room();
    state = engine.apply(&state, &buy("top-hat", "oriental-avenue")).unwrap();

    let rent = |state: &GameState, engine: &Engine| {
        engine
            .apply(
                state,
                &Action::PayRent {
                    token: "automobile".into(),
                    property: "oriental-avenue".into(),
                    dice: None,
                },
            )
            .unwrap()
    };

    let after = rent(&state, &engine);
    assert_eq!(after.players["automobile"].balance, 1500 - 6);

    state = engine.apply(&state, &buy("top-hat", "vermont-avenue")).unwrap();
    let after = rent(&state, &engine);
    assert_eq!(after.players["automobile"].balance, 1500 - 12);
}

#[test]
fn test_railroad_rent_scales_with_holdings() {
    let (engine, mut state) = two_player_room();
    state = engine.apply(&state, &buy("top-hat", "reading-railroad")).unwrap();
    state = engine.apply(&state, &buy("top-hat", "b-o-railroad")).unwrap();

    let state = engine
        .apply(
            &state,
            &Action::PayRent {
                token: "automobile".into(),
                property: "reading-railroad".into(),
                dice: None,
            },
        )
        .unwrap();
    // Two railroads held: second rent tier
    assert_eq!(state.notice.as_ref().unwrap().meta.amount, Some(50));
}

#[test]
fn test_utility_rent_uses_dice_total() {
    let (engine, mut state) = two_player_room();
    state = engine.apply(&state, &buy("top-hat", "electric-company")).unwrap();

    let state = engine
        .apply(
            &state,
            &Action::PayRent {
                token: "automobile".into(),
                property: "electric-company".into(),
                dice: Some(9),
            },
        )
        .unwrap();
    assert_eq!(state.players["automobile"].balance, 1500 - 4 * 9);
}

#[test]
fn test_mortgage_lifecycle() {
    let (engine, mut state) = two_player_room();
    state = engine.apply(&state, &buy("top-hat", "oriental-avenue")).unwrap();
    let balance = state.players["top-hat"].balance;

    state = engine
        .apply(
            &state,
            &Action::MortgageProperty {
                token: "top-hat".into(),
                property: "oriental-avenue".into(),
            },
        )
        .unwrap();
    assert!(state.properties["oriental-avenue"].mortgaged);
    assert_eq!(state.players["top-hat"].balance, balance + 50);

    // No rent while mortgaged
    let err = engine
        .apply(
            &state,
            &Action::PayRent {
                token: "automobile".into(),
                property: "oriental-avenue".into(),
                dice: None,
            },
        )
        .unwrap_err();
    assert_eq!(err.kind, RuleErrorKind::IsMortgaged);

    state = engine
        .apply(
            &state,
            &Action::UnmortgageProperty {
                token: "top-hat".into(),
                property: "oriental-avenue".into(),
            },
        )
        .unwrap();
    assert!(!state.properties["oriental-avenue"].mortgaged);
    // Principal plus 10% interest
    assert_eq!(state.players["top-hat"].balance, balance + 50 - 55);
}

#[test]
fn test_bankruptcy_settles_estate_with_player() {
    let (engine, mut state) = two_player_room();
    state = engine.apply(&state, &buy("top-hat", "oriental-avenue")).unwrap();
    state = engine
        .apply(
            &state,
            &Action::MortgageProperty {
                token: "top-hat".into(),
                property: "oriental-avenue".into(),
            },
        )
        .unwrap();
    let balance = state.players["top-hat"].balance;

    state = engine
        .apply(
            &state,
            &Action::ClaimBankruptcy {
                token: "top-hat".into(),
                other: Some("automobile".into()),
            },
        )
        .unwrap();

    let bankrupt = &state.players["top-hat"];
    assert!(bankrupt.bankrupt);
    assert_eq!(bankrupt.balance, 0);
    assert_eq!(state.players["automobile"].balance, 1500 + balance);
    // The title moves with its mortgage flag intact
    assert_eq!(
        state.properties["oriental-avenue"].owner,
        Owner::Player("automobile".into())
    );
    assert!(state.properties["oriental-avenue"].mortgaged);
    assert_eq!(state.notice.as_ref().unwrap().id, "player.other-bankrupt");

    // A bankrupt player cannot act
    let err = engine
        .apply(
            &state,
            &Action::MakeTransferTo {
                token: "top-hat".into(),
                amount: 100,
            },
        )
        .unwrap_err();
    assert_eq!(err.kind, RuleErrorKind::Bankrupt);
}

#[test]
fn test_bankruptcy_to_bank_reclaims_estate() {
    let (engine, mut state) = two_player_room();
    state = engine.apply(&state, &buy("top-hat", "oriental-avenue")).unwrap();
    state = engine
        .apply(
            &state,
            &Action::MortgageProperty {
                token: "top-hat".into(),
                property: "oriental-avenue".into(),
            },
        )
        .unwrap();
    let total = state.ledger_total();
    let bank = state.bank;
    let balance = state.players["top-hat"].balance;

    state = engine
        .apply(
            &state,
            &Action::ClaimBankruptcy {
                token: "top-hat".into(),
                other: None,
            },
        )
        .unwrap();

    assert!(state.players["top-hat"].bankrupt);
    assert_eq!(state.properties["oriental-avenue"].owner, Owner::Bank);
    // The balance is written off, not transferred: the bank is
    // untouched and the ledger total drops by exactly that amount.
    assert_eq!(state.bank, bank);
    assert_eq!(state.ledger_total(), total - balance);
    assert_eq!(state.notice.as_ref().unwrap().id, "player.bankrupt");
    assert_eq!(state.notice.as_ref().unwrap().meta.amount, Some(balance));
}

#[test]
fn test_bankruptcy_rejected_while_improved() {
    let (engine, mut state) = two_player_room();
    state = engine.apply(&state, &buy("top-hat", "oriental-avenue")).unwrap();
    state = engine.apply(&state, &buy("top-hat", "vermont-avenue")).unwrap();
    state = engine
        .apply(
            &state,
            &Action::ImproveProperty {
                token: "top-hat".into(),
                property: "oriental-avenue".into(),
            },
        )
        .unwrap();

    let err = engine
        .apply(
            &state,
            &Action::ClaimBankruptcy {
                token: "top-hat".into(),
                other: None,
            },
        )
        .unwrap_err();
    assert_eq!(err.kind, RuleErrorKind::HasImprovements);
}

#[test]
fn test_bankruptcy_rejected_while_unmortgaged() {
    let (engine, mut state) = two_player_room();
    state = engine.apply(&state, &buy("top-hat", "oriental-avenue")).unwrap();

    let err = engine
        .apply(
            &state,
            &Action::ClaimBankruptcy {
                token: "top-hat".into(),
                other: None,
            },
        )
        .unwrap_err();
    assert_eq!(err.kind, RuleErrorKind::HasUnmortgaged);
}

#[test]
fn test_auction_lifecycle() {
    let (engine, mut state) = two_player_room();

    state = engine
        .apply(
            &state,
            &Action::NewAuction {
                property: "oriental-avenue".into(),
            },
        )
        .unwrap();

    // Only one auction at a time
    let err = engine
        .apply(
            &state,
            &Action::NewAuction {
                property: "vermont-avenue".into(),
            },
        )
        .unwrap_err();
    assert_eq!(err.kind, RuleErrorKind::AuctionInProgress);

    state = engine
        .apply(
            &state,
            &Action::Bid {
                token: "top-hat".into(),
                amount: 60,
            },
        )
        .unwrap();
    let err = engine
        .apply(
            &state,
            &Action::Bid {
                token: "automobile".into(),
                amount: 60,
            },
        )
        .unwrap_err();
    assert_eq!(err.kind, RuleErrorKind::BidTooLow);

    state = engine
        .apply(
            &state,
            &Action::Bid {
                token: "automobile".into(),
                amount: 80,
            },
        )
        .unwrap();
    state = engine.apply(&state, &Action::CloseAuction).unwrap();

    assert!(state.auction.is_none());
    assert_eq!(
        state.properties["oriental-avenue"].owner,
        Owner::Player("automobile".into())
    );
    assert_eq!(state.players["automobile"].balance, 1500 - 80);
    // The losing bidder paid nothing
    assert_eq!(state.players["top-hat"].balance, 1500);
}

#[test]
fn test_close_auction_rejected_when_winner_overspent() {
    let (engine, mut state) = two_player_room();
    state = engine
        .apply(
            &state,
            &Action::NewAuction {
                property: "oriental-avenue".into(),
            },
        )
        .unwrap();
    state = engine
        .apply(
            &state,
            &Action::Bid {
                token: "top-hat".into(),
                amount: 1400,
            },
        )
        .unwrap();
    // The bidder spends money before the auction closes
    state = engine
        .apply(
            &state,
            &Action::MakeTransferFrom {
                token: "top-hat".into(),
                amount: 200,
            },
        )
        .unwrap();

    let err = engine.apply(&state, &Action::CloseAuction).unwrap_err();
    assert_eq!(err.kind, RuleErrorKind::InsufficientBalance);
    // The auction is still open and no money moved
    assert!(state.auction.is_some());
    assert_eq!(state.players["top-hat"].balance, 1300);
}

#[test]
fn test_auction_dies_unsold_when_all_concede() {
    let (engine, mut state) = two_player_room();
    state = engine
        .apply(
            &state,
            &Action::NewAuction {
                property: "oriental-avenue".into(),
            },
        )
        .unwrap();

    state = engine
        .apply(
            &state,
            &Action::ConcedeAuction {
                token: "top-hat".into(),
            },
        )
        .unwrap();
    assert!(state.auction.is_some());

    state = engine
        .apply(
            &state,
            &Action::ConcedeAuction {
                token: "automobile".into(),
            },
        )
        .unwrap();
    assert!(state.auction.is_none());
    assert_eq!(state.properties["oriental-avenue"].owner, Owner::Bank);
    assert_eq!(state.notice.as_ref().unwrap().id, "auction.unsold");
}

#[test]
fn test_conceding_withdraws_standing_bids() {
    let (engine, mut state) = two_player_room();
    state = engine
        .apply(
            &state,
            &Action::NewAuction {
                property: "oriental-avenue".into(),
            },
        )
        .unwrap();
    state = engine
        .apply(
            &state,
            &Action::Bid {
                token: "top-hat".into(),
                amount: 100,
            },
        )
        .unwrap();
    state = engine
        .apply(
            &state,
            &Action::Bid {
                token: "automobile".into(),
                amount: 120,
            },
        )
        .unwrap();
    state = engine
        .apply(
            &state,
            &Action::ConcedeAuction {
                token: "automobile".into(),
            },
        )
        .unwrap();
    state = engine.apply(&state, &Action::CloseAuction).unwrap();

    // top-hat's 100 is the only live bid left
    assert_eq!(
        state.properties["oriental-avenue"].owner,
        Owner::Player("top-hat".into())
    );
    assert_eq!(state.players["top-hat"].balance, 1400);
    assert_eq!(state.players["automobile"].balance, 1500);
}

#[test]
fn test_trade_lifecycle() {
    let (engine, mut state) = two_player_room();
    state = engine.apply(&state, &buy("top-hat", "oriental-avenue")).unwrap();

    let propose = Action::NewTrade {
        token: "top-hat".into(),
        other: "automobile".into(),
        offer: TradeSide {
            properties: vec!["oriental-avenue".into()],
            amount: 0,
        },
        request: TradeSide {
            properties: vec![],
            amount: 250,
        },
    };

    state = engine.apply(&state, &propose).unwrap();
    assert_eq!(state.trades.len(), 1);

    // One pending trade per pair
    let err = engine.apply(&state, &propose).unwrap_err();
    assert_eq!(err.kind, RuleErrorKind::TradeExists);

    // Only the counterparty may accept
    let err = engine
        .apply(
            &state,
            &Action::AcceptOffer {
                token: "top-hat".into(),
                trade: "top-hat:automobile".into(),
            },
        )
        .unwrap_err();
    assert_eq!(err.kind, RuleErrorKind::NotParty);

    state = engine
        .apply(
            &state,
            &Action::AcceptOffer {
                token: "automobile".into(),
                trade: "top-hat:automobile".into(),
            },
        )
        .unwrap();

    assert!(state.trades.is_empty());
    assert_eq!(
        state.properties["oriental-avenue"].owner,
        Owner::Player("automobile".into())
    );
    assert_eq!(state.players["top-hat"].balance, 1400 + 250);
    assert_eq!(state.players["automobile"].balance, 1500 - 250);
}

#[test]
fn test_declined_trade_changes_nothing_but_the_queue() {
    let (engine, mut state) = two_player_room();
    state = engine.apply(&state, &buy("top-hat", "oriental-avenue")).unwrap();
    let before = state.clone();

    state = engine
        .apply(
            &state,
            &Action::NewTrade {
                token: "top-hat".into(),
                other: "automobile".into(),
                offer: TradeSide {
                    properties: vec!["oriental-avenue".into()],
                    amount: 0,
                },
                request: TradeSide {
                    properties: vec![],
                    amount: 250,
                },
            },
        )
        .unwrap();
    state = engine
        .apply(
            &state,
            &Action::DeclineTrade {
                token: "automobile".into(),
                trade: "top-hat:automobile".into(),
            },
        )
        .unwrap();

    assert!(state.trades.is_empty());
    assert_eq!(state.players, before.players);
    assert_eq!(state.properties, before.properties);
}

#[test]
fn test_notices_render_from_templates() {
    let (engine, mut state) = two_player_room();
    state = engine.apply(&state, &buy("top-hat", "oriental-avenue")).unwrap();

    let notice = state.notice.as_ref().unwrap();
    assert_eq!(notice.id, "property.bought");
    assert_eq!(notice.message, "Player 1 bought Oriental Avenue for 100");
    assert_eq!(notice.meta.player.as_deref(), Some("top-hat"));
    assert_eq!(notice.meta.amount, Some(100));
}
