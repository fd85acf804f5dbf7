//! Benchmarks for the dispatch pipeline.
//!
//! This benchmarks full session replays - the hot path of the audit
//! tooling.

#![allow(missing_docs)]

use std::hint::black_box;

use banker::engine::{Action, Engine};
use banker::game::{Costs, PropertyFixture};
use criterion::{criterion_group, criterion_main, Criterion};

/// A compact two-group board.
fn fixtures() -> Vec<PropertyFixture> {
    let costs = Costs {
        price: 100,
        build: 50,
        rent: [6, 30, 90, 270, 400, 550],
    };
    let mut fixtures: Vec<PropertyFixture> = ["Oriental Avenue", "Vermont Avenue"]
        .iter()
        .map(|name| PropertyFixture {
            name: (*name).to_owned(),
            group: "lightblue".into(),
            costs,
        })
        .collect();
    fixtures.extend(["St. James Place", "Tennessee Avenue", "New York Avenue"].iter().map(
        |name| PropertyFixture {
            name: (*name).to_owned(),
            group: "orange".into(),
            costs: Costs {
                price: 180,
                build: 100,
                rent: [14, 70, 200, 550, 750, 950],
            },
        },
    ));
    fixtures
}

/// A session exercising every pipeline stage: joins, purchases,
/// improvements, rent, an auction, and a trade.
fn session() -> Vec<Action> {
    let mut actions = vec![
        Action::JoinGame {
            name: "Player 1".into(),
            token: "top-hat".into(),
        },
        Action::JoinGame {
            name: "Player 2".into(),
            token: "automobile".into(),
        },
        Action::BuyProperty {
            token: "top-hat".into(),
            property: "oriental-avenue".into(),
            amount: None,
        },
        Action::BuyProperty {
            token: "top-hat".into(),
            property: "vermont-avenue".into(),
            amount: None,
        },
        Action::ImproveProperty {
            token: "top-hat".into(),
            property: "oriental-avenue".into(),
        },
        Action::ImproveProperty {
            token: "top-hat".into(),
            property: "vermont-avenue".into(),
        },
        Action::PayRent {
            token: "automobile".into(),
            property: "oriental-avenue".into(),
            dice: None,
        },
        Action::NewAuction {
            property: "st-james-place".into(),
        },
        Action::Bid {
            token: "automobile".into(),
            amount: 120,
        },
        Action::CloseAuction,
        Action::NewTrade {
            token: "automobile".into(),
            other: "top-hat".into(),
            offer: banker::game::TradeSide {
                properties: vec!["st-james-place".into()],
                amount: 0,
            },
            request: banker::game::TradeSide {
                properties: vec![],
                amount: 150,
            },
        },
    ];
    actions.push(Action::AcceptOffer {
        token: "top-hat".into(),
        trade: "automobile:top-hat".into(),
    });
    actions
}

fn bench_dispatch_session(c: &mut Criterion) {
    let engine = Engine::default();
    let fixtures = fixtures();
    let actions = session();

    c.bench_function("dispatch_session", |b| {
        b.iter(|| {
            let mut state = engine.new_game(black_box(&fixtures));
            for action in &actions {
                state = engine.apply(&state, black_box(action)).expect("valid log");
            }
            black_box(state)
        });
    });
}

fn bench_single_dispatch(c: &mut Criterion) {
    let engine = Engine::default();
    let fixtures = fixtures();
    let mut state = engine.new_game(&fixtures);
    state = engine
        .apply(
            &state,
            &Action::JoinGame {
                name: "Player 1".into(),
                token: "top-hat".into(),
            },
        )
        .expect("join");
    let action = Action::BuyProperty {
        token: "top-hat".into(),
        property: "oriental-avenue".into(),
        amount: None,
    };

    c.bench_function("dispatch_buy", |b| {
        b.iter(|| {
            let next = engine.apply(black_box(&state), black_box(&action));
            black_box(next)
        });
    });
}

criterion_group!(benches, bench_dispatch_session, bench_single_dispatch);
criterion_main!(benches);
