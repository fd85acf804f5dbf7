// Allow unwrap in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]
//! Banker: a deterministic multiplayer Monopoly session engine.
//!
//! This crate keeps the shared financial state of a Monopoly game as a
//! pure state machine:
//! - One authoritative snapshot per room, advanced only by dispatch
//! - Rule validation before any mutation, all-or-nothing transitions
//! - Deterministic replay of recorded action logs
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │         Replay / CLI                │
//! ├─────────────────────────────────────┤
//! │   Dispatch (meta → rules → reduce)  │
//! ├─────────────────────────────────────┤
//! │   Game domain (players, properties) │
//! └─────────────────────────────────────┘
//! ```

pub mod engine;
pub mod error;
pub mod game;
pub mod replay;

pub use error::{RuleError, RuleErrorKind, RuleResult};

// Re-export key types at crate root for convenience
pub use engine::{Action, Engine};
pub use game::{Config, GameState, Money, Notice, Owner, Player, Property, Templates};
pub use replay::{Recording, ReplayEngine, StepOutcome};
