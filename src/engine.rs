//! The session engine.
//!
//! Wraps the dispatch pipeline with the room's static configuration and
//! message templates. An [`Engine`] is cheap to share and never holds
//! game state; callers own their snapshots and feed them back in.

mod action;
mod dispatch;
mod meta;
mod reducers;
mod rules;

pub use action::{Action, ActionKind};
pub use dispatch::dispatch;
pub use meta::{amount_calc, resolve_amount, Calc, Meta};
pub use reducers::Resolution;
pub use rules::{rules_for, Rule};

use crate::error::RuleResult;
use crate::game::{Config, GameState, PropertyFixture, Templates};

/// A configured rule engine for one room.
#[derive(Debug, Clone)]
pub struct Engine {
    config: Config,
    templates: Templates,
}

impl Engine {
    /// Create an engine from a room's configuration and templates.
    #[must_use]
    pub fn new(config: Config, templates: Templates) -> Self {
        Self { config, templates }
    }

    /// The room's static configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The room's message templates.
    #[must_use]
    pub fn templates(&self) -> &Templates {
        &self.templates
    }

    /// Create the initial snapshot for a room.
    #[must_use]
    pub fn new_game(&self, fixtures: &[PropertyFixture]) -> GameState {
        GameState::new(&self.config, fixtures)
    }

    /// Apply an action, producing the next snapshot.
    ///
    /// # Errors
    ///
    /// Returns a [`crate::error::RuleError`] when a rule rejects the
    /// action; the input snapshot is left untouched.
    pub fn apply(&self, state: &GameState, action: &Action) -> RuleResult<GameState> {
        dispatch(state, action, &self.config, &self.templates)
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(Config::default(), Templates::builtin())
    }
}
