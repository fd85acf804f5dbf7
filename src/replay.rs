//! Session replay and time travel.
//!
//! Because dispatch is deterministic, replaying a session requires only
//! its inputs:
//! - the room configuration and property fixtures
//! - the ordered action log, kept as raw JSON values
//!
//! No state deltas are stored. To view the state after action N, re-run
//! the log from action 0 to N.
//!
//! # Time Travel
//!
//! - **Forward**: dispatch the next logged action
//! - **Backward**: re-run from action 0 to (`position` - 1)
//! - **Jump to N**: re-run from action 0 to N

use std::fs::File;
use std::io::{self, BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::engine::{Action, Engine};
use crate::error::RuleError;
use crate::game::{Config, GameState, Notice, PropertyFixture, Templates};

/// Minimal recording of one session: setup documents plus the raw
/// action log.
///
/// Actions are kept as raw JSON so a recording round-trips entries the
/// engine treats as inert, exactly as they arrived.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recording {
    /// Room configuration.
    pub config: Config,
    /// Property fixtures the room was created with.
    pub properties: Vec<PropertyFixture>,
    /// The ordered action log, as received on the wire.
    pub actions: Vec<Value>,
}

impl Recording {
    /// Create a recording from a room's setup documents.
    #[must_use]
    pub fn new(config: Config, properties: Vec<PropertyFixture>) -> Self {
        Self {
            config,
            properties,
            actions: Vec::new(),
        }
    }

    /// Append an action to the log.
    pub fn push(&mut self, action: Value) {
        self.actions.push(action);
    }

    /// Save the recording as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if file operations or serialization fail.
    pub fn save(&self, path: &Path) -> io::Result<()> {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(BufWriter::new(file), self).map_err(io::Error::from)
    }

    /// Load a recording from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if file operations fail or the JSON is invalid.
    pub fn load(path: &Path) -> io::Result<Self> {
        let file = File::open(path)?;
        serde_json::from_reader(BufReader::new(file)).map_err(io::Error::from)
    }
}

/// Error type for replay operations.
#[derive(Debug)]
pub enum ReplayError {
    /// A logged entry with a known action type failed to decode.
    MalformedAction {
        /// Log index of the entry.
        index: usize,
        /// Decode error details.
        error: serde_json::Error,
    },
    /// Requested position past the end of the log.
    PositionOutOfBounds {
        /// Requested position.
        requested: usize,
        /// Log length.
        len: usize,
    },
    /// The log is already fully replayed.
    EndOfLog,
}

impl std::fmt::Display for ReplayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MalformedAction { index, error } => {
                write!(f, "Malformed action at index {index}: {error}")
            }
            Self::PositionOutOfBounds { requested, len } => {
                write!(f, "Position {requested} out of bounds (log length: {len})")
            }
            Self::EndOfLog => write!(f, "End of action log"),
        }
    }
}

impl std::error::Error for ReplayError {}

/// What one replay step did.
#[derive(Debug, Clone)]
pub enum StepOutcome {
    /// The action was accepted; the notice describes it.
    Applied(Option<Notice>),
    /// The action was rejected; the state did not change.
    Rejected(RuleError),
    /// The entry had an unknown action type and was skipped.
    Skipped,
}

/// Replay engine - steps through a session deterministically.
///
/// Since dispatch is deterministic, this engine can:
/// - Step forward by dispatching the next logged action
/// - Step backward by replaying from action 0
/// - Jump to any position by replaying from action 0
#[derive(Debug)]
pub struct ReplayEngine {
    recording: Recording,
    engine: Engine,
    state: GameState,
    position: usize,
}

impl ReplayEngine {
    /// Create a replay engine from a recording, positioned before the
    /// first action.
    #[must_use]
    pub fn new(recording: Recording) -> Self {
        let engine = Engine::new(recording.config.clone(), Templates::builtin());
        let state = engine.new_game(&recording.properties);
        Self {
            recording,
            engine,
            state,
            position: 0,
        }
    }

    /// The recording being replayed.
    #[must_use]
    pub fn recording(&self) -> &Recording {
        &self.recording
    }

    /// Number of log entries dispatched so far.
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    /// The current state.
    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Whether the whole log has been replayed.
    #[must_use]
    pub fn at_end(&self) -> bool {
        self.position >= self.recording.actions.len()
    }

    /// Dispatch the next logged action.
    ///
    /// Rejected actions advance the position without changing the
    /// state; a recorded log may legitimately contain rejections.
    ///
    /// # Errors
    ///
    /// Returns an error at the end of the log or on a malformed entry.
    pub fn step_forward(&mut self) -> Result<StepOutcome, ReplayError> {
        let Some(value) = self.recording.actions.get(self.position) else {
            return Err(ReplayError::EndOfLog);
        };

        let decoded =
            Action::from_value(value).map_err(|error| ReplayError::MalformedAction {
                index: self.position,
                error,
            })?;
        self.position += 1;

        let Some(action) = decoded else {
            return Ok(StepOutcome::Skipped);
        };

        match self.engine.apply(&self.state, &action) {
            Ok(next) => {
                self.state = next;
                Ok(StepOutcome::Applied(self.state.notice.clone()))
            }
            Err(err) => Ok(StepOutcome::Rejected(err)),
        }
    }

    /// Step backward one action by replaying from action 0.
    ///
    /// # Errors
    ///
    /// Returns an error if already positioned before the first action.
    pub fn step_backward(&mut self) -> Result<(), ReplayError> {
        if self.position == 0 {
            return Err(ReplayError::PositionOutOfBounds {
                requested: 0,
                len: self.recording.actions.len(),
            });
        }
        self.goto(self.position - 1)
    }

    /// Jump to a position by replaying from action 0.
    ///
    /// # Errors
    ///
    /// Returns an error if the position is past the end of the log or a
    /// replayed entry is malformed.
    pub fn goto(&mut self, position: usize) -> Result<(), ReplayError> {
        let len = self.recording.actions.len();
        if position > len {
            return Err(ReplayError::PositionOutOfBounds {
                requested: position,
                len,
            });
        }

        let mut fresh = Self::new(self.recording.clone());
        for _ in 0..position {
            fresh.step_forward()?;
        }
        *self = fresh;
        Ok(())
    }

    /// Replay the whole log, returning the final state.
    ///
    /// # Errors
    ///
    /// Returns an error on a malformed entry.
    pub fn run_to_end(&mut self) -> Result<&GameState, ReplayError> {
        while !self.at_end() {
            self.step_forward()?;
        }
        Ok(&self.state)
    }
}
