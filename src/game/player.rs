//! Players and asset ownership.

use std::fmt;

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};

use crate::game::Money;

/// Player token, unique per room and drawn from the configured set.
pub type Token = String;

/// Owner of a property or counterparty of a settlement: either a player
/// or the bank pseudo-owner.
///
/// Serializes as the bare string `"bank"` or the player token, matching
/// the wire shape of property documents.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Owner {
    /// The non-player counterparty holding unowned assets.
    Bank,
    /// A player, identified by token.
    Player(Token),
}

impl Owner {
    /// The owning player's token, or `None` for the bank.
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        match self {
            Self::Bank => None,
            Self::Player(token) => Some(token),
        }
    }

    /// String form: `"bank"` or the token.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Bank => "bank",
            Self::Player(token) => token,
        }
    }
}

impl Default for Owner {
    fn default() -> Self {
        Self::Bank
    }
}

impl From<&str> for Owner {
    fn from(s: &str) -> Self {
        if s == "bank" {
            Self::Bank
        } else {
            Self::Player(s.to_owned())
        }
    }
}

impl fmt::Display for Owner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Owner {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Owner {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct OwnerVisitor;

        impl Visitor<'_> for OwnerVisitor {
            type Value = Owner;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("\"bank\" or a player token")
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<Owner, E> {
                Ok(Owner::from(value))
            }
        }

        deserializer.deserialize_str(OwnerVisitor)
    }
}

/// State for a single player.
///
/// Players are created by `JOIN_GAME` and never deleted; bankruptcy only
/// flags them and zeroes their balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Unique token within the room.
    pub token: Token,
    /// Display name.
    pub name: String,
    /// Current balance. Non-negative while the player is solvent.
    pub balance: Money,
    /// Whether the player has gone bankrupt.
    pub bankrupt: bool,
    /// Balance after each balance-changing action, starting with the
    /// joining balance.
    pub history: Vec<Money>,
}

impl Player {
    /// Create a freshly joined player with the given starting balance.
    #[must_use]
    pub fn new(name: impl Into<String>, token: impl Into<Token>, balance: Money) -> Self {
        Self {
            token: token.into(),
            name: name.into(),
            balance,
            bankrupt: false,
            history: vec![balance],
        }
    }

    /// Add to the balance, recording the new balance in the history.
    pub fn credit(&mut self, amount: Money) {
        self.balance += amount;
        self.history.push(self.balance);
    }

    /// Subtract from the balance, recording the new balance in the
    /// history. Validators guarantee the balance never goes negative.
    pub fn debit(&mut self, amount: Money) {
        self.balance -= amount;
        self.history.push(self.balance);
    }

    /// Zero the balance and flag the player bankrupt.
    pub fn go_bankrupt(&mut self) {
        self.balance = 0;
        self.bankrupt = true;
        self.history.push(0);
    }
}
