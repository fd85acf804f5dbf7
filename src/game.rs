//! Game domain model.
//!
//! Pure value objects and read-only selectors:
//! - Static configuration and property fixtures
//! - Players, the bank pseudo-owner, and balance history
//! - Properties with derived values and improvement math
//! - Auctions and trades
//! - Notices and message templates
//! - The `GameState` root snapshot with its selectors and invariants

mod auction;
mod config;
mod notice;
mod player;
mod property;
mod state;
mod trade;

pub use auction::{Auction, Bid};
pub use config::{scaled, slugify, Config, Costs, Money, PropertyFixture, Rates};
pub use notice::{Notice, NoticeMeta, Templates};
pub use player::{Owner, Player, Token};
pub use property::{
    any_improved, improvement_plan, improves_evenly, is_monopoly, unimprovement_plan,
    unimproves_evenly, ImprovementPlan, Property, GROUP_RAILROAD, GROUP_UTILITY, HOTEL,
};
pub use state::{check_invariants, GameState, InvariantViolation};
pub use trade::{trade_id, Trade, TradeSide};
