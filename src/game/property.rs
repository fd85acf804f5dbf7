//! The property domain model.
//!
//! Properties are value objects owned by the room's `GameState`; derived
//! values (mortgage value, rent, monopoly status) are computed on demand
//! from the current snapshot and never stored, so they cannot go stale
//! across reducer passes. Group-level predicates take the group slice
//! explicitly instead of consulting any shared registry.

use serde::{Deserialize, Serialize};

use crate::game::config::{scaled, Costs, PropertyFixture, Rates};
use crate::game::player::Owner;
use crate::game::{slugify, Money};

/// Group name for railroads, which cannot carry buildings.
pub const GROUP_RAILROAD: &str = "railroad";

/// Group name for utilities, which cannot carry buildings and whose rent
/// is scaled by a caller-supplied dice total.
pub const GROUP_UTILITY: &str = "utility";

/// Building count representing a hotel.
pub const HOTEL: u8 = 5;

/// A single ownable property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    /// Unique id within the room (slug of the name).
    pub id: String,
    /// Display name.
    pub name: String,
    /// Color or category group.
    pub group: String,
    /// Current owner; the bank until bought or auctioned.
    pub owner: Owner,
    /// Building count: 0-4 houses, 5 is a hotel.
    pub buildings: u8,
    /// Whether rent collection is disabled in exchange for cash.
    pub mortgaged: bool,
    /// Purchase, build, and rent costs.
    pub costs: Costs,
}

impl Property {
    /// Build a property from its room-setup fixture. Ownership starts
    /// with the bank, unimproved and unmortgaged.
    #[must_use]
    pub fn from_fixture(fixture: &PropertyFixture) -> Self {
        Self {
            id: slugify(&fixture.name),
            name: fixture.name.clone(),
            group: fixture.group.clone(),
            owner: Owner::Bank,
            buildings: 0,
            mortgaged: false,
            costs: fixture.costs,
        }
    }

    /// Whether the property carries any buildings.
    #[must_use]
    pub fn is_improved(&self) -> bool {
        self.buildings > 0
    }

    /// Whether the property carries a hotel.
    #[must_use]
    pub fn is_fully_improved(&self) -> bool {
        self.buildings == HOTEL
    }

    /// Railroads and utilities cannot carry buildings.
    #[must_use]
    pub fn is_special_group(&self) -> bool {
        self.group == GROUP_RAILROAD || self.group == GROUP_UTILITY
    }

    /// Cash received when mortgaging: `round(price * rates.mortgage)`.
    #[must_use]
    pub fn mortgage_value(&self, rates: &Rates) -> Money {
        scaled(self.costs.price, rates.mortgage)
    }

    /// Resale value of one building: `round(build * rates.building)`.
    #[must_use]
    pub fn building_value(&self, rates: &Rates) -> Money {
        scaled(self.costs.build, rates.building)
    }

    /// Interest due on top of the principal when unmortgaging.
    #[must_use]
    pub fn interest(&self, rates: &Rates) -> Money {
        scaled(self.mortgage_value(rates), rates.interest)
    }

    /// Total value: mortgage value plus the resale value of buildings.
    #[must_use]
    pub fn value(&self, rates: &Rates) -> Money {
        self.mortgage_value(rates) + Money::from(self.buildings) * self.building_value(rates)
    }
}

/// Whether every property in the group is owned by the same player.
///
/// A group fully held by the bank is not a monopoly.
#[must_use]
pub fn is_monopoly(group: &[&Property]) -> bool {
    match group.first().map(|p| &p.owner) {
        None | Some(Owner::Bank) => false,
        Some(owner) => group.iter().all(|p| p.owner == *owner),
    }
}

/// Whether any property in the group carries buildings.
///
/// Improved groups block transfers, mortgages, and bankruptcy.
#[must_use]
pub fn any_improved(group: &[&Property]) -> bool {
    group.iter().any(|p| p.is_improved())
}

/// Even-building check for adding a building to `property`.
///
/// Every sibling must already carry the same count or exactly one more;
/// otherwise the new building would fall two below a sibling.
#[must_use]
pub fn improves_evenly(group: &[&Property], property: &Property) -> bool {
    let count = property.buildings;
    group
        .iter()
        .all(|p| p.buildings == count || p.buildings == count + 1)
}

/// Even-building check for removing a building from `property`.
///
/// Every sibling must carry the same count or exactly one fewer;
/// removal is only allowed from the top of the group.
#[must_use]
pub fn unimproves_evenly(group: &[&Property], property: &Property) -> bool {
    let count = property.buildings;
    group
        .iter()
        .all(|p| p.buildings == count || p.buildings + 1 == count)
}

/// Pool adjustment for one improve or unimprove step.
///
/// Positive components are taken from the shared pool, negative ones are
/// returned to it. The pool reducer applies the plan atomically with the
/// property's building count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ImprovementPlan {
    /// Houses taken from (positive) or returned to (negative) the pool.
    pub houses: i32,
    /// Hotels taken from (positive) or returned to (negative) the pool.
    pub hotels: i32,
}

/// Plan for adding a building to a property currently at `buildings`.
///
/// The fourth-to-fifth step swaps four houses back to the pool for one
/// hotel; every other step takes a single house.
#[must_use]
pub fn improvement_plan(buildings: u8) -> ImprovementPlan {
    if buildings == HOTEL - 1 {
        ImprovementPlan {
            houses: -4,
            hotels: 1,
        }
    } else {
        ImprovementPlan {
            houses: 1,
            hotels: 0,
        }
    }
}

/// Plan for removing a building from a property currently at `buildings`.
///
/// Releasing a hotel takes four houses back out of the pool, so the pool
/// must be able to cover them.
#[must_use]
pub fn unimprovement_plan(buildings: u8) -> ImprovementPlan {
    if buildings == HOTEL {
        ImprovementPlan {
            houses: 4,
            hotels: -1,
        }
    } else {
        ImprovementPlan {
            houses: -1,
            hotels: 0,
        }
    }
}

/// Kani formal verification proofs for the building-pool arithmetic.
///
/// Run with: `cargo kani`
#[cfg(kani)]
mod kani_proofs {
    use super::*;

    /// Applying a plan whose positive components the pool covers never
    /// drives a counter negative.
    #[kani::proof]
    fn prove_pool_stays_non_negative() {
        let houses: u32 = kani::any();
        let hotels: u32 = kani::any();
        let buildings: u8 = kani::any();
        if buildings > HOTEL {
            return;
        }

        for plan in [improvement_plan(buildings), unimprovement_plan(buildings)] {
            let covered = (plan.houses <= 0 || houses >= plan.houses.unsigned_abs())
                && (plan.hotels <= 0 || hotels >= plan.hotels.unsigned_abs());
            if covered {
                let houses_after = i64::from(houses) - i64::from(plan.houses);
                let hotels_after = i64::from(hotels) - i64::from(plan.hotels);
                assert!(houses_after >= 0);
                assert!(hotels_after >= 0);
            }
        }
    }

    /// Improve and unimprove plans around the same boundary cancel out.
    #[kani::proof]
    fn prove_plans_are_inverse() {
        let buildings: u8 = kani::any();
        if buildings >= HOTEL {
            return;
        }

        let up = improvement_plan(buildings);
        let down = unimprovement_plan(buildings + 1);
        assert_eq!(up.houses + down.houses, 0);
        assert_eq!(up.hotels + down.hotels, 0);
    }
}
