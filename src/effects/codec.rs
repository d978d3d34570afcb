//! Compact magnitude codes.
//!
//! Several effect kinds pack a small record into their `i32` magnitude. Each
//! record here reproduces the packing arithmetic exactly so that content data
//! written against the integer form keeps decoding the same way.
//!
//! ## Sign mirroring
//!
//! A negative amount is stored by negating the whole code. Decoding uses
//! truncating division, so every component of a negative code comes out
//! negative; when the amount is negative the other components are flipped
//! back to positive.
//!
//! ```
//! use battle_resolver::effects::CostAdjust;
//!
//! // Slot 1, Random energy, one cheaper.
//! let code = CostAdjust::new(1, 4, -1).encode();
//! assert_eq!(code, -141);
//! assert_eq!(CostAdjust::decode(code), CostAdjust::new(1, 4, -1));
//! ```
//!
//! An `ability_target` of 0 always means "every ability slot".

use serde::{Deserialize, Serialize};

use crate::abilities::TargetType;
use crate::energy::EnergyCategory;

/// Apply the sign of `amount` to a packed non-negative code.
fn mirror(packed: i32, amount: i32) -> i32 {
    if amount < 0 {
        -packed
    } else {
        packed
    }
}

/// `ability_target * 100 + category * 10 + magnitude`.
///
/// Ranges: `ability_target` 0-8, `category` 0-4, `magnitude` -9..=9.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CostAdjust {
    /// 1-based roster slot, or 0 for every slot.
    pub ability_target: i32,
    /// `EnergyCategory` code.
    pub category: i32,
    /// Signed change to that category's cost.
    pub magnitude: i32,
}

impl CostAdjust {
    #[must_use]
    pub const fn new(ability_target: i32, category: i32, magnitude: i32) -> Self {
        Self {
            ability_target,
            category,
            magnitude,
        }
    }

    #[must_use]
    pub fn encode(&self) -> i32 {
        let packed = self.ability_target * 100 + self.category * 10 + self.magnitude.abs();
        mirror(packed, self.magnitude)
    }

    #[must_use]
    pub fn decode(code: i32) -> Self {
        let mut ability_target = code / 100;
        let mut category = (code - ability_target * 100) / 10;
        let magnitude = code - ability_target * 100 - category * 10;
        if magnitude < 0 {
            ability_target = ability_target.abs();
            category = category.abs();
        }
        Self {
            ability_target,
            category,
            magnitude,
        }
    }

    /// The energy category, if the code names a real one.
    #[must_use]
    pub fn energy_category(&self) -> Option<EnergyCategory> {
        u8::try_from(self.category).ok().and_then(EnergyCategory::from_code)
    }

    /// Does this adjustment apply to the ability in `slot` (1-based)?
    #[must_use]
    pub fn applies_to(&self, slot: u8) -> bool {
        self.ability_target == 0 || self.ability_target == i32::from(slot)
    }
}

/// `ability_target * 100 + amount`, used by boosts and cooldown modifiers.
///
/// Ranges: `ability_target` 0-8, `amount` -99..=99.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SlotModifier {
    /// 1-based roster slot, or 0 for every slot.
    pub ability_target: i32,
    /// Signed amount.
    pub amount: i32,
}

impl SlotModifier {
    #[must_use]
    pub const fn new(ability_target: i32, amount: i32) -> Self {
        Self {
            ability_target,
            amount,
        }
    }

    /// A modifier for every slot.
    #[must_use]
    pub const fn all(amount: i32) -> Self {
        Self::new(0, amount)
    }

    #[must_use]
    pub fn encode(&self) -> i32 {
        mirror(self.ability_target * 100 + self.amount.abs(), self.amount)
    }

    #[must_use]
    pub fn decode(code: i32) -> Self {
        let mut ability_target = code / 100;
        let amount = code - ability_target * 100;
        if amount < 0 {
            ability_target = ability_target.abs();
        }
        Self {
            ability_target,
            amount,
        }
    }

    /// Does this modifier apply to an ability in `slot`? Slot-less sources
    /// (continuous effects, reactions) only match slot-agnostic modifiers.
    #[must_use]
    pub fn applies_to(&self, slot: Option<u8>) -> bool {
        self.ability_target == 0 || slot.is_some_and(|s| self.ability_target == i32::from(s))
    }
}

/// `category * 10 + amount`, granted at the start of the owner's turn.
///
/// Ranges: `category` 0-4, `amount` -9..=9. Negative amounts drain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EnergyGainCode {
    /// `EnergyCategory` code.
    pub category: i32,
    /// Signed amount.
    pub amount: i32,
}

impl EnergyGainCode {
    #[must_use]
    pub const fn new(category: i32, amount: i32) -> Self {
        Self { category, amount }
    }

    #[must_use]
    pub fn encode(&self) -> i32 {
        mirror(self.category * 10 + self.amount.abs(), self.amount)
    }

    #[must_use]
    pub fn decode(code: i32) -> Self {
        let mut category = code / 10;
        let amount = code - category * 10;
        if amount < 0 {
            category = category.abs();
        }
        Self { category, amount }
    }

    #[must_use]
    pub fn energy_category(&self) -> Option<EnergyCategory> {
        u8::try_from(self.category).ok().and_then(EnergyCategory::from_code)
    }
}

/// `from_slot * 10 + to_slot`: main slot `from_slot` shows alt ability `to_slot`.
///
/// Both slots are 1-based.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AbilitySwapCode {
    pub from_slot: u8,
    pub to_slot: u8,
}

impl AbilitySwapCode {
    #[must_use]
    pub const fn new(from_slot: u8, to_slot: u8) -> Self {
        Self { from_slot, to_slot }
    }

    #[must_use]
    pub fn encode(&self) -> i32 {
        i32::from(self.from_slot) * 10 + i32::from(self.to_slot)
    }

    /// Returns `None` for negative or out-of-range codes.
    #[must_use]
    pub fn decode(code: i32) -> Option<Self> {
        if !(0..100).contains(&code) {
            return None;
        }
        Some(Self {
            from_slot: (code / 10) as u8,
            to_slot: (code % 10) as u8,
        })
    }
}

/// `ability_target * 10 + TargetType` code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TargetSwapCode {
    /// 1-based roster slot, or 0 for every slot.
    pub ability_target: u8,
    pub target_type: TargetType,
}

impl TargetSwapCode {
    #[must_use]
    pub const fn new(ability_target: u8, target_type: TargetType) -> Self {
        Self {
            ability_target,
            target_type,
        }
    }

    #[must_use]
    pub fn encode(&self) -> i32 {
        i32::from(self.ability_target) * 10 + i32::from(self.target_type.code())
    }

    #[must_use]
    pub fn decode(code: i32) -> Option<Self> {
        if !(0..100).contains(&code) {
            return None;
        }
        let target_type = TargetType::from_code((code % 10) as u8)?;
        Some(Self {
            ability_target: (code / 10) as u8,
            target_type,
        })
    }

    #[must_use]
    pub fn applies_to(&self, slot: u8) -> bool {
        self.ability_target == 0 || self.ability_target == slot
    }
}
