//! Where damage and healing come from.

use serde::{Deserialize, Serialize};

use crate::abilities::{Ability, StackBonus};

/// How damage interacts with the target's defenses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DamageType {
    /// Boosted, reduced by `AllDr`, absorbed by shields.
    Normal,
    /// Boosted and absorbed by shields, ignores `AllDr`.
    Piercing,
    /// Ignores reduction and shields. Zeroed by `AffImmune`.
    Affliction,
}

/// The ability, reaction or continuous effect producing a pipeline call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DamageSource {
    /// Ability or effect name. Effects created by the source default to it.
    pub name: String,
    /// 1-based roster slot of the ability, used by slot-targeted boosts.
    pub slot: Option<u8>,
    pub stack_bonus: Option<StackBonus>,
    /// Continuous effects are not boosted.
    pub continuous: bool,
}

impl DamageSource {
    /// An ability used from `slot`.
    #[must_use]
    pub fn ability(ability: &Ability, slot: Option<u8>) -> Self {
        Self {
            name: ability.name.clone(),
            slot,
            stack_bonus: ability.stack_bonus.clone(),
            continuous: false,
        }
    }

    /// A continuous effect firing at end of turn.
    pub fn continuous(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            slot: None,
            stack_bonus: None,
            continuous: true,
        }
    }

    /// A counter or hook response.
    pub fn reaction(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            slot: None,
            stack_bonus: None,
            continuous: false,
        }
    }
}
