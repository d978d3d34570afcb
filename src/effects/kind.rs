//! Effect kinds.

use serde::{Deserialize, Serialize};

use super::codec::{CostAdjust, EnergyGainCode, SlotModifier};

/// What an effect does. The meaning of `Effect::magnitude` depends on it.
///
/// ## Magnitude by kind
///
/// - `AllBoost`, `HealBoost`, `AffBoost`, `CooldownMod`: a [`SlotModifier`] code
/// - `AllDr`: flat reduction, negative for vulnerability
/// - `SpecificStun`, `SpecificInvuln`: an `AbilityClass` code
/// - `DestDef`: remaining shield points
/// - `ContDmg`, `ContPierceDmg`, `ContAffDmg`, `ContHeal`, `ContDestDef`: per-turn amount
/// - `CostAdjust`: a [`CostAdjust`] code
/// - `EnergyGain`: an [`EnergyGainCode`] code
/// - `AbilitySwap`: `from_slot * 10 + to_slot`
/// - `ProfSwap`: alternate profile, 1 or 2
/// - `TargetSwap`: `ability_target * 10 + TargetType` code
/// - `Stack`: accumulated count
/// - `Redemption`: boost granted to the character it saves
///
/// Every other kind ignores its magnitude.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EffectKind {
    // === Tags ===
    Unique,
    Mark,
    /// Internal bookkeeping. Never displayed, never blocked.
    System,

    // === Modifiers ===
    AllBoost,
    HealBoost,
    AffBoost,
    CooldownMod,
    AllDr,
    CostAdjust,
    EnergyGain,

    // === Control ===
    AllStun,
    SpecificStun,
    AllInvuln,
    SpecificInvuln,
    StunImmune,
    CounterImmune,
    AffImmune,
    HealNegate,
    BoostNegate,
    DefNegate,
    Isolate,
    Ignore,
    /// Blocks every new non-stun effect on the owner.
    Exclusive,

    // === Shields ===
    DestDef,

    // === Continuous ===
    ContDmg,
    ContPierceDmg,
    ContAffDmg,
    ContHeal,
    ContDestDef,
    /// Channel marker on the user of a multi-turn interaction.
    ContUse,

    // === Reactions ===
    CounterUse,
    CounterReceive,
    Reflect,
    OnDamageDealt,
    OnDamageReceived,
    OnDrain,

    // === Roster ===
    AbilitySwap,
    ProfSwap,
    TargetSwap,

    // === Misc ===
    Stack,
    Redemption,
    /// The owner's actions resolve as the effect's `user`.
    Delegate,
}

impl EffectKind {
    /// Stuns are never blocked by `Exclusive`.
    #[must_use]
    pub const fn is_stun(self) -> bool {
        matches!(self, Self::AllStun | Self::SpecificStun)
    }

    /// Does a duplicate `add` merge into the existing effect instead of being rejected?
    #[must_use]
    pub const fn stacks_on_add(self) -> bool {
        matches!(self, Self::Stack | Self::DestDef)
    }

    /// Fires once per owning turn at end of turn.
    #[must_use]
    pub const fn is_continuous(self) -> bool {
        matches!(
            self,
            Self::ContDmg | Self::ContPierceDmg | Self::ContAffDmg | Self::ContHeal | Self::ContDestDef
        )
    }

    /// Changes what `rebuild_roster` produces.
    #[must_use]
    pub const fn affects_roster(self) -> bool {
        matches!(self, Self::AbilitySwap | Self::ProfSwap)
    }

    /// Carries a `Reaction` payload that the counter resolver or a hook consumes.
    #[must_use]
    pub const fn is_reaction(self) -> bool {
        matches!(
            self,
            Self::CounterUse
                | Self::CounterReceive
                | Self::Reflect
                | Self::OnDamageDealt
                | Self::OnDamageReceived
                | Self::OnDrain
        )
    }

    /// Combine two magnitudes of this kind when stacking.
    ///
    /// Compound codes only add their amount component; the slot and
    /// category of the existing effect are kept.
    #[must_use]
    pub fn combine(self, existing: i32, added: i32) -> i32 {
        match self {
            Self::AllBoost | Self::HealBoost | Self::AffBoost | Self::CooldownMod => {
                let base = SlotModifier::decode(existing);
                let extra = SlotModifier::decode(added);
                SlotModifier::new(base.ability_target, base.amount + extra.amount).encode()
            }
            Self::CostAdjust => {
                let base = CostAdjust::decode(existing);
                let extra = CostAdjust::decode(added);
                CostAdjust { magnitude: base.magnitude + extra.magnitude, ..base }.encode()
            }
            Self::EnergyGain => {
                let base = EnergyGainCode::decode(existing);
                let extra = EnergyGainCode::decode(added);
                EnergyGainCode { amount: base.amount + extra.amount, ..base }.encode()
            }
            _ => existing.saturating_add(added),
        }
    }
}
