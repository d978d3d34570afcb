//! Battle events.
//!
//! Every observable state change is recorded as a `BattleEvent` in
//! resolution order. The mission tracker consumes them as they are emitted;
//! the caller receives the turn's events in its `TurnReport`.

use serde::{Deserialize, Serialize};

use crate::abilities::AbilityId;
use crate::combat::DamageType;
use crate::core::{CharacterId, Team};
use crate::effects::EffectKind;

/// Something that happened during resolution.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BattleEvent {
    TurnStarted {
        turn: u32,
        team: Team,
    },
    EnergyGained {
        team: Team,
        amount: u32,
    },
    /// An action passed validation and paid its cost.
    ActionExecuted {
        actor: CharacterId,
        ability: AbilityId,
    },
    Countered {
        actor: CharacterId,
        by: CharacterId,
        name: String,
    },
    Reflected {
        actor: CharacterId,
        by: CharacterId,
        ability: AbilityId,
    },
    /// HP damage. `absorbed` went to shields.
    Damage {
        dealer: CharacterId,
        target: CharacterId,
        amount: i32,
        absorbed: i32,
        damage_type: DamageType,
    },
    Heal {
        healer: CharacterId,
        target: CharacterId,
        amount: i32,
    },
    EffectApplied {
        user: CharacterId,
        owner: CharacterId,
        kind: EffectKind,
        name: String,
        magnitude: i32,
    },
    EffectExpired {
        owner: CharacterId,
        kind: EffectKind,
        name: String,
    },
    EffectRemoved {
        owner: CharacterId,
        kind: EffectKind,
        name: String,
    },
    ShieldCollapsed {
        owner: CharacterId,
        user: CharacterId,
        name: String,
    },
    Redeemed {
        saved: CharacterId,
        sacrificed: CharacterId,
        name: String,
    },
    Death {
        character: CharacterId,
    },
    Transformed {
        character: CharacterId,
        from: String,
        to: String,
    },
    EnergyDrained {
        drainer: CharacterId,
        victim: CharacterId,
        amount: u32,
    },
    MissionCompleted {
        character: CharacterId,
        slot: u8,
    },
    TurnEnded {
        turn: u32,
        team: Team,
    },
    BattleWon {
        winner: Team,
    },
}
