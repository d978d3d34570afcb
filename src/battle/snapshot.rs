//! Read-only battle views.
//!
//! A snapshot is what one team may see: effects hidden from the viewer are
//! left out, everything else is copied. Two battles driven by the same seed
//! and the same submissions produce byte-identical snapshots.

use serde::{Deserialize, Serialize};

use crate::abilities::AbilityId;
use crate::core::{BattleError, CharacterId, GameRngState, Team, TeamMap};
use crate::effects::EffectKind;
use crate::energy::EnergyPool;
use crate::missions::MissionProgress;

use super::context::BattleContext;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectView {
    pub kind: EffectKind,
    pub name: String,
    pub user: CharacterId,
    pub magnitude: i32,
    pub duration: u32,
    pub invisible: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityView {
    pub id: AbilityId,
    pub name: String,
    pub cooldown_remaining: u32,
    /// Effective cost after cost adjustments.
    pub total_cost: u32,
    pub usable: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterView {
    pub id: CharacterId,
    /// Display name, including cosmetic variants.
    pub name: String,
    pub hp: i32,
    pub max_hp: i32,
    pub dead: bool,
    pub effects: Vec<EffectView>,
    pub abilities: Vec<AbilityView>,
    pub missions: MissionProgress,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleSnapshot {
    pub turn: u32,
    pub active: Team,
    pub viewer: Team,
    pub winner: Option<Team>,
    pub characters: Vec<CharacterView>,
    pub energy: TeamMap<EnergyPool>,
    pub rng: GameRngState,
}

impl BattleSnapshot {
    #[must_use]
    pub fn capture(ctx: &BattleContext, viewer: Team, winner: Option<Team>) -> Self {
        let characters = CharacterId::all()
            .map(|id| character_view(ctx, id, viewer))
            .collect();

        Self {
            turn: ctx.turn(),
            active: ctx.active_team(),
            viewer,
            winner,
            characters,
            energy: TeamMap::new(|team| ctx.energy(team).clone()),
            rng: ctx.rng().state(),
        }
    }

    #[must_use]
    pub fn character(&self, id: CharacterId) -> &CharacterView {
        &self.characters[id.index()]
    }

    /// Stable binary encoding.
    pub fn to_bytes(&self) -> Result<Vec<u8>, BattleError> {
        bincode::serialize(self).map_err(|err| BattleError::Encoding(err.to_string()))
    }
}

fn character_view(ctx: &BattleContext, id: CharacterId, viewer: Team) -> CharacterView {
    let character = ctx.character(id);

    let effects = character
        .effects
        .visible_to(viewer)
        .map(|effect| EffectView {
            kind: effect.kind,
            name: effect.name.clone(),
            user: effect.user,
            magnitude: effect.magnitude,
            duration: effect.duration,
            invisible: effect.invisible,
        })
        .collect();

    let abilities = character
        .current_abilities
        .iter()
        .filter_map(|&ability_id| {
            let ability = ctx.content().abilities.get(ability_id)?;
            Some(AbilityView {
                id: ability_id,
                name: ability.name.clone(),
                cooldown_remaining: character.cooldown(ability_id),
                total_cost: ability.effective_cost(ctx, id).total_cost(),
                usable: !character.dead && ability.can_use(ctx, id),
            })
        })
        .collect();

    CharacterView {
        id,
        name: character.display_name().to_string(),
        hp: character.hp,
        max_hp: character.profile.max_hp,
        dead: character.dead,
        effects,
        abilities,
        missions: character.missions.clone(),
    }
}
