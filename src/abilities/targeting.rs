//! Default target selection.
//!
//! Candidates come from the ability's (possibly swapped) `TargetType`, then
//! pass a set of filters:
//!
//! - dead characters are never eligible
//! - the actor is eligible only for `include_self` abilities
//! - hostile candidates holding `AllInvuln`, or a `SpecificInvuln` matching
//!   one of the ability's classes, are ineligible
//! - friendly candidates holding `Isolate` are ineligible unless they are the actor
//!
//! "Hostile" is decided by `BattleContext::team_of`, so a reflected actor
//! sees its own team as enemies.

use smallvec::SmallVec;

use crate::battle::BattleContext;
use crate::core::{CharacterId, TargetList};
use crate::effects::{EffectKind, TargetSwapCode};

use super::ability::{Ability, TargetType};

/// The target type after the actor's `TargetSwap` effects.
///
/// The first swap that applies to the ability's slot wins.
#[must_use]
pub fn effective_target_type(ability: &Ability, ctx: &BattleContext, actor: CharacterId) -> TargetType {
    let character = ctx.character(actor);
    let slot = character.ability_slot(ability.id);

    character
        .effects
        .iter_kind(EffectKind::TargetSwap)
        .filter_map(|effect| TargetSwapCode::decode(effect.magnitude))
        .find(|swap| slot.map_or(swap.ability_target == 0, |s| swap.applies_to(s)))
        .map_or(ability.target_type, |swap| swap.target_type)
}

/// Every character the ability may aim at right now, in index order.
#[must_use]
pub fn default_targets(ability: &Ability, ctx: &BattleContext, actor: CharacterId) -> TargetList {
    let target_type = effective_target_type(ability, ctx, actor);
    let mut targets = SmallVec::new();

    for candidate in CharacterId::all() {
        let hostile = ctx.is_hostile(actor, candidate);
        let in_scope = match target_type {
            TargetType::Single => hostile == ability.harmful,
            TargetType::MultiAlly => !hostile,
            TargetType::MultiEnemy => hostile,
            TargetType::All => true,
        };
        if in_scope && passes_filters(ability, ctx, actor, candidate, hostile) {
            targets.push(candidate);
        }
    }

    targets
}

fn passes_filters(
    ability: &Ability,
    ctx: &BattleContext,
    actor: CharacterId,
    candidate: CharacterId,
    hostile: bool,
) -> bool {
    let character = ctx.character(candidate);
    if character.dead {
        return false;
    }
    if candidate == actor {
        return ability.include_self;
    }

    if hostile {
        !character.is_invulnerable_to(&ability.classes)
    } else {
        !character.effects.has_kind(EffectKind::Isolate)
    }
}

/// First entry of `selected` that is not in `valid`, if any.
#[must_use]
pub fn invalid_selection(valid: &[CharacterId], selected: &[CharacterId]) -> Option<CharacterId> {
    selected.iter().copied().find(|target| !valid.contains(target))
}
