use crate::battle::{BattleContext, BattleEvent};
use crate::core::CharacterId;
use crate::effects::EffectKind;

use super::damage::slot_modifier_sum;
use super::source::DamageSource;

/// Flat healing bonus of `healer` for `source`: its `HealBoost` modifiers.
#[must_use]
pub fn heal_boost(ctx: &BattleContext, healer: CharacterId, source: &DamageSource) -> i32 {
    let effects = &ctx.character(healer).effects;
    let negate = effects.has_kind(EffectKind::BoostNegate);
    slot_modifier_sum(effects, EffectKind::HealBoost, source.slot, negate)
}

/// Heal `target` by `amount` plus the healer's boosts, up to the HP ceiling.
///
/// `HealNegate` on the target blocks healing entirely. Returns the HP
/// actually restored.
pub fn apply_heal(
    ctx: &mut BattleContext,
    healer: CharacterId,
    target: CharacterId,
    amount: i32,
    source: &DamageSource,
) -> i32 {
    if !ctx.is_alive(target) || ctx.character(target).effects.has_kind(EffectKind::HealNegate) {
        return 0;
    }

    let mut heal = amount;
    if !source.continuous {
        heal += heal_boost(ctx, healer, source);
    }
    let heal = heal.max(0);

    let ceiling = ctx.config().hp_ceiling;
    let restored = {
        let character = ctx.character_mut(target);
        let before = character.hp;
        character.hp = (before + heal).min(ceiling).max(before);
        character.hp - before
    };
    if restored == 0 {
        return 0;
    }

    ctx.character_mut(healer).stats.healing_done += restored.unsigned_abs();
    ctx.emit(BattleEvent::Heal {
        healer,
        target,
        amount: restored,
    });
    restored
}
