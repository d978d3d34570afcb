use tracing::debug;

use crate::battle::{BattleContext, BattleEvent};
use crate::core::CharacterId;
use crate::effects::{Collapse, Effect, EffectKey, EffectKind, EffectStore, SlotModifier};

use super::hooks;
use super::source::{DamageSource, DamageType};

/// What one damage application did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DamageOutcome {
    /// Damage after boosts and reduction, before shields.
    pub effective: i32,
    /// Absorbed by destructible defense.
    pub absorbed: i32,
    /// Removed from HP.
    pub dealt: i32,
    /// A redemption mark took the blow.
    pub redeemed: bool,
    pub killed: bool,
}

/// Sum of the `kind` slot modifiers in `effects` that apply to `slot`.
///
/// With `negate_positive`, only negative contributions count.
pub(crate) fn slot_modifier_sum(
    effects: &EffectStore,
    kind: EffectKind,
    slot: Option<u8>,
    negate_positive: bool,
) -> i32 {
    effects
        .iter_kind(kind)
        .map(|effect| SlotModifier::decode(effect.magnitude))
        .filter(|modifier| modifier.applies_to(slot))
        .map(|modifier| modifier.amount)
        .filter(|&amount| !(negate_positive && amount > 0))
        .sum()
}

/// Flat damage bonus of `dealer` for non-affliction damage from `source`.
///
/// `AllBoost` modifiers for the source's slot plus the source's stack bonus.
/// A `BoostNegate` on the dealer drops every positive contribution.
#[must_use]
pub fn damage_boost(ctx: &BattleContext, dealer: CharacterId, source: &DamageSource) -> i32 {
    let effects = &ctx.character(dealer).effects;
    let negate = effects.has_kind(EffectKind::BoostNegate);
    let mut boost = slot_modifier_sum(effects, EffectKind::AllBoost, source.slot, negate);

    if let Some(bonus) = &source.stack_bonus {
        let stacks = effects
            .get_with_user(EffectKind::Stack, &bonus.stack_name, dealer)
            .map_or(0, |stack| stack.magnitude);
        let extra = stacks * bonus.per_stack;
        if !(negate && extra > 0) {
            boost += extra;
        }
    }
    boost
}

/// Total `AllDr` on `target`. A `DefNegate` drops the positive part.
#[must_use]
pub fn damage_reduction(ctx: &BattleContext, target: CharacterId) -> i32 {
    let effects = &ctx.character(target).effects;
    let negate = effects.has_kind(EffectKind::DefNegate);
    effects
        .iter_kind(EffectKind::AllDr)
        .map(|effect| effect.magnitude)
        .filter(|&dr| !(negate && dr > 0))
        .sum()
}

/// Deal `amount` raw damage from `dealer` to `target`.
///
/// Dead targets take nothing.
pub fn apply_damage(
    ctx: &mut BattleContext,
    dealer: CharacterId,
    target: CharacterId,
    amount: i32,
    damage_type: DamageType,
    source: &DamageSource,
) -> DamageOutcome {
    let mut outcome = DamageOutcome::default();
    if !ctx.is_alive(target) {
        return outcome;
    }

    let mut damage = amount;
    match damage_type {
        DamageType::Affliction => {
            let target_effects = &ctx.character(target).effects;
            if target_effects.has_kind(EffectKind::AffImmune) {
                damage = 0;
            } else if !source.continuous {
                let dealer_effects = &ctx.character(dealer).effects;
                let negate = dealer_effects.has_kind(EffectKind::BoostNegate);
                damage += slot_modifier_sum(dealer_effects, EffectKind::AffBoost, source.slot, negate);
            }
        }
        DamageType::Normal | DamageType::Piercing => {
            if !source.continuous {
                damage += damage_boost(ctx, dealer, source);
            }
            if damage_type == DamageType::Normal {
                damage -= damage_reduction(ctx, target);
            }
        }
    }
    let damage = damage.max(0);
    outcome.effective = damage;
    if damage == 0 {
        return outcome;
    }

    let shields = if damage_type == DamageType::Affliction {
        0
    } else {
        total_shields(&ctx.character(target).effects)
    };
    if damage >= ctx.character(target).hp + shields && redeem(ctx, target) {
        outcome.redeemed = true;
        return outcome;
    }

    let mut remaining = damage;
    if damage_type != DamageType::Affliction {
        outcome.absorbed = absorb(ctx, target, &mut remaining);
    }

    {
        let character = ctx.character_mut(target);
        outcome.dealt = remaining.min(character.hp);
        character.hp = (character.hp - remaining).max(0);
        character.stats.damage_received += outcome.dealt.unsigned_abs();
    }
    ctx.character_mut(dealer).stats.damage_dealt += outcome.dealt.unsigned_abs();

    ctx.emit(BattleEvent::Damage {
        dealer,
        target,
        amount: outcome.dealt,
        absorbed: outcome.absorbed,
        damage_type,
    });

    if ctx.character(target).hp <= 0 {
        ctx.kill(target);
        outcome.killed = true;
    }

    hooks::check_on_damage_dealt(ctx, dealer, target);
    hooks::check_on_damage_received(ctx, target, dealer);
    outcome
}

fn total_shields(effects: &EffectStore) -> i32 {
    effects
        .iter_kind(EffectKind::DestDef)
        .map(|shield| shield.magnitude.max(0))
        .sum()
}

/// Nullify a killing blow on `target` with its first redemption mark.
///
/// The ally who placed the mark dies instead and the target gains a
/// permanent boost of the mark's magnitude.
fn redeem(ctx: &mut BattleContext, target: CharacterId) -> bool {
    let Some(mark) = ctx
        .character(target)
        .effects
        .iter_kind(EffectKind::Redemption)
        .find(|mark| mark.user != target && ctx.is_alive(mark.user))
        .cloned()
    else {
        return false;
    };

    debug!(saved = %target, sacrificed = %mark.user, mark = %mark.name, "redemption");
    ctx.remove_effect(target, &mark.key());
    ctx.emit(BattleEvent::Redeemed {
        saved: target,
        sacrificed: mark.user,
        name: mark.name.clone(),
    });
    ctx.kill(mark.user);
    ctx.add_effect(
        Effect::new(EffectKind::AllBoost, mark.name.as_str(), mark.user, target)
            .with_magnitude(SlotModifier::all(mark.magnitude).encode())
            .permanent()
            .ready(),
    );
    true
}

/// Run `remaining` through the target's shields, soonest-expiring first.
///
/// Returns the amount absorbed.
fn absorb(ctx: &mut BattleContext, target: CharacterId, remaining: &mut i32) -> i32 {
    let mut shields: Vec<(u32, EffectKey)> = ctx
        .character(target)
        .effects
        .iter_kind(EffectKind::DestDef)
        .map(|shield| (shield.duration, shield.key()))
        .collect();
    // Stable: equal durations keep insertion order.
    shields.sort_by_key(|(duration, _)| *duration);

    let mut absorbed = 0;
    for (_, key) in shields {
        if *remaining == 0 {
            break;
        }
        let Some(shield) = ctx.character_mut(target).effects.get_mut(&key) else {
            continue;
        };
        let taken = (*remaining).min(shield.magnitude.max(0));
        shield.magnitude -= taken;
        *remaining -= taken;
        absorbed += taken;

        if shield.magnitude <= 0 {
            collapse(ctx, target, &key);
        }
    }
    absorbed
}

/// Remove a depleted shield and run its collapse rule.
fn collapse(ctx: &mut BattleContext, owner: CharacterId, key: &EffectKey) {
    let Some(shield) = ctx.remove_effect(owner, key) else {
        return;
    };
    debug!(owner = %owner, shield = %shield.name, collapse = ?shield.collapse, "shield collapsed");
    ctx.emit(BattleEvent::ShieldCollapsed {
        owner,
        user: shield.user,
        name: shield.name.clone(),
    });

    match shield.collapse {
        Collapse::None => {}
        Collapse::StunImmunity { duration } => {
            ctx.add_effect(
                Effect::new(EffectKind::StunImmune, shield.name.as_str(), shield.user, owner)
                    .with_duration(duration),
            );
        }
        Collapse::CascadeRemove => {
            for member in owner.team().members() {
                ctx.full_remove(member, &shield.name, shield.user);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::demo;

    fn setup() -> crate::battle::Battle {
        demo::battle(7).unwrap()
    }

    fn place(battle: &mut crate::battle::Battle, effect: Effect) {
        let owner = effect.owner;
        battle.context_mut().character_mut(owner).effects.add(effect, false);
    }

    #[test]
    fn test_damage_reduction_applies_to_normal() {
        let mut battle = setup();
        let target = CharacterId(0);
        place(
            &mut battle,
            Effect::new(EffectKind::AllDr, "Guard", target, target).with_magnitude(10),
        );

        let source = DamageSource::reaction("Test");
        let ctx = battle.context_mut();
        let outcome = apply_damage(ctx, CharacterId(3), target, 20, DamageType::Normal, &source);

        assert_eq!(outcome.dealt, 10);
        assert_eq!(ctx.character(target).hp, 90);
    }

    #[test]
    fn test_piercing_ignores_reduction() {
        let mut battle = setup();
        let target = CharacterId(0);
        place(
            &mut battle,
            Effect::new(EffectKind::AllDr, "Guard", target, target).with_magnitude(10),
        );

        let source = DamageSource::reaction("Test");
        let ctx = battle.context_mut();
        apply_damage(ctx, CharacterId(3), target, 20, DamageType::Piercing, &source);
        assert_eq!(ctx.character(target).hp, 80);
    }

    #[test]
    fn test_negative_reduction_survives_def_negate() {
        let mut battle = setup();
        let target = CharacterId(0);
        place(
            &mut battle,
            Effect::new(EffectKind::AllDr, "Guard", target, target).with_magnitude(10),
        );
        place(
            &mut battle,
            Effect::new(EffectKind::AllDr, "Expose", CharacterId(3), target).with_magnitude(-5),
        );
        place(&mut battle, Effect::new(EffectKind::DefNegate, "Break", CharacterId(3), target));

        assert_eq!(damage_reduction(battle.context(), target), -5);
    }

    #[test]
    fn test_boost_negate_keeps_penalties() {
        let mut battle = setup();
        let dealer = CharacterId(3);
        place(
            &mut battle,
            Effect::new(EffectKind::AllBoost, "Rage", dealer, dealer).with_magnitude(SlotModifier::all(10).encode()),
        );
        place(
            &mut battle,
            Effect::new(EffectKind::AllBoost, "Weaken", CharacterId(0), dealer)
                .with_magnitude(SlotModifier::all(-4).encode()),
        );

        let source = DamageSource::reaction("Test");
        assert_eq!(damage_boost(battle.context(), dealer, &source), 6);

        place(&mut battle, Effect::new(EffectKind::BoostNegate, "Seal", CharacterId(0), dealer));
        assert_eq!(damage_boost(battle.context(), dealer, &source), -4);
    }

    #[test]
    fn test_slot_boost_only_matches_its_slot() {
        let mut battle = setup();
        let dealer = CharacterId(3);
        place(
            &mut battle,
            Effect::new(EffectKind::AllBoost, "Focus", dealer, dealer)
                .with_magnitude(SlotModifier::new(2, 7).encode()),
        );

        let mut source = DamageSource::reaction("Test");
        assert_eq!(damage_boost(battle.context(), dealer, &source), 0);
        source.slot = Some(2);
        assert_eq!(damage_boost(battle.context(), dealer, &source), 7);
    }

    #[test]
    fn test_affliction_bypasses_shields_and_immunity_zeroes() {
        let mut battle = setup();
        let target = CharacterId(0);
        place(
            &mut battle,
            Effect::new(EffectKind::DestDef, "Barrier", target, target).with_magnitude(50),
        );

        let source = DamageSource::reaction("Test");
        let ctx = battle.context_mut();
        let outcome = apply_damage(ctx, CharacterId(3), target, 15, DamageType::Affliction, &source);
        assert_eq!(outcome.absorbed, 0);
        assert_eq!(ctx.character(target).hp, 85);

        ctx.character_mut(target)
            .effects
            .add(Effect::new(EffectKind::AffImmune, "Ward", target, target), false);
        let outcome = apply_damage(ctx, CharacterId(3), target, 15, DamageType::Affliction, &source);
        assert_eq!(outcome.effective, 0);
        assert_eq!(ctx.character(target).hp, 85);
    }

    #[test]
    fn test_continuous_damage_is_not_boosted() {
        let mut battle = setup();
        let dealer = CharacterId(3);
        place(
            &mut battle,
            Effect::new(EffectKind::AllBoost, "Rage", dealer, dealer).with_magnitude(SlotModifier::all(10).encode()),
        );

        let source = DamageSource::continuous("Burn");
        let ctx = battle.context_mut();
        apply_damage(ctx, dealer, CharacterId(0), 5, DamageType::Normal, &source);
        assert_eq!(ctx.character(CharacterId(0)).hp, 95);
    }

    #[test]
    fn test_lethal_damage_kills_and_floors_hp() {
        let mut battle = setup();
        let source = DamageSource::reaction("Test");
        let ctx = battle.context_mut();

        let outcome = apply_damage(ctx, CharacterId(3), CharacterId(0), 500, DamageType::Normal, &source);
        assert!(outcome.killed);
        assert_eq!(outcome.dealt, 100);
        assert_eq!(ctx.character(CharacterId(0)).hp, 0);
        assert!(ctx.character(CharacterId(0)).dead);
    }

    #[test]
    fn test_collapse_grants_stun_immunity() {
        let mut battle = setup();
        let target = CharacterId(0);
        place(
            &mut battle,
            Effect::new(EffectKind::DestDef, "Aegis", CharacterId(1), target)
                .with_magnitude(5)
                .with_collapse(Collapse::StunImmunity { duration: 1 }),
        );

        let source = DamageSource::reaction("Test");
        let ctx = battle.context_mut();
        apply_damage(ctx, CharacterId(3), target, 8, DamageType::Normal, &source);

        let effects = &ctx.character(target).effects;
        assert!(!effects.has(EffectKind::DestDef, "Aegis"));
        assert!(effects.has(EffectKind::StunImmune, "Aegis"));
        assert_eq!(ctx.character(target).hp, 97);
    }

    #[test]
    fn test_collapse_cascades_team_wide() {
        let mut battle = setup();
        let user = CharacterId(1);
        place(
            &mut battle,
            Effect::new(EffectKind::DestDef, "Link", user, CharacterId(0))
                .with_magnitude(5)
                .with_collapse(Collapse::CascadeRemove),
        );
        place(
            &mut battle,
            Effect::new(EffectKind::AllDr, "Link", user, CharacterId(2)).with_magnitude(5),
        );

        let source = DamageSource::reaction("Test");
        let ctx = battle.context_mut();
        apply_damage(ctx, CharacterId(3), CharacterId(0), 5, DamageType::Normal, &source);

        assert!(!ctx.character(CharacterId(2)).effects.has(EffectKind::AllDr, "Link"));
    }
}
