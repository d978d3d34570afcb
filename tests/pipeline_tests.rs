//! Damage and healing pipeline integration tests.
//!
//! These tests drive `combat::apply_damage` and full turns against the demo
//! roster and check HP, shields and redemption outcomes.

use battle_resolver::combat::{self, DamageSource, DamageType};
use battle_resolver::content::demo::{self, ids};
use battle_resolver::core::{ActionSubmission, CharacterId};
use battle_resolver::abilities::Step;
use battle_resolver::effects::{Collapse, Effect, EffectKind, Reaction, SlotModifier};
use battle_resolver::energy::EnergyCategory;
use battle_resolver::BattleEvent;

const VANGUARD: CharacterId = CharacterId(0);
const MEDIC: CharacterId = CharacterId(1);
const SENTINEL: CharacterId = CharacterId(2);
const DUELIST: CharacterId = CharacterId(3);
const MYSTIC: CharacterId = CharacterId(4);
const WARDEN: CharacterId = CharacterId(5);

fn source() -> DamageSource {
    DamageSource::reaction("Test")
}

// =============================================================================
// Reduction and Shield Tests
// =============================================================================

/// Test that flat damage reduction is subtracted from normal damage.
#[test]
fn test_damage_reduction() {
    let mut battle = demo::battle(1).unwrap();
    let ctx = battle.context_mut();
    ctx.add_effect(Effect::new(EffectKind::AllDr, "Guard", DUELIST, DUELIST).with_magnitude(10));

    let outcome = combat::apply_damage(ctx, VANGUARD, DUELIST, 20, DamageType::Normal, &source());

    assert_eq!(outcome.dealt, 10);
    assert_eq!(ctx.character(DUELIST).hp, 90);
}

/// Test that reduction larger than the damage floors at zero.
#[test]
fn test_damage_floors_at_zero() {
    let mut battle = demo::battle(1).unwrap();
    let ctx = battle.context_mut();
    ctx.add_effect(Effect::new(EffectKind::AllDr, "Guard", DUELIST, DUELIST).with_magnitude(50));

    let outcome = combat::apply_damage(ctx, VANGUARD, DUELIST, 20, DamageType::Normal, &source());

    assert_eq!(outcome.effective, 0);
    assert_eq!(ctx.character(DUELIST).hp, 100);
    assert!(!ctx.events().iter().any(|e| matches!(e, BattleEvent::Damage { .. })));
}

/// Test that shields absorb soonest-expiring first and depleted ones are removed.
#[test]
fn test_shields_absorb_in_duration_order() {
    let mut battle = demo::battle(1).unwrap();
    let ctx = battle.context_mut();
    ctx.add_effect(
        Effect::new(EffectKind::DestDef, "Wall", WARDEN, DUELIST)
            .with_magnitude(10)
            .with_duration(5),
    );
    ctx.add_effect(
        Effect::new(EffectKind::DestDef, "Barrier", MYSTIC, DUELIST)
            .with_magnitude(15)
            .with_duration(2),
    );

    let outcome = combat::apply_damage(ctx, VANGUARD, DUELIST, 20, DamageType::Normal, &source());

    assert_eq!(outcome.absorbed, 20);
    assert_eq!(outcome.dealt, 0);
    assert_eq!(ctx.character(DUELIST).hp, 100);

    let effects = &ctx.character(DUELIST).effects;
    assert!(!effects.has(EffectKind::DestDef, "Barrier"));
    assert_eq!(effects.get(EffectKind::DestDef, "Wall").unwrap().magnitude, 5);
    assert!(ctx
        .events()
        .iter()
        .any(|e| matches!(e, BattleEvent::ShieldCollapsed { name, .. } if name == "Barrier")));
}

/// Test that overflow past every shield reaches HP.
#[test]
fn test_shield_overflow() {
    let mut battle = demo::battle(1).unwrap();
    let ctx = battle.context_mut();
    ctx.add_effect(Effect::new(EffectKind::DestDef, "Barrier", MYSTIC, DUELIST).with_magnitude(15));

    let outcome = combat::apply_damage(ctx, VANGUARD, DUELIST, 40, DamageType::Normal, &source());

    assert_eq!(outcome.absorbed, 15);
    assert_eq!(outcome.dealt, 25);
    assert_eq!(ctx.character(DUELIST).hp, 75);
}

/// Test that piercing damage skips reduction but not shields.
#[test]
fn test_piercing_hits_shields() {
    let mut battle = demo::battle(1).unwrap();
    let ctx = battle.context_mut();
    ctx.add_effect(Effect::new(EffectKind::AllDr, "Guard", DUELIST, DUELIST).with_magnitude(10));
    ctx.add_effect(Effect::new(EffectKind::DestDef, "Barrier", MYSTIC, DUELIST).with_magnitude(5));

    let outcome = combat::apply_damage(ctx, VANGUARD, DUELIST, 20, DamageType::Piercing, &source());

    assert_eq!(outcome.absorbed, 5);
    assert_eq!(ctx.character(DUELIST).hp, 85);
}

/// Test that affliction damage skips both reduction and shields.
#[test]
fn test_affliction_bypasses_defense() {
    let mut battle = demo::battle(1).unwrap();
    let ctx = battle.context_mut();
    ctx.add_effect(Effect::new(EffectKind::AllDr, "Guard", DUELIST, DUELIST).with_magnitude(10));
    ctx.add_effect(Effect::new(EffectKind::DestDef, "Barrier", MYSTIC, DUELIST).with_magnitude(50));

    let outcome = combat::apply_damage(ctx, VANGUARD, DUELIST, 10, DamageType::Affliction, &source());

    assert_eq!(outcome.absorbed, 0);
    assert_eq!(ctx.character(DUELIST).hp, 90);
    assert_eq!(
        ctx.character(DUELIST).effects.get(EffectKind::DestDef, "Barrier").unwrap().magnitude,
        50
    );
}

/// Test that a stun-immunity collapse protects the owner from the next stun.
#[test]
fn test_collapse_grants_stun_immunity() {
    let mut battle = demo::battle(1).unwrap();
    let ctx = battle.context_mut();
    ctx.add_effect(
        Effect::new(EffectKind::DestDef, "Barrier", MYSTIC, DUELIST)
            .with_magnitude(5)
            .with_collapse(Collapse::StunImmunity { duration: 1 }),
    );

    combat::apply_damage(ctx, VANGUARD, DUELIST, 10, DamageType::Normal, &source());
    ctx.add_effect(Effect::new(EffectKind::AllStun, "Feint", VANGUARD, DUELIST));

    assert!(ctx.character(DUELIST).effects.has(EffectKind::StunImmune, "Barrier"));
    assert!(!ctx.character(DUELIST).effects.has_kind(EffectKind::AllStun));
}

// =============================================================================
// Redemption Tests
// =============================================================================

/// Test that a redemption mark nullifies a killing blow and sacrifices its user.
#[test]
fn test_redemption_saves_target() {
    let mut battle = demo::battle(1).unwrap();
    let ctx = battle.context_mut();
    ctx.add_effect(
        Effect::new(EffectKind::Redemption, "Sanctuary", MYSTIC, DUELIST)
            .with_magnitude(10)
            .with_duration(2),
    );
    ctx.character_mut(DUELIST).hp = 10;

    let outcome = combat::apply_damage(ctx, VANGUARD, DUELIST, 20, DamageType::Normal, &source());

    assert!(outcome.redeemed);
    assert!(!outcome.killed);
    assert_eq!(ctx.character(DUELIST).hp, 10);
    assert!(ctx.character(MYSTIC).dead);
    assert!(!ctx.character(DUELIST).effects.has(EffectKind::Redemption, "Sanctuary"));

    let boost = ctx.character(DUELIST).effects.get(EffectKind::AllBoost, "Sanctuary").unwrap();
    assert_eq!(boost.magnitude, SlotModifier::all(10).encode());
    assert_eq!(combat::damage_boost(ctx, DUELIST, &source()), 10);
}

/// Test that non-lethal damage leaves the mark in place.
#[test]
fn test_redemption_ignores_survivable_damage() {
    let mut battle = demo::battle(1).unwrap();
    let ctx = battle.context_mut();
    ctx.add_effect(Effect::new(EffectKind::Redemption, "Sanctuary", MYSTIC, DUELIST).with_magnitude(10));

    combat::apply_damage(ctx, VANGUARD, DUELIST, 20, DamageType::Normal, &source());

    assert_eq!(ctx.character(DUELIST).hp, 80);
    assert!(ctx.character(DUELIST).effects.has(EffectKind::Redemption, "Sanctuary"));
    assert!(!ctx.character(MYSTIC).dead);
}

/// Test that a self-placed mark does not save its owner.
#[test]
fn test_self_redemption_does_not_apply() {
    let mut battle = demo::battle(1).unwrap();
    let ctx = battle.context_mut();
    ctx.add_effect(Effect::new(EffectKind::Redemption, "Sanctuary", DUELIST, DUELIST).with_magnitude(10));
    ctx.character_mut(DUELIST).hp = 10;

    let outcome = combat::apply_damage(ctx, VANGUARD, DUELIST, 20, DamageType::Normal, &source());

    assert!(outcome.killed);
    assert!(ctx.character(DUELIST).dead);
}

/// Test redemption placed through the Sanctuary ability.
#[test]
fn test_sanctuary_ability() {
    let mut battle = demo::battle(1).unwrap();
    battle
        .resolve_turn(&[ActionSubmission::single(MEDIC, ids::SANCTUARY, VANGUARD)])
        .unwrap();
    battle.context_mut().character_mut(VANGUARD).hp = 10;

    battle
        .resolve_turn(&[ActionSubmission::single(DUELIST, ids::SLASH, VANGUARD)])
        .unwrap();

    let ctx = battle.context();
    assert_eq!(ctx.character(VANGUARD).hp, 10);
    assert!(ctx.character(MEDIC).dead);
    assert!(ctx.character(VANGUARD).effects.has(EffectKind::AllBoost, "Sanctuary"));
}

// =============================================================================
// Boost and Healing Tests
// =============================================================================

/// Test that Rally boosts an ally's attack in the same turn.
#[test]
fn test_rally_boosts_allies() {
    let mut battle = demo::battle(1).unwrap();
    battle
        .resolve_turn(&[
            ActionSubmission::new(VANGUARD, ids::RALLY),
            ActionSubmission::single(SENTINEL, ids::SHATTER, DUELIST),
        ])
        .unwrap();

    assert_eq!(battle.context().character(DUELIST).hp, 80);
}

/// Test that a stack bonus grows with the dealer's stacks.
#[test]
fn test_slash_stack_bonus() {
    let mut battle = demo::battle(1).unwrap();
    battle.resolve_turn(&[]).unwrap();

    let slash = ActionSubmission::single(DUELIST, ids::SLASH, VANGUARD);
    battle.resolve_turn(&[slash.clone()]).unwrap();
    assert_eq!(battle.context().character(VANGUARD).hp, 85);

    battle.resolve_turn(&[]).unwrap();
    battle.resolve_turn(&[slash]).unwrap();
    // 15 base + 5 for one Edge stack
    assert_eq!(battle.context().character(VANGUARD).hp, 65);
    assert_eq!(
        battle.context().character(DUELIST).effects.get(EffectKind::Stack, "Edge").unwrap().magnitude,
        2
    );
}

/// Test that Finisher spends the Edge stacks.
#[test]
fn test_finisher_consumes_stacks() {
    let mut battle = demo::battle(1).unwrap();
    battle.context_mut().apply_stack(
        Effect::new(EffectKind::Stack, "Edge", DUELIST, DUELIST)
            .with_magnitude(3)
            .permanent(),
    );
    battle.resolve_turn(&[]).unwrap();

    battle
        .resolve_turn(&[ActionSubmission::single(DUELIST, ids::FINISHER, VANGUARD)])
        .unwrap();

    assert_eq!(battle.context().character(VANGUARD).hp, 70);
    assert!(!battle.context().character(DUELIST).effects.has(EffectKind::Stack, "Edge"));
}

/// Test that healing may exceed max HP up to the ceiling.
#[test]
fn test_heal_clamps_to_ceiling() {
    let mut battle = demo::battle(1).unwrap();
    battle.context_mut().character_mut(MEDIC).hp = 190;

    let report = battle.resolve_turn(&[ActionSubmission::new(MEDIC, ids::MEND)]).unwrap();

    assert_eq!(battle.context().character(MEDIC).hp, 200);
    assert!(report
        .events
        .iter()
        .any(|e| matches!(e, BattleEvent::Heal { amount: 10, .. })));
}

/// Test that Purge blocks healing on its target.
#[test]
fn test_purge_negates_healing() {
    let mut battle = demo::battle(1).unwrap();
    battle.resolve_turn(&[]).unwrap();
    battle
        .resolve_turn(&[ActionSubmission::single(DUELIST, ids::SLASH, VANGUARD)])
        .unwrap();
    assert_eq!(battle.context().character(VANGUARD).hp, 85);

    battle
        .context_mut()
        .add_effect(Effect::new(EffectKind::HealNegate, "Purge", DUELIST, VANGUARD));
    battle
        .resolve_turn(&[ActionSubmission::single(MEDIC, ids::MEND, VANGUARD)])
        .unwrap();

    assert_eq!(battle.context().character(VANGUARD).hp, 85);
}

// =============================================================================
// Continuous Effect Tests
// =============================================================================

/// Test that continuous damage fires at the end of its user's turns only.
#[test]
fn test_hex_fires_on_user_turns() {
    let mut battle = demo::battle(1).unwrap();
    battle.resolve_turn(&[]).unwrap();
    battle
        .resolve_turn(&[ActionSubmission::single(MYSTIC, ids::HEX, VANGUARD)])
        .unwrap();
    // Initial hit only; the new effect is still waiting.
    assert_eq!(battle.context().character(VANGUARD).hp, 95);

    battle.resolve_turn(&[]).unwrap();
    assert_eq!(battle.context().character(VANGUARD).hp, 95);

    battle.resolve_turn(&[]).unwrap();
    assert_eq!(battle.context().character(VANGUARD).hp, 90);

    for _ in 0..4 {
        battle.resolve_turn(&[]).unwrap();
    }
    assert_eq!(battle.context().character(VANGUARD).hp, 85);
    assert!(!battle.context().character(VANGUARD).effects.has_kind(EffectKind::ContAffDmg));
}

/// Test that continuous damage stops when its user dies.
#[test]
fn test_continuous_stops_with_dead_user() {
    let mut battle = demo::battle(1).unwrap();
    battle.resolve_turn(&[]).unwrap();
    battle
        .resolve_turn(&[ActionSubmission::single(MYSTIC, ids::HEX, VANGUARD)])
        .unwrap();

    battle.context_mut().kill(MYSTIC);
    for _ in 0..4 {
        battle.resolve_turn(&[]).unwrap();
    }

    assert_eq!(battle.context().character(VANGUARD).hp, 95);
}

// =============================================================================
// Death Tests
// =============================================================================

/// Test that a death keeps the legacy effect even when it is the first one held.
#[test]
fn test_death_keeps_legacy_effect() {
    let mut battle = demo::battle(1).unwrap();
    let ctx = battle.context_mut();
    ctx.add_effect(
        Effect::new(EffectKind::Mark, "Yatsufusa", VANGUARD, VANGUARD)
            .legacy()
            .permanent(),
    );
    ctx.add_effect(Effect::new(EffectKind::AllDr, "Guard", VANGUARD, VANGUARD).with_magnitude(10));

    ctx.kill(VANGUARD);

    let effects = &ctx.character(VANGUARD).effects;
    assert!(ctx.character(VANGUARD).dead);
    assert_eq!(effects.len(), 1);
    assert!(effects.has(EffectKind::Mark, "Yatsufusa"));
}

/// Test that a redemption sacrifice keeps the sacrificed ally's legacy effect.
#[test]
fn test_redemption_sacrifice_keeps_legacy_effect() {
    let mut battle = demo::battle(1).unwrap();
    let ctx = battle.context_mut();
    ctx.add_effect(
        Effect::new(EffectKind::Mark, "Yatsufusa", MYSTIC, MYSTIC)
            .legacy()
            .permanent(),
    );
    ctx.add_effect(Effect::new(EffectKind::AllDr, "Ward", MYSTIC, MYSTIC).with_magnitude(5));
    ctx.add_effect(Effect::new(EffectKind::Redemption, "Sanctuary", MYSTIC, DUELIST).with_magnitude(10));
    ctx.character_mut(DUELIST).hp = 10;

    let outcome = combat::apply_damage(ctx, VANGUARD, DUELIST, 20, DamageType::Normal, &source());

    assert!(outcome.redeemed);
    assert!(ctx.character(MYSTIC).dead);
    let effects = &ctx.character(MYSTIC).effects;
    assert_eq!(effects.len(), 1);
    assert!(effects.has(EffectKind::Mark, "Yatsufusa"));
}

// =============================================================================
// Hook Tests
// =============================================================================

/// Test that a damage-received hook strikes back at the dealer and is consumed.
#[test]
fn test_damage_received_hook() {
    let mut battle = demo::battle(1).unwrap();
    let ctx = battle.context_mut();
    ctx.add_effect(
        Effect::new(EffectKind::OnDamageReceived, "Thorns", DUELIST, DUELIST)
            .with_reaction(Reaction::new().with_step(Step::damage(7, DamageType::Normal))),
    );

    combat::apply_damage(ctx, VANGUARD, DUELIST, 20, DamageType::Normal, &source());

    assert_eq!(ctx.character(DUELIST).hp, 80);
    assert_eq!(ctx.character(VANGUARD).hp, 93);
    assert!(!ctx.character(DUELIST).effects.has_kind(EffectKind::OnDamageReceived));
}

/// Test that a damage-dealt hook follows up on the damaged character.
#[test]
fn test_damage_dealt_hook() {
    let mut battle = demo::battle(1).unwrap();
    let ctx = battle.context_mut();
    ctx.add_effect(
        Effect::new(EffectKind::OnDamageDealt, "Venom", VANGUARD, VANGUARD)
            .with_reaction(Reaction::new().with_step(Step::damage(5, DamageType::Affliction))),
    );

    combat::apply_damage(ctx, VANGUARD, DUELIST, 20, DamageType::Normal, &source());

    assert_eq!(ctx.character(DUELIST).hp, 75);
    assert_eq!(ctx.character(VANGUARD).hp, 100);
    assert!(!ctx.character(VANGUARD).effects.has_kind(EffectKind::OnDamageDealt));
}

/// Test that a drain hook answers the drainer.
#[test]
fn test_drain_hook() {
    let mut battle = demo::battle(1).unwrap();
    let ctx = battle.context_mut();
    ctx.add_effect(
        Effect::new(EffectKind::OnDrain, "Backlash", VANGUARD, VANGUARD)
            .with_reaction(Reaction::new().with_step(Step::damage(10, DamageType::Normal))),
    );

    let moved = combat::drain_energy(ctx, MYSTIC, VANGUARD, EnergyCategory::Physical, 1);

    assert_eq!(moved, 1);
    assert_eq!(ctx.character(MYSTIC).hp, 90);
    assert!(ctx
        .events()
        .iter()
        .any(|e| matches!(e, BattleEvent::EnergyDrained { drainer, victim, amount: 1 } if *drainer == MYSTIC && *victim == VANGUARD)));
}

// =============================================================================
// Boost and Delegation Tests
// =============================================================================

/// Test that affliction boosts raise affliction damage and flat boosts do not.
#[test]
fn test_affliction_boost() {
    let mut battle = demo::battle(1).unwrap();
    let ctx = battle.context_mut();
    ctx.add_effect(
        Effect::new(EffectKind::AffBoost, "Malice", MYSTIC, MYSTIC).with_magnitude(SlotModifier::all(5).encode()),
    );
    ctx.add_effect(
        Effect::new(EffectKind::AllBoost, "Fury", MYSTIC, MYSTIC).with_magnitude(SlotModifier::all(20).encode()),
    );

    let outcome = combat::apply_damage(ctx, MYSTIC, VANGUARD, 10, DamageType::Affliction, &source());

    assert_eq!(outcome.dealt, 15);
    assert_eq!(ctx.character(VANGUARD).hp, 85);
}

/// Test that a delegated action resolves as the delegate while it lives.
#[test]
fn test_delegated_strike() {
    let mut battle = demo::battle(1).unwrap();
    battle
        .context_mut()
        .add_effect(Effect::new(EffectKind::Delegate, "Puppet", MEDIC, VANGUARD));
    assert_eq!(combat::resolve_effective_actor(battle.context(), VANGUARD), MEDIC);

    battle
        .resolve_turn(&[ActionSubmission::single(VANGUARD, ids::STRIKE, DUELIST)])
        .unwrap();

    let ctx = battle.context();
    assert_eq!(ctx.character(DUELIST).hp, 80);
    assert_eq!(ctx.character(MEDIC).stats.damage_dealt, 20);
    assert_eq!(ctx.character(VANGUARD).stats.damage_dealt, 0);
}

/// Test that a dead delegate hands the action back to the actor.
#[test]
fn test_dead_delegate_is_ignored() {
    let mut battle = demo::battle(1).unwrap();
    let ctx = battle.context_mut();
    ctx.add_effect(Effect::new(EffectKind::Delegate, "Puppet", MEDIC, VANGUARD));
    ctx.kill(MEDIC);

    assert_eq!(combat::resolve_effective_actor(ctx, VANGUARD), VANGUARD);
}
