//! Counter and reflect resolution.
//!
//! Before an ability executes, [`resolve`] looks for one reaction that
//! intercepts it. The first match in this order wins and nothing after it
//! is evaluated:
//!
//! 1. `CounterImmune` on the acting character suppresses everything
//! 2. `CounterUse` effects on the acting character
//! 3. `CounterReceive` effects on each hostile target (harmful abilities)
//! 4. helpful `CounterReceive` effects on each friendly target (helpful abilities)
//! 5. `Reflect` effects on each hostile target (harmful abilities)
//!
//! A countered ability does not execute. A reflected ability executes with
//! the actor's affiliation flipped and its targets mirrored by
//! [`reflect_targets`].

use smallvec::SmallVec;
use tracing::debug;

use crate::abilities::{run_reaction, Ability};
use crate::battle::{BattleContext, BattleEvent};
use crate::combat::resolve_effective_actor;
use crate::core::{CharacterId, TargetList};
use crate::effects::{Effect, EffectKind, Reaction};

/// Result of counter resolution for one ability use.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Interception {
    /// Nothing intercepted; execute normally.
    None,
    /// A counter negated the ability.
    Countered {
        /// Character holding the counter effect.
        by: CharacterId,
        name: String,
    },
    /// The ability bounces back onto the actor's team.
    Reflected {
        /// Character holding the reflect effect.
        by: CharacterId,
    },
}

/// Find and fire the reaction intercepting `actor`'s use of `ability`.
///
/// The actor manager's `current_targets` must already be set.
pub fn resolve(ctx: &mut BattleContext, actor: CharacterId, ability: &Ability) -> Interception {
    let attacker = resolve_effective_actor(ctx, actor);
    if ctx.character(attacker).effects.has_kind(EffectKind::CounterImmune) {
        return Interception::None;
    }

    if let Some(counter) = find(ctx, attacker, EffectKind::CounterUse, ability, |_| true) {
        return fire_counter(ctx, actor, attacker, counter);
    }

    let targets = ctx.manager(actor).current_targets.clone();
    let helpful_table = !ability.harmful;
    for &target in &targets {
        if target == actor || ctx.is_hostile(actor, target) != ability.harmful {
            continue;
        }
        let counter = find(ctx, target, EffectKind::CounterReceive, ability, |reaction| {
            reaction.map_or(!helpful_table, |r| r.helpful == helpful_table)
        });
        if let Some(counter) = counter {
            return fire_counter(ctx, actor, target, counter);
        }
    }

    if ability.harmful {
        for &target in &targets {
            if !ctx.is_hostile(actor, target) {
                continue;
            }
            if let Some(reflect) = find(ctx, target, EffectKind::Reflect, ability, |_| true) {
                consume(ctx, target, &reflect);
                debug!(actor = %actor, by = %target, ability = %ability.name, "ability reflected");
                ctx.emit(BattleEvent::Reflected {
                    actor,
                    by: target,
                    ability: ability.id,
                });
                return Interception::Reflected { by: target };
            }
        }
    }

    Interception::None
}

/// First `kind` effect on `holder` whose reaction accepts the ability.
fn find(
    ctx: &BattleContext,
    holder: CharacterId,
    kind: EffectKind,
    ability: &Ability,
    table: impl Fn(Option<&Reaction>) -> bool,
) -> Option<Effect> {
    ctx.character(holder)
        .effects
        .iter_kind(kind)
        .find(|effect| {
            let reaction = effect.reaction.as_deref();
            table(reaction) && reaction.is_none_or(|r| r.accepts(&ability.classes))
        })
        .cloned()
}

fn consume(ctx: &mut BattleContext, holder: CharacterId, effect: &Effect) {
    let persistent = effect.reaction.as_ref().is_some_and(|r| r.persistent);
    if !persistent {
        ctx.remove_effect(holder, &effect.key());
    }
}

fn fire_counter(ctx: &mut BattleContext, actor: CharacterId, holder: CharacterId, counter: Effect) -> Interception {
    consume(ctx, holder, &counter);
    debug!(actor = %actor, by = %holder, counter = %counter.key(), "ability countered");
    ctx.emit(BattleEvent::Countered {
        actor,
        by: holder,
        name: counter.name.clone(),
    });
    run_reaction(ctx, &counter, actor);

    Interception::Countered {
        by: holder,
        name: counter.name,
    }
}

/// Targets of a reflected ability.
///
/// The reflector's place is taken by the actor. Other hostile targets map
/// to the same slot on the actor's team, friendly targets to the same slot
/// on the opposing team. Dead and duplicate entries are dropped.
#[must_use]
pub fn reflect_targets(
    ctx: &BattleContext,
    actor: CharacterId,
    reflector: CharacterId,
    targets: &[CharacterId],
) -> TargetList {
    let home = ctx.manager(actor).team;
    let mut mirrored: TargetList = SmallVec::new();

    for &target in targets {
        let mapped = if target == reflector {
            actor
        } else if target.team() != home {
            CharacterId::from_parts(home, target.slot())
        } else {
            CharacterId::from_parts(home.opponent(), target.slot())
        };
        if ctx.is_alive(mapped) && !mirrored.contains(&mapped) {
            mirrored.push(mapped);
        }
    }
    mirrored
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::demo;

    #[test]
    fn test_reflect_targets_mirror() {
        let battle = demo::battle(3).unwrap();
        let ctx = battle.context();

        let targets = reflect_targets(ctx, CharacterId(0), CharacterId(4), &[CharacterId(3), CharacterId(4)]);
        assert_eq!(targets.as_slice(), &[CharacterId(0)]);

        let targets = reflect_targets(ctx, CharacterId(1), CharacterId(3), &[CharacterId(3), CharacterId(5)]);
        assert_eq!(targets.as_slice(), &[CharacterId(1), CharacterId(2)]);
    }

    #[test]
    fn test_reflect_targets_skip_dead() {
        let mut battle = demo::battle(3).unwrap();
        battle.context_mut().kill(CharacterId(2));

        let targets = reflect_targets(
            battle.context(),
            CharacterId(0),
            CharacterId(3),
            &[CharacterId(3), CharacterId(5)],
        );
        assert_eq!(targets.as_slice(), &[CharacterId(0)]);
    }
}
