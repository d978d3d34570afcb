//! Reaction hooks fired by the pipeline.
//!
//! A hook effect sits on the character it watches and carries a
//! [`Reaction`](crate::effects::Reaction). When it fires it is consumed
//! unless the reaction is persistent, then its response runs as the
//! effect's user. Class filters only apply to counters, not to hooks.

use tracing::debug;

use crate::abilities::run_reaction;
use crate::battle::BattleContext;
use crate::core::CharacterId;
use crate::effects::{Effect, EffectKind};

/// `OnDamageDealt` effects on `dealer`, aimed at the damaged character.
pub fn check_on_damage_dealt(ctx: &mut BattleContext, dealer: CharacterId, target: CharacterId) {
    fire(ctx, dealer, EffectKind::OnDamageDealt, target);
}

/// `OnDamageReceived` effects on `target`, aimed at the dealer.
pub fn check_on_damage_received(ctx: &mut BattleContext, target: CharacterId, dealer: CharacterId) {
    fire(ctx, target, EffectKind::OnDamageReceived, dealer);
}

/// `OnDrain` effects on the drained character, aimed at the drainer.
pub fn check_on_drain(ctx: &mut BattleContext, victim: CharacterId, drainer: CharacterId) {
    fire(ctx, victim, EffectKind::OnDrain, drainer);
}

fn fire(ctx: &mut BattleContext, holder: CharacterId, kind: EffectKind, trigger: CharacterId) {
    if !ctx.can_react() {
        return;
    }

    let hooks: Vec<Effect> = ctx.character(holder).effects.iter_kind(kind).cloned().collect();
    for hook in hooks {
        // An earlier response may have removed it.
        if !ctx.character(holder).effects.contains_key(&hook.key()) {
            continue;
        }
        let persistent = hook.reaction.as_ref().is_some_and(|reaction| reaction.persistent);
        if !persistent {
            ctx.remove_effect(holder, &hook.key());
        }
        debug!(holder = %holder, hook = %hook.key(), trigger = %trigger, "reaction hook fired");
        run_reaction(ctx, &hook, trigger);
    }
}
