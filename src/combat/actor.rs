//! Effective-actor resolution.

use crate::battle::BattleContext;
use crate::core::CharacterId;
use crate::effects::EffectKind;

/// The character an action by `actor` resolves as.
///
/// A `Delegate` effect on the actor hands its actions to the effect's user
/// while that user is alive. Without one the actor acts as itself. Called
/// once at the top of ability execution and counter resolution.
#[must_use]
pub fn resolve_effective_actor(ctx: &BattleContext, actor: CharacterId) -> CharacterId {
    ctx.character(actor)
        .effects
        .iter_kind(EffectKind::Delegate)
        .map(|effect| effect.user)
        .find(|&user| user != actor && ctx.is_alive(user))
        .unwrap_or(actor)
}
