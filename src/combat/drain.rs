use tracing::debug;

use crate::battle::{BattleContext, BattleEvent};
use crate::core::CharacterId;
use crate::energy::EnergyCategory;

use super::hooks;

/// Move up to `amount` energy of `category` from the victim's team to the
/// drainer's team. Returns the number of units moved.
pub fn drain_energy(
    ctx: &mut BattleContext,
    drainer: CharacterId,
    victim: CharacterId,
    category: EnergyCategory,
    amount: u32,
) -> u32 {
    let from = ctx.team_of(victim);
    let to = ctx.team_of(drainer);
    if from == to || amount == 0 {
        return 0;
    }

    let taken = ctx.remove_energy(from, category, amount);
    let moved = taken.total();
    if moved == 0 {
        return 0;
    }
    ctx.merge_energy(to, &taken);

    debug!(drainer = %drainer, victim = %victim, amount = moved, "energy drained");
    ctx.emit(BattleEvent::EnergyDrained {
        drainer,
        victim,
        amount: moved,
    });
    hooks::check_on_drain(ctx, victim, drainer);
    moved
}
