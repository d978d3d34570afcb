//! Damage and healing pipeline.
//!
//! Everything that changes HP goes through [`apply_damage`] or
//! [`apply_heal`]. Both are deterministic functions of the battle context:
//! the order of effects in each character's store is the only ordering that
//! matters, apart from shields which absorb soonest-expiring first.
//!
//! ## Damage order
//!
//! 1. Boosts (dealer) for normal and piercing damage, affliction boosts or
//!    affliction immunity for affliction damage
//! 2. Damage reduction (target), normal damage only
//! 3. Floor at zero
//! 4. Redemption on a would-be killing blow
//! 5. Destructible defense, ascending by remaining duration
//! 6. HP, floored at zero, then the death check and reaction hooks

mod actor;
mod damage;
mod drain;
mod heal;
mod hooks;
mod source;

pub use actor::resolve_effective_actor;
pub use damage::{apply_damage, damage_boost, damage_reduction, DamageOutcome};
pub(crate) use damage::slot_modifier_sum;
pub use drain::drain_energy;
pub use heal::{apply_heal, heal_boost};
pub use hooks::{check_on_damage_dealt, check_on_damage_received, check_on_drain};
pub use source::{DamageSource, DamageType};
