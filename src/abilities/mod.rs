//! Ability contract: definitions, targeting, scripted bodies, registry.
//!
//! Every ability exposes three operations, mirroring how the turn
//! orchestrator invokes it:
//!
//! 1. `valid_targets` (pure): who the ability may aim at
//! 2. `check_usable` (pure): stun, cooldown, cost and lockout checks
//! 3. `execute` (mutating): the ability body, run at most once per use

mod ability;
mod registry;
mod script;
pub mod targeting;

pub use ability::{Ability, AbilityBehavior, AbilityClass, AbilityId, StackBonus, TargetType};
pub use registry::AbilityRegistry;
pub use script::{run_reaction, run_steps, EffectTemplate, Requirement, ScriptedAbility, Step};
