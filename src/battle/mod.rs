//! Battle state and turn orchestration.
//!
//! - [`BattleContext`]: the mutable state every engine operation receives
//! - [`Battle`]: validates submissions and drives turns
//! - [`BattleEvent`]: the ordered log of everything that happened
//! - [`BattleSnapshot`]: read-only view for rendering and determinism checks

mod context;
mod events;
mod orchestrator;
mod snapshot;

pub use context::BattleContext;
pub use events::BattleEvent;
pub use orchestrator::{Battle, BattleSetup, TurnReport};
pub use snapshot::{AbilityView, BattleSnapshot, CharacterView, EffectView};
