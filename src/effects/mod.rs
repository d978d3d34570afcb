//! Effect model: timed status records attached to characters.
//!
//! ## Components
//!
//! - [`EffectKind`]: what an effect does
//! - [`Effect`]: the record (identity, magnitude, duration, flags)
//! - [`EffectStore`]: a character's ordered, key-indexed effect set
//! - [`Reaction`]: payload for counters, reflects and damage/drain hooks
//! - codecs for the compound magnitude encodings
//!
//! Stores know nothing about teams or the rest of the battle. Callers pass
//! in whether an addition is hostile, and cross-character consequences
//! (events, roster rebuilds, missions) are handled by `BattleContext`.

mod codec;
mod effect;
mod kind;
mod reaction;
mod store;

pub use codec::{AbilitySwapCode, CostAdjust, EnergyGainCode, SlotModifier, TargetSwapCode};
pub use effect::{Collapse, Effect, EffectKey};
pub use kind::EffectKind;
pub use reaction::{Reaction, ReactionTarget};
pub use store::{AddOutcome, BlockReason, EffectStore};
