//! # battle-resolver
//!
//! A deterministic combat resolver for turn-based 3v3 team battles.
//!
//! ## Design Principles
//!
//! 1. **Data-Driven Content**: Characters, abilities and missions are tables
//!    registered at startup. The engine knows effect kinds, not characters.
//!
//! 2. **Deterministic**: All randomness flows through one seeded `GameRng`.
//!    The same seed and submissions always produce the same battle.
//!
//! 3. **Validate, Then Mutate**: A rejected submission never changes state.
//!
//! ## Architecture
//!
//! - **Effects**: Every buff, debuff, counter and mission tracker is an
//!   `Effect` in its owner's `EffectStore`, keyed by (kind, name, user).
//!
//! - **Persistent Data Structures**: Effect lists live in `im-rs` vectors so
//!   snapshots and speculative clones stay cheap.
//!
//! - **Events**: Every state change emits a `BattleEvent`. Missions observe
//!   the event log; clients render it.
//!
//! ## Modules
//!
//! - `core`: Character and team IDs, RNG, configuration, actions, errors
//! - `energy`: Energy pools and ability costs
//! - `effects`: Effect kinds, magnitude codecs and the per-character store
//! - `abilities`: Ability definitions, targeting and scripted behaviors
//! - `characters`: Profiles and live character state
//! - `combat`: Damage, healing and drain pipelines plus reaction hooks
//! - `counters`: Counter and reflect interception
//! - `missions`: Declarative mission rules and progress
//! - `battle`: Battle state and turn orchestration
//! - `content`: Content tables and a demo roster
//!
//! ## Quick Start
//!
//! ```
//! use battle_resolver::content::demo::{self, ids};
//! use battle_resolver::{ActionSubmission, CharacterId, Team};
//!
//! let mut battle = demo::battle(42).unwrap();
//!
//! // Vanguard strikes the Duelist, then the turn passes to team 1.
//! let report = battle
//!     .resolve_turn(&[ActionSubmission::single(CharacterId(0), ids::STRIKE, CharacterId(3))])
//!     .unwrap();
//! assert!(report.rejected.is_empty());
//! assert_eq!(battle.active_team(), Team::new(1));
//!
//! let view = battle.snapshot(Team::new(1));
//! assert_eq!(view.character(CharacterId(3)).hp, 80);
//! ```

pub mod core;
pub mod energy;
pub mod effects;
pub mod abilities;
pub mod characters;
pub mod combat;
pub mod counters;
pub mod missions;
pub mod battle;
pub mod content;

// Re-export commonly used types
pub use crate::core::{
    ActionRecord, ActionSubmission, BattleConfig, BattleError, CharacterId, ConfigError, GameRng, GameRngState,
    TargetList, Team, TeamMap,
};

pub use crate::energy::{CostVector, EnergyCategory, EnergyPool};

pub use crate::effects::{Collapse, Effect, EffectKey, EffectKind, EffectStore, Reaction};

pub use crate::abilities::{Ability, AbilityBehavior, AbilityClass, AbilityId, AbilityRegistry, TargetType};

pub use crate::characters::{Character, CharacterProfile, ProfileLibrary};

pub use crate::combat::{DamageSource, DamageType};

pub use crate::missions::{CompletedMission, Mission, MissionTable};

pub use crate::battle::{Battle, BattleContext, BattleEvent, BattleSetup, BattleSnapshot, TurnReport};

pub use crate::content::BattleContent;
