//! Core engine types: characters, teams, actions, RNG, configuration, errors.
//!
//! These are the building blocks every other module is expressed against.
//! None of them know anything about effects or abilities beyond their IDs.

pub mod entity;
pub mod team;
pub mod rng;
pub mod config;
pub mod action;
pub mod error;

pub use entity::{CharacterId, BATTLE_SIZE, TEAM_SIZE};
pub use team::{Team, TeamMap};
pub use rng::{GameRng, GameRngState};
pub use config::{BattleConfig, MAX_HP_CEILING};
pub use action::{ActionRecord, ActionSubmission, TargetList};
pub use error::{BattleError, ConfigError};
