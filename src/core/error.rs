//! Error types for battle setup and action validation.
//!
//! Two classes of failure exist in the engine:
//!
//! - **Invalid input**: a submitted action that fails validation. These are
//!   caller bugs. The turn orchestrator reports them as `BattleError`, discards
//!   the action and mutates nothing.
//! - **Invariant violations** during resolution (an ability-swap pointing at a
//!   slot that does not exist, a roster without its four main abilities).
//!   These are logic defects and trip `debug_assert!` in test builds; they
//!   are not represented here.

use crate::abilities::AbilityId;
use crate::core::{CharacterId, Team};

/// Errors surfaced while setting up a battle or validating a submitted action.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum BattleError {
    /// The battle already has a winner.
    #[error("battle is over (winner: {winner})")]
    BattleOver {
        /// Team that won.
        winner: Team,
    },

    /// Character index outside the six-character battle.
    #[error("{0} does not exist")]
    UnknownCharacter(CharacterId),

    /// Actor is not on the team whose turn it is.
    #[error("{actor} is not on the active team ({active})")]
    NotActingTeam {
        /// The submitting character.
        actor: CharacterId,
        /// Team whose turn it is.
        active: Team,
    },

    /// Actor is dead.
    #[error("{0} is dead")]
    ActorDead(CharacterId),

    /// Actor has already submitted an action this turn.
    #[error("{0} has already acted this turn")]
    AlreadyActed(CharacterId),

    /// Ability is not in the actor's current roster.
    #[error("{ability} is not in the current roster of {actor}")]
    NotInRoster {
        /// The submitting character.
        actor: CharacterId,
        /// The submitted ability.
        ability: AbilityId,
    },

    /// Ability ID is not registered in the content library.
    #[error("{0} is not registered")]
    UnknownAbility(AbilityId),

    /// Character profile name is not registered in the content library.
    #[error("profile {0:?} is not registered")]
    UnknownProfile(String),

    /// Actor is stunned for this ability.
    #[error("{actor} is stunned and cannot use {ability}")]
    Stunned {
        /// The submitting character.
        actor: CharacterId,
        /// The submitted ability.
        ability: AbilityId,
    },

    /// Ability is still cooling down.
    #[error("{ability} is on cooldown for {remaining} more turn(s)")]
    OnCooldown {
        /// The submitted ability.
        ability: AbilityId,
        /// Turns remaining.
        remaining: u32,
    },

    /// Team energy pool cannot pay the ability's effective cost.
    #[error("{team} cannot pay the cost of {ability}")]
    InsufficientEnergy {
        /// Paying team.
        team: Team,
        /// The submitted ability.
        ability: AbilityId,
    },

    /// Ability-specific lockout (missing prerequisite effect, etc.).
    #[error("{ability} is locked out for {actor}")]
    LockedOut {
        /// The submitting character.
        actor: CharacterId,
        /// The submitted ability.
        ability: AbilityId,
    },

    /// Ability currently has no eligible targets.
    #[error("{0} has no valid targets")]
    NoValidTargets(AbilityId),

    /// A submitted target is not eligible for the ability.
    #[error("{target} is not a valid target for {ability}")]
    InvalidTarget {
        /// The submitted ability.
        ability: AbilityId,
        /// The rejected target.
        target: CharacterId,
    },

    /// Roster does not contain exactly three characters per team.
    #[error("team {team} roster has {count} characters, expected 3")]
    InvalidRoster {
        /// Offending team.
        team: Team,
        /// Number of profiles supplied.
        count: usize,
    },

    /// Configuration rejected at setup.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// Snapshot encoding failed.
    #[error("snapshot encoding failed: {0}")]
    Encoding(String),
}

/// Errors found while validating a `BattleConfig`.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// HP ceiling outside the supported range.
    #[error("hp ceiling {0} must be within 1..=200")]
    HpCeiling(i32),

    /// Reaction depth of zero would disable every reaction hook.
    #[error("max reaction depth must be at least 1")]
    ReactionDepth,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BattleError::OnCooldown {
            ability: AbilityId::new(7),
            remaining: 2,
        };
        assert_eq!(err.to_string(), "Ability(7) is on cooldown for 2 more turn(s)");

        let err = BattleError::ActorDead(CharacterId(4));
        assert_eq!(err.to_string(), "Character(4) is dead");
    }

    #[test]
    fn test_config_error_conversion() {
        let err: BattleError = ConfigError::ReactionDepth.into();
        assert!(matches!(err, BattleError::Config(ConfigError::ReactionDepth)));
    }
}
