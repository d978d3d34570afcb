//! Action representation: actor + ability + targets.
//!
//! The transport layer feeds the engine one `ActionSubmission` per acting
//! character per turn. The engine never interprets where the submission came
//! from; it validates it against the live battle and either executes it or
//! rejects it without mutating anything.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::entity::CharacterId;
use crate::abilities::AbilityId;

/// Target list for one action. Three covers every target type without spilling.
pub type TargetList = SmallVec<[CharacterId; 3]>;

/// One character's action for a turn.
///
/// ## Example
///
/// ```
/// use battle_resolver::abilities::AbilityId;
/// use battle_resolver::core::{ActionSubmission, CharacterId};
///
/// // Single-target attack on Character(3).
/// let strike = ActionSubmission::single(CharacterId(0), AbilityId::new(1), CharacterId(3));
/// assert_eq!(strike.primary_target, Some(CharacterId(3)));
///
/// // Area ability; empty target list means "every eligible target".
/// let sweep = ActionSubmission::new(CharacterId(1), AbilityId::new(2));
/// assert!(sweep.targets.is_empty());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActionSubmission {
    /// The acting character.
    pub actor: CharacterId,

    /// The ability used, which must be in the actor's current roster.
    pub ability: AbilityId,

    /// Target the player clicked, if any.
    pub primary_target: Option<CharacterId>,

    /// Explicit target list. Empty means the ability's default targets.
    pub targets: TargetList,
}

impl ActionSubmission {
    /// Create a submission with default targeting.
    #[must_use]
    pub fn new(actor: CharacterId, ability: AbilityId) -> Self {
        Self {
            actor,
            ability,
            primary_target: None,
            targets: SmallVec::new(),
        }
    }

    /// Create a single-target submission.
    #[must_use]
    pub fn single(actor: CharacterId, ability: AbilityId, target: CharacterId) -> Self {
        Self {
            actor,
            ability,
            primary_target: Some(target),
            targets: SmallVec::from_slice(&[target]),
        }
    }

    /// Set the primary target.
    #[must_use]
    pub fn with_primary(mut self, target: CharacterId) -> Self {
        self.primary_target = Some(target);
        self
    }

    /// Set an explicit target list.
    #[must_use]
    pub fn with_targets(mut self, targets: &[CharacterId]) -> Self {
        self.targets = SmallVec::from_slice(targets);
        self
    }
}

/// A recorded action with its position in the battle for replay.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    /// Turn number when the action was executed.
    pub turn: u32,

    /// Sequence number within the turn.
    pub sequence: u32,

    /// The executed submission.
    pub submission: ActionSubmission,
}

impl ActionRecord {
    /// Create a new action record.
    #[must_use]
    pub fn new(turn: u32, sequence: u32, submission: ActionSubmission) -> Self {
        Self {
            turn,
            sequence,
            submission,
        }
    }
}
