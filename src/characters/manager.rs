//! Per-battle character wrapper.

use smallvec::SmallVec;

use crate::abilities::AbilityId;
use crate::core::{CharacterId, TargetList, Team};

use super::character::Character;

/// Binds a character to its battle position, team and current action.
///
/// Every engine operation addresses characters through their manager's
/// `id`. The manager never holds a reference back to the battle; operations
/// receive the `BattleContext` explicitly.
#[derive(Clone, Debug)]
pub struct CharacterManager {
    pub id: CharacterId,
    /// Natural team. Reflection changes affiliation through
    /// `BattleContext::team_of`, never here.
    pub team: Team,
    pub character: Character,
    /// Targets of the action being resolved.
    pub current_targets: TargetList,
    pub primary_target: Option<CharacterId>,
    /// Ability used this turn, if any.
    pub used_ability: Option<AbilityId>,
}

impl CharacterManager {
    #[must_use]
    pub fn new(id: CharacterId, character: Character) -> Self {
        Self {
            id,
            team: id.team(),
            character,
            current_targets: SmallVec::new(),
            primary_target: None,
            used_ability: None,
        }
    }

    /// Record the action about to execute.
    pub fn set_action(&mut self, ability: AbilityId, primary: Option<CharacterId>, targets: TargetList) {
        self.used_ability = Some(ability);
        self.primary_target = primary;
        self.current_targets = targets;
    }

    /// Forget the previous turn's action.
    pub fn clear_action(&mut self) {
        self.used_ability = None;
        self.primary_target = None;
        self.current_targets.clear();
    }
}
