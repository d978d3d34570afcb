//! Battle content: the ability, profile and mission libraries a battle loads.
//!
//! Content is immutable once a battle starts and is shared between battles
//! through an `Arc`.
//!
//! ```
//! use battle_resolver::abilities::{Ability, AbilityId, ScriptedAbility};
//! use battle_resolver::characters::CharacterProfile;
//! use battle_resolver::content::BattleContent;
//!
//! let ids = [AbilityId::new(1), AbilityId::new(2), AbilityId::new(3), AbilityId::new(4)];
//! let mut content = BattleContent::new();
//! for id in ids {
//!     content = content.with_ability(Ability::new(id, format!("Move {}", id.raw()), ScriptedAbility::new()));
//! }
//! let content = content.with_profile(CharacterProfile::new("Recruit", 100).with_main(&ids));
//!
//! assert!(content.check_profile("Recruit").is_ok());
//! assert!(content.check_profile("Veteran").is_err());
//! ```

pub mod demo;

use std::sync::Arc;

use crate::abilities::{Ability, AbilityRegistry};
use crate::characters::{CharacterProfile, ProfileLibrary};
use crate::core::BattleError;
use crate::missions::{Mission, MissionTable};

/// Everything a battle looks up by ID or name.
#[derive(Clone, Debug, Default)]
pub struct BattleContent {
    pub abilities: AbilityRegistry,
    pub profiles: ProfileLibrary,
    pub missions: MissionTable,
}

impl BattleContent {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an ability. Panics on a duplicate ID.
    #[must_use]
    pub fn with_ability(mut self, ability: Ability) -> Self {
        self.abilities.register(ability);
        self
    }

    /// Register a profile. Panics on a duplicate name.
    #[must_use]
    pub fn with_profile(mut self, profile: CharacterProfile) -> Self {
        self.profiles.register(profile);
        self
    }

    #[must_use]
    pub fn with_mission(mut self, character: impl Into<String>, mission: Mission) -> Self {
        self.missions.add(character, mission);
        self
    }

    /// Look up a profile and check that every ability it lists is registered.
    pub fn check_profile(&self, name: &str) -> Result<Arc<CharacterProfile>, BattleError> {
        let profile = self
            .profiles
            .get(name)
            .ok_or_else(|| BattleError::UnknownProfile(name.to_string()))?;

        if let Some(missing) = profile.all_abilities().find(|&id| !self.abilities.contains(id)) {
            return Err(BattleError::UnknownAbility(missing));
        }
        Ok(Arc::clone(profile))
    }
}
