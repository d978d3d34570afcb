//! Static character identities.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::abilities::AbilityId;

/// Main roster size.
pub const MAIN_SLOTS: usize = 4;

/// Maximum alternate abilities.
pub const ALT_SLOTS: usize = 4;

/// Ability list sized for one roster.
pub type Roster = SmallVec<[AbilityId; MAIN_SLOTS]>;

/// A character's static identity.
///
/// ```
/// use battle_resolver::abilities::AbilityId;
/// use battle_resolver::characters::CharacterProfile;
///
/// let profile = CharacterProfile::new("Striker", 100)
///     .with_main(&[AbilityId::new(1), AbilityId::new(2), AbilityId::new(3), AbilityId::new(4)])
///     .with_alt(&[AbilityId::new(5)]);
///
/// assert_eq!(profile.main.len(), 4);
/// assert_eq!(profile.alt[0], AbilityId::new(5));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterProfile {
    pub name: String,
    /// Nominal full health (100-200).
    pub max_hp: i32,
    /// The four main abilities.
    pub main: Roster,
    /// Up to four alternates reachable through ability swaps.
    pub alt: Roster,
    /// Cosmetic alternate profiles selected by `ProfSwap` (1 or 2).
    pub variants: SmallVec<[String; 2]>,
}

impl CharacterProfile {
    pub fn new(name: impl Into<String>, max_hp: i32) -> Self {
        Self {
            name: name.into(),
            max_hp,
            main: SmallVec::new(),
            alt: SmallVec::new(),
            variants: SmallVec::new(),
        }
    }

    #[must_use]
    pub fn with_main(mut self, abilities: &[AbilityId]) -> Self {
        self.main = SmallVec::from_slice(abilities);
        self
    }

    #[must_use]
    pub fn with_alt(mut self, abilities: &[AbilityId]) -> Self {
        self.alt = SmallVec::from_slice(abilities);
        self
    }

    #[must_use]
    pub fn with_variant(mut self, name: impl Into<String>) -> Self {
        self.variants.push(name.into());
        self
    }

    /// Every ability this profile can ever show.
    pub fn all_abilities(&self) -> impl Iterator<Item = AbilityId> + '_ {
        self.main.iter().chain(self.alt.iter()).copied()
    }
}

/// Profile lookup by name.
#[derive(Clone, Debug, Default)]
pub struct ProfileLibrary {
    profiles: FxHashMap<String, Arc<CharacterProfile>>,
}

impl ProfileLibrary {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a profile.
    ///
    /// Panics if a profile with the same name already exists.
    pub fn register(&mut self, profile: CharacterProfile) {
        if self.profiles.contains_key(&profile.name) {
            panic!("Profile {:?} already registered", profile.name);
        }
        self.profiles.insert(profile.name.clone(), Arc::new(profile));
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Arc<CharacterProfile>> {
        self.profiles.get(name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.profiles.contains_key(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<CharacterProfile>> {
        self.profiles.values()
    }
}
