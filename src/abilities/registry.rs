//! Ability registry for definition lookup.
//!
//! Abilities are shared between every character that lists them, so the
//! registry hands out `Arc<Ability>` handles.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use super::ability::{Ability, AbilityId};

/// Registry of ability definitions.
///
/// ## Example
///
/// ```
/// use battle_resolver::abilities::{Ability, AbilityId, AbilityRegistry, ScriptedAbility};
///
/// let mut registry = AbilityRegistry::new();
/// registry.register(Ability::new(AbilityId::new(1), "Wait", ScriptedAbility::new()));
///
/// assert_eq!(registry.get(AbilityId::new(1)).unwrap().name, "Wait");
/// assert!(registry.get(AbilityId::new(2)).is_none());
/// ```
#[derive(Clone, Debug, Default)]
pub struct AbilityRegistry {
    abilities: FxHashMap<AbilityId, Arc<Ability>>,
}

impl AbilityRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an ability definition.
    ///
    /// Panics if an ability with the same ID already exists.
    pub fn register(&mut self, ability: Ability) {
        if self.abilities.contains_key(&ability.id) {
            panic!("Ability with ID {} already registered", ability.id);
        }
        self.abilities.insert(ability.id, Arc::new(ability));
    }

    /// Get an ability by ID.
    #[must_use]
    pub fn get(&self, id: AbilityId) -> Option<&Arc<Ability>> {
        self.abilities.get(&id)
    }

    /// Check if an ability ID is registered.
    #[must_use]
    pub fn contains(&self, id: AbilityId) -> bool {
        self.abilities.contains_key(&id)
    }

    /// Find an ability by display name.
    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<&Arc<Ability>> {
        self.abilities.values().find(|a| a.name == name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.abilities.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.abilities.is_empty()
    }

    /// Iterate over all definitions (unordered).
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Ability>> {
        self.abilities.values()
    }
}
