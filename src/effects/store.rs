//! Indexed per-character effect collection.
//!
//! Effects keep their insertion order (queries are first-match in that
//! order) and are indexed by `(kind, name, user)` so that the one-per-key
//! invariant is enforced on insert rather than by scanning.
//!
//! The ordered list is an `im::Vector`, so cloning a character's effect set
//! for a snapshot is O(1).

use im::Vector;
use rustc_hash::FxHashMap;

use crate::core::{CharacterId, Team};

use super::effect::{Effect, EffectKey};
use super::kind::EffectKind;

/// Result of adding an effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AddOutcome {
    /// Appended as a new effect.
    Added,
    /// Merged into an existing effect with the same key.
    Stacked,
    /// Same key already present and the kind does not stack.
    Rejected,
    /// Refused by an owner-side blocking effect.
    Blocked(BlockReason),
}

impl AddOutcome {
    /// Did the owner's effect state change?
    #[must_use]
    pub fn applied(self) -> bool {
        matches!(self, Self::Added | Self::Stacked)
    }
}

/// Which owner-side effect refused an addition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BlockReason {
    Exclusive,
    StunImmune,
    Ignore,
    Isolate,
}

/// The live effect set of one character.
///
/// ```
/// use battle_resolver::core::CharacterId;
/// use battle_resolver::effects::{AddOutcome, Effect, EffectKind, EffectStore};
///
/// let mut store = EffectStore::new();
/// let stack = Effect::new(EffectKind::Stack, "Sword", CharacterId(0), CharacterId(0))
///     .with_magnitude(1);
///
/// assert_eq!(store.apply_stack(stack.clone(), false), AddOutcome::Added);
/// assert_eq!(store.apply_stack(stack, false), AddOutcome::Stacked);
/// assert_eq!(store.len(), 1);
/// assert_eq!(store.get(EffectKind::Stack, "Sword").unwrap().magnitude, 2);
/// ```
#[derive(Clone, Debug, Default)]
pub struct EffectStore {
    effects: Vector<Effect>,
    index: FxHashMap<EffectKey, usize>,
}

impl EffectStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.effects.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    /// Iterate in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Effect> {
        self.effects.iter()
    }

    /// Clone of the ordered list.
    #[must_use]
    pub fn to_vector(&self) -> Vector<Effect> {
        self.effects.clone()
    }

    // === Insertion ===

    /// Would an owner-side effect block this addition?
    ///
    /// `hostile` is whether the user is currently opposed to the owner.
    #[must_use]
    pub fn blocker(&self, effect: &Effect, hostile: bool) -> Option<BlockReason> {
        if effect.system {
            return None;
        }

        let exclusive = self
            .iter_kind(EffectKind::Exclusive)
            .any(|ex| ex.name != effect.name);
        if exclusive && !effect.kind.is_stun() {
            return Some(BlockReason::Exclusive);
        }
        if hostile && effect.kind.is_stun() && self.has_kind(EffectKind::StunImmune) {
            return Some(BlockReason::StunImmune);
        }
        if hostile && self.has_kind(EffectKind::Ignore) {
            return Some(BlockReason::Ignore);
        }
        if !hostile && effect.user != effect.owner && self.has_kind(EffectKind::Isolate) {
            return Some(BlockReason::Isolate);
        }
        None
    }

    /// Add an effect, honoring blocking and the kind's duplicate policy.
    pub fn add(&mut self, effect: Effect, hostile: bool) -> AddOutcome {
        if let Some(reason) = self.blocker(&effect, hostile) {
            return AddOutcome::Blocked(reason);
        }

        let key = effect.key();
        if self.index.contains_key(&key) {
            if effect.kind.stacks_on_add() {
                self.merge(&key, &effect);
                return AddOutcome::Stacked;
            }
            return AddOutcome::Rejected;
        }

        self.index.insert(key, self.effects.len());
        self.effects.push_back(effect);
        AddOutcome::Added
    }

    /// Merge into the effect with the same key, or add it if there is none.
    ///
    /// Magnitudes combine per [`EffectKind::combine`]; the longer duration wins.
    pub fn apply_stack(&mut self, effect: Effect, hostile: bool) -> AddOutcome {
        if let Some(reason) = self.blocker(&effect, hostile) {
            return AddOutcome::Blocked(reason);
        }

        let key = effect.key();
        if self.index.contains_key(&key) {
            self.merge(&key, &effect);
            return AddOutcome::Stacked;
        }

        self.index.insert(key, self.effects.len());
        self.effects.push_back(effect);
        AddOutcome::Added
    }

    fn merge(&mut self, key: &EffectKey, incoming: &Effect) {
        if let Some(existing) = self.get_mut(key) {
            existing.magnitude = existing.kind.combine(existing.magnitude, incoming.magnitude);
            existing.duration = existing.duration.max(incoming.duration);
        }
    }

    // === Removal ===

    /// Remove the effect with this identity.
    pub fn remove(&mut self, key: &EffectKey) -> Option<Effect> {
        let position = self.index.remove(key)?;
        let removed = self.effects.remove(position);
        self.rebuild_index();
        Some(removed)
    }

    /// Remove every effect named `name` applied by `user`, whatever its kind.
    pub fn full_remove(&mut self, name: &str, user: CharacterId) -> Vec<Effect> {
        self.remove_where(|e| e.user == user && e.name == name)
    }

    /// Remove every effect matching the predicate, returning them in order.
    pub fn remove_where(&mut self, mut predicate: impl FnMut(&Effect) -> bool) -> Vec<Effect> {
        if !self.effects.iter().any(&mut predicate) {
            return Vec::new();
        }

        let mut removed = Vec::new();
        let mut kept = Vector::new();
        for effect in std::mem::take(&mut self.effects) {
            if predicate(&effect) {
                removed.push(effect);
            } else {
                kept.push_back(effect);
            }
        }
        self.effects = kept;
        self.rebuild_index();
        removed
    }

    /// Death clear: drop everything except the first `legacy` effect.
    pub fn clear_on_death(&mut self) -> Vec<Effect> {
        let heirloom = self.effects.iter().find(|e| e.legacy).map(Effect::key);
        self.remove_where(|effect| heirloom.as_ref() != Some(&effect.key()))
    }

    fn rebuild_index(&mut self) {
        self.index.clear();
        for (position, effect) in self.effects.iter().enumerate() {
            self.index.insert(effect.key(), position);
        }
    }

    // === Queries ===

    /// First effect of this kind and name, from any user.
    #[must_use]
    pub fn get(&self, kind: EffectKind, name: &str) -> Option<&Effect> {
        self.effects.iter().find(|e| e.kind == kind && e.name == name)
    }

    #[must_use]
    pub fn has(&self, kind: EffectKind, name: &str) -> bool {
        self.get(kind, name).is_some()
    }

    /// The effect with this exact identity.
    #[must_use]
    pub fn get_with_user(&self, kind: EffectKind, name: &str, user: CharacterId) -> Option<&Effect> {
        self.get_key(&EffectKey::new(kind, name, user))
    }

    #[must_use]
    pub fn get_key(&self, key: &EffectKey) -> Option<&Effect> {
        self.index.get(key).and_then(|&position| self.effects.get(position))
    }

    pub fn get_mut(&mut self, key: &EffectKey) -> Option<&mut Effect> {
        let position = *self.index.get(key)?;
        self.effects.get_mut(position)
    }

    #[must_use]
    pub fn contains_key(&self, key: &EffectKey) -> bool {
        self.index.contains_key(key)
    }

    #[must_use]
    pub fn has_kind(&self, kind: EffectKind) -> bool {
        self.effects.iter().any(|e| e.kind == kind)
    }

    /// Effects of one kind in insertion order.
    pub fn iter_kind(&self, kind: EffectKind) -> impl Iterator<Item = &Effect> {
        self.effects.iter().filter(move |e| e.kind == kind)
    }

    /// Effects the given team may see: never `system`, and `invisible` ones
    /// only when their user is on that team.
    pub fn visible_to(&self, viewer: Team) -> impl Iterator<Item = &Effect> {
        self.effects
            .iter()
            .filter(move |e| !e.system && (!e.invisible || e.user.team() == viewer))
    }

    // === Ticking ===

    /// End-of-turn tick. Waiting effects only lose their flag; others lose
    /// one turn of duration. Returns the expired effects.
    pub fn tick(&mut self) -> Vec<Effect> {
        let mut expired = Vec::new();
        let mut kept = Vector::new();

        for mut effect in std::mem::take(&mut self.effects) {
            if effect.waiting {
                effect.waiting = false;
            } else if !effect.is_permanent() {
                effect.duration = effect.duration.saturating_sub(1);
            }

            if effect.duration == 0 && !effect.waiting {
                expired.push(effect);
            } else {
                kept.push_back(effect);
            }
        }

        self.effects = kept;
        if !expired.is_empty() {
            self.rebuild_index();
        }
        expired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mark(name: &str, user: u8) -> Effect {
        Effect::new(EffectKind::Mark, name, CharacterId(user), CharacterId(0))
    }

    #[test]
    fn test_add_rejects_duplicate() {
        let mut store = EffectStore::new();
        assert_eq!(store.add(mark("Tag", 1), false), AddOutcome::Added);
        assert_eq!(store.add(mark("Tag", 1), false), AddOutcome::Rejected);
        assert_eq!(store.add(mark("Tag", 2), false), AddOutcome::Added);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_add_stacks_shields() {
        let mut store = EffectStore::new();
        let shield = Effect::new(EffectKind::DestDef, "Wall", CharacterId(0), CharacterId(0))
            .with_magnitude(10)
            .with_duration(2);

        store.add(shield.clone(), false);
        assert_eq!(store.add(shield.with_duration(3), false), AddOutcome::Stacked);

        let merged = store.get(EffectKind::DestDef, "Wall").unwrap();
        assert_eq!(merged.magnitude, 20);
        assert_eq!(merged.duration, 3);
    }

    #[test]
    fn test_exclusive_blocks_non_stun() {
        let mut store = EffectStore::new();
        store.add(
            Effect::new(EffectKind::Exclusive, "Plasma Bomb", CharacterId(3), CharacterId(0)),
            true,
        );

        let boost = Effect::new(EffectKind::AllBoost, "Focus", CharacterId(0), CharacterId(0));
        assert_eq!(store.add(boost, false), AddOutcome::Blocked(BlockReason::Exclusive));

        let stun = Effect::new(EffectKind::AllStun, "Freeze", CharacterId(4), CharacterId(0));
        assert_eq!(store.add(stun, true), AddOutcome::Added);

        let same_source = Effect::new(EffectKind::ContDmg, "Plasma Bomb", CharacterId(3), CharacterId(0));
        assert_eq!(store.add(same_source, true), AddOutcome::Added);
    }

    #[test]
    fn test_system_never_blocked() {
        let mut store = EffectStore::new();
        store.add(
            Effect::new(EffectKind::Exclusive, "Plasma Bomb", CharacterId(3), CharacterId(0)),
            true,
        );
        assert_eq!(store.add(Effect::tracker("Progress", CharacterId(0)), false), AddOutcome::Added);
    }

    #[test]
    fn test_stun_immunity_blocks_hostile_stuns() {
        let mut store = EffectStore::new();
        store.add(
            Effect::new(EffectKind::StunImmune, "Resolve", CharacterId(0), CharacterId(0)),
            false,
        );

        let stun = Effect::new(EffectKind::AllStun, "Freeze", CharacterId(4), CharacterId(0));
        assert_eq!(store.add(stun, true), AddOutcome::Blocked(BlockReason::StunImmune));
    }

    #[test]
    fn test_isolate_blocks_friendly_from_others() {
        let mut store = EffectStore::new();
        store.add(
            Effect::new(EffectKind::Isolate, "Alone", CharacterId(5), CharacterId(0)),
            true,
        );

        let ally_heal = Effect::new(EffectKind::ContHeal, "Mend", CharacterId(1), CharacterId(0));
        assert_eq!(store.add(ally_heal, false), AddOutcome::Blocked(BlockReason::Isolate));

        let own = Effect::new(EffectKind::AllDr, "Guard", CharacterId(0), CharacterId(0));
        assert_eq!(store.add(own, false), AddOutcome::Added);
    }

    #[test]
    fn test_remove_keeps_index_consistent() {
        let mut store = EffectStore::new();
        store.add(mark("A", 1), false);
        store.add(mark("B", 1), false);
        store.add(mark("C", 1), false);

        let removed = store.remove(&EffectKey::new(EffectKind::Mark, "A", CharacterId(1)));
        assert!(removed.is_some());
        assert!(store.get_with_user(EffectKind::Mark, "C", CharacterId(1)).is_some());
        assert!(store.remove(&EffectKey::new(EffectKind::Mark, "A", CharacterId(1))).is_none());
    }

    #[test]
    fn test_full_remove_all_kinds() {
        let mut store = EffectStore::new();
        store.add(mark("Combo", 1), false);
        store.add(
            Effect::new(EffectKind::AllStun, "Combo", CharacterId(1), CharacterId(0)),
            true,
        );
        store.add(mark("Combo", 2), false);

        let removed = store.full_remove("Combo", CharacterId(1));
        assert_eq!(removed.len(), 2);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_tick_waiting_then_expire() {
        let mut store = EffectStore::new();
        store.add(mark("Tag", 1).with_duration(1), false);

        assert!(store.tick().is_empty());
        assert!(!store.get(EffectKind::Mark, "Tag").unwrap().waiting);

        let expired = store.tick();
        assert_eq!(expired.len(), 1);
        assert!(store.is_empty());
    }

    #[test]
    fn test_tick_permanent() {
        let mut store = EffectStore::new();
        store.add(Effect::tracker("Forever", CharacterId(0)).ready(), false);
        for _ in 0..10 {
            assert!(store.tick().is_empty());
        }
        assert_eq!(store.iter().next().unwrap().duration, Effect::PERMANENT);
    }

    #[test]
    fn test_clear_on_death_keeps_first_legacy() {
        let mut store = EffectStore::new();
        store.add(mark("A", 1), false);
        store.add(mark("Heirloom", 1).legacy(), false);
        store.add(mark("Second", 1).legacy(), false);

        let removed = store.clear_on_death();
        assert_eq!(removed.len(), 2);
        assert_eq!(store.len(), 1);
        assert!(store.has(EffectKind::Mark, "Heirloom"));
    }

    #[test]
    fn test_clear_on_death_keeps_leading_legacy() {
        let mut store = EffectStore::new();
        store.add(mark("Heirloom", 1).legacy(), false);
        store.add(mark("Other", 1), false);

        let removed = store.clear_on_death();
        assert_eq!(removed.len(), 1);
        assert!(store.has(EffectKind::Mark, "Heirloom"));
        assert!(!store.has(EffectKind::Mark, "Other"));
    }

    #[test]
    fn test_visibility() {
        let mut store = EffectStore::new();
        store.add(mark("Plain", 1), false);
        store.add(mark("Hidden", 4).invisible(), true);
        store.add(Effect::tracker("Internal", CharacterId(0)), false);

        let ally_view: Vec<_> = store.visible_to(Team::new(0)).map(|e| e.name.as_str()).collect();
        assert_eq!(ally_view, vec!["Plain"]);

        let enemy_view: Vec<_> = store.visible_to(Team::new(1)).map(|e| e.name.as_str()).collect();
        assert_eq!(enemy_view, vec!["Plain", "Hidden"]);
    }
}
