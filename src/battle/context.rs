//! The battle context handed to every engine operation.
//!
//! `BattleContext` owns the six character managers, both energy pools, the
//! RNG and the event log. Abilities, the damage pipeline, counters and the
//! mission tracker all receive it explicitly; nothing holds a reference
//! back to it.
//!
//! ## Affiliation
//!
//! A character's team is fixed by its position, but [`BattleContext::team_of`]
//! reports the opposite team for a character whose ability is currently
//! being reflected. Every hostility check goes through it.

use std::sync::Arc;

use tracing::{debug, error, trace};

use crate::characters::{Character, CharacterManager};
use crate::content::BattleContent;
use crate::core::{BattleConfig, CharacterId, GameRng, Team, TeamMap};
use crate::effects::{AddOutcome, Effect, EffectKey, EffectKind};
use crate::energy::{CostVector, EnergyCategory, EnergyPool};
use crate::missions::{self, CompletedMission};

use super::events::BattleEvent;

/// Mutable battle state.
#[derive(Clone, Debug)]
pub struct BattleContext {
    characters: Vec<CharacterManager>,
    energy: TeamMap<EnergyPool>,
    rng: GameRng,
    content: Arc<BattleContent>,
    config: BattleConfig,
    turn: u32,
    active: Team,
    events: Vec<BattleEvent>,
    completed: Vec<CompletedMission>,
    /// Actor whose ability is executing reflected.
    reflected: Option<CharacterId>,
    reaction_depth: u32,
}

impl BattleContext {
    /// Create a context at turn 1 with `Team(0)` to act.
    pub(crate) fn new(
        characters: Vec<CharacterManager>,
        content: Arc<BattleContent>,
        config: BattleConfig,
        rng: GameRng,
    ) -> Self {
        debug_assert_eq!(characters.len(), crate::core::BATTLE_SIZE);
        Self {
            characters,
            energy: config.starting_energy.clone(),
            rng,
            content,
            config,
            turn: 1,
            active: Team::new(0),
            events: Vec::new(),
            completed: Vec::new(),
            reflected: None,
            reaction_depth: 0,
        }
    }

    // === Accessors ===

    #[must_use]
    pub fn manager(&self, id: CharacterId) -> &CharacterManager {
        &self.characters[id.index()]
    }

    pub fn manager_mut(&mut self, id: CharacterId) -> &mut CharacterManager {
        &mut self.characters[id.index()]
    }

    /// Managers in position order.
    pub fn managers(&self) -> impl Iterator<Item = &CharacterManager> {
        self.characters.iter()
    }

    #[must_use]
    pub fn character(&self, id: CharacterId) -> &Character {
        &self.characters[id.index()].character
    }

    pub fn character_mut(&mut self, id: CharacterId) -> &mut Character {
        &mut self.characters[id.index()].character
    }

    #[must_use]
    pub fn content(&self) -> &Arc<BattleContent> {
        &self.content
    }

    #[must_use]
    pub fn config(&self) -> &BattleConfig {
        &self.config
    }

    #[must_use]
    pub fn turn(&self) -> u32 {
        self.turn
    }

    /// Team whose turn it is.
    #[must_use]
    pub fn active_team(&self) -> Team {
        self.active
    }

    pub(crate) fn advance_turn(&mut self) {
        self.turn += 1;
        self.active = self.active.opponent();
    }

    #[must_use]
    pub fn rng(&self) -> &GameRng {
        &self.rng
    }

    pub fn rng_mut(&mut self) -> &mut GameRng {
        &mut self.rng
    }

    // === Affiliation ===

    /// Current affiliation of a character.
    #[must_use]
    pub fn team_of(&self, id: CharacterId) -> Team {
        let natural = self.manager(id).team;
        if self.reflected == Some(id) {
            natural.opponent()
        } else {
            natural
        }
    }

    #[must_use]
    pub fn is_hostile(&self, a: CharacterId, b: CharacterId) -> bool {
        self.team_of(a) != self.team_of(b)
    }

    #[must_use]
    pub fn is_alive(&self, id: CharacterId) -> bool {
        id.is_valid() && !self.character(id).dead
    }

    pub(crate) fn set_reflected(&mut self, actor: Option<CharacterId>) {
        self.reflected = actor;
    }

    // === Energy ===

    #[must_use]
    pub fn energy(&self, team: Team) -> &EnergyPool {
        &self.energy[team]
    }

    /// Grant energy to a team. `Random` rolls a category per unit.
    pub fn gain_energy(&mut self, team: Team, category: EnergyCategory, amount: u32) {
        if amount == 0 {
            return;
        }
        let Self { energy, rng, .. } = self;
        energy[team].gain(category, amount, rng);
        self.emit(BattleEvent::EnergyGained { team, amount });
    }

    /// Take up to `amount` energy from a team, returning what was taken.
    pub fn remove_energy(&mut self, team: Team, category: EnergyCategory, amount: u32) -> EnergyPool {
        let Self { energy, rng, .. } = self;
        energy[team].remove(category, amount, rng)
    }

    pub fn merge_energy(&mut self, team: Team, pool: &EnergyPool) {
        self.energy[team].merge(pool);
    }

    /// Pay a cost from a team's pool. False leaves the pool untouched.
    pub fn pay(&mut self, team: Team, cost: &CostVector) -> bool {
        self.energy[team].pay(cost)
    }

    // === Effects ===

    /// Add an effect to its owner, honoring blocking and duplicate rules.
    ///
    /// Effects on dead characters are rejected.
    pub fn add_effect(&mut self, effect: Effect) -> AddOutcome {
        self.insert_effect(effect, false)
    }

    /// Stack an effect onto its owner (see `EffectStore::apply_stack`).
    pub fn apply_stack(&mut self, effect: Effect) -> AddOutcome {
        self.insert_effect(effect, true)
    }

    fn insert_effect(&mut self, effect: Effect, stack: bool) -> AddOutcome {
        let owner = effect.owner;
        if !self.is_alive(owner) {
            return AddOutcome::Rejected;
        }

        let hostile = self.is_hostile(effect.user, owner);
        let (kind, user, magnitude, system) = (effect.kind, effect.user, effect.magnitude, effect.system);
        let name = effect.name.clone();

        let store = &mut self.character_mut(owner).effects;
        let outcome = if stack {
            store.apply_stack(effect, hostile)
        } else {
            store.add(effect, hostile)
        };

        match outcome {
            AddOutcome::Added | AddOutcome::Stacked => {
                trace!(owner = %owner, user = %user, kind = ?kind, name = %name, ?outcome, "effect applied");
                if kind.affects_roster() {
                    self.character_mut(owner).rebuild_roster();
                }
                if !system {
                    self.emit(BattleEvent::EffectApplied {
                        user,
                        owner,
                        kind,
                        name,
                        magnitude,
                    });
                }
            }
            AddOutcome::Rejected | AddOutcome::Blocked(_) => {
                trace!(owner = %owner, user = %user, kind = ?kind, name = %name, ?outcome, "effect not applied");
            }
        }
        outcome
    }

    /// Remove one effect by identity.
    pub fn remove_effect(&mut self, owner: CharacterId, key: &EffectKey) -> Option<Effect> {
        let removed = self.character_mut(owner).effects.remove(key)?;
        self.after_removal(owner, std::slice::from_ref(&removed));
        Some(removed)
    }

    /// Remove every effect named `name` applied by `user` from one character.
    pub fn full_remove(&mut self, owner: CharacterId, name: &str, user: CharacterId) -> Vec<Effect> {
        let removed = self.character_mut(owner).effects.full_remove(name, user);
        self.after_removal(owner, &removed);
        removed
    }

    /// End a named interaction: `full_remove` on all six characters.
    pub fn full_remove_everywhere(&mut self, name: &str, user: CharacterId) {
        for id in CharacterId::all() {
            self.full_remove(id, name, user);
        }
    }

    fn after_removal(&mut self, owner: CharacterId, removed: &[Effect]) {
        if removed.iter().any(|e| e.kind.affects_roster()) {
            self.character_mut(owner).rebuild_roster();
        }
        for effect in removed.iter().filter(|e| !e.system) {
            self.emit(BattleEvent::EffectRemoved {
                owner,
                kind: effect.kind,
                name: effect.name.clone(),
            });
        }
    }

    // === Life cycle ===

    /// Kill a character: HP to zero, channels ended, effects cleared except
    /// the first legacy effect.
    pub fn kill(&mut self, id: CharacterId) {
        if self.character(id).dead {
            return;
        }
        {
            let character = self.character_mut(id);
            character.hp = 0;
            character.dead = true;
        }
        debug!(character = %id, name = %self.character(id).name(), "character died");

        let channels: Vec<String> = self
            .character(id)
            .effects
            .iter_kind(EffectKind::ContUse)
            .filter(|e| e.user == id)
            .map(|e| e.name.clone())
            .collect();
        for name in channels {
            self.full_remove_everywhere(&name, id);
        }

        let character = self.character_mut(id);
        character.effects.clear_on_death();
        character.rebuild_roster();
        self.emit(BattleEvent::Death { character: id });
    }

    /// Replace a character's identity with a registered profile.
    pub fn transform(&mut self, id: CharacterId, profile: &str) {
        debug_assert!(
            self.content.profiles.contains(profile),
            "transformation into unregistered profile {profile:?}"
        );
        let Some(target) = self.content.profiles.get(profile).cloned() else {
            error!(character = %id, profile, "transformation into unregistered profile");
            return;
        };

        let from = self.character(id).name().to_string();
        self.character_mut(id).transform(target);
        debug!(character = %id, from = %from, to = profile, "character transformed");
        self.emit(BattleEvent::Transformed {
            character: id,
            from,
            to: profile.to_string(),
        });
    }

    // === Events ===

    /// Record an event and run the mission tracker on it.
    pub fn emit(&mut self, event: BattleEvent) {
        self.events.push(event.clone());
        missions::observe(self, &event);
    }

    /// Events recorded since the last `take_events`.
    #[must_use]
    pub fn events(&self) -> &[BattleEvent] {
        &self.events
    }

    pub(crate) fn take_events(&mut self) -> Vec<BattleEvent> {
        std::mem::take(&mut self.events)
    }

    /// Record a completed mission slot. Not observed by the tracker.
    pub fn record_completion(&mut self, completion: CompletedMission) {
        self.events.push(BattleEvent::MissionCompleted {
            character: completion.character,
            slot: completion.slot,
        });
        self.completed.push(completion);
    }

    pub(crate) fn take_completed(&mut self) -> Vec<CompletedMission> {
        std::mem::take(&mut self.completed)
    }

    // === Reactions ===

    /// Is another nested reaction allowed?
    #[must_use]
    pub fn can_react(&self) -> bool {
        self.reaction_depth < self.config.max_reaction_depth
    }

    /// Enter a nested reaction. False once the depth bound is reached.
    pub fn enter_reaction(&mut self) -> bool {
        if !self.can_react() {
            trace!(depth = self.reaction_depth, "reaction depth bound reached");
            return false;
        }
        self.reaction_depth += 1;
        true
    }

    pub fn exit_reaction(&mut self) {
        self.reaction_depth = self.reaction_depth.saturating_sub(1);
    }
}
