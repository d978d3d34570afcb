//! Turn orchestration.
//!
//! A turn belongs to one team. [`Battle::resolve_turn`] takes that team's
//! submissions in the order the caller chose and:
//!
//! 1. grants turn-start energy (once per turn, see [`Battle::begin_turn`])
//! 2. for each submission: validate, pay the cost, resolve counters and
//!    reflects, execute, start the cooldown, check for a winner
//! 3. runs the end-of-turn phase: interrupted channels end, the acting
//!    team's continuous effects fire, every effect ticks, the acting team's
//!    cooldowns tick, rosters are rebuilt, `TurnEnded` is emitted and the
//!    winner is checked again
//! 4. hands the turn to the other team
//!
//! Validation never mutates anything. A rejected submission is reported in
//! the [`TurnReport`] and discarded.
//!
//! ## Example
//!
//! ```
//! use battle_resolver::content::demo::{self, ids};
//! use battle_resolver::core::{ActionSubmission, CharacterId};
//!
//! let mut battle = demo::battle(7).unwrap();
//! let report = battle
//!     .resolve_turn(&[ActionSubmission::single(CharacterId(0), ids::STRIKE, CharacterId(3))])
//!     .unwrap();
//!
//! assert_eq!(report.executed.len(), 1);
//! assert_eq!(battle.context().character(CharacterId(3)).hp, 80);
//! ```

use std::sync::Arc;

use im::Vector;
use smallvec::SmallVec;
use tracing::{debug, trace, warn};

use crate::abilities::targeting::{effective_target_type, invalid_selection};
use crate::abilities::{Ability, AbilityId, TargetType};
use crate::characters::{Character, CharacterManager};
use crate::combat::{self, DamageSource, DamageType};
use crate::content::BattleContent;
use crate::core::{
    ActionRecord, ActionSubmission, BattleConfig, BattleError, CharacterId, GameRng, TargetList, Team, TeamMap,
    TEAM_SIZE,
};
use crate::counters::{self, Interception};
use crate::effects::{Effect, EffectKind, EnergyGainCode};
use crate::energy::{CostVector, EnergyCategory};
use crate::missions::CompletedMission;

use super::context::BattleContext;
use super::events::BattleEvent;
use super::snapshot::BattleSnapshot;

/// Everything needed to start a battle.
#[derive(Clone, Debug)]
pub struct BattleSetup {
    pub seed: u64,
    /// Three profile names per team, in slot order.
    pub rosters: TeamMap<Vec<String>>,
    pub config: BattleConfig,
    pub content: Arc<BattleContent>,
}

impl BattleSetup {
    /// Empty rosters with the default configuration.
    #[must_use]
    pub fn new(content: Arc<BattleContent>, seed: u64) -> Self {
        Self {
            seed,
            rosters: TeamMap::default(),
            config: BattleConfig::default(),
            content,
        }
    }

    #[must_use]
    pub fn with_roster(mut self, team: Team, names: &[&str]) -> Self {
        self.rosters[team] = names.iter().map(|name| name.to_string()).collect();
        self
    }

    #[must_use]
    pub fn with_config(mut self, config: BattleConfig) -> Self {
        self.config = config;
        self
    }
}

/// What one call to [`Battle::resolve_turn`] did.
#[derive(Clone, Debug)]
pub struct TurnReport {
    pub turn: u32,
    pub team: Team,
    /// Submissions that passed validation, in execution order.
    pub executed: Vec<ActionSubmission>,
    /// Submissions discarded by validation.
    pub rejected: Vec<(ActionSubmission, BattleError)>,
    pub events: Vec<BattleEvent>,
    /// Mission slots completed during the turn.
    pub completed_missions: Vec<CompletedMission>,
    pub winner: Option<Team>,
}

/// One battle between two teams of three.
#[derive(Clone, Debug)]
pub struct Battle {
    ctx: BattleContext,
    history: Vector<ActionRecord>,
    winner: Option<Team>,
    /// Turn-start energy has been granted for the current turn.
    turn_started: bool,
}

impl Battle {
    /// Load both rosters and validate the configuration.
    pub fn new(setup: BattleSetup) -> Result<Self, BattleError> {
        setup.config.validate()?;

        let mut managers = Vec::with_capacity(TEAM_SIZE * 2);
        for team in Team::both() {
            let names = &setup.rosters[team];
            if names.len() != TEAM_SIZE {
                return Err(BattleError::InvalidRoster {
                    team,
                    count: names.len(),
                });
            }
            for (slot, name) in names.iter().enumerate() {
                let profile = setup.content.check_profile(name)?;
                let id = CharacterId::from_parts(team, slot as u8);
                managers.push(CharacterManager::new(id, Character::new(profile)));
            }
        }

        debug!(seed = setup.seed, "battle created");
        let ctx = BattleContext::new(managers, setup.content, setup.config, GameRng::new(setup.seed));
        Ok(Self {
            ctx,
            history: Vector::new(),
            winner: None,
            turn_started: false,
        })
    }

    /// Rebuild a battle by resolving recorded actions turn by turn.
    ///
    /// Turns without records are resolved empty.
    pub fn replay(setup: BattleSetup, records: &[ActionRecord]) -> Result<Self, BattleError> {
        let mut battle = Self::new(setup)?;
        let mut index = 0;

        while index < records.len() {
            let turn = records[index].turn;
            while battle.ctx.turn() < turn && battle.winner.is_none() {
                battle.resolve_turn(&[])?;
            }
            let batch: Vec<ActionSubmission> = records[index..]
                .iter()
                .take_while(|record| record.turn == turn)
                .map(|record| record.submission.clone())
                .collect();
            index += batch.len();
            battle.resolve_turn(&batch)?;
        }
        Ok(battle)
    }

    // === Accessors ===

    #[must_use]
    pub fn context(&self) -> &BattleContext {
        &self.ctx
    }

    /// Direct state access for tests and tooling. Bypasses validation.
    pub fn context_mut(&mut self) -> &mut BattleContext {
        &mut self.ctx
    }

    #[must_use]
    pub fn turn(&self) -> u32 {
        self.ctx.turn()
    }

    #[must_use]
    pub fn active_team(&self) -> Team {
        self.ctx.active_team()
    }

    #[must_use]
    pub fn winner(&self) -> Option<Team> {
        self.winner
    }

    /// Executed actions in order.
    #[must_use]
    pub fn history(&self) -> &Vector<ActionRecord> {
        &self.history
    }

    /// What `viewer` may see of the battle.
    #[must_use]
    pub fn snapshot(&self, viewer: Team) -> BattleSnapshot {
        BattleSnapshot::capture(&self.ctx, viewer, self.winner)
    }

    // === Queries ===

    fn ability(&self, id: AbilityId) -> Result<Arc<Ability>, BattleError> {
        self.ctx
            .content()
            .abilities
            .get(id)
            .cloned()
            .ok_or(BattleError::UnknownAbility(id))
    }

    /// Targets `actor` may currently aim `ability` at.
    pub fn valid_targets(&self, actor: CharacterId, ability: AbilityId) -> Result<TargetList, BattleError> {
        check_character(actor)?;
        Ok(self.ability(ability)?.valid_targets(&self.ctx, actor))
    }

    /// Stun, cooldown, cost and lockout checks for `actor` using `ability`.
    #[must_use]
    pub fn can_use(&self, actor: CharacterId, ability: AbilityId) -> bool {
        check_character(actor).is_ok()
            && self.ctx.is_alive(actor)
            && self.ctx.character(actor).has_ability(ability)
            && self.ability(ability).is_ok_and(|a| a.can_use(&self.ctx, actor))
    }

    /// Cost of `ability` for `actor` after cost adjustments.
    pub fn effective_cost(&self, actor: CharacterId, ability: AbilityId) -> Result<CostVector, BattleError> {
        check_character(actor)?;
        Ok(self.ability(ability)?.effective_cost(&self.ctx, actor))
    }

    // === Turn flow ===

    /// Grant turn-start energy to the active team.
    ///
    /// Each living member contributes `energy_per_character` random energy,
    /// then their `EnergyGain` effects add or drain. Does nothing if the
    /// current turn has already begun.
    pub fn begin_turn(&mut self) -> Result<(), BattleError> {
        if let Some(winner) = self.winner {
            return Err(BattleError::BattleOver { winner });
        }
        if self.turn_started {
            return Ok(());
        }
        self.turn_started = true;

        let ctx = &mut self.ctx;
        let team = ctx.active_team();
        ctx.emit(BattleEvent::TurnStarted { turn: ctx.turn(), team });

        let living: Vec<CharacterId> = team.members().filter(|&id| ctx.is_alive(id)).collect();
        let per_character = ctx.config().energy_per_character;
        ctx.gain_energy(team, EnergyCategory::Random, per_character * living.len() as u32);

        for &member in &living {
            let gains: Vec<EnergyGainCode> = ctx
                .character(member)
                .effects
                .iter_kind(EffectKind::EnergyGain)
                .map(|effect| EnergyGainCode::decode(effect.magnitude))
                .collect();
            for gain in gains {
                let Some(category) = gain.energy_category() else {
                    continue;
                };
                if gain.amount > 0 {
                    ctx.gain_energy(team, category, gain.amount.unsigned_abs());
                } else if gain.amount < 0 {
                    ctx.remove_energy(team, category, gain.amount.unsigned_abs());
                }
            }
        }

        for member in team.members() {
            ctx.manager_mut(member).clear_action();
        }
        Ok(())
    }

    /// Resolve the active team's turn.
    ///
    /// Fails only if the battle was already over. Individual submissions
    /// that fail validation are reported in `TurnReport::rejected`.
    pub fn resolve_turn(&mut self, actions: &[ActionSubmission]) -> Result<TurnReport, BattleError> {
        self.begin_turn()?;
        let turn = self.ctx.turn();
        let team = self.ctx.active_team();

        let mut executed = Vec::new();
        let mut rejected = Vec::new();

        for submission in actions {
            if let Some(winner) = self.winner {
                rejected.push((submission.clone(), BattleError::BattleOver { winner }));
                continue;
            }

            match self.validate(submission) {
                Ok((ability, targets)) => {
                    self.perform(submission, &ability, targets);
                    let sequence = executed.len() as u32;
                    self.history
                        .push_back(ActionRecord::new(turn, sequence, submission.clone()));
                    executed.push(submission.clone());
                    self.check_victory();
                }
                Err(err) => {
                    warn!(actor = %submission.actor, ability = %submission.ability, error = %err, "action rejected");
                    rejected.push((submission.clone(), err));
                }
            }
        }

        if self.winner.is_none() {
            self.end_turn(team);
            self.check_victory();
        }
        if self.winner.is_none() {
            self.ctx.advance_turn();
            self.turn_started = false;
        }

        Ok(TurnReport {
            turn,
            team,
            executed,
            rejected,
            events: self.ctx.take_events(),
            completed_missions: self.ctx.take_completed(),
            winner: self.winner,
        })
    }

    /// Validate a submission without mutating anything.
    fn validate(&self, submission: &ActionSubmission) -> Result<(Arc<Ability>, TargetList), BattleError> {
        let actor = submission.actor;
        check_character(actor)?;

        let ctx = &self.ctx;
        let active = ctx.active_team();
        if ctx.manager(actor).team != active {
            return Err(BattleError::NotActingTeam { actor, active });
        }
        if !ctx.is_alive(actor) {
            return Err(BattleError::ActorDead(actor));
        }
        if ctx.manager(actor).used_ability.is_some() {
            return Err(BattleError::AlreadyActed(actor));
        }
        if !ctx.character(actor).has_ability(submission.ability) {
            return Err(BattleError::NotInRoster {
                actor,
                ability: submission.ability,
            });
        }

        let ability = self.ability(submission.ability)?;
        ability.check_usable(ctx, actor)?;
        let targets = select_targets(&ability, ctx, submission)?;
        Ok((ability, targets))
    }

    /// Execute a validated submission.
    fn perform(&mut self, submission: &ActionSubmission, ability: &Ability, targets: TargetList) {
        let actor = submission.actor;
        let ctx = &mut self.ctx;

        let cost = ability.effective_cost(ctx, actor);
        let paid = ctx.pay(ctx.team_of(actor), &cost);
        debug_assert!(paid, "validated cost of {} could not be paid", ability.name);

        let slot = ctx.character(actor).ability_slot(ability.id);
        ctx.manager_mut(actor)
            .set_action(ability.id, submission.primary_target, targets.clone());
        debug!(actor = %actor, ability = %ability.name, targets = ?targets.as_slice(), "executing ability");
        ctx.emit(BattleEvent::ActionExecuted {
            actor,
            ability: ability.id,
        });

        match counters::resolve(ctx, actor, ability) {
            Interception::None => ability.behavior.execute(ability, ctx, actor),
            Interception::Countered { .. } => {}
            Interception::Reflected { by } => {
                let mirrored = counters::reflect_targets(ctx, actor, by, &targets);
                ctx.manager_mut(actor).current_targets = mirrored;
                let caster = combat::resolve_effective_actor(ctx, actor);
                ctx.set_reflected(Some(caster));
                ability.behavior.execute(ability, ctx, actor);
                ctx.set_reflected(None);
            }
        }

        let modifier = combat::slot_modifier_sum(&ctx.character(actor).effects, EffectKind::CooldownMod, slot, false);
        let cooldown = (ability.cooldown as i32 + modifier + 1).max(0) as u32;
        ctx.character_mut(actor).set_cooldown(ability.id, cooldown);
    }

    fn end_turn(&mut self, team: Team) {
        self.end_interrupted_channels();
        self.fire_continuous_effects(team);

        let ctx = &mut self.ctx;
        for id in CharacterId::all() {
            let expired = ctx.character_mut(id).effects.tick();
            if expired.is_empty() {
                continue;
            }
            if expired.iter().any(|e| e.kind.affects_roster()) {
                ctx.character_mut(id).rebuild_roster();
            }
            for effect in expired.iter().filter(|e| !e.system) {
                trace!(owner = %id, effect = %effect.key(), "effect expired");
                ctx.emit(BattleEvent::EffectExpired {
                    owner: id,
                    kind: effect.kind,
                    name: effect.name.clone(),
                });
            }
        }

        for member in team.members() {
            ctx.character_mut(member).tick_cooldowns();
        }
        for id in CharacterId::all() {
            ctx.character_mut(id).rebuild_roster();
        }

        ctx.emit(BattleEvent::TurnEnded { turn: ctx.turn(), team });
    }

    /// A stunned channeler ends every effect of its channel.
    fn end_interrupted_channels(&mut self) {
        let ctx = &mut self.ctx;
        for id in CharacterId::all() {
            if !ctx.is_alive(id) {
                continue;
            }
            let effects = &ctx.character(id).effects;
            if !effects.iter().any(|e| e.kind.is_stun()) {
                continue;
            }
            let channels: Vec<String> = effects
                .iter_kind(EffectKind::ContUse)
                .filter(|e| e.user == id)
                .map(|e| e.name.clone())
                .collect();
            for name in channels {
                debug!(character = %id, channel = %name, "channel interrupted");
                ctx.full_remove_everywhere(&name, id);
            }
        }
    }

    /// Fire every ready continuous effect whose user is on `team`.
    fn fire_continuous_effects(&mut self, team: Team) {
        let ctx = &mut self.ctx;
        let pending: Vec<(CharacterId, crate::effects::EffectKey)> = CharacterId::all()
            .flat_map(|owner| {
                ctx.character(owner)
                    .effects
                    .iter()
                    .filter(|e| e.kind.is_continuous() && !e.waiting && e.user.team() == team)
                    .map(move |e| (owner, e.key()))
                    .collect::<Vec<_>>()
            })
            .collect();

        for (owner, key) in pending {
            let Some(effect) = ctx.character(owner).effects.get_key(&key).cloned() else {
                continue;
            };
            if !ctx.is_alive(owner) || !ctx.is_alive(effect.user) {
                continue;
            }

            trace!(owner = %owner, effect = %key, "continuous effect fired");
            let source = DamageSource::continuous(effect.name.as_str());
            let (user, amount) = (effect.user, effect.magnitude);
            match effect.kind {
                EffectKind::ContDmg => {
                    combat::apply_damage(ctx, user, owner, amount, DamageType::Normal, &source);
                }
                EffectKind::ContPierceDmg => {
                    combat::apply_damage(ctx, user, owner, amount, DamageType::Piercing, &source);
                }
                EffectKind::ContAffDmg => {
                    combat::apply_damage(ctx, user, owner, amount, DamageType::Affliction, &source);
                }
                EffectKind::ContHeal => {
                    combat::apply_heal(ctx, user, owner, amount, &source);
                }
                EffectKind::ContDestDef => {
                    ctx.add_effect(
                        Effect::new(EffectKind::DestDef, effect.name.as_str(), user, owner)
                            .with_magnitude(amount)
                            .with_duration(effect.duration)
                            .ready(),
                    );
                }
                _ => {}
            }
        }
    }

    /// Set the winner once a team has no living members.
    ///
    /// If both teams fall at once the active team wins.
    fn check_victory(&mut self) {
        if self.winner.is_some() {
            return;
        }
        let wiped = |ctx: &BattleContext, team: Team| team.members().all(|id| !ctx.is_alive(id));
        let active = self.ctx.active_team();

        let winner = if wiped(&self.ctx, active.opponent()) {
            active
        } else if wiped(&self.ctx, active) {
            active.opponent()
        } else {
            return;
        };

        debug!(winner = %winner, turn = self.ctx.turn(), "battle won");
        self.winner = Some(winner);
        self.ctx.emit(BattleEvent::BattleWon { winner });
    }
}

fn check_character(id: CharacterId) -> Result<(), BattleError> {
    if id.is_valid() {
        Ok(())
    } else {
        Err(BattleError::UnknownCharacter(id))
    }
}

/// Resolve a submission's target list against the ability's valid targets.
///
/// An explicit list must be a subset of the valid targets (one entry for
/// single-target abilities). Otherwise a single-target ability takes the
/// primary target, the actor if eligible, or the first valid target; area
/// abilities take every valid target.
fn select_targets(
    ability: &Ability,
    ctx: &BattleContext,
    submission: &ActionSubmission,
) -> Result<TargetList, BattleError> {
    let actor = submission.actor;
    let valid = ability.valid_targets(ctx, actor);
    if valid.is_empty() {
        return Err(BattleError::NoValidTargets(ability.id));
    }
    let single = effective_target_type(ability, ctx, actor) == TargetType::Single;
    let invalid = |target| BattleError::InvalidTarget {
        ability: ability.id,
        target,
    };

    if !submission.targets.is_empty() {
        if let Some(target) = invalid_selection(&valid, &submission.targets) {
            return Err(invalid(target));
        }
        if single && submission.targets.len() > 1 {
            return Err(invalid(submission.targets[1]));
        }
        let mut targets: TargetList = SmallVec::new();
        for &target in &submission.targets {
            if !targets.contains(&target) {
                targets.push(target);
            }
        }
        return Ok(targets);
    }

    if let Some(primary) = submission.primary_target {
        if !valid.contains(&primary) {
            return Err(invalid(primary));
        }
        return Ok(if single { SmallVec::from_slice(&[primary]) } else { valid });
    }

    if single {
        let target = if valid.contains(&actor) { actor } else { valid[0] };
        Ok(SmallVec::from_slice(&[target]))
    } else {
        Ok(valid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::demo::{self, ids};

    #[test]
    fn test_new_rejects_short_roster() {
        let setup = demo::setup(1);
        let setup = BattleSetup {
            rosters: TeamMap::from_pair(vec!["Vanguard".to_string()], setup.rosters[Team::new(1)].clone()),
            ..setup
        };
        assert_eq!(
            Battle::new(setup).unwrap_err(),
            BattleError::InvalidRoster {
                team: Team::new(0),
                count: 1
            }
        );
    }

    #[test]
    fn test_new_rejects_unknown_profile() {
        let setup = demo::setup(1).with_roster(Team::new(1), &["Duelist", "Mystic", "Nobody"]);
        assert_eq!(
            Battle::new(setup).unwrap_err(),
            BattleError::UnknownProfile("Nobody".to_string())
        );
    }

    #[test]
    fn test_new_rejects_bad_config() {
        let setup = demo::setup(1).with_config(BattleConfig::new().with_hp_ceiling(500));
        assert!(matches!(Battle::new(setup), Err(BattleError::Config(_))));
    }

    #[test]
    fn test_begin_turn_grants_energy_once() {
        let mut battle = demo::battle(5).unwrap();
        battle.begin_turn().unwrap();
        battle.begin_turn().unwrap();
        assert_eq!(battle.context().energy(Team::new(0)).total(), 15);
        assert_eq!(battle.context().energy(Team::new(1)).total(), 12);
    }

    #[test]
    fn test_single_target_defaults() {
        let battle = demo::battle(5).unwrap();
        let ctx = battle.context();

        let guard = battle.ability(ids::GUARD).unwrap();
        let targets = select_targets(&guard, ctx, &ActionSubmission::new(CharacterId(0), ids::GUARD)).unwrap();
        assert_eq!(targets.as_slice(), &[CharacterId(0)]);

        let strike = battle.ability(ids::STRIKE).unwrap();
        let targets = select_targets(&strike, ctx, &ActionSubmission::new(CharacterId(0), ids::STRIKE)).unwrap();
        assert_eq!(targets.as_slice(), &[CharacterId(3)]);
    }

    #[test]
    fn test_single_target_rejects_lists() {
        let battle = demo::battle(5).unwrap();
        let strike = battle.ability(ids::STRIKE).unwrap();
        let submission =
            ActionSubmission::new(CharacterId(0), ids::STRIKE).with_targets(&[CharacterId(3), CharacterId(4)]);

        assert_eq!(
            select_targets(&strike, battle.context(), &submission).unwrap_err(),
            BattleError::InvalidTarget {
                ability: ids::STRIKE,
                target: CharacterId(4)
            }
        );
    }

    #[test]
    fn test_cooldown_counts_own_turns() {
        let mut battle = demo::battle(5).unwrap();
        let guard = ActionSubmission::new(CharacterId(0), ids::GUARD);

        battle.resolve_turn(&[guard.clone()]).unwrap();
        assert_eq!(battle.context().character(CharacterId(0)).cooldown(ids::GUARD), 1);

        battle.resolve_turn(&[]).unwrap();
        let report = battle.resolve_turn(&[guard.clone()]).unwrap();
        assert!(matches!(report.rejected[0].1, BattleError::OnCooldown { remaining: 1, .. }));

        battle.resolve_turn(&[]).unwrap();
        let report = battle.resolve_turn(&[guard]).unwrap();
        assert_eq!(report.executed.len(), 1);
    }

    #[test]
    fn test_cooldown_modifier() {
        let mut battle = demo::battle(5).unwrap();
        battle.context_mut().character_mut(CharacterId(0)).effects.add(
            Effect::new(EffectKind::CooldownMod, "Haste", CharacterId(0), CharacterId(0))
                .with_magnitude(crate::effects::SlotModifier::new(2, -1).encode()),
            false,
        );

        battle
            .resolve_turn(&[ActionSubmission::new(CharacterId(0), ids::GUARD)])
            .unwrap();
        assert_eq!(battle.context().character(CharacterId(0)).cooldown(ids::GUARD), 0);
    }
}
