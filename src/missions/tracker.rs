//! Mission evaluation against battle events.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::battle::{BattleContext, BattleEvent};
use crate::core::{CharacterId, Team};
use crate::effects::{Effect, EffectKind};

use super::rule::{Condition, Increment, Mission, MissionTrigger, Outcome};

/// A mission slot completed during the battle, for the external profile store.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CompletedMission {
    pub character: CharacterId,
    /// Identity the rule table was keyed by.
    pub mission_key: String,
    pub slot: u8,
}

/// One (trigger, subject) pair derived from an event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Observation {
    pub trigger: MissionTrigger,
    pub subject: CharacterId,
    /// Damage or healing amount, or 1 for boolean events.
    pub magnitude: u32,
    pub effect: Option<(EffectKind, String)>,
}

impl Observation {
    fn new(trigger: MissionTrigger, subject: CharacterId, magnitude: u32) -> Self {
        Self {
            trigger,
            subject,
            magnitude,
            effect: None,
        }
    }
}

/// Map an event to the observations it produces.
#[must_use]
pub fn observations(ctx: &BattleContext, event: &BattleEvent) -> Vec<Observation> {
    match event {
        BattleEvent::Damage {
            dealer,
            target,
            amount,
            ..
        } if *amount > 0 => {
            let amount = amount.unsigned_abs();
            vec![
                Observation::new(MissionTrigger::DamageDealt, *dealer, amount),
                Observation::new(MissionTrigger::DamageReceived, *target, amount),
            ]
        }
        BattleEvent::Heal { healer, amount, .. } if *amount > 0 => {
            vec![Observation::new(MissionTrigger::HealingDone, *healer, amount.unsigned_abs())]
        }
        BattleEvent::EffectApplied { user, kind, name, .. } => {
            let mut observation = Observation::new(MissionTrigger::EffectApplied, *user, 1);
            observation.effect = Some((*kind, name.clone()));
            vec![observation]
        }
        BattleEvent::TurnEnded { .. } => CharacterId::all()
            .filter(|&id| ctx.is_alive(id))
            .map(|id| Observation::new(MissionTrigger::TurnEnd, id, 1))
            .collect(),
        BattleEvent::BattleWon { winner } => outcome_observations(*winner),
        _ => Vec::new(),
    }
}

fn outcome_observations(winner: Team) -> Vec<Observation> {
    let wins = winner
        .members()
        .map(|id| Observation::new(MissionTrigger::Win, id, 1));
    let losses = winner
        .opponent()
        .members()
        .map(|id| Observation::new(MissionTrigger::Loss, id, 1));
    wins.chain(losses).collect()
}

/// Evaluate every matching rule for the event's subjects.
pub fn observe(ctx: &mut BattleContext, event: &BattleEvent) {
    let observations = observations(ctx, event);
    if observations.is_empty() {
        return;
    }

    let content = Arc::clone(ctx.content());
    for observation in &observations {
        let key = ctx.character(observation.subject).mission_key.clone();
        for mission in content.missions.rules_for(&key) {
            if mission.trigger != observation.trigger {
                continue;
            }
            if ctx.character(observation.subject).missions.is_complete(mission.slot) {
                continue;
            }
            if !mission
                .conditions
                .iter()
                .all(|condition| condition_holds(ctx, condition, observation))
            {
                continue;
            }
            apply_outcome(ctx, mission, observation, &key);
        }
    }
}

/// Does a condition hold for this observation?
#[must_use]
pub fn condition_holds(ctx: &BattleContext, condition: &Condition, observation: &Observation) -> bool {
    let subject = observation.subject;
    let character = ctx.character(subject);

    match condition {
        Condition::HasEffect(query) => character.effects.iter().any(|e| query.matches(e)),
        Condition::LacksEffect(query) => !character.effects.iter().any(|e| query.matches(e)),
        Condition::LastStanding => {
            !character.dead
                && subject
                    .team()
                    .members()
                    .filter(|&id| id != subject)
                    .all(|id| ctx.character(id).dead)
        }
        Condition::FullHealth => character.hp >= character.profile.max_hp,
        Condition::TopDamageDealer => {
            let dealt = character.stats.damage_dealt;
            dealt > 0
                && CharacterId::all()
                    .filter(|&id| id != subject)
                    .all(|id| ctx.character(id).stats.damage_dealt <= dealt)
        }
        Condition::Alive => !character.dead,
        Condition::EventEffect { kind, name } => observation
            .effect
            .as_ref()
            .is_some_and(|(k, n)| k == kind && n == name),
    }
}

fn apply_outcome(ctx: &mut BattleContext, mission: &Mission, observation: &Observation, key: &str) {
    let subject = observation.subject;

    match &mission.outcome {
        Outcome::Progress(increment) => {
            let amount = match increment {
                Increment::EventMagnitude => observation.magnitude,
                Increment::Fixed(amount) => *amount,
            };
            if amount == 0 {
                return;
            }

            let completed = ctx
                .character_mut(subject)
                .missions
                .record(mission.slot, amount, mission.completion);
            if completed {
                debug!(character = %subject, mission = key, slot = mission.slot, "mission completed");
                ctx.record_completion(CompletedMission {
                    character: subject,
                    mission_key: key.to_string(),
                    slot: mission.slot,
                });
            }
        }
        Outcome::Tracker(name) => {
            // Bookkeeping only: bypasses events so trackers never re-trigger missions.
            ctx.character_mut(subject)
                .effects
                .add(Effect::tracker(name.as_str(), subject).ready(), false);
        }
    }
}
