//! Declarative mission rules.
//!
//! Rules are read-only tables keyed by character identity. They describe
//! which event advances which slot, under which conditions, and how the slot
//! completes. All live state is in `MissionProgress` and in ordinary effects.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::effects::{Effect, EffectKind};

/// Engine event category a mission listens to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MissionTrigger {
    TurnEnd,
    Win,
    Loss,
    DamageDealt,
    DamageReceived,
    EffectApplied,
    HealingDone,
}

/// Effect predicate, optionally magnitude-gated.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectQuery {
    pub kind: EffectKind,
    pub name: String,
    pub min_magnitude: Option<i32>,
}

impl EffectQuery {
    pub fn new(kind: EffectKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            min_magnitude: None,
        }
    }

    #[must_use]
    pub fn at_least(mut self, magnitude: i32) -> Self {
        self.min_magnitude = Some(magnitude);
        self
    }

    /// A `System` tracker effect with this name.
    pub fn tracker(name: impl Into<String>) -> Self {
        Self::new(EffectKind::System, name)
    }

    #[must_use]
    pub fn matches(&self, effect: &Effect) -> bool {
        effect.kind == self.kind
            && effect.name == self.name
            && self.min_magnitude.is_none_or(|min| effect.magnitude >= min)
    }
}

/// Predicate evaluated against the subject character and the event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Condition {
    HasEffect(EffectQuery),
    /// Exclusionary: a failure-marking effect must be absent.
    LacksEffect(EffectQuery),
    /// Every teammate of the subject is dead and the subject is not.
    LastStanding,
    FullHealth,
    /// Subject has dealt the most damage in the battle (and more than zero).
    TopDamageDealer,
    Alive,
    /// The event's effect has this kind and name.
    EventEffect { kind: EffectKind, name: String },
}

/// How much progress a matching event adds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Increment {
    /// Damage or healing amount, or 1 for boolean events.
    EventMagnitude,
    Fixed(u32),
}

/// What a matching event does.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Progress(Increment),
    /// Place a permanent `System` effect so later rules can test for it.
    Tracker(String),
}

/// When a slot counts as complete.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Completion {
    /// Progress accumulates up to `goal`.
    Accumulate { goal: u32 },
    OneShot,
}

/// One mission rule.
///
/// ```
/// use battle_resolver::missions::{Completion, Condition, Increment, Mission, MissionTrigger};
///
/// // Deal 150 total damage while at full health.
/// let mission = Mission::new(1, MissionTrigger::DamageDealt)
///     .when(Condition::FullHealth)
///     .completes(Completion::Accumulate { goal: 150 });
///
/// assert_eq!(mission.slot, 1);
/// assert_eq!(mission.conditions.len(), 1);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mission {
    /// 1-5.
    pub slot: u8,
    pub trigger: MissionTrigger,
    pub conditions: Vec<Condition>,
    pub outcome: Outcome,
    pub completion: Completion,
}

impl Mission {
    /// Progress by event magnitude, completing on the first increment.
    #[must_use]
    pub fn new(slot: u8, trigger: MissionTrigger) -> Self {
        Self {
            slot,
            trigger,
            conditions: Vec::new(),
            outcome: Outcome::Progress(Increment::EventMagnitude),
            completion: Completion::OneShot,
        }
    }

    #[must_use]
    pub fn when(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    #[must_use]
    pub fn with_outcome(mut self, outcome: Outcome) -> Self {
        self.outcome = outcome;
        self
    }

    #[must_use]
    pub fn completes(mut self, completion: Completion) -> Self {
        self.completion = completion;
        self
    }
}

/// Global rule table: character identity to its missions.
#[derive(Clone, Debug, Default)]
pub struct MissionTable {
    rules: FxHashMap<String, Vec<Mission>>,
}

impl MissionTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a rule for a character.
    pub fn add(&mut self, character: impl Into<String>, mission: Mission) {
        self.rules.entry(character.into()).or_default().push(mission);
    }

    /// Builder form of [`MissionTable::add`].
    #[must_use]
    pub fn with(mut self, character: impl Into<String>, mission: Mission) -> Self {
        self.add(character, mission);
        self
    }

    /// Rules for a character, in registration order.
    #[must_use]
    pub fn rules_for(&self, character: &str) -> &[Mission] {
        self.rules.get(character).map_or(&[], Vec::as_slice)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
