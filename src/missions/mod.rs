//! Mission tracker: long-horizon per-character achievements.
//!
//! Rules ([`Mission`]) are global and read-only, keyed by character identity
//! in a [`MissionTable`]. Progress ([`MissionProgress`]) lives on each
//! character. Every event a `BattleContext` emits is fed to [`observe`],
//! which evaluates the subject's rules for the matching trigger.
//!
//! History-dependent rules are expressed with tracker effects: a rule with
//! `Outcome::Tracker` places a permanent `System` effect, and later rules
//! test for it with `Condition::HasEffect`.

mod progress;
mod rule;
mod tracker;

pub use progress::{MissionProgress, MISSION_SLOTS};
pub use rule::{Completion, Condition, EffectQuery, Increment, Mission, MissionTable, MissionTrigger, Outcome};
pub use tracker::{condition_holds, observations, observe, CompletedMission, Observation};
