//! The effect record.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::core::CharacterId;

use super::kind::EffectKind;
use super::reaction::Reaction;

/// A status applied by one character (`user`) to another (`owner`).
///
/// The `(kind, name, user)` triple is the effect's identity on its owner;
/// see [`EffectKey`]. Everything else is mutable state.
///
/// ## Example
///
/// ```
/// use battle_resolver::core::CharacterId;
/// use battle_resolver::effects::{Effect, EffectKind};
///
/// let guard = Effect::new(EffectKind::AllDr, "Guard", CharacterId(0), CharacterId(0))
///     .with_magnitude(10)
///     .with_duration(1);
///
/// assert!(guard.waiting);
/// assert_eq!(guard.key().name, "Guard");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Effect {
    pub kind: EffectKind,

    /// Source ability (or interaction) name, used for lookup and display.
    pub name: String,

    /// Character that applied the effect.
    pub user: CharacterId,

    /// Character the effect is attached to.
    pub owner: CharacterId,

    /// Kind-specific value.
    pub magnitude: i32,

    /// Remaining end-of-turn ticks. `Effect::PERMANENT` means until end of match.
    pub duration: u32,

    /// Hidden from the team opposing the user.
    pub invisible: bool,

    /// Internal bookkeeping: never displayed and never blocked.
    pub system: bool,

    /// Just applied; the next tick clears this flag instead of decrementing.
    pub waiting: bool,

    /// Survives the effect clear on death (first one only).
    pub legacy: bool,

    /// What happens when a `DestDef` shield is depleted.
    pub collapse: Collapse,

    /// Reaction payload for counters, reflects and hooks.
    pub reaction: Option<Arc<Reaction>>,
}

impl Effect {
    /// Duration sentinel for effects that last until the end of the match.
    pub const PERMANENT: u32 = 280_000;

    /// Create an effect with zero magnitude and a one-turn duration.
    pub fn new(kind: EffectKind, name: impl Into<String>, user: CharacterId, owner: CharacterId) -> Self {
        Self {
            kind,
            name: name.into(),
            user,
            owner,
            magnitude: 0,
            duration: 1,
            invisible: false,
            system: false,
            waiting: true,
            legacy: false,
            collapse: Collapse::None,
            reaction: None,
        }
    }

    /// Create an internal bookkeeping effect that lasts the whole match.
    pub fn tracker(name: impl Into<String>, character: CharacterId) -> Self {
        Self::new(EffectKind::System, name, character, character)
            .with_duration(Self::PERMANENT)
            .system()
    }

    #[must_use]
    pub fn with_magnitude(mut self, magnitude: i32) -> Self {
        self.magnitude = magnitude;
        self
    }

    #[must_use]
    pub fn with_duration(mut self, duration: u32) -> Self {
        self.duration = duration;
        self
    }

    #[must_use]
    pub fn permanent(self) -> Self {
        self.with_duration(Self::PERMANENT)
    }

    #[must_use]
    pub fn invisible(mut self) -> Self {
        self.invisible = true;
        self
    }

    #[must_use]
    pub fn system(mut self) -> Self {
        self.system = true;
        self
    }

    #[must_use]
    pub fn legacy(mut self) -> Self {
        self.legacy = true;
        self
    }

    /// Start ticking immediately instead of waiting one tick.
    #[must_use]
    pub fn ready(mut self) -> Self {
        self.waiting = false;
        self
    }

    #[must_use]
    pub fn with_collapse(mut self, collapse: Collapse) -> Self {
        self.collapse = collapse;
        self
    }

    #[must_use]
    pub fn with_reaction(mut self, reaction: Reaction) -> Self {
        self.reaction = Some(Arc::new(reaction));
        self
    }

    /// The identity triple.
    #[must_use]
    pub fn key(&self) -> EffectKey {
        EffectKey::new(self.kind, self.name.clone(), self.user)
    }

    /// Does this effect have the given identity?
    #[must_use]
    pub fn matches(&self, kind: EffectKind, name: &str, user: CharacterId) -> bool {
        self.kind == kind && self.user == user && self.name == name
    }

    #[must_use]
    pub fn is_permanent(&self) -> bool {
        self.duration >= Self::PERMANENT
    }
}

/// Identity of an effect on its owner.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EffectKey {
    pub kind: EffectKind,
    pub name: String,
    pub user: CharacterId,
}

impl EffectKey {
    pub fn new(kind: EffectKind, name: impl Into<String>, user: CharacterId) -> Self {
        Self {
            kind,
            name: name.into(),
            user,
        }
    }
}

impl std::fmt::Display for EffectKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}({:?} from {})", self.kind, self.name, self.user)
    }
}

/// Side effect of a `DestDef` shield reaching zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Collapse {
    /// Nothing beyond removal.
    #[default]
    None,
    /// Owner gains a `StunImmune` window.
    StunImmunity {
        duration: u32,
    },
    /// `full_remove(name, user)` on every member of the owner's team.
    CascadeRemove,
}
