//! Reaction payloads carried by counter, reflect and hook effects.

use serde::{Deserialize, Serialize};

use crate::abilities::{AbilityClass, Step};

/// Who a reaction's response steps are aimed at.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReactionTarget {
    /// The character whose action or damage triggered the reaction.
    #[default]
    Trigger,
    /// The character holding the reaction effect.
    Owner,
}

/// What a reaction effect does when it fires.
///
/// Responses run with the effect's `user` as the acting character.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reaction {
    /// Only abilities carrying this class trigger the reaction.
    pub class_filter: Option<AbilityClass>,

    /// Belongs to the helpful counter table (ally-targeting actions).
    pub helpful: bool,

    /// Not consumed when it fires.
    pub persistent: bool,

    pub response: Vec<Step>,

    pub target: ReactionTarget,
}

impl Reaction {
    /// A reaction that does nothing but intercept.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_class(mut self, class: AbilityClass) -> Self {
        self.class_filter = Some(class);
        self
    }

    #[must_use]
    pub fn helpful(mut self) -> Self {
        self.helpful = true;
        self
    }

    #[must_use]
    pub fn persistent(mut self) -> Self {
        self.persistent = true;
        self
    }

    #[must_use]
    pub fn with_step(mut self, step: Step) -> Self {
        self.response.push(step);
        self
    }

    #[must_use]
    pub fn aimed_at(mut self, target: ReactionTarget) -> Self {
        self.target = target;
        self
    }

    /// Does an ability with these classes pass the class filter?
    #[must_use]
    pub fn accepts(&self, classes: &[AbilityClass]) -> bool {
        self.class_filter.is_none_or(|class| classes.contains(&class))
    }
}
