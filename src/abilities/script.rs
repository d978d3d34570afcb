//! Data-driven ability bodies.
//!
//! A [`ScriptedAbility`] is an [`AbilityBehavior`] whose `execute` runs a
//! list of [`Step`]s against the actor manager's current targets. Reaction
//! responses (counters, damage hooks) reuse the same step runner.
//!
//! ```
//! use battle_resolver::abilities::{EffectTemplate, ScriptedAbility, Step};
//! use battle_resolver::combat::DamageType;
//! use battle_resolver::effects::EffectKind;
//!
//! // 15 damage, then stun every target for one turn.
//! let body = ScriptedAbility::new()
//!     .then(Step::damage(15, DamageType::Normal))
//!     .then(Step::Apply(EffectTemplate::new(EffectKind::AllStun).with_duration(1)));
//!
//! assert_eq!(body.steps.len(), 2);
//! ```

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::battle::BattleContext;
use crate::combat::{self, DamageSource, DamageType};
use crate::core::{CharacterId, TargetList};
use crate::effects::{Collapse, Effect, EffectKey, EffectKind, Reaction, ReactionTarget};
use crate::energy::EnergyCategory;

use super::ability::{Ability, AbilityBehavior};

/// Blueprint for an effect created by a step.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectTemplate {
    pub kind: EffectKind,
    /// Defaults to the name of the ability (or reaction) running the step.
    pub name: Option<String>,
    pub magnitude: i32,
    pub duration: u32,
    pub invisible: bool,
    pub legacy: bool,
    /// Skip the waiting tick.
    pub ready: bool,
    pub collapse: Collapse,
    pub reaction: Option<Arc<Reaction>>,
}

impl EffectTemplate {
    #[must_use]
    pub fn new(kind: EffectKind) -> Self {
        Self {
            kind,
            name: None,
            magnitude: 0,
            duration: 1,
            invisible: false,
            legacy: false,
            ready: false,
            collapse: Collapse::None,
            reaction: None,
        }
    }

    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
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
        self.with_duration(Effect::PERMANENT)
    }

    #[must_use]
    pub fn invisible(mut self) -> Self {
        self.invisible = true;
        self
    }

    #[must_use]
    pub fn legacy(mut self) -> Self {
        self.legacy = true;
        self
    }

    #[must_use]
    pub fn ready(mut self) -> Self {
        self.ready = true;
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

    /// Build the effect for one owner.
    #[must_use]
    pub fn instantiate(&self, default_name: &str, user: CharacterId, owner: CharacterId) -> Effect {
        let name = self.name.as_deref().unwrap_or(default_name);
        let mut effect = Effect::new(self.kind, name, user, owner)
            .with_magnitude(self.magnitude)
            .with_duration(self.duration)
            .with_collapse(self.collapse);
        effect.invisible = self.invisible;
        effect.legacy = self.legacy;
        effect.waiting = !self.ready;
        effect.reaction = self.reaction.clone();
        effect
    }
}

/// One instruction of an ability or reaction body.
///
/// Target-wide steps act on every living character in the current target
/// list, in order. `*Self` steps act on the caster.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Step {
    Damage {
        amount: i32,
        damage_type: DamageType,
    },
    Heal {
        amount: i32,
    },
    HealSelf {
        amount: i32,
    },
    Apply(EffectTemplate),
    ApplySelf(EffectTemplate),
    /// `apply_stack` on every target.
    Stack(EffectTemplate),
    StackSelf(EffectTemplate),
    /// Remove the caster's `(kind, name)` effect from every target.
    Remove {
        kind: EffectKind,
        name: String,
    },
    /// End a named interaction: `full_remove(name, caster)` on all six characters.
    FullRemove {
        name: String,
    },
    /// Damage equal to the caster's own `Stack` count times `per_stack`.
    DamageFromStack {
        stack_name: String,
        per_stack: i32,
        damage_type: DamageType,
        consume: bool,
    },
    /// Move energy from each target's team to the caster's team.
    DrainEnergy {
        category: EnergyCategory,
        amount: u32,
    },
    GainEnergy {
        category: EnergyCategory,
        amount: u32,
    },
    /// Replace the caster's identity with another profile.
    Transform {
        profile: String,
    },
    /// Split the targets on whether they hold a `(kind, name)` effect.
    IfTargetHas {
        kind: EffectKind,
        name: String,
        then: Vec<Step>,
        otherwise: Vec<Step>,
    },
    IfSelfHas {
        kind: EffectKind,
        name: String,
        then: Vec<Step>,
        otherwise: Vec<Step>,
    },
}

impl Step {
    #[must_use]
    pub fn damage(amount: i32, damage_type: DamageType) -> Self {
        Self::Damage { amount, damage_type }
    }

    #[must_use]
    pub fn heal(amount: i32) -> Self {
        Self::Heal { amount }
    }

    pub fn full_remove(name: impl Into<String>) -> Self {
        Self::FullRemove { name: name.into() }
    }

    pub fn transform(profile: impl Into<String>) -> Self {
        Self::Transform {
            profile: profile.into(),
        }
    }
}

/// Ability-specific usage requirement on the actor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Requirement {
    SelfHas { kind: EffectKind, name: String },
    SelfLacks { kind: EffectKind, name: String },
    /// The actor's own `Stack` named `name` is at least `count`.
    StackAtLeast { name: String, count: i32 },
}

impl Requirement {
    fn holds(&self, ctx: &BattleContext, actor: CharacterId) -> bool {
        let effects = &ctx.character(actor).effects;
        match self {
            Self::SelfHas { kind, name } => effects.has(*kind, name),
            Self::SelfLacks { kind, name } => !effects.has(*kind, name),
            Self::StackAtLeast { name, count } => effects
                .get_with_user(EffectKind::Stack, name, actor)
                .is_some_and(|stack| stack.magnitude >= *count),
        }
    }
}

/// Ability body built from steps.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptedAbility {
    pub requires: Vec<Requirement>,
    pub steps: Vec<Step>,
}

impl ScriptedAbility {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a step.
    #[must_use]
    pub fn then(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }

    /// Add a usage requirement.
    #[must_use]
    pub fn requires(mut self, requirement: Requirement) -> Self {
        self.requires.push(requirement);
        self
    }
}

impl AbilityBehavior for ScriptedAbility {
    fn can_use(&self, _ability: &Ability, ctx: &BattleContext, actor: CharacterId) -> bool {
        self.requires.iter().all(|req| req.holds(ctx, actor))
    }

    fn execute(&self, ability: &Ability, ctx: &mut BattleContext, actor: CharacterId) {
        let caster = combat::resolve_effective_actor(ctx, actor);
        let slot = ctx.character(actor).ability_slot(ability.id);
        let source = DamageSource::ability(ability, slot);
        let targets = ctx.manager(actor).current_targets.clone();

        run_steps(ctx, caster, &self.steps, &targets, &source);
    }
}

/// Run steps as `caster` against `targets`.
pub fn run_steps(
    ctx: &mut BattleContext,
    caster: CharacterId,
    steps: &[Step],
    targets: &[CharacterId],
    source: &DamageSource,
) {
    for step in steps {
        run_step(ctx, caster, step, targets, source);
    }
}

fn run_step(
    ctx: &mut BattleContext,
    caster: CharacterId,
    step: &Step,
    targets: &[CharacterId],
    source: &DamageSource,
) {
    match step {
        Step::Damage { amount, damage_type } => {
            for &target in targets {
                if ctx.is_alive(target) {
                    combat::apply_damage(ctx, caster, target, *amount, *damage_type, source);
                }
            }
        }

        Step::Heal { amount } => {
            for &target in targets {
                combat::apply_heal(ctx, caster, target, *amount, source);
            }
        }

        Step::HealSelf { amount } => {
            combat::apply_heal(ctx, caster, caster, *amount, source);
        }

        Step::Apply(template) => {
            for &target in targets {
                if ctx.is_alive(target) {
                    ctx.add_effect(template.instantiate(&source.name, caster, target));
                }
            }
        }

        Step::ApplySelf(template) => {
            ctx.add_effect(template.instantiate(&source.name, caster, caster));
        }

        Step::Stack(template) => {
            for &target in targets {
                if ctx.is_alive(target) {
                    ctx.apply_stack(template.instantiate(&source.name, caster, target));
                }
            }
        }

        Step::StackSelf(template) => {
            ctx.apply_stack(template.instantiate(&source.name, caster, caster));
        }

        Step::Remove { kind, name } => {
            let key = EffectKey::new(*kind, name.as_str(), caster);
            for &target in targets {
                ctx.remove_effect(target, &key);
            }
        }

        Step::FullRemove { name } => {
            ctx.full_remove_everywhere(name, caster);
        }

        Step::DamageFromStack {
            stack_name,
            per_stack,
            damage_type,
            consume,
        } => {
            let key = EffectKey::new(EffectKind::Stack, stack_name.as_str(), caster);
            let stacks = ctx
                .character(caster)
                .effects
                .get_key(&key)
                .map_or(0, |stack| stack.magnitude);
            if stacks <= 0 {
                return;
            }

            for &target in targets {
                if ctx.is_alive(target) {
                    combat::apply_damage(ctx, caster, target, stacks * per_stack, *damage_type, source);
                }
            }
            if *consume {
                ctx.remove_effect(caster, &key);
            }
        }

        Step::DrainEnergy { category, amount } => {
            for &target in targets {
                combat::drain_energy(ctx, caster, target, *category, *amount);
            }
        }

        Step::GainEnergy { category, amount } => {
            let team = ctx.team_of(caster);
            ctx.gain_energy(team, *category, *amount);
        }

        Step::Transform { profile } => {
            ctx.transform(caster, profile);
        }

        Step::IfTargetHas {
            kind,
            name,
            then,
            otherwise,
        } => {
            let (holding, lacking): (TargetList, TargetList) = targets
                .iter()
                .copied()
                .partition(|&target| ctx.character(target).effects.has(*kind, name));
            run_steps(ctx, caster, then, &holding, source);
            run_steps(ctx, caster, otherwise, &lacking, source);
        }

        Step::IfSelfHas {
            kind,
            name,
            then,
            otherwise,
        } => {
            let branch = if ctx.character(caster).effects.has(*kind, name) {
                then
            } else {
                otherwise
            };
            run_steps(ctx, caster, branch, targets, source);
        }
    }
}

/// Fire a reaction effect's response as its user.
///
/// Does nothing for effects without a payload or once the reaction depth
/// bound is reached.
pub fn run_reaction(ctx: &mut BattleContext, effect: &Effect, trigger: CharacterId) {
    let Some(reaction) = effect.reaction.clone() else {
        return;
    };
    if reaction.response.is_empty() {
        return;
    }

    let aimed_at = match reaction.target {
        ReactionTarget::Trigger => trigger,
        ReactionTarget::Owner => effect.owner,
    };

    if !ctx.enter_reaction() {
        return;
    }
    let source = DamageSource::reaction(&effect.name);
    run_steps(ctx, effect.user, &reaction.response, &[aimed_at], &source);
    ctx.exit_reaction();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_defaults_name() {
        let template = EffectTemplate::new(EffectKind::AllDr).with_magnitude(10);
        let effect = template.instantiate("Guard", CharacterId(0), CharacterId(1));

        assert_eq!(effect.name, "Guard");
        assert_eq!(effect.magnitude, 10);
        assert_eq!(effect.user, CharacterId(0));
        assert_eq!(effect.owner, CharacterId(1));
        assert!(effect.waiting);
    }

    #[test]
    fn test_template_overrides() {
        let template = EffectTemplate::new(EffectKind::Mark)
            .named("Heirloom")
            .legacy()
            .ready()
            .permanent();
        let effect = template.instantiate("Strike", CharacterId(2), CharacterId(2));

        assert_eq!(effect.name, "Heirloom");
        assert!(effect.legacy);
        assert!(!effect.waiting);
        assert!(effect.is_permanent());
    }

    #[test]
    fn test_step_serialization() {
        let step = Step::IfSelfHas {
            kind: EffectKind::Stack,
            name: "Sword".to_string(),
            then: vec![Step::damage(5, DamageType::Piercing)],
            otherwise: vec![],
        };
        let json = serde_json::to_string(&step).unwrap();
        let deserialized: Step = serde_json::from_str(&json).unwrap();
        assert_eq!(step, deserialized);
    }
}
