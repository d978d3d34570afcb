//! Ability definitions and the behavior contract.
//!
//! An `Ability` is a shared, stateless definition. The only per-character
//! mutable state tied to an ability is its remaining cooldown, which lives on
//! the `Character`.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::battle::BattleContext;
use crate::core::{BattleError, CharacterId, TargetList};
use crate::effects::{CostAdjust, EffectKind};
use crate::energy::CostVector;

use super::targeting;

/// Ability identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AbilityId(pub u32);

impl AbilityId {
    /// Create a new ability ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for AbilityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ability({})", self.0)
    }
}

/// Classification tags used by specific stuns, specific invulnerability and
/// counter class filters. The discriminant is the magnitude code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum AbilityClass {
    Physical = 1,
    Energy = 2,
    Mental = 3,
    Strategic = 4,
    Melee = 5,
    Ranged = 6,
    Instant = 7,
    Action = 8,
    Control = 9,
    Unique = 10,
    Affliction = 11,
}

impl AbilityClass {
    #[must_use]
    pub const fn code(self) -> i32 {
        self as i32
    }

    #[must_use]
    pub const fn from_code(code: i32) -> Option<Self> {
        Some(match code {
            1 => Self::Physical,
            2 => Self::Energy,
            3 => Self::Mental,
            4 => Self::Strategic,
            5 => Self::Melee,
            6 => Self::Ranged,
            7 => Self::Instant,
            8 => Self::Action,
            9 => Self::Control,
            10 => Self::Unique,
            11 => Self::Affliction,
            _ => return None,
        })
    }
}

/// Which characters an ability can aim at.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum TargetType {
    /// One character: an enemy if harmful, an ally otherwise.
    Single = 0,
    MultiAlly = 1,
    MultiEnemy = 2,
    All = 3,
}

impl TargetType {
    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }

    #[must_use]
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Single),
            1 => Some(Self::MultiAlly),
            2 => Some(Self::MultiEnemy),
            3 => Some(Self::All),
            _ => None,
        }
    }
}

/// Extra damage per point of the dealer's named `Stack` effect.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StackBonus {
    pub stack_name: String,
    pub per_stack: i32,
}

impl StackBonus {
    pub fn new(stack_name: impl Into<String>, per_stack: i32) -> Self {
        Self {
            stack_name: stack_name.into(),
            per_stack,
        }
    }
}

/// Per-ability behavior.
///
/// `target` and `can_use` must not mutate anything. `execute` is the only
/// state-mutating entry point; it reads the actor manager's
/// `current_targets` and is invoked at most once per use. The orchestrator
/// does not guard against double invocation.
pub trait AbilityBehavior: Send + Sync + fmt::Debug {
    /// Characters this ability may currently aim at.
    fn target(&self, ability: &Ability, ctx: &BattleContext, actor: CharacterId) -> TargetList {
        targeting::default_targets(ability, ctx, actor)
    }

    /// Ability-specific lockout. Stun, cooldown and cost are checked by the engine.
    fn can_use(&self, _ability: &Ability, _ctx: &BattleContext, _actor: CharacterId) -> bool {
        true
    }

    fn execute(&self, ability: &Ability, ctx: &mut BattleContext, actor: CharacterId);
}

/// A shared ability definition.
///
/// ## Example
///
/// ```
/// use battle_resolver::abilities::{Ability, AbilityClass, AbilityId, ScriptedAbility, Step};
/// use battle_resolver::combat::DamageType;
/// use battle_resolver::energy::{CostVector, EnergyCategory};
///
/// let strike = Ability::new(
///     AbilityId::new(1),
///     "Strike",
///     ScriptedAbility::new().then(Step::damage(20, DamageType::Normal)),
/// )
/// .with_cost(CostVector::new().with(EnergyCategory::Physical, 1))
/// .with_cooldown(1)
/// .with_class(AbilityClass::Physical);
///
/// assert!(strike.harmful);
/// assert_eq!(strike.cost.total_cost(), 1);
/// ```
#[derive(Clone, Debug)]
pub struct Ability {
    pub id: AbilityId,
    pub name: String,
    pub cost: CostVector,
    pub cooldown: u32,
    pub target_type: TargetType,
    /// Aimed at enemies (selects the counter table and invulnerability checks).
    pub harmful: bool,
    /// Ally-targeting forms may include the actor.
    pub include_self: bool,
    pub classes: SmallVec<[AbilityClass; 4]>,
    pub stack_bonus: Option<StackBonus>,
    pub behavior: Arc<dyn AbilityBehavior>,
}

impl Ability {
    /// Create a free, single-target, harmful ability with no cooldown.
    pub fn new(id: AbilityId, name: impl Into<String>, behavior: impl AbilityBehavior + 'static) -> Self {
        Self {
            id,
            name: name.into(),
            cost: CostVector::new(),
            cooldown: 0,
            target_type: TargetType::Single,
            harmful: true,
            include_self: false,
            classes: SmallVec::new(),
            stack_bonus: None,
            behavior: Arc::new(behavior),
        }
    }

    #[must_use]
    pub fn with_cost(mut self, cost: CostVector) -> Self {
        self.cost = cost;
        self
    }

    #[must_use]
    pub fn with_cooldown(mut self, cooldown: u32) -> Self {
        self.cooldown = cooldown;
        self
    }

    #[must_use]
    pub fn with_target_type(mut self, target_type: TargetType) -> Self {
        self.target_type = target_type;
        self
    }

    /// Mark as ally-targeting.
    #[must_use]
    pub fn helpful(mut self) -> Self {
        self.harmful = false;
        self
    }

    #[must_use]
    pub fn include_self(mut self) -> Self {
        self.include_self = true;
        self
    }

    #[must_use]
    pub fn with_class(mut self, class: AbilityClass) -> Self {
        if !self.classes.contains(&class) {
            self.classes.push(class);
        }
        self
    }

    #[must_use]
    pub fn with_stack_bonus(mut self, bonus: StackBonus) -> Self {
        self.stack_bonus = Some(bonus);
        self
    }

    #[must_use]
    pub fn has_class(&self, class: AbilityClass) -> bool {
        self.classes.contains(&class)
    }

    /// Cost after the actor's `CostAdjust` effects for this ability's slot.
    #[must_use]
    pub fn effective_cost(&self, ctx: &BattleContext, actor: CharacterId) -> CostVector {
        let character = ctx.character(actor);
        let slot = character.ability_slot(self.id);
        let mut cost = self.cost;

        for effect in character.effects.iter_kind(EffectKind::CostAdjust) {
            let adjust = CostAdjust::decode(effect.magnitude);
            let matches = slot.map_or(adjust.ability_target == 0, |s| adjust.applies_to(s));
            if !matches {
                continue;
            }
            if let Some(category) = adjust.energy_category() {
                cost.modify_ability_cost(category, adjust.magnitude);
            }
        }
        cost
    }

    /// Targets the behavior currently allows.
    #[must_use]
    pub fn valid_targets(&self, ctx: &BattleContext, actor: CharacterId) -> TargetList {
        self.behavior.target(self, ctx, actor)
    }

    /// Full eligibility check: stun, cooldown, cost and the behavior's lockout.
    pub fn check_usable(&self, ctx: &BattleContext, actor: CharacterId) -> Result<(), BattleError> {
        let character = ctx.character(actor);

        if character.is_stunned_for(&self.classes) {
            return Err(BattleError::Stunned {
                actor,
                ability: self.id,
            });
        }

        let remaining = character.cooldown(self.id);
        if remaining > 0 {
            return Err(BattleError::OnCooldown {
                ability: self.id,
                remaining,
            });
        }

        let team = ctx.team_of(actor);
        if !ctx.energy(team).can_afford(&self.effective_cost(ctx, actor)) {
            return Err(BattleError::InsufficientEnergy {
                team,
                ability: self.id,
            });
        }

        if !self.behavior.can_use(self, ctx, actor) {
            return Err(BattleError::LockedOut {
                actor,
                ability: self.id,
            });
        }

        Ok(())
    }

    /// Boolean form of [`Ability::check_usable`].
    #[must_use]
    pub fn can_use(&self, ctx: &BattleContext, actor: CharacterId) -> bool {
        self.check_usable(ctx, actor).is_ok()
    }
}
