//! Built-in demo roster.
//!
//! Six characters (plus one transformation form) whose abilities exercise
//! every pipeline feature: reduction, shields and their collapse rules,
//! redemption, counters, reflects, stacks, continuous effects, channels,
//! energy drain, ability swaps and transformation.
//!
//! | Team 0 | Team 1 |
//! |---|---|
//! | Vanguard | Duelist |
//! | Medic | Mystic |
//! | Sentinel | Warden |
//!
//! ```
//! use battle_resolver::content::demo;
//!
//! let battle = demo::battle(42).unwrap();
//! assert_eq!(battle.context().character(battle_resolver::core::CharacterId(0)).name(), "Vanguard");
//! ```

use std::sync::Arc;

use crate::abilities::{
    Ability, AbilityClass, EffectTemplate, Requirement, ScriptedAbility, StackBonus, Step, TargetType,
};
use crate::battle::{Battle, BattleSetup};
use crate::characters::CharacterProfile;
use crate::combat::DamageType;
use crate::core::{BattleConfig, BattleError, Team, TeamMap};
use crate::effects::{AbilitySwapCode, Collapse, EffectKind, Reaction, SlotModifier};
use crate::energy::{CostVector, EnergyCategory, EnergyPool};
use crate::missions::{Completion, Condition, EffectQuery, Increment, Mission, MissionTrigger, Outcome};

use super::BattleContent;

/// Ability IDs of the demo roster.
pub mod ids {
    use crate::abilities::AbilityId;

    pub const STRIKE: AbilityId = AbilityId::new(1);
    pub const GUARD: AbilityId = AbilityId::new(2);
    pub const CLEAVE: AbilityId = AbilityId::new(3);
    pub const RALLY: AbilityId = AbilityId::new(4);

    pub const MEND: AbilityId = AbilityId::new(11);
    pub const BARRIER: AbilityId = AbilityId::new(12);
    pub const SANCTUARY: AbilityId = AbilityId::new(13);
    pub const PURGE: AbilityId = AbilityId::new(14);

    pub const BULWARK: AbilityId = AbilityId::new(21);
    pub const MIRROR: AbilityId = AbilityId::new(22);
    pub const SHATTER: AbilityId = AbilityId::new(23);
    pub const ASCEND: AbilityId = AbilityId::new(24);
    pub const OVERLOAD: AbilityId = AbilityId::new(25);

    pub const SLASH: AbilityId = AbilityId::new(31);
    pub const RIPOSTE: AbilityId = AbilityId::new(32);
    pub const FINISHER: AbilityId = AbilityId::new(33);
    pub const FEINT: AbilityId = AbilityId::new(34);

    pub const HEX: AbilityId = AbilityId::new(41);
    pub const SIPHON: AbilityId = AbilityId::new(42);
    pub const VEIL: AbilityId = AbilityId::new(43);
    pub const UNBIND: AbilityId = AbilityId::new(44);
    pub const CATACLYSM: AbilityId = AbilityId::new(45);

    pub const BIND: AbilityId = AbilityId::new(51);
    pub const FORTIFY: AbilityId = AbilityId::new(52);
    pub const PLASMA_BOMB: AbilityId = AbilityId::new(53);
    pub const TETHER: AbilityId = AbilityId::new(54);
}

/// Name of the Mystic's transformed profile.
pub const MYSTIC_UNBOUND: &str = "Mystic Unbound";

fn cost(category: EnergyCategory, amount: u32) -> CostVector {
    CostVector::new().with(category, amount)
}

fn script() -> ScriptedAbility {
    ScriptedAbility::new()
}

fn abilities() -> Vec<Ability> {
    use ids::*;
    use EnergyCategory::{Mental, Physical, Random, Special, Weapon};

    vec![
        // === Vanguard ===
        Ability::new(STRIKE, "Strike", script().then(Step::damage(20, DamageType::Normal)))
            .with_cost(cost(Physical, 1))
            .with_class(AbilityClass::Physical)
            .with_class(AbilityClass::Melee),
        Ability::new(
            GUARD,
            "Guard",
            script().then(Step::ApplySelf(EffectTemplate::new(EffectKind::AllDr).with_magnitude(10))),
        )
        .helpful()
        .include_self()
        .with_cooldown(1)
        .with_class(AbilityClass::Instant),
        Ability::new(CLEAVE, "Cleave", script().then(Step::damage(10, DamageType::Normal)))
            .with_target_type(TargetType::MultiEnemy)
            .with_cost(cost(Physical, 1).with(Random, 1))
            .with_cooldown(1)
            .with_class(AbilityClass::Physical)
            .with_class(AbilityClass::Melee),
        Ability::new(
            RALLY,
            "Rally",
            script().then(Step::Apply(
                EffectTemplate::new(EffectKind::AllBoost)
                    .with_magnitude(SlotModifier::all(5).encode())
                    .with_duration(2),
            )),
        )
        .helpful()
        .include_self()
        .with_target_type(TargetType::MultiAlly)
        .with_cost(cost(Special, 1))
        .with_cooldown(3)
        .with_class(AbilityClass::Strategic),
        // === Medic ===
        Ability::new(MEND, "Mend", script().then(Step::heal(25)))
            .helpful()
            .include_self()
            .with_cost(cost(Special, 1))
            .with_class(AbilityClass::Energy),
        Ability::new(
            BARRIER,
            "Barrier",
            script().then(Step::Apply(
                EffectTemplate::new(EffectKind::DestDef)
                    .with_magnitude(15)
                    .with_duration(2)
                    .with_collapse(Collapse::StunImmunity { duration: 1 }),
            )),
        )
        .helpful()
        .include_self()
        .with_cost(cost(Special, 1))
        .with_cooldown(1)
        .with_class(AbilityClass::Energy),
        Ability::new(
            SANCTUARY,
            "Sanctuary",
            script().then(Step::Apply(
                EffectTemplate::new(EffectKind::Redemption)
                    .with_magnitude(10)
                    .with_duration(2),
            )),
        )
        .helpful()
        .with_cost(cost(Mental, 1))
        .with_cooldown(4)
        .with_class(AbilityClass::Strategic),
        Ability::new(
            PURGE,
            "Purge",
            script()
                .then(Step::damage(10, DamageType::Affliction))
                .then(Step::Apply(EffectTemplate::new(EffectKind::HealNegate).with_duration(2))),
        )
        .with_cost(cost(Mental, 1))
        .with_cooldown(1)
        .with_class(AbilityClass::Affliction)
        .with_class(AbilityClass::Ranged),
        // === Sentinel ===
        Ability::new(
            BULWARK,
            "Bulwark",
            script().then(Step::ApplySelf(
                EffectTemplate::new(EffectKind::CounterReceive)
                    .with_reaction(Reaction::new().with_step(Step::Apply(
                        EffectTemplate::new(EffectKind::AllStun).with_duration(2),
                    ))),
            )),
        )
        .helpful()
        .include_self()
        .with_cost(cost(Mental, 1))
        .with_cooldown(2)
        .with_class(AbilityClass::Instant)
        .with_class(AbilityClass::Control),
        Ability::new(
            MIRROR,
            "Mirror",
            script().then(Step::ApplySelf(
                EffectTemplate::new(EffectKind::Reflect).with_reaction(Reaction::new()),
            )),
        )
        .helpful()
        .include_self()
        .with_cost(cost(Special, 1))
        .with_cooldown(3)
        .with_class(AbilityClass::Instant),
        Ability::new(SHATTER, "Shatter", script().then(Step::damage(15, DamageType::Piercing)))
            .with_cost(cost(Physical, 1))
            .with_class(AbilityClass::Physical),
        Ability::new(
            ASCEND,
            "Ascend",
            script().then(Step::ApplySelf(
                EffectTemplate::new(EffectKind::AbilitySwap)
                    .with_magnitude(AbilitySwapCode::new(3, 1).encode())
                    .permanent()
                    .ready(),
            )),
        )
        .helpful()
        .include_self()
        .with_class(AbilityClass::Unique),
        Ability::new(OVERLOAD, "Overload", script().then(Step::damage(20, DamageType::Piercing)))
            .with_target_type(TargetType::MultiEnemy)
            .with_cost(cost(Special, 2))
            .with_cooldown(2)
            .with_class(AbilityClass::Energy),
        // === Duelist ===
        Ability::new(
            SLASH,
            "Slash",
            script().then(Step::damage(15, DamageType::Normal)).then(Step::StackSelf(
                EffectTemplate::new(EffectKind::Stack)
                    .named("Edge")
                    .with_magnitude(1)
                    .permanent()
                    .ready(),
            )),
        )
        .with_cost(cost(Physical, 1))
        .with_stack_bonus(StackBonus::new("Edge", 5))
        .with_class(AbilityClass::Physical)
        .with_class(AbilityClass::Melee),
        Ability::new(
            RIPOSTE,
            "Riposte",
            script().then(Step::Apply(
                EffectTemplate::new(EffectKind::CounterUse)
                    .invisible()
                    .with_reaction(Reaction::new().with_step(Step::damage(10, DamageType::Normal))),
            )),
        )
        .with_cost(cost(Mental, 1))
        .with_cooldown(2)
        .with_class(AbilityClass::Mental),
        Ability::new(
            FINISHER,
            "Finisher",
            ScriptedAbility::new()
                .requires(Requirement::StackAtLeast {
                    name: "Edge".to_string(),
                    count: 2,
                })
                .then(Step::DamageFromStack {
                    stack_name: "Edge".to_string(),
                    per_stack: 10,
                    damage_type: DamageType::Normal,
                    consume: true,
                }),
        )
        .with_cost(cost(Physical, 1))
        .with_cooldown(2)
        .with_class(AbilityClass::Physical),
        Ability::new(
            FEINT,
            "Feint",
            script().then(Step::Apply(EffectTemplate::new(EffectKind::AllStun))),
        )
        .with_cost(cost(Mental, 1))
        .with_cooldown(2)
        .with_class(AbilityClass::Mental)
        .with_class(AbilityClass::Control),
        // === Mystic ===
        Ability::new(
            HEX,
            "Hex",
            script().then(Step::damage(5, DamageType::Affliction)).then(Step::Apply(
                EffectTemplate::new(EffectKind::ContAffDmg)
                    .with_magnitude(5)
                    .with_duration(4),
            )),
        )
        .with_cost(cost(Special, 1))
        .with_class(AbilityClass::Affliction),
        Ability::new(
            SIPHON,
            "Siphon",
            script()
                .then(Step::damage(5, DamageType::Normal))
                .then(Step::DrainEnergy {
                    category: EnergyCategory::Random,
                    amount: 1,
                }),
        )
        .with_cooldown(1)
        .with_class(AbilityClass::Energy),
        Ability::new(
            VEIL,
            "Veil",
            script().then(Step::Apply(EffectTemplate::new(EffectKind::AllInvuln).invisible())),
        )
        .helpful()
        .include_self()
        .with_target_type(TargetType::MultiAlly)
        .with_cost(cost(Mental, 1))
        .with_cooldown(4)
        .with_class(AbilityClass::Strategic),
        Ability::new(UNBIND, "Unbind", script().then(Step::transform(MYSTIC_UNBOUND)))
            .helpful()
            .include_self()
            .with_class(AbilityClass::Unique),
        Ability::new(CATACLYSM, "Cataclysm", script().then(Step::damage(25, DamageType::Affliction)))
            .with_target_type(TargetType::MultiEnemy)
            .with_cost(cost(Special, 2))
            .with_cooldown(2)
            .with_class(AbilityClass::Affliction),
        // === Warden ===
        Ability::new(
            BIND,
            "Bind",
            script().then(Step::Apply(
                EffectTemplate::new(EffectKind::SpecificStun).with_magnitude(AbilityClass::Physical.code()),
            )),
        )
        .with_cost(cost(Mental, 1))
        .with_class(AbilityClass::Control),
        Ability::new(
            FORTIFY,
            "Fortify",
            script().then(Step::ApplySelf(
                EffectTemplate::new(EffectKind::DestDef)
                    .with_magnitude(20)
                    .with_duration(3)
                    .with_collapse(Collapse::CascadeRemove),
            )),
        )
        .helpful()
        .include_self()
        .with_cost(cost(Weapon, 1))
        .with_cooldown(2)
        .with_class(AbilityClass::Strategic),
        Ability::new(
            PLASMA_BOMB,
            "Plasma Bomb",
            script()
                .then(Step::Apply(EffectTemplate::new(EffectKind::Exclusive).with_duration(4)))
                .then(Step::Apply(
                    EffectTemplate::new(EffectKind::ContDmg)
                        .with_magnitude(10)
                        .with_duration(4),
                )),
        )
        .with_cost(cost(Weapon, 1))
        .with_cooldown(3)
        .with_class(AbilityClass::Energy)
        .with_class(AbilityClass::Ranged),
        Ability::new(
            TETHER,
            "Tether",
            script()
                .then(Step::ApplySelf(EffectTemplate::new(EffectKind::ContUse).with_duration(4)))
                .then(Step::Apply(
                    EffectTemplate::new(EffectKind::ContDmg)
                        .with_magnitude(10)
                        .with_duration(4),
                )),
        )
        .with_cost(cost(Weapon, 1))
        .with_cooldown(3)
        .with_class(AbilityClass::Action),
    ]
}

fn profiles() -> Vec<CharacterProfile> {
    use ids::*;

    vec![
        CharacterProfile::new("Vanguard", 100).with_main(&[STRIKE, GUARD, CLEAVE, RALLY]),
        CharacterProfile::new("Medic", 100).with_main(&[MEND, BARRIER, SANCTUARY, PURGE]),
        CharacterProfile::new("Sentinel", 100)
            .with_main(&[BULWARK, MIRROR, SHATTER, ASCEND])
            .with_alt(&[OVERLOAD])
            .with_variant("Sentinel (Ascended)"),
        CharacterProfile::new("Duelist", 100).with_main(&[SLASH, RIPOSTE, FINISHER, FEINT]),
        CharacterProfile::new("Mystic", 100).with_main(&[HEX, SIPHON, VEIL, UNBIND]),
        CharacterProfile::new(MYSTIC_UNBOUND, 100).with_main(&[HEX, SIPHON, VEIL, CATACLYSM]),
        CharacterProfile::new("Warden", 100).with_main(&[BIND, FORTIFY, PLASMA_BOMB, TETHER]),
    ]
}

fn missions() -> Vec<(&'static str, Mission)> {
    vec![
        (
            "Duelist",
            Mission::new(1, MissionTrigger::DamageDealt).completes(Completion::Accumulate { goal: 100 }),
        ),
        ("Duelist", Mission::new(2, MissionTrigger::Win).when(Condition::Alive)),
        (
            "Medic",
            Mission::new(1, MissionTrigger::HealingDone).completes(Completion::Accumulate { goal: 50 }),
        ),
        (
            "Vanguard",
            Mission::new(1, MissionTrigger::DamageReceived)
                .with_outcome(Outcome::Tracker("Vanguard Bloodied".to_string())),
        ),
        (
            "Vanguard",
            Mission::new(2, MissionTrigger::Win)
                .when(Condition::HasEffect(EffectQuery::tracker("Vanguard Bloodied"))),
        ),
        (
            "Vanguard",
            Mission::new(3, MissionTrigger::Win)
                .when(Condition::LacksEffect(EffectQuery::tracker("Vanguard Bloodied"))),
        ),
        ("Warden", Mission::new(1, MissionTrigger::TurnEnd).when(Condition::LastStanding)),
        (
            "Mystic",
            Mission::new(1, MissionTrigger::EffectApplied)
                .when(Condition::EventEffect {
                    kind: EffectKind::ContAffDmg,
                    name: "Hex".to_string(),
                })
                .with_outcome(Outcome::Progress(Increment::Fixed(1)))
                .completes(Completion::Accumulate { goal: 3 }),
        ),
    ]
}

/// The full demo library.
#[must_use]
pub fn content() -> BattleContent {
    let mut content = BattleContent::new();
    for ability in abilities() {
        content = content.with_ability(ability);
    }
    for profile in profiles() {
        content = content.with_profile(profile);
    }
    for (character, mission) in missions() {
        content = content.with_mission(character, mission);
    }
    content
}

/// Three of every typed energy for both teams.
#[must_use]
pub fn starting_energy() -> EnergyPool {
    EnergyCategory::TYPED
        .into_iter()
        .fold(EnergyPool::new(), |pool, category| pool.with(category, 3))
}

/// Standard demo matchup.
#[must_use]
pub fn setup(seed: u64) -> BattleSetup {
    BattleSetup {
        seed,
        rosters: TeamMap::from_pair(
            vec!["Vanguard".to_string(), "Medic".to_string(), "Sentinel".to_string()],
            vec!["Duelist".to_string(), "Mystic".to_string(), "Warden".to_string()],
        ),
        config: BattleConfig::new().with_starting_energy(starting_energy()),
        content: Arc::new(content()),
    }
}

/// A battle of the standard demo matchup, with `Team(0)` to act.
pub fn battle(seed: u64) -> Result<Battle, BattleError> {
    let battle = Battle::new(setup(seed))?;
    debug_assert_eq!(battle.context().active_team(), Team::new(0));
    Ok(battle)
}
