//! Live per-battle character state.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::abilities::{AbilityClass, AbilityId};
use crate::effects::{AbilitySwapCode, EffectKind, EffectStore};
use crate::missions::MissionProgress;

use super::profile::{CharacterProfile, Roster, MAIN_SLOTS};

/// Running totals used by mission conditions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BattleStats {
    pub damage_dealt: u32,
    pub damage_received: u32,
    pub healing_done: u32,
}

/// A character's static identity plus its mutable battle state.
#[derive(Clone, Debug)]
pub struct Character {
    pub profile: Arc<CharacterProfile>,

    /// Identity the mission table is keyed by. Set at battle start and kept
    /// through transformations.
    pub mission_key: String,

    /// 0 to the HP ceiling.
    pub hp: i32,
    pub dead: bool,
    pub effects: EffectStore,

    /// The four abilities currently shown, after ability swaps.
    pub current_abilities: Roster,

    /// Remaining cooldown per ability. Absent means ready.
    pub cooldowns: FxHashMap<AbilityId, u32>,

    pub missions: MissionProgress,
    pub stats: BattleStats,

    /// Active cosmetic profile: 0 for the base, 1 or 2 for a `ProfSwap` variant.
    pub profile_variant: u8,
}

impl Character {
    /// Create a character at full health with its main roster.
    pub fn new(profile: Arc<CharacterProfile>) -> Self {
        Self {
            mission_key: profile.name.clone(),
            hp: profile.max_hp,
            dead: false,
            effects: EffectStore::new(),
            current_abilities: profile.main.clone(),
            cooldowns: FxHashMap::default(),
            missions: MissionProgress::new(),
            stats: BattleStats::default(),
            profile_variant: 0,
            profile,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.profile.name
    }

    /// Display name including the cosmetic variant.
    #[must_use]
    pub fn display_name(&self) -> &str {
        match self.profile_variant {
            0 => &self.profile.name,
            v => self
                .profile
                .variants
                .get(usize::from(v) - 1)
                .map_or(self.profile.name.as_str(), String::as_str),
        }
    }

    /// 1-based slot of an ability in the current roster.
    #[must_use]
    pub fn ability_slot(&self, ability: AbilityId) -> Option<u8> {
        self.current_abilities
            .iter()
            .position(|&a| a == ability)
            .map(|i| (i + 1) as u8)
    }

    #[must_use]
    pub fn has_ability(&self, ability: AbilityId) -> bool {
        self.current_abilities.contains(&ability)
    }

    #[must_use]
    pub fn is_full_health(&self) -> bool {
        self.hp >= self.profile.max_hp
    }

    // === Cooldowns ===

    #[must_use]
    pub fn cooldown(&self, ability: AbilityId) -> u32 {
        self.cooldowns.get(&ability).copied().unwrap_or(0)
    }

    pub fn set_cooldown(&mut self, ability: AbilityId, turns: u32) {
        if turns == 0 {
            self.cooldowns.remove(&ability);
        } else {
            self.cooldowns.insert(ability, turns);
        }
    }

    /// Count every running cooldown down by one.
    pub fn tick_cooldowns(&mut self) {
        self.cooldowns.retain(|_, remaining| {
            *remaining = remaining.saturating_sub(1);
            *remaining > 0
        });
    }

    // === Effect queries ===

    /// Is an ability with these classes blocked by a stun?
    #[must_use]
    pub fn is_stunned_for(&self, classes: &[AbilityClass]) -> bool {
        self.effects.has_kind(EffectKind::AllStun)
            || self
                .effects
                .iter_kind(EffectKind::SpecificStun)
                .any(|stun| classes.iter().any(|c| c.code() == stun.magnitude))
    }

    /// Can a hostile ability with these classes not target this character?
    #[must_use]
    pub fn is_invulnerable_to(&self, classes: &[AbilityClass]) -> bool {
        self.effects.has_kind(EffectKind::AllInvuln)
            || self
                .effects
                .iter_kind(EffectKind::SpecificInvuln)
                .any(|invuln| classes.iter().any(|c| c.code() == invuln.magnitude))
    }

    // === Roster ===

    /// Recompute `current_abilities` and `profile_variant` from the base
    /// roster and the active swap effects, in effect-list order.
    ///
    /// Idempotent. Returns true if anything changed.
    pub fn rebuild_roster(&mut self) -> bool {
        let profile = Arc::clone(&self.profile);
        debug_assert!(
            profile.main.len() == MAIN_SLOTS,
            "{} has {} main abilities",
            profile.name,
            profile.main.len()
        );
        if profile.main.len() != MAIN_SLOTS {
            error!(character = %profile.name, count = profile.main.len(), "main roster is not four abilities");
        }

        let mut roster = profile.main.clone();
        let mut variant = 0;

        for effect in self.effects.iter() {
            match effect.kind {
                EffectKind::AbilitySwap => {
                    let swap = AbilitySwapCode::decode(effect.magnitude).filter(|swap| {
                        (1..=roster.len()).contains(&usize::from(swap.from_slot))
                            && (1..=profile.alt.len()).contains(&usize::from(swap.to_slot))
                    });
                    debug_assert!(
                        swap.is_some(),
                        "ability swap {} from {:?} points outside the roster of {}",
                        effect.magnitude,
                        effect.name,
                        profile.name
                    );
                    match swap {
                        Some(swap) => {
                            roster[usize::from(swap.from_slot) - 1] = profile.alt[usize::from(swap.to_slot) - 1];
                        }
                        None => {
                            error!(
                                character = %profile.name,
                                code = effect.magnitude,
                                source = %effect.name,
                                "ability swap points outside the roster"
                            );
                        }
                    }
                }
                EffectKind::ProfSwap => {
                    if (1..=profile.variants.len() as i32).contains(&effect.magnitude) {
                        variant = effect.magnitude as u8;
                    }
                }
                _ => {}
            }
        }

        let changed = roster != self.current_abilities || variant != self.profile_variant;
        self.current_abilities = roster;
        self.profile_variant = variant;
        changed
    }

    /// Replace the identity and roster, keeping HP, effects, cooldowns and
    /// mission progress.
    pub fn transform(&mut self, profile: Arc<CharacterProfile>) {
        self.profile = profile;
        self.rebuild_roster();
    }
}
