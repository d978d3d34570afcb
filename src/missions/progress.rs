//! Per-character mission progress counters.

use serde::{Deserialize, Serialize};

use super::rule::Completion;

/// Number of mission slots per character.
pub const MISSION_SLOTS: usize = 5;

/// Progress and completion flags for the five mission slots.
///
/// Slots are 1-based everywhere outside this struct. A slot's stored
/// progress never changes once it is flagged complete.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MissionProgress {
    progress: [u32; MISSION_SLOTS],
    complete: [bool; MISSION_SLOTS],
}

impl MissionProgress {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn index(slot: u8) -> Option<usize> {
        let index = usize::from(slot).checked_sub(1)?;
        (index < MISSION_SLOTS).then_some(index)
    }

    /// Stored progress of a slot (0 for out-of-range slots).
    #[must_use]
    pub fn progress(&self, slot: u8) -> u32 {
        Self::index(slot).map_or(0, |i| self.progress[i])
    }

    #[must_use]
    pub fn is_complete(&self, slot: u8) -> bool {
        Self::index(slot).is_some_and(|i| self.complete[i])
    }

    /// Record progress. Returns true if this call completed the slot.
    pub fn record(&mut self, slot: u8, amount: u32, completion: Completion) -> bool {
        let Some(i) = Self::index(slot) else {
            return false;
        };
        if self.complete[i] {
            return false;
        }

        match completion {
            Completion::Accumulate { goal } => {
                self.progress[i] = self.progress[i].saturating_add(amount).min(goal);
                if self.progress[i] >= goal {
                    self.complete[i] = true;
                }
            }
            Completion::OneShot => {
                self.progress[i] = 1;
                self.complete[i] = true;
            }
        }
        self.complete[i]
    }

    /// Slots (1-based) flagged complete.
    pub fn completed_slots(&self) -> impl Iterator<Item = u8> + '_ {
        (1..=MISSION_SLOTS as u8).filter(|&slot| self.is_complete(slot))
    }
}
