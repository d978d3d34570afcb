//! Character identification.
//!
//! A battle always holds six characters: two teams of three. Every
//! character is addressed by a `CharacterId` whose value encodes its team
//! and position.
//!
//! ## ID Layout
//!
//! - `0..3`: team 0, slots 0-2
//! - `3..6`: team 1, slots 0-2
//!
//! ```
//! use battle_resolver::core::{CharacterId, Team};
//!
//! let id = CharacterId::new(4);
//! assert_eq!(id.team(), Team::new(1));
//! assert_eq!(id.slot(), 1);
//! assert_eq!(CharacterId::from_parts(Team::new(1), 1), id);
//! ```

use serde::{Deserialize, Serialize};

use super::team::Team;

/// Number of characters on each team.
pub const TEAM_SIZE: usize = 3;

/// Number of characters in a battle.
pub const BATTLE_SIZE: usize = TEAM_SIZE * 2;

/// Identifier for one of the six characters in a battle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CharacterId(pub u8);

impl CharacterId {
    /// Create a character ID from its raw index.
    #[must_use]
    pub const fn new(index: u8) -> Self {
        Self(index)
    }

    /// Create a character ID from a team and a slot within that team.
    #[must_use]
    pub const fn from_parts(team: Team, slot: u8) -> Self {
        Self(team.0 * TEAM_SIZE as u8 + slot)
    }

    /// The team this character *naturally* belongs to.
    ///
    /// Reflection can temporarily change a character's affiliation; use
    /// `BattleContext::team_of` when that matters.
    #[must_use]
    pub const fn team(self) -> Team {
        Team(self.0 / TEAM_SIZE as u8)
    }

    /// Position within the team (0-2).
    #[must_use]
    pub const fn slot(self) -> u8 {
        self.0 % TEAM_SIZE as u8
    }

    /// Raw index (0-5), usable to index the battle's character list.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Check if the index is inside a six-character battle.
    #[must_use]
    pub const fn is_valid(self) -> bool {
        (self.0 as usize) < BATTLE_SIZE
    }

    /// Iterate over all six character IDs in index order.
    pub fn all() -> impl Iterator<Item = CharacterId> {
        (0..BATTLE_SIZE as u8).map(CharacterId)
    }
}

impl From<u8> for CharacterId {
    fn from(id: u8) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for CharacterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Character({})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_team_layout() {
        for i in 0..3 {
            assert_eq!(CharacterId(i).team(), Team::new(0));
        }
        for i in 3..6 {
            assert_eq!(CharacterId(i).team(), Team::new(1));
        }
    }

    #[test]
    fn test_slot() {
        assert_eq!(CharacterId(0).slot(), 0);
        assert_eq!(CharacterId(2).slot(), 2);
        assert_eq!(CharacterId(3).slot(), 0);
        assert_eq!(CharacterId(5).slot(), 2);
    }

    #[test]
    fn test_from_parts_round_trip() {
        for id in CharacterId::all() {
            assert_eq!(CharacterId::from_parts(id.team(), id.slot()), id);
        }
    }

    #[test]
    fn test_is_valid() {
        assert!(CharacterId(5).is_valid());
        assert!(!CharacterId(6).is_valid());
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", CharacterId(4)), "Character(4)");
    }

    #[test]
    fn test_serialization() {
        let id = CharacterId(3);
        let json = serde_json::to_string(&id).unwrap();
        let deserialized: CharacterId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, deserialized);
    }
}
