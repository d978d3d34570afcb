//! Team identification and per-team data storage.
//!
//! ## Team
//!
//! A battle has exactly two teams, `Team(0)` and `Team(1)`.
//!
//! ## TeamMap
//!
//! Per-team data storage indexed by `Team`, used for the shared energy
//! pools and the starting rosters.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

use super::entity::{CharacterId, TEAM_SIZE};

/// One of the two sides of a battle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Team(pub u8);

impl Team {
    /// Create a team ID. Only 0 and 1 are meaningful.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Raw team index (0 or 1).
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// The other team.
    #[must_use]
    pub const fn opponent(self) -> Self {
        Self(1 - self.0)
    }

    /// Both teams in order.
    pub fn both() -> impl Iterator<Item = Team> {
        [Team(0), Team(1)].into_iter()
    }

    /// The three characters naturally on this team.
    ///
    /// ```
    /// use battle_resolver::core::{CharacterId, Team};
    ///
    /// let members: Vec<_> = Team::new(1).members().collect();
    /// assert_eq!(members, vec![CharacterId(3), CharacterId(4), CharacterId(5)]);
    /// ```
    pub fn members(self) -> impl Iterator<Item = CharacterId> {
        (0..TEAM_SIZE as u8).map(move |slot| CharacterId::from_parts(self, slot))
    }
}

impl std::fmt::Display for Team {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Team {}", self.0)
    }
}

/// Per-team data storage with O(1) access.
///
/// ```
/// use battle_resolver::core::{Team, TeamMap};
///
/// let mut wins: TeamMap<u32> = TeamMap::with_value(0);
/// wins[Team::new(1)] += 1;
/// assert_eq!(wins[Team::new(1)], 1);
/// assert_eq!(wins[Team::new(0)], 0);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TeamMap<T> {
    data: [T; 2],
}

impl<T> TeamMap<T> {
    /// Create a map with values from a factory function.
    pub fn new(factory: impl Fn(Team) -> T) -> Self {
        Self {
            data: [factory(Team(0)), factory(Team(1))],
        }
    }

    /// Create a map from explicit values for team 0 and team 1.
    pub fn from_pair(first: T, second: T) -> Self {
        Self {
            data: [first, second],
        }
    }

    /// Create a map with both entries set to the same value.
    pub fn with_value(value: T) -> Self
    where
        T: Clone,
    {
        Self::new(|_| value.clone())
    }

    /// Get a reference to a team's data.
    #[must_use]
    pub fn get(&self, team: Team) -> &T {
        &self.data[team.index()]
    }

    /// Get a mutable reference to a team's data.
    pub fn get_mut(&mut self, team: Team) -> &mut T {
        &mut self.data[team.index()]
    }

    /// Iterate over (Team, &T) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (Team, &T)> {
        self.data
            .iter()
            .enumerate()
            .map(|(i, v)| (Team(i as u8), v))
    }
}

impl<T: Default> Default for TeamMap<T> {
    fn default() -> Self {
        Self::new(|_| T::default())
    }
}

impl<T> Index<Team> for TeamMap<T> {
    type Output = T;

    fn index(&self, team: Team) -> &Self::Output {
        self.get(team)
    }
}

impl<T> IndexMut<Team> for TeamMap<T> {
    fn index_mut(&mut self, team: Team) -> &mut Self::Output {
        self.get_mut(team)
    }
}
