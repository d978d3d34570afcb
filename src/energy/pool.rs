//! Energy categories and the per-team pool.

use serde::{Deserialize, Serialize};

use crate::core::GameRng;

use super::CostVector;

/// One of the five energy categories.
///
/// The discriminant is the category digit used by the compact
/// cost-adjust and energy-gain magnitude codes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum EnergyCategory {
    Physical = 0,
    Special = 1,
    Mental = 2,
    Weapon = 3,
    /// Wildcard. Payable with any typed energy.
    Random = 4,
}

impl EnergyCategory {
    /// All five categories in code order.
    pub const ALL: [EnergyCategory; 5] = [
        EnergyCategory::Physical,
        EnergyCategory::Special,
        EnergyCategory::Mental,
        EnergyCategory::Weapon,
        EnergyCategory::Random,
    ];

    /// The four categories a pool can hold.
    pub const TYPED: [EnergyCategory; 4] = [
        EnergyCategory::Physical,
        EnergyCategory::Special,
        EnergyCategory::Mental,
        EnergyCategory::Weapon,
    ];

    /// Category digit (0-4).
    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Parse a category digit.
    #[must_use]
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Physical),
            1 => Some(Self::Special),
            2 => Some(Self::Mental),
            3 => Some(Self::Weapon),
            4 => Some(Self::Random),
            _ => None,
        }
    }

    /// Is this one of the four pool categories?
    #[must_use]
    pub const fn is_typed(self) -> bool {
        !matches!(self, Self::Random)
    }

    /// Roll a typed category uniformly.
    pub fn roll(rng: &mut GameRng) -> Self {
        Self::TYPED[rng.gen_range(0..Self::TYPED.len())]
    }
}

/// A team's shared stock of typed energy.
///
/// ```
/// use battle_resolver::energy::{CostVector, EnergyCategory, EnergyPool};
///
/// let mut pool = EnergyPool::new()
///     .with(EnergyCategory::Physical, 1)
///     .with(EnergyCategory::Mental, 2);
///
/// let cost = CostVector::new()
///     .with(EnergyCategory::Physical, 1)
///     .with(EnergyCategory::Random, 1);
///
/// assert!(pool.pay(&cost));
/// assert_eq!(pool.get(EnergyCategory::Physical), 0);
/// assert_eq!(pool.get(EnergyCategory::Mental), 1);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EnergyPool {
    typed: [u32; 4],
}

impl EnergyPool {
    /// Create an empty pool.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a category's stock (builder pattern). `Random` is ignored.
    #[must_use]
    pub fn with(mut self, category: EnergyCategory, amount: u32) -> Self {
        if category.is_typed() {
            self.typed[category.code() as usize] = amount;
        }
        self
    }

    /// Stock of a typed category. `Random` reports the total.
    #[must_use]
    pub fn get(&self, category: EnergyCategory) -> u32 {
        if category.is_typed() {
            self.typed[category.code() as usize]
        } else {
            self.total()
        }
    }

    /// Total typed energy held.
    #[must_use]
    pub fn total(&self) -> u32 {
        self.typed.iter().sum()
    }

    /// Add energy. A `Random` gain is rolled into a typed category.
    pub fn gain(&mut self, category: EnergyCategory, amount: u32, rng: &mut GameRng) {
        if category.is_typed() {
            self.typed[category.code() as usize] += amount;
        } else {
            for _ in 0..amount {
                let rolled = EnergyCategory::roll(rng);
                self.typed[rolled.code() as usize] += 1;
            }
        }
    }

    /// Remove up to `amount` energy, returning what was actually removed.
    ///
    /// A `Random` removal picks uniformly among the non-empty categories one
    /// unit at a time.
    pub fn remove(&mut self, category: EnergyCategory, amount: u32, rng: &mut GameRng) -> EnergyPool {
        let mut taken = EnergyPool::new();

        if category.is_typed() {
            let index = category.code() as usize;
            let removed = amount.min(self.typed[index]);
            self.typed[index] -= removed;
            taken.typed[index] = removed;
            return taken;
        }

        for _ in 0..amount {
            let stocked: Vec<usize> = (0..4).filter(|&i| self.typed[i] > 0).collect();
            let Some(&index) = rng.choose(&stocked) else {
                break;
            };
            self.typed[index] -= 1;
            taken.typed[index] += 1;
        }
        taken
    }

    /// Add every unit held by `other`.
    pub fn merge(&mut self, other: &EnergyPool) {
        for (mine, theirs) in self.typed.iter_mut().zip(other.typed) {
            *mine += theirs;
        }
    }

    /// Can this pool pay the cost?
    #[must_use]
    pub fn can_afford(&self, cost: &CostVector) -> bool {
        let mut spare = 0;
        for category in EnergyCategory::TYPED {
            let have = self.get(category);
            let need = cost.get(category);
            if have < need {
                return false;
            }
            spare += have - need;
        }
        spare >= cost.get(EnergyCategory::Random)
    }

    /// Pay a cost. Returns false and leaves the pool untouched if it cannot.
    ///
    /// The random part is paid one unit at a time from the category with the
    /// largest remaining stock, ties going to the lowest category code, so
    /// payment never consumes randomness.
    pub fn pay(&mut self, cost: &CostVector) -> bool {
        if !self.can_afford(cost) {
            return false;
        }

        for category in EnergyCategory::TYPED {
            self.typed[category.code() as usize] -= cost.get(category);
        }

        for _ in 0..cost.get(EnergyCategory::Random) {
            let mut best = 0;
            for i in 1..4 {
                if self.typed[i] > self.typed[best] {
                    best = i;
                }
            }
            self.typed[best] -= 1;
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_codes() {
        for category in EnergyCategory::ALL {
            assert_eq!(EnergyCategory::from_code(category.code()), Some(category));
        }
        assert_eq!(EnergyCategory::from_code(5), None);
    }

    #[test]
    fn test_can_afford_typed() {
        let pool = EnergyPool::new().with(EnergyCategory::Physical, 1);
        let cost = CostVector::new().with(EnergyCategory::Physical, 1);
        assert!(pool.can_afford(&cost));

        let cost = CostVector::new().with(EnergyCategory::Special, 1);
        assert!(!pool.can_afford(&cost));
    }

    #[test]
    fn test_random_cost_uses_spare() {
        let pool = EnergyPool::new()
            .with(EnergyCategory::Physical, 1)
            .with(EnergyCategory::Weapon, 1);

        let cost = CostVector::new()
            .with(EnergyCategory::Physical, 1)
            .with(EnergyCategory::Random, 1);
        assert!(pool.can_afford(&cost));

        let cost = CostVector::new()
            .with(EnergyCategory::Physical, 1)
            .with(EnergyCategory::Random, 2);
        assert!(!pool.can_afford(&cost));
    }

    #[test]
    fn test_pay_random_from_largest() {
        let mut pool = EnergyPool::new()
            .with(EnergyCategory::Physical, 1)
            .with(EnergyCategory::Mental, 3);

        let cost = CostVector::new().with(EnergyCategory::Random, 2);
        assert!(pool.pay(&cost));
        assert_eq!(pool.get(EnergyCategory::Physical), 1);
        assert_eq!(pool.get(EnergyCategory::Mental), 1);
    }

    #[test]
    fn test_pay_random_tie_goes_to_lowest() {
        let mut pool = EnergyPool::new()
            .with(EnergyCategory::Special, 2)
            .with(EnergyCategory::Weapon, 2);

        let cost = CostVector::new().with(EnergyCategory::Random, 1);
        assert!(pool.pay(&cost));
        assert_eq!(pool.get(EnergyCategory::Special), 1);
        assert_eq!(pool.get(EnergyCategory::Weapon), 2);
    }

    #[test]
    fn test_pay_failure_leaves_pool() {
        let mut pool = EnergyPool::new().with(EnergyCategory::Physical, 1);
        let before = pool.clone();
        let cost = CostVector::new().with(EnergyCategory::Physical, 2);

        assert!(!pool.pay(&cost));
        assert_eq!(pool, before);
    }

    #[test]
    fn test_gain_random_rolls_typed() {
        let mut rng = GameRng::new(7);
        let mut pool = EnergyPool::new();
        pool.gain(EnergyCategory::Random, 5, &mut rng);
        assert_eq!(pool.total(), 5);
    }

    #[test]
    fn test_remove_clamps() {
        let mut rng = GameRng::new(7);
        let mut pool = EnergyPool::new().with(EnergyCategory::Weapon, 1);

        assert_eq!(pool.remove(EnergyCategory::Weapon, 3, &mut rng).total(), 1);
        assert_eq!(pool.remove(EnergyCategory::Random, 3, &mut rng).total(), 0);
        assert_eq!(pool.total(), 0);
    }

    #[test]
    fn test_random_remove_then_merge() {
        let mut rng = GameRng::new(11);
        let mut victim = EnergyPool::new()
            .with(EnergyCategory::Physical, 1)
            .with(EnergyCategory::Special, 1);
        let mut thief = EnergyPool::new();

        let taken = victim.remove(EnergyCategory::Random, 1, &mut rng);
        thief.merge(&taken);

        assert_eq!(victim.total(), 1);
        assert_eq!(thief.total(), 1);
        assert_eq!(victim.total() + thief.total(), 2);
    }
}
