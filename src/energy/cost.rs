//! Ability cost vectors.

use serde::{Deserialize, Serialize};

use super::EnergyCategory;

/// Cost of an ability over the five energy categories.
///
/// ```
/// use battle_resolver::energy::{CostVector, EnergyCategory};
///
/// let mut cost = CostVector::new()
///     .with(EnergyCategory::Mental, 1)
///     .with(EnergyCategory::Random, 1);
/// assert_eq!(cost.total_cost(), 2);
///
/// cost.modify_ability_cost(EnergyCategory::Mental, -3);
/// assert_eq!(cost.get(EnergyCategory::Mental), 0);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CostVector {
    amounts: [u32; 5],
}

impl CostVector {
    /// A free cost.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set one category (builder pattern).
    #[must_use]
    pub fn with(mut self, category: EnergyCategory, amount: u32) -> Self {
        self.amounts[category.code() as usize] = amount;
        self
    }

    /// Amount required in one category.
    #[must_use]
    pub fn get(&self, category: EnergyCategory) -> u32 {
        self.amounts[category.code() as usize]
    }

    /// Sum over all categories.
    #[must_use]
    pub fn total_cost(&self) -> u32 {
        self.amounts.iter().sum()
    }

    /// Does this cost nothing?
    #[must_use]
    pub fn is_free(&self) -> bool {
        self.total_cost() == 0
    }

    /// Adjust one category by `delta`, never going below zero.
    pub fn modify_ability_cost(&mut self, category: EnergyCategory, delta: i32) {
        let slot = &mut self.amounts[category.code() as usize];
        *slot = (i64::from(*slot) + i64::from(delta)).max(0) as u32;
    }
}
