//! Energy and cost model.
//!
//! Abilities are paid for from a per-team shared pool of typed energy:
//!
//! - [`EnergyCategory`]: the four typed categories plus the `Random` wildcard
//! - [`CostVector`]: an ability's cost over all five categories
//! - [`EnergyPool`]: a team's stock of typed energy
//!
//! `Random` never exists in a pool. A random cost is paid with whatever
//! typed energy the pool holds.

mod cost;
mod pool;

pub use cost::CostVector;
pub use pool::{EnergyCategory, EnergyPool};
