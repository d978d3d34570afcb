//! Character state: static profiles, live battle state and the per-battle manager.

mod character;
mod manager;
mod profile;

pub use character::{BattleStats, Character};
pub use manager::CharacterManager;
pub use profile::{CharacterProfile, ProfileLibrary, Roster, ALT_SLOTS, MAIN_SLOTS};
