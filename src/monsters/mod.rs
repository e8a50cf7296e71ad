//! Monster generation, the modifier catalogue and boss encounters.

pub mod bosses;
pub mod catalogue;
pub mod generation;
pub mod modifiers;
pub mod types;

pub use bosses::{BossEncounter, Epilogue, PhaseDescriptor, SoulCoreChoice};
pub use generation::{generate_monster, roll_encounter_mode};
pub use modifiers::Modifier;
pub use types::{EncounterMode, Monster};
