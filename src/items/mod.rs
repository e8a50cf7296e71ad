//! Equipment: the six slot records, their passives, loot generation and rows.

pub mod generation;
pub mod loadout;
pub mod passives;
pub mod rows;
pub mod types;

pub use generation::*;
pub use loadout::Loadout;
pub use passives::*;
pub use types::*;
