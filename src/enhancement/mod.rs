//! Gear upgrades: cost tables, crafting operations and transfer rules.

pub mod costs;
pub mod logic;
pub mod transfer;

pub use costs::MaterialCost;
pub use logic::{
    apply_forge, apply_imbue, apply_potential, apply_refine, apply_temper, apply_voidforge,
    check_voidforge, forge, imbue, potential, refine, restore_refine_attempt, shatter, temper,
    ForgeOutcome, PotentialOutcome, RefineOutcome, TemperOutcome, TemperStat, VoidforgeOutcome,
};
pub use transfer::{check_capacity, check_discard, check_owned, check_send, equip, unequip};
