//! Experience, gold, drops and companion capture after a won fight.

pub mod drops;
pub mod logic;

pub use drops::{
    calculate_item_drop_chance, roll_boss_drops, roll_elemental_drops, roll_gear_drop,
    roll_pet_capture, roll_special_drops, GearDrop,
};
pub use logic::{calculate_gold, calculate_xp, grant_victory, VictoryRewards};
