//! The player record, companions, gathering ledgers and level progression.

pub mod companion;
pub mod player;
pub mod progression;
pub mod skills;

pub use companion::{Companion, CompanionPassive};
pub use player::{Currency, Emblems, Player, Stat, Wallet};
pub use progression::{apply_defeat_penalty, apply_level_ups, exp_threshold, LevelUp};
pub use skills::{Skill, SkillData, SkillLedger};
