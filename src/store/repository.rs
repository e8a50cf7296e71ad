//! The persistence facade the core talks to.
//!
//! Each method is one atomic write. Multi-step operations run inside
//! [`MemoryStore::transaction`](super::MemoryStore::transaction).

use crate::character::{Companion, Currency, Player, Skill, SkillData, Stat};
use crate::core::Result;
use crate::items::{Equipment, EquipmentSlot};

pub trait UserRepository {
    /// Loads a player with its equipped gear and companions attached.
    fn get(&self, user_id: u64) -> Result<Player>;
    fn register(&mut self, player: &Player) -> Result<()>;
    /// Returns the new balance. Fails without writing if it would go negative.
    fn modify_gold(&mut self, user_id: u64, delta: i64) -> Result<u64>;
    fn modify_stat(&mut self, user_id: u64, stat: Stat, delta: i64) -> Result<()>;
    fn modify_currency(&mut self, user_id: u64, currency: Currency, delta: i64) -> Result<u64>;
    /// Writes every users column from `player`.
    fn update_from_player_object(&mut self, player: &Player) -> Result<()>;
}

pub trait EquipmentRepository {
    fn get_item(&self, slot: EquipmentSlot, item_id: u64) -> Result<Equipment>;
    fn get_all(&self, user_id: u64, slot: EquipmentSlot) -> Result<Vec<Equipment>>;
    fn get_equipped(&self, user_id: u64, slot: EquipmentSlot) -> Result<Option<Equipment>>;
    /// Marks `item_id` equipped and clears the flag on whatever it replaces.
    fn equip(&mut self, user_id: u64, slot: EquipmentSlot, item_id: u64) -> Result<()>;
    fn unequip(&mut self, user_id: u64, slot: EquipmentSlot) -> Result<()>;
    /// Inserts a new record and returns its id.
    fn create(&mut self, item: Equipment) -> Result<u64>;
    fn discard(&mut self, user_id: u64, slot: EquipmentSlot, item_id: u64) -> Result<()>;
    /// Overwrites an attempt counter such as `forges_remaining`.
    fn update_counter(&mut self, slot: EquipmentSlot, item_id: u64, column: &str, value: u32) -> Result<()>;
    /// Writes a passive column by display name; `"none"` clears it.
    fn update_passive(&mut self, slot: EquipmentSlot, item_id: u64, column: &str, passive: &str) -> Result<()>;
    fn increase_stat(&mut self, slot: EquipmentSlot, item_id: u64, column: &str, amount: u32) -> Result<()>;
    /// Writes every column of an existing record.
    fn save_item(&mut self, item: &Equipment) -> Result<()>;
    fn transfer(&mut self, slot: EquipmentSlot, item_id: u64, receiver_id: u64) -> Result<()>;
    fn count(&self, user_id: u64, slot: EquipmentSlot) -> Result<usize>;
}

pub trait SkillRepository {
    fn get_data(&self, user_id: u64) -> Result<SkillData>;
    /// Applies signed deltas to all five resources of one ledger.
    fn update_batch(&mut self, user_id: u64, skill: Skill, deltas: [i64; 5]) -> Result<()>;
    fn update_single_resource(&mut self, user_id: u64, skill: Skill, resource: &str, delta: i64) -> Result<()>;
}

pub trait CompanionRepository {
    fn add_companion(&mut self, companion: Companion) -> Result<u64>;
    fn get_all(&self, user_id: u64) -> Result<Vec<Companion>>;
    fn get_active(&self, user_id: u64) -> Result<Vec<Companion>>;
    fn set_active(&mut self, user_id: u64, companion_id: u64, active: bool) -> Result<()>;
    /// Replaces two companions with their fusion and returns it.
    fn fuse_companions(
        &mut self,
        user_id: u64,
        first_id: u64,
        second_id: u64,
        rng: &mut dyn rand::RngCore,
    ) -> Result<Companion>;
}
