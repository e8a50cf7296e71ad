//! Row-backed in-memory store.
//!
//! Users and equipment are kept as positional rows exactly as the tables hold
//! them, so every read and write goes through the row codecs. Skills and
//! companions are stored as records.

use super::repository::{CompanionRepository, EquipmentRepository, SkillRepository, UserRepository};
use super::row::Row;
use super::user_row::{user_from_row, user_to_row, IDX_GOLD};
use crate::character::companion::fuse;
use crate::character::{Companion, Currency, Player, Skill, SkillData, Stat};
use crate::core::constants::{FUSE_GOLD_COST, MAX_ACTIVE_COMPANIONS, MAX_COMPANION_ROSTER, SLOT_INVENTORY_CAP};
use crate::core::{GameError, Result};
use crate::enhancement::check_discard;
use crate::items::rows::column_index;
use crate::items::{Equipment, EquipmentSlot};
use crate::rewards::{GearDrop, VictoryRewards};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::{debug, error, warn};

const PASSIVE_COLUMNS: [&str; 3] = ["passive", "pinnacle_passive", "utmost_passive"];
const STAT_COLUMNS: [&str; 9] = ["attack", "defence", "rarity", "block", "evasion", "ward", "pdr", "fdr", "crit"];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryStore {
    users: BTreeMap<u64, Row>,
    /// Table name to item id to row.
    equipment: BTreeMap<String, BTreeMap<u64, Row>>,
    skills: BTreeMap<u64, SkillData>,
    companions: BTreeMap<u64, Companion>,
    next_item_id: u64,
    next_companion_id: u64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `f` against the store, restoring every table if it fails.
    pub fn transaction<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        let checkpoint = self.clone();
        match f(self) {
            Ok(value) => Ok(value),
            Err(e) => {
                if matches!(e, GameError::Invariant(_)) {
                    error!(error = %e, "invariant violated, rolling back");
                } else {
                    warn!(error = %e, "transaction rolled back");
                }
                *self = checkpoint;
                Err(e)
            }
        }
    }

    /// Persists a won fight in one transaction: the player row, every
    /// companion captured since the last load (id 0) and the dropped item.
    ///
    /// New ids are written back into `player` and `rewards` only after the
    /// commit succeeds. An item whose slot filled up since the roll is
    /// forfeited, matching the drop rule.
    pub fn commit_victory(&mut self, player: &mut Player, rewards: &mut VictoryRewards) -> Result<()> {
        let mut committed = player.clone();
        let mut gear = rewards.gear.clone();
        self.transaction(|store| {
            store.update_from_player_object(&committed)?;
            for companion in committed.companions.iter_mut().filter(|c| c.id == 0) {
                companion.id = store.add_companion(companion.clone())?;
            }
            let mut forfeited = false;
            if let Some(GearDrop::Item(item)) = gear.as_mut() {
                match store.create(item.clone()) {
                    Ok(id) => item.set_id(id),
                    Err(GameError::InventoryFull(slot)) => {
                        warn!(user = committed.user_id, slot = slot.name(), "gear drop forfeited, slot full");
                        forfeited = true;
                    }
                    Err(e) => return Err(e),
                }
            }
            if forfeited {
                gear = None;
            }
            Ok(())
        })?;

        if let (Some(pet), Some(saved)) = (rewards.companion.as_mut(), committed.companions.last()) {
            pet.id = saved.id;
        }
        rewards.gear = gear;
        debug!(user = committed.user_id, companions = committed.companions.len(), "victory committed");
        *player = committed;
        Ok(())
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    fn user_row(&self, user_id: u64) -> Result<&Row> {
        self.users.get(&user_id).ok_or(GameError::NotRegistered(user_id))
    }

    fn load_user(&self, user_id: u64) -> Result<Player> {
        user_from_row(self.user_row(user_id)?)
    }

    fn store_user(&mut self, player: &Player) -> Result<()> {
        let row = user_to_row(player)?;
        self.users.insert(player.user_id, row);
        Ok(())
    }

    fn item_exists(&self, slot: EquipmentSlot, item_id: u64) -> bool {
        self.equipment
            .get(slot.table_name())
            .is_some_and(|t| t.contains_key(&item_id))
    }

    fn put_item(&mut self, item: &Equipment) {
        self.equipment
            .entry(item.slot().table_name().to_string())
            .or_default()
            .insert(item.id(), item.to_row());
    }

    fn decode_table(&self, slot: EquipmentSlot) -> Result<Vec<Equipment>> {
        self.equipment
            .get(slot.table_name())
            .into_iter()
            .flat_map(|t| t.values())
            .map(|row| Equipment::from_row(slot, row))
            .collect()
    }

    /// Rewrites one column, keeping the row only if it still decodes.
    fn write_column(
        &mut self,
        slot: EquipmentSlot,
        item_id: u64,
        column: &str,
        update: impl FnOnce(&Value) -> Result<Value>,
    ) -> Result<()> {
        let idx = column_index(slot, column).ok_or_else(|| {
            GameError::InvalidTarget(format!("{} has no column {column}", slot.table_name()))
        })?;
        let row = self
            .equipment
            .get_mut(slot.table_name())
            .and_then(|t| t.get_mut(&item_id))
            .ok_or(GameError::ItemNotFound(item_id))?;
        let mut updated = row.clone();
        let value = update(&updated[idx])?;
        updated[idx] = value;
        Equipment::from_row(slot, &updated)?;
        *row = updated;
        Ok(())
    }

    fn owned_companion(&self, user_id: u64, companion_id: u64) -> Result<&Companion> {
        let companion = self
            .companions
            .get(&companion_id)
            .ok_or_else(|| GameError::InvalidTarget(format!("companion {companion_id}")))?;
        if companion.user_id != user_id {
            return Err(GameError::NotOwned(companion_id));
        }
        Ok(companion)
    }
}

impl UserRepository for MemoryStore {
    fn get(&self, user_id: u64) -> Result<Player> {
        let mut player = self.load_user(user_id)?;
        for slot in EquipmentSlot::ALL {
            if let Some(item) = self.get_equipped(user_id, slot)? {
                player.loadout.equip(item);
            }
        }
        player.companions = CompanionRepository::get_all(self, user_id)?;
        Ok(player)
    }

    fn register(&mut self, player: &Player) -> Result<()> {
        if self.users.contains_key(&player.user_id) {
            return Err(GameError::InvalidAction(format!(
                "user {} is already registered",
                player.user_id
            )));
        }
        let mut record = player.clone();
        if record.id == 0 {
            record.id = self.users.len() as u64 + 1;
        }
        self.store_user(&record)?;
        self.skills
            .entry(player.user_id)
            .or_insert_with(|| SkillData::new(player.user_id));
        debug!(user = player.user_id, "registered");
        Ok(())
    }

    fn modify_gold(&mut self, user_id: u64, delta: i64) -> Result<u64> {
        let have = self.load_user(user_id)?.wallet.gold;
        let balance = have.checked_add_signed(delta).ok_or(GameError::InsufficientGold {
            needed: delta.unsigned_abs(),
            have,
        })?;
        if let Some(row) = self.users.get_mut(&user_id) {
            row[IDX_GOLD] = Value::from(balance);
        }
        Ok(balance)
    }

    fn modify_stat(&mut self, user_id: u64, stat: Stat, delta: i64) -> Result<()> {
        let mut player = self.load_user(user_id)?;
        player.modify_stat(stat, delta);
        self.store_user(&player)
    }

    fn modify_currency(&mut self, user_id: u64, currency: Currency, delta: i64) -> Result<u64> {
        let mut player = self.load_user(user_id)?;
        let have = player.wallet.get(currency);
        let balance = have.checked_add_signed(delta).ok_or_else(|| {
            GameError::InsufficientCurrency(format!(
                "{} (need {}, have {})",
                currency.column(),
                delta.unsigned_abs(),
                have
            ))
        })?;
        player.wallet.set(currency, balance);
        self.store_user(&player)?;
        Ok(balance)
    }

    /// Also writes back any equipped item the loadout carries.
    fn update_from_player_object(&mut self, player: &Player) -> Result<()> {
        self.user_row(player.user_id)?;
        self.store_user(player)?;
        for slot in EquipmentSlot::ALL {
            if let Some(item) = player.loadout.get(slot) {
                if self.item_exists(slot, item.id()) {
                    self.put_item(&item);
                }
            }
        }
        Ok(())
    }
}

impl EquipmentRepository for MemoryStore {
    fn get_item(&self, slot: EquipmentSlot, item_id: u64) -> Result<Equipment> {
        let row = self
            .equipment
            .get(slot.table_name())
            .and_then(|t| t.get(&item_id))
            .ok_or(GameError::ItemNotFound(item_id))?;
        Equipment::from_row(slot, row)
    }

    fn get_all(&self, user_id: u64, slot: EquipmentSlot) -> Result<Vec<Equipment>> {
        Ok(self
            .decode_table(slot)?
            .into_iter()
            .filter(|item| item.user_id() == user_id)
            .collect())
    }

    fn get_equipped(&self, user_id: u64, slot: EquipmentSlot) -> Result<Option<Equipment>> {
        Ok(EquipmentRepository::get_all(self, user_id, slot)?
            .into_iter()
            .find(|item| item.is_equipped()))
    }

    fn equip(&mut self, user_id: u64, slot: EquipmentSlot, item_id: u64) -> Result<()> {
        let mut item = self.get_item(slot, item_id)?;
        if item.user_id() != user_id {
            return Err(GameError::NotOwned(item_id));
        }
        if let Some(mut previous) = self.get_equipped(user_id, slot)? {
            previous.set_equipped(false);
            self.put_item(&previous);
        }
        item.set_equipped(true);
        self.put_item(&item);
        debug!(user = user_id, slot = slot.name(), item = item_id, "equipped");
        Ok(())
    }

    fn unequip(&mut self, user_id: u64, slot: EquipmentSlot) -> Result<()> {
        let mut item = self
            .get_equipped(user_id, slot)?
            .ok_or_else(|| GameError::InvalidAction(format!("no {} equipped", slot.name())))?;
        item.set_equipped(false);
        self.put_item(&item);
        Ok(())
    }

    fn create(&mut self, mut item: Equipment) -> Result<u64> {
        let slot = item.slot();
        self.user_row(item.user_id())?;
        if self.count(item.user_id(), slot)? >= SLOT_INVENTORY_CAP {
            return Err(GameError::InventoryFull(slot));
        }
        self.next_item_id += 1;
        item.set_id(self.next_item_id);
        item.set_equipped(false);
        self.put_item(&item);
        Ok(self.next_item_id)
    }

    fn discard(&mut self, user_id: u64, slot: EquipmentSlot, item_id: u64) -> Result<()> {
        let item = self.get_item(slot, item_id)?;
        check_discard(&item, user_id)?;
        if let Some(table) = self.equipment.get_mut(slot.table_name()) {
            table.remove(&item_id);
        }
        debug!(user = user_id, slot = slot.name(), item = item_id, "discarded");
        Ok(())
    }

    fn update_counter(&mut self, slot: EquipmentSlot, item_id: u64, column: &str, value: u32) -> Result<()> {
        if !(column.ends_with("_remaining") || column == "refinement_lvl" || column == "passive_lvl") {
            return Err(GameError::InvalidTarget(format!("{column} is not a counter")));
        }
        self.write_column(slot, item_id, column, |_| Ok(Value::from(value)))
    }

    fn update_passive(&mut self, slot: EquipmentSlot, item_id: u64, column: &str, passive: &str) -> Result<()> {
        if !PASSIVE_COLUMNS.contains(&column) {
            return Err(GameError::InvalidTarget(format!("{column} is not a passive column")));
        }
        self.write_column(slot, item_id, column, |_| Ok(Value::from(passive)))
            .map_err(|e| match e {
                GameError::MalformedRow(_) => {
                    GameError::InvalidTarget(format!("{passive} is not a {} passive", slot.name()))
                }
                other => other,
            })
    }

    fn increase_stat(&mut self, slot: EquipmentSlot, item_id: u64, column: &str, amount: u32) -> Result<()> {
        if !STAT_COLUMNS.contains(&column) {
            return Err(GameError::InvalidTarget(format!("{column} is not a stat column")));
        }
        self.write_column(slot, item_id, column, |current| {
            let base = current.as_u64().unwrap_or(0);
            Ok(Value::from(base + u64::from(amount)))
        })
    }

    fn save_item(&mut self, item: &Equipment) -> Result<()> {
        if !self.item_exists(item.slot(), item.id()) {
            return Err(GameError::ItemNotFound(item.id()));
        }
        self.put_item(item);
        Ok(())
    }

    fn transfer(&mut self, slot: EquipmentSlot, item_id: u64, receiver_id: u64) -> Result<()> {
        let mut item = self.get_item(slot, item_id)?;
        if item.is_equipped() {
            return Err(GameError::ItemEquipped(item_id));
        }
        self.user_row(receiver_id)?;
        if self.count(receiver_id, slot)? >= SLOT_INVENTORY_CAP {
            return Err(GameError::InventoryFull(slot));
        }
        let sender = item.user_id();
        item.set_user_id(receiver_id);
        self.put_item(&item);
        debug!(from = sender, to = receiver_id, item = item_id, "item transferred");
        Ok(())
    }

    fn count(&self, user_id: u64, slot: EquipmentSlot) -> Result<usize> {
        Ok(EquipmentRepository::get_all(self, user_id, slot)?.len())
    }
}

impl SkillRepository for MemoryStore {
    fn get_data(&self, user_id: u64) -> Result<SkillData> {
        self.user_row(user_id)?;
        Ok(self
            .skills
            .get(&user_id)
            .cloned()
            .unwrap_or_else(|| SkillData::new(user_id)))
    }

    fn update_batch(&mut self, user_id: u64, skill: Skill, deltas: [i64; 5]) -> Result<()> {
        self.user_row(user_id)?;
        let data = self
            .skills
            .entry(user_id)
            .or_insert_with(|| SkillData::new(user_id));
        let ledger = data.ledger_mut(skill);
        let mut updated = ledger.quantities;
        for (idx, delta) in deltas.iter().enumerate() {
            let have = updated[idx];
            updated[idx] = have.checked_add_signed(*delta).ok_or_else(|| {
                GameError::InsufficientMaterials {
                    resource: skill.resources()[idx].to_string(),
                    needed: delta.unsigned_abs(),
                    have,
                }
            })?;
        }
        ledger.quantities = updated;
        Ok(())
    }

    fn update_single_resource(&mut self, user_id: u64, skill: Skill, resource: &str, delta: i64) -> Result<()> {
        let idx = skill.resource_index(resource).ok_or_else(|| {
            GameError::InvalidTarget(format!("{resource} is not a {} resource", skill.table_name()))
        })?;
        let mut deltas = [0; 5];
        deltas[idx] = delta;
        self.update_batch(user_id, skill, deltas)
    }
}

impl CompanionRepository for MemoryStore {
    fn add_companion(&mut self, mut companion: Companion) -> Result<u64> {
        self.user_row(companion.user_id)?;
        if CompanionRepository::get_all(self, companion.user_id)?.len() >= MAX_COMPANION_ROSTER {
            return Err(GameError::Ineligible("companion roster is full".into()));
        }
        self.next_companion_id += 1;
        companion.id = self.next_companion_id;
        self.companions.insert(companion.id, companion);
        Ok(self.next_companion_id)
    }

    fn get_all(&self, user_id: u64) -> Result<Vec<Companion>> {
        Ok(self
            .companions
            .values()
            .filter(|c| c.user_id == user_id)
            .cloned()
            .collect())
    }

    fn get_active(&self, user_id: u64) -> Result<Vec<Companion>> {
        Ok(CompanionRepository::get_all(self, user_id)?
            .into_iter()
            .filter(|c| c.is_active)
            .collect())
    }

    fn set_active(&mut self, user_id: u64, companion_id: u64, active: bool) -> Result<()> {
        let already = self.owned_companion(user_id, companion_id)?.is_active;
        if active && !already && self.get_active(user_id)?.len() >= MAX_ACTIVE_COMPANIONS {
            return Err(GameError::Ineligible(format!(
                "at most {MAX_ACTIVE_COMPANIONS} companions can be active"
            )));
        }
        if let Some(companion) = self.companions.get_mut(&companion_id) {
            companion.is_active = active;
        }
        Ok(())
    }

    /// Charges the fuse cost, removes both parents and inserts the result,
    /// all in one transaction.
    fn fuse_companions(
        &mut self,
        user_id: u64,
        first_id: u64,
        second_id: u64,
        rng: &mut dyn rand::RngCore,
    ) -> Result<Companion> {
        if first_id == second_id {
            return Err(GameError::InvalidTarget("cannot fuse a companion with itself".into()));
        }
        let first = self.owned_companion(user_id, first_id)?.clone();
        let second = self.owned_companion(user_id, second_id)?.clone();

        self.transaction(move |store| {
            let mut rng = rng;
            store.modify_gold(user_id, -(FUSE_GOLD_COST as i64))?;
            store.companions.remove(&first_id);
            store.companions.remove(&second_id);
            let mut fused = fuse(&first, &second, &mut rng);
            fused.id = store.add_companion(fused.clone())?;
            debug!(user = user_id, first = first_id, second = second_id, fused = fused.id, "companions fused");
            Ok(fused)
        })
    }
}
