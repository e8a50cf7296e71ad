//! Ownership rules for discarding, sending and equipping records.

use crate::character::Player;
use crate::core::constants::{SEND_LEVEL_WINDOW, SLOT_INVENTORY_CAP};
use crate::core::{GameError, Result};
use crate::items::{Equipment, EquipmentSlot};
use tracing::info;

pub fn check_owned(item: &Equipment, user_id: u64) -> Result<()> {
    if item.user_id() != user_id {
        return Err(GameError::NotOwned(item.id()));
    }
    Ok(())
}

/// Fails when a user already holds the slot's maximum.
pub fn check_capacity(slot: EquipmentSlot, held: usize) -> Result<()> {
    if held >= SLOT_INVENTORY_CAP {
        return Err(GameError::InventoryFull(slot));
    }
    Ok(())
}

pub fn check_discard(item: &Equipment, user_id: u64) -> Result<()> {
    check_owned(item, user_id)?;
    if item.is_equipped() {
        return Err(GameError::ItemEquipped(item.id()));
    }
    Ok(())
}

/// `receiver` is None when the target user is not registered.
pub fn check_send(
    item: &Equipment,
    sender_id: u64,
    receiver: Option<&Player>,
    receiver_held: usize,
) -> Result<()> {
    check_discard(item, sender_id)?;
    let receiver = receiver.ok_or_else(|| GameError::InvalidTarget("receiver is not registered".to_string()))?;
    if receiver.user_id == sender_id {
        return Err(GameError::InvalidTarget("cannot send to yourself".to_string()));
    }
    check_capacity(item.slot(), receiver_held)?;
    let gap = item.level().abs_diff(receiver.level);
    if gap > SEND_LEVEL_WINDOW {
        return Err(GameError::Ineligible(format!(
            "item level {} is more than {SEND_LEVEL_WINDOW} levels from the receiver's {}",
            item.level(),
            receiver.level
        )));
    }
    Ok(())
}

/// Equips `item`, returning the item it displaced from the same slot.
pub fn equip(player: &mut Player, item: Equipment) -> Result<Option<Equipment>> {
    check_owned(&item, player.user_id)?;
    let id = item.id();
    let previous = player.loadout.equip(item);
    info!(user = player.user_id, item = id, replaced = ?previous.as_ref().map(Equipment::id), "equip");
    Ok(previous)
}

pub fn unequip(player: &mut Player, slot: EquipmentSlot) -> Result<Equipment> {
    player
        .loadout
        .take(slot)
        .ok_or_else(|| GameError::InvalidTarget(format!("nothing equipped in {}", slot.name())))
}
