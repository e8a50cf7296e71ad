//! Post-victory loot rolls.

use crate::character::{Companion, CompanionPassive, Currency, Player};
use crate::core::constants::*;
use crate::core::rng::chance;
use crate::items::{generate_equipment, roll_gear_slot, Equipment, EquipmentSlot};
use crate::monsters::{BossEncounter, Monster};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Currencies a kill above the level gate can drop, with their base chance.
const SPECIAL_DROPS: [(Currency, f64); 6] = [
    (Currency::DragonKey, 0.03),
    (Currency::AngelKey, 0.03),
    (Currency::SoulCores, 0.08),
    (Currency::VoidFrags, 0.05),
    (Currency::ShatterRunes, 0.01),
    (Currency::BalanceFragment, 0.05),
];

const ELEMENTAL_DROPS: [Currency; 3] = [Currency::MagmaCore, Currency::LifeRoot, Currency::SpiritShard];

/// Item drop chance in percent for the player's total rarity.
pub fn calculate_item_drop_chance(rarity: u32) -> f64 {
    let r = f64::from(rarity);
    ITEM_DROP_BASE_PERCENT + ITEM_DROP_RARITY_PERCENT * r / (r + 100.0)
}

/// Keys, cores, fragments and runes from a regular kill.
///
/// `thrill_seeker` is the boot passive level and adds a point per level to
/// every chance.
pub fn roll_special_drops(
    monster: &Monster,
    thrill_seeker: u32,
    rng: &mut impl Rng,
) -> Vec<(Currency, u64)> {
    let mut drops = Vec::new();
    if monster.is_treasure {
        drops.push((Currency::Curios, 1));
    }
    if monster.level <= SPECIAL_DROP_LEVEL_GATE {
        return drops;
    }
    let mut bonus = 0.01 * f64::from(thrill_seeker);
    if monster.is_treasure {
        bonus += TREASURE_DROP_BONUS;
    }
    for (currency, base) in SPECIAL_DROPS {
        if chance(rng, base + bonus) {
            drops.push((currency, 1));
        }
    }
    drops
}

pub fn roll_boss_drops(encounter: BossEncounter, rng: &mut impl Rng) -> Vec<(Currency, u64)> {
    let table = encounter.drop_table();
    let mut drops: Vec<(Currency, u64)> = table.guaranteed.iter().map(|c| (*c, 1)).collect();
    for (currency, p) in table.chances {
        if chance(rng, *p) {
            drops.push((*currency, 1));
        }
    }
    drops
}

/// Magma core, life root and spirit shard from fire-type kills.
pub fn roll_elemental_drops(monster: &Monster, rng: &mut impl Rng) -> Vec<(Currency, u64)> {
    if !monster.is_fire_type() {
        return Vec::new();
    }
    ELEMENTAL_DROPS
        .into_iter()
        .filter(|_| chance(rng, ELEMENTAL_DROP_CHANCE))
        .map(|c| (c, 1))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GearDrop {
    Item(Equipment),
    /// The drop turned into the slot's rune.
    Rune(Currency),
}

fn slot_rune(slot: EquipmentSlot) -> Option<Currency> {
    match slot {
        EquipmentSlot::Weapon => Some(Currency::RefinementRunes),
        EquipmentSlot::Accessory => Some(Currency::PotentialRunes),
        EquipmentSlot::Armor => Some(Currency::ImbueRunes),
        _ => None,
    }
}

/// Rolls for a gear drop at the monster's level.
///
/// `held` reports how many items the player already owns in a slot; a full
/// slot forfeits the drop.
pub fn roll_gear_drop(
    player: &Player,
    monster: &Monster,
    held: impl Fn(EquipmentSlot) -> usize,
    rng: &mut impl Rng,
) -> Option<GearDrop> {
    let rarity = player.total_rarity();
    if monster.is_treasure && rarity == 0 {
        return None;
    }
    if !chance(rng, calculate_item_drop_chance(rarity) / 100.0) {
        return None;
    }
    let slot = roll_gear_slot(rng);
    if let Some(rune) = slot_rune(slot) {
        if chance(rng, RUNE_INSTEAD_OF_GEAR_CHANCE) {
            return Some(GearDrop::Rune(rune));
        }
    }
    if held(slot) >= SLOT_INVENTORY_CAP {
        debug!(user = player.user_id, slot = slot.name(), "gear drop forfeited, slot full");
        return None;
    }
    Some(GearDrop::Item(generate_equipment(
        slot,
        player.user_id,
        monster.level,
        rng,
    )))
}

/// Non-boss capture tier: 70% tier 1, 25% tier 2, 5% tier 3.
fn roll_capture_tier(rng: &mut impl Rng) -> u8 {
    let roll = rng.gen::<f64>();
    if roll < 0.70 {
        1
    } else if roll < 0.95 {
        2
    } else {
        3
    }
}

/// Attempts to tame the defeated monster as a companion.
pub fn roll_pet_capture(player: &Player, monster: &Monster, rng: &mut impl Rng) -> Option<Companion> {
    if player.companions.len() >= MAX_COMPANION_ROSTER || monster.is_treasure {
        return None;
    }
    let (p, tier) = if monster.is_boss {
        (BOSS_PET_CAPTURE_CHANCE, 3)
    } else {
        (PET_CAPTURE_CHANCE, 0)
    };
    if !chance(rng, p) {
        return None;
    }
    let tier = if tier == 0 { roll_capture_tier(rng) } else { tier };
    Some(Companion::new(
        player.user_id,
        monster.name.clone(),
        monster.species.clone(),
        monster.image.clone(),
        CompanionPassive::random(rng),
        tier,
    ))
}
