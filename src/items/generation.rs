//! Loot generators, one per equipment slot.
//!
//! Generated records carry id 0; the store assigns the real id on insert.

use super::types::{
    level_tier, Accessory, Armor, Boot, Equipment, EquipmentSlot, Glove, Helmet, Weapon,
};
use crate::core::constants::GEAR_SLOT_WEIGHTS;
use crate::core::rng::randint;
use rand::seq::SliceRandom;
use rand::Rng;

const TIER_PREFIXES: [&[&str]; 3] = [
    &["Rusty", "Worn", "Crude", "Plain", "Tarnished"],
    &["Tempered", "Gleaming", "Runed", "Balanced", "Stalwart"],
    &["Mythic", "Astral", "Abyssal", "Radiant", "Eternal"],
];

fn base_names(slot: EquipmentSlot) -> &'static [&'static str] {
    match slot {
        EquipmentSlot::Weapon => &["Sword", "Axe", "Spear", "Mace", "Dagger", "Bow", "Staff"],
        EquipmentSlot::Armor => &["Plate", "Hauberk", "Brigandine", "Robe", "Cuirass"],
        EquipmentSlot::Accessory => &["Ring", "Amulet", "Charm", "Talisman", "Brooch"],
        EquipmentSlot::Glove => &["Gauntlets", "Grips", "Bracers", "Handwraps"],
        EquipmentSlot::Boot => &["Greaves", "Sabatons", "Treads", "Striders"],
        EquipmentSlot::Helmet => &["Helm", "Visor", "Crown", "Hood", "Coif"],
    }
}

/// Display name for a fresh drop, e.g. "Runed Spear".
pub fn generate_name(slot: EquipmentSlot, level: u32, rng: &mut impl Rng) -> String {
    let prefix = TIER_PREFIXES[level_tier(level)]
        .choose(rng)
        .copied()
        .unwrap_or("Plain");
    let base = base_names(slot).choose(rng).copied().unwrap_or(slot.name());
    format!("{prefix} {base}")
}

fn roll(rng: &mut impl Rng, lo: u32, hi: u32) -> u32 {
    randint(rng, lo as u64, hi as u64) as u32
}

/// Picks a slot by the gear drop weights (weapon, accessory, armor, glove, boot, helmet).
pub fn roll_gear_slot(rng: &mut impl Rng) -> EquipmentSlot {
    const ORDER: [EquipmentSlot; 6] = [
        EquipmentSlot::Weapon,
        EquipmentSlot::Accessory,
        EquipmentSlot::Armor,
        EquipmentSlot::Glove,
        EquipmentSlot::Boot,
        EquipmentSlot::Helmet,
    ];
    let total: u32 = GEAR_SLOT_WEIGHTS.iter().sum();
    let mut pick = rng.gen_range(0..total);
    for (slot, weight) in ORDER.iter().zip(GEAR_SLOT_WEIGHTS) {
        if pick < weight {
            return *slot;
        }
        pick -= weight;
    }
    EquipmentSlot::Weapon
}

pub fn generate_weapon(user_id: u64, level: u32, rng: &mut impl Rng) -> Weapon {
    let name = generate_name(EquipmentSlot::Weapon, level, rng);
    let attack = roll(rng, level / 2 + 1, level + 3);
    let defence = roll(rng, 0, level / 3 + 1);
    let rarity = roll(rng, 0, level / 5 + 1);
    Weapon::new(user_id, name, level, attack, defence, rarity)
}

/// Armor rolls exactly one of block, evasion or ward, plus mitigation.
pub fn generate_armor(user_id: u64, level: u32, rng: &mut impl Rng) -> Armor {
    let name = generate_name(EquipmentSlot::Armor, level, rng);
    let mut armor = Armor::new(user_id, name, level);
    match rng.gen_range(0..3) {
        0 => armor.block = roll(rng, 1, level / 20 + 3),
        1 => armor.evasion = roll(rng, 1, level / 20 + 3),
        _ => armor.ward = roll(rng, level / 10 + 1, level / 5 + 5),
    }
    armor.pdr = roll(rng, 0, level / 10 + 2);
    armor.fdr = roll(rng, 0, level / 20 + 1);
    armor
}

/// Accessories roll a single primary stat.
pub fn generate_accessory(user_id: u64, level: u32, rng: &mut impl Rng) -> Accessory {
    let name = generate_name(EquipmentSlot::Accessory, level, rng);
    let mut accessory = Accessory::new(user_id, name, level);
    match rng.gen_range(0..5) {
        0 => accessory.attack = roll(rng, level / 5 + 1, level / 3 + 2),
        1 => accessory.defence = roll(rng, level / 5 + 1, level / 3 + 2),
        2 => accessory.rarity = roll(rng, level / 10 + 1, level / 5 + 3),
        3 => accessory.ward = roll(rng, level / 20 + 1, level / 10 + 2),
        _ => accessory.crit = roll(rng, 1, level / 25 + 3),
    }
    accessory
}

pub fn generate_glove(user_id: u64, level: u32, rng: &mut impl Rng) -> Glove {
    let name = generate_name(EquipmentSlot::Glove, level, rng);
    let mut glove = Glove::new(user_id, name, level);
    glove.attack = roll(rng, 0, level / 6 + 1);
    glove.defence = roll(rng, 0, level / 6 + 1);
    match rng.gen_range(0..3) {
        0 => glove.ward = roll(rng, 1, level / 10 + 2),
        1 => glove.pdr = roll(rng, 1, level / 20 + 2),
        _ => glove.fdr = roll(rng, 1, level / 25 + 1),
    }
    glove
}

pub fn generate_boot(user_id: u64, level: u32, rng: &mut impl Rng) -> Boot {
    let name = generate_name(EquipmentSlot::Boot, level, rng);
    let mut boot = Boot::new(user_id, name, level);
    boot.attack = roll(rng, 0, level / 6 + 1);
    boot.defence = roll(rng, 0, level / 6 + 1);
    match rng.gen_range(0..3) {
        0 => boot.ward = roll(rng, 1, level / 10 + 2),
        1 => boot.pdr = roll(rng, 1, level / 20 + 2),
        _ => boot.fdr = roll(rng, 1, level / 25 + 1),
    }
    boot
}

pub fn generate_helmet(user_id: u64, level: u32, rng: &mut impl Rng) -> Helmet {
    let name = generate_name(EquipmentSlot::Helmet, level, rng);
    let mut helmet = Helmet::new(user_id, name, level);
    helmet.defence = roll(rng, level / 5 + 1, level / 3 + 2);
    match rng.gen_range(0..3) {
        0 => helmet.ward = roll(rng, 1, level / 10 + 2),
        1 => helmet.pdr = roll(rng, 1, level / 20 + 2),
        _ => helmet.fdr = roll(rng, 1, level / 25 + 1),
    }
    helmet
}

/// Generates a fresh record for `slot` at item level `level`.
pub fn generate_equipment(
    slot: EquipmentSlot,
    user_id: u64,
    level: u32,
    rng: &mut impl Rng,
) -> Equipment {
    let level = level.max(1);
    match slot {
        EquipmentSlot::Weapon => Equipment::Weapon(generate_weapon(user_id, level, rng)),
        EquipmentSlot::Armor => Equipment::Armor(generate_armor(user_id, level, rng)),
        EquipmentSlot::Accessory => Equipment::Accessory(generate_accessory(user_id, level, rng)),
        EquipmentSlot::Glove => Equipment::Glove(generate_glove(user_id, level, rng)),
        EquipmentSlot::Boot => Equipment::Boot(generate_boot(user_id, level, rng)),
        EquipmentSlot::Helmet => Equipment::Helmet(generate_helmet(user_id, level, rng)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_generated_items_belong_to_user_and_level() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        for slot in EquipmentSlot::ALL {
            let item = generate_equipment(slot, 9, 35, &mut rng);
            assert_eq!(item.slot(), slot);
            assert_eq!(item.user_id(), 9);
            assert_eq!(item.level(), 35);
            assert_eq!(item.id(), 0);
            assert!(!item.is_equipped());
            assert!(!item.name().is_empty());
        }
    }

    #[test]
    fn test_weapon_counters_follow_level_tier() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        assert_eq!(generate_weapon(1, 20, &mut rng).forges_remaining, 3);
        assert_eq!(generate_weapon(1, 60, &mut rng).forges_remaining, 4);
        assert_eq!(generate_weapon(1, 90, &mut rng).refines_remaining, 5);
    }

    #[test]
    fn test_armor_has_single_primary_stat() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        for _ in 0..50 {
            let armor = generate_armor(1, 50, &mut rng);
            let primaries = [armor.block, armor.evasion, armor.ward]
                .iter()
                .filter(|v| **v > 0)
                .count();
            assert_eq!(primaries, 1);
            assert!(armor.passive.is_none());
            assert_eq!(armor.imbue_remaining, 1);
        }
    }

    #[test]
    fn test_slot_weights_favour_weapons() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut weapons = 0;
        let mut helmets = 0;
        for _ in 0..2000 {
            match roll_gear_slot(&mut rng) {
                EquipmentSlot::Weapon => weapons += 1,
                EquipmentSlot::Helmet => helmets += 1,
                _ => {}
            }
        }
        assert!(weapons > helmets * 2, "weapons {weapons} helmets {helmets}");
    }

    #[test]
    fn test_level_zero_is_clamped() {
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let item = generate_equipment(EquipmentSlot::Helmet, 1, 0, &mut rng);
        assert_eq!(item.level(), 1);
    }
}
