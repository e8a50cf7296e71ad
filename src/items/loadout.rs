use super::passives::{
    AccessoryPassive, ArmorPassive, BootPassive, GlovePassive, HelmetPassive, WeaponLine,
};
use super::types::{Accessory, Armor, Boot, Equipment, EquipmentSlot, Glove, Helmet, Weapon};
use serde::{Deserialize, Serialize};

/// The items a player currently has equipped, at most one per slot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Loadout {
    pub weapon: Option<Weapon>,
    pub armor: Option<Armor>,
    pub accessory: Option<Accessory>,
    pub glove: Option<Glove>,
    pub boot: Option<Boot>,
    pub helmet: Option<Helmet>,
}

impl Loadout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Places `item` in its slot, returning whatever was there before.
    pub fn equip(&mut self, item: Equipment) -> Option<Equipment> {
        let previous = self.take(item.slot());
        match item {
            Equipment::Weapon(mut w) => {
                w.is_equipped = true;
                self.weapon = Some(w);
            }
            Equipment::Armor(mut a) => {
                a.is_equipped = true;
                self.armor = Some(a);
            }
            Equipment::Accessory(mut a) => {
                a.is_equipped = true;
                self.accessory = Some(a);
            }
            Equipment::Glove(mut g) => {
                g.is_equipped = true;
                self.glove = Some(g);
            }
            Equipment::Boot(mut b) => {
                b.is_equipped = true;
                self.boot = Some(b);
            }
            Equipment::Helmet(mut h) => {
                h.is_equipped = true;
                self.helmet = Some(h);
            }
        }
        previous
    }

    /// Removes and returns the item in `slot`, marked unequipped.
    pub fn take(&mut self, slot: EquipmentSlot) -> Option<Equipment> {
        let mut item = match slot {
            EquipmentSlot::Weapon => self.weapon.take().map(Equipment::Weapon),
            EquipmentSlot::Armor => self.armor.take().map(Equipment::Armor),
            EquipmentSlot::Accessory => self.accessory.take().map(Equipment::Accessory),
            EquipmentSlot::Glove => self.glove.take().map(Equipment::Glove),
            EquipmentSlot::Boot => self.boot.take().map(Equipment::Boot),
            EquipmentSlot::Helmet => self.helmet.take().map(Equipment::Helmet),
        }?;
        item.set_equipped(false);
        Some(item)
    }

    pub fn get(&self, slot: EquipmentSlot) -> Option<Equipment> {
        match slot {
            EquipmentSlot::Weapon => self.weapon.clone().map(Equipment::Weapon),
            EquipmentSlot::Armor => self.armor.clone().map(Equipment::Armor),
            EquipmentSlot::Accessory => self.accessory.clone().map(Equipment::Accessory),
            EquipmentSlot::Glove => self.glove.clone().map(Equipment::Glove),
            EquipmentSlot::Boot => self.boot.clone().map(Equipment::Boot),
            EquipmentSlot::Helmet => self.helmet.clone().map(Equipment::Helmet),
        }
    }

    pub fn equipped_ids(&self) -> Vec<u64> {
        EquipmentSlot::ALL
            .iter()
            .filter_map(|slot| self.get(*slot).map(|i| i.id()))
            .collect()
    }

    pub fn gear_attack(&self) -> u32 {
        self.weapon.as_ref().map_or(0, |w| w.attack)
            + self.accessory.as_ref().map_or(0, |a| a.attack)
            + self.glove.as_ref().map_or(0, |g| g.attack)
            + self.boot.as_ref().map_or(0, |b| b.attack)
    }

    pub fn gear_defence(&self) -> u32 {
        self.weapon.as_ref().map_or(0, |w| w.defence)
            + self.accessory.as_ref().map_or(0, |a| a.defence)
            + self.glove.as_ref().map_or(0, |g| g.defence)
            + self.boot.as_ref().map_or(0, |b| b.defence)
            + self.helmet.as_ref().map_or(0, |h| h.defence)
    }

    pub fn gear_rarity(&self) -> u32 {
        self.weapon.as_ref().map_or(0, |w| w.rarity) + self.accessory.as_ref().map_or(0, |a| a.rarity)
    }

    /// Total ward percentage across armor, accessory, glove, boot and helmet.
    pub fn ward_percent(&self) -> u32 {
        self.armor.as_ref().map_or(0, |a| a.ward)
            + self.accessory.as_ref().map_or(0, |a| a.ward)
            + self.glove.as_ref().map_or(0, |g| g.ward)
            + self.boot.as_ref().map_or(0, |b| b.ward)
            + self.helmet.as_ref().map_or(0, |h| h.ward)
    }

    pub fn pdr(&self) -> u32 {
        self.armor.as_ref().map_or(0, |a| a.pdr)
            + self.glove.as_ref().map_or(0, |g| g.pdr)
            + self.boot.as_ref().map_or(0, |b| b.pdr)
            + self.helmet.as_ref().map_or(0, |h| h.pdr)
    }

    pub fn fdr(&self) -> u32 {
        self.armor.as_ref().map_or(0, |a| a.fdr)
            + self.glove.as_ref().map_or(0, |g| g.fdr)
            + self.boot.as_ref().map_or(0, |b| b.fdr)
            + self.helmet.as_ref().map_or(0, |h| h.fdr)
    }

    pub fn block(&self) -> u32 {
        self.armor.as_ref().map_or(0, |a| a.block)
    }

    pub fn evasion(&self) -> u32 {
        self.armor.as_ref().map_or(0, |a| a.evasion)
    }

    pub fn accessory_crit(&self) -> u32 {
        self.accessory.as_ref().map_or(0, |a| a.crit)
    }

    pub fn weapon_tier(&self, line: WeaponLine) -> Option<u8> {
        self.weapon.as_ref().and_then(|w| w.line_tier(line))
    }

    pub fn armor_has(&self, passive: ArmorPassive) -> bool {
        self.armor.as_ref().is_some_and(|a| a.passive == Some(passive))
    }

    pub fn accessory_level(&self, passive: AccessoryPassive) -> u32 {
        match &self.accessory {
            Some(a) if a.passive == Some(passive) => a.passive_lvl,
            _ => 0,
        }
    }

    pub fn glove_level(&self, passive: GlovePassive) -> u32 {
        match &self.glove {
            Some(g) if g.passive == Some(passive) => g.passive_lvl,
            _ => 0,
        }
    }

    pub fn boot_level(&self, passive: BootPassive) -> u32 {
        match &self.boot {
            Some(b) if b.passive == Some(passive) => b.passive_lvl,
            _ => 0,
        }
    }

    pub fn helmet_level(&self, passive: HelmetPassive) -> u32 {
        match &self.helmet {
            Some(h) if h.passive == Some(passive) => h.passive_lvl,
            _ => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::passives::WeaponPassive;

    fn glove(passive: GlovePassive, lvl: u32) -> Glove {
        let mut g = Glove::new(1, "Grips".to_string(), 10);
        g.passive = Some(passive);
        g.passive_lvl = lvl;
        g.attack = 3;
        g.pdr = 4;
        g
    }

    #[test]
    fn test_loadout_starts_empty() {
        let loadout = Loadout::new();
        assert!(loadout.equipped_ids().is_empty());
        assert_eq!(loadout.gear_attack(), 0);
        assert_eq!(loadout.pdr(), 0);
    }

    #[test]
    fn test_equip_replaces_and_returns_previous() {
        let mut loadout = Loadout::new();
        let mut first = Weapon::new(1, "Old".to_string(), 5, 4, 0, 0);
        first.id = 1;
        let mut second = Weapon::new(1, "New".to_string(), 5, 9, 0, 0);
        second.id = 2;

        assert!(loadout.equip(Equipment::Weapon(first)).is_none());
        let previous = loadout.equip(Equipment::Weapon(second)).unwrap();
        assert_eq!(previous.id(), 1);
        assert!(!previous.is_equipped());
        assert_eq!(loadout.gear_attack(), 9);
        assert!(loadout.weapon.as_ref().unwrap().is_equipped);
    }

    #[test]
    fn test_take_marks_unequipped() {
        let mut loadout = Loadout::new();
        loadout.equip(Equipment::Glove(glove(GlovePassive::Adroit, 2)));
        let taken = loadout.take(EquipmentSlot::Glove).unwrap();
        assert!(!taken.is_equipped());
        assert!(loadout.glove.is_none());
    }

    #[test]
    fn test_totals_sum_slots() {
        let mut loadout = Loadout::new();
        let mut helmet = Helmet::new(1, "Cap".to_string(), 10);
        helmet.defence = 6;
        helmet.pdr = 5;
        helmet.ward = 2;
        loadout.equip(Equipment::Helmet(helmet));
        loadout.equip(Equipment::Glove(glove(GlovePassive::Deftness, 1)));
        assert_eq!(loadout.gear_defence(), 6);
        assert_eq!(loadout.gear_attack(), 3);
        assert_eq!(loadout.pdr(), 9);
        assert_eq!(loadout.ward_percent(), 2);
    }

    #[test]
    fn test_passive_level_lookups() {
        let mut loadout = Loadout::new();
        loadout.equip(Equipment::Glove(glove(GlovePassive::Equilibrium, 3)));
        assert_eq!(loadout.glove_level(GlovePassive::Equilibrium), 3);
        assert_eq!(loadout.glove_level(GlovePassive::Plundering), 0);
        assert_eq!(loadout.helmet_level(HelmetPassive::Frenzy), 0);

        let mut w = Weapon::new(1, "Blade".to_string(), 10, 5, 0, 0);
        w.passive = Some(WeaponPassive::base(WeaponLine::Burning));
        loadout.equip(Equipment::Weapon(w));
        assert_eq!(loadout.weapon_tier(WeaponLine::Burning), Some(0));
        assert_eq!(loadout.weapon_tier(WeaponLine::Echo), None);
    }
}
