use super::passives::{
    AccessoryPassive, ArmorPassive, BootPassive, GlovePassive, HelmetPassive, WeaponLine,
    WeaponPassive,
};
use serde::{Deserialize, Serialize};

pub const ACCESSORY_PASSIVE_CAP: u32 = 10;
pub const GLOVE_PASSIVE_CAP: u32 = 5;
pub const BOOT_PASSIVE_CAP: u32 = 6;
pub const HELMET_PASSIVE_CAP: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EquipmentSlot {
    Weapon,
    Armor,
    Accessory,
    Glove,
    Boot,
    Helmet,
}

impl EquipmentSlot {
    pub const ALL: [EquipmentSlot; 6] = [
        EquipmentSlot::Weapon,
        EquipmentSlot::Armor,
        EquipmentSlot::Accessory,
        EquipmentSlot::Glove,
        EquipmentSlot::Boot,
        EquipmentSlot::Helmet,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            EquipmentSlot::Weapon => "Weapon",
            EquipmentSlot::Armor => "Armor",
            EquipmentSlot::Accessory => "Accessory",
            EquipmentSlot::Glove => "Glove",
            EquipmentSlot::Boot => "Boot",
            EquipmentSlot::Helmet => "Helmet",
        }
    }

    /// Store table holding this slot's rows.
    pub fn table_name(&self) -> &'static str {
        match self {
            EquipmentSlot::Weapon => "items",
            EquipmentSlot::Armor => "armor",
            EquipmentSlot::Accessory => "accessories",
            EquipmentSlot::Glove => "gloves",
            EquipmentSlot::Boot => "boots",
            EquipmentSlot::Helmet => "helmets",
        }
    }

    /// Passive level cap for slots that level their passive via Potential.
    pub fn passive_cap(&self) -> Option<u32> {
        match self {
            EquipmentSlot::Accessory => Some(ACCESSORY_PASSIVE_CAP),
            EquipmentSlot::Glove => Some(GLOVE_PASSIVE_CAP),
            EquipmentSlot::Boot => Some(BOOT_PASSIVE_CAP),
            EquipmentSlot::Helmet => Some(HELMET_PASSIVE_CAP),
            EquipmentSlot::Weapon | EquipmentSlot::Armor => None,
        }
    }
}

/// Crafting tier by item level: 0 for ≤40, 1 for 41-80, 2 above.
pub fn level_tier(level: u32) -> usize {
    match level {
        0..=40 => 0,
        41..=80 => 1,
        _ => 2,
    }
}

/// Initial forge/refine/temper attempts for an item of this level (3/4/5).
pub fn initial_attempts(level: u32) -> u32 {
    3 + level_tier(level) as u32
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Weapon {
    pub id: u64,
    pub user_id: u64,
    pub name: String,
    pub level: u32,
    pub attack: u32,
    pub defence: u32,
    pub rarity: u32,
    pub passive: Option<WeaponPassive>,
    pub pinnacle_passive: Option<WeaponPassive>,
    pub utmost_passive: Option<WeaponPassive>,
    pub forges_remaining: u32,
    pub refines_remaining: u32,
    pub refinement_lvl: u32,
    pub is_equipped: bool,
}

impl Weapon {
    pub fn new(user_id: u64, name: String, level: u32, attack: u32, defence: u32, rarity: u32) -> Self {
        Self {
            id: 0,
            user_id,
            name,
            level,
            attack,
            defence,
            rarity,
            passive: None,
            pinnacle_passive: None,
            utmost_passive: None,
            forges_remaining: initial_attempts(level),
            refines_remaining: initial_attempts(level),
            refinement_lvl: 0,
            is_equipped: false,
        }
    }

    /// Main, pinnacle and utmost passives in registration order.
    pub fn passive_slots(&self) -> [Option<WeaponPassive>; 3] {
        [self.passive, self.pinnacle_passive, self.utmost_passive]
    }

    /// Highest tier of `line` among the three passive slots.
    pub fn line_tier(&self, line: WeaponLine) -> Option<u8> {
        self.passive_slots()
            .iter()
            .flatten()
            .filter(|p| p.line == line)
            .map(|p| p.tier)
            .max()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Armor {
    pub id: u64,
    pub user_id: u64,
    pub name: String,
    pub level: u32,
    pub block: u32,
    pub evasion: u32,
    pub ward: u32,
    pub pdr: u32,
    pub fdr: u32,
    pub passive: Option<ArmorPassive>,
    pub temper_remaining: u32,
    pub imbue_remaining: u32,
    pub is_equipped: bool,
}

impl Armor {
    pub fn new(user_id: u64, name: String, level: u32) -> Self {
        Self {
            id: 0,
            user_id,
            name,
            level,
            block: 0,
            evasion: 0,
            ward: 0,
            pdr: 0,
            fdr: 0,
            passive: None,
            temper_remaining: initial_attempts(level),
            imbue_remaining: 1,
            is_equipped: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Accessory {
    pub id: u64,
    pub user_id: u64,
    pub name: String,
    pub level: u32,
    pub attack: u32,
    pub defence: u32,
    pub rarity: u32,
    pub ward: u32,
    pub crit: u32,
    pub passive: Option<AccessoryPassive>,
    pub passive_lvl: u32,
    pub potential_remaining: u32,
    pub is_equipped: bool,
}

impl Accessory {
    pub fn new(user_id: u64, name: String, level: u32) -> Self {
        Self {
            id: 0,
            user_id,
            name,
            level,
            attack: 0,
            defence: 0,
            rarity: 0,
            ward: 0,
            crit: 0,
            passive: None,
            passive_lvl: 0,
            potential_remaining: ACCESSORY_PASSIVE_CAP,
            is_equipped: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Glove {
    pub id: u64,
    pub user_id: u64,
    pub name: String,
    pub level: u32,
    pub attack: u32,
    pub defence: u32,
    pub ward: u32,
    pub pdr: u32,
    pub fdr: u32,
    pub passive: Option<GlovePassive>,
    pub passive_lvl: u32,
    pub potential_remaining: u32,
    pub is_equipped: bool,
}

impl Glove {
    pub fn new(user_id: u64, name: String, level: u32) -> Self {
        Self {
            id: 0,
            user_id,
            name,
            level,
            attack: 0,
            defence: 0,
            ward: 0,
            pdr: 0,
            fdr: 0,
            passive: None,
            passive_lvl: 0,
            potential_remaining: GLOVE_PASSIVE_CAP,
            is_equipped: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Boot {
    pub id: u64,
    pub user_id: u64,
    pub name: String,
    pub level: u32,
    pub attack: u32,
    pub defence: u32,
    pub ward: u32,
    pub pdr: u32,
    pub fdr: u32,
    pub passive: Option<BootPassive>,
    pub passive_lvl: u32,
    pub potential_remaining: u32,
    pub is_equipped: bool,
}

impl Boot {
    pub fn new(user_id: u64, name: String, level: u32) -> Self {
        Self {
            id: 0,
            user_id,
            name,
            level,
            attack: 0,
            defence: 0,
            ward: 0,
            pdr: 0,
            fdr: 0,
            passive: None,
            passive_lvl: 0,
            potential_remaining: BOOT_PASSIVE_CAP,
            is_equipped: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Helmet {
    pub id: u64,
    pub user_id: u64,
    pub name: String,
    pub level: u32,
    pub defence: u32,
    pub ward: u32,
    pub pdr: u32,
    pub fdr: u32,
    pub passive: Option<HelmetPassive>,
    pub passive_lvl: u32,
    pub potential_remaining: u32,
    pub is_equipped: bool,
}

impl Helmet {
    pub fn new(user_id: u64, name: String, level: u32) -> Self {
        Self {
            id: 0,
            user_id,
            name,
            level,
            defence: 0,
            ward: 0,
            pdr: 0,
            fdr: 0,
            passive: None,
            passive_lvl: 0,
            potential_remaining: HELMET_PASSIVE_CAP,
            is_equipped: false,
        }
    }
}

/// One equipment record of any slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Equipment {
    Weapon(Weapon),
    Armor(Armor),
    Accessory(Accessory),
    Glove(Glove),
    Boot(Boot),
    Helmet(Helmet),
}

macro_rules! common_field {
    ($self:ident, $field:ident) => {
        match $self {
            Equipment::Weapon(i) => &i.$field,
            Equipment::Armor(i) => &i.$field,
            Equipment::Accessory(i) => &i.$field,
            Equipment::Glove(i) => &i.$field,
            Equipment::Boot(i) => &i.$field,
            Equipment::Helmet(i) => &i.$field,
        }
    };
}

macro_rules! common_field_mut {
    ($self:ident, $field:ident) => {
        match $self {
            Equipment::Weapon(i) => &mut i.$field,
            Equipment::Armor(i) => &mut i.$field,
            Equipment::Accessory(i) => &mut i.$field,
            Equipment::Glove(i) => &mut i.$field,
            Equipment::Boot(i) => &mut i.$field,
            Equipment::Helmet(i) => &mut i.$field,
        }
    };
}

impl Equipment {
    pub fn slot(&self) -> EquipmentSlot {
        match self {
            Equipment::Weapon(_) => EquipmentSlot::Weapon,
            Equipment::Armor(_) => EquipmentSlot::Armor,
            Equipment::Accessory(_) => EquipmentSlot::Accessory,
            Equipment::Glove(_) => EquipmentSlot::Glove,
            Equipment::Boot(_) => EquipmentSlot::Boot,
            Equipment::Helmet(_) => EquipmentSlot::Helmet,
        }
    }

    pub fn id(&self) -> u64 {
        *common_field!(self, id)
    }

    pub fn set_id(&mut self, id: u64) {
        *common_field_mut!(self, id) = id;
    }

    pub fn user_id(&self) -> u64 {
        *common_field!(self, user_id)
    }

    pub fn set_user_id(&mut self, user_id: u64) {
        *common_field_mut!(self, user_id) = user_id;
    }

    pub fn name(&self) -> &str {
        common_field!(self, name)
    }

    pub fn level(&self) -> u32 {
        *common_field!(self, level)
    }

    pub fn is_equipped(&self) -> bool {
        *common_field!(self, is_equipped)
    }

    pub fn set_equipped(&mut self, equipped: bool) {
        *common_field_mut!(self, is_equipped) = equipped;
    }

    pub fn as_weapon(&self) -> Option<&Weapon> {
        match self {
            Equipment::Weapon(w) => Some(w),
            _ => None,
        }
    }

    pub fn as_armor(&self) -> Option<&Armor> {
        match self {
            Equipment::Armor(a) => Some(a),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_tier_boundaries() {
        assert_eq!(level_tier(1), 0);
        assert_eq!(level_tier(40), 0);
        assert_eq!(level_tier(41), 1);
        assert_eq!(level_tier(80), 1);
        assert_eq!(level_tier(81), 2);
        assert_eq!(initial_attempts(10), 3);
        assert_eq!(initial_attempts(50), 4);
        assert_eq!(initial_attempts(95), 5);
    }

    #[test]
    fn test_new_weapon_counters() {
        let w = Weapon::new(1, "Iron Sword".to_string(), 50, 20, 5, 2);
        assert_eq!(w.forges_remaining, 4);
        assert_eq!(w.refines_remaining, 4);
        assert_eq!(w.refinement_lvl, 0);
        assert!(w.passive.is_none());
    }

    #[test]
    fn test_line_tier_picks_highest_slot() {
        let mut w = Weapon::new(1, "Blade".to_string(), 10, 5, 0, 0);
        assert_eq!(w.line_tier(WeaponLine::Polished), None);
        w.passive = Some(WeaponPassive::base(WeaponLine::Polished));
        w.utmost_passive = Some(WeaponPassive {
            line: WeaponLine::Polished,
            tier: 3,
        });
        w.pinnacle_passive = Some(WeaponPassive::base(WeaponLine::Echo));
        assert_eq!(w.line_tier(WeaponLine::Polished), Some(3));
        assert_eq!(w.line_tier(WeaponLine::Echo), Some(0));
    }

    #[test]
    fn test_equipment_common_accessors() {
        let mut item = Equipment::Boot(Boot::new(7, "Boots".to_string(), 12));
        assert_eq!(item.slot(), EquipmentSlot::Boot);
        assert_eq!(item.user_id(), 7);
        item.set_id(99);
        item.set_equipped(true);
        assert_eq!(item.id(), 99);
        assert!(item.is_equipped());
        assert_eq!(item.level(), 12);
    }

    #[test]
    fn test_passive_caps() {
        assert_eq!(EquipmentSlot::Accessory.passive_cap(), Some(10));
        assert_eq!(EquipmentSlot::Boot.passive_cap(), Some(6));
        assert_eq!(EquipmentSlot::Weapon.passive_cap(), None);
    }
}
