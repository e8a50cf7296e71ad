//! Conversions between equipment records and their positional table rows.

use super::passives::{parse_passive, parse_weapon_passive, passive_label, weapon_passive_label, NamedPassive};
use super::types::{Accessory, Armor, Boot, Equipment, EquipmentSlot, Glove, Helmet, Weapon};
use crate::core::Result;
use crate::store::row::{flag, Row, RowReader};
use serde_json::Value;

pub const WEAPON_COLUMNS: &[&str] = &[
    "item_id",
    "user_id",
    "item_name",
    "item_level",
    "attack",
    "defence",
    "rarity",
    "passive",
    "is_equipped",
    "forges_remaining",
    "refines_remaining",
    "refinement_lvl",
    "pinnacle_passive",
    "utmost_passive",
];

pub const ARMOR_COLUMNS: &[&str] = &[
    "item_id",
    "user_id",
    "item_name",
    "item_level",
    "block",
    "evasion",
    "ward",
    "pdr",
    "fdr",
    "passive",
    "is_equipped",
    "temper_remaining",
    "imbue_remaining",
];

pub const ACCESSORY_COLUMNS: &[&str] = &[
    "item_id",
    "user_id",
    "item_name",
    "item_level",
    "attack",
    "defence",
    "rarity",
    "ward",
    "crit",
    "passive",
    "is_equipped",
    "passive_lvl",
    "potential_remaining",
];

/// Shared by the gloves and boots tables.
pub const HANDS_FEET_COLUMNS: &[&str] = &[
    "item_id",
    "user_id",
    "item_name",
    "item_level",
    "attack",
    "defence",
    "ward",
    "pdr",
    "fdr",
    "passive",
    "is_equipped",
    "passive_lvl",
    "potential_remaining",
];

pub const HELMET_COLUMNS: &[&str] = &[
    "item_id",
    "user_id",
    "item_name",
    "item_level",
    "defence",
    "ward",
    "pdr",
    "fdr",
    "passive",
    "is_equipped",
    "passive_lvl",
    "potential_remaining",
];

pub fn columns_for(slot: EquipmentSlot) -> &'static [&'static str] {
    match slot {
        EquipmentSlot::Weapon => WEAPON_COLUMNS,
        EquipmentSlot::Armor => ARMOR_COLUMNS,
        EquipmentSlot::Accessory => ACCESSORY_COLUMNS,
        EquipmentSlot::Glove | EquipmentSlot::Boot => HANDS_FEET_COLUMNS,
        EquipmentSlot::Helmet => HELMET_COLUMNS,
    }
}

/// Index of a named column in the slot's table.
pub fn column_index(slot: EquipmentSlot, column: &str) -> Option<usize> {
    columns_for(slot).iter().position(|c| *c == column)
}

fn read_passive<P: NamedPassive>(reader: &RowReader<'_>, idx: usize) -> Result<Option<P>> {
    let name = reader.string(idx)?;
    parse_passive::<P>(&name).ok_or_else(|| reader.malformed(idx, "known passive"))
}

fn read_weapon_passive(reader: &RowReader<'_>, idx: usize) -> Result<Option<super::passives::WeaponPassive>> {
    let name = reader.string(idx)?;
    parse_weapon_passive(&name).ok_or_else(|| reader.malformed(idx, "known weapon passive"))
}

impl Equipment {
    pub fn to_row(&self) -> Row {
        match self {
            Equipment::Weapon(w) => vec![
                Value::from(w.id),
                Value::from(w.user_id),
                Value::from(w.name.clone()),
                Value::from(w.level),
                Value::from(w.attack),
                Value::from(w.defence),
                Value::from(w.rarity),
                Value::from(weapon_passive_label(w.passive)),
                flag(w.is_equipped),
                Value::from(w.forges_remaining),
                Value::from(w.refines_remaining),
                Value::from(w.refinement_lvl),
                Value::from(weapon_passive_label(w.pinnacle_passive)),
                Value::from(weapon_passive_label(w.utmost_passive)),
            ],
            Equipment::Armor(a) => vec![
                Value::from(a.id),
                Value::from(a.user_id),
                Value::from(a.name.clone()),
                Value::from(a.level),
                Value::from(a.block),
                Value::from(a.evasion),
                Value::from(a.ward),
                Value::from(a.pdr),
                Value::from(a.fdr),
                Value::from(passive_label(a.passive)),
                flag(a.is_equipped),
                Value::from(a.temper_remaining),
                Value::from(a.imbue_remaining),
            ],
            Equipment::Accessory(a) => vec![
                Value::from(a.id),
                Value::from(a.user_id),
                Value::from(a.name.clone()),
                Value::from(a.level),
                Value::from(a.attack),
                Value::from(a.defence),
                Value::from(a.rarity),
                Value::from(a.ward),
                Value::from(a.crit),
                Value::from(passive_label(a.passive)),
                flag(a.is_equipped),
                Value::from(a.passive_lvl),
                Value::from(a.potential_remaining),
            ],
            Equipment::Glove(g) => vec![
                Value::from(g.id),
                Value::from(g.user_id),
                Value::from(g.name.clone()),
                Value::from(g.level),
                Value::from(g.attack),
                Value::from(g.defence),
                Value::from(g.ward),
                Value::from(g.pdr),
                Value::from(g.fdr),
                Value::from(passive_label(g.passive)),
                flag(g.is_equipped),
                Value::from(g.passive_lvl),
                Value::from(g.potential_remaining),
            ],
            Equipment::Boot(b) => vec![
                Value::from(b.id),
                Value::from(b.user_id),
                Value::from(b.name.clone()),
                Value::from(b.level),
                Value::from(b.attack),
                Value::from(b.defence),
                Value::from(b.ward),
                Value::from(b.pdr),
                Value::from(b.fdr),
                Value::from(passive_label(b.passive)),
                flag(b.is_equipped),
                Value::from(b.passive_lvl),
                Value::from(b.potential_remaining),
            ],
            Equipment::Helmet(h) => vec![
                Value::from(h.id),
                Value::from(h.user_id),
                Value::from(h.name.clone()),
                Value::from(h.level),
                Value::from(h.defence),
                Value::from(h.ward),
                Value::from(h.pdr),
                Value::from(h.fdr),
                Value::from(passive_label(h.passive)),
                flag(h.is_equipped),
                Value::from(h.passive_lvl),
                Value::from(h.potential_remaining),
            ],
        }
    }

    /// Rebuilds a record from a row of `slot`'s table.
    pub fn from_row(slot: EquipmentSlot, row: &[Value]) -> Result<Self> {
        let r = RowReader::new(slot.table_name(), columns_for(slot), row)?;
        let item = match slot {
            EquipmentSlot::Weapon => Equipment::Weapon(Weapon {
                id: r.u64(0)?,
                user_id: r.u64(1)?,
                name: r.string(2)?,
                level: r.u32(3)?,
                attack: r.u32(4)?,
                defence: r.u32(5)?,
                rarity: r.u32(6)?,
                passive: read_weapon_passive(&r, 7)?,
                is_equipped: r.flag(8)?,
                forges_remaining: r.u32(9)?,
                refines_remaining: r.u32(10)?,
                refinement_lvl: r.u32(11)?,
                pinnacle_passive: read_weapon_passive(&r, 12)?,
                utmost_passive: read_weapon_passive(&r, 13)?,
            }),
            EquipmentSlot::Armor => Equipment::Armor(Armor {
                id: r.u64(0)?,
                user_id: r.u64(1)?,
                name: r.string(2)?,
                level: r.u32(3)?,
                block: r.u32(4)?,
                evasion: r.u32(5)?,
                ward: r.u32(6)?,
                pdr: r.u32(7)?,
                fdr: r.u32(8)?,
                passive: read_passive(&r, 9)?,
                is_equipped: r.flag(10)?,
                temper_remaining: r.u32(11)?,
                imbue_remaining: r.u32(12)?,
            }),
            EquipmentSlot::Accessory => Equipment::Accessory(Accessory {
                id: r.u64(0)?,
                user_id: r.u64(1)?,
                name: r.string(2)?,
                level: r.u32(3)?,
                attack: r.u32(4)?,
                defence: r.u32(5)?,
                rarity: r.u32(6)?,
                ward: r.u32(7)?,
                crit: r.u32(8)?,
                passive: read_passive(&r, 9)?,
                is_equipped: r.flag(10)?,
                passive_lvl: r.u32(11)?,
                potential_remaining: r.u32(12)?,
            }),
            EquipmentSlot::Glove => Equipment::Glove(Glove {
                id: r.u64(0)?,
                user_id: r.u64(1)?,
                name: r.string(2)?,
                level: r.u32(3)?,
                attack: r.u32(4)?,
                defence: r.u32(5)?,
                ward: r.u32(6)?,
                pdr: r.u32(7)?,
                fdr: r.u32(8)?,
                passive: read_passive(&r, 9)?,
                is_equipped: r.flag(10)?,
                passive_lvl: r.u32(11)?,
                potential_remaining: r.u32(12)?,
            }),
            EquipmentSlot::Boot => Equipment::Boot(Boot {
                id: r.u64(0)?,
                user_id: r.u64(1)?,
                name: r.string(2)?,
                level: r.u32(3)?,
                attack: r.u32(4)?,
                defence: r.u32(5)?,
                ward: r.u32(6)?,
                pdr: r.u32(7)?,
                fdr: r.u32(8)?,
                passive: read_passive(&r, 9)?,
                is_equipped: r.flag(10)?,
                passive_lvl: r.u32(11)?,
                potential_remaining: r.u32(12)?,
            }),
            EquipmentSlot::Helmet => Equipment::Helmet(Helmet {
                id: r.u64(0)?,
                user_id: r.u64(1)?,
                name: r.string(2)?,
                level: r.u32(3)?,
                defence: r.u32(4)?,
                ward: r.u32(5)?,
                pdr: r.u32(6)?,
                fdr: r.u32(7)?,
                passive: read_passive(&r, 8)?,
                is_equipped: r.flag(9)?,
                passive_lvl: r.u32(10)?,
                potential_remaining: r.u32(11)?,
            }),
        };
        Ok(item)
    }
}
