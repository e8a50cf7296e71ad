//! The users table row.
//!
//! Callers read by index, so the column order is fixed. Columns 37-40 were
//! appended after the original 37 and must stay at the end.

use super::row::{Row, RowReader};
use crate::character::{Currency, Emblems, Player, Wallet};
use crate::core::Result;
use crate::items::Loadout;
use serde_json::Value;

pub const USER_COLUMNS: [&str; 41] = [
    "id",
    "user_id",
    "server_id",
    "name",
    "url",
    "ideology",
    "level",
    "exp",
    "gold",
    "attack",
    "defence",
    "current_hp",
    "max_hp",
    "last_rest",
    "last_propagate",
    "ascension",
    "potions",
    "last_checkin",
    "created_at",
    "refinement_runes",
    "passive_points",
    "potential_runes",
    "curios",
    "curios_purchased_today",
    "last_combat",
    "dragon_key",
    "angel_key",
    "imbue_runes",
    "soul_cores",
    "void_frags",
    "void_keys",
    "shatter_runes",
    "balance_fragment",
    "partnership_runes",
    "magma_core",
    "life_root",
    "spirit_shard",
    "rarity",
    "crit_target",
    "emblems",
    "apothecary_workers",
];

pub const IDX_USER_ID: usize = 1;
pub const IDX_GOLD: usize = 8;
pub const IDX_CURRENT_HP: usize = 11;
pub const IDX_MAX_HP: usize = 12;
pub const IDX_LAST_COMBAT: usize = 24;

/// Index of a named users column.
pub fn user_column(name: &str) -> Option<usize> {
    USER_COLUMNS.iter().position(|c| *c == name)
}

pub fn user_to_row(player: &Player) -> Result<Row> {
    let w = &player.wallet;
    let emblems = serde_json::to_string(&player.emblems)?;
    Ok(vec![
        Value::from(player.id),
        Value::from(player.user_id),
        Value::from(player.server_id),
        Value::from(player.name.clone()),
        Value::from(player.url.clone()),
        Value::from(player.ideology.clone()),
        Value::from(player.level),
        Value::from(player.exp),
        Value::from(w.gold),
        Value::from(player.attack),
        Value::from(player.defence),
        Value::from(player.current_hp),
        Value::from(player.max_hp),
        Value::from(player.last_rest.clone()),
        Value::from(player.last_propagate.clone()),
        Value::from(player.ascension),
        Value::from(player.potions),
        Value::from(player.last_checkin.clone()),
        Value::from(player.created_at.clone()),
        Value::from(w.refinement_runes),
        Value::from(player.passive_points),
        Value::from(w.potential_runes),
        Value::from(w.curios),
        Value::from(player.curios_purchased_today),
        Value::from(player.last_combat),
        Value::from(w.dragon_key),
        Value::from(w.angel_key),
        Value::from(w.imbue_runes),
        Value::from(w.soul_cores),
        Value::from(w.void_frags),
        Value::from(w.void_keys),
        Value::from(w.shatter_runes),
        Value::from(w.balance_fragment),
        Value::from(w.partnership_runes),
        Value::from(w.magma_core),
        Value::from(w.life_root),
        Value::from(w.spirit_shard),
        Value::from(player.rarity),
        Value::from(player.crit_target),
        Value::from(emblems),
        Value::from(player.apothecary_workers),
    ])
}

/// Rebuilds a player from a users row. Gear and companions live in their
/// own tables and come back empty.
pub fn user_from_row(row: &[Value]) -> Result<Player> {
    let r = RowReader::new("users", &USER_COLUMNS, row)?;

    let mut wallet = Wallet {
        gold: r.u64(IDX_GOLD)?,
        ..Wallet::default()
    };
    for currency in Currency::ALL {
        if let Some(idx) = user_column(currency.column()) {
            wallet.set(currency, r.u64(idx)?);
        }
    }

    let emblems_json = r.string(39)?;
    let emblems: Emblems = if emblems_json.is_empty() {
        Emblems::default()
    } else {
        serde_json::from_str(&emblems_json).map_err(|_| r.malformed(39, "emblem JSON"))?
    };

    let mut player = Player {
        id: r.u64(0)?,
        user_id: r.u64(IDX_USER_ID)?,
        server_id: r.u64(2)?,
        name: r.string(3)?,
        url: r.string(4)?,
        ideology: r.string(5)?,
        level: r.u32(6)?,
        exp: r.u64(7)?,
        attack: r.u64(9)?,
        defence: r.u64(10)?,
        current_hp: r.u64(IDX_CURRENT_HP)?,
        max_hp: r.u64(IDX_MAX_HP)?,
        last_rest: r.string(13)?,
        last_propagate: r.string(14)?,
        ascension: r.u32(15)?,
        potions: r.u32(16)?,
        last_checkin: r.string(17)?,
        created_at: r.string(18)?,
        passive_points: r.u32(20)?,
        curios_purchased_today: r.u32(23)?,
        last_combat: r.i64(IDX_LAST_COMBAT)?,
        rarity: r.u32(37)?,
        crit_target: r.u32(38)?,
        emblems,
        apothecary_workers: r.u32(40)?,
        wallet,
        loadout: Loadout::new(),
        companions: Vec::new(),
        combat_ward: 0,
        is_invulnerable_this_combat: false,
        pending_equilibrium_xp: 0,
        pending_plunder_gold: 0,
    };
    player.clamp_hp();
    Ok(player)
}
