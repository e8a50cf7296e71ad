//! Experience thresholds, level-ups, ascension and the defeat penalty.

use super::player::Player;
use crate::core::constants::{
    DEFEAT_EXP_PENALTY_DIVISOR, LEVEL_UP_STAT_MAX, LEVEL_UP_STAT_MIN, MAX_LEVEL,
    PASSIVE_POINTS_PER_MILESTONE,
};
use crate::core::rng::randint;
use rand::Rng;
use std::collections::BTreeMap;
use std::sync::OnceLock;

const EXP_TABLE_JSON: &str = include_str!("../../data/exp.json");

static EXP_TABLE: OnceLock<BTreeMap<u32, u64>> = OnceLock::new();

/// Level → experience needed to leave that level.
pub fn exp_table() -> &'static BTreeMap<u32, u64> {
    EXP_TABLE.get_or_init(|| match serde_json::from_str(EXP_TABLE_JSON) {
        Ok(table) => table,
        Err(e) => {
            tracing::error!("embedded exp table is invalid: {e}");
            BTreeMap::new()
        }
    })
}

/// Curve the embedded table was generated from; used for missing rows.
fn fallback_threshold(level: u32) -> u64 {
    let l = f64::from(level.max(1));
    (50.0 * l.powf(2.2) + 100.0 * l) as u64
}

pub fn exp_threshold(level: u32) -> u64 {
    let level = level.clamp(1, MAX_LEVEL);
    exp_table()
        .get(&level)
        .copied()
        .unwrap_or_else(|| fallback_threshold(level))
}

/// What one pass through the threshold granted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelUp {
    pub level: u32,
    pub ascension: u32,
    pub attack_gain: u64,
    pub defence_gain: u64,
    pub hp_gain: u64,
    pub passive_points: u32,
    /// True when the pass was an ascension at the level cap.
    pub ascended: bool,
}

/// Consumes experience while it covers the current threshold.
///
/// Below the cap each pass raises the level and rolls 1-5 attack, defence and
/// max HP, then heals to full; every tenth level grants passive points. At the
/// cap each pass is an ascension instead.
pub fn apply_level_ups(player: &mut Player, rng: &mut impl Rng) -> Vec<LevelUp> {
    let mut gained = Vec::new();
    loop {
        let threshold = exp_threshold(player.level);
        if threshold == 0 || player.exp < threshold {
            break;
        }
        player.exp -= threshold;

        if player.level < MAX_LEVEL {
            player.level += 1;
            let attack_gain = randint(rng, LEVEL_UP_STAT_MIN.into(), LEVEL_UP_STAT_MAX.into());
            let defence_gain = randint(rng, LEVEL_UP_STAT_MIN.into(), LEVEL_UP_STAT_MAX.into());
            let hp_gain = randint(rng, LEVEL_UP_STAT_MIN.into(), LEVEL_UP_STAT_MAX.into());
            player.attack += attack_gain;
            player.defence += defence_gain;
            player.max_hp += hp_gain;
            player.current_hp = player.max_hp;
            let passive_points = if player.level % 10 == 0 {
                PASSIVE_POINTS_PER_MILESTONE
            } else {
                0
            };
            player.passive_points += passive_points;
            tracing::info!(user_id = player.user_id, level = player.level, "level up");
            gained.push(LevelUp {
                level: player.level,
                ascension: player.ascension,
                attack_gain,
                defence_gain,
                hp_gain,
                passive_points,
                ascended: false,
            });
        } else {
            player.ascension += 1;
            player.passive_points += PASSIVE_POINTS_PER_MILESTONE;
            player.current_hp = player.max_hp;
            tracing::info!(user_id = player.user_id, ascension = player.ascension, "ascended");
            gained.push(LevelUp {
                level: player.level,
                ascension: player.ascension,
                attack_gain: 0,
                defence_gain: 0,
                hp_gain: 0,
                passive_points: PASSIVE_POINTS_PER_MILESTONE,
                ascended: true,
            });
        }
    }
    gained
}

/// Removes a tenth of current experience (floored) and leaves the player at 1 HP.
/// Returns the experience lost.
pub fn apply_defeat_penalty(player: &mut Player) -> u64 {
    let lost = player.exp / DEFEAT_EXP_PENALTY_DIVISOR;
    player.exp -= lost;
    player.current_hp = 1.min(player.max_hp);
    lost
}
