//! Cost tables and success curves for the crafting operations.
//!
//! Forge, refine and temper tables are indexed by level tier (≤40, 41-80,
//! above) and then by steps taken, i.e. attempts already spent.

use crate::core::constants::{
    FORGE_BASE_SUCCESS, FORGE_STEP_PENALTY, POTENTIAL_BASE_PERCENT, POTENTIAL_RUNE_BONUS,
    POTENTIAL_STEP_PERCENT,
};
use crate::items::{initial_attempts, level_tier, EquipmentSlot};

/// Materials and gold for one forge or temper attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaterialCost {
    pub ore: u64,
    pub log: u64,
    pub bone: u64,
    pub gold: u64,
    /// Quality index into each gathering ledger (0 = iron/oak/desiccated).
    pub resource_step: usize,
}

const fn mc(ore: u64, log: u64, bone: u64, gold: u64, resource_step: usize) -> MaterialCost {
    MaterialCost { ore, log, bone, gold, resource_step }
}

const FORGE_COSTS: [&[MaterialCost]; 3] = [
    &[mc(10, 10, 10, 100, 0), mc(10, 10, 10, 400, 1), mc(10, 10, 10, 1_000, 2)],
    &[
        mc(20, 20, 20, 1_000, 0),
        mc(20, 20, 20, 2_500, 1),
        mc(20, 20, 20, 5_000, 2),
        mc(20, 20, 20, 10_000, 3),
    ],
    &[
        mc(40, 40, 40, 5_000, 0),
        mc(40, 40, 40, 10_000, 1),
        mc(40, 40, 40, 20_000, 2),
        mc(40, 40, 40, 40_000, 3),
        mc(40, 40, 40, 80_000, 4),
    ],
];

const TEMPER_COSTS: [&[MaterialCost]; 3] = [
    &[mc(5, 5, 5, 200, 0), mc(5, 5, 5, 600, 1), mc(5, 5, 5, 1_500, 2)],
    &[
        mc(10, 10, 10, 1_500, 0),
        mc(10, 10, 10, 3_000, 1),
        mc(10, 10, 10, 6_000, 2),
        mc(10, 10, 10, 12_000, 3),
    ],
    &[
        mc(20, 20, 20, 6_000, 0),
        mc(20, 20, 20, 12_000, 1),
        mc(20, 20, 20, 25_000, 2),
        mc(20, 20, 20, 50_000, 3),
        mc(20, 20, 20, 100_000, 4),
    ],
];

const REFINE_COSTS: [&[u64]; 3] = [
    &[1_000, 2_500, 5_000],
    &[5_000, 10_000, 20_000, 40_000],
    &[20_000, 40_000, 80_000, 150_000, 300_000],
];

pub const ACCESSORY_POTENTIAL_COSTS: [u64; 10] =
    [500, 1_000, 2_000, 3_000, 4_000, 5_000, 10_000, 20_000, 30_000, 40_000];
pub const GLOVE_POTENTIAL_COSTS: [u64; 5] = [1_000, 2_500, 5_000, 10_000, 20_000];
pub const BOOT_POTENTIAL_COSTS: [u64; 6] = [1_000, 2_500, 5_000, 10_000, 20_000, 40_000];
pub const HELMET_POTENTIAL_COSTS: [u64; 5] = [1_000, 2_500, 5_000, 10_000, 20_000];

/// Attempts already spent given the remaining counter.
pub fn steps_taken(level: u32, remaining: u32) -> usize {
    initial_attempts(level).saturating_sub(remaining) as usize
}

fn lookup<T: Copy>(table: &[&[T]; 3], level: u32, remaining: u32) -> Option<T> {
    table[level_tier(level)].get(steps_taken(level, remaining)).copied()
}

/// Cost of the next forge, or None when no attempts remain.
pub fn forge_cost(level: u32, forges_remaining: u32) -> Option<MaterialCost> {
    if forges_remaining == 0 {
        return None;
    }
    lookup(&FORGE_COSTS, level, forges_remaining)
}

pub fn temper_cost(level: u32, temper_remaining: u32) -> Option<MaterialCost> {
    if temper_remaining == 0 {
        return None;
    }
    lookup(&TEMPER_COSTS, level, temper_remaining)
}

/// Gold for the next refine. Attempts restored by a rune cost the final step.
pub fn refine_cost(level: u32, refines_remaining: u32) -> Option<u64> {
    if refines_remaining == 0 {
        return None;
    }
    let steps = REFINE_COSTS[level_tier(level)];
    let idx = steps_taken(level, refines_remaining).min(steps.len() - 1);
    steps.get(idx).copied()
}

/// `clamp(0.8 - 0.05 * steps_taken, 0, 1)`, shared by forge and temper.
pub fn forge_success_rate(level: u32, remaining: u32) -> f64 {
    let steps = steps_taken(level, remaining) as f64;
    (FORGE_BASE_SUCCESS - FORGE_STEP_PENALTY * steps).clamp(0.0, 1.0)
}

pub fn potential_costs(slot: EquipmentSlot) -> &'static [u64] {
    match slot {
        EquipmentSlot::Accessory => &ACCESSORY_POTENTIAL_COSTS,
        EquipmentSlot::Glove => &GLOVE_POTENTIAL_COSTS,
        EquipmentSlot::Boot => &BOOT_POTENTIAL_COSTS,
        EquipmentSlot::Helmet => &HELMET_POTENTIAL_COSTS,
        EquipmentSlot::Weapon | EquipmentSlot::Armor => &[],
    }
}

pub fn potential_cost(slot: EquipmentSlot, passive_lvl: u32) -> Option<u64> {
    potential_costs(slot).get(passive_lvl as usize).copied()
}

fn potential_floor(slot: EquipmentSlot) -> f64 {
    match slot {
        EquipmentSlot::Accessory => 25.0,
        EquipmentSlot::Glove | EquipmentSlot::Boot => 30.0,
        _ => 35.0,
    }
}

/// Success percentage for the next potential attempt.
pub fn potential_success_percent(slot: EquipmentSlot, passive_lvl: u32, rune: bool) -> f64 {
    let base = (POTENTIAL_BASE_PERCENT - POTENTIAL_STEP_PERCENT * f64::from(passive_lvl))
        .max(potential_floor(slot));
    if rune && slot == EquipmentSlot::Accessory {
        (base + POTENTIAL_RUNE_BONUS).min(100.0)
    } else {
        base
    }
}
