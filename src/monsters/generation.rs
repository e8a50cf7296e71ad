//! Monster generation: level bands, stat curves, modifiers and templates.

use super::bosses::PhaseDescriptor;
use super::catalogue::{boss_template, sample_normal, sample_treasure, MonsterTemplate};
use super::modifiers::{boss_pool, draw_from, draw_many, normal_pool, Modifier};
use super::types::{EncounterMode, Monster};
use crate::character::Player;
use crate::core::constants::{
    ASCENT_XP_STAGE_DIVISOR, MODIFIER_CHECKS, MONSTER_HP_EXPONENT, MONSTER_HP_JITTER_MAX,
    TREASURE_BASE_CHANCE, TREASURE_HP, TREASURE_HUNTER_BONUS, TREASURE_TEMPLATE_LEVEL,
    TREASURE_TRACKER_STEP,
};
use crate::core::rng::{chance, randint, uniform};
use crate::core::{GameError, Result};
use crate::items::{ArmorPassive, BootPassive};
use rand::Rng;

/// Random level offset range for a player level.
pub fn level_band(player_level: u32) -> (u32, u32) {
    match player_level {
        0..=5 => (0, 2),
        6..=20 => (0, 3),
        21..=40 => (0, 4),
        41..=50 => (0, 5),
        51..=60 => (2, 5),
        61..=70 => (2, 6),
        71..=80 => (2, 7),
        81..=90 => (3, 8),
        _ => (4, 10),
    }
}

/// Exponent range for attack and defence at a monster level.
pub fn stat_exponent_band(level: u32) -> (f64, f64) {
    match level {
        0..=20 => (1.10, 1.20),
        21..=40 => (1.15, 1.25),
        41..=60 => (1.20, 1.30),
        61..=80 => (1.25, 1.32),
        _ => (1.28, 1.35),
    }
}

/// Picks Normal or Treasure for an ordinary encounter.
pub fn roll_encounter_mode(player: &Player, rng: &mut impl Rng) -> EncounterMode {
    let tracker = player.loadout.boot_level(BootPassive::TreasureTracker);
    let mut p = TREASURE_BASE_CHANCE + TREASURE_TRACKER_STEP * f64::from(tracker);
    if player.loadout.armor_has(ArmorPassive::TreasureHunter) {
        p += TREASURE_HUNTER_BONUS;
    }
    if chance(rng, p) {
        EncounterMode::Treasure
    } else {
        EncounterMode::Normal
    }
}

pub fn roll_level(player: &Player, rng: &mut impl Rng) -> u32 {
    let (lo, hi) = level_band(player.level);
    player.level + player.ascension + randint(rng, lo.into(), hi.into()) as u32
}

/// Rolls attack, defence and HP for `level` into `monster`.
pub fn roll_stats(monster: &mut Monster, rng: &mut impl Rng) {
    let level = f64::from(monster.level.max(1));
    let (lo, hi) = stat_exponent_band(monster.level);
    monster.attack = level.powf(uniform(rng, lo, hi)).floor() as u64;
    monster.defence = level.powf(uniform(rng, lo, hi)).floor() as u64;
    let hp_exp = uniform(rng, MONSTER_HP_EXPONENT.0, MONSTER_HP_EXPONENT.1);
    let hp = randint(rng, 0, MONSTER_HP_JITTER_MAX.into()) + (10.0 * level.powf(hp_exp)).floor() as u64;
    monster.max_hp = hp.max(1);
    monster.hp = monster.max_hp;
}

/// Modifier checks for a normal monster: one per threshold passed.
pub fn roll_modifiers(level: u32, rarity: u32, rng: &mut impl Rng) -> Vec<Modifier> {
    let bonus = f64::from(rarity) / 10.0;
    let mut pool = normal_pool();
    let mut drawn = Vec::new();
    for (i, (threshold, base)) in MODIFIER_CHECKS.iter().enumerate() {
        let passed = if i + 1 == MODIFIER_CHECKS.len() {
            level >= *threshold
        } else {
            level > *threshold
        };
        if passed && chance(rng, (base + bonus) / 100.0) {
            if let Some(m) = draw_from(&mut pool, rng) {
                drawn.push(m);
            }
        }
    }
    drawn
}

/// Generation-time stat effects. Built-different is resolved first since it rerolls.
pub fn apply_generation_modifiers(monster: &mut Monster, rng: &mut impl Rng) {
    if monster.has(Modifier::BuiltDifferent) {
        monster.level += 2;
        roll_stats(monster, rng);
    }
    if monster.has(Modifier::Ascended) {
        monster.attack += 10;
        monster.defence += 10;
    }
    if monster.has(Modifier::Absolute) {
        monster.attack += 25;
        monster.defence += 25;
    }
    if monster.has(Modifier::SteelBorn) {
        monster.defence = (monster.defence as f64 * 1.1).floor() as u64;
    }
    if monster.has(Modifier::Mighty) {
        monster.attack = (monster.attack as f64 * 1.1).floor() as u64;
    }
    if monster.has(Modifier::Glutton) {
        monster.max_hp *= 2;
        monster.hp = monster.max_hp;
    }
}

fn apply_template(monster: &mut Monster, template: Option<&MonsterTemplate>) {
    match template {
        Some(t) => {
            monster.name = t.name.clone();
            monster.image = t.image.clone();
            monster.flavor = t.flavor.clone();
            monster.species = t.species.clone();
            monster.template_level = t.level;
        }
        None => {
            tracing::warn!(level = monster.level, "no monster template found");
            monster.name = "Nameless Horror".to_string();
            monster.species = "Unknown".to_string();
        }
    }
}

/// Builds a monster for `player` in the requested mode.
pub fn generate_monster(player: &Player, mode: EncounterMode, rng: &mut impl Rng) -> Result<Monster> {
    let monster = match mode {
        EncounterMode::Normal => generate_normal(player, 0, rng),
        EncounterMode::Ascent { stage } => generate_normal(player, stage, rng),
        EncounterMode::Treasure => generate_treasure(player, rng),
        EncounterMode::BossPhase { encounter, index } => {
            let phase = encounter.phase(index).ok_or_else(|| {
                GameError::InvalidTarget(format!("{} has no phase {}", encounter.name(), index + 1))
            })?;
            generate_boss_phase(player, phase, rng)
        }
    };
    tracing::debug!(
        name = %monster.name,
        level = monster.level,
        hp = monster.max_hp,
        modifiers = monster.modifiers.len(),
        "monster generated"
    );
    Ok(monster)
}

fn generate_normal(player: &Player, stage: u32, rng: &mut impl Rng) -> Monster {
    let level = roll_level(player, rng) + stage;
    let mut monster = Monster::blank(level);
    roll_stats(&mut monster, rng);
    monster.modifiers = roll_modifiers(level, player.total_rarity(), rng);
    apply_generation_modifiers(&mut monster, rng);
    let stage_factor = 1.0 + f64::from(stage) / ASCENT_XP_STAGE_DIVISOR;
    monster.xp = (monster.max_hp as f64 * stage_factor).floor() as u64;
    let template = sample_normal(monster.level, rng);
    apply_template(&mut monster, template);
    monster
}

fn generate_treasure(player: &Player, rng: &mut impl Rng) -> Monster {
    let level = roll_level(player, rng);
    let mut monster = Monster::blank(level);
    monster.is_treasure = true;
    monster.max_hp = TREASURE_HP;
    monster.hp = TREASURE_HP;
    apply_template(&mut monster, sample_treasure(rng));
    monster.template_level = TREASURE_TEMPLATE_LEVEL;
    monster
}

/// Boss phases use the top of the player's level band for stats.
pub fn generate_boss_phase(player: &Player, phase: &PhaseDescriptor, rng: &mut impl Rng) -> Monster {
    let (_, hi) = level_band(player.level);
    let level = player.level + player.ascension + hi;
    let mut monster = Monster::blank(level);
    monster.is_boss = true;
    roll_stats(&mut monster, rng);
    let mut pool = normal_pool();
    pool.extend(boss_pool());
    monster.modifiers = draw_many(pool, phase.modifiers_count, rng);
    apply_generation_modifiers(&mut monster, rng);
    monster.max_hp = ((monster.max_hp as f64) * phase.hp_multiplier).floor() as u64;
    monster.hp = monster.max_hp;
    monster.xp = monster.max_hp;
    apply_template(&mut monster, boss_template(phase.level, phase.name));
    monster.name = phase.name.to_string();
    monster
}
