//! Turn resolution over a player and a monster.
//!
//! Every function here works on the combat snapshot in [`CombatState`] and
//! the player's transient fields. Persisted stats only change through HP,
//! potions and the pending reward buckets.

use super::hooks::{Effect, PassiveTable, Trigger};
use super::math::{
    calculate_monster_damage, calculate_monster_hit_chance, crit_damage, crit_roll, heal_amount,
    hit_damage, hit_roll, is_crit, is_player_hit, level_share, mitigate, player_hit_chance_pct,
    poison_damage,
};
use super::types::{
    CombatState, CombatantStats, HealReport, MonsterTurnReport, PlayerTurnReport, StartReport,
};
use crate::character::{apply_defeat_penalty, Player};
use crate::core::constants::*;
use crate::core::rng::chance;
use crate::core::{GameError, Result};
use crate::items::{
    AccessoryPassive, ArmorPassive, BootPassive, GlovePassive, HelmetPassive, WeaponLine,
};
use crate::monsters::{Modifier, Monster};
use rand::Rng;
use tracing::{debug, info};

/// Adds ward, halved under Void Aura. Returns the amount actually gained.
fn gain_ward(player: &mut Player, monster: &Monster, amount: u64) -> u64 {
    let amount = if monster.has(Modifier::VoidAura) {
        amount / 2
    } else {
        amount
    };
    player.combat_ward += amount;
    amount
}

fn scale(value: u64, factor: f64) -> u64 {
    (value as f64 * factor) as u64
}

// =========================================================================
// Start of combat
// =========================================================================

pub fn start_of_combat(
    player: &mut Player,
    monster: &mut Monster,
    rng: &mut impl Rng,
) -> (CombatState, StartReport) {
    player.reset_combat_state();
    let table = PassiveTable::build(&player.loadout);
    let mut state = CombatState::new(CombatantStats::from_player(player));
    let mut report = StartReport::default();

    player.combat_ward = level_share(player.max_hp, 1.0, state.stats.ward_percent);

    if monster.has(Modifier::ShieldBreaker) {
        player.combat_ward = 0;
        report.triggered.push(Modifier::ShieldBreaker.name());
    }
    if monster.has(Modifier::VoidAura) {
        player.combat_ward = 0;
        report.triggered.push(Modifier::VoidAura.name());
    }
    for immunity in [Modifier::Impenetrable, Modifier::Unbreakable] {
        if monster.has(immunity) {
            state.crit_immune = true;
            report.triggered.push(immunity.name());
        }
    }
    if monster.has(Modifier::Enfeeble) {
        state.stats.attack = scale(state.stats.attack, 0.9);
        report.triggered.push(Modifier::Enfeeble.name());
    }

    for effect in table.fires(Trigger::Start) {
        let fired = match effect {
            Effect::Armor(ArmorPassive::Invulnerable) => {
                player.is_invulnerable_this_combat = chance(rng, INVULNERABLE_CHANCE);
                player.is_invulnerable_this_combat
            }
            Effect::Armor(ArmorPassive::Omnipotent) => {
                let fired = chance(rng, OMNIPOTENT_CHANCE);
                if fired {
                    state.stats.attack += player.total_attack();
                    state.stats.defence += player.total_defence();
                    let max_hp = player.max_hp;
                    gain_ward(player, monster, max_hp);
                }
                fired
            }
            Effect::Accessory(AccessoryPassive::Absorb, lvl) => {
                let fired = chance(rng, f64::from(lvl) * 0.10);
                if fired {
                    state.stats.attack += monster.attack / 10;
                    state.stats.defence += monster.defence / 10;
                }
                fired
            }
            Effect::Weapon(p) if p.line == WeaponLine::Polished => {
                let cut = scale(monster.defence, p.strength());
                monster.defence = monster.defence.saturating_sub(cut);
                true
            }
            Effect::Weapon(p) if p.line == WeaponLine::Sturdy => {
                state.stats.defence += scale(state.stats.defence, p.strength());
                true
            }
            Effect::Helmet(HelmetPassive::Juggernaut, lvl) => {
                state.stats.attack += level_share(state.stats.defence, 4.0, lvl);
                true
            }
            Effect::Boot(BootPassive::Hearty, lvl) => {
                let bonus = level_share(player.max_hp, 5.0, lvl);
                gain_ward(player, monster, bonus);
                true
            }
            _ => false,
        };
        if fired {
            report.triggered.push(effect.name());
        }
    }

    report.ward = player.combat_ward;
    info!(
        user = player.user_id,
        monster = %monster.name,
        level = monster.level,
        ward = report.ward,
        triggered = ?report.triggered,
        "combat started"
    );
    (state, report)
}

// =========================================================================
// Player turn
// =========================================================================

/// Pre-damage adjustments folded from emblems and passives.
#[derive(Debug, Clone, Copy, Default)]
struct Swing {
    multiplier: f64,
    hit_floor: u32,
    lucky: bool,
    accuracy: i64,
    crit_bonus: u32,
    deftness: u32,
    adroit: u32,
    sparking: Option<u8>,
    burning: Option<u8>,
    echo: Option<u8>,
}

fn prepare_swing(
    player: &Player,
    monster: &Monster,
    state: &CombatState,
    table: &PassiveTable,
    rng: &mut impl Rng,
) -> Swing {
    let emblems = &player.emblems;
    let mut multiplier = 1.0 + EMBLEM_COMBAT_STEP * f64::from(emblems.combat_dmg);
    if monster.is_boss {
        multiplier *= 1.0 + EMBLEM_BOSS_STEP * f64::from(emblems.boss_dmg);
    }
    if emblems.slayer_matches(&monster.species) {
        multiplier *= 1.0 + EMBLEM_SLAYER_STEP * f64::from(emblems.slayer_dmg);
    }
    let mut swing = Swing {
        multiplier,
        accuracy: i64::from(emblems.accuracy),
        crit_bonus: state.stats.crit,
        ..Swing::default()
    };

    for effect in table.fires(Trigger::PreDamage) {
        match effect {
            Effect::Glove(GlovePassive::Instability, lvl) => {
                swing.multiplier *= if chance(rng, 0.5) {
                    1.5 + 0.1 * f64::from(lvl)
                } else {
                    0.5
                };
            }
            Effect::Accessory(AccessoryPassive::Obliterate, lvl) => {
                if chance(rng, f64::from(lvl) * 0.02) {
                    swing.multiplier *= 2.0;
                }
            }
            Effect::Armor(ArmorPassive::MysticalMight) => {
                if chance(rng, MYSTICAL_MIGHT_CHANCE) {
                    swing.multiplier *= MYSTICAL_MIGHT_MULTIPLIER;
                }
            }
            Effect::Helmet(HelmetPassive::Frenzy, lvl) => {
                if player.max_hp > 0 {
                    let missing = player.max_hp.saturating_sub(player.current_hp) as f64;
                    let missing_pct = missing * 100.0 / player.max_hp as f64;
                    swing.multiplier *= 1.0 + 0.005 * f64::from(lvl) * missing_pct;
                }
            }
            Effect::Glove(GlovePassive::Deftness, lvl) => {
                swing.hit_floor = swing.hit_floor.max(5 * lvl);
                swing.deftness = lvl;
            }
            Effect::Glove(GlovePassive::Adroit, lvl) => {
                swing.hit_floor = swing.hit_floor.max(2 * lvl);
                swing.adroit = lvl;
            }
            Effect::Accessory(AccessoryPassive::LuckyStrikes, lvl) => {
                swing.lucky = chance(rng, f64::from(lvl) * 0.1);
            }
            Effect::Weapon(p) => {
                let steps = u32::from(p.tier) + 1;
                match p.line {
                    WeaponLine::Accurate => swing.accuracy += i64::from(4 * steps),
                    WeaponLine::Piercing => swing.crit_bonus += 5 * steps,
                    WeaponLine::Sparking => swing.sparking = Some(p.tier),
                    WeaponLine::Burning => swing.burning = Some(p.tier),
                    WeaponLine::Echo => swing.echo = Some(p.tier),
                    _ => {}
                }
            }
            _ => {}
        }
    }

    if monster.has(Modifier::ShieldsUp) && chance(rng, SHIELDS_UP_CHANCE) {
        swing.multiplier = 0.0;
    }
    swing
}

/// Flat accuracy penalties from evasive monster modifiers.
fn evasion_penalty(monster: &Monster) -> i64 {
    [
        (Modifier::Dodgy, 10),
        (Modifier::Prescient, 5),
        (Modifier::AllSeeing, 10),
        (Modifier::Omniscient, 20),
    ]
    .iter()
    .filter(|(m, _)| monster.has(*m))
    .map(|(_, p)| p)
    .sum()
}

/// Applies player damage to the monster, honouring Time Lord.
fn strike_monster(monster: &mut Monster, damage: u64, rng: &mut impl Rng) -> bool {
    if monster.hp > 0
        && damage >= monster.hp
        && monster.has(Modifier::TimeLord)
        && chance(rng, TIME_LORD_CHANCE)
    {
        monster.hp = 1;
        return true;
    }
    monster.hp = monster.hp.saturating_sub(damage);
    false
}

pub fn player_turn(
    player: &mut Player,
    monster: &mut Monster,
    state: &mut CombatState,
    rng: &mut impl Rng,
) -> PlayerTurnReport {
    let table = PassiveTable::build(&player.loadout);
    let swing = prepare_swing(player, monster, state, &table, rng);
    let mut report = PlayerTurnReport {
        multiplier: swing.multiplier,
        ..PlayerTurnReport::default()
    };
    state.turns += 1;
    let attack = state.stats.attack;

    let mut roll = hit_roll(rng);
    if monster.has(Modifier::Suffocator) && chance(rng, SUFFOCATOR_CHANCE) {
        roll = roll.min(hit_roll(rng));
    }
    if swing.lucky {
        roll = roll.max(hit_roll(rng));
    }
    roll = roll.max(swing.hit_floor.min(100));
    let bonus = swing.accuracy - evasion_penalty(monster);
    let hit_pct = player_hit_chance_pct(attack, monster.defence);
    report.hit = is_player_hit(roll, bonus, hit_pct, swing.multiplier);

    if !report.hit {
        let poison = table.fires(Trigger::OnMiss).find_map(|e| match e {
            Effect::Weapon(p) if p.line == WeaponLine::Poisonous => Some(p.tier),
            _ => None,
        });
        if let Some(tier) = poison {
            report.damage = poison_damage(attack, tier);
            report.time_lord_saved = strike_monster(monster, report.damage, rng);
        }
        state.add_log_entry(
            format!("You miss {} ({} poison damage)", monster.name, report.damage),
            false,
            true,
        );
        debug!(turn = state.turns, roll, bonus, hit_pct, poison = report.damage, "player missed");
        return report;
    }

    report.crit = is_crit(
        crit_roll(rng),
        player.crit_target,
        swing.crit_bonus,
        state.crit_immune,
    );
    let raw = if report.crit {
        let insight: u32 = table
            .fires(Trigger::OnCrit)
            .map(|e| match e {
                Effect::Helmet(HelmetPassive::Insight, lvl) => lvl,
                _ => 0,
            })
            .sum();
        let mut crit_scale = (1.0 + EMBLEM_CRIT_STEP * f64::from(player.emblems.crit_dmg))
            * (1.0 + 0.1 * f64::from(insight));
        if monster.has(Modifier::Smothering) {
            crit_scale *= 0.8;
        }
        crit_damage(rng, attack, swing.deftness, crit_scale)
    } else {
        hit_damage(rng, attack, swing.adroit, swing.sparking, swing.burning, swing.echo)
    };

    let mut damage = raw as f64 * swing.multiplier;
    if monster.has(Modifier::Titanium) {
        damage *= 0.9;
    }
    if monster.has(Modifier::Unbreakable) {
        damage *= 0.8;
    }
    let damage = damage as u64;
    report.damage = damage;
    report.time_lord_saved = strike_monster(monster, damage, rng);

    for effect in table.fires(Trigger::OnHit) {
        match effect {
            Effect::Glove(GlovePassive::WardTouched, lvl) => {
                report.ward_gained += gain_ward(player, monster, level_share(damage, 1.0, lvl));
            }
            Effect::Glove(GlovePassive::WardFused, lvl) => {
                report.ward_gained += gain_ward(player, monster, level_share(damage, 2.0, lvl));
            }
            Effect::Helmet(HelmetPassive::Leeching, lvl) => {
                let before = player.current_hp;
                player.current_hp = (before + level_share(damage, 2.0, lvl)).min(player.max_hp);
                report.leeched = player.current_hp.saturating_sub(before);
            }
            Effect::Glove(GlovePassive::Equilibrium, lvl) => {
                player.pending_equilibrium_xp += level_share(damage, 5.0, lvl);
            }
            Effect::Glove(GlovePassive::Plundering, lvl) => {
                player.pending_plunder_gold += level_share(damage, 2.0, lvl);
            }
            Effect::Weapon(p) if p.line == WeaponLine::Strengthened => {
                let threshold = monster.max_hp as f64 * p.strength();
                if monster.hp > 1 && (monster.hp as f64) < threshold {
                    monster.hp = 1;
                    report.culled = true;
                }
            }
            _ => {}
        }
    }

    state.add_log_entry(
        format!(
            "You {} {} for {} damage",
            if report.crit { "crit" } else { "hit" },
            monster.name,
            damage
        ),
        report.crit,
        true,
    );
    debug!(
        turn = state.turns,
        damage,
        crit = report.crit,
        multiplier = swing.multiplier,
        monster_hp = monster.hp,
        "player hit"
    );
    report
}

// =========================================================================
// Monster turn
// =========================================================================

/// Routes damage through ward then HP and fires ward-break hooks.
fn absorb(
    player: &mut Player,
    monster: &mut Monster,
    damage: u64,
    table: &PassiveTable,
    report: &mut MonsterTurnReport,
) {
    let ward_before = player.combat_ward;
    let absorbed = damage.min(ward_before);
    player.combat_ward -= absorbed;
    let to_hp = damage - absorbed;
    player.current_hp = player.current_hp.saturating_sub(to_hp);
    report.damage += damage;
    report.ward_absorbed += absorbed;
    report.hp_lost += to_hp;

    if ward_before > 0 && player.combat_ward == 0 {
        report.ward_broken = true;
        for effect in table.fires(Trigger::OnWardBreak) {
            if let Effect::Helmet(HelmetPassive::Volatile, lvl) = effect {
                let blast = player.max_hp * u64::from(lvl);
                monster.hp = monster.hp.saturating_sub(blast);
                report.reflected += blast;
            }
        }
    }
}

fn monster_hit_chance(monster: &Monster, player_defence: u64) -> f64 {
    let mut hit_chance = calculate_monster_hit_chance(monster.attack, player_defence);
    if monster.has(Modifier::Prescient) {
        hit_chance *= 1.1;
    }
    if monster.has(Modifier::AllSeeing) {
        hit_chance += 0.1;
    }
    if monster.has(Modifier::CelestialWatcher) {
        hit_chance = 1.0;
    }
    hit_chance.min(1.0)
}

/// Regenerating ticks at the end of every monster turn, landed or not.
fn regenerate(monster: &mut Monster, report: &mut MonsterTurnReport) {
    if monster.has(Modifier::Regenerating) && !monster.is_dead() {
        let before = monster.hp;
        monster.heal(scale(monster.max_hp, REGENERATING_FRACTION));
        report.monster_healed += monster.hp - before;
    }
}

pub fn monster_turn(
    player: &mut Player,
    monster: &mut Monster,
    state: &mut CombatState,
    rng: &mut impl Rng,
) -> MonsterTurnReport {
    let mut report = MonsterTurnReport::default();
    if player.is_invulnerable_this_combat {
        report.invulnerable = true;
        regenerate(monster, &mut report);
        state.add_log_entry(format!("{}'s attack cannot reach you", monster.name), false, false);
        return report;
    }
    let table = PassiveTable::build(&player.loadout);
    let stats = state.stats;

    let hit_chance = monster_hit_chance(monster, stats.defence);
    let mut roll = rng.gen::<f64>();
    if monster.has(Modifier::LuciferTouched) {
        roll = roll.min(rng.gen::<f64>());
    }
    report.hit = roll < hit_chance;

    if !report.hit {
        if monster.has(Modifier::Venomous) {
            absorb(player, monster, 1, &table, &mut report);
        }
    } else {
        let base = calculate_monster_damage(rng, monster.attack, monster.level, stats.defence);
        let mut raw = base as f64;
        if monster.has(Modifier::CelestialWatcher) {
            raw *= 1.2;
        }
        if monster.has(Modifier::Hellborn) {
            raw += 2.0;
        }
        if monster.has(Modifier::HellsFury) {
            raw += 5.0;
        }
        if monster.has(Modifier::MirrorImage) && chance(rng, MIRROR_IMAGE_CHANCE) {
            raw *= 2.0;
        }
        if monster.has(Modifier::UnlimitedBladeWorks) {
            raw *= 2.0;
        }
        if monster.has(Modifier::Savage) {
            raw *= 1.1;
        }

        let pdr = f64::from(stats.pdr) - if monster.has(Modifier::Penetrator) { 20.0 } else { 0.0 };
        let fdr = u64::from(stats.fdr).saturating_sub(if monster.has(Modifier::Clobberer) { 5 } else { 0 });
        let mut damage = mitigate(raw as u64, pdr, fdr);
        if player.emblems.slayer_matches(&monster.species) {
            let cut = (EMBLEM_SLAYER_STEP * 100.0 * f64::from(player.emblems.slayer_def)).min(SLAYER_DEF_CAP);
            damage = (damage as f64 * (100.0 - cut) / 100.0) as u64;
        }
        if monster.has(Modifier::Summoner) {
            damage += (base / 3).saturating_sub(fdr);
        }
        if monster.has(Modifier::InfernalLegion) {
            damage += base.saturating_sub(fdr);
        }
        if monster.has(Modifier::Multistrike) && chance(rng, hit_chance) {
            damage += damage / 2;
        }
        if monster.has(Modifier::Executioner) && chance(rng, EXECUTIONER_CHANCE) {
            damage = damage.max(scale(player.current_hp, EXECUTIONER_HP_FRACTION));
        }

        if !monster.has(Modifier::Unblockable) && chance(rng, f64::from(stats.block) / 100.0) {
            report.blocked = true;
            for effect in table.fires(Trigger::OnBlock) {
                if let Effect::Helmet(HelmetPassive::Thorns, lvl) = effect {
                    let reflected = damage * u64::from(lvl);
                    monster.hp = monster.hp.saturating_sub(reflected);
                    report.reflected += reflected;
                }
            }
            damage = 0;
        } else if !monster.has(Modifier::Unavoidable)
            && chance(rng, f64::from(stats.evasion) / 100.0)
        {
            report.dodged = true;
            for effect in table.fires(Trigger::OnDodge) {
                if let Effect::Helmet(HelmetPassive::Ghosted, lvl) = effect {
                    gain_ward(player, monster, 10 * u64::from(lvl));
                }
            }
            damage = 0;
        }

        absorb(player, monster, damage, &table, &mut report);

        if damage > 0 && !monster.is_dead() {
            let factor = if monster.has(Modifier::SoulEater) {
                SOUL_EATER_HEAL_FACTOR
            } else if monster.has(Modifier::Vampiric) {
                VAMPIRIC_HEAL_FACTOR
            } else {
                0
            };
            let before = monster.hp;
            monster.heal(damage * factor);
            report.monster_healed += monster.hp - before;
        }
    }

    regenerate(monster, &mut report);

    let message = if report.blocked {
        format!("You block {}'s attack", monster.name)
    } else if report.dodged {
        format!("You dodge {}'s attack", monster.name)
    } else if report.damage > 0 {
        format!("{} hits you for {} damage", monster.name, report.damage)
    } else {
        format!("{} misses", monster.name)
    };
    state.add_log_entry(message, false, false);
    debug!(
        hit = report.hit,
        damage = report.damage,
        ward = player.combat_ward,
        hp = player.current_hp,
        "monster turn"
    );
    report
}

// =========================================================================
// Heal / terminal
// =========================================================================

pub fn heal(player: &mut Player, monster: &Monster, rng: &mut impl Rng) -> Result<HealReport> {
    if player.potions == 0 {
        return Err(GameError::NoPotions);
    }
    if player.is_full_hp() {
        return Err(GameError::FullHealth);
    }
    let table = PassiveTable::build(&player.loadout);
    let mut cleric = 0;
    let mut divine = 0;
    for effect in table.fires(Trigger::OnHeal) {
        match effect {
            Effect::Boot(BootPassive::Cleric, lvl) => cleric = lvl,
            Effect::Helmet(HelmetPassive::Divine, lvl) => divine = lvl,
            _ => {}
        }
    }

    let mut amount = heal_amount(rng, player.max_hp, cleric, player.apothecary_workers);
    if monster.has(Modifier::Blighted) {
        amount /= 2;
    }
    let missing = player.max_hp - player.current_hp;
    let healed = amount.min(missing);
    player.current_hp += healed;
    player.potions -= 1;

    let overheal = amount - healed;
    let ward_gained = if divine > 0 && overheal > 0 {
        gain_ward(player, monster, overheal * u64::from(divine))
    } else {
        0
    };
    debug!(healed, ward_gained, potions = player.potions, "heal");
    Ok(HealReport {
        healed,
        ward_gained,
    })
}

/// Applies the defeat penalty and clears combat fields. Returns exp lost.
pub fn resolve_defeat(player: &mut Player) -> u64 {
    let lost = apply_defeat_penalty(player);
    player.reset_combat_state();
    info!(user = player.user_id, exp_lost = lost, "player defeated");
    lost
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::{Armor, Boot, Equipment, Glove, Helmet, Weapon, WeaponPassive};
    use rand::rngs::mock::StepRng;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn player() -> Player {
        let mut p = Player::new(1, "Ayla");
        p.level = 10;
        p.attack = 30;
        p.defence = 20;
        p.max_hp = 100;
        p.current_hp = 100;
        p
    }

    fn monster() -> Monster {
        let mut m = Monster::blank(10);
        m.name = "Slime".to_string();
        m.attack = 10;
        m.defence = 5;
        m.max_hp = 30;
        m.hp = 30;
        m.xp = 30;
        m
    }

    #[test]
    fn test_start_builds_ward_from_gear() {
        let mut p = player();
        let mut armor = Armor::new(1, "Plate".to_string(), 10);
        armor.ward = 20;
        p.loadout.equip(Equipment::Armor(armor));
        let mut m = monster();
        let (_, report) = start_of_combat(&mut p, &mut m, &mut StepRng::new(0, 0));
        assert_eq!(report.ward, 20);
        assert_eq!(p.combat_ward, 20);
    }

    #[test]
    fn test_shield_breaker_zeroes_ward_and_leaves_player_stats() {
        let mut p = player();
        let mut armor = Armor::new(1, "Plate".to_string(), 10);
        armor.ward = 20;
        p.loadout.equip(Equipment::Armor(armor));
        let mut m = monster();
        m.modifiers = vec![Modifier::ShieldBreaker, Modifier::Enfeeble];
        let (state, report) = start_of_combat(&mut p, &mut m, &mut StepRng::new(0, 0));
        assert_eq!(p.combat_ward, 0);
        assert_eq!(state.stats.attack, 27);
        assert_eq!(p.attack, 30);
        assert_eq!(report.triggered, vec!["Shield-breaker", "Enfeeble"]);
    }

    #[test]
    fn test_start_resets_transients() {
        let mut p = player();
        p.pending_plunder_gold = 40;
        p.is_invulnerable_this_combat = true;
        let mut m = monster();
        start_of_combat(&mut p, &mut m, &mut StepRng::new(0, 0));
        assert_eq!(p.pending_plunder_gold, 0);
        assert!(!p.is_invulnerable_this_combat);
    }

    #[test]
    fn test_start_passives_touch_snapshot_only() {
        let mut p = player();
        let mut weapon = Weapon::new(1, "Blade".to_string(), 10, 0, 0, 0);
        weapon.passive = Some(WeaponPassive::base(WeaponLine::Sturdy));
        p.loadout.equip(Equipment::Weapon(weapon));
        let mut helmet = Helmet::new(1, "Cap".to_string(), 10);
        helmet.passive = Some(HelmetPassive::Juggernaut);
        helmet.passive_lvl = 5;
        p.loadout.equip(Equipment::Helmet(helmet));
        let mut armor = Armor::new(1, "Plate".to_string(), 10);
        armor.passive = Some(ArmorPassive::Invulnerable);
        p.loadout.equip(Equipment::Armor(armor));

        let mut m = monster();
        let (state, report) = start_of_combat(&mut p, &mut m, &mut StepRng::new(0, 0));
        // sturdy: 20 + 8% = 21; juggernaut: 30 + 20% of 21 = 34
        assert_eq!(state.stats.defence, 21);
        assert_eq!(state.stats.attack, 34);
        assert!(p.is_invulnerable_this_combat);
        assert_eq!((p.attack, p.defence), (30, 20));
        assert_eq!(report.triggered, vec!["Invulnerable", "sturdy", "juggernaut"]);
    }

    #[test]
    fn test_forced_hit_without_crit() {
        let mut p = player();
        let mut m = monster();
        let mut rng = StepRng::new(0, 0);
        let (mut state, _) = start_of_combat(&mut p, &mut m, &mut rng);
        let report = player_turn(&mut p, &mut m, &mut state, &mut rng);
        assert!(report.hit);
        assert!(!report.crit);
        assert_eq!(report.damage, 1);
        assert_eq!(m.hp, 29);
    }

    #[test]
    fn test_shields_up_forces_miss() {
        let mut p = player();
        let mut m = monster();
        m.modifiers = vec![Modifier::ShieldsUp];
        let mut rng = StepRng::new(0, 0);
        let (mut state, _) = start_of_combat(&mut p, &mut m, &mut rng);
        let report = player_turn(&mut p, &mut m, &mut state, &mut rng);
        assert!(!report.hit);
        assert_eq!(report.multiplier, 0.0);
        assert_eq!(m.hp, 30);
    }

    #[test]
    fn test_time_lord_saves_at_one_hp() {
        let mut p = player();
        let mut m = monster();
        m.modifiers = vec![Modifier::TimeLord];
        m.hp = 1;
        let mut rng = StepRng::new(0, 0);
        let (mut state, _) = start_of_combat(&mut p, &mut m, &mut rng);
        let report = player_turn(&mut p, &mut m, &mut state, &mut rng);
        assert!(report.time_lord_saved);
        assert_eq!(m.hp, 1);
    }

    #[test]
    fn test_time_lord_saves_about_eighty_percent() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let mut saved = 0;
        for _ in 0..2_000 {
            let mut m = monster();
            m.modifiers = vec![Modifier::TimeLord];
            m.hp = 1;
            if strike_monster(&mut m, 5, &mut rng) {
                assert_eq!(m.hp, 1);
                saved += 1;
            } else {
                assert_eq!(m.hp, 0);
            }
        }
        assert!((1_500..1_700).contains(&saved), "saved {saved}");
    }

    #[test]
    fn test_poison_line_deals_damage_on_miss() {
        let mut p = player();
        let mut weapon = Weapon::new(1, "Fang".to_string(), 10, 0, 0, 0);
        weapon.passive = Some(WeaponPassive { line: WeaponLine::Poisonous, tier: 1 });
        p.loadout.equip(Equipment::Weapon(weapon));
        let mut m = monster();
        m.modifiers = vec![Modifier::ShieldsUp];
        let mut rng = StepRng::new(0, 0);
        let (mut state, _) = start_of_combat(&mut p, &mut m, &mut rng);
        let report = player_turn(&mut p, &mut m, &mut state, &mut rng);
        assert!(!report.hit);
        // 30 × 0.16
        assert_eq!(report.damage, 4);
        assert_eq!(m.hp, 26);
    }

    #[test]
    fn test_glove_hit_passives() {
        let mut p = player();
        p.attack = 1_000;
        let mut glove = Glove::new(1, "Grips".to_string(), 10);
        glove.passive = Some(GlovePassive::Plundering);
        glove.passive_lvl = 5;
        p.loadout.equip(Equipment::Glove(glove));
        let mut m = monster();
        m.hp = 10_000;
        m.max_hp = 10_000;
        let mut rng = StepRng::new(0, 0);
        let (mut state, _) = start_of_combat(&mut p, &mut m, &mut rng);
        let report = player_turn(&mut p, &mut m, &mut state, &mut rng);
        assert_eq!(report.damage, 1);
        assert_eq!(p.pending_plunder_gold, 0);

        // Adroit floors the minimum high enough for a measurable share.
        let mut q = player();
        q.attack = 1_000;
        let mut glove = Glove::new(1, "Grips".to_string(), 10);
        glove.passive = Some(GlovePassive::Adroit);
        glove.passive_lvl = 5;
        q.loadout.equip(Equipment::Glove(glove));
        let (mut state, _) = start_of_combat(&mut q, &mut m, &mut rng);
        let report = player_turn(&mut q, &mut m, &mut state, &mut rng);
        assert_eq!(report.damage, 251);
    }

    #[test]
    fn test_invulnerable_player_takes_nothing() {
        let mut p = player();
        p.is_invulnerable_this_combat = true;
        let mut m = monster();
        let mut state = CombatState::new(CombatantStats::from_player(&p));
        let report = monster_turn(&mut p, &mut m, &mut state, &mut StepRng::new(0, 0));
        assert!(report.invulnerable);
        assert_eq!(p.current_hp, 100);
    }

    #[test]
    fn test_regenerating_ticks_through_invulnerability() {
        let mut p = player();
        p.is_invulnerable_this_combat = true;
        let mut m = monster();
        m.max_hp = 500;
        m.hp = 100;
        m.modifiers = vec![Modifier::Regenerating];
        let mut state = CombatState::new(CombatantStats::from_player(&p));
        let report = monster_turn(&mut p, &mut m, &mut state, &mut StepRng::new(0, 0));
        assert!(report.invulnerable);
        assert_eq!(report.monster_healed, 10);
        assert_eq!(m.hp, 110);
        assert_eq!(p.current_hp, 100);
    }

    #[test]
    fn test_impenetrable_blocks_crits_at_any_crit_target() {
        let crits = |modifiers: Vec<Modifier>| {
            let mut rng = ChaCha8Rng::seed_from_u64(17);
            let mut p = player();
            p.crit_target = 0;
            let mut m = monster();
            m.max_hp = 1_000_000;
            m.hp = m.max_hp;
            m.modifiers = modifiers;
            let (mut state, _) = start_of_combat(&mut p, &mut m, &mut rng);
            (0..50)
                .filter(|_| player_turn(&mut p, &mut m, &mut state, &mut rng).crit)
                .count()
        };
        assert!(crits(vec![]) > 0);
        assert_eq!(crits(vec![Modifier::Impenetrable]), 0);
    }

    #[test]
    fn test_monster_damage_hits_ward_first() {
        let mut p = player();
        p.combat_ward = 3;
        let mut m = monster();
        m.attack = 40;
        let mut state = CombatState::new(CombatantStats::from_player(&p));
        let report = monster_turn(&mut p, &mut m, &mut state, &mut StepRng::new(0, 0));
        // jitter 1 + half of (40 - 20)
        assert_eq!(report.damage, 11);
        assert_eq!(report.ward_absorbed, 3);
        assert_eq!(report.hp_lost, 8);
        assert!(report.ward_broken);
        assert_eq!(p.current_hp, 92);
    }

    #[test]
    fn test_block_reflects_thorns() {
        let mut p = player();
        let mut armor = Armor::new(1, "Plate".to_string(), 10);
        armor.block = 50;
        p.loadout.equip(Equipment::Armor(armor));
        let mut helmet = Helmet::new(1, "Spikes".to_string(), 10);
        helmet.passive = Some(HelmetPassive::Thorns);
        helmet.passive_lvl = 2;
        p.loadout.equip(Equipment::Helmet(helmet));
        let mut m = monster();
        m.attack = 40;
        let mut state = CombatState::new(CombatantStats::from_player(&p));
        let report = monster_turn(&mut p, &mut m, &mut state, &mut StepRng::new(0, 0));
        assert!(report.blocked);
        assert_eq!(report.reflected, 22);
        assert_eq!(m.hp, 8);
        assert_eq!(p.current_hp, 100);
    }

    #[test]
    fn test_unblockable_ignores_block() {
        let mut p = player();
        let mut armor = Armor::new(1, "Plate".to_string(), 10);
        armor.block = 50;
        p.loadout.equip(Equipment::Armor(armor));
        let mut m = monster();
        m.modifiers = vec![Modifier::Unblockable];
        let mut state = CombatState::new(CombatantStats::from_player(&p));
        let report = monster_turn(&mut p, &mut m, &mut state, &mut StepRng::new(0, 0));
        assert!(!report.blocked);
        assert_eq!(p.current_hp, 99);
    }

    #[test]
    fn test_vampiric_heals_monster() {
        let mut p = player();
        let mut m = monster();
        m.modifiers = vec![Modifier::Vampiric];
        m.hp = 10;
        let mut state = CombatState::new(CombatantStats::from_player(&p));
        let report = monster_turn(&mut p, &mut m, &mut state, &mut StepRng::new(0, 0));
        assert_eq!(report.damage, 1);
        assert_eq!(report.monster_healed, 10);
        assert_eq!(m.hp, 20);
    }

    #[test]
    fn test_hp_stays_in_bounds_over_random_fights() {
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        for _ in 0..50 {
            let mut p = player();
            let mut m = monster();
            m.attack = 60;
            m.modifiers = vec![Modifier::Multistrike, Modifier::Summoner, Modifier::Regenerating];
            let (mut state, _) = start_of_combat(&mut p, &mut m, &mut rng);
            for _ in 0..200 {
                player_turn(&mut p, &mut m, &mut state, &mut rng);
                assert!(m.hp <= m.max_hp);
                if m.is_dead() {
                    break;
                }
                monster_turn(&mut p, &mut m, &mut state, &mut rng);
                assert!(p.current_hp <= p.max_hp);
                if p.is_dead() {
                    break;
                }
            }
        }
    }

    #[test]
    fn test_heal_without_potions_leaves_state() {
        let mut p = player();
        p.potions = 0;
        p.current_hp = 50;
        let before = p.clone();
        let err = heal(&mut p, &monster(), &mut StepRng::new(0, 0)).unwrap_err();
        assert!(matches!(err, GameError::NoPotions));
        assert_eq!(p, before);
    }

    #[test]
    fn test_heal_at_full_hp_is_rejected() {
        let mut p = player();
        assert!(matches!(
            heal(&mut p, &monster(), &mut StepRng::new(0, 0)),
            Err(GameError::FullHealth)
        ));
        assert_eq!(p.potions, 10);
    }

    #[test]
    fn test_heal_with_cleric_and_divine_overheal() {
        let mut p = player();
        p.current_hp = 90;
        let mut boot = Boot::new(1, "Sandals".to_string(), 10);
        boot.passive = Some(BootPassive::Cleric);
        boot.passive_lvl = 1;
        p.loadout.equip(Equipment::Boot(boot));
        let mut helmet = Helmet::new(1, "Halo".to_string(), 10);
        helmet.passive = Some(HelmetPassive::Divine);
        helmet.passive_lvl = 2;
        p.loadout.equip(Equipment::Helmet(helmet));
        let report = heal(&mut p, &monster(), &mut StepRng::new(0, 0)).unwrap();
        // 100 × 0.4 + 1 = 41; 10 heals, 31 overheal × 2 ward
        assert_eq!(report.healed, 10);
        assert_eq!(report.ward_gained, 62);
        assert_eq!(p.current_hp, 100);
        assert_eq!(p.potions, 9);
    }

    #[test]
    fn test_blighted_halves_heal() {
        let mut p = player();
        p.current_hp = 10;
        let mut m = monster();
        m.modifiers = vec![Modifier::Blighted];
        let report = heal(&mut p, &m, &mut StepRng::new(0, 0)).unwrap();
        assert_eq!(report.healed, 15);
    }

    #[test]
    fn test_defeat_penalty() {
        let mut p = player();
        p.exp = 1_234;
        p.current_hp = 0;
        p.combat_ward = 10;
        assert_eq!(resolve_defeat(&mut p), 123);
        assert_eq!(p.exp, 1_111);
        assert_eq!(p.current_hp, 1);
        assert_eq!(p.combat_ward, 0);
    }
}
