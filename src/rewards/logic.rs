use super::drops::{
    roll_boss_drops, roll_elemental_drops, roll_gear_drop, roll_pet_capture, roll_special_drops,
    GearDrop,
};
use crate::character::{apply_level_ups, Companion, Currency, LevelUp, Player};
use crate::combat::hooks::{Effect, PassiveTable, Trigger};
use crate::core::constants::*;
use crate::core::rng::{chance, uniform};
use crate::items::{AccessoryPassive, ArmorPassive, BootPassive, EquipmentSlot};
use crate::monsters::{BossEncounter, Monster};
use rand::Rng;
use tracing::info;

/// Base experience before passives: doubled at low level.
pub fn calculate_xp(player_level: u32, monster: &Monster) -> u64 {
    if monster.is_treasure {
        return 0;
    }
    let multiplier = if player_level <= LOW_LEVEL_XP_CUTOFF {
        LOW_LEVEL_XP_MULTIPLIER
    } else {
        XP_MULTIPLIER
    };
    (monster.xp as f64 * multiplier) as u64
}

/// How far above the player the monster sits, in tens of levels.
fn reward_scale(player: &Player, monster: &Monster) -> f64 {
    if monster.is_treasure {
        f64::from(player.level) / 10.0
    } else {
        (f64::from(monster.level) - f64::from(player.level)).max(0.0) / 10.0
    }
}

/// Base gold before passives and the plunder bucket.
pub fn calculate_gold(player: &Player, monster: &Monster, rng: &mut impl Rng) -> u64 {
    let exponent = uniform(rng, GOLD_EXPONENT.0, GOLD_EXPONENT.1);
    let mut gold = f64::from(monster.level).powf(exponent)
        * (1.0 + reward_scale(player, monster).powf(1.3));
    let rarity = player.total_rarity();
    if rarity > 0 {
        gold *= 1.5 + f64::from(rarity) / 100.0;
    }
    gold as u64 + GOLD_FLAT_BONUS
}

/// On-kill passive levels read from the loadout.
#[derive(Debug, Clone, Copy, Default)]
struct KillPassives {
    unlimited_wealth: bool,
    everlasting_blessing: bool,
    prosper: u32,
    infinite_wisdom: u32,
    thrill_seeker: u32,
}

impl KillPassives {
    fn read(player: &Player) -> Self {
        let mut found = Self::default();
        for effect in PassiveTable::build(&player.loadout).fires(Trigger::OnKill) {
            match effect {
                Effect::Armor(ArmorPassive::UnlimitedWealth) => found.unlimited_wealth = true,
                Effect::Armor(ArmorPassive::EverlastingBlessing) => found.everlasting_blessing = true,
                Effect::Accessory(AccessoryPassive::Prosper, lvl) => found.prosper = lvl,
                Effect::Accessory(AccessoryPassive::InfiniteWisdom, lvl) => found.infinite_wisdom = lvl,
                Effect::Boot(BootPassive::ThrillSeeker, lvl) => found.thrill_seeker = lvl,
                _ => {}
            }
        }
        found
    }
}

/// Everything a victory granted. Gear is returned for the caller to persist.
#[derive(Debug, Clone, PartialEq)]
pub struct VictoryRewards {
    pub xp: u64,
    pub gold: u64,
    pub currencies: Vec<(Currency, u64)>,
    pub potions: u32,
    pub gear: Option<GearDrop>,
    pub companion: Option<Companion>,
    pub level_ups: Vec<LevelUp>,
}

/// Applies the rewards of a won fight to the player.
///
/// Runs the experience and gold formulas with their on-kill passives, rolls
/// every drop table, captures a companion, then resolves level-ups. The
/// pending combat buckets are drained into the totals and cleared.
pub fn grant_victory(
    player: &mut Player,
    monster: &Monster,
    boss: Option<BossEncounter>,
    held: impl Fn(EquipmentSlot) -> usize,
    rng: &mut impl Rng,
) -> VictoryRewards {
    let passives = KillPassives::read(player);

    let mut xp = calculate_xp(player.level, monster);
    if xp > 0 && chance(rng, 0.05 * f64::from(passives.infinite_wisdom)) {
        xp *= 2;
    }
    xp += player.pending_equilibrium_xp;

    let mut gold = calculate_gold(player, monster, rng);
    if chance(rng, 0.10 * f64::from(passives.prosper)) {
        gold *= 2;
    }
    if passives.unlimited_wealth && chance(rng, UNLIMITED_WEALTH_CHANCE) {
        gold = (gold as f64 * UNLIMITED_WEALTH_MULTIPLIER) as u64;
    }
    gold += player.pending_plunder_gold;

    let mut currencies = roll_special_drops(monster, passives.thrill_seeker, rng);
    currencies.extend(roll_elemental_drops(monster, rng));
    if let Some(encounter) = boss {
        currencies.extend(roll_boss_drops(encounter, rng));
    }

    let potions = u32::from(passives.everlasting_blessing && chance(rng, EVERLASTING_BLESSING_CHANCE));
    let gear = roll_gear_drop(player, monster, held, rng);
    let companion = roll_pet_capture(player, monster, rng);

    player.exp += xp;
    player.wallet.gold += gold;
    for (currency, amount) in &currencies {
        player.wallet.add(*currency, *amount);
    }
    if let Some(GearDrop::Rune(rune)) = &gear {
        player.wallet.add(*rune, 1);
    }
    player.potions += potions;
    if let Some(pet) = &companion {
        player.companions.push(pet.clone());
    }
    player.reset_combat_state();
    let level_ups = apply_level_ups(player, rng);

    info!(
        user = player.user_id,
        monster = %monster.name,
        xp,
        gold,
        drops = currencies.len(),
        level = player.level,
        "victory rewards granted"
    );
    VictoryRewards {
        xp,
        gold,
        currencies,
        potions,
        gear,
        companion,
        level_ups,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::{Accessory, Armor, Equipment};
    use rand::rngs::mock::StepRng;

    fn player(level: u32) -> Player {
        let mut p = Player::new(3, "Wren");
        p.level = level;
        p
    }

    fn monster(level: u32, xp: u64) -> Monster {
        let mut m = Monster::blank(level);
        m.name = "Goblin".to_string();
        m.species = "Goblin".to_string();
        m.xp = xp;
        m
    }

    #[test]
    fn test_xp_multiplier_by_level() {
        assert_eq!(calculate_xp(20, &monster(20, 100)), 200);
        assert_eq!(calculate_xp(21, &monster(20, 100)), 130);
        let mut treasure = monster(20, 100);
        treasure.is_treasure = true;
        assert_eq!(calculate_xp(5, &treasure), 0);
    }

    #[test]
    fn test_gold_formula_at_minimum_exponent() {
        let mut rng = StepRng::new(0, 0);
        // 10^1.4 = 25.1, no scale, +20
        assert_eq!(calculate_gold(&player(10), &monster(10, 0), &mut rng), 45);
        // 20^1.4 = 66.3, scale 1.0 doubles it, +20
        assert_eq!(calculate_gold(&player(10), &monster(20, 0), &mut rng), 152);
    }

    #[test]
    fn test_rarity_boosts_gold() {
        let mut p = player(10);
        p.rarity = 50;
        let gold = calculate_gold(&p, &monster(10, 0), &mut StepRng::new(0, 0));
        // 25.1 × 2.0 + 20
        assert_eq!(gold, 70);
    }

    #[test]
    fn test_victory_drains_pending_buckets() {
        let mut p = player(30);
        p.pending_equilibrium_xp = 7;
        p.pending_plunder_gold = 11;
        let m = monster(10, 100);
        let mut rng = StepRng::new(0, 0);
        let rewards = grant_victory(&mut p, &m, None, |_| 0, &mut rng);
        assert_eq!(rewards.xp, 137);
        assert_eq!(rewards.gold, 56);
        assert_eq!(p.pending_equilibrium_xp, 0);
        assert_eq!(p.pending_plunder_gold, 0);
        assert_eq!(p.wallet.gold, 56);
    }

    #[test]
    fn test_kill_passives_multiply() {
        let mut p = player(30);
        let mut armor = Armor::new(3, "Gilded".to_string(), 30);
        armor.passive = Some(ArmorPassive::UnlimitedWealth);
        p.loadout.equip(Equipment::Armor(armor));
        let mut accessory = Accessory::new(3, "Sigil".to_string(), 30);
        accessory.passive = Some(AccessoryPassive::InfiniteWisdom);
        accessory.passive_lvl = 2;
        p.loadout.equip(Equipment::Accessory(accessory));
        let rewards = grant_victory(&mut p, &monster(10, 100), None, |_| 0, &mut StepRng::new(0, 0));
        assert_eq!(rewards.xp, 260);
        assert_eq!(rewards.gold, 225);
    }

    #[test]
    fn test_treasure_victory_grants_curio() {
        let mut p = player(30);
        let mut m = monster(30, 100);
        m.is_treasure = true;
        let rewards = grant_victory(&mut p, &m, None, |_| 0, &mut StepRng::new(0, 0));
        assert_eq!(rewards.xp, 0);
        assert!(p.wallet.curios >= 1);
        assert!(rewards.gear.is_none());
    }

    #[test]
    fn test_boss_victory_adds_table() {
        let mut p = player(30);
        let mut m = monster(60, 0);
        m.is_boss = true;
        let rewards = grant_victory(&mut p, &m, Some(BossEncounter::Gemini), |_| 0, &mut StepRng::new(0, 0));
        assert!(rewards.currencies.contains(&(Currency::PartnershipRunes, 1)));
        assert_eq!(p.wallet.partnership_runes, 1);
        assert_eq!(rewards.companion.map(|c| c.passive_tier), Some(3));
        assert_eq!(p.companions.len(), 1);
    }

    #[test]
    fn test_victory_levels_up() {
        let mut p = player(1);
        let rewards = grant_victory(&mut p, &monster(1, 10_000), None, |_| 0, &mut StepRng::new(0, 0));
        assert!(!rewards.level_ups.is_empty());
        assert!(p.level > 1);
    }
}
