//! Pure combat formulas shared by the engine and the simulator.
//!
//! Rolls are drawn so that a zero raw draw is the player-favourable outcome,
//! matching [`chance`](crate::core::rng::chance): a hit roll of 0 raw reads as 100.

use crate::core::constants::*;
use crate::core::rng::{randint, uniform};
use rand::Rng;

/// Player hit roll in `0..=100`, higher is better.
pub fn hit_roll(rng: &mut impl Rng) -> u32 {
    100 - rng.gen_range(0..=100u32)
}

/// Crit roll in `0..=100`; a crit needs it to beat the crit target.
pub fn crit_roll(rng: &mut impl Rng) -> u32 {
    rng.gen_range(0..=100u32)
}

/// Player hit chance in percent.
///
/// Centred on 60% for an even attack/defence match, moving up to 30 points
/// either way as the balance tips.
pub fn player_hit_chance_pct(attack: u64, monster_defence: u64) -> f64 {
    let total = attack + monster_defence;
    if total == 0 {
        return PLAYER_HIT_BASE_PERCENT;
    }
    let balance = (attack as f64 - monster_defence as f64) / total as f64;
    PLAYER_HIT_BASE_PERCENT + PLAYER_HIT_SPAN_PERCENT * balance
}

/// # Arguments
/// * `roll` - Hit roll after floors and luck adjustments
/// * `bonus` - Flat accuracy bonus, negative under evasive modifiers
/// * `hit_chance_pct` - From [`player_hit_chance_pct`]
/// * `multiplier` - Damage multiplier; zero forces a miss
pub fn is_player_hit(roll: u32, bonus: i64, hit_chance_pct: f64, multiplier: f64) -> bool {
    multiplier > 0.0 && (i64::from(roll) + bonus) as f64 >= 100.0 - hit_chance_pct
}

pub fn is_crit(roll: u32, crit_target: u32, crit_bonus: u32, immune: bool) -> bool {
    !immune && roll > crit_target.saturating_sub(crit_bonus)
}

/// Crit damage before the turn multiplier.
///
/// `random(crit_min, atk) × 2 × crit_scale`, where `crit_min` rises with deftness.
pub fn crit_damage(rng: &mut impl Rng, attack: u64, deftness: u32, crit_scale: f64) -> u64 {
    let min_fraction = CRIT_MIN_FRACTION + 0.05 * f64::from(deftness);
    let crit_min = ((attack as f64 * min_fraction) as u64).min(attack);
    let base = randint(rng, crit_min, attack);
    (base as f64 * CRIT_MULTIPLIER * crit_scale) as u64
}

/// Regular hit damage before the turn multiplier.
///
/// Adroit and the sparking line raise the floor, the burning line raises the
/// ceiling, echo adds a flat share on top.
pub fn hit_damage(
    rng: &mut impl Rng,
    attack: u64,
    adroit: u32,
    sparking: Option<u8>,
    burning: Option<u8>,
    echo: Option<u8>,
) -> u64 {
    let atk = attack as f64;
    let tier_share = |tier: Option<u8>| tier.map_or(0.0, |t| WEAPON_LINE_STEP * (f64::from(t) + 1.0));
    let max = (atk * (1.0 + tier_share(burning))) as u64;
    let min = (1.0 + atk * (0.05 * f64::from(adroit) + tier_share(sparking))) as u64;
    let base = randint(rng, min.min(max.max(1)), max.max(1));
    let echo_share = echo.map_or(0.0, |t| 0.10 * (f64::from(t) + 1.0));
    base + (base as f64 * echo_share) as u64
}

/// Damage the poisonous line deals on a miss.
pub fn poison_damage(attack: u64, tier: u8) -> u64 {
    (attack as f64 * WEAPON_LINE_STEP * (f64::from(tier) + 1.0)) as u64
}

/// Base probability that a monster lands its attack.
pub fn calculate_monster_hit_chance(monster_attack: u64, player_defence: u64) -> f64 {
    let total = monster_attack + player_defence;
    if total == 0 {
        return MONSTER_HIT_BASE;
    }
    let balance = (monster_attack as f64 - player_defence as f64) / total as f64;
    (MONSTER_HIT_BASE + MONSTER_HIT_SPAN * balance).clamp(MONSTER_HIT_RANGE.0, MONSTER_HIT_RANGE.1)
}

/// Raw monster damage before modifiers and mitigation.
///
/// A level-banded jitter plus a share of the attack that gets past defence.
pub fn calculate_monster_damage(
    rng: &mut impl Rng,
    monster_attack: u64,
    monster_level: u32,
    player_defence: u64,
) -> u64 {
    let jitter = randint(rng, 1, u64::from(monster_level / 10 + 3));
    let excess = monster_attack.saturating_sub(player_defence) as f64;
    jitter + (excess * uniform(rng, MONSTER_DAMAGE_SPREAD.0, MONSTER_DAMAGE_SPREAD.1)) as u64
}

/// Percent then flat reduction. PDR is capped at 80%.
pub fn mitigate(damage: u64, pdr: f64, fdr: u64) -> u64 {
    let pdr = pdr.clamp(0.0, PDR_CAP);
    let reduced = (damage as f64 * (100.0 - pdr) / 100.0) as u64;
    reduced.saturating_sub(fdr)
}

/// Potion heal before Blighted and overheal handling.
pub fn heal_amount(rng: &mut impl Rng, max_hp: u64, cleric: u32, apothecary_workers: u32) -> u64 {
    let fraction = HEAL_BASE_FRACTION + HEAL_CLERIC_STEP * f64::from(cleric);
    let base = max_hp as f64 * fraction;
    let jitter = randint(rng, HEAL_JITTER.0, HEAL_JITTER.1) as f64;
    let apothecary = HEAL_APOTHECARY_FACTOR * f64::from(apothecary_workers);
    (base + jitter + apothecary) as u64
}

/// Share of `amount` given by `percent_per_level × level`.
pub fn level_share(amount: u64, percent_per_level: f64, level: u32) -> u64 {
    (amount as f64 * percent_per_level * f64::from(level) / 100.0) as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::mock::StepRng;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_step_rng_rolls_are_favourable() {
        let mut rng = StepRng::new(0, 0);
        assert_eq!(hit_roll(&mut rng), 100);
        assert_eq!(crit_roll(&mut rng), 0);
    }

    #[test]
    fn test_player_hit_chance_balance() {
        assert_eq!(player_hit_chance_pct(10, 10), 60.0);
        assert_eq!(player_hit_chance_pct(0, 0), 60.0);
        assert!((player_hit_chance_pct(30, 0) - 90.0).abs() < 1e-9);
        assert!((player_hit_chance_pct(0, 30) - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_hit_requires_positive_multiplier() {
        assert!(is_player_hit(50, 0, 60.0, 1.0));
        assert!(!is_player_hit(39, 0, 60.0, 1.0));
        assert!(!is_player_hit(100, 0, 60.0, 0.0));
        assert!(is_player_hit(30, 10, 60.0, 1.0));
    }

    #[test]
    fn test_crit_threshold_and_immunity() {
        assert!(is_crit(96, 95, 0, false));
        assert!(!is_crit(95, 95, 0, false));
        assert!(is_crit(91, 95, 5, false));
        assert!(!is_crit(100, 95, 0, true));
    }

    #[test]
    fn test_hit_damage_bounds() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..200 {
            let dmg = hit_damage(&mut rng, 50, 0, None, None, None);
            assert!((1..=50).contains(&dmg));
            let burning = hit_damage(&mut rng, 50, 0, None, Some(4), None);
            assert!(burning <= 70);
        }
        let mut step = StepRng::new(0, 0);
        assert_eq!(hit_damage(&mut step, 30, 0, None, None, None), 1);
        assert_eq!(hit_damage(&mut step, 100, 2, None, None, None), 11);
    }

    #[test]
    fn test_crit_damage_doubles() {
        let mut rng = StepRng::new(0, 0);
        assert_eq!(crit_damage(&mut rng, 100, 0, 1.0), 100);
        assert_eq!(crit_damage(&mut rng, 100, 2, 1.0), 120);
    }

    #[test]
    fn test_monster_hit_chance_clamped() {
        assert_eq!(calculate_monster_hit_chance(0, 0), 0.5);
        assert!((calculate_monster_hit_chance(1_000, 0) - 0.8).abs() < 1e-9);
        assert!((calculate_monster_hit_chance(0, 1_000) - 0.2).abs() < 1e-9);
        assert!(calculate_monster_hit_chance(1_000_000, 1) <= 0.8);
    }

    #[test]
    fn test_monster_damage_floor() {
        let mut rng = StepRng::new(0, 0);
        assert_eq!(calculate_monster_damage(&mut rng, 10, 10, 20), 1);
        assert_eq!(calculate_monster_damage(&mut rng, 40, 10, 20), 11);
    }

    #[test]
    fn test_mitigation_caps_pdr() {
        assert_eq!(mitigate(100, 20.0, 5), 75);
        assert_eq!(mitigate(100, 95.0, 0), 20);
        assert_eq!(mitigate(10, 0.0, 50), 0);
    }

    #[test]
    fn test_heal_amount() {
        let mut rng = StepRng::new(0, 0);
        assert_eq!(heal_amount(&mut rng, 100, 0, 0), 31);
        assert_eq!(heal_amount(&mut rng, 100, 2, 10), 53);
    }
}
