//! Static monster templates, embedded from `data/monsters.json`.

use crate::core::constants::{TEMPLATE_LEVEL_BAND, TREASURE_TEMPLATE_LEVEL};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Deserialize;
use std::sync::OnceLock;

const MONSTERS_JSON: &str = include_str!("../../data/monsters.json");

static CATALOGUE: OnceLock<Vec<MonsterTemplate>> = OnceLock::new();

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MonsterTemplate {
    pub name: String,
    pub image: String,
    pub level: u32,
    pub flavor: String,
    pub species: String,
}

pub fn catalogue() -> &'static [MonsterTemplate] {
    CATALOGUE.get_or_init(|| match serde_json::from_str(MONSTERS_JSON) {
        Ok(rows) => rows,
        Err(e) => {
            tracing::error!("embedded monster catalogue is invalid: {e}");
            Vec::new()
        }
    })
}

/// Rows usable for ordinary encounters (not treasure, not boss phases).
fn normal_rows() -> impl Iterator<Item = &'static MonsterTemplate> {
    catalogue().iter().filter(|t| is_normal_level(t.level))
}

fn is_normal_level(level: u32) -> bool {
    level < 444
}

/// Samples a template within ±20 levels of `level`, falling back to the nearest row.
pub fn sample_normal(level: u32, rng: &mut impl Rng) -> Option<&'static MonsterTemplate> {
    let in_band: Vec<_> = normal_rows()
        .filter(|t| t.level.abs_diff(level) <= TEMPLATE_LEVEL_BAND)
        .collect();
    if let Some(t) = in_band.choose(rng) {
        return Some(t);
    }
    normal_rows().min_by_key(|t| t.level.abs_diff(level))
}

pub fn sample_treasure(rng: &mut impl Rng) -> Option<&'static MonsterTemplate> {
    let rows: Vec<_> = treasure_rows().collect();
    rows.choose(rng).copied()
}

fn treasure_rows() -> impl Iterator<Item = &'static MonsterTemplate> {
    catalogue().iter().filter(|t| t.level == TREASURE_TEMPLATE_LEVEL)
}

/// Names of every treasure template.
pub fn rare_pool() -> Vec<&'static str> {
    treasure_rows().map(|t| t.name.as_str()).collect()
}

/// Exact-level lookup for boss phases, preferring the row named after the phase.
pub fn boss_template(level: u32, name: &str) -> Option<&'static MonsterTemplate> {
    let mut at_level = catalogue().iter().filter(|t| t.level == level);
    catalogue()
        .iter()
        .find(|t| t.level == level && t.name == name)
        .or_else(|| at_level.next())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_catalogue_loads() {
        assert!(catalogue().len() > 40);
        assert!(rare_pool().len() >= 3);
    }

    #[test]
    fn test_normal_sample_stays_in_band() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for level in [1, 25, 60, 99] {
            for _ in 0..20 {
                let t = sample_normal(level, &mut rng).unwrap();
                assert!(t.level.abs_diff(level) <= TEMPLATE_LEVEL_BAND);
                assert!(t.level < 444);
            }
        }
    }

    #[test]
    fn test_far_level_falls_back_to_nearest() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let t = sample_normal(400, &mut rng).unwrap();
        let highest = normal_rows().map(|t| t.level).max().unwrap();
        assert_eq!(t.level, highest);
    }

    #[test]
    fn test_treasure_rows_are_level_999() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let t = sample_treasure(&mut rng).unwrap();
        assert_eq!(t.level, 999);
    }

    #[test]
    fn test_boss_lookup_by_exact_level_and_name() {
        let t = boss_template(666, "Lucifer, Enraged").unwrap();
        assert_eq!(t.name, "Lucifer, Enraged");
        assert_eq!(boss_template(666, "Unknown").unwrap().level, 666);
        assert!(boss_template(123, "Nobody").is_none());
    }
}
