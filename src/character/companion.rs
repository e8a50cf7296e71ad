//! Companions: tamed monsters carried on the roster.
//!
//! Their passives are stored but not yet consulted by combat.

use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompanionPassive {
    Attack,
    Defence,
    Hp,
    Rarity,
    Crit,
    Ward,
}

impl CompanionPassive {
    pub const ALL: [CompanionPassive; 6] = [
        CompanionPassive::Attack,
        CompanionPassive::Defence,
        CompanionPassive::Hp,
        CompanionPassive::Rarity,
        CompanionPassive::Crit,
        CompanionPassive::Ward,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            CompanionPassive::Attack => "atk",
            CompanionPassive::Defence => "def",
            CompanionPassive::Hp => "hp",
            CompanionPassive::Rarity => "rarity",
            CompanionPassive::Crit => "crit",
            CompanionPassive::Ward => "ward",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|p| p.name().eq_ignore_ascii_case(name.trim()))
    }

    pub fn random(rng: &mut impl Rng) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }
}

pub const MAX_PASSIVE_TIER: u8 = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Companion {
    pub id: u64,
    pub user_id: u64,
    pub name: String,
    pub species: String,
    pub image: String,
    pub level: u32,
    pub exp: u64,
    pub passive_type: CompanionPassive,
    pub passive_tier: u8,
    pub is_active: bool,
    pub created_at: String,
}

impl Companion {
    pub fn new(
        user_id: u64,
        name: impl Into<String>,
        species: impl Into<String>,
        image: impl Into<String>,
        passive_type: CompanionPassive,
        passive_tier: u8,
    ) -> Self {
        Self {
            id: 0,
            user_id,
            name: name.into(),
            species: species.into(),
            image: image.into(),
            level: 1,
            exp: 0,
            passive_type,
            passive_tier: passive_tier.clamp(1, MAX_PASSIVE_TIER),
            is_active: false,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Combines two companions into one.
///
/// The result keeps the first parent's identity and the higher level. Equal
/// tiers step up one tier (capped at 3); otherwise the higher tier survives.
/// The passive type is drawn from either parent.
pub fn fuse(first: &Companion, second: &Companion, rng: &mut impl Rng) -> Companion {
    let passive_tier = if first.passive_tier == second.passive_tier {
        (first.passive_tier + 1).min(MAX_PASSIVE_TIER)
    } else {
        first.passive_tier.max(second.passive_tier)
    };
    let passive_type = if rng.gen_bool(0.5) {
        first.passive_type
    } else {
        second.passive_type
    };
    Companion {
        id: 0,
        user_id: first.user_id,
        name: first.name.clone(),
        species: first.species.clone(),
        image: first.image.clone(),
        level: first.level.max(second.level),
        exp: 0,
        passive_type,
        passive_tier,
        is_active: false,
        created_at: chrono::Utc::now().to_rfc3339(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn pet(tier: u8, level: u32) -> Companion {
        let mut c = Companion::new(1, "Ember", "Dragon", "ember.png", CompanionPassive::Attack, tier);
        c.level = level;
        c
    }

    #[test]
    fn test_tier_is_clamped() {
        assert_eq!(pet(0, 1).passive_tier, 1);
        assert_eq!(pet(9, 1).passive_tier, 3);
    }

    #[test]
    fn test_fuse_equal_tiers_steps_up() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let fused = fuse(&pet(1, 4), &pet(1, 9), &mut rng);
        assert_eq!(fused.passive_tier, 2);
        assert_eq!(fused.level, 9);
        assert!(!fused.is_active);
    }

    #[test]
    fn test_fuse_caps_at_tier_three() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        assert_eq!(fuse(&pet(3, 1), &pet(3, 1), &mut rng).passive_tier, 3);
        assert_eq!(fuse(&pet(1, 1), &pet(3, 1), &mut rng).passive_tier, 3);
    }

    #[test]
    fn test_passive_names_round_trip() {
        for p in CompanionPassive::ALL {
            assert_eq!(CompanionPassive::from_name(p.name()), Some(p));
        }
    }
}
