//! The persisted player record plus its transient combat fields.

use super::companion::Companion;
use crate::core::constants::{
    DEFAULT_CRIT_TARGET, STARTING_ATTACK, STARTING_DEFENCE, STARTING_HP, STARTING_POTIONS,
};
use crate::core::{GameError, Result};
use crate::items::Loadout;
use serde::{Deserialize, Serialize};

/// Countable currencies held in the users table, one column each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Currency {
    RefinementRunes,
    PotentialRunes,
    Curios,
    DragonKey,
    AngelKey,
    ImbueRunes,
    SoulCores,
    VoidFrags,
    VoidKeys,
    ShatterRunes,
    BalanceFragment,
    PartnershipRunes,
    MagmaCore,
    LifeRoot,
    SpiritShard,
}

impl Currency {
    pub const ALL: [Currency; 15] = [
        Currency::RefinementRunes,
        Currency::PotentialRunes,
        Currency::Curios,
        Currency::DragonKey,
        Currency::AngelKey,
        Currency::ImbueRunes,
        Currency::SoulCores,
        Currency::VoidFrags,
        Currency::VoidKeys,
        Currency::ShatterRunes,
        Currency::BalanceFragment,
        Currency::PartnershipRunes,
        Currency::MagmaCore,
        Currency::LifeRoot,
        Currency::SpiritShard,
    ];

    /// Column name in the users table.
    pub fn column(&self) -> &'static str {
        match self {
            Currency::RefinementRunes => "refinement_runes",
            Currency::PotentialRunes => "potential_runes",
            Currency::Curios => "curios",
            Currency::DragonKey => "dragon_key",
            Currency::AngelKey => "angel_key",
            Currency::ImbueRunes => "imbue_runes",
            Currency::SoulCores => "soul_cores",
            Currency::VoidFrags => "void_frags",
            Currency::VoidKeys => "void_keys",
            Currency::ShatterRunes => "shatter_runes",
            Currency::BalanceFragment => "balance_fragment",
            Currency::PartnershipRunes => "partnership_runes",
            Currency::MagmaCore => "magma_core",
            Currency::LifeRoot => "life_root",
            Currency::SpiritShard => "spirit_shard",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wallet {
    pub gold: u64,
    pub refinement_runes: u64,
    pub potential_runes: u64,
    pub curios: u64,
    pub dragon_key: u64,
    pub angel_key: u64,
    pub imbue_runes: u64,
    pub soul_cores: u64,
    pub void_frags: u64,
    pub void_keys: u64,
    pub shatter_runes: u64,
    pub balance_fragment: u64,
    pub partnership_runes: u64,
    pub magma_core: u64,
    pub life_root: u64,
    pub spirit_shard: u64,
}

impl Wallet {
    pub fn get(&self, currency: Currency) -> u64 {
        match currency {
            Currency::RefinementRunes => self.refinement_runes,
            Currency::PotentialRunes => self.potential_runes,
            Currency::Curios => self.curios,
            Currency::DragonKey => self.dragon_key,
            Currency::AngelKey => self.angel_key,
            Currency::ImbueRunes => self.imbue_runes,
            Currency::SoulCores => self.soul_cores,
            Currency::VoidFrags => self.void_frags,
            Currency::VoidKeys => self.void_keys,
            Currency::ShatterRunes => self.shatter_runes,
            Currency::BalanceFragment => self.balance_fragment,
            Currency::PartnershipRunes => self.partnership_runes,
            Currency::MagmaCore => self.magma_core,
            Currency::LifeRoot => self.life_root,
            Currency::SpiritShard => self.spirit_shard,
        }
    }

    fn slot_mut(&mut self, currency: Currency) -> &mut u64 {
        match currency {
            Currency::RefinementRunes => &mut self.refinement_runes,
            Currency::PotentialRunes => &mut self.potential_runes,
            Currency::Curios => &mut self.curios,
            Currency::DragonKey => &mut self.dragon_key,
            Currency::AngelKey => &mut self.angel_key,
            Currency::ImbueRunes => &mut self.imbue_runes,
            Currency::SoulCores => &mut self.soul_cores,
            Currency::VoidFrags => &mut self.void_frags,
            Currency::VoidKeys => &mut self.void_keys,
            Currency::ShatterRunes => &mut self.shatter_runes,
            Currency::BalanceFragment => &mut self.balance_fragment,
            Currency::PartnershipRunes => &mut self.partnership_runes,
            Currency::MagmaCore => &mut self.magma_core,
            Currency::LifeRoot => &mut self.life_root,
            Currency::SpiritShard => &mut self.spirit_shard,
        }
    }

    pub fn add(&mut self, currency: Currency, amount: u64) {
        let slot = self.slot_mut(currency);
        *slot = slot.saturating_add(amount);
    }

    pub fn set(&mut self, currency: Currency, amount: u64) {
        *self.slot_mut(currency) = amount;
    }

    /// Checks that `amount` is affordable without spending it.
    pub fn require(&self, currency: Currency, amount: u64) -> Result<()> {
        if self.get(currency) < amount {
            return Err(GameError::InsufficientCurrency(format!(
                "{} (need {}, have {})",
                currency.column(),
                amount,
                self.get(currency)
            )));
        }
        Ok(())
    }

    pub fn spend(&mut self, currency: Currency, amount: u64) -> Result<()> {
        self.require(currency, amount)?;
        *self.slot_mut(currency) -= amount;
        Ok(())
    }

    pub fn require_gold(&self, amount: u64) -> Result<()> {
        if self.gold < amount {
            return Err(GameError::InsufficientGold {
                needed: amount,
                have: self.gold,
            });
        }
        Ok(())
    }

    pub fn spend_gold(&mut self, amount: u64) -> Result<()> {
        self.require_gold(amount)?;
        self.gold -= amount;
        Ok(())
    }
}

/// Tiered account-wide bonuses applied inside the damage pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Emblems {
    pub combat_dmg: u32,
    pub boss_dmg: u32,
    pub slayer_dmg: u32,
    pub slayer_def: u32,
    pub crit_dmg: u32,
    pub accuracy: u32,
    /// Species the slayer emblems apply to.
    pub slayer_species: Option<String>,
}

impl Emblems {
    pub fn slayer_matches(&self, species: &str) -> bool {
        self.slayer_species
            .as_deref()
            .is_some_and(|s| s.eq_ignore_ascii_case(species))
    }
}

/// Numeric player columns adjustable through `modify_stat`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stat {
    Level,
    Exp,
    Attack,
    Defence,
    CurrentHp,
    MaxHp,
    Ascension,
    Potions,
    PassivePoints,
    Rarity,
    CritTarget,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Row id in the users table.
    pub id: u64,
    pub user_id: u64,
    pub server_id: u64,
    pub name: String,
    pub url: String,
    pub ideology: String,
    pub level: u32,
    pub exp: u64,
    pub attack: u64,
    pub defence: u64,
    pub current_hp: u64,
    pub max_hp: u64,
    pub ascension: u32,
    pub potions: u32,
    pub rarity: u32,
    pub crit_target: u32,
    pub passive_points: u32,
    pub wallet: Wallet,
    pub emblems: Emblems,
    pub apothecary_workers: u32,
    pub curios_purchased_today: u32,
    pub last_rest: String,
    pub last_propagate: String,
    pub last_checkin: String,
    pub created_at: String,
    /// Unix timestamp of the last finished combat.
    pub last_combat: i64,

    pub loadout: Loadout,
    pub companions: Vec<Companion>,

    // Transient, reset at the start of every combat.
    #[serde(skip)]
    pub combat_ward: u64,
    #[serde(skip)]
    pub is_invulnerable_this_combat: bool,
    #[serde(skip)]
    pub pending_equilibrium_xp: u64,
    #[serde(skip)]
    pub pending_plunder_gold: u64,
}

impl Player {
    pub fn new(user_id: u64, name: impl Into<String>) -> Self {
        Self {
            id: 0,
            user_id,
            server_id: 0,
            name: name.into(),
            url: String::new(),
            ideology: String::new(),
            level: 1,
            exp: 0,
            attack: STARTING_ATTACK,
            defence: STARTING_DEFENCE,
            current_hp: STARTING_HP,
            max_hp: STARTING_HP,
            ascension: 0,
            potions: STARTING_POTIONS,
            rarity: 0,
            crit_target: DEFAULT_CRIT_TARGET,
            passive_points: 0,
            wallet: Wallet::default(),
            emblems: Emblems::default(),
            apothecary_workers: 0,
            curios_purchased_today: 0,
            last_rest: String::new(),
            last_propagate: String::new(),
            last_checkin: String::new(),
            created_at: chrono::Utc::now().to_rfc3339(),
            last_combat: 0,
            loadout: Loadout::new(),
            companions: Vec::new(),
            combat_ward: 0,
            is_invulnerable_this_combat: false,
            pending_equilibrium_xp: 0,
            pending_plunder_gold: 0,
        }
    }

    /// Clears every combat-only field.
    pub fn reset_combat_state(&mut self) {
        self.combat_ward = 0;
        self.is_invulnerable_this_combat = false;
        self.pending_equilibrium_xp = 0;
        self.pending_plunder_gold = 0;
    }

    pub fn total_attack(&self) -> u64 {
        self.attack + u64::from(self.loadout.gear_attack())
    }

    pub fn total_defence(&self) -> u64 {
        self.defence + u64::from(self.loadout.gear_defence())
    }

    pub fn total_rarity(&self) -> u32 {
        self.rarity + self.loadout.gear_rarity()
    }

    pub fn is_full_hp(&self) -> bool {
        self.current_hp >= self.max_hp
    }

    pub fn is_dead(&self) -> bool {
        self.current_hp == 0
    }

    pub fn clamp_hp(&mut self) {
        self.current_hp = self.current_hp.min(self.max_hp);
    }

    /// Applies a signed delta to a numeric column, saturating at zero.
    pub fn modify_stat(&mut self, stat: Stat, delta: i64) {
        fn shift64(value: &mut u64, delta: i64) {
            *value = value.saturating_add_signed(delta);
        }
        fn shift32(value: &mut u32, delta: i64) {
            let shifted = i64::from(*value).saturating_add(delta).clamp(0, i64::from(u32::MAX));
            *value = shifted as u32;
        }
        match stat {
            Stat::Level => shift32(&mut self.level, delta),
            Stat::Exp => shift64(&mut self.exp, delta),
            Stat::Attack => shift64(&mut self.attack, delta),
            Stat::Defence => shift64(&mut self.defence, delta),
            Stat::CurrentHp => shift64(&mut self.current_hp, delta),
            Stat::MaxHp => shift64(&mut self.max_hp, delta),
            Stat::Ascension => shift32(&mut self.ascension, delta),
            Stat::Potions => shift32(&mut self.potions, delta),
            Stat::PassivePoints => shift32(&mut self.passive_points, delta),
            Stat::Rarity => shift32(&mut self.rarity, delta),
            Stat::CritTarget => {
                shift32(&mut self.crit_target, delta);
                self.crit_target = self.crit_target.min(100);
            }
        }
        if matches!(stat, Stat::CurrentHp | Stat::MaxHp) {
            self.clamp_hp();
        }
    }

    pub fn active_companions(&self) -> impl Iterator<Item = &Companion> {
        self.companions.iter().filter(|c| c.is_active)
    }
}
