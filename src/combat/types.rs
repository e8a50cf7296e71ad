use crate::character::Player;
use crate::core::constants::COMBAT_LOG_CAPACITY;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// The player's numbers for one combat, built from base stats and gear.
///
/// Start-of-combat effects write here, never to the persisted player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatantStats {
    pub attack: u64,
    pub defence: u64,
    pub pdr: u32,
    pub fdr: u32,
    pub block: u32,
    pub evasion: u32,
    /// Flat crit bonus from the accessory.
    pub crit: u32,
    pub ward_percent: u32,
}

impl CombatantStats {
    pub fn from_player(player: &Player) -> Self {
        let gear = &player.loadout;
        Self {
            attack: player.total_attack(),
            defence: player.total_defence(),
            pdr: gear.pdr(),
            fdr: gear.fdr(),
            block: gear.block(),
            evasion: gear.evasion(),
            crit: gear.accessory_crit(),
            ward_percent: gear.ward_percent(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatLogEntry {
    pub message: String,
    pub is_crit: bool,
    pub is_player_action: bool,
}

/// Everything a combat needs besides the player and monster themselves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatState {
    pub stats: CombatantStats,
    /// Set by Impenetrable and Unbreakable.
    pub crit_immune: bool,
    pub turns: u32,
    pub combat_log: VecDeque<CombatLogEntry>,
}

impl CombatState {
    pub fn new(stats: CombatantStats) -> Self {
        Self {
            stats,
            crit_immune: false,
            turns: 0,
            combat_log: VecDeque::with_capacity(COMBAT_LOG_CAPACITY),
        }
    }

    pub fn add_log_entry(&mut self, message: String, is_crit: bool, is_player_action: bool) {
        if self.combat_log.len() >= COMBAT_LOG_CAPACITY {
            self.combat_log.pop_front();
        }
        self.combat_log.push_back(CombatLogEntry {
            message,
            is_crit,
            is_player_action,
        });
    }
}

/// Which start-of-combat effects fired, in firing order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StartReport {
    pub ward: u64,
    pub triggered: Vec<&'static str>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlayerTurnReport {
    pub hit: bool,
    pub crit: bool,
    pub multiplier: f64,
    /// Damage dealt to the monster, including poison on a miss.
    pub damage: u64,
    pub ward_gained: u64,
    pub leeched: u64,
    pub time_lord_saved: bool,
    pub culled: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MonsterTurnReport {
    pub invulnerable: bool,
    pub hit: bool,
    pub blocked: bool,
    pub dodged: bool,
    /// Total damage after mitigation, split across ward and HP.
    pub damage: u64,
    pub ward_absorbed: u64,
    pub hp_lost: u64,
    pub reflected: u64,
    pub ward_broken: bool,
    pub monster_healed: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HealReport {
    pub healed: u64,
    pub ward_gained: u64,
}
