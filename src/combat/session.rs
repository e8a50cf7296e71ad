//! One fight between a player and a monster, driven one action at a time.
//!
//! The session owns the monster and the combat snapshot. The player is passed
//! into every call so the caller keeps ownership of the persisted record.

use super::engine::{heal, monster_turn, player_turn, resolve_defeat, start_of_combat};
use super::types::{CombatLogEntry, CombatState, StartReport};
use crate::character::Player;
use crate::core::constants::MAX_TURNS_PER_BATCH;
use crate::core::{CoreConfig, GameError, Result};
use crate::monsters::Monster;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Attack,
    Heal,
    Auto,
    GigaAuto,
    Flee,
    /// The interaction window closed without input.
    Timeout,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Victory,
    Defeat { exp_lost: u64 },
    Fled,
    TimedOut,
}

/// What the player sees after an action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub turn: u32,
    pub player_hp: u64,
    pub player_max_hp: u64,
    pub ward: u64,
    pub potions: u32,
    pub monster_name: String,
    pub monster_hp: u64,
    pub monster_max_hp: u64,
    pub log: Vec<CombatLogEntry>,
    pub allowed: Vec<Action>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Continue(Vec<Snapshot>),
    Finished(Outcome),
}

/// Session knobs taken from [`CoreConfig`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionSettings {
    pub timeout: Duration,
    pub auto_snapshot_every: u32,
    pub giga_snapshot_every: u32,
    pub auto_stop_hp_fraction: f64,
}

impl From<&CoreConfig> for SessionSettings {
    fn from(config: &CoreConfig) -> Self {
        let config = config.clone().sanitized();
        Self {
            timeout: Duration::from_secs(config.interaction_timeout_secs),
            auto_snapshot_every: config.auto_snapshot_every,
            giga_snapshot_every: config.giga_snapshot_every,
            auto_stop_hp_fraction: config.auto_stop_hp_fraction,
        }
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self::from(&CoreConfig::default())
    }
}

#[derive(Debug, Clone)]
pub struct CombatSession {
    /// Correlates every log line of one fight.
    pub id: Uuid,
    pub monster: Monster,
    pub state: CombatState,
    pub start_report: StartReport,
    settings: SessionSettings,
    outcome: Option<Outcome>,
}

enum Exchange {
    Ongoing,
    Over(Outcome),
}

impl CombatSession {
    /// Runs start-of-combat and returns the session with its first snapshot.
    pub fn start(
        player: &mut Player,
        mut monster: Monster,
        settings: SessionSettings,
        rng: &mut impl Rng,
    ) -> (Self, Snapshot) {
        let (state, start_report) = start_of_combat(player, &mut monster, rng);
        let session = Self {
            id: Uuid::new_v4(),
            monster,
            state,
            start_report,
            settings,
            outcome: None,
        };
        let snapshot = session.snapshot(player);
        (session, snapshot)
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn is_finished(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn timeout(&self) -> Duration {
        self.settings.timeout
    }

    pub fn allowed_actions(&self, player: &Player) -> Vec<Action> {
        let mut allowed = vec![Action::Attack];
        if player.potions > 0 && !player.is_full_hp() {
            allowed.push(Action::Heal);
        }
        allowed.extend([Action::Auto, Action::GigaAuto, Action::Flee]);
        allowed
    }

    pub fn snapshot(&self, player: &Player) -> Snapshot {
        Snapshot {
            turn: self.state.turns,
            player_hp: player.current_hp,
            player_max_hp: player.max_hp,
            ward: player.combat_ward,
            potions: player.potions,
            monster_name: self.monster.name.clone(),
            monster_hp: self.monster.hp,
            monster_max_hp: self.monster.max_hp,
            log: self.state.combat_log.iter().cloned().collect(),
            allowed: self.allowed_actions(player),
        }
    }

    pub fn act(&mut self, player: &mut Player, action: Action, rng: &mut impl Rng) -> Result<Step> {
        if self.outcome.is_some() {
            return Err(GameError::InvalidAction("combat already finished".into()));
        }
        debug!(session = %self.id, user = player.user_id, ?action, turn = self.state.turns, "combat action");

        let exchange = match action {
            Action::Attack => self.exchange(player, rng),
            Action::Heal => {
                heal(player, &self.monster, rng)?;
                self.monster_strikes(player, rng)
            }
            Action::Auto => return Ok(self.run_auto(player, self.settings.auto_snapshot_every, rng)),
            Action::GigaAuto => {
                return Ok(self.run_auto(player, self.settings.giga_snapshot_every, rng))
            }
            Action::Flee => Exchange::Over(Outcome::Fled),
            Action::Timeout => Exchange::Over(Outcome::TimedOut),
        };

        Ok(match exchange {
            Exchange::Ongoing => Step::Continue(vec![self.snapshot(player)]),
            Exchange::Over(outcome) => Step::Finished(self.finish(player, outcome)),
        })
    }

    /// Player turn followed by a monster turn if the monster survives.
    fn exchange(&mut self, player: &mut Player, rng: &mut impl Rng) -> Exchange {
        player_turn(player, &mut self.monster, &mut self.state, rng);
        if self.monster.is_dead() {
            return Exchange::Over(Outcome::Victory);
        }
        self.monster_strikes(player, rng)
    }

    fn monster_strikes(&mut self, player: &mut Player, rng: &mut impl Rng) -> Exchange {
        monster_turn(player, &mut self.monster, &mut self.state, rng);
        if self.monster.is_dead() {
            // Thorns or Volatile finished it.
            Exchange::Over(Outcome::Victory)
        } else if player.is_dead() {
            Exchange::Over(Outcome::Defeat { exp_lost: 0 })
        } else {
            Exchange::Ongoing
        }
    }

    /// Repeats exchanges until someone dies or HP drops to the stop threshold.
    fn run_auto(&mut self, player: &mut Player, every: u32, rng: &mut impl Rng) -> Step {
        let every = every.max(1);
        let stop_at = (player.max_hp as f64 * self.settings.auto_stop_hp_fraction) as u64;
        let mut snapshots = Vec::new();

        for exchanged in 1..=MAX_TURNS_PER_BATCH {
            if let Exchange::Over(outcome) = self.exchange(player, rng) {
                return Step::Finished(self.finish(player, outcome));
            }
            if player.current_hp <= stop_at {
                break;
            }
            if exchanged % every == 0 {
                snapshots.push(self.snapshot(player));
            }
        }
        let last = self.snapshot(player);
        if snapshots.last() != Some(&last) {
            snapshots.push(last);
        }
        Step::Continue(snapshots)
    }

    fn finish(&mut self, player: &mut Player, outcome: Outcome) -> Outcome {
        let outcome = match outcome {
            Outcome::Defeat { .. } => Outcome::Defeat {
                exp_lost: resolve_defeat(player),
            },
            Outcome::Victory => outcome,
            Outcome::Fled | Outcome::TimedOut => {
                player.reset_combat_state();
                outcome
            }
        };
        player.last_combat = chrono::Utc::now().timestamp();
        self.outcome = Some(outcome);
        info!(
            session = %self.id,
            user = player.user_id,
            monster = %self.monster.name,
            turns = self.state.turns,
            ?outcome,
            "combat finished"
        );
        outcome
    }
}
