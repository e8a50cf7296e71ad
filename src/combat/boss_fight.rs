//! Multi-phase boss encounters run as a chain of combat sessions.
//!
//! The door costs the entry fee once. Each phase is a fresh monster with
//! start-of-combat applied again; the player's HP carries over. Rewards,
//! the boss drop table and the epilogue are granted after the last phase.

use super::session::{Action, CombatSession, Outcome, SessionSettings, Snapshot, Step};
use crate::character::{Currency, Player};
use crate::core::{GameError, Result};
use crate::items::EquipmentSlot;
use crate::monsters::generation::generate_boss_phase;
use crate::monsters::{BossEncounter, Epilogue, SoulCoreChoice};
use crate::rewards::{grant_victory, VictoryRewards};
use rand::Rng;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BossStatus {
    AwaitingDoor,
    InPhase(usize),
    /// Won; Lucifer still owes the soul-core choice.
    AwaitingEpilogue,
    Won,
    Ended(Outcome),
}

#[derive(Debug, Clone, PartialEq)]
pub enum BossStep {
    Continue(Vec<Snapshot>),
    /// A phase fell; the next one has started.
    PhaseCleared { next_phase: usize, snapshot: Snapshot },
    Victory(Box<VictoryRewards>),
    Ended(Outcome),
}

#[derive(Debug, Clone)]
pub struct BossFight {
    encounter: BossEncounter,
    settings: SessionSettings,
    status: BossStatus,
    session: Option<CombatSession>,
    /// Pending buckets from cleared phases; start-of-combat clears the player's.
    carried_xp: u64,
    carried_gold: u64,
}

impl BossFight {
    pub fn new(encounter: BossEncounter, settings: SessionSettings) -> Self {
        Self {
            encounter,
            settings,
            status: BossStatus::AwaitingDoor,
            session: None,
            carried_xp: 0,
            carried_gold: 0,
        }
    }

    pub fn encounter(&self) -> BossEncounter {
        self.encounter
    }

    pub fn status(&self) -> BossStatus {
        self.status
    }

    pub fn session(&self) -> Option<&CombatSession> {
        self.session.as_ref()
    }

    pub fn session_mut(&mut self) -> Option<&mut CombatSession> {
        self.session.as_mut()
    }

    /// Pays the entry cost and starts the first phase.
    pub fn accept_door(&mut self, player: &mut Player, rng: &mut impl Rng) -> Result<Snapshot> {
        if self.status != BossStatus::AwaitingDoor {
            return Err(GameError::InvalidAction("the door is already open".into()));
        }
        self.encounter.charge_entry(&mut player.wallet)?;
        info!(user = player.user_id, boss = self.encounter.name(), "boss door accepted");
        self.start_phase(player, 0, rng)
    }

    /// Walks away from the door at no cost.
    pub fn decline_door(&mut self) -> Result<()> {
        if self.status != BossStatus::AwaitingDoor {
            return Err(GameError::InvalidAction("the fight has already begun".into()));
        }
        self.status = BossStatus::Ended(Outcome::Fled);
        Ok(())
    }

    fn start_phase(&mut self, player: &mut Player, index: usize, rng: &mut impl Rng) -> Result<Snapshot> {
        let descriptor = self.encounter.phase(index).ok_or_else(|| {
            GameError::Invariant(format!("{} has no phase {index}", self.encounter.name()))
        })?;
        let monster = generate_boss_phase(player, descriptor, rng);
        info!(
            user = player.user_id,
            boss = self.encounter.name(),
            phase = index,
            monster = %monster.name,
            hp = monster.max_hp,
            "boss phase started"
        );
        let (session, snapshot) = CombatSession::start(player, monster, self.settings, rng);
        self.session = Some(session);
        self.status = BossStatus::InPhase(index);
        Ok(snapshot)
    }

    pub fn act<R, H>(&mut self, player: &mut Player, action: Action, held: H, rng: &mut R) -> Result<BossStep>
    where
        R: Rng,
        H: Fn(EquipmentSlot) -> usize,
    {
        let BossStatus::InPhase(index) = self.status else {
            return Err(GameError::InvalidAction("no boss phase in progress".into()));
        };
        let session = self
            .session
            .as_mut()
            .ok_or_else(|| GameError::Invariant("boss phase without a session".into()))?;

        match session.act(player, action, rng)? {
            Step::Continue(snapshots) => Ok(BossStep::Continue(snapshots)),
            Step::Finished(Outcome::Victory) => {
                self.carried_xp += player.pending_equilibrium_xp;
                self.carried_gold += player.pending_plunder_gold;
                let next_phase = index + 1;
                if next_phase < self.encounter.phases().len() {
                    let snapshot = self.start_phase(player, next_phase, rng)?;
                    return Ok(BossStep::PhaseCleared {
                        next_phase,
                        snapshot,
                    });
                }
                Ok(BossStep::Victory(Box::new(self.conclude(player, held, rng)?)))
            }
            Step::Finished(outcome) => {
                self.status = BossStatus::Ended(outcome);
                self.session = None;
                info!(user = player.user_id, boss = self.encounter.name(), ?outcome, "boss fight lost");
                Ok(BossStep::Ended(outcome))
            }
        }
    }

    fn conclude<R, H>(&mut self, player: &mut Player, held: H, rng: &mut R) -> Result<VictoryRewards>
    where
        R: Rng,
        H: Fn(EquipmentSlot) -> usize,
    {
        let session = self
            .session
            .take()
            .ok_or_else(|| GameError::Invariant("boss victory without a session".into()))?;
        player.pending_equilibrium_xp = self.carried_xp;
        player.pending_plunder_gold = self.carried_gold;
        let rewards = grant_victory(player, &session.monster, Some(self.encounter), held, rng);

        self.status = match self.encounter.epilogue() {
            Epilogue::SoulCoreChoice => BossStatus::AwaitingEpilogue,
            Epilogue::VoidKey => {
                player.wallet.add(Currency::VoidKeys, 1);
                BossStatus::Won
            }
            Epilogue::None => BossStatus::Won,
        };
        info!(user = player.user_id, boss = self.encounter.name(), "boss defeated");
        Ok(rewards)
    }

    /// Applies Lucifer's soul-core choice.
    pub fn resolve_epilogue(&mut self, player: &mut Player, choice: SoulCoreChoice) -> Result<()> {
        if self.status != BossStatus::AwaitingEpilogue {
            return Err(GameError::InvalidAction("no epilogue is pending".into()));
        }
        choice.apply(player);
        self.status = BossStatus::Won;
        info!(user = player.user_id, ?choice, "soul core resolved");
        Ok(())
    }
}
