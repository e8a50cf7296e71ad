//! Turn resolution, the per-fight session, boss chains and the activity lock.

pub mod activity;
pub mod boss_fight;
pub mod engine;
pub mod hooks;
pub mod math;
pub mod session;
pub mod types;

pub use activity::{global_registry, ActivityGuard, ActivityRegistry};
pub use boss_fight::{BossFight, BossStatus, BossStep};
pub use engine::{heal, monster_turn, player_turn, resolve_defeat, start_of_combat};
pub use hooks::{Effect, HookSlot, PassiveTable, Registration, Trigger};
pub use session::{Action, CombatSession, Outcome, SessionSettings, Snapshot, Step};
pub use types::*;
