//! Shared constants, configuration, errors and the random source.

pub mod config;
pub mod constants;
pub mod error;
pub mod rng;

pub use config::CoreConfig;
pub use error::{GameError, Result};
pub use rng::{game_rng, GameRng};
