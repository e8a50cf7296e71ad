//! Grindstone - combat, loot and crafting core for a chat-driven idle RPG.
//!
//! The core is transport-agnostic: a front end drives [`combat::CombatSession`]
//! or [`combat::BossFight`] with player actions and persists results through
//! the [`store`] repositories.

pub mod character;
pub mod combat;
pub mod core;
pub mod enhancement;
pub mod items;
pub mod monsters;
pub mod rewards;
pub mod store;
