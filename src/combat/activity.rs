//! Process-wide record of which users are mid-activity.
//!
//! A user holds at most one activity at a time. [`ActivityRegistry::acquire`]
//! hands back a guard that frees the slot when dropped, so an early return or
//! a panic inside a fight never leaves the user stuck.

use crate::core::{GameError, Result};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, OnceLock};
use tracing::warn;

#[derive(Debug, Default)]
pub struct ActivityRegistry {
    active: Mutex<HashMap<u64, String>>,
}

impl ActivityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<u64, String>> {
        // A panic while holding the lock cannot leave the map half-written.
        self.active
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn acquire(&self, user_id: u64, activity: &str) -> Result<ActivityGuard<'_>> {
        let mut active = self.lock();
        if let Some(current) = active.get(&user_id) {
            warn!(user = user_id, current = %current, requested = activity, "rejected re-entry");
            return Err(GameError::Busy {
                user_id,
                activity: current.clone(),
            });
        }
        active.insert(user_id, activity.to_string());
        Ok(ActivityGuard {
            registry: self,
            user_id,
        })
    }

    pub fn current(&self, user_id: u64) -> Option<String> {
        self.lock().get(&user_id).cloned()
    }

    pub fn is_busy(&self, user_id: u64) -> bool {
        self.lock().contains_key(&user_id)
    }

    fn release(&self, user_id: u64) {
        self.lock().remove(&user_id);
    }
}

/// Frees the user's activity slot on drop.
#[derive(Debug)]
pub struct ActivityGuard<'a> {
    registry: &'a ActivityRegistry,
    user_id: u64,
}

impl ActivityGuard<'_> {
    pub fn user_id(&self) -> u64 {
        self.user_id
    }
}

impl Drop for ActivityGuard<'_> {
    fn drop(&mut self) {
        self.registry.release(self.user_id);
    }
}

/// The registry shared by every caller in the process.
pub fn global_registry() -> &'static ActivityRegistry {
    static REGISTRY: OnceLock<ActivityRegistry> = OnceLock::new();
    REGISTRY.get_or_init(ActivityRegistry::new)
}
