use crate::items::EquipmentSlot;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GameError {
    #[error("User {0} is not registered")]
    NotRegistered(u64),

    #[error("User {user_id} is busy: {activity}")]
    Busy { user_id: u64, activity: String },

    #[error("Not enough gold: need {needed}, have {have}")]
    InsufficientGold { needed: u64, have: u64 },

    #[error("Not enough {resource}: need {needed}, have {have}")]
    InsufficientMaterials {
        resource: String,
        needed: u64,
        have: u64,
    },

    #[error("Not enough {0}")]
    InsufficientCurrency(String),

    #[error("No potions left")]
    NoPotions,

    #[error("Already at full health")]
    FullHealth,

    #[error("{0:?} inventory is full")]
    InventoryFull(EquipmentSlot),

    #[error("Item {0} does not belong to this user")]
    NotOwned(u64),

    #[error("Item {0} is equipped")]
    ItemEquipped(u64),

    #[error("Item {0} no longer exists")]
    ItemNotFound(u64),

    #[error("No {0} attempts remaining")]
    NoAttemptsRemaining(&'static str),

    #[error("Passive is already at its maximum level")]
    PassiveMaxed,

    #[error("Item is not eligible: {0}")]
    Ineligible(String),

    #[error("Invalid target: {0}")]
    InvalidTarget(String),

    #[error("Action not allowed right now: {0}")]
    InvalidAction(String),

    #[error("Invariant violated: {0}")]
    Invariant(String),

    #[error("Malformed row: {0}")]
    MalformedRow(String),

    #[error("Snapshot is corrupt: {0}")]
    CorruptSnapshot(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl GameError {
    /// Precondition failures are shown to the player and leave state untouched.
    pub fn is_precondition(&self) -> bool {
        !matches!(
            self,
            GameError::Invariant(_)
                | GameError::MalformedRow(_)
                | GameError::CorruptSnapshot(_)
                | GameError::Io(_)
                | GameError::Serde(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, GameError>;
