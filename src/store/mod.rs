//! Persistence: positional rows, the repository facade and its in-memory backend.

pub mod memory;
pub mod repository;
pub mod row;
pub mod snapshot;
pub mod user_row;

pub use memory::MemoryStore;
pub use repository::{CompanionRepository, EquipmentRepository, SkillRepository, UserRepository};
pub use row::{flag, Row, RowReader};
pub use user_row::{user_from_row, user_to_row, USER_COLUMNS};
