//! Checksummed snapshots of a [`MemoryStore`].
//!
//! Layout:
//! - magic (8 bytes, LE)
//! - payload length (4 bytes, LE)
//! - JSON payload
//! - SHA-256 over everything before it (32 bytes)

use super::memory::MemoryStore;
use crate::core::constants::SNAPSHOT_MAGIC;
use crate::core::{CoreConfig, GameError, Result};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const SNAPSHOT_FILE_NAME: &str = "store.snapshot";

const HEADER_LEN: usize = 12;
const CHECKSUM_LEN: usize = 32;

pub fn encode(store: &MemoryStore) -> Result<Vec<u8>> {
    let payload = serde_json::to_vec(store)?;
    let len = u32::try_from(payload.len())
        .map_err(|_| GameError::CorruptSnapshot("payload exceeds 4 GiB".into()))?;

    let mut bytes = Vec::with_capacity(HEADER_LEN + payload.len() + CHECKSUM_LEN);
    bytes.extend_from_slice(&SNAPSHOT_MAGIC.to_le_bytes());
    bytes.extend_from_slice(&len.to_le_bytes());
    bytes.extend_from_slice(&payload);
    let checksum = Sha256::digest(&bytes);
    bytes.extend_from_slice(&checksum);
    Ok(bytes)
}

pub fn decode(bytes: &[u8]) -> Result<MemoryStore> {
    if bytes.len() < HEADER_LEN + CHECKSUM_LEN {
        return Err(GameError::CorruptSnapshot(format!("only {} bytes", bytes.len())));
    }
    let mut magic = [0u8; 8];
    magic.copy_from_slice(&bytes[..8]);
    let magic = u64::from_le_bytes(magic);
    if magic != SNAPSHOT_MAGIC {
        return Err(GameError::CorruptSnapshot(format!(
            "expected magic 0x{SNAPSHOT_MAGIC:016X}, got 0x{magic:016X}"
        )));
    }

    let mut len = [0u8; 4];
    len.copy_from_slice(&bytes[8..HEADER_LEN]);
    let len = u32::from_le_bytes(len) as usize;
    if bytes.len() != HEADER_LEN + len + CHECKSUM_LEN {
        return Err(GameError::CorruptSnapshot(format!(
            "declared {len} payload bytes, file holds {}",
            bytes.len().saturating_sub(HEADER_LEN + CHECKSUM_LEN)
        )));
    }

    let (body, stored) = bytes.split_at(HEADER_LEN + len);
    if Sha256::digest(body).as_slice() != stored {
        return Err(GameError::CorruptSnapshot("checksum mismatch".into()));
    }
    Ok(serde_json::from_slice(&body[HEADER_LEN..])?)
}

/// Default snapshot location under the configured data directory.
pub fn default_path(config: &CoreConfig) -> Option<PathBuf> {
    config.resolved_data_dir().map(|dir| dir.join(SNAPSHOT_FILE_NAME))
}

/// Writes through a temporary file so a crash never leaves a torn snapshot.
pub fn save_to(path: &Path, store: &MemoryStore) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let bytes = encode(store)?;
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, &bytes)?;
    fs::rename(&tmp, path)?;
    info!(path = %path.display(), bytes = bytes.len(), users = store.user_count(), "snapshot saved");
    Ok(())
}

pub fn load_from(path: &Path) -> Result<MemoryStore> {
    let bytes = fs::read(path)?;
    let store = decode(&bytes)?;
    debug!(path = %path.display(), users = store.user_count(), "snapshot loaded");
    Ok(store)
}
