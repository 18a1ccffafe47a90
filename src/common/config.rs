use crate::common::exception::DBError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub type PageId = u64; // page id type
pub type SlotNum = u32; // slot number within a page

pub const INVALID_PAGE_ID: PageId = u64::MAX; // invalid page id

/// Build-side tuples held in memory per hash join chunk.
pub const DEFAULT_HASH_JOIN_CHUNK_SIZE: usize = 20000;

/// Tuning knobs for
/// [`HashJoinExecutor`](crate::sql::execution::executors::hash_join_executor::HashJoinExecutor).
///
/// ```toml
/// chunk_size = 4096
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HashJoinConfig {
    /// Upper bound on build tuples materialized in one chunk.
    pub chunk_size: usize,
}

impl Default for HashJoinConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_HASH_JOIN_CHUNK_SIZE,
        }
    }
}

impl HashJoinConfig {
    pub fn with_chunk_size(chunk_size: usize) -> Self {
        Self { chunk_size }
    }

    pub fn load(path: &Path) -> Result<Self, DBError> {
        let contents = fs::read_to_string(path).map_err(|e| {
            DBError::Validation(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, DBError> {
        let config: HashJoinConfig = toml::from_str(contents)
            .map_err(|e| DBError::Validation(format!("invalid hash join config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), DBError> {
        if self.chunk_size == 0 {
            return Err(DBError::Validation(
                "chunk_size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
