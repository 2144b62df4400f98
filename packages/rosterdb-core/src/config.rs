//! Store configuration.

use std::path::PathBuf;

/// Store configuration.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Data directory for persistence
    pub data_dir: PathBuf,
    /// Maximum records per table
    pub table_capacity: usize,
    /// Maximum retry attempts for transient I/O errors
    pub persistence_max_retries: u32,
    /// Delay between retry attempts in milliseconds
    pub persistence_retry_delay_ms: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            table_capacity: 1024,
            persistence_max_retries: 3,
            persistence_retry_delay_ms: 100,
        }
    }
}
