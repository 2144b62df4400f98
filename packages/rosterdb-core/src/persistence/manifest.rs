//! Manifest sidecar structs for persistence.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Manifest file format for persistence.
#[derive(Debug, Default, Serialize, Deserialize)]
pub(crate) struct ManifestFile {
    /// Manifest format version
    pub version: u32,
    /// Data file checksums for corruption detection
    #[serde(default)]
    pub checksums: HashMap<String, u32>,
}
