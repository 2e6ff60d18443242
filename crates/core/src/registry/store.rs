use std::path::Path;

use anyhow::Result;
use serde::Deserialize;

use crate::{
    models::Veteran,
    store::{self, LoadReport, REGISTRY_INDENT},
};

/// Result of loading the registry file.
pub type VeteranLoad = LoadReport<Veteran, serde_json::Error>;

/// Load veterans from `path`; same best-effort contract as the catalog files.
pub fn load_veterans(path: impl AsRef<Path>) -> VeteranLoad {
    store::load_array(path, |value| Veteran::deserialize(value))
}

/// Write every veteran to `path`.
pub fn save_veterans(veterans: &[Veteran], path: impl AsRef<Path>) -> Result<()> {
    store::write_array(path, veterans, REGISTRY_INDENT)
}
