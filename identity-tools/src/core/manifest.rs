// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use alloy::primitives::Address;
use serde::Deserialize;

/// Filename for the optional project manifest.
pub const FILENAME: &str = "Identity.toml";

#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("toml read error: {0}")]
    TomlRead(#[from] toml::de::Error),

    #[error("missing manifest at {}", .0.display())]
    Missing(PathBuf),
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct IdentityManifest {
    pub default_network: Option<String>,
    pub registry: Option<TomlRegistry>,
    #[serde(default)]
    pub networks: HashMap<String, TomlNetwork>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TomlRegistry {
    pub address: Option<Address>,
    pub call_timeout_secs: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct TomlNetwork {
    pub endpoint: String,
}

impl IdentityManifest {
    /// Endpoint of the network named by `default-network`, if both are present.
    pub fn default_endpoint(&self) -> Option<&str> {
        let name = self.default_network.as_ref()?;
        self.networks.get(name).map(|n| n.endpoint.as_str())
    }
}

pub fn load(path: impl AsRef<Path>) -> Result<IdentityManifest, ManifestError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(ManifestError::Missing(path.to_path_buf()));
    }

    let contents = fs::read_to_string(path)?;
    let manifest = toml::from_str(&contents)?;
    Ok(manifest)
}

/// Loads an explicitly requested manifest, or `Identity.toml` from `dir` when one exists.
pub fn discover(
    explicit: Option<&Path>,
    dir: impl AsRef<Path>,
) -> Result<Option<IdentityManifest>, ManifestError> {
    if let Some(path) = explicit {
        return load(path).map(Some);
    }
    let path = dir.as_ref().join(FILENAME);
    if path.exists() {
        debug!(@grey, "reading manifest {}", path.display());
        load(path).map(Some)
    } else {
        Ok(None)
    }
}
