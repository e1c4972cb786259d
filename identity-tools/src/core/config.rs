// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

use std::{path::Path, time::Duration};

use alloy::primitives::Address;
use typed_builder::TypedBuilder;

use crate::core::manifest::{self, IdentityManifest};

/// The default endpoint for connections to an Ethereum node or wallet bridge.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:8547";

/// Upper bound on a single remote call, including the receipt wait for writes.
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(120);

/// Everything needed to open a session against the identity registry.
#[derive(Clone, Debug, TypedBuilder)]
#[builder(field_defaults(setter(into)))]
pub struct ClientConfig {
    #[builder(default = DEFAULT_ENDPOINT.to_string())]
    pub endpoint: String,
    pub contract: Address,
    #[builder(default = DEFAULT_CALL_TIMEOUT)]
    pub call_timeout: Duration,
}

/// Values supplied on the command line, which take precedence over the manifest.
#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub endpoint: Option<String>,
    pub network: Option<String>,
    pub contract: Option<Address>,
    pub call_timeout: Option<Duration>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("no registry contract address given, pass --contract or set [registry] address in Identity.toml")]
    MissingContract,
    #[error("network `{0}` is not defined in Identity.toml")]
    UnknownNetwork(String),
    #[error("--endpoint and --network cannot be used together")]
    ConflictingEndpoint,
}

impl ClientConfig {
    /// Reads the manifest (explicit, or discovered in `dir`) and applies `overrides` over it.
    pub fn load(
        overrides: ConfigOverrides,
        manifest_path: Option<&Path>,
        dir: impl AsRef<Path>,
    ) -> crate::Result<Self> {
        let manifest = manifest::discover(manifest_path, dir)?;
        Ok(Self::resolve(overrides, manifest.as_ref())?)
    }

    /// Merges command line values over an optional manifest.
    pub fn resolve(
        overrides: ConfigOverrides,
        manifest: Option<&IdentityManifest>,
    ) -> Result<Self, ConfigError> {
        let registry = manifest.and_then(|m| m.registry.as_ref());

        let contract = overrides
            .contract
            .or_else(|| registry.and_then(|r| r.address))
            .ok_or(ConfigError::MissingContract)?;

        let endpoint = match (overrides.endpoint, overrides.network) {
            (Some(_), Some(_)) => return Err(ConfigError::ConflictingEndpoint),
            (Some(endpoint), None) => endpoint,
            (None, Some(network)) => manifest
                .and_then(|m| m.networks.get(&network))
                .map(|n| n.endpoint.clone())
                .ok_or(ConfigError::UnknownNetwork(network))?,
            (None, None) => manifest
                .and_then(IdentityManifest::default_endpoint)
                .unwrap_or(DEFAULT_ENDPOINT)
                .to_string(),
        };

        let call_timeout = overrides
            .call_timeout
            .or_else(|| registry.and_then(|r| r.call_timeout_secs).map(Duration::from_secs))
            .unwrap_or(DEFAULT_CALL_TIMEOUT);

        Ok(Self {
            endpoint,
            contract,
            call_timeout,
        })
    }
}

#[cfg(test)]
mod tests {
    use alloy::primitives::address;

    use super::*;

    const REGISTRY: Address = address!("0x5FbDB2315678afecb367f032d93F642f64180aa3");

    fn manifest() -> IdentityManifest {
        toml::from_str(
            r#"
            default-network = "devnet"

            [registry]
            address = "0x5FbDB2315678afecb367f032d93F642f64180aa3"
            call-timeout-secs = 30

            [networks.devnet]
            endpoint = "http://localhost:8547"

            [networks.sepolia]
            endpoint = "https://sepolia-rollup.arbitrum.io/rpc"
            "#,
        )
        .unwrap()
    }

    #[test]
    fn load_reports_manifest_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Missing.toml");
        let err = ClientConfig::load(ConfigOverrides::default(), Some(path.as_path()), dir.path())
            .unwrap_err();
        assert!(matches!(err, crate::Error::Manifest(_)));

        let err = ClientConfig::load(ConfigOverrides::default(), None, dir.path()).unwrap_err();
        assert!(matches!(err, crate::Error::Config(ConfigError::MissingContract)));
    }

    #[test]
    fn builder_defaults() {
        let config = ClientConfig::builder().contract(REGISTRY).build();
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.call_timeout, DEFAULT_CALL_TIMEOUT);
    }

    #[test]
    fn manifest_values_apply() {
        let config = ClientConfig::resolve(ConfigOverrides::default(), Some(&manifest())).unwrap();
        assert_eq!(config.contract, REGISTRY);
        assert_eq!(config.endpoint, "http://localhost:8547");
        assert_eq!(config.call_timeout, Duration::from_secs(30));
    }

    #[test]
    fn overrides_win() {
        let other = address!("0x0000000000000000000000000000000000000042");
        let overrides = ConfigOverrides {
            network: Some("sepolia".into()),
            contract: Some(other),
            call_timeout: Some(Duration::from_secs(5)),
            ..Default::default()
        };
        let config = ClientConfig::resolve(overrides, Some(&manifest())).unwrap();
        assert_eq!(config.contract, other);
        assert_eq!(config.endpoint, "https://sepolia-rollup.arbitrum.io/rpc");
        assert_eq!(config.call_timeout, Duration::from_secs(5));
    }

    #[test]
    fn missing_contract() {
        let err = ClientConfig::resolve(ConfigOverrides::default(), None).unwrap_err();
        assert!(matches!(err, ConfigError::MissingContract));
    }

    #[test]
    fn unknown_network() {
        let overrides = ConfigOverrides {
            network: Some("mainnet".into()),
            ..Default::default()
        };
        let err = ClientConfig::resolve(overrides, Some(&manifest())).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownNetwork(name) if name == "mainnet"));
    }

    #[test]
    fn endpoint_and_network_conflict() {
        let overrides = ConfigOverrides {
            endpoint: Some("http://localhost:8545".into()),
            network: Some("devnet".into()),
            contract: Some(REGISTRY),
            ..Default::default()
        };
        let err = ClientConfig::resolve(overrides, None).unwrap_err();
        assert!(matches!(err, ConfigError::ConflictingEndpoint));
    }
}
