// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

use std::{fs, path::PathBuf, time::Duration};

use alloy::{
    primitives::{Address, FixedBytes},
    signers::local::{LocalSigner, PrivateKeySigner},
};
use eyre::{eyre, Context};
use identity_tools::core::{
    config::{ClientConfig, ConfigOverrides},
    console::Console,
    wallet::RpcWallet,
};
use log::debug;

use crate::utils::decode0x;

#[derive(Debug, clap::Args)]
pub struct AuthArgs {
    /// File path to a text file containing a hex-encoded private key
    #[arg(long)]
    private_key_path: Option<PathBuf>,
    /// Private key as a hex string. Warning: this exposes your key to shell history
    #[arg(long)]
    private_key: Option<String>,
    /// Path to an Ethereum wallet keystore file (e.g. clef)
    #[arg(long)]
    keystore_path: Option<String>,
    /// Keystore password file
    #[arg(long)]
    keystore_password_path: Option<PathBuf>,
}

impl AuthArgs {
    /// Builds a local signer, or `None` to let the endpoint's own wallet hold the keys.
    pub fn build_signer(&self) -> eyre::Result<Option<PrivateKeySigner>> {
        if let Some(key) = &self.private_key {
            if key.is_empty() {
                return Err(eyre!("empty private key"));
            }
            return signer_from_hex(key).map(Some);
        }

        if let Some(file) = &self.private_key_path {
            let key = fs::read_to_string(file).wrap_err("could not open private key file")?;
            return signer_from_hex(key).map(Some);
        }

        let Some(keystore) = &self.keystore_path else {
            return Ok(None);
        };
        let password = self
            .keystore_password_path
            .as_ref()
            .map(fs::read_to_string)
            .unwrap_or(Ok("".into()))?;

        let signer = LocalSigner::decrypt_keystore(keystore, password.trim_end())?;
        Ok(Some(signer))
    }
}

fn signer_from_hex(key: impl AsRef<str>) -> eyre::Result<PrivateKeySigner> {
    let bytes = decode0x(key)?;
    if bytes.len() != 32 {
        return Err(eyre!("private key must be 32 bytes, got {}", bytes.len()));
    }
    let priv_key_bytes: FixedBytes<32> = FixedBytes::from_slice(&bytes);
    Ok(PrivateKeySigner::from_bytes(&priv_key_bytes)?)
}

#[derive(Debug, clap::Args)]
pub struct ProviderArgs {
    /// Wallet provider RPC endpoint [default: http://localhost:8547]
    #[arg(short, long)]
    pub endpoint: Option<String>,
    /// Network from Identity.toml to take the endpoint from
    #[arg(long)]
    pub network: Option<String>,
}

#[derive(Debug, clap::Args)]
pub struct RegistryArgs {
    /// Address of the deployed identity registry contract
    #[arg(long)]
    pub contract: Option<Address>,
    /// Seconds to wait for a single registry call, including the receipt for writes
    #[arg(long)]
    pub call_timeout_secs: Option<u64>,
    /// Path to an Identity.toml manifest (defaults to ./Identity.toml when present)
    #[arg(long)]
    pub manifest_path: Option<PathBuf>,
}

/// Everything needed to open a wallet session against the registry.
#[derive(Debug, clap::Args)]
pub struct SessionArgs {
    #[command(flatten)]
    pub auth: AuthArgs,
    #[command(flatten)]
    pub provider: ProviderArgs,
    #[command(flatten)]
    pub registry: RegistryArgs,
}

impl SessionArgs {
    pub fn config(&self) -> eyre::Result<ClientConfig> {
        let overrides = ConfigOverrides {
            endpoint: self.provider.endpoint.clone(),
            network: self.provider.network.clone(),
            contract: self.registry.contract,
            call_timeout: self.registry.call_timeout_secs.map(Duration::from_secs),
        };
        let cwd = std::env::current_dir()?;
        let config =
            ClientConfig::load(overrides, self.registry.manifest_path.as_deref(), cwd)?;
        debug!("registry {} via {}", config.contract, config.endpoint);
        Ok(config)
    }

    pub fn console(&self) -> eyre::Result<Console<RpcWallet>> {
        let config = self.config()?;
        let signer = self.auth.build_signer()?;
        let wallet = RpcWallet::new(config.endpoint.clone(), signer)?;
        Ok(Console::new(Some(wallet), &config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEVNET_PRIVATE_KEY: &str =
        "0xb6b15c8cb491557369f3c7d2c287b053eb229daa9c22138887752191c9520659";

    fn auth() -> AuthArgs {
        AuthArgs {
            private_key_path: None,
            private_key: None,
            keystore_path: None,
            keystore_password_path: None,
        }
    }

    #[test]
    fn no_auth_means_node_managed_accounts() {
        assert!(auth().build_signer().unwrap().is_none());
    }

    #[test]
    fn private_key_from_flag_and_file_agree() {
        let from_flag = AuthArgs {
            private_key: Some(DEVNET_PRIVATE_KEY.into()),
            ..auth()
        }
        .build_signer()
        .unwrap()
        .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("key.txt");
        fs::write(&path, format!("{DEVNET_PRIVATE_KEY}\n")).unwrap();
        let from_file = AuthArgs {
            private_key_path: Some(path),
            ..auth()
        }
        .build_signer()
        .unwrap()
        .unwrap();

        assert_eq!(from_flag.address(), from_file.address());
    }

    #[test]
    fn rejects_bad_keys() {
        for key in ["", "0x1234", "not hex"] {
            let args = AuthArgs {
                private_key: Some(key.into()),
                ..auth()
            };
            assert!(args.build_signer().is_err(), "{key:?}");
        }
    }
}
