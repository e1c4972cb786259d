// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

use std::future::Future;

use alloy::{
    network::EthereumWallet,
    primitives::Address,
    providers::{DynProvider, Provider, ProviderBuilder},
    signers::local::PrivateKeySigner,
    transports::{http::reqwest::Url, RpcError, TransportErrorKind},
};

use crate::core::registry::{AlloyRegistry, RegistryContract};

/// EIP-1193 code for a request the user declined in their wallet.
pub const USER_REJECTED_REQUEST: i64 = 4001;
/// JSON-RPC code for an unsupported method.
pub const METHOD_NOT_FOUND: i64 = -32601;

/// Host capability that manages the user's signing key and authorizes outgoing calls.
pub trait Wallet: Send + Sync {
    type Registry: RegistryContract;

    /// Asks the provider for account access. This may prompt the user.
    fn request_accounts(&self) -> impl Future<Output = Result<Vec<Address>, ConnectError>> + Send;

    /// Binds a callable registry handle at `contract` that sends calls as `signer`.
    fn bind_registry(&self, contract: Address, signer: Address) -> Self::Registry;
}

#[derive(Debug, thiserror::Error)]
pub enum ConnectError {
    #[error("no wallet provider available: {0}")]
    ProviderUnavailable(String),
    #[error("wallet access rejected: {0}")]
    AccessRejected(String),
    #[error("wallet granted access to no accounts")]
    NoAccounts,
    #[error("wallet provider error: {0}")]
    Provider(String),
}

/// A wallet reached over JSON-RPC.
///
/// With a local signer, transactions are signed in-process and the signer's address is the only
/// account offered. Without one, the node or wallet bridge behind the endpoint owns the keys and
/// is asked for access through `eth_requestAccounts`.
#[derive(Clone)]
pub struct RpcWallet {
    endpoint: String,
    provider: DynProvider,
    local_signer: Option<Address>,
}

impl RpcWallet {
    pub fn new(
        endpoint: impl Into<String>,
        signer: Option<PrivateKeySigner>,
    ) -> Result<Self, ConnectError> {
        let endpoint = endpoint.into();
        let url: Url = endpoint
            .parse()
            .map_err(|err| ConnectError::ProviderUnavailable(format!("{endpoint}: {err}")))?;

        let local_signer = signer.as_ref().map(|s| s.address());
        let provider = match signer {
            Some(signer) => ProviderBuilder::new()
                .wallet(EthereumWallet::new(signer))
                .connect_http(url)
                .erased(),
            None => ProviderBuilder::new().connect_http(url).erased(),
        };

        Ok(Self::with_provider(endpoint, provider, local_signer))
    }

    /// Wraps an already built provider. `local_signer` is the account the provider signs for, if any.
    pub fn with_provider(
        endpoint: impl Into<String>,
        provider: DynProvider,
        local_signer: Option<Address>,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            provider,
            local_signer,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn node_accounts(&self) -> Result<Vec<Address>, ConnectError> {
        info!(@grey, "Requesting account access from {}...", self.endpoint);
        let requested = self
            .provider
            .raw_request::<_, Vec<Address>>("eth_requestAccounts".into(), ())
            .await;
        match requested {
            Ok(accounts) => Ok(accounts),
            Err(RpcError::ErrorResp(payload)) if payload.code == METHOD_NOT_FOUND => {
                debug!(@grey, "eth_requestAccounts unsupported, falling back to eth_accounts");
                self.provider
                    .get_accounts()
                    .await
                    .map_err(|err| classify_access_error(&self.endpoint, err))
            }
            Err(err) => Err(classify_access_error(&self.endpoint, err)),
        }
    }
}

impl std::fmt::Debug for RpcWallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcWallet")
            .field("endpoint", &self.endpoint)
            .field("local_signer", &self.local_signer)
            .finish_non_exhaustive()
    }
}

impl Wallet for RpcWallet {
    type Registry = AlloyRegistry<DynProvider>;

    async fn request_accounts(&self) -> Result<Vec<Address>, ConnectError> {
        let chain_id = self
            .provider
            .get_chain_id()
            .await
            .map_err(|err| ConnectError::ProviderUnavailable(format!("{}: {err}", self.endpoint)))?;
        debug!(@grey, "reached chain {chain_id} at {}", self.endpoint);

        match self.local_signer {
            Some(signer) => Ok(vec![signer]),
            None => self.node_accounts().await,
        }
    }

    fn bind_registry(&self, contract: Address, signer: Address) -> Self::Registry {
        AlloyRegistry::new(contract, signer, self.provider.clone())
    }
}

/// Separates a refused access request from a provider that cannot be reached at all.
pub fn classify_access_error(endpoint: &str, err: RpcError<TransportErrorKind>) -> ConnectError {
    match err {
        RpcError::ErrorResp(payload) if payload.code == USER_REJECTED_REQUEST => {
            ConnectError::AccessRejected(payload.message.to_string())
        }
        RpcError::ErrorResp(payload) => ConnectError::Provider(payload.message.to_string()),
        RpcError::Transport(kind) => ConnectError::ProviderUnavailable(format!("{endpoint}: {kind}")),
        other => ConnectError::Provider(other.to_string()),
    }
}
