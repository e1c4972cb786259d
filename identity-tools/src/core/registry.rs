// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

//! The identity registry contract interface.
//!
//! [`RegistryContract`] is the capability the rest of the crate programs against. The on-chain
//! implementation is [`AlloyRegistry`]; tests substitute [`crate::testing::MockRegistry`].

use std::future::Future;

use alloy::{
    primitives::{Address, TxHash},
    providers::Provider,
    sol,
    transports::TransportError,
};

use crate::utils::color::DebugColor;

sol! {
    #[sol(rpc)]
    interface IdentityRegistry {
        function registerUser(address _user) external;
        function isUserVerified(address _user) external view returns (bool);
        function revokeUser(address _user) external;
    }
}

/// Typed access to the three registry methods.
///
/// Writes resolve once the transaction is finalized and return its hash. Reads resolve with the
/// query result and never wait on a transaction.
pub trait RegistryContract: Send + Sync {
    fn register_user(
        &self,
        user: Address,
    ) -> impl Future<Output = Result<TxHash, RegistryError>> + Send;

    fn is_user_verified(
        &self,
        user: Address,
    ) -> impl Future<Output = Result<bool, RegistryError>> + Send;

    fn revoke_user(
        &self,
        user: Address,
    ) -> impl Future<Output = Result<TxHash, RegistryError>> + Send;
}

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// The remote runtime refused the call. The message is the remote's own text.
    #[error("{0}")]
    Rejected(String),
    #[error("transaction {tx_hash} reverted")]
    Reverted { tx_hash: TxHash },
}

impl From<TransportError> for RegistryError {
    fn from(err: TransportError) -> Self {
        match err.as_error_resp() {
            Some(resp) => Self::Rejected(resp.message.to_string()),
            None => Self::Rejected(err.to_string()),
        }
    }
}

impl From<alloy::contract::Error> for RegistryError {
    fn from(err: alloy::contract::Error) -> Self {
        match err {
            alloy::contract::Error::TransportError(err) => err.into(),
            err => Self::Rejected(err.to_string()),
        }
    }
}

/// Registry handle bound to a deployed contract, sending calls as `signer`.
#[derive(Clone, Debug)]
pub struct AlloyRegistry<P> {
    instance: IdentityRegistry::IdentityRegistryInstance<P>,
    signer: Address,
}

impl<P: Provider> AlloyRegistry<P> {
    pub fn new(contract: Address, signer: Address, provider: P) -> Self {
        Self {
            instance: IdentityRegistry::new(contract, provider),
            signer,
        }
    }

    pub fn address(&self) -> &Address {
        self.instance.address()
    }

    pub fn signer(&self) -> Address {
        self.signer
    }

    /// Polls for the receipt of `tx_hash` at the client's poll interval.
    ///
    /// A mined transaction whose receipt reports failure is a rejection.
    async fn wait_for_finalization(&self, tx_hash: TxHash) -> Result<TxHash, RegistryError> {
        debug!(@grey, "sent tx: {}", tx_hash.debug_lavender());
        let provider = self.instance.provider();
        let poll_interval = provider.client().poll_interval();

        let receipt = loop {
            if let Some(receipt) = provider.get_transaction_receipt(tx_hash).await? {
                break receipt;
            }
            tokio::time::sleep(poll_interval).await;
        };
        if !receipt.status() {
            return Err(RegistryError::Reverted { tx_hash });
        }
        debug!(
            @grey,
            "tx {} finalized in block {}",
            tx_hash.debug_lavender(),
            receipt.block_number.unwrap_or_default()
        );
        Ok(tx_hash)
    }
}

impl<P: Provider> RegistryContract for AlloyRegistry<P> {
    async fn register_user(&self, user: Address) -> Result<TxHash, RegistryError> {
        debug!(@grey, "calling registerUser({user}) on {}", self.address());
        let pending = self
            .instance
            .registerUser(user)
            .from(self.signer)
            .send()
            .await?;
        self.wait_for_finalization(*pending.tx_hash()).await
    }

    async fn is_user_verified(&self, user: Address) -> Result<bool, RegistryError> {
        debug!(@grey, "querying isUserVerified({user}) on {}", self.address());
        let verified = self
            .instance
            .isUserVerified(user)
            .from(self.signer)
            .call()
            .await?;
        Ok(verified)
    }

    async fn revoke_user(&self, user: Address) -> Result<TxHash, RegistryError> {
        debug!(@grey, "calling revokeUser({user}) on {}", self.address());
        let pending = self
            .instance
            .revokeUser(user)
            .from(self.signer)
            .send()
            .await?;
        self.wait_for_finalization(*pending.tx_hash()).await
    }
}
