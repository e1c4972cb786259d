// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

//! In-memory stand-ins for a wallet and the registry contract.

use std::{
    collections::{HashMap, HashSet, VecDeque},
    sync::Arc,
    time::Duration,
};

use alloy::primitives::{Address, TxHash};
use parking_lot::Mutex;

use crate::core::{
    facade::Operation,
    registry::{RegistryContract, RegistryError},
    wallet::{ConnectError, Wallet},
};

/// A registry that records registrations in memory.
///
/// Clones share state, so a test can keep a handle while the session owns another.
#[derive(Clone, Debug, Default)]
pub struct MockRegistry {
    state: Arc<Mutex<RegistryState>>,
    contract: Option<Address>,
    signer: Option<Address>,
}

#[derive(Debug, Default)]
struct RegistryState {
    verified: HashSet<Address>,
    rejection: Option<String>,
    latency: HashMap<Operation, Duration>,
    calls: Vec<MockCall>,
    txs: u8,
}

/// One call received by a [`MockRegistry`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MockCall {
    pub operation: Operation,
    pub user: Address,
    pub signer: Option<Address>,
}

impl MockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Contract address this handle was bound to, if bound through a [`MockWallet`].
    pub fn contract(&self) -> Option<Address> {
        self.contract
    }

    pub fn signer(&self) -> Option<Address> {
        self.signer
    }

    pub fn mark_verified(&self, user: Address) {
        self.state.lock().verified.insert(user);
    }

    pub fn is_verified(&self, user: Address) -> bool {
        self.state.lock().verified.contains(&user)
    }

    /// Makes every following call fail with `message`.
    pub fn reject_with(&self, message: impl Into<String>) {
        self.state.lock().rejection = Some(message.into());
    }

    pub fn accept_calls(&self) {
        self.state.lock().rejection = None;
    }

    /// Delays every call of `operation` by `latency` before it resolves.
    pub fn set_latency(&self, operation: Operation, latency: Duration) {
        self.state.lock().latency.insert(operation, latency);
    }

    pub fn calls(&self) -> Vec<MockCall> {
        self.state.lock().calls.clone()
    }

    fn bound(&self, contract: Address, signer: Address) -> Self {
        Self {
            state: self.state.clone(),
            contract: Some(contract),
            signer: Some(signer),
        }
    }

    async fn handle(&self, operation: Operation, user: Address) -> Result<bool, RegistryError> {
        let latency = {
            let mut state = self.state.lock();
            state.calls.push(MockCall {
                operation,
                user,
                signer: self.signer,
            });
            state.latency.get(&operation).copied()
        };
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }

        let mut state = self.state.lock();
        if let Some(message) = &state.rejection {
            return Err(RegistryError::Rejected(message.clone()));
        }
        Ok(match operation {
            Operation::Register => state.verified.insert(user),
            Operation::Verify => state.verified.contains(&user),
            Operation::Revoke => state.verified.remove(&user),
        })
    }

    fn next_tx(&self) -> TxHash {
        let mut state = self.state.lock();
        state.txs = state.txs.wrapping_add(1);
        TxHash::with_last_byte(state.txs)
    }
}

impl RegistryContract for MockRegistry {
    async fn register_user(&self, user: Address) -> Result<TxHash, RegistryError> {
        self.handle(Operation::Register, user).await?;
        Ok(self.next_tx())
    }

    async fn is_user_verified(&self, user: Address) -> Result<bool, RegistryError> {
        self.handle(Operation::Verify, user).await
    }

    async fn revoke_user(&self, user: Address) -> Result<TxHash, RegistryError> {
        self.handle(Operation::Revoke, user).await?;
        Ok(self.next_tx())
    }
}

/// Controls how a [`MockWallet`] answers access requests. Clones share state.
///
/// Queued replies are used once each, in order, before falling back to the standing reply.
#[derive(Clone, Debug)]
pub struct MockAccess {
    inner: Arc<Mutex<AccessScript>>,
}

#[derive(Debug)]
struct AccessScript {
    standing: AccessReply,
    queued: VecDeque<(Duration, AccessReply)>,
}

#[derive(Clone, Debug)]
enum AccessReply {
    Grant(Vec<Address>),
    Reject(String),
    Unreachable(String),
}

impl MockAccess {
    fn new(reply: AccessReply) -> Self {
        Self {
            inner: Arc::new(Mutex::new(AccessScript {
                standing: reply,
                queued: VecDeque::new(),
            })),
        }
    }

    pub fn grant(&self, accounts: Vec<Address>) {
        self.inner.lock().standing = AccessReply::Grant(accounts);
    }

    pub fn reject(&self, message: impl Into<String>) {
        self.inner.lock().standing = AccessReply::Reject(message.into());
    }

    pub fn make_unreachable(&self, message: impl Into<String>) {
        self.inner.lock().standing = AccessReply::Unreachable(message.into());
    }

    /// Answers the next unanswered request with `accounts` after `delay`.
    pub fn grant_next_after(&self, delay: Duration, accounts: Vec<Address>) {
        self.inner
            .lock()
            .queued
            .push_back((delay, AccessReply::Grant(accounts)));
    }

    /// Refuses the next unanswered request with `message` after `delay`.
    pub fn reject_next_after(&self, delay: Duration, message: impl Into<String>) {
        self.inner
            .lock()
            .queued
            .push_back((delay, AccessReply::Reject(message.into())));
    }

    fn next(&self) -> (Duration, AccessReply) {
        let mut script = self.inner.lock();
        match script.queued.pop_front() {
            Some(queued) => queued,
            None => (Duration::ZERO, script.standing.clone()),
        }
    }
}

/// A wallet whose access prompt answers according to its [`MockAccess`].
#[derive(Clone, Debug)]
pub struct MockWallet {
    access: MockAccess,
    registry: MockRegistry,
}

impl MockWallet {
    fn with_reply(reply: AccessReply) -> Self {
        Self {
            access: MockAccess::new(reply),
            registry: MockRegistry::new(),
        }
    }

    pub fn granting(accounts: Vec<Address>) -> Self {
        Self::with_reply(AccessReply::Grant(accounts))
    }

    pub fn rejecting(message: impl Into<String>) -> Self {
        Self::with_reply(AccessReply::Reject(message.into()))
    }

    pub fn unreachable(message: impl Into<String>) -> Self {
        Self::with_reply(AccessReply::Unreachable(message.into()))
    }

    pub fn access(&self) -> MockAccess {
        self.access.clone()
    }

    /// Handle on the registry state every bound session shares.
    pub fn registry(&self) -> MockRegistry {
        self.registry.clone()
    }
}

impl Wallet for MockWallet {
    type Registry = MockRegistry;

    async fn request_accounts(&self) -> Result<Vec<Address>, ConnectError> {
        let (delay, reply) = self.access.next();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        match reply {
            AccessReply::Grant(accounts) => Ok(accounts),
            AccessReply::Reject(message) => Err(ConnectError::AccessRejected(message)),
            AccessReply::Unreachable(message) => Err(ConnectError::ProviderUnavailable(message)),
        }
    }

    fn bind_registry(&self, contract: Address, signer: Address) -> Self::Registry {
        self.registry.bound(contract, signer)
    }
}
