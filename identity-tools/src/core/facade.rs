// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

use std::{collections::HashSet, fmt, str::FromStr, time::Duration};

use alloy::primitives::Address;
use parking_lot::Mutex;

use crate::{
    core::{
        config::DEFAULT_CALL_TIMEOUT,
        registry::{RegistryContract, RegistryError},
        session::Session,
        wallet::Wallet,
    },
    utils::{color::DebugColor, format_secs},
};

pub const REGISTERED: &str = "User registered successfully!";
pub const VERIFIED: &str = "✅ User is verified";
pub const NOT_VERIFIED: &str = "❌ User not verified";
pub const REVOKED: &str = "User revoked successfully!";

/// The three registry methods exposed to the user.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    Register,
    Verify,
    Revoke,
}

impl Operation {
    /// Name of the contract method the operation calls.
    pub fn method(&self) -> &'static str {
        match self {
            Self::Register => "registerUser",
            Self::Verify => "isUserVerified",
            Self::Revoke => "revokeUser",
        }
    }

    pub fn is_write(&self) -> bool {
        !matches!(self, Self::Verify)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.method())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FacadeError {
    #[error("no active session, connect a wallet first")]
    NoActiveSession,
    #[error("invalid address {input:?}: {reason}")]
    InvalidAddress { input: String, reason: String },
    #[error(transparent)]
    RemoteCall(#[from] RegistryError),
    #[error("call timed out after {}", format_secs(*.0))]
    CallTimedOut(Duration),
    #[error("{operation} already pending for {address}")]
    AlreadyPending { operation: Operation, address: Address },
}

/// Marshals address input into registry calls and translates the outcome into a message.
#[derive(Debug)]
pub struct ContractFacade {
    call_timeout: Duration,
    pending: Mutex<HashSet<(Operation, Address)>>,
}

impl Default for ContractFacade {
    fn default() -> Self {
        Self::new(DEFAULT_CALL_TIMEOUT)
    }
}

impl ContractFacade {
    pub fn new(call_timeout: Duration) -> Self {
        Self {
            call_timeout,
            pending: Mutex::default(),
        }
    }

    pub fn call_timeout(&self) -> Duration {
        self.call_timeout
    }

    pub async fn register_user<W: Wallet>(
        &self,
        session: Option<&Session<W>>,
        address: &str,
    ) -> Result<String, FacadeError> {
        self.invoke(session, Operation::Register, address).await
    }

    pub async fn is_user_verified<W: Wallet>(
        &self,
        session: Option<&Session<W>>,
        address: &str,
    ) -> Result<String, FacadeError> {
        self.invoke(session, Operation::Verify, address).await
    }

    pub async fn revoke_user<W: Wallet>(
        &self,
        session: Option<&Session<W>>,
        address: &str,
    ) -> Result<String, FacadeError> {
        self.invoke(session, Operation::Revoke, address).await
    }

    /// Runs `operation` against the session's registry and returns the success message.
    ///
    /// The same operation cannot be submitted again for the same user while it is in flight.
    pub async fn invoke<W: Wallet>(
        &self,
        session: Option<&Session<W>>,
        operation: Operation,
        address: &str,
    ) -> Result<String, FacadeError> {
        let session = session.ok_or(FacadeError::NoActiveSession)?;
        let user = Address::from_str(address.trim()).map_err(|err| FacadeError::InvalidAddress {
            input: address.to_string(),
            reason: err.to_string(),
        })?;
        let _pending = PendingGuard::acquire(&self.pending, operation, user)?;
        debug!(
            @grey,
            "{operation}({}) as {}",
            user.debug_lavender(),
            session.signer().debug_lavender()
        );

        let call = dispatch(session.registry(), operation, user);
        match tokio::time::timeout(self.call_timeout, call).await {
            Ok(result) => Ok(result?),
            Err(_) => Err(FacadeError::CallTimedOut(self.call_timeout)),
        }
    }
}

async fn dispatch<R: RegistryContract>(
    registry: &R,
    operation: Operation,
    user: Address,
) -> Result<String, RegistryError> {
    let message = match operation {
        Operation::Register => {
            let tx_hash = registry.register_user(user).await?;
            debug!(@grey, "registered {user} in tx {}", tx_hash.debug_lavender());
            REGISTERED
        }
        Operation::Verify => {
            if registry.is_user_verified(user).await? {
                VERIFIED
            } else {
                NOT_VERIFIED
            }
        }
        Operation::Revoke => {
            let tx_hash = registry.revoke_user(user).await?;
            debug!(@grey, "revoked {user} in tx {}", tx_hash.debug_lavender());
            REVOKED
        }
    };
    Ok(message.to_string())
}

/// Marks an (operation, user) pair in flight until dropped.
struct PendingGuard<'a> {
    pending: &'a Mutex<HashSet<(Operation, Address)>>,
    key: (Operation, Address),
}

impl<'a> PendingGuard<'a> {
    fn acquire(
        pending: &'a Mutex<HashSet<(Operation, Address)>>,
        operation: Operation,
        user: Address,
    ) -> Result<Self, FacadeError> {
        let key = (operation, user);
        if !pending.lock().insert(key) {
            return Err(FacadeError::AlreadyPending {
                operation,
                address: user,
            });
        }
        Ok(Self { pending, key })
    }
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        self.pending.lock().remove(&self.key);
    }
}

#[cfg(test)]
mod tests {
    use alloy::primitives::address;

    use super::*;
    use crate::{core::session::SessionManager, testing::MockWallet};

    const USER: &str = "0x3f1Eae7D46d88F08fc2F8ed27FCb2AB183EB2d0E";
    const REGISTRY: Address = address!("0x5FbDB2315678afecb367f032d93F642f64180aa3");

    async fn connected() -> (Session<MockWallet>, MockWallet) {
        let wallet = MockWallet::granting(vec![Address::repeat_byte(0xAA)]);
        let manager = SessionManager::new(Some(wallet.clone()), REGISTRY);
        (manager.connect().await.unwrap(), wallet)
    }

    #[tokio::test]
    async fn requires_session() {
        let facade = ContractFacade::default();
        for operation in [Operation::Register, Operation::Verify, Operation::Revoke] {
            let err = facade
                .invoke::<MockWallet>(None, operation, USER)
                .await
                .unwrap_err();
            assert!(matches!(err, FacadeError::NoActiveSession));
        }
    }

    #[tokio::test]
    async fn verify_reports_both_outcomes() {
        let (session, wallet) = connected().await;
        let facade = ContractFacade::default();

        let message = facade.is_user_verified(Some(&session), USER).await.unwrap();
        assert_eq!(message, NOT_VERIFIED);

        wallet.registry().mark_verified(USER.parse().unwrap());
        let message = facade.is_user_verified(Some(&session), USER).await.unwrap();
        assert_eq!(message, VERIFIED);
    }

    #[tokio::test]
    async fn writes_report_success_and_are_sent_by_signer() {
        let (session, wallet) = connected().await;
        let facade = ContractFacade::default();

        assert_eq!(facade.register_user(Some(&session), USER).await.unwrap(), REGISTERED);
        assert_eq!(facade.revoke_user(Some(&session), USER).await.unwrap(), REVOKED);

        let calls = wallet.registry().calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].operation, Operation::Register);
        assert_eq!(calls[1].operation, Operation::Revoke);
        assert!(calls.iter().all(|c| c.signer == Some(session.signer())));
    }

    #[tokio::test]
    async fn remote_rejection_passes_through() {
        let (session, wallet) = connected().await;
        wallet.registry().reject_with("Ownable: caller is not the owner");
        let facade = ContractFacade::default();

        let err = facade.register_user(Some(&session), USER).await.unwrap_err();
        assert!(matches!(err, FacadeError::RemoteCall(_)));
        assert_eq!(err.to_string(), "Ownable: caller is not the owner");
    }

    #[tokio::test]
    async fn malformed_address_fails_before_calling() {
        let (session, wallet) = connected().await;
        let facade = ContractFacade::default();

        let err = facade
            .register_user(Some(&session), "not-an-address")
            .await
            .unwrap_err();
        assert!(matches!(err, FacadeError::InvalidAddress { ref input, .. } if input == "not-an-address"));
        assert!(wallet.registry().calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn stalled_call_times_out() {
        let (session, wallet) = connected().await;
        wallet
            .registry()
            .set_latency(Operation::Register, Duration::from_secs(600));
        let facade = ContractFacade::new(Duration::from_secs(30));

        let err = facade.register_user(Some(&session), USER).await.unwrap_err();
        assert!(matches!(err, FacadeError::CallTimedOut(d) if d == Duration::from_secs(30)));
        assert_eq!(err.to_string(), "call timed out after 30s");
    }

    #[tokio::test(start_paused = true)]
    async fn duplicate_submission_is_refused_while_pending() {
        let (session, wallet) = connected().await;
        wallet
            .registry()
            .set_latency(Operation::Register, Duration::from_secs(5));
        let facade = ContractFacade::default();

        let (first, second) = tokio::join!(
            facade.register_user(Some(&session), USER),
            facade.register_user(Some(&session), USER),
        );
        assert_eq!(first.unwrap(), REGISTERED);
        assert!(matches!(second, Err(FacadeError::AlreadyPending { operation: Operation::Register, .. })));

        // released once the first call resolved
        assert_eq!(facade.register_user(Some(&session), USER).await.unwrap(), REGISTERED);
    }

    #[tokio::test(start_paused = true)]
    async fn differently_written_inputs_share_the_pending_slot() {
        let (session, wallet) = connected().await;
        wallet
            .registry()
            .set_latency(Operation::Revoke, Duration::from_secs(5));
        let facade = ContractFacade::default();
        let spaced_lowercase = format!("  {}  ", USER.to_lowercase());

        let (first, second) = tokio::join!(
            facade.revoke_user(Some(&session), USER),
            facade.revoke_user(Some(&session), &spaced_lowercase),
        );
        assert_eq!(first.unwrap(), REVOKED);
        let user: Address = USER.parse().unwrap();
        let err = second.unwrap_err();
        assert!(matches!(err, FacadeError::AlreadyPending { address, .. } if address == user));
        assert_eq!(err.to_string(), format!("revokeUser already pending for {user}"));
        assert_eq!(wallet.registry().calls().len(), 1);
    }
}
