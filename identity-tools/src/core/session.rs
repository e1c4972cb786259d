// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

use std::{fmt, sync::Arc};

use alloy::primitives::Address;
use parking_lot::Mutex;

use crate::{
    core::wallet::{ConnectError, Wallet},
    utils::color::DebugColor,
};

/// A connected wallet: provider handle, signing identity and the registry handle bound to it.
pub struct Session<W: Wallet> {
    wallet: Arc<W>,
    signer: Address,
    registry: Arc<W::Registry>,
}

impl<W: Wallet> Session<W> {
    pub fn wallet(&self) -> &W {
        &self.wallet
    }

    pub fn signer(&self) -> Address {
        self.signer
    }

    pub fn registry(&self) -> &W::Registry {
        &self.registry
    }
}

impl<W: Wallet> Clone for Session<W> {
    fn clone(&self) -> Self {
        Self {
            wallet: self.wallet.clone(),
            signer: self.signer,
            registry: self.registry.clone(),
        }
    }
}

impl<W: Wallet> fmt::Debug for Session<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("signer", &self.signer)
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionStatus {
    Disconnected,
    Connecting,
    Connected,
}

/// The last settled outcome plus the attempt, if any, that is still being answered.
struct SessionState<W: Wallet> {
    session: Option<Session<W>>,
    attempts: u64,
    in_flight: Option<u64>,
}

impl<W: Wallet> SessionState<W> {
    fn status(&self) -> SessionStatus {
        match (self.in_flight, &self.session) {
            (Some(_), _) => SessionStatus::Connecting,
            (None, Some(_)) => SessionStatus::Connected,
            (None, None) => SessionStatus::Disconnected,
        }
    }

    fn begin(&mut self) -> u64 {
        self.attempts += 1;
        self.in_flight = Some(self.attempts);
        self.attempts
    }

    /// Ends `attempt`, leaving `Connecting` only if a later attempt is still out.
    fn settle(&mut self, attempt: u64) {
        if self.in_flight == Some(attempt) {
            self.in_flight = None;
        }
    }
}

/// Holds the one session for the lifetime of the process.
///
/// There is no disconnect; a new `connect` replaces the current session.
pub struct SessionManager<W: Wallet> {
    wallet: Option<Arc<W>>,
    contract: Address,
    state: Mutex<SessionState<W>>,
}

impl<W: Wallet> SessionManager<W> {
    /// `wallet` is `None` when the host offers no wallet provider at all.
    pub fn new(wallet: Option<W>, contract: Address) -> Self {
        Self {
            wallet: wallet.map(Arc::new),
            contract,
            state: Mutex::new(SessionState {
                session: None,
                attempts: 0,
                in_flight: None,
            }),
        }
    }

    pub fn contract(&self) -> Address {
        self.contract
    }

    pub fn status(&self) -> SessionStatus {
        self.state.lock().status()
    }

    /// The current session, if connected.
    pub fn current(&self) -> Option<Session<W>> {
        let state = self.state.lock();
        match state.status() {
            SessionStatus::Connected => state.session.clone(),
            _ => None,
        }
    }

    /// Requests account access and binds the registry to the first granted account.
    ///
    /// A failed attempt leaves the last settled session in place. When attempts overlap, the one
    /// that resolves last with a grant holds the session.
    pub async fn connect(&self) -> Result<Session<W>, ConnectError> {
        let wallet = self.wallet.clone().ok_or_else(|| {
            ConnectError::ProviderUnavailable("none configured".to_string())
        })?;

        let attempt = {
            let mut state = self.state.lock();
            if state.session.is_some() {
                warn!(@yellow, "replacing the active wallet session");
            }
            state.begin()
        };

        let granted = match wallet.request_accounts().await {
            Ok(accounts) => accounts.first().copied().ok_or(ConnectError::NoAccounts),
            Err(err) => Err(err),
        };
        let signer = match granted {
            Ok(signer) => signer,
            Err(err) => {
                self.state.lock().settle(attempt);
                return Err(err);
            }
        };

        let registry = Arc::new(wallet.bind_registry(self.contract, signer));
        let session = Session {
            wallet,
            signer,
            registry,
        };
        {
            let mut state = self.state.lock();
            state.session = Some(session.clone());
            state.settle(attempt);
        }
        debug!(
            @grey,
            "connected as {} to registry {}",
            signer.debug_lavender(),
            self.contract.debug_lavender()
        );
        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use alloy::primitives::address;

    use super::*;
    use crate::testing::MockWallet;

    const USER: Address = address!("0x3f1Eae7D46d88F08fc2F8ed27FCb2AB183EB2d0E");
    const REGISTRY: Address = address!("0x5FbDB2315678afecb367f032d93F642f64180aa3");

    #[tokio::test]
    async fn connect_binds_first_account() {
        let other = Address::repeat_byte(0x22);
        let manager = SessionManager::new(
            Some(MockWallet::granting(vec![USER, other])),
            REGISTRY,
        );
        assert_eq!(manager.status(), SessionStatus::Disconnected);
        assert!(manager.current().is_none());

        let session = manager.connect().await.unwrap();
        assert_eq!(session.signer(), USER);
        assert_eq!(session.registry().signer(), Some(USER));
        assert_eq!(session.registry().contract(), Some(REGISTRY));
        assert!(session.wallet().registry().calls().is_empty());
        assert_eq!(manager.status(), SessionStatus::Connected);
        assert_eq!(manager.current().unwrap().signer(), USER);
    }

    #[tokio::test]
    async fn missing_provider_creates_no_session() {
        let manager = SessionManager::<MockWallet>::new(None, REGISTRY);
        let err = manager.connect().await.unwrap_err();
        assert!(matches!(err, ConnectError::ProviderUnavailable(_)));
        assert_eq!(manager.status(), SessionStatus::Disconnected);
        assert!(manager.current().is_none());
    }

    #[tokio::test]
    async fn rejected_access_creates_no_session() {
        let manager = SessionManager::new(
            Some(MockWallet::rejecting("User rejected the request.")),
            REGISTRY,
        );
        let err = manager.connect().await.unwrap_err();
        assert!(matches!(err, ConnectError::AccessRejected(_)));
        assert_eq!(manager.status(), SessionStatus::Disconnected);
    }

    #[tokio::test]
    async fn empty_grant_creates_no_session() {
        let manager = SessionManager::new(Some(MockWallet::granting(vec![])), REGISTRY);
        let err = manager.connect().await.unwrap_err();
        assert!(matches!(err, ConnectError::NoAccounts));
        assert!(manager.current().is_none());
    }

    #[tokio::test]
    async fn failed_reconnect_keeps_existing_session() {
        let wallet = MockWallet::granting(vec![USER]);
        let access = wallet.access();
        let manager = SessionManager::new(Some(wallet), REGISTRY);
        manager.connect().await.unwrap();

        access.reject("User rejected the request.");
        assert!(manager.connect().await.is_err());
        assert_eq!(manager.status(), SessionStatus::Connected);
        assert_eq!(manager.current().unwrap().signer(), USER);
    }

    #[tokio::test(start_paused = true)]
    async fn overlapping_connects_settle_on_the_grant() {
        let wallet = MockWallet::granting(vec![]);
        let access = wallet.access();
        let manager = SessionManager::new(Some(wallet), REGISTRY);

        // the grant resolves first, the refusal last
        access.grant_next_after(Duration::from_secs(1), vec![USER]);
        access.reject_next_after(Duration::from_secs(10), "User rejected the request.");
        let (first, second) = tokio::join!(manager.connect(), manager.connect());
        assert_eq!(first.unwrap().signer(), USER);
        assert!(matches!(second, Err(ConnectError::AccessRejected(_))));
        assert_eq!(manager.status(), SessionStatus::Connected);
        assert_eq!(manager.current().unwrap().signer(), USER);

        // and the refusal first, the grant last
        let other = Address::repeat_byte(0x22);
        access.reject_next_after(Duration::from_secs(10), "User rejected the request.");
        access.grant_next_after(Duration::from_secs(1), vec![other]);
        let (first, second) = tokio::join!(manager.connect(), manager.connect());
        assert!(first.is_err());
        assert_eq!(second.unwrap().signer(), other);
        assert_eq!(manager.status(), SessionStatus::Connected);
        assert_eq!(manager.current().unwrap().signer(), other);
    }

    #[tokio::test(start_paused = true)]
    async fn overlapping_failures_return_to_disconnected() {
        let wallet = MockWallet::granting(vec![]);
        let access = wallet.access();
        let manager = SessionManager::new(Some(wallet), REGISTRY);

        access.reject_next_after(Duration::from_secs(1), "User rejected the request.");
        access.reject_next_after(Duration::from_secs(5), "User rejected the request.");
        let (first, second) = tokio::join!(manager.connect(), manager.connect());
        assert!(first.is_err() && second.is_err());
        assert_eq!(manager.status(), SessionStatus::Disconnected);
        assert!(manager.current().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn connecting_while_an_attempt_is_out() {
        let wallet = MockWallet::granting(vec![]);
        wallet
            .access()
            .grant_next_after(Duration::from_secs(5), vec![USER]);
        let manager = SessionManager::new(Some(wallet), REGISTRY);

        let observe = async {
            tokio::time::sleep(Duration::from_secs(1)).await;
            (manager.status(), manager.current().is_none())
        };
        let (connected, midway) = tokio::join!(manager.connect(), observe);
        assert!(connected.is_ok());
        assert_eq!(midway, (SessionStatus::Connecting, true));
        assert_eq!(manager.status(), SessionStatus::Connected);
    }
}
