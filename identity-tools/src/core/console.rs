// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

//! The action boundary: every user-triggered action ends up here, and every outcome is written
//! to the shared [`OutputSurface`].

use crate::core::{
    config::ClientConfig,
    facade::{ContractFacade, Operation},
    output::{OperationResult, OutputSurface},
    session::{Session, SessionManager},
    wallet::{ConnectError, Wallet},
};

pub const CONNECTED: &str = "✅ Wallet connected!";

pub struct Console<W: Wallet> {
    sessions: SessionManager<W>,
    facade: ContractFacade,
    output: OutputSurface,
}

impl<W: Wallet> Console<W> {
    pub fn new(wallet: Option<W>, config: &ClientConfig) -> Self {
        Self::from_parts(
            SessionManager::new(wallet, config.contract),
            ContractFacade::new(config.call_timeout),
            OutputSurface::new(),
        )
    }

    pub fn from_parts(
        sessions: SessionManager<W>,
        facade: ContractFacade,
        output: OutputSurface,
    ) -> Self {
        Self {
            sessions,
            facade,
            output,
        }
    }

    pub fn sessions(&self) -> &SessionManager<W> {
        &self.sessions
    }

    pub fn output(&self) -> &OutputSurface {
        &self.output
    }

    pub async fn connect(&self) -> Result<Session<W>, ConnectError> {
        match self.sessions.connect().await {
            Ok(session) => {
                self.output.show(OperationResult::success(CONNECTED));
                Ok(session)
            }
            Err(err) => {
                self.output.show(OperationResult::failure(&err));
                Err(err)
            }
        }
    }

    pub async fn register_user(&self, address: &str) -> OperationResult {
        self.run(Operation::Register, address).await
    }

    pub async fn is_user_verified(&self, address: &str) -> OperationResult {
        self.run(Operation::Verify, address).await
    }

    pub async fn revoke_user(&self, address: &str) -> OperationResult {
        self.run(Operation::Revoke, address).await
    }

    /// Runs one operation and writes its outcome over whatever the output showed before.
    pub async fn run(&self, operation: Operation, address: &str) -> OperationResult {
        let session = self.sessions.current();
        let result = match self.facade.invoke(session.as_ref(), operation, address).await {
            Ok(message) => OperationResult::Success(message),
            Err(err) => {
                debug!(@grey, "{operation} failed: {err:?}");
                OperationResult::failure(err)
            }
        };
        self.output.show(result.clone());
        result
    }
}
