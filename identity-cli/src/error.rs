// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

use std::fmt;
use std::process::ExitCode;

pub type IdentityCliResult = Result<(), IdentityCliError>;

#[derive(Debug)]
pub struct IdentityCliError {
    error: eyre::Error,
    exit_code: ExitCode,
    reported: bool,
}

impl IdentityCliError {
    pub fn exit_code(&self) -> ExitCode {
        self.exit_code
    }

    /// Whether the failure was already shown on the output region.
    pub fn is_reported(&self) -> bool {
        self.reported
    }
}

impl fmt::Display for IdentityCliError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.error.fmt(f)
    }
}

impl From<std::io::Error> for IdentityCliError {
    fn from(err: std::io::Error) -> Self {
        Self {
            error: err.into(),
            exit_code: ExitCode::FAILURE,
            reported: false,
        }
    }
}

impl From<eyre::Error> for IdentityCliError {
    fn from(error: eyre::Error) -> Self {
        Self {
            error,
            exit_code: ExitCode::FAILURE,
            reported: false,
        }
    }
}

impl From<identity_tools::Error> for IdentityCliError {
    fn from(err: identity_tools::Error) -> Self {
        Self {
            error: err.into(),
            exit_code: ExitCode::FAILURE,
            reported: false,
        }
    }
}

impl From<identity_tools::ops::ActionFailed> for IdentityCliError {
    fn from(err: identity_tools::ops::ActionFailed) -> Self {
        Self {
            error: err.into(),
            exit_code: ExitCode::FAILURE,
            reported: true,
        }
    }
}
