// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

use crate::error::IdentityCliResult;

mod check;
mod connect;
mod register;
mod revoke;
mod shell;

#[derive(Debug, clap::Subcommand)]
pub enum Command {
    /// Check whether a user is verified in the registry
    #[clap(visible_alias = "c")]
    Check(check::Args),
    /// Request wallet access and report the signing account
    Connect(connect::Args),
    /// Register a user in the registry
    #[clap(visible_alias = "r")]
    Register(register::Args),
    /// Revoke a user's verification
    Revoke(revoke::Args),
    /// Interactive session: one wallet connection, one input, one output
    #[clap(visible_alias = "s")]
    Shell(shell::Args),
}

pub async fn exec(cmd: Command) -> IdentityCliResult {
    match cmd {
        Command::Check(args) => check::exec(args).await,
        Command::Connect(args) => connect::exec(args).await,
        Command::Register(args) => register::exec(args).await,
        Command::Revoke(args) => revoke::exec(args).await,
        Command::Shell(args) => shell::exec(args).await,
    }
}
