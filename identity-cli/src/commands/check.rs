// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

use identity_tools::{core::facade::Operation, ops};

use crate::{common_args::SessionArgs, error::IdentityCliResult};

#[derive(Debug, clap::Args)]
pub struct Args {
    /// User address to check, passed to the contract as given
    address: String,
    #[command(flatten)]
    session: SessionArgs,
}

pub async fn exec(args: Args) -> IdentityCliResult {
    let console = args.session.console()?;
    ops::connect(&console).await?;
    ops::run(&console, Operation::Verify, &args.address).await?;
    Ok(())
}
