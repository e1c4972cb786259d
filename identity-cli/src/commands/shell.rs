// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

use identity_tools::ops;

use crate::{common_args::SessionArgs, error::IdentityCliResult};

#[derive(Debug, clap::Args)]
pub struct Args {
    /// Connect the wallet before reading the first command
    #[arg(long)]
    connect: bool,
    #[command(flatten)]
    session: SessionArgs,
}

pub async fn exec(args: Args) -> IdentityCliResult {
    let console = args.session.console()?;
    if args.connect {
        // a refused connection is on screen, the user can retry with `connect`
        let _ = ops::connect(&console).await;
    }
    ops::shell(&console).await?;
    Ok(())
}
