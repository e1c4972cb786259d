// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

//! User-facing operations that print the shared output region to the terminal.

use crate::{
    core::{
        console::Console,
        facade::Operation,
        output::OperationResult,
        wallet::Wallet,
    },
    utils::color::{Color, DebugColor},
};

pub use shell::{shell, ShellCommand};

mod shell;

/// An action finished with a failure that has already been shown to the user.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct ActionFailed(pub String);

/// Connects the wallet and prints the resulting output.
pub async fn connect<W: Wallet>(console: &Console<W>) -> Result<(), ActionFailed> {
    let connected = console.connect().await;
    print_output(console);
    let session = connected.map_err(|err| ActionFailed(err.to_string()))?;
    greyln!(
        "Signing as {} for registry {}",
        session.signer().debug_lavender(),
        console.sessions().contract().debug_lavender()
    );
    Ok(())
}

/// Runs a single registry operation and prints the resulting output.
pub async fn run<W: Wallet>(
    console: &Console<W>,
    operation: Operation,
    address: &str,
) -> Result<(), ActionFailed> {
    match console.run(operation, address).await {
        result @ OperationResult::Success(_) => {
            print_result(&result);
            Ok(())
        }
        result @ OperationResult::Failure(_) => {
            print_result(&result);
            Err(ActionFailed(result.to_string()))
        }
    }
}

fn print_output<W: Wallet>(console: &Console<W>) {
    if let Some(result) = console.output().latest() {
        print_result(&result);
    }
}

fn print_result(result: &OperationResult) {
    if result.is_success() {
        mintln!("{result}");
    } else {
        println!("{}", result.red());
    }
}
