// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

use std::{
    io::{self, Write},
    str::FromStr,
};

use tokio::io::{AsyncBufReadExt, BufReader};

use crate::{
    core::{console::Console, facade::Operation, session::SessionStatus, wallet::Wallet},
    utils::{abbreviate, color::Color},
};

const HELP: &str = "\
connect             request wallet access and open a session
register <address>  register a user in the identity registry
check <address>     check whether a user is verified
revoke <address>    revoke a user's verification
status              show the session state
quit                leave the shell";

/// One line of input to the interactive shell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ShellCommand {
    Connect,
    Run(Operation, String),
    Status,
    Help,
    Quit,
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ShellParseError {
    #[error("empty command")]
    Empty,
    #[error("`{0}` needs an address, e.g. `{0} 0x3f1Eae7D46d88F08fc2F8ed27FCb2AB183EB2d0E`")]
    MissingAddress(String),
    #[error("`{0}` takes at most one argument")]
    TooManyArguments(String),
    #[error("unknown command `{0}`, type `help` for the list")]
    Unknown(String),
}

impl FromStr for ShellCommand {
    type Err = ShellParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let command = words.next().ok_or(ShellParseError::Empty)?.to_ascii_lowercase();
        let argument = words.next();
        if words.next().is_some() {
            return Err(ShellParseError::TooManyArguments(command));
        }

        let operation = match command.as_str() {
            "register" => Some(Operation::Register),
            "check" | "verify" => Some(Operation::Verify),
            "revoke" => Some(Operation::Revoke),
            _ => None,
        };
        if let Some(operation) = operation {
            let address = argument.ok_or(ShellParseError::MissingAddress(command))?;
            return Ok(Self::Run(operation, address.to_string()));
        }

        let parsed = match command.as_str() {
            "connect" => Self::Connect,
            "status" => Self::Status,
            "help" | "?" => Self::Help,
            "quit" | "exit" => Self::Quit,
            _ => return Err(ShellParseError::Unknown(command)),
        };
        match argument {
            Some(_) => Err(ShellParseError::TooManyArguments(command)),
            None => Ok(parsed),
        }
    }
}

/// Reads commands from stdin until `quit` or end of input.
///
/// Commands run one at a time against a single session, and every result overwrites the shared
/// output region before it is printed.
pub async fn shell<W: Wallet>(console: &Console<W>) -> eyre::Result<()> {
    egreyln!("Type `help` for commands, `quit` to exit.");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        prompt(console)?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        match line.parse::<ShellCommand>() {
            Ok(ShellCommand::Quit) => break,
            Ok(ShellCommand::Help) => greyln!("{HELP}"),
            Ok(ShellCommand::Status) => print_status(console),
            // failures are already on screen, the shell keeps going
            Ok(ShellCommand::Connect) => {
                let _ = super::connect(console).await;
            }
            Ok(ShellCommand::Run(operation, address)) => {
                let _ = super::run(console, operation, &address).await;
            }
            Err(err) => egreyln!("{err}"),
        }
    }
    Ok(())
}

fn prompt<W: Wallet>(console: &Console<W>) -> io::Result<()> {
    let prompt = match console.sessions().current() {
        Some(session) => format!("identity({})> ", abbreviate(&session.signer().to_string())),
        None => "identity> ".to_string(),
    };
    let mut stdout = io::stdout();
    write!(stdout, "{}", prompt.grey())?;
    stdout.flush()
}

fn print_status<W: Wallet>(console: &Console<W>) {
    let sessions = console.sessions();
    match (sessions.status(), sessions.current()) {
        (SessionStatus::Connected, Some(session)) => greyln!(
            "connected as {} to registry {}",
            session.signer().lavender(),
            sessions.contract().lavender()
        ),
        (status, _) => greyln!("{status:?}, registry {}", sessions.contract().lavender()),
    }
}
