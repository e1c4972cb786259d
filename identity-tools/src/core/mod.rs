// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

pub mod config;
pub mod console;
pub mod facade;
pub mod manifest;
pub mod output;
pub mod registry;
pub mod session;
pub mod wallet;
