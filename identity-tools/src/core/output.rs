// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

use std::{fmt, sync::Arc};

use parking_lot::Mutex;

/// Outcome of a user-triggered action, as shown to the user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OperationResult {
    Success(String),
    Failure(String),
}

impl OperationResult {
    pub fn success(message: impl Into<String>) -> Self {
        Self::Success(message.into())
    }

    pub fn failure(err: impl fmt::Display) -> Self {
        Self::Failure(err.to_string())
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

impl fmt::Display for OperationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success(message) => f.write_str(message),
            Self::Failure(message) => write!(f, "Error: {message}"),
        }
    }
}

/// The single output region shared by every action.
///
/// Each write replaces the whole region, so readers see exactly one result: the last one written.
/// Clones share the same region.
#[derive(Clone, Debug, Default)]
pub struct OutputSurface {
    inner: Arc<Mutex<Region>>,
}

#[derive(Debug, Default)]
struct Region {
    latest: Option<OperationResult>,
    writes: u64,
}

impl OutputSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show(&self, result: OperationResult) {
        let mut region = self.inner.lock();
        region.latest = Some(result);
        region.writes += 1;
    }

    pub fn latest(&self) -> Option<OperationResult> {
        self.inner.lock().latest.clone()
    }

    /// Rendered text of the region; empty before the first write.
    pub fn text(&self) -> String {
        self.inner
            .lock()
            .latest
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default()
    }

    /// Number of results written so far.
    pub fn writes(&self) -> u64 {
        self.inner.lock().writes
    }
}
