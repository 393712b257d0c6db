// Copyright (c) The allure-store Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! What readers and writers do when an operation fails.

use crate::errors::{DisplayErrorChain, ErrorPolicyParseError, StoreError};
use debug_ignore::DebugIgnore;
use serde::{Deserialize, Deserializer, de::Error as _};
use std::{fmt, str::FromStr, sync::Arc};
use tracing::debug;

/// A callback invoked with every error under [`ErrorPolicy::Delegate`].
pub type ErrorCallback = Arc<dyn Fn(StoreError) + Send + Sync>;

/// How a reader or writer handles a failed operation.
///
/// Under every policy other than [`Propagate`](Self::Propagate), a failed
/// read reports the entity as absent and a failed write is skipped.
#[derive(Clone, Debug, Default)]
pub enum ErrorPolicy {
    /// Return the error to the caller of the failing operation.
    #[default]
    Propagate,

    /// Discard the error.
    Suppress,

    /// Pass the error to a callback, then behave like [`Suppress`](Self::Suppress).
    Delegate(DebugIgnore<ErrorCallback>),
}

impl ErrorPolicy {
    /// Creates a [`Delegate`](Self::Delegate) policy from a callback.
    pub fn delegate(callback: impl Fn(StoreError) + Send + Sync + 'static) -> Self {
        Self::Delegate(DebugIgnore(Arc::new(callback)))
    }

    /// Returns the names that can be parsed into a policy.
    pub fn variants() -> &'static [&'static str] {
        &["propagate", "suppress"]
    }
}

impl FromStr for ErrorPolicy {
    type Err = ErrorPolicyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "propagate" | "throw" => Ok(Self::Propagate),
            "suppress" | "ignore" => Ok(Self::Suppress),
            other => Err(ErrorPolicyParseError::new(other)),
        }
    }
}

impl<'de> Deserialize<'de> for ErrorPolicy {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(D::Error::custom)
    }
}

impl fmt::Display for ErrorPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Propagate => f.write_str("propagate"),
            Self::Suppress => f.write_str("suppress"),
            Self::Delegate(_) => f.write_str("delegate"),
        }
    }
}

/// An [`ErrorPolicy`] resolved for use by a single adapter.
///
/// Every fallible operation of an adapter routes its errors through
/// [`handle`](Self::handle).
#[derive(Clone, Debug)]
pub(crate) struct ErrorSink {
    policy: ErrorPolicy,
}

impl ErrorSink {
    pub(crate) fn new(policy: ErrorPolicy) -> Self {
        Self { policy }
    }

    /// Returns `Err` if the error should reach the caller, `Ok` if it was
    /// consumed.
    pub(crate) fn handle(&self, error: StoreError) -> Result<(), StoreError> {
        match &self.policy {
            ErrorPolicy::Propagate => Err(error),
            ErrorPolicy::Suppress => {
                debug!("suppressed error: {}", DisplayErrorChain::new(&error));
                Ok(())
            }
            ErrorPolicy::Delegate(callback) => {
                callback(error);
                Ok(())
            }
        }
    }
}
