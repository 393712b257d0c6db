// Copyright (c) The allure-store Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::policy::ErrorPolicy;
use serde::Deserialize;

/// Options for a store backed by a results directory.
///
/// Can be deserialized from a configuration file:
///
/// ```toml
/// overwrite = true
/// on-error = "suppress"
/// ```
///
/// A [`Delegate`](ErrorPolicy::Delegate) policy can only be set in code.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
#[non_exhaustive]
pub struct DirectoryConfig {
    /// Whether to remove an existing results directory when the writer is
    /// initialized.
    pub overwrite: bool,

    /// The error policy shared by the reader and writer.
    pub on_error: ErrorPolicy,
}

impl DirectoryConfig {
    /// Creates a configuration with default options: existing results are
    /// kept and errors are propagated.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether an existing results directory is removed on initialization.
    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Sets the error policy.
    pub fn with_on_error(mut self, on_error: ErrorPolicy) -> Self {
        self.on_error = on_error;
        self
    }
}
