// Copyright (c) The allure-store Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Errors produced by allure-store.

use crate::policy::ErrorPolicy;
use camino::Utf8PathBuf;
use std::{error, fmt};
use thiserror::Error;

/// An error that occurred while reading from or writing to a results store.
///
/// Whether a `StoreError` reaches the caller depends on the
/// [`ErrorPolicy`] the adapter was built with.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StoreError {
    /// The results directory could not be listed.
    #[error("failed to list results directory `{path}`")]
    ListDirectory {
        /// The directory that could not be listed.
        path: Utf8PathBuf,

        /// The underlying error.
        #[source]
        error: std::io::Error,
    },

    /// A file could not be read.
    #[error("failed to read file `{path}`")]
    ReadFile {
        /// The file that could not be read.
        path: Utf8PathBuf,

        /// The underlying error.
        #[source]
        error: std::io::Error,
    },

    /// A JSON document could not be parsed.
    #[error("failed to parse JSON file `{path}`")]
    ParseJson {
        /// The file that could not be parsed.
        path: Utf8PathBuf,

        /// The underlying error.
        #[source]
        error: serde_json::Error,
    },

    /// A properties document could not be parsed.
    #[error("failed to parse properties file `{path}`")]
    ParseProperties {
        /// The file that could not be parsed.
        path: Utf8PathBuf,

        /// The underlying error.
        #[source]
        error: PropertiesParseError,
    },

    /// An identifier cannot be mapped to a file name.
    #[error("invalid {kind} id `{id}`: ids must be non-empty and must not contain path separators")]
    InvalidId {
        /// The kind of entity the id refers to.
        kind: &'static str,

        /// The rejected id.
        id: String,
    },

    /// The results directory could not be prepared for writing.
    #[error("failed to initialize results directory `{path}`")]
    InitDirectory {
        /// The results directory.
        path: Utf8PathBuf,

        /// The underlying error.
        #[source]
        error: std::io::Error,
    },

    /// An entity could not be serialized to JSON.
    #[error("failed to serialize {kind} for `{path}`")]
    SerializeJson {
        /// The kind of entity being written.
        kind: &'static str,

        /// The destination file.
        path: Utf8PathBuf,

        /// The underlying error.
        #[source]
        error: serde_json::Error,
    },

    /// A file could not be written.
    #[error("failed to write {kind} `{path}`")]
    WriteFile {
        /// The kind of entity being written.
        kind: &'static str,

        /// The destination file.
        path: Utf8PathBuf,

        /// The underlying error.
        #[source]
        error: std::io::Error,
    },

    /// An error reported by a custom reader or writer.
    #[error("{message}")]
    Adapter {
        /// A human-readable description of the failure.
        message: String,

        /// The underlying cause, if any.
        #[source]
        cause: Option<Box<dyn error::Error + Send + Sync>>,
    },
}

impl StoreError {
    /// Creates an error for a custom reader or writer with no underlying cause.
    pub fn adapter(message: impl Into<String>) -> Self {
        Self::Adapter {
            message: message.into(),
            cause: None,
        }
    }

    /// Creates an error for a custom reader or writer wrapping an underlying cause.
    pub fn adapter_with_cause(
        message: impl Into<String>,
        cause: impl Into<Box<dyn error::Error + Send + Sync>>,
    ) -> Self {
        Self::Adapter {
            message: message.into(),
            cause: Some(cause.into()),
        }
    }
}

/// An error that occurs while parsing a properties document.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
#[error("line {line}: {message}")]
pub struct PropertiesParseError {
    line: usize,
    message: String,
}

impl PropertiesParseError {
    pub(crate) fn new(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }

    /// Returns the 1-based line number at which the error occurred.
    pub fn line(&self) -> usize {
        self.line
    }
}

/// Error returned while parsing an [`ErrorPolicy`] from a string.
#[derive(Clone, Debug, Error)]
#[error(
    "unrecognized value for error policy: {input}\n(known values: {})",
    ErrorPolicy::variants().join(", "),
)]
pub struct ErrorPolicyParseError {
    input: String,
}

impl ErrorPolicyParseError {
    pub(crate) fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
        }
    }
}

/// Displays an error along with its chain of sources.
pub struct DisplayErrorChain<E>(E);

impl<E: error::Error> DisplayErrorChain<E> {
    /// Creates a new `DisplayErrorChain`.
    pub fn new(error: E) -> Self {
        Self(error)
    }
}

impl<E: error::Error> fmt::Display for DisplayErrorChain<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)?;
        let mut source = self.0.source();
        while let Some(cause) = source {
            write!(f, "\n  caused by: {cause}")?;
            source = cause.source();
        }
        Ok(())
    }
}
