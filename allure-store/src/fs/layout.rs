// Copyright (c) The allure-store Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! File names within a results directory.

use crate::errors::StoreError;

pub(crate) static CATEGORIES_FILE_NAME: &str = "categories.json";
pub(crate) static ENVIRONMENT_FILE_NAME: &str = "environment.properties";
pub(crate) static EXECUTOR_FILE_NAME: &str = "executor.json";

/// An entity stored as one file per id.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum EntityKind {
    Container,
    Result,
}

impl EntityKind {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::Container => "container",
            Self::Result => "result",
        }
    }

    fn suffix(self) -> &'static str {
        match self {
            Self::Container => "-container.json",
            Self::Result => "-result.json",
        }
    }

    /// Returns the file name for `id`, or an error if `id` can't be used as
    /// part of a file name.
    pub(crate) fn file_name(self, id: &str) -> Result<String, StoreError> {
        validate_id(self, id)?;
        Ok(format!("{id}{}", self.suffix()))
    }

    /// Splits a directory entry into its kind and id, if it is an entity file.
    pub(crate) fn classify(file_name: &str) -> Option<(Self, &str)> {
        [Self::Container, Self::Result]
            .into_iter()
            .find_map(|kind| {
                let id = file_name.strip_suffix(kind.suffix())?;
                validate_id(kind, id).ok()?;
                Some((kind, id))
            })
    }
}

fn validate_id(kind: EntityKind, id: &str) -> Result<(), StoreError> {
    if id.is_empty() || id == ".." || id.contains(['/', '\\']) {
        return Err(StoreError::InvalidId {
            kind: kind.as_str(),
            id: id.to_owned(),
        });
    }
    Ok(())
}
