// Copyright (c) The allure-store Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::{
    layout::{CATEGORIES_FILE_NAME, ENVIRONMENT_FILE_NAME, EXECUTOR_FILE_NAME, EntityKind},
    properties,
};
use crate::{
    errors::StoreError,
    model::{Category, Container, EnvironmentInfo, ExecutorInfo, TestResult},
    policy::{ErrorPolicy, ErrorSink},
    reader::ResultsReader,
};
use camino::{Utf8Path, Utf8PathBuf};
use serde::de::DeserializeOwned;
use tokio::sync::OnceCell;
use tracing::debug;

/// Reads results from an Allure results directory.
///
/// The directory is listed at most once per reader, the first time ids are
/// requested. Files added later are only seen by a new reader.
#[derive(Debug)]
pub struct FileResultsReader {
    results_dir: Utf8PathBuf,
    sink: ErrorSink,
    scanned: OnceCell<ScannedIds>,
}

#[derive(Debug, Default)]
struct ScannedIds {
    containers: Vec<String>,
    results: Vec<String>,
}

impl FileResultsReader {
    /// Creates a reader for `results_dir`. Nothing is read until the first
    /// request.
    pub fn new(results_dir: impl Into<Utf8PathBuf>, on_error: ErrorPolicy) -> Self {
        Self {
            results_dir: results_dir.into(),
            sink: ErrorSink::new(on_error),
            scanned: OnceCell::new(),
        }
    }

    /// Returns the results directory.
    pub fn results_dir(&self) -> &Utf8Path {
        &self.results_dir
    }

    async fn scanned_ids(&self) -> Result<&ScannedIds, StoreError> {
        // Concurrent callers wait for a single scan. A scan error consumed by
        // the policy caches empty lists; a propagated one is retried next time.
        self.scanned
            .get_or_try_init(|| async {
                match scan_dir(&self.results_dir).await {
                    Ok(ids) => Ok(ids),
                    Err(error) => self.sink.handle(error).map(|()| ScannedIds::default()),
                }
            })
            .await
    }

    async fn read_entity<T: DeserializeOwned>(
        &self,
        kind: EntityKind,
        id: &str,
    ) -> Result<Option<T>, StoreError> {
        match kind.file_name(id) {
            Ok(file_name) => self.read_json(self.results_dir.join(file_name)).await,
            Err(error) => {
                self.sink.handle(error)?;
                Ok(None)
            }
        }
    }

    async fn read_json<T: DeserializeOwned>(
        &self,
        path: Utf8PathBuf,
    ) -> Result<Option<T>, StoreError> {
        let Some(contents) = self.read_file(&path).await? else {
            return Ok(None);
        };
        match serde_json::from_str(&contents) {
            Ok(value) => Ok(Some(value)),
            Err(error) => {
                self.sink.handle(StoreError::ParseJson { path, error })?;
                Ok(None)
            }
        }
    }

    /// Reads a file as UTF-8. Empty files are treated as absent.
    async fn read_file(&self, path: &Utf8Path) -> Result<Option<String>, StoreError> {
        match tokio::fs::read_to_string(path).await {
            Ok(contents) if contents.is_empty() => Ok(None),
            Ok(contents) => Ok(Some(contents)),
            Err(error) => {
                self.sink.handle(StoreError::ReadFile {
                    path: path.to_owned(),
                    error,
                })?;
                Ok(None)
            }
        }
    }
}

impl ResultsReader for FileResultsReader {
    async fn container_ids(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.scanned_ids().await?.containers.clone())
    }

    async fn result_ids(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.scanned_ids().await?.results.clone())
    }

    async fn read_container(&self, id: &str) -> Result<Option<Container>, StoreError> {
        self.read_entity(EntityKind::Container, id).await
    }

    async fn read_result(&self, id: &str) -> Result<Option<TestResult>, StoreError> {
        self.read_entity(EntityKind::Result, id).await
    }

    async fn read_categories(&self) -> Result<Option<Vec<Category>>, StoreError> {
        self.read_json(self.results_dir.join(CATEGORIES_FILE_NAME))
            .await
    }

    async fn read_environment_info(&self) -> Result<Option<EnvironmentInfo>, StoreError> {
        let path = self.results_dir.join(ENVIRONMENT_FILE_NAME);
        let Some(contents) = self.read_file(&path).await? else {
            return Ok(None);
        };
        match properties::parse(&contents) {
            Ok(info) => Ok(Some(info)),
            Err(error) => {
                self.sink
                    .handle(StoreError::ParseProperties { path, error })?;
                Ok(None)
            }
        }
    }

    async fn read_executor_info(&self) -> Result<Option<ExecutorInfo>, StoreError> {
        self.read_json(self.results_dir.join(EXECUTOR_FILE_NAME))
            .await
    }
}

async fn scan_dir(results_dir: &Utf8Path) -> Result<ScannedIds, StoreError> {
    let list_error = |error| StoreError::ListDirectory {
        path: results_dir.to_owned(),
        error,
    };

    let mut file_names = Vec::new();
    let mut entries = tokio::fs::read_dir(results_dir).await.map_err(list_error)?;
    while let Some(entry) = entries.next_entry().await.map_err(list_error)? {
        // Allure never writes non-UTF-8 names.
        if let Ok(file_name) = entry.file_name().into_string() {
            file_names.push(file_name);
        }
    }
    file_names.sort_unstable();

    let mut ids = ScannedIds::default();
    for file_name in &file_names {
        match EntityKind::classify(file_name) {
            Some((EntityKind::Container, id)) => ids.containers.push(id.to_owned()),
            Some((EntityKind::Result, id)) => ids.results.push(id.to_owned()),
            None => {}
        }
    }

    debug!(
        "scanned `{results_dir}`: {} containers, {} results",
        ids.containers.len(),
        ids.results.len(),
    );
    Ok(ids)
}
