// Copyright (c) The allure-store Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::{
    ancestors::{ContainerMap, ParentIndex},
    latest::latest_by_history,
    merge::merge_steps,
};
use crate::{
    config::DirectoryConfig,
    errors::{DisplayErrorChain, StoreError},
    fs::{FileResultsReader, FileResultsWriter},
    model::{Category, CategoryInput, Container, EnvironmentInfo, ExecutorInfo, TestResult},
    reader::ResultsReader,
    writer::ResultsWriter,
};
use camino::Utf8PathBuf;
use futures::future::join_all;
use indexmap::IndexSet;
use tracing::{debug, warn};

/// Reads and writes test results through a reader and a writer, merging
/// container fixtures into results on the way out.
///
/// The store keeps no state between calls: every aggregation reads a fresh
/// snapshot from the reader.
#[derive(Debug)]
pub struct AllureStore<R, W> {
    reader: R,
    writer: W,
}

impl AllureStore<FileResultsReader, FileResultsWriter> {
    /// Creates a store backed by a results directory.
    ///
    /// The reader and writer share `config.on_error`. The writer's
    /// initialization (creating the directory, and removing it first if
    /// `config.overwrite` is set) runs before this returns.
    pub async fn from_directory(
        results_dir: impl Into<Utf8PathBuf>,
        config: DirectoryConfig,
    ) -> Result<Self, StoreError> {
        let results_dir = results_dir.into();
        let reader = FileResultsReader::new(results_dir.clone(), config.on_error.clone());
        let writer = FileResultsWriter::new(results_dir, config.overwrite, config.on_error);
        Self::from_parts(reader, writer).await
    }
}

impl<R: ResultsReader, W: ResultsWriter> AllureStore<R, W> {
    /// Creates a store without initializing the reader or writer.
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    /// Initializes the reader and writer concurrently, then creates a store.
    ///
    /// Fails if either initialization fails.
    pub async fn from_parts(reader: R, writer: W) -> Result<Self, StoreError> {
        futures::try_join!(reader.init(), writer.init())?;
        Ok(Self::new(reader, writer))
    }

    /// Releases the reader and writer concurrently.
    pub async fn release(self) -> Result<(), StoreError> {
        futures::try_join!(self.reader.release(), self.writer.release())?;
        Ok(())
    }

    /// Returns the reader.
    pub fn reader(&self) -> &R {
        &self.reader
    }

    /// Returns the writer.
    pub fn writer(&self) -> &W {
        &self.writer
    }

    /// Returns every readable result, with the `befores` and `afters` of the
    /// containers wrapping it merged into its steps.
    ///
    /// Results are returned in the order the reader lists their ids. Results
    /// and containers that are absent or fail to read are left out; only a
    /// failure to list ids is returned as an error.
    pub async fn all_results(&self) -> Result<Vec<TestResult>, StoreError> {
        let (container_ids, result_ids) =
            futures::try_join!(self.reader.container_ids(), self.reader.result_ids())?;
        let container_ids = dedup_ids("container", container_ids);
        let result_ids = dedup_ids("result", result_ids);

        let (containers, results) = futures::join!(
            self.read_containers(&container_ids),
            self.read_results(&result_ids),
        );
        debug!(
            "read {} of {} containers and {} of {} results",
            containers.len(),
            container_ids.len(),
            results.len(),
            result_ids.len(),
        );

        let index = ParentIndex::new(&containers);
        Ok(results
            .into_iter()
            .map(|result| {
                let ancestors = index.ancestors(&result.uuid);
                merge_steps(result, &ancestors)
            })
            .collect())
    }

    /// Returns the most recent result for each history id, as determined by
    /// the greatest `stop` time.
    ///
    /// Results are merged as in [`all_results`](Self::all_results).
    pub async fn latest_results(&self) -> Result<Vec<TestResult>, StoreError> {
        let all = self.all_results().await?;
        Ok(latest_by_history(all))
    }

    /// Reads a single container, without any merging.
    pub async fn container(&self, id: &str) -> Result<Option<Container>, StoreError> {
        self.reader.read_container(id).await
    }

    /// Reads a single result, without any merging.
    pub async fn result(&self, id: &str) -> Result<Option<TestResult>, StoreError> {
        self.reader.read_result(id).await
    }

    /// Reads the failure categories.
    pub async fn categories(&self) -> Result<Option<Vec<Category>>, StoreError> {
        self.reader.read_categories().await
    }

    /// Reads the environment info.
    pub async fn environment(&self) -> Result<Option<EnvironmentInfo>, StoreError> {
        self.reader.read_environment_info().await
    }

    /// Reads the executor info.
    pub async fn executor(&self) -> Result<Option<ExecutorInfo>, StoreError> {
        self.reader.read_executor_info().await
    }

    /// Writes the failure categories.
    pub async fn write_categories(&self, categories: &[CategoryInput]) -> Result<(), StoreError> {
        self.writer.write_categories(categories).await
    }

    /// Writes the environment info.
    pub async fn write_environment_info(&self, info: &EnvironmentInfo) -> Result<(), StoreError> {
        self.writer.write_environment_info(info).await
    }

    /// Writes the executor info.
    pub async fn write_executor_info(&self, info: &ExecutorInfo) -> Result<(), StoreError> {
        self.writer.write_executor_info(info).await
    }

    /// Writes a container.
    pub async fn write_container(&self, container: &Container) -> Result<(), StoreError> {
        self.writer.write_container(container).await
    }

    /// Writes a result.
    pub async fn write_result(&self, result: &TestResult) -> Result<(), StoreError> {
        self.writer.write_result(result).await
    }

    async fn read_containers(&self, ids: &IndexSet<String>) -> ContainerMap {
        let reads = join_all(ids.iter().map(|id| self.reader.read_container(id))).await;
        ids.iter()
            .zip(reads)
            .filter_map(|(id, read)| omit_failed("container", id, read))
            .map(|container| (container.uuid.clone(), container))
            .collect()
    }

    async fn read_results(&self, ids: &IndexSet<String>) -> Vec<TestResult> {
        let reads = join_all(ids.iter().map(|id| self.reader.read_result(id))).await;
        ids.iter()
            .zip(reads)
            .filter_map(|(id, read)| omit_failed("result", id, read))
            .collect()
    }
}

fn dedup_ids(kind: &str, ids: Vec<String>) -> IndexSet<String> {
    let listed = ids.len();
    let ids: IndexSet<String> = ids.into_iter().collect();
    if ids.len() != listed {
        debug!(
            "reader listed {} duplicate {kind} ids, reading each once",
            listed - ids.len()
        );
    }
    ids
}

fn omit_failed<T>(kind: &str, id: &str, read: Result<Option<T>, StoreError>) -> Option<T> {
    match read {
        Ok(item) => item,
        Err(error) => {
            warn!(
                "leaving out {kind} `{id}`: {}",
                DisplayErrorChain::new(&error)
            );
            None
        }
    }
}
