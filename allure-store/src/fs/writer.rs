// Copyright (c) The allure-store Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::{
    layout::{CATEGORIES_FILE_NAME, ENVIRONMENT_FILE_NAME, EXECUTOR_FILE_NAME, EntityKind},
    properties,
};
use crate::{
    errors::StoreError,
    model::{CategoryInput, Container, EnvironmentInfo, ExecutorInfo, TestResult},
    policy::{ErrorPolicy, ErrorSink},
    writer::ResultsWriter,
};
use atomicwrites::{AtomicFile, OverwriteBehavior};
use camino::{Utf8Path, Utf8PathBuf};
use serde::Serialize;
use std::io::{self, Write};
use tracing::debug;

/// Writes results to an Allure results directory.
///
/// Every file is written atomically, so a concurrent reader sees either the
/// previous contents or the new contents.
#[derive(Debug)]
pub struct FileResultsWriter {
    results_dir: Utf8PathBuf,
    overwrite: bool,
    sink: ErrorSink,
}

impl FileResultsWriter {
    /// Creates a writer for `results_dir`.
    ///
    /// If `overwrite` is true, [`init`](ResultsWriter::init) removes an
    /// existing directory before recreating it.
    pub fn new(results_dir: impl Into<Utf8PathBuf>, overwrite: bool, on_error: ErrorPolicy) -> Self {
        Self {
            results_dir: results_dir.into(),
            overwrite,
            sink: ErrorSink::new(on_error),
        }
    }

    /// Returns the results directory.
    pub fn results_dir(&self) -> &Utf8Path {
        &self.results_dir
    }

    async fn prepare_dir(&self) -> io::Result<()> {
        if self.overwrite && tokio::fs::try_exists(&self.results_dir).await? {
            debug!("removing existing results directory `{}`", self.results_dir);
            tokio::fs::remove_dir_all(&self.results_dir).await?;
        }
        tokio::fs::create_dir_all(&self.results_dir).await
    }

    async fn write_entity<T: Serialize + Sync>(
        &self,
        kind: EntityKind,
        id: &str,
        value: &T,
    ) -> Result<(), StoreError> {
        match kind.file_name(id) {
            Ok(file_name) => {
                self.write_json(kind.as_str(), self.results_dir.join(file_name), value)
                    .await
            }
            Err(error) => self.sink.handle(error),
        }
    }

    async fn write_json<T: Serialize + ?Sized + Sync>(
        &self,
        kind: &'static str,
        path: Utf8PathBuf,
        value: &T,
    ) -> Result<(), StoreError> {
        let mut bytes = match serde_json::to_vec(value) {
            Ok(bytes) => bytes,
            Err(error) => {
                return self
                    .sink
                    .handle(StoreError::SerializeJson { kind, path, error });
            }
        };
        bytes.push(b'\n');
        self.write_bytes(kind, path, bytes).await
    }

    async fn write_bytes(
        &self,
        kind: &'static str,
        path: Utf8PathBuf,
        bytes: Vec<u8>,
    ) -> Result<(), StoreError> {
        match write_atomic(path.clone(), bytes).await {
            Ok(()) => Ok(()),
            Err(error) => self.sink.handle(StoreError::WriteFile { kind, path, error }),
        }
    }
}

impl ResultsWriter for FileResultsWriter {
    async fn init(&self) -> Result<(), StoreError> {
        match self.prepare_dir().await {
            Ok(()) => Ok(()),
            Err(error) => self.sink.handle(StoreError::InitDirectory {
                path: self.results_dir.clone(),
                error,
            }),
        }
    }

    async fn write_categories(&self, categories: &[CategoryInput]) -> Result<(), StoreError> {
        self.write_json(
            "categories",
            self.results_dir.join(CATEGORIES_FILE_NAME),
            categories,
        )
        .await
    }

    async fn write_environment_info(&self, info: &EnvironmentInfo) -> Result<(), StoreError> {
        let text = properties::stringify(info);
        self.write_bytes(
            "environment info",
            self.results_dir.join(ENVIRONMENT_FILE_NAME),
            text.into_bytes(),
        )
        .await
    }

    async fn write_executor_info(&self, info: &ExecutorInfo) -> Result<(), StoreError> {
        self.write_json(
            "executor info",
            self.results_dir.join(EXECUTOR_FILE_NAME),
            info,
        )
        .await
    }

    async fn write_container(&self, container: &Container) -> Result<(), StoreError> {
        self.write_entity(EntityKind::Container, &container.uuid, container)
            .await
    }

    async fn write_result(&self, result: &TestResult) -> Result<(), StoreError> {
        self.write_entity(EntityKind::Result, &result.uuid, result)
            .await
    }
}

/// Writes `bytes` to `path` through a temporary file and a rename.
async fn write_atomic(path: Utf8PathBuf, bytes: Vec<u8>) -> io::Result<()> {
    tokio::task::spawn_blocking(move || {
        AtomicFile::new(&path, OverwriteBehavior::AllowOverwrite)
            .write(|file| file.write_all(&bytes))
            .map_err(|error| match error {
                atomicwrites::Error::Internal(error) | atomicwrites::Error::User(error) => error,
            })
    })
    .await
    .map_err(io::Error::other)?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        model::{Matcher, Status},
        test_helpers::{container_with_fixtures, result},
    };
    use camino_tempfile::Utf8TempDir;
    use pretty_assertions::assert_eq;
    use regex::RegexBuilder;
    use std::sync::{Arc, Mutex};

    fn read(path: &Utf8Path) -> String {
        std::fs::read_to_string(path).expect("file was written")
    }

    #[tokio::test]
    async fn init_creates_nested_directory() {
        let dir = Utf8TempDir::new().unwrap();
        let results_dir = dir.path().join("a/b/allure-results");

        let writer = FileResultsWriter::new(&results_dir, false, ErrorPolicy::Propagate);
        writer.init().await.unwrap();
        assert!(results_dir.is_dir());
    }

    #[tokio::test]
    async fn init_keeps_existing_files_without_overwrite() {
        let dir = Utf8TempDir::new().unwrap();
        let existing = dir.path().join("old-result.json");
        std::fs::write(&existing, "{}").unwrap();

        let writer = FileResultsWriter::new(dir.path(), false, ErrorPolicy::Propagate);
        writer.init().await.unwrap();
        assert!(existing.exists());
    }

    #[tokio::test]
    async fn init_with_overwrite_clears_directory() {
        let dir = Utf8TempDir::new().unwrap();
        let results_dir = dir.path().join("allure-results");
        std::fs::create_dir(&results_dir).unwrap();
        std::fs::write(results_dir.join("old-result.json"), "{}").unwrap();

        let writer = FileResultsWriter::new(&results_dir, true, ErrorPolicy::Propagate);
        writer.init().await.unwrap();
        assert!(results_dir.is_dir());
        assert_eq!(std::fs::read_dir(&results_dir).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn init_failure_follows_policy() {
        let dir = Utf8TempDir::new().unwrap();
        // A file where the directory should go.
        let blocked = dir.path().join("blocked");
        std::fs::write(&blocked, "").unwrap();
        let results_dir = blocked.join("allure-results");

        let writer = FileResultsWriter::new(&results_dir, false, ErrorPolicy::Propagate);
        let error = writer.init().await.unwrap_err();
        assert!(
            matches!(&error, StoreError::InitDirectory { path, .. } if *path == results_dir),
            "unexpected error: {error}"
        );

        let writer = FileResultsWriter::new(&results_dir, false, ErrorPolicy::Suppress);
        writer.init().await.unwrap();
    }

    #[tokio::test]
    async fn writes_entities_as_json_lines() {
        let dir = Utf8TempDir::new().unwrap();
        let writer = FileResultsWriter::new(dir.path(), false, ErrorPolicy::Propagate);

        let container = container_with_fixtures("c1", &["r1"], &["setup"], &[]);
        writer.write_container(&container).await.unwrap();
        let text = read(&dir.path().join("c1-container.json"));
        assert!(text.ends_with("}\n"), "compact JSON with a newline: {text:?}");
        assert_eq!(text.lines().count(), 1);
        let read_back: Container = serde_json::from_str(&text).unwrap();
        assert_eq!(read_back, container);

        let result = result("r1", "h1", 100);
        writer.write_result(&result).await.unwrap();
        let read_back: TestResult =
            serde_json::from_str(&read(&dir.path().join("r1-result.json"))).unwrap();
        assert_eq!(read_back, result);

        let executor = ExecutorInfo {
            name: Some("Jenkins".to_owned()),
            build_order: Some(7),
            ..Default::default()
        };
        writer.write_executor_info(&executor).await.unwrap();
        assert_eq!(
            read(&dir.path().join("executor.json")),
            "{\"name\":\"Jenkins\",\"buildOrder\":7}\n"
        );
    }

    #[tokio::test]
    async fn writes_overwrite_previous_contents() {
        let dir = Utf8TempDir::new().unwrap();
        let writer = FileResultsWriter::new(dir.path(), false, ErrorPolicy::Propagate);

        writer.write_result(&result("r1", "h1", 100)).await.unwrap();
        writer.write_result(&result("r1", "h1", 200)).await.unwrap();
        let read_back: TestResult =
            serde_json::from_str(&read(&dir.path().join("r1-result.json"))).unwrap();
        assert_eq!(read_back.stop, 200);
    }

    #[tokio::test]
    async fn categories_store_pattern_source() {
        let dir = Utf8TempDir::new().unwrap();
        let writer = FileResultsWriter::new(dir.path(), false, ErrorPolicy::Propagate);

        let pattern = RegexBuilder::new(r".*timeout.*")
            .case_insensitive(true)
            .build()
            .unwrap();
        let categories = [CategoryInput {
            name: Some("Timeouts".to_owned()),
            message_regex: Some(Matcher::from(pattern)),
            trace_regex: Some(Matcher::from("at .*")),
            matched_statuses: Some(vec![Status::Broken]),
            ..Default::default()
        }];
        writer.write_categories(&categories).await.unwrap();

        assert_eq!(
            read(&dir.path().join("categories.json")),
            "[{\"name\":\"Timeouts\",\"messageRegex\":\".*timeout.*\",\
             \"traceRegex\":\"at .*\",\"matchedStatuses\":[\"broken\"]}]\n"
        );
    }

    #[tokio::test]
    async fn writes_environment_properties() {
        let dir = Utf8TempDir::new().unwrap();
        let writer = FileResultsWriter::new(dir.path(), false, ErrorPolicy::Propagate);

        let info: EnvironmentInfo = [("version", "1.0.0"), ("locale", "fr-FR é")]
            .into_iter()
            .map(|(k, v)| (k.to_owned(), v.to_owned()))
            .collect();
        writer.write_environment_info(&info).await.unwrap();

        assert_eq!(
            read(&dir.path().join("environment.properties")),
            "version=1.0.0\nlocale=fr-FR \\u00e9\n"
        );
    }

    #[tokio::test]
    async fn write_failures_follow_policy() {
        let dir = Utf8TempDir::new().unwrap();
        let missing = dir.path().join("never-created");

        let writer = FileResultsWriter::new(&missing, false, ErrorPolicy::Propagate);
        let error = writer
            .write_result(&result("r1", "h1", 1))
            .await
            .unwrap_err();
        assert!(
            matches!(error, StoreError::WriteFile { kind: "result", .. }),
            "unexpected error: {error}"
        );

        let seen = Arc::new(Mutex::new(Vec::new()));
        let policy = ErrorPolicy::delegate({
            let seen = seen.clone();
            move |error| seen.lock().unwrap().push(error.to_string())
        });
        let writer = FileResultsWriter::new(&missing, false, policy);
        writer
            .write_executor_info(&ExecutorInfo::default())
            .await
            .unwrap();
        writer
            .write_result(&result("../escape", "h1", 1))
            .await
            .unwrap();
        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert!(seen[0].starts_with("failed to write executor info"));
        assert!(seen[1].starts_with("invalid result id `../escape`"));
    }
}
