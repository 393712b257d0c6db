// Copyright (c) The allure-store Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Builders and in-memory readers and writers for unit tests.

use crate::{
    errors::StoreError,
    model::{
        Category, CategoryInput, Container, EnvironmentInfo, ExecutorInfo, ExtraFields, Stage,
        Status, Step, TestResult,
    },
    policy::{ErrorPolicy, ErrorSink},
    reader::ResultsReader,
    writer::ResultsWriter,
};
use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

pub(crate) fn step(name: &str) -> Step {
    Step {
        start: Some(0),
        stop: Some(0),
        stage: Some(Stage::Finished),
        status: Some(Status::Passed),
        ..Step::new(name)
    }
}

pub(crate) fn container(id: &str, children: &[&str]) -> Container {
    container_with_fixtures(id, children, &[], &[])
}

pub(crate) fn container_with_fixtures(
    id: &str,
    children: &[&str],
    befores: &[&str],
    afters: &[&str],
) -> Container {
    Container {
        children: children.iter().map(|&child| child.to_owned()).collect(),
        befores: befores.iter().map(|&name| step(name)).collect(),
        afters: afters.iter().map(|&name| step(name)).collect(),
        ..Container::new(id)
    }
}

pub(crate) fn result(uuid: &str, history_id: &str, stop: i64) -> TestResult {
    TestResult {
        uuid: uuid.to_owned(),
        history_id: history_id.to_owned(),
        name: format!("test {uuid}"),
        full_name: format!("suite.test {uuid}"),
        start: stop - 10,
        stop,
        description: None,
        description_html: None,
        stage: Stage::Finished,
        status: Status::Passed,
        status_details: None,
        steps: Vec::new(),
        labels: Vec::new(),
        links: Vec::new(),
        attachments: Vec::new(),
        parameters: Vec::new(),
        extra: ExtraFields::new(),
    }
}

#[derive(Clone, Debug)]
enum Stored<T> {
    Present(T),
    Absent,
    Failing,
}

/// Ids in listing order, plus what reading each id produces.
#[derive(Debug)]
struct Listing<T> {
    ids: Vec<String>,
    entries: HashMap<String, Stored<T>>,
}

impl<T> Default for Listing<T> {
    fn default() -> Self {
        Self {
            ids: Vec::new(),
            entries: HashMap::new(),
        }
    }
}

impl<T: Clone> Listing<T> {
    fn add(&mut self, id: &str, stored: Stored<T>) {
        self.ids.push(id.to_owned());
        self.entries.insert(id.to_owned(), stored);
    }

    fn read(&self, kind: &str, id: &str, sink: &ErrorSink) -> Result<Option<T>, StoreError> {
        match self.entries.get(id) {
            Some(Stored::Present(item)) => Ok(Some(item.clone())),
            Some(Stored::Absent) | None => Ok(None),
            Some(Stored::Failing) => {
                sink.handle(StoreError::adapter(format!("failed to read {kind} `{id}`")))?;
                Ok(None)
            }
        }
    }
}

/// A reader serving entities from memory.
///
/// Entries can be present, listed but absent, or listed but failing. Failures
/// are routed through the reader's error policy.
#[derive(Debug)]
pub(crate) struct MemoryReader {
    containers: Listing<Container>,
    results: Listing<TestResult>,
    categories: Option<Vec<Category>>,
    environment_info: Option<EnvironmentInfo>,
    executor_info: Option<ExecutorInfo>,
    fail_result_ids: bool,
    sink: ErrorSink,
    init_count: AtomicUsize,
}

impl Default for MemoryReader {
    fn default() -> Self {
        Self::with_policy(ErrorPolicy::Propagate)
    }
}

impl MemoryReader {
    pub(crate) fn with_policy(policy: ErrorPolicy) -> Self {
        Self {
            containers: Listing::default(),
            results: Listing::default(),
            categories: None,
            environment_info: None,
            executor_info: None,
            fail_result_ids: false,
            sink: ErrorSink::new(policy),
            init_count: AtomicUsize::new(0),
        }
    }

    pub(crate) fn add_container(&mut self, container: Container) {
        let id = container.uuid.clone();
        self.containers.add(&id, Stored::Present(container));
    }

    pub(crate) fn add_absent_container(&mut self, id: &str) {
        self.containers.add(id, Stored::Absent);
    }

    pub(crate) fn add_failing_container(&mut self, id: &str) {
        self.containers.add(id, Stored::Failing);
    }

    pub(crate) fn add_result(&mut self, result: TestResult) {
        let id = result.uuid.clone();
        self.results.add(&id, Stored::Present(result));
    }

    pub(crate) fn add_absent_result(&mut self, id: &str) {
        self.results.add(id, Stored::Absent);
    }

    pub(crate) fn add_failing_result(&mut self, id: &str) {
        self.results.add(id, Stored::Failing);
    }

    pub(crate) fn set_categories(&mut self, categories: Vec<Category>) {
        self.categories = Some(categories);
    }

    pub(crate) fn set_environment_info(&mut self, info: EnvironmentInfo) {
        self.environment_info = Some(info);
    }

    pub(crate) fn set_executor_info(&mut self, info: ExecutorInfo) {
        self.executor_info = Some(info);
    }

    pub(crate) fn fail_result_ids(&mut self) {
        self.fail_result_ids = true;
    }

    pub(crate) fn init_count(&self) -> usize {
        self.init_count.load(Ordering::SeqCst)
    }
}

impl ResultsReader for MemoryReader {
    async fn init(&self) -> Result<(), StoreError> {
        self.init_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn container_ids(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.containers.ids.clone())
    }

    async fn result_ids(&self) -> Result<Vec<String>, StoreError> {
        if self.fail_result_ids {
            return Err(StoreError::adapter("failed to list result ids"));
        }
        Ok(self.results.ids.clone())
    }

    async fn read_container(&self, id: &str) -> Result<Option<Container>, StoreError> {
        self.containers.read("container", id, &self.sink)
    }

    async fn read_result(&self, id: &str) -> Result<Option<TestResult>, StoreError> {
        self.results.read("result", id, &self.sink)
    }

    async fn read_categories(&self) -> Result<Option<Vec<Category>>, StoreError> {
        Ok(self.categories.clone())
    }

    async fn read_environment_info(&self) -> Result<Option<EnvironmentInfo>, StoreError> {
        Ok(self.environment_info.clone())
    }

    async fn read_executor_info(&self) -> Result<Option<ExecutorInfo>, StoreError> {
        Ok(self.executor_info.clone())
    }
}

/// A call made to a [`RecordingWriter`].
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum WriterCall {
    Categories(Vec<CategoryInput>),
    EnvironmentInfo(EnvironmentInfo),
    ExecutorInfo(ExecutorInfo),
    Container(Container),
    Result(TestResult),
}

/// A writer that records every call made to it.
#[derive(Debug, Default)]
pub(crate) struct RecordingWriter {
    calls: Mutex<Vec<WriterCall>>,
    lifecycle: Arc<Mutex<Vec<&'static str>>>,
    fail_init: bool,
}

impl RecordingWriter {
    pub(crate) fn failing_init() -> Self {
        Self {
            fail_init: true,
            ..Self::default()
        }
    }

    pub(crate) fn calls(&self) -> Vec<WriterCall> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn init_count(&self) -> usize {
        self.lifecycle
            .lock()
            .unwrap()
            .iter()
            .filter(|&&event| event == "init")
            .count()
    }

    /// Returns the lifecycle log, which outlives the writer.
    pub(crate) fn lifecycle_log(&self) -> Arc<Mutex<Vec<&'static str>>> {
        self.lifecycle.clone()
    }

    fn record(&self, call: WriterCall) {
        self.calls.lock().unwrap().push(call);
    }
}

impl ResultsWriter for RecordingWriter {
    async fn init(&self) -> Result<(), StoreError> {
        if self.fail_init {
            return Err(StoreError::adapter("failed to initialize writer"));
        }
        self.lifecycle.lock().unwrap().push("init");
        Ok(())
    }

    async fn release(&self) -> Result<(), StoreError> {
        self.lifecycle.lock().unwrap().push("release");
        Ok(())
    }

    async fn write_categories(&self, categories: &[CategoryInput]) -> Result<(), StoreError> {
        self.record(WriterCall::Categories(categories.to_vec()));
        Ok(())
    }

    async fn write_environment_info(&self, info: &EnvironmentInfo) -> Result<(), StoreError> {
        self.record(WriterCall::EnvironmentInfo(info.clone()));
        Ok(())
    }

    async fn write_executor_info(&self, info: &ExecutorInfo) -> Result<(), StoreError> {
        self.record(WriterCall::ExecutorInfo(info.clone()));
        Ok(())
    }

    async fn write_container(&self, container: &Container) -> Result<(), StoreError> {
        self.record(WriterCall::Container(container.clone()));
        Ok(())
    }

    async fn write_result(&self, result: &TestResult) -> Result<(), StoreError> {
        self.record(WriterCall::Result(result.clone()));
        Ok(())
    }
}
