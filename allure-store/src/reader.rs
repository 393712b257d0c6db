// Copyright (c) The allure-store Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{
    errors::StoreError,
    model::{Category, Container, EnvironmentInfo, ExecutorInfo, TestResult},
};
use std::future::Future;

/// A source of raw containers, results and run metadata.
///
/// Implementations decide how failures are reported: typically through an
/// [`ErrorPolicy`](crate::ErrorPolicy), returning `Ok(None)` (or an empty
/// list) when an error was consumed and `Err` when it should reach the
/// caller.
pub trait ResultsReader: Send + Sync {
    /// Prepares the reader for use. Called once, before any other method.
    ///
    /// The default implementation does nothing.
    fn init(&self) -> impl Future<Output = Result<(), StoreError>> + Send {
        async { Ok(()) }
    }

    /// Releases any resources held by the reader.
    ///
    /// The default implementation does nothing.
    fn release(&self) -> impl Future<Output = Result<(), StoreError>> + Send {
        async { Ok(()) }
    }

    /// Returns the ids of all available containers.
    fn container_ids(&self) -> impl Future<Output = Result<Vec<String>, StoreError>> + Send;

    /// Returns the ids of all available results.
    fn result_ids(&self) -> impl Future<Output = Result<Vec<String>, StoreError>> + Send;

    /// Reads a container by id.
    fn read_container(
        &self,
        id: &str,
    ) -> impl Future<Output = Result<Option<Container>, StoreError>> + Send;

    /// Reads a result by id.
    fn read_result(
        &self,
        id: &str,
    ) -> impl Future<Output = Result<Option<TestResult>, StoreError>> + Send;

    /// Reads the failure categories.
    fn read_categories(&self)
    -> impl Future<Output = Result<Option<Vec<Category>>, StoreError>> + Send;

    /// Reads the environment info.
    fn read_environment_info(
        &self,
    ) -> impl Future<Output = Result<Option<EnvironmentInfo>, StoreError>> + Send;

    /// Reads the executor info.
    fn read_executor_info(
        &self,
    ) -> impl Future<Output = Result<Option<ExecutorInfo>, StoreError>> + Send;
}
