// Copyright (c) The allure-store Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{
    errors::StoreError,
    model::{CategoryInput, Container, EnvironmentInfo, ExecutorInfo, TestResult},
};
use std::future::Future;

/// A destination for containers, results and run metadata.
pub trait ResultsWriter: Send + Sync {
    /// Prepares the writer for use, e.g. by creating its backing store.
    /// Called once, before any other method.
    ///
    /// The default implementation does nothing.
    fn init(&self) -> impl Future<Output = Result<(), StoreError>> + Send {
        async { Ok(()) }
    }

    /// Releases any resources held by the writer.
    ///
    /// The default implementation does nothing.
    fn release(&self) -> impl Future<Output = Result<(), StoreError>> + Send {
        async { Ok(()) }
    }

    /// Writes the failure categories.
    ///
    /// Matchers supplied as compiled patterns must be persisted as their
    /// source text, so that they read back as [`Category`](crate::Category)
    /// strings.
    fn write_categories(
        &self,
        categories: &[CategoryInput],
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Writes the environment info.
    fn write_environment_info(
        &self,
        info: &EnvironmentInfo,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Writes the executor info.
    fn write_executor_info(
        &self,
        info: &ExecutorInfo,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Writes a container, keyed by its id.
    fn write_container(
        &self,
        container: &Container,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Writes a result, keyed by its id.
    fn write_result(
        &self,
        result: &TestResult,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;
}
