// Copyright (c) The allure-store Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

#![warn(missing_docs)]

//! Read and write [Allure](https://allurereport.org/) results.
//!
//! An Allure results directory is a flat collection of test results and
//! containers. Containers group results and other containers, and carry the
//! setup (`befores`) and teardown (`afters`) steps that ran around them.
//!
//! [`AllureStore`] combines a [`ResultsReader`] and a [`ResultsWriter`].
//! Its [`all_results`](AllureStore::all_results) and
//! [`latest_results`](AllureStore::latest_results) methods resolve each
//! result's enclosing containers and merge their fixture steps into the
//! result, so that every result reads as a self-contained sequence of steps.
//!
//! The [`fs`] module provides a reader and writer for results directories on
//! disk. Other backends can implement the reader and writer traits directly.
//!
//! # Examples
//!
//! ```no_run
//! use allure_store::{AllureStore, DirectoryConfig, ErrorPolicy};
//!
//! # async fn run() -> Result<(), allure_store::errors::StoreError> {
//! let config = DirectoryConfig::new().with_on_error(ErrorPolicy::Suppress);
//! let store = AllureStore::from_directory("allure-results", config).await?;
//! for result in store.latest_results().await? {
//!     println!("{}: {}", result.full_name, result.status);
//! }
//! store.release().await?;
//! # Ok(())
//! # }
//! ```

mod config;
pub mod errors;
pub mod fs;
mod model;
mod policy;
mod reader;
mod store;
#[cfg(test)]
mod test_helpers;
mod writer;

pub use config::*;
pub use model::*;
pub use policy::{ErrorCallback, ErrorPolicy};
pub use reader::*;
pub use store::*;
pub use writer::*;
