// Copyright (c) The allure-store Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Readers and writers for Allure results directories.
//!
//! A results directory holds one `<id>-container.json` file per container,
//! one `<id>-result.json` file per result, and optionally
//! `categories.json`, `executor.json` and `environment.properties`.

mod layout;
mod properties;
mod reader;
mod writer;

pub use reader::FileResultsReader;
pub use writer::FileResultsWriter;
