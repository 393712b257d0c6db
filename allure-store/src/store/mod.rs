// Copyright (c) The allure-store Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The aggregation engine.
//!
//! [`AllureStore`] joins a reader and a writer. Reads of whole result sets go
//! through ancestor resolution and fixture merging; everything else is passed
//! through as-is.

mod ancestors;
mod imp;
mod latest;
mod merge;

pub use imp::*;
