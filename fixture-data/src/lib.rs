// Copyright (c) The allure-store Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Descriptions of the checked-in fixtures used by allure-store tests.

pub mod allure_results;
pub mod models;
