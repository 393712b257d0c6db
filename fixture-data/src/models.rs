// Copyright (c) The allure-store Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Data models for fixture information.

#[derive(Copy, Clone, Debug)]
pub struct ContainerFixture {
    pub uuid: &'static str,
    pub children: &'static [&'static str],
}

#[derive(Copy, Clone, Debug)]
pub struct ResultFixture {
    pub uuid: &'static str,
    pub history_id: &'static str,
    pub full_name: &'static str,
    pub status: &'static str,
    pub stop: i64,
    /// Step names after merging in the fixtures of enclosing containers.
    pub merged_steps: &'static [&'static str],
}

// Compare against (uuid, history id) pairs without building full results.
impl PartialEq<(&str, &str)> for ResultFixture {
    fn eq(&self, (uuid, history_id): &(&str, &str)) -> bool {
        self.uuid == *uuid && self.history_id == *history_id
    }
}
