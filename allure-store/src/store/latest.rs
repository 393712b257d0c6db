// Copyright (c) The allure-store Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::model::TestResult;
use indexmap::{IndexMap, map::Entry};

/// Keeps one result per history id: the one with the greatest `stop`.
///
/// Output is ordered by the first appearance of each history id. When two
/// results share a history id and a `stop`, the one seen first is kept.
pub(crate) fn latest_by_history(results: Vec<TestResult>) -> Vec<TestResult> {
    let mut latest: IndexMap<String, TestResult> = IndexMap::with_capacity(results.len());
    for result in results {
        match latest.entry(result.history_id.clone()) {
            Entry::Occupied(mut entry) => {
                if result.stop > entry.get().stop {
                    entry.insert(result);
                }
            }
            Entry::Vacant(entry) => {
                entry.insert(result);
            }
        }
    }
    latest.into_values().collect()
}
