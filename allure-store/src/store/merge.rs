// Copyright (c) The allure-store Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::model::{Container, Step, TestResult};

/// Returns `result` with the fixture steps of its ancestors spliced around
/// its own steps.
///
/// `ancestors` must be ordered outermost first. Outer fixtures start first and
/// finish last, so `befores` are taken outermost to innermost and `afters`
/// innermost to outermost.
pub(crate) fn merge_steps(result: TestResult, ancestors: &[&Container]) -> TestResult {
    if ancestors.is_empty() {
        return result;
    }

    let befores = ancestors
        .iter()
        .flat_map(|container| container.befores.iter().cloned());
    let afters = ancestors
        .iter()
        .rev()
        .flat_map(|container| container.afters.iter().cloned());
    let steps: Vec<Step> = befores.chain(result.steps).chain(afters).collect();

    TestResult { steps, ..result }
}
