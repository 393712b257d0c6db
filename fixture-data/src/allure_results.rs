// Copyright (c) The allure-store Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Information about the "allure-results" fixture.

use crate::models::{ContainerFixture, ResultFixture};
use camino::Utf8PathBuf;
use std::sync::LazyLock;

/// The fixture directory, `fixtures/allure-results` at the workspace root.
pub static ALLURE_RESULTS_DIR: LazyLock<Utf8PathBuf> = LazyLock::new(|| {
    Utf8PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .expect("fixture-data is one level below the workspace root")
        .join("fixtures/allure-results")
});

/// Containers in the order a directory reader lists them (sorted by file name).
pub static EXPECTED_CONTAINERS: &[ContainerFixture] = &[
    ContainerFixture {
        uuid: "fixture-db",
        children: &["add-1", "add-2", "sub-1"],
    },
    ContainerFixture {
        uuid: "orphan-fixture",
        children: &["ghost"],
    },
    ContainerFixture {
        uuid: "suite-math",
        children: &["fixture-db"],
    },
];

static MATH_STEPS_ADD: &[&str] = &[
    "start server",
    "connect database",
    "compute sum",
    "disconnect database",
    "stop server",
];

/// Results in the order a directory reader lists them (sorted by file name).
pub static EXPECTED_RESULTS: &[ResultFixture] = &[
    ResultFixture {
        uuid: "add-1",
        history_id: "math.add",
        full_name: "math.adds numbers",
        status: "failed",
        stop: 1_700_000_001_000,
        merged_steps: MATH_STEPS_ADD,
    },
    ResultFixture {
        uuid: "add-2",
        history_id: "math.add",
        full_name: "math.adds numbers",
        status: "passed",
        stop: 1_700_000_005_000,
        merged_steps: MATH_STEPS_ADD,
    },
    ResultFixture {
        uuid: "standalone-1",
        history_id: "util.format",
        full_name: "util.formats strings",
        status: "broken",
        stop: 1_700_000_006_500,
        merged_steps: &["format string"],
    },
    ResultFixture {
        uuid: "sub-1",
        history_id: "math.sub",
        full_name: "math.subtracts numbers",
        status: "passed",
        stop: 1_700_000_003_000,
        merged_steps: &[
            "start server",
            "connect database",
            "compute difference",
            "disconnect database",
            "stop server",
        ],
    },
];

/// Uuids of the latest result per history id, in order of first appearance.
pub static EXPECTED_LATEST: &[&str] = &["add-2", "standalone-1", "sub-1"];

/// Names of the categories in `categories.json`, in file order.
pub static EXPECTED_CATEGORY_NAMES: &[&str] = &["Product defects", "Test defects"];

/// `environment.properties` entries, in file order.
pub static EXPECTED_ENVIRONMENT: &[(&str, &str)] = &[
    ("NODE_ENV", "test"),
    ("APP_URL", "http://localhost:3000"),
    ("LOCALE", "fr-FR \u{e9}"),
];

/// Looks up the expected shape of the result with the given uuid.
pub fn expected_result(uuid: &str) -> Option<&'static ResultFixture> {
    EXPECTED_RESULTS.iter().find(|fixture| fixture.uuid == uuid)
}
