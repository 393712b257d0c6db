// Copyright (c) The allure-store Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The Allure results data model.
//!
//! All types serialize to the camelCase JSON layout used by Allure results
//! directories. Absent optional fields are omitted on write, and empty lists
//! are omitted on write and default to empty on read.

use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Flat key/value metadata describing the environment a run happened in.
///
/// Entry order is preserved.
pub type EnvironmentInfo = IndexMap<String, String>;

/// Fields present in a document that aren't modelled explicitly.
///
/// These are kept so that reading and then writing an entity doesn't lose data.
pub type ExtraFields = IndexMap<String, serde_json::Value>;

/// The lifecycle stage of a test result or step.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    /// Scheduled but not yet started.
    Scheduled,
    /// Currently executing.
    Running,
    /// Execution completed.
    Finished,
    /// Waiting on something else.
    Pending,
    /// Execution was interrupted.
    Interrupted,
}

/// The outcome of a test result or step.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// An assertion failed.
    Failed,
    /// An unexpected error occurred.
    Broken,
    /// Everything went fine.
    Passed,
    /// The test was skipped.
    Skipped,
    /// The outcome is not known.
    Unknown,
}

impl Status {
    /// Returns the string used for this status in results files.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Failed => "failed",
            Self::Broken => "broken",
            Self::Passed => "passed",
            Self::Skipped => "skipped",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Extra details attached to a status, usually for failures.
#[derive(Clone, Debug, Default, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusDetails {
    /// A short failure message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// A stack trace or similar diagnostic output.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace: Option<String>,

    /// Whether this is a known issue.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub known: Option<bool>,

    /// Whether the result is muted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub muted: Option<bool>,

    /// Whether the result is considered flaky.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flaky: Option<bool>,
}

/// How a parameter value is displayed in a report.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterMode {
    /// The parameter is not shown.
    Hidden,
    /// The parameter value is masked.
    Masked,
    /// The parameter is shown as-is.
    Default,
}

/// A named parameter of a test or step.
#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Parameter {
    /// The parameter name.
    pub name: String,

    /// The parameter value, rendered as a string.
    pub value: String,

    /// Whether the parameter is excluded from history id computation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excluded: Option<bool>,

    /// How the parameter is displayed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<ParameterMode>,
}

/// A file attached to a test or step.
#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
pub struct Attachment {
    /// The display name.
    pub name: String,

    /// The MIME type of the attachment.
    #[serde(rename = "type")]
    pub content_type: String,

    /// The file name of the attachment within the results directory.
    pub source: String,
}

/// A name/value label attached to a test result.
#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
pub struct Label {
    /// The label name, e.g. `suite` or `severity`.
    pub name: String,

    /// The label value.
    pub value: String,
}

/// A link attached to a test result.
#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
pub struct Link {
    /// The display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// The link target.
    pub url: String,

    /// The kind of link, e.g. `issue` or `tms`.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

/// A unit of execution within a test result or a fixture.
///
/// Steps may nest arbitrarily. The aggregation engine only ever moves a step
/// as a whole, together with everything nested below it.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    /// The step name.
    pub name: String,

    /// Start time, in milliseconds since the Unix epoch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<i64>,

    /// Stop time, in milliseconds since the Unix epoch. Absent for steps
    /// that never finished.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop: Option<i64>,

    /// The lifecycle stage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage: Option<Stage>,

    /// The outcome.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,

    /// Details about the outcome.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_details: Option<StatusDetails>,

    /// Nested steps.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub steps: Vec<Step>,

    /// Attachments.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,

    /// Parameters.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Parameter>,

    /// Fields that aren't modelled explicitly, such as `description`.
    #[serde(flatten)]
    pub extra: ExtraFields,
}

impl Step {
    /// Creates a new step with the given name and nothing else set.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            start: None,
            stop: None,
            stage: None,
            status: None,
            status_details: None,
            steps: Vec::new(),
            attachments: Vec::new(),
            parameters: Vec::new(),
            extra: ExtraFields::new(),
        }
    }
}

/// A grouping node: a suite, a fixture, or a before/after hook scope.
///
/// A container lists the ids of its children, each of which refers either to
/// another container or to a test result.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Container {
    /// The unique id of this container.
    pub uuid: String,

    /// The display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Ids of the containers and results wrapped by this container, in order.
    #[serde(default)]
    pub children: Vec<String>,

    /// Setup steps run before the children.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub befores: Vec<Step>,

    /// Teardown steps run after the children.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub afters: Vec<Step>,

    /// Fields that aren't modelled explicitly.
    #[serde(flatten)]
    pub extra: ExtraFields,
}

impl Container {
    /// Creates a new container with the given id and no children.
    pub fn new(uuid: impl Into<String>) -> Self {
        Self {
            uuid: uuid.into(),
            name: None,
            children: Vec::new(),
            befores: Vec::new(),
            afters: Vec::new(),
            extra: ExtraFields::new(),
        }
    }
}

/// A single test execution.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TestResult {
    /// The unique id of this execution.
    pub uuid: String,

    /// The id of the logical test, stable across reruns.
    pub history_id: String,

    /// The test name.
    pub name: String,

    /// The fully qualified test name.
    pub full_name: String,

    /// Start time, in milliseconds since the Unix epoch.
    pub start: i64,

    /// Stop time, in milliseconds since the Unix epoch.
    ///
    /// Used as the recency key when several executions share a history id.
    pub stop: i64,

    /// A plain-text description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// An HTML description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description_html: Option<String>,

    /// The lifecycle stage.
    pub stage: Stage,

    /// The outcome.
    pub status: Status,

    /// Details about the outcome.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_details: Option<StatusDetails>,

    /// The steps of this execution.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub steps: Vec<Step>,

    /// Labels.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<Label>,

    /// Links.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<Link>,

    /// Attachments.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,

    /// Parameters.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Parameter>,

    /// Fields that aren't modelled explicitly, such as `testCaseId`.
    #[serde(flatten)]
    pub extra: ExtraFields,
}

/// Information about the CI job or other agent that produced the results.
#[derive(Clone, Debug, Default, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutorInfo {
    /// The executor name, e.g. `GitHub Actions`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// The executor type, e.g. `github`.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    /// A link to the executor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// The ordinal of the build.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_order: Option<i64>,

    /// The build name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_name: Option<String>,

    /// A link to the build.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_url: Option<String>,

    /// A link to the generated report.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report_url: Option<String>,

    /// The report name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report_name: Option<String>,
}

/// A failure classification rule, as stored.
#[derive(Clone, Debug, Default, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// The category name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// A pattern matched against status messages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_regex: Option<String>,

    /// A pattern matched against status traces.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace_regex: Option<String>,

    /// The statuses this category applies to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matched_statuses: Option<Vec<Status>>,

    /// Whether matching results are flaky.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flaky: Option<bool>,
}

/// A message or trace matcher supplied when writing categories.
///
/// Matchers are always stored as text: a [`Matcher::Pattern`] is serialized
/// as the source text of its regex. Options set through a
/// [`RegexBuilder`](regex::RegexBuilder), such as case insensitivity, are
/// not part of the source text and are not preserved.
#[derive(Clone, Debug)]
pub enum Matcher {
    /// A pattern supplied as text.
    Literal(String),
    /// A compiled pattern.
    Pattern(Regex),
}

impl Matcher {
    /// Returns the text form of this matcher.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Literal(text) => text,
            Self::Pattern(regex) => regex.as_str(),
        }
    }
}

// Compiled patterns compare by source text, which is all that is persisted.
impl PartialEq for Matcher {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Literal(a), Self::Literal(b)) => a == b,
            (Self::Pattern(a), Self::Pattern(b)) => a.as_str() == b.as_str(),
            _ => false,
        }
    }
}

impl Serialize for Matcher {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl From<&str> for Matcher {
    fn from(text: &str) -> Self {
        Self::Literal(text.to_owned())
    }
}

impl From<String> for Matcher {
    fn from(text: String) -> Self {
        Self::Literal(text)
    }
}

impl From<Regex> for Matcher {
    fn from(regex: Regex) -> Self {
        Self::Pattern(regex)
    }
}

/// A failure classification rule, as supplied to
/// [`ResultsWriter::write_categories`](crate::ResultsWriter::write_categories).
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryInput {
    /// The category name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// A pattern matched against status messages.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_regex: Option<Matcher>,

    /// A pattern matched against status traces.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace_regex: Option<Matcher>,

    /// The statuses this category applies to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_statuses: Option<Vec<Status>>,

    /// Whether matching results are flaky.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flaky: Option<bool>,
}

impl CategoryInput {
    /// Converts this input into its stored form, replacing compiled patterns
    /// with their source text.
    pub fn to_category(&self) -> Category {
        Category {
            name: self.name.clone(),
            message_regex: self.message_regex.as_ref().map(|m| m.as_str().to_owned()),
            trace_regex: self.trace_regex.as_ref().map(|m| m.as_str().to_owned()),
            matched_statuses: self.matched_statuses.clone(),
            flaky: self.flaky,
        }
    }
}

impl From<Category> for CategoryInput {
    fn from(category: Category) -> Self {
        Self {
            name: category.name,
            message_regex: category.message_regex.map(Matcher::Literal),
            trace_regex: category.trace_regex.map(Matcher::Literal),
            matched_statuses: category.matched_statuses,
            flaky: category.flaky,
        }
    }
}
