//! Test cases, flows and flow steps.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::{StringMap, ValueMap};

/// Extraction rules: extraction target (`body`, `json`, `headers`, ...) to
/// a mapping of variable name to source path.
pub type ExtractMap = IndexMap<String, StringMap>;

/// The `tests` section: standalone cases and multi-step flows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tests {
    /// Standalone test cases, in execution order.
    #[serde(default)]
    pub test_cases: Vec<TestCase>,
    /// Multi-step flows, in execution order.
    #[serde(default)]
    pub flows: Vec<Flow>,
}

impl Tests {
    /// Returns a copy with `test_case` appended.
    #[must_use]
    pub fn with_test_case(mut self, test_case: TestCase) -> Self {
        self.test_cases.push(test_case);
        self
    }

    /// Returns a copy without the test case at `index`. Out of range is a no-op.
    #[must_use]
    pub fn without_test_case(mut self, index: usize) -> Self {
        if index < self.test_cases.len() {
            self.test_cases.remove(index);
        }
        self
    }

    /// Returns a copy with the test case at `index` replaced.
    #[must_use]
    pub fn with_test_case_at(mut self, index: usize, test_case: TestCase) -> Self {
        if let Some(slot) = self.test_cases.get_mut(index) {
            *slot = test_case;
        }
        self
    }

    /// Returns a copy with `flow` appended.
    #[must_use]
    pub fn with_flow(mut self, flow: Flow) -> Self {
        self.flows.push(flow);
        self
    }

    /// Returns a copy without the flow at `index`. Out of range is a no-op.
    #[must_use]
    pub fn without_flow(mut self, index: usize) -> Self {
        if index < self.flows.len() {
            self.flows.remove(index);
        }
        self
    }

    /// Returns a copy with the flow at `index` replaced.
    #[must_use]
    pub fn with_flow_at(mut self, index: usize, flow: Flow) -> Self {
        if let Some(slot) = self.flows.get_mut(index) {
            *slot = flow;
        }
        self
    }
}

/// Expected response status: a single code or any of several codes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExpectedStatus {
    /// Exactly this status.
    Single(u16),
    /// Any of these statuses.
    AnyOf(Vec<u16>),
}

impl Default for ExpectedStatus {
    fn default() -> Self {
        Self::Single(200)
    }
}

impl ExpectedStatus {
    /// All accepted codes.
    #[must_use]
    pub fn codes(&self) -> Vec<u16> {
        match self {
            Self::Single(code) => vec![*code],
            Self::AnyOf(codes) => codes.clone(),
        }
    }

    /// Check whether `code` satisfies this expectation.
    #[must_use]
    pub fn matches(&self, code: u16) -> bool {
        match self {
            Self::Single(expected) => *expected == code,
            Self::AnyOf(codes) => codes.contains(&code),
        }
    }
}

impl From<u16> for ExpectedStatus {
    fn from(code: u16) -> Self {
        Self::Single(code)
    }
}

impl From<Vec<u16>> for ExpectedStatus {
    fn from(codes: Vec<u16>) -> Self {
        Self::AnyOf(codes)
    }
}

/// A standalone request-based check, optionally backed by a module.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TestCase {
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Raw request file, relative to `raw_requests_path`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_request: Option<String>,
    /// Expected response status.
    #[serde(default)]
    pub expected_status: ExpectedStatus,
    /// Run concurrently with other cases.
    #[serde(default)]
    pub parallel: bool,
    /// Module implementing the check, from the module catalog.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_case_module: Option<String>,
    /// Module-specific settings (e.g. `max_concurrent`).
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub config: ValueMap,
}

impl TestCase {
    /// Blank entry as offered by an "add test case" action.
    #[must_use]
    pub fn blank() -> Self {
        Self::default()
    }

    /// Creates a request-backed test case.
    #[must_use]
    pub fn new(name: impl Into<String>, raw_request: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            raw_request: Some(raw_request.into()),
            ..Self::default()
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the expected status.
    #[must_use]
    pub fn with_expected_status(mut self, status: impl Into<ExpectedStatus>) -> Self {
        self.expected_status = status.into();
        self
    }

    /// Binds the case to a catalog module.
    #[must_use]
    pub fn with_module(mut self, module: impl Into<String>) -> Self {
        self.test_case_module = Some(module.into());
        self
    }

    /// Adds a module setting.
    #[must_use]
    pub fn with_config(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.config.insert(key.into(), value.into());
        self
    }

    /// Marks the case as parallel.
    #[must_use]
    pub const fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}

/// An ordered sequence of steps sharing extracted data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Flow {
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Run concurrently with other flows.
    #[serde(default)]
    pub parallel: bool,
    /// Keep running later steps after a failure. Absent means `true`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub continue_on_failure: Option<bool>,
    /// Steps, in execution order.
    #[serde(default)]
    pub steps: Vec<Step>,
}

impl Flow {
    /// Blank entry as offered by an "add flow" action.
    #[must_use]
    pub fn blank() -> Self {
        Self {
            continue_on_failure: Some(true),
            ..Self::default()
        }
    }

    /// Creates an empty flow.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::blank()
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets `continue_on_failure`.
    #[must_use]
    pub const fn continue_on_failure(mut self, keep_going: bool) -> Self {
        self.continue_on_failure = Some(keep_going);
        self
    }

    /// Effective `continue_on_failure`.
    #[must_use]
    pub fn continues_on_failure(&self) -> bool {
        self.continue_on_failure.unwrap_or(true)
    }

    /// Returns a copy with `step` appended.
    #[must_use]
    pub fn with_step(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }

    /// Returns a copy with the step at `index` replaced.
    #[must_use]
    pub fn with_step_at(mut self, index: usize, step: Step) -> Self {
        if let Some(slot) = self.steps.get_mut(index) {
            *slot = step;
        }
        self
    }

    /// Returns a copy without the step at `index`. Out of range is a no-op.
    #[must_use]
    pub fn without_step(mut self, index: usize) -> Self {
        if index < self.steps.len() {
            self.steps.remove(index);
        }
        self
    }

    /// Returns a copy with the step at `index` duplicated right after itself.
    #[must_use]
    pub fn with_duplicated_step(mut self, index: usize) -> Self {
        if let Some(original) = self.steps.get(index) {
            let copy = Step {
                name: format!("{} (Copy)", original.name),
                ..original.clone()
            };
            self.steps.insert(index + 1, copy);
        }
        self
    }
}

/// One request within a flow.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Step {
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Raw request file, relative to `raw_requests_path`.
    #[serde(default)]
    pub raw_request: String,
    /// Expected response status.
    #[serde(default)]
    pub expected_status: ExpectedStatus,
    /// Pause before sending, in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay: Option<f64>,
    /// Overrides applied to the raw request.
    #[serde(default)]
    pub request_modifications: RequestModifications,
    /// Values captured from the response.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub extract: ExtractMap,
    /// Response checks.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub validations: Vec<ValidationRule>,
}

impl Step {
    /// Blank entry as offered by an "add step" action.
    #[must_use]
    pub fn blank() -> Self {
        Self {
            delay: Some(0.0),
            ..Self::default()
        }
    }

    /// Creates a step for a raw request file.
    #[must_use]
    pub fn new(name: impl Into<String>, raw_request: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            raw_request: raw_request.into(),
            ..Self::default()
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the expected status.
    #[must_use]
    pub fn with_expected_status(mut self, status: impl Into<ExpectedStatus>) -> Self {
        self.expected_status = status.into();
        self
    }

    /// Sets the delay in seconds.
    #[must_use]
    pub const fn with_delay(mut self, seconds: f64) -> Self {
        self.delay = Some(seconds);
        self
    }

    /// Replaces the request modifications.
    #[must_use]
    pub fn with_modifications(mut self, modifications: RequestModifications) -> Self {
        self.request_modifications = modifications;
        self
    }

    /// Adds an extraction rule: `target.field <- path`.
    #[must_use]
    pub fn with_extract(
        mut self,
        target: impl Into<String>,
        field: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        self.extract
            .entry(target.into())
            .or_default()
            .insert(field.into(), path.into());
        self
    }

    /// Appends a validation rule.
    #[must_use]
    pub fn with_validation(mut self, rule: ValidationRule) -> Self {
        self.validations.push(rule);
        self
    }
}

/// Overrides applied to a raw request before sending.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequestModifications {
    /// Replacement URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Replacement method.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    /// Headers to set.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub headers: StringMap,
    /// Cookies to set.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub cookies: StringMap,
    /// Query parameters to set.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub params: StringMap,
    /// Body fields to set.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub body: ValueMap,
}

impl RequestModifications {
    /// Sets a header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Sets a cookie.
    #[must_use]
    pub fn with_cookie(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.cookies.insert(name.into(), value.into());
        self
    }

    /// Sets a query parameter.
    #[must_use]
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    /// Sets a body field.
    #[must_use]
    pub fn with_body_field(mut self, name: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.body.insert(name.into(), value.into());
        self
    }
}

/// Kind of response check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ValidationType {
    /// Target contains the value.
    #[default]
    Contains,
    /// Target does not contain the value.
    NotContains,
    /// Target matches the value as a regex.
    Regex,
    /// Status equals the value.
    StatusCode,
}

/// Part of the response a check looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ValidationTarget {
    /// Response body.
    #[default]
    Body,
    /// Response headers.
    Headers,
    /// Response status line.
    Status,
}

/// A response check inside a step. Incomplete rules are kept in the working
/// document but never reach the canonical form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationRule {
    /// Kind of check.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<ValidationType>,
    /// Part of the response to check.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<ValidationTarget>,
    /// Operand of the check.
    #[serde(default)]
    pub value: String,
    /// Message reported when the check fails.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ValidationRule {
    /// Blank rule as offered by an "add validation" action.
    #[must_use]
    pub const fn blank() -> Self {
        Self {
            kind: Some(ValidationType::Contains),
            target: Some(ValidationTarget::Body),
            value: String::new(),
            message: None,
        }
    }

    /// Creates a complete rule.
    #[must_use]
    pub fn new(kind: ValidationType, target: ValidationTarget, value: impl Into<String>) -> Self {
        Self {
            kind: Some(kind),
            target: Some(target),
            value: value.into(),
            message: None,
        }
    }

    /// Sets the failure message.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Check whether type, target and value are all set.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.kind.is_some() && self.target.is_some() && !self.value.is_empty()
    }
}
