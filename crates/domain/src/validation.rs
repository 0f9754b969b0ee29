//! Document validation.
//!
//! Validation is a pure function of the whole document. It never stops at
//! the first problem: every violation is collected, in a fixed check order,
//! and returned together. An empty list means the document may be
//! generated.

use thiserror::Error;

use crate::document::ConfigurationDocument;

/// Inclusive range for `network.timeout`, in seconds.
pub const TIMEOUT_RANGE: std::ops::RangeInclusive<i64> = 1..=300;
/// Inclusive range for `network.max_retries`.
pub const MAX_RETRIES_RANGE: std::ops::RangeInclusive<i64> = 0..=10;
/// Inclusive range for `execution.max_parallel_flows`.
pub const MAX_PARALLEL_FLOWS_RANGE: std::ops::RangeInclusive<i64> = 1..=10;

/// A single reason a document cannot be generated.
///
/// Indices are 1-based, as shown to users.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Violation {
    /// `project.name` is blank.
    #[error("Project name is required")]
    MissingProjectName,
    /// `network.timeout` out of range.
    #[error("Network timeout must be between 1 and 300 seconds")]
    TimeoutOutOfRange,
    /// `network.max_retries` out of range.
    #[error("Max retries must be between 0 and 10")]
    MaxRetriesOutOfRange,
    /// A test case has a blank name.
    #[error("Test case {case}: Name is required")]
    TestCaseName {
        /// 1-based test case index.
        case: usize,
    },
    /// A test case has no raw request file.
    #[error("Test case {case}: Raw request file is required")]
    TestCaseRawRequest {
        /// 1-based test case index.
        case: usize,
    },
    /// A flow has a blank name.
    #[error("Flow {flow}: Name is required")]
    FlowName {
        /// 1-based flow index.
        flow: usize,
    },
    /// A flow has no steps.
    #[error("Flow {flow}: At least one step is required")]
    FlowWithoutSteps {
        /// 1-based flow index.
        flow: usize,
    },
    /// A step has a blank name.
    #[error("Flow {flow}, Step {step}: Name is required")]
    StepName {
        /// 1-based flow index.
        flow: usize,
        /// 1-based step index.
        step: usize,
    },
    /// A step has no raw request file.
    #[error("Flow {flow}, Step {step}: Raw request file is required")]
    StepRawRequest {
        /// 1-based flow index.
        flow: usize,
        /// 1-based step index.
        step: usize,
    },
    /// `execution.max_parallel_flows` out of range.
    #[error("Max parallel flows must be between 1 and 10")]
    MaxParallelFlowsOutOfRange,
    /// `execution.default_delay` is negative.
    #[error("Default delay cannot be negative")]
    NegativeDefaultDelay,
    /// Nothing runnable is configured.
    #[error("At least one test case, flow, or test module must be configured")]
    NothingToRun,
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Collects every violation in `doc`, in check order.
#[must_use]
pub fn violations(doc: &ConfigurationDocument) -> Vec<Violation> {
    let mut found = Vec::new();

    if is_blank(&doc.project.name) {
        found.push(Violation::MissingProjectName);
    }

    if doc.network.timeout.is_some_and(|t| !TIMEOUT_RANGE.contains(&t)) {
        found.push(Violation::TimeoutOutOfRange);
    }
    if doc
        .network
        .max_retries
        .is_some_and(|r| !MAX_RETRIES_RANGE.contains(&r))
    {
        found.push(Violation::MaxRetriesOutOfRange);
    }

    for (i, case) in doc.tests.test_cases.iter().enumerate() {
        let case_no = i + 1;
        if is_blank(&case.name) {
            found.push(Violation::TestCaseName { case: case_no });
        }
        // Required even when a module backs the case.
        if case.raw_request.as_deref().is_none_or(is_blank) {
            found.push(Violation::TestCaseRawRequest { case: case_no });
        }
    }

    for (f, flow) in doc.tests.flows.iter().enumerate() {
        let flow_no = f + 1;
        if is_blank(&flow.name) {
            found.push(Violation::FlowName { flow: flow_no });
        }
        if flow.steps.is_empty() {
            found.push(Violation::FlowWithoutSteps { flow: flow_no });
            continue;
        }
        for (s, step) in flow.steps.iter().enumerate() {
            let step_no = s + 1;
            if is_blank(&step.name) {
                found.push(Violation::StepName {
                    flow: flow_no,
                    step: step_no,
                });
            }
            if is_blank(&step.raw_request) {
                found.push(Violation::StepRawRequest {
                    flow: flow_no,
                    step: step_no,
                });
            }
        }
    }

    if doc
        .execution
        .max_parallel_flows
        .is_some_and(|n| !MAX_PARALLEL_FLOWS_RANGE.contains(&n))
    {
        found.push(Violation::MaxParallelFlowsOutOfRange);
    }
    if doc
        .execution
        .default_delay
        .is_some_and(|d| d.is_nan() || d < 0.0)
    {
        found.push(Violation::NegativeDefaultDelay);
    }

    if !doc.has_work() {
        found.push(Violation::NothingToRun);
    }

    found
}

/// Validates `doc`, returning the user-facing messages of every violation.
#[must_use]
pub fn validate(doc: &ConfigurationDocument) -> Vec<String> {
    violations(doc).iter().map(ToString::to_string).collect()
}
