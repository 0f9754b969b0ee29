//! Canonical (minimal) configuration document.
//!
//! Produced by [`crate::normalize::normalize`]. Field declaration order is
//! the key order of the rendered file, and every optional field is skipped
//! when absent, so serializing a canonical document never emits a key the
//! inclusion rules dropped.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::document::{
    ConfigurationDocument, Execution, ExpectedStatus, ExtractMap, Extensions, Flow, NetworkConfig,
    Output, OutputFormat, Project, ProxyConfig, RequestModifications, SslConfig, Step, StringMap,
    TestCase, TestCaseModules, Tests, ValidationRule, ValidationTarget, ValidationType, ValueMap,
};

/// Minimal, serializable form of a [`ConfigurationDocument`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CanonicalDocument {
    /// Project identification; always present.
    pub project: CanonicalProject,
    /// Network settings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network: Option<CanonicalNetwork>,
    /// Test cases and flows.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tests: Option<CanonicalTests>,
    /// Module selection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_case_modules: Option<CanonicalModules>,
    /// Extension selection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<CanonicalExtensions>,
    /// Scheduling settings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution: Option<CanonicalExecution>,
    /// Raw request directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_requests_path: Option<String>,
    /// Report settings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<CanonicalOutput>,
}

/// Canonical project section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalProject {
    /// Project name, kept even when blank.
    #[serde(default)]
    pub name: String,
    /// Non-empty description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Non-empty version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// Canonical network section.
///
/// Exactly one of `ssl` and `verify_ssl` is set: the flag moves into the
/// `ssl` object whenever one exists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalNetwork {
    /// Proxy endpoints, when at least one is set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy: Option<CanonicalProxy>,
    /// TLS material.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssl: Option<CanonicalSsl>,
    /// Certificate verification, when there is no `ssl` object.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verify_ssl: Option<bool>,
    /// Timeout in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<i64>,
    /// Retry attempts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_retries: Option<i64>,
    /// User agent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

/// Canonical proxy object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalProxy {
    /// HTTP proxy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http: Option<String>,
    /// HTTPS proxy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub https: Option<String>,
}

/// Canonical TLS object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalSsl {
    /// Certificate verification.
    pub verify_ssl: bool,
    /// CA bundle path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ca_bundle: Option<String>,
    /// Client certificate path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cert_path: Option<String>,
    /// Client key path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_path: Option<String>,
}

/// Canonical tests section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CanonicalTests {
    /// Test cases.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub test_cases: Vec<CanonicalTestCase>,
    /// Flows.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub flows: Vec<CanonicalFlow>,
}

/// Canonical test case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalTestCase {
    /// Name, kept even when blank.
    #[serde(default)]
    pub name: String,
    /// Non-empty description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Non-empty raw request file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_request: Option<String>,
    /// Expected status.
    #[serde(default)]
    pub expected_status: ExpectedStatus,
    /// Present only when `true`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parallel: Option<bool>,
    /// Non-empty module name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_case_module: Option<String>,
    /// Non-empty module settings.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub config: ValueMap,
}

/// Canonical flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalFlow {
    /// Name, kept even when blank.
    #[serde(default)]
    pub name: String,
    /// Non-empty description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Present only when `true`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parallel: Option<bool>,
    /// Present when set in the working document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub continue_on_failure: Option<bool>,
    /// Steps; omitted when there are none.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub steps: Vec<CanonicalStep>,
}

/// Canonical flow step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalStep {
    /// Name, kept even when blank.
    #[serde(default)]
    pub name: String,
    /// Non-empty description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Raw request file, always present.
    #[serde(default)]
    pub raw_request: String,
    /// Expected status, always present.
    #[serde(default)]
    pub expected_status: ExpectedStatus,
    /// Delay in seconds, only when positive.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay: Option<f64>,
    /// Surviving request overrides.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_modifications: Option<CanonicalModifications>,
    /// Extraction rules.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub extract: ExtractMap,
    /// Complete validation rules.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub validations: Vec<CanonicalValidation>,
}

/// Canonical request overrides; at least one field is set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CanonicalModifications {
    /// Replacement URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Replacement method.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    /// Headers.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub headers: StringMap,
    /// Cookies.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub cookies: StringMap,
    /// Query parameters.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub params: StringMap,
    /// Body fields.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub body: ValueMap,
}

/// Canonical validation rule; every required field is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalValidation {
    /// Kind of check.
    #[serde(rename = "type")]
    pub kind: ValidationType,
    /// Part of the response to check.
    pub target: ValidationTarget,
    /// Operand.
    pub value: String,
    /// Failure message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Canonical module selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalModules {
    /// Enabled modules.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub enabled: Vec<String>,
    /// Shared settings.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub global_config: StringMap,
}

/// Canonical extension selection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CanonicalExtensions {
    /// Enabled extensions.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub enabled: Vec<String>,
    /// Extension settings.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub config: ValueMap,
}

/// Canonical execution section.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CanonicalExecution {
    /// Parallel flow limit, when non-zero.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_parallel_flows: Option<i64>,
    /// Default delay, when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_delay: Option<f64>,
}

/// Canonical output section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalOutput {
    /// Report format.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<OutputFormat>,
    /// Report directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Verbose reporting.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verbose: Option<bool>,
}

/// Wraps a section in `Some` unless it has no fields left.
pub(crate) fn non_empty_section<T: Default + PartialEq>(section: T) -> Option<T> {
    (section != T::default()).then_some(section)
}

impl From<CanonicalDocument> for ConfigurationDocument {
    /// Lifts a canonical document back into a working document, so that it
    /// can be edited or normalized again.
    fn from(canonical: CanonicalDocument) -> Self {
        let CanonicalDocument {
            project,
            network,
            tests,
            test_case_modules,
            extensions,
            execution,
            raw_requests_path,
            output,
        } = canonical;

        let tests = tests.unwrap_or_default();
        let modules = test_case_modules.unwrap_or_default();
        let extensions = extensions.unwrap_or_default();
        let execution = execution.unwrap_or_default();
        let output = output.unwrap_or_default();

        Self {
            project: Project {
                name: project.name,
                description: project.description,
                version: project.version,
            },
            network: network.map(lift_network).unwrap_or_default(),
            tests: Tests {
                test_cases: tests.test_cases.into_iter().map(lift_test_case).collect(),
                flows: tests.flows.into_iter().map(lift_flow).collect(),
            },
            test_case_modules: TestCaseModules {
                enabled: modules.enabled,
                global_config: modules.global_config,
            },
            extensions: Extensions {
                enabled: extensions.enabled,
                config: extensions.config,
            },
            execution: Execution {
                max_parallel_flows: execution.max_parallel_flows,
                default_delay: execution.default_delay,
            },
            raw_requests_path: raw_requests_path.unwrap_or_default(),
            output: Output {
                format: output.format,
                path: output.path,
                verbose: output.verbose,
            },
        }
    }
}

fn lift_network(network: CanonicalNetwork) -> NetworkConfig {
    let verify_ssl = network
        .ssl
        .as_ref()
        .map(|ssl| ssl.verify_ssl)
        .or(network.verify_ssl);
    NetworkConfig {
        proxy: network.proxy.map(|p| ProxyConfig {
            http: p.http,
            https: p.https,
        }),
        timeout: network.timeout,
        max_retries: network.max_retries,
        verify_ssl,
        user_agent: network.user_agent,
        ssl: network.ssl.map(|ssl| SslConfig {
            ca_bundle: ssl.ca_bundle,
            cert_path: ssl.cert_path,
            key_path: ssl.key_path,
        }),
    }
}

fn lift_test_case(case: CanonicalTestCase) -> TestCase {
    TestCase {
        name: case.name,
        description: case.description,
        raw_request: case.raw_request,
        expected_status: case.expected_status,
        parallel: case.parallel.unwrap_or(false),
        test_case_module: case.test_case_module,
        config: case.config,
    }
}

fn lift_flow(flow: CanonicalFlow) -> Flow {
    Flow {
        name: flow.name,
        description: flow.description,
        parallel: flow.parallel.unwrap_or(false),
        continue_on_failure: flow.continue_on_failure,
        steps: flow.steps.into_iter().map(lift_step).collect(),
    }
}

fn lift_step(step: CanonicalStep) -> Step {
    let modifications = step.request_modifications.unwrap_or_default();
    Step {
        name: step.name,
        description: step.description,
        raw_request: step.raw_request,
        expected_status: step.expected_status,
        delay: step.delay,
        request_modifications: RequestModifications {
            url: modifications.url,
            method: modifications.method,
            headers: modifications.headers,
            cookies: modifications.cookies,
            params: modifications.params,
            body: modifications.body,
        },
        extract: step.extract,
        validations: step
            .validations
            .into_iter()
            .map(|v| ValidationRule {
                kind: Some(v.kind),
                target: Some(v.target),
                value: v.value,
                message: v.message,
            })
            .collect(),
    }
}
