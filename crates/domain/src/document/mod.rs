//! Working configuration document.
//!
//! The document is owned by the caller and updated by replacing whole
//! subtrees through the `with_*` builders; nothing in this crate mutates a
//! document behind the caller's back.

mod network;
mod suite;

pub use network::{NetworkConfig, ProxyConfig, ProxyEndpoint, ProxyScheme, SslConfig};
pub use suite::{
    ExpectedStatus, ExtractMap, Flow, RequestModifications, Step, TestCase, Tests,
    ValidationRule, ValidationTarget, ValidationType,
};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Insertion-ordered string mapping.
pub type StringMap = IndexMap<String, String>;

/// Insertion-ordered mapping with arbitrary scalar or nested values.
pub type ValueMap = IndexMap<String, serde_json::Value>;

/// Root of a test configuration.
///
/// Missing sections deserialize as empty sections, not as the session
/// defaults returned by [`ConfigurationDocument::default`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigurationDocument {
    /// Project identification.
    #[serde(default)]
    pub project: Project,
    /// Network settings.
    #[serde(default)]
    pub network: NetworkConfig,
    /// Test cases and flows.
    #[serde(default)]
    pub tests: Tests,
    /// Enabled vulnerability modules.
    #[serde(default)]
    pub test_case_modules: TestCaseModules,
    /// Enabled extensions.
    #[serde(default)]
    pub extensions: Extensions,
    /// Scheduling settings.
    #[serde(default)]
    pub execution: Execution,
    /// Directory holding raw request files.
    #[serde(default)]
    pub raw_requests_path: String,
    /// Report settings.
    #[serde(default)]
    pub output: Output,
}

/// Default raw request directory.
pub const DEFAULT_RAW_REQUESTS_PATH: &str = "./requests";
/// Default report directory.
pub const DEFAULT_REPORT_PATH: &str = "./reports";
/// Default user agent.
pub const DEFAULT_USER_AGENT: &str = "WexBloit/2.0";

impl Default for ConfigurationDocument {
    /// The document a new session starts from.
    fn default() -> Self {
        Self {
            project: Project {
                name: "WebApp Pentest".to_string(),
                description: Some("Web application penetration testing assessment".to_string()),
                version: Some("1.0.0".to_string()),
            },
            network: NetworkConfig::default()
                .with_proxy(ProxyConfig::both(""))
                .with_timeout(30)
                .with_max_retries(3)
                .with_verify_ssl(true)
                .with_user_agent(DEFAULT_USER_AGENT),
            tests: Tests::default(),
            test_case_modules: TestCaseModules::default(),
            extensions: Extensions::default(),
            execution: Execution {
                max_parallel_flows: Some(3),
                default_delay: Some(0.0),
            },
            raw_requests_path: DEFAULT_RAW_REQUESTS_PATH.to_string(),
            output: Output::standard(),
        }
    }
}

impl ConfigurationDocument {
    /// Replaces the project section.
    #[must_use]
    pub fn with_project(mut self, project: Project) -> Self {
        self.project = project;
        self
    }

    /// Replaces the network section.
    #[must_use]
    pub fn with_network(mut self, network: NetworkConfig) -> Self {
        self.network = network;
        self
    }

    /// Replaces the tests section.
    #[must_use]
    pub fn with_tests(mut self, tests: Tests) -> Self {
        self.tests = tests;
        self
    }

    /// Replaces the module selection.
    #[must_use]
    pub fn with_test_case_modules(mut self, modules: TestCaseModules) -> Self {
        self.test_case_modules = modules;
        self
    }

    /// Replaces the extension selection.
    #[must_use]
    pub fn with_extensions(mut self, extensions: Extensions) -> Self {
        self.extensions = extensions;
        self
    }

    /// Replaces the execution section.
    #[must_use]
    pub const fn with_execution(mut self, execution: Execution) -> Self {
        self.execution = execution;
        self
    }

    /// Replaces the raw request directory.
    #[must_use]
    pub fn with_raw_requests_path(mut self, path: impl Into<String>) -> Self {
        self.raw_requests_path = path.into();
        self
    }

    /// Replaces the output section.
    #[must_use]
    pub fn with_output(mut self, output: Output) -> Self {
        self.output = output;
        self
    }

    /// Check whether anything runnable is configured.
    #[must_use]
    pub fn has_work(&self) -> bool {
        !self.tests.test_cases.is_empty()
            || !self.tests.flows.is_empty()
            || !self.test_case_modules.enabled.is_empty()
    }
}

/// Project identification.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// Project name; required.
    #[serde(default)]
    pub name: String,
    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Project version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl Project {
    /// Creates a project with only a name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the version.
    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }
}

/// Selection of catalog modules plus settings shared by all of them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCaseModules {
    /// Enabled module names, in the order they were enabled.
    #[serde(default)]
    pub enabled: Vec<String>,
    /// Settings passed to every module.
    #[serde(default)]
    pub global_config: StringMap,
}

impl TestCaseModules {
    /// Creates a selection from module names.
    #[must_use]
    pub fn enabling<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            enabled: dedup(names),
            global_config: StringMap::new(),
        }
    }

    /// Returns a copy with `name` enabled if it was disabled, and disabled
    /// otherwise.
    #[must_use]
    pub fn toggled(mut self, name: &str) -> Self {
        self.enabled = toggle(self.enabled, name);
        self
    }

    /// Returns a copy with a global setting added or replaced. Blank keys
    /// are ignored.
    #[must_use]
    pub fn with_global(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        if !key.trim().is_empty() {
            self.global_config.insert(key, value.into());
        }
        self
    }

    /// Returns a copy without the global setting `key`, keeping the order of
    /// the remaining settings.
    #[must_use]
    pub fn without_global(mut self, key: &str) -> Self {
        self.global_config.shift_remove(key);
        self
    }
}

/// Selection of cross-cutting extensions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Extensions {
    /// Enabled extension names.
    #[serde(default)]
    pub enabled: Vec<String>,
    /// Extension settings.
    #[serde(default)]
    pub config: ValueMap,
}

impl Extensions {
    /// Creates a selection from extension names.
    #[must_use]
    pub fn enabling<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            enabled: dedup(names),
            config: ValueMap::new(),
        }
    }

    /// Returns a copy with `name` toggled.
    #[must_use]
    pub fn toggled(mut self, name: &str) -> Self {
        self.enabled = toggle(self.enabled, name);
        self
    }
}

fn dedup<I, S>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut out: Vec<String> = Vec::new();
    for name in names {
        let name = name.into();
        if !out.contains(&name) {
            out.push(name);
        }
    }
    out
}

fn toggle(mut enabled: Vec<String>, name: &str) -> Vec<String> {
    if enabled.iter().any(|n| n == name) {
        enabled.retain(|n| n != name);
    } else {
        enabled.push(name.to_string());
    }
    enabled
}

/// Scheduling settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Execution {
    /// Flows run at once, valid range 1..=10.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_parallel_flows: Option<i64>,
    /// Delay between requests in seconds; must not be negative.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_delay: Option<f64>,
}

/// Report format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// HTML report.
    #[default]
    Html,
    /// JSON report.
    Json,
    /// CSV report.
    Csv,
}

impl OutputFormat {
    /// Serialized name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::Json => "json",
            Self::Csv => "csv",
        }
    }
}

/// Report settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Output {
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

impl Output {
    /// HTML reports in `./reports`, verbose.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            format: Some(OutputFormat::Html),
            path: Some(DEFAULT_REPORT_PATH.to_string()),
            verbose: Some(true),
        }
    }
}
