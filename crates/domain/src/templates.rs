//! Pre-built example documents.
//!
//! Each template is literal fixture data that validates cleanly. Templates
//! are never derived from one another.

use serde::Serialize;

use crate::document::{
    ConfigurationDocument, Execution, ExpectedStatus, Extensions, Flow, NetworkConfig, Output,
    Project, ProxyConfig, RequestModifications, Step, TestCase, TestCaseModules, Tests,
    DEFAULT_RAW_REQUESTS_PATH,
};

/// Identifier of a bundled template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TemplateId {
    /// Single standalone test case.
    #[default]
    Basic,
    /// Multi-step flow with extraction, modules and extensions.
    Advanced,
    /// Token extraction feeding an `Authorization` header.
    Api,
    /// Multi-status step and four modules.
    Webapp,
}

impl TemplateId {
    /// Every template, in display order.
    pub const ALL: [Self; 4] = [Self::Basic, Self::Advanced, Self::Api, Self::Webapp];

    /// Resolves an identifier. Unknown identifiers resolve to [`Self::Basic`].
    #[must_use]
    pub fn parse(id: &str) -> Self {
        match id {
            "advanced" => Self::Advanced,
            "api" => Self::Api,
            "webapp" => Self::Webapp,
            _ => Self::Basic,
        }
    }

    /// Identifier string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Advanced => "advanced",
            Self::Api => "api",
            Self::Webapp => "webapp",
        }
    }

    /// Display metadata.
    #[must_use]
    pub const fn info(&self) -> TemplateInfo {
        match self {
            Self::Basic => TemplateInfo {
                id: *self,
                name: "Basic Security Test",
                description: "Simple connectivity and basic security checks",
                features: &["Basic connectivity test", "Simple request validation", "HTML reporting"],
            },
            Self::Advanced => TemplateInfo {
                id: *self,
                name: "Advanced Pentest",
                description: "Comprehensive security assessment with flows and modules",
                features: &["Multi-step flows", "Test case modules", "Proxy integration", "Data extraction"],
            },
            Self::Api => TemplateInfo {
                id: *self,
                name: "API Security Test",
                description: "REST API security testing configuration",
                features: &[
                    "API endpoint testing",
                    "Authentication flows",
                    "Parameter validation",
                    "Rate limiting tests",
                ],
            },
            Self::Webapp => TemplateInfo {
                id: *self,
                name: "Web Application Test",
                description: "Full web application security assessment",
                features: &[
                    "SQL injection tests",
                    "XSS detection",
                    "Authentication bypass",
                    "Session management",
                ],
            },
        }
    }

    /// Builds a fresh copy of the template document.
    #[must_use]
    pub fn document(&self) -> ConfigurationDocument {
        match self {
            Self::Basic => basic(),
            Self::Advanced => advanced(),
            Self::Api => api(),
            Self::Webapp => webapp(),
        }
    }
}

impl std::fmt::Display for TemplateId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Display metadata of a template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TemplateInfo {
    /// Identifier.
    pub id: TemplateId,
    /// Display name.
    pub name: &'static str,
    /// One-line description.
    pub description: &'static str,
    /// Highlighted features.
    pub features: &'static [&'static str],
}

/// Metadata of every template, in display order.
#[must_use]
pub fn catalog() -> Vec<TemplateInfo> {
    TemplateId::ALL.iter().map(TemplateId::info).collect()
}

/// Returns the template named `id`, falling back to `basic`.
#[must_use]
pub fn template(id: &str) -> ConfigurationDocument {
    TemplateId::parse(id).document()
}

const LOCAL_PROXY: &str = "http://127.0.0.1:8080";

fn basic() -> ConfigurationDocument {
    ConfigurationDocument {
        project: Project::new("Basic Web Security Test")
            .with_description("Simple security assessment")
            .with_version("1.0.0"),
        network: NetworkConfig::default()
            .with_timeout(30)
            .with_max_retries(3)
            .with_verify_ssl(true)
            .with_user_agent("WexBloit/2.0"),
        tests: Tests::default().with_test_case(
            TestCase::new("Basic Connectivity Test", "basic_get.txt")
                .with_description("Test basic connectivity to target")
                .with_expected_status(ExpectedStatus::Single(200)),
        ),
        test_case_modules: TestCaseModules::default(),
        extensions: Extensions::default(),
        execution: Execution {
            max_parallel_flows: Some(1),
            default_delay: Some(0.0),
        },
        raw_requests_path: DEFAULT_RAW_REQUESTS_PATH.to_string(),
        output: Output::standard(),
    }
}

fn advanced() -> ConfigurationDocument {
    let flow = Flow::new("Authentication Flow")
        .with_description("Multi-step authentication testing")
        .continue_on_failure(true)
        .with_step(
            Step::new("Get Login Page", "auth/login_page.txt")
                .with_expected_status(ExpectedStatus::Single(200))
                .with_extract("body", "csrf_token", "csrf_token"),
        )
        .with_step(
            Step::new("Submit Login", "auth/login_submit.txt")
                .with_expected_status(ExpectedStatus::Single(302))
                .with_modifications(
                    RequestModifications::default()
                        .with_body_field("username", "admin")
                        .with_body_field("password", "password")
                        .with_body_field("csrf_token", "{csrf_token}"),
                ),
        );

    ConfigurationDocument {
        project: Project::new("Advanced Pentest Assessment")
            .with_description("Comprehensive web application security testing")
            .with_version("1.0.0"),
        network: NetworkConfig::default()
            .with_proxy(ProxyConfig::both(LOCAL_PROXY))
            .with_timeout(30)
            .with_max_retries(3)
            .with_verify_ssl(false)
            .with_user_agent("WexBloit/2.0"),
        tests: Tests::default().with_flow(flow),
        test_case_modules: TestCaseModules::enabling([
            "SQLInjectionTestCase",
            "XSSTestCase",
            "SecurityHeadersTestCase",
        ])
        .with_global("base_url", "https://example.com")
        .with_global("username", "testuser")
        .with_global("password", "testpass"),
        extensions: Extensions::enabling(["auth", "headers"]),
        execution: Execution {
            max_parallel_flows: Some(3),
            default_delay: Some(0.5),
        },
        raw_requests_path: DEFAULT_RAW_REQUESTS_PATH.to_string(),
        output: Output::standard(),
    }
}

fn api() -> ConfigurationDocument {
    let flow = Flow::new("API Authentication Flow")
        .with_description("Test API authentication and authorization")
        .continue_on_failure(true)
        .with_step(
            Step::new("Get API Token", "api/get_token.txt")
                .with_expected_status(ExpectedStatus::Single(200))
                .with_extract("json", "api_token", "access_token"),
        )
        .with_step(
            Step::new("Test Protected Endpoint", "api/protected_endpoint.txt")
                .with_expected_status(ExpectedStatus::Single(200))
                .with_modifications(
                    RequestModifications::default()
                        .with_header("Authorization", "Bearer {api_token}")
                        .with_header("X-Custom-Check", "APISecurityFlow"),
                ),
        );

    ConfigurationDocument {
        project: Project::new("API Security Assessment")
            .with_description("REST API security testing configuration")
            .with_version("1.0.0"),
        network: NetworkConfig::default()
            .with_timeout(45)
            .with_max_retries(3)
            .with_verify_ssl(true)
            .with_user_agent("WexBloit-API/2.0"),
        tests: Tests::default().with_flow(flow),
        test_case_modules: TestCaseModules::enabling(["APITestCase", "SecurityHeadersTestCase"])
            .with_global("base_url", "https://api.example.com")
            .with_global("api_version", "v1"),
        extensions: Extensions::enabling(["auth", "headers"]),
        execution: Execution {
            max_parallel_flows: Some(2),
            default_delay: Some(0.5),
        },
        raw_requests_path: DEFAULT_RAW_REQUESTS_PATH.to_string(),
        output: Output::standard(),
    }
}

fn webapp() -> ConfigurationDocument {
    let flow = Flow::new("Login and Session Testing")
        .with_description("Test login functionality and session management")
        .continue_on_failure(true)
        .with_step(
            Step::new("Get Login Form", "webapp/login_form.txt")
                .with_expected_status(ExpectedStatus::Single(200))
                .with_extract("body", "csrf_token", "csrf_token"),
        )
        .with_step(
            Step::new("Submit Login", "webapp/login_submit.txt")
                .with_expected_status(ExpectedStatus::AnyOf(vec![200, 302]))
                .with_modifications(
                    RequestModifications::default()
                        .with_body_field("username", "admin")
                        .with_body_field("password", "password")
                        .with_body_field("csrf_token", "{csrf_token}")
                        .with_header("X-Custom-Check", "WebAppSecurityFlow"),
                ),
        );

    ConfigurationDocument {
        project: Project::new("Web Application Security Test")
            .with_description("Full web application security assessment")
            .with_version("1.0.0"),
        network: NetworkConfig::default()
            .with_proxy(ProxyConfig::both(LOCAL_PROXY))
            .with_timeout(30)
            .with_max_retries(3)
            .with_verify_ssl(false)
            .with_user_agent("WexBloit-WebApp/2.0"),
        tests: Tests::default().with_flow(flow),
        test_case_modules: TestCaseModules::enabling([
            "SQLInjectionTestCase",
            "XSSTestCase",
            "SecurityHeadersTestCase",
            "LoginTestCase",
        ])
        .with_global("base_url", "https://webapp.example.com")
        .with_global("username", "testuser")
        .with_global("password", "testpass"),
        extensions: Extensions::enabling(["auth", "headers", "logging"]),
        execution: Execution {
            max_parallel_flows: Some(3),
            default_delay: Some(1.0),
        },
        raw_requests_path: DEFAULT_RAW_REQUESTS_PATH.to_string(),
        output: Output::standard(),
    }
}
