//! Module and extension catalogs.
//!
//! Both catalogs are closed lists of recognized names. The metadata is for
//! display only; no entry changes how a document is validated or rendered.

use serde::Serialize;

/// Grouping of vulnerability modules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ModuleCategory {
    /// SQL injection, XSS and friends.
    Injection,
    /// Authorization checks.
    AccessControl,
    /// Login and session handling.
    Authentication,
    /// Transport and header hygiene.
    Security,
    /// Generic API checks.
    Api,
}

impl ModuleCategory {
    /// Get human-readable name.
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Injection => "Injection",
            Self::AccessControl => "Access Control",
            Self::Authentication => "Authentication",
            Self::Security => "Security",
            Self::Api => "API",
        }
    }
}

/// Typical impact of the findings a module reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Low impact.
    Low,
    /// Medium impact.
    Medium,
    /// High impact.
    High,
}

impl Severity {
    /// Lowercase label.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

/// A catalog entry for a vulnerability module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ModuleInfo {
    /// Name used in `test_case_module` and `test_case_modules.enabled`.
    pub name: &'static str,
    /// One-line description.
    pub description: &'static str,
    /// Grouping.
    pub category: ModuleCategory,
    /// Typical impact.
    pub severity: Severity,
    /// Settings the module reads from its config or the global config.
    pub params: &'static [&'static str],
}

/// Every recognized module, in display order.
pub const MODULES: &[ModuleInfo] = &[
    ModuleInfo {
        name: "SQLInjectionTestCase",
        description: "SQL injection vulnerability testing with multiple payload types",
        category: ModuleCategory::Injection,
        severity: Severity::High,
        params: &["target_url", "test_parameter"],
    },
    ModuleInfo {
        name: "XSSTestCase",
        description: "Cross-site scripting (XSS) vulnerability testing",
        category: ModuleCategory::Injection,
        severity: Severity::High,
        params: &["target_url", "test_parameter"],
    },
    ModuleInfo {
        name: "IDORTestCase",
        description: "Insecure Direct Object Reference testing",
        category: ModuleCategory::AccessControl,
        severity: Severity::High,
        params: &["base_url", "target_urls", "test_user_ids", "auth_token", "session_cookie"],
    },
    ModuleInfo {
        name: "BrokenFunctionLevelAuthorizationTestCase",
        description: "Function-level authorization bypass testing",
        category: ModuleCategory::AccessControl,
        severity: Severity::High,
        params: &["user_role", "function_endpoints"],
    },
    ModuleInfo {
        name: "MassAssignmentTestCase",
        description: "Mass assignment vulnerability testing",
        category: ModuleCategory::AccessControl,
        severity: Severity::Medium,
        params: &["target_endpoints", "sensitive_parameters"],
    },
    ModuleInfo {
        name: "LoginTestCase",
        description: "Authentication mechanism testing",
        category: ModuleCategory::Authentication,
        severity: Severity::Medium,
        params: &["login_url", "username", "password"],
    },
    ModuleInfo {
        name: "SecurityHeadersTestCase",
        description: "Security headers analysis and testing",
        category: ModuleCategory::Security,
        severity: Severity::Low,
        params: &["target_url"],
    },
    ModuleInfo {
        name: "APITestCase",
        description: "General API functionality and security testing",
        category: ModuleCategory::Api,
        severity: Severity::Medium,
        params: &["target_url", "test_headers", "test_methods"],
    },
];

/// Every recognized extension, in display order.
pub const EXTENSIONS: &[&str] = &["auth", "headers", "logging", "rate_limiting", "data_extraction"];

/// Looks up a module by exact name.
#[must_use]
pub fn module_info(name: &str) -> Option<&'static ModuleInfo> {
    MODULES.iter().find(|m| m.name == name)
}

/// Check whether `name` is a catalog module.
#[must_use]
pub fn is_known_module(name: &str) -> bool {
    module_info(name).is_some()
}

/// Check whether `name` is a catalog extension.
#[must_use]
pub fn is_known_extension(name: &str) -> bool {
    EXTENSIONS.contains(&name)
}

/// Module names, in display order.
pub fn module_names() -> impl Iterator<Item = &'static str> {
    MODULES.iter().map(|m| m.name)
}
