//! Normalization of a working document into its canonical form.
//!
//! Each field is kept only when it carries meaning: empty strings, empty
//! mappings, `false` flags and zero delays are dropped, and a section with
//! no surviving field disappears. Normalization never looks at validity;
//! an invalid document normalizes just as well as a valid one.

use crate::canonical::{
    CanonicalDocument, CanonicalExecution, CanonicalExtensions, CanonicalFlow,
    CanonicalModifications, CanonicalModules, CanonicalNetwork, CanonicalOutput, CanonicalProject,
    CanonicalProxy, CanonicalSsl, CanonicalStep, CanonicalTestCase, CanonicalTests,
    CanonicalValidation, non_empty_section,
};
use crate::document::{
    ConfigurationDocument, Execution, Extensions, Flow, NetworkConfig, Output, Project,
    RequestModifications, Step, TestCase, TestCaseModules, Tests, ValidationRule,
};

/// Strips `doc` down to its canonical form.
///
/// Pure and deterministic; `normalize` of the lifted result of `normalize`
/// is the same canonical document.
#[must_use]
pub fn normalize(doc: &ConfigurationDocument) -> CanonicalDocument {
    CanonicalDocument {
        project: project(&doc.project),
        network: non_empty_section(network(&doc.network)),
        tests: non_empty_section(tests(&doc.tests)),
        test_case_modules: non_empty_section(modules(&doc.test_case_modules)),
        extensions: non_empty_section(extensions(&doc.extensions)),
        execution: non_empty_section(execution(doc.execution)),
        raw_requests_path: non_empty(Some(&doc.raw_requests_path)),
        output: non_empty_section(output(&doc.output)),
    }
}

fn non_empty(value: Option<&String>) -> Option<String> {
    value.filter(|s| !s.is_empty()).cloned()
}

fn project(project: &Project) -> CanonicalProject {
    CanonicalProject {
        name: project.name.clone(),
        description: non_empty(project.description.as_ref()),
        version: non_empty(project.version.as_ref()),
    }
}

fn network(network: &NetworkConfig) -> CanonicalNetwork {
    let proxy = network
        .proxy
        .as_ref()
        .filter(|p| p.is_configured())
        .map(|p| CanonicalProxy {
            http: non_empty(p.http.as_ref()),
            https: non_empty(p.https.as_ref()),
        });

    let verify_ssl = network.verifies_ssl();
    let ssl = network.ssl.as_ref().map(|ssl| CanonicalSsl {
        verify_ssl,
        ca_bundle: non_empty(ssl.ca_bundle.as_ref()),
        cert_path: non_empty(ssl.cert_path.as_ref()),
        key_path: non_empty(ssl.key_path.as_ref()),
    });

    CanonicalNetwork {
        proxy,
        verify_ssl: ssl.is_none().then_some(verify_ssl),
        ssl,
        timeout: network.timeout,
        max_retries: network.max_retries,
        user_agent: non_empty(network.user_agent.as_ref()),
    }
}

fn tests(tests: &Tests) -> CanonicalTests {
    CanonicalTests {
        test_cases: tests.test_cases.iter().map(test_case).collect(),
        flows: tests.flows.iter().map(flow).collect(),
    }
}

fn test_case(case: &TestCase) -> CanonicalTestCase {
    CanonicalTestCase {
        name: case.name.clone(),
        description: non_empty(case.description.as_ref()),
        raw_request: non_empty(case.raw_request.as_ref()),
        expected_status: case.expected_status.clone(),
        parallel: case.parallel.then_some(true),
        test_case_module: non_empty(case.test_case_module.as_ref()),
        config: case.config.clone(),
    }
}

fn flow(flow: &Flow) -> CanonicalFlow {
    CanonicalFlow {
        name: flow.name.clone(),
        description: non_empty(flow.description.as_ref()),
        parallel: flow.parallel.then_some(true),
        continue_on_failure: flow.continue_on_failure,
        steps: flow.steps.iter().map(step).collect(),
    }
}

fn step(step: &Step) -> CanonicalStep {
    CanonicalStep {
        name: step.name.clone(),
        description: non_empty(step.description.as_ref()),
        raw_request: step.raw_request.clone(),
        expected_status: step.expected_status.clone(),
        delay: step.delay.filter(|d| *d > 0.0),
        request_modifications: non_empty_section(modifications(&step.request_modifications)),
        extract: step.extract.clone(),
        validations: step.validations.iter().filter_map(validation).collect(),
    }
}

fn modifications(mods: &RequestModifications) -> CanonicalModifications {
    CanonicalModifications {
        url: non_empty(mods.url.as_ref()),
        method: non_empty(mods.method.as_ref()),
        headers: mods.headers.clone(),
        cookies: mods.cookies.clone(),
        params: mods.params.clone(),
        body: mods.body.clone(),
    }
}

fn validation(rule: &ValidationRule) -> Option<CanonicalValidation> {
    match (rule.kind, rule.target) {
        (Some(kind), Some(target)) if !rule.value.is_empty() => Some(CanonicalValidation {
            kind,
            target,
            value: rule.value.clone(),
            message: non_empty(rule.message.as_ref()),
        }),
        _ => None,
    }
}

fn modules(modules: &TestCaseModules) -> CanonicalModules {
    CanonicalModules {
        enabled: modules.enabled.clone(),
        global_config: modules.global_config.clone(),
    }
}

fn extensions(extensions: &Extensions) -> CanonicalExtensions {
    CanonicalExtensions {
        enabled: extensions.enabled.clone(),
        config: extensions.config.clone(),
    }
}

fn execution(execution: Execution) -> CanonicalExecution {
    CanonicalExecution {
        max_parallel_flows: execution.max_parallel_flows.filter(|n| *n != 0),
        default_delay: execution.default_delay,
    }
}

fn output(output: &Output) -> CanonicalOutput {
    CanonicalOutput {
        format: output.format,
        path: output.path.clone(),
        verbose: output.verbose,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::document::{
        ExpectedStatus, ProxyConfig, SslConfig, ValidationTarget, ValidationType,
    };
    use pretty_assertions::assert_eq;

    fn renormalize(doc: &ConfigurationDocument) -> CanonicalDocument {
        normalize(&ConfigurationDocument::from(normalize(doc)))
    }

    #[test]
    fn test_default_document_drops_empty_proxy_and_sections() {
        let canonical = normalize(&ConfigurationDocument::default());
        let network = canonical.network.clone().unwrap();

        assert_eq!(network.proxy, None);
        assert_eq!(network.verify_ssl, Some(true));
        assert_eq!(network.timeout, Some(30));
        assert_eq!(canonical.tests, None);
        assert_eq!(canonical.test_case_modules, None);
        assert_eq!(canonical.extensions, None);
        assert_eq!(canonical.raw_requests_path.as_deref(), Some("./requests"));
    }

    #[test]
    fn test_verify_ssl_moves_into_ssl_object() {
        let doc = ConfigurationDocument::default().with_network(
            NetworkConfig::default()
                .with_verify_ssl(false)
                .with_ssl(SslConfig {
                    ca_bundle: Some("ca.pem".to_string()),
                    cert_path: Some(String::new()),
                    key_path: None,
                }),
        );
        let network = normalize(&doc).network.unwrap();

        assert_eq!(network.verify_ssl, None);
        assert_eq!(
            network.ssl,
            Some(CanonicalSsl {
                verify_ssl: false,
                ca_bundle: Some("ca.pem".to_string()),
                cert_path: None,
                key_path: None,
            })
        );
    }

    #[test]
    fn test_network_without_ssl_always_has_verify_ssl() {
        let doc = ConfigurationDocument::default().with_network(NetworkConfig::default());
        let network = normalize(&doc).network.unwrap();
        assert_eq!(network.verify_ssl, Some(true));
    }

    #[test]
    fn test_proxy_keeps_only_set_endpoints() {
        let doc = ConfigurationDocument::default().with_network(NetworkConfig::default().with_proxy(
            ProxyConfig {
                http: Some("http://127.0.0.1:8080".to_string()),
                https: Some(String::new()),
            },
        ));
        let proxy = normalize(&doc).network.unwrap().proxy.unwrap();

        assert_eq!(proxy.http.as_deref(), Some("http://127.0.0.1:8080"));
        assert_eq!(proxy.https, None);
    }

    #[test]
    fn test_step_delay_zero_is_dropped() {
        let flow = Flow::new("F")
            .with_step(Step::new("zero", "a.txt").with_delay(0.0))
            .with_step(Step::new("half", "b.txt").with_delay(0.5));
        let doc = ConfigurationDocument::default().with_tests(Tests::default().with_flow(flow));

        let steps = &normalize(&doc).tests.unwrap().flows[0].steps;
        assert_eq!(steps[0].delay, None);
        assert_eq!(steps[1].delay, Some(0.5));
    }

    #[test]
    fn test_incomplete_validation_rules_are_dropped() {
        let step = Step::new("check", "a.txt")
            .with_validation(ValidationRule::new(
                ValidationType::Contains,
                ValidationTarget::Body,
                "Welcome",
            ))
            .with_validation(ValidationRule::blank())
            .with_validation(ValidationRule {
                kind: None,
                target: Some(ValidationTarget::Headers),
                value: "X-Frame-Options".to_string(),
                message: None,
            });
        let doc = ConfigurationDocument::default()
            .with_tests(Tests::default().with_flow(Flow::new("F").with_step(step)));

        let validations = &normalize(&doc).tests.unwrap().flows[0].steps[0].validations;
        assert_eq!(validations.len(), 1);
        assert_eq!(validations[0].value, "Welcome");
    }

    #[test]
    fn test_only_incomplete_validations_omit_the_key() {
        let step = Step::new("check", "a.txt").with_validation(ValidationRule::blank());
        let doc = ConfigurationDocument::default()
            .with_tests(Tests::default().with_flow(Flow::new("F").with_step(step)));

        let canonical = normalize(&doc);
        assert!(canonical.tests.as_ref().unwrap().flows[0].steps[0].validations.is_empty());
        assert_eq!(renormalize(&doc), canonical);
    }

    #[test]
    fn test_empty_request_modifications_are_omitted() {
        let step = Step::new("s", "a.txt").with_modifications(RequestModifications {
            url: Some(String::new()),
            ..RequestModifications::default()
        });
        let with_header = Step::new("t", "b.txt")
            .with_modifications(RequestModifications::default().with_header("Authorization", "Bearer {api_token}"));
        let doc = ConfigurationDocument::default().with_tests(
            Tests::default().with_flow(Flow::new("F").with_step(step).with_step(with_header)),
        );

        let steps = &normalize(&doc).tests.unwrap().flows[0].steps;
        assert_eq!(steps[0].request_modifications, None);
        let mods = steps[1].request_modifications.as_ref().unwrap();
        assert_eq!(mods.headers["Authorization"], "Bearer {api_token}");
        assert_eq!(mods.url, None);
    }

    #[test]
    fn test_test_case_flags_and_module() {
        let case = TestCase::new("Injection", "login.txt")
            .with_module("SQLInjectionTestCase")
            .with_config("max_concurrent", 5)
            .with_description("");
        let doc = ConfigurationDocument::default().with_tests(Tests::default().with_test_case(case));

        let canonical = normalize(&doc).tests.unwrap().test_cases[0].clone();
        assert_eq!(canonical.description, None);
        assert_eq!(canonical.parallel, None);
        assert_eq!(canonical.test_case_module.as_deref(), Some("SQLInjectionTestCase"));
        assert_eq!(canonical.config["max_concurrent"], serde_json::json!(5));
    }

    #[test]
    fn test_zero_parallel_flows_is_dropped() {
        let doc = ConfigurationDocument::default().with_execution(Execution {
            max_parallel_flows: Some(0),
            default_delay: None,
        });
        assert_eq!(normalize(&doc).execution, None);
    }

    #[test]
    fn test_flow_without_steps_keeps_no_steps_key() {
        let doc = ConfigurationDocument::default()
            .with_tests(Tests::default().with_flow(Flow::new("Empty")));
        let flows = normalize(&doc).tests.unwrap().flows;
        assert!(flows[0].steps.is_empty());
        assert_eq!(flows[0].continue_on_failure, Some(true));
    }

    #[test]
    fn test_normalize_is_idempotent_on_rich_document() {
        let step = Step::new("Login", "auth/login.txt")
            .with_expected_status(ExpectedStatus::AnyOf(vec![200, 302]))
            .with_delay(1.5)
            .with_extract("body", "csrf_token", "csrf_token")
            .with_modifications(
                RequestModifications::default()
                    .with_body_field("username", "admin")
                    .with_cookie("session", "{session}"),
            );
        let doc = ConfigurationDocument::default()
            .with_network(
                NetworkConfig::default()
                    .with_proxy(ProxyConfig::both("http://127.0.0.1:8080"))
                    .with_ssl(SslConfig {
                        ca_bundle: None,
                        cert_path: Some("client.pem".to_string()),
                        key_path: Some("client.key".to_string()),
                    }),
            )
            .with_tests(
                Tests::default()
                    .with_test_case(TestCase::new("Ping", "ping.txt").parallel(true))
                    .with_flow(Flow::new("Auth").with_step(step)),
            )
            .with_test_case_modules(TestCaseModules::enabling(["XSSTestCase"]).with_global("base_url", "https://x"));

        assert_eq!(renormalize(&doc), normalize(&doc));
    }
}
