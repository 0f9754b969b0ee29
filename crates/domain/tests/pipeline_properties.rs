//! Properties of validation and normalization over whole documents.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use pretty_assertions::assert_eq;
use wexcfg_domain::{
    ConfigurationDocument, Execution, ExpectedStatus, Flow, NetworkConfig, Project, ProxyConfig,
    RequestModifications, SslConfig, Step, TestCase, TestCaseModules, TemplateId, Tests,
    ValidationRule, ValidationTarget, ValidationType, normalize, validate,
};

const PROJECT_NAME_REQUIRED: &str = "Project name is required";

/// Documents covering the interesting corners of the model.
fn sample_documents() -> Vec<ConfigurationDocument> {
    let mut docs: Vec<_> = TemplateId::ALL.iter().map(TemplateId::document).collect();
    docs.push(ConfigurationDocument::default());
    docs.push(
        ConfigurationDocument::default()
            .with_project(Project::new(""))
            .with_network(
                NetworkConfig::default()
                    .with_proxy(ProxyConfig {
                        http: Some("http://127.0.0.1:8080".to_string()),
                        https: Some(String::new()),
                    })
                    .with_ssl(SslConfig {
                        ca_bundle: Some("ca.pem".to_string()),
                        cert_path: None,
                        key_path: Some(String::new()),
                    })
                    .with_verify_ssl(false)
                    .with_timeout(0),
            )
            .with_tests(
                Tests::default()
                    .with_test_case(TestCase::blank())
                    .with_test_case(TestCase::new("Mod", "m.txt").with_module("XSSTestCase").parallel(true))
                    .with_flow(Flow::blank())
                    .with_flow(
                        Flow::new("Login")
                            .continue_on_failure(false)
                            .with_step(
                                Step::new("a", "a.txt")
                                    .with_delay(0.25)
                                    .with_expected_status(ExpectedStatus::AnyOf(vec![200, 302]))
                                    .with_modifications(RequestModifications::default().with_header("X-A", "1"))
                                    .with_extract("session", "token", "$.token")
                                    .with_validation(ValidationRule::blank())
                                    .with_validation(ValidationRule::new(
                                        ValidationType::Contains,
                                        ValidationTarget::Body,
                                        "ok",
                                    )),
                            )
                            .with_duplicated_step(0),
                    ),
            )
            .with_test_case_modules(TestCaseModules::default().toggled("SQLInjectionTestCase").with_global("depth", "2"))
            .with_execution(Execution {
                max_parallel_flows: Some(0),
                default_delay: Some(-1.0),
            })
            .with_raw_requests_path(""),
    );
    docs
}

#[test]
fn project_name_message_tracks_blank_name_only() {
    for doc in sample_documents() {
        let blank = doc.project.name.trim().is_empty();
        let reported = validate(&doc).iter().any(|m| m == PROJECT_NAME_REQUIRED);
        assert_eq!(reported, blank, "project {:?}", doc.project.name);

        let renamed = doc.clone().with_project(Project::new(" \t"));
        assert!(validate(&renamed).iter().any(|m| m == PROJECT_NAME_REQUIRED));
    }
}

#[test]
fn normalize_is_idempotent() {
    for doc in sample_documents() {
        let once = normalize(&doc);
        let twice = normalize(&ConfigurationDocument::from(once.clone()));
        assert_eq!(twice, once);
    }
}

#[test]
fn every_template_validates_cleanly() {
    for id in TemplateId::ALL {
        assert_eq!(validate(&id.document()), Vec::<String>::new(), "template {id}");
    }
}

#[test]
fn unnamed_test_cases_report_their_own_index() {
    let unnamed = TestCase::new("", "req.txt");
    let one = ConfigurationDocument::default().with_tests(Tests::default().with_test_case(unnamed.clone()));
    assert_eq!(validate(&one), vec!["Test case 1: Name is required"]);

    let two = one.clone().with_tests(one.tests.clone().with_test_case(unnamed));
    assert_eq!(
        validate(&two),
        vec!["Test case 1: Name is required", "Test case 2: Name is required"]
    );
}

#[test]
fn empty_flow_reports_only_the_flow_message() {
    let doc = ConfigurationDocument::default().with_tests(Tests::default().with_flow(Flow::new("Empty")));
    assert_eq!(validate(&doc), vec!["Flow 1: At least one step is required"]);
}

#[test]
fn one_enabled_module_is_enough_to_run() {
    const NOTHING: &str = "At least one test case, flow, or test module must be configured";
    let doc = ConfigurationDocument::default();
    assert!(validate(&doc).iter().any(|m| m == NOTHING));

    let doc = doc.with_test_case_modules(TestCaseModules::enabling(["AuthBypassTestCase"]));
    assert!(!validate(&doc).iter().any(|m| m == NOTHING));
}

#[test]
fn zero_delay_is_omitted_and_positive_delay_kept() {
    let delay_of = |seconds: f64| {
        let doc = ConfigurationDocument::default()
            .with_tests(Tests::default().with_flow(Flow::new("f").with_step(Step::new("s", "s.txt").with_delay(seconds))));
        normalize(&doc).tests.unwrap().flows[0].steps[0].delay
    };

    assert_eq!(delay_of(0.0), None);
    assert_eq!(delay_of(0.5), Some(0.5));
}

#[test]
fn validation_without_value_is_dropped() {
    let incomplete = ValidationRule {
        value: String::new(),
        ..ValidationRule::new(ValidationType::Regex, ValidationTarget::Headers, "x")
    };
    let step = Step::new("s", "s.txt")
        .with_validation(incomplete)
        .with_validation(ValidationRule::new(ValidationType::StatusCode, ValidationTarget::Status, "200"));
    let doc = ConfigurationDocument::default().with_tests(Tests::default().with_flow(Flow::new("f").with_step(step)));

    assert_eq!(doc.tests.flows[0].steps[0].validations.len(), 2);
    let canonical = normalize(&doc);
    let validations = &canonical.tests.unwrap().flows[0].steps[0].validations;
    assert_eq!(validations.len(), 1);
    assert_eq!(validations[0].value, "200");
}
