//! Integration test to verify the workspace compiles correctly.

#![allow(clippy::no_effect_underscore_binding)]

#[test]
fn domain_crate_compiles() {
    // Verify domain types are accessible
    let _doc = wexcfg_domain::ConfigurationDocument::default();
    let _template = wexcfg_domain::TemplateId::Basic.document();
    let _modules = wexcfg_domain::MODULES;
}

#[test]
fn application_crate_compiles() {
    // Verify application types are accessible
    let _error = wexcfg_application::ApplicationError::Invalid(Vec::new());
}

#[test]
fn infrastructure_crate_compiles() {
    // Verify infrastructure adapters are accessible
    let _serializer = wexcfg_infrastructure::YamlSerializer::new();
    let _probe = wexcfg_infrastructure::TcpProxyProbe::new();
}
