//! Subcommand handlers.
//!
//! Handlers write user-facing output to the given writer and return the
//! process exit code. Diagnostics go through `tracing`.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use tracing::{info, warn};
use wexcfg_application::{
    ApplicationError, ApplicationResult, ConfigPipeline, ProbeOutcome, ProbeProxies,
};
use wexcfg_domain::catalog::{is_known_extension, is_known_module};
use wexcfg_domain::templates::catalog;
use wexcfg_domain::{ConfigurationDocument, EXTENSIONS, MODULES, TemplateId};
use wexcfg_infrastructure::{DocumentFormat, DocumentStore, TcpProxyProbe, YamlSerializer};

use crate::cli::{Cli, Command, is_stdout};

/// Exit code for a document with validation errors.
const EXIT_INVALID: u8 = 1;

fn io_error(error: &std::io::Error) -> ApplicationError {
    ApplicationError::Io(error.to_string())
}

/// Runs the parsed command line.
///
/// # Errors
///
/// Returns an error when a document cannot be read, rendered or written.
pub async fn run(cli: Cli, out: &mut impl Write) -> ApplicationResult<ExitCode> {
    let pipeline = ConfigPipeline::new(YamlSerializer::new());
    let store = DocumentStore::new();

    match &cli.command {
        Command::Templates => list_templates(out),
        Command::Modules => list_modules(out),
        Command::New {
            template,
            out: path,
            force,
        } => new_document(&pipeline, &store, template.as_deref(), path, *force, out).await,
        Command::Validate { file } => {
            let doc = store.load(file).await?;
            report_validation(&pipeline, &doc, out)
        }
        Command::Preview { file } => {
            let doc = store.load(file).await?;
            out.write_all(pipeline.preview(&doc).as_bytes())
                .map_err(|e| io_error(&e))?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Generate {
            file,
            out: target,
            force,
        } => {
            let doc = store.load(file).await?;
            let target = GenerateTarget {
                path: target.as_deref(),
                output_dir: &cli.output_dir,
            };
            generate(&pipeline, &store, &doc, &target, *force, out).await
        }
        Command::Probe { file } => {
            let doc = store.load(file).await?;
            probe(&doc, &cli, out).await
        }
    }
}

fn list_templates(out: &mut impl Write) -> ApplicationResult<ExitCode> {
    for info in catalog() {
        writeln!(out, "{:<10} {}", info.id.as_str(), info.name).map_err(|e| io_error(&e))?;
        writeln!(out, "           {}", info.description).map_err(|e| io_error(&e))?;
        writeln!(out, "           features: {}", info.features.join(", "))
            .map_err(|e| io_error(&e))?;
    }
    Ok(ExitCode::SUCCESS)
}

fn list_modules(out: &mut impl Write) -> ApplicationResult<ExitCode> {
    writeln!(out, "Test case modules:").map_err(|e| io_error(&e))?;
    for module in MODULES {
        writeln!(
            out,
            "  {:<28} {:<15} {:<7} {}",
            module.name,
            module.category.display_name(),
            module.severity.as_str(),
            module.description
        )
        .map_err(|e| io_error(&e))?;
    }
    writeln!(out, "Extensions:").map_err(|e| io_error(&e))?;
    for extension in EXTENSIONS {
        writeln!(out, "  {extension}").map_err(|e| io_error(&e))?;
    }
    Ok(ExitCode::SUCCESS)
}

async fn new_document(
    pipeline: &ConfigPipeline<YamlSerializer>,
    store: &DocumentStore,
    template: Option<&str>,
    path: &Path,
    force: bool,
    out: &mut impl Write,
) -> ApplicationResult<ExitCode> {
    let doc = match template {
        Some(id) => {
            if !TemplateId::ALL.iter().any(|t| t.as_str() == id) {
                warn!(template = id, "unknown template, using basic");
            }
            pipeline.load_template(id)
        }
        None => ConfigurationDocument::default(),
    };

    if is_stdout(path) {
        let text = store.render(&doc, DocumentFormat::Yaml)?;
        out.write_all(text.as_bytes()).map_err(|e| io_error(&e))?;
    } else {
        store.save(path, &doc, force).await?;
        info!(path = %path.display(), "wrote working document");
        writeln!(out, "Wrote {}", path.display()).map_err(|e| io_error(&e))?;
    }
    Ok(ExitCode::SUCCESS)
}

/// Warns about module and extension names outside the catalog. These are
/// not validation errors.
fn warn_unknown_names(doc: &ConfigurationDocument) {
    let modules = doc
        .test_case_modules
        .enabled
        .iter()
        .chain(doc.tests.test_cases.iter().filter_map(|c| c.test_case_module.as_ref()));
    for name in modules.filter(|n| !n.is_empty() && !is_known_module(n)) {
        warn!(module = %name, "module is not in the catalog");
    }
    for name in doc.extensions.enabled.iter().filter(|n| !is_known_extension(n)) {
        warn!(extension = %name, "extension is not in the catalog");
    }
}

fn report_validation(
    pipeline: &ConfigPipeline<YamlSerializer>,
    doc: &ConfigurationDocument,
    out: &mut impl Write,
) -> ApplicationResult<ExitCode> {
    warn_unknown_names(doc);
    let errors = pipeline.validate(doc);
    if errors.is_empty() {
        writeln!(out, "Configuration is valid").map_err(|e| io_error(&e))?;
        return Ok(ExitCode::SUCCESS);
    }

    writeln!(out, "Configuration has {} error(s):", errors.len()).map_err(|e| io_error(&e))?;
    for error in &errors {
        writeln!(out, "  - {error}").map_err(|e| io_error(&e))?;
    }
    Ok(ExitCode::from(EXIT_INVALID))
}

/// Where `generate` writes its output.
struct GenerateTarget<'a> {
    /// Explicit path, or `-` for stdout.
    path: Option<&'a Path>,
    /// Directory for the suggested file name.
    output_dir: &'a Path,
}

async fn generate(
    pipeline: &ConfigPipeline<YamlSerializer>,
    store: &DocumentStore,
    doc: &ConfigurationDocument,
    target: &GenerateTarget<'_>,
    force: bool,
    out: &mut impl Write,
) -> ApplicationResult<ExitCode> {
    let generated = if force {
        pipeline.generate(doc)
    } else {
        pipeline.generate_checked(doc)
    };
    let generated = match generated {
        Ok(generated) => generated,
        Err(ApplicationError::Invalid(errors)) => {
            for error in &errors {
                writeln!(out, "  - {error}").map_err(|e| io_error(&e))?;
            }
            return Err(ApplicationError::Invalid(errors));
        }
        Err(e) => return Err(e),
    };

    if target.path.is_some_and(is_stdout) {
        out.write_all(generated.content.as_bytes())
            .map_err(|e| io_error(&e))?;
        return Ok(ExitCode::SUCCESS);
    }

    let path: PathBuf = target
        .path
        .map_or_else(|| target.output_dir.join(&generated.filename), Path::to_path_buf);
    store.write_text(&path, &generated.content, true).await?;
    info!(path = %path.display(), media_type = generated.media_type, "generated configuration");
    writeln!(
        out,
        "Wrote {} ({} lines, {} KB)",
        path.display(),
        generated.line_count(),
        generated.size_kib()
    )
    .map_err(|e| io_error(&e))?;
    Ok(ExitCode::SUCCESS)
}

async fn probe(
    doc: &ConfigurationDocument,
    cli: &Cli,
    out: &mut impl Write,
) -> ApplicationResult<ExitCode> {
    let use_case = ProbeProxies::new(TcpProxyProbe::new()).with_timeout(cli.probe_timeout());
    let reports = use_case.execute(&doc.network).await?;
    if reports.is_empty() {
        writeln!(out, "No proxy configured").map_err(|e| io_error(&e))?;
        return Ok(ExitCode::SUCCESS);
    }

    let mut all_reachable = true;
    for report in &reports {
        let scheme = report.endpoint.scheme.as_str();
        let authority = report.endpoint.authority();
        let written = match &report.outcome {
            ProbeOutcome::Reachable { latency } => {
                writeln!(out, "{scheme:<5} {authority} reachable ({}ms)", latency.as_millis())
            }
            ProbeOutcome::Unreachable { reason } => {
                all_reachable = false;
                writeln!(out, "{scheme:<5} {authority} unreachable: {reason}")
            }
        };
        written.map_err(|e| io_error(&e))?;
    }

    Ok(if all_reachable {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use clap::Parser;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    async fn run_args(args: &[&str]) -> (ApplicationResult<ExitCode>, String) {
        let cli = Cli::try_parse_from(std::iter::once("wexcfg").chain(args.iter().copied())).unwrap();
        let mut out = Vec::new();
        let result = run(cli, &mut out).await;
        (result, String::from_utf8(out).unwrap())
    }

    fn path_str(path: &Path) -> &str {
        path.to_str().unwrap()
    }

    #[tokio::test]
    async fn test_templates_lists_every_template() {
        let (result, out) = run_args(&["templates"]).await;
        assert_eq!(result.unwrap(), ExitCode::SUCCESS);
        for id in ["basic", "advanced", "api", "webapp"] {
            assert!(out.contains(id), "missing {id} in {out}");
        }
    }

    #[tokio::test]
    async fn test_modules_lists_catalogs() {
        let (result, out) = run_args(&["modules"]).await;
        assert_eq!(result.unwrap(), ExitCode::SUCCESS);
        assert!(out.contains("SQLInjectionTestCase"));
        assert!(out.contains("rate_limiting"));
    }

    #[tokio::test]
    async fn test_new_template_validates_cleanly() {
        let temp = TempDir::new().unwrap();
        let doc = temp.path().join("session.yaml");

        let (result, _) = run_args(&["new", "--template", "webapp", "--out", path_str(&doc)]).await;
        assert_eq!(result.unwrap(), ExitCode::SUCCESS);

        let (result, out) = run_args(&["validate", path_str(&doc)]).await;
        assert_eq!(result.unwrap(), ExitCode::SUCCESS);
        assert_eq!(out, "Configuration is valid\n");
    }

    #[tokio::test]
    async fn test_new_refuses_to_overwrite_without_force() {
        let temp = TempDir::new().unwrap();
        let doc = temp.path().join("session.json");

        let (first, _) = run_args(&["new", "--out", path_str(&doc)]).await;
        assert!(first.is_ok());
        let (second, _) = run_args(&["new", "--out", path_str(&doc)]).await;
        assert!(matches!(second, Err(ApplicationError::Io(_))));
        let (third, _) = run_args(&["new", "--out", path_str(&doc), "--force"]).await;
        assert!(third.is_ok());
    }

    #[tokio::test]
    async fn test_validate_default_document_reports_nothing_to_run() {
        let temp = TempDir::new().unwrap();
        let doc = temp.path().join("session.yaml");
        run_args(&["new", "--out", path_str(&doc)]).await.0.unwrap();

        let (result, out) = run_args(&["validate", path_str(&doc)]).await;
        assert_eq!(result.unwrap(), ExitCode::from(EXIT_INVALID));
        assert_eq!(
            out,
            "Configuration has 1 error(s):\n  - At least one test case, flow, or test module must be configured\n"
        );
    }

    #[tokio::test]
    async fn test_generate_gates_on_validation_unless_forced() {
        let temp = TempDir::new().unwrap();
        let doc = temp.path().join("session.yaml");
        run_args(&["new", "--out", path_str(&doc)]).await.0.unwrap();

        let (result, _) = run_args(&["generate", path_str(&doc), "--out", "-"]).await;
        assert!(matches!(result, Err(ApplicationError::Invalid(errors)) if errors.len() == 1));

        let (result, out) = run_args(&["generate", path_str(&doc), "--out", "-", "--force"]).await;
        assert_eq!(result.unwrap(), ExitCode::SUCCESS);
        assert!(out.starts_with("project:\n  name: WebApp Pentest\n"));
    }

    #[tokio::test]
    async fn test_generate_writes_suggested_filename_into_output_dir() {
        let temp = TempDir::new().unwrap();
        let doc = temp.path().join("session.yaml");
        let out_dir = temp.path().join("generated");
        run_args(&["new", "--template", "api", "--out", path_str(&doc)]).await.0.unwrap();

        let (result, out) = run_args(&[
            "generate",
            path_str(&doc),
            "--output-dir",
            path_str(&out_dir),
        ])
        .await;

        assert_eq!(result.unwrap(), ExitCode::SUCCESS);
        let written = out_dir.join("API_Security_Assessment_config.yaml");
        assert!(out.starts_with(&format!("Wrote {}", written.display())), "{out}");
        let content = std::fs::read_to_string(&written).unwrap();
        assert!(content.contains("user_agent: WexBloit-API/2.0"));
    }

    #[tokio::test]
    async fn test_preview_prints_configuration() {
        let temp = TempDir::new().unwrap();
        let doc = temp.path().join("session.yaml");
        run_args(&["new", "--template", "basic", "--out", path_str(&doc)]).await.0.unwrap();

        let (result, out) = run_args(&["preview", path_str(&doc)]).await;
        assert_eq!(result.unwrap(), ExitCode::SUCCESS);
        assert!(out.starts_with("project:\n"));
        assert!(out.contains("test_cases:\n"));
    }

    #[tokio::test]
    async fn test_probe_without_proxy() {
        let temp = TempDir::new().unwrap();
        let doc = temp.path().join("session.yaml");
        run_args(&["new", "--template", "basic", "--out", path_str(&doc)]).await.0.unwrap();

        let (result, out) = run_args(&["probe", path_str(&doc)]).await;
        assert_eq!(result.unwrap(), ExitCode::SUCCESS);
        assert_eq!(out, "No proxy configured\n");
    }

    #[tokio::test]
    async fn test_missing_document_is_an_io_error() {
        let (result, _) = run_args(&["validate", "/nonexistent/session.yaml"]).await;
        assert!(matches!(result, Err(ApplicationError::Io(_))));
    }
}
