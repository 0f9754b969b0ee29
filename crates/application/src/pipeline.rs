//! Configuration pipeline facade.
//!
//! Ties the pure domain steps together: validate a working document,
//! normalize it to the canonical form, and hand the result to a
//! [`ConfigSerializer`]. The facade holds no document state; every call
//! works on the document it is given.

use tracing::{debug, warn};
use wexcfg_domain::{ConfigurationDocument, normalize, template, validate};

use crate::error::{ApplicationError, ApplicationResult};
use crate::ports::ConfigSerializer;

/// Base name used when the project has no name.
pub const FALLBACK_FILE_STEM: &str = "wexbloit";

/// Suffix appended to every generated file name.
pub const FILE_SUFFIX: &str = "_config.yaml";

/// Generated configuration text plus download metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedConfig {
    /// Rendered configuration text.
    pub content: String,
    /// Suggested file name.
    pub filename: String,
    /// Media type of `content`.
    pub media_type: &'static str,
}

impl GeneratedConfig {
    /// Number of lines in the content.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.content.lines().count()
    }

    /// Content size in KiB, rounded to one decimal.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn size_kib(&self) -> f64 {
        (self.content.len() as f64 / 1024.0 * 10.0).round() / 10.0
    }
}

/// Derives the download file name from a project name.
///
/// Each run of whitespace becomes one underscore. A blank name falls back
/// to [`FALLBACK_FILE_STEM`].
#[must_use]
pub fn suggested_filename(project_name: &str) -> String {
    if project_name.trim().is_empty() {
        return format!("{FALLBACK_FILE_STEM}{FILE_SUFFIX}");
    }

    let mut stem = String::with_capacity(project_name.len());
    let mut in_space = false;
    for c in project_name.chars() {
        if c.is_whitespace() {
            if !in_space {
                stem.push('_');
            }
            in_space = true;
        } else {
            stem.push(c);
            in_space = false;
        }
    }
    format!("{stem}{FILE_SUFFIX}")
}

/// The configuration pipeline.
pub struct ConfigPipeline<S> {
    serializer: S,
}

impl<S: ConfigSerializer> ConfigPipeline<S> {
    /// Creates a pipeline that renders with `serializer`.
    pub const fn new(serializer: S) -> Self {
        Self { serializer }
    }

    /// Returns every validation message for `doc`.
    #[must_use]
    pub fn validate(&self, doc: &ConfigurationDocument) -> Vec<String> {
        let errors = validate(doc);
        debug!(project = %doc.project.name, errors = errors.len(), "validated document");
        errors
    }

    /// Normalizes and renders `doc` without checking validity.
    ///
    /// # Errors
    ///
    /// Returns [`ApplicationError::Serialization`] if rendering fails.
    pub fn generate(&self, doc: &ConfigurationDocument) -> ApplicationResult<GeneratedConfig> {
        let canonical = normalize(doc);
        let content = self.serializer.serialize(&canonical)?;
        let generated = GeneratedConfig {
            content,
            filename: suggested_filename(&doc.project.name),
            media_type: self.serializer.media_type(),
        };
        debug!(
            filename = %generated.filename,
            lines = generated.line_count(),
            "generated configuration"
        );
        Ok(generated)
    }

    /// Renders `doc` only when it has no validation errors.
    ///
    /// # Errors
    ///
    /// Returns [`ApplicationError::Invalid`] carrying every message when
    /// validation fails, or [`ApplicationError::Serialization`] if
    /// rendering fails.
    pub fn generate_checked(
        &self,
        doc: &ConfigurationDocument,
    ) -> ApplicationResult<GeneratedConfig> {
        let errors = self.validate(doc);
        if !errors.is_empty() {
            return Err(ApplicationError::Invalid(errors));
        }
        self.generate(doc)
    }

    /// Renders `doc` for display. Serialization failures become a
    /// commented placeholder instead of an error.
    #[must_use]
    pub fn preview(&self, doc: &ConfigurationDocument) -> String {
        match self.serializer.serialize(&normalize(doc)) {
            Ok(content) => content,
            Err(e) => {
                warn!(error = %e, "preview rendering failed");
                format!("# Error generating preview\n# {}", e.message)
            }
        }
    }

    /// Returns a fresh copy of the template named `id`. Unknown
    /// identifiers load the basic template.
    #[must_use]
    pub fn load_template(&self, id: &str) -> ConfigurationDocument {
        debug!(template = id, "loading template");
        template(id)
    }
}
