//! Configuration serializer port.

use wexcfg_domain::{CanonicalDocument, SerializationError};

/// Port for rendering a canonical document as configuration text.
///
/// Implementations must be deterministic: the same document always yields
/// the same text or the same error.
pub trait ConfigSerializer: Send + Sync {
    /// Media type of the produced text.
    fn media_type(&self) -> &'static str;

    /// Renders `canonical`.
    ///
    /// # Errors
    ///
    /// Returns [`SerializationError`] if the document holds a value the
    /// output format cannot express.
    fn serialize(&self, canonical: &CanonicalDocument) -> Result<String, SerializationError>;
}
