//! Export filter resolution.
//!
//! The single authority for "can this content become that format":
//! classify the loaded document, then look the (extension, family) cell
//! up in the registry. Every other component asks here instead of
//! special-casing formats itself.

use crate::engine::Document;
use crate::error::ConvertError;
use crate::family;
use crate::registry::{self, ExportSpec};
use tracing::debug;

/// Resolve the export configuration for storing `document` with the given
/// output extension.
///
/// # Errors
/// * [`ConvertError::UnknownFamily`] — the document matches no known family
/// * [`ConvertError::UnknownOutputFormat`] — no entries for the extension
/// * [`ConvertError::UnsupportedConversion`] — entries exist, but not for
///   this document's family
pub fn resolve<D: Document + ?Sized>(
    document: &D,
    output_extension: &str,
) -> Result<&'static ExportSpec, ConvertError> {
    let family = family::classify(document)?;
    let spec = registry::export_spec_for(output_extension, family)?;
    debug!(
        %family,
        extension = output_extension,
        filter = spec.filter_name,
        "resolved export filter"
    );
    Ok(spec)
}
