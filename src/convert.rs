//! The conversion orchestrator: the one place that sequences engine
//! calls.
//!
//! ## Shape
//!
//! ```text
//! connect ─▶ validate ─▶ load ─▶ classify ─┬▶ per-page image export
//!                                          └▶ style override ─▶ resolve
//!                                             ─▶ printer config ─▶ store
//!                                 ....then, on every path: close
//! ```
//!
//! One linear sequence with a single branch. The branch is exclusive: an
//! output extension either denotes a raster image (one graphic export per
//! page, no store) or a document format (exactly one store, no page
//! exports). What format becomes what is decided entirely by
//! [`crate::resolve`] — nothing here special-cases formats.
//!
//! ## Cleanup guarantee
//!
//! Everything after a successful load runs inside a block whose result is
//! captured before the document is closed, so close happens exactly once
//! per loaded document — on success, on resolution failure, and on
//! engine-reported store/export failure alike. A close failure after a
//! successful body surfaces; a close failure after a failed body loses to
//! the body's error.

use crate::engine::{prop, Connector, Document, LoadOptions, PropList, PropValue, Session};
use crate::error::ConvertError;
use crate::family::{self, DocumentFamily};
use crate::registry::{self, ExportSpec, PaperOrientation, PaperSize};
use crate::resolve;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info};

/// What a successful conversion produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Conversion {
    /// The family the document classified as.
    pub family: DocumentFamily,
    pub outcome: Outcome,
}

/// The terminal shape of a successful conversion.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Outcome {
    /// A single store with the resolved export filter.
    Stored { filter: &'static str },
    /// One graphic export per page, `<base>-<index>.<ext>`.
    PagesExported { pages: usize },
}

/// Drives conversions over an exclusively owned engine session.
///
/// One converter, one session, one conversion at a time. Run several
/// converters (each with its own connection) for parallel conversions if
/// the engine accepts multiple clients; nothing here coordinates that.
pub struct Converter<S: Session> {
    session: S,
}

impl<S: Session> Converter<S> {
    /// Acquire a session from the connector.
    ///
    /// Fails with [`ConvertError::Connection`] when the engine is
    /// unreachable. Not retried — retry policy belongs to the caller.
    pub fn connect<C>(connector: &C) -> Result<Self, ConvertError>
    where
        C: Connector<Session = S>,
    {
        Ok(Self::new(connector.connect()?))
    }

    /// Wrap an already established session.
    pub fn new(session: S) -> Self {
        Self { session }
    }

    /// Convert `input` to `output`, with named print parameters
    /// (`"A4"`/`"A3"`/`"A5"`, `"PORTRAIT"`/`"LANDSCAPE"`).
    ///
    /// The output format is taken from `output`'s extension. For raster
    /// extensions the conversion is one export per page; for everything
    /// else it is a single store through the resolved export filter.
    pub fn convert(
        &mut self,
        input: &Path,
        output: &Path,
        paper_size: &str,
        paper_orientation: &str,
    ) -> Result<Conversion, ConvertError> {
        // Parameters first: nothing may touch the engine until the names
        // resolve.
        let size = registry::paper_size_for(paper_size)?;
        let orientation = registry::orientation_for(paper_orientation)?;
        if !input.is_file() {
            return Err(ConvertError::InputNotFound {
                path: input.to_path_buf(),
            });
        }

        let mut options = LoadOptions {
            hidden: true,
            ..LoadOptions::default()
        };
        if let Some(import) = file_extension(input)
            .as_deref()
            .and_then(registry::import_spec_for)
        {
            options.filter_name = Some(import.filter_name.to_string());
            options.filter_options = import.filter_options.map(str::to_string);
        }

        info!(
            input = %input.display(),
            output = %output.display(),
            "starting conversion"
        );
        let mut document = self.session.load(&file_url(input), &options)?;

        // From here the document must be closed on every path.
        let result = convert_loaded(&mut document, output, size, orientation);
        let closed = document.close(true);
        let conversion = result?;
        closed?;

        info!(family = %conversion.family, "conversion complete");
        Ok(conversion)
    }
}

/// Steps between load and close: refresh, classify, branch, produce.
fn convert_loaded<D: Document>(
    document: &mut D,
    output: &Path,
    size: PaperSize,
    orientation: PaperOrientation,
) -> Result<Conversion, ConvertError> {
    if !document.refresh()? {
        debug!("document type does not support refreshing; continuing");
    }

    let family = family::classify(document)?;
    debug!(%family, "classified document");

    let extension = file_extension(output).unwrap_or_default();
    if let Some(media_type) = registry::media_type_for(&extension) {
        let pages = export_pages(document, output, &extension, media_type)?;
        Ok(Conversion {
            family,
            outcome: Outcome::PagesExported { pages },
        })
    } else {
        apply_style_overrides(document, family)?;
        let spec = resolve::resolve(document, &extension)?;
        apply_print_configuration(document, family, size, orientation)?;

        info!(filter = spec.filter_name, output = %output.display(), "storing document");
        document.store_to_url(&file_url(output), &store_properties(spec))?;
        Ok(Conversion {
            family,
            outcome: Outcome::Stored {
                filter: spec.filter_name,
            },
        })
    }
}

/// Export every page as a graphic, sequentially and in page order.
///
/// The first failing page surfaces immediately; pages already written
/// stay on disk, and later pages are never attempted.
fn export_pages<D: Document + ?Sized>(
    document: &mut D,
    output: &Path,
    extension: &str,
    media_type: &str,
) -> Result<usize, ConvertError> {
    let pages = document.page_count()?;
    let stem = output
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    info!(pages, media_type, "exporting pages as images");
    for index in 0..pages {
        let target = output.with_file_name(format!("{stem}-{index}.{extension}"));
        debug!(page = index, target = %target.display(), "exporting page");
        document.export_page(index, media_type, &file_url(&target))?;
    }
    Ok(pages)
}

/// Force the family's page-style properties onto every named page style.
fn apply_style_overrides<D: Document + ?Sized>(
    document: &mut D,
    family: DocumentFamily,
) -> Result<(), ConvertError> {
    let Some(properties) = registry::style_override_for(family) else {
        return Ok(());
    };
    let styles = document.page_style_names()?;
    debug!(%family, styles = styles.len(), "overriding page style properties");
    for style in &styles {
        for (name, value) in properties {
            document.set_page_style_property(style, name, value.clone())?;
        }
    }
    Ok(())
}

/// Push paper size and orientation into the document's printer settings.
///
/// Applied before every store, even for outputs with no print geometry
/// (plain text, csv): paginated exports depend on the side effects this
/// has on page layout, so it stays unconditional.
fn apply_print_configuration<D: Document + ?Sized>(
    document: &mut D,
    family: DocumentFamily,
    size: PaperSize,
    orientation: PaperOrientation,
) -> Result<(), ConvertError> {
    let mut properties: PropList = vec![
        prop(
            "Size",
            PropValue::Size {
                width: size.width,
                height: size.height,
            },
        ),
        prop("PaperFormat", "USER"),
        prop("PaperOrientation", orientation.engine_name()),
    ];
    if family == DocumentFamily::Spreadsheet {
        properties.push(prop("PrintAllSheets", true));
    }
    document.set_printer(&properties)
}

/// Store properties for a resolved export spec.
fn store_properties(spec: &ExportSpec) -> PropList {
    let mut properties = vec![prop("FilterName", spec.filter_name)];
    if let Some(options) = spec.filter_options {
        properties.push(prop("FilterOptions", options));
    }
    if !spec.filter_data.is_empty() {
        let data: BTreeMap<String, PropValue> = spec
            .filter_data
            .iter()
            .map(|(name, value)| (name.to_string(), value.clone()))
            .collect();
        properties.push(prop("FilterData", PropValue::Set(data)));
    }
    properties.push(prop("Overwrite", spec.overwrite));
    properties
}

/// Lowercased extension of a path, if it has one.
fn file_extension(path: &Path) -> Option<String> {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
}

/// Absolute `file://` URL for a filesystem path, the form the engine's
/// load/store operations expect.
fn file_url(path: &Path) -> String {
    let path = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    let mut url = String::from("file://");
    for &byte in path.as_os_str().as_encoded_bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' | b'/' => {
                url.push(byte as char)
            }
            _ => {
                url.push('%');
                url.push_str(&format!("{byte:02X}"));
            }
        }
    }
    url
}
