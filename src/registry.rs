//! The format registry: every table the conversion logic looks things up
//! in, and nothing else.
//!
//! All tables are immutable, process-wide, initialised once, and exposed
//! only through the lookup functions below — call sites never see (let
//! alone mutate) the maps themselves. Safe to consult from any number of
//! conversions at once.
//!
//! The export matrix is sparse. Most output formats only make sense for
//! some document families (`docx` can only hold text content), and an
//! unmapped cell is a hard, typed error rather than a fallback:
//! [`ConvertError::UnknownOutputFormat`] when the extension has no entries
//! at all, [`ConvertError::UnsupportedConversion`] when entries exist but
//! not for the document's family. The two carry different remediation —
//! "we don't do that format" vs. "that format can't hold this content" —
//! so they stay distinct kinds.

use crate::engine::PropValue;
use crate::error::ConvertError;
use crate::family::DocumentFamily;
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Import handling for one input extension.
///
/// Only extensions the engine cannot reliably auto-detect need an entry;
/// everything else loads with detection left to the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSpec {
    pub filter_name: &'static str,
    pub filter_options: Option<&'static str>,
}

/// Export configuration for one (extension, family) cell of the matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportSpec {
    pub filter_name: &'static str,
    pub filter_options: Option<&'static str>,
    /// Structured filter data forwarded under the engine's `FilterData`
    /// property (e.g. skip-empty-pages for PDF export).
    pub filter_data: &'static [(&'static str, PropValue)],
    /// Whether an existing output file is replaced.
    pub overwrite: bool,
}

/// Named paper size, in hundredths of a millimetre.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaperSize {
    pub width: u32,
    pub height: u32,
}

/// Paper orientation for the document's printer settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaperOrientation {
    Portrait,
    Landscape,
}

impl PaperOrientation {
    /// The engine-side name of this orientation.
    pub fn engine_name(self) -> &'static str {
        match self {
            PaperOrientation::Portrait => "PORTRAIT",
            PaperOrientation::Landscape => "LANDSCAPE",
        }
    }
}

// ── Tables ───────────────────────────────────────────────────────────────

static IMPORT_FILTERS: Lazy<HashMap<&'static str, ImportSpec>> = Lazy::new(|| {
    HashMap::from([
        (
            "txt",
            ImportSpec {
                filter_name: "Text (encoded)",
                filter_options: Some("utf8"),
            },
        ),
        (
            "csv",
            ImportSpec {
                filter_name: "Text - txt - csv (StarCalc)",
                filter_options: Some("44,34,0"),
            },
        ),
    ])
});

static PDF_FILTER_DATA: &[(&str, PropValue)] = &[("IsSkipEmptyPages", PropValue::Bool(true))];

static EXPORT_FILTERS: Lazy<HashMap<&'static str, HashMap<DocumentFamily, ExportSpec>>> =
    Lazy::new(|| {
        use crate::family::DocumentFamily::{Drawing, Presentation, Spreadsheet, Text, Web};

        fn spec(filter_name: &'static str) -> ExportSpec {
            ExportSpec {
                filter_name,
                filter_options: None,
                filter_data: &[],
                overwrite: true,
            }
        }

        fn pdf_spec(filter_name: &'static str) -> ExportSpec {
            ExportSpec {
                filter_data: PDF_FILTER_DATA,
                ..spec(filter_name)
            }
        }

        HashMap::from([
            (
                "pdf",
                HashMap::from([
                    (Text, pdf_spec("writer_pdf_Export")),
                    (Web, pdf_spec("writer_web_pdf_Export")),
                    (Spreadsheet, pdf_spec("calc_pdf_Export")),
                    (Presentation, pdf_spec("impress_pdf_Export")),
                    (Drawing, pdf_spec("draw_pdf_Export")),
                ]),
            ),
            (
                "html",
                HashMap::from([
                    (Text, spec("HTML (StarWriter)")),
                    (Spreadsheet, spec("HTML (StarCalc)")),
                    (Presentation, spec("impress_html_Export")),
                ]),
            ),
            (
                "odt",
                HashMap::from([(Text, spec("writer8")), (Web, spec("writerweb8_writer"))]),
            ),
            ("doc", HashMap::from([(Text, spec("MS Word 97"))])),
            ("docx", HashMap::from([(Text, spec("MS Word 2007 XML"))])),
            ("rtf", HashMap::from([(Text, spec("Rich Text Format"))])),
            (
                "txt",
                HashMap::from([(
                    Text,
                    ExportSpec {
                        filter_options: Some("utf8"),
                        ..spec("Text")
                    },
                )]),
            ),
            ("ods", HashMap::from([(Spreadsheet, spec("calc8"))])),
            ("xls", HashMap::from([(Spreadsheet, spec("MS Excel 97"))])),
            (
                "csv",
                HashMap::from([(
                    Spreadsheet,
                    ExportSpec {
                        filter_options: Some("44,34,0"),
                        ..spec("Text - txt - csv (StarCalc)")
                    },
                )]),
            ),
            ("odp", HashMap::from([(Presentation, spec("impress8"))])),
            ("ppt", HashMap::from([(Presentation, spec("MS PowerPoint 97"))])),
            (
                "pptx",
                HashMap::from([(Presentation, spec("Impress MS PowerPoint 2007 XML"))]),
            ),
            (
                "swf",
                HashMap::from([
                    (Drawing, spec("draw_flash_Export")),
                    (Presentation, spec("impress_flash_Export")),
                ]),
            ),
        ])
    });

/// Page-style properties forced before export, per family.
///
/// Spreadsheets and presentations otherwise export with whatever print
/// scale the document was saved with; pinning the scale to 100% (and
/// dropping the cell grid for spreadsheets) keeps the output geometry
/// predictable.
static SPREADSHEET_STYLE_OVERRIDE: &[(&str, PropValue)] = &[
    ("PageScale", PropValue::Int(100)),
    ("PrintGrid", PropValue::Bool(false)),
];
static PRESENTATION_STYLE_OVERRIDE: &[(&str, PropValue)] = &[("PageScale", PropValue::Int(100))];

/// Raster extensions handled by per-page graphic export, with the media
/// type the engine's graphic filter expects.
static IMAGE_MEDIA_TYPES: &[(&str, &str)] = &[
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("gif", "image/gif"),
    ("bmp", "image/bmp"),
    ("tiff", "image/tiff"),
];

// ── Lookups ──────────────────────────────────────────────────────────────

/// Import handling for an input extension, or `None` to let the engine
/// auto-detect. Extensions match case-insensitively.
pub fn import_spec_for(extension: &str) -> Option<&'static ImportSpec> {
    IMPORT_FILTERS.get(extension.to_ascii_lowercase().as_str())
}

/// The export configuration for (extension, family).
///
/// A match on extension alone is insufficient — the cell for the family
/// must exist.
pub fn export_spec_for(
    extension: &str,
    family: DocumentFamily,
) -> Result<&'static ExportSpec, ConvertError> {
    let by_family = EXPORT_FILTERS
        .get(extension.to_ascii_lowercase().as_str())
        .ok_or_else(|| ConvertError::UnknownOutputFormat {
            extension: extension.to_string(),
        })?;
    by_family
        .get(&family)
        .ok_or_else(|| ConvertError::UnsupportedConversion {
            family,
            extension: extension.to_string(),
        })
}

/// Page-style properties to force for a family, or `None` when no
/// normalization applies.
pub fn style_override_for(family: DocumentFamily) -> Option<&'static [(&'static str, PropValue)]> {
    match family {
        DocumentFamily::Spreadsheet => Some(SPREADSHEET_STYLE_OVERRIDE),
        DocumentFamily::Presentation => Some(PRESENTATION_STYLE_OVERRIDE),
        _ => None,
    }
}

/// Whether an output extension denotes a raster image (and therefore a
/// per-page export rather than a single store).
pub fn is_image_extension(extension: &str) -> bool {
    media_type_for(extension).is_some()
}

/// Media type for a raster output extension.
pub fn media_type_for(extension: &str) -> Option<&'static str> {
    let extension = extension.to_ascii_lowercase();
    IMAGE_MEDIA_TYPES
        .iter()
        .find(|(ext, _)| *ext == extension)
        .map(|(_, media)| *media)
}

/// Dimensions for a named paper size. Names match case-insensitively.
pub fn paper_size_for(name: &str) -> Result<PaperSize, ConvertError> {
    match name.to_ascii_uppercase().as_str() {
        "A5" => Ok(PaperSize {
            width: 14800,
            height: 21000,
        }),
        "A4" => Ok(PaperSize {
            width: 21000,
            height: 29700,
        }),
        "A3" => Ok(PaperSize {
            width: 29700,
            height: 42000,
        }),
        _ => Err(ConvertError::InvalidPaperSize {
            name: name.to_string(),
        }),
    }
}

/// Orientation for a named value. Names match case-insensitively.
pub fn orientation_for(name: &str) -> Result<PaperOrientation, ConvertError> {
    match name.to_ascii_uppercase().as_str() {
        "PORTRAIT" => Ok(PaperOrientation::Portrait),
        "LANDSCAPE" => Ok(PaperOrientation::Landscape),
        _ => Err(ConvertError::InvalidOrientation {
            name: name.to_string(),
        }),
    }
}
