//! The document engine contract.
//!
//! odconvert never parses or renders a document itself; a separately
//! running office engine does, reached through a session connection. This
//! module is the seam: the orchestrator is written against the traits
//! here, the [`remote`] submodule provides the production implementation,
//! and tests substitute recording fakes.
//!
//! The surface is deliberately narrow — exactly the operations one
//! conversion needs:
//!
//! ```text
//! Connector ──connect──▶ Session ──load──▶ Document
//!                                           │ refresh / supports_service
//!                                           │ page styles / printer
//!                                           │ store / per-page export
//!                                           └ close (always, discarding)
//! ```

pub mod remote;

use crate::error::ConvertError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A property value handed to the engine.
///
/// The engine's property model is name/value pairs where the value is a
/// boolean, an integer, a string, a width×height size (paper dimensions
/// in hundredths of a millimetre), or a nested property set (filter
/// data). `untagged` keeps the wire form natural: `true`, `100`,
/// `"USER"`, `{"width":21000,"height":29700}`. `Size` is declared before
/// `Set` so a width/height object deserializes as a size, not a generic
/// set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropValue {
    Bool(bool),
    Int(i64),
    Str(String),
    Size { width: u32, height: u32 },
    Set(BTreeMap<String, PropValue>),
}

impl From<bool> for PropValue {
    fn from(v: bool) -> Self {
        PropValue::Bool(v)
    }
}

impl From<i64> for PropValue {
    fn from(v: i64) -> Self {
        PropValue::Int(v)
    }
}

impl From<&str> for PropValue {
    fn from(v: &str) -> Self {
        PropValue::Str(v.to_string())
    }
}

impl From<String> for PropValue {
    fn from(v: String) -> Self {
        PropValue::Str(v)
    }
}

impl From<BTreeMap<String, PropValue>> for PropValue {
    fn from(v: BTreeMap<String, PropValue>) -> Self {
        PropValue::Set(v)
    }
}

/// An ordered list of named properties, passed to the engine verbatim.
pub type PropList = Vec<(String, PropValue)>;

/// Build one named property. `prop("Overwrite", true)` reads better than
/// the tuple-and-into dance at every call site.
pub fn prop(name: &str, value: impl Into<PropValue>) -> (String, PropValue) {
    (name.to_string(), value.into())
}

/// Options for loading a document.
///
/// `hidden` keeps the engine from opening a window for the document.
/// The filter fields are only set when the input format cannot be
/// auto-detected (plain text, delimited text); `None` means "let the
/// engine detect".
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    pub hidden: bool,
    pub filter_name: Option<String>,
    pub filter_options: Option<String>,
}

/// Establishes a session with a running engine.
pub trait Connector {
    type Session: Session;

    /// Connect to the engine. Fails with [`ConvertError::Connection`] when
    /// the engine is unreachable; no retry is attempted here.
    fn connect(&self) -> Result<Self::Session, ConvertError>;
}

/// An established channel to one running engine instance.
///
/// Owned exclusively by a single converter; not safe to share across
/// concurrent conversions.
pub trait Session {
    type Document: Document;

    /// Load a document from a `file://` URL. Engine-reported failures
    /// surface as [`ConvertError::Engine`].
    fn load(&mut self, url: &str, options: &LoadOptions)
        -> Result<Self::Document, ConvertError>;
}

/// A document loaded in the engine, scoped to one conversion.
///
/// Whoever loads a document must [`close`](Document::close) it exactly
/// once, on every path — the engine keeps it open otherwise.
pub trait Document {
    /// Refresh the document's content. Returns `Ok(false)` when the
    /// document's type does not support refreshing — a capability check,
    /// not a failure.
    fn refresh(&mut self) -> Result<bool, ConvertError>;

    /// Whether the document implements the named engine service.
    fn supports_service(&self, service: &str) -> Result<bool, ConvertError>;

    /// Names of every page style the document defines. Empty when the
    /// document's type has no page-style family.
    fn page_style_names(&self) -> Result<Vec<String>, ConvertError>;

    /// Set one property on one named page style.
    fn set_page_style_property(
        &mut self,
        style: &str,
        property: &str,
        value: PropValue,
    ) -> Result<(), ConvertError>;

    /// Apply printer settings (paper size, orientation) to the document.
    fn set_printer(&mut self, properties: &PropList) -> Result<(), ConvertError>;

    /// Store the document to a `file://` URL with the given filter
    /// properties.
    fn store_to_url(&mut self, url: &str, properties: &PropList) -> Result<(), ConvertError>;

    /// Number of draw pages / slides the document has.
    fn page_count(&self) -> Result<usize, ConvertError>;

    /// Export one page as a graphic with the given media type to a
    /// `file://` URL.
    fn export_page(
        &mut self,
        index: usize,
        media_type: &str,
        url: &str,
    ) -> Result<(), ConvertError>;

    /// Close the document. `discard` drops any modifications made during
    /// the conversion (style overrides, printer settings).
    fn close(&mut self, discard: bool) -> Result<(), ConvertError>;
}
