//! # odconvert
//!
//! Convert office documents between formats by driving a headless office
//! engine over its session socket.
//!
//! ## Why this crate?
//!
//! Office formats are enormous; reimplementing even one of them is a
//! multi-year project. A running office engine already loads, lays out,
//! and exports all of them — what it does not do is decide *which* export
//! filter fits a given document and output format, normalize print
//! geometry first, or turn "convert to png" into one export per slide.
//! This crate is that decision layer: connect to the engine, load the
//! document, classify its structural family, resolve the right filter
//! from the format×family matrix, and sequence the engine calls.
//!
//! ## Pipeline Overview
//!
//! ```text
//! input file
//!  │
//!  ├─ 1. Connect   session to the engine's bridge socket
//!  ├─ 2. Validate  paper size / orientation names (before any engine call)
//!  ├─ 3. Load      hidden, with import filter for txt/csv
//!  ├─ 4. Classify  Web → Text → Spreadsheet → Presentation → Drawing
//!  ├─ 5. Branch    raster output: one export per page, <base>-<n>.<ext>
//!  │               document output: style override → resolve filter →
//!  │               printer config → store
//!  └─ 6. Close     always, discarding changes, on every path
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use odconvert::{Converter, Endpoint, RemoteConnector};
//! use std::path::Path;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let connector = RemoteConnector::new(Endpoint::default());
//!     let mut converter = Converter::connect(&connector)?;
//!     let done = converter.convert(
//!         Path::new("report.odt"),
//!         Path::new("report.pdf"),
//!         "A4",
//!         "PORTRAIT",
//!     )?;
//!     println!("converted as {} document", done.family);
//!     Ok(())
//! }
//! ```
//!
//! ## The engine is a collaborator, not a dependency
//!
//! Everything engine-side — rendering, parsing, the formats themselves —
//! lives behind the traits in [`engine`]. [`engine::remote`] talks to a
//! conventionally configured engine bridge over TCP; tests substitute
//! recording fakes; embedders with their own transport implement the
//! traits and reuse the whole orchestration layer unchanged.
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `odconvert` binary (clap + anyhow + tracing-subscriber) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! odconvert = { version = "0.2", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod engine;
pub mod error;
pub mod family;
pub mod registry;
pub mod resolve;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{Endpoint, DEFAULT_PORT};
pub use convert::{Conversion, Converter, Outcome};
pub use engine::remote::RemoteConnector;
pub use error::ConvertError;
pub use family::DocumentFamily;
pub use registry::{ExportSpec, ImportSpec, PaperOrientation, PaperSize};
