//! Error types for the odconvert library.
//!
//! One enum, one variant per failure kind, one distinct message per
//! variant. The kinds fall into three groups callers treat differently:
//!
//! * **Before the engine** — [`ConvertError::Connection`],
//!   [`ConvertError::InvalidPaperSize`],
//!   [`ConvertError::InvalidOrientation`],
//!   [`ConvertError::InputNotFound`]: nothing was loaded, nothing needs
//!   cleanup, safe to retry after fixing the argument.
//!
//! * **Resolution** — [`ConvertError::UnknownOutputFormat`],
//!   [`ConvertError::UnsupportedConversion`],
//!   [`ConvertError::UnknownFamily`]: the registry has no policy for the
//!   requested conversion. Retrying the same call cannot succeed; the
//!   caller must change the output format or the input document.
//!
//! * **Engine faults** — [`ConvertError::Engine`],
//!   [`ConvertError::Protocol`]: the engine (or the bridge transport to
//!   it) failed mid-operation. These carry whatever detail the engine
//!   reported; the document is still closed before they propagate.
//!
//! Nothing is retried internally; every kind surfaces to the caller of
//! `convert`.

use crate::family::DocumentFamily;
use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the odconvert library.
#[derive(Debug, Error)]
pub enum ConvertError {
    // ── Connection ────────────────────────────────────────────────────────
    /// The engine's bridge socket could not be reached.
    #[error("failed to connect to the document engine at {host}:{port}: {detail}\nIs the engine running with its bridge socket enabled?")]
    Connection {
        host: String,
        port: u16,
        detail: String,
    },

    // ── Parameters ────────────────────────────────────────────────────────
    /// The paper size name is not in the registry.
    #[error("unknown paper size '{name}' (expected one of A3, A4, A5)")]
    InvalidPaperSize { name: String },

    /// The paper orientation name is not in the registry.
    #[error("unknown paper orientation '{name}' (expected PORTRAIT or LANDSCAPE)")]
    InvalidOrientation { name: String },

    /// Input file was not found at the given path.
    #[error("no such input file: '{path}'")]
    InputNotFound { path: PathBuf },

    // ── Resolution ────────────────────────────────────────────────────────
    /// The output extension has no registry entries at all.
    #[error("unknown output format: '{extension}'")]
    UnknownOutputFormat { extension: String },

    /// The output extension is known but has no entry for the document's
    /// family (e.g. a spreadsheet cannot become a docx).
    #[error("unsupported conversion: from '{family}' to '{extension}'")]
    UnsupportedConversion {
        family: DocumentFamily,
        extension: String,
    },

    /// The loaded document satisfies none of the known family services.
    #[error("the loaded document matches no known document family")]
    UnknownFamily,

    // ── Engine faults ─────────────────────────────────────────────────────
    /// The engine reported a failure during load, store, or export.
    #[error("engine I/O error {code}: {detail}")]
    Engine { code: i64, detail: String },

    /// The bridge connection produced a reply the client cannot interpret,
    /// or the transport failed mid-session.
    #[error("engine bridge protocol fault: {detail}")]
    Protocol { detail: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connection_display() {
        let e = ConvertError::Connection {
            host: "localhost".into(),
            port: 2002,
            detail: "connection refused".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("localhost:2002"), "got: {msg}");
        assert!(msg.contains("connection refused"));
    }

    #[test]
    fn unsupported_conversion_display() {
        let e = ConvertError::UnsupportedConversion {
            family: DocumentFamily::Spreadsheet,
            extension: "docx".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("'Spreadsheet'"), "got: {msg}");
        assert!(msg.contains("'docx'"));
    }

    #[test]
    fn each_kind_renders_distinctly() {
        let errors = [
            ConvertError::Connection {
                host: "h".into(),
                port: 1,
                detail: "d".into(),
            },
            ConvertError::InvalidPaperSize { name: "B5".into() },
            ConvertError::InvalidOrientation {
                name: "SIDEWAYS".into(),
            },
            ConvertError::InputNotFound {
                path: PathBuf::from("a.odt"),
            },
            ConvertError::UnknownOutputFormat {
                extension: "xyz".into(),
            },
            ConvertError::UnsupportedConversion {
                family: DocumentFamily::Text,
                extension: "ods".into(),
            },
            ConvertError::UnknownFamily,
            ConvertError::Engine {
                code: 2074,
                detail: "store failed".into(),
            },
            ConvertError::Protocol {
                detail: "truncated reply".into(),
            },
        ];
        let mut messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
        messages.sort();
        messages.dedup();
        assert_eq!(messages.len(), errors.len(), "messages must be distinct");
    }
}
