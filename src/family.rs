//! Document family classification.
//!
//! Which export filters are valid for a document depends on its
//! structural family, not its input file extension — a `.odt` loaded as
//! a web-flavoured document must use the web filters. The family is
//! derived fresh for every conversion by probing the loaded document for
//! engine service support, never stored.

use crate::engine::Document;
use crate::error::ConvertError;
use serde::Serialize;
use std::fmt;

/// The structural category of a loaded document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DocumentFamily {
    Text,
    Web,
    Spreadsheet,
    Presentation,
    Drawing,
}

impl fmt::Display for DocumentFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DocumentFamily::Text => "Text",
            DocumentFamily::Web => "Web",
            DocumentFamily::Spreadsheet => "Spreadsheet",
            DocumentFamily::Presentation => "Presentation",
            DocumentFamily::Drawing => "Drawing",
        })
    }
}

/// Capability probes in priority order; the first supported service wins.
///
/// Web must be probed before generic text: a web-flavoured text document
/// also satisfies the generic text service, and probing the more specific
/// service first is what keeps it from classifying as plain Text.
const FAMILY_PROBES: [(&str, DocumentFamily); 5] = [
    ("com.sun.star.text.WebDocument", DocumentFamily::Web),
    ("com.sun.star.text.GenericTextDocument", DocumentFamily::Text),
    ("com.sun.star.sheet.SpreadsheetDocument", DocumentFamily::Spreadsheet),
    (
        "com.sun.star.presentation.PresentationDocument",
        DocumentFamily::Presentation,
    ),
    ("com.sun.star.drawing.DrawingDocument", DocumentFamily::Drawing),
];

/// Classify a loaded document by probing service support.
///
/// Fails with [`ConvertError::UnknownFamily`] when no probe matches —
/// a document type the registry has no policy for.
pub fn classify<D: Document + ?Sized>(document: &D) -> Result<DocumentFamily, ConvertError> {
    for (service, family) in FAMILY_PROBES {
        if document.supports_service(service)? {
            return Ok(family);
        }
    }
    Err(ConvertError::UnknownFamily)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{PropList, PropValue};
    use std::cell::RefCell;

    /// Minimal stub: answers service probes from a fixed set and records
    /// the probe order.
    struct StubDocument {
        services: Vec<&'static str>,
        probed: RefCell<Vec<String>>,
    }

    impl StubDocument {
        fn supporting(services: &[&'static str]) -> Self {
            Self {
                services: services.to_vec(),
                probed: RefCell::new(Vec::new()),
            }
        }
    }

    impl Document for StubDocument {
        fn refresh(&mut self) -> Result<bool, ConvertError> {
            Ok(true)
        }

        fn supports_service(&self, service: &str) -> Result<bool, ConvertError> {
            self.probed.borrow_mut().push(service.to_string());
            Ok(self.services.contains(&service))
        }

        fn page_style_names(&self) -> Result<Vec<String>, ConvertError> {
            Ok(Vec::new())
        }

        fn set_page_style_property(
            &mut self,
            _style: &str,
            _property: &str,
            _value: PropValue,
        ) -> Result<(), ConvertError> {
            Ok(())
        }

        fn set_printer(&mut self, _properties: &PropList) -> Result<(), ConvertError> {
            Ok(())
        }

        fn store_to_url(&mut self, _url: &str, _properties: &PropList) -> Result<(), ConvertError> {
            Ok(())
        }

        fn page_count(&self) -> Result<usize, ConvertError> {
            Ok(0)
        }

        fn export_page(
            &mut self,
            _index: usize,
            _media_type: &str,
            _url: &str,
        ) -> Result<(), ConvertError> {
            Ok(())
        }

        fn close(&mut self, _discard: bool) -> Result<(), ConvertError> {
            Ok(())
        }
    }

    #[test]
    fn classifies_each_family() {
        let cases = [
            ("com.sun.star.text.GenericTextDocument", DocumentFamily::Text),
            ("com.sun.star.sheet.SpreadsheetDocument", DocumentFamily::Spreadsheet),
            (
                "com.sun.star.presentation.PresentationDocument",
                DocumentFamily::Presentation,
            ),
            ("com.sun.star.drawing.DrawingDocument", DocumentFamily::Drawing),
        ];
        for (service, expected) in cases {
            let doc = StubDocument::supporting(&[service]);
            assert_eq!(classify(&doc).unwrap(), expected);
        }
    }

    #[test]
    fn web_wins_over_generic_text() {
        // A web document also satisfies the generic text service; it must
        // still classify as Web.
        let doc = StubDocument::supporting(&[
            "com.sun.star.text.WebDocument",
            "com.sun.star.text.GenericTextDocument",
        ]);
        assert_eq!(classify(&doc).unwrap(), DocumentFamily::Web);
    }

    #[test]
    fn probing_stops_at_first_match() {
        let doc = StubDocument::supporting(&["com.sun.star.text.WebDocument"]);
        classify(&doc).unwrap();
        assert_eq!(
            doc.probed.borrow().as_slice(),
            ["com.sun.star.text.WebDocument"],
            "no further services should be probed after a hit"
        );
    }

    #[test]
    fn no_match_is_unknown_family() {
        let doc = StubDocument::supporting(&[]);
        assert!(matches!(classify(&doc), Err(ConvertError::UnknownFamily)));
        // All five probes were tried before giving up.
        assert_eq!(doc.probed.borrow().len(), 5);
    }
}
