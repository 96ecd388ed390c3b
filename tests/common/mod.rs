//! A recording fake engine.
//!
//! Implements the full engine contract in memory: answers service probes
//! from a configured set, reports a configured page count, and records
//! every call so tests can assert on exactly what the orchestrator did —
//! most importantly that a loaded document is closed exactly once on
//! every path. Failure injection covers the engine-reported store and
//! per-page export faults.

use odconvert::engine::{Connector, Document, LoadOptions, PropList, PropValue, Session};
use odconvert::error::ConvertError;
use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

/// Everything the fake observed, for assertions after a conversion.
#[derive(Debug, Default)]
pub struct Recording {
    pub load_calls: usize,
    pub load_options: Vec<LoadOptions>,
    pub refresh_calls: usize,
    pub service_probes: Vec<String>,
    /// (style name, property name, value)
    pub style_properties: Vec<(String, String, PropValue)>,
    pub printer_calls: Vec<PropList>,
    /// (target url, store properties)
    pub store_calls: Vec<(String, PropList)>,
    /// (page index, media type, target url)
    pub exported_pages: Vec<(usize, String, String)>,
    pub close_calls: usize,
}

/// Configurable in-memory engine; cloning shares the recording.
#[derive(Clone)]
pub struct FakeEngine {
    services: HashSet<&'static str>,
    page_styles: Vec<&'static str>,
    page_count: usize,
    refresh_supported: bool,
    fail_store_with: Option<i64>,
    fail_export_at: Option<usize>,
    recording: Arc<Mutex<Recording>>,
}

impl FakeEngine {
    pub fn with_services(services: &[&'static str]) -> Self {
        Self {
            services: services.iter().copied().collect(),
            page_styles: vec!["Default"],
            page_count: 1,
            refresh_supported: true,
            fail_store_with: None,
            fail_export_at: None,
            recording: Arc::new(Mutex::new(Recording::default())),
        }
    }

    pub fn text_document() -> Self {
        Self::with_services(&["com.sun.star.text.GenericTextDocument"])
    }

    pub fn web_document() -> Self {
        // A web document also answers the generic text probe.
        Self::with_services(&[
            "com.sun.star.text.WebDocument",
            "com.sun.star.text.GenericTextDocument",
        ])
    }

    pub fn spreadsheet_document() -> Self {
        Self::with_services(&["com.sun.star.sheet.SpreadsheetDocument"])
    }

    pub fn presentation_document() -> Self {
        Self::with_services(&["com.sun.star.presentation.PresentationDocument"])
    }

    pub fn drawing_document() -> Self {
        Self::with_services(&["com.sun.star.drawing.DrawingDocument"])
    }

    pub fn unclassifiable() -> Self {
        Self::with_services(&[])
    }

    pub fn with_page_count(mut self, pages: usize) -> Self {
        self.page_count = pages;
        self
    }

    pub fn with_page_styles(mut self, styles: &[&'static str]) -> Self {
        self.page_styles = styles.to_vec();
        self
    }

    pub fn without_refresh(mut self) -> Self {
        self.refresh_supported = false;
        self
    }

    pub fn failing_store(mut self, code: i64) -> Self {
        self.fail_store_with = Some(code);
        self
    }

    pub fn failing_export_at(mut self, index: usize) -> Self {
        self.fail_export_at = Some(index);
        self
    }

    pub fn recording(&self) -> MutexGuard<'_, Recording> {
        self.recording.lock().expect("recording lock")
    }
}

impl Connector for FakeEngine {
    type Session = FakeSession;

    fn connect(&self) -> Result<FakeSession, ConvertError> {
        Ok(FakeSession {
            engine: self.clone(),
        })
    }
}

pub struct FakeSession {
    engine: FakeEngine,
}

impl Session for FakeSession {
    type Document = FakeDocument;

    fn load(
        &mut self,
        _url: &str,
        options: &LoadOptions,
    ) -> Result<FakeDocument, ConvertError> {
        let mut recording = self.engine.recording();
        recording.load_calls += 1;
        recording.load_options.push(options.clone());
        drop(recording);
        Ok(FakeDocument {
            engine: self.engine.clone(),
        })
    }
}

pub struct FakeDocument {
    engine: FakeEngine,
}

impl Document for FakeDocument {
    fn refresh(&mut self) -> Result<bool, ConvertError> {
        self.engine.recording().refresh_calls += 1;
        Ok(self.engine.refresh_supported)
    }

    fn supports_service(&self, service: &str) -> Result<bool, ConvertError> {
        self.engine
            .recording()
            .service_probes
            .push(service.to_string());
        Ok(self.engine.services.contains(service))
    }

    fn page_style_names(&self) -> Result<Vec<String>, ConvertError> {
        Ok(self
            .engine
            .page_styles
            .iter()
            .map(|s| s.to_string())
            .collect())
    }

    fn set_page_style_property(
        &mut self,
        style: &str,
        property: &str,
        value: PropValue,
    ) -> Result<(), ConvertError> {
        self.engine.recording().style_properties.push((
            style.to_string(),
            property.to_string(),
            value,
        ));
        Ok(())
    }

    fn set_printer(&mut self, properties: &PropList) -> Result<(), ConvertError> {
        self.engine
            .recording()
            .printer_calls
            .push(properties.clone());
        Ok(())
    }

    fn store_to_url(&mut self, url: &str, properties: &PropList) -> Result<(), ConvertError> {
        if let Some(code) = self.engine.fail_store_with {
            return Err(ConvertError::Engine {
                code,
                detail: "injected store failure".to_string(),
            });
        }
        self.engine
            .recording()
            .store_calls
            .push((url.to_string(), properties.clone()));
        Ok(())
    }

    fn page_count(&self) -> Result<usize, ConvertError> {
        Ok(self.engine.page_count)
    }

    fn export_page(
        &mut self,
        index: usize,
        media_type: &str,
        url: &str,
    ) -> Result<(), ConvertError> {
        if self.engine.fail_export_at == Some(index) {
            return Err(ConvertError::Engine {
                code: 3088,
                detail: format!("injected export failure at page {index}"),
            });
        }
        self.engine.recording().exported_pages.push((
            index,
            media_type.to_string(),
            url.to_string(),
        ));
        Ok(())
    }

    fn close(&mut self, discard: bool) -> Result<(), ConvertError> {
        assert!(discard, "documents must be closed discarding changes");
        self.engine.recording().close_calls += 1;
        Ok(())
    }
}
