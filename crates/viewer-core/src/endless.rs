//! Continuous layout: every page stacked vertically in one scrollable column.

use crate::chrome::ViewerChrome;
use crate::config::{ConfigError, ViewerConfig};
use crate::host::{EventOutcome, EventTarget, Fullscreen, HostEvent};
use crate::page::{AnnotationCallbacks, PageEvent, PageView};
use crate::view::{scale_transform, Body, MainView, ViewerView};
use doc_model::{AnnotationStore, PdfDocument};
use std::ops::RangeInclusive;

#[derive(Debug)]
pub struct EndlessViewer {
    chrome: ViewerChrome,
    num_pages: u32,
    document_url: String,
    page_config: serde_json::Value,
    callbacks: AnnotationCallbacks,
}

impl EndlessViewer {
    pub fn new(
        document: &impl PdfDocument,
        document_url: impl Into<String>,
        config: &ViewerConfig,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            chrome: ViewerChrome::new(config)?,
            num_pages: document.num_pages(),
            document_url: document_url.into(),
            page_config: serde_json::Value::Null,
            callbacks: AnnotationCallbacks::default(),
        })
    }

    /// Configuration forwarded untouched to the page annotation layer.
    pub fn with_page_config(mut self, page_config: serde_json::Value) -> Self {
        self.page_config = page_config;
        self
    }

    pub fn with_callbacks(mut self, callbacks: AnnotationCallbacks) -> Self {
        self.callbacks = callbacks;
        self
    }

    pub fn chrome(&self) -> &ViewerChrome {
        &self.chrome
    }

    pub fn chrome_mut(&mut self) -> &mut ViewerChrome {
        &mut self.chrome
    }

    pub fn num_pages(&self) -> u32 {
        self.num_pages
    }

    pub fn document_url(&self) -> &str {
        &self.document_url
    }

    /// Page numbers in display order; empty for a document without pages.
    pub fn page_numbers(&self) -> RangeInclusive<u32> {
        1..=self.num_pages
    }

    pub fn mount(&mut self, host: &mut impl EventTarget) -> bool {
        self.chrome.mount(host)
    }

    pub fn unmount(&mut self, host: &mut impl EventTarget) -> bool {
        self.chrome.unmount(host)
    }

    pub fn handle_event(&mut self, host: &impl Fullscreen, event: &HostEvent) -> EventOutcome {
        self.chrome.handle_event(host, event)
    }

    pub fn toggle_fullscreen(&mut self, host: &mut impl Fullscreen) {
        self.chrome.toggle_fullscreen(host);
    }

    /// Route an event from the annotation layer of `page_number`.
    ///
    /// Returns whether a callback ran. Events for pages outside the document
    /// are dropped.
    pub fn handle_page_event(&mut self, page_number: u32, event: &PageEvent) -> bool {
        if !self.page_numbers().contains(&page_number) {
            log::debug!("dropping page event for page {page_number} of {}", self.num_pages);
            return false;
        }

        self.callbacks.dispatch(event, &self.document_url, page_number)
    }

    pub fn view(&self, store: &impl AnnotationStore) -> ViewerView {
        let pages = self
            .page_numbers()
            .map(|page_number| PageView {
                page_number,
                page: None,
                annotations: store.get_annotations(page_number),
                config: self.page_config.clone(),
                debug: self.chrome.debug(),
                annotation_mode: self.chrome.annotation_mode(),
                zoom: self.chrome.zoom(),
            })
            .collect();

        ViewerView {
            class_name: "endless-viewer",
            container_style: self.chrome.container_style().clone(),
            header: self.chrome.header(None),
            main: MainView {
                style: self.chrome.main_style().clone(),
                transform: scale_transform(self.chrome.zoom()),
                transform_origin: "top left",
                body: Body::Pages { pages },
            },
        }
    }
}
