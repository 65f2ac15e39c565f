//! Single-page layout with previous/next navigation
//!
//! The viewer never fetches pages itself. `mount` and the navigation methods
//! hand back a [`PageRequest`]; the host performs `get_page` and reports the
//! settlement through [`PaginatedViewer::resolve`] (or lets
//! [`PaginatedViewer::load`] do both). Settlements of superseded requests are
//! discarded.

use crate::chrome::ViewerChrome;
use crate::config::{ConfigError, ViewerConfig};
use crate::fetch::{FetchOutcome, PageRequest, RequestKind, RequestTokens};
use crate::host::{EventOutcome, EventTarget, Fullscreen, HostEvent};
use crate::page::{AnnotationCallbacks, PageEvent, PageView};
use crate::view::{scale_transform, Body, MainView, ViewerView, PAGE_LOAD_ERROR};
use doc_model::{AnnotationStore, PageFetchError, PageHandle, PdfDocument};

#[derive(Debug)]
pub struct PaginatedViewer {
    chrome: ViewerChrome,
    num_pages: u32,
    document_url: String,
    page_config: serde_json::Value,
    callbacks: AnnotationCallbacks,
    page: Option<PageHandle>,
    tokens: RequestTokens,
    track_navigation_loading: bool,
}

impl PaginatedViewer {
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
            page: None,
            tokens: RequestTokens::new(),
            track_navigation_loading: config.track_navigation_loading,
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

    /// The displayed page; `None` until the initial fetch resolves.
    pub fn current_page(&self) -> Option<&PageHandle> {
        self.page.as_ref()
    }

    pub fn page_label(&self) -> String {
        let current = self.page.map(|page| page.page_number.to_string()).unwrap_or_default();
        format!("{current} / {}", self.num_pages)
    }

    /// Register listeners and request the first page.
    ///
    /// Returns `None` when the viewer is already mounted.
    pub fn mount(&mut self, host: &mut impl EventTarget) -> Option<PageRequest> {
        if !self.chrome.mount(host) {
            return None;
        }

        self.chrome.begin_loading();
        Some(self.tokens.issue(1, RequestKind::Initial))
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

    pub fn previous_page(&mut self) -> Option<PageRequest> {
        let current = self.page?.page_number;
        self.go_to_page(current.saturating_sub(1))
    }

    pub fn next_page(&mut self) -> Option<PageRequest> {
        let current = self.page?.page_number;
        self.go_to_page(current.saturating_add(1))
    }

    /// Request `page_number`, clamped to `[1, num_pages]`.
    ///
    /// Returns `None` when no page is displayed yet or when the clamped target
    /// is the page already shown.
    pub fn go_to_page(&mut self, page_number: u32) -> Option<PageRequest> {
        let current = self.page?.page_number;
        let target = page_number.clamp(1, self.num_pages.max(1));

        if target == current {
            log::debug!("page {target} already displayed, skipping fetch");
            return None;
        }

        if self.track_navigation_loading {
            self.chrome.begin_loading();
        }
        Some(self.tokens.issue(target, RequestKind::Navigation))
    }

    /// Apply the settlement of a fetch previously handed out by this viewer.
    pub fn resolve(
        &mut self,
        request: PageRequest,
        result: Result<PageHandle, PageFetchError>,
    ) -> FetchOutcome {
        if !self.tokens.is_latest(&request) {
            log::debug!(
                "discarding stale fetch of page {} ({:?})",
                request.page_number,
                request.token
            );
            return FetchOutcome::Stale;
        }

        let tracked = request.kind == RequestKind::Initial || self.track_navigation_loading;

        match result {
            Ok(page) => {
                self.page = Some(page);
                if tracked {
                    self.chrome.finish_loading();
                }
                FetchOutcome::Applied(page)
            }
            Err(err) => {
                log::warn!("failed to load page {}: {err}", request.page_number);
                if tracked {
                    self.chrome.fail(PAGE_LOAD_ERROR);
                }
                FetchOutcome::Failed(err)
            }
        }
    }

    /// Fetch the requested page from `document` and apply the result.
    pub async fn load<D: PdfDocument>(
        &mut self,
        document: &D,
        request: PageRequest,
    ) -> FetchOutcome {
        let result = document.get_page(request.page_number).await;
        self.resolve(request, result)
    }

    /// Route an event from the page annotation layer of the displayed page.
    ///
    /// Returns whether a callback ran. Events arriving before any page is
    /// displayed are dropped.
    pub fn handle_page_event(&mut self, event: &PageEvent) -> bool {
        let Some(page) = self.page else {
            log::debug!("dropping page event, no page displayed");
            return false;
        };

        self.callbacks.dispatch(event, &self.document_url, page.page_number)
    }

    pub fn body(&self, store: &impl AnnotationStore) -> Body {
        if let Some(message) = self.chrome.error() {
            return Body::Error { message: message.to_owned() };
        }

        match self.page {
            Some(page) if !self.chrome.is_loading() => Body::Pages {
                pages: vec![PageView {
                    page_number: page.page_number,
                    page: Some(page),
                    annotations: store.get_annotations(page.page_number),
                    config: self.page_config.clone(),
                    debug: self.chrome.debug(),
                    annotation_mode: self.chrome.annotation_mode(),
                    zoom: self.chrome.zoom(),
                }],
            },
            _ => Body::Loading,
        }
    }

    pub fn view(&self, store: &impl AnnotationStore) -> ViewerView {
        ViewerView {
            class_name: "paginated-viewer",
            container_style: self.chrome.container_style().clone(),
            header: self.chrome.header(Some(self.page_label())),
            main: MainView {
                style: self.chrome.main_style().clone(),
                transform: scale_transform(self.chrome.zoom()),
                transform_origin: "top left",
                body: self.body(store),
            },
        }
    }
}
