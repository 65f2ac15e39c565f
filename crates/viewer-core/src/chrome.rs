//! State shared by both viewer layouts
//!
//! Zoom, annotation mode, debug overlay, fullscreen, loading/error flags and
//! the document-wide listeners that exist while a viewer is mounted.

use crate::config::{ConfigError, FitWidthClamp, Style, ViewerConfig};
use crate::host::{
    EventOutcome, EventTarget, Fullscreen, HostEvent, HostEventKind, ListenerId, ListenerKind,
    ShortcutAction,
};
use crate::mode::AnnotationMode;
use crate::view::{HeaderView, ToolbarView};
use crate::zoom::Zoom;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Listeners {
    keyboard: ListenerId,
    fullscreen: ListenerId,
}

#[derive(Debug, Clone)]
pub struct ViewerChrome {
    zoom: Zoom,
    annotation_mode: AnnotationMode,
    debug: bool,
    is_fullscreen: bool,
    is_loading: bool,
    error: Option<String>,
    fit_width_clamp: FitWidthClamp,
    container_style: Style,
    header_style: Style,
    main_style: Style,
    listeners: Option<Listeners>,
}

impl ViewerChrome {
    pub fn new(config: &ViewerConfig) -> Result<Self, ConfigError> {
        let limits = config.validate()?;

        Ok(Self {
            zoom: Zoom::new(config.initial_zoom, limits),
            annotation_mode: AnnotationMode::default(),
            debug: false,
            is_fullscreen: false,
            is_loading: false,
            error: None,
            fit_width_clamp: config.fit_width_clamp,
            container_style: config.container_style.clone(),
            header_style: config.header_style.clone(),
            main_style: config.main_style.clone(),
            listeners: None,
        })
    }

    pub fn zoom(&self) -> f64 {
        self.zoom.factor()
    }

    pub fn zoom_label(&self) -> String {
        self.zoom.label()
    }

    pub fn annotation_mode(&self) -> AnnotationMode {
        self.annotation_mode
    }

    pub fn debug(&self) -> bool {
        self.debug
    }

    pub fn is_fullscreen(&self) -> bool {
        self.is_fullscreen
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_mounted(&self) -> bool {
        self.listeners.is_some()
    }

    pub fn container_style(&self) -> &Style {
        &self.container_style
    }

    pub fn main_style(&self) -> &Style {
        &self.main_style
    }

    pub fn zoom_in(&mut self) -> f64 {
        self.zoom.zoom_in()
    }

    pub fn zoom_out(&mut self) -> f64 {
        self.zoom.zoom_out()
    }

    pub fn fit_to_width(&mut self, container_width_px: f64, first_page_width_pt: f64) -> bool {
        self.zoom.fit_to_width(container_width_px, first_page_width_pt, self.fit_width_clamp)
    }

    pub fn toggle_debug(&mut self) -> bool {
        self.debug = !self.debug;
        self.debug
    }

    pub fn toggle_mode(&mut self, requested: AnnotationMode) -> AnnotationMode {
        self.annotation_mode = self.annotation_mode.toggle(requested);
        self.annotation_mode
    }

    pub fn toggle_relations_mode(&mut self) -> AnnotationMode {
        self.toggle_mode(AnnotationMode::Relations)
    }

    pub fn toggle_image_mode(&mut self) -> AnnotationMode {
        self.toggle_mode(AnnotationMode::Image)
    }

    /// Ask the host to enter or leave fullscreen.
    ///
    /// The local flag only follows the host's change notifications, see
    /// [`ViewerChrome::handle_event`].
    pub fn toggle_fullscreen(&mut self, host: &mut impl Fullscreen) {
        let result = if host.is_active() { host.exit() } else { host.enter() };

        if let Err(err) = result {
            log::warn!("fullscreen toggle failed: {err}");
        }
    }

    /// Register the document-wide listeners. Returns `false` when already mounted.
    pub fn mount(&mut self, host: &mut impl EventTarget) -> bool {
        if self.listeners.is_some() {
            return false;
        }

        self.listeners = Some(Listeners {
            keyboard: host.add_listener(ListenerKind::Keyboard),
            fullscreen: host.add_listener(ListenerKind::FullscreenChange),
        });
        true
    }

    /// Remove the listeners registered by `mount`. Returns `false` when not mounted.
    pub fn unmount(&mut self, host: &mut impl EventTarget) -> bool {
        let Some(listeners) = self.listeners.take() else {
            return false;
        };

        for id in [listeners.keyboard, listeners.fullscreen] {
            if !host.remove_listener(id) {
                log::debug!("listener {id:?} was already gone at unmount");
            }
        }
        true
    }

    pub fn handle_event(&mut self, host: &impl Fullscreen, event: &HostEvent) -> EventOutcome {
        let Some(listeners) = self.listeners else {
            return EventOutcome::Ignored;
        };

        match event.kind {
            HostEventKind::Key(key) if event.listener == listeners.keyboard => {
                match key.shortcut() {
                    Some(ShortcutAction::ZoomIn) => {
                        self.zoom_in();
                        EventOutcome::Handled
                    }
                    Some(ShortcutAction::ZoomOut) => {
                        self.zoom_out();
                        EventOutcome::Handled
                    }
                    None => EventOutcome::Ignored,
                }
            }
            HostEventKind::FullscreenChange if event.listener == listeners.fullscreen => {
                self.is_fullscreen = host.is_active();
                EventOutcome::Handled
            }
            _ => EventOutcome::Ignored,
        }
    }

    pub(crate) fn begin_loading(&mut self) {
        self.is_loading = true;
    }

    pub(crate) fn finish_loading(&mut self) {
        self.is_loading = false;
        self.error = None;
    }

    pub(crate) fn fail(&mut self, message: &str) {
        self.is_loading = false;
        self.error = Some(message.to_owned());
    }

    pub(crate) fn header(&self, page_label: Option<String>) -> HeaderView {
        HeaderView {
            style: self.header_style.clone(),
            toolbar: ToolbarView {
                debug: self.debug,
                relations_active: self.annotation_mode == AnnotationMode::Relations,
                image_active: self.annotation_mode == AnnotationMode::Image,
                fullscreen: self.is_fullscreen,
                zoom_label: self.zoom_label(),
                page_label,
            },
        }
    }
}
