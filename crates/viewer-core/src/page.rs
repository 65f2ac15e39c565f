//! Contract with the page annotation layer
//!
//! The layer receives a [`PageView`] per rendered page and reports user
//! edits as [`PageEvent`]s with page-local raw targets. The viewer qualifies
//! them with document and page identity before handing them to the
//! embedding application's [`AnnotationCallbacks`].

use crate::mode::AnnotationMode;
use doc_model::{
    extend_target, AnnotationId, ExtendedTarget, PageAnnotation, PageHandle, RawTarget, Selector,
};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum PageEvent {
    Create(RawTarget),
    Update { annotation: RawTarget, previous: RawTarget },
    Delete(RawTarget),
    CancelSelected,
}

/// Props handed to the page annotation layer for one page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageView {
    pub page_number: u32,
    /// Page geometry once fetched; the continuous layout only knows numbers.
    pub page: Option<PageHandle>,
    pub annotations: Vec<PageAnnotation>,
    pub config: serde_json::Value,
    pub debug: bool,
    pub annotation_mode: AnnotationMode,
    pub zoom: f64,
}

impl PageView {
    /// Stored annotations projected into viewport pixels at the current zoom.
    ///
    /// Empty while the page geometry is unknown.
    pub fn overlays(&self) -> Vec<(AnnotationId, Selector)> {
        let Some(page) = self.page else {
            return Vec::new();
        };

        self.annotations
            .iter()
            .filter_map(|annotation| match annotation.project(page.size, self.zoom) {
                Ok(selector) => Some((annotation.id, selector)),
                Err(err) => {
                    log::debug!("skipping overlay {}: {err}", annotation.id);
                    None
                }
            })
            .collect()
    }
}

/// Optional annotation lifecycle callbacks supplied by the embedding application
///
/// A missing callback silently drops the corresponding event.
#[derive(Default)]
pub struct AnnotationCallbacks {
    on_create: Option<Box<dyn FnMut(ExtendedTarget)>>,
    on_update: Option<Box<dyn FnMut(ExtendedTarget, ExtendedTarget)>>,
    on_delete: Option<Box<dyn FnMut(ExtendedTarget)>>,
    on_cancel_selected: Option<Box<dyn FnMut()>>,
}

impl AnnotationCallbacks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_create(mut self, callback: impl FnMut(ExtendedTarget) + 'static) -> Self {
        self.on_create = Some(Box::new(callback));
        self
    }

    /// Called with `(updated, previous)`.
    pub fn on_update(
        mut self,
        callback: impl FnMut(ExtendedTarget, ExtendedTarget) + 'static,
    ) -> Self {
        self.on_update = Some(Box::new(callback));
        self
    }

    pub fn on_delete(mut self, callback: impl FnMut(ExtendedTarget) + 'static) -> Self {
        self.on_delete = Some(Box::new(callback));
        self
    }

    pub fn on_cancel_selected(mut self, callback: impl FnMut() + 'static) -> Self {
        self.on_cancel_selected = Some(Box::new(callback));
        self
    }

    /// Extend the event's targets and invoke the matching callback.
    ///
    /// Returns whether a callback ran.
    pub(crate) fn dispatch(
        &mut self,
        event: &PageEvent,
        document_url: &str,
        page_number: u32,
    ) -> bool {
        let extend = |target: &RawTarget| extend_target(target, document_url, page_number);

        match event {
            PageEvent::Create(target) => match self.on_create.as_mut() {
                Some(callback) => {
                    callback(extend(target));
                    true
                }
                None => false,
            },
            PageEvent::Update { annotation, previous } => match self.on_update.as_mut() {
                Some(callback) => {
                    callback(extend(annotation), extend(previous));
                    true
                }
                None => false,
            },
            PageEvent::Delete(target) => match self.on_delete.as_mut() {
                Some(callback) => {
                    callback(extend(target));
                    true
                }
                None => false,
            },
            PageEvent::CancelSelected => match self.on_cancel_selected.as_mut() {
                Some(callback) => {
                    callback();
                    true
                }
                None => false,
            },
        }
    }
}

impl fmt::Debug for AnnotationCallbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnnotationCallbacks")
            .field("on_create", &self.on_create.is_some())
            .field("on_update", &self.on_update.is_some())
            .field("on_delete", &self.on_delete.is_some())
            .field("on_cancel_selected", &self.on_cancel_selected.is_some())
            .finish()
    }
}
