//! Annotation targets and the page coordinate model
//!
//! The page annotation layer captures geometry in viewport pixel space: the
//! page's top-left corner is the origin and distances are scaled by whatever
//! zoom was active at capture time. Stores keep geometry page-normalized
//! instead, as fractions of the page width and height, so an annotation lands
//! on the same spot of the page at any zoom level.
//!
//! Capture flow:
//! 1. the layer emits a [`RawTarget`] (pixel space, capture zoom recorded)
//! 2. the viewer stamps document and page identity with [`extend_target`]
//! 3. [`ExtendedTarget::normalize`] produces a zoom-independent [`PageAnnotation`]
//! 4. [`PageAnnotation::project`] maps it back to pixels for any zoom

use crate::document::PageSize;
use serde::{Deserialize, Serialize};

/// Unique identifier for an annotation
///
/// Stable across zoom changes and reloads. Generated using UUID v4.
pub type AnnotationId = uuid::Uuid;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TargetError {
    #[error("degenerate page transform (page {width_pt}x{height_pt} pt, zoom {zoom})")]
    DegenerateTransform { width_pt: f64, height_pt: f64, zoom: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }
}

/// Geometry of an annotation target
///
/// The coordinate space depends on the carrier: pixels in a [`RawTarget`],
/// page fractions in a [`PageAnnotation`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Selector {
    /// Rectangular region (also used for image edits)
    Rect(Rect),

    /// Closed polygon
    Polygon { points: Vec<Point> },

    /// Link between two annotations; has no geometry of its own
    Relation { from: AnnotationId, to: AnnotationId },
}

impl Selector {
    /// Apply independent per-axis maps to every coordinate.
    fn map_axes(&self, fx: impl Fn(f64) -> f64, fy: impl Fn(f64) -> f64) -> Selector {
        match self {
            Selector::Rect(rect) => Selector::Rect(Rect {
                x: fx(rect.x),
                y: fy(rect.y),
                width: fx(rect.width),
                height: fy(rect.height),
            }),
            Selector::Polygon { points } => Selector::Polygon {
                points: points.iter().map(|p| Point::new(fx(p.x), fy(p.y))).collect(),
            },
            Selector::Relation { from, to } => Selector::Relation { from: *from, to: *to },
        }
    }
}

/// Raw target emitted by the page annotation layer
///
/// Geometry is page-local and in viewport pixels at `zoom`. Once emitted, the
/// viewer never modifies it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawTarget {
    pub id: AnnotationId,
    pub selector: Selector,
    /// Zoom factor active when the geometry was captured
    pub zoom: f64,
    /// Annotation payload, opaque to the viewer
    #[serde(default)]
    pub body: serde_json::Value,
}

impl RawTarget {
    pub fn new(selector: Selector, zoom: f64) -> Self {
        Self { id: AnnotationId::new_v4(), selector, zoom, body: serde_json::Value::Null }
    }
}

/// A raw target qualified with the document and page it belongs to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtendedTarget {
    pub document_url: String,
    pub page_number: u32,
    #[serde(flatten)]
    pub target: RawTarget,
}

/// Stamp document and page identity onto a raw target.
///
/// Total and pure: it never touches the page handle and never fails. The
/// returned value owns a copy of `raw`.
pub fn extend_target(raw: &RawTarget, document_url: &str, page_number: u32) -> ExtendedTarget {
    ExtendedTarget { document_url: document_url.to_owned(), page_number, target: raw.clone() }
}

impl ExtendedTarget {
    pub fn id(&self) -> AnnotationId {
        self.target.id
    }

    /// Convert the captured pixel geometry into page fractions.
    pub fn normalize(&self, page_size: PageSize) -> Result<PageAnnotation, TargetError> {
        let transform = PageTransform::new(page_size, self.target.zoom)?;

        Ok(PageAnnotation {
            id: self.target.id,
            document_url: self.document_url.clone(),
            page_number: self.page_number,
            selector: transform.to_page(&self.target.selector),
            body: self.target.body.clone(),
        })
    }
}

/// Zoom-independent annotation as kept by a store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageAnnotation {
    pub id: AnnotationId,
    pub document_url: String,
    pub page_number: u32,
    /// Geometry as fractions of the page size (0.0..=1.0 inside the page)
    pub selector: Selector,
    #[serde(default)]
    pub body: serde_json::Value,
}

impl PageAnnotation {
    /// Map the normalized geometry to viewport pixels at `zoom`.
    pub fn project(&self, page_size: PageSize, zoom: f64) -> Result<Selector, TargetError> {
        Ok(PageTransform::new(page_size, zoom)?.to_viewport(&self.selector))
    }
}

/// Scale composition between viewport pixels and page fractions
///
/// One page-fraction unit spans `page_size * zoom` pixels on each axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageTransform {
    page_size: PageSize,
    zoom: f64,
}

impl PageTransform {
    pub fn new(page_size: PageSize, zoom: f64) -> Result<Self, TargetError> {
        let valid = |v: f64| v.is_finite() && v > 0.0;

        if !valid(page_size.width_pt) || !valid(page_size.height_pt) || !valid(zoom) {
            return Err(TargetError::DegenerateTransform {
                width_pt: page_size.width_pt,
                height_pt: page_size.height_pt,
                zoom,
            });
        }

        Ok(Self { page_size, zoom })
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Rendered page size in pixels.
    pub fn viewport_size(&self) -> (f64, f64) {
        (self.page_size.width_pt * self.zoom, self.page_size.height_pt * self.zoom)
    }

    pub fn to_page(&self, selector: &Selector) -> Selector {
        let (width, height) = self.viewport_size();
        selector.map_axes(|x| x / width, |y| y / height)
    }

    pub fn to_viewport(&self, selector: &Selector) -> Selector {
        let (width, height) = self.viewport_size();
        selector.map_axes(|x| x * width, |y| y * height)
    }
}
