//! Document and annotation model shared by the viewers.
//!
//! Holds the collaborator contracts a viewer is driven through (document,
//! page, annotation store) and the annotation target model, including the
//! transform between viewport pixels and page-normalized coordinates.

pub mod document;
pub mod store;
pub mod target;

pub use document::{PageFetchError, PageHandle, PageSize, PdfDocument};
pub use store::AnnotationStore;
pub use target::{
    extend_target, AnnotationId, ExtendedTarget, PageAnnotation, PageTransform, Point, RawTarget,
    Rect, Selector, TargetError,
};
