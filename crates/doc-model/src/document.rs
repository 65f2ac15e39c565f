use serde::{Deserialize, Serialize};
use std::future::Future;

/// Unzoomed page geometry in points (1 pt renders as 1 px at zoom 1.0).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageSize {
    pub width_pt: f64,
    pub height_pt: f64,
}

impl Default for PageSize {
    fn default() -> Self {
        Self { width_pt: 612.0, height_pt: 792.0 }
    }
}

/// A page retrieved from a [`PdfDocument`]. Page numbers are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageHandle {
    pub page_number: u32,
    pub size: PageSize,
}

impl PageHandle {
    pub fn new(page_number: u32, size: PageSize) -> Self {
        Self { page_number, size }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PageFetchError {
    #[error("page {page} out of range (page_count={page_count})")]
    OutOfRange { page: u32, page_count: u32 },
    #[error("page {page} unavailable: {reason}")]
    Unavailable { page: u32, reason: String },
}

/// A loaded PDF as seen by the viewers.
///
/// The document is immutable for a viewer's lifetime. Page retrieval is
/// asynchronous and may fail; the viewer decides which settlement to keep.
pub trait PdfDocument {
    fn num_pages(&self) -> u32;

    fn get_page(
        &self,
        page_number: u32,
    ) -> impl Future<Output = Result<PageHandle, PageFetchError>>;
}

impl<T: PdfDocument> PdfDocument for &T {
    fn num_pages(&self) -> u32 {
        (**self).num_pages()
    }

    fn get_page(
        &self,
        page_number: u32,
    ) -> impl Future<Output = Result<PageHandle, PageFetchError>> {
        (**self).get_page(page_number)
    }
}
