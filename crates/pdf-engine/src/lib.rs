use doc_model::{PageFetchError, PageHandle, PageSize, PdfDocument};
use lopdf::{Dictionary, Document, ObjectId};
use std::fs;
use std::future::{ready, Future};
use std::path::{Path, PathBuf};

/// Inheritance depth cap when walking `/Parent` links for a MediaBox.
const MAX_PAGE_TREE_DEPTH: usize = 32;

#[derive(Debug, Clone)]
pub enum OpenSource {
    Path(PathBuf),
    Bytes(Vec<u8>),
}

impl From<PathBuf> for OpenSource {
    fn from(value: PathBuf) -> Self {
        Self::Path(value)
    }
}

impl From<&Path> for OpenSource {
    fn from(value: &Path) -> Self {
        Self::Path(value.to_path_buf())
    }
}

impl From<Vec<u8>> for OpenSource {
    fn from(value: Vec<u8>) -> Self {
        Self::Bytes(value)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PdfEngineError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("PDF parse error: {0}")]
    Parse(#[from] lopdf::Error),
    #[error("page {page} out of range (page_count={page_count})")]
    PageOutOfRange { page: u32, page_count: u32 },
    #[error("encrypted PDFs are not supported")]
    EncryptedUnsupported,
}

/// A parsed PDF reduced to what the viewers need: page count and geometry.
///
/// Pages are resolved eagerly at open time, so page fetches never touch the
/// file again.
#[derive(Debug, Clone, PartialEq)]
pub struct LopdfDocument {
    page_sizes: Vec<PageSize>,
}

impl LopdfDocument {
    pub fn open(source: impl Into<OpenSource>) -> Result<Self, PdfEngineError> {
        let bytes = match source.into() {
            OpenSource::Path(path) => fs::read(path)?,
            OpenSource::Bytes(bytes) => bytes,
        };

        let page_sizes = parse_page_sizes(&bytes)?;
        log::info!("opened PDF with {} page(s)", page_sizes.len());

        Ok(Self { page_sizes })
    }

    pub fn page_count(&self) -> u32 {
        self.page_sizes.len() as u32
    }

    /// Size of the 1-based `page_number`.
    pub fn page_size(&self, page_number: u32) -> Result<PageSize, PdfEngineError> {
        page_number
            .checked_sub(1)
            .and_then(|index| self.page_sizes.get(index as usize))
            .copied()
            .ok_or(PdfEngineError::PageOutOfRange {
                page: page_number,
                page_count: self.page_count(),
            })
    }

    /// Width source for fit-to-width; `None` for a document without pages.
    pub fn first_page_size(&self) -> Option<PageSize> {
        self.page_sizes.first().copied()
    }
}

impl PdfDocument for LopdfDocument {
    fn num_pages(&self) -> u32 {
        self.page_count()
    }

    fn get_page(
        &self,
        page_number: u32,
    ) -> impl Future<Output = Result<PageHandle, PageFetchError>> {
        let result = self
            .page_size(page_number)
            .map(|size| PageHandle::new(page_number, size))
            .map_err(|_| PageFetchError::OutOfRange {
                page: page_number,
                page_count: self.page_count(),
            });
        ready(result)
    }
}

fn parse_page_sizes(bytes: &[u8]) -> Result<Vec<PageSize>, PdfEngineError> {
    if bytes.windows("/Encrypt".len()).any(|window| window == b"/Encrypt") {
        return Err(PdfEngineError::EncryptedUnsupported);
    }

    let doc = Document::load_mem(bytes)?;
    let pages = doc.get_pages();
    let mut sizes = Vec::with_capacity(pages.len());

    for (_, object_id) in pages {
        let size = media_box(&doc, object_id)?.unwrap_or_else(|| {
            log::debug!("page {object_id:?} has no usable MediaBox, assuming Letter");
            PageSize::default()
        });
        sizes.push(size);
    }

    Ok(sizes)
}

/// The page's MediaBox, inherited from ancestors in the page tree when the
/// page itself has none.
fn media_box(doc: &Document, page_id: ObjectId) -> Result<Option<PageSize>, PdfEngineError> {
    let mut dict = doc.get_dictionary(page_id)?;

    for _ in 0..MAX_PAGE_TREE_DEPTH {
        if let Some(size) = parse_media_box(dict) {
            return Ok(Some(size));
        }

        match dict.get(b"Parent").and_then(|parent| parent.as_reference()) {
            Ok(parent_id) => dict = doc.get_dictionary(parent_id)?,
            Err(_) => break,
        }
    }

    Ok(None)
}

fn parse_media_box(dict: &Dictionary) -> Option<PageSize> {
    let array = dict.get(b"MediaBox").ok()?.as_array().ok()?;
    if array.len() != 4 {
        return None;
    }

    let x0 = array[0].as_float().ok()?;
    let y0 = array[1].as_float().ok()?;
    let x1 = array[2].as_float().ok()?;
    let y1 = array[3].as_float().ok()?;
    Some(PageSize {
        width_pt: f64::from((x1 - x0).abs()),
        height_pt: f64::from((y1 - y0).abs()),
    })
}
