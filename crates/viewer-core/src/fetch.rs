//! Page-fetch sequencing
//!
//! Every fetch a viewer issues carries a token from a monotonic generation
//! counter. Only the settlement of the latest request is applied; an earlier
//! request that resolves late is stale and gets dropped, so a slow fetch can
//! never overwrite the page a later navigation produced.

use doc_model::{PageFetchError, PageHandle};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    /// First page fetch after mount
    Initial,
    /// Previous/next/go-to navigation
    Navigation,
}

/// A page fetch the host must perform and hand back through `resolve`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub token: RequestToken,
    pub page_number: u32,
    pub kind: RequestKind,
}

/// What happened to a settled fetch.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// The page is now displayed.
    Applied(PageHandle),
    /// The fetch failed; the error state reflects it when tracked.
    Failed(PageFetchError),
    /// A newer request superseded this one; the result was discarded.
    Stale,
}

#[derive(Debug, Default)]
pub struct RequestTokens {
    generation: u64,
}

impl RequestTokens {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&mut self, page_number: u32, kind: RequestKind) -> PageRequest {
        self.generation += 1;
        PageRequest { token: RequestToken(self.generation), page_number, kind }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_latest(&self, request: &PageRequest) -> bool {
        request.token.0 == self.generation
    }
}
