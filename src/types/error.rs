use thiserror::Error;

use crate::types::PageId;

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("truncated buffer: need {needed} more bytes at offset {offset}, {remaining} remain")]
    TruncatedBuffer {
        offset: usize,
        needed: usize,
        remaining: usize,
    },

    #[error("truncated header: expected {expected} bytes, got {actual}")]
    TruncatedHeader { expected: usize, actual: usize },

    #[error("unknown value tag: {0}")]
    UnknownTag(u8),

    #[error("unknown page type {tag} (page_id: {page_id})")]
    UnknownPageType { tag: u8, page_id: PageId },

    #[error("invalid UTF-8 in text value at offset {offset}")]
    InvalidText { offset: usize },

    #[error("corrupted page {page_id}: {source}")]
    CorruptedPage {
        page_id: PageId,
        #[source]
        source: Box<DecodeError>,
    },
}

impl DecodeError {
    /// Wrap a payload decode failure with the page that owns the payload.
    pub fn in_page(self, page_id: PageId) -> Self {
        DecodeError::CorruptedPage {
            page_id,
            source: Box::new(self),
        }
    }
}

pub type Result<T> = std::result::Result<T, DecodeError>;
