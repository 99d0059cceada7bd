use serde::{Deserialize, Serialize};

use crate::types::{
    PAGE_HEADER_SIZE, PAGE_PAYLOAD_OFFSET, PageId,
    error::{DecodeError, Result},
    record::{CompositeKey, Record},
};

// Page type tags, fixed by the on-disk format
pub const PAGE_TYPE_META: u8 = 0;
pub const PAGE_TYPE_INTERNAL: u8 = 1;
pub const PAGE_TYPE_LEAF: u8 = 2;

/*
 * Page Layout on Disk (fixed-size slot, big-endian throughout)
 * ┌─────────────────────────────────────────────────────────────────┐
 * │                    PAGE HEADER (49 bytes)                       │
 * │  page_id(8) | parent(8) | prev(8) | next(8) | page_type(1) |    │
 * │  key_count(2) | free_space(2) | reserved(4) | lsn(8)            │
 * ├─────────────────────────────────────────────────────────────────┤
 * │                TYPE-SPECIFIC PAYLOAD (offset 49)                │
 * │  meta:     root(8) page_size(4) order(2) version(2)             │
 * │  internal: key_count keys, then key_count+1 child ids (8 each)  │
 * │  leaf:     key_count keys, then key_count records               │
 * ├─────────────────────────────────────────────────────────────────┤
 * │            UNUSED TRAILING BYTES (never interpreted)            │
 * └─────────────────────────────────────────────────────────────────┘
 */

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageHeader {
    pub page_id: PageId,
    pub parent_page: Option<PageId>,
    pub prev_page: Option<PageId>,
    pub next_page: Option<PageId>,
    pub page_type: u8,
    pub key_count: u16,
    pub free_space: u16,
    pub lsn: u64,
}

impl PageHeader {
    /// Decode the fixed 49-byte header. The page-type tag is carried raw and
    /// validated by `Page::from_bytes`, so an unknown tag surfaces as
    /// `UnknownPageType` rather than being misread as a known layout.
    ///
    /// A raw id of 0 in the parent/prev/next fields means "no page"; ids are
    /// 1-based throughout.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < PAGE_HEADER_SIZE {
            return Err(DecodeError::TruncatedHeader {
                expected: PAGE_HEADER_SIZE,
                actual: bytes.len(),
            });
        }

        let mut offset = 0;

        let page_id = u64::from_be_bytes([
            bytes[offset],
            bytes[offset + 1],
            bytes[offset + 2],
            bytes[offset + 3],
            bytes[offset + 4],
            bytes[offset + 5],
            bytes[offset + 6],
            bytes[offset + 7],
        ]);
        offset += 8;

        let parent_raw = u64::from_be_bytes([
            bytes[offset],
            bytes[offset + 1],
            bytes[offset + 2],
            bytes[offset + 3],
            bytes[offset + 4],
            bytes[offset + 5],
            bytes[offset + 6],
            bytes[offset + 7],
        ]);
        offset += 8;

        let prev_raw = u64::from_be_bytes([
            bytes[offset],
            bytes[offset + 1],
            bytes[offset + 2],
            bytes[offset + 3],
            bytes[offset + 4],
            bytes[offset + 5],
            bytes[offset + 6],
            bytes[offset + 7],
        ]);
        offset += 8;

        let next_raw = u64::from_be_bytes([
            bytes[offset],
            bytes[offset + 1],
            bytes[offset + 2],
            bytes[offset + 3],
            bytes[offset + 4],
            bytes[offset + 5],
            bytes[offset + 6],
            bytes[offset + 7],
        ]);
        offset += 8;

        let page_type = bytes[offset];
        offset += 1;

        let key_count = u16::from_be_bytes([bytes[offset], bytes[offset + 1]]);
        offset += 2;

        let free_space = u16::from_be_bytes([bytes[offset], bytes[offset + 1]]);
        offset += 2;

        // 4 reserved bytes, read and discarded
        offset += 4;

        let lsn = u64::from_be_bytes([
            bytes[offset],
            bytes[offset + 1],
            bytes[offset + 2],
            bytes[offset + 3],
            bytes[offset + 4],
            bytes[offset + 5],
            bytes[offset + 6],
            bytes[offset + 7],
        ]);

        Ok(Self {
            page_id,
            parent_page: page_id_or_none(parent_raw),
            prev_page: page_id_or_none(prev_raw),
            next_page: page_id_or_none(next_raw),
            page_type,
            key_count,
            free_space,
            lsn,
        })
    }
}

fn page_id_or_none(raw: u64) -> Option<PageId> {
    if raw == 0 { None } else { Some(raw) }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetaPage {
    pub header: PageHeader,
    pub root_page: PageId, // 0 means the tree is empty
    pub page_size: u32,
    pub order: u16,
    pub version: u16,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InternalPage {
    pub header: PageHeader,
    pub keys: Vec<CompositeKey>,
    pub children: Vec<PageId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeafPage {
    pub header: PageHeader,
    pub keys: Vec<CompositeKey>,
    pub values: Vec<Record>,
}

/// A decoded page. Closed set of variants so every consumer is forced to
/// handle each page kind exhaustively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Page {
    Meta(MetaPage),
    Internal(InternalPage),
    Leaf(LeafPage),
}

impl Page {
    /// Decode one page slot: header first, then the type-specific payload
    /// starting at the fixed payload offset. Payload failures are wrapped
    /// with the owning page id.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let header = PageHeader::from_bytes(bytes)?;
        let page_id = header.page_id;

        match header.page_type {
            PAGE_TYPE_META => decode_meta(header, bytes).map_err(|e| e.in_page(page_id)),
            PAGE_TYPE_INTERNAL => decode_internal(header, bytes).map_err(|e| e.in_page(page_id)),
            PAGE_TYPE_LEAF => decode_leaf(header, bytes).map_err(|e| e.in_page(page_id)),
            tag => Err(DecodeError::UnknownPageType { tag, page_id }),
        }
    }

    pub fn header(&self) -> &PageHeader {
        match self {
            Page::Meta(p) => &p.header,
            Page::Internal(p) => &p.header,
            Page::Leaf(p) => &p.header,
        }
    }
}

fn decode_meta(header: PageHeader, bytes: &[u8]) -> Result<Page> {
    let offset = PAGE_PAYLOAD_OFFSET;
    if offset + 16 > bytes.len() {
        return Err(DecodeError::TruncatedBuffer {
            offset,
            needed: 16,
            remaining: bytes.len().saturating_sub(offset),
        });
    }

    let root_page = u64::from_be_bytes([
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
        bytes[offset + 4],
        bytes[offset + 5],
        bytes[offset + 6],
        bytes[offset + 7],
    ]);
    let page_size = u32::from_be_bytes([
        bytes[offset + 8],
        bytes[offset + 9],
        bytes[offset + 10],
        bytes[offset + 11],
    ]);
    let order = u16::from_be_bytes([bytes[offset + 12], bytes[offset + 13]]);
    let version = u16::from_be_bytes([bytes[offset + 14], bytes[offset + 15]]);

    Ok(Page::Meta(MetaPage {
        header,
        root_page,
        page_size,
        order,
        version,
    }))
}

fn decode_internal(header: PageHeader, bytes: &[u8]) -> Result<Page> {
    let key_count = header.key_count as usize;
    let mut offset = PAGE_PAYLOAD_OFFSET;

    let mut keys = Vec::with_capacity(key_count);
    for _ in 0..key_count {
        let (key, next) = CompositeKey::from_bytes(bytes, offset)?;
        keys.push(key);
        offset = next;
    }

    // key_count + 1 children separate the key ranges; fewer than that is a
    // decode failure, never a short vector.
    let mut children = Vec::with_capacity(key_count + 1);
    for _ in 0..key_count + 1 {
        if offset + 8 > bytes.len() {
            return Err(DecodeError::TruncatedBuffer {
                offset,
                needed: 8,
                remaining: bytes.len() - offset,
            });
        }
        let child = u64::from_be_bytes([
            bytes[offset],
            bytes[offset + 1],
            bytes[offset + 2],
            bytes[offset + 3],
            bytes[offset + 4],
            bytes[offset + 5],
            bytes[offset + 6],
            bytes[offset + 7],
        ]);
        offset += 8;
        children.push(child);
    }

    Ok(Page::Internal(InternalPage {
        header,
        keys,
        children,
    }))
}

fn decode_leaf(header: PageHeader, bytes: &[u8]) -> Result<Page> {
    let key_count = header.key_count as usize;
    let mut offset = PAGE_PAYLOAD_OFFSET;

    let mut keys = Vec::with_capacity(key_count);
    for _ in 0..key_count {
        let (key, next) = CompositeKey::from_bytes(bytes, offset)?;
        keys.push(key);
        offset = next;
    }

    let mut values = Vec::with_capacity(key_count);
    for _ in 0..key_count {
        let (record, next) = Record::from_bytes(bytes, offset)?;
        values.push(record);
        offset = next;
    }

    Ok(Page::Leaf(LeafPage {
        header,
        keys,
        values,
    }))
}
