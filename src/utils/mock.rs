use std::{
    fs,
    path::PathBuf,
    time::{SystemTime, UNIX_EPOCH},
};

use tempfile::env::temp_dir;

use crate::types::{
    DEFAULT_PAGE_SIZE, PAGE_HEADER_SIZE, PageId,
    page::{PAGE_TYPE_INTERNAL, PAGE_TYPE_LEAF, PAGE_TYPE_META},
    record::{CompositeKey, Record},
};

pub fn get_unix_timestamp_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("Time went backwards")
        .as_millis()
}

pub fn create_temp_db_path_with_prefix(prefix: &str) -> PathBuf {
    let mut temp_path = temp_dir();
    temp_path.push(format!("{}_{}.db", prefix, get_unix_timestamp_millis()));
    temp_path
}

/// A database file on disk that cleans up after itself. Tests and benches
/// build page images with the encoders below and write them slot by slot.
pub struct TempDbFile {
    pub path: PathBuf,
}

impl TempDbFile {
    pub fn new(prefix: &str) -> Self {
        Self {
            path: create_temp_db_path_with_prefix(prefix),
        }
    }

    /// Concatenate page images into the file, slot 1 first. Images shorter
    /// than a full slot land as a trailing partial slot, which the scanner
    /// must ignore.
    pub fn write_slots(&self, slots: &[Vec<u8>]) -> std::io::Result<()> {
        let mut bytes = Vec::new();
        for slot in slots {
            bytes.extend_from_slice(slot);
        }
        fs::write(&self.path, bytes)
    }
}

impl Drop for TempDbFile {
    fn drop(&mut self) {
        if self.path.exists() {
            let _ = fs::remove_file(&self.path);
        }
    }
}

/// Serialize a 49-byte page header. Parent/prev/next of 0 mean "no page".
#[allow(clippy::too_many_arguments)]
pub fn header_bytes(
    page_id: PageId,
    parent: PageId,
    prev: PageId,
    next: PageId,
    page_type: u8,
    key_count: u16,
    free_space: u16,
    lsn: u64,
) -> Vec<u8> {
    let mut buffer = Vec::with_capacity(PAGE_HEADER_SIZE);
    buffer.extend_from_slice(&page_id.to_be_bytes());
    buffer.extend_from_slice(&parent.to_be_bytes());
    buffer.extend_from_slice(&prev.to_be_bytes());
    buffer.extend_from_slice(&next.to_be_bytes());
    buffer.push(page_type);
    buffer.extend_from_slice(&key_count.to_be_bytes());
    buffer.extend_from_slice(&free_space.to_be_bytes());
    buffer.extend_from_slice(&0u32.to_be_bytes()); // reserved padding
    buffer.extend_from_slice(&lsn.to_be_bytes());
    buffer
}

/// Build a full meta page image, padded to the default page size.
pub fn build_meta_page(root_page: PageId, order: u16, version: u16) -> Vec<u8> {
    let mut buffer = header_bytes(1, 0, 0, 0, PAGE_TYPE_META, 0, 0, 0);
    buffer.extend_from_slice(&root_page.to_be_bytes());
    buffer.extend_from_slice(&(DEFAULT_PAGE_SIZE as u32).to_be_bytes());
    buffer.extend_from_slice(&order.to_be_bytes());
    buffer.extend_from_slice(&version.to_be_bytes());
    buffer.resize(DEFAULT_PAGE_SIZE, 0);
    buffer
}

/// Build a full internal page image, padded to the default page size.
pub fn build_internal_page(
    page_id: PageId,
    keys: &[CompositeKey],
    children: &[PageId],
) -> Vec<u8> {
    let mut buffer = header_bytes(
        page_id,
        0,
        0,
        0,
        PAGE_TYPE_INTERNAL,
        keys.len() as u16,
        0,
        0,
    );
    for key in keys {
        buffer.extend_from_slice(&key.to_bytes());
    }
    for child in children {
        buffer.extend_from_slice(&child.to_be_bytes());
    }
    buffer.resize(DEFAULT_PAGE_SIZE, 0);
    buffer
}

/// Build a full leaf page image, padded to the default page size.
pub fn build_leaf_page(
    page_id: PageId,
    prev: PageId,
    next: PageId,
    keys: &[CompositeKey],
    values: &[Record],
) -> Vec<u8> {
    let mut buffer = header_bytes(page_id, 0, prev, next, PAGE_TYPE_LEAF, keys.len() as u16, 0, 0);
    for key in keys {
        buffer.extend_from_slice(&key.to_bytes());
    }
    for value in values {
        buffer.extend_from_slice(&value.to_bytes());
    }
    buffer.resize(DEFAULT_PAGE_SIZE, 0);
    buffer
}
