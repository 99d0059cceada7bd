use std::{
    collections::HashMap,
    fs::File,
    io::{Read, Seek, SeekFrom},
    path::Path,
};

use tracing::{debug, warn};

use crate::types::{
    DEFAULT_PAGE_SIZE, PageId,
    error::{DecodeError, Result},
    page::Page,
};

/// Mapping from slot-derived page id to decoded page. A slot that failed to
/// decode is simply absent; consumers must treat absence as "unreadable",
/// not as an empty page.
pub type PageIndex = HashMap<PageId, Page>;

#[derive(Debug)]
pub struct ScanOutcome {
    pub pages: PageIndex,
    /// Root id from the meta page. `None` means no readable meta page was
    /// found; `Some(0)` means the meta page reports an empty tree. The two
    /// must stay distinguishable.
    pub root: Option<PageId>,
    pub page_size: usize,
}

/// Scan a database file with the engine's default page size.
pub fn scan_file<P: AsRef<Path>>(path: P) -> Result<ScanOutcome> {
    scan_file_with_page_size(path, DEFAULT_PAGE_SIZE)
}

/// Scan every page slot in the file and assemble the page index.
///
/// One corrupt page never prevents inspection of the rest of the file: a
/// per-slot decode failure drops that slot and the scan continues. Failures
/// to open or read the file itself are fatal.
pub fn scan_file_with_page_size<P: AsRef<Path>>(path: P, page_size: usize) -> Result<ScanOutcome> {
    let mut file = File::open(path)?;
    let file_size = file.metadata()?.len();
    let num_slots = file_size / page_size as u64;

    let mut pages = PageIndex::new();
    let mut root = None;

    // Slot 1 holds the meta page by convention. Its root pointer is kept
    // raw so a zero root survives as the empty-tree signal.
    if num_slots >= 1 {
        match read_slot(&mut file, 1, page_size)? {
            Ok(page) => {
                if let Page::Meta(meta) = &page {
                    root = Some(meta.root_page);
                    if meta.page_size as usize != page_size {
                        warn!(
                            recorded = meta.page_size,
                            scanning = page_size,
                            "meta page records a different page size than the scan uses"
                        );
                    }
                }
                pages.insert(1, page);
            }
            Err(err) => debug!(slot = 1, %err, "dropping undecodable slot"),
        }
    }

    for slot in 2..=num_slots {
        match read_slot(&mut file, slot, page_size)? {
            Ok(page) => {
                if page.header().page_id != slot {
                    debug!(
                        slot,
                        header_id = page.header().page_id,
                        "header page id disagrees with slot"
                    );
                }
                pages.insert(slot, page);
            }
            Err(err) => debug!(slot, %err, "dropping undecodable slot"),
        }
    }

    Ok(ScanOutcome {
        pages,
        root,
        page_size,
    })
}

/// Read and decode one slot. The outer `Result` carries file-level I/O
/// failures (fatal to the scan); the inner one carries page-local decode
/// failures (dropped by the caller).
fn read_slot(
    file: &mut File,
    slot: PageId,
    page_size: usize,
) -> Result<std::result::Result<Page, DecodeError>> {
    let offset = (slot - 1) * page_size as u64;
    let mut buffer = vec![0u8; page_size];
    file.seek(SeekFrom::Start(offset))?;
    file.read_exact(&mut buffer)?;
    Ok(Page::from_bytes(&buffer))
}
