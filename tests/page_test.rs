use teropong::types::error::DecodeError;
use teropong::types::page::{
    PAGE_TYPE_INTERNAL, PAGE_TYPE_LEAF, Page, PageHeader,
};
use teropong::types::record::{CompositeKey, Record};
use teropong::types::value::Value;
use teropong::types::{DEFAULT_PAGE_SIZE, PAGE_HEADER_SIZE};
use teropong::utils::mock;

fn key(values: Vec<Value>) -> CompositeKey {
    CompositeKey::new(values)
}

#[test]
fn test_header_decode() {
    let bytes = mock::header_bytes(7, 2, 6, 8, PAGE_TYPE_LEAF, 3, 1200, 99);
    let header = PageHeader::from_bytes(&bytes).unwrap();

    assert_eq!(header.page_id, 7);
    assert_eq!(header.parent_page, Some(2));
    assert_eq!(header.prev_page, Some(6));
    assert_eq!(header.next_page, Some(8));
    assert_eq!(header.page_type, PAGE_TYPE_LEAF);
    assert_eq!(header.key_count, 3);
    assert_eq!(header.free_space, 1200);
    assert_eq!(header.lsn, 99);
}

#[test]
fn test_header_zero_ids_mean_no_link() {
    let bytes = mock::header_bytes(1, 0, 0, 0, PAGE_TYPE_LEAF, 0, 0, 0);
    let header = PageHeader::from_bytes(&bytes).unwrap();

    assert_eq!(header.parent_page, None);
    assert_eq!(header.prev_page, None);
    assert_eq!(header.next_page, None);
}

#[test]
fn test_header_requires_exactly_49_bytes() {
    let bytes = mock::header_bytes(1, 0, 0, 0, PAGE_TYPE_LEAF, 0, 0, 0);
    assert_eq!(bytes.len(), PAGE_HEADER_SIZE);

    let result = PageHeader::from_bytes(&bytes[..PAGE_HEADER_SIZE - 1]);
    assert!(matches!(
        result,
        Err(DecodeError::TruncatedHeader {
            expected: 49,
            actual: 48
        })
    ));
}

#[test]
fn test_header_does_not_validate_page_type() {
    // Tag validation is deferred to body dispatch so an unknown tag stays
    // distinguishable from a truncated header
    let bytes = mock::header_bytes(1, 0, 0, 0, 42, 0, 0, 0);
    let header = PageHeader::from_bytes(&bytes).unwrap();
    assert_eq!(header.page_type, 42);
}

#[test]
fn test_meta_page_decode() {
    let bytes = mock::build_meta_page(2, 4, 1);
    let page = Page::from_bytes(&bytes).unwrap();

    match page {
        Page::Meta(meta) => {
            assert_eq!(meta.header.page_id, 1);
            assert_eq!(meta.root_page, 2);
            assert_eq!(meta.page_size, DEFAULT_PAGE_SIZE as u32);
            assert_eq!(meta.order, 4);
            assert_eq!(meta.version, 1);
        }
        other => panic!("expected meta page, got {:?}", other),
    }
}

#[test]
fn test_internal_page_decode() {
    let keys = vec![key(vec![Value::Integer(10)]), key(vec![Value::Integer(20)])];
    let children = vec![3, 4, 5];
    let bytes = mock::build_internal_page(2, &keys, &children);
    let page = Page::from_bytes(&bytes).unwrap();

    match page {
        Page::Internal(internal) => {
            assert_eq!(internal.keys, keys);
            assert_eq!(internal.children, children);
            assert_eq!(internal.children.len(), internal.keys.len() + 1);
        }
        other => panic!("expected internal page, got {:?}", other),
    }
}

#[test]
fn test_internal_page_with_too_few_children_fails_decode() {
    // key_count = 1 demands 2 children; supply only 1 and stop the buffer
    // there, so the decode must fail instead of yielding a malformed page
    let keys = vec![key(vec![Value::Integer(10)])];
    let mut bytes = mock::header_bytes(2, 0, 0, 0, PAGE_TYPE_INTERNAL, 1, 0, 0);
    bytes.extend_from_slice(&keys[0].to_bytes());
    bytes.extend_from_slice(&3u64.to_be_bytes());

    let result = Page::from_bytes(&bytes);
    match result {
        Err(DecodeError::CorruptedPage { page_id, source }) => {
            assert_eq!(page_id, 2);
            assert!(matches!(*source, DecodeError::TruncatedBuffer { .. }));
        }
        other => panic!("expected wrapped truncation, got {:?}", other),
    }
}

#[test]
fn test_leaf_page_decode() {
    // Single key/value pair, no sibling links
    let keys = vec![key(vec![Value::Text("alice".to_string())])];
    let values = vec![Record::new(vec![
        Value::Integer(30),
        Value::Text("alice".to_string()),
    ])];
    let bytes = mock::build_leaf_page(2, 0, 0, &keys, &values);
    let page = Page::from_bytes(&bytes).unwrap();

    match page {
        Page::Leaf(leaf) => {
            assert_eq!(leaf.keys.len(), 1);
            assert_eq!(leaf.values.len(), 1);
            assert_eq!(leaf.keys, keys);
            assert_eq!(leaf.values, values);
            assert_eq!(leaf.header.prev_page, None);
            assert_eq!(leaf.header.next_page, None);
        }
        other => panic!("expected leaf page, got {:?}", other),
    }
}

#[test]
fn test_leaf_keys_and_values_stay_aligned() {
    let keys: Vec<CompositeKey> = (0..5).map(|i| key(vec![Value::Integer(i)])).collect();
    let values: Vec<Record> = (0..5)
        .map(|i| Record::new(vec![Value::Integer(i), Value::Boolean(i % 2 == 0)]))
        .collect();
    let bytes = mock::build_leaf_page(4, 3, 5, &keys, &values);

    match Page::from_bytes(&bytes).unwrap() {
        Page::Leaf(leaf) => {
            assert_eq!(leaf.keys.len(), leaf.values.len());
            assert_eq!(leaf.header.prev_page, Some(3));
            assert_eq!(leaf.header.next_page, Some(5));
        }
        other => panic!("expected leaf page, got {:?}", other),
    }
}

#[test]
fn test_unknown_page_type_carries_tag_and_page_id() {
    let mut bytes = mock::header_bytes(9, 0, 0, 0, 7, 0, 0, 0);
    bytes.resize(DEFAULT_PAGE_SIZE, 0);

    let result = Page::from_bytes(&bytes);
    assert!(matches!(
        result,
        Err(DecodeError::UnknownPageType { tag: 7, page_id: 9 })
    ));
}

#[test]
fn test_trailing_slot_bytes_are_never_interpreted() {
    let keys = vec![key(vec![Value::Integer(1)])];
    let values = vec![Record::new(vec![Value::Integer(1)])];
    let mut bytes = mock::build_leaf_page(2, 0, 0, &keys, &values);

    // Stamp garbage over the unused tail of the slot
    let tail = bytes.len() - 64;
    for byte in &mut bytes[tail..] {
        *byte = 0xFF;
    }

    let page = Page::from_bytes(&bytes).unwrap();
    assert!(matches!(page, Page::Leaf(_)));
}

#[test]
fn test_corrupt_key_is_wrapped_with_owning_page() {
    // One key declared, but its first value carries an unknown tag
    let mut bytes = mock::header_bytes(5, 0, 0, 0, PAGE_TYPE_LEAF, 1, 0, 0);
    bytes.extend_from_slice(&1u32.to_be_bytes());
    bytes.push(250);
    bytes.resize(DEFAULT_PAGE_SIZE, 0);

    // The slot is full length, so the failure is the tag, not truncation
    match Page::from_bytes(&bytes) {
        Err(DecodeError::CorruptedPage { page_id, source }) => {
            assert_eq!(page_id, 5);
            assert!(matches!(*source, DecodeError::UnknownTag(250)));
        }
        other => panic!("expected wrapped unknown tag, got {:?}", other),
    }
}
