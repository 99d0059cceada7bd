use teropong::render::text::render_text;
use teropong::storage::scanner::scan_file;
use teropong::types::record::{CompositeKey, Record};
use teropong::types::value::Value;
use teropong::utils::mock::{self, TempDbFile};

fn int_key(i: i64) -> CompositeKey {
    CompositeKey::new(vec![Value::Integer(i)])
}

#[test]
fn test_empty_tree_placeholder() {
    let db = TempDbFile::new("render_empty");
    db.write_slots(&[mock::build_meta_page(0, 4, 1)]).unwrap();

    let outcome = scan_file(&db.path).unwrap();
    let rendered = render_text(&outcome);

    assert!(rendered.contains("(Empty tree)"));
    assert!(rendered.contains("Meta: root=0 order=4 page_size=4096 version=1"));
}

#[test]
fn test_small_tree_rendering() {
    let db = TempDbFile::new("render_small");
    let slots = vec![
        mock::build_meta_page(2, 4, 1),
        mock::build_internal_page(2, &[int_key(10)], &[3, 4]),
        mock::build_leaf_page(
            3,
            0,
            4,
            &[int_key(5)],
            &[Record::new(vec![
                Value::Integer(5),
                Value::Text("alice".to_string()),
            ])],
        ),
        mock::build_leaf_page(
            4,
            3,
            0,
            &[int_key(20)],
            &[Record::new(vec![
                Value::Integer(20),
                Value::Text("bob".to_string()),
            ])],
        ),
    ];
    db.write_slots(&slots).unwrap();

    let outcome = scan_file(&db.path).unwrap();
    let rendered = render_text(&outcome);

    assert!(rendered.contains("[I 2] keys [(10)] children=[3, 4]"));
    assert!(rendered.contains("[L 3] keys [(5)] values [{5, alice}]"));
    assert!(rendered.contains("[L 4] keys [(20)] values [{20, bob}]"));
    // The last child hangs off the closing connector
    assert!(rendered.contains("`-- [L 4]"));
    assert!(rendered.contains("+-- [L 3]"));
}

#[test]
fn test_unresolvable_children_are_skipped() {
    let db = TempDbFile::new("render_missing_child");
    let slots = vec![
        mock::build_meta_page(2, 4, 1),
        mock::build_internal_page(2, &[int_key(10)], &[3, 0]),
        mock::build_leaf_page(
            3,
            0,
            0,
            &[int_key(5)],
            &[Record::new(vec![Value::Integer(5)])],
        ),
    ];
    db.write_slots(&slots).unwrap();

    let outcome = scan_file(&db.path).unwrap();
    let rendered = render_text(&outcome);

    // Best-effort view: the readable subtree renders, the sentinel does not
    assert!(rendered.contains("[I 2] keys [(10)] children=[3, 0]"));
    assert!(rendered.contains("[L 3]"));
}
