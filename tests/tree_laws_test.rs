//! Change-tracking laws and diff-save scenarios, checked on in-memory
//! documents so failures point at the tree rather than a format adapter.

mod common;

use common::{populated_scene, scene, Mode, Pixel};
use paramtree::{Element, Field, Format, Node, COUNT, ITEM, KEY, VALUE};
use pretty_assertions::assert_eq;

fn scene_body(doc: &Node) -> &Node {
    doc.child("scene").expect("document root")
}

#[test]
fn test_default_tree_is_unchanged() {
    let tree = scene();
    assert!(!tree.changed());
    assert!(tree == scene());

    // Only the always-written properties appear in a diff of the defaults.
    let doc = tree.to_document(false);
    let body = scene_body(&doc);
    assert_eq!(body.entries().len(), 1);
    let render = body.child("render").unwrap();
    let names: Vec<_> = render.entries().iter().map(|(name, _)| name.as_str()).collect();
    assert_eq!(names, vec!["exposure", "label"]);
}

#[test]
fn test_group_diff_emits_only_changed_leaf() {
    let mut tree = scene();
    tree.entry.value.set(9);

    let diff = tree.entry.encode(false).unwrap();
    assert_eq!(diff, Node::map().with("value", Node::scalar("9")));

    let full = tree.entry.encode(true).unwrap();
    assert_eq!(
        full,
        Node::map()
            .with("name", Node::scalar("Name"))
            .with("value", Node::scalar("9"))
    );

    let doc = tree.to_document(false);
    assert_eq!(
        scene_body(&doc).child("entry"),
        Some(&Node::map().with("value", Node::scalar("9")))
    );
}

#[test]
fn test_sequence_diff_keeps_placeholders() {
    let mut tree = scene();
    tree.pixels.resize(2);
    tree.pixels[0].value.set(5);

    let doc = tree.to_document(false);
    assert_eq!(
        scene_body(&doc).child("pixels"),
        Some(&Node::Seq(vec![
            Node::map().with("value", Node::scalar("5")),
            Node::map(),
        ]))
    );
}

#[test]
fn test_collection_diff_keeps_read_created_entries() {
    let mut tree = scene();
    tree.layers.get_or_insert("new".to_string()).value.set(3);
    tree.layers.get_or_insert("old".to_string());

    let doc = tree.to_document(false);
    let item = |key: &str, value: Node| {
        Node::map()
            .with(KEY, Node::scalar(key))
            .with(VALUE, value)
    };
    assert_eq!(
        scene_body(&doc).child("layers"),
        Some(&Node::Seq(vec![
            item("new", Node::map().with("value", Node::scalar("3"))),
            item("old", Node::map()),
        ]))
    );
}

#[test]
fn test_counted_nodes_carry_their_count() {
    let tree = populated_scene();
    let doc = tree.to_document(false);
    let samples = scene_body(&doc).child("samples").unwrap();
    assert_eq!(samples.child(COUNT), Some(&Node::scalar("2")));
    assert_eq!(samples.children(ITEM).count(), 2);

    let weights = scene_body(&doc).child("weights").unwrap();
    assert_eq!(weights.child(COUNT), Some(&Node::scalar("2")));
}

#[test]
fn test_full_round_trip_in_memory() {
    let tree = populated_scene();
    let mut loaded = scene();
    loaded.load_document(&tree.to_document(true)).unwrap();
    assert!(loaded == tree);
    assert_eq!(*loaded.render.mode.get(), Mode::Accurate);
}

#[test]
fn test_diff_round_trip_in_memory() {
    let mut tree = scene();
    tree.render.gamma.set(1.0);
    tree.pixels.resize(1);

    let doc = tree.to_document(false);
    assert!(scene_body(&doc).child("verbose").is_none());

    let mut loaded = scene();
    loaded.load_document(&doc).unwrap();
    assert!(loaded == tree);
    assert_eq!(*loaded.render.width.get(), 640);
}

#[test]
fn test_clamp_law() {
    let mut tree = scene();
    tree.render.width.set(1024);
    assert!(!tree.render.width.set(0));
    assert_eq!(*tree.render.width.get(), 640);

    tree.render.width.set(1024);
    tree.load_str(
        Format::Xml,
        "<scene><render><width>9000</width></render></scene>",
    )
    .unwrap();
    assert_eq!(*tree.render.width.get(), 640);
}

#[test]
fn test_read_creates_law() {
    let mut tree = scene();
    assert_eq!(tree.layers.len(), 0);
    let created = tree.layers.get_or_insert("fresh".to_string()).clone();
    assert_eq!(tree.layers.len(), 1);
    assert!(created.equal(&Pixel::default()));
    assert!(tree.changed());
}

#[test]
fn test_counted_mismatch_law() {
    let mut tree = scene();
    tree.verbose.set(true);
    tree.entry.value.set(7);

    let text = "<scene>\
                  <entry><value>1</value></entry>\
                  <samples><count>3</count><item>1</item></samples>\
                  <verbose>false</verbose>\
                </scene>";
    let err = tree.load_str(Format::Xml, text).unwrap_err();
    assert_eq!(err.code(), "COUNT_MISMATCH");
    assert!(*tree.verbose.get());
    assert_eq!(*tree.entry.value.get(), 7);
    assert!(tree.samples.is_empty());
}

#[test]
fn test_shape_error_leaves_tree_unchanged() {
    let mut tree = populated_scene();
    let before = tree.clone();
    let err = tree
        .load_str(Format::Yaml, "scene:\n  verbose: false\n  pixels: not-a-list\n")
        .unwrap_err();
    assert_eq!(err.code(), "SHAPE");
    assert!(tree == before);
}

#[test]
fn test_assign_copies_every_node() {
    let source = populated_scene();
    let mut target = scene();
    assert!(target != source);
    target.assign(&source);
    assert!(target == source);
    assert_eq!(target.layers.len(), 2);

    target.reset();
    assert!(!target.changed());
}
