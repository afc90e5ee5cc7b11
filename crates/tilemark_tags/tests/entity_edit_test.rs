//! Integration tests for editing entity-shaped tag trees.

use tilemark_tags::{read_field, read_list, Tag, TagError, TagKind, TagPatch, TagPath};

fn entity(pos: &[f32], dimension: i32) -> Tag {
    Tag::compound()
        .with("identifier", Tag::String("minecraft:player".into()))
        .with("Pos", Tag::float_list(pos))
        .with("Rotation", Tag::float_list(&[90.0, 0.0]))
        .with("DimensionId", Tag::Int(dimension))
        .with(
            "Abilities",
            Tag::compound().with("flying", Tag::Byte(0)).with("walkSpeed", Tag::Float(0.1)),
        )
}

fn move_patch(x: f32, y: f32, z: f32, dimension: i32) -> TagPatch {
    TagPatch::new()
        .set("Pos[0]".parse().expect("path"), Tag::Float(x))
        .set("Pos[1]".parse().expect("path"), Tag::Float(y))
        .set("Pos[2]".parse().expect("path"), Tag::Float(z))
        .set("DimensionId".parse().expect("path"), Tag::Int(dimension))
}

#[test]
fn test_move_entity() {
    let mut tree = entity(&[0.0, 64.0, 0.0], 0);
    move_patch(10.5, 20.5, 30.5, 1).apply(&mut tree).expect("valid move");

    let pos = read_list(&tree, &TagPath::root().key("Pos"), 3, TagKind::Float).expect("pos");
    let pos: Vec<f32> = pos.iter().filter_map(Tag::as_float).collect();
    assert_eq!(pos, vec![10.5, 20.5, 30.5]);

    let dim = read_field(&tree, &TagPath::root().key("DimensionId"), TagKind::Int).expect("dim");
    assert_eq!(dim.as_int(), Some(1));
}

#[test]
fn test_short_position_list_is_rejected() {
    let mut tree = entity(&[0.0, 64.0], 0);
    let before = tree.clone();

    let err = move_patch(1.0, 2.0, 3.0, 0).apply(&mut tree).unwrap_err();
    assert!(matches!(err, TagError::IndexOutOfRange { len: 2, .. }));
    assert_eq!(tree, before);
}

#[test]
fn test_nested_compound_edit() {
    let mut tree = entity(&[0.0, 0.0, 0.0], 0);
    let path: TagPath = "Abilities.flying".parse().expect("path");

    let undo = TagPatch::new().set(path.clone(), Tag::Byte(1)).apply(&mut tree).expect("flying");
    assert_eq!(read_field(&tree, &path, TagKind::Byte), Ok(&Tag::Byte(1)));

    undo.apply(&mut tree).expect("undo");
    assert_eq!(read_field(&tree, &path, TagKind::Byte), Ok(&Tag::Byte(0)));
}

#[test]
fn test_error_messages_name_the_path() {
    let tree = entity(&[0.0, 0.0, 0.0], 0);
    let err = read_field(&tree, &"Abilities.mayfly".parse().expect("path"), TagKind::Byte)
        .unwrap_err();
    assert_eq!(err.to_string(), "missing field: Abilities.mayfly");
}
