//! End-to-end scenarios for the structure pipeline

use scenetree::parse;
use scenetree::prelude::*;

fn edges(db: &StructureDatabase) -> Vec<(NodeId, NodeId)> {
    db.edges().map(|e| (e.from, e.to)).collect()
}

#[test]
fn test_siblings_with_trailing_ellipsis() {
    let db = parse("scene", "Group\n Geode\n Geode*\n").unwrap();

    let ids: Vec<NodeId> = db.nodes().map(|n| n.id).collect();
    assert_eq!(
        ids,
        vec![
            NodeId::TITLE,
            NodeId::Real(1),
            NodeId::Real(2),
            NodeId::Real(3),
            NodeId::Ellipsis(3),
        ]
    );
    assert_eq!(
        edges(&db),
        vec![
            (NodeId::Real(0), NodeId::Real(1)),
            (NodeId::Real(1), NodeId::Real(2)),
            (NodeId::Real(1), NodeId::Real(3)),
            (NodeId::Real(1), NodeId::Ellipsis(3)),
        ]
    );
}

#[test]
fn test_top_level_siblings() {
    let db = parse("scene", "Group\nGroup\n").unwrap();
    assert_eq!(
        edges(&db),
        vec![
            (NodeId::TITLE, NodeId::Real(1)),
            (NodeId::TITLE, NodeId::Real(2)),
        ]
    );
}

#[test]
fn test_empty_input_is_title_only() {
    let db = parse("scene", "").unwrap();
    assert_eq!(db.node_count(), 1);
    assert_eq!(db.edge_count(), 0);
    let title = db.title().unwrap();
    assert_eq!(title.label, "scene");
    assert_eq!(title.fill_color, "white");
}

#[test]
fn test_unknown_type_is_configuration_error() {
    let err = parse("scene", "Sponge\n").unwrap_err();
    match err.downcast_ref::<DiagramError>() {
        Some(DiagramError::UnknownNodeType { node_type, line }) => {
            assert_eq!(node_type, "Sponge");
            assert_eq!(*line, 1);
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn test_multi_level_dedent_keeps_later_siblings() {
    let input = "Group\n Switch\n  LOD\n   Geode\n Switch\nGroup\n";
    let db = parse("scene", input).unwrap();
    assert_eq!(db.parent(NodeId::Real(5)), Some(NodeId::Real(1)));
    assert_eq!(db.parent(NodeId::Real(6)), Some(NodeId::TITLE));
    assert_eq!(db.record_count(), 6);
}

#[test]
fn test_depth_jump_rejected() {
    let err = parse("scene", "Group\n   Geode\n").unwrap_err();
    match err.downcast_ref::<DiagramError>() {
        Some(DiagramError::DepthJump { line, depth, .. }) => {
            assert_eq!(*line, 2);
            assert_eq!(*depth, 3);
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn test_tab_indentation_rejected() {
    let err = parse("scene", "Group\n\tGeode\n").unwrap_err();
    assert!(matches!(
        err.downcast_ref::<DiagramError>(),
        Some(DiagramError::InvalidIndentation { line: 2, ch: '\t' })
    ));
}

#[test]
fn test_blank_line_ends_structure() {
    let db = parse("scene", "Group\n\nSponge\n").unwrap();
    assert_eq!(db.record_count(), 1);
}

#[test]
fn test_annotations_in_labels() {
    let db = parse("scene", "PagedLOD: tile 3\n Geode*: crowd\n").unwrap();
    assert_eq!(db.get_node(NodeId::Real(1)).unwrap().label, "PagedLOD [tile 3]");
    assert_eq!(db.get_node(NodeId::Real(2)).unwrap().label, "Geode [crowd]");
    assert_eq!(db.get_node(NodeId::Ellipsis(2)).unwrap().label, "...");
}

#[test]
fn test_repeats_marker_at_line_end() {
    let db = parse("scene", "Group\n Geode: crowd*\n").unwrap();
    let geode = db.get_node(NodeId::Real(2)).unwrap();
    assert_eq!(geode.annotation.as_deref(), Some("crowd"));
    assert!(db.has_node(NodeId::Ellipsis(2)));
}

#[test]
fn test_reserved_root_type() {
    let err = parse("scene", "Group\n root\n").unwrap_err();
    assert!(matches!(
        err.downcast_ref::<DiagramError>(),
        Some(DiagramError::ReservedNodeType { line: 2 })
    ));
}

#[test]
fn test_trailing_whitespace_ignored() {
    let db = parse("scene", "Group   \n Geode\t\n").unwrap();
    assert_eq!(db.get_node(NodeId::Real(2)).unwrap().label, "Geode");
}
