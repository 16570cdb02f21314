use poptop::core::system_monitor::{layout, LayoutNode, LayoutOptions, Orientation};
use poptop::PoptopError;

fn depth<T>(node: &LayoutNode<T>) -> usize {
    match node {
        LayoutNode::Leaf(_) => 0,
        LayoutNode::Split { first, second, .. } => 1 + depth(first).max(depth(second)),
    }
}

#[test]
fn test_every_widget_placed_once_in_order() {
    for count in 1..=12 {
        let widgets: Vec<usize> = (0..count).collect();
        let tree = layout(&widgets, LayoutOptions::default()).unwrap();
        let leaves: Vec<usize> = tree.leaves().into_iter().copied().collect();
        assert_eq!(leaves, widgets);
    }
}

#[test]
fn test_tree_is_balanced() {
    let widgets: Vec<usize> = (0..8).collect();
    let tree = layout(&widgets, LayoutOptions::default()).unwrap();
    assert_eq!(depth(&tree), 3);
}

#[test]
fn test_side_by_side_root() {
    let options = LayoutOptions {
        orientation: Orientation::SideBySide,
        tile: false,
    };
    let tree = layout(&["load", "cpu"], options).unwrap();
    assert!(matches!(
        tree,
        LayoutNode::Split {
            orientation: Orientation::SideBySide,
            ..
        }
    ));
}

#[test]
fn test_empty_layout_is_an_error() {
    let widgets: Vec<u8> = Vec::new();
    assert!(matches!(
        layout(&widgets, LayoutOptions::default()),
        Err(PoptopError::NoWidgets)
    ));
}
