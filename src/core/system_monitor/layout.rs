//! Balanced binary-split layout of dashboard panes.
//!
//! Widgets are placed into a tree of two-way splits built over a range of
//! indices rounded up to a power of two. For example, with five widgets the
//! ranges visited are:
//!
//! ```text
//! [0, 7] -> [0, 3] -> [0, 1], [2, 3]
//!        -> [4, 7] -> [4, 5]          ([6, 7] is empty and pruned)
//! ```

use crate::error::{PoptopError, Result};

/// Direction in which a split places its two children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    /// First child above the second.
    #[default]
    Stacked,
    /// First child left of the second.
    SideBySide,
}

impl Orientation {
    pub fn flipped(self) -> Self {
        match self {
            Orientation::Stacked => Orientation::SideBySide,
            Orientation::SideBySide => Orientation::Stacked,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LayoutOptions {
    pub orientation: Orientation,
    /// Alternate the orientation by depth to form a grid.
    pub tile: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutNode<T> {
    Leaf(T),
    Split {
        orientation: Orientation,
        first: Box<LayoutNode<T>>,
        second: Box<LayoutNode<T>>,
    },
}

impl<T> LayoutNode<T> {
    fn split(orientation: Orientation, first: LayoutNode<T>, second: LayoutNode<T>) -> Self {
        LayoutNode::Split {
            orientation,
            first: Box::new(first),
            second: Box::new(second),
        }
    }

    /// Leaves in left-to-right order.
    pub fn leaves(&self) -> Vec<&T> {
        let mut leaves = Vec::new();
        self.collect_leaves(&mut leaves);
        leaves
    }

    fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a T>) {
        match self {
            LayoutNode::Leaf(item) => out.push(item),
            LayoutNode::Split { first, second, .. } => {
                first.collect_leaves(out);
                second.collect_leaves(out);
            }
        }
    }
}

/// Arrange `widgets` into a tree of splits, preserving their order.
///
/// A single widget is returned as a bare leaf. An empty list is an error.
pub fn layout<T: Clone>(widgets: &[T], options: LayoutOptions) -> Result<LayoutNode<T>> {
    match widgets.len() {
        0 => Err(PoptopError::NoWidgets),
        1 => Ok(LayoutNode::Leaf(widgets[0].clone())),
        n => Ok(layout_range(
            widgets,
            0,
            n.next_power_of_two() - 1,
            options,
        )),
    }
}

fn orientation_for(start: usize, end: usize, options: LayoutOptions) -> Orientation {
    let exponent = (end - start + 1).trailing_zeros();
    if options.tile && exponent % 2 == 1 {
        options.orientation.flipped()
    } else {
        options.orientation
    }
}

// `start` is always below `widgets.len()`; callers prune empty ranges.
fn layout_range<T: Clone>(
    widgets: &[T],
    start: usize,
    end: usize,
    options: LayoutOptions,
) -> LayoutNode<T> {
    let orientation = orientation_for(start, end, options);

    if start + 1 == end {
        let first = LayoutNode::Leaf(widgets[start].clone());
        return match widgets.get(end) {
            Some(second) => LayoutNode::split(orientation, first, LayoutNode::Leaf(second.clone())),
            None => first,
        };
    }

    let mid = start + (end - start + 1) / 2 - 1;
    let first = layout_range(widgets, start, mid, options);

    if mid + 1 >= widgets.len() {
        return first;
    }

    let second = layout_range(widgets, mid + 1, end, options);
    LayoutNode::split(orientation, first, second)
}
