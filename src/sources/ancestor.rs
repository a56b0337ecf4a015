//! Bounded-depth ancestor search
//!
//! Catalogue cards put their category label next to, not inside, the anchor we
//! extract from. Deciding whether an anchor belongs to a labelled card means
//! climbing a few levels and checking each ancestor for the label.

use scraper::ElementRef;

/// Minimal view of a tree node needed for the search
pub trait TreeNode: Sized {
    fn parent_node(&self) -> Option<Self>;

    /// Whether this node itself carries the marker text
    fn contains_marker(&self, marker: &str) -> bool;

    /// Whether the marker appears anywhere inside this node
    ///
    /// Only asked of the starting node; ancestors use [`contains_marker`](Self::contains_marker).
    fn contains_marker_within(&self, marker: &str) -> bool {
        self.contains_marker(marker)
    }
}

/// Returns true if `node` or one of its first `max_depth` ancestors contains `marker`
///
/// Depth 0 is the node itself, searched in full; the search never climbs past
/// `max_depth`.
pub fn has_marker_within<N: TreeNode>(node: &N, marker: &str, max_depth: usize) -> bool {
    if node.contains_marker_within(marker) {
        return true;
    }

    let mut current = node.parent_node();
    let mut depth = 1;

    while let Some(ancestor) = current {
        if depth > max_depth {
            break;
        }
        if ancestor.contains_marker(marker) {
            return true;
        }
        current = ancestor.parent_node();
        depth += 1;
    }

    false
}

impl<'a> TreeNode for ElementRef<'a> {
    fn parent_node(&self) -> Option<Self> {
        self.parent().and_then(ElementRef::wrap)
    }

    /// Looks for a `<p>` child whose text includes the marker
    ///
    /// Only direct children count, so climbing to a list container does not
    /// pick up the labels of neighbouring cards.
    fn contains_marker(&self, marker: &str) -> bool {
        self.children()
            .filter_map(ElementRef::wrap)
            .filter(|element| element.value().name() == "p")
            .any(|p| p.text().collect::<String>().contains(marker))
    }

    /// Looks for a `<p>` anywhere below this element
    fn contains_marker_within(&self, marker: &str) -> bool {
        self.descendants()
            .filter_map(ElementRef::wrap)
            .filter(|element| element.value().name() == "p")
            .any(|p| p.text().collect::<String>().contains(marker))
    }
}
