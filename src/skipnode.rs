use std::iter;
use std::ptr::NonNull;

// ////////////////////////////////////////////////////////////////////////////
// SkipNode
// ////////////////////////////////////////////////////////////////////////////

/// A forward link at one level of a node's tower.
///
/// `span` is the number of bottom-level positions the link advances:
/// one plus the count of bottom-level nodes strictly between the link's
/// owner and `forward`. A link with no successor carries the number of
/// entries remaining between its owner and the end of the list, which
/// keeps the splice arithmetic in the owning list exact without special
/// cases; links above the list's current level stay zeroed.
pub struct Link<T> {
    pub forward: Option<NonNull<SkipNode<T>>>,
    pub span: u64,
}

impl<T> Link<T> {
    /// A link with no successor and no reach.
    pub fn empty() -> Self {
        Link {
            forward: None,
            span: 0,
        }
    }
}

/// SkipNodes make up the skip list. The list owns the head node, a
/// sentinel whose tower spans every level; all other nodes are
/// heap-allocated and reached exclusively through forward links, so the
/// list frees them by walking level 0.
///
/// The height of a node is the number of links in its tower. Only the
/// head carries no item.
pub struct SkipNode<T> {
    // item is None for the head sentinel only.
    pub item: Option<T>,
    // Tower of forward links; the node appears on levels 0..links.len().
    pub links: Vec<Link<T>>,
}

// ///////////////////////////////////////////////
// Inherent methods
// ///////////////////////////////////////////////

impl<T> SkipNode<T> {
    /// Create a new head node spanning `total_levels` levels.
    pub fn head(total_levels: usize) -> Self {
        SkipNode {
            item: None,
            links: iter::repeat_with(Link::empty).take(total_levels).collect(),
        }
    }

    /// Create a new node with the given item and height. All links start
    /// empty and must be spliced in by the list.
    pub fn new(item: T, height: usize) -> Self {
        SkipNode {
            item: Some(item),
            links: iter::repeat_with(Link::empty).take(height).collect(),
        }
    }

    /// Consumes the node, returning the item it carried.
    pub fn into_inner(self) -> Option<T> {
        self.item
    }
}
