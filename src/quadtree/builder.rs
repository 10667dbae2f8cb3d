use tracing::debug;

use crate::error::{QuadTreeError, Result};
use crate::quadtree::index::QuadTree;
use crate::quadtree::node::Node;
use crate::quadtree::rect::Rect;
use crate::r#type::IndexableNum;

/// The default depth used by [`QuadTreeBuilder::new`]
pub const DEFAULT_QUADTREE_DEPTH: usize = 4;

/// The largest depth accepted by [`QuadTreeBuilder::finish`].
///
/// The whole tree is allocated up front, a tree of depth `d` holds `(4^(d+1) - 1) / 3` nodes.
pub const MAX_DEPTH: usize = 10;

/// A builder to create a [`QuadTree`].
///
/// ```
/// use quadtree_index::quadtree::QuadTreeBuilder;
///
/// let tree = QuadTreeBuilder::<f64>::new(100., 100.)
///     .with_depth(3)
///     .finish::<&str>()
///     .unwrap();
/// assert_eq!(tree.depth(), 3);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct QuadTreeBuilder<N: IndexableNum> {
    width: N,
    height: N,
    depth: usize,
}

impl<N: IndexableNum> QuadTreeBuilder<N> {
    /// Create a new builder for a plane of the given size anchored at the origin, with the
    /// default depth.
    pub fn new(width: N, height: N) -> Self {
        Self {
            width,
            height,
            depth: DEFAULT_QUADTREE_DEPTH,
        }
    }

    /// Set the number of split levels below the root. Depth 0 makes the root a leaf.
    pub fn with_depth(mut self, depth: usize) -> Self {
        self.depth = depth;
        self
    }

    /// Allocate every node of the tree.
    pub fn finish<T>(self) -> Result<QuadTree<N, T>> {
        // negated so that NaN is rejected too
        if !(self.width > N::zero() && self.height > N::zero()) {
            return Err(QuadTreeError::InvalidDimensions {
                width: format!("{:?}", self.width),
                height: format!("{:?}", self.height),
            });
        }

        if self.depth > MAX_DEPTH {
            return Err(QuadTreeError::DepthTooLarge {
                depth: self.depth,
                max: MAX_DEPTH,
            });
        }

        let mut root = Node::new(Rect::from_xywh(
            N::zero(),
            N::zero(),
            self.width,
            self.height,
        ));
        root.grow(self.depth, 1);

        debug!(
            width = ?self.width,
            height = ?self.height,
            depth = self.depth,
            "built quadtree"
        );

        Ok(QuadTree::from_root(root, self.depth))
    }
}
