use std::ops::ControlFlow;

use geo_traits::RectTrait;
use tracing::{debug, trace};

use crate::error::Result;
use crate::quadtree::builder::QuadTreeBuilder;
use crate::quadtree::node::{Item, Node};
use crate::quadtree::rect::Rect;
use crate::r#type::IndexableNum;

/// A fixed-shape region quadtree over the plane `(0, 0)`-`(width, height)`.
///
/// Every node is allocated when the tree is built and the shape never changes afterwards.
/// Each inserted rectangle is stored at the deepest node whose region fully contains it.
///
/// The tree is not internally synchronized. Mutation requires `&mut self`.
///
/// ```
/// use quadtree_index::quadtree::QuadTree;
///
/// let mut tree = QuadTree::new(100., 100., 4).unwrap();
/// assert!(tree.add(10., 10., 5., 5., "a"));
/// assert!(tree.add(40., 10., 4., 4., "b"));
/// assert!(!tree.add(98., 98., 5., 5., "out of bounds"));
///
/// assert_eq!(tree.get(9., 9., 2., 2.), Some(&"a"));
/// assert!(tree.move_item(41., 11., 60., 60.));
/// assert_eq!(tree.size(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct QuadTree<N: IndexableNum, T> {
    root: Node<N, T>,
    depth: usize,
}

impl<N: IndexableNum, T> QuadTree<N, T> {
    /// Create an empty tree covering `(0, 0)`-`(width, height)` with `depth` split levels.
    ///
    /// Fails if `width` or `height` is not strictly positive, or if `depth` exceeds
    /// [`MAX_DEPTH`](crate::quadtree::MAX_DEPTH).
    pub fn new(width: N, height: N, depth: usize) -> Result<Self> {
        QuadTreeBuilder::new(width, height)
            .with_depth(depth)
            .finish()
    }

    pub(crate) fn from_root(root: Node<N, T>, depth: usize) -> Self {
        Self { root, depth }
    }

    /// Access the root node of the tree for manual traversal.
    pub fn root(&self) -> &Node<N, T> {
        &self.root
    }

    /// The total area covered by this tree.
    pub fn bounds(&self) -> &Rect<N> {
        self.root.region()
    }

    /// The number of split levels below the root.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// The number of items stored in the tree.
    ///
    /// This walks every node on each call.
    pub fn size(&self) -> usize {
        self.root.size()
    }

    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Add a rectangle with its top-left corner at `(x, y)`.
    ///
    /// Returns `false`, without modifying the tree, if the rectangle is not fully inside
    /// [`QuadTree::bounds`] or if `w` or `h` is negative.
    pub fn add(&mut self, x: N, y: N, w: N, h: N, value: T) -> bool {
        // negated so that NaN is rejected too
        if !(w >= N::zero() && h >= N::zero()) {
            trace!(w = ?w, h = ?h, "rejected rectangle with negative size");
            return false;
        }

        let Some(rect) = Rect::checked_from_xywh(x, y, w, h) else {
            trace!(x = ?x, y = ?y, w = ?w, h = ?h, "rectangle far corner overflows");
            return false;
        };

        self.insert(rect, value)
    }

    /// Add any [`RectTrait`] implementation, such as a `geo::Rect`.
    pub fn add_rect(&mut self, rect: &impl RectTrait<T = N>, value: T) -> bool {
        let rect = Rect::from_rect_trait(rect);
        if rect.is_inverted() {
            trace!(rect = ?rect, "rejected inverted rectangle");
            return false;
        }

        self.insert(rect, value)
    }

    fn insert(&mut self, rect: Rect<N>, value: T) -> bool {
        match self.root.insert(rect, value) {
            Ok(()) => true,
            Err(rejected) => {
                trace!(rect = ?rejected.rect(), "rectangle outside of tree bounds");
                false
            }
        }
    }

    /// Returns the first item found overlapping the given region.
    ///
    /// The region is clipped to the tree bounds first. This is a "find any" lookup: the
    /// result is whichever overlapping item the traversal reaches first, not the best match.
    pub fn get(&self, x: N, y: N, w: N, h: N) -> Option<&T> {
        let area = self.clipped(x, y, w, h);

        let mut found = None;
        let _ = self.root.search(&area, &mut |item| {
            found = Some(item.value());
            ControlFlow::Break(())
        });

        found
    }

    /// Remove the first item whose rectangle contains `(x, y)`. Returns `true` on success.
    pub fn del(&mut self, x: N, y: N) -> bool {
        self.remove(x, y).is_some()
    }

    /// Remove the first item whose rectangle contains `(x, y)` and return it.
    ///
    /// Items stored higher up in the tree are found before items in deeper nodes. Only one
    /// item is removed even if several cover the point.
    pub fn remove(&mut self, x: N, y: N) -> Option<(Rect<N>, T)> {
        self.root.delete_at_point(x, y).map(Item::into_parts)
    }

    /// Move the item covering `(x, y)` so that its top-left corner lands on `(new_x, new_y)`.
    ///
    /// Returns `false` if no item covers `(x, y)`, or if the moved rectangle would leave the
    /// tree bounds. In the latter case the item stays at its original position.
    pub fn move_item(&mut self, x: N, y: N, new_x: N, new_y: N) -> bool {
        let Some(item) = self.root.delete_at_point(x, y) else {
            return false;
        };

        let (rect, value) = item.into_parts();
        let moved = match Rect::checked_from_xywh(new_x, new_y, rect.width(), rect.height()) {
            Some(target) => self.root.insert(target, value),
            None => Err(Item::new(rect, value)),
        };

        match moved {
            Ok(()) => true,
            Err(rejected) => {
                debug!(
                    from = ?rect,
                    to = ?(new_x, new_y),
                    "move target out of bounds, restoring item"
                );
                let (_, value) = rejected.into_parts();
                // was stored at this exact rect a moment ago
                let restored = self.root.insert(rect, value);
                debug_assert!(restored.is_ok());
                false
            }
        }
    }

    /// Visit every item overlapping the given region, clipped to the tree bounds.
    pub fn for_each<'a>(
        &'a self,
        x: N,
        y: N,
        w: N,
        h: N,
        mut visit: impl FnMut(&'a Rect<N>, &'a T),
    ) {
        let area = self.clipped(x, y, w, h);

        let _ = self.root.search(&area, &mut |item| {
            visit(item.rect(), item.value());
            ControlFlow::Continue(())
        });
    }

    /// Visit items overlapping the given region until `visit` returns
    /// [`ControlFlow::Break`].
    ///
    /// Returns `Break` if the walk was cut short.
    pub fn search<'a>(
        &'a self,
        x: N,
        y: N,
        w: N,
        h: N,
        mut visit: impl FnMut(&'a Rect<N>, &'a T) -> ControlFlow<()>,
    ) -> ControlFlow<()> {
        let area = self.clipped(x, y, w, h);
        self.root
            .search(&area, &mut |item| visit(item.rect(), item.value()))
    }

    /// Collect the values of all items overlapping the given region.
    pub fn search_values(&self, x: N, y: N, w: N, h: N) -> Vec<&T> {
        let mut results = vec![];
        self.for_each(x, y, w, h, |_, value| results.push(value));
        results
    }

    /// Visit up to `k` items whose center lies within `distance` of `(x, y)`.
    ///
    /// Candidates come from the padded, clipped envelope around the point and are visited in
    /// tree order, **not** sorted by distance. The result is therefore "k items within
    /// `distance`", which callers needing the true nearest `k` have to sort themselves.
    /// Nothing is visited when `k == 0` or `distance` is negative.
    pub fn k_nearest<'a>(
        &'a self,
        x: N,
        y: N,
        distance: N,
        k: usize,
        mut visit: impl FnMut(&'a Rect<N>, &'a T),
    ) {
        if k == 0 || !(distance >= N::zero()) {
            return;
        }

        let area = Rect::from_point(x, y).pad(distance).clip(self.bounds());
        let max_distance = to_f64(distance);
        let (px, py) = (to_f64(x), to_f64(y));

        let mut found = 0;
        let _ = self.root.search(&area, &mut |item| {
            let (cx, cy) = item.rect().center();
            if dist_2d(px, py, to_f64(cx), to_f64(cy)) <= max_distance {
                visit(item.rect(), item.value());
                found += 1;
            }

            if found < k {
                ControlFlow::Continue(())
            } else {
                ControlFlow::Break(())
            }
        });
    }

    /// Collect the values visited by [`QuadTree::k_nearest`].
    pub fn nearest_values(&self, x: N, y: N, distance: N, k: usize) -> Vec<&T> {
        let mut results = vec![];
        self.k_nearest(x, y, distance, k, |_, value| results.push(value));
        results
    }

    fn clipped(&self, x: N, y: N, w: N, h: N) -> Rect<N> {
        Rect::from_xywh(x, y, w, h).clip(self.bounds())
    }
}

// Every IndexableNum converts to f64.
#[inline]
fn to_f64<N: IndexableNum>(n: N) -> f64 {
    n.to_f64().unwrap_or(f64::NAN)
}

#[inline]
fn dist_2d(x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    let dx = x2 - x1;
    let dy = y2 - y1;
    (dx * dx + dy * dy).sqrt()
}
