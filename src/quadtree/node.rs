//! The recursive node tree backing a [`QuadTree`](crate::quadtree::QuadTree).
//!
//! The shape of the tree is fixed by a single [`Node::grow`] pass at construction. Afterwards
//! only the item lists of individual nodes change.

use std::ops::ControlFlow;

use crate::quadtree::rect::Rect;
use crate::r#type::IndexableNum;

/// Number of children of every non-leaf node.
pub const CHILD_COUNT: usize = 4;

/// A stored `(rectangle, value)` pair.
#[derive(Debug, Clone, PartialEq)]
pub struct Item<N: IndexableNum, T> {
    rect: Rect<N>,
    value: T,
}

impl<N: IndexableNum, T> Item<N, T> {
    pub(crate) fn new(rect: Rect<N>, value: T) -> Self {
        Self { rect, value }
    }

    /// The spatial footprint of this item.
    pub fn rect(&self) -> &Rect<N> {
        &self.rect
    }

    /// The caller-supplied payload.
    pub fn value(&self) -> &T {
        &self.value
    }

    /// Consume the item, returning its footprint and payload.
    pub fn into_parts(self) -> (Rect<N>, T) {
        (self.rect, self.value)
    }
}

/// One region of space at one depth level.
///
/// A node is either a leaf or has exactly four children whose regions are the quadrants of
/// its own region (see [`Rect::split`]). Items stored directly on a node fit inside its
/// region but inside none of its children.
///
/// Item storage is unordered: removal swaps the last item into the freed slot.
#[derive(Debug, Clone)]
pub struct Node<N: IndexableNum, T> {
    region: Rect<N>,
    items: Vec<Item<N, T>>,
    children: Option<Box<[Node<N, T>; CHILD_COUNT]>>,
}

impl<N: IndexableNum, T> Node<N, T> {
    /// Create a childless node over `region`.
    pub(crate) fn new(region: Rect<N>) -> Self {
        Self {
            region,
            items: Vec::new(),
            children: None,
        }
    }

    /// Recursively split this node until `current_depth` exceeds `max_depth`.
    pub(crate) fn grow(&mut self, max_depth: usize, current_depth: usize) {
        if current_depth > max_depth {
            return;
        }

        let mut children = Box::new(self.region.split().map(Node::new));
        for child in children.iter_mut() {
            child.grow(max_depth, current_depth + 1);
        }
        self.children = Some(children);
    }

    /// The region this node is responsible for.
    pub fn region(&self) -> &Rect<N> {
        &self.region
    }

    /// Items stored directly at this node, in no particular order.
    pub fn items(&self) -> &[Item<N, T>] {
        &self.items
    }

    /// The four children, ordered upper-left, upper-right, lower-left, lower-right. `None` for
    /// a leaf.
    pub fn children(&self) -> Option<&[Node<N, T>; CHILD_COUNT]> {
        self.children.as_deref()
    }

    /// Returns `true` if this is a leaf node without children.
    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    /// Number of split levels below this node.
    pub fn depth(&self) -> usize {
        match &self.children {
            // all subtrees have the same shape
            Some(children) => 1 + children[0].depth(),
            None => 0,
        }
    }

    /// Number of nodes in this subtree, including this one.
    pub fn node_count(&self) -> usize {
        1 + self
            .children
            .iter()
            .flat_map(|children| children.iter())
            .map(Node::node_count)
            .sum::<usize>()
    }

    /// Store `value` at the deepest node whose region fully contains `rect`.
    ///
    /// Children are tried in index order and the first one containing `rect` wins. The item
    /// is handed back if `rect` is not inside this node's region.
    pub(crate) fn insert(&mut self, rect: Rect<N>, value: T) -> Result<(), Item<N, T>> {
        if !self.region.contains_rect(&rect) {
            return Err(Item::new(rect, value));
        }

        if let Some(children) = self.children.as_mut() {
            if let Some(child) = children
                .iter_mut()
                .find(|child| child.region.contains_rect(&rect))
            {
                return child.insert(rect, value);
            }
        }

        self.items.push(Item::new(rect, value));
        Ok(())
    }

    /// Visit every item overlapping `query` until `visit` breaks.
    ///
    /// Children entirely covered by `query` are walked with [`Node::for_each`] without further
    /// overlap tests.
    pub(crate) fn search<'a, F>(&'a self, query: &Rect<N>, visit: &mut F) -> ControlFlow<()>
    where
        F: FnMut(&'a Item<N, T>) -> ControlFlow<()>,
    {
        if !self.region.overlaps(query) {
            return ControlFlow::Continue(());
        }

        for item in self.items.iter().filter(|item| item.rect.overlaps(query)) {
            visit(item)?;
        }

        if let Some(children) = &self.children {
            for child in children.iter() {
                if query.contains_rect(&child.region) {
                    child.for_each(visit)?;
                } else if child.region.overlaps(query) {
                    child.search(query, visit)?;
                }
            }
        }

        ControlFlow::Continue(())
    }

    /// Depth-first walk over all items: this node's items first, then each child in index
    /// order. A break anywhere ends the whole walk.
    pub(crate) fn for_each<'a, F>(&'a self, visit: &mut F) -> ControlFlow<()>
    where
        F: FnMut(&'a Item<N, T>) -> ControlFlow<()>,
    {
        for item in &self.items {
            visit(item)?;
        }

        if let Some(children) = &self.children {
            for child in children.iter() {
                child.for_each(visit)?;
            }
        }

        ControlFlow::Continue(())
    }

    /// Total number of items in this subtree.
    pub fn size(&self) -> usize {
        self.items.len()
            + self
                .children
                .iter()
                .flat_map(|children| children.iter())
                .map(Node::size)
                .sum::<usize>()
    }

    /// Remove the first item whose rectangle contains `(x, y)`.
    ///
    /// Local items are scanned before any child, and children in index order. At most one
    /// item is removed.
    pub(crate) fn delete_at_point(&mut self, x: N, y: N) -> Option<Item<N, T>> {
        if !self.region.contains_point(x, y) {
            return None;
        }

        if let Some(pos) = self
            .items
            .iter()
            .position(|item| item.rect.contains_point(x, y))
        {
            return Some(self.items.swap_remove(pos));
        }

        self.children
            .as_mut()?
            .iter_mut()
            .find_map(|child| child.delete_at_point(x, y))
    }
}

#[cfg(test)]
mod test {
    use std::ops::ControlFlow;

    use super::*;

    const NODE_TEST_DEPTH: usize = 4;

    fn r(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Rect<f64> {
        Rect::new(min_x, min_y, max_x, max_y)
    }

    fn grown(region: Rect<f64>, depth: usize) -> Node<f64, i32> {
        let mut node = Node::new(region);
        node.grow(depth, 0);
        node
    }

    #[test]
    fn test_grow_shape() {
        let node = grown(r(0., 0., 80., 80.), 1);

        assert_eq!(node.depth(), 2);
        assert_eq!(node.node_count(), 1 + 4 + 16);

        let children = node.children().unwrap();
        assert_eq!(children[0].region(), &r(0., 0., 40., 40.));
        assert_eq!(children[3].region(), &r(40., 40., 80., 80.));
        assert!(children[3].children().unwrap()[0].is_leaf());
    }

    #[test]
    fn test_insert_search() {
        let mut node = grown(r(0., 0., 80., 80.), NODE_TEST_DEPTH);
        assert_eq!(node.size(), 0);

        node.insert(r(1., 1., 5., 5.), 1).unwrap();
        node.insert(r(20., 23., 25., 28.), 2).unwrap();
        node.insert(r(30., 31., 35., 55.), 3).unwrap();
        node.insert(r(36., 32., 39., 58.), 4).unwrap();
        assert_eq!(node.size(), 4);

        let mut found = 0;
        let _ = node.search(&r(29., 30., 40., 60.), &mut |item| {
            assert!(
                matches!(item.value(), 3 | 4),
                "wrong value found: {}",
                item.value()
            );
            found += 1;
            if found < 2 {
                ControlFlow::Continue(())
            } else {
                ControlFlow::Break(())
            }
        });
        assert_eq!(found, 2);

        let mut seen = vec![];
        let _ = node.search(&r(18., 18., 30., 30.), &mut |item| {
            seen.push(*item.value());
            ControlFlow::Break(())
        });
        assert_eq!(seen, vec![2]);
    }

    #[test]
    fn test_insert_out_of_bounds() {
        let mut node = grown(r(10., 10., 80., 80.), NODE_TEST_DEPTH);

        let rejected = node.insert(r(1., 1., 5., 5.), 1).unwrap_err();
        assert_eq!(rejected.into_parts(), (r(1., 1., 5., 5.), 1));
        assert!(node.insert(r(120., 23., 125., 28.), 2).is_err());
        assert_eq!(node.size(), 0);

        let result = node.search(&r(90., 10., 100., 5.), &mut |item| {
            panic!("found out-of-bound: {}", item.value())
        });
        assert_eq!(result, ControlFlow::Continue(()));
    }

    #[test]
    fn test_insert_stores_at_deepest_containing_node() {
        let mut node = grown(r(0., 0., 80., 80.), 1);

        node.insert(r(1., 1., 5., 5.), 1).unwrap();
        node.insert(r(35., 35., 45., 45.), 2).unwrap();
        node.insert(r(30., 1., 35., 5.), 3).unwrap();

        let children = node.children().unwrap();
        let upper_left = &children[0];

        assert_eq!(node.items().len(), 1);
        assert_eq!(*node.items()[0].value(), 2);
        assert_eq!(*upper_left.children().unwrap()[0].items()[0].value(), 1);
        // (30, 1)-(35, 5) sits in the upper-left quadrant's upper-right child
        assert_eq!(*upper_left.children().unwrap()[1].items()[0].value(), 3);
        assert!(upper_left.items().is_empty());
    }

    #[test]
    fn test_search_break_stops_sibling_subtrees() {
        let mut node = grown(r(0., 0., 80., 80.), 2);

        node.insert(r(1., 1., 2., 2.), 1).unwrap();
        node.insert(r(50., 1., 51., 2.), 2).unwrap();

        // overlaps, but does not cover, both upper children
        let mut visits = 0;
        let result = node.search(&r(0., 0., 60., 10.), &mut |_| {
            visits += 1;
            ControlFlow::Break(())
        });

        assert_eq!(visits, 1);
        assert_eq!(result, ControlFlow::Break(()));
    }

    #[test]
    fn test_for_each_order_and_break() {
        let mut node = grown(r(0., 0., 80., 80.), 1);

        node.insert(r(50., 50., 51., 51.), 4).unwrap();
        node.insert(r(1., 1., 2., 2.), 2).unwrap();
        node.insert(r(30., 30., 50., 50.), 1).unwrap();
        node.insert(r(41., 1., 42., 2.), 3).unwrap();

        let mut all = vec![];
        let _ = node.for_each(&mut |item| {
            all.push(*item.value());
            ControlFlow::Continue(())
        });
        assert_eq!(all, vec![1, 2, 3, 4]);

        let mut first_two = vec![];
        let result = node.for_each(&mut |item| {
            first_two.push(*item.value());
            if first_two.len() == 2 {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        });
        assert_eq!(first_two, vec![1, 2]);
        assert_eq!(result, ControlFlow::Break(()));
    }

    #[test]
    fn test_delete_at_point() {
        let mut node = grown(r(0., 0., 80., 80.), NODE_TEST_DEPTH / 2);

        node.insert(r(1., 1., 5., 5.), 1).unwrap();
        node.insert(r(20., 23., 25., 28.), 2).unwrap();
        node.insert(r(30., 31., 35., 55.), 3).unwrap();
        node.insert(r(26., 26., 28., 28.), 4).unwrap();

        assert!(node.delete_at_point(100., 100.).is_none());
        assert_eq!(node.size(), 4);

        assert!(node.delete_at_point(70., 70.).is_none());
        assert_eq!(node.size(), 4);

        let deleted = node.delete_at_point(21., 24.).unwrap();
        assert_eq!(*deleted.value(), 2);
        assert_eq!(node.size(), 3);

        let _ = node.search(&r(18., 18., 30., 30.), &mut |item| {
            assert_ne!(*item.value(), 2, "2 still exists");
            ControlFlow::Continue(())
        });

        assert_eq!(*node.delete_at_point(32., 42.).unwrap().value(), 3);
        assert_eq!(node.size(), 2);

        let _ = node.search(&r(31., 32., 31., 32.), &mut |item| {
            assert_ne!(*item.value(), 3, "3 still exists");
            ControlFlow::Continue(())
        });
    }

    #[test]
    fn test_delete_prefers_local_items_and_removes_one() {
        let mut node = grown(r(0., 0., 80., 80.), 1);

        // spans quadrants, stored at the root
        node.insert(r(30., 30., 50., 50.), 1).unwrap();
        // inside the upper-left quadrant
        node.insert(r(32., 32., 38., 38.), 2).unwrap();
        node.insert(r(33., 33., 37., 37.), 3).unwrap();

        assert_eq!(*node.delete_at_point(35., 35.).unwrap().value(), 1);
        assert_eq!(node.size(), 2);

        let next = node.delete_at_point(35., 35.).unwrap();
        assert!(matches!(next.value(), 2 | 3));
        assert_eq!(node.size(), 1);
    }
}
