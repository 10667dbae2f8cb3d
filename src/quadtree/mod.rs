//! A fixed-shape region quadtree.
//!
//! The tree is split into quadrants down to a configured depth once, when it is built. Items
//! are `(rectangle, value)` pairs stored at the deepest node whose region fully contains the
//! rectangle.

mod builder;
mod index;
pub mod node;
pub mod rect;

pub use builder::{QuadTreeBuilder, DEFAULT_QUADTREE_DEPTH, MAX_DEPTH};
pub use index::QuadTree;
pub use node::{Item, Node};
pub use rect::Rect;
