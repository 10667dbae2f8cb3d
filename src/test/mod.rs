use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::quadtree::Rect;

pub(crate) const TEST_SIDE: f64 = 1000.0;
pub(crate) const TEST_MAX_ITEM_SIDE: f64 = 10.0;

pub(crate) fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(0xdeadbeef)
}

/// A random rectangle fully inside `(0, 0)`-`(TEST_SIDE, TEST_SIDE)`.
pub(crate) fn random_rect(rng: &mut impl Rng) -> Rect<f64> {
    let max_pos = TEST_SIDE - TEST_MAX_ITEM_SIDE;
    let x = rng.gen_range(1.0..max_pos - 1.0);
    let y = rng.gen_range(1.0..max_pos - 1.0);
    let w = rng.gen_range(1.0..TEST_MAX_ITEM_SIDE);
    let h = rng.gen_range(1.0..TEST_MAX_ITEM_SIDE);
    Rect::from_xywh(x, y, w, h)
}

pub(crate) fn random_point(rng: &mut impl Rng) -> (f64, f64) {
    (
        rng.gen_range(0.0..TEST_SIDE),
        rng.gen_range(0.0..TEST_SIDE),
    )
}
