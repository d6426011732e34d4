//! Property-based tests for the k-d tree and the sorted multimap.

use proptest::prelude::*;

use assembly_geometry::{BoundingBox, Point3d};
use assembly_spatial::{KdTree, SortedMultiMap};

// ---------------------------------------------------------------------------
// Strategy helpers
// ---------------------------------------------------------------------------

/// Coordinates on a coarse integer lattice so that equal distances (ties)
/// are common.
fn arb_lattice_point() -> impl Strategy<Value = Point3d> {
    (-4i32..4, -4i32..4, -4i32..4).prop_map(|(x, y, z)| Point3d::new(x as f64, y as f64, z as f64))
}

fn arb_points() -> impl Strategy<Value = Vec<Point3d>> {
    prop::collection::vec(arb_lattice_point(), 0..60)
}

/// Reference answer: sort every index by (distance, insertion index).
fn brute_force_order(points: &[Point3d], q: &Point3d) -> Vec<usize> {
    let mut idx: Vec<usize> = (0..points.len()).collect();
    idx.sort_by(|&a, &b| {
        points[a]
            .distance_squared_to(q)
            .total_cmp(&points[b].distance_squared_to(q))
            .then(a.cmp(&b))
    });
    idx
}

// ---------------------------------------------------------------------------
// 1. knn returns exactly the k closest, ties by insertion order
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn knn_matches_brute_force(
        points in arb_points(),
        q in arb_lattice_point(),
        k in 0usize..12,
    ) {
        let tree = KdTree::new(points.iter().copied().enumerate().map(|(i, p)| (p, i)));
        let got: Vec<usize> = tree.knn(&q, k).iter().map(|n| *n.payload).collect();
        let mut expected = brute_force_order(&points, &q);
        expected.truncate(k);
        prop_assert_eq!(got, expected);
    }
}

// ---------------------------------------------------------------------------
// 2. radius returns every point within r, nearest first
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn radius_matches_brute_force(
        points in arb_points(),
        q in arb_lattice_point(),
        r in 0.0f64..5.0,
    ) {
        let tree = KdTree::new(points.iter().copied().enumerate().map(|(i, p)| (p, i)));
        let got: Vec<usize> = tree.radius(&q, r).iter().map(|n| *n.payload).collect();
        let expected: Vec<usize> = brute_force_order(&points, &q)
            .into_iter()
            .filter(|&i| points[i].distance_squared_to(&q) <= r * r)
            .collect();
        prop_assert_eq!(got, expected);
    }
}

// ---------------------------------------------------------------------------
// 3. range_aabb returns every contained point in insertion order
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn range_matches_brute_force(
        points in arb_points(),
        a in arb_lattice_point(),
        b in arb_lattice_point(),
    ) {
        let bbox = BoundingBox::from_points(&[a, b]);
        let tree = KdTree::new(points.iter().copied().enumerate().map(|(i, p)| (p, i)));
        let got: Vec<usize> = tree.range_aabb(&bbox).iter().map(|n| *n.payload).collect();
        let expected: Vec<usize> = (0..points.len()).filter(|&i| bbox.contains_point(&points[i])).collect();
        prop_assert_eq!(got, expected);
    }
}

// ---------------------------------------------------------------------------
// 4. trim_to_prefix keeps every value and groups by prefix
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn trim_preserves_values(
        entries in prop::collection::vec((prop::collection::vec(0i64..4, 0..4), 0u32..100), 0..40),
        n in 0usize..4,
    ) {
        let map: SortedMultiMap<i64, u32> = entries.iter().cloned().collect();
        let total = map.value_count();
        let trimmed = map.clone().trim_to_prefix(n);
        prop_assert_eq!(trimmed.value_count(), total);
        for key in trimmed.keys() {
            prop_assert!(key.len() <= n);
        }
        let flat_before: Vec<u32> = map.values().copied().collect();
        let flat_after: Vec<u32> = trimmed.values().copied().collect();
        let mut sorted_before = flat_before.clone();
        let mut sorted_after = flat_after.clone();
        sorted_before.sort_unstable();
        sorted_after.sort_unstable();
        prop_assert_eq!(sorted_before, sorted_after);
    }
}
