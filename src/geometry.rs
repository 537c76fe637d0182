use geo::{Area, BooleanOps, BoundingRect, MultiPolygon, Rect, Simplify, Validation};
use tracing::warn;

use crate::types::ClipBox;

/// Everything here works on `MultiPolygon` so boolean results never need
/// re-wrapping.
pub type Shape = MultiPolygon<f64>;

pub fn empty() -> Shape {
    MultiPolygon::new(vec![])
}

pub fn is_empty(shape: &Shape) -> bool {
    shape.0.is_empty() || area(shape) <= 0.0
}

/// Planar area in square degrees.
pub fn area(shape: &Shape) -> f64 {
    shape.unsigned_area()
}

pub fn bounds(shape: &Shape) -> Option<Rect<f64>> {
    shape.bounding_rect()
}

/// Axis-aligned box as a shape, `min_lon, min_lat, max_lon, max_lat`.
pub fn bbox(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> Shape {
    ClipBox::new(min_lon, min_lat, max_lon, max_lat).to_multi_polygon()
}

/// Validity repair: runs the shape through the overlay engine on its own,
/// which splits self-intersections, fixes ring orientation and drops
/// zero-area rings.
pub fn repair(shape: &Shape) -> Shape {
    if shape.0.is_empty() {
        return empty();
    }
    shape.union(&empty())
}

/// Repairs only when the shape fails validation. Valid shapes keep their ring
/// start points, which Douglas-Peucker anchors on.
fn validated(shape: Shape) -> Shape {
    if shape.is_valid() {
        shape
    } else {
        repair(&shape)
    }
}

pub fn union_all<'a>(shapes: impl IntoIterator<Item = &'a Shape>) -> Shape {
    let merged = shapes
        .into_iter()
        .filter(|s| !s.0.is_empty())
        .fold(empty(), |acc, s| acc.union(s));
    repair(&merged)
}

pub fn intersection(a: &Shape, b: &Shape) -> Shape {
    repair(&a.intersection(b))
}

pub fn difference(a: &Shape, b: &Shape) -> Shape {
    repair(&a.difference(b))
}

const MAX_SIMPLIFY_PASSES: usize = 8;

/// Douglas-Peucker on every ring, repairing whenever collapsed rings end up
/// crossing. Passes repeat until the vertex count settles, so simplifying the
/// result again at the same tolerance changes nothing.
pub fn simplify(shape: &Shape, tolerance: f64) -> Shape {
    let mut current = validated(shape.clone());
    if tolerance <= 0.0 {
        return current;
    }
    for _ in 0..MAX_SIMPLIFY_PASSES {
        let next = validated(current.simplify(&tolerance));
        if vertex_count(&next) == vertex_count(&current) {
            return next;
        }
        current = next;
    }
    current
}

pub fn clip(shape: &Shape, clip_box: &ClipBox) -> Shape {
    intersection(shape, &clip_box.to_multi_polygon())
}

/// Simplify, optionally clip, and drop the result if nothing is left.
pub fn simplify_and_clip(
    label: &str,
    shape: &Shape,
    tolerance: f64,
    clip_box: Option<&ClipBox>,
) -> Option<Shape> {
    let simplified = simplify(shape, tolerance);
    let result = match clip_box {
        Some(b) => clip(&simplified, b),
        None => simplified,
    };
    if is_empty(&result) {
        warn!(entity = label, tolerance, "geometry is empty after simplify/clip, skipping");
        return None;
    }
    Some(result)
}

pub fn vertex_count(shape: &Shape) -> usize {
    shape
        .0
        .iter()
        .map(|p| p.exterior().0.len() + p.interiors().iter().map(|r| r.0.len()).sum::<usize>())
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{LineString, Polygon};
    use proptest::prelude::*;
    use std::f64::consts::TAU;

    fn inside(clip_box: &ClipBox, rect: &Rect<f64>) -> bool {
        let eps = 1e-6;
        rect.min().x >= clip_box.min_lon - eps
            && rect.min().y >= clip_box.min_lat - eps
            && rect.max().x <= clip_box.max_lon + eps
            && rect.max().y <= clip_box.max_lat + eps
    }

    /// Star-shaped ring around `(cx, cy)`: one vertex per radius, evenly
    /// spaced in angle, so the ring never crosses itself.
    fn star(cx: f64, cy: f64, radii: &[f64]) -> Shape {
        let n = radii.len() as f64;
        let mut coords: Vec<(f64, f64)> = radii
            .iter()
            .enumerate()
            .map(|(i, r)| {
                let t = TAU * i as f64 / n;
                (cx + r * t.cos(), cy + r * t.sin())
            })
            .collect();
        coords.push(coords[0]);
        MultiPolygon::new(vec![Polygon::new(ring(&coords), vec![])])
    }

    fn ring(coords: &[(f64, f64)]) -> LineString<f64> {
        LineString::from(coords.to_vec())
    }

    /// Square with a wiggly top edge; the wiggles sit well under 0.01 deg.
    fn jittered_square() -> Shape {
        let mut top: Vec<(f64, f64)> = (0..=20)
            .map(|i| {
                let x = 10.0 - i as f64 * 0.5;
                let y = 10.0 + if i % 2 == 0 { 0.0 } else { 0.002 };
                (x, y)
            })
            .collect();
        let mut coords = vec![(0.0, 0.0), (10.0, 0.0)];
        coords.append(&mut top);
        coords.push((0.0, 0.0));
        MultiPolygon::new(vec![Polygon::new(ring(&coords), vec![])])
    }

    #[test]
    fn repair_splits_bowtie() {
        let bowtie = Polygon::new(
            ring(&[(0.0, 0.0), (2.0, 2.0), (2.0, 0.0), (0.0, 2.0), (0.0, 0.0)]),
            vec![],
        );
        assert!(!MultiPolygon::new(vec![bowtie.clone()]).is_valid());
        let repaired = repair(&MultiPolygon::new(vec![bowtie]));
        assert!(!repaired.0.is_empty());
        assert!(repaired.is_valid());
        assert!((area(&repaired) - 2.0).abs() < 1e-4);
    }

    #[test]
    fn repair_of_empty_is_empty() {
        assert!(repair(&empty()).0.is_empty());
        assert!(is_empty(&empty()));
    }

    #[test]
    fn union_and_difference_of_boxes() {
        let a = bbox(0.0, 0.0, 2.0, 2.0);
        let b = bbox(1.0, 0.0, 3.0, 2.0);
        assert!((area(&union_all([&a, &b])) - 6.0).abs() < 1e-4);
        assert!((area(&difference(&a, &b)) - 2.0).abs() < 1e-4);
        assert!((area(&intersection(&a, &b)) - 2.0).abs() < 1e-4);
    }

    #[test]
    fn disjoint_intersection_is_empty() {
        let a = bbox(0.0, 0.0, 1.0, 1.0);
        let b = bbox(5.0, 5.0, 6.0, 6.0);
        assert!(is_empty(&intersection(&a, &b)));
    }

    #[test]
    fn simplify_drops_small_wiggles() {
        let shape = jittered_square();
        let simplified = simplify(&shape, 0.01);
        assert!(vertex_count(&simplified) < vertex_count(&shape));
        assert!((area(&simplified) - area(&shape)).abs() < 0.05);
        assert!(simplified.is_valid());
    }

    #[test]
    fn valid_shape_keeps_its_ring_start() {
        let shape = jittered_square();
        let simplified = simplify(&shape, 0.01);
        assert_eq!(simplified.0[0].exterior().0[0], shape.0[0].exterior().0[0]);
    }

    #[test]
    fn simplify_repairs_self_intersections() {
        let bowtie = MultiPolygon::new(vec![Polygon::new(
            ring(&[(0.0, 0.0), (2.0, 2.0), (2.0, 0.0), (0.0, 2.0), (0.0, 0.0)]),
            vec![],
        )]);
        let simplified = simplify(&bowtie, 0.01);
        assert!(simplified.is_valid());
        assert!((area(&simplified) - 2.0).abs() < 1e-4);
    }

    #[test]
    fn simplify_is_idempotent() {
        let once = simplify(&jittered_square(), 0.01);
        let twice = simplify(&once, 0.01);
        assert_eq!(vertex_count(&once), vertex_count(&twice));
        assert!((area(&once) - area(&twice)).abs() < 1e-6);
    }

    #[test]
    fn clip_outside_box_is_dropped() {
        let far = bbox(100.0, 60.0, 110.0, 70.0);
        let clip_box = ClipBox::new(44.0, 28.0, 92.0, 57.0);
        assert!(simplify_and_clip("far", &far, 0.04, Some(&clip_box)).is_none());
    }

    #[test]
    fn clip_keeps_inner_part() {
        let straddling = bbox(80.0, 50.0, 100.0, 60.0);
        let clip_box = ClipBox::new(44.0, 28.0, 92.0, 57.0);
        let clipped = simplify_and_clip("straddle", &straddling, 0.0, Some(&clip_box)).unwrap();
        assert!(clipped.is_valid());
        assert!((area(&clipped) - 12.0 * 7.0).abs() < 1e-3);
        let rect = bounds(&clipped).unwrap();
        assert!((rect.min().x - 80.0).abs() < 1e-6 && (rect.min().y - 50.0).abs() < 1e-6);
        assert!(inside(&clip_box, &rect));
    }

    proptest! {
        #[test]
        fn clipped_shape_stays_inside_box(
            x in -20.0f64..20.0, y in -20.0f64..20.0,
            w in 0.5f64..30.0, h in 0.5f64..30.0,
        ) {
            let shape = bbox(x, y, x + w, y + h);
            let clip_box = ClipBox::new(-5.0, -5.0, 5.0, 5.0);
            let clipped = clip(&shape, &clip_box);
            prop_assert!(clipped.is_valid());
            if let Some(rect) = bounds(&clipped) {
                prop_assert!(inside(&clip_box, &rect));
            }
        }

        #[test]
        fn simplify_twice_matches_once(
            cx in -50.0f64..50.0, cy in -50.0f64..50.0,
            radii in prop::collection::vec(0.5f64..1.5, 40),
            tolerance in prop::sample::select(vec![0.015, 0.04, 0.1]),
        ) {
            let shape = star(cx, cy, &radii);
            let once = simplify(&shape, tolerance);
            let twice = simplify(&once, tolerance);
            prop_assert!(once.is_valid());
            prop_assert!(vertex_count(&once) <= vertex_count(&shape));
            prop_assert_eq!(vertex_count(&once), vertex_count(&twice));
            prop_assert!((area(&once) - area(&twice)).abs() < 1e-9 * area(&once).max(1.0));
        }
    }
}
