use super::*;
use crate::color;
use crate::scene::Ellipse;

fn drawable(id: &str, x: f64, y: f64, size: f64) -> Drawable {
    let center = Point::new(x, y);
    let body = Ellipse { center, width: size * 1.6, height: size, color: color::INFO };
    Drawable {
        event_id: id.to_owned(),
        center,
        size,
        color: color::INFO,
        body,
        head: body,
        distress: None,
    }
}

// =============================================================
// contains
// =============================================================

#[test]
fn contains_centre() {
    assert!(contains(&drawable("a", 100.0, 100.0, 24.0), Point::new(100.0, 100.0)));
}

#[test]
fn contains_uses_full_size_as_radius() {
    let d = drawable("a", 100.0, 100.0, 24.0);
    assert!(contains(&d, Point::new(123.9, 100.0)));
    assert!(contains(&d, Point::new(100.0, 76.5)));
}

#[test]
fn contains_excludes_boundary() {
    let d = drawable("a", 100.0, 100.0, 24.0);
    assert!(!contains(&d, Point::new(124.0, 100.0)));
}

#[test]
fn contains_excludes_far_points() {
    let d = drawable("a", 100.0, 100.0, 24.0);
    assert!(!contains(&d, Point::new(120.0, 120.0)));
}

// =============================================================
// hit_test
// =============================================================

#[test]
fn hit_test_empty_is_none() {
    assert!(hit_test(Point::new(0.0, 0.0), &[]).is_none());
}

#[test]
fn hit_test_single_match() {
    let ds = vec![drawable("a", 100.0, 100.0, 24.0), drawable("b", 400.0, 300.0, 30.0)];
    let hit = hit_test(Point::new(405.0, 310.0), &ds).expect("hit b");
    assert_eq!(hit.event_id, "b");
}

#[test]
fn hit_test_miss_everything() {
    let ds = vec![drawable("a", 100.0, 100.0, 24.0), drawable("b", 400.0, 300.0, 30.0)];
    assert!(hit_test(Point::new(250.0, 200.0), &ds).is_none());
}

#[test]
fn hit_test_overlap_prefers_first_in_render_order() {
    let ds = vec![drawable("newest", 100.0, 100.0, 30.0), drawable("older", 110.0, 100.0, 30.0)];
    let hit = hit_test(Point::new(108.0, 100.0), &ds).expect("overlap hit");
    assert_eq!(hit.event_id, "newest");

    let swapped = vec![ds[1].clone(), ds[0].clone()];
    let hit = hit_test(Point::new(108.0, 100.0), &swapped).expect("overlap hit");
    assert_eq!(hit.event_id, "older");
}

#[test]
fn hit_test_skips_earlier_non_matching() {
    let ds = vec![drawable("far", 700.0, 500.0, 24.0), drawable("near", 50.0, 50.0, 24.0)];
    let hit = hit_test(Point::new(55.0, 45.0), &ds).expect("hit near");
    assert_eq!(hit.event_id, "near");
}
