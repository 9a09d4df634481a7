//! Rectangle helpers used by box selection, clamping and focus requests.
//!
//! Rects are [`kurbo::Rect`]; `x0`/`y0` is the minimum corner and
//! `x1`/`y1` the maximum corner.

use kurbo::{Point, Rect, Size};

/// Rect of the given size centered on `center`.
pub fn rect_from_center_size(center: Point, size: Size) -> Rect {
    Rect::from_center_size(center, size)
}

/// Center point of a rect.
pub fn rect_center(rect: Rect) -> Point {
    rect.center()
}

/// Smallest rect containing both inputs.
pub fn union_rect(a: Rect, b: Rect) -> Rect {
    Rect::new(a.x0.min(b.x0), a.y0.min(b.y0), a.x1.max(b.x1), a.y1.max(b.y1))
}

/// Grow a rect by `padding` on every side.
pub fn expand_rect(rect: Rect, padding: f64) -> Rect {
    Rect::new(
        rect.x0 - padding,
        rect.y0 - padding,
        rect.x1 + padding,
        rect.y1 + padding,
    )
}

pub fn rect_width(rect: Rect) -> f64 {
    rect.x1 - rect.x0
}

pub fn rect_height(rect: Rect) -> f64 {
    rect.y1 - rect.y0
}

/// Rect spanning two arbitrary corners, normalized so that min < max.
pub fn normalized_rect(a: Point, b: Point) -> Rect {
    Rect::new(a.x.min(b.x), a.y.min(b.y), a.x.max(b.x), a.y.max(b.y))
}

/// Union of all item rects.
///
/// Returns `None` for an empty iterator or when any coordinate of the result
/// is not finite.
pub fn compute_bounds_from_items<I>(items: I) -> Option<Rect>
where
    I: IntoIterator<Item = Rect>,
{
    let bounds = items.into_iter().reduce(union_rect)?;
    let finite = [bounds.x0, bounds.y0, bounds.x1, bounds.y1]
        .iter()
        .all(|v| v.is_finite());
    finite.then_some(bounds)
}

/// Inclusive partial-overlap test between a node rect and a selection box.
///
/// A node counts as inside as soon as it is not fully outside the box on any
/// axis; touching edges count.
pub fn is_node_in_selection_box(node: Rect, selection_box: Rect) -> bool {
    let sel = normalized_rect(
        Point::new(selection_box.x0, selection_box.y0),
        Point::new(selection_box.x1, selection_box.y1),
    );
    !(node.x1 < sel.x0 || node.x0 > sel.x1 || node.y1 < sel.y0 || node.y0 > sel.y1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_size_roundtrip() {
        let r = rect_from_center_size(Point::new(10.0, 20.0), Size::new(40.0, 10.0));
        assert_eq!(r, Rect::new(-10.0, 15.0, 30.0, 25.0));
        assert_eq!(rect_center(r), Point::new(10.0, 20.0));
        assert_eq!(rect_width(r), 40.0);
        assert_eq!(rect_height(r), 10.0);
    }

    #[test]
    fn test_union_and_expand() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(-5.0, 5.0, 3.0, 30.0);
        assert_eq!(union_rect(a, b), Rect::new(-5.0, 0.0, 10.0, 30.0));
        assert_eq!(expand_rect(a, 2.0), Rect::new(-2.0, -2.0, 12.0, 12.0));
    }

    #[test]
    fn test_bounds_from_items() {
        assert_eq!(compute_bounds_from_items(Vec::new()), None);

        let bounds = compute_bounds_from_items(vec![
            Rect::new(0.0, 0.0, 1.0, 1.0),
            Rect::new(5.0, -3.0, 6.0, 2.0),
        ]);
        assert_eq!(bounds, Some(Rect::new(0.0, -3.0, 6.0, 2.0)));

        let bad = compute_bounds_from_items(vec![
            Rect::new(0.0, 0.0, 1.0, 1.0),
            Rect::new(0.0, 0.0, f64::INFINITY, 1.0),
        ]);
        assert_eq!(bad, None);
    }

    #[test]
    fn test_box_overlap_is_inclusive() {
        let node = Rect::new(10.0, 10.0, 20.0, 20.0);
        assert!(is_node_in_selection_box(node, Rect::new(15.0, 15.0, 30.0, 30.0)));
        assert!(!is_node_in_selection_box(node, Rect::new(25.0, 15.0, 30.0, 30.0)));
        // Touching edge.
        assert!(is_node_in_selection_box(node, Rect::new(20.0, 20.0, 30.0, 30.0)));
        // Fully containing.
        assert!(is_node_in_selection_box(node, Rect::new(0.0, 0.0, 100.0, 100.0)));
    }

    #[test]
    fn test_box_overlap_accepts_unnormalized_box() {
        let node = Rect::new(10.0, 10.0, 20.0, 20.0);
        let dragged_up_left = Rect {
            x0: 30.0,
            y0: 30.0,
            x1: 15.0,
            y1: 15.0,
        };
        assert!(is_node_in_selection_box(node, dragged_up_left));
    }
}
