use serde::Deserialize;

/// Axis-aligned rectangle in content coordinates (scroll already applied
/// by the caller).
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    /// Normalized rectangle spanning two corners, so dragging up or left
    /// still produces non-negative extent.
    pub fn from_corners(ax: f64, ay: f64, bx: f64, by: f64) -> Self {
        Self {
            x: ax.min(bx),
            y: ay.min(by),
            w: (ax - bx).abs(),
            h: (ay - by).abs(),
        }
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.x + other.w
            && self.x + self.w > other.x
            && self.y < other.y + other.h
            && self.y + self.h > other.y
    }
}

#[cfg(test)]
mod tests {
    use super::Rect;

    #[test]
    fn from_corners_normalizes_any_drag_direction() {
        let down_right = Rect::from_corners(10.0, 10.0, 30.0, 50.0);
        let up_left = Rect::from_corners(30.0, 50.0, 10.0, 10.0);
        assert_eq!(down_right, up_left);
        assert!(down_right.w >= 0.0 && down_right.h >= 0.0);
    }

    #[test]
    fn touching_edges_do_not_intersect() {
        let a = Rect { x: 0.0, y: 0.0, w: 10.0, h: 10.0 };
        let b = Rect { x: 10.0, y: 0.0, w: 10.0, h: 10.0 };
        assert!(!a.intersects(&b));

        let overlapping = Rect { x: 9.0, y: 9.0, w: 5.0, h: 5.0 };
        assert!(a.intersects(&overlapping));
    }
}
