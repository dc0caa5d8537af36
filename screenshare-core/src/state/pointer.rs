//! Latest known cursor position.

/// An integer point in virtual-screen or monitor-local pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// `self - origin`, i.e. the point expressed relative to `origin`.
    pub const fn relative_to(self, origin: Point) -> Point {
        Point::new(self.x - origin.x, self.y - origin.y)
    }
}

/// Passive cache of the last pointer-move event. Last write wins.
#[derive(Debug, Clone, Copy, Default)]
pub struct PointerTracker {
    position: Option<Point>,
}

impl PointerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, x: i32, y: i32) {
        self.position = Some(Point::new(x, y));
    }

    /// `None` until the first move event arrives.
    pub fn position(&self) -> Option<Point> {
        self.position
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_until_first_move() {
        let tracker = PointerTracker::new();
        assert_eq!(tracker.position(), None);
    }

    #[test]
    fn last_write_wins() {
        let mut tracker = PointerTracker::new();
        tracker.update(10, 20);
        tracker.update(-5, 7);
        assert_eq!(tracker.position(), Some(Point::new(-5, 7)));
    }

    #[test]
    fn relative_to_origin() {
        let p = Point::new(2000, 150);
        assert_eq!(p.relative_to(Point::new(1920, 0)), Point::new(80, 150));
    }
}
