//! Interactive region-of-interest selection.
//!
//! ```text
//!   Idle ──primary down──▶ Dragging ──primary up──▶ Committed
//!    ▲                        │                        │
//!    └──── secondary up / Esc ┴────────────────────────┘
//! ```
//!
//! Points are stored in virtual-screen coordinates exactly as the input
//! collaborator reports them. Bounds are derived on demand, relative to
//! whichever monitor is being captured.

use crate::state::pointer::Point;

/// Minimum width and height of a derived region, in pixels.
pub const MIN_REGION_SIZE: i32 = 10;

/// A fixed `width:height` ratio applied while dragging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AspectRatio {
    pub width: i32,
    pub height: i32,
}

impl AspectRatio {
    /// Shift-drag.
    pub const WIDE: AspectRatio = AspectRatio::new(16, 9);
    /// Alt-drag.
    pub const STANDARD: AspectRatio = AspectRatio::new(4, 3);

    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

/// Reshape `p2` so the rectangle `p1..p2` has exactly `ratio`.
///
/// The largest `k * ratio` rectangle that fits inside the dragged one is
/// kept. The signs of the drag direction are preserved and `p1` never
/// moves. A degenerate drag (zero width or height) is returned as is.
pub fn aspect_clip(p1: Point, p2: Point, ratio: AspectRatio) -> Point {
    let dx = p2.x - p1.x;
    let dy = p2.y - p1.y;
    let w = dx.abs();
    let h = dy.abs();
    if w == 0 || h == 0 || ratio.width <= 0 || ratio.height <= 0 {
        return p2;
    }

    // w/h < wa/ha, kept in integers.
    let k = if (w as i64) * (ratio.height as i64) < (h as i64) * (ratio.width as i64) {
        w / ratio.width
    } else {
        h / ratio.height
    };

    Point::new(
        p1.x + dx.signum() * k * ratio.width,
        p1.y + dy.signum() * k * ratio.height,
    )
}

/// An axis-aligned rectangle, `xmin..xmax` by `ymin..ymax`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub xmin: i32,
    pub ymin: i32,
    pub xmax: i32,
    pub ymax: i32,
}

impl Bounds {
    /// Clamp both points to non-negative coordinates and widen to the
    /// minimum size.
    pub fn from_corners(p1: Point, p2: Point) -> Self {
        let xmin = p1.x.min(p2.x).max(0);
        let ymin = p1.y.min(p2.y).max(0);
        let mut xmax = p1.x.max(p2.x).max(0);
        let mut ymax = p1.y.max(p2.y).max(0);

        if xmax - xmin < MIN_REGION_SIZE {
            xmax = xmin + MIN_REGION_SIZE;
        }
        if ymax - ymin < MIN_REGION_SIZE {
            ymax = ymin + MIN_REGION_SIZE;
        }

        Self {
            xmin,
            ymin,
            xmax,
            ymax,
        }
    }

    pub fn width(&self) -> i32 {
        self.xmax - self.xmin
    }

    pub fn height(&self) -> i32 {
        self.ymax - self.ymin
    }

    /// Intersection with a `width x height` frame anchored at the origin.
    /// `None` when nothing overlaps.
    pub fn clamp_to(&self, width: u32, height: u32) -> Option<Bounds> {
        let fw = i32::try_from(width).unwrap_or(i32::MAX);
        let fh = i32::try_from(height).unwrap_or(i32::MAX);
        let clipped = Bounds {
            xmin: self.xmin.clamp(0, fw),
            ymin: self.ymin.clamp(0, fh),
            xmax: self.xmax.clamp(0, fw),
            ymax: self.ymax.clamp(0, fh),
        };
        (clipped.width() > 0 && clipped.height() > 0).then_some(clipped)
    }
}

/// Where the selector is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionPhase {
    Idle,
    Dragging,
    Committed,
}

/// Rectangle state machine.
///
/// Holds `p1 == None ⇒ p2 == None` and `dragging ⇒ p1.is_some()`.
#[derive(Debug, Clone, Default)]
pub struct RegionSelector {
    p1: Option<Point>,
    p2: Option<Point>,
    dragging: bool,
    aspect_lock: Option<AspectRatio>,
}

impl RegionSelector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> SelectionPhase {
        match (self.dragging, self.p2) {
            (true, _) => SelectionPhase::Dragging,
            (false, Some(_)) => SelectionPhase::Committed,
            (false, None) => SelectionPhase::Idle,
        }
    }

    pub fn anchor(&self) -> Option<Point> {
        self.p1
    }

    pub fn corner(&self) -> Option<Point> {
        self.p2
    }

    pub fn aspect_lock(&self) -> Option<AspectRatio> {
        self.aspect_lock
    }

    /// Start a new drag at `cursor`, discarding any previous region.
    pub fn begin(&mut self, cursor: Point, lock: Option<AspectRatio>) {
        self.p1 = Some(cursor);
        self.p2 = None;
        self.dragging = true;
        self.aspect_lock = lock;
    }

    /// Track the pointer while dragging. Ignored otherwise.
    pub fn drag_to(&mut self, cursor: Point) {
        if self.dragging {
            self.set_corner(cursor);
        }
    }

    /// Commit the drag at `cursor`. Ignored when not dragging.
    pub fn finish(&mut self, cursor: Point) {
        if self.dragging {
            self.set_corner(cursor);
            self.dragging = false;
        }
    }

    /// Drop the region entirely.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    fn set_corner(&mut self, cursor: Point) {
        let Some(p1) = self.p1 else {
            return;
        };
        self.p2 = Some(match self.aspect_lock {
            Some(ratio) => aspect_clip(p1, cursor, ratio),
            None => cursor,
        });
    }

    /// Bounds of the current rectangle (dragging or committed), with the
    /// points first expressed relative to `origin`.
    pub fn bounds_relative_to(&self, origin: Point) -> Option<Bounds> {
        let (p1, p2) = (self.p1?, self.p2?);
        Some(Bounds::from_corners(
            p1.relative_to(origin),
            p2.relative_to(origin),
        ))
    }

    /// Like [`bounds_relative_to`](Self::bounds_relative_to) but only
    /// once the drag has been committed.
    pub fn committed_bounds_relative_to(&self, origin: Point) -> Option<Bounds> {
        match self.phase() {
            SelectionPhase::Committed => self.bounds_relative_to(origin),
            _ => None,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────
