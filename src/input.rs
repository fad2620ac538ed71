/// Zoom multiplier for one scroll notch towards the sphere
pub const SCROLL_ZOOM_IN: f64 = 0.9;

/// Turns pointer positions on the cell grid into touch-style gestures.
///
/// A left-button drag acts as a single finger and yields rotation deltas in
/// pixels. A right-button drag acts as the second finger of a pinch, with
/// the press point standing in for the finger that stays put.
#[derive(Debug, Clone)]
pub struct TouchTracker {
    previous: (f64, f64),
    anchor: Option<(f64, f64)>,
    distance: f64,
    cell_width: f64,
    cell_height: f64,
}

impl TouchTracker {
    /// `cell_pixels` is the width of one cell in pixels; cells are
    /// `cell_aspect` times as tall as they are wide.
    pub fn new(cell_pixels: f64, cell_aspect: f64) -> Self {
        TouchTracker {
            previous: (0.0, 0.0),
            anchor: None,
            distance: 0.0,
            cell_width: cell_pixels,
            cell_height: cell_pixels * cell_aspect,
        }
    }

    /// Pointer went down with the rotating button
    pub fn press(&mut self, x: f64, y: f64) {
        self.previous = (x, y);
    }

    /// Pointer went down with the pinching button
    pub fn press_pinch(&mut self, x: f64, y: f64) {
        self.previous = (x, y);
        self.anchor = Some((x, y));
        self.distance = 0.0;
    }

    /// One-finger move: returns the (dx, dy) since the previous position in
    /// pixels
    pub fn drag(&mut self, x: f64, y: f64) -> (f64, f64) {
        let dx = (x - self.previous.0) * self.cell_width;
        let dy = (y - self.previous.1) * self.cell_height;
        self.previous = (x, y);
        self.distance = 0.0;
        (dx, dy)
    }

    /// Two-finger move: returns the zoom multiplier, the ratio of the old
    /// finger distance to the new one. `None` when no pinch is in progress
    /// or the fingers meet.
    pub fn pinch(&mut self, x: f64, y: f64) -> Option<f64> {
        let (ax, ay) = self.anchor?;
        self.previous = (x, y);

        let fx = (x - ax) * self.cell_width;
        let fy = (y - ay) * self.cell_height;
        let new_distance = (fx * fx + fy * fy).sqrt();
        if new_distance == 0.0 {
            self.distance = 0.0;
            return None;
        }
        if self.distance == 0.0 {
            self.distance = new_distance;
        }
        let mult = self.distance / new_distance;
        self.distance = new_distance;
        Some(mult)
    }

    /// Zoom multiplier for one scroll notch
    pub fn scroll(&self, up: bool) -> f64 {
        if up {
            SCROLL_ZOOM_IN
        } else {
            1.0 / SCROLL_ZOOM_IN
        }
    }

    /// Forgets the pinch anchor and distance
    pub fn release(&mut self) {
        self.anchor = None;
        self.distance = 0.0;
    }

    /// Whether a pinch is in progress
    pub fn is_pinching(&self) -> bool {
        self.anchor.is_some()
    }
}
