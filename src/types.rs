#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vector2D {
    pub x: f64,
    pub y: f64,
}

impl Vector2D {
    pub fn new(x: f64, y: f64) -> Self {
        Vector2D { x, y }
    }

    pub fn add(&self, other: Vector2D) -> Self {
        Vector2D::new(self.x + other.x, self.y + other.y)
    }

    /// Axis-aligned proximity: both |dx| and |dy| must be strictly below `reach`.
    pub fn within_reach(&self, other: Vector2D, reach: f64) -> bool {
        (self.x - other.x).abs() < reach && (self.y - other.y).abs() < reach
    }
}

/// Clamps into `[0, max]`, collapsing to 0 when `max` is negative.
pub fn clamp_coordinate(value: f64, max: f64) -> f64 {
    value.min(max).max(0.0)
}
