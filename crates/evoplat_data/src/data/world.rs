use serde::{Deserialize, Serialize};

/// A static, axis-aligned platform. `x`/`y` name its centre.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Landing on this platform wins the round for the agent.
    #[serde(default)]
    pub winning: bool,
}

impl Platform {
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
            winning: false,
        }
    }

    #[must_use]
    pub fn winning(mut self) -> Self {
        self.winning = true;
        self
    }

    #[must_use]
    pub fn top(&self) -> f64 {
        self.y + self.height / 2.0
    }

    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y - self.height / 2.0
    }

    /// Whether a body of `half_width` centred at `x` overlaps this platform
    /// horizontally. Touching edges do not count.
    #[must_use]
    pub fn overlaps_x(&self, x: f64, half_width: f64) -> bool {
        (x - self.x).abs() < self.width / 2.0 + half_width
    }

    /// Whether `foot` lies inside the vertical thickness band `(bottom, top]`.
    #[must_use]
    pub fn contains_foot(&self, foot: f64) -> bool {
        foot > self.bottom() && foot <= self.top()
    }
}
