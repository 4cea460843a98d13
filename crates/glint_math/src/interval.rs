/// A numeric range `[min, max]` used for ray parameter bounds.
///
/// `min <= max` is expected but not enforced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub min: f32,
    pub max: f32,
}

impl Interval {
    /// Create a new interval given min and max values.
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Returns true if x is strictly within the interval (min, max) (exclusive).
    ///
    /// Hit testing relies on the exclusive lower bound: a bounce ray queried
    /// with `(epsilon, inf)` never reports its own origin surface.
    pub fn surrounds(&self, x: f32) -> bool {
        self.min < x && x < self.max
    }

    /// Clamps x to be within the interval [min, max].
    ///
    /// Never panics; an inverted interval (min > max) yields `max`.
    pub fn clamp(&self, x: f32) -> f32 {
        x.max(self.min).min(self.max)
    }

    /// Returns a copy with `max` replaced, used to narrow a search to the
    /// closest hit found so far.
    pub fn with_max(&self, max: f32) -> Interval {
        Interval::new(self.min, max)
    }
}
