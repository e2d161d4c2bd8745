/// A half-open range of ray parameters (or channel values), `[min, max)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub min: f64,
    pub max: f64,
}

impl Interval {
    /// The unit interval, used to clamp color channels.
    pub const UNIT: Interval = Interval { min: 0.0, max: 1.0 };

    /// Create a new interval given min and max values.
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Returns true if `min <= x < max`.
    ///
    /// Roots exactly at `max` are rejected so that a surface tied with the
    /// current closest hit never replaces it.
    #[inline]
    pub fn contains(&self, x: f64) -> bool {
        self.min <= x && x < self.max
    }

    /// Same lower bound, upper bound replaced by `max`.
    #[inline]
    pub fn with_max(&self, max: f64) -> Interval {
        Interval::new(self.min, max)
    }

    /// Clamps x to be within the interval [min, max].
    #[inline]
    pub fn clamp(&self, x: f64) -> f64 {
        x.clamp(self.min, self.max)
    }
}
