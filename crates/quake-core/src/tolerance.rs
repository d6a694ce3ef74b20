/// Tolerances for rupture geometry checks.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Tolerance {
    /// Linear tolerance for distance comparisons (km)
    pub linear: f64,
    /// Maximum edge-length mismatch and off-plane offset of a rectangle's
    /// corners, as a fraction of the rectangle's area.
    pub rectangle: f64,
}

impl Tolerance {
    pub const DEFAULT_LINEAR: f64 = 1e-7;
    pub const IMPERFECT_RECTANGLE_TOLERANCE: f64 = 0.004;

    pub fn new(linear: f64, rectangle: f64) -> Self {
        Self { linear, rectangle }
    }

    pub fn default_precision() -> Self {
        Self {
            linear: Self::DEFAULT_LINEAR,
            rectangle: Self::IMPERFECT_RECTANGLE_TOLERANCE,
        }
    }

    pub fn loose() -> Self {
        Self {
            linear: 1e-4,
            rectangle: 0.02,
        }
    }

    pub fn tight() -> Self {
        Self {
            linear: 1e-10,
            rectangle: 0.0005,
        }
    }

    /// Absolute tolerance (km) for a rectangle of the given dimensions.
    pub fn for_rectangle(self, width: f64, length: f64) -> f64 {
        width * length * self.rectangle
    }

    /// Check if two values are equal within linear tolerance
    pub fn linear_eq(self, a: f64, b: f64) -> bool {
        (a - b).abs() < self.linear
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::default_precision()
    }
}

/// When the rectangle consistency check runs on a freshly built surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckPolicy {
    Always,
    Never,
    /// Only in builds with `debug_assertions` enabled.
    #[default]
    DebugOnly,
}

impl CheckPolicy {
    pub fn enabled(self) -> bool {
        match self {
            CheckPolicy::Always => true,
            CheckPolicy::Never => false,
            CheckPolicy::DebugOnly => cfg!(debug_assertions),
        }
    }
}
