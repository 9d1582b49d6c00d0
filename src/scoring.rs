use std::fmt::Display;

use crate::geometry::BoardGeometry;

mod defaults {
    /// Logistic decay rate of the success curve past the hole edge.
    pub const DECAY_RATE: f64 = 5.;
}

pub const MPH_PER_FPS: f64 = 0.681818;

pub fn fps_to_mph(speed_fps: f64) -> f64 {
    speed_fps * MPH_PER_FPS
}

/// Discrete throw-strength label derived from launch speed (ft/s).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum ForceRating {
    VeryLow,
    Low,
    MediumLow,
    Medium,
    MediumHigh,
    High,
    VeryHigh,
}

impl ForceRating {
    pub fn from_speed(speed_fps: f64) -> Self {
        match speed_fps {
            s if s < 15. => Self::VeryLow,
            s if s < 20. => Self::Low,
            s if s < 25. => Self::MediumLow,
            s if s < 30. => Self::Medium,
            s if s < 35. => Self::MediumHigh,
            s if s < 45. => Self::High,
            _ => Self::VeryHigh,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::VeryLow => "Very Low",
            Self::Low => "Low",
            Self::MediumLow => "Medium-Low",
            Self::Medium => "Medium",
            Self::MediumHigh => "Medium-High",
            Self::High => "High",
            Self::VeryHigh => "Very High",
        }
    }
}

impl Display for ForceRating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Calibration constants for the success curve, injected rather than inlined
/// so alternate calibrations can be swept offline.
#[derive(Clone, Copy, Debug)]
pub struct Calibration {
    pub decay_rate: f64,
}

impl Default for Calibration {
    fn default() -> Self {
        Self {
            decay_rate: defaults::DECAY_RATE,
        }
    }
}

/// Maps a landing point's distance from the hole center to an estimated
/// probability of the bag dropping in.
///
/// Inside the hole radius the estimate is 1. Past it, a logistic falloff
/// (midpoint at the hole edge, normalized to 1 there) is gated linearly to
/// reach exactly 0 at the cutoff distance (the board length). Monotone
/// non-increasing, continuous, always within [0, 1].
#[derive(Clone, Copy, Debug)]
pub struct SuccessModel {
    hole_radius: f64,
    cutoff: f64,
    calibration: Calibration,
}

impl SuccessModel {
    pub fn new(hole_radius: f64, cutoff: f64) -> Self {
        Self {
            hole_radius,
            cutoff,
            calibration: Calibration::default(),
        }
    }

    pub fn for_board(board: &BoardGeometry) -> Self {
        Self::new(board.hole_radius(), board.length())
    }

    pub fn with_calibration(self, calibration: Calibration) -> Self {
        Self {
            calibration,
            ..self
        }
    }

    pub fn estimate(&self, distance_from_hole: f64) -> f64 {
        let r = self.hole_radius;
        if distance_from_hole <= r {
            return 1.;
        }
        if distance_from_hole >= self.cutoff {
            return 0.;
        }
        let k = self.calibration.decay_rate;
        // Logistic is 1/2 at the hole edge; double it so the curve meets the
        // in-the-hole plateau continuously.
        let logistic = 2. / (1. + (k * (distance_from_hole - r) / r).exp());
        let gate = 1. - (distance_from_hole - r) / (self.cutoff - r);
        (logistic * gate).clamp(0., 1.)
    }
}
