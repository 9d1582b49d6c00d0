use std::fmt::Display;

use crate::error::{Error, Result};
use crate::geometry::Vec3;
use crate::optimizer::{SearchBounds, ThrowRecommendation, TrajectoryOptimizer};

/// Qualitative label for the pitch band a diversified solution came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArcStyle {
    Low,
    Medium,
    High,
    Band(usize),
}

impl ArcStyle {
    fn for_band(index: usize, count: usize) -> Self {
        match (count, index) {
            (1, _) => Self::Medium,
            (2, 0) => Self::Low,
            (2, _) => Self::High,
            (3, 0) => Self::Low,
            (3, 1) => Self::Medium,
            (3, _) => Self::High,
            _ => Self::Band(index),
        }
    }
}

impl Display for ArcStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "Low"),
            Self::Medium => write!(f, "Medium"),
            Self::High => write!(f, "High"),
            Self::Band(index) => write!(f, "Band {}", index + 1),
        }
    }
}

/// Surfaces qualitatively distinct throws for one target.
///
/// The forward model is multi-modal in pitch: a flat throw and a lofted one
/// can reach the same point, and a single search over the full pitch range
/// settles into just one of those basins. Partitioning the range into
/// disjoint equal-width bands and searching each independently guarantees
/// the diversity instead of leaving it to chance.
pub struct SolutionDiversifier<'a> {
    optimizer: &'a TrajectoryOptimizer,
    bounds: SearchBounds,
}

impl<'a> SolutionDiversifier<'a> {
    pub fn new(optimizer: &'a TrajectoryOptimizer) -> Self {
        Self {
            optimizer,
            bounds: SearchBounds::default(),
        }
    }

    pub fn with_bounds(self, bounds: SearchBounds) -> Self {
        Self { bounds, ..self }
    }

    /// One recommendation per pitch band, sorted by success probability
    /// descending. Band boundaries touch but never overlap.
    pub fn solutions(
        &self,
        throw_position: Vec3,
        target_position: Vec3,
        num_solutions: usize,
    ) -> Result<Vec<ThrowRecommendation>> {
        if num_solutions == 0 {
            return Err(Error::NoSolutionBands);
        }
        self.bounds.validate()?;

        let (pitch_min, pitch_max) = self.bounds.pitch;
        let band_width = (pitch_max - pitch_min) / num_solutions as f64;

        let mut recommendations = (0..num_solutions)
            .map(|band| {
                let low = pitch_min + band as f64 * band_width;
                let high = if band + 1 == num_solutions {
                    pitch_max
                } else {
                    pitch_min + (band + 1) as f64 * band_width
                };
                let mut recommendation = self.optimizer.optimize_for_target(
                    throw_position,
                    target_position,
                    &self.bounds.with_pitch(low, high),
                )?;
                recommendation.arc_style = Some(ArcStyle::for_band(band, num_solutions));
                Ok(recommendation)
            })
            .collect::<Result<Vec<_>>>()?;

        recommendations.sort_by(|a, b| {
            b.success_probability.total_cmp(&a.success_probability)
        });
        Ok(recommendations)
    }
}

#[cfg(test)]
mod diversify_tests {
    use super::*;
    use crate::geometry;

    fn throw_position() -> Vec3 {
        Vec3::new(0., geometry::defaults::RELEASE_HEIGHT, 0.)
    }

    fn target() -> Vec3 {
        Vec3::new(27., 0.75, 0.)
    }

    #[test]
    fn three_distinct_arcs() {
        let optimizer = TrajectoryOptimizer::default();
        let solutions = optimizer
            .generate_multiple_solutions(throw_position(), target(), 3)
            .unwrap();
        assert_eq!(solutions.len(), 3);

        // Every solution sits inside its own band of the 15-60° range.
        for solution in &solutions {
            let band = match solution.arc_style {
                Some(ArcStyle::Low) => (15., 30.),
                Some(ArcStyle::Medium) => (30., 45.),
                Some(ArcStyle::High) => (45., 60.),
                other => panic!("unexpected arc style {other:?}"),
            };
            let pitch = solution.parameters.pitch;
            assert!(
                band.0 <= pitch && pitch <= band.1,
                "pitch {pitch} outside band {band:?}"
            );
        }

        let styles: Vec<_> = solutions.iter().map(|s| s.arc_style).collect();
        assert!(styles.contains(&Some(ArcStyle::Low)));
        assert!(styles.contains(&Some(ArcStyle::Medium)));
        assert!(styles.contains(&Some(ArcStyle::High)));

        for (i, a) in solutions.iter().enumerate() {
            for b in &solutions[i + 1..] {
                assert!((a.parameters.pitch - b.parameters.pitch).abs() > f64::EPSILON);
            }
        }
    }

    #[test]
    fn sorted_by_probability() {
        let solutions = TrajectoryOptimizer::default()
            .generate_multiple_solutions(throw_position(), target(), 3)
            .unwrap();
        for pair in solutions.windows(2) {
            assert!(pair[0].success_probability >= pair[1].success_probability);
        }
    }

    #[test]
    fn single_band_is_the_full_range() {
        let solutions = TrajectoryOptimizer::default()
            .generate_multiple_solutions(throw_position(), target(), 1)
            .unwrap();
        assert_eq!(solutions.len(), 1);
        assert_eq!(solutions[0].arc_style, Some(ArcStyle::Medium));
        let pitch = solutions[0].parameters.pitch;
        assert!((15. ..=60.).contains(&pitch));
    }

    #[test]
    fn many_bands_use_indices() {
        let solutions = TrajectoryOptimizer::default()
            .generate_multiple_solutions(throw_position(), target(), 5)
            .unwrap();
        assert_eq!(solutions.len(), 5);
        let mut bands: Vec<_> = solutions
            .iter()
            .map(|s| match s.arc_style {
                Some(ArcStyle::Band(i)) => i,
                other => panic!("unexpected arc style {other:?}"),
            })
            .collect();
        bands.sort_unstable();
        assert_eq!(bands, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn zero_solutions_rejected() {
        assert!(matches!(
            TrajectoryOptimizer::default().generate_multiple_solutions(
                throw_position(),
                target(),
                0
            ),
            Err(Error::NoSolutionBands)
        ));
    }
}
