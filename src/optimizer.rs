use std::fmt::Display;

use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::error::{Error, Result};
use crate::geometry::{BoardGeometry, Vec3};
use crate::physics::{Trajectory, TrajectoryCalculator};
use crate::scoring::{fps_to_mph, ForceRating, SuccessModel};
use crate::ArcStyle;

mod search_defaults {
    pub const POPULATION_SIZE: usize = 30;
    pub const MAX_GENERATIONS: usize = 60;
    pub const MUTATION_FACTOR: f64 = 0.7;
    pub const CROSSOVER_PROB: f64 = 0.9;
    pub const DISTANCE_TOLERANCE: f64 = 0.01;
    pub const SEED: u64 = 42;

    pub const VELOCITY_RANGE: (f64, f64) = (15., 40.);
    pub const PITCH_RANGE: (f64, f64) = (15., 60.);
    pub const YAW_RANGE: (f64, f64) = (-15., 15.);
}

/// Objective value assigned to a candidate whose path never reaches the
/// target plane within the time budget.
const MISS_PENALTY: f64 = 1e3;

/// Launch parameters for a single throw.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ThrowParameters {
    /// Launch speed, ft/s, positive.
    pub speed: f64,
    /// Elevation above horizontal, degrees, within [-90, 90].
    pub pitch: f64,
    /// Horizontal deflection from the line to the target, degrees.
    pub yaw: f64,
}

impl ThrowParameters {
    pub fn try_new(speed: f64, pitch: f64, yaw: f64) -> Result<Self> {
        if speed <= 0. {
            return Err(Error::NonPositiveSpeed(speed));
        }
        if !(-90. ..=90.).contains(&pitch) {
            return Err(Error::PitchOutOfRange(pitch));
        }
        Ok(Self { speed, pitch, yaw })
    }

    pub fn launch_velocity(&self) -> Vec3 {
        crate::physics::launch_velocity(self.speed, self.pitch, self.yaw)
    }
}

/// Hard bounds of the parameter search. The search never evaluates outside
/// these ranges.
#[derive(Clone, Copy, Debug)]
pub struct SearchBounds {
    pub velocity: (f64, f64),
    pub pitch: (f64, f64),
    pub yaw: (f64, f64),
}

impl Default for SearchBounds {
    fn default() -> Self {
        Self {
            velocity: search_defaults::VELOCITY_RANGE,
            pitch: search_defaults::PITCH_RANGE,
            yaw: search_defaults::YAW_RANGE,
        }
    }
}

impl SearchBounds {
    pub fn with_velocity(self, min: f64, max: f64) -> Self {
        Self {
            velocity: (min, max),
            ..self
        }
    }

    pub fn with_pitch(self, min: f64, max: f64) -> Self {
        Self {
            pitch: (min, max),
            ..self
        }
    }

    /// Yaw may be degenerate (min == max) to pin the lateral deflection.
    pub fn with_yaw(self, min: f64, max: f64) -> Self {
        Self {
            yaw: (min, max),
            ..self
        }
    }

    pub fn validate(&self) -> Result<()> {
        let (v_min, v_max) = self.velocity;
        if v_min >= v_max || v_min <= 0. {
            return Err(Error::MalformedRange {
                name: "velocity",
                min: v_min,
                max: v_max,
            });
        }
        let (p_min, p_max) = self.pitch;
        if p_min >= p_max {
            return Err(Error::MalformedRange {
                name: "pitch",
                min: p_min,
                max: p_max,
            });
        }
        if !(-90. ..=90.).contains(&p_min) || !(-90. ..=90.).contains(&p_max) {
            return Err(Error::PitchOutOfRange(if p_min < -90. { p_min } else { p_max }));
        }
        let (y_min, y_max) = self.yaw;
        if y_min > y_max {
            return Err(Error::MalformedRange {
                name: "yaw",
                min: y_min,
                max: y_max,
            });
        }
        Ok(())
    }
}

/// Differential-evolution knobs. The evaluation budget is
/// population_size × (max_generations + 1); the search stops early once the
/// best distance falls below the tolerance.
#[derive(Clone, Copy, Debug)]
pub struct SearchSettings {
    pub population_size: usize,
    pub max_generations: usize,
    pub mutation_factor: f64,
    pub crossover_prob: f64,
    pub distance_tolerance: f64,
    pub seed: u64,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            population_size: search_defaults::POPULATION_SIZE,
            max_generations: search_defaults::MAX_GENERATIONS,
            mutation_factor: search_defaults::MUTATION_FACTOR,
            crossover_prob: search_defaults::CROSSOVER_PROB,
            distance_tolerance: search_defaults::DISTANCE_TOLERANCE,
            seed: search_defaults::SEED,
        }
    }
}

impl SearchSettings {
    pub fn with_population_size(self, population_size: usize) -> Self {
        Self {
            population_size,
            ..self
        }
    }

    pub fn with_max_generations(self, max_generations: usize) -> Self {
        Self {
            max_generations,
            ..self
        }
    }

    pub fn with_distance_tolerance(self, distance_tolerance: f64) -> Self {
        Self {
            distance_tolerance,
            ..self
        }
    }

    pub fn with_seed(self, seed: u64) -> Self {
        Self { seed, ..self }
    }

    fn validate(&self) -> Result<()> {
        // Mutation needs three distinct partners besides the candidate.
        if self.population_size < 4 {
            return Err(Error::PopulationTooSmall(self.population_size));
        }
        Ok(())
    }
}

/// Best throw found for a target, with everything a caller needs to render
/// or rank it.
#[derive(Clone, Debug)]
pub struct ThrowRecommendation {
    pub parameters: ThrowParameters,
    pub velocity_mph: f64,
    pub force_rating: ForceRating,
    pub arc_style: Option<ArcStyle>,
    pub trajectory: Trajectory,
    pub landing_point: Vec3,
    pub distance_from_hole: f64,
    pub success_probability: f64,
    /// False when the search exhausted its budget above the distance
    /// tolerance or the best path never reached the target plane; the
    /// recommendation is still the best found, with an honest probability.
    pub converged: bool,
}

impl Display for ThrowRecommendation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let direction = if self.parameters.yaw < 0. {
            " Left"
        } else if self.parameters.yaw > 0. {
            " Right"
        } else {
            " Straight"
        };
        writeln!(f, "Throw Recommendation:")?;
        if let Some(arc) = self.arc_style {
            writeln!(f, "  Arc: {arc}")?;
        }
        writeln!(
            f,
            "  Force: {} ({:.1} mph)",
            self.force_rating, self.velocity_mph
        )?;
        writeln!(f, "  Pitch Angle: {:.1}°", self.parameters.pitch)?;
        writeln!(f, "  Yaw Angle: {:.1}°{direction}", self.parameters.yaw)?;
        writeln!(
            f,
            "  Distance from Hole: {:.2} inches",
            self.distance_from_hole * 12.
        )?;
        write!(
            f,
            "  Success Probability: {:.1}%",
            self.success_probability * 100.
        )
    }
}

/// Searches the bounded (speed, pitch, yaw) space for the throw landing
/// closest to the hole, using the trajectory calculator as a black-box
/// forward model.
///
/// The search is a seeded differential evolution: deterministic for a fixed
/// seed, bounded by population × generations forward evaluations, clamped to
/// the bounds on every mutation, and always returning the best candidate
/// found even when the tolerance is never met.
#[derive(Clone, Debug)]
pub struct TrajectoryOptimizer {
    board: BoardGeometry,
    calculator: TrajectoryCalculator,
    settings: SearchSettings,
}

impl Default for TrajectoryOptimizer {
    fn default() -> Self {
        Self::for_board(BoardGeometry::default())
    }
}

impl TrajectoryOptimizer {
    pub fn for_board(board: BoardGeometry) -> Self {
        Self {
            board,
            calculator: TrajectoryCalculator::default().with_gravity(board.gravity()),
            settings: SearchSettings::default(),
        }
    }

    pub fn with_calculator(self, calculator: TrajectoryCalculator) -> Self {
        Self { calculator, ..self }
    }

    pub fn with_settings(self, settings: SearchSettings) -> Self {
        Self { settings, ..self }
    }

    pub fn board(&self) -> &BoardGeometry {
        &self.board
    }

    /// Best throw from `throw_position` landing on `target_position`, where
    /// the target's height defines the landing plane. Bounds are validated
    /// before any forward-model evaluation.
    pub fn optimize_for_target(
        &self,
        throw_position: Vec3,
        target_position: Vec3,
        bounds: &SearchBounds,
    ) -> Result<ThrowRecommendation> {
        bounds.validate()?;
        self.settings.validate()?;

        let calculator = self.calculator.with_plane_height(target_position.y);
        let objective = |candidate: &[f64; 3]| -> f64 {
            match calculator.calculate_from_angles(
                throw_position,
                candidate[0],
                candidate[1],
                candidate[2],
            ) {
                Ok(trajectory) => {
                    let distance = trajectory
                        .landing()
                        .position
                        .planar_distance(target_position);
                    if trajectory.is_complete() {
                        distance
                    } else {
                        MISS_PENALTY + distance
                    }
                }
                // Bounds keep candidates valid; treat the impossible as a miss.
                Err(_) => MISS_PENALTY,
            }
        };

        let seed = self.seed_candidate(throw_position, target_position, bounds);
        let best = self.evolve(bounds, &seed, &objective);

        self.package(throw_position, target_position, &calculator, best)
    }

    /// Convenience entry point for a regulation board `throw_distance` feet
    /// out: derives the hole-center target from the board geometry and uses
    /// the default bounds.
    pub fn optimize_for_board(
        &self,
        throw_distance: f64,
        throw_height: f64,
        lateral_offset: f64,
    ) -> Result<ThrowRecommendation> {
        let throw_position = Vec3::new(0., throw_height, lateral_offset);
        let target_position = self.board.hole_center(throw_distance);
        self.optimize_for_target(throw_position, target_position, &SearchBounds::default())
    }

    /// Qualitatively distinct solutions, one per pitch band. Delegates to
    /// [`crate::SolutionDiversifier`].
    pub fn generate_multiple_solutions(
        &self,
        throw_position: Vec3,
        target_position: Vec3,
        num_solutions: usize,
    ) -> Result<Vec<ThrowRecommendation>> {
        crate::SolutionDiversifier::new(self).solutions(
            throw_position,
            target_position,
            num_solutions,
        )
    }

    /// Heuristic member of the initial population: aim the yaw straight at
    /// the target and take the closed-form speed for the mid-band pitch.
    fn seed_candidate(
        &self,
        throw_position: Vec3,
        target_position: Vec3,
        bounds: &SearchBounds,
    ) -> [f64; 3] {
        let dx = target_position.x - throw_position.x;
        let dz = target_position.z - throw_position.z;
        let horizontal = (dx * dx + dz * dz).sqrt();
        let pitch = (bounds.pitch.0 + bounds.pitch.1) / 2.;
        let speed = self
            .calculator
            .required_speed_2d(throw_position.y, horizontal, target_position.y, pitch)
            .unwrap_or((bounds.velocity.0 + bounds.velocity.1) / 2.)
            .clamp(bounds.velocity.0, bounds.velocity.1);
        let yaw = dz.atan2(dx).to_degrees().clamp(bounds.yaw.0, bounds.yaw.1);
        [speed, pitch, yaw]
    }

    fn evolve(
        &self,
        bounds: &SearchBounds,
        seed_candidate: &[f64; 3],
        objective: &dyn Fn(&[f64; 3]) -> f64,
    ) -> ([f64; 3], f64) {
        let lows = [bounds.velocity.0, bounds.pitch.0, bounds.yaw.0];
        let highs = [bounds.velocity.1, bounds.pitch.1, bounds.yaw.1];
        let settings = &self.settings;
        let mut rng = StdRng::seed_from_u64(settings.seed);

        let sample = |rng: &mut StdRng| {
            let mut candidate = [0f64; 3];
            for d in 0..3 {
                candidate[d] = if lows[d] < highs[d] {
                    rng.gen_range(lows[d]..highs[d])
                } else {
                    lows[d]
                };
            }
            candidate
        };

        let size = settings.population_size;
        let mut population: Vec<[f64; 3]> = (0..size).map(|_| sample(&mut rng)).collect();
        population[0] = *seed_candidate;
        let mut scores: Vec<f64> = population.iter().map(|c| objective(c)).collect();
        let mut best = 0;
        for i in 1..size {
            if scores[i] < scores[best] {
                best = i;
            }
        }

        for _generation in 0..settings.max_generations {
            if scores[best] <= settings.distance_tolerance {
                break;
            }
            for i in 0..size {
                let [a, b, c] = pick_distinct(&mut rng, size, i);
                let mut trial = population[i];
                let forced = rng.gen_range(0..3);
                for d in 0..3 {
                    if d == forced || rng.gen_range(0f64..1f64) < settings.crossover_prob {
                        let mutant = population[a][d]
                            + settings.mutation_factor * (population[b][d] - population[c][d]);
                        trial[d] = mutant.clamp(lows[d], highs[d]);
                    }
                }
                let score = objective(&trial);
                if score <= scores[i] {
                    population[i] = trial;
                    scores[i] = score;
                    if score < scores[best] {
                        best = i;
                    }
                }
            }
        }

        (population[best], scores[best])
    }

    fn package(
        &self,
        throw_position: Vec3,
        target_position: Vec3,
        calculator: &TrajectoryCalculator,
        (candidate, _score): ([f64; 3], f64),
    ) -> Result<ThrowRecommendation> {
        let [speed, pitch, yaw] = candidate;
        let parameters = ThrowParameters::try_new(speed, pitch, yaw)?;
        let trajectory = calculator.calculate_from_angles(throw_position, speed, pitch, yaw)?;
        let landing_point = trajectory.landing().position;
        let distance_from_hole = landing_point.planar_distance(target_position);
        let model = SuccessModel::for_board(&self.board);
        let success_probability = if trajectory.is_complete() {
            model.estimate(distance_from_hole)
        } else {
            0.
        };
        let converged =
            trajectory.is_complete() && distance_from_hole <= self.settings.distance_tolerance;
        Ok(ThrowRecommendation {
            parameters,
            velocity_mph: fps_to_mph(speed),
            force_rating: ForceRating::from_speed(speed),
            arc_style: None,
            trajectory,
            landing_point,
            distance_from_hole,
            success_probability,
            converged,
        })
    }
}

/// Three indices distinct from each other and from `current`.
fn pick_distinct(rng: &mut StdRng, size: usize, current: usize) -> [usize; 3] {
    let mut picked = [current; 3];
    for slot in 0..3 {
        loop {
            let candidate = rng.gen_range(0..size);
            if candidate != current && !picked[..slot].contains(&candidate) {
                picked[slot] = candidate;
                break;
            }
        }
    }
    picked
}
