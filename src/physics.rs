use crate::error::{Error, Result};
use crate::geometry::{self, Vec3};

mod defaults {
    pub const TIME_STEP: f64 = 0.01;
    pub const MAX_TIME: f64 = 5.;
}

/// Velocity vector for a launch at `speed` ft/s, elevated `pitch_deg` above
/// horizontal and deflected `yaw_deg` from the straight line to the target.
pub fn launch_velocity(speed: f64, pitch_deg: f64, yaw_deg: f64) -> Vec3 {
    let (sin_pitch, cos_pitch) = pitch_deg.to_radians().sin_cos();
    let (sin_yaw, cos_yaw) = yaw_deg.to_radians().sin_cos();
    Vec3::new(
        speed * cos_pitch * cos_yaw,
        speed * sin_pitch,
        speed * cos_pitch * sin_yaw,
    )
}

/// Closed-form position under gravity at time `t`. Evaluated directly from
/// `t`, never advanced from the previous sample, so no truncation error
/// accumulates regardless of step size.
pub fn position_at(p0: Vec3, v0: Vec3, gravity: f64, t: f64) -> Vec3 {
    Vec3::new(
        p0.x + v0.x * t,
        p0.y + v0.y * t - gravity / 2. * t * t,
        p0.z + v0.z * t,
    )
}

pub fn velocity_at(v0: Vec3, gravity: f64, t: f64) -> Vec3 {
    Vec3::new(v0.x, v0.y - gravity * t, v0.z)
}

/// One sample along a flight path.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrajectoryPoint {
    pub position: Vec3,
    pub velocity: Vec3,
    pub time: f64,
}

impl TrajectoryPoint {
    pub fn speed(&self) -> f64 {
        self.velocity.norm()
    }
}

/// Time-ordered flight path. The first point is the launch state at t=0;
/// when `complete`, the last point is the interpolated plane crossing.
#[derive(Clone, Debug)]
pub struct Trajectory {
    points: Vec<TrajectoryPoint>,
    complete: bool,
}

impl Trajectory {
    fn new(points: Vec<TrajectoryPoint>, complete: bool) -> Self {
        assert!(!points.is_empty());
        Self { points, complete }
    }

    pub fn points(&self) -> &[TrajectoryPoint] {
        &self.points
    }

    pub fn iter(&self) -> impl Iterator<Item = &TrajectoryPoint> + '_ {
        self.points.iter()
    }

    /// Last point of the path. For a complete trajectory this sits exactly
    /// on the target plane; otherwise it is the last sample before max_time.
    pub fn landing(&self) -> TrajectoryPoint {
        self.points[self.points.len() - 1]
    }

    /// False when the path never crossed the target plane within max_time.
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn flight_time(&self) -> f64 {
        self.landing().time
    }
}

/// Samples the closed-form motion equations at a fixed time step and refines
/// the landing point where the path crosses the target plane.
#[derive(Clone, Copy, Debug)]
pub struct TrajectoryCalculator {
    gravity: f64,
    time_step: f64,
    max_time: f64,
    plane_height: f64,
}

impl Default for TrajectoryCalculator {
    fn default() -> Self {
        Self {
            gravity: geometry::defaults::GRAVITY,
            time_step: defaults::TIME_STEP,
            max_time: defaults::MAX_TIME,
            plane_height: 0.,
        }
    }
}

impl TrajectoryCalculator {
    pub fn with_gravity(self, gravity: f64) -> Self {
        Self { gravity, ..self }
    }

    pub fn with_time_step(self, time_step: f64) -> Self {
        Self { time_step, ..self }
    }

    pub fn with_max_time(self, max_time: f64) -> Self {
        Self { max_time, ..self }
    }

    /// Height of the plane the projectile lands on (board surface height at
    /// the target, or 0 for open ground).
    pub fn with_plane_height(self, plane_height: f64) -> Self {
        Self {
            plane_height,
            ..self
        }
    }

    pub fn gravity(&self) -> f64 {
        self.gravity
    }

    /// Samples the path at t = 0, dt, 2dt, ... until the first sample at or
    /// below the plane height, then appends the exact crossing point.
    ///
    /// A start at or below the plane lands immediately at t=0. A path that
    /// never crosses within max_time comes back flagged incomplete, with the
    /// last computed sample standing in for the landing point.
    pub fn calculate(&self, initial_position: Vec3, initial_velocity: Vec3) -> Result<Trajectory> {
        if self.time_step <= 0. {
            return Err(Error::NonPositiveTimeStep(self.time_step));
        }
        if self.max_time <= 0. {
            return Err(Error::NonPositiveMaxTime(self.max_time));
        }

        if initial_position.y <= self.plane_height {
            return Ok(Trajectory::new(
                vec![TrajectoryPoint {
                    position: initial_position,
                    velocity: initial_velocity,
                    time: 0.,
                }],
                true,
            ));
        }

        let mut points = Vec::new();
        for step in 0.. {
            let t = step as f64 * self.time_step;
            if t > self.max_time {
                return Ok(Trajectory::new(points, false));
            }
            let position = position_at(initial_position, initial_velocity, self.gravity, t);
            if step > 0 && position.y <= self.plane_height {
                let previous = points[points.len() - 1];
                points.push(self.landing_point(
                    initial_position,
                    initial_velocity,
                    previous,
                    (position, t),
                ));
                return Ok(Trajectory::new(points, true));
            }
            points.push(TrajectoryPoint {
                position,
                velocity: velocity_at(initial_velocity, self.gravity, t),
                time: t,
            });
        }
        unreachable!("sampling loop always returns")
    }

    /// Convenience wrapper deriving the initial velocity from launch angles.
    pub fn calculate_from_angles(
        &self,
        initial_position: Vec3,
        speed: f64,
        pitch: f64,
        yaw: f64,
    ) -> Result<Trajectory> {
        if speed <= 0. {
            return Err(Error::NonPositiveSpeed(speed));
        }
        if !(-90. ..=90.).contains(&pitch) {
            return Err(Error::PitchOutOfRange(pitch));
        }
        self.calculate(initial_position, launch_velocity(speed, pitch, yaw))
    }

    /// Speed needed to pass through a target `horizontal_distance` feet out
    /// at `target_height`, launching from `start_height` at `launch_angle`
    /// degrees. None when no launch at that angle can reach the target.
    pub fn required_speed_2d(
        &self,
        start_height: f64,
        horizontal_distance: f64,
        target_height: f64,
        launch_angle: f64,
    ) -> Option<f64> {
        let angle = launch_angle.to_radians();
        let delta_y = target_height - start_height;
        let cos = angle.cos();
        let denominator = 2. * cos * cos * (horizontal_distance * angle.tan() - delta_y);
        if denominator <= 0. {
            return None;
        }
        let speed_squared = self.gravity * horizontal_distance * horizontal_distance / denominator;
        (speed_squared > 0.).then(|| speed_squared.sqrt())
    }

    /// Exact crossing of the target plane. The quadratic in t is solved in
    /// closed form; if it degenerates the bracketing samples are linearly
    /// interpolated instead. Landing height is pinned to the plane height.
    fn landing_point(
        &self,
        p0: Vec3,
        v0: Vec3,
        above: TrajectoryPoint,
        below: (Vec3, f64),
    ) -> TrajectoryPoint {
        if let Some(t) = self.plane_crossing_time(p0.y, v0.y) {
            let mut position = position_at(p0, v0, self.gravity, t);
            position.y = self.plane_height;
            return TrajectoryPoint {
                position,
                velocity: velocity_at(v0, self.gravity, t),
                time: t,
            };
        }

        let (below_position, below_time) = below;
        let span = above.position.y - below_position.y;
        let fraction = if span.abs() < f64::EPSILON {
            1.
        } else {
            (above.position.y - self.plane_height) / span
        };
        let time = above.time + fraction * (below_time - above.time);
        TrajectoryPoint {
            position: Vec3::new(
                above.position.x + fraction * (below_position.x - above.position.x),
                self.plane_height,
                above.position.z + fraction * (below_position.z - above.position.z),
            ),
            velocity: velocity_at(v0, self.gravity, time),
            time,
        }
    }

    /// Earliest positive t with y(t) equal to the plane height:
    /// 0 = (y0 - h) + vy0*t - g/2*t².
    fn plane_crossing_time(&self, y0: f64, vy0: f64) -> Option<f64> {
        if self.gravity <= 0. {
            return None;
        }
        let a = -self.gravity / 2.;
        let b = vy0;
        let c = y0 - self.plane_height;
        let discriminant = b * b - 4. * a * c;
        if discriminant < 0. {
            return None;
        }
        let root = discriminant.sqrt();
        let t1 = (-b + root) / (2. * a);
        let t2 = (-b - root) / (2. * a);
        match (t1 > 0., t2 > 0.) {
            (true, true) => Some(t1.min(t2)),
            (true, false) => Some(t1),
            (false, true) => Some(t2),
            (false, false) => None,
        }
    }
}
