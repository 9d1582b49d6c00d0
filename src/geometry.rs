pub(crate) mod defaults {
    pub const GRAVITY: f64 = 32.174;
    pub const BOARD_LENGTH: f64 = 4.;
    pub const BOARD_WIDTH: f64 = 2.;
    pub const BOARD_BACK_HEIGHT: f64 = 1.;
    pub const HOLE_DIAMETER: f64 = 0.5;
    pub const HOLE_FROM_TOP_EDGE: f64 = 0.75;
    pub const THROW_DISTANCE: f64 = 27.;
    pub const RELEASE_HEIGHT: f64 = 5.5;
}

/// Position or velocity in feet / feet-per-second.
/// x is forward distance, y is height, z is lateral offset.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn norm(self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    pub fn distance(self, other: Vec3) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2) + (self.z - other.z).powi(2))
            .sqrt()
    }

    /// Distance projected onto the board plane (x/z only).
    pub fn planar_distance(self, other: Vec3) -> f64 {
        ((self.x - other.x).powi(2) + (self.z - other.z).powi(2)).sqrt()
    }
}

/// Board dimensions, hole placement and gravity, injected wherever the
/// physics or the optimizer needs them. Defaults match a regulation board:
/// 4'x2' deck, 12" back height, 6" hole centered 9" from the top edge.
#[derive(Clone, Copy, Debug)]
pub struct BoardGeometry {
    length: f64,
    width: f64,
    back_height: f64,
    hole_diameter: f64,
    hole_from_top_edge: f64,
    gravity: f64,
}

impl Default for BoardGeometry {
    fn default() -> Self {
        Self {
            length: defaults::BOARD_LENGTH,
            width: defaults::BOARD_WIDTH,
            back_height: defaults::BOARD_BACK_HEIGHT,
            hole_diameter: defaults::HOLE_DIAMETER,
            hole_from_top_edge: defaults::HOLE_FROM_TOP_EDGE,
            gravity: defaults::GRAVITY,
        }
    }
}

impl BoardGeometry {
    pub fn with_length(self, length: f64) -> Self {
        Self { length, ..self }
    }

    pub fn with_width(self, width: f64) -> Self {
        Self { width, ..self }
    }

    pub fn with_back_height(self, back_height: f64) -> Self {
        Self {
            back_height,
            ..self
        }
    }

    pub fn with_hole_diameter(self, hole_diameter: f64) -> Self {
        Self {
            hole_diameter,
            ..self
        }
    }

    pub fn with_hole_from_top_edge(self, hole_from_top_edge: f64) -> Self {
        Self {
            hole_from_top_edge,
            ..self
        }
    }

    pub fn with_gravity(self, gravity: f64) -> Self {
        Self { gravity, ..self }
    }

    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn gravity(&self) -> f64 {
        self.gravity
    }

    pub fn hole_radius(&self) -> f64 {
        self.hole_diameter / 2.
    }

    /// Forward distance from the board's front edge to the hole center.
    pub fn hole_from_front_edge(&self) -> f64 {
        self.length - self.hole_from_top_edge
    }

    /// Height of the tilted deck surface at a forward distance from the
    /// front edge (linear rise from ground level to the back height).
    pub fn surface_height_at(&self, from_front_edge: f64) -> f64 {
        from_front_edge / self.length * self.back_height
    }

    /// World position of the hole center for a board whose front edge sits
    /// `throw_distance` feet ahead of the thrower, centered laterally.
    pub fn hole_center(&self, throw_distance: f64) -> Vec3 {
        let from_front = self.hole_from_front_edge();
        Vec3::new(
            throw_distance + from_front,
            self.surface_height_at(from_front),
            0.,
        )
    }
}
