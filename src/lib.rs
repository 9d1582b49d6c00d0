mod diversify;
mod error;
mod geometry;
mod optimizer;
mod physics;
mod scoring;
pub mod init;

pub use diversify::*;
pub use error::*;
pub use geometry::*;
pub use optimizer::*;
pub use physics::*;
pub use scoring::*;
