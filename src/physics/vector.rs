use nalgebra::{Rotation2, Vector2};

/// Planar vector used for every position, velocity and force in the model.
pub type Vec2 = Vector2<f64>;

/// Polar-coordinate helpers for [`Vec2`].
///
/// Magnitude, sum, difference and inner product come from nalgebra
/// (`norm`, `+`, `-`, `dot`).
pub trait Planar: Sized {
    fn rect(x: f64, y: f64) -> Self;

    /// `(mag·cos(azimuth), mag·sin(azimuth))`. A negative magnitude points
    /// the vector opposite to `azimuth`.
    fn from_polar(mag: f64, azimuth: f64) -> Self;

    /// Angle from +x, in `(-π, π]`.
    fn azimuth(&self) -> f64;

    /// Scalar 2D cross product `x1·y2 - y1·x2`.
    fn cross2(&self, other: &Self) -> f64;

    fn rotated(&self, theta: f64) -> Self;
}

impl Planar for Vec2 {
    fn rect(x: f64, y: f64) -> Self {
        Vector2::new(x, y)
    }

    fn from_polar(mag: f64, azimuth: f64) -> Self {
        Vector2::new(mag * azimuth.cos(), mag * azimuth.sin())
    }

    fn azimuth(&self) -> f64 {
        // `-0.0 + 0.0` is `+0.0`, keeping the result off `-π`.
        (self.y + 0.0).atan2(self.x)
    }

    fn cross2(&self, other: &Self) -> f64 {
        self.perp(other)
    }

    fn rotated(&self, theta: f64) -> Self {
        Rotation2::new(theta) * *self
    }
}
