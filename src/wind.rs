use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Constant horizontal wind.
///
/// `direction_deg` is the clock bearing the wind blows *from*, measured
/// clockwise from the line of fire:
///
/// * 0° - headwind, blowing from the target toward the shooter
/// * 90° - from the shooter's right, pushes the projectile left
/// * 180° - tailwind
/// * 270° - from the shooter's left, pushes the projectile right
///
/// Solver axes are x downrange, y up, z to the shooter's right.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Wind {
    /// Wind speed (m/s)
    pub speed: f64,
    /// Bearing the wind blows from (degrees)
    pub direction_deg: f64,
}

impl Wind {
    pub fn new(speed: f64, direction_deg: f64) -> Self {
        Self { speed, direction_deg }
    }

    pub fn calm() -> Self {
        Self::default()
    }

    /// Air velocity vector in solver axes; the vertical component is always zero
    pub fn vector(&self) -> Vector3<f64> {
        let angle_rad = self.direction_deg.to_radians();
        Vector3::new(
            -self.speed * angle_rad.cos(),
            0.0,
            -self.speed * angle_rad.sin(),
        )
    }

    /// Component blowing toward the shooter's right (m/s)
    pub fn crosswind(&self) -> f64 {
        self.vector().z
    }

    /// Component blowing against the direction of fire (m/s)
    pub fn headwind(&self) -> f64 {
        -self.vector().x
    }
}
