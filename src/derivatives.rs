use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::atmosphere::AtmosphericState;
use crate::constants::{CD_TO_RETARD_PER_M, G_ACCEL_MPS2, MIN_VELOCITY_THRESHOLD, STANDARD_AIR_DENSITY};
use crate::drag::DragTable;

/// Relation between a drag coefficient and the drag deceleration.
///
/// Implementations return the factor `k` in `a_drag = k * |v_rel|²` (1/m).
pub trait DragLaw: Send + Sync {
    fn drag_factor(&self, cd: f64, air_density: f64) -> f64;

    fn name(&self) -> &'static str;
}

/// Ballistic-coefficient normalized drag (the default law)
///
/// `k = CD_TO_RETARD_PER_M * (ρ / ρ_ref) * Cd / BC`, with the BC in lb/in²
/// against the reference projectile of the selected table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BallisticCoefficientDrag {
    pub ballistic_coefficient: f64,
}

impl DragLaw for BallisticCoefficientDrag {
    fn drag_factor(&self, cd: f64, air_density: f64) -> f64 {
        let density_scale = air_density / STANDARD_AIR_DENSITY;
        CD_TO_RETARD_PER_M * density_scale * cd / self.ballistic_coefficient
    }

    fn name(&self) -> &'static str {
        "ballistic-coefficient"
    }
}

/// Drag from the projectile's own cross-section and mass
///
/// `k = ½ ρ Cd A / m`. The table Cd is used as the projectile's Cd directly,
/// so the ballistic coefficient plays no part.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SectionalDrag {
    /// Cross-sectional area (m²)
    pub area_m2: f64,
    /// Projectile mass (kg)
    pub mass_kg: f64,
}

impl SectionalDrag {
    pub fn from_caliber(diameter_m: f64, mass_kg: f64) -> Self {
        Self {
            area_m2: std::f64::consts::PI * (diameter_m / 2.0).powi(2),
            mass_kg,
        }
    }
}

impl DragLaw for SectionalDrag {
    fn drag_factor(&self, cd: f64, air_density: f64) -> f64 {
        0.5 * air_density * cd * self.area_m2 / self.mass_kg
    }

    fn name(&self) -> &'static str {
        "sectional"
    }
}

/// Selects which drag law a solve uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DragLawKind {
    #[default]
    BallisticCoefficient,
    Sectional,
}

/// Everything the equations of motion need besides the state itself
pub struct FlightEnvironment<'a> {
    pub atmosphere: AtmosphericState,
    /// `None` disables drag
    pub drag_table: Option<&'a DragTable>,
    pub drag_law: &'a dyn DragLaw,
    /// Constant air velocity (m/s)
    pub wind: Vector3<f64>,
}

impl FlightEnvironment<'_> {
    /// Projectile velocity relative to the air mass
    #[inline]
    pub fn relative_velocity(&self, velocity: &Vector3<f64>) -> Vector3<f64> {
        velocity - self.wind
    }

    /// Mach number at a given air speed
    #[inline]
    pub fn mach(&self, air_speed: f64) -> f64 {
        if self.atmosphere.speed_of_sound > 1e-9 {
            air_speed / self.atmosphere.speed_of_sound
        } else {
            0.0
        }
    }
}

/// Time derivative of the projectile state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StateDerivative {
    /// d(position)/dt
    pub velocity: Vector3<f64>,
    /// d(velocity)/dt
    pub acceleration: Vector3<f64>,
}

/// Compute ballistic derivatives for trajectory integration.
///
/// Position does not enter the forces (constant wind, one atmosphere per
/// solve), so only the velocity is needed.
pub fn compute_derivatives(velocity: &Vector3<f64>, env: &FlightEnvironment<'_>) -> StateDerivative {
    let accel_gravity = Vector3::new(0.0, -G_ACCEL_MPS2, 0.0);

    let velocity_adjusted = env.relative_velocity(velocity);
    let speed_air = velocity_adjusted.norm();

    let accel_drag = match env.drag_table {
        Some(table) if speed_air > MIN_VELOCITY_THRESHOLD => {
            let cd = table.interpolate(env.mach(speed_air));
            let k = env.drag_law.drag_factor(cd, env.atmosphere.air_density);
            // k * |v|² along -v̂ is k * |v| * -v
            -k * speed_air * velocity_adjusted
        }
        _ => Vector3::zeros(),
    };

    StateDerivative {
        velocity: *velocity,
        acceleration: accel_gravity + accel_drag,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atmosphere::calculate_atmosphere;
    use crate::drag::drag_table_for;
    use crate::DragModel;
    use approx::assert_relative_eq;

    fn standard_atmosphere() -> AtmosphericState {
        AtmosphericState {
            air_density: STANDARD_AIR_DENSITY,
            speed_of_sound: 340.0,
        }
    }

    #[test]
    fn test_bc_drag_factor() {
        let law = BallisticCoefficientDrag { ballistic_coefficient: 0.5 };
        let k = law.drag_factor(0.5, STANDARD_AIR_DENSITY);
        assert_relative_eq!(k, CD_TO_RETARD_PER_M, epsilon = 1e-15);

        // Halving density halves the factor, doubling BC halves it again
        let thin = law.drag_factor(0.5, STANDARD_AIR_DENSITY / 2.0);
        assert_relative_eq!(thin, k / 2.0, epsilon = 1e-15);
        let slick = BallisticCoefficientDrag { ballistic_coefficient: 1.0 }.drag_factor(0.5, STANDARD_AIR_DENSITY);
        assert_relative_eq!(slick, k / 2.0, epsilon = 1e-15);
    }

    #[test]
    fn test_bc_drag_matches_imperial_retardation() {
        // 2900 fps, Cd 0.5, BC 0.4 at standard density
        let v_fps: f64 = 2900.0;
        let retard_fps2 = crate::constants::CD_TO_RETARD * 0.5 * v_fps * v_fps / 0.4;
        let law = BallisticCoefficientDrag { ballistic_coefficient: 0.4 };
        let v_mps = v_fps * crate::constants::FEET_TO_METERS;
        let retard_mps2 = law.drag_factor(0.5, STANDARD_AIR_DENSITY) * v_mps * v_mps;
        assert_relative_eq!(retard_mps2, retard_fps2 * crate::constants::FEET_TO_METERS, max_relative = 1e-12);
    }

    #[test]
    fn test_sectional_drag_factor() {
        let law = SectionalDrag::from_caliber(0.00782, 0.00972);
        let area = std::f64::consts::PI * 0.00391_f64.powi(2);
        assert_relative_eq!(law.area_m2, area, epsilon = 1e-15);
        assert_relative_eq!(law.drag_factor(0.3, 1.2), 0.5 * 1.2 * 0.3 * area / 0.00972, epsilon = 1e-15);
    }

    #[test]
    fn test_law_names() {
        assert_eq!(BallisticCoefficientDrag { ballistic_coefficient: 0.5 }.name(), "ballistic-coefficient");
        assert_eq!(SectionalDrag::from_caliber(0.0078, 0.01).name(), "sectional");
    }

    #[test]
    fn test_gravity_only_without_table() {
        let law = BallisticCoefficientDrag { ballistic_coefficient: 0.5 };
        let env = FlightEnvironment {
            atmosphere: standard_atmosphere(),
            drag_table: None,
            drag_law: &law,
            wind: Vector3::new(-3.0, 0.0, 2.0),
        };
        let v = Vector3::new(800.0, 5.0, 0.0);
        let d = compute_derivatives(&v, &env);
        assert_eq!(d.velocity, v);
        assert_eq!(d.acceleration, Vector3::new(0.0, -G_ACCEL_MPS2, 0.0));
    }

    #[test]
    fn test_drag_opposes_relative_velocity() {
        let law = BallisticCoefficientDrag { ballistic_coefficient: 0.4 };
        let env = FlightEnvironment {
            atmosphere: calculate_atmosphere(15.0, 1013.25, 50.0),
            drag_table: drag_table_for(DragModel::G1),
            drag_law: &law,
            wind: Vector3::new(0.0, 0.0, -5.0),
        };
        let v = Vector3::new(800.0, 0.0, 0.0);
        let d = compute_derivatives(&v, &env);
        let drag = d.acceleration - Vector3::new(0.0, -G_ACCEL_MPS2, 0.0);

        // Decelerates along the line of fire
        assert!(drag.x < 0.0);
        // Air moving left relative to ground means the projectile moves right
        // relative to the air, so drag pushes it left
        assert!(drag.z < 0.0);
        let rel = env.relative_velocity(&v);
        let cross = drag.cross(&rel);
        assert!(cross.norm() < 1e-9 * drag.norm() * rel.norm());
    }

    #[test]
    fn test_drag_magnitude() {
        let law = BallisticCoefficientDrag { ballistic_coefficient: 0.5 };
        let atmosphere = standard_atmosphere();
        let table = drag_table_for(DragModel::G7).unwrap();
        let env = FlightEnvironment {
            atmosphere,
            drag_table: Some(table),
            drag_law: &law,
            wind: Vector3::zeros(),
        };
        let v = Vector3::new(680.0, 0.0, 0.0);
        let d = compute_derivatives(&v, &env);
        let cd = table.interpolate(2.0);
        let expected = CD_TO_RETARD_PER_M * cd / 0.5 * 680.0 * 680.0;
        assert_relative_eq!(-d.acceleration.x, expected, max_relative = 1e-12);
    }

    #[test]
    fn test_no_drag_below_velocity_threshold() {
        let law = BallisticCoefficientDrag { ballistic_coefficient: 0.5 };
        let env = FlightEnvironment {
            atmosphere: standard_atmosphere(),
            drag_table: drag_table_for(DragModel::G1),
            drag_law: &law,
            wind: Vector3::new(2.0, 0.0, 0.0),
        };
        // Moving with the wind: no air speed, no drag direction
        let d = compute_derivatives(&Vector3::new(2.0, 0.0, 0.0), &env);
        assert_eq!(d.acceleration, Vector3::new(0.0, -G_ACCEL_MPS2, 0.0));
    }

    #[test]
    fn test_mach() {
        let law = BallisticCoefficientDrag { ballistic_coefficient: 0.5 };
        let env = FlightEnvironment {
            atmosphere: standard_atmosphere(),
            drag_table: None,
            drag_law: &law,
            wind: Vector3::zeros(),
        };
        assert_relative_eq!(env.mach(680.0), 2.0, epsilon = 1e-12);
    }
}
