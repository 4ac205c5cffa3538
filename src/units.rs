//! Metric/imperial conversion at the edges of the solver, plus angular units.
//!
//! The solver itself works in SI only. Imperial inputs are converted once into
//! [`ShotParameters`] and results are converted once on the way out.

use serde::{Deserialize, Serialize};

use crate::constants::{
    FEET_TO_METERS, GRAINS_TO_KG, INCHES_TO_METERS, INHG_TO_HPA, JOULES_TO_FTLBF, MPH_TO_MPS,
    YARDS_TO_METERS,
};
use crate::integrator::Termination;
use crate::parameters::ShotParameters;
use crate::shot_solver::{Confidence, ShotResult};
use crate::trajectory_sampling::TrajectorySample;
use crate::DragModel;

/// Unit system for input and output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum UnitSystem {
    #[default]
    Metric,
    Imperial,
}

impl UnitSystem {
    /// Unit of downrange distances
    pub fn range_unit(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "m",
            UnitSystem::Imperial => "yd",
        }
    }

    /// Unit of drop and windage
    pub fn offset_unit(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "m",
            UnitSystem::Imperial => "in",
        }
    }

    pub fn velocity_unit(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "m/s",
            UnitSystem::Imperial => "fps",
        }
    }

    pub fn energy_unit(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "J",
            UnitSystem::Imperial => "ft·lbf",
        }
    }
}

/// Per-quantity conversions between a unit system and SI
pub struct UnitConverter;

impl UnitConverter {
    // Input conversions (to metric)
    pub fn velocity_to_metric(val: f64, units: UnitSystem) -> f64 {
        match units {
            UnitSystem::Metric => val,
            UnitSystem::Imperial => val * FEET_TO_METERS, // fps to m/s
        }
    }

    pub fn mass_to_metric(val: f64, units: UnitSystem) -> f64 {
        match units {
            UnitSystem::Metric => val,
            UnitSystem::Imperial => val * GRAINS_TO_KG, // grains to kg
        }
    }

    pub fn distance_to_metric(val: f64, units: UnitSystem) -> f64 {
        match units {
            UnitSystem::Metric => val,
            UnitSystem::Imperial => val * YARDS_TO_METERS, // yards to meters
        }
    }

    pub fn offset_to_metric(val: f64, units: UnitSystem) -> f64 {
        match units {
            UnitSystem::Metric => val,
            UnitSystem::Imperial => val * INCHES_TO_METERS, // inches to meters
        }
    }

    pub fn wind_speed_to_metric(val: f64, units: UnitSystem) -> f64 {
        match units {
            UnitSystem::Metric => val,
            UnitSystem::Imperial => val * MPH_TO_MPS, // mph to m/s
        }
    }

    pub fn temperature_to_metric(val: f64, units: UnitSystem) -> f64 {
        match units {
            UnitSystem::Metric => val,
            UnitSystem::Imperial => (val - 32.0) * 5.0 / 9.0, // °F to °C
        }
    }

    pub fn pressure_to_metric(val: f64, units: UnitSystem) -> f64 {
        match units {
            UnitSystem::Metric => val,
            UnitSystem::Imperial => val * INHG_TO_HPA, // inHg to hPa
        }
    }

    // Output conversions (from metric)
    pub fn velocity_from_metric(val: f64, units: UnitSystem) -> f64 {
        match units {
            UnitSystem::Metric => val,
            UnitSystem::Imperial => val / FEET_TO_METERS, // m/s to fps
        }
    }

    pub fn distance_from_metric(val: f64, units: UnitSystem) -> f64 {
        match units {
            UnitSystem::Metric => val,
            UnitSystem::Imperial => val / YARDS_TO_METERS, // meters to yards
        }
    }

    pub fn offset_from_metric(val: f64, units: UnitSystem) -> f64 {
        match units {
            UnitSystem::Metric => val,
            UnitSystem::Imperial => val / INCHES_TO_METERS, // meters to inches
        }
    }

    pub fn energy_from_metric(val: f64, units: UnitSystem) -> f64 {
        match units {
            UnitSystem::Metric => val,
            UnitSystem::Imperial => val * JOULES_TO_FTLBF, // J to ft·lbf
        }
    }
}

/// Shot inputs in US customary units
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImperialShotParameters {
    pub ballistic_coefficient: f64,
    pub bullet_weight_grains: f64,
    pub bullet_diameter_in: f64,
    pub muzzle_velocity_fps: f64,
    pub sight_height_in: f64,
    pub zero_distance_yd: f64,
    pub target_distance_yd: f64,
    pub target_radius_in: f64,
    pub wind_speed_mph: f64,
    pub wind_direction_deg: f64,
    pub temperature_f: f64,
    pub pressure_inhg: f64,
    pub relative_humidity_percent: f64,
    pub drag_model: DragModel,
}

impl From<ImperialShotParameters> for ShotParameters {
    fn from(p: ImperialShotParameters) -> Self {
        let units = UnitSystem::Imperial;
        ShotParameters {
            ballistic_coefficient: p.ballistic_coefficient,
            bullet_mass_kg: UnitConverter::mass_to_metric(p.bullet_weight_grains, units),
            bullet_diameter_mm: UnitConverter::offset_to_metric(p.bullet_diameter_in, units) * 1000.0,
            muzzle_velocity: UnitConverter::velocity_to_metric(p.muzzle_velocity_fps, units),
            sight_height: UnitConverter::offset_to_metric(p.sight_height_in, units),
            zero_distance: UnitConverter::distance_to_metric(p.zero_distance_yd, units),
            target_distance: UnitConverter::distance_to_metric(p.target_distance_yd, units),
            target_radius: UnitConverter::offset_to_metric(p.target_radius_in, units),
            wind_speed: UnitConverter::wind_speed_to_metric(p.wind_speed_mph, units),
            wind_direction_deg: p.wind_direction_deg,
            temperature_c: UnitConverter::temperature_to_metric(p.temperature_f, units),
            pressure_hpa: UnitConverter::pressure_to_metric(p.pressure_inhg, units),
            relative_humidity_percent: p.relative_humidity_percent,
            drag_model: p.drag_model,
            ..ShotParameters::default()
        }
    }
}

// Angular units

/// Radians to minutes of angle
pub fn radians_to_moa(rad: f64) -> f64 {
    rad.to_degrees() * 60.0
}

pub fn moa_to_radians(moa: f64) -> f64 {
    (moa / 60.0).to_radians()
}

/// Radians to milliradians
pub fn radians_to_mil(rad: f64) -> f64 {
    rad * 1000.0
}

pub fn mil_to_radians(mil: f64) -> f64 {
    mil / 1000.0
}

/// Angle subtended by an offset at a distance, in MOA (sign follows `offset`)
pub fn drop_to_moa(offset: f64, distance: f64) -> f64 {
    radians_to_moa(offset.atan2(distance))
}

/// Angle subtended by an offset at a distance, in mil
pub fn drop_to_mil(offset: f64, distance: f64) -> f64 {
    radians_to_mil(offset.atan2(distance))
}

/// Linear size of one MOA at a distance, in the distance's unit
pub fn moa_at_distance(distance: f64) -> f64 {
    distance * moa_to_radians(1.0).tan()
}

/// A [`ShotResult`] converted for display
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShotReport {
    pub units: UnitSystem,
    pub range: f64,
    pub vertical_drop: f64,
    pub windage: f64,
    /// Angular correction that cancels the drop (MOA, positive = up)
    pub elevation_moa: f64,
    /// Angular correction that cancels the windage (MOA, positive = right)
    pub windage_moa: f64,
    pub elevation_mil: f64,
    pub windage_mil: f64,
    pub time_of_flight: f64,
    pub impact_velocity: f64,
    pub impact_energy: f64,
    pub zero_angle_moa: f64,
    pub confidence: Confidence,
    pub termination: Termination,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub samples: Vec<TrajectorySample>,
}

impl ShotResult {
    /// Convert lengths, speeds and energies to `units`.
    ///
    /// Angular corrections are unit-independent and computed from the SI values.
    pub fn in_units(&self, units: UnitSystem) -> ShotReport {
        let samples = self
            .samples
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(|s| TrajectorySample {
                range: UnitConverter::distance_from_metric(s.range, units),
                drop: UnitConverter::offset_from_metric(s.drop, units),
                windage: UnitConverter::offset_from_metric(s.windage, units),
                velocity: UnitConverter::velocity_from_metric(s.velocity, units),
                time: s.time,
                energy: UnitConverter::energy_from_metric(s.energy, units),
            })
            .collect();

        ShotReport {
            units,
            range: UnitConverter::distance_from_metric(self.range, units),
            vertical_drop: UnitConverter::offset_from_metric(self.vertical_drop, units),
            windage: UnitConverter::offset_from_metric(self.windage, units),
            elevation_moa: -drop_to_moa(self.vertical_drop, self.range),
            windage_moa: -drop_to_moa(self.windage, self.range),
            elevation_mil: -drop_to_mil(self.vertical_drop, self.range),
            windage_mil: -drop_to_mil(self.windage, self.range),
            time_of_flight: self.time_of_flight,
            impact_velocity: UnitConverter::velocity_from_metric(self.impact_velocity, units),
            impact_energy: UnitConverter::energy_from_metric(self.impact_energy, units),
            zero_angle_moa: radians_to_moa(self.zero_angle_rad),
            confidence: self.confidence,
            termination: self.termination,
            samples,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_metric_passthrough() {
        let m = UnitSystem::Metric;
        assert_eq!(UnitConverter::velocity_to_metric(850.0, m), 850.0);
        assert_eq!(UnitConverter::distance_from_metric(900.0, m), 900.0);
        assert_eq!(UnitConverter::temperature_to_metric(-5.0, m), -5.0);
    }

    #[test]
    fn test_imperial_factors() {
        let i = UnitSystem::Imperial;
        assert_relative_eq!(UnitConverter::velocity_to_metric(2800.0, i), 853.44, epsilon = 1e-9);
        assert_relative_eq!(UnitConverter::mass_to_metric(180.0, i), 0.011663804, epsilon = 1e-9);
        assert_relative_eq!(UnitConverter::distance_to_metric(1000.0, i), 914.4, epsilon = 1e-9);
        assert_relative_eq!(UnitConverter::temperature_to_metric(59.0, i), 15.0, epsilon = 1e-12);
        assert_relative_eq!(UnitConverter::pressure_to_metric(29.92, i), 1013.21, epsilon = 0.01);
        assert_relative_eq!(UnitConverter::wind_speed_to_metric(10.0, i), 4.4704, epsilon = 1e-12);
        assert_relative_eq!(UnitConverter::offset_from_metric(0.0254, i), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_velocity_round_trip() {
        let i = UnitSystem::Imperial;
        let fps = UnitConverter::velocity_from_metric(UnitConverter::velocity_to_metric(3000.0, i), i);
        assert_relative_eq!(fps, 3000.0, epsilon = 1e-9);
    }

    #[test]
    fn test_moa() {
        assert_relative_eq!(radians_to_moa(std::f64::consts::PI / 180.0), 60.0, epsilon = 1e-9);
        assert_relative_eq!(moa_to_radians(60.0), std::f64::consts::PI / 180.0, epsilon = 1e-15);
        // 1 MOA is about 1.047 in at 100 yd, 2.909 cm at 100 m
        assert_relative_eq!(moa_at_distance(100.0 * 36.0), 1.047, epsilon = 1e-3);
        assert_relative_eq!(moa_at_distance(100.0), 0.02909, epsilon = 1e-5);
        assert_relative_eq!(drop_to_moa(moa_at_distance(300.0), 300.0), 1.0, epsilon = 1e-9);
        assert!(drop_to_moa(-0.5, 300.0) < 0.0);
    }

    #[test]
    fn test_mil() {
        assert_eq!(radians_to_mil(0.002), 2.0);
        assert_eq!(mil_to_radians(2.0), 0.002);
        assert_relative_eq!(drop_to_mil(0.1, 100.0), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_imperial_parameters_into_metric() {
        let imperial = ImperialShotParameters {
            ballistic_coefficient: 0.462,
            bullet_weight_grains: 168.0,
            bullet_diameter_in: 0.308,
            muzzle_velocity_fps: 2650.0,
            sight_height_in: 1.5,
            zero_distance_yd: 100.0,
            target_distance_yd: 600.0,
            target_radius_in: 6.0,
            wind_speed_mph: 10.0,
            wind_direction_deg: 270.0,
            temperature_f: 59.0,
            pressure_inhg: 29.92,
            relative_humidity_percent: 50.0,
            drag_model: DragModel::G7,
        };
        let p: ShotParameters = imperial.into();
        assert!(p.validate().is_ok());
        assert_relative_eq!(p.muzzle_velocity, 807.72, epsilon = 1e-9);
        assert_relative_eq!(p.bullet_mass_grains(), 168.0, epsilon = 1e-9);
        assert_relative_eq!(p.bullet_diameter_mm, 7.8232, epsilon = 1e-9);
        assert_relative_eq!(p.sight_height, 0.0381, epsilon = 1e-12);
        assert_relative_eq!(p.zero_distance, 91.44, epsilon = 1e-9);
        assert_relative_eq!(p.target_distance, 548.64, epsilon = 1e-9);
        assert_relative_eq!(p.wind_speed, 4.4704, epsilon = 1e-12);
        assert_relative_eq!(p.temperature_c, 15.0, epsilon = 1e-12);
        assert_eq!(p.wind_direction_deg, 270.0);
        assert_eq!(p.drag_model, DragModel::G7);
    }

    fn sample_result() -> ShotResult {
        ShotResult {
            range: 400.0,
            vertical_drop: -0.8,
            windage: -0.46,
            time_of_flight: 0.54,
            impact_velocity: 600.0,
            impact_energy: 1750.0,
            zero_angle_rad: 0.001,
            confidence: Confidence::Exact,
            termination: Termination::ReachedTarget,
            samples: Some(vec![TrajectorySample {
                range: 91.44,
                drop: 0.0254,
                windage: 0.0,
                velocity: 304.8,
                time: 0.1,
                energy: 100.0,
            }]),
        }
    }

    #[test]
    fn test_report_imperial() {
        let report = sample_result().in_units(UnitSystem::Imperial);
        assert_relative_eq!(report.range, 400.0 / 0.9144, epsilon = 1e-9);
        assert_relative_eq!(report.vertical_drop, -0.8 / 0.0254, epsilon = 1e-9);
        assert_relative_eq!(report.impact_velocity, 600.0 / 0.3048, epsilon = 1e-9);
        assert_relative_eq!(report.impact_energy, 1750.0 * JOULES_TO_FTLBF, epsilon = 1e-9);

        let s = &report.samples[0];
        assert_relative_eq!(s.range, 100.0, epsilon = 1e-9);
        assert_relative_eq!(s.drop, 1.0, epsilon = 1e-9);
        assert_relative_eq!(s.velocity, 1000.0, epsilon = 1e-9);
        assert_eq!(s.time, 0.1);
    }

    #[test]
    fn test_report_corrections_do_not_depend_on_units() {
        let result = sample_result();
        let metric = result.in_units(UnitSystem::Metric);
        let imperial = result.in_units(UnitSystem::Imperial);
        assert_eq!(metric.elevation_moa, imperial.elevation_moa);
        // Below the line of sight needs an upward correction
        assert!(metric.elevation_moa > 0.0);
        // Pushed left needs a correction to the right
        assert!(metric.windage_moa > 0.0);
        assert_relative_eq!(metric.elevation_mil, 2.0, epsilon = 1e-3);
    }

    #[test]
    fn test_report_without_samples() {
        let mut result = sample_result();
        result.samples = None;
        assert!(result.in_units(UnitSystem::Metric).samples.is_empty());
    }
}
