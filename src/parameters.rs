//! Shot input record, its defaults, and validation.

use serde::{Deserialize, Serialize};

use crate::constants::GRAINS_TO_KG;
use crate::error::BallisticsError;
use crate::wind::Wind;
use crate::DragModel;

/// Input parameters for one shot.
///
/// SI units throughout, angles in degrees. `altitude_m`, `barrel_twist_mm` and
/// `shooting_angle_deg` are carried for display and are not read by the
/// solver; pressure is taken as the absolute station pressure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShotParameters {
    /// G-model ballistic coefficient (lb/in²)
    pub ballistic_coefficient: f64,
    pub bullet_mass_kg: f64,
    pub bullet_diameter_mm: f64,
    /// Muzzle velocity (m/s)
    pub muzzle_velocity: f64,
    /// Height of the line of sight above the bore axis (m)
    pub sight_height: f64,
    /// Distance at which the line of sight and trajectory cross (m)
    pub zero_distance: f64,
    pub target_distance: f64,
    /// Display only
    pub target_radius: f64,
    /// Wind speed (m/s)
    pub wind_speed: f64,
    /// Bearing the wind blows from, clockwise from the line of fire
    pub wind_direction_deg: f64,
    pub temperature_c: f64,
    pub pressure_hpa: f64,
    pub relative_humidity_percent: f64,
    pub drag_model: DragModel,
    pub altitude_m: f64,
    pub barrel_twist_mm: f64,
    pub shooting_angle_deg: f64,
}

impl Default for ShotParameters {
    fn default() -> Self {
        Self {
            ballistic_coefficient: 0.415,
            bullet_mass_kg: 150.0 * GRAINS_TO_KG,
            bullet_diameter_mm: 7.82,
            muzzle_velocity: 900.0,
            sight_height: 0.05,
            zero_distance: 100.0,
            target_distance: 400.0,
            target_radius: 0.5,
            wind_speed: 5.0,
            wind_direction_deg: 90.0,
            temperature_c: 15.0,
            pressure_hpa: 1013.2,
            relative_humidity_percent: 50.0,
            drag_model: DragModel::G1,
            altitude_m: 200.0,
            barrel_twist_mm: 177.8,
            shooting_angle_deg: 0.0,
        }
    }
}

impl ShotParameters {
    /// Set the bullet mass from grains
    pub fn with_mass_grains(mut self, grains: f64) -> Self {
        self.bullet_mass_kg = grains * GRAINS_TO_KG;
        self
    }

    pub fn bullet_mass_grains(&self) -> f64 {
        self.bullet_mass_kg / GRAINS_TO_KG
    }

    pub fn bullet_diameter_m(&self) -> f64 {
        self.bullet_diameter_mm / 1000.0
    }

    pub fn wind(&self) -> Wind {
        Wind::new(self.wind_speed, self.wind_direction_deg)
    }

    /// Check every field the solver reads.
    ///
    /// Returns the first offending field.
    pub fn validate(&self) -> Result<(), BallisticsError> {
        positive("ballistic_coefficient", self.ballistic_coefficient)?;
        positive("bullet_mass_kg", self.bullet_mass_kg)?;
        positive("bullet_diameter_mm", self.bullet_diameter_mm)?;
        positive("muzzle_velocity", self.muzzle_velocity)?;
        non_negative("sight_height", self.sight_height)?;
        positive("zero_distance", self.zero_distance)?;
        positive("target_distance", self.target_distance)?;
        non_negative("target_radius", self.target_radius)?;
        non_negative("wind_speed", self.wind_speed)?;
        within("wind_direction_deg", self.wind_direction_deg, 0.0, 360.0)?;
        finite("temperature_c", self.temperature_c)?;
        positive("pressure_hpa", self.pressure_hpa)?;
        within(
            "relative_humidity_percent",
            self.relative_humidity_percent,
            0.0,
            100.0,
        )?;
        Ok(())
    }
}

fn finite(field: &'static str, value: f64) -> Result<(), BallisticsError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(BallisticsError::validation(field, format!("must be finite, got {value}")))
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), BallisticsError> {
    finite(field, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(BallisticsError::validation(field, format!("must be positive, got {value}")))
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<(), BallisticsError> {
    finite(field, value)?;
    if value >= 0.0 {
        Ok(())
    } else {
        Err(BallisticsError::validation(field, format!("must not be negative, got {value}")))
    }
}

fn within(field: &'static str, value: f64, min: f64, max: f64) -> Result<(), BallisticsError> {
    finite(field, value)?;
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(BallisticsError::validation(
            field,
            format!("must be between {min} and {max}, got {value}"),
        ))
    }
}

/// `(field_name, display_label, unit)` for every input field, in display order
pub const FIELD_LABELS: [(&str, &str, &str); 17] = [
    ("ballistic_coefficient", "Ballistic coefficient", "lb/in²"),
    ("bullet_mass_kg", "Bullet weight", "kg"),
    ("bullet_diameter_mm", "Bullet diameter", "mm"),
    ("muzzle_velocity", "Muzzle velocity", "m/s"),
    ("sight_height", "Scope height", "m"),
    ("zero_distance", "Zero distance", "m"),
    ("target_distance", "Target distance", "m"),
    ("target_radius", "Target radius", "m"),
    ("wind_speed", "Wind speed", "m/s"),
    ("wind_direction_deg", "Wind direction", "deg"),
    ("altitude_m", "Altitude", "m"),
    ("pressure_hpa", "Pressure", "hPa"),
    ("temperature_c", "Temperature", "°C"),
    ("relative_humidity_percent", "Humidity", "%"),
    ("barrel_twist_mm", "Barrel twist", "mm"),
    ("shooting_angle_deg", "Shooting angle", "deg"),
    ("drag_model", "Drag model", ""),
];

/// Display label and unit for a field name
pub fn field_label(field: &str) -> Option<(&'static str, &'static str)> {
    FIELD_LABELS
        .iter()
        .find(|(name, _, _)| *name == field)
        .map(|&(_, label, unit)| (label, unit))
}
