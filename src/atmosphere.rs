//! Atmospheric calculations for ballistics.
//!
//! Derives moist-air density and the local speed of sound from temperature,
//! absolute pressure and relative humidity.

use serde::{Deserialize, Serialize};

use crate::constants::{CELSIUS_TO_KELVIN, CP_DRY_AIR, CP_WATER_VAPOR, R_DRY_AIR, R_WATER_VAPOR};

/// Lowest temperature the model accepts (°C).
///
/// The Magnus formula has a pole at -243.5 °C; inputs below this floor are
/// clamped to it.
pub const MIN_TEMPERATURE_C: f64 = -100.0;

/// Air properties shared by every integration run of one solve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AtmosphericState {
    /// Moist-air density (kg/m³)
    pub air_density: f64,
    /// Local speed of sound (m/s)
    pub speed_of_sound: f64,
}

/// Saturation vapor pressure over water, Magnus approximation.
///
/// # Arguments
/// * `temp_c` - Temperature in Celsius
///
/// # Returns
/// Saturation vapor pressure in Pa
#[inline]
pub fn saturation_vapor_pressure(temp_c: f64) -> f64 {
    let temp_c = temp_c.max(MIN_TEMPERATURE_C);
    611.2 * ((17.67 * temp_c) / (temp_c + 243.5)).exp()
}

/// Air density and speed of sound for the given conditions.
///
/// Density is the sum of the dry-air and water-vapor partial densities. The
/// speed of sound uses the gas constant and heat capacity ratio of the mixture,
/// weighted by mass fraction.
///
/// # Arguments
/// * `temp_c` - Temperature in Celsius (clamped to `MIN_TEMPERATURE_C`)
/// * `pressure_hpa` - Absolute pressure in hPa
/// * `humidity_percent` - Relative humidity (0-100)
pub fn calculate_atmosphere(temp_c: f64, pressure_hpa: f64, humidity_percent: f64) -> AtmosphericState {
    let temp_c = temp_c.max(MIN_TEMPERATURE_C);
    let temp_k = temp_c + CELSIUS_TO_KELVIN;
    let pressure_pa = pressure_hpa * 100.0;
    let rh = (humidity_percent / 100.0).clamp(0.0, 1.0);

    // Partial pressures
    let vapor_pressure_pa = rh * saturation_vapor_pressure(temp_c);
    let dry_pressure_pa = (pressure_pa - vapor_pressure_pa).max(0.0);

    // Partial densities
    let dry_density = dry_pressure_pa / (R_DRY_AIR * temp_k);
    let vapor_density = vapor_pressure_pa / (R_WATER_VAPOR * temp_k);
    let air_density = dry_density + vapor_density;

    if air_density <= 0.0 {
        // Vacuum: no mixture to weight, fall back to dry air properties
        let gamma = CP_DRY_AIR / (CP_DRY_AIR - R_DRY_AIR);
        return AtmosphericState {
            air_density: 0.0,
            speed_of_sound: (gamma * R_DRY_AIR * temp_k).sqrt(),
        };
    }

    // Mass fractions
    let w_dry = dry_density / air_density;
    let w_vapor = vapor_density / air_density;

    // Mixture properties
    let r_mix = w_dry * R_DRY_AIR + w_vapor * R_WATER_VAPOR;
    let cp = w_dry * CP_DRY_AIR + w_vapor * CP_WATER_VAPOR;
    let cv = cp - r_mix;
    let gamma = cp / cv;

    AtmosphericState {
        air_density,
        speed_of_sound: (gamma * r_mix * temp_k).sqrt(),
    }
}
