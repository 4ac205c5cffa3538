//! Physical constants used in ballistics calculations

/// Gravitational acceleration in m/s²
pub const G_ACCEL_MPS2: f64 = 9.80665;

/// Reference air density the ballistic coefficient is normalized to (kg/m³)
pub const STANDARD_AIR_DENSITY: f64 = 1.225;

/// Drag coefficient to retardation conversion constant, imperial form (1/ft)
///
/// Value: π · ρ₀ / (8 · 144) with ρ₀ = 0.076474 lb/ft³, the sea-level density
/// the G-function tables are referenced to. With a BC in lb/in² this gives
/// retardation in ft/s² as `CD_TO_RETARD * Cd * v_fps² / BC`.
pub const CD_TO_RETARD: f64 = 2.08551e-4;

/// Same constant with the length unit converted to meters (1/m)
pub const CD_TO_RETARD_PER_M: f64 = CD_TO_RETARD / FEET_TO_METERS;

/// Specific gas constant for dry air (J/(kg·K))
pub const R_DRY_AIR: f64 = 287.05;

/// Specific gas constant for water vapor (J/(kg·K))
pub const R_WATER_VAPOR: f64 = 461.5;

/// Isobaric specific heat of dry air (J/(kg·K))
pub const CP_DRY_AIR: f64 = 1005.0;

/// Isobaric specific heat of water vapor (J/(kg·K))
pub const CP_WATER_VAPOR: f64 = 1850.0;

/// Offset between Celsius and Kelvin
pub const CELSIUS_TO_KELVIN: f64 = 273.15;

// Unit conversions

/// Conversion factor: feet to meters
pub const FEET_TO_METERS: f64 = 0.3048;

/// Conversion factor: grains to kilograms
pub const GRAINS_TO_KG: f64 = 0.00006479891;

/// Conversion factor: yards to meters
pub const YARDS_TO_METERS: f64 = 0.9144;

/// Conversion factor: inches to meters
pub const INCHES_TO_METERS: f64 = 0.0254;

/// Conversion factor: miles per hour to meters per second
pub const MPH_TO_MPS: f64 = 0.44704;

/// Conversion factor: inches of mercury to hectopascals
pub const INHG_TO_HPA: f64 = 33.8639;

/// Conversion factor: joules to foot-pounds force
pub const JOULES_TO_FTLBF: f64 = 0.737562149;

// Numerical stability constants

/// Relative air speed below which the direction of drag is undefined and a
/// run is ended (m/s)
pub const MIN_VELOCITY_THRESHOLD: f64 = 1e-3;

/// Minimum threshold for preventing division by zero in general calculations
pub const MIN_DIVISION_THRESHOLD: f64 = 1e-12;

/// Upper bound on simulated flight time for a single run (s)
pub const MAX_FLIGHT_TIME_S: f64 = 20.0;

/// Default integration step (s)
pub const DEFAULT_TIME_STEP_S: f64 = 5e-4;

/// Smallest accepted spacing between trajectory table rows (m)
pub const MIN_SAMPLE_INTERVAL_M: f64 = 0.1;

// Zero finding constants

/// Initial symmetric bisection bound for the zero angle (rad)
pub const ZERO_ANGLE_INITIAL_BOUND: f64 = 0.1;

/// Widest symmetric bound tried before giving up on bracketing (rad)
pub const ZERO_ANGLE_MAX_BOUND: f64 = std::f64::consts::FRAC_PI_4;

/// Bracket width at which bisection is considered converged (rad)
pub const ZERO_ANGLE_TOLERANCE: f64 = 1e-9;

/// Height error at the zero distance accepted as an exact hit (m)
pub const ZERO_HEIGHT_TOLERANCE: f64 = 1e-7;

/// Iteration cap for the bisection
pub const ZERO_FINDING_MAX_ITER: usize = 100;
