//! Top-level solve: validate, derive the atmosphere, zero, fly to the target.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::angle_calculations::{self, ZeroSolution};
use crate::atmosphere::{calculate_atmosphere, AtmosphericState};
use crate::constants::{DEFAULT_TIME_STEP_S, MIN_SAMPLE_INTERVAL_M, ZERO_FINDING_MAX_ITER};
use crate::derivatives::{BallisticCoefficientDrag, DragLaw, DragLawKind, FlightEnvironment, SectionalDrag};
use crate::drag::{drag_table_for, DragTable};
use crate::error::BallisticsError;
use crate::integrator::{integrate_to_distance, FlightOutcome, IntegrationMethod, ProjectileState, Termination};
use crate::parameters::ShotParameters;
use crate::trajectory_sampling::{TrajectorySample, TrajectorySampler};
use crate::wind::Wind;

/// Numerical settings for a solve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverOptions {
    /// Integration step (s)
    pub time_step: f64,
    pub method: IntegrationMethod,
    pub drag_law: DragLawKind,
    /// Bisection iteration cap for the zero search
    pub max_zero_iterations: usize,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            time_step: DEFAULT_TIME_STEP_S,
            method: IntegrationMethod::Rk4,
            drag_law: DragLawKind::BallisticCoefficient,
            max_zero_iterations: ZERO_FINDING_MAX_ITER,
        }
    }
}

impl SolverOptions {
    pub fn validate(&self) -> Result<(), BallisticsError> {
        if !self.time_step.is_finite() || self.time_step <= 0.0 || self.time_step > 0.01 {
            return Err(BallisticsError::validation(
                "time_step",
                format!("must be in (0, 0.01] s, got {}", self.time_step),
            ));
        }
        if self.max_zero_iterations == 0 {
            return Err(BallisticsError::validation(
                "max_zero_iterations",
                "must be at least 1",
            ));
        }
        Ok(())
    }
}

/// Whether the zero angle met its tolerance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Confidence {
    Exact,
    /// The bisection hit its iteration cap; the angle is the last midpoint
    Reduced,
}

/// Outcome of a solve.
///
/// Offsets are relative to the line of sight: `vertical_drop` negative below
/// it, `windage` positive to the shooter's right.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShotResult {
    /// Downrange distance the values refer to (m)
    pub range: f64,
    pub vertical_drop: f64,
    pub windage: f64,
    pub time_of_flight: f64,
    pub impact_velocity: f64,
    pub impact_energy: f64,
    pub zero_angle_rad: f64,
    pub confidence: Confidence,
    pub termination: Termination,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub samples: Option<Vec<TrajectorySample>>,
}

/// Solver bound to one validated parameter set
pub struct ShotSolver {
    params: ShotParameters,
    options: SolverOptions,
    atmosphere: AtmosphericState,
    custom_table: Option<DragTable>,
    drag_law: Box<dyn DragLaw>,
}

impl ShotSolver {
    /// Validate the inputs and derive the atmosphere.
    pub fn new(params: ShotParameters, options: SolverOptions) -> Result<Self, BallisticsError> {
        params.validate()?;
        options.validate()?;

        let atmosphere = calculate_atmosphere(
            params.temperature_c,
            params.pressure_hpa,
            params.relative_humidity_percent,
        );
        log::debug!(
            "atmosphere: density {:.5} kg/m³, speed of sound {:.2} m/s",
            atmosphere.air_density,
            atmosphere.speed_of_sound
        );

        let drag_law: Box<dyn DragLaw> = match options.drag_law {
            DragLawKind::BallisticCoefficient => Box::new(BallisticCoefficientDrag {
                ballistic_coefficient: params.ballistic_coefficient,
            }),
            DragLawKind::Sectional => Box::new(SectionalDrag::from_caliber(
                params.bullet_diameter_m(),
                params.bullet_mass_kg,
            )),
        };
        log::debug!("drag model {}, {} drag law", params.drag_model, drag_law.name());

        Ok(Self {
            params,
            options,
            atmosphere,
            custom_table: None,
            drag_law,
        })
    }

    /// Use `table` in place of the built-in curve of the selected drag model
    pub fn with_drag_table(mut self, table: DragTable) -> Self {
        self.custom_table = Some(table);
        self
    }

    pub fn parameters(&self) -> &ShotParameters {
        &self.params
    }

    pub fn options(&self) -> &SolverOptions {
        &self.options
    }

    pub fn atmosphere(&self) -> AtmosphericState {
        self.atmosphere
    }

    pub fn drag_table(&self) -> Option<&DragTable> {
        match &self.custom_table {
            Some(table) => Some(table),
            None => drag_table_for(self.params.drag_model),
        }
    }

    fn environment(&self, wind: &Wind) -> FlightEnvironment<'_> {
        FlightEnvironment {
            atmosphere: self.atmosphere,
            drag_table: self.drag_table(),
            drag_law: self.drag_law.as_ref(),
            wind: wind.vector(),
        }
    }

    fn muzzle_state(&self, elevation_rad: f64) -> ProjectileState {
        ProjectileState::at_muzzle(self.params.muzzle_velocity, elevation_rad, self.params.sight_height)
    }

    /// One integration run from the muzzle at `elevation_rad` to `distance`
    pub fn fly(&self, elevation_rad: f64, distance: f64, wind: Wind) -> FlightOutcome {
        let env = self.environment(&wind);
        integrate_to_distance(
            self.muzzle_state(elevation_rad),
            distance,
            self.options.time_step,
            self.options.method,
            &env,
            |_, _| {},
        )
    }

    /// Elevation that puts the windless trajectory on the line of sight at
    /// the zero distance
    pub fn zero_angle(&self) -> Result<ZeroSolution, BallisticsError> {
        let zero_distance = self.params.zero_distance;
        angle_calculations::zero_angle(
            |angle| self.fly(angle, zero_distance, Wind::calm()).state.position.y,
            zero_distance,
            self.options.max_zero_iterations,
        )
    }

    /// Drop, windage and time of flight at the target distance
    pub fn solve(&self) -> Result<ShotResult, BallisticsError> {
        self.solve_with(None)
    }

    /// Same as [`ShotSolver::solve`], with samples every `interval` meters
    /// from the muzzle and one at the target distance.
    ///
    /// Intervals below [`MIN_SAMPLE_INTERVAL_M`] are rejected.
    pub fn trajectory_table(&self, interval: f64) -> Result<ShotResult, BallisticsError> {
        if !interval.is_finite() || interval < MIN_SAMPLE_INTERVAL_M {
            return Err(BallisticsError::validation(
                "interval",
                format!("must be at least {MIN_SAMPLE_INTERVAL_M} m, got {interval}"),
            ));
        }
        self.solve_with(Some(interval))
    }

    fn solve_with(&self, interval: Option<f64>) -> Result<ShotResult, BallisticsError> {
        let zero = self.zero_angle()?;
        let confidence = if zero.converged {
            Confidence::Exact
        } else {
            Confidence::Reduced
        };
        log::debug!(
            "zero angle {:.6} rad after {} iterations (error {:.2e} m)",
            zero.angle_rad,
            zero.iterations_used,
            zero.final_error
        );

        let target = self.params.target_distance;
        let mass = self.params.bullet_mass_kg;
        let initial = self.muzzle_state(zero.angle_rad);
        let env = self.environment(&self.params.wind());
        let dt = self.options.time_step;
        let method = self.options.method;

        let (outcome, samples) = match interval {
            Some(interval) => {
                let mut sampler = TrajectorySampler::new(&initial, interval, target, mass);
                let outcome = integrate_to_distance(initial, target, dt, method, &env, |prev, next| {
                    sampler.observe(prev, next)
                });
                let samples = sampler.finish(&outcome);
                (outcome, Some(samples))
            }
            None => (
                integrate_to_distance(initial, target, dt, method, &env, |_, _| {}),
                None,
            ),
        };

        if !outcome.termination.reached_target() {
            log::warn!(
                "flight ended at {:.1} m before the {:.1} m target: {}",
                outcome.state.range(),
                target,
                outcome.termination
            );
        }

        let impact_velocity = outcome.state.speed();
        Ok(ShotResult {
            range: outcome.state.range(),
            vertical_drop: outcome.state.position.y,
            windage: outcome.state.position.z,
            time_of_flight: outcome.state.time,
            impact_velocity,
            impact_energy: 0.5 * mass * impact_velocity * impact_velocity,
            zero_angle_rad: zero.angle_rad,
            confidence,
            termination: outcome.termination,
            samples,
        })
    }
}

/// Solve independent parameter sets in parallel, one result per input
pub fn solve_batch(
    params: &[ShotParameters],
    options: &SolverOptions,
) -> Vec<Result<ShotResult, BallisticsError>> {
    params
        .par_iter()
        .map(|p| ShotSolver::new(p.clone(), *options)?.solve())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DragModel;

    fn calm_params() -> ShotParameters {
        ShotParameters {
            wind_speed: 0.0,
            ..ShotParameters::default()
        }
    }

    #[test]
    fn test_new_rejects_invalid_parameters() {
        let params = ShotParameters {
            muzzle_velocity: -1.0,
            ..ShotParameters::default()
        };
        let err = ShotSolver::new(params, SolverOptions::default()).err().unwrap();
        assert!(matches!(
            err,
            BallisticsError::Validation { field: "muzzle_velocity", .. }
        ));
    }

    #[test]
    fn test_new_rejects_invalid_options() {
        let options = SolverOptions {
            time_step: 0.0,
            ..SolverOptions::default()
        };
        assert!(ShotSolver::new(ShotParameters::default(), options).is_err());

        let options = SolverOptions {
            max_zero_iterations: 0,
            ..SolverOptions::default()
        };
        assert!(ShotSolver::new(ShotParameters::default(), options).is_err());
    }

    #[test]
    fn test_solve_default_scenario() {
        let solver = ShotSolver::new(calm_params(), SolverOptions::default()).unwrap();
        let result = solver.solve().unwrap();
        assert_eq!(result.termination, Termination::ReachedTarget);
        assert_eq!(result.confidence, Confidence::Exact);
        assert_eq!(result.range, 400.0);
        assert!(result.vertical_drop < -0.5 && result.vertical_drop > -1.2);
        assert!(result.windage.abs() < 1e-9);
        assert!(result.time_of_flight > 0.4 && result.time_of_flight < 0.7);
        assert!(result.impact_velocity < 900.0);
        assert!(result.samples.is_none());
    }

    #[test]
    fn test_reduced_confidence() {
        let options = SolverOptions {
            max_zero_iterations: 3,
            ..SolverOptions::default()
        };
        let solver = ShotSolver::new(calm_params(), options).unwrap();
        let result = solver.solve().unwrap();
        assert_eq!(result.confidence, Confidence::Reduced);
        assert_eq!(result.termination, Termination::ReachedTarget);
    }

    #[test]
    fn test_trajectory_table() {
        let solver = ShotSolver::new(ShotParameters::default(), SolverOptions::default()).unwrap();
        let table = solver.trajectory_table(75.0).unwrap();
        let samples = table.samples.as_ref().unwrap();
        let ranges: Vec<f64> = samples.iter().map(|s| s.range).collect();
        assert_eq!(ranges, vec![0.0, 75.0, 150.0, 225.0, 300.0, 375.0, 400.0]);

        // Muzzle row
        assert_eq!(samples[0].drop, -0.05);
        assert_eq!(samples[0].time, 0.0);
        assert!((samples[0].velocity - 900.0).abs() < 1e-9);

        // Last row matches the point solve
        let point = solver.solve().unwrap();
        let last = samples.last().unwrap();
        assert!((last.drop - point.vertical_drop).abs() < 1e-12);
        assert!((last.windage - point.windage).abs() < 1e-12);
        assert_eq!(table.vertical_drop, point.vertical_drop);
    }

    #[test]
    fn test_trajectory_table_rejects_bad_interval() {
        let solver = ShotSolver::new(ShotParameters::default(), SolverOptions::default()).unwrap();
        assert!(solver.trajectory_table(0.0).is_err());
        assert!(solver.trajectory_table(0.01).is_err());
        assert!(solver.trajectory_table(f64::NAN).is_err());
    }

    #[test]
    fn test_custom_table_equal_to_builtin() {
        let g1 = drag_table_for(DragModel::G1).unwrap().clone();
        let builtin = ShotSolver::new(calm_params(), SolverOptions::default()).unwrap();
        let custom = ShotSolver::new(calm_params(), SolverOptions::default())
            .unwrap()
            .with_drag_table(g1);
        assert_eq!(builtin.solve().unwrap(), custom.solve().unwrap());
    }

    #[test]
    fn test_no_drag_has_no_table() {
        let params = ShotParameters {
            drag_model: DragModel::None,
            ..calm_params()
        };
        let solver = ShotSolver::new(params, SolverOptions::default()).unwrap();
        assert!(solver.drag_table().is_none());
    }

    #[test]
    fn test_solve_batch_preserves_order() {
        let inputs = vec![
            calm_params(),
            ShotParameters {
                ballistic_coefficient: -1.0,
                ..calm_params()
            },
            ShotParameters {
                target_distance: 200.0,
                ..calm_params()
            },
        ];
        let results = solve_batch(&inputs, &SolverOptions::default());
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].as_ref().unwrap().range, 400.0);
        assert!(results[1].is_err());
        assert_eq!(results[2].as_ref().unwrap().range, 200.0);
    }

    #[test]
    fn test_options_serde_defaults() {
        let options: SolverOptions = serde_json::from_str(r#"{"method": "Euler"}"#).unwrap();
        assert_eq!(options.method, IntegrationMethod::Euler);
        assert_eq!(options.time_step, DEFAULT_TIME_STEP_S);
        assert_eq!(options.drag_law, DragLawKind::BallisticCoefficient);
    }
}
