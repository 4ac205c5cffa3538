//! # Ballistics Solver
//!
//! Point-mass trajectory solver for small-arms projectiles: moist-air
//! atmosphere, G1/G7 drag tables, zero-angle search and fixed-step
//! integration under gravity, drag and constant wind.
//!
//! ```no_run
//! use ballistics_solver::{ShotParameters, ShotSolver, SolverOptions};
//!
//! let solver = ShotSolver::new(ShotParameters::default(), SolverOptions::default())?;
//! let result = solver.solve()?;
//! println!("drop {:.3} m, windage {:.3} m", result.vertical_drop, result.windage);
//! # Ok::<(), ballistics_solver::BallisticsError>(())
//! ```

// Re-export the main types and functions
pub use drag_model::DragModel;
pub use error::BallisticsError;
pub use parameters::{field_label, ShotParameters, FIELD_LABELS};
pub use shot_solver::{solve_batch, Confidence, ShotResult, ShotSolver, SolverOptions};
pub use derivatives::{BallisticCoefficientDrag, DragLaw, DragLawKind, SectionalDrag};
pub use drag::{drag_table_for, DragTable};
pub use integrator::{IntegrationMethod, Termination};
pub use trajectory_sampling::TrajectorySample;
pub use units::{ImperialShotParameters, ShotReport, UnitConverter, UnitSystem};
pub use wind::Wind;

// Module declarations
mod drag_model;
pub mod constants;
pub mod error;
pub mod drag;
pub mod atmosphere;
pub mod wind;
pub mod derivatives;
pub mod integrator;
pub mod angle_calculations;
pub mod trajectory_sampling;
pub mod parameters;
pub mod shot_solver;
pub mod units;
