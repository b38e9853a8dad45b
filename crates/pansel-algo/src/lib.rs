//! # pansel-algo: the sizing decision engine
//!
//! Quantitative core of pansel: given a panel's point demand and a
//! hardware catalog, pick the cheapest component assembly, expand it
//! into a full parts list with mandatory accessories, and aggregate
//! across panels into a procurement matrix and bill of quantities.
//!
//! Pipeline, per panel:
//!
//! 1. [`formulate::SizingProblem`] builds the mixed-integer program,
//!    allocating universal I/O capacity across the demanded point types.
//! 2. [`solver::solve_sizing`] invokes the configured MIP backend and
//!    normalizes the outcome; "no solution" is a result, not an error.
//! 3. For server panels, [`evaluate::evaluate_server_options`] compares
//!    the modular build against each standalone unit.
//! 4. [`expand::expand_accessories`] resolves required accessories
//!    transitively.
//! 5. [`aggregate`] merges all panels into the matrix and BOQ.
//!
//! Every call operates on snapshots passed in by the caller; the crate
//! holds no global state, so panels can be solved concurrently.

pub mod aggregate;
pub mod evaluate;
pub mod expand;
pub mod formulate;
pub mod solver;

pub use aggregate::{build_boq, build_matrix, MatrixRow, PanelSelection, ProcurementMatrix};
pub use evaluate::evaluate_server_options;
pub use expand::{accessory_cost, expand_accessories, MAX_EXPANSION_ROUNDS};
pub use formulate::{FormulationMode, SizingProblem};
pub use solver::{solve_sizing, MipSolverKind, SolveConfig, SolveOutcome};
