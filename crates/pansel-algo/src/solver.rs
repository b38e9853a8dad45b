//! Solver adapter: invokes a MIP backend synchronously and normalizes
//! its outcome.
//!
//! A "no solution" outcome is not an error here. It means the candidate
//! set cannot satisfy the demand, and callers turn it into the
//! infeasible sentinel so the rest of a batch keeps going. Solver
//! crashes and malformed output are captured as [`SolveOutcome::SolverError`]
//! instead of propagating raw; no retries are performed at this layer.

#[cfg(feature = "solver-coin_cbc")]
use good_lp::solvers::coin_cbc::coin_cbc as coin_cbc_solver;
#[cfg(feature = "solver-highs")]
use good_lp::solvers::highs::highs as highs_solver;
use good_lp::{variables, ResolutionError, SolverModel};
use pansel_core::SizingSolution;
use std::str::FromStr;

use crate::formulate::{attach_constraints, build_variables, extract_solution, SizingProblem};

#[cfg(not(any(feature = "solver-highs", feature = "solver-coin_cbc")))]
compile_error!(
    "pansel-algo requires at least one MIP backend; enable the `solver-highs` or `solver-coin_cbc` feature"
);

/// Which MIP backend to invoke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MipSolverKind {
    #[cfg(feature = "solver-highs")]
    Highs,
    #[cfg(feature = "solver-coin_cbc")]
    CoinCbc,
}

impl Default for MipSolverKind {
    fn default() -> Self {
        #[cfg(feature = "solver-highs")]
        return MipSolverKind::Highs;
        #[cfg(all(not(feature = "solver-highs"), feature = "solver-coin_cbc"))]
        return MipSolverKind::CoinCbc;
    }
}

const AVAILABLE_MIP_SOLVERS: &[&str] = &[
    #[cfg(feature = "solver-highs")]
    "highs",
    #[cfg(feature = "solver-coin_cbc")]
    "coin_cbc",
];

impl MipSolverKind {
    pub fn available() -> &'static [&'static str] {
        AVAILABLE_MIP_SOLVERS
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            #[cfg(feature = "solver-highs")]
            MipSolverKind::Highs => "highs",
            #[cfg(feature = "solver-coin_cbc")]
            MipSolverKind::CoinCbc => "coin_cbc",
        }
    }
}

fn unknown_solver_error(label: &str) -> anyhow::Error {
    anyhow::anyhow!(
        "unknown mip solver '{}'; supported values: {}",
        label,
        MipSolverKind::available().join(", ")
    )
}

impl FromStr for MipSolverKind {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.to_ascii_lowercase();
        match normalized.as_str() {
            "highs" => {
                #[cfg(feature = "solver-highs")]
                {
                    Ok(MipSolverKind::Highs)
                }
                #[cfg(not(feature = "solver-highs"))]
                {
                    Err(unknown_solver_error(&normalized))
                }
            }
            "coin_cbc" | "cbc" => {
                #[cfg(feature = "solver-coin_cbc")]
                {
                    Ok(MipSolverKind::CoinCbc)
                }
                #[cfg(not(feature = "solver-coin_cbc"))]
                {
                    Err(unknown_solver_error(&normalized))
                }
            }
            other => Err(unknown_solver_error(other)),
        }
    }
}

/// Per-solve settings. One config is shared across a batch, but each
/// solve call builds its own model and backend instance; nothing is
/// shared between concurrent batches.
#[derive(Debug, Clone, Copy)]
pub struct SolveConfig {
    pub solver: MipSolverKind,
    /// Time budget per solve, in seconds, enforced by the backend; 0
    /// disables the limit. A budget overrun surfaces as a solver error
    /// at the panel level, never as a fatal error for the batch.
    pub max_time_seconds: f64,
    /// Whether the backend may write progress output.
    pub verbose: bool,
}

impl Default for SolveConfig {
    fn default() -> Self {
        Self {
            solver: MipSolverKind::default(),
            max_time_seconds: 60.0,
            verbose: false,
        }
    }
}

/// Normalized result of one solve call.
#[derive(Debug, Clone, PartialEq)]
pub enum SolveOutcome {
    /// Optimal solution found; quantities are strictly positive.
    Optimal(SizingSolution),
    /// The candidate set cannot satisfy the demand.
    Infeasible,
    /// The model is unbounded (only possible with malformed input such
    /// as negative costs).
    Unbounded,
    /// The backend failed to run or returned an unparsable result.
    SolverError(String),
}

impl SolveOutcome {
    pub fn is_optimal(&self) -> bool {
        matches!(self, SolveOutcome::Optimal(_))
    }

    pub fn into_solution(self) -> Option<SizingSolution> {
        match self {
            SolveOutcome::Optimal(solution) => Some(solution),
            _ => None,
        }
    }
}

/// Formulate and solve one panel's sizing problem. A single attempt per
/// call.
pub fn solve_sizing(problem: &SizingProblem<'_>, config: &SolveConfig) -> SolveOutcome {
    // Zero demand needs no hardware at all.
    if problem.demand.is_zero() {
        return SolveOutcome::Optimal(SizingSolution::empty());
    }
    if problem.candidates.is_empty() {
        return SolveOutcome::Infeasible;
    }

    let mut vars = variables!();
    let (candidate_vars, objective) = build_variables(&mut vars, problem);
    let unsolved = vars.minimise(objective);

    match config.solver {
        #[cfg(feature = "solver-highs")]
        MipSolverKind::Highs => {
            let mut model =
                attach_constraints(unsolved.using(highs_solver), problem, &candidate_vars);
            model.set_verbose(config.verbose);
            if config.max_time_seconds > 0.0 {
                model.set_time_limit(config.max_time_seconds);
            }
            finish(model, problem, &candidate_vars)
        }
        #[cfg(feature = "solver-coin_cbc")]
        MipSolverKind::CoinCbc => {
            let mut model =
                attach_constraints(unsolved.using(coin_cbc_solver), problem, &candidate_vars);
            model.set_parameter("logLevel", if config.verbose { "1" } else { "0" });
            if config.max_time_seconds > 0.0 {
                model.set_parameter("sec", &config.max_time_seconds.to_string());
            }
            finish(model, problem, &candidate_vars)
        }
    }
}

fn finish<M: SolverModel>(
    model: M,
    problem: &SizingProblem<'_>,
    candidate_vars: &[crate::formulate::CandidateVars],
) -> SolveOutcome {
    match model.solve() {
        Ok(solution) => SolveOutcome::Optimal(extract_solution(&solution, problem, candidate_vars)),
        Err(ResolutionError::Infeasible) => SolveOutcome::Infeasible,
        Err(ResolutionError::Unbounded) => SolveOutcome::Unbounded,
        Err(ResolutionError::Other(msg)) => SolveOutcome::SolverError(msg.to_string()),
        Err(ResolutionError::Str(msg)) => SolveOutcome::SolverError(msg),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pansel_core::{ComponentSpec, PanelRequirement, SparePolicy};

    #[test]
    fn bounded_solve_still_finds_the_optimum() {
        let candidates = vec![ComponentSpec {
            name: "C8".into(),
            part_number: "PN-C8".into(),
            cost: 100.0,
            digital_in: 8,
            digital_out: 8,
            ..Default::default()
        }];
        let requirement = PanelRequirement {
            panel_name: "P".into(),
            digital_in: 10,
            ..Default::default()
        };
        let problem = SizingProblem::new(&candidates, &requirement, SparePolicy::none());

        // Generous budget: forwarded to the backend, optimum unchanged.
        let bounded = SolveConfig {
            max_time_seconds: 5.0,
            ..Default::default()
        };
        let solution = solve_sizing(&problem, &bounded)
            .into_solution()
            .expect("feasible well within the budget");
        assert_eq!(solution.quantities.get("C8"), Some(&2));

        // Zero disables the limit entirely.
        let unlimited = SolveConfig {
            max_time_seconds: 0.0,
            ..Default::default()
        };
        assert!(solve_sizing(&problem, &unlimited).is_optimal());
    }

    #[test]
    fn solver_kind_parses_known_names() {
        #[cfg(feature = "solver-highs")]
        {
            assert_eq!(
                "HiGHS".parse::<MipSolverKind>().unwrap(),
                MipSolverKind::Highs
            );
        }
        assert!("simplex9000".parse::<MipSolverKind>().is_err());
    }

    #[test]
    fn default_config_has_positive_time_budget() {
        let config = SolveConfig::default();
        assert!(config.max_time_seconds > 0.0);
        assert!(!config.verbose);
    }

    #[test]
    fn available_list_matches_default() {
        assert!(MipSolverKind::available()
            .contains(&MipSolverKind::default().as_str()));
    }
}
