//! Point-allocation MIP formulation.
//!
//! Builds the mixed-integer program for a single panel against a
//! candidate component set:
//! - one integer `qty` variable per candidate,
//! - continuous allocation variables splitting each candidate's
//!   universal capacity across the demand types it may serve,
//! - objective: minimize total purchase cost,
//! - coverage constraints per point type.
//!
//! Candidates are identified by their index in the candidate slice, so
//! variable identity never depends on display names.

use good_lp::{constraint, variable, Expression, ProblemVariables, SolverModel, Variable};
use pansel_core::{ComponentSpec, PanelRequirement, PointDemand, SizingSolution, SparePolicy};
use serde::{Deserialize, Serialize};

/// Which formulation to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormulationMode {
    /// Canonical formulation: demand split per point type
    /// (DI/DO/AI/AO), universal capacity allocated per type.
    #[default]
    Split,
    /// Legacy compatibility mode: demand aggregated into input and
    /// output totals only, with no digital/analog distinction.
    Aggregate,
}

/// One panel's sizing problem: a request-scoped snapshot of everything
/// the formulation needs. Carries no ambient state.
#[derive(Debug, Clone)]
pub struct SizingProblem<'a> {
    /// Candidate components, referenced by index throughout the model.
    pub candidates: &'a [ComponentSpec],
    /// Spare-adjusted demand the solution must cover.
    pub demand: PointDemand,
    pub mode: FormulationMode,
}

impl<'a> SizingProblem<'a> {
    /// Build the canonical problem for a raw panel requirement under the
    /// given spare policy.
    pub fn new(
        candidates: &'a [ComponentSpec],
        requirement: &PanelRequirement,
        spare: SparePolicy,
    ) -> Self {
        Self {
            candidates,
            demand: PointDemand::required(requirement, spare),
            mode: FormulationMode::Split,
        }
    }

    /// Build a problem from already spare-adjusted demand.
    pub fn from_demand(candidates: &'a [ComponentSpec], demand: PointDemand) -> Self {
        Self {
            candidates,
            demand,
            mode: FormulationMode::Split,
        }
    }

    pub fn with_mode(mut self, mode: FormulationMode) -> Self {
        self.mode = mode;
        self
    }
}

/// Decision variables for one candidate component.
pub(crate) enum CandidateVars {
    Split {
        qty: Variable,
        uio_as_di: Variable,
        uio_as_do: Variable,
        uio_as_ai: Variable,
        uio_as_ao: Variable,
        ui_as_digital: Variable,
        ui_as_analog: Variable,
        uo_as_digital: Variable,
        uo_as_analog: Variable,
    },
    Aggregate {
        qty: Variable,
        uio_as_input: Variable,
        uio_as_output: Variable,
    },
}

impl CandidateVars {
    pub(crate) fn qty(&self) -> Variable {
        match self {
            CandidateVars::Split { qty, .. } | CandidateVars::Aggregate { qty, .. } => *qty,
        }
    }
}

/// Add the decision variables for every candidate and build the cost
/// objective.
pub(crate) fn build_variables(
    vars: &mut ProblemVariables,
    problem: &SizingProblem<'_>,
) -> (Vec<CandidateVars>, Expression) {
    let mut candidate_vars = Vec::with_capacity(problem.candidates.len());
    let mut objective = Expression::from(0.0);

    for spec in problem.candidates {
        let qty = vars.add(variable().integer().min(0));
        objective += spec.cost * qty;

        let cv = match problem.mode {
            FormulationMode::Split => CandidateVars::Split {
                qty,
                uio_as_di: vars.add(variable().min(0.0)),
                uio_as_do: vars.add(variable().min(0.0)),
                uio_as_ai: vars.add(variable().min(0.0)),
                uio_as_ao: vars.add(variable().min(0.0)),
                ui_as_digital: vars.add(variable().min(0.0)),
                ui_as_analog: vars.add(variable().min(0.0)),
                uo_as_digital: vars.add(variable().min(0.0)),
                uo_as_analog: vars.add(variable().min(0.0)),
            },
            FormulationMode::Aggregate => CandidateVars::Aggregate {
                qty,
                uio_as_input: vars.add(variable().min(0.0)),
                uio_as_output: vars.add(variable().min(0.0)),
            },
        };
        candidate_vars.push(cv);
    }

    (candidate_vars, objective)
}

/// Attach the capacity and coverage constraints to a backend model.
pub(crate) fn attach_constraints<M: SolverModel>(
    mut model: M,
    problem: &SizingProblem<'_>,
    candidate_vars: &[CandidateVars],
) -> M {
    match problem.mode {
        FormulationMode::Split => {
            let mut provided_di = Expression::from(0.0);
            let mut provided_do = Expression::from(0.0);
            let mut provided_ai = Expression::from(0.0);
            let mut provided_ao = Expression::from(0.0);

            for (spec, cv) in problem.candidates.iter().zip(candidate_vars) {
                let CandidateVars::Split {
                    qty,
                    uio_as_di,
                    uio_as_do,
                    uio_as_ai,
                    uio_as_ao,
                    ui_as_digital,
                    ui_as_analog,
                    uo_as_digital,
                    uo_as_analog,
                } = cv
                else {
                    unreachable!("split problem built aggregate variables");
                };

                // Universal capacity may not be double-counted: the
                // allocations drawn from each pool are bounded by the
                // pool size times the purchased quantity.
                model = model.with(constraint!(
                    *uio_as_di + *uio_as_do + *uio_as_ai + *uio_as_ao
                        <= f64::from(spec.universal_io) * *qty
                ));
                model = model.with(constraint!(
                    *ui_as_digital + *ui_as_analog <= f64::from(spec.universal_in) * *qty
                ));
                model = model.with(constraint!(
                    *uo_as_digital + *uo_as_analog <= f64::from(spec.universal_out) * *qty
                ));

                provided_di += f64::from(spec.digital_in) * *qty + *ui_as_digital + *uio_as_di;
                provided_do += f64::from(spec.digital_out) * *qty + *uo_as_digital + *uio_as_do;
                provided_ai += f64::from(spec.analog_in) * *qty + *ui_as_analog + *uio_as_ai;
                provided_ao += f64::from(spec.analog_out) * *qty + *uo_as_analog + *uio_as_ao;
            }

            let d = problem.demand;
            model = model.with(constraint!(provided_di >= f64::from(d.digital_in)));
            model = model.with(constraint!(provided_do >= f64::from(d.digital_out)));
            model = model.with(constraint!(provided_ai >= f64::from(d.analog_in)));
            model = model.with(constraint!(provided_ao >= f64::from(d.analog_out)));
        }
        FormulationMode::Aggregate => {
            let mut provided_inputs = Expression::from(0.0);
            let mut provided_outputs = Expression::from(0.0);

            for (spec, cv) in problem.candidates.iter().zip(candidate_vars) {
                let CandidateVars::Aggregate {
                    qty,
                    uio_as_input,
                    uio_as_output,
                } = cv
                else {
                    unreachable!("aggregate problem built split variables");
                };

                model = model.with(constraint!(
                    *uio_as_input + *uio_as_output <= f64::from(spec.universal_io) * *qty
                ));

                let fixed_inputs =
                    f64::from(spec.digital_in + spec.analog_in + spec.universal_in);
                let fixed_outputs =
                    f64::from(spec.digital_out + spec.analog_out + spec.universal_out);
                provided_inputs += fixed_inputs * *qty + *uio_as_input;
                provided_outputs += fixed_outputs * *qty + *uio_as_output;
            }

            let d = problem.demand;
            model = model.with(constraint!(provided_inputs >= f64::from(d.inputs())));
            model = model.with(constraint!(provided_outputs >= f64::from(d.outputs())));
        }
    }

    model
}

/// Read the solved quantities back out of a backend solution.
///
/// Quantities are rounded to the nearest integer; only strictly positive
/// entries are kept. The reported cost is recomputed from the rounded
/// quantities so it always satisfies `cost = Σ unit_cost × qty`.
pub(crate) fn extract_solution<S: good_lp::Solution>(
    solution: &S,
    problem: &SizingProblem<'_>,
    candidate_vars: &[CandidateVars],
) -> SizingSolution {
    let mut result = SizingSolution::empty();
    for (spec, cv) in problem.candidates.iter().zip(candidate_vars) {
        let qty = solution.value(cv.qty()).round();
        if qty > 0.0 {
            let qty = qty as u32;
            result.total_cost += spec.cost * f64::from(qty);
            result.quantities.insert(spec.name.clone(), qty);
        }
    }
    result
}
