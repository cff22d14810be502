//! # Population IVP
//!
//! Wraps RustedSciThe `UniversalODESolver` for the Lotka-Volterra system.
//!
//! ## Usage Pattern
//! 1. `new()` - create instance with a task and an integration method
//! 2. `set_solver_params()` - optional, overrides the defaults derived from the task
//! 3. `solve()` - integrate from `t0` to `tk`
//! 4. `get_trajectory()` - solution on the uniform evaluation grid
//!
//! Adaptive solvers store the solution on their own step mesh. `solve()`
//! resamples it onto `task.grid()` with cubic Hermite interpolation using
//! the direct right-hand side for the node slopes, so trajectories of
//! different methods can be compared point by point.
use super::lotka_volterra::{LotkaVolterraParams, PopulationTask};
use crate::Utils::errors::{LoKiError, Result};
use crate::Utils::grid::hermite_resample;
use RustedSciThe::numerical::ODE_api2::{SolverParam, SolverType, UniversalODESolver};
use RustedSciThe::numerical::Radau::Radau_main::RadauOrder;
use log::{info, warn};
use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// IVP solvers available for the population task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IntegrationMethod {
    /// explicit adaptive Runge-Kutta 4(5)
    RK45,
    /// implicit multistep backward differentiation formulas
    BDF,
    /// implicit Runge-Kutta (Radau IIA)
    Radau,
}

impl IntegrationMethod {
    pub fn solver_type(&self) -> SolverType {
        match self {
            IntegrationMethod::RK45 => SolverType::NonStiff("RK45".to_owned()),
            IntegrationMethod::BDF => SolverType::BDF,
            IntegrationMethod::Radau => SolverType::Radau(RadauOrder::Order7),
        }
    }
}

impl fmt::Display for IntegrationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IntegrationMethod::RK45 => "RK45",
            IntegrationMethod::BDF => "BDF",
            IntegrationMethod::Radau => "Radau",
        };
        write!(f, "{}", name)
    }
}

/// Solution of the population task on the uniform grid.
/// Rows of `y` are time points, columns are [prey, predator].
#[derive(Debug, Clone)]
pub struct Trajectory {
    pub method: IntegrationMethod,
    pub t: DVector<f64>,
    pub y: DMatrix<f64>,
}

impl Trajectory {
    pub fn prey(&self) -> DVector<f64> {
        self.y.column(0).into_owned()
    }

    pub fn predator(&self) -> DVector<f64> {
        self.y.column(1).into_owned()
    }

    /// First point where a population is not finite.
    pub fn check_finite(&self) -> Result<()> {
        self.check_each(|value| value.is_finite(), "non-finite population")
    }

    /// Populations must stay finite and strictly positive for positive
    /// initial data; the first offending point is reported.
    pub fn check_positive(&self) -> Result<()> {
        self.check_each(|value| value.is_finite() && value > 0.0, "population value")
    }

    fn check_each<F: Fn(f64) -> bool>(&self, admissible: F, what: &str) -> Result<()> {
        for (i, row) in self.y.row_iter().enumerate() {
            for value in row.iter() {
                if !admissible(*value) {
                    return Err(LoKiError::InvalidTrajectory {
                        method: self.method.to_string(),
                        t: self.t[i],
                        message: format!("{} {}", what, value),
                    });
                }
            }
        }
        Ok(())
    }
}

/// Largest deviation between two trajectories, per state variable
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrajectoryComparison {
    pub max_abs: [f64; 2],
    pub max_rel: [f64; 2],
}

impl TrajectoryComparison {
    pub fn agrees_within(&self, rel_tol: f64) -> bool {
        self.max_rel.iter().all(|r| *r <= rel_tol)
    }
}

/// Compares two trajectories sampled on the same grid.
pub fn compare_trajectories(first: &Trajectory, second: &Trajectory) -> Result<TrajectoryComparison> {
    if first.t.len() != second.t.len() || first.y.shape() != second.y.shape() {
        return Err(LoKiError::invalid_parameter(
            "trajectory",
            format!(
                "grids differ: {} points for {} and {} points for {}",
                first.t.len(),
                first.method,
                second.t.len(),
                second.method
            ),
        ));
    }
    let mut max_abs = [0.0_f64; 2];
    let mut max_rel = [0.0_f64; 2];
    for i in 0..first.y.nrows() {
        for j in 0..2 {
            let (u, v) = (first.y[(i, j)], second.y[(i, j)]);
            let abs = (u - v).abs();
            let scale = u.abs().max(v.abs()).max(f64::MIN_POSITIVE);
            max_abs[j] = max_abs[j].max(abs);
            max_rel[j] = max_rel[j].max(abs / scale);
        }
    }
    Ok(TrajectoryComparison { max_abs, max_rel })
}

pub struct PopulationIVP {
    task: PopulationTask,
    method: IntegrationMethod,
    /// numerical solver parameters (step size, tolerance, etc.)
    solver_params: HashMap<String, SolverParam>,
    trajectory: Option<Trajectory>,
}

impl PopulationIVP {
    pub fn new(task: PopulationTask, method: IntegrationMethod) -> Self {
        let solver_params = HashMap::from([
            ("step_size".to_owned(), SolverParam::Float(task.max_step)),
            ("tolerance".to_owned(), SolverParam::Float(task.rtol)),
            ("max_iterations".to_owned(), SolverParam::Int(100000)),
            ("rtol".to_owned(), SolverParam::Float(task.rtol)),
            ("atol".to_owned(), SolverParam::Float(task.atol)),
            ("max_step".to_owned(), SolverParam::Float(task.max_step)),
            ("first_step".to_owned(), SolverParam::OptionalFloat(None)),
            ("vectorized".to_owned(), SolverParam::Bool(false)),
            ("jac_sparsity".to_owned(), SolverParam::OptionalMatrix(None)),
            ("parallel".to_owned(), SolverParam::Bool(false)),
        ]);
        Self {
            task,
            method,
            solver_params,
            trajectory: None,
        }
    }

    pub fn set_solver_params(&mut self, params: HashMap<String, SolverParam>) {
        self.solver_params = params;
    }

    pub fn method(&self) -> IntegrationMethod {
        self.method
    }

    pub fn task(&self) -> &PopulationTask {
        &self.task
    }

    pub fn solve(&mut self) -> Result<()> {
        self.task.validate()?;
        let method = self.method.to_string();
        info!(
            "solving Lotka-Volterra IVP with {} on [{}, {}]",
            method, self.task.t0, self.task.tk
        );

        let y0 = DVector::from_vec(self.task.initial.to_vec());
        let mut ode = UniversalODESolver::new(
            self.task.params.symbolic_rhs(),
            LotkaVolterraParams::unknowns(),
            "t".to_owned(),
            self.method.solver_type(),
            self.task.t0,
            y0,
            self.task.tk,
        );
        ode.set_parameters(self.solver_params.clone());
        ode.initialize();
        ode.solve();

        let (t_raw, y_raw) = ode.get_result();
        let t_raw = t_raw.ok_or_else(|| LoKiError::integration_failed(&method, "no time mesh returned"))?;
        let y_raw = y_raw.ok_or_else(|| LoKiError::integration_failed(&method, "no solution returned"))?;
        if y_raw.ncols() != 2 || y_raw.nrows() != t_raw.len() {
            return Err(LoKiError::integration_failed(
                &method,
                format!(
                    "solution has shape {:?} for {} time points",
                    y_raw.shape(),
                    t_raw.len()
                ),
            ));
        }
        let t_last = t_raw.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let span = self.task.tk - self.task.t0;
        if t_last < self.task.tk - 1e-6 * span {
            return Err(LoKiError::integration_failed(
                &method,
                format!("integration stopped at t = {} before tk = {}", t_last, self.task.tk),
            ));
        }
        info!("{} accepted {} mesh points", method, t_raw.len());

        let params = self.task.params;
        let grid = self.task.grid();
        let y = hermite_resample(
            &t_raw,
            &y_raw,
            |_, state| params.rhs(state[0], state[1]).to_vec(),
            &grid,
        )
        .ok_or_else(|| LoKiError::integration_failed(&method, "mesh has fewer than two points"))?;

        let trajectory = Trajectory {
            method: self.method,
            t: grid,
            y,
        };
        if let Err(e) = trajectory.check_finite() {
            warn!("{} produced non-finite values", method);
            return Err(e);
        }
        self.trajectory = Some(trajectory);
        Ok(())
    }

    pub fn get_trajectory(&self) -> Result<&Trajectory> {
        self.trajectory.as_ref().ok_or_else(|| {
            LoKiError::integration_failed(self.method.to_string(), "solver not run. Call solve() first.")
        })
    }
}

/// Integrates the task with every method in `methods`, in order.
pub fn solve_with_methods(task: &PopulationTask, methods: &[IntegrationMethod]) -> Result<Vec<Trajectory>> {
    methods
        .iter()
        .map(|method| {
            let mut ivp = PopulationIVP::new(task.clone(), *method);
            ivp.solve()?;
            Ok(ivp.get_trajectory()?.clone())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trajectory(method: IntegrationMethod, values: &[[f64; 2]]) -> Trajectory {
        let n = values.len();
        Trajectory {
            method,
            t: DVector::from_fn(n, |i, _| i as f64),
            y: DMatrix::from_fn(n, 2, |i, j| values[i][j]),
        }
    }

    #[test]
    fn new_uses_task_tolerances() {
        let ivp = PopulationIVP::new(PopulationTask::default(), IntegrationMethod::BDF);
        assert!(ivp.trajectory.is_none());
        assert_eq!(ivp.method(), IntegrationMethod::BDF);
        assert!(matches!(ivp.solver_params.get("rtol"), Some(SolverParam::Float(v)) if *v == 1e-8));
        assert!(matches!(ivp.solver_params.get("atol"), Some(SolverParam::Float(v)) if *v == 1e-8));
        assert!(ivp.solver_params.contains_key("max_step"));
    }

    #[test]
    fn trajectory_is_unavailable_before_solve() {
        let ivp = PopulationIVP::new(PopulationTask::default(), IntegrationMethod::RK45);
        assert!(ivp.get_trajectory().is_err());
    }

    #[test]
    fn invalid_task_fails_before_integration() {
        let mut task = PopulationTask::default();
        task.params.c = -0.1;
        let mut ivp = PopulationIVP::new(task, IntegrationMethod::RK45);
        assert!(matches!(ivp.solve(), Err(LoKiError::InvalidParameter { .. })));
    }

    #[test]
    fn comparison_reports_largest_deviation() {
        let first = trajectory(IntegrationMethod::RK45, &[[10.0, 10.0], [8.0, 4.0]]);
        let second = trajectory(IntegrationMethod::BDF, &[[10.0, 10.0], [8.0, 4.004]]);
        let cmp = compare_trajectories(&first, &second).unwrap();
        assert_eq!(cmp.max_abs[0], 0.0);
        assert!((cmp.max_abs[1] - 0.004).abs() < 1e-12);
        assert!((cmp.max_rel[1] - 0.004 / 4.004).abs() < 1e-12);
        assert!(cmp.agrees_within(1e-3));
        assert!(!cmp.agrees_within(1e-4));
    }

    #[test]
    fn comparison_rejects_different_grids() {
        let first = trajectory(IntegrationMethod::RK45, &[[10.0, 10.0], [8.0, 4.0]]);
        let second = trajectory(IntegrationMethod::BDF, &[[10.0, 10.0]]);
        assert!(compare_trajectories(&first, &second).is_err());
    }

    #[test]
    fn positivity_check_finds_offending_point() {
        let good = trajectory(IntegrationMethod::RK45, &[[10.0, 10.0], [0.5, 1e-3]]);
        assert!(good.check_positive().is_ok());
        let bad = trajectory(IntegrationMethod::RK45, &[[10.0, 10.0], [0.5, 0.0]]);
        match bad.check_positive() {
            Err(LoKiError::InvalidTrajectory { t, .. }) => assert_eq!(t, 1.0),
            other => panic!("expected InvalidTrajectory, got {:?}", other),
        }
    }

    #[test]
    fn non_finite_values_are_rejected() {
        let good = trajectory(IntegrationMethod::BDF, &[[10.0, 10.0], [0.0, 3.0]]);
        assert!(good.check_finite().is_ok());
        let bad = trajectory(IntegrationMethod::BDF, &[[10.0, 10.0], [f64::NAN, 3.0], [f64::INFINITY, 1.0]]);
        match bad.check_finite() {
            Err(LoKiError::InvalidTrajectory { t, method, .. }) => {
                assert_eq!(t, 1.0);
                assert_eq!(method, "BDF");
            }
            other => panic!("expected InvalidTrajectory, got {:?}", other),
        }
    }

    #[test]
    fn methods_have_readable_names() {
        assert_eq!(IntegrationMethod::RK45.to_string(), "RK45");
        assert_eq!(IntegrationMethod::BDF.to_string(), "BDF");
        assert!(matches!(IntegrationMethod::BDF.solver_type(), SolverType::BDF));
    }
}
