use super::equilibrium::{EquilibriumPoint, EquilibriumSolver};
use super::lotka_volterra::{LotkaVolterraParams, PopulationTask};
use super::population_IVP::{
    IntegrationMethod, Trajectory, TrajectoryComparison, compare_trajectories, solve_with_methods,
};
use super::population_plots::{PlotBackend, plot_trajectories};
use crate::Utils::errors::Result;
use log::{info, warn};

/// relative tolerance the two integrators are expected to agree within
pub const AGREEMENT_RTOL: f64 = 1e-3;

pub struct PopulationReport {
    pub trajectories: Vec<Trajectory>,
    pub comparison: Option<TrajectoryComparison>,
    pub equilibria: Vec<EquilibriumPoint>,
    /// last equilibrium of the sorted symbolic solution
    pub equilibrium: EquilibriumPoint,
}

/// Stationary points of the model, solved from the symbolic right-hand side.
pub fn find_equilibria(params: &LotkaVolterraParams) -> Result<(Vec<EquilibriumPoint>, EquilibriumPoint)> {
    let mut solver = EquilibriumSolver::new(params.symbolic_rhs(), LotkaVolterraParams::unknowns())?;
    let all = solver.solve()?.to_vec();
    let last = solver.last()?.clone();
    Ok((all, last))
}

/// Positive initial populations stay positive along the exact solution, so
/// any trajectory that leaves the positive quadrant is rejected. A zero
/// initial population only needs finite values.
pub fn check_trajectories(task: &PopulationTask, trajectories: &[Trajectory]) -> Result<()> {
    let positive_start = task.initial.iter().all(|v| *v > 0.0);
    for trajectory in trajectories {
        if positive_start {
            trajectory.check_positive()?;
        } else {
            trajectory.check_finite()?;
        }
    }
    Ok(())
}

/// Integrates the task with each method, compares the first two trajectories,
/// draws the charts and solves for the equilibrium points.
pub fn run_population(
    task: &PopulationTask,
    methods: &[IntegrationMethod],
    backend: PlotBackend,
) -> Result<PopulationReport> {
    task.validate()?;
    let trajectories = solve_with_methods(task, methods)?;
    check_trajectories(task, &trajectories)?;

    let comparison = match trajectories.as_slice() {
        [first, second, ..] => {
            let cmp = compare_trajectories(first, second)?;
            info!(
                "{} vs {}: max |dx| = {:.3e}, max |dy| = {:.3e}",
                first.method, second.method, cmp.max_abs[0], cmp.max_abs[1]
            );
            if !cmp.agrees_within(AGREEMENT_RTOL) {
                warn!(
                    "{} and {} differ by more than {} (relative): {:?}",
                    first.method, second.method, AGREEMENT_RTOL, cmp.max_rel
                );
            }
            Some(cmp)
        }
        _ => None,
    };

    plot_trajectories(&trajectories, backend);

    let (equilibria, equilibrium) = find_equilibria(&task.params)?;
    Ok(PopulationReport {
        trajectories,
        comparison,
        equilibria,
        equilibrium,
    })
}

impl PopulationReport {
    pub fn print(&self) {
        println!("equilibrium points: {}", self.equilibrium);
    }
}
