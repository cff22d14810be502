use super::circuit_solver::CircuitSolver;
use super::kirchhoff::{CircuitParams, KirchhoffSystem, current_names};
use super::perturbation::{Sensitivity, compare_currents, perturb_resistances};
use crate::Utils::errors::Result;
use log::info;
use nalgebra::DVector;
use prettytable::{Table, row};

/// Baseline and perturbed solutions of the circuit
#[derive(Debug, Clone)]
pub struct CircuitReport {
    pub baseline_params: CircuitParams,
    pub updated_params: CircuitParams,
    pub baseline: DVector<f64>,
    pub updated: DVector<f64>,
    pub difference: DVector<f64>,
    /// residuals of the baseline system at the baseline currents
    pub baseline_residuals: DVector<f64>,
    /// residuals of the perturbed system at the updated currents
    pub updated_residuals: DVector<f64>,
}

/// Solves the circuit, perturbs the resistances with the baseline currents
/// and solves it again from the same zero guess.
pub fn analyse_circuit(
    params: CircuitParams,
    sensitivity: Sensitivity,
    solver: &CircuitSolver,
) -> Result<CircuitReport> {
    let system = KirchhoffSystem::new(params)?;
    let baseline = solver.solve(&system)?;
    info!("baseline currents: {:?}", baseline.as_slice());

    let updated_params = perturb_resistances(&params, &baseline, &sensitivity)?;
    let updated_system = KirchhoffSystem::new(updated_params)?;
    let updated = solver.solve(&updated_system)?;
    info!("updated currents: {:?}", updated.as_slice());

    let difference = compare_currents(&baseline, &updated)?;
    let baseline_residuals = system.residuals(baseline.as_slice())?;
    let updated_residuals = updated_system.residuals(updated.as_slice())?;
    Ok(CircuitReport {
        baseline_params: params,
        updated_params,
        baseline,
        updated,
        difference,
        baseline_residuals,
        updated_residuals,
    })
}

impl CircuitReport {
    /// console lines of the analysis
    pub fn lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        for (n, value) in self.baseline.iter().enumerate() {
            lines.push(format!("the value of current I{} is {}", n + 1, value));
        }
        lines.push("\n".to_owned());
        for (n, value) in self.updated.iter().enumerate() {
            lines.push(format!("the new value of current I{} is {}", n + 1, value));
        }
        lines.push("\n".to_owned());
        for (n, value) in self.difference.iter().enumerate() {
            lines.push(format!("for I{} the difference between solutions is {}", n + 1, value));
        }
        lines.push("\n".to_owned());
        lines.push(format!("{:?}", self.baseline_residuals.as_slice()));
        lines.push(format!("{:?}", self.updated_residuals.as_slice()));
        lines
    }

    pub fn print(&self) {
        for line in self.lines() {
            println!("{}", line);
        }
    }

    pub fn currents_table(&self) -> Table {
        let mut table = Table::new();
        table.add_row(row!["current", "baseline", "perturbed", "|difference|"]);
        for (i, name) in current_names().iter().enumerate() {
            table.add_row(row![
                name,
                format!("{:.6}", self.baseline[i]),
                format!("{:.6}", self.updated[i]),
                format!("{:.3e}", self.difference[i])
            ]);
        }
        table
    }

    pub fn resistances_table(&self) -> Table {
        let mut table = Table::new();
        table.add_row(row!["resistance", "baseline, Ohm", "perturbed, Ohm"]);
        for ((name, old), (_, new)) in self
            .baseline_params
            .resistances()
            .into_iter()
            .zip(self.updated_params.resistances())
        {
            table.add_row(row![name, format!("{:.4}", old), format!("{:.4}", new)]);
        }
        table
    }

    pub fn print_table(&self) {
        self.resistances_table().printstd();
        self.currents_table().printstd();
    }
}
