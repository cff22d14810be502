use crate::CircuitAnalysis::circuit_report::analyse_circuit;
use crate::Utils::errors::Result;
use crate::Utils::task_config::TaskConfig;

/// Solves the circuit before and after the resistance perturbation and
/// prints the currents, their differences and both residual vectors.
pub fn circuit_task(config: &TaskConfig, table: bool) -> Result<()> {
    let report = analyse_circuit(config.circuit, config.sensitivity, &config.newton)?;
    report.print();
    if table {
        report.print_table();
    }
    Ok(())
}
