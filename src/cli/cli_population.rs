use crate::PopulationDynamics::population_pipeline::run_population;
use crate::Utils::errors::Result;
use crate::Utils::task_config::TaskConfig;
use log::info;

/// Integrates the predator-prey model with every configured method, draws
/// the charts and prints the equilibrium point.
pub fn population_task(config: &TaskConfig) -> Result<()> {
    info!(
        "Lotka-Volterra task: t in [{}, {}], {} points, methods {:?}",
        config.population.t0, config.population.tk, config.population.nt, config.methods
    );
    let report = run_population(&config.population, &config.methods, config.plot)?;
    if let Some(cmp) = &report.comparison {
        info!("maximal relative deviation between methods: {:?}", cmp.max_rel);
    }
    report.print();
    Ok(())
}
