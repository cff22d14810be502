//! Task description read from a JSON file given with `--config`.
//!
//! Every section and every field is optional, missing values fall back to
//! the defaults of the corresponding structure, e.g.
//! ```json
//! {
//!   "population": { "params": { "a": 1.1, "b": 0.4, "c": 0.1, "d": 0.4 }, "tk": 50.0 },
//!   "methods": ["RK45", "Radau"],
//!   "plot": "Terminal",
//!   "circuit": { "R5": 18.0 },
//!   "sensitivity": { "kp": 0.05, "kn": -0.05 },
//!   "newton": { "tolerance": 1e-10 }
//! }
//! ```
use crate::CircuitAnalysis::circuit_solver::CircuitSolver;
use crate::CircuitAnalysis::kirchhoff::CircuitParams;
use crate::CircuitAnalysis::perturbation::Sensitivity;
use crate::PopulationDynamics::lotka_volterra::PopulationTask;
use crate::PopulationDynamics::population_IVP::IntegrationMethod;
use crate::PopulationDynamics::population_plots::PlotBackend;
use crate::Utils::errors::{LoKiError, Result};
use log::info;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskConfig {
    pub population: PopulationTask,
    pub methods: Vec<IntegrationMethod>,
    pub plot: PlotBackend,
    pub circuit: CircuitParams,
    pub sensitivity: Sensitivity,
    pub newton: CircuitSolver,
}

impl Default for TaskConfig {
    fn default() -> Self {
        Self {
            population: PopulationTask::default(),
            methods: vec![IntegrationMethod::RK45, IntegrationMethod::BDF],
            plot: PlotBackend::default(),
            circuit: CircuitParams::default(),
            sensitivity: Sensitivity::default(),
            newton: CircuitSolver::default(),
        }
    }
}

impl TaskConfig {
    pub fn from_json(text: &str) -> Result<Self> {
        let config: TaskConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("reading task from {}", path.display());
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn validate(&self) -> Result<()> {
        self.population.validate()?;
        if self.methods.is_empty() {
            return Err(LoKiError::invalid_parameter(
                "methods",
                "at least one integration method is required",
            ));
        }
        self.circuit.validate()?;
        self.newton.validate()
    }
}
