use super::kirchhoff::KirchhoffSystem;
use crate::Utils::errors::{LoKiError, Result};
use RustedSciThe::numerical::Nonlinear_systems::NR::NR;
use log::{info, warn};
use nalgebra::DVector;
use serde::{Deserialize, Serialize};

/// Settings of the Newton-Raphson solver used for the branch currents.
///
/// `tolerance` and `max_iterations` are handed to RustedSciThe's `NR`.
/// The result is accepted only if the residual norm of the Kirchhoff system
/// at the returned point is below `residual_threshold`, otherwise
/// [`LoKiError::NotConverged`] is returned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CircuitSolver {
    pub tolerance: f64,
    pub max_iterations: usize,
    pub residual_threshold: f64,
    pub damping: Option<f64>,
    /// log level of RustedSciThe's own solver output, None keeps it quiet
    pub loglevel: Option<String>,
}

impl Default for CircuitSolver {
    fn default() -> Self {
        Self {
            tolerance: 1e-9,
            max_iterations: 1000,
            residual_threshold: 1e-6,
            damping: Some(1.0),
            loglevel: None,
        }
    }
}

impl CircuitSolver {
    pub fn validate(&self) -> Result<()> {
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(LoKiError::invalid_parameter("tolerance", "must be positive"));
        }
        if self.max_iterations == 0 {
            return Err(LoKiError::invalid_parameter("max_iterations", "must be at least 1"));
        }
        if !(self.residual_threshold.is_finite() && self.residual_threshold > 0.0) {
            return Err(LoKiError::invalid_parameter("residual_threshold", "must be positive"));
        }
        if let Some(damping) = self.damping {
            if !(damping > 0.0 && damping <= 1.0) {
                return Err(LoKiError::invalid_parameter(
                    "damping",
                    format!("must lie in (0, 1], got {}", damping),
                ));
            }
        }
        Ok(())
    }

    /// Solves the system starting from all currents equal to zero.
    pub fn solve(&self, system: &KirchhoffSystem) -> Result<DVector<f64>> {
        self.solve_from(system, vec![0.0; system.unknowns.len()])
    }

    pub fn solve_from(&self, system: &KirchhoffSystem, initial_guess: Vec<f64>) -> Result<DVector<f64>> {
        self.validate()?;
        if initial_guess.len() != system.unknowns.len() {
            return Err(LoKiError::invalid_parameter(
                "initial_guess",
                format!(
                    "{} values given for {} currents",
                    initial_guess.len(),
                    system.unknowns.len()
                ),
            ));
        }
        let mut solver = NR::new();
        solver.set_equation_system(
            system.equations(),
            Some(system.unknowns.clone()),
            initial_guess,
            self.tolerance,
            self.max_iterations,
        );
        solver.set_solver_params(self.loglevel.clone(), None, self.damping, None, None, None);
        solver.eq_generate();
        solver.solve();
        self.accept(system, solver.get_result())
    }

    /// Checks the vector returned by NR against the Kirchhoff system itself.
    fn accept(&self, system: &KirchhoffSystem, result: Option<DVector<f64>>) -> Result<DVector<f64>> {
        let Some(solution) = result else {
            warn!("Newton-Raphson returned no solution");
            return Err(LoKiError::NoSolution {
                message: "no result".to_owned(),
            });
        };
        if solution.len() != system.unknowns.len() {
            return Err(LoKiError::NoSolution {
                message: format!(
                    "{} values returned for {} currents",
                    solution.len(),
                    system.unknowns.len()
                ),
            });
        }
        if let Some(bad) = solution.iter().find(|v| !v.is_finite()) {
            return Err(LoKiError::NoSolution {
                message: format!("non-finite current {}", bad),
            });
        }
        let residual = system.residual_norm(solution.as_slice())?;
        if !(residual <= self.residual_threshold) {
            warn!(
                "residual norm {:.3e} exceeds threshold {:.3e}",
                residual, self.residual_threshold
            );
            return Err(LoKiError::NotConverged {
                max_iterations: self.max_iterations,
                residual,
            });
        }
        info!("branch currents found, residual norm {:.3e}", residual);
        Ok(solution)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CircuitAnalysis::kirchhoff::CircuitParams;

    #[test]
    fn defaults() {
        let solver = CircuitSolver::default();
        assert_eq!(solver.tolerance, 1e-9);
        assert_eq!(solver.max_iterations, 1000);
        assert!(solver.validate().is_ok());
    }

    #[test]
    fn bad_settings_are_rejected() {
        let solver = CircuitSolver {
            max_iterations: 0,
            ..CircuitSolver::default()
        };
        assert!(solver.validate().is_err());
        let solver = CircuitSolver {
            damping: Some(1.5),
            ..CircuitSolver::default()
        };
        assert!(solver.validate().is_err());
    }

    #[test]
    fn wrong_guess_length_is_rejected() {
        let system = KirchhoffSystem::new(CircuitParams::default()).unwrap();
        let result = CircuitSolver::default().solve_from(&system, vec![0.0; 3]);
        assert!(matches!(result, Err(LoKiError::InvalidParameter { .. })));
    }

    #[test]
    fn point_off_the_solution_is_not_converged() {
        let system = KirchhoffSystem::new(CircuitParams::default()).unwrap();
        let solver = CircuitSolver::default();
        // zero currents leave the source voltages as residuals
        let result = solver.accept(&system, Some(DVector::zeros(6)));
        match result {
            Err(LoKiError::NotConverged {
                max_iterations,
                residual,
            }) => {
                assert_eq!(max_iterations, 1000);
                assert!((residual - (30.0f64.powi(2) + 22.0f64.powi(2) + 8.0f64.powi(2)).sqrt()).abs() < 1e-9);
            }
            other => panic!("expected NotConverged, got {:?}", other),
        }
    }

    #[test]
    fn missing_or_broken_result_is_no_solution() {
        let system = KirchhoffSystem::new(CircuitParams::default()).unwrap();
        let solver = CircuitSolver::default();
        assert!(matches!(solver.accept(&system, None), Err(LoKiError::NoSolution { .. })));
        let nan = DVector::from_element(6, f64::NAN);
        assert!(matches!(solver.accept(&system, Some(nan)), Err(LoKiError::NoSolution { .. })));
        let short = DVector::zeros(4);
        assert!(matches!(solver.accept(&system, Some(short)), Err(LoKiError::NoSolution { .. })));
    }

    #[test]
    fn unreachable_threshold_surfaces_non_convergence() {
        let system = KirchhoffSystem::new(CircuitParams::default()).unwrap();
        let solver = CircuitSolver {
            residual_threshold: f64::MIN_POSITIVE,
            ..CircuitSolver::default()
        };
        let result = solver.solve(&system);
        assert!(
            matches!(result, Err(LoKiError::NotConverged { max_iterations: 1000, .. })),
            "{:?}",
            result
        );
    }
}
