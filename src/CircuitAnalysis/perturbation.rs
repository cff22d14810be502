use super::kirchhoff::{CircuitParams, N_BRANCHES};
use crate::Utils::errors::{LoKiError, Result};
use log::info;
use nalgebra::DVector;
use serde::{Deserialize, Serialize};

/// Coefficients of the resistance update `R_new = R_old + I * k`:
/// `kp` for R2, R6, R7 and `kn` for r1, r4, R3, R5
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Sensitivity {
    pub kp: f64,
    pub kn: f64,
}

impl Default for Sensitivity {
    fn default() -> Self {
        Self { kp: 0.1, kn: -0.1 }
    }
}

/// One perturbation step of the resistances driven by the baseline currents.
///
/// | resistance | current | coefficient |
/// |------------|---------|-------------|
/// | r1         | I1      | kn          |
/// | r4         | I4      | kn          |
/// | R2         | I2      | kp          |
/// | R3         | I3      | kn          |
/// | R5         | I5      | kn          |
/// | R6         | I6      | kp          |
/// | R7         | I6      | kp          |
///
/// Source voltages are kept. The updated parameters are validated, so a
/// perturbation that drives a resistance to zero or below is an error.
#[allow(non_snake_case)]
pub fn perturb_resistances(
    params: &CircuitParams,
    currents: &DVector<f64>,
    k: &Sensitivity,
) -> Result<CircuitParams> {
    if currents.len() != N_BRANCHES {
        return Err(LoKiError::invalid_parameter(
            "currents",
            format!("expected {} branch currents, got {}", N_BRANCHES, currents.len()),
        ));
    }
    let I = currents;
    let updated = CircuitParams {
        r1: params.r1 + I[0] * k.kn,
        r4: params.r4 + I[3] * k.kn,
        R2: params.R2 + I[1] * k.kp,
        R3: params.R3 + I[2] * k.kn,
        R5: params.R5 + I[4] * k.kn,
        R6: params.R6 + I[5] * k.kp,
        R7: params.R7 + I[5] * k.kp,
        ..*params
    };
    updated.validate()?;
    info!("perturbed resistances: {:?}", updated.resistances());
    Ok(updated)
}

/// absolute per-branch difference of two solutions
pub fn compare_currents(first: &DVector<f64>, second: &DVector<f64>) -> Result<DVector<f64>> {
    if first.len() != second.len() {
        return Err(LoKiError::invalid_parameter(
            "currents",
            format!("cannot compare {} currents with {}", first.len(), second.len()),
        ));
    }
    Ok((first - second).abs())
}
