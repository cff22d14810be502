use crate::Utils::errors::{LoKiError, Result, require_positive};
use RustedSciThe::symbolic::symbolic_engine::Expr;
use nalgebra::DVector;
use serde::{Deserialize, Serialize};

/// number of branch currents (and of equations)
pub const N_BRANCHES: usize = 6;

/// Resistances [Ohm] and source voltages [V] of the network
#[allow(non_snake_case)]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CircuitParams {
    pub r1: f64,
    pub r4: f64,
    pub R2: f64,
    pub R3: f64,
    pub R5: f64,
    pub R6: f64,
    pub R7: f64,
    pub E1: f64,
    pub E4: f64,
}

impl Default for CircuitParams {
    fn default() -> Self {
        Self {
            r1: 4.0,
            r4: 5.0,
            R2: 14.0,
            R3: 7.0,
            R5: 17.0,
            R6: 11.0,
            R7: 20.0,
            E1: 22.0,
            E4: 30.0,
        }
    }
}

impl CircuitParams {
    pub fn resistances(&self) -> [(&'static str, f64); 7] {
        [
            ("r1", self.r1),
            ("r4", self.r4),
            ("R2", self.R2),
            ("R3", self.R3),
            ("R5", self.R5),
            ("R6", self.R6),
            ("R7", self.R7),
        ]
    }

    pub fn validate(&self) -> Result<()> {
        for (name, value) in self.resistances() {
            require_positive(name, value)?;
        }
        for (name, value) in [("E1", self.E1), ("E4", self.E4)] {
            if !value.is_finite() {
                return Err(LoKiError::invalid_parameter(name, format!("voltage must be finite, got {}", value)));
            }
        }
        Ok(())
    }
}

/// current names I1..I6
pub fn current_names() -> Vec<String> {
    (1..=N_BRANCHES).map(|i| format!("I{}", i)).collect()
}

/// Residual form of the Kirchhoff equations for a given set of parameters
#[derive(Debug, Clone)]
pub struct KirchhoffSystem {
    pub params: CircuitParams,
    pub unknowns: Vec<String>,
}

impl KirchhoffSystem {
    pub fn new(params: CircuitParams) -> Result<Self> {
        params.validate()?;
        Ok(Self {
            params,
            unknowns: current_names(),
        })
    }

    /// symbolic residuals in the variables I1..I6
    #[allow(non_snake_case)]
    pub fn equations(&self) -> Vec<Expr> {
        let p = &self.params;
        let I: Vec<Expr> = self.unknowns.iter().map(|name| Expr::Var(name.clone())).collect();
        let c = Expr::Const;
        vec![
            I[0].clone() - I[5].clone() - I[4].clone(),
            I[2].clone() - I[0].clone() - I[1].clone(),
            I[3].clone() - I[1].clone() - I[4].clone(),
            c(p.E4) - I[2].clone() * c(p.R6) - I[3].clone() * c(p.R5) - I[1].clone() * c(p.r4),
            c(p.E1) - I[2].clone() * c(p.R6) - I[5].clone() * c(p.R7) - I[0].clone() * c(p.r1),
            c(p.E1) - c(p.E4) - I[4].clone() * c(p.R3) - I[4].clone() * c(p.R2) - I[0].clone() * c(p.r1)
                + I[1].clone() * c(p.r4),
        ]
    }

    /// the same residuals evaluated directly
    pub fn residuals(&self, currents: &[f64]) -> Result<DVector<f64>> {
        if currents.len() != N_BRANCHES {
            return Err(LoKiError::invalid_parameter(
                "currents",
                format!("expected {} branch currents, got {}", N_BRANCHES, currents.len()),
            ));
        }
        let p = &self.params;
        let [i1, i2, i3, i4, i5, i6] = [
            currents[0],
            currents[1],
            currents[2],
            currents[3],
            currents[4],
            currents[5],
        ];
        Ok(DVector::from_vec(vec![
            i1 - i6 - i5,
            i3 - i1 - i2,
            i4 - i2 - i5,
            p.E4 - i3 * p.R6 - i4 * p.R5 - i2 * p.r4,
            p.E1 - i3 * p.R6 - i6 * p.R7 - i1 * p.r1,
            p.E1 - p.E4 - i5 * p.R3 - i5 * p.R2 - i1 * p.r1 + i2 * p.r4,
        ]))
    }

    pub fn residual_norm(&self, currents: &[f64]) -> Result<f64> {
        Ok(self.residuals(currents)?.norm())
    }
}
