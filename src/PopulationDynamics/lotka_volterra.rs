use crate::Utils::errors::{LoKiError, Result, require_positive};
use crate::Utils::grid::linspace;
use RustedSciThe::symbolic::symbolic_engine::Expr;
use nalgebra::DVector;
use serde::{Deserialize, Serialize};

/// Rate constants of the Lotka-Volterra model
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LotkaVolterraParams {
    /// prey growth rate
    pub a: f64,
    /// rate of prey loss to predation
    pub b: f64,
    /// rate of predator growth from predation
    pub c: f64,
    /// predator death rate
    pub d: f64,
}

impl Default for LotkaVolterraParams {
    fn default() -> Self {
        Self {
            a: 1.1,
            b: 0.4,
            c: 0.1,
            d: 0.4,
        }
    }
}

impl LotkaVolterraParams {
    pub fn new(a: f64, b: f64, c: f64, d: f64) -> Result<Self> {
        let params = Self { a, b, c, d };
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<()> {
        require_positive("a", self.a)?;
        require_positive("b", self.b)?;
        require_positive("c", self.c)?;
        require_positive("d", self.d)?;
        Ok(())
    }

    /// names of the state variables, in the order used everywhere in this module
    pub fn unknowns() -> Vec<String> {
        vec!["x".to_owned(), "y".to_owned()]
    }

    /// right-hand side evaluated directly
    pub fn rhs(&self, x: f64, y: f64) -> [f64; 2] {
        [(self.a - self.b * y) * x, (self.c * x - self.d) * y]
    }

    /// right-hand side as symbolic expressions of `x` and `y`
    pub fn symbolic_rhs(&self) -> Vec<Expr> {
        let x = Expr::Var("x".to_owned());
        let y = Expr::Var("y".to_owned());
        let a = Expr::Const(self.a);
        let b = Expr::Const(self.b);
        let c = Expr::Const(self.c);
        let d = Expr::Const(self.d);
        vec![
            (a - b * y.clone()) * x.clone(),
            (c * x - d) * y,
        ]
    }

    /// coexistence point (d/c, a/b) known in closed form
    pub fn analytic_equilibrium(&self) -> (f64, f64) {
        (self.d / self.c, self.a / self.b)
    }

    /// V(x, y) = c*x - d*ln(x) + b*y - a*ln(y) is constant along every
    /// trajectory with x, y > 0
    pub fn first_integral(&self, x: f64, y: f64) -> f64 {
        self.c * x - self.d * x.ln() + self.b * y - self.a * y.ln()
    }
}

/// Everything needed to set up the population IVP
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PopulationTask {
    pub params: LotkaVolterraParams,
    /// initial populations [prey, predator]
    pub initial: [f64; 2],
    pub t0: f64,
    pub tk: f64,
    /// number of points of the evaluation grid
    pub nt: usize,
    pub rtol: f64,
    pub atol: f64,
    pub max_step: f64,
}

impl Default for PopulationTask {
    fn default() -> Self {
        Self {
            params: LotkaVolterraParams::default(),
            initial: [10.0, 10.0],
            t0: 0.0,
            tk: 100.0,
            nt: 1000,
            rtol: 1e-8,
            atol: 1e-8,
            max_step: 0.1,
        }
    }
}

impl PopulationTask {
    pub fn validate(&self) -> Result<()> {
        self.params.validate()?;
        for (name, value) in [("x0", self.initial[0]), ("y0", self.initial[1])] {
            if !value.is_finite() || value < 0.0 {
                return Err(LoKiError::invalid_parameter(
                    name,
                    format!("initial population must be non-negative, got {}", value),
                ));
            }
        }
        if !(self.tk > self.t0) {
            return Err(LoKiError::invalid_parameter(
                "tk",
                format!("end time {} must exceed start time {}", self.tk, self.t0),
            ));
        }
        if self.nt < 2 {
            return Err(LoKiError::invalid_parameter(
                "nt",
                format!("at least two grid points are needed, got {}", self.nt),
            ));
        }
        require_positive("rtol", self.rtol)?;
        require_positive("atol", self.atol)?;
        require_positive("max_step", self.max_step)?;
        Ok(())
    }

    /// uniform evaluation grid over [t0, tk]
    pub fn grid(&self) -> DVector<f64> {
        linspace(self.t0, self.tk, self.nt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn defaults_match_the_classic_setup() {
        let task = PopulationTask::default();
        assert_eq!(task.params, LotkaVolterraParams::new(1.1, 0.4, 0.1, 0.4).unwrap());
        assert_eq!(task.initial, [10.0, 10.0]);
        assert_eq!(task.grid().len(), 1000);
        assert!(task.validate().is_ok());
    }

    #[test]
    fn rhs_vanishes_at_equilibria() {
        let p = LotkaVolterraParams::default();
        let (xe, ye) = p.analytic_equilibrium();
        assert_relative_eq!(xe, 4.0, epsilon = 1e-12);
        assert_relative_eq!(ye, 2.75, epsilon = 1e-12);
        for [x, y] in [[0.0, 0.0], [xe, ye]] {
            let f = p.rhs(x, y);
            assert_relative_eq!(f[0], 0.0, epsilon = 1e-12);
            assert_relative_eq!(f[1], 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn symbolic_rhs_agrees_with_direct_rhs() {
        let p = LotkaVolterraParams::default();
        let sym = p.symbolic_rhs();
        for [x, y] in [[10.0, 10.0], [3.5, 0.25], [0.0, 7.0]] {
            let direct = p.rhs(x, y);
            for (i, eq) in sym.iter().enumerate() {
                let f = eq.clone().lambdify_owned(vec!["x", "y"]);
                assert_relative_eq!(f(vec![x, y]), direct[i], epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn first_integral_is_stationary_along_the_flow() {
        // dV/dt = grad V . f = 0
        let p = LotkaVolterraParams::default();
        let (x, y) = (7.0, 1.5);
        let [fx, fy] = p.rhs(x, y);
        let dv_dx = p.c - p.d / x;
        let dv_dy = p.b - p.a / y;
        assert_relative_eq!(dv_dx * fx + dv_dy * fy, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn invalid_rates_are_rejected() {
        assert!(LotkaVolterraParams::new(1.1, 0.0, 0.1, 0.4).is_err());
        assert!(LotkaVolterraParams::new(-1.0, 0.4, 0.1, 0.4).is_err());
    }

    #[test]
    fn invalid_task_is_rejected() {
        let mut task = PopulationTask::default();
        task.nt = 1;
        assert!(task.validate().is_err());

        let mut task = PopulationTask::default();
        task.tk = task.t0;
        assert!(task.validate().is_err());

        let mut task = PopulationTask::default();
        task.initial = [-1.0, 10.0];
        assert!(task.validate().is_err());

        let mut task = PopulationTask::default();
        task.rtol = 0.0;
        assert!(task.validate().is_err());
    }
}
