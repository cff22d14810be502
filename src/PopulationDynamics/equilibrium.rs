//! # Equilibrium points
//!
//! Solves a square system of equations `F_i(x, y, ...) = 0` in which every
//! equation is a product of factors that are linear in the unknowns, which is
//! exactly the shape of a Lotka-Volterra right-hand side:
//! ```text
//! (a - b*y)*x = 0
//! (c*x - d)*y = 0
//! ```
//! A product vanishes when one of its factors does, so every choice of one
//! factor per equation gives a linear system. Coefficients of the factors are
//! obtained symbolically (`Expr::diff`) and evaluated with `lambdify_owned`.
//! Singular or inconsistent choices are dropped, duplicates are merged and
//! the solutions are sorted lexicographically, so for the predator-prey model
//! the trivial point (0, 0) comes first and the coexistence point last.
use crate::Utils::errors::{LoKiError, Result};
use RustedSciThe::symbolic::symbolic_engine::Expr;
use log::info;
use nalgebra::{DMatrix, DVector};
use std::cmp::Ordering;
use std::fmt;

/// tolerance used to merge solutions and to accept a candidate point
const SOLUTION_TOL: f64 = 1e-9;

#[derive(Debug, Clone, PartialEq)]
pub struct EquilibriumPoint {
    pub unknowns: Vec<String>,
    pub values: Vec<f64>,
}

impl EquilibriumPoint {
    pub fn get(&self, unknown: &str) -> Option<f64> {
        self.unknowns
            .iter()
            .position(|u| u == unknown)
            .map(|i| self.values[i])
    }

    /// no component is (numerically) zero
    pub fn is_nontrivial(&self) -> bool {
        self.values.iter().all(|v| v.abs() > SOLUTION_TOL)
    }
}

impl fmt::Display for EquilibriumPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let values: Vec<String> = self.values.iter().map(|v| format!("{}", v)).collect();
        write!(f, "({})", values.join(", "))
    }
}

/// linear form  sum_j(coeffs_j * u_j) + constant
#[derive(Debug, Clone)]
struct LinearFactor {
    coeffs: Vec<f64>,
    constant: f64,
}

pub struct EquilibriumSolver {
    pub equations: Vec<Expr>,
    pub unknowns: Vec<String>,
    pub solutions: Vec<EquilibriumPoint>,
}

impl EquilibriumSolver {
    pub fn new(equations: Vec<Expr>, unknowns: Vec<String>) -> Result<Self> {
        if equations.len() != unknowns.len() {
            return Err(LoKiError::invalid_parameter(
                "equations",
                format!(
                    "{} equations for {} unknowns, the system must be square",
                    equations.len(),
                    unknowns.len()
                ),
            ));
        }
        Ok(Self {
            equations,
            unknowns,
            solutions: Vec::new(),
        })
    }

    pub fn solve(&mut self) -> Result<&[EquilibriumPoint]> {
        let n = self.unknowns.len();
        let mut factors_per_equation = Vec::with_capacity(n);
        for eq in &self.equations {
            let factors = factorize(eq)
                .iter()
                .map(|factor| self.linearize(factor))
                .collect::<Result<Vec<LinearFactor>>>()?;
            factors_per_equation.push(factors);
        }

        let mut candidates: Vec<Vec<f64>> = Vec::new();
        let mut choice = vec![0usize; n];
        'combinations: loop {
            let rows: Vec<&LinearFactor> = (0..n).map(|i| &factors_per_equation[i][choice[i]]).collect();
            if let Some(point) = solve_linear(&rows) {
                if self.satisfies_all(&point) && !candidates.iter().any(|c| same_point(c, &point)) {
                    candidates.push(point);
                }
            }
            // next combination, odometer style
            let mut i = n;
            loop {
                if i == 0 {
                    break 'combinations;
                }
                i -= 1;
                choice[i] += 1;
                if choice[i] < factors_per_equation[i].len() {
                    continue 'combinations;
                }
                choice[i] = 0;
            }
        }

        candidates.sort_by(|p, q| lexicographic(p, q));
        self.solutions = candidates
            .into_iter()
            .map(|values| EquilibriumPoint {
                unknowns: self.unknowns.clone(),
                values,
            })
            .collect();
        info!("found {} equilibrium point(s)", self.solutions.len());
        Ok(self.solutions.as_slice())
    }

    /// last solution in lexicographic order
    pub fn last(&self) -> Result<&EquilibriumPoint> {
        self.solutions.last().ok_or(LoKiError::NoEquilibrium)
    }

    /// point where all populations coexist (no component is zero)
    pub fn coexistence(&self) -> Result<&EquilibriumPoint> {
        self.solutions
            .iter()
            .find(|p| p.is_nontrivial())
            .ok_or(LoKiError::NoEquilibrium)
    }

    fn vars(&self) -> Vec<&str> {
        self.unknowns.iter().map(|u| u.as_str()).collect()
    }

    fn evaluate(&self, expr: &Expr, point: &[f64]) -> f64 {
        let f = expr.clone().lambdify_owned(self.vars());
        f(point.to_vec())
    }

    /// Extracts the coefficients of a factor and checks that it is linear:
    /// every partial derivative must be the same at two different points and
    /// the linear form must reproduce the factor at a probe point.
    fn linearize(&self, factor: &Expr) -> Result<LinearFactor> {
        let n = self.unknowns.len();
        let origin = vec![0.0; n];
        let probe: Vec<f64> = (0..n).map(|i| 1.3 + 0.7 * i as f64).collect();
        let not_linear = || LoKiError::NonLinearFactor {
            factor: factor.to_string(),
            unknowns: self.unknowns.clone(),
        };

        let constant = self.evaluate(factor, &origin);
        let mut coeffs = Vec::with_capacity(n);
        for unknown in &self.unknowns {
            let derivative = factor.clone().diff(unknown);
            let at_origin = self.evaluate(&derivative, &origin);
            let at_probe = self.evaluate(&derivative, &probe);
            if !close(at_origin, at_probe) {
                return Err(not_linear());
            }
            coeffs.push(at_origin);
        }
        let predicted = constant + coeffs.iter().zip(&probe).map(|(c, p)| c * p).sum::<f64>();
        if !close(predicted, self.evaluate(factor, &probe)) {
            return Err(not_linear());
        }
        Ok(LinearFactor { coeffs, constant })
    }

    fn satisfies_all(&self, point: &[f64]) -> bool {
        self.equations.iter().all(|eq| {
            let value = self.evaluate(eq, point);
            value.is_finite() && value.abs() <= SOLUTION_TOL * (1.0 + norm_inf(point))
        })
    }
}

/// Splits nested products into their factors.
fn factorize(expr: &Expr) -> Vec<Expr> {
    match expr {
        Expr::Mul(lhs, rhs) => {
            let mut factors = factorize(lhs.as_ref());
            factors.extend(factorize(rhs.as_ref()));
            factors
        }
        other => vec![other.clone()],
    }
}

fn solve_linear(rows: &[&LinearFactor]) -> Option<Vec<f64>> {
    let n = rows.len();
    let a = DMatrix::from_fn(n, n, |i, j| rows[i].coeffs[j]);
    let b = DVector::from_fn(n, |i, _| -rows[i].constant);
    let scale = a.amax().max(1.0);
    if a.clone().determinant().abs() <= 1e-12 * scale.powi(n as i32) {
        return None;
    }
    a.lu().solve(&b).map(|x| x.iter().cloned().collect())
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-10 * (1.0 + a.abs().max(b.abs()))
}

fn norm_inf(point: &[f64]) -> f64 {
    point.iter().fold(0.0, |m, v| m.max(v.abs()))
}

fn same_point(p: &[f64], q: &[f64]) -> bool {
    p.iter()
        .zip(q)
        .all(|(a, b)| (a - b).abs() <= SOLUTION_TOL * (1.0 + a.abs().max(b.abs())))
}

fn lexicographic(p: &[f64], q: &[f64]) -> Ordering {
    for (a, b) in p.iter().zip(q) {
        match a.partial_cmp(b) {
            Some(Ordering::Equal) | None => continue,
            Some(ord) => return ord,
        }
    }
    Ordering::Equal
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PopulationDynamics::lotka_volterra::LotkaVolterraParams;
    use approx::assert_relative_eq;

    fn xy() -> Vec<String> {
        vec!["x".to_owned(), "y".to_owned()]
    }

    #[test]
    fn predator_prey_equilibria() {
        let params = LotkaVolterraParams::default();
        let mut solver = EquilibriumSolver::new(params.symbolic_rhs(), xy()).unwrap();
        let solutions = solver.solve().unwrap().to_vec();
        assert_eq!(solutions.len(), 2);
        assert_relative_eq!(solutions[0].values[0], 0.0, epsilon = 1e-12);
        assert_relative_eq!(solutions[0].values[1], 0.0, epsilon = 1e-12);

        let last = solver.last().unwrap();
        assert_relative_eq!(last.get("x").unwrap(), 4.0, epsilon = 1e-10);
        assert_relative_eq!(last.get("y").unwrap(), 2.75, epsilon = 1e-10);
        assert_eq!(solver.coexistence().unwrap(), last);
    }

    #[test]
    fn equilibrium_follows_the_rates() {
        let params = LotkaVolterraParams::new(2.0, 0.5, 0.25, 1.5).unwrap();
        let mut solver = EquilibriumSolver::new(params.symbolic_rhs(), xy()).unwrap();
        solver.solve().unwrap();
        let (xe, ye) = params.analytic_equilibrium();
        let point = solver.coexistence().unwrap();
        assert_relative_eq!(point.values[0], xe, epsilon = 1e-10);
        assert_relative_eq!(point.values[1], ye, epsilon = 1e-10);
    }

    #[test]
    fn nonlinear_factor_is_reported() {
        let x = Expr::Var("x".to_owned());
        let y = Expr::Var("y".to_owned());
        let equations = vec![
            Expr::Pow(Box::new(x.clone()), Box::new(Expr::Const(2.0))) - Expr::Const(4.0),
            y - x,
        ];
        let mut solver = EquilibriumSolver::new(equations, xy()).unwrap();
        assert!(matches!(solver.solve(), Err(LoKiError::NonLinearFactor { .. })));
    }

    #[test]
    fn inconsistent_system_has_no_equilibrium() {
        let x = Expr::Var("x".to_owned());
        let y = Expr::Var("y".to_owned());
        let equations = vec![x.clone() + y.clone() - Expr::Const(1.0), x + y - Expr::Const(2.0)];
        let mut solver = EquilibriumSolver::new(equations, xy()).unwrap();
        assert!(solver.solve().unwrap().is_empty());
        assert!(matches!(solver.last(), Err(LoKiError::NoEquilibrium)));
    }

    #[test]
    fn non_square_system_is_rejected() {
        let x = Expr::Var("x".to_owned());
        assert!(EquilibriumSolver::new(vec![x], xy()).is_err());
    }

    #[test]
    fn display_lists_components() {
        let point = EquilibriumPoint {
            unknowns: xy(),
            values: vec![4.0, 2.75],
        };
        assert_eq!(point.to_string(), "(4, 2.75)");
        assert!(point.is_nontrivial());
    }
}
