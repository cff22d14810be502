//! # Circuit Analysis
//!
//! Branch currents of a two-source resistive network from Kirchhoff's laws
//! ```text
//! ---first Kirchhoff law---
//! I1 = I6 + I5
//! I3 = I1 + I2
//! I4 = I2 + I5
//! ---second Kirchhoff law---
//! E4 = I3*R6 + I4*R5 + I2*r4
//! E1 = I3*R6 + I6*R7 + I1*r1
//! E1 - E4 = I5*R3 + I5*R2 + I1*r1 - I2*r4
//! ```
//! The system is solved by the Newton-Raphson solver of RustedSciThe, the
//! resistances are then shifted in proportion to the computed currents (one
//! perturbation step) and the system is solved again.
pub mod circuit_report;
pub mod circuit_solver;
pub mod kirchhoff;
pub mod perturbation;
