//! # Population Dynamics
//!
//! Lotka-Volterra predator-prey model
//! ```text
//! dx/dt = (a - b*y)*x      x - prey
//! dy/dt = (c*x - d)*y      y - predator
//! ```
//! The same system is integrated by two different IVP solvers of RustedSciThe
//! (explicit adaptive Runge-Kutta and implicit multistep BDF), both results are
//! resampled onto one uniform time grid and compared. The stationary points are
//! found by a symbolic solve of the right-hand side set equal to zero.
//!
//! ## Usage
//! ```rust, ignore
//! use LoKi::PopulationDynamics::lotka_volterra::PopulationTask;
//! use LoKi::PopulationDynamics::population_IVP::{IntegrationMethod, PopulationIVP};
//!
//! let task = PopulationTask::default();
//! let mut ivp = PopulationIVP::new(task.clone(), IntegrationMethod::RK45);
//! ivp.solve()?;
//! let trajectory = ivp.get_trajectory()?;
//! ```
pub mod equilibrium;
pub mod lotka_volterra;
pub mod population_IVP;
pub mod population_pipeline;
pub mod population_plots;
