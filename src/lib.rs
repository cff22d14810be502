#[allow(non_snake_case)]
pub mod CircuitAnalysis;
#[allow(non_snake_case)]
pub mod PopulationDynamics;
#[allow(non_snake_case)]
pub mod Utils;
pub mod cli;
