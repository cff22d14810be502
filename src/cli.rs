pub mod cli_circuit;
pub mod cli_main;
pub mod cli_population;
