use super::cli_circuit::circuit_task;
use super::cli_population::population_task;
use crate::PopulationDynamics::population_plots::PlotBackend;
use crate::Utils::errors::Result;
use crate::Utils::task_config::TaskConfig;
use clap::{Parser, ValueEnum};
use log::error;
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Task {
    /// Lotka-Volterra integration and equilibrium
    Population,
    /// Kirchhoff circuit before and after perturbation
    Circuit,
    /// both tasks, population first
    All,
    /// interactive menu
    Menu,
}

/// Predator-prey dynamics and Kirchhoff circuit analysis
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[arg(value_enum, default_value_t = Task::All)]
    pub task: Task,

    /// JSON file with task parameters
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// do not draw the population charts
    #[arg(long)]
    pub no_plot: bool,

    /// draw the population charts in the terminal instead of PNG files
    #[arg(long, conflicts_with = "no_plot")]
    pub terminal_plot: bool,

    /// print summary tables of the circuit
    #[arg(long)]
    pub table: bool,

    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Task configuration with the command line switches applied on top.
    pub fn task_config(&self) -> Result<TaskConfig> {
        let mut config = match &self.config {
            Some(path) => TaskConfig::from_file(path)?,
            None => TaskConfig::default(),
        };
        if self.no_plot {
            config.plot = PlotBackend::Disabled;
        } else if self.terminal_plot {
            config.plot = PlotBackend::Terminal;
        }
        Ok(config)
    }
}

pub fn run(args: &Args) -> Result<()> {
    let config = args.task_config()?;
    match args.task {
        Task::Population => population_task(&config),
        Task::Circuit => circuit_task(&config, args.table),
        Task::All => {
            population_task(&config)?;
            println!();
            circuit_task(&config, args.table)
        }
        Task::Menu => {
            run_interactive_menu(&config);
            Ok(())
        }
    }
}

pub fn run_interactive_menu(config: &TaskConfig) {
    loop {
        show_main_menu();
        let Some(choice) = get_user_input() else {
            break;
        };
        let result = match choice.trim() {
            "1" => population_task(config),
            "2" => circuit_task(config, false),
            "3" => circuit_task(config, true),
            "0" => {
                println!("Goodbye!");
                break;
            }
            _ => {
                println!("Invalid choice. Please try again.");
                Ok(())
            }
        };
        if let Err(e) = result {
            error!("{}", e);
            println!("Error: {}", e);
        }
    }
}

/* colors
Blue (\x1b[34m) - header
Yellow (\x1b[33m) - menu options
Cyan (\x1b[36m) - prompt
*/
fn show_main_menu() {
    println!("\x1b[34m\n LoKi: predator-prey dynamics and circuit analysis \n\x1b[0m");
    println!("\x1b[33m1. Lotka-Volterra model\x1b[0m");
    println!("\x1b[33m2. Kirchhoff circuit\x1b[0m");
    println!("\x1b[33m3. Kirchhoff circuit with summary tables\x1b[0m");
    println!("\x1b[33m0. Exit\x1b[0m");
    print!("\x1b[36mEnter your choice: \x1b[0m");
    let _ = io::stdout().flush();
}

/// None on end of input or read failure
fn get_user_input() -> Option<String> {
    let mut input = String::new();
    match io::stdin().read_line(&mut input) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(input),
    }
}
