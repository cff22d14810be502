use LoKi::Utils::logger::init_logger;
use LoKi::cli::cli_main::{Args, run};
use clap::Parser;
use log::error;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args = Args::parse();
    init_logger(args.verbose);
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
