use log::LevelFilter;
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

/// Maps the `--verbose` switch onto a log level.
pub fn level_for(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Info
    } else {
        LevelFilter::Warn
    }
}

/// Installs the terminal logger. A second call is a no-op: the global logger
/// can only be set once per process.
pub fn init_logger(verbose: bool) {
    let _ = TermLogger::init(
        level_for(verbose),
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    );
}
