use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::demo::Demo;

#[derive(Parser)]
#[command(
    name = "mdk",
    about = "Molecular dynamics kernel dispatch on the reference platform",
    version,
    propagate_version = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Suppress progress output (for scripting)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Log level for mdkernel messages (RUST_LOG takes precedence)
    #[arg(long, value_name = "LEVEL", default_value = "warn", global = true)]
    pub log_level: LogLevel,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show the reference platform's capabilities and kernels
    #[command(visible_alias = "p")]
    Platform(PlatformArgs),

    /// Integrate a built-in demo system and report its energies
    #[command(visible_alias = "r")]
    Run(RunArgs),
}

#[derive(Args)]
pub struct PlatformArgs {
    /// Kernel names that must be available; fails if any is missing
    #[arg(long = "require", value_name = "KERNEL", action = clap::ArgAction::Append)]
    pub require: Vec<String>,
}

#[derive(Args)]
pub struct RunArgs {
    /// Run configuration file (TOML)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Demo system to simulate
    #[arg(short, long, value_name = "SYSTEM")]
    pub system: Option<Demo>,

    /// Number of integration steps
    #[arg(short = 'n', long, value_name = "N")]
    pub steps: Option<usize>,

    /// Integration step size (ps)
    #[arg(long = "dt", value_name = "PS")]
    pub step_size: Option<f64>,

    /// Steps between energy reports
    #[arg(long = "report-every", value_name = "N")]
    pub report_interval: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => log::LevelFilter::Off,
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

pub fn parse() -> Cli {
    Cli::parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn run_overrides_are_optional() {
        let cli = Cli::try_parse_from(["mdk", "run"]).unwrap();
        let Command::Run(args) = cli.command else {
            panic!("expected run command");
        };
        assert!(args.config.is_none());
        assert!(args.steps.is_none());
        assert_eq!(cli.log_level, LogLevel::Warn);
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "mdk", "run", "--system", "water", "-n", "50", "--quiet", "--log-level", "debug",
        ])
        .unwrap();
        assert!(cli.quiet);
        assert_eq!(cli.log_level, LogLevel::Debug);
        let Command::Run(args) = cli.command else {
            panic!("expected run command");
        };
        assert_eq!(args.system, Some(Demo::Water));
        assert_eq!(args.steps, Some(50));
    }
}
