use std::process::ExitCode;

mod cli;
mod commands;
mod config;
mod demo;
mod display;
mod logging;
mod util;

fn main() -> ExitCode {
    let cli = cli::parse();
    logging::init(cli.log_level.into());
    let ctx = display::Context::detect().with_quiet(cli.quiet);

    match commands::dispatch(cli.command, ctx) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            display::print_error(&e);
            ExitCode::FAILURE
        }
    }
}
