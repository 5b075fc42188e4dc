mod platform;
mod run;

use platform::run_platform;
use run::run_simulation;

use anyhow::Result;

use crate::cli::Command;
use crate::display::Context;

pub fn dispatch(command: Command, ctx: Context) -> Result<()> {
    match command {
        Command::Platform(args) => run_platform(args, ctx),
        Command::Run(args) => run_simulation(args, ctx),
    }
}
