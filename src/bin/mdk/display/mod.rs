mod error;
mod progress;
mod tables;

use std::io::{self, IsTerminal};

pub use error::print_error;
pub use progress::Progress;
pub use tables::{
    EnergyRow, KernelStatus, print_energy_table, print_kernel_table, print_platform_summary,
};

#[derive(Debug, Clone, Copy)]
pub struct Context {
    pub interactive: bool,
}

impl Context {
    pub fn detect() -> Self {
        Self {
            interactive: io::stderr().is_terminal(),
        }
    }

    pub fn with_quiet(self, quiet: bool) -> Self {
        if quiet {
            Self { interactive: false }
        } else {
            self
        }
    }
}
