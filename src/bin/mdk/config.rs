use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::Deserialize;

use crate::cli::RunArgs;
use crate::demo::Demo;

/// Settings for `mdk run`, read from TOML and overridden by flags.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunConfig {
    #[serde(default)]
    pub system: Demo,
    #[serde(default = "default_steps")]
    pub steps: usize,
    /// ps
    #[serde(default = "default_step_size")]
    pub step_size: f64,
    #[serde(default = "default_report_interval")]
    pub report_interval: usize,
}

fn default_steps() -> usize {
    1000
}

fn default_step_size() -> f64 {
    0.0005
}

fn default_report_interval() -> usize {
    100
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            system: Demo::default(),
            steps: default_steps(),
            step_size: default_step_size(),
            report_interval: default_report_interval(),
        }
    }
}

impl RunConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read run configuration '{}'", path.display()))?;
        Self::parse(&text)
            .with_context(|| format!("Invalid run configuration '{}'", path.display()))
    }

    fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Loads `args.config` if given, then applies the flags that were set.
    pub fn resolve(args: &RunArgs) -> Result<Self> {
        let base = match &args.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        let config = base.with_overrides(args);
        config.validate()?;
        Ok(config)
    }

    fn with_overrides(self, args: &RunArgs) -> Self {
        Self {
            system: args.system.unwrap_or(self.system),
            steps: args.steps.unwrap_or(self.steps),
            step_size: args.step_size.unwrap_or(self.step_size),
            report_interval: args.report_interval.unwrap_or(self.report_interval),
        }
    }

    fn validate(&self) -> Result<()> {
        if self.report_interval == 0 {
            bail!("report interval must be at least one step");
        }
        if !(self.step_size.is_finite() && self.step_size > 0.0) {
            bail!("step size must be a positive number of picoseconds, got {}", self.step_size);
        }
        Ok(())
    }
}
