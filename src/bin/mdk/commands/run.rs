use std::sync::Arc;

use anyhow::{Context as _, Result};
use log::info;
use mdkernel::{Integrator, Platform, SimulationContext, VerletIntegrator};

use crate::cli::RunArgs;
use crate::config::RunConfig;
use crate::demo;
use crate::display::{self, Context, EnergyRow, Progress};

const TOTAL_STEPS: u8 = 3;

pub fn run_simulation(args: RunArgs, ctx: Context) -> Result<()> {
    let config = RunConfig::resolve(&args)?;
    info!("Run configuration: {config:?}");

    let rows = simulate(&config, Progress::new(ctx.interactive, TOTAL_STEPS))?;

    display::print_energy_table(
        &format!("Energies (kJ/mol): {}", config.system.label()),
        &rows,
    );
    Ok(())
}

fn simulate(config: &RunConfig, mut progress: Progress) -> Result<Vec<EnergyRow>> {
    progress.step("Building system");
    let demo = demo::build(config.system);
    progress.complete_step(
        "Building system",
        &[
            format!("{} particles", demo.system.num_particles()),
            format!("{} forces", demo.system.num_forces()),
        ],
    );

    progress.step("Creating context");
    let integrator: Integrator = VerletIntegrator::new(config.step_size)?.into();
    let platform = Arc::new(Platform::reference());
    let mut context = SimulationContext::new(&demo.system, &integrator, platform)
        .with_context(|| format!("Failed to create a context for the {}", config.system.label()))?;
    context.set_positions(&demo.positions)?;
    context.set_velocities(&demo.velocities)?;
    let kernels: Vec<String> = context
        .kernel_names()
        .into_iter()
        .map(str::to_string)
        .collect();
    progress.complete_step("Creating context", &kernels);

    progress.step("Integrating");
    let mut rows = vec![EnergyRow::new(0, &context.state()?)];
    let mut done = 0;
    while done < config.steps {
        let chunk = config.report_interval.min(config.steps - done);
        context
            .step(chunk)
            .with_context(|| format!("Integration failed after {done} steps"))?;
        done += chunk;
        rows.push(EnergyRow::new(done, &context.state()?));
        progress.update(&format!("{done}/{} steps", config.steps));
    }
    progress.complete_step(
        "Integrating",
        &[format!("{} steps of {} ps", config.steps, config.step_size)],
    );
    progress.finish("Run complete");

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demo::Demo;

    fn config(system: Demo, steps: usize, step_size: f64, report_interval: usize) -> RunConfig {
        RunConfig {
            system,
            steps,
            step_size,
            report_interval,
        }
    }

    #[test]
    fn reports_initial_state_and_every_interval() {
        let rows = simulate(&config(Demo::ArgonPair, 25, 0.0005, 10), Progress::Silent).unwrap();
        let steps: Vec<usize> = rows.iter().map(|r| r.step).collect();
        assert_eq!(steps, vec![0, 10, 20, 25]);
        assert!((rows[3].time - 25.0 * 0.0005).abs() < 1e-12);
    }

    #[test]
    fn water_conserves_energy() {
        let rows = simulate(&config(Demo::Water, 400, 0.00005, 100), Progress::Silent).unwrap();
        let first = rows[0].total();
        assert!(first > 0.0);
        assert_eq!(rows[0].kinetic, 0.0);
        for row in &rows[1..] {
            assert!(
                (row.total() - first).abs() < 0.05 * first,
                "step {}: {} vs {}",
                row.step,
                row.total(),
                first
            );
        }
    }

    #[test]
    fn argon_pair_attracts_from_rest() {
        let rows = simulate(&config(Demo::ArgonPair, 200, 0.0005, 200), Progress::Silent).unwrap();
        assert!(rows[0].potential < 0.0);
        assert!(rows[1].kinetic > 0.0);
    }
}
