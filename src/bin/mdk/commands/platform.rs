use anyhow::{Context as _, Result};
use log::debug;
use mdkernel::Platform;

use crate::cli::PlatformArgs;
use crate::display::{self, Context, KernelStatus};

pub fn run_platform(args: PlatformArgs, _ctx: Context) -> Result<()> {
    let platform = Platform::reference();
    debug!("Inspecting platform {platform:?}");

    display::print_platform_summary(&platform);

    let required: Vec<&str> = args.require.iter().map(String::as_str).collect();
    let missing = platform.missing_kernels(&required);
    display::print_kernel_table(&kernel_rows(&platform, &required, &missing));

    match missing.first() {
        None => Ok(()),
        Some(&name) => Err(mdkernel::Error::kernel_not_found(name, platform.name()))
            .with_context(|| {
                format!(
                    "{} of {} required kernels are not available",
                    missing.len(),
                    required.len()
                )
            }),
    }
}

fn kernel_rows<'n>(
    platform: &'n Platform,
    required: &[&'n str],
    missing: &[&'n str],
) -> Vec<(&'n str, KernelStatus)> {
    let mut rows: Vec<(&str, KernelStatus)> = platform
        .kernel_names()
        .into_iter()
        .map(|name| {
            let status = if required.contains(&name) {
                KernelStatus::Required
            } else {
                KernelStatus::Registered
            };
            (name, status)
        })
        .collect();
    rows.extend(missing.iter().map(|&name| (name, KernelStatus::Missing)));
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_mark_required_and_missing() {
        let platform = Platform::reference();
        let required = ["CalcHarmonicBondForceKernel", "CalcGBSAOBCForceKernel"];
        let missing = platform.missing_kernels(&required);
        let rows = kernel_rows(&platform, &required, &missing);

        assert!(rows.contains(&("CalcHarmonicBondForceKernel", KernelStatus::Required)));
        assert!(rows.contains(&("CalcNonbondedForceKernel", KernelStatus::Registered)));
        assert_eq!(
            rows.last(),
            Some(&("CalcGBSAOBCForceKernel", KernelStatus::Missing))
        );
    }

    #[test]
    fn missing_requirement_is_an_error() {
        let args = PlatformArgs {
            require: vec!["CalcGBSAOBCForceKernel".to_string()],
        };
        let err = run_platform(args, Context { interactive: false }).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<mdkernel::Error>(),
            Some(mdkernel::Error::KernelNotFound { .. })
        ));
    }
}
