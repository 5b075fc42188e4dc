use std::error::Error as StdError;
use std::io::{self, Write};

use anyhow::Error;
use mdkernel::platform::reference::{KernelError as ReferenceKernelError, PLATFORM_NAME};
use mdkernel::{ConfigurationError, Error as DispatchError};

use crate::util::text::wrap;

#[rustfmt::skip]
pub fn print_error(err: &Error) {
    let mut stderr = io::stderr().lock();

    let _ = writeln!(stderr);
    let _ = writeln!(stderr, "   ╔══════════════════════════════════════════════════════════════╗");
    let _ = writeln!(stderr, "   ║  ✗ Error                                                     ║");
    let _ = writeln!(stderr, "   ╟──────────────────────────────────────────────────────────────╢");

    for line in wrap(&err.to_string(), 59) {
        let _ = writeln!(stderr, "   ║  {:<59} ║", line);
    }

    for cause in err.chain().skip(1) {
        let _ = writeln!(stderr, "   ╟──────────────────────────────────────────────────────────────╢");
        let _ = writeln!(stderr, "   ║  Caused by:                                                  ║");
        for line in wrap(&cause.to_string(), 57) {
            let _ = writeln!(stderr, "   ║    {:<57} ║", line);
        }
    }

    let hints = hints_for(err);
    if !hints.is_empty() {
        let _ = writeln!(stderr, "   ╟──────────────────────────────────────────────────────────────╢");
        let _ = writeln!(stderr, "   ║  Hints:                                                      ║");
        for hint in hints {
            let wrapped = wrap(&hint, 55);
            if let Some((first, rest)) = wrapped.split_first() {
                let _ = writeln!(stderr, "   ║    • {:<55} ║", first);
                for line in rest {
                    let _ = writeln!(stderr, "   ║      {:<55} ║", line);
                }
            }
        }
    }

    let _ = writeln!(stderr, "   ╚══════════════════════════════════════════════════════════════╝");
    let _ = writeln!(stderr);
}

fn hints_for(err: &Error) -> Vec<String> {
    let mut collector = HintCollector::default();
    for cause in err.chain() {
        collector.visit(cause);
    }
    collector.hints
}

#[derive(Default)]
struct HintCollector {
    hints: Vec<String>,
}

impl HintCollector {
    fn add(&mut self, hint: impl Into<String>) {
        self.hints.push(hint.into());
    }

    fn visit(&mut self, cause: &(dyn StdError + 'static)) {
        if let Some(err) = cause.downcast_ref::<DispatchError>() {
            self.dispatch_hints(err);
        } else if let Some(err) = cause.downcast_ref::<ConfigurationError>() {
            self.configuration_hints(err);
        } else if let Some(err) = cause.downcast_ref::<ReferenceKernelError>() {
            self.reference_hints(err);
        } else if let Some(err) = cause.downcast_ref::<toml::de::Error>() {
            if let Some(span) = err.span() {
                self.add(format!("The TOML parser stopped at byte offset {}", span.start));
            }
            self.add("Valid keys are system, steps, step_size and report_interval");
        } else if let Some(err) = cause.downcast_ref::<io::Error>() {
            self.io_hints(err);
        }
    }

    fn dispatch_hints(&mut self, err: &DispatchError) {
        match err {
            DispatchError::KernelNotFound { name, platform } => {
                self.add(format!("Platform '{platform}' has no factory for '{name}'"));
                self.add("Run `mdk platform` to list the kernels it provides");
                if platform != PLATFORM_NAME {
                    self.add(format!(
                        "The '{PLATFORM_NAME}' platform implements every built-in kernel"
                    ));
                }
            }
            DispatchError::KernelMismatch { name, found } => {
                self.add(format!(
                    "The factory registered for '{name}' built a '{found}' kernel instead"
                ));
                self.add("Check the name-to-variant mapping in that kernel factory");
            }
            DispatchError::NotInitialized { component } => {
                self.add(format!("{component} must be initialized before evaluation"));
                self.add("Bindings created by SimulationContext::new are initialized for you");
            }
            DispatchError::AlreadyInitialized { component } => {
                self.add(format!("{component} binds its kernels only once"));
            }
            DispatchError::Kernel(inner) => {
                if let Some(err) = inner.downcast_ref::<ReferenceKernelError>() {
                    self.reference_hints(err);
                }
            }
            DispatchError::Stream { .. } => {
                self.add("Stream uploads and downloads must match the stream's size exactly");
            }
            DispatchError::ParticleCountMismatch { what, expected, .. } => {
                self.add(format!("Supply exactly {expected} {what}, one per particle"));
            }
            DispatchError::Configuration(err) => self.configuration_hints(err),
        }
    }

    fn configuration_hints(&mut self, err: &ConfigurationError) {
        match err {
            ConfigurationError::NonAxisAlignedBoxVector { axis, .. } => {
                self.add(format!(
                    "Periodic boxes must be rectangular: the {} vector needs only a {} component",
                    axis.ordinal(),
                    axis
                ));
            }
            ConfigurationError::IndexOutOfRange { kind, len, .. } => {
                self.add(format!("Valid {kind} indices are 0..{len}"));
            }
            ConfigurationError::InvalidParameter { name, .. } => {
                self.add(format!("Check the value given for {name}"));
                if *name == "step size" {
                    self.add("Use --dt or step_size in the run configuration");
                }
            }
        }
    }

    fn reference_hints(&mut self, err: &ReferenceKernelError) {
        match err {
            ReferenceKernelError::ParticleOutOfRange { term, .. } => {
                self.add(format!(
                    "Every {term} must refer to particles added with System::add_particle"
                ));
            }
            ReferenceKernelError::AtomCountMismatch { .. } => {
                self.add("Call NonbondedForce::add_atom once for every particle in the system");
            }
            ReferenceKernelError::CutoffTooLarge { half_box, .. } => {
                self.add(format!("Use a cutoff of at most {half_box} nm or enlarge the box"));
            }
            ReferenceKernelError::NegativeMass { .. } => {
                self.add("Masses must be positive; use 0 to hold a particle fixed");
            }
        }
    }

    fn io_hints(&mut self, err: &io::Error) {
        match err.kind() {
            io::ErrorKind::NotFound => {
                self.add("Check that the configuration file path is correct");
            }
            io::ErrorKind::PermissionDenied => {
                self.add("Check file permissions with `ls -la`");
            }
            io::ErrorKind::InvalidData => {
                self.add("The configuration file must be UTF-8 encoded TOML");
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn dispatch_errors_get_hints_through_context() {
        let err = Err::<(), _>(DispatchError::kernel_not_found("CalcFooKernel", "Custom"))
            .context("Failed to create simulation context")
            .unwrap_err();

        let hints = hints_for(&err);
        assert!(hints.iter().any(|h| h.contains("CalcFooKernel")));
        assert!(hints.iter().any(|h| h.contains("mdk platform")));
    }

    #[test]
    fn reference_errors_are_found_inside_kernel_variant() {
        let inner = ReferenceKernelError::CutoffTooLarge {
            cutoff: 2.0,
            half_box: 1.5,
        };
        let err = Error::from(DispatchError::Kernel(Box::new(inner)));

        let hints = hints_for(&err);
        assert!(hints.iter().any(|h| h.contains("1.5 nm")));
    }

    #[test]
    fn io_not_found_hint() {
        let err = Error::from(io::Error::from(io::ErrorKind::NotFound));
        assert_eq!(hints_for(&err).len(), 1);
    }

    #[test]
    fn unrelated_errors_have_no_hints() {
        let err = anyhow::anyhow!("something else");
        assert!(hints_for(&err).is_empty());
    }
}
