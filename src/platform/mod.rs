//! Execution backends and kernel dispatch.
//!
//! A [`Platform`] owns a [`KernelRegistry`] mapping kernel names to
//! factories. Forces and integrators never know which backend runs them:
//! they ask the platform of their context for a kernel by kind, and the
//! platform resolves the name, calls the registered factory, and hands back a
//! typed [`Kernel`] handle.
//!
//! Registration happens only while building a platform with
//! [`PlatformBuilder`]; a built platform is immutable and is shared between
//! contexts through an [`Arc`].
//!
//! - [`kernel`] – Kernel interfaces, kinds and handles.
//! - [`registry`] – [`KernelFactory`] and [`KernelRegistry`].
//! - [`stream`] – Bulk data buffers and their factories.
//! - [`reference`] – The portable CPU reference backend.

mod error;
pub mod kernel;
pub mod reference;
pub mod registry;
pub mod stream;

pub use error::Error;
pub use kernel::{Kernel, KernelError, KernelImpl, KernelKind};
pub use registry::{KernelFactory, KernelRegistry};
pub use stream::{DataType, HostStreamFactory, Stream, StreamFactory};

use std::fmt;
use std::sync::Arc;

use crate::context::ContextView;

/// An execution backend: a set of kernel factories plus capability queries.
pub struct Platform {
    name: String,
    speed: f64,
    double_precision: bool,
    registry: KernelRegistry,
    stream_factory: Arc<dyn StreamFactory>,
}

impl Platform {
    /// Starts building a platform with the given name.
    pub fn builder(name: impl Into<String>) -> PlatformBuilder {
        PlatformBuilder::new(name)
    }

    /// The CPU reference platform with every kernel this crate defines.
    pub fn reference() -> Self {
        reference::platform()
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rough speed relative to the reference platform.
    #[inline]
    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Whether the backend's internal real type is at least as wide as `f64`.
    #[inline]
    pub fn supports_double_precision(&self) -> bool {
        self.double_precision
    }

    pub fn default_stream_factory(&self) -> &dyn StreamFactory {
        self.stream_factory.as_ref()
    }

    #[inline]
    pub fn registry(&self) -> &KernelRegistry {
        &self.registry
    }

    /// Registered kernel names in lexicographic order.
    pub fn kernel_names(&self) -> Vec<&str> {
        self.registry.names()
    }

    /// Whether a factory is registered for every name in `names`.
    pub fn supports_kernels(&self, names: &[&str]) -> bool {
        names.iter().all(|name| self.registry.contains(name))
    }

    /// The names from `names` that have no registered factory, in order.
    pub fn missing_kernels<'n>(&self, names: &[&'n str]) -> Vec<&'n str> {
        names
            .iter()
            .copied()
            .filter(|name| !self.registry.contains(name))
            .collect()
    }

    /// Constructs the kernel registered under `name`.
    ///
    /// # Errors
    ///
    /// [`Error::KernelNotFound`] if no factory is registered for `name`;
    /// otherwise whatever the factory returns.
    pub fn create_kernel_impl(
        &self,
        name: &str,
        context: &ContextView<'_>,
    ) -> Result<KernelImpl, Error> {
        let factory = self
            .registry
            .get(name)
            .ok_or_else(|| Error::kernel_not_found(name, &self.name))?;
        log::debug!("creating kernel '{name}' on platform '{}'", self.name);
        factory.create_kernel(name, context)
    }

    /// Constructs the kernel of kind `K`, typed by its interface.
    ///
    /// # Errors
    ///
    /// [`Error::KernelNotFound`] if no factory is registered for `K::NAME`,
    /// [`Error::KernelMismatch`] if the factory builds a kernel of another
    /// kind, or any error the factory itself returns.
    pub fn create_kernel<K: KernelKind>(
        &self,
        context: &ContextView<'_>,
    ) -> Result<Kernel<K>, Error> {
        let kernel = self.create_kernel_impl(K::NAME, context)?;
        K::from_impl(kernel)
            .map(Kernel::new)
            .map_err(|other| Error::KernelMismatch {
                name: K::NAME.to_string(),
                found: other.name(),
            })
    }

    /// Creates a stream with the platform's default stream factory.
    pub fn create_stream(
        &self,
        name: &str,
        size: usize,
        data_type: DataType,
        context: &ContextView<'_>,
    ) -> Result<Stream, Error> {
        let inner = self
            .stream_factory
            .create_stream_impl(name, size, data_type, context)?;
        Ok(Stream::new(inner))
    }
}

impl fmt::Debug for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Platform")
            .field("name", &self.name)
            .field("speed", &self.speed)
            .field("double_precision", &self.double_precision)
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}

/// Builder for a [`Platform`]; the only place kernel factories are registered.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use mdkernel::platform::{reference::ReferenceKernelFactory, KernelFactory};
/// use mdkernel::Platform;
///
/// let factory: Arc<dyn KernelFactory> = Arc::new(ReferenceKernelFactory);
/// let platform = Platform::builder("BondsOnly")
///     .register_kernel_factory("CalcHarmonicBondForceKernel", factory)
///     .build();
///
/// assert!(platform.supports_kernels(&["CalcHarmonicBondForceKernel"]));
/// assert!(!platform.supports_kernels(&["CalcNonbondedForceKernel"]));
/// ```
pub struct PlatformBuilder {
    name: String,
    speed: f64,
    double_precision: bool,
    registry: KernelRegistry,
    stream_factory: Arc<dyn StreamFactory>,
}

impl PlatformBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            speed: 1.0,
            double_precision: true,
            registry: KernelRegistry::new(),
            stream_factory: Arc::new(HostStreamFactory),
        }
    }

    /// Registers `factory` for `name`, replacing any earlier registration.
    pub fn register_kernel_factory(
        mut self,
        name: impl Into<String>,
        factory: Arc<dyn KernelFactory>,
    ) -> Self {
        self.registry.register(name, factory);
        self
    }

    /// Registers one shared `factory` for every name in `names`.
    pub fn register_kernel_factories(
        mut self,
        names: &[&str],
        factory: Arc<dyn KernelFactory>,
    ) -> Self {
        for name in names {
            self.registry.register(*name, Arc::clone(&factory));
        }
        self
    }

    pub fn speed(mut self, speed: f64) -> Self {
        self.speed = speed;
        self
    }

    pub fn double_precision(mut self, supported: bool) -> Self {
        self.double_precision = supported;
        self
    }

    pub fn stream_factory(mut self, factory: Arc<dyn StreamFactory>) -> Self {
        self.stream_factory = factory;
        self
    }

    pub fn build(self) -> Platform {
        log::debug!(
            "platform '{}' built with {} kernel factories",
            self.name,
            self.registry.len()
        );
        Platform {
            name: self.name,
            speed: self.speed,
            double_precision: self.double_precision,
            registry: self.registry,
            stream_factory: self.stream_factory,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ContextState;
    use crate::model::system::System;

    fn refusing(name: &str, _: &ContextView<'_>) -> Result<KernelImpl, Error> {
        Err(Error::kernel_not_found(name, "refusing"))
    }

    #[test]
    fn builder_defaults() {
        let platform = Platform::builder("Empty").build();
        assert_eq!(platform.name(), "Empty");
        assert_eq!(platform.speed(), 1.0);
        assert!(platform.supports_double_precision());
        assert!(platform.kernel_names().is_empty());
    }

    #[test]
    fn missing_kernels_preserves_request_order() {
        let platform = Platform::builder("Partial")
            .register_kernel_factory("B", Arc::new(refusing))
            .build();
        assert_eq!(platform.missing_kernels(&["C", "B", "A"]), vec!["C", "A"]);
        assert!(platform.supports_kernels(&["B"]));
        assert!(platform.supports_kernels(&[]));
    }

    #[test]
    fn shared_factory_under_many_names() {
        let platform = Platform::builder("Shared")
            .register_kernel_factories(&["X", "Y", "Z"], Arc::new(refusing))
            .speed(4.0)
            .double_precision(false)
            .build();
        assert_eq!(platform.kernel_names(), vec!["X", "Y", "Z"]);
        assert_eq!(platform.speed(), 4.0);
        assert!(!platform.supports_double_precision());
    }

    #[test]
    fn unknown_name_is_kernel_not_found() {
        let platform = Platform::builder("Empty").build();
        let system = System::new();
        let state = ContextState::new(0);
        let view = ContextView::new(&platform, &system, &state);

        let err = platform
            .create_kernel::<kernel::kind::CalcNonbondedForce>(&view)
            .unwrap_err();
        assert!(matches!(
            err,
            Error::KernelNotFound { ref name, ref platform }
                if name == "CalcNonbondedForceKernel" && platform == "Empty"
        ));
        assert!(platform.kernel_names().is_empty());
    }

    #[test]
    fn default_stream_factory_creates_host_streams() {
        let platform = Platform::builder("Streams").build();
        let system = System::new();
        let state = ContextState::new(0);
        let view = ContextView::new(&platform, &system, &state);

        let mut stream = platform
            .create_stream("masses", 4, DataType::Double, &view)
            .unwrap();
        stream.fill_with_value(12.0);
        let mut out = [0.0; 4];
        stream.save_to_array(&mut out).unwrap();
        assert_eq!(out, [12.0; 4]);
    }
}
