use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::error::Error;
use super::kernel::KernelImpl;
use crate::context::ContextView;

/// Constructs kernel implementations by name.
///
/// One factory is usually registered under many names. A factory asked for a
/// name it does not implement returns [`Error::KernelNotFound`].
pub trait KernelFactory: Send + Sync {
    fn create_kernel(&self, name: &str, context: &ContextView<'_>) -> Result<KernelImpl, Error>;
}

impl<F> KernelFactory for F
where
    F: Fn(&str, &ContextView<'_>) -> Result<KernelImpl, Error> + Send + Sync,
{
    fn create_kernel(&self, name: &str, context: &ContextView<'_>) -> Result<KernelImpl, Error> {
        self(name, context)
    }
}

/// Mapping from kernel name to the factory that builds it.
///
/// At most one factory is held per name; registering a name again replaces
/// the earlier factory.
#[derive(Clone, Default)]
pub struct KernelRegistry {
    factories: HashMap<String, Arc<dyn KernelFactory>>,
}

impl KernelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, name: impl Into<String>, factory: Arc<dyn KernelFactory>) {
        let name = name.into();
        log::debug!("registering kernel factory for '{name}'");
        if self.factories.insert(name.clone(), factory).is_some() {
            log::warn!("kernel factory for '{name}' replaced by a later registration");
        }
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn KernelFactory>> {
        self.factories.get(name)
    }

    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered names in lexicographic order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl fmt::Debug for KernelRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KernelRegistry")
            .field("names", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn refusing(name: &str, _: &ContextView<'_>) -> Result<KernelImpl, Error> {
        Err(Error::kernel_not_found(name, "test"))
    }

    #[test]
    fn names_are_sorted() {
        let mut registry = KernelRegistry::new();
        let factory: Arc<dyn KernelFactory> = Arc::new(refusing);
        registry.register("b", factory.clone());
        registry.register("a", factory.clone());
        registry.register("c", factory);
        assert_eq!(registry.names(), vec!["a", "b", "c"]);
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn later_registration_wins() {
        let mut registry = KernelRegistry::new();
        let first: Arc<dyn KernelFactory> = Arc::new(refusing);
        let second: Arc<dyn KernelFactory> = Arc::new(refusing);
        registry.register("CalcHarmonicBondForceKernel", first);
        registry.register("CalcHarmonicBondForceKernel", second.clone());

        assert_eq!(registry.len(), 1);
        let held = registry.get("CalcHarmonicBondForceKernel").unwrap();
        assert!(Arc::ptr_eq(held, &second));
    }

    #[test]
    fn lookup_of_unknown_name() {
        let registry = KernelRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.get("CalcNonbondedForceKernel").is_none());
        assert!(!registry.contains("CalcNonbondedForceKernel"));
    }
}
