//! The provider registry: capability descriptors mapped to callbacks.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use monto_core::ProductDescriptor;
use monto_protocol::{ProductRequest, ServiceErrors, ServiceProduct};

use crate::error::{ServeError, ServeResult};

/// A provider callback: takes a broker request and produces a product, or
/// the errors that prevented one.
pub type Provider =
    Box<dyn FnMut(&ProductRequest) -> Result<ServiceProduct, ServiceErrors> + Send>;

/// Maps product descriptors to the providers that can produce them.
///
/// Registration happens before the dispatch loop starts and is not
/// synchronized; the registry is then only read, one lookup per request, by
/// the single task driving the loop.
#[derive(Default)]
pub struct ProviderRegistry {
    providers: BTreeMap<ProductDescriptor, Provider>,
}

impl ProviderRegistry {
    pub fn new() -> ProviderRegistry {
        ProviderRegistry::default()
    }

    /// Registers a provider for a capability.
    ///
    /// A second registration for the same descriptor is rejected, so that
    /// configuration mistakes surface at startup instead of one provider
    /// silently shadowing another.
    pub fn register<F>(&mut self, descriptor: ProductDescriptor, provider: F) -> ServeResult<()>
    where
        F: FnMut(&ProductRequest) -> Result<ServiceProduct, ServiceErrors> + Send + 'static,
    {
        match self.providers.entry(descriptor) {
            Entry::Occupied(entry) => Err(ServeError::DuplicateCapability(entry.key().clone())),
            Entry::Vacant(entry) => {
                entry.insert(Box::new(provider));
                Ok(())
            }
        }
    }

    /// Looks up the provider for a descriptor.
    pub fn lookup(&mut self, descriptor: &ProductDescriptor) -> Option<&mut Provider> {
        self.providers.get_mut(descriptor)
    }

    /// The number of registered providers.
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}
