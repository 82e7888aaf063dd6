//! Name-to-constructor table of backends.

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::backend::{Backend, BackendConfig, BackendFactory};
use crate::error::{HalError, HalResult};

type Constructor = Box<dyn Fn(BackendConfig) -> HalResult<Box<dyn Backend>> + Send + Sync>;

/// Backends known by name, plus short aliases.
///
/// Lookups ignore ASCII case, so `Simulator`, `simulator` and a registered
/// alias such as `sim` all resolve to the same constructor.
#[derive(Default)]
pub struct BackendRegistry {
    constructors: FxHashMap<String, Constructor>,
    aliases: FxHashMap<String, String>,
}

impl BackendRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a backend type built through [`BackendFactory`].
    pub fn register<B>(&mut self, name: &str)
    where
        B: BackendFactory + 'static,
    {
        self.register_with(name, |config| Ok(Box::new(B::from_config(config)?)));
    }

    /// Register a backend with a custom constructor.
    pub fn register_with(
        &mut self,
        name: &str,
        constructor: impl Fn(BackendConfig) -> HalResult<Box<dyn Backend>> + Send + Sync + 'static,
    ) {
        let name = name.to_ascii_lowercase();
        debug!(backend = %name, "registering backend");
        self.constructors.insert(name, Box::new(constructor));
    }

    /// Let `alias` stand for the registered backend `target`.
    pub fn alias(&mut self, alias: &str, target: &str) {
        self.aliases
            .insert(alias.to_ascii_lowercase(), target.to_ascii_lowercase());
    }

    /// Canonical name of a backend or alias.
    pub fn resolve(&self, name: &str) -> HalResult<String> {
        let lower = name.to_ascii_lowercase();
        let canonical = self.aliases.get(&lower).cloned().unwrap_or(lower);
        if self.constructors.contains_key(&canonical) {
            Ok(canonical)
        } else {
            Err(HalError::UnknownBackend {
                name: name.to_string(),
                available: self.names().join(", "),
            })
        }
    }

    /// Build the backend `name` refers to.
    ///
    /// The configuration's name is replaced by the canonical one.
    pub fn create(&self, name: &str, mut config: BackendConfig) -> HalResult<Box<dyn Backend>> {
        let canonical = self.resolve(name)?;
        let constructor = self
            .constructors
            .get(&canonical)
            .ok_or_else(|| HalError::UnknownBackend {
                name: name.to_string(),
                available: self.names().join(", "),
            })?;
        config.name = canonical;
        constructor(config)
    }

    /// Registered canonical names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.constructors.keys().cloned().collect();
        names.sort_unstable();
        names
    }

    /// Whether `name` resolves to a backend.
    pub fn contains(&self, name: &str) -> bool {
        self.resolve(name).is_ok()
    }
}
