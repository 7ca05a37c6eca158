//! Identifier to implementation mapping.

use crate::deployment::{ActionError, Deployment};
use crate::error::{DeployError, DeployResult};
use std::collections::HashMap;
use sv_core::DeploymentName;

type Factory = Box<dyn Fn() -> Result<Box<dyn Deployment>, ActionError>>;

/// Explicit registry of deployment factories keyed by identifier.
///
/// Units are instantiated lazily, once per resolution, so a unit that is
/// never pending is never constructed.
#[derive(Default)]
pub struct DeploymentRegistry {
    factories: HashMap<DeploymentName, Factory>,
}

impl DeploymentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory for `name`. Fails if the name is already taken.
    pub fn register<F>(&mut self, name: DeploymentName, factory: F) -> DeployResult<()>
    where
        F: Fn() -> Result<Box<dyn Deployment>, ActionError> + 'static,
    {
        if self.factories.contains_key(&name) {
            return Err(DeployError::DuplicateRegistration {
                name: name.into_inner(),
            });
        }
        self.factories.insert(name, Box::new(factory));
        Ok(())
    }

    /// Register a unit value; each resolution yields a clone of it.
    pub fn register_unit<D>(&mut self, name: DeploymentName, unit: D) -> DeployResult<()>
    where
        D: Deployment + Clone + 'static,
    {
        self.register(name, move || Ok(Box::new(unit.clone()) as Box<dyn Deployment>))
    }

    pub fn contains(&self, name: &DeploymentName) -> bool {
        self.factories.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// Instantiate the unit registered for `name`.
    pub fn resolve(&self, name: &DeploymentName) -> DeployResult<Box<dyn Deployment>> {
        let factory = self
            .factories
            .get(name)
            .ok_or_else(|| DeployError::Resolution {
                name: name.to_string(),
                reason: "no implementation registered".to_string(),
            })?;
        factory().map_err(|e| DeployError::Resolution {
            name: name.to_string(),
            reason: e.to_string(),
        })
    }
}
