use std::any::{type_name, Any};
use std::collections::HashMap;

use crate::shared::error::{ComponentError, VideoError};

type Factory<C> = Box<dyn Fn() -> Result<C, ComponentError> + Send + Sync>;

/// Named factories for wrapped components.
///
/// Adapters accept either a ready component or a name that is resolved
/// here. Every resolution builds a fresh instance.
#[derive(Default)]
pub struct ComponentRegistry {
    factories: HashMap<String, Box<dyn Any + Send + Sync>>,
}

impl ComponentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `factory` under `name`, replacing any previous entry.
    pub fn register<C, F>(&mut self, name: impl Into<String>, factory: F)
    where
        C: 'static,
        F: Fn() -> Result<C, ComponentError> + Send + Sync + 'static,
    {
        let name = name.into();
        let boxed: Factory<C> = Box::new(factory);
        if self.factories.insert(name.clone(), Box::new(boxed)).is_some() {
            log::debug!("Replaced component factory '{}'", name);
        }
    }

    pub fn resolve<C: 'static>(&self, name: &str) -> Result<C, VideoError> {
        let factory = self
            .factories
            .get(name)
            .ok_or_else(|| VideoError::ComponentResolution {
                name: name.to_string(),
                reason: "no component registered under this name".to_string(),
            })?
            .downcast_ref::<Factory<C>>()
            .ok_or_else(|| VideoError::ComponentResolution {
                name: name.to_string(),
                reason: format!("registered component is not a {}", type_name::<C>()),
            })?;
        log::debug!("Resolving component '{}'", name);
        factory().map_err(VideoError::Component)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
