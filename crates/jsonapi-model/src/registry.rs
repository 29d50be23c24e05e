//! Resource descriptor registry.
//!
//! The registry has two phases. During start-up a [`RegistryBuilder`]
//! accepts registrations; [`RegistryBuilder::freeze`] consumes it and yields
//! a [`Registry`] that only supports lookups. A frozen registry is cheap to
//! clone and safe to share across threads without locking.

use std::collections::BTreeMap;
use std::sync::{Arc, OnceLock};

use tracing::{debug, info};

use crate::errors::RegistryError;
use crate::schema::ResourceSchema;

static GLOBAL: OnceLock<Registry> = OnceLock::new();

/// Mutable registration phase.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    schemas: BTreeMap<String, ResourceSchema>,
    order: Vec<String>,
}

impl RegistryBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a schema.
    ///
    /// Registering an identical schema twice is a no-op; a different schema
    /// under an existing type name is a [`RegistryError::Conflict`].
    pub fn register(&mut self, schema: ResourceSchema) -> Result<&mut Self, RegistryError> {
        schema.validate()?;
        if let Some(existing) = self.schemas.get(&schema.type_name) {
            if *existing == schema {
                debug!(type_name = %schema.type_name, "schema already registered");
                return Ok(self);
            }
            return Err(RegistryError::Conflict(schema.type_name));
        }
        self.order.push(schema.type_name.clone());
        self.schemas.insert(schema.type_name.clone(), schema);
        Ok(self)
    }

    /// Ends the registration phase.
    ///
    /// Fails if any relationship targets a type that was never registered.
    pub fn freeze(self) -> Result<Registry, RegistryError> {
        for schema in self.schemas.values() {
            for (name, relationship) in &schema.relationships {
                if !self.schemas.contains_key(&relationship.target_type) {
                    return Err(RegistryError::Schema {
                        type_name: schema.type_name.clone(),
                        reason: format!(
                            "relationship '{}' targets unregistered type '{}'",
                            name, relationship.target_type
                        ),
                    });
                }
            }
        }
        info!(types = self.order.len(), "resource registry frozen");
        Ok(Registry {
            inner: Arc::new(Inner {
                schemas: self.schemas,
                order: self.order,
            }),
        })
    }
}

#[derive(Debug)]
struct Inner {
    schemas: BTreeMap<String, ResourceSchema>,
    order: Vec<String>,
}

/// Frozen, read-only registry.
#[derive(Debug, Clone)]
pub struct Registry {
    inner: Arc<Inner>,
}

impl Registry {
    /// Looks up the schema of a type.
    pub fn lookup(&self, type_name: &str) -> Result<&ResourceSchema, RegistryError> {
        self.inner
            .schemas
            .get(type_name)
            .ok_or_else(|| RegistryError::NotFound(type_name.to_string()))
    }

    /// True if the type is registered.
    pub fn contains(&self, type_name: &str) -> bool {
        self.inner.schemas.contains_key(type_name)
    }

    /// Schemas in registration order.
    pub fn schemas(&self) -> impl Iterator<Item = &ResourceSchema> {
        self.inner
            .order
            .iter()
            .filter_map(|name| self.inner.schemas.get(name))
    }

    /// Number of registered types.
    pub fn len(&self) -> usize {
        self.inner.order.len()
    }

    /// True if no types are registered.
    pub fn is_empty(&self) -> bool {
        self.inner.order.is_empty()
    }
}

/// Installs the process-wide registry. Only the first call succeeds.
pub fn install_global(registry: Registry) -> Result<&'static Registry, RegistryError> {
    GLOBAL
        .set(registry)
        .map_err(|_| RegistryError::AlreadyInstalled)?;
    GLOBAL.get().ok_or(RegistryError::AlreadyInstalled)
}

/// The process-wide registry, once installed.
pub fn global() -> Option<&'static Registry> {
    GLOBAL.get()
}
