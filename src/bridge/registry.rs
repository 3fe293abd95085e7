use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::bridge::capability::Capability;
use crate::bridge::error::{HandlerError, RegistryError};
use crate::bridge::method::{HandlerFn, MethodName, MethodSpec};
use crate::bridge::platform::PlatformCapabilities;
use crate::bridge::schema::ArgSchema;
use crate::model::args::ArgumentBag;

pub struct MethodEntry {
    pub name: MethodName,
    pub schema: ArgSchema,
    pub requires: Vec<Capability>,
    handler: Box<HandlerFn>,
}

impl MethodEntry {
    pub fn call(
        &self,
        args: &ArgumentBag,
        platform: &dyn PlatformCapabilities,
    ) -> Result<Value, HandlerError> {
        (self.handler)(args, platform)
    }
}

impl fmt::Debug for MethodEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodEntry")
            .field("name", &self.name)
            .field("schema", &self.schema)
            .field("requires", &self.requires)
            .finish_non_exhaustive()
    }
}

/// Method table under construction. Call [`MethodRegistry::seal`] once
/// startup registration is finished.
#[derive(Debug, Default)]
pub struct MethodRegistry {
    entries: HashMap<MethodName, MethodEntry>,
}

impl MethodRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F>(
        &mut self,
        name: impl Into<String>,
        schema: ArgSchema,
        handler: F,
    ) -> Result<(), RegistryError>
    where
        F: Fn(&ArgumentBag, &dyn PlatformCapabilities) -> Result<Value, HandlerError>
            + Send
            + Sync
            + 'static,
    {
        self.register_with(MethodSpec::new(name, schema, handler))
    }

    /// Inserts a method. Leaves the registry untouched on failure.
    pub fn register_with(&mut self, spec: MethodSpec) -> Result<(), RegistryError> {
        let name = MethodName::new(spec.name)?;
        if self.entries.contains_key(&name) {
            tracing::warn!(method = %name, "duplicate method registration rejected");
            return Err(RegistryError::DuplicateMethod(name.to_string()));
        }

        tracing::debug!(method = %name, requires = ?spec.requires, "method registered");
        self.entries.insert(
            name.clone(),
            MethodEntry {
                name,
                schema: spec.schema,
                requires: spec.requires,
                handler: spec.handler,
            },
        );
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> Result<&MethodEntry, RegistryError> {
        self.entries
            .get(name)
            .ok_or_else(|| RegistryError::UnknownMethod(name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn method_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.entries.keys().map(ToString::to_string).collect();
        names.sort();
        names
    }

    pub fn seal(self) -> SealedRegistry {
        tracing::info!(methods = self.len(), "method registry sealed");
        SealedRegistry(Arc::new(self))
    }
}

/// Read-only method table shared by every dispatcher clone.
#[derive(Debug, Clone)]
pub struct SealedRegistry(Arc<MethodRegistry>);

impl SealedRegistry {
    pub fn lookup(&self, name: &str) -> Result<&MethodEntry, RegistryError> {
        self.0.lookup(name)
    }

    pub fn method_names(&self) -> Vec<String> {
        self.0.method_names()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn constant(
        value: &'static str,
    ) -> impl Fn(&ArgumentBag, &dyn PlatformCapabilities) -> Result<Value, HandlerError>
    + Send
    + Sync
    + 'static {
        move |_, _| Ok(json!(value))
    }

    #[test]
    fn lookup_finds_registered_method() {
        let mut registry = MethodRegistry::new();
        registry
            .register("getPlatformVersion", ArgSchema::empty(), constant("iOS 17.0"))
            .unwrap();

        let entry = registry.lookup("getPlatformVersion").unwrap();
        assert_eq!(entry.name.as_str(), "getPlatformVersion");
    }

    #[test]
    fn lookup_unknown_method_fails() {
        let registry = MethodRegistry::new();
        assert_eq!(
            registry.lookup("doesNotExist").unwrap_err(),
            RegistryError::UnknownMethod("doesNotExist".to_string())
        );
    }

    #[test]
    fn duplicate_registration_keeps_first_entry() {
        let mut registry = MethodRegistry::new();
        registry
            .register("getPlatformVersion", ArgSchema::empty(), constant("first"))
            .unwrap();

        let err = registry
            .register(
                "getPlatformVersion",
                ArgSchema::permissive(),
                constant("second"),
            )
            .unwrap_err();

        assert_eq!(
            err,
            RegistryError::DuplicateMethod("getPlatformVersion".to_string())
        );
        assert_eq!(registry.len(), 1);
        assert_eq!(
            registry.lookup("getPlatformVersion").unwrap().schema,
            ArgSchema::empty()
        );
    }

    #[test]
    fn invalid_name_is_not_inserted() {
        let mut registry = MethodRegistry::new();
        let err = registry
            .register("not a name", ArgSchema::empty(), constant("x"))
            .unwrap_err();

        assert!(matches!(err, RegistryError::InvalidMethodName(_)));
        assert!(registry.is_empty());
    }

    #[test]
    fn sealed_registry_lists_sorted_names() {
        let mut registry = MethodRegistry::new();
        registry.register("zeta", ArgSchema::empty(), constant("z")).unwrap();
        registry.register("alpha", ArgSchema::empty(), constant("a")).unwrap();

        let sealed = registry.seal();
        let shared = sealed.clone();
        assert_eq!(shared.method_names(), vec!["alpha", "zeta"]);
        assert!(sealed.lookup("alpha").is_ok());
    }
}
