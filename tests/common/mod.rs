use std::collections::HashSet;
use std::sync::Arc;

use hostbridge::bridge::builtin::register_builtins;
use hostbridge::bridge::capability::Capability;
use hostbridge::bridge::error::PlatformError;
use hostbridge::bridge::{Dispatcher, MethodRegistry, PlatformCapabilities};

/// Deterministic capability provider for tests.
pub struct FakePlatform {
    pub version: String,
    pub installed: HashSet<String>,
    pub capabilities: Vec<Capability>,
}

impl FakePlatform {
    pub fn ios() -> Self {
        Self {
            version: "iOS 17.0".to_string(),
            installed: HashSet::from(["gitd".to_string()]),
            capabilities: vec![Capability::PlatformInfo, Capability::PackageQuery],
        }
    }
}

impl PlatformCapabilities for FakePlatform {
    fn capabilities(&self) -> &[Capability] {
        &self.capabilities
    }

    fn platform_version(&self) -> Result<String, PlatformError> {
        Ok(self.version.clone())
    }

    fn is_package_installed(&self, identifier: &str) -> Result<bool, PlatformError> {
        if identifier == "slow" {
            return Err(PlatformError::Timeout("package index".to_string()));
        }
        Ok(self.installed.contains(identifier))
    }
}

#[allow(dead_code)]
pub fn builtin_dispatcher(platform: FakePlatform) -> Dispatcher {
    let mut registry = MethodRegistry::new();
    register_builtins(&mut registry).expect("builtins register");
    Dispatcher::new(registry.seal(), Arc::new(platform))
}
