//! Methods every bridge serves out of the box.

use serde_json::Value;

use crate::bridge::capability::Capability;
use crate::bridge::error::{HandlerError, RegistryError};
use crate::bridge::method::MethodSpec;
use crate::bridge::platform::PlatformCapabilities;
use crate::bridge::registry::MethodRegistry;
use crate::bridge::schema::{ArgKind, ArgSchema};
use crate::model::args::ArgumentBag;

pub const GET_PLATFORM_VERSION: &str = "getPlatformVersion";
pub const IS_PACKAGE_INSTALLED: &str = "isPackageInstalled";

pub fn register_builtins(registry: &mut MethodRegistry) -> Result<(), RegistryError> {
    registry.register_with(
        MethodSpec::new(GET_PLATFORM_VERSION, ArgSchema::empty(), get_platform_version)
            .requires(Capability::PlatformInfo),
    )?;
    registry.register_with(
        MethodSpec::new(
            IS_PACKAGE_INSTALLED,
            ArgSchema::empty().required("identifier", ArgKind::String),
            is_package_installed,
        )
        .requires(Capability::PackageQuery),
    )?;
    Ok(())
}

fn get_platform_version(
    _args: &ArgumentBag,
    platform: &dyn PlatformCapabilities,
) -> Result<Value, HandlerError> {
    Ok(Value::String(platform.platform_version()?))
}

fn is_package_installed(
    args: &ArgumentBag,
    platform: &dyn PlatformCapabilities,
) -> Result<Value, HandlerError> {
    let identifier = args
        .get_str("identifier")
        .map(str::trim)
        .filter(|identifier| !identifier.is_empty())
        .ok_or_else(|| HandlerError::failed("package identifier must not be empty"))?;

    Ok(Value::Bool(platform.is_package_installed(identifier)?))
}
