use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::bridge::capability::Capability;
use crate::bridge::error::PlatformError;
use crate::model::config::PlatformConfig;

/// Host-platform queries available to method handlers.
///
/// Implementations are shared across concurrent calls, so every query
/// must be read-only or synchronized internally.
pub trait PlatformCapabilities: Send + Sync {
    /// Capabilities this provider can actually serve.
    fn capabilities(&self) -> &[Capability];

    /// Human-readable platform version, e.g. `"Linux 6.5.0"`.
    fn platform_version(&self) -> Result<String, PlatformError>;

    fn is_package_installed(&self, identifier: &str) -> Result<bool, PlatformError>;

    fn supports(&self, capability: Capability) -> bool {
        self.capabilities().contains(&capability)
    }
}

const HOST_CAPABILITIES: &[Capability] = &[Capability::PlatformInfo, Capability::PackageQuery];

/// Capability provider backed by the running host.
#[derive(Debug, Clone)]
pub struct HostPlatform {
    os_name: String,
    version: Option<String>,
    search_path: Vec<PathBuf>,
}

impl HostPlatform {
    pub fn new(config: &PlatformConfig) -> Self {
        let search_path = env::var_os("PATH")
            .map(|raw| env::split_paths(&raw).collect())
            .unwrap_or_default();

        Self {
            os_name: config
                .os_name
                .clone()
                .unwrap_or_else(|| os_display_name(env::consts::OS).to_string()),
            version: resolve_version(
                config.version.clone(),
                detect_os_version,
                read_kernel_release,
            ),
            search_path,
        }
    }

    pub fn with_search_path(mut self, search_path: Vec<PathBuf>) -> Self {
        self.search_path = search_path;
        self
    }
}

impl PlatformCapabilities for HostPlatform {
    fn capabilities(&self) -> &[Capability] {
        HOST_CAPABILITIES
    }

    fn platform_version(&self) -> Result<String, PlatformError> {
        let version = self
            .version
            .as_deref()
            .ok_or_else(|| PlatformError::Query("os release is unavailable".to_string()))?;
        Ok(format!("{} {version}", self.os_name))
    }

    fn is_package_installed(&self, identifier: &str) -> Result<bool, PlatformError> {
        if identifier.contains(['/', '\\']) {
            return Err(PlatformError::Query(format!(
                "package identifier must be a bare name: {identifier}"
            )));
        }

        Ok(self
            .search_path
            .iter()
            .any(|dir| is_executable(&dir.join(identifier))))
    }
}

fn os_display_name(os: &str) -> &str {
    match os {
        "linux" => "Linux",
        "macos" => "macOS",
        "ios" => "iOS",
        "android" => "Android",
        "windows" => "Windows",
        "freebsd" => "FreeBSD",
        other => other,
    }
}

/// Configured version first, then the OS-reported one, then the kernel
/// release where procfs exposes it.
fn resolve_version(
    configured: Option<String>,
    detect: impl FnOnce() -> Option<String>,
    kernel: impl FnOnce() -> Option<String>,
) -> Option<String> {
    configured
        .filter(|version| !version.trim().is_empty())
        .or_else(detect)
        .or_else(kernel)
}

fn detect_os_version() -> Option<String> {
    match os_info::get().version() {
        os_info::Version::Unknown => None,
        version => Some(version.to_string()).filter(|version| !version.is_empty()),
    }
}

fn read_kernel_release() -> Option<String> {
    fs::read_to_string("/proc/sys/kernel/osrelease")
        .ok()
        .map(|raw| raw.trim().to_string())
        .filter(|release| !release.is_empty())
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    fs::metadata(path)
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file() || path.with_extension("exe").is_file()
}
