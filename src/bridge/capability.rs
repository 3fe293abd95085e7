use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    PlatformInfo,
    PackageQuery,
}

impl Capability {
    pub fn label(&self) -> &'static str {
        match self {
            Capability::PlatformInfo => "platform_info",
            Capability::PackageQuery => "package_query",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
