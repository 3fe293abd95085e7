use std::borrow::Borrow;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::bridge::capability::Capability;
use crate::bridge::error::{HandlerError, RegistryError};
use crate::bridge::platform::PlatformCapabilities;
use crate::bridge::schema::ArgSchema;
use crate::model::args::ArgumentBag;

static METHOD_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_.]*$").expect("valid method name regex"));

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MethodName(String);

impl MethodName {
    pub fn new(value: impl Into<String>) -> Result<Self, RegistryError> {
        let value = value.into();
        if !METHOD_NAME_RE.is_match(&value) {
            return Err(RegistryError::InvalidMethodName(value));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for MethodName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MethodName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub type HandlerFn =
    dyn Fn(&ArgumentBag, &dyn PlatformCapabilities) -> Result<Value, HandlerError> + Send + Sync;

/// Everything the registry needs to know about one method.
pub struct MethodSpec {
    pub name: String,
    pub schema: ArgSchema,
    pub requires: Vec<Capability>,
    pub handler: Box<HandlerFn>,
}

impl MethodSpec {
    pub fn new<F>(name: impl Into<String>, schema: ArgSchema, handler: F) -> Self
    where
        F: Fn(&ArgumentBag, &dyn PlatformCapabilities) -> Result<Value, HandlerError>
            + Send
            + Sync
            + 'static,
    {
        Self {
            name: name.into(),
            schema,
            requires: Vec::new(),
            handler: Box::new(handler),
        }
    }

    pub fn requires(mut self, capability: Capability) -> Self {
        if !self.requires.contains(&capability) {
            self.requires.push(capability);
        }
        self
    }
}

impl fmt::Debug for MethodSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodSpec")
            .field("name", &self.name)
            .field("schema", &self.schema)
            .field("requires", &self.requires)
            .finish_non_exhaustive()
    }
}
