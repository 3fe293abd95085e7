use serde::Deserialize;
use serde_json::Value;

use crate::bridge::error::ValidationError;
use crate::model::args::ArgumentBag;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArgKind {
    Any,
    Bool,
    Integer,
    Number,
    String,
    Array,
    Object,
}

impl ArgKind {
    pub fn label(&self) -> &'static str {
        match self {
            ArgKind::Any => "any",
            ArgKind::Bool => "bool",
            ArgKind::Integer => "integer",
            ArgKind::Number => "number",
            ArgKind::String => "string",
            ArgKind::Array => "array",
            ArgKind::Object => "object",
        }
    }

    fn accepts(&self, value: &Value) -> bool {
        match self {
            ArgKind::Any => true,
            ArgKind::Bool => value.is_boolean(),
            ArgKind::Integer => value.is_i64() || value.is_u64(),
            ArgKind::Number => value.is_number(),
            ArgKind::String => value.is_string(),
            ArgKind::Array => value.is_array(),
            ArgKind::Object => value.is_object(),
        }
    }
}

fn value_label(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_f64() => "number",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ArgSpec {
    pub name: String,
    pub kind: ArgKind,
    #[serde(default = "default_required")]
    pub required: bool,
}

fn default_required() -> bool {
    true
}

/// Shape a method expects its argument bag to have.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ArgSchema {
    #[serde(default)]
    pub args: Vec<ArgSpec>,
    #[serde(default)]
    pub allow_unknown: bool,
}

impl ArgSchema {
    /// A schema accepting only the empty bag.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A schema that never rejects anything.
    pub fn permissive() -> Self {
        Self {
            args: Vec::new(),
            allow_unknown: true,
        }
    }

    pub fn required(mut self, name: impl Into<String>, kind: ArgKind) -> Self {
        self.args.push(ArgSpec {
            name: name.into(),
            kind,
            required: true,
        });
        self
    }

    pub fn optional(mut self, name: impl Into<String>, kind: ArgKind) -> Self {
        self.args.push(ArgSpec {
            name: name.into(),
            kind,
            required: false,
        });
        self
    }

    pub fn allow_unknown(mut self) -> Self {
        self.allow_unknown = true;
        self
    }

    /// Checks `args` against the schema, reporting the first mismatch.
    ///
    /// Declared arguments are checked in declaration order, then any
    /// undeclared names in the order the caller supplied them.
    pub fn validate(&self, args: &ArgumentBag) -> Result<(), ValidationError> {
        for spec in &self.args {
            match args.get(&spec.name) {
                None if spec.required => return Err(ValidationError::Missing(spec.name.clone())),
                None => {}
                Some(value) if !spec.kind.accepts(value) => {
                    return Err(ValidationError::WrongKind {
                        name: spec.name.clone(),
                        expected: spec.kind.label(),
                        actual: value_label(value),
                    });
                }
                Some(_) => {}
            }
        }

        if !self.allow_unknown {
            if let Some(name) = args
                .names()
                .find(|name| !self.args.iter().any(|spec| spec.name == *name))
            {
                return Err(ValidationError::Unexpected(name.to_string()));
            }
        }

        Ok(())
    }
}
