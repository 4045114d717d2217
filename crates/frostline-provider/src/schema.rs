//! Attribute schemas: how each attribute of a resource is planned.

use std::fmt;

use frostline_core::suppress::{self, SuppressFn};
use serde_json::Value;

#[derive(Clone)]
pub struct AttributeSchema {
    pub name: &'static str,
    pub required: bool,
    /// A change requires destroy + create.
    pub force_new: bool,
    /// Owned by the provider; never planned.
    pub computed: bool,
    /// Never read back from the remote.
    pub write_only: bool,
    /// Masked in plan output.
    pub sensitive: bool,
    /// Value planned when the desired document omits the attribute.
    pub default: Option<Value>,
    pub suppress: Option<SuppressFn>,
}

impl fmt::Debug for AttributeSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttributeSchema")
            .field("name", &self.name)
            .field("required", &self.required)
            .field("force_new", &self.force_new)
            .field("computed", &self.computed)
            .field("write_only", &self.write_only)
            .field("sensitive", &self.sensitive)
            .field("default", &self.default)
            .field("suppressed", &self.suppress.is_some())
            .finish()
    }
}

impl AttributeSchema {
    fn base(name: &'static str) -> Self {
        Self {
            name,
            required: false,
            force_new: false,
            computed: false,
            write_only: false,
            sensitive: false,
            default: None,
            suppress: None,
        }
    }

    pub fn required(name: &'static str) -> Self {
        Self {
            required: true,
            ..Self::base(name)
        }
    }

    pub fn optional(name: &'static str) -> Self {
        Self::base(name)
    }

    pub fn computed(name: &'static str) -> Self {
        Self {
            computed: true,
            ..Self::base(name)
        }
    }

    /// Creation-only modifier such as `or_replace`; any diff is suppressed.
    pub fn creation_flag(name: &'static str) -> Self {
        Self {
            write_only: true,
            default: Some(Value::Bool(false)),
            suppress: Some(suppress::write_only_flag),
            ..Self::base(name)
        }
    }

    pub fn force_new(mut self) -> Self {
        self.force_new = true;
        self
    }

    pub fn write_only(mut self) -> Self {
        self.write_only = true;
        self
    }

    pub fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }

    pub fn default_value(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }

    pub fn suppress_with(mut self, predicate: SuppressFn) -> Self {
        self.suppress = Some(predicate);
        self
    }
}

/// Schema of one resource kind.
#[derive(Debug, Clone)]
pub struct ResourceSchema {
    pub type_name: &'static str,
    pub version: u32,
    pub attributes: Vec<AttributeSchema>,
}

