// SPDX-License-Identifier: MIT OR Apache-2.0

//! Containers and leaf descriptors of the settings tree.
//!
//! [`Form`] is the declarative shape used to describe a schema: a titled container
//! with child containers and inline leaf elements. Once loaded into a
//! [`SchemaTree`](crate::domain::tree::SchemaTree) the leaves move into an arena and
//! containers refer to them by [`LeafId`].

use crate::domain::config_value::ConfigValue;
use serde::Serialize;
use serde_json::Value;

/// Stable handle to a leaf inside a [`SchemaTree`](crate::domain::tree::SchemaTree).
///
/// Leaves are never removed or reordered, so a `LeafId` keeps pointing at the same
/// leaf for the life of the tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LeafId(pub(crate) usize);

impl LeafId {
    /// Returns the arena index.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Type tag given to leaves created on demand.
pub const DEFAULT_ELEMENT_TYPE: &str = "text";

/// A leaf setting descriptor.
///
/// Serializes to the descriptor shape delivered to schema editors; empty optional
/// fields are omitted and `default`/`value` are always present (possibly `null`).
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct FormElement {
    /// Optional identifier, referenced by other elements' `target`
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    /// Display name; also the addressable key
    #[serde(rename = "label")]
    pub name: String,
    /// Type tag (`text`, `number`, `boolean`, `select`, ...)
    #[serde(rename = "type")]
    pub kind: String,
    /// Help text
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Placeholder text
    #[serde(skip_serializing_if = "String::is_empty")]
    pub placeholder: String,
    /// Allowed options for `select` elements
    #[serde(rename = "options", skip_serializing_if = "Vec::is_empty")]
    pub opts: Vec<String>,
    /// Ids of elements whose visibility this element controls
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub target: Vec<String>,
    /// Whether the element is read-only
    #[serde(rename = "readonly")]
    pub read_only: bool,
    /// Declared default
    pub default: Option<Value>,
    /// Overriding value
    pub value: Option<Value>,
    /// Whether the element accepts multiple values
    #[serde(rename = "multi", skip_serializing_if = "std::ops::Not::not")]
    pub multi_value: bool,
    /// Suggested values
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub datalist: Vec<String>,
    /// Position inside its container
    #[serde(skip)]
    pub order: usize,
    /// Whether a value is required
    pub required: bool,
}

impl FormElement {
    /// Creates an element with the given name and type tag.
    pub fn new(name: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
            ..Self::default()
        }
    }

    /// Creates the bare element used when a path names an unknown leaf.
    pub fn bare(name: impl Into<String>) -> Self {
        Self::new(name, DEFAULT_ELEMENT_TYPE)
    }

    /// Sets the identifier.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Sets the declared default.
    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Sets the value.
    pub fn with_value(mut self, value: impl Into<Value>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the placeholder.
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    /// Sets the allowed options.
    pub fn with_options<S: Into<String>>(mut self, opts: impl IntoIterator<Item = S>) -> Self {
        self.opts = opts.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the visibility targets.
    pub fn with_target<S: Into<String>>(mut self, target: impl IntoIterator<Item = S>) -> Self {
        self.target = target.into_iter().map(Into::into).collect();
        self
    }

    /// Marks the element read-only.
    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    /// The effective value: `value` if set, else `default`.
    pub fn effective(&self) -> ConfigValue {
        match &self.value {
            Some(v) if !v.is_null() => ConfigValue::from(v.clone()),
            _ => ConfigValue::new(self.default.clone()),
        }
    }
}

/// Declarative container used to describe a schema.
///
/// # Examples
///
/// ```
/// use formcfg::domain::form::{Form, FormElement};
///
/// let form = Form::new("email")
///     .element(FormElement::new("server", "text").with_default("smtp.gmail.com"))
///     .element(FormElement::new("port", "number").with_default(587));
/// assert_eq!(form.elements.len(), 2);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Form {
    /// Container title; the addressable key
    pub title: String,
    /// Child containers, in declaration order
    pub forms: Vec<Form>,
    /// Leaf elements, in declaration order
    pub elements: Vec<FormElement>,
}

impl Form {
    /// Creates an empty container.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Appends a leaf element.
    pub fn element(mut self, element: FormElement) -> Self {
        self.elements.push(element);
        self
    }

    /// Appends a child container.
    pub fn form(mut self, form: Form) -> Self {
        self.forms.push(form);
        self
    }
}
