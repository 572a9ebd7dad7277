use crate::signature::Signature;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub use serde_json::Value;

/// Positional and keyword arguments of one call. Values are opaque: they are
/// counted and name-matched, never interpreted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Arguments {
    pub positional: Vec<Value>,
    pub keyword: BTreeMap<String, Value>,
}

impl Arguments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.positional.push(value.into());
        self
    }

    pub fn kwarg(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.keyword.insert(name.into(), value.into());
        self
    }

    /// Looks a parameter up the way a bound call would see it: by position
    /// first, then by keyword.
    pub fn get(&self, position: usize, name: &str) -> Option<&Value> {
        self.positional
            .get(position)
            .or_else(|| self.keyword.get(name))
    }

    pub fn len(&self) -> usize {
        self.positional.len() + self.keyword.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positional.is_empty() && self.keyword.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordedCall {
    pub operation: String,
    pub args: Arguments,
}

impl RecordedCall {
    pub fn new(operation: impl Into<String>, args: Arguments) -> Self {
        Self {
            operation: operation.into(),
            args,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttributeKind {
    Operation(Signature),
    /// A non-callable attribute such as a plain value or getter.
    Property,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeDecl {
    pub name: String,
    pub kind: AttributeKind,
    pub doc: Option<String>,
}

impl AttributeDecl {
    pub fn operation(name: impl Into<String>, signature: Signature) -> Self {
        Self {
            name: name.into(),
            kind: AttributeKind::Operation(signature),
            doc: None,
        }
    }

    pub fn property(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: AttributeKind::Property,
            doc: None,
        }
    }

    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    pub fn signature(&self) -> Option<&Signature> {
        match &self.kind {
            AttributeKind::Operation(signature) => Some(signature),
            AttributeKind::Property => None,
        }
    }
}

/// The attribute table a target type publishes in place of runtime
/// introspection. Attributes are kept sorted by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetInfo {
    pub name: String,
    attributes: BTreeMap<String, AttributeDecl>,
}

impl TargetInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: BTreeMap::new(),
        }
    }

    pub fn attribute(mut self, decl: AttributeDecl) -> Self {
        self.attributes.insert(decl.name.clone(), decl);
        self
    }

    pub fn operation(self, name: impl Into<String>, signature: Signature) -> Self {
        self.attribute(AttributeDecl::operation(name, signature))
    }

    pub fn get(&self, name: &str) -> Option<&AttributeDecl> {
        self.attributes.get(name)
    }

    pub fn attributes(&self) -> impl Iterator<Item = &AttributeDecl> {
        self.attributes.values()
    }
}
