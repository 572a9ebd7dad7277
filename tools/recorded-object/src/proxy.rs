//! Proxy generation: binding a recorded class to a target's operations.
//!
//! A [`RecordedClass`] is bound once to a [`TargetInfo`]. Binding walks the
//! target's attributes in name order, keeps those accepted by the filter and
//! freezes one [`ProxyEntry`] per operation into the class's
//! [`ProxyDescriptor`]. Every instance created from the class shares that
//! descriptor.

use crate::binding::check_call;
use crate::config::ProxyConfig;
use crate::errors::{BindError, CallError};
use crate::logging::log_event;
use crate::replay::recorder::RecordedObject;
use crate::signature::Signature;
use crate::types::{Arguments, AttributeKind, TargetInfo};
use serde_json::json;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::{Arc, OnceLock};

pub const DEFAULT_CHECK_PREFIX: &str = "_check_";

/// Attributes every recorded class defines itself.
pub const BASE_ATTRIBUTES: [&str; 5] = [
    "_bind_target",
    "_check_call",
    "_duplicate",
    "_recreation_calls",
    "_replay",
];

/// Custom per-operation check. Receives the operation name, the offered
/// arguments and the operation's signature; may delegate to [`check_call`].
pub type Validator =
    Arc<dyn Fn(&str, &Arguments, &Signature) -> Result<(), CallError> + Send + Sync>;

/// A target type that publishes its attribute table.
pub trait Describe {
    fn target_info() -> TargetInfo;
}

/// Accepts public operations only.
pub fn default_filter(target: &TargetInfo, name: &str) -> bool {
    let is_operation = matches!(
        target.get(name).map(|attr| &attr.kind),
        Some(AttributeKind::Operation(_))
    );
    is_operation && !name.starts_with('_')
}

pub struct ProxyEntry {
    operation: String,
    signature: Signature,
    validator: Option<Validator>,
    doc: Option<String>,
}

impl ProxyEntry {
    pub fn operation(&self) -> &str {
        &self.operation
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    pub fn doc(&self) -> Option<&str> {
        self.doc.as_deref()
    }

    pub fn has_custom_validator(&self) -> bool {
        self.validator.is_some()
    }

    pub fn validate(&self, args: &Arguments) -> Result<(), CallError> {
        match &self.validator {
            Some(validator) => validator(&self.operation, args, &self.signature),
            None => check_call(&self.operation, args, &self.signature),
        }
    }
}

impl fmt::Debug for ProxyEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxyEntry")
            .field("operation", &self.operation)
            .field("signature", &self.signature)
            .field("custom_validator", &self.validator.is_some())
            .finish()
    }
}

#[derive(Debug)]
pub struct ProxyDescriptor {
    target: String,
    entries: BTreeMap<String, ProxyEntry>,
}

impl ProxyDescriptor {
    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn get(&self, operation: &str) -> Option<&ProxyEntry> {
        self.entries.get(operation)
    }

    pub fn operations(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

pub struct ClassBuilder {
    name: String,
    check_prefix: String,
    attributes: BTreeSet<String>,
    checks: Vec<(String, Validator)>,
}

impl ClassBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            check_prefix: DEFAULT_CHECK_PREFIX.to_string(),
            attributes: BASE_ATTRIBUTES.iter().map(|a| a.to_string()).collect(),
            checks: Vec::new(),
        }
    }

    pub fn with_config(mut self, cfg: &ProxyConfig) -> Self {
        self.check_prefix = cfg.check_prefix.clone();
        self
    }

    /// Declares an attribute the class defines for itself.
    pub fn attribute(mut self, name: impl Into<String>) -> Self {
        self.attributes.insert(name.into());
        self
    }

    /// Defines the custom validator for `operation`. It becomes the class
    /// attribute `<check_prefix><operation>`.
    pub fn check<F>(mut self, operation: impl Into<String>, validator: F) -> Self
    where
        F: Fn(&str, &Arguments, &Signature) -> Result<(), CallError> + Send + Sync + 'static,
    {
        self.checks.push((operation.into(), Arc::new(validator)));
        self
    }

    pub fn build(self) -> Arc<RecordedClass> {
        let mut attributes = self.attributes;
        let mut validators = BTreeMap::new();
        for (operation, validator) in self.checks {
            let attribute = format!("{}{}", self.check_prefix, operation);
            attributes.insert(attribute.clone());
            validators.insert(attribute, validator);
        }
        Arc::new(RecordedClass {
            name: self.name,
            check_prefix: self.check_prefix,
            attributes,
            validators,
            descriptor: OnceLock::new(),
        })
    }
}

/// A stand-in class whose instances record calls for later replay.
pub struct RecordedClass {
    name: String,
    check_prefix: String,
    attributes: BTreeSet<String>,
    validators: BTreeMap<String, Validator>,
    descriptor: OnceLock<ProxyDescriptor>,
}

impl RecordedClass {
    pub fn builder(name: impl Into<String>) -> ClassBuilder {
        ClassBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.contains(name)
    }

    pub fn descriptor(&self) -> Option<&ProxyDescriptor> {
        self.descriptor.get()
    }

    pub fn is_bound(&self) -> bool {
        self.descriptor.get().is_some()
    }

    pub fn bind<T: Describe>(&self) -> Result<(), BindError> {
        self.bind_target(&T::target_info())
    }

    pub fn bind_target(&self, target: &TargetInfo) -> Result<(), BindError> {
        self.bind_target_filtered(target, default_filter)
    }

    pub fn bind_target_filtered<F>(&self, target: &TargetInfo, filter: F) -> Result<(), BindError>
    where
        F: Fn(&TargetInfo, &str) -> bool,
    {
        if let Some(existing) = self.descriptor.get() {
            return Err(self.already_bound(existing));
        }

        let mut entries = BTreeMap::new();
        for attr in target.attributes() {
            if !filter(target, &attr.name) {
                continue;
            }
            if self.has_attribute(&attr.name) {
                return Err(BindError::AttributeCollision {
                    class: self.name.clone(),
                    attribute: attr.name.clone(),
                });
            }
            let signature = match &attr.kind {
                AttributeKind::Operation(signature) => signature.clone(),
                AttributeKind::Property => {
                    return Err(BindError::NotCallable {
                        target: target.name.clone(),
                        attribute: attr.name.clone(),
                    });
                }
            };
            if !signature.is_consistent() {
                return Err(BindError::InvalidSignature {
                    target: target.name.clone(),
                    operation: attr.name.clone(),
                    num_defaults: signature.num_defaults(),
                    num_named: signature.num_named(),
                });
            }
            let validator = self
                .validators
                .get(&format!("{}{}", self.check_prefix, attr.name))
                .cloned();
            entries.insert(
                attr.name.clone(),
                ProxyEntry {
                    operation: attr.name.clone(),
                    signature,
                    validator,
                    doc: attr.doc.clone(),
                },
            );
        }

        let operations: Vec<String> = entries.keys().cloned().collect();
        let descriptor = ProxyDescriptor {
            target: target.name.clone(),
            entries,
        };
        if let Err(rejected) = self.descriptor.set(descriptor) {
            let existing = self.descriptor.get().unwrap_or(&rejected);
            return Err(self.already_bound(existing));
        }

        log_event(
            "info",
            "bind",
            json!({
                "class": self.name,
                "target": target.name,
                "operations": operations,
            }),
        );
        Ok(())
    }

    pub fn new_instance(self: &Arc<Self>) -> RecordedObject {
        RecordedObject::new(Arc::clone(self))
    }

    fn already_bound(&self, existing: &ProxyDescriptor) -> BindError {
        BindError::AlreadyBound {
            class: self.name.clone(),
            target: existing.target.clone(),
        }
    }
}

impl fmt::Debug for RecordedClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordedClass")
            .field("name", &self.name)
            .field("attributes", &self.attributes)
            .field("descriptor", &self.descriptor.get())
            .finish()
    }
}
