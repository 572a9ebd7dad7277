use crate::types::RecordedCall;
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::sync::Arc;

/// Ordered log of accepted calls. Cloning shares the recorded calls and
/// copies only the sequence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallLog {
    calls: Vec<Arc<RecordedCall>>,
}

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, call: RecordedCall) {
        self.calls.push(Arc::new(call));
    }

    pub fn len(&self) -> usize {
        self.calls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Arc<RecordedCall>> {
        self.calls.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Arc<RecordedCall>> {
        self.calls.iter()
    }

    pub fn to_json(&self) -> Value {
        Value::Array(
            self.calls
                .iter()
                .map(|call| serde_json::to_value(call.as_ref()).unwrap_or(Value::Null))
                .collect(),
        )
    }

    /// SHA-256 over the canonical JSON of the log. Two logs with the same
    /// fingerprint replay identically.
    pub fn fingerprint(&self) -> String {
        let canonical = serde_json::to_string(&self.to_json()).unwrap_or_default();
        let mut digest = Sha256::new();
        digest.update(canonical.as_bytes());
        let bytes = digest.finalize();
        let mut out = String::with_capacity(bytes.len() * 2);
        for byte in bytes {
            out.push_str(&format!("{byte:02x}"));
        }
        out
    }
}

impl<'a> IntoIterator for &'a CallLog {
    type Item = &'a Arc<RecordedCall>;
    type IntoIter = std::slice::Iter<'a, Arc<RecordedCall>>;

    fn into_iter(self) -> Self::IntoIter {
        self.calls.iter()
    }
}
