use crate::errors::{CallError, ReplayError};
use crate::logging::log_event;
use crate::proxy::RecordedClass;
use crate::replay::recording::CallLog;
use crate::replay::replayer::{replay, Target};
use crate::types::{Arguments, RecordedCall};
use serde_json::json;
use std::sync::Arc;

/// An instance of a recorded class. Owns its call log; shares the class.
#[derive(Debug, Clone)]
pub struct RecordedObject {
    class: Arc<RecordedClass>,
    calls: CallLog,
}

impl RecordedObject {
    pub(crate) fn new(class: Arc<RecordedClass>) -> Self {
        Self {
            class,
            calls: CallLog::new(),
        }
    }

    pub fn class(&self) -> &Arc<RecordedClass> {
        &self.class
    }

    pub fn calls(&self) -> &CallLog {
        &self.calls
    }

    /// Validates `operation(args)` and records it. Nothing is recorded when
    /// validation fails; the target is never touched here.
    pub fn call(&mut self, operation: &str, args: Arguments) -> Result<(), CallError> {
        let entry = self
            .class
            .descriptor()
            .and_then(|descriptor| descriptor.get(operation))
            .ok_or_else(|| CallError::UnknownOperation {
                class: self.class.name().to_string(),
                operation: operation.to_string(),
            })?;
        if let Err(error) = entry.validate(&args) {
            log_event(
                "warn",
                "call_rejected",
                json!({
                    "class": self.class.name(),
                    "operation": operation,
                    "kind": error.kind(),
                    "message": error.to_string(),
                }),
            );
            return Err(error);
        }
        self.calls.push(RecordedCall::new(operation, args));
        Ok(())
    }

    /// New instance of the same class with an independent copy of the log.
    pub fn duplicate(&self) -> Self {
        self.clone()
    }

    /// Re-issues every recorded call against `target`, returning how many
    /// calls were replayed.
    pub fn replay<T: Target + ?Sized>(&self, target: &mut T) -> Result<usize, ReplayError> {
        replay(&self.calls, target)
    }
}
