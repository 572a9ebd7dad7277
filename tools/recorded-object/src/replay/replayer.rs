//! Replay a call log onto a real target.

use crate::errors::{ReplayError, TargetError};
use crate::logging::log_event;
use crate::replay::recording::CallLog;
use crate::types::Arguments;
use serde_json::json;
use std::sync::Arc;

/// A real object that recorded calls can be replayed onto. `invoke` is the
/// single dispatch point: it runs the named operation with the given
/// arguments.
pub trait Target {
    fn invoke(&mut self, operation: &str, args: &Arguments) -> Result<(), TargetError>;
}

impl<T: Target + ?Sized> Target for &mut T {
    fn invoke(&mut self, operation: &str, args: &Arguments) -> Result<(), TargetError> {
        (**self).invoke(operation, args)
    }
}

impl<T: Target + ?Sized> Target for Box<T> {
    fn invoke(&mut self, operation: &str, args: &Arguments) -> Result<(), TargetError> {
        (**self).invoke(operation, args)
    }
}

/// Issues every call in `calls`, in order, against `target`.
///
/// Stops at the first failing call; later calls are never attempted and the
/// target keeps whatever the earlier calls did to it.
pub fn replay<T: Target + ?Sized>(calls: &CallLog, target: &mut T) -> Result<usize, ReplayError> {
    for (index, call) in calls.iter().enumerate() {
        if let Err(source) = target.invoke(&call.operation, &call.args) {
            log_event(
                "error",
                "replay_failed",
                json!({
                    "index": index,
                    "operation": call.operation,
                    "args": call.args,
                    "cause": source.to_string(),
                }),
            );
            return Err(ReplayError {
                index,
                call: Arc::clone(call),
                source,
            });
        }
    }
    log_event("info", "replay_complete", json!({ "calls": calls.len() }));
    Ok(calls.len())
}
