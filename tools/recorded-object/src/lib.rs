//! Recorded objects: stand-ins for targets that cannot be copied safely.
//!
//! A recorded class is bound once to a target's published attribute table.
//! Its instances validate and record calls instead of executing them, can be
//! duplicated cheaply, and are replayed onto a real target when concrete state
//! is needed.

pub mod binding;
pub mod config;
pub mod errors;
pub mod logging;
pub mod proxy;
pub mod replay;
pub mod signature;
pub mod types;

pub use binding::check_call;
pub use config::{load_config, parse_config, RecorderConfig};
pub use errors::{BindError, CallError, RecorderError, ReplayError, TargetError};
pub use proxy::{default_filter, ClassBuilder, Describe, ProxyDescriptor, RecordedClass};
pub use replay::recorder::RecordedObject;
pub use replay::recording::CallLog;
pub use replay::replayer::{replay, Target};
pub use signature::Signature;
pub use types::{Arguments, AttributeDecl, AttributeKind, RecordedCall, TargetInfo, Value};
