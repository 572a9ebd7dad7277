//! Call recording and replay.
//!
//! # Overview
//!
//! A [`recorder::RecordedObject`] stands in for a target that cannot be
//! duplicated safely. Each accepted call is appended to its
//! [`recording::CallLog`]; duplicating the object copies the log, never the
//! target. When concrete state is needed, [`replayer::replay`] re-issues the
//! log, in order, against a freshly constructed target.

pub mod recorder;
pub mod recording;
pub mod replayer;
