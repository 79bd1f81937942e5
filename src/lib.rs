//! Multiparty session types: a global/local type algebra, projection,
//! linearity and coherence analysis, and a runtime protocol monitor.
//!
//! A protocol starts life as a [`GlobalType`](types::GlobalType) — what
//! every participant together is supposed to do. [`projection::project`]
//! reduces it to one participant's [`LocalType`](types::LocalType); the
//! [`checker::Checker`] then enforces that local type message by message
//! at runtime, independent of whatever transport carries the bytes.

pub mod checker;
pub mod linearity;
pub mod projection;
pub mod types;

pub use checker::{Checker, IoError, LoggingSidecar, MonitorError, NullLogger, PayloadBox, Sortable};
pub use linearity::{is_coherent, is_linear};
pub use projection::project;
pub use types::{Channel, GlobalType, Label, LocalType, NameType, Participant, ProjectionError, Prefix, Sort};
