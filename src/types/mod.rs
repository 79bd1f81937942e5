//! The type algebra: immutable ADTs for global and local session types.

pub mod global;
pub mod local;
pub mod primitives;

pub use global::{GlobalType, ProjectionError, ProjectionResult};
pub use local::LocalType;
pub use primitives::{Channel, Label, NameType, Participant, Prefix, Sort};
