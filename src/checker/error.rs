//! Error taxonomy for the runtime monitor (spec.md §7).
//!
//! Two independent failure families: [`MonitorError`] is a protocol
//! violation — always fatal, the caller must abort the session. A
//! transport failure is never wrapped into it: it is passed through
//! unchanged by the I/O wrapper in `transport.rs` so callers can retry
//! without the monitor having advanced its state.

use thiserror::Error;

use crate::types::{Channel, Label, Sort};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MonitorError {
    #[error("expected a {expected} step, but the current local type is {found}")]
    WrongOperation {
        expected: &'static str,
        found: &'static str,
    },

    #[error("channel mismatch: local type expects {expected}, got {found}")]
    ChannelMismatch { expected: Channel, found: Channel },

    #[error("sort mismatch: local type expects {expected}, got {found}")]
    SortMismatch { expected: Sort, found: Sort },

    #[error("label {label} is not one of the branches offered at this point")]
    UnknownLabel { label: Label },

    #[error("a label was expected here, but the payload carried a sorted value")]
    ExpectedLabel,

    #[error("attempted to advance past End: the session has already completed")]
    AdvancedPastEnd,

    #[error("prepare_send/unpack_receive called with no pending selection to resolve")]
    NoPendingLabel,
}
