//! The logging sidecar: an optional collaborator that wraps payloads on
//! the wire with out-of-band metadata (a vector clock, a trace id, ...).
//! The monitor never inspects what a sidecar writes — only the sort/label
//! it hands back after unpacking (spec.md §6, Non-goals: no logging
//! format is mandated).
//!
//! Grounded on the GoVector (`govec.GoLog`) idea referenced by the
//! original implementation: `prepare_send` stamps an outgoing vector
//! clock, `unpack_receive` merges the clock carried on an incoming
//! message into the local one.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::checker::sort::PayloadBox;
use crate::types::{Participant, Sort};

/// Wraps payloads with out-of-band bookkeeping before they cross the
/// wire, and unwraps them on the way back in. Implementations must be
/// paired: whatever `prepare_send` encodes, that implementation's
/// `unpack_receive` must decode.
pub trait LoggingSidecar {
    fn prepare_send(&mut self, msg_tag: &str, payload: &PayloadBox) -> Vec<u8>;
    fn unpack_receive(&mut self, msg_tag: &str, buf: &[u8]) -> PayloadBox;
}

/// Does nothing beyond a bare encode/decode of the sort tag and bytes.
/// The default when no sidecar is configured.
#[derive(Debug, Default)]
pub struct NullLogger;

#[derive(Serialize, Deserialize)]
struct Envelope {
    sort: String,
    bytes: Vec<u8>,
}

impl LoggingSidecar for NullLogger {
    fn prepare_send(&mut self, _msg_tag: &str, payload: &PayloadBox) -> Vec<u8> {
        let envelope = Envelope {
            sort: payload.sort().as_str().to_string(),
            bytes: payload.bytes().to_vec(),
        };
        bincode::serialize(&envelope).expect("in-memory envelope encoding is infallible")
    }

    fn unpack_receive(&mut self, _msg_tag: &str, buf: &[u8]) -> PayloadBox {
        let envelope: Envelope =
            bincode::deserialize(buf).expect("NullLogger envelopes are always well-formed");
        PayloadBox::from_raw(Sort::new(envelope.sort), envelope.bytes)
    }
}

/// A Lamport-style vector clock keyed by participant, logged alongside
/// every message the way `govec.GoLog` stamps entries in the original
/// system.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct VectorClock(BTreeMap<Participant, u64>);

impl VectorClock {
    pub fn get(&self, participant: &Participant) -> u64 {
        self.0.get(participant).copied().unwrap_or(0)
    }

    fn increment(&mut self, participant: &Participant) {
        *self.0.entry(participant.clone()).or_insert(0) += 1;
    }

    fn merge(&mut self, other: &VectorClock) {
        for (participant, &ts) in &other.0 {
            let slot = self.0.entry(participant.clone()).or_insert(0);
            if ts > *slot {
                *slot = ts;
            }
        }
    }
}

impl fmt::Display for VectorClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (p, ts)) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{p}:{ts}")?;
        }
        write!(f, "}}")
    }
}

#[derive(Serialize, Deserialize)]
struct ClockedEnvelope {
    sort: String,
    bytes: Vec<u8>,
    clock: VectorClock,
}

/// A reference sidecar: stamps every outgoing message with this
/// participant's vector clock, and merges an incoming message's clock
/// into the local one on receipt.
#[derive(Debug)]
pub struct VectorClockLogger {
    owner: Participant,
    clock: VectorClock,
}

impl VectorClockLogger {
    pub fn new(owner: Participant) -> Self {
        VectorClockLogger {
            owner,
            clock: VectorClock::default(),
        }
    }

    pub fn clock(&self) -> &VectorClock {
        &self.clock
    }
}

impl LoggingSidecar for VectorClockLogger {
    fn prepare_send(&mut self, msg_tag: &str, payload: &PayloadBox) -> Vec<u8> {
        self.clock.increment(&self.owner);
        tracing::trace!(owner = %self.owner, %msg_tag, clock = %self.clock, "prepare_send");
        let envelope = ClockedEnvelope {
            sort: payload.sort().as_str().to_string(),
            bytes: payload.bytes().to_vec(),
            clock: self.clock.clone(),
        };
        bincode::serialize(&envelope).expect("in-memory envelope encoding is infallible")
    }

    fn unpack_receive(&mut self, msg_tag: &str, buf: &[u8]) -> PayloadBox {
        let envelope: ClockedEnvelope =
            bincode::deserialize(buf).expect("VectorClockLogger envelopes are always well-formed");
        self.clock.merge(&envelope.clock);
        self.clock.increment(&self.owner);
        tracing::trace!(owner = %self.owner, %msg_tag, clock = %self.clock, "unpack_receive");
        PayloadBox::from_raw(Sort::new(envelope.sort), envelope.bytes)
    }
}
