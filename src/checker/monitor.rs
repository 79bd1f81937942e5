//! The runtime protocol monitor: a state machine over one participant's
//! [`LocalType`] that validates each send/receive against the protocol
//! before it happens, and advances after it does.
//!
//! Grounded on `original_source/dynamic/dynamic.go`'s `Checker`: the same
//! five operations (`check_recv_channel`, `check_send_channel`,
//! `prepare_send`, `unpack_receive`, `advance`), the same eager unfold of
//! a `Recursive` head at construction and after every `advance`, and the
//! same fatal-on-`End` behavior for any further step.

use tracing::{debug, trace, warn};

use crate::checker::error::MonitorError;
use crate::checker::logger::LoggingSidecar;
use crate::checker::sort::PayloadBox;
use crate::types::{Channel, Label, LocalType};

/// Tracks one participant's progress through its local type. Every
/// public method either returns `Ok` and leaves the monitor in a
/// consistent state, or returns a [`MonitorError`] — always fatal, per
/// spec.md §7: the caller must abort the session rather than retry.
#[derive(Debug)]
pub struct Checker {
    current: LocalType,
    pending_label: Option<Label>,
}

impl Checker {
    /// Build a monitor for `local`. A `Recursive` head is unfolded
    /// immediately so `current` always exposes the leading
    /// `Send`/`Receive`/`Selection`/`Branching`/`End`.
    pub fn new(local: LocalType) -> Self {
        Checker {
            current: unfold_head(local),
            pending_label: None,
        }
    }

    pub fn current(&self) -> &LocalType {
        &self.current
    }

    /// The sort expected on the next `Send`/`Receive`, if the current
    /// step is one.
    pub fn expected_sort(&self) -> Option<&crate::types::Sort> {
        match &self.current {
            LocalType::Send { sort, .. } | LocalType::Receive { sort, .. } => Some(sort),
            _ => None,
        }
    }

    pub fn is_done(&self) -> bool {
        matches!(self.current, LocalType::End)
    }

    /// Operation 1: does `channel` match the channel this monitor
    /// expects to receive on next?
    pub fn check_recv_channel(&self, channel: &Channel) -> Result<(), MonitorError> {
        match &self.current {
            LocalType::Receive { channel: expected, .. } | LocalType::Branching { channel: expected, .. } => {
                if expected == channel {
                    Ok(())
                } else {
                    Err(MonitorError::ChannelMismatch {
                        expected: expected.clone(),
                        found: channel.clone(),
                    })
                }
            }
            other => Err(MonitorError::WrongOperation {
                expected: "Receive or Branching",
                found: type_name(other),
            }),
        }
    }

    /// Operation 2: does `channel` match the channel this monitor
    /// expects to send on next?
    pub fn check_send_channel(&self, channel: &Channel) -> Result<(), MonitorError> {
        match &self.current {
            LocalType::Send { channel: expected, .. } | LocalType::Selection { channel: expected, .. } => {
                if expected == channel {
                    Ok(())
                } else {
                    Err(MonitorError::ChannelMismatch {
                        expected: expected.clone(),
                        found: channel.clone(),
                    })
                }
            }
            other => Err(MonitorError::WrongOperation {
                expected: "Send or Selection",
                found: type_name(other),
            }),
        }
    }

    /// Operation 3: validate an outgoing payload against the current
    /// step and encode it via `logger`. Does **not** advance — the
    /// caller advances only once the bytes have actually been handed to
    /// a transport (spec.md §9 Open Question 1; see `transport::write`).
    pub fn prepare_send(
        &mut self,
        logger: &mut impl LoggingSidecar,
        msg_tag: &str,
        payload: PayloadBox,
    ) -> Result<Vec<u8>, MonitorError> {
        trace!(%msg_tag, sort = %payload.sort(), "prepare_send: start");
        match &self.current {
            LocalType::Send { sort, .. } => {
                if payload.sort() != sort {
                    let err = MonitorError::SortMismatch {
                        expected: sort.clone(),
                        found: payload.sort().clone(),
                    };
                    warn!(%msg_tag, error = %err, "prepare_send: rejected");
                    return Err(err);
                }
            }
            LocalType::Selection { branches, .. } => {
                let label = payload.as_label().ok_or(MonitorError::ExpectedLabel)?;
                if !branches.contains_key(&label) {
                    let err = MonitorError::UnknownLabel { label };
                    warn!(%msg_tag, error = %err, "prepare_send: rejected");
                    return Err(err);
                }
                self.pending_label = Some(label);
            }
            other => {
                let err = MonitorError::WrongOperation {
                    expected: "Send or Selection",
                    found: type_name(other),
                };
                warn!(%msg_tag, error = %err, "prepare_send: rejected");
                return Err(err);
            }
        }
        debug!(%msg_tag, "prepare_send: validated");
        Ok(logger.prepare_send(msg_tag, &payload))
    }

    /// Operation 4: decode an incoming buffer via `logger`, validate it
    /// against the current step, and advance. Unlike `prepare_send`
    /// there is no further fallible step after a receive completes, so
    /// validation and advance happen atomically.
    pub fn unpack_receive(
        &mut self,
        logger: &mut impl LoggingSidecar,
        msg_tag: &str,
        buf: &[u8],
    ) -> Result<PayloadBox, MonitorError> {
        let payload = logger.unpack_receive(msg_tag, buf);
        match &self.current {
            LocalType::Receive { sort, .. } => {
                if payload.sort() != sort {
                    return Err(MonitorError::SortMismatch {
                        expected: sort.clone(),
                        found: payload.sort().clone(),
                    });
                }
            }
            LocalType::Branching { branches, .. } => {
                let label = payload.as_label().ok_or(MonitorError::ExpectedLabel)?;
                if !branches.contains_key(&label) {
                    return Err(MonitorError::UnknownLabel { label });
                }
                self.pending_label = Some(label);
            }
            other => {
                return Err(MonitorError::WrongOperation {
                    expected: "Receive or Branching",
                    found: type_name(other),
                })
            }
        }
        self.advance()?;
        Ok(payload)
    }

    /// Operation 5: move `current` to the next step. `Send`/`Receive`
    /// step to `next`; `Selection`/`Branching` step to the branch named
    /// by `pending_label`, consuming it. Advancing past `End` is fatal.
    ///
    /// Like every other `MonitorError`, a failure here is unconditionally
    /// fatal: the caller must abort the session rather than inspect
    /// `current` and retry.
    pub fn advance(&mut self) -> Result<(), MonitorError> {
        let stepped = match std::mem::replace(&mut self.current, LocalType::End) {
            LocalType::Send { next, .. } | LocalType::Receive { next, .. } => *next,
            LocalType::Selection { branches, .. } | LocalType::Branching { branches, .. } => {
                let label = self.pending_label.take().ok_or(MonitorError::NoPendingLabel)?;
                branches
                    .into_iter()
                    .find(|(l, _)| l == &label)
                    .map(|(_, t)| t)
                    .ok_or(MonitorError::UnknownLabel { label })?
            }
            LocalType::End => return Err(MonitorError::AdvancedPastEnd),
            other @ (LocalType::Recursive { .. } | LocalType::Name(_)) => other,
        };
        self.current = unfold_head(stepped);
        Ok(())
    }
}

/// Unfold `Recursive`/`Name` heads until the leading constructor is one
/// of `Send`/`Receive`/`Selection`/`Branching`/`End`.
fn unfold_head(mut local: LocalType) -> LocalType {
    loop {
        match local {
            LocalType::Recursive { .. } => local = local.unfold_one_level(),
            other => return other,
        }
    }
}

fn type_name(local: &LocalType) -> &'static str {
    match local {
        LocalType::Send { .. } => "Send",
        LocalType::Receive { .. } => "Receive",
        LocalType::Selection { .. } => "Selection",
        LocalType::Branching { .. } => "Branching",
        LocalType::Recursive { .. } => "Recursive",
        LocalType::Name(_) => "Name",
        LocalType::End => "End",
    }
}
