//! The local type: what one participant must do, after projection.

use std::collections::BTreeMap;

use super::primitives::{Channel, Label, NameType, Sort};

/// One participant's view of a protocol. The counterpart identity is
/// erased by projection — only the channel and sort survive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocalType {
    Send {
        channel: Channel,
        sort: Sort,
        next: Box<LocalType>,
    },
    Receive {
        channel: Channel,
        sort: Sort,
        next: Box<LocalType>,
    },
    /// This participant chooses a label to send.
    Selection {
        channel: Channel,
        branches: BTreeMap<Label, LocalType>,
    },
    /// This participant receives a label.
    Branching {
        channel: Channel,
        branches: BTreeMap<Label, LocalType>,
    },
    Recursive {
        bind: NameType,
        body: Box<LocalType>,
    },
    Name(NameType),
    End,
}

impl LocalType {
    pub fn send(channel: impl Into<Channel>, sort: impl Into<Sort>, next: LocalType) -> Self {
        LocalType::Send {
            channel: channel.into(),
            sort: sort.into(),
            next: Box::new(next),
        }
    }

    pub fn receive(channel: impl Into<Channel>, sort: impl Into<Sort>, next: LocalType) -> Self {
        LocalType::Receive {
            channel: channel.into(),
            sort: sort.into(),
            next: Box::new(next),
        }
    }

    pub fn recursive(bind: impl Into<NameType>, body: LocalType) -> Self {
        LocalType::Recursive {
            bind: bind.into(),
            body: Box::new(body),
        }
    }

    /// Capture-avoiding by construction, same rule as `GlobalType::substitute`.
    pub fn substitute(&self, u: &NameType, t_sub: &LocalType) -> LocalType {
        match self {
            LocalType::Send { channel, sort, next } => LocalType::Send {
                channel: channel.clone(),
                sort: sort.clone(),
                next: Box::new(next.substitute(u, t_sub)),
            },
            LocalType::Receive { channel, sort, next } => LocalType::Receive {
                channel: channel.clone(),
                sort: sort.clone(),
                next: Box::new(next.substitute(u, t_sub)),
            },
            LocalType::Selection { channel, branches } => LocalType::Selection {
                channel: channel.clone(),
                branches: branches
                    .iter()
                    .map(|(l, t)| (l.clone(), t.substitute(u, t_sub)))
                    .collect(),
            },
            LocalType::Branching { channel, branches } => LocalType::Branching {
                channel: channel.clone(),
                branches: branches
                    .iter()
                    .map(|(l, t)| (l.clone(), t.substitute(u, t_sub)))
                    .collect(),
            },
            LocalType::Recursive { bind, body } => {
                if bind == u {
                    self.clone()
                } else {
                    LocalType::Recursive {
                        bind: bind.clone(),
                        body: Box::new(body.substitute(u, t_sub)),
                    }
                }
            }
            LocalType::Name(n) => {
                if n == u {
                    t_sub.clone()
                } else {
                    LocalType::Name(n.clone())
                }
            }
            LocalType::End => LocalType::End,
        }
    }

    pub fn unfold_one_level(&self) -> LocalType {
        match self {
            LocalType::Recursive { bind, body } => body.substitute(bind, self),
            other => other.clone(),
        }
    }

    pub fn equals(&self, other: &LocalType) -> bool {
        self == other
    }

    pub fn channels(&self) -> Vec<Channel> {
        let mut out = Vec::new();
        self.collect_channels(&mut out);
        out.sort();
        out.dedup();
        out
    }

    fn collect_channels(&self, out: &mut Vec<Channel>) {
        match self {
            LocalType::Send { channel, next, .. } | LocalType::Receive { channel, next, .. } => {
                out.push(channel.clone());
                next.collect_channels(out);
            }
            LocalType::Selection { channel, branches } | LocalType::Branching { channel, branches } => {
                out.push(channel.clone());
                for t in branches.values() {
                    t.collect_channels(out);
                }
            }
            LocalType::Recursive { body, .. } => body.collect_channels(out),
            LocalType::Name(_) | LocalType::End => {}
        }
    }

    /// Is this the trivial projection? Used by projection to decide
    /// whether a `Recursive`/`Loop` wrapper is worth keeping (invariant 4
    /// of spec.md §3: a `Recursive` body that never touches the
    /// participant collapses to `End`).
    pub fn is_end(&self) -> bool {
        matches!(self, LocalType::End)
    }
}
