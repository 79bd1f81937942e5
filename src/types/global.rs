//! The global type: a single tree describing a whole multiparty protocol.

use std::collections::BTreeMap;

use super::local::LocalType;
use super::primitives::{Channel, Label, NameType, Participant, Prefix, Sort};

/// A multiparty protocol, as seen from nobody in particular.
///
/// Trees are built once and treated as immutable afterward; every method
/// here is a pure, structural function over the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GlobalType {
    /// One message of `sort` from `prefix.p1` to `prefix.p2`, then `next`.
    Value {
        prefix: Prefix,
        sort: Sort,
        next: Box<GlobalType>,
    },
    /// `prefix.p1` selects a label to send to `prefix.p2`.
    Branching {
        prefix: Prefix,
        branches: BTreeMap<Label, GlobalType>,
    },
    /// `a` and `b` run concurrently. Has no successor of its own.
    Parallel { a: Box<GlobalType>, b: Box<GlobalType> },
    /// Binds `bind` in `body`; `body` may refer back via `Name(bind)`.
    Recursive { bind: NameType, body: Box<GlobalType> },
    /// Back-reference to an enclosing `Recursive`.
    Name(NameType),
    /// Protocol terminator.
    End,
}

impl GlobalType {
    pub fn value(prefix: Prefix, sort: impl Into<Sort>, next: GlobalType) -> Self {
        GlobalType::Value {
            prefix,
            sort: sort.into(),
            next: Box::new(next),
        }
    }

    pub fn branching(prefix: Prefix, branches: BTreeMap<Label, GlobalType>) -> Self {
        assert!(!branches.is_empty(), "Branching requires at least one branch");
        GlobalType::Branching { prefix, branches }
    }

    pub fn parallel(a: GlobalType, b: GlobalType) -> Self {
        GlobalType::Parallel { a: Box::new(a), b: Box::new(b) }
    }

    pub fn recursive(bind: impl Into<NameType>, body: GlobalType) -> Self {
        GlobalType::Recursive {
            bind: bind.into(),
            body: Box::new(body),
        }
    }

    /// Capture-avoiding by construction: substituting into a `Recursive`
    /// whose `bind` shadows `u` leaves it untouched.
    pub fn substitute(&self, u: &NameType, t_sub: &GlobalType) -> GlobalType {
        match self {
            GlobalType::Value { prefix, sort, next } => GlobalType::Value {
                prefix: prefix.clone(),
                sort: sort.clone(),
                next: Box::new(next.substitute(u, t_sub)),
            },
            GlobalType::Branching { prefix, branches } => GlobalType::Branching {
                prefix: prefix.clone(),
                branches: branches
                    .iter()
                    .map(|(l, g)| (l.clone(), g.substitute(u, t_sub)))
                    .collect(),
            },
            GlobalType::Parallel { a, b } => GlobalType::Parallel {
                a: Box::new(a.substitute(u, t_sub)),
                b: Box::new(b.substitute(u, t_sub)),
            },
            GlobalType::Recursive { bind, body } => {
                if bind == u {
                    self.clone()
                } else {
                    GlobalType::Recursive {
                        bind: bind.clone(),
                        body: Box::new(body.substitute(u, t_sub)),
                    }
                }
            }
            GlobalType::Name(n) => {
                if n == u {
                    t_sub.clone()
                } else {
                    GlobalType::Name(n.clone())
                }
            }
            GlobalType::End => GlobalType::End,
        }
    }

    /// `Recursive(bind, body).unfold_one_level() == body.substitute(bind, self)`.
    /// Identity on any other head.
    pub fn unfold_one_level(&self) -> GlobalType {
        match self {
            GlobalType::Recursive { bind, body } => body.substitute(bind, self),
            other => other.clone(),
        }
    }

    /// Structural recursive equality.
    pub fn equals(&self, other: &GlobalType) -> bool {
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
            GlobalType::Value { prefix, next, .. } => {
                out.push(prefix.channel.clone());
                next.collect_channels(out);
            }
            GlobalType::Branching { prefix, branches } => {
                out.push(prefix.channel.clone());
                for g in branches.values() {
                    g.collect_channels(out);
                }
            }
            GlobalType::Parallel { a, b } => {
                a.collect_channels(out);
                b.collect_channels(out);
            }
            GlobalType::Recursive { body, .. } => body.collect_channels(out),
            GlobalType::Name(_) | GlobalType::End => {}
        }
    }

    /// All participants touched by any prefix, deduplicated.
    pub fn participants(&self) -> Vec<Participant> {
        let mut out = Vec::new();
        self.collect_participants(&mut out);
        out.sort();
        out.dedup();
        out
    }

    fn collect_participants(&self, out: &mut Vec<Participant>) {
        match self {
            GlobalType::Value { prefix, next, .. } => {
                out.extend(prefix.participants());
                next.collect_participants(out);
            }
            GlobalType::Branching { prefix, branches } => {
                out.extend(prefix.participants());
                for g in branches.values() {
                    g.collect_participants(out);
                }
            }
            GlobalType::Parallel { a, b } => {
                a.collect_participants(out);
                b.collect_participants(out);
            }
            GlobalType::Recursive { body, .. } => body.collect_participants(out),
            GlobalType::Name(_) | GlobalType::End => {}
        }
    }

    /// Does `p` appear in any prefix reachable from this node?
    pub fn mentions(&self, p: &Participant) -> bool {
        self.participants().iter().any(|x| x == p)
    }

    /// Every root-to-leaf list of prefixes: for `Branching`, the cross
    /// product over branches; for `Parallel`, the disjoint union of both
    /// sides' prefix-lists.
    pub fn prefixes(&self) -> Vec<Vec<Prefix>> {
        match self {
            GlobalType::Value { prefix, next, .. } => {
                let mut out = vec![vec![prefix.clone()]];
                for tail in next.prefixes() {
                    let mut path = vec![prefix.clone()];
                    path.extend(tail);
                    out.push(path);
                }
                out
            }
            GlobalType::Branching { prefix, branches } => {
                let mut out = Vec::new();
                for g in branches.values() {
                    for tail in g.prefixes() {
                        let mut path = vec![prefix.clone()];
                        path.extend(tail);
                        out.push(path);
                    }
                }
                if out.is_empty() {
                    out.push(vec![prefix.clone()]);
                }
                out
            }
            GlobalType::Parallel { a, b } => {
                let mut out = a.prefixes();
                out.extend(b.prefixes());
                out
            }
            GlobalType::Recursive { body, .. } => body.prefixes(),
            GlobalType::Name(_) | GlobalType::End => Vec::new(),
        }
    }
}

/// Local projection error: the only non-fatal, caller-visible error from
/// the projection module.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
#[error("projection undefined: {reason}")]
pub struct ProjectionError {
    pub reason: String,
}

impl ProjectionError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self { reason: reason.into() }
    }
}

pub type ProjectionResult = Result<LocalType, ProjectionError>;
