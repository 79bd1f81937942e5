//! Opaque identifiers shared by global and local types.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! string_newtype {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(s: impl Into<String>) -> Self {
                Self(s.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self::new(s)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self::new(s)
            }
        }
    };
}

string_newtype!(
    /// A role participating in a protocol.
    Participant
);
string_newtype!(
    /// A bidirectional channel name, typically `host:port`.
    Channel
);
string_newtype!(
    /// The symbolic name of a payload's data type, e.g. `"int"`.
    Sort
);
string_newtype!(
    /// A branch label in a choice.
    Label
);
string_newtype!(
    /// The name bound by a recursive (`mu`) type.
    NameType
);

/// `(p1, p2, channel)`: "`p1` communicates with `p2` over `channel`".
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Prefix {
    pub p1: Participant,
    pub p2: Participant,
    pub channel: Channel,
}

impl Prefix {
    pub fn new(p1: impl Into<Participant>, p2: impl Into<Participant>, channel: impl Into<Channel>) -> Self {
        Self {
            p1: p1.into(),
            p2: p2.into(),
            channel: channel.into(),
        }
    }

    pub fn participants(&self) -> [Participant; 2] {
        [self.p1.clone(), self.p2.clone()]
    }

    /// II: two sends into the same receiver.
    pub fn input_input(&self, other: &Prefix) -> bool {
        self.p2 == other.p2 && (self.channel != other.channel || self.p1 == other.p1)
    }

    /// IO: the output of `self` is the input of `other`.
    pub fn input_output(&self, other: &Prefix) -> bool {
        self.p2 == other.p1 && self.channel != other.channel
    }

    /// OO: both prefixes share a sender.
    pub fn output_output(&self, other: &Prefix) -> bool {
        self.p1 == other.p1 && (self.channel != other.channel || self.p2 == other.p2)
    }
}

impl fmt::Display for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{}:{}", self.p1, self.p2, self.channel)
    }
}
