//! The runtime type-tag extractor the design notes call for: a small
//! trait producing the symbolic [`Sort`] name of a Rust value, plus the
//! boxed payload shape that crosses the monitor boundary.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::types::{Label, Sort};

/// Implemented by Rust types that can appear as a message payload.
/// `sort_name` is compared against a global type's `Sort` by literal
/// string equality — the toolkit defines no coercion (spec.md §4.4).
pub trait Sortable {
    fn sort_name() -> &'static str;
}

impl Sortable for i64 {
    fn sort_name() -> &'static str {
        "int"
    }
}

impl Sortable for String {
    fn sort_name() -> &'static str {
        "string"
    }
}

impl Sortable for bool {
    fn sort_name() -> &'static str {
        "bool"
    }
}

impl Sortable for f64 {
    fn sort_name() -> &'static str {
        "float"
    }
}

/// The sort name reserved internally for a selection/branching label.
/// Never collides with a user `Sort` as long as protocols don't declare a
/// payload sort literally named `"label"`; see DESIGN.md.
const LABEL_SORT: &str = "label";

/// A payload in flight: either a sorted value or a selection/branching
/// label, reduced to (sort name, encoded bytes) so the [`Checker`](crate::checker::Checker)
/// never needs to know the payload's Rust type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayloadBox {
    sort: Sort,
    bytes: Vec<u8>,
}

impl PayloadBox {
    /// Box a typed value for a `Send`/`Receive` step.
    pub fn of<T: Sortable + Serialize>(value: &T) -> Self {
        let bytes = bincode::serialize(value).expect("in-memory payload encoding is infallible");
        PayloadBox {
            sort: Sort::new(T::sort_name()),
            bytes,
        }
    }

    /// Box a label for a `Selection`/`Branching` step.
    pub fn label(label: impl Into<Label>) -> Self {
        let label = label.into();
        PayloadBox {
            sort: Sort::new(LABEL_SORT),
            bytes: label.as_str().as_bytes().to_vec(),
        }
    }

    pub fn sort(&self) -> &Sort {
        &self.sort
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn as_label(&self) -> Option<Label> {
        if self.sort.as_str() == LABEL_SORT {
            Some(Label::new(String::from_utf8_lossy(&self.bytes).into_owned()))
        } else {
            None
        }
    }

    /// Decode the boxed value back into `T`. Callers are expected to know
    /// which `T` corresponds to the `Sort` they asked the `Checker` to
    /// validate — the same discipline the wire format assumes between a
    /// message's producer and consumer.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, bincode::Error> {
        bincode::deserialize(&self.bytes)
    }

    pub(crate) fn from_raw(sort: Sort, bytes: Vec<u8>) -> Self {
        PayloadBox { sort, bytes }
    }
}
