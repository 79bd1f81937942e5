//! The runtime protocol monitor and its pluggable collaborators.

pub mod error;
pub mod logger;
pub mod monitor;
pub mod sort;
pub mod transport;

pub use error::MonitorError;
pub use logger::{LoggingSidecar, NullLogger, VectorClock, VectorClockLogger};
pub use monitor::Checker;
pub use sort::{PayloadBox, Sortable};
pub use transport::{read, read_from, write, write_to, DatagramTransport, IoError, StreamTransport};
