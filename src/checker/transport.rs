//! The transport-callback contract (spec.md §6): the monitor never owns a
//! socket. Callers plug in a [`StreamTransport`] or [`DatagramTransport`]
//! and drive the monitor through the `read`/`write` (stream) or
//! `read_from`/`write_to` (datagram) wrappers below, which fix the
//! ordering between validation, the I/O call, and the state advance
//! (SPEC_FULL.md / spec.md §9 Open Question 1):
//!
//! - send: validate against the current local type, *then* hand bytes to
//!   the transport, and only advance the monitor if the transport call
//!   succeeds. A transport failure leaves the monitor's state untouched,
//!   so the caller can retry the same send. For datagrams, resolving the
//!   channel to a peer address happens before validation touches the
//!   monitor, so an unresolved peer never advances it either.
//! - receive: the bytes are already in hand once the transport call
//!   returns, so validate and advance happen together.

use crate::checker::error::MonitorError;
use crate::checker::logger::LoggingSidecar;
use crate::checker::monitor::Checker;
use crate::checker::sort::PayloadBox;
use crate::types::Channel;

/// A connection-oriented transport: one `send`/`recv` pair per call.
pub trait StreamTransport {
    type Error: std::error::Error + 'static;
    fn send(&mut self, bytes: &[u8]) -> Result<(), Self::Error>;
    fn recv(&mut self) -> Result<Vec<u8>, Self::Error>;
}

/// A connectionless transport: each call names its own destination/source
/// by address rather than by an open connection.
pub trait DatagramTransport {
    type Error: std::error::Error + 'static;
    fn send_to(&mut self, peer_addr: &str, bytes: &[u8]) -> Result<(), Self::Error>;
    fn recv_from(&mut self) -> Result<(String, Vec<u8>), Self::Error>;

    /// Map a protocol channel to a peer address. `write_to`/`read_from`
    /// call this to find where a `Channel` actually lives before doing
    /// any I/O; `None` means the channel has no known peer yet.
    fn resolve(&self, channel: &Channel) -> Option<String>;
}

/// Either failure mode an I/O wrapper can return. Never collapsed into a
/// single variant: callers branch on `Transport` to decide whether a
/// retry is safe (the monitor didn't move) versus `Monitor`, which is
/// always fatal.
#[derive(Debug)]
pub enum IoError<E> {
    Monitor(MonitorError),
    Transport(E),
    /// `DatagramTransport::resolve` returned `None` for this channel.
    /// Raised before any I/O is attempted, so the monitor is untouched.
    UnresolvedPeer(Channel),
}

impl<E: std::fmt::Display> std::fmt::Display for IoError<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IoError::Monitor(e) => write!(f, "protocol violation: {e}"),
            IoError::Transport(e) => write!(f, "transport error: {e}"),
            IoError::UnresolvedPeer(channel) => write!(f, "no known peer address for channel {channel}"),
        }
    }
}

impl<E: std::error::Error + 'static> std::error::Error for IoError<E> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            IoError::Monitor(e) => Some(e),
            IoError::Transport(e) => Some(e),
            IoError::UnresolvedPeer(_) => None,
        }
    }
}

/// Validate, send, and (only on transport success) advance.
pub fn write<L, T>(
    checker: &mut Checker,
    logger: &mut L,
    transport: &mut T,
    channel: &Channel,
    msg_tag: &str,
    payload: PayloadBox,
) -> Result<(), IoError<T::Error>>
where
    L: LoggingSidecar,
    T: StreamTransport,
{
    checker.check_send_channel(channel).map_err(IoError::Monitor)?;
    let bytes = checker
        .prepare_send(logger, msg_tag, payload)
        .map_err(IoError::Monitor)?;
    transport.send(&bytes).map_err(IoError::Transport)?;
    checker.advance().map_err(IoError::Monitor)
}

/// Receive and validate+advance in one step.
pub fn read<L, T>(
    checker: &mut Checker,
    logger: &mut L,
    transport: &mut T,
    channel: &Channel,
    msg_tag: &str,
) -> Result<PayloadBox, IoError<T::Error>>
where
    L: LoggingSidecar,
    T: StreamTransport,
{
    checker.check_recv_channel(channel).map_err(IoError::Monitor)?;
    let buf = transport.recv().map_err(IoError::Transport)?;
    checker
        .unpack_receive(logger, msg_tag, &buf)
        .map_err(IoError::Monitor)
}

/// Datagram counterpart to `write`: resolve `channel` to a peer address
/// before validating and sending, and (only on transport success) advance.
pub fn write_to<L, T>(
    checker: &mut Checker,
    logger: &mut L,
    transport: &mut T,
    channel: &Channel,
    msg_tag: &str,
    payload: PayloadBox,
) -> Result<(), IoError<T::Error>>
where
    L: LoggingSidecar,
    T: DatagramTransport,
{
    checker.check_send_channel(channel).map_err(IoError::Monitor)?;
    let peer_addr = transport
        .resolve(channel)
        .ok_or_else(|| IoError::UnresolvedPeer(channel.clone()))?;
    let bytes = checker
        .prepare_send(logger, msg_tag, payload)
        .map_err(IoError::Monitor)?;
    transport.send_to(&peer_addr, &bytes).map_err(IoError::Transport)?;
    checker.advance().map_err(IoError::Monitor)
}

/// Datagram counterpart to `read`: receive a `(peer_addr, bytes)` pair and
/// validate+advance in one step. The sender's address is not itself
/// checked against `resolve(channel)` — a datagram transport may learn
/// peers dynamically from whoever answers first.
pub fn read_from<L, T>(
    checker: &mut Checker,
    logger: &mut L,
    transport: &mut T,
    channel: &Channel,
    msg_tag: &str,
) -> Result<PayloadBox, IoError<T::Error>>
where
    L: LoggingSidecar,
    T: DatagramTransport,
{
    checker.check_recv_channel(channel).map_err(IoError::Monitor)?;
    let (_peer_addr, buf) = transport.recv_from().map_err(IoError::Transport)?;
    checker
        .unpack_receive(logger, msg_tag, &buf)
        .map_err(IoError::Monitor)
}
