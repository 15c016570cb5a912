//! The single send and receive performed over a connected socket.

use {
    crate::{
        error::{ReceiveError, SendError},
        lifecycle::SocketGuard,
        network::Network,
    },
    tracing::log,
};

pub const DEFAULT_BUFFER_CAPACITY: usize = 512;

/// A fixed-capacity receive buffer that remembers how much of it the last
/// receive filled. Contents are raw bytes, never assumed to be terminated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiveBuffer {
    bytes: Box<[u8]>,
    len: usize,
}

impl ReceiveBuffer {
    /// `capacity` is raised to one byte if zero, so a zero-length receive
    /// always means the peer closed.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bytes: vec![0; capacity.max(1)].into_boxed_slice(),
            len: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.bytes.len()
    }

    /// The bytes delivered by the most recent receive.
    pub fn data(&self) -> &[u8] {
        &self.bytes[..self.len]
    }
}

impl Default for ReceiveBuffer {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_BUFFER_CAPACITY)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReceiveOutcome {
    /// The peer ended the connection. Not an error.
    Closed,
    Data(usize),
}

/// Hands all of `payload` to the transport, looping over partial sends.
pub fn send_all<N: Network>(socket: &SocketGuard<'_, N>, payload: &[u8]) -> Result<usize, SendError> {
    let mut sent = 0;

    while sent < payload.len() {
        match socket.network().send(socket.handle(), &payload[sent..]) {
            Ok(0) => {
                log::warn!("transport accepted no bytes after {sent} of {}", payload.len());
                return Err(SendError::ConnectionAborted);
            }
            Ok(count) => sent += count,
            Err(e) => {
                log::warn!("unable to send: {e}");
                return Err(e);
            }
        }
    }

    log::debug!("sent {sent} bytes on {:?}", socket.handle());
    Ok(sent)
}

/// Blocks for one receive into `buffer`, replacing its previous contents.
pub fn receive_once<N: Network>(
    socket: &SocketGuard<'_, N>,
    buffer: &mut ReceiveBuffer,
) -> Result<ReceiveOutcome, ReceiveError> {
    buffer.len = 0;

    match socket.network().receive(socket.handle(), &mut buffer.bytes) {
        Ok(0) => {
            log::debug!("peer closed {:?}", socket.handle());
            Ok(ReceiveOutcome::Closed)
        }
        Ok(count) => {
            buffer.len = count;
            log::debug!("received {count} bytes on {:?}", socket.handle());
            Ok(ReceiveOutcome::Data(count))
        }
        Err(e) => {
            log::warn!("unable to receive: {e}");
            Err(e)
        }
    }
}
