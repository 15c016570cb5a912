//! One closed error enum per socket-layer operation.
//!
//! Platform codes are translated into these variants by the backend (see
//! `sys`); everything above the backend matches on the variants only.

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StartupError {
    #[error("the network subsystem is not ready for network communication")]
    SubsystemNotReady,
    #[error("the requested version {0} is not supported")]
    VersionNotSupported(crate::Version),
    #[error("a blocking operation is in progress")]
    OperationInProgress,
    #[error("the task limit of the network subsystem has been reached")]
    TaskLimitReached,
    #[error("an invalid parameter was provided")]
    InvalidParameter,
    #[error("an unknown error code {0} occurred during initialization")]
    Unknown(i32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CleanupError {
    #[error("a successful start must occur before using this function")]
    NotInitialized,
    #[error("the network subsystem has failed")]
    NetworkDown,
    #[error("a blocking call is still in progress")]
    OperationInProgress,
    #[error("an unknown error code {0} occurred during cleanup")]
    Unknown(i32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ResolutionError {
    #[error("a temporary failure in name resolution occurred")]
    TemporaryFailure,
    #[error("an invalid value was provided in the resolution hints")]
    InvalidHints,
    #[error("a nonrecoverable failure in name resolution occurred")]
    NoRecovery,
    #[error("the address family is not supported")]
    FamilyNotSupported,
    #[error("a memory allocation failure occurred")]
    OutOfMemory,
    #[error("the name does not resolve for the supplied parameters")]
    NameNotFound,
    #[error("the service is not supported for the socket type")]
    ServiceNotSupported,
    #[error("the socket type is not supported")]
    SocketTypeNotSupported,
    #[error("the name resolved but has no addresses")]
    NoData,
    #[error("a successful start must occur before using this function")]
    SubsystemNotInitialized,
    #[error("an unknown error code {0} occurred")]
    Unknown(i32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SocketError {
    #[error("a successful start must occur before using this function")]
    SubsystemNotInitialized,
    #[error("the network subsystem has failed")]
    NetworkDown,
    #[error("the specified address family is not supported")]
    FamilyNotSupported,
    #[error("a blocking call is in progress")]
    OperationInProgress,
    #[error("no more socket descriptors are available")]
    DescriptorLimitReached,
    #[error("an invalid argument was supplied")]
    InvalidArgument,
    #[error("the service provider returned a version other than 2.2")]
    ProviderVersionMismatch,
    #[error("the service provider failed to initialize")]
    ProviderInitFailed,
    #[error("no buffer space is available, the socket cannot be created")]
    NoBufferSpace,
    #[error("the specified protocol is not supported")]
    ProtocolNotSupported,
    #[error("the specified protocol is the wrong type for this socket")]
    ProtocolTypeMismatch,
    #[error("the specified socket type is not supported in this address family")]
    SocketTypeNotSupported,
    #[error("an unknown error code {0} occurred")]
    Unknown(i32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BindError {
    #[error("a successful start must occur before using this function")]
    SubsystemNotInitialized,
    #[error("the network subsystem has failed")]
    NetworkDown,
    #[error("an attempt was made to access a socket in a way forbidden by its access permissions")]
    AccessDenied,
    #[error("the address is already in use")]
    AddressInUse,
    #[error("the requested address is not valid in its context")]
    AddressNotAvailable,
    #[error("the address is not a valid part of the user address space")]
    InvalidPointer,
    #[error("a blocking call is in progress")]
    OperationInProgress,
    #[error("the socket is already bound to an address")]
    AlreadyBound,
    #[error("not enough buffers are available, too many connections")]
    NoBufferSpace,
    #[error("the descriptor is not a socket")]
    NotASocket,
    #[error("an unknown error code {0} occurred")]
    Unknown(i32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConnectError {
    #[error("a successful start must occur before using this function")]
    SubsystemNotInitialized,
    #[error("the network subsystem has failed")]
    NetworkDown,
    #[error("the local address of the socket is already in use")]
    AddressInUse,
    #[error("the blocking call was interrupted")]
    Interrupted,
    #[error("a blocking call is in progress")]
    OperationInProgress,
    #[error("a connection attempt is already in progress on this socket")]
    AlreadyInProgress,
    #[error("the remote address is not a valid address")]
    AddressNotAvailable,
    #[error("addresses in the specified family cannot be used with this socket")]
    FamilyNotSupported,
    #[error("the attempt to connect was forcefully rejected")]
    ConnectionRefused,
    #[error("the address is not valid for this socket")]
    InvalidAddress,
    #[error("the socket is a listening socket")]
    ListeningSocket,
    #[error("the socket is already connected")]
    AlreadyConnected,
    #[error("the network cannot be reached from this host at this time")]
    NetworkUnreachable,
    #[error("a socket operation was attempted to an unreachable host")]
    HostUnreachable,
    #[error("no buffer space is available, the socket cannot be connected")]
    NoBufferSpace,
    #[error("the descriptor is not a socket")]
    NotASocket,
    #[error("the attempt to connect timed out without establishing a connection")]
    TimedOut,
    #[error("the socket is nonblocking and the connection cannot be completed immediately")]
    WouldBlock,
    #[error("the attempt to connect was denied by access permissions")]
    AccessDenied,
    #[error("an unknown error code {0} occurred")]
    Unknown(i32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ListenError {
    #[error("a successful start must occur before using this function")]
    SubsystemNotInitialized,
    #[error("the network subsystem has failed")]
    NetworkDown,
    #[error("the local address of the socket is already in use")]
    AddressInUse,
    #[error("a blocking call is in progress")]
    OperationInProgress,
    #[error("the socket has not been bound")]
    NotBound,
    #[error("the socket is already connected")]
    AlreadyConnected,
    #[error("no more socket descriptors are available")]
    DescriptorLimitReached,
    #[error("no buffer space is available")]
    NoBufferSpace,
    #[error("the descriptor is not a socket")]
    NotASocket,
    #[error("the socket does not support the listen operation")]
    UnsupportedOperation,
    #[error("an unknown error code {0} occurred")]
    Unknown(i32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AcceptError {
    #[error("a successful start must occur before using this function")]
    SubsystemNotInitialized,
    #[error("an incoming connection was reset by the remote side before accept completed")]
    ConnectionResetDuringHandshake,
    #[error("the address buffer is too small or not in the user address space")]
    InvalidBuffer,
    #[error("the blocking call was interrupted")]
    Interrupted,
    #[error("listen was not invoked prior to accept")]
    ListenNotCalled,
    #[error("a blocking call is in progress")]
    OperationInProgress,
    #[error("the queue is nonempty upon entry and no descriptors are available")]
    DescriptorLimitReached,
    #[error("the network subsystem has failed")]
    NetworkDown,
    #[error("no buffer space is available")]
    NoBufferSpace,
    #[error("the descriptor is not a socket")]
    NotASocket,
    #[error("the socket does not support connection-oriented service")]
    UnsupportedOperation,
    #[error("the socket is nonblocking and no connections are present to be accepted")]
    WouldBlock,
    #[error("an unknown error code {0} occurred")]
    Unknown(i32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SendError {
    #[error("a successful start must occur before using this function")]
    SubsystemNotInitialized,
    #[error("the network subsystem has failed")]
    NetworkDown,
    #[error("the requested address is a broadcast address without permission")]
    AccessDenied,
    #[error("the blocking call was interrupted")]
    Interrupted,
    #[error("a blocking call is in progress")]
    OperationInProgress,
    #[error("the buffer is not contained in a valid part of the user address space")]
    InvalidBuffer,
    #[error("the connection was broken due to keep-alive activity detecting a failure")]
    NetworkReset,
    #[error("no buffer space is available")]
    NoBufferSpace,
    #[error("the socket is not connected")]
    NotConnected,
    #[error("the descriptor is not a socket")]
    NotASocket,
    #[error("the flags are inconsistent with the socket type")]
    UnsupportedOperation,
    #[error("the socket has been shut down for sending")]
    ShutdownAlready,
    #[error("the socket is nonblocking and the operation would block")]
    WouldBlock,
    #[error("the message is larger than the transport supports")]
    MessageTooLarge,
    #[error("the remote host cannot be reached at this time")]
    HostUnreachable,
    #[error("the socket has not been bound or an unknown flag was specified")]
    InvalidArgument,
    #[error("the virtual circuit was terminated due to a time-out or other failure")]
    ConnectionAborted,
    #[error("the virtual circuit was reset by the remote side")]
    ConnectionReset,
    #[error("the connection was dropped because of a network failure")]
    TimedOut,
    #[error("an unknown error code {0} occurred")]
    Unknown(i32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ReceiveError {
    #[error("a successful start must occur before using this function")]
    SubsystemNotInitialized,
    #[error("the network subsystem has failed")]
    NetworkDown,
    #[error("the buffer is not contained in a valid part of the user address space")]
    InvalidBuffer,
    #[error("the socket is not connected")]
    NotConnected,
    #[error("the blocking call was interrupted")]
    Interrupted,
    #[error("a blocking call is in progress")]
    OperationInProgress,
    #[error("the connection was broken due to keep-alive activity detecting a failure")]
    NetworkReset,
    #[error("the descriptor is not a socket")]
    NotASocket,
    #[error("the flags are inconsistent with the socket type")]
    UnsupportedOperation,
    #[error("the socket has been shut down for receiving")]
    ShutdownAlready,
    #[error("the socket is nonblocking and the operation would block")]
    WouldBlock,
    #[error("the message was too large to fit into the buffer and was truncated")]
    MessageTruncated,
    #[error("the socket has not been bound")]
    NotBound,
    #[error("the virtual circuit was terminated due to a time-out or other failure")]
    ConnectionAborted,
    #[error("the connection was dropped because of a network failure")]
    TimedOut,
    #[error("the virtual circuit was reset by the remote side")]
    ConnectionReset,
    #[error("an unknown error code {0} occurred")]
    Unknown(i32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ShutdownError {
    #[error("a successful start must occur before using this function")]
    SubsystemNotInitialized,
    #[error("the network subsystem has failed")]
    NetworkDown,
    #[error("the shutdown direction is not valid")]
    InvalidArgument,
    #[error("a blocking call is in progress")]
    OperationInProgress,
    #[error("the socket is not connected")]
    NotConnected,
    #[error("the descriptor is not a socket")]
    NotASocket,
    #[error("an unknown error code {0} occurred")]
    Unknown(i32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CloseError {
    #[error("a successful start must occur before using this function")]
    SubsystemNotInitialized,
    #[error("the network subsystem has failed")]
    NetworkDown,
    #[error("the descriptor is not a socket")]
    NotASocket,
    #[error("a blocking call is in progress")]
    OperationInProgress,
    #[error("the blocking call was interrupted")]
    Interrupted,
    #[error("the socket is nonblocking and lingering is enabled")]
    WouldBlock,
    #[error("an unknown error code {0} occurred")]
    Unknown(i32),
}

/// A failed role run, tagged with the operation that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RunError {
    #[error("resolve failed: {0}")]
    Resolve(#[from] ResolutionError),
    #[error("socket failed: {0}")]
    Socket(#[from] SocketError),
    #[error("bind failed: {0}")]
    Bind(#[from] BindError),
    #[error("listen failed: {0}")]
    Listen(#[from] ListenError),
    #[error("accept failed: {0}")]
    Accept(#[from] AcceptError),
    #[error("connect failed: {0}")]
    Connect(#[from] ConnectError),
    #[error("send failed: {0}")]
    Send(#[from] SendError),
    #[error("receive failed: {0}")]
    Receive(#[from] ReceiveError),
    #[error("shutdown failed: {0}")]
    Shutdown(#[from] ShutdownError),
    #[error("close failed: {0}")]
    Close(#[from] CloseError),
}

impl RunError {
    /// Name of the operation that failed.
    pub fn operation(&self) -> &'static str {
        match self {
            Self::Resolve(_) => "resolve",
            Self::Socket(_) => "socket",
            Self::Bind(_) => "bind",
            Self::Listen(_) => "listen",
            Self::Accept(_) => "accept",
            Self::Connect(_) => "connect",
            Self::Send(_) => "send",
            Self::Receive(_) => "receive",
            Self::Shutdown(_) => "shutdown",
            Self::Close(_) => "close",
        }
    }
}
