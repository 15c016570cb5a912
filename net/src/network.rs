use {
    crate::error::{
        AcceptError, BindError, CloseError, ConnectError, ListenError, ReceiveError,
        ResolutionError, SendError, ShutdownError, SocketError,
    },
    std::{fmt, net::SocketAddr},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressFamily {
    Ipv4,
    Ipv6,
}

impl AddressFamily {
    pub fn of(address: &SocketAddr) -> Self {
        match address {
            SocketAddr::V4(_) => Self::Ipv4,
            SocketAddr::V6(_) => Self::Ipv6,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SocketType {
    Stream,
    Datagram,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protocol {
    Tcp,
    Udp,
}

/// Resolution hints. `family: None` accepts any address family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hints {
    pub family: Option<AddressFamily>,
    pub socket_type: SocketType,
    pub protocol: Protocol,
    pub passive: bool,
}

impl Hints {
    /// Hints for a wildcard server bind address.
    pub fn passive(family: Option<AddressFamily>) -> Self {
        Self {
            family,
            socket_type: SocketType::Stream,
            protocol: Protocol::Tcp,
            passive: true,
        }
    }

    /// Hints for resolving a remote host.
    pub fn active(family: Option<AddressFamily>) -> Self {
        Self {
            passive: false,
            ..Self::passive(family)
        }
    }
}

/// One resolved endpoint, tried in resolver order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressCandidate {
    pub family: AddressFamily,
    pub socket_type: SocketType,
    pub protocol: Protocol,
    pub address: SocketAddr,
}

impl AddressCandidate {
    pub fn tcp(address: SocketAddr) -> Self {
        Self {
            family: AddressFamily::of(&address),
            socket_type: SocketType::Stream,
            protocol: Protocol::Tcp,
            address,
        }
    }
}

impl fmt::Display for AddressCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.address)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Send,
    Receive,
    Both,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Backlog {
    /// Let the platform pick the queue length.
    #[default]
    Automatic,
    Exact(i32),
}

/// The socket primitives the connection state machine is built from.
///
/// Every call is blocking. Implementations translate platform codes into the
/// per-operation error enums; nothing above this trait sees a raw code.
pub trait Network {
    type Handle: fmt::Debug;

    fn resolve(
        &self,
        host: Option<&str>,
        service: &str,
        hints: &Hints,
    ) -> Result<Vec<AddressCandidate>, ResolutionError>;

    fn create_socket(&self, candidate: &AddressCandidate) -> Result<Self::Handle, SocketError>;

    fn bind(&self, handle: &Self::Handle, candidate: &AddressCandidate) -> Result<(), BindError>;

    fn listen(&self, handle: &Self::Handle, backlog: Backlog) -> Result<(), ListenError>;

    fn accept(&self, handle: &Self::Handle) -> Result<(Self::Handle, SocketAddr), AcceptError>;

    fn connect(
        &self,
        handle: &Self::Handle,
        candidate: &AddressCandidate,
    ) -> Result<(), ConnectError>;

    /// Hands some prefix of `payload` to the transport; returns its length.
    fn send(&self, handle: &Self::Handle, payload: &[u8]) -> Result<usize, SendError>;

    /// Returns the number of bytes written to `buffer`; zero means the peer closed.
    fn receive(&self, handle: &Self::Handle, buffer: &mut [u8]) -> Result<usize, ReceiveError>;

    fn shutdown(&self, handle: &Self::Handle, direction: Direction) -> Result<(), ShutdownError>;

    fn close(&self, handle: Self::Handle) -> Result<(), CloseError>;

    fn local_addr(&self, handle: &Self::Handle) -> Option<SocketAddr>;
}
