//! The POSIX backend: `getaddrinfo` for resolution, `socket2` for sockets.
//!
//! This is the only place platform codes (`EAI_*`, `errno`) are seen.

use {
    crate::{
        error::{
            AcceptError, BindError, CloseError, ConnectError, ListenError, ReceiveError,
            ResolutionError, SendError, ShutdownError, SocketError,
        },
        network::{
            AddressCandidate, AddressFamily, Backlog, Direction, Hints, Network, Protocol,
            SocketType,
        },
        subsystem::Subsystem,
    },
    socket2::{Domain, SockAddr, Socket, Type},
    std::{
        ffi::CString,
        io::{self, Read},
        mem,
        net::{Shutdown, SocketAddr},
        os::fd::IntoRawFd,
        ptr,
    },
    tracing::log,
};

#[cfg(any(target_os = "linux", target_os = "android"))]
const SEND_FLAGS: libc::c_int = libc::MSG_NOSIGNAL;
#[cfg(not(any(target_os = "linux", target_os = "android")))]
const SEND_FLAGS: libc::c_int = 0;

#[cfg(all(target_os = "linux", target_env = "gnu"))]
const EAI_NODATA: libc::c_int = -5;

/// Sockets backed by the operating system, usable while `subsystem` runs.
#[derive(Debug, Clone, Copy)]
pub struct SystemNetwork<'s> {
    subsystem: &'s Subsystem,
}

impl<'s> SystemNetwork<'s> {
    pub(crate) fn new(subsystem: &'s Subsystem) -> Self {
        Self { subsystem }
    }

    fn running<E>(&self, not_initialized: E) -> Result<(), E> {
        if self.subsystem.is_running() {
            Ok(())
        } else {
            Err(not_initialized)
        }
    }
}

impl Network for SystemNetwork<'_> {
    type Handle = Socket;

    fn resolve(
        &self,
        host: Option<&str>,
        service: &str,
        hints: &Hints,
    ) -> Result<Vec<AddressCandidate>, ResolutionError> {
        self.running(ResolutionError::SubsystemNotInitialized)?;
        getaddrinfo(host, service, hints)
    }

    fn create_socket(&self, candidate: &AddressCandidate) -> Result<Socket, SocketError> {
        self.running(SocketError::SubsystemNotInitialized)?;

        let domain = match candidate.family {
            AddressFamily::Ipv4 => Domain::IPV4,
            AddressFamily::Ipv6 => Domain::IPV6,
        };
        let ty = match candidate.socket_type {
            SocketType::Stream => Type::STREAM,
            SocketType::Datagram => Type::DGRAM,
        };
        let protocol = match candidate.protocol {
            Protocol::Tcp => socket2::Protocol::TCP,
            Protocol::Udp => socket2::Protocol::UDP,
        };

        Socket::new(domain, ty, Some(protocol)).map_err(socket_error)
    }

    fn bind(&self, handle: &Socket, candidate: &AddressCandidate) -> Result<(), BindError> {
        self.running(BindError::SubsystemNotInitialized)?;
        handle
            .bind(&SockAddr::from(candidate.address))
            .map_err(bind_error)
    }

    fn listen(&self, handle: &Socket, backlog: Backlog) -> Result<(), ListenError> {
        self.running(ListenError::SubsystemNotInitialized)?;
        let backlog = match backlog {
            Backlog::Automatic => libc::SOMAXCONN,
            Backlog::Exact(backlog) => backlog,
        };
        handle.listen(backlog).map_err(listen_error)
    }

    fn accept(&self, handle: &Socket) -> Result<(Socket, SocketAddr), AcceptError> {
        self.running(AcceptError::SubsystemNotInitialized)?;
        let (socket, peer) = handle.accept().map_err(accept_error)?;
        let peer = peer.as_socket().ok_or(AcceptError::InvalidBuffer)?;
        Ok((socket, peer))
    }

    fn connect(&self, handle: &Socket, candidate: &AddressCandidate) -> Result<(), ConnectError> {
        self.running(ConnectError::SubsystemNotInitialized)?;
        handle
            .connect(&SockAddr::from(candidate.address))
            .map_err(connect_error)
    }

    fn send(&self, handle: &Socket, payload: &[u8]) -> Result<usize, SendError> {
        self.running(SendError::SubsystemNotInitialized)?;
        handle
            .send_with_flags(payload, SEND_FLAGS)
            .map_err(send_error)
    }

    fn receive(&self, handle: &Socket, buffer: &mut [u8]) -> Result<usize, ReceiveError> {
        self.running(ReceiveError::SubsystemNotInitialized)?;
        let mut socket = handle;
        socket.read(buffer).map_err(receive_error)
    }

    fn shutdown(&self, handle: &Socket, direction: Direction) -> Result<(), ShutdownError> {
        self.running(ShutdownError::SubsystemNotInitialized)?;
        let how = match direction {
            Direction::Send => Shutdown::Write,
            Direction::Receive => Shutdown::Read,
            Direction::Both => Shutdown::Both,
        };
        handle.shutdown(how).map_err(shutdown_error)
    }

    fn close(&self, handle: Socket) -> Result<(), CloseError> {
        self.running(CloseError::SubsystemNotInitialized)?;
        let fd = handle.into_raw_fd();
        // SAFETY: `fd` was just released from its owning `Socket` and is closed exactly once here.
        if unsafe { libc::close(fd) } == 0 {
            Ok(())
        } else {
            Err(close_error(io::Error::last_os_error()))
        }
    }

    fn local_addr(&self, handle: &Socket) -> Option<SocketAddr> {
        handle.local_addr().ok()?.as_socket()
    }
}

fn getaddrinfo(
    host: Option<&str>,
    service: &str,
    hints: &Hints,
) -> Result<Vec<AddressCandidate>, ResolutionError> {
    let host = host
        .map(CString::new)
        .transpose()
        .map_err(|_| ResolutionError::NameNotFound)?;
    let service = CString::new(service).map_err(|_| ResolutionError::ServiceNotSupported)?;

    // SAFETY: an all-zero `addrinfo` is the documented "no hints" value.
    let mut raw_hints: libc::addrinfo = unsafe { mem::zeroed() };
    raw_hints.ai_family = match hints.family {
        None => libc::AF_UNSPEC,
        Some(AddressFamily::Ipv4) => libc::AF_INET,
        Some(AddressFamily::Ipv6) => libc::AF_INET6,
    };
    raw_hints.ai_socktype = match hints.socket_type {
        SocketType::Stream => libc::SOCK_STREAM,
        SocketType::Datagram => libc::SOCK_DGRAM,
    };
    raw_hints.ai_protocol = match hints.protocol {
        Protocol::Tcp => libc::IPPROTO_TCP,
        Protocol::Udp => libc::IPPROTO_UDP,
    };
    if hints.passive {
        raw_hints.ai_flags = libc::AI_PASSIVE;
    }

    let mut list: *mut libc::addrinfo = ptr::null_mut();
    // SAFETY: the strings outlive the call and `list` is only read on success.
    let code = unsafe {
        libc::getaddrinfo(
            host.as_ref().map_or(ptr::null(), |host| host.as_ptr()),
            service.as_ptr(),
            &raw_hints,
            &mut list,
        )
    };
    if code != 0 {
        return Err(resolution_error(code));
    }

    let mut candidates = Vec::new();
    let mut cursor = list;
    while !cursor.is_null() {
        // SAFETY: `cursor` is a node of the list returned above, which is freed after the loop.
        let info = unsafe { &*cursor };
        // SAFETY: `info` came from `getaddrinfo`, so `ai_addr` spans `ai_addrlen` bytes.
        if let Some(candidate) = unsafe { candidate(info) } {
            candidates.push(candidate);
        }
        cursor = info.ai_next;
    }
    // SAFETY: `list` came from a successful `getaddrinfo` and is freed once.
    unsafe { libc::freeaddrinfo(list) };

    Ok(candidates)
}

unsafe fn candidate(info: &libc::addrinfo) -> Option<AddressCandidate> {
    let len = info.ai_addrlen as usize;
    if info.ai_addr.is_null() || len > mem::size_of::<libc::sockaddr_storage>() {
        return None;
    }

    let mut storage: libc::sockaddr_storage = mem::zeroed();
    ptr::copy_nonoverlapping(
        info.ai_addr.cast::<u8>(),
        (&mut storage as *mut libc::sockaddr_storage).cast::<u8>(),
        len,
    );
    let address = SockAddr::new(storage, info.ai_addrlen).as_socket()?;

    let socket_type = match info.ai_socktype {
        libc::SOCK_STREAM => SocketType::Stream,
        libc::SOCK_DGRAM => SocketType::Datagram,
        other => {
            log::debug!("skipping {address} with socket type {other}");
            return None;
        }
    };
    let protocol = match (info.ai_protocol, socket_type) {
        (libc::IPPROTO_TCP, _) | (0, SocketType::Stream) => Protocol::Tcp,
        (libc::IPPROTO_UDP, _) | (0, SocketType::Datagram) => Protocol::Udp,
        (other, _) => {
            log::debug!("skipping {address} with protocol {other}");
            return None;
        }
    };

    Some(AddressCandidate {
        family: AddressFamily::of(&address),
        socket_type,
        protocol,
        address,
    })
}

fn resolution_error(code: libc::c_int) -> ResolutionError {
    match code {
        libc::EAI_AGAIN => ResolutionError::TemporaryFailure,
        libc::EAI_BADFLAGS => ResolutionError::InvalidHints,
        libc::EAI_FAIL => ResolutionError::NoRecovery,
        libc::EAI_FAMILY => ResolutionError::FamilyNotSupported,
        libc::EAI_MEMORY => ResolutionError::OutOfMemory,
        libc::EAI_NONAME => ResolutionError::NameNotFound,
        libc::EAI_SERVICE => ResolutionError::ServiceNotSupported,
        libc::EAI_SOCKTYPE => ResolutionError::SocketTypeNotSupported,
        #[cfg(all(target_os = "linux", target_env = "gnu"))]
        EAI_NODATA => ResolutionError::NoData,
        libc::EAI_SYSTEM => {
            ResolutionError::Unknown(io::Error::last_os_error().raw_os_error().unwrap_or(code))
        }
        code => ResolutionError::Unknown(code),
    }
}

fn code(error: &io::Error) -> i32 {
    error.raw_os_error().unwrap_or(0)
}

fn socket_error(error: io::Error) -> SocketError {
    match code(&error) {
        libc::ENETDOWN => SocketError::NetworkDown,
        libc::EAFNOSUPPORT => SocketError::FamilyNotSupported,
        libc::EINPROGRESS => SocketError::OperationInProgress,
        libc::EMFILE | libc::ENFILE => SocketError::DescriptorLimitReached,
        libc::EINVAL => SocketError::InvalidArgument,
        libc::ENOBUFS | libc::ENOMEM => SocketError::NoBufferSpace,
        libc::EPROTONOSUPPORT => SocketError::ProtocolNotSupported,
        libc::EPROTOTYPE => SocketError::ProtocolTypeMismatch,
        libc::ESOCKTNOSUPPORT => SocketError::SocketTypeNotSupported,
        code => SocketError::Unknown(code),
    }
}

fn bind_error(error: io::Error) -> BindError {
    match code(&error) {
        libc::ENETDOWN => BindError::NetworkDown,
        libc::EACCES => BindError::AccessDenied,
        libc::EADDRINUSE => BindError::AddressInUse,
        libc::EADDRNOTAVAIL => BindError::AddressNotAvailable,
        libc::EFAULT => BindError::InvalidPointer,
        libc::EINPROGRESS => BindError::OperationInProgress,
        libc::EINVAL => BindError::AlreadyBound,
        libc::ENOBUFS | libc::ENOMEM => BindError::NoBufferSpace,
        libc::ENOTSOCK | libc::EBADF => BindError::NotASocket,
        code => BindError::Unknown(code),
    }
}

fn connect_error(error: io::Error) -> ConnectError {
    match code(&error) {
        libc::ENETDOWN => ConnectError::NetworkDown,
        libc::EADDRINUSE => ConnectError::AddressInUse,
        libc::EINTR => ConnectError::Interrupted,
        libc::EINPROGRESS => ConnectError::OperationInProgress,
        libc::EALREADY => ConnectError::AlreadyInProgress,
        libc::EADDRNOTAVAIL => ConnectError::AddressNotAvailable,
        libc::EAFNOSUPPORT => ConnectError::FamilyNotSupported,
        libc::ECONNREFUSED => ConnectError::ConnectionRefused,
        libc::EFAULT | libc::EINVAL => ConnectError::InvalidAddress,
        libc::EISCONN => ConnectError::AlreadyConnected,
        libc::ENETUNREACH => ConnectError::NetworkUnreachable,
        libc::EHOSTUNREACH => ConnectError::HostUnreachable,
        libc::ENOBUFS | libc::ENOMEM => ConnectError::NoBufferSpace,
        libc::ENOTSOCK | libc::EBADF => ConnectError::NotASocket,
        libc::ETIMEDOUT => ConnectError::TimedOut,
        libc::EWOULDBLOCK => ConnectError::WouldBlock,
        libc::EACCES | libc::EPERM => ConnectError::AccessDenied,
        code => ConnectError::Unknown(code),
    }
}

fn listen_error(error: io::Error) -> ListenError {
    match code(&error) {
        libc::ENETDOWN => ListenError::NetworkDown,
        libc::EADDRINUSE => ListenError::AddressInUse,
        libc::EINPROGRESS => ListenError::OperationInProgress,
        libc::EINVAL => ListenError::NotBound,
        libc::EISCONN => ListenError::AlreadyConnected,
        libc::EMFILE | libc::ENFILE => ListenError::DescriptorLimitReached,
        libc::ENOBUFS | libc::ENOMEM => ListenError::NoBufferSpace,
        libc::ENOTSOCK | libc::EBADF => ListenError::NotASocket,
        libc::EOPNOTSUPP => ListenError::UnsupportedOperation,
        code => ListenError::Unknown(code),
    }
}

fn accept_error(error: io::Error) -> AcceptError {
    match code(&error) {
        libc::ECONNABORTED | libc::ECONNRESET => AcceptError::ConnectionResetDuringHandshake,
        libc::EFAULT => AcceptError::InvalidBuffer,
        libc::EINTR => AcceptError::Interrupted,
        libc::EINVAL => AcceptError::ListenNotCalled,
        libc::EINPROGRESS => AcceptError::OperationInProgress,
        libc::EMFILE | libc::ENFILE => AcceptError::DescriptorLimitReached,
        libc::ENETDOWN => AcceptError::NetworkDown,
        libc::ENOBUFS | libc::ENOMEM => AcceptError::NoBufferSpace,
        libc::ENOTSOCK | libc::EBADF => AcceptError::NotASocket,
        libc::EOPNOTSUPP => AcceptError::UnsupportedOperation,
        libc::EWOULDBLOCK => AcceptError::WouldBlock,
        code => AcceptError::Unknown(code),
    }
}

fn send_error(error: io::Error) -> SendError {
    match code(&error) {
        libc::ENETDOWN => SendError::NetworkDown,
        libc::EACCES => SendError::AccessDenied,
        libc::EINTR => SendError::Interrupted,
        libc::EINPROGRESS => SendError::OperationInProgress,
        libc::EFAULT => SendError::InvalidBuffer,
        libc::ENETRESET => SendError::NetworkReset,
        libc::ENOBUFS | libc::ENOMEM => SendError::NoBufferSpace,
        libc::ENOTCONN => SendError::NotConnected,
        libc::ENOTSOCK | libc::EBADF => SendError::NotASocket,
        libc::EOPNOTSUPP => SendError::UnsupportedOperation,
        libc::EPIPE | libc::ESHUTDOWN => SendError::ShutdownAlready,
        libc::EWOULDBLOCK => SendError::WouldBlock,
        libc::EMSGSIZE => SendError::MessageTooLarge,
        libc::EHOSTUNREACH => SendError::HostUnreachable,
        libc::EINVAL => SendError::InvalidArgument,
        libc::ECONNABORTED => SendError::ConnectionAborted,
        libc::ECONNRESET => SendError::ConnectionReset,
        libc::ETIMEDOUT => SendError::TimedOut,
        code => SendError::Unknown(code),
    }
}

fn receive_error(error: io::Error) -> ReceiveError {
    match code(&error) {
        libc::ENETDOWN => ReceiveError::NetworkDown,
        libc::EFAULT => ReceiveError::InvalidBuffer,
        libc::ENOTCONN => ReceiveError::NotConnected,
        libc::EINTR => ReceiveError::Interrupted,
        libc::EINPROGRESS => ReceiveError::OperationInProgress,
        libc::ENETRESET => ReceiveError::NetworkReset,
        libc::ENOTSOCK | libc::EBADF => ReceiveError::NotASocket,
        libc::EOPNOTSUPP => ReceiveError::UnsupportedOperation,
        libc::ESHUTDOWN => ReceiveError::ShutdownAlready,
        libc::EWOULDBLOCK => ReceiveError::WouldBlock,
        libc::EMSGSIZE => ReceiveError::MessageTruncated,
        libc::EINVAL => ReceiveError::NotBound,
        libc::ECONNABORTED => ReceiveError::ConnectionAborted,
        libc::ETIMEDOUT => ReceiveError::TimedOut,
        libc::ECONNRESET => ReceiveError::ConnectionReset,
        code => ReceiveError::Unknown(code),
    }
}

fn shutdown_error(error: io::Error) -> ShutdownError {
    match code(&error) {
        libc::ENETDOWN => ShutdownError::NetworkDown,
        libc::EINVAL => ShutdownError::InvalidArgument,
        libc::EINPROGRESS => ShutdownError::OperationInProgress,
        libc::ENOTCONN => ShutdownError::NotConnected,
        libc::ENOTSOCK | libc::EBADF => ShutdownError::NotASocket,
        code => ShutdownError::Unknown(code),
    }
}

fn close_error(error: io::Error) -> CloseError {
    match code(&error) {
        libc::ENETDOWN => CloseError::NetworkDown,
        libc::ENOTSOCK | libc::EBADF => CloseError::NotASocket,
        libc::EINPROGRESS => CloseError::OperationInProgress,
        libc::EINTR => CloseError::Interrupted,
        libc::EWOULDBLOCK => CloseError::WouldBlock,
        code => CloseError::Unknown(code),
    }
}
