//! An in-memory `Network` that records every call and fails on demand.

use {
    crate::{
        error::{
            AcceptError, BindError, CloseError, ConnectError, ListenError, ReceiveError,
            ResolutionError, SendError, ShutdownError, SocketError,
        },
        network::{AddressCandidate, Backlog, Direction, Hints, Network},
    },
    std::{
        cell::{Cell, RefCell},
        collections::VecDeque,
        net::{Ipv4Addr, SocketAddr},
    },
};

pub(crate) type Handle = u32;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    Resolve(Option<String>, String, Hints),
    Create(Handle),
    Bind(Handle, SocketAddr),
    Listen(Handle, Backlog),
    Accept(Handle, Handle),
    Connect(Handle, SocketAddr),
    Send(Handle, Vec<u8>),
    Receive(Handle),
    Shutdown(Handle, Direction),
    Close(Handle),
}

impl Call {
    pub(crate) fn name(&self) -> &'static str {
        match self {
            Self::Resolve(..) => "resolve",
            Self::Create(_) => "create",
            Self::Bind(..) => "bind",
            Self::Listen(..) => "listen",
            Self::Accept(..) => "accept",
            Self::Connect(..) => "connect",
            Self::Send(..) => "send",
            Self::Receive(_) => "receive",
            Self::Shutdown(..) => "shutdown",
            Self::Close(_) => "close",
        }
    }
}

pub(crate) fn candidate(last_octet: u8, port: u16) -> AddressCandidate {
    AddressCandidate::tcp((Ipv4Addr::new(10, 0, 0, last_octet), port).into())
}

pub(crate) const PEER: SocketAddr =
    SocketAddr::V4(std::net::SocketAddrV4::new(Ipv4Addr::new(192, 0, 2, 7), 50_000));

/// Scripted results are consumed one per call; an empty script means success.
#[derive(Debug, Default)]
pub(crate) struct ScriptedNetwork {
    resolution: RefCell<Option<Result<Vec<AddressCandidate>, ResolutionError>>>,
    create: RefCell<VecDeque<Result<(), SocketError>>>,
    bind: RefCell<VecDeque<Result<(), BindError>>>,
    listen: RefCell<VecDeque<Result<(), ListenError>>>,
    accept: RefCell<VecDeque<Result<(), AcceptError>>>,
    connect: RefCell<VecDeque<Result<(), ConnectError>>>,
    send: RefCell<VecDeque<Result<usize, SendError>>>,
    receive: RefCell<VecDeque<Result<Vec<u8>, ReceiveError>>>,
    shutdown: RefCell<VecDeque<Result<(), ShutdownError>>>,
    close: RefCell<VecDeque<Result<(), CloseError>>>,
    calls: RefCell<Vec<Call>>,
    next_handle: Cell<Handle>,
    bound: Cell<Option<SocketAddr>>,
}

impl ScriptedNetwork {
    pub(crate) fn new(candidates: Vec<AddressCandidate>) -> Self {
        Self {
            resolution: RefCell::new(Some(Ok(candidates))),
            ..Self::default()
        }
    }

    pub(crate) fn resolving(result: Result<Vec<AddressCandidate>, ResolutionError>) -> Self {
        Self {
            resolution: RefCell::new(Some(result)),
            ..Self::default()
        }
    }

    pub(crate) fn on_create(self, result: Result<(), SocketError>) -> Self {
        self.create.borrow_mut().push_back(result);
        self
    }

    pub(crate) fn on_bind(self, result: Result<(), BindError>) -> Self {
        self.bind.borrow_mut().push_back(result);
        self
    }

    pub(crate) fn on_listen(self, result: Result<(), ListenError>) -> Self {
        self.listen.borrow_mut().push_back(result);
        self
    }

    pub(crate) fn on_accept(self, result: Result<(), AcceptError>) -> Self {
        self.accept.borrow_mut().push_back(result);
        self
    }

    pub(crate) fn on_connect(self, result: Result<(), ConnectError>) -> Self {
        self.connect.borrow_mut().push_back(result);
        self
    }

    /// `Ok(limit)` hands over at most `limit` bytes.
    pub(crate) fn on_send(self, result: Result<usize, SendError>) -> Self {
        self.send.borrow_mut().push_back(result);
        self
    }

    /// `Ok(bytes)` delivers `bytes`; an empty vector reports the peer closed.
    pub(crate) fn on_receive(self, result: Result<Vec<u8>, ReceiveError>) -> Self {
        self.receive.borrow_mut().push_back(result);
        self
    }

    pub(crate) fn on_shutdown(self, result: Result<(), ShutdownError>) -> Self {
        self.shutdown.borrow_mut().push_back(result);
        self
    }

    pub(crate) fn on_close(self, result: Result<(), CloseError>) -> Self {
        self.close.borrow_mut().push_back(result);
        self
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub(crate) fn names(&self) -> Vec<&'static str> {
        self.calls.borrow().iter().map(Call::name).collect()
    }

    pub(crate) fn created(&self) -> Vec<Handle> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|call| match call {
                Call::Create(handle) | Call::Accept(_, handle) => Some(*handle),
                _ => None,
            })
            .collect()
    }

    pub(crate) fn count(&self, wanted: &Call) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|call| *call == wanted)
            .count()
    }

    /// Every handle ever produced was closed exactly once, after a shutdown attempt.
    pub(crate) fn assert_all_released(&self) {
        let calls = self.calls();
        for handle in self.created() {
            assert_eq!(
                1,
                self.count(&Call::Close(handle)),
                "handle {handle} not closed exactly once: {calls:?}"
            );
            let close = calls
                .iter()
                .position(|call| *call == Call::Close(handle));
            let shutdown = calls
                .iter()
                .position(|call| matches!(call, Call::Shutdown(h, _) if *h == handle));
            assert!(
                matches!((shutdown, close), (Some(s), Some(c)) if s < c),
                "handle {handle} closed without a prior shutdown: {calls:?}"
            );
        }
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }

    fn fresh_handle(&self) -> Handle {
        let handle = self.next_handle.get() + 1;
        self.next_handle.set(handle);
        handle
    }
}

fn pop<T, E>(script: &RefCell<VecDeque<Result<T, E>>>) -> Option<Result<T, E>> {
    script.borrow_mut().pop_front()
}

fn step<E>(script: &RefCell<VecDeque<Result<(), E>>>) -> Result<(), E> {
    pop(script).unwrap_or(Ok(()))
}

impl Network for ScriptedNetwork {
    type Handle = Handle;

    fn resolve(
        &self,
        host: Option<&str>,
        service: &str,
        hints: &Hints,
    ) -> Result<Vec<AddressCandidate>, ResolutionError> {
        self.record(Call::Resolve(
            host.map(str::to_owned),
            service.to_owned(),
            *hints,
        ));
        self.resolution
            .borrow()
            .clone()
            .unwrap_or(Err(ResolutionError::NameNotFound))
    }

    fn create_socket(&self, _candidate: &AddressCandidate) -> Result<Handle, SocketError> {
        step(&self.create)?;
        let handle = self.fresh_handle();
        self.record(Call::Create(handle));
        Ok(handle)
    }

    fn bind(&self, handle: &Handle, candidate: &AddressCandidate) -> Result<(), BindError> {
        self.record(Call::Bind(*handle, candidate.address));
        step(&self.bind)?;
        self.bound.set(Some(candidate.address));
        Ok(())
    }

    fn listen(&self, handle: &Handle, backlog: Backlog) -> Result<(), ListenError> {
        self.record(Call::Listen(*handle, backlog));
        step(&self.listen)
    }

    fn accept(&self, handle: &Handle) -> Result<(Handle, SocketAddr), AcceptError> {
        step(&self.accept)?;
        let accepted = self.fresh_handle();
        self.record(Call::Accept(*handle, accepted));
        Ok((accepted, PEER))
    }

    fn connect(&self, handle: &Handle, candidate: &AddressCandidate) -> Result<(), ConnectError> {
        self.record(Call::Connect(*handle, candidate.address));
        step(&self.connect)
    }

    fn send(&self, handle: &Handle, payload: &[u8]) -> Result<usize, SendError> {
        let limit = pop(&self.send).unwrap_or(Ok(payload.len()))?;
        let sent = limit.min(payload.len());
        self.record(Call::Send(*handle, payload[..sent].to_vec()));
        Ok(sent)
    }

    fn receive(&self, handle: &Handle, buffer: &mut [u8]) -> Result<usize, ReceiveError> {
        self.record(Call::Receive(*handle));
        let bytes = pop(&self.receive).unwrap_or(Ok(Vec::new()))?;
        let received = bytes.len().min(buffer.len());
        buffer[..received].copy_from_slice(&bytes[..received]);
        Ok(received)
    }

    fn shutdown(&self, handle: &Handle, direction: Direction) -> Result<(), ShutdownError> {
        self.record(Call::Shutdown(*handle, direction));
        step(&self.shutdown)
    }

    fn close(&self, handle: Handle) -> Result<(), CloseError> {
        self.record(Call::Close(handle));
        step(&self.close)
    }

    fn local_addr(&self, _handle: &Handle) -> Option<SocketAddr> {
        self.bound.get()
    }
}
