use {
    crate::{
        error::{AcceptError, ListenError},
        lifecycle::SocketGuard,
        network::{Backlog, Network},
    },
    std::net::SocketAddr,
    tracing::log,
};

/// Puts a bound socket into the listening state.
pub fn listen<N: Network>(socket: &SocketGuard<'_, N>, backlog: Backlog) -> Result<(), ListenError> {
    match socket.network().listen(socket.handle(), backlog) {
        Ok(()) => {
            log::debug!("{:?} listening with backlog {backlog:?}", socket.handle());
            Ok(())
        }
        Err(e) => {
            log::warn!("unable to listen: {e}");
            Err(e)
        }
    }
}

/// Blocks until a client connects. The listening socket stays usable.
pub fn accept<'n, N: Network>(
    socket: &SocketGuard<'n, N>,
) -> Result<(SocketGuard<'n, N>, SocketAddr), AcceptError> {
    match socket.network().accept(socket.handle()) {
        Ok((handle, peer)) => {
            log::info!("accepted connection from {peer}");
            Ok((SocketGuard::new(socket.network(), handle), peer))
        }
        Err(e) => {
            log::warn!("unable to accept: {e}");
            Err(e)
        }
    }
}
