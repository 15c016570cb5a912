use {
    crate::{
        error::SocketError,
        lifecycle::SocketGuard,
        network::{AddressCandidate, Network},
    },
    tracing::log,
};

/// Creates a socket matching `candidate`'s family, type and protocol.
pub fn create_socket<'n, N: Network>(
    network: &'n N,
    candidate: &AddressCandidate,
) -> Result<SocketGuard<'n, N>, SocketError> {
    match network.create_socket(candidate) {
        Ok(handle) => {
            log::debug!("created {handle:?} for {candidate}");
            Ok(SocketGuard::new(network, handle))
        }
        Err(e) => {
            log::warn!("unable to create a socket for {candidate}: {e}");
            Err(e)
        }
    }
}
