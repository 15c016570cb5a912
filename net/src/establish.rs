//! Binding the server handle and connecting the client handle.

use {
    crate::{
        error::{BindError, ConnectError, RunError},
        factory::create_socket,
        lifecycle::SocketGuard,
        network::{AddressCandidate, Network},
    },
    tracing::log,
};

pub fn bind<N: Network>(
    socket: &SocketGuard<'_, N>,
    candidate: &AddressCandidate,
) -> Result<(), BindError> {
    match socket.network().bind(socket.handle(), candidate) {
        Ok(()) => {
            log::debug!("bound {:?} to {candidate}", socket.handle());
            Ok(())
        }
        Err(e) => {
            log::warn!("unable to bind to {candidate}: {e}");
            Err(e)
        }
    }
}

/// Tries `candidates` in order on the one `socket`, stopping at the first
/// that connects. If none does, the last candidate's error is returned.
pub fn connect<'c, N: Network>(
    socket: &SocketGuard<'_, N>,
    candidates: &'c [AddressCandidate],
) -> Result<&'c AddressCandidate, ConnectError> {
    let mut last = ConnectError::InvalidAddress;

    for candidate in candidates {
        match socket.network().connect(socket.handle(), candidate) {
            Ok(()) => {
                log::info!("connected to {candidate}");
                return Ok(candidate);
            }
            Err(e) => {
                log::warn!("unable to connect to {candidate}: {e}");
                last = e;
            }
        }
    }

    Err(last)
}

/// Like [`connect`], but with a fresh socket per candidate, so candidates of
/// different address families can be mixed. Failed sockets are closed
/// before the next candidate is tried.
pub fn connect_each<'n, 'c, N: Network>(
    network: &'n N,
    candidates: &'c [AddressCandidate],
) -> Result<(SocketGuard<'n, N>, &'c AddressCandidate), RunError> {
    let mut last = RunError::from(ConnectError::InvalidAddress);

    for candidate in candidates {
        let socket = match create_socket(network, candidate) {
            Ok(socket) => socket,
            Err(e) => {
                last = e.into();
                continue;
            }
        };

        match connect(&socket, std::slice::from_ref(candidate)) {
            Ok(candidate) => return Ok((socket, candidate)),
            Err(e) => {
                last = e.into();
                // The connect error is what gets reported.
                if let Err(e) = socket.close() {
                    log::debug!("ignoring close failure after unsuccessful connect: {e}");
                }
            }
        }
    }

    Err(last)
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::{
            error::{CloseError, SocketError},
            testing::{candidate, Call, ScriptedNetwork},
        },
    };

    fn three() -> Vec<AddressCandidate> {
        vec![candidate(1, 6666), candidate(2, 6666), candidate(3, 6666)]
    }

    fn connect_attempts(network: &ScriptedNetwork) -> Vec<Call> {
        network
            .calls()
            .into_iter()
            .filter(|call| matches!(call, Call::Connect(..)))
            .collect()
    }

    #[test]
    fn bind_failure_is_classified() {
        let network = ScriptedNetwork::default().on_bind(Err(BindError::AccessDenied));
        let socket = create_socket(&network, &candidate(1, 80)).unwrap();
        assert_eq!(
            Err(BindError::AccessDenied),
            bind(&socket, &candidate(1, 80))
        );
        drop(socket);
        network.assert_all_released();
    }

    #[test]
    fn stops_at_first_success() {
        let candidates = three();
        let network = ScriptedNetwork::default()
            .on_connect(Err(ConnectError::ConnectionRefused))
            .on_connect(Ok(()));
        let socket = create_socket(&network, &candidates[0]).unwrap();

        assert_eq!(Ok(&candidates[1]), connect(&socket, &candidates));
        assert_eq!(
            vec![
                Call::Connect(1, candidates[0].address),
                Call::Connect(1, candidates[1].address),
            ],
            connect_attempts(&network)
        );
    }

    #[test]
    fn third_candidate_succeeds_after_two_refusals() {
        let candidates = three();
        let network = ScriptedNetwork::default()
            .on_connect(Err(ConnectError::ConnectionRefused))
            .on_connect(Err(ConnectError::ConnectionRefused))
            .on_connect(Ok(()));
        let socket = create_socket(&network, &candidates[0]).unwrap();

        assert_eq!(Ok(&candidates[2]), connect(&socket, &candidates));
        assert_eq!(
            candidates
                .iter()
                .map(|c| Call::Connect(1, c.address))
                .collect::<Vec<_>>(),
            connect_attempts(&network)
        );
    }

    #[test]
    fn exhaustion_reports_last_error() {
        let candidates = three();
        let network = ScriptedNetwork::default()
            .on_connect(Err(ConnectError::ConnectionRefused))
            .on_connect(Err(ConnectError::ConnectionRefused))
            .on_connect(Err(ConnectError::TimedOut));
        let socket = create_socket(&network, &candidates[0]).unwrap();

        assert_eq!(Err(ConnectError::TimedOut), connect(&socket, &candidates));
        assert_eq!(3, connect_attempts(&network).len());
        drop(socket);
        network.assert_all_released();
    }

    #[test]
    fn fresh_socket_per_candidate() {
        let candidates = three();
        let network = ScriptedNetwork::default()
            .on_create(Ok(()))
            .on_create(Err(SocketError::FamilyNotSupported))
            .on_connect(Err(ConnectError::HostUnreachable));

        let (socket, connected) = connect_each(&network, &candidates).unwrap();
        assert_eq!(&candidates[2], connected);
        assert_eq!(&2, socket.handle());
        assert_eq!(
            vec![
                Call::Connect(1, candidates[0].address),
                Call::Connect(2, candidates[2].address),
            ],
            connect_attempts(&network)
        );
        assert_eq!(1, network.count(&Call::Close(1)));
        assert_eq!(0, network.count(&Call::Close(2)));

        drop(socket);
        network.assert_all_released();
    }

    #[test]
    fn close_failure_does_not_stop_iteration() {
        let candidates = three();
        let network = ScriptedNetwork::default()
            .on_connect(Err(ConnectError::ConnectionRefused))
            .on_close(Err(CloseError::Interrupted));

        let (socket, connected) = connect_each(&network, &candidates).unwrap();
        assert_eq!(&candidates[1], connected);
        assert_eq!(1, network.count(&Call::Close(1)));

        drop(socket);
        network.assert_all_released();
    }

    #[test]
    fn fresh_socket_exhaustion() {
        let candidates = three();
        let network = ScriptedNetwork::default()
            .on_connect(Err(ConnectError::ConnectionRefused))
            .on_connect(Err(ConnectError::ConnectionRefused))
            .on_connect(Err(ConnectError::NetworkUnreachable));

        assert_eq!(
            RunError::Connect(ConnectError::NetworkUnreachable),
            connect_each(&network, &candidates).unwrap_err()
        );
        assert_eq!(vec![1, 2, 3], network.created());
        network.assert_all_released();
    }
}
