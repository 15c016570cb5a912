//! The two role runs: serve one exchange, or perform one as a client.

use {
    crate::{
        channel::{receive_once, send_all, ReceiveBuffer, ReceiveOutcome},
        config::{Config, ConnectStrategy, Role},
        error::{ResolutionError, RunError},
        establish::{bind, connect, connect_each},
        factory::create_socket,
        lifecycle::SocketGuard,
        listener::{accept, listen},
        network::{AddressCandidate, Direction, Hints, Network},
        resolver::resolve,
    },
    std::net::SocketAddr,
    tracing::log,
};

/// What one completed run sent and received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exchange {
    pub peer: SocketAddr,
    pub sent: usize,
    pub outcome: ReceiveOutcome,
    pub received: Vec<u8>,
}

/// A bound, listening server waiting for its one client.
#[derive(Debug)]
pub struct Server<'n, N: Network> {
    listener: SocketGuard<'n, N>,
    address: SocketAddr,
}

impl<'n, N: Network> Server<'n, N> {
    /// Resolves the wildcard address for `config.service`, then creates,
    /// binds and listens on a socket for the first candidate.
    pub fn bind(network: &'n N, config: &Config) -> Result<Self, RunError> {
        let candidates = resolve(
            network,
            None,
            &config.service,
            &Hints::passive(config.family),
        )?;
        let candidate = first(&candidates)?;

        let listener = create_socket(network, candidate)?;
        bind(&listener, candidate)?;
        listen(&listener, config.backlog)?;

        let address = network
            .local_addr(listener.handle())
            .unwrap_or(candidate.address);
        log::info!("listening on {address}");

        Ok(Self { listener, address })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.address
    }

    /// Accepts one client, releases the listener, then receives the client's
    /// message and replies with `config.server_message`. No reply is sent if
    /// the client closed without sending anything.
    pub fn serve_once(self, config: &Config) -> Result<Exchange, RunError> {
        let Self { listener, .. } = self;

        let (mut connection, peer) = accept(&listener)?;
        listener.close()?;

        let mut buffer = ReceiveBuffer::with_capacity(config.buffer_capacity);
        let outcome = receive_once(&connection, &mut buffer)?;
        let sent = match outcome {
            ReceiveOutcome::Data(count) => {
                log::info!("received {count} bytes from {peer}");
                send_all(&connection, &config.server_message)?
            }
            ReceiveOutcome::Closed => {
                log::info!("{peer} closed the connection without sending");
                0
            }
        };

        connection.shutdown(Direction::Send)?;
        connection.close()?;

        Ok(Exchange {
            peer,
            sent,
            outcome,
            received: buffer.data().to_vec(),
        })
    }
}

pub fn run_server<N: Network>(network: &N, config: &Config) -> Result<Exchange, RunError> {
    Server::bind(network, config)?.serve_once(config)
}

/// Connects to `host`, sends `config.client_message` and receives one reply.
pub fn run_client<N: Network>(
    network: &N,
    host: &str,
    config: &Config,
) -> Result<Exchange, RunError> {
    let candidates = resolve(
        network,
        Some(host),
        &config.service,
        &Hints::active(config.family),
    )?;

    let (mut connection, candidate) = match config.connect_strategy {
        ConnectStrategy::ReuseHandle => {
            let socket = create_socket(network, first(&candidates)?)?;
            let candidate = connect(&socket, &candidates)?;
            (socket, candidate)
        }
        ConnectStrategy::FreshHandle => connect_each(network, &candidates)?,
    };
    let peer = candidate.address;

    let sent = send_all(&connection, &config.client_message)?;
    log::info!("sent {sent} bytes to {peer}");

    let mut buffer = ReceiveBuffer::with_capacity(config.buffer_capacity);
    let outcome = receive_once(&connection, &mut buffer)?;
    match outcome {
        ReceiveOutcome::Data(count) => log::info!("received {count} bytes from {peer}"),
        ReceiveOutcome::Closed => log::info!("{peer} closed the connection without replying"),
    }

    connection.shutdown(Direction::Send)?;
    connection.close()?;

    Ok(Exchange {
        peer,
        sent,
        outcome,
        received: buffer.data().to_vec(),
    })
}

pub fn run<N: Network>(network: &N, role: &Role, config: &Config) -> Result<Exchange, RunError> {
    match role {
        Role::Server => run_server(network, config),
        Role::Client { host } => run_client(network, host, config),
    }
}

fn first(candidates: &[AddressCandidate]) -> Result<&AddressCandidate, ResolutionError> {
    candidates.first().ok_or(ResolutionError::NoData)
}
