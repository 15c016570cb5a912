use {
    crate::{
        channel::DEFAULT_BUFFER_CAPACITY,
        network::{AddressFamily, Backlog},
        subsystem::Version,
    },
    anyhow::{anyhow, bail, Context, Result},
    std::{env, fmt},
};

pub const DEFAULT_SERVICE: &str = "6666";
pub const CLIENT_MESSAGE: &str = "A message from the client!";
pub const SERVER_MESSAGE: &str = "A message from the server!";

/// Which side of the exchange this process plays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Role {
    Server,
    Client { host: String },
}

impl Role {
    /// No argument selects the server, a single host argument the client.
    pub fn from_args(args: impl IntoIterator<Item = String>) -> Result<Self> {
        let mut args = args.into_iter();
        match (args.next(), args.next()) {
            (None, _) => Ok(Self::Server),
            (Some(host), None) => Ok(Self::Client { host }),
            (Some(_), Some(_)) => Err(anyhow!(
                "expected at most one argument: the host name or address of the server"
            )),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Server => write!(f, "server"),
            Self::Client { host } => write!(f, "client of {host}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectStrategy {
    /// One socket for every candidate.
    ReuseHandle,
    /// A new socket per candidate.
    #[default]
    FreshHandle,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub service: String,
    pub family: Option<AddressFamily>,
    pub backlog: Backlog,
    pub buffer_capacity: usize,
    pub connect_strategy: ConnectStrategy,
    pub client_message: Vec<u8>,
    pub server_message: Vec<u8>,
    pub version: Version,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service: DEFAULT_SERVICE.to_owned(),
            family: None,
            backlog: Backlog::Automatic,
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
            connect_strategy: ConnectStrategy::default(),
            client_message: message(CLIENT_MESSAGE),
            server_message: message(SERVER_MESSAGE),
            version: Version::default(),
        }
    }
}

/// Messages go on the wire with a trailing NUL byte.
fn message(text: &str) -> Vec<u8> {
    let mut bytes = text.as_bytes().to_vec();
    bytes.push(0);
    bytes
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(service) = lookup("SOCKETS_SERVICE") {
            config.service = service;
        }

        if let Some(family) = lookup("SOCKETS_FAMILY") {
            config.family = match family.as_str() {
                "any" => None,
                "ipv4" => Some(AddressFamily::Ipv4),
                "ipv6" => Some(AddressFamily::Ipv6),
                other => bail!("invalid SOCKETS_FAMILY {other:?}: expected any, ipv4 or ipv6"),
            };
        }

        if let Some(backlog) = lookup("SOCKETS_BACKLOG") {
            config.backlog = if backlog == "auto" {
                Backlog::Automatic
            } else {
                Backlog::Exact(
                    backlog
                        .parse()
                        .with_context(|| format!("invalid SOCKETS_BACKLOG {backlog:?}"))?,
                )
            };
        }

        if let Some(capacity) = lookup("SOCKETS_BUFFER_SIZE") {
            config.buffer_capacity = capacity
                .parse()
                .with_context(|| format!("invalid SOCKETS_BUFFER_SIZE {capacity:?}"))?;
            if config.buffer_capacity == 0 {
                bail!("SOCKETS_BUFFER_SIZE must be greater than zero");
            }
        }

        if let Some(strategy) = lookup("SOCKETS_CONNECT_STRATEGY") {
            config.connect_strategy = match strategy.as_str() {
                "reuse" => ConnectStrategy::ReuseHandle,
                "fresh" => ConnectStrategy::FreshHandle,
                other => bail!(
                    "invalid SOCKETS_CONNECT_STRATEGY {other:?}: expected reuse or fresh"
                ),
            };
        }

        if let Some(text) = lookup("SOCKETS_CLIENT_MESSAGE") {
            config.client_message = message(&text);
        }

        if let Some(text) = lookup("SOCKETS_SERVER_MESSAGE") {
            config.server_message = message(&text);
        }

        if let Some(version) = lookup("SOCKETS_VERSION") {
            config.version = version
                .parse()
                .with_context(|| format!("invalid SOCKETS_VERSION {version:?}"))?;
        }

        Ok(config)
    }
}
