#![deny(warnings)]

//! A single blocking TCP exchange: a server accepts one client and replies
//! to its message; a client resolves the server, tries each resolved
//! address in order until one connects, sends a message and reads the reply.
//!
//! Every socket-layer step reports its own closed error enum, and every
//! handle is shut down and closed exactly once, whichever way its scope exits.

pub mod channel;
pub mod config;
pub mod error;
pub mod establish;
pub mod factory;
pub mod lifecycle;
pub mod listener;
pub mod network;
pub mod resolver;
pub mod session;
pub mod subsystem;
#[cfg(unix)]
pub mod sys;

#[cfg(test)]
pub(crate) mod testing;

pub use {
    channel::{ReceiveBuffer, ReceiveOutcome},
    config::{Config, ConnectStrategy, Role},
    error::RunError,
    lifecycle::SocketGuard,
    network::{AddressCandidate, AddressFamily, Backlog, Direction, Hints, Network},
    session::{Exchange, Server},
    subsystem::{Subsystem, Version},
};
