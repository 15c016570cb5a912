#![deny(warnings)]

use {
    anyhow::{Context, Result},
    sockets_net::{error::CleanupError, session, Config, Exchange, Role, RunError, Subsystem},
    std::env,
    tracing::log,
};

fn main() -> Result<()> {
    pretty_env_logger::init();

    let role = Role::from_args(env::args().skip(1))?;
    let config = Config::from_env()?;

    let subsystem = Subsystem::start(config.version)
        .with_context(|| format!("unable to start network subsystem {}", config.version))?;

    let result = session::run(&subsystem.network(), &role, &config);
    let exchange = conclude(&role, result, subsystem.stop())?;

    log::info!(
        "{role} exchanged {} bytes out and {} bytes in with {}",
        exchange.sent,
        exchange.received.len(),
        exchange.peer
    );

    let text = String::from_utf8_lossy(&exchange.received);
    println!("{}", text.trim_end_matches('\0'));

    Ok(())
}

/// A failed run takes precedence over a failed stop; a failed stop still
/// fails an otherwise successful run.
fn conclude(
    role: &Role,
    result: Result<Exchange, RunError>,
    stopped: Result<(), CleanupError>,
) -> Result<Exchange> {
    match (result, stopped) {
        (Ok(exchange), stopped) => {
            stopped.context("subsystem cleanup failed")?;
            Ok(exchange)
        }
        (Err(e), stopped) => {
            if let Err(cleanup) = stopped {
                log::warn!("subsystem cleanup failed: {cleanup}");
            }
            Err(e).with_context(|| format!("{role} run failed"))
        }
    }
}
