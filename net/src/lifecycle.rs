use {
    crate::{
        error::{CloseError, ShutdownError},
        network::{Direction, Network},
    },
    std::fmt,
    tracing::log,
};

/// Sole owner of one socket handle.
///
/// The handle is shut down and closed exactly once: explicitly through
/// [`SocketGuard::close`], or on drop if the owning scope exits early.
pub struct SocketGuard<'n, N: Network> {
    network: &'n N,
    handle: Option<N::Handle>,
    shut_down: bool,
}

impl<'n, N: Network> SocketGuard<'n, N> {
    pub fn new(network: &'n N, handle: N::Handle) -> Self {
        Self {
            network,
            handle: Some(handle),
            shut_down: false,
        }
    }

    pub fn network(&self) -> &'n N {
        self.network
    }

    pub fn handle(&self) -> &N::Handle {
        match &self.handle {
            Some(handle) => handle,
            None => unreachable!("socket used after close"),
        }
    }

    /// Disables `direction`. Closing afterwards does not shut down again,
    /// whether or not this succeeded.
    pub fn shutdown(&mut self, direction: Direction) -> Result<(), ShutdownError> {
        self.shut_down = true;
        let result = self.network.shutdown(self.handle(), direction);
        match &result {
            Ok(()) => log::debug!("shut down {:?} on {:?}", direction, self.handle()),
            Err(e) => log::warn!("shutdown of {:?} failed: {e}", self.handle()),
        }
        result
    }

    /// Shuts down both directions if no shutdown was attempted yet, then
    /// releases the handle. A failed shutdown does not prevent the close.
    pub fn close(mut self) -> Result<(), CloseError> {
        self.release()
    }

    fn release(&mut self) -> Result<(), CloseError> {
        let Some(handle) = self.handle.take() else {
            return Ok(());
        };

        if !self.shut_down {
            self.shut_down = true;
            if let Err(e) = self.network.shutdown(&handle, Direction::Both) {
                log::debug!("shutdown of {handle:?} before close failed: {e}");
            }
        }

        let description = format!("{handle:?}");
        let result = self.network.close(handle);
        match &result {
            Ok(()) => log::debug!("closed {description}"),
            Err(e) => log::warn!("close of {description} failed: {e}"),
        }
        result
    }
}

impl<N: Network> Drop for SocketGuard<'_, N> {
    fn drop(&mut self) {
        // Failures are already logged by `release`.
        self.release().ok();
    }
}

impl<N: Network> fmt::Debug for SocketGuard<'_, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SocketGuard")
            .field("handle", &self.handle)
            .field("shut_down", &self.shut_down)
            .finish()
    }
}
