use {
    crate::error::{CleanupError, StartupError},
    std::{cell::Cell, fmt, str::FromStr},
    tracing::log,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Version {
    pub major: u8,
    pub minor: u8,
}

impl Version {
    pub const fn new(major: u8, minor: u8) -> Self {
        Self { major, minor }
    }

    pub const LOWEST: Self = Self::new(1, 1);
    pub const HIGHEST: Self = Self::new(2, 2);
}

impl Default for Version {
    fn default() -> Self {
        Self::HIGHEST
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl FromStr for Version {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        let (major, minor) = s
            .split_once('.')
            .ok_or_else(|| anyhow::anyhow!("expected <major>.<minor>, got {s:?}"))?;
        Ok(Self::new(major.parse()?, minor.parse()?))
    }
}

/// The process-wide network subsystem, as an explicit context.
///
/// Sockets may only be used while the subsystem is running; every backend
/// operation checks this first. Instances are independent of each other.
#[derive(Debug)]
pub struct Subsystem {
    version: Version,
    running: Cell<bool>,
}

impl Subsystem {
    /// Starts the subsystem, negotiating `requested` down to the highest
    /// supported version.
    pub fn start(requested: Version) -> Result<Self, StartupError> {
        if requested < Version::LOWEST {
            log::warn!("subsystem start failed: version {requested} is not supported");
            return Err(StartupError::VersionNotSupported(requested));
        }

        let version = requested.min(Version::HIGHEST);
        log::info!("subsystem started (requested {requested}, using {version})");

        Ok(Self {
            version,
            running: Cell::new(true),
        })
    }

    pub fn stop(&self) -> Result<(), CleanupError> {
        if !self.running.replace(false) {
            return Err(CleanupError::NotInitialized);
        }
        log::info!("subsystem stopped");
        Ok(())
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn is_running(&self) -> bool {
        self.running.get()
    }

    #[cfg(unix)]
    pub fn network(&self) -> crate::sys::SystemNetwork<'_> {
        crate::sys::SystemNetwork::new(self)
    }
}
