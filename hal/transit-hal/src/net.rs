//! Network link abstractions
//!
//! A link is the layer below HTTP: a WiFi association on the device, or
//! name resolution on a host. The fetcher only needs to know whether it is
//! up and to ask for it to be brought up.

/// Network link (radio association)
pub trait NetworkLink {
    /// Error type for connect operations
    type Error;

    /// Check whether the link is currently up
    fn is_connected(&self) -> bool;

    /// Bring the link up
    ///
    /// Blocks until connected or until the implementation's own timeout
    /// (see [`LinkConfig::connect_timeout_ms`]) elapses.
    fn connect(&mut self) -> Result<(), Self::Error>;

    /// Ensure the link is up, connecting only if needed
    fn ensure_connected(&mut self) -> Result<(), Self::Error> {
        if self.is_connected() {
            return Ok(());
        }
        self.connect()
    }
}

/// Link configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LinkConfig {
    /// Maximum time to wait for association
    pub connect_timeout_ms: u32,
    /// Poll interval while waiting for association
    pub poll_interval_ms: u32,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            connect_timeout_ms: 15_000,
            poll_interval_ms: 500,
        }
    }
}
