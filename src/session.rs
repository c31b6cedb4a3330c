//! Per-read conversion state.

use crate::{config::ReadConfig, error::Result, parse::FallbackLatch, zone::ZoneContext};

/// State shared by all columns of one read: the resolved zone and the fallback latch.
///
/// Not `Sync`; run concurrent reads with one session each.
#[derive(Debug, Default)]
pub struct ReadSession {
    zone: Option<ZoneContext>,
    latch: FallbackLatch,
}

impl ReadSession {
    /// Session for `config`, resolving its zone.
    ///
    /// # Errors
    /// Returns `ConversionError::InvalidTimeZone` for an unknown zone name.
    pub fn new(config: &ReadConfig) -> Result<Self> {
        Ok(Self::with_zone(config.zone()?))
    }

    /// Session with an already resolved zone.
    pub fn with_zone(zone: Option<ZoneContext>) -> Self {
        Self {
            zone,
            latch: FallbackLatch::new(),
        }
    }

    /// Configured zone, `None` when extraction defaults to UTC.
    pub fn zone(&self) -> Option<&ZoneContext> {
        self.zone.as_ref()
    }

    /// The session's fallback latch.
    pub fn latch(&self) -> &FallbackLatch {
        &self.latch
    }
}
