//! Conversion settings for the read and write paths.

use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{error::Result, policy::ExplicitTypes, sql_type::SqlType, zone::ZoneContext};

/// Rows per batch when none is configured.
pub const DEFAULT_BATCH_SIZE: usize = 1024;

/// Settings for reading a result into record batches.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ReadConfig {
    /// Maximum rows per batch; also the capacity of every column buffer.
    pub batch_size: usize,
    /// Zone for calendar-qualified extraction and timestamp-with-zone metadata.
    pub time_zone: Option<String>,
    /// Forced source types by zero-based column index.
    pub explicit_types: BTreeMap<usize, SqlType>,
    /// Attach the declared SQL type as `sql_type` field metadata.
    pub include_metadata: bool,
}

impl Default for ReadConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            time_zone: None,
            explicit_types: BTreeMap::new(),
            include_metadata: true,
        }
    }
}

impl ReadConfig {
    /// Default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the batch size; zero is treated as one row.
    #[must_use]
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Set the session zone.
    #[must_use]
    pub fn with_time_zone(mut self, name: impl Into<String>) -> Self {
        self.time_zone = Some(name.into());
        self
    }

    /// Force the source type of `column`.
    #[must_use]
    pub fn with_explicit_type(mut self, column: usize, sql_type: SqlType) -> Self {
        self.explicit_types.insert(column, sql_type);
        self
    }

    /// Toggle the `sql_type` field metadata.
    #[must_use]
    pub fn with_metadata(mut self, include: bool) -> Self {
        self.include_metadata = include;
        self
    }

    /// Overrides as an [`ExplicitTypes`] map.
    pub fn explicit_types(&self) -> ExplicitTypes {
        ExplicitTypes::from(self.explicit_types.clone())
    }

    /// Resolve the configured zone.
    ///
    /// # Errors
    /// Returns `ConversionError::InvalidTimeZone` for an unknown name.
    pub fn zone(&self) -> Result<Option<ZoneContext>> {
        resolve_zone(self.time_zone.as_deref())
    }
}

/// How rows are handed to the statement.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum BindMode {
    /// Add every bound row to the statement batch.
    #[default]
    Batch,
    /// Bind the first row only, for a single execution.
    Single,
}

/// Settings for binding record batches as statement parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BindConfig {
    /// Zone passed with every temporal parameter; `None` leaves it to the driver.
    pub time_zone: Option<String>,
    /// Row handling.
    pub mode: BindMode,
}

impl Default for BindConfig {
    fn default() -> Self {
        Self {
            time_zone: Some("UTC".to_string()),
            mode: BindMode::Batch,
        }
    }
}

impl BindConfig {
    /// Default settings: UTC, batch mode.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the parameter zone.
    #[must_use]
    pub fn with_time_zone(mut self, name: impl Into<String>) -> Self {
        self.time_zone = Some(name.into());
        self
    }

    /// Pass no zone with temporal parameters.
    #[must_use]
    pub fn without_time_zone(mut self) -> Self {
        self.time_zone = None;
        self
    }

    /// Set the row handling.
    #[must_use]
    pub fn with_mode(mut self, mode: BindMode) -> Self {
        self.mode = mode;
        self
    }

    /// Resolve the configured zone.
    ///
    /// # Errors
    /// Returns `ConversionError::InvalidTimeZone` for an unknown name.
    pub fn zone(&self) -> Result<Option<ZoneContext>> {
        resolve_zone(self.time_zone.as_deref())
    }
}

fn resolve_zone(name: Option<&str>) -> Result<Option<ZoneContext>> {
    name.map(ZoneContext::named).transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let read = ReadConfig::default();
        assert_eq!(read.batch_size, 1024);
        assert!(read.include_metadata);
        assert!(read.zone().unwrap().is_none());

        let bind = BindConfig::default();
        assert_eq!(bind.mode, BindMode::Batch);
        assert_eq!(bind.zone().unwrap().unwrap().name(), "UTC");
        assert!(BindConfig::new().without_time_zone().zone().unwrap().is_none());
    }

    #[test]
    fn builder_clamps_batch_size() {
        let cfg = ReadConfig::new()
            .with_batch_size(0)
            .with_explicit_type(2, SqlType::Date);
        assert_eq!(cfg.batch_size, 1);
        assert_eq!(cfg.explicit_types().get(2), Some(&SqlType::Date));
    }
}
