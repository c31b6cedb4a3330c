//! Calendar/time zone context attached to a column or a conversion session.

use std::sync::{Arc, LazyLock};

use jiff::tz::TimeZone;

use crate::error::{ConversionError, Result};

static UTC: LazyLock<ZoneContext> = LazyLock::new(ZoneContext::utc);

/// A named time zone used when extracting values from, or inserting values into, a data source.
///
/// Storage units are always zone-agnostic; the zone only affects the calendar-qualified
/// cursor calls and the timezone metadata of timestamp columns.
#[derive(Clone, Debug)]
pub struct ZoneContext {
    name: Arc<str>,
    tz: TimeZone,
}

impl ZoneContext {
    /// The UTC zone.
    pub fn utc() -> Self {
        Self {
            name: Arc::from("UTC"),
            tz: TimeZone::UTC,
        }
    }

    /// Resolve an IANA zone name (or `UTC`).
    ///
    /// # Errors
    /// Returns `ConversionError::InvalidTimeZone` when the name is unknown.
    pub fn named(name: &str) -> Result<Self> {
        if name.eq_ignore_ascii_case("UTC") {
            return Ok(Self::utc());
        }
        let tz = TimeZone::get(name).map_err(|e| ConversionError::InvalidTimeZone {
            name: name.to_string(),
            message: e.to_string(),
        })?;
        Ok(Self {
            name: Arc::from(name),
            tz,
        })
    }

    /// The process-wide UTC default substituted when no zone is supplied.
    pub fn or_utc(zone: Option<&ZoneContext>) -> &ZoneContext {
        zone.unwrap_or(&UTC)
    }

    /// Zone identifier as written into Arrow timestamp metadata.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Zone identifier shared with `DataType::Timestamp`.
    pub fn arrow_name(&self) -> Arc<str> {
        Arc::clone(&self.name)
    }

    /// The resolved zone.
    pub fn time_zone(&self) -> &TimeZone {
        &self.tz
    }
}

impl PartialEq for ZoneContext {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for ZoneContext {}
