use std::{fmt::Display, num::ParseIntError, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use snafu::OptionExt;
use tracing::warn;

use crate::error::{MissingFieldSnafu, Result};

/// Maritime Mobile Service Identity, the vessel identifier carried by every
/// AIS report. Non-negative by convention; uniqueness is not enforced here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
pub struct Mmsi(i32);

/// A single vessel position report within an archived encounter.
///
/// All fields are fixed at construction. Only the timestamp can be rebased
/// afterwards, via [`AisPoint::set_timestamp`]. The optional fields keep
/// `None` when a report did not carry them; zero is a valid value for
/// several of them, so no numeric sentinel stands in for "absent".
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AisPoint {
    mmsi: Mmsi,
    timestamp: i64,
    lon: f64,
    lat: f64,
    sog: f64,
    cog: f64,
    heading: Option<f64>,
    rot: Option<f64>,
    status: Option<i32>,
    #[serde(rename = "shiptype")]
    ship_type: Option<i32>,
}

impl AisPoint {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        mmsi: Mmsi,
        timestamp: i64,
        lon: f64,
        lat: f64,
        sog: f64,
        cog: f64,
        heading: Option<f64>,
        rot: Option<f64>,
        status: Option<i32>,
        ship_type: Option<i32>,
    ) -> Self {
        Self {
            mmsi,
            timestamp,
            lon,
            lat,
            sog,
            cog,
            heading,
            rot,
            status,
            ship_type,
        }
    }

    pub fn mmsi(&self) -> Mmsi {
        self.mmsi
    }

    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    pub fn set_timestamp(&mut self, timestamp: i64) {
        self.timestamp = timestamp;
    }

    /// The report time as an UTC timestamp, `None` if the raw value is out
    /// of chrono's representable range.
    pub fn msgtime(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.timestamp, 0)
    }

    pub fn lon(&self) -> f64 {
        self.lon
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn sog(&self) -> f64 {
        self.sog
    }

    pub fn cog(&self) -> f64 {
        self.cog
    }

    pub fn heading(&self) -> Option<f64> {
        self.heading
    }

    pub fn rot(&self) -> Option<f64> {
        self.rot
    }

    pub fn status(&self) -> Option<i32> {
        self.status
    }

    pub fn ship_type(&self) -> Option<i32> {
        self.ship_type
    }

    /// Encodes the report as one line of the compact positional log format:
    ///
    /// `mmsi,timestamp,lon,lat,sog,cog,heading,status,rot,shiptype`
    ///
    /// Integers are written plain, floats with six decimals. The optional
    /// fields come after `cog` in a permuted order relative to construction
    /// order; existing consumers of the format depend on it, do not "fix" it.
    /// Unset optional fields cannot be represented in this format and fail
    /// with [`Error::MissingField`](crate::Error::MissingField).
    pub fn to_line(&self) -> Result<String> {
        let heading = self.heading.context(MissingFieldSnafu { field: "heading" })?;
        let status = self.status.context(MissingFieldSnafu { field: "status" })?;
        let rot = self.rot.context(MissingFieldSnafu { field: "rot" })?;
        let ship_type = self
            .ship_type
            .context(MissingFieldSnafu { field: "shiptype" })?;

        Ok(format!(
            "{},{},{:.6},{:.6},{:.6},{:.6},{:.6},{},{:.6},{}",
            self.mmsi,
            self.timestamp,
            self.lon,
            self.lat,
            self.sog,
            self.cog,
            heading,
            status,
            rot,
            ship_type,
        ))
    }

    /// Decodes one line of the positional format.
    ///
    /// Returns `None` on any malformed input (too few fields, non-numeric
    /// token) so a bad record can be skipped without aborting the batch.
    /// Only the first nine fields are read; `shiptype` is not part of the
    /// line contract and is always reconstructed as `None`, even when a
    /// tenth field is present.
    pub fn from_line(line: &str) -> Option<Self> {
        let vals: Vec<&str> = line.split(',').collect();
        if vals.len() < 9 {
            return None;
        }

        Some(Self {
            mmsi: vals[0].parse().ok()?,
            timestamp: vals[1].parse().ok()?,
            lon: vals[2].parse().ok()?,
            lat: vals[3].parse().ok()?,
            sog: vals[4].parse().ok()?,
            cog: vals[5].parse().ok()?,
            heading: Some(vals[6].parse().ok()?),
            status: Some(vals[7].parse().ok()?),
            rot: Some(vals[8].parse().ok()?),
            ship_type: None,
        })
    }
}

impl Mmsi {
    pub fn new(mmsi: i32) -> Self {
        Self(mmsi)
    }

    pub fn into_inner(self) -> i32 {
        self.0
    }
}

impl FromStr for Mmsi {
    type Err = ParseIntError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

impl From<Mmsi> for i32 {
    fn from(value: Mmsi) -> Self {
        value.0
    }
}

impl Display for Mmsi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Encodes a point list as a single `;` separated accumulation string.
/// Empty input encodes to the empty string.
pub fn join_lines(points: &[AisPoint]) -> Result<String> {
    let lines = points
        .iter()
        .map(|p| p.to_line())
        .collect::<Result<Vec<_>>>()?;
    Ok(lines.join(";"))
}

/// Splits a `;` separated accumulation string, decoding each segment
/// independently. A malformed segment yields a `None` hole at its position;
/// the surrounding segments are unaffected and the output is not compacted.
/// Empty input decodes to an empty batch.
pub fn split_lines(text: &str) -> Vec<Option<AisPoint>> {
    if text.is_empty() {
        return Vec::new();
    }

    text.split(';')
        .map(|segment| {
            let point = AisPoint::from_line(segment);
            if point.is_none() {
                warn!("skipping malformed ais point segment: {segment:?}");
            }
            point
        })
        .collect()
}

/// Appends one point to an accumulation string, inserting the `;` separator
/// only when the existing text is non-empty.
pub fn append_line(existing: &str, point: &AisPoint) -> Result<String> {
    let line = point.to_line()?;
    Ok(if existing.is_empty() {
        line
    } else {
        format!("{existing};{line}")
    })
}

#[cfg(feature = "test")]
mod test {
    use rand::random;

    use super::*;

    impl Mmsi {
        pub fn test_new(mmsi: i32) -> Self {
            Self(mmsi)
        }
    }

    impl AisPoint {
        pub fn test_default(mmsi: Mmsi, timestamp: i64) -> AisPoint {
            AisPoint {
                mmsi,
                timestamp,
                lon: random::<f64>() * 360.0 - 180.0,
                lat: random::<f64>() * 180.0 - 90.0,
                sog: random::<f64>() * 20.0,
                cog: random::<f64>() * 360.0,
                heading: Some(random::<f64>() * 360.0),
                rot: Some(random::<f64>() * 10.0 - 5.0),
                status: Some(0),
                ship_type: Some(70),
            }
        }
    }
}
