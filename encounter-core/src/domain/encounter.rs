use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumString};

use super::ais::{AisPoint, Mmsi};

/// Which COLREGS role a vessel holds within an encounter.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Deserialize,
    Serialize,
    strum::Display,
    AsRefStr,
    EnumString,
)]
pub enum ShipRole {
    #[serde(rename = "GW")]
    #[strum(serialize = "GW")]
    GiveWay,
    #[serde(rename = "SO")]
    #[strum(serialize = "SO")]
    StandOn,
}

/// A close-approach event between two vessels: the give-way ship's track and
/// the stand-on ship's track, time-aligned by the upstream detector.
///
/// The encounter id is implicit; it is the position of the encounter within
/// the containing collection. A source document missing either track fails
/// deserialization instead of producing a partial encounter.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Encounter {
    #[serde(rename = "GW")]
    pub gw: Vec<AisPoint>,
    #[serde(rename = "SO")]
    pub so: Vec<AisPoint>,
}

/// One flattened point of one encounter, the unit of the tabular export.
///
/// The serde field order is the CSV column contract:
/// `encounter_id,ship_role,mmsi,timestamp,lon,lat,sog,cog,heading,rot,status,shiptype`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct EncounterRow {
    pub encounter_id: u32,
    pub ship_role: ShipRole,
    pub mmsi: Mmsi,
    pub timestamp: i64,
    pub lon: f64,
    pub lat: f64,
    pub sog: f64,
    pub cog: f64,
    pub heading: Option<f64>,
    pub rot: Option<f64>,
    pub status: Option<i32>,
    #[serde(rename = "shiptype")]
    pub ship_type: Option<i32>,
}

impl EncounterRow {
    pub fn new(encounter_id: u32, ship_role: ShipRole, point: &AisPoint) -> Self {
        Self {
            encounter_id,
            ship_role,
            mmsi: point.mmsi(),
            timestamp: point.timestamp(),
            lon: point.lon(),
            lat: point.lat(),
            sog: point.sog(),
            cog: point.cog(),
            heading: point.heading(),
            rot: point.rot(),
            status: point.status(),
            ship_type: point.ship_type(),
        }
    }
}

/// The draw-ready coordinates of one ship within one encounter, ordered by
/// report time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Trajectory {
    pub lon: Vec<f64>,
    pub lat: Vec<f64>,
}

impl Trajectory {
    pub fn len(&self) -> usize {
        self.lon.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lon.is_empty()
    }
}

/// Both ships' draw-ready coordinates for one encounter, the input handed to
/// a rendering collaborator.
#[derive(Debug, Clone, PartialEq)]
pub struct EncounterTrack {
    pub encounter_id: u32,
    pub gw: Trajectory,
    pub so: Trajectory,
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn ship_role_codes_match_the_row_schema() {
        assert_eq!(ShipRole::GiveWay.to_string(), "GW");
        assert_eq!(ShipRole::StandOn.as_ref(), "SO");
        assert_eq!(ShipRole::from_str("GW").unwrap(), ShipRole::GiveWay);
        assert_eq!(ShipRole::from_str("SO").unwrap(), ShipRole::StandOn);
    }

    #[test]
    fn encounter_requires_both_tracks() {
        let missing_so = r#"{"GW": []}"#;
        assert!(serde_json::from_str::<Encounter>(missing_so).is_err());

        let both = r#"{"GW": [], "SO": []}"#;
        let encounter: Encounter = serde_json::from_str(both).unwrap();
        assert!(encounter.gw.is_empty());
        assert!(encounter.so.is_empty());
    }

    #[test]
    fn row_keeps_unset_optionals_unset() {
        let point = AisPoint::new(
            Mmsi::new(3),
            50,
            1.0,
            2.0,
            3.0,
            4.0,
            None,
            None,
            None,
            None,
        );
        let row = EncounterRow::new(7, ShipRole::StandOn, &point);

        assert_eq!(row.encounter_id, 7);
        assert_eq!(row.ship_role, ShipRole::StandOn);
        assert_eq!(row.heading, None);
        assert_eq!(row.rot, None);
        assert_eq!(row.status, None);
        assert_eq!(row.ship_type, None);
    }
}
