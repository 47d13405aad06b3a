use std::{
    fs::File,
    io::{Read, Write},
    path::Path,
};

use itertools::Itertools;
use snafu::ResultExt;
use tracing::debug;

use crate::{
    domain::{Encounter, EncounterRow, EncounterTrack, ShipRole, Trajectory},
    error::{CsvSnafu, IoSnafu, Result},
};

/// Flattens an encounter collection into export rows.
///
/// Each encounter is assigned its input index as `encounter_id` and emits
/// the give-way track first, then the stand-on track, both in original
/// point order. No filtering or validation happens here.
pub fn flatten(encounters: &[Encounter]) -> Vec<EncounterRow> {
    let num_rows = encounters.iter().map(|e| e.gw.len() + e.so.len()).sum();
    let mut rows = Vec::with_capacity(num_rows);

    for (encounter_id, encounter) in encounters.iter().enumerate() {
        let encounter_id = encounter_id as u32;
        for point in &encounter.gw {
            rows.push(EncounterRow::new(encounter_id, ShipRole::GiveWay, point));
        }
        for point in &encounter.so {
            rows.push(EncounterRow::new(encounter_id, ShipRole::StandOn, point));
        }
    }

    rows
}

/// Writes rows to a CSV sink in input order, header first, and returns the
/// number of data rows written.
pub fn write_rows<W: Write>(rows: &[EncounterRow], writer: W) -> Result<usize> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    for row in rows {
        csv_writer.serialize(row).context(CsvSnafu)?;
    }
    csv_writer.flush().context(IoSnafu)?;

    Ok(rows.len())
}

/// Flattens and writes an encounter collection in one step.
pub fn export<W: Write>(encounters: &[Encounter], writer: W) -> Result<usize> {
    write_rows(&flatten(encounters), writer)
}

/// Exports to a file, creating or truncating it. The handle is scoped to
/// this call and closes on every exit path.
pub fn export_to_path(encounters: &[Encounter], path: &Path) -> Result<usize> {
    let file = File::create(path).context(IoSnafu)?;
    export(encounters, file)
}

/// Reads all rows back from a CSV source. Unlike the point line format, a
/// malformed row here is a hard error; the sink is under our control and a
/// bad row means the resource itself is damaged.
pub fn read_rows<R: Read>(reader: R) -> Result<Vec<EncounterRow>> {
    csv::Reader::from_reader(reader)
        .into_deserialize()
        .map(|row| row.context(CsvSnafu))
        .collect()
}

pub fn read_rows_from_path(path: &Path) -> Result<Vec<EncounterRow>> {
    let file = File::open(path).context(IoSnafu)?;
    read_rows(file)
}

/// Regroups a flat row sequence into per-encounter coordinate tracks for a
/// rendering collaborator.
///
/// Rows may arrive in any order after a round trip through an unordered
/// sink, so each ship's points are re-sorted by timestamp. Tracks are
/// emitted in ascending `encounter_id` order, including encounters where a
/// ship has fewer than two points; degrading on such tracks is the
/// renderer's concern.
pub fn group_for_rendering(mut rows: Vec<EncounterRow>) -> Vec<EncounterTrack> {
    rows.sort_by_key(|r| r.encounter_id);

    let groups = rows.into_iter().chunk_by(|r| r.encounter_id);

    let mut tracks = Vec::new();
    for (encounter_id, group) in &groups {
        let (gw, so): (Vec<_>, Vec<_>) = group.partition(|r| r.ship_role == ShipRole::GiveWay);
        debug!(
            "grouped encounter {encounter_id}: {} gw rows, {} so rows",
            gw.len(),
            so.len(),
        );
        tracks.push(EncounterTrack {
            encounter_id,
            gw: trajectory(gw),
            so: trajectory(so),
        });
    }

    tracks
}

fn trajectory(mut rows: Vec<EncounterRow>) -> Trajectory {
    rows.sort_by_key(|r| r.timestamp);
    Trajectory {
        lon: rows.iter().map(|r| r.lon).collect(),
        lat: rows.iter().map(|r| r.lat).collect(),
    }
}

#[cfg(test)]
mod tests {
    use crate::domain::{AisPoint, Mmsi};

    use super::*;

    fn point(mmsi: i32, timestamp: i64, lon: f64, lat: f64, sog: f64, cog: f64) -> AisPoint {
        AisPoint::new(
            Mmsi::new(mmsi),
            timestamp,
            lon,
            lat,
            sog,
            cog,
            Some(0.0),
            Some(0.0),
            Some(0),
            None,
        )
    }

    fn two_ship_encounter() -> Encounter {
        Encounter {
            gw: vec![point(1, 100, 10.0, 50.0, 5.0, 90.0)],
            so: vec![point(2, 100, 10.1, 50.1, 6.0, 270.0)],
        }
    }

    #[test]
    fn flatten_emits_gw_before_so_with_input_index_as_id() {
        let encounters = vec![two_ship_encounter()];
        let rows = flatten(&encounters);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].encounter_id, 0);
        assert_eq!(rows[0].ship_role, ShipRole::GiveWay);
        assert_eq!(rows[0].mmsi, Mmsi::new(1));
        assert_eq!(rows[0].lon, 10.0);
        assert_eq!(rows[0].lat, 50.0);
        assert_eq!(rows[0].sog, 5.0);
        assert_eq!(rows[0].cog, 90.0);
        assert_eq!(rows[1].encounter_id, 0);
        assert_eq!(rows[1].ship_role, ShipRole::StandOn);
        assert_eq!(rows[1].mmsi, Mmsi::new(2));
    }

    #[test]
    fn flatten_row_count_and_ids_cover_every_point() {
        let encounters = vec![
            Encounter {
                gw: vec![
                    AisPoint::test_default(Mmsi::test_new(1), 100),
                    AisPoint::test_default(Mmsi::test_new(1), 200),
                ],
                so: vec![AisPoint::test_default(Mmsi::test_new(2), 100)],
            },
            Encounter {
                gw: vec![AisPoint::test_default(Mmsi::test_new(3), 100)],
                so: vec![
                    AisPoint::test_default(Mmsi::test_new(4), 100),
                    AisPoint::test_default(Mmsi::test_new(4), 200),
                    AisPoint::test_default(Mmsi::test_new(4), 300),
                ],
            },
        ];

        let rows = flatten(&encounters);
        assert_eq!(rows.len(), 7);
        assert_eq!(rows.iter().filter(|r| r.encounter_id == 0).count(), 3);
        assert_eq!(rows.iter().filter(|r| r.encounter_id == 1).count(), 4);
    }

    #[test]
    fn export_writes_the_contract_header_and_reports_row_count() {
        let encounters = vec![two_ship_encounter()];

        let mut out = Vec::new();
        let written = export(&encounters, &mut out).unwrap();
        assert_eq!(written, 2);

        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "encounter_id,ship_role,mmsi,timestamp,lon,lat,sog,cog,heading,rot,status,shiptype",
        );
        assert_eq!(lines.count(), 2);
    }

    #[test]
    fn csv_round_trip_preserves_rows_and_unset_optionals() {
        let encounters = vec![Encounter {
            gw: vec![point(1, 100, 10.0, 50.0, 5.0, 90.0)],
            so: vec![AisPoint::new(
                Mmsi::new(2),
                100,
                10.1,
                50.1,
                6.0,
                270.0,
                None,
                None,
                None,
                None,
            )],
        }];
        let rows = flatten(&encounters);

        let mut out = Vec::new();
        write_rows(&rows, &mut out).unwrap();
        let read_back = read_rows(&out[..]).unwrap();

        assert_eq!(read_back, rows);
        assert_eq!(read_back[1].heading, None);
        assert_eq!(read_back[1].status, None);
    }

    #[test]
    fn group_for_rendering_sorts_each_ship_by_timestamp() {
        let encounters = vec![Encounter {
            gw: vec![
                point(1, 300, 10.2, 50.2, 5.0, 90.0),
                point(1, 100, 10.0, 50.0, 5.0, 90.0),
                point(1, 200, 10.1, 50.1, 5.0, 90.0),
            ],
            so: vec![
                point(2, 200, 11.1, 51.1, 6.0, 270.0),
                point(2, 100, 11.0, 51.0, 6.0, 270.0),
            ],
        }];

        // Reverse to simulate a sink that does not preserve storage order.
        let mut rows = flatten(&encounters);
        rows.reverse();

        let tracks = group_for_rendering(rows);
        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].encounter_id, 0);
        assert_eq!(tracks[0].gw.lon, vec![10.0, 10.1, 10.2]);
        assert_eq!(tracks[0].gw.lat, vec![50.0, 50.1, 50.2]);
        assert_eq!(tracks[0].so.lon, vec![11.0, 11.1]);
        assert_eq!(tracks[0].so.lat, vec![51.0, 51.1]);
    }

    #[test]
    fn group_for_rendering_keeps_underfilled_encounters() {
        let encounters = vec![
            Encounter {
                gw: vec![point(1, 100, 10.0, 50.0, 5.0, 90.0)],
                so: vec![],
            },
            two_ship_encounter(),
        ];

        let tracks = group_for_rendering(flatten(&encounters));
        assert_eq!(tracks.len(), 2);
        assert_eq!(tracks[0].gw.len(), 1);
        assert!(tracks[0].so.is_empty());
        assert_eq!(tracks[1].encounter_id, 1);
    }

    #[test]
    fn group_for_rendering_of_no_rows_is_empty() {
        assert!(group_for_rendering(Vec::new()).is_empty());
    }
}
