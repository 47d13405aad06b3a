use std::{fs::File, io::BufReader};

use chrono::{DateTime, Utc};
use encounter_core::{
    Encounter, EncounterTrack, RenderSnafu, TrajectoryRenderer, export_to_path,
    group_for_rendering, read_rows_from_path,
};
use snafu::ResultExt;
use tracing::{debug, info, instrument};

use crate::{
    error::{CoreSnafu, IoSnafu, JsonSnafu, Result},
    settings::Settings,
};

/// Points needed before a renderer can draw a direction arrow along a track.
const DIRECTION_ARROW_MIN_POINTS: usize = 4;

pub struct App {
    settings: Settings,
}

impl App {
    pub fn build(settings: Settings) -> App {
        App { settings }
    }

    #[instrument(skip_all)]
    pub fn run(self) -> Result<()> {
        let encounters = self.load_encounters()?;
        info!(
            "loaded {} encounters from {}",
            encounters.len(),
            self.settings.input.display(),
        );
        if let Some((start, end)) = collection_time_span(&encounters) {
            info!("encounter collection spans {start} to {end}");
        }

        let rows_written =
            export_to_path(&encounters, &self.settings.output).context(CoreSnafu)?;
        info!(
            "exported {rows_written} rows to {}",
            self.settings.output.display(),
        );

        let rows = read_rows_from_path(&self.settings.output).context(CoreSnafu)?;
        let tracks = group_for_rendering(rows);

        let mut renderer = SummaryRenderer::default();
        for track in &tracks {
            renderer.render(track).context(CoreSnafu)?;
        }
        info!(
            "prepared {} encounter tracks for rendering",
            renderer.rendered,
        );

        Ok(())
    }

    fn load_encounters(&self) -> Result<Vec<Encounter>> {
        let file = File::open(&self.settings.input).context(IoSnafu)?;
        serde_json::from_reader(BufReader::new(file)).context(JsonSnafu)
    }
}

/// Stand-in for the figure backend: reports what a renderer would draw
/// instead of producing an image artifact.
#[derive(Default)]
struct SummaryRenderer {
    rendered: usize,
}

impl TrajectoryRenderer for SummaryRenderer {
    fn render(&mut self, track: &EncounterTrack) -> encounter_core::Result<()> {
        if track.gw.lon.len() != track.gw.lat.len() || track.so.lon.len() != track.so.lat.len() {
            return RenderSnafu {
                message: format!(
                    "encounter {} has mismatched coordinate arrays",
                    track.encounter_id,
                ),
            }
            .fail();
        }

        let arrows = track.gw.len() >= DIRECTION_ARROW_MIN_POINTS
            && track.so.len() >= DIRECTION_ARROW_MIN_POINTS;
        if !arrows {
            debug!(
                "encounter {}: too few points for direction arrows (gw: {}, so: {})",
                track.encounter_id,
                track.gw.len(),
                track.so.len(),
            );
        }

        info!(
            "encounter {}: gw track with {} points, so track with {} points, arrows: {arrows}",
            track.encounter_id,
            track.gw.len(),
            track.so.len(),
        );
        self.rendered += 1;

        Ok(())
    }
}

fn collection_time_span(encounters: &[Encounter]) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let times: Vec<DateTime<Utc>> = encounters
        .iter()
        .flat_map(|e| e.gw.iter().chain(&e.so))
        .filter_map(|p| p.msgtime())
        .collect();

    Some((*times.iter().min()?, *times.iter().max()?))
}
