use crate::{domain::EncounterTrack, error::Result};

/// Rendering collaborator fed with draw-ready encounter tracks.
///
/// Implementations decide the artifact (figure file, report, log line).
/// Tracks where a ship has fewer than four points still arrive here;
/// degrading gracefully on them, such as skipping direction-arrow
/// annotations, is the implementation's responsibility.
pub trait TrajectoryRenderer {
    fn render(&mut self, track: &EncounterTrack) -> Result<()>;
}
