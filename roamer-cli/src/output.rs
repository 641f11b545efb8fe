//! JSON output shared by the commands.

use std::io::Write;

use roamer_core::{OptimizedTrip, RouteResult, Waypoint};
use serde::{Deserialize, Serialize};

use crate::CliError;

/// Write `value` as pretty JSON followed by a newline.
pub(crate) fn write_json<T: Serialize + ?Sized>(
    writer: &mut dyn Write,
    value: &T,
) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(value).map_err(CliError::SerializeOutput)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}

/// Ordered waypoints together with the path through them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct TripOutput {
    pub(crate) waypoints: Vec<Waypoint>,
    pub(crate) route: RouteResult,
}

impl From<OptimizedTrip> for TripOutput {
    fn from(trip: OptimizedTrip) -> Self {
        Self {
            waypoints: trip.waypoints,
            route: trip.route,
        }
    }
}
