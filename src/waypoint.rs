use crate::entry;
use crate::error::{NavError, Result};
use crate::parser::ParsedCoordinate;
use crate::policy::ZonePolicy;
use crate::position::GeoPosition;

/// Identifier length limit imposed by the CNI-MU waypoint list.
pub const MAX_NAME_LEN: usize = 5;

/// A custom navigation waypoint as stored in the simulator database.
///
/// Edits are modeled as delete-then-insert; a `Waypoint` is never updated
/// in place.
#[derive(Debug, Clone, PartialEq)]
pub struct Waypoint {
    name: String,
    entry: String,
    position: GeoPosition,
    elevation_m: Option<f64>,
}

impl Waypoint {
    /// Build a waypoint from a parsed coordinate.
    ///
    /// The identifier is trimmed and uppercased, and must be 1–5 characters
    /// afterwards. The entry string is rendered through the given policy.
    pub fn new(name: &str, parsed: &ParsedCoordinate, policy: &dyn ZonePolicy) -> Result<Self> {
        let name = name.trim().to_uppercase();
        if name.is_empty() || name.chars().count() > MAX_NAME_LEN {
            return Err(NavError::Validation(format!(
                "identifier must be 1–{MAX_NAME_LEN} characters, got {name:?}"
            )));
        }
        let entry = entry::entry_string(parsed, policy)?;
        Ok(Self {
            name,
            entry,
            position: parsed.position(),
            elevation_m: None,
        })
    }

    /// [`Waypoint::new`] with the standard zone-bug policy applied.
    pub fn from_parsed(name: &str, parsed: &ParsedCoordinate) -> Result<Self> {
        Self::new(name, parsed, &crate::policy::ZoneBugPolicy)
    }

    /// Attach an elevation in meters.
    ///
    /// Carried for display only: the repository always stores the altitude
    /// column as NULL because the sim misinterprets stored elevations.
    pub fn with_elevation(mut self, meters: f64) -> Self {
        self.elevation_m = Some(meters);
        self
    }

    /// Rebuild a waypoint from a stored row, without re-validating the
    /// identifier (rows written by other tools are listed as-is).
    pub(crate) fn from_row(
        name: String,
        entry: String,
        position: GeoPosition,
        elevation_m: Option<f64>,
    ) -> Self {
        Self {
            name,
            entry,
            position,
            elevation_m,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The CNI-MU entry string persisted alongside the raw coordinates.
    pub fn entry_string(&self) -> &str {
        &self.entry
    }

    pub fn position(&self) -> GeoPosition {
        self.position
    }

    pub fn elevation_m(&self) -> Option<f64> {
        self.elevation_m
    }
}
