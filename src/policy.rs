use log::debug;

use crate::mgrs;
use crate::parser::{CoordinateFormat, ParsedCoordinate};

/// Notation a coordinate is rendered in for the avionics entry string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Mgrs,
    Decimal,
}

/// Decides how a parsed coordinate is rendered for the simulator.
///
/// Swapping the implementation is the only way to change the rule; there is
/// no per-call override.
pub trait ZonePolicy {
    fn select_output_format(&self, parsed: &ParsedCoordinate) -> OutputFormat;
}

/// Works around the sim crash on MGRS zones divisible by 10.
///
/// The C-130J CNI-MU crashes the mission when a custom waypoint whose MGRS
/// zone is 10, 20, 30, 40, 50 or 60 is loaded in grid form. Any coordinate
/// in such a zone is forced to the lat/lon entry form; otherwise MGRS input
/// stays MGRS and everything else stays lat/lon.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZoneBugPolicy;

impl ZonePolicy for ZoneBugPolicy {
    fn select_output_format(&self, parsed: &ParsedCoordinate) -> OutputFormat {
        let zone = parsed
            .mgrs_zone()
            .unwrap_or_else(|| mgrs::natural_zone(parsed.position()));
        if zone % 10 == 0 {
            debug!("zone {zone} is affected by the zone bug, forcing lat/lon entry");
            return OutputFormat::Decimal;
        }
        match parsed.format() {
            CoordinateFormat::Mgrs => OutputFormat::Mgrs,
            _ => OutputFormat::Decimal,
        }
    }
}
