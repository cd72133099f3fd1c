use crate::error::Result;
use crate::mgrs::MgrsGrid;
use crate::parser::ParsedCoordinate;
use crate::policy::{OutputFormat, ZonePolicy};
use crate::position::GeoPosition;

/// Degree delimiter the CNI-MU scratchpad accepts in place of `°`.
const DELIM: char = '^';

/// Render the avionics entry string for a parsed coordinate.
///
/// The policy picks the notation: space-less full-precision MGRS
/// (`38TPM3046282643`) or the degrees+minutes lat/lon form
/// (`N52^00.00 W000^00.00`).
pub fn entry_string(parsed: &ParsedCoordinate, policy: &dyn ZonePolicy) -> Result<String> {
    match policy.select_output_format(parsed) {
        OutputFormat::Mgrs => Ok(MgrsGrid::from_position(parsed.position())?.compact()),
        OutputFormat::Decimal => Ok(latlon_entry(parsed.position())),
    }
}

/// Format a position as `Ndd^mm.mm Wddd^mm.mm` (two degree digits for
/// latitude, three for longitude, minutes to two decimal places).
fn latlon_entry(pos: GeoPosition) -> String {
    format!(
        "{} {}",
        axis_entry(pos.lat(), true),
        axis_entry(pos.lon(), false)
    )
}

fn axis_entry(value: f64, is_lat: bool) -> String {
    let prefix = match (is_lat, value >= 0.0) {
        (true, true) => 'N',
        (true, false) => 'S',
        (false, true) => 'E',
        (false, false) => 'W',
    };
    let abs = value.abs();
    let mut degrees = abs.trunc() as u32;
    let mut minutes = (abs - abs.trunc()) * 60.0;
    // Round to the printed precision first so 59.999' carries into the
    // degrees instead of printing as 60.00.
    minutes = (minutes * 100.0).round() / 100.0;
    if minutes >= 60.0 {
        degrees += 1;
        minutes = 0.0;
    }
    let width = if is_lat { 2 } else { 3 };
    format!("{prefix}{degrees:0width$}{DELIM}{minutes:05.2}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;
    use crate::policy::ZoneBugPolicy;

    #[test]
    fn test_decimal_input_renders_latlon() {
        let parsed = parse("52.0, 0.0").unwrap();
        let entry = entry_string(&parsed, &ZoneBugPolicy).unwrap();
        assert_eq!(entry, "N52^00.00 E000^00.00");
    }

    #[test]
    fn test_southern_western_prefixes() {
        let parsed = parse("-33.5, -70.25").unwrap();
        let entry = entry_string(&parsed, &ZoneBugPolicy).unwrap();
        assert_eq!(entry, "S33^30.00 W070^15.00");
    }

    #[test]
    fn test_mgrs_input_renders_compact_mgrs() {
        let parsed = parse("38T PM 12345 67890").unwrap();
        let entry = entry_string(&parsed, &ZoneBugPolicy).unwrap();
        assert!(entry.starts_with("38T"));
        assert!(!entry.contains(' '), "sim rejects spaced MGRS: {entry}");
        // zone + band + 2 square letters + 10 digits
        assert_eq!(entry.len(), 15);
    }

    #[test]
    fn test_zone_bug_forces_latlon_even_for_mgrs_input() {
        let parsed = parse("30T VK 12345 67890").unwrap();
        let entry = entry_string(&parsed, &ZoneBugPolicy).unwrap();
        assert!(entry.contains(DELIM), "expected lat/lon entry, got {entry}");
        assert!(entry.starts_with('N') || entry.starts_with('S'));
    }

    #[test]
    fn test_minute_rounding_carries_into_degrees() {
        // 41.999999° is 41°59.99994', which rounds to 42°00.00', not 41°60.00'.
        let parsed = parse("41.999999, 0.0").unwrap();
        let entry = entry_string(&parsed, &ZoneBugPolicy).unwrap();
        assert_eq!(entry, "N42^00.00 E000^00.00");
    }

    #[test]
    fn test_minutes_just_below_carry_stay_put() {
        // 41.99999° is 41°59.9994' and prints as 59.99, no carry.
        let parsed = parse("41.99999, 0.0").unwrap();
        let entry = entry_string(&parsed, &ZoneBugPolicy).unwrap();
        assert_eq!(entry, "N41^59.99 E000^00.00");
    }

    #[test]
    fn test_minutes_zero_padded() {
        let parsed = parse("10.1, 5.05").unwrap();
        let entry = entry_string(&parsed, &ZoneBugPolicy).unwrap();
        assert_eq!(entry, "N10^06.00 E005^03.00");
    }
}
