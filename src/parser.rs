use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{NavError, Result};
use crate::mgrs::MgrsGrid;
use crate::position::GeoPosition;

/// Coordinate notation a raw input string was recognized as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CoordinateFormat {
    /// MGRS grid reference, e.g. `38TPM3046282643`.
    Mgrs,
    /// Decimal degrees, signed or with cardinal letters.
    Decimal,
    /// Degrees and decimal minutes, e.g. `N42 15.5 W071 20.2`.
    Ddm,
    /// Degrees, minutes and seconds, e.g. `N23 12 14 E52 32 12`.
    Dms,
}

impl fmt::Display for CoordinateFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mgrs => write!(f, "MGRS"),
            Self::Decimal => write!(f, "Decimal"),
            Self::Ddm => write!(f, "DDM"),
            Self::Dms => write!(f, "DMS"),
        }
    }
}

/// A successfully parsed coordinate: canonical position plus how it was
/// written, and the grid zone when the input was MGRS.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParsedCoordinate {
    position: GeoPosition,
    format: CoordinateFormat,
    mgrs_zone: Option<u8>,
}

impl ParsedCoordinate {
    /// Assemble a parsed coordinate. The zone, when present, must be 1–60.
    pub fn new(
        position: GeoPosition,
        format: CoordinateFormat,
        mgrs_zone: Option<u8>,
    ) -> Result<Self> {
        if let Some(zone) = mgrs_zone {
            if !(1..=60).contains(&zone) {
                return Err(NavError::Range(format!("MGRS zone {zone} outside 1–60")));
            }
        }
        Ok(Self {
            position,
            format,
            mgrs_zone,
        })
    }

    pub fn position(&self) -> GeoPosition {
        self.position
    }

    pub fn format(&self) -> CoordinateFormat {
        self.format
    }

    /// The grid zone of the input, if the input was MGRS.
    pub fn mgrs_zone(&self) -> Option<u8> {
        self.mgrs_zone
    }
}

/// Parse free-form coordinate text into a canonical position.
///
/// Recognizers are tried strictest-grammar-first: MGRS, then decimal
/// lat/lon, then DDM, then DMS. The first grammar that matches decides the
/// outcome: a match with out-of-range values fails with a range error
/// rather than falling through to a looser notation.
pub fn parse(raw: &str) -> Result<ParsedCoordinate> {
    let text = raw.trim().to_uppercase();
    if text.is_empty() {
        return Err(NavError::Syntax(String::from("empty input")));
    }

    if let Some(result) = try_mgrs(&text) {
        return result;
    }
    if let Some(result) = try_decimal(&text) {
        return result;
    }
    if let Some(result) = try_ddm(&text) {
        return result;
    }
    if let Some(result) = try_dms(&text) {
        return result;
    }
    Err(NavError::Syntax(text))
}

fn try_mgrs(text: &str) -> Option<Result<ParsedCoordinate>> {
    match MgrsGrid::parse(text) {
        Ok(grid) => Some(
            grid.to_position()
                .and_then(|pos| ParsedCoordinate::new(pos, CoordinateFormat::Mgrs, Some(grid.zone()))),
        ),
        // Shape didn't match; let the looser grammars have a go.
        Err(NavError::Syntax(_)) => None,
        Err(e) => Some(Err(e)),
    }
}

fn try_decimal(text: &str) -> Option<Result<ParsedCoordinate>> {
    static PLAIN: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"^([+-]?\d+(?:\.\d+)?)[,\s]+([+-]?\d+(?:\.\d+)?)$").unwrap()
    });
    static SUFFIX: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"^(\d+(?:\.\d+)?)\s*([NS])[,\s]*(\d+(?:\.\d+)?)\s*([EW])$").unwrap()
    });
    static PREFIX: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"^([NS])\s*(\d+(?:\.\d+)?)[,\s]*([EW])\s*(\d+(?:\.\d+)?)$").unwrap()
    });

    let (lat, lon) = if let Some(caps) = PLAIN.captures(text) {
        let lat: f64 = caps[1].parse().ok()?;
        let lon: f64 = caps[2].parse().ok()?;
        (lat, lon)
    } else if let Some(caps) = SUFFIX.captures(text) {
        let lat: f64 = caps[1].parse().ok()?;
        let lon: f64 = caps[3].parse().ok()?;
        (signed(lat, &caps[2]), signed(lon, &caps[4]))
    } else if let Some(caps) = PREFIX.captures(text) {
        let lat: f64 = caps[2].parse().ok()?;
        let lon: f64 = caps[4].parse().ok()?;
        (signed(lat, &caps[1]), signed(lon, &caps[3]))
    } else {
        return None;
    };

    Some(
        GeoPosition::new(lat, lon)
            .and_then(|pos| ParsedCoordinate::new(pos, CoordinateFormat::Decimal, None)),
    )
}

fn try_ddm(text: &str) -> Option<Result<ParsedCoordinate>> {
    static DDM: Lazy<Regex> = Lazy::new(|| {
        Regex::new(
            r"^([NS])\s*(\d{1,3})[°^\s]+(\d{1,2}(?:\.\d+)?)'?[,\s]*([EW])\s*(\d{1,3})[°^\s]+(\d{1,2}(?:\.\d+)?)'?$",
        )
        .unwrap()
    });

    let caps = DDM.captures(text)?;
    let lat_deg: f64 = caps[2].parse().ok()?;
    let lat_min: f64 = caps[3].parse().ok()?;
    let lon_deg: f64 = caps[5].parse().ok()?;
    let lon_min: f64 = caps[6].parse().ok()?;

    if lat_min >= 60.0 || lon_min >= 60.0 {
        return Some(Err(NavError::Range(String::from("minutes must be below 60"))));
    }
    let lat = signed(lat_deg + lat_min / 60.0, &caps[1]);
    let lon = signed(lon_deg + lon_min / 60.0, &caps[4]);

    Some(
        GeoPosition::new(lat, lon)
            .and_then(|pos| ParsedCoordinate::new(pos, CoordinateFormat::Ddm, None)),
    )
}

fn try_dms(text: &str) -> Option<Result<ParsedCoordinate>> {
    static DMS: Lazy<Regex> = Lazy::new(|| {
        Regex::new(
            r#"^([NS])\s*(\d{1,3})[°^\s]+(\d{1,2})['\s]+(\d{1,2}(?:\.\d+)?)"?[,\s]*([EW])\s*(\d{1,3})[°^\s]+(\d{1,2})['\s]+(\d{1,2}(?:\.\d+)?)"?$"#,
        )
        .unwrap()
    });

    let caps = DMS.captures(text)?;
    let lat_deg: f64 = caps[2].parse().ok()?;
    let lat_min: f64 = caps[3].parse().ok()?;
    let lat_sec: f64 = caps[4].parse().ok()?;
    let lon_deg: f64 = caps[6].parse().ok()?;
    let lon_min: f64 = caps[7].parse().ok()?;
    let lon_sec: f64 = caps[8].parse().ok()?;

    if lat_min >= 60.0 || lon_min >= 60.0 {
        return Some(Err(NavError::Range(String::from("minutes must be below 60"))));
    }
    if lat_sec >= 60.0 || lon_sec >= 60.0 {
        return Some(Err(NavError::Range(String::from("seconds must be below 60"))));
    }
    let lat = signed(lat_deg + lat_min / 60.0 + lat_sec / 3600.0, &caps[1]);
    let lon = signed(lon_deg + lon_min / 60.0 + lon_sec / 3600.0, &caps[5]);

    Some(
        GeoPosition::new(lat, lon)
            .and_then(|pos| ParsedCoordinate::new(pos, CoordinateFormat::Dms, None)),
    )
}

fn signed(value: f64, cardinal: &str) -> f64 {
    if cardinal == "S" || cardinal == "W" {
        -value
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_decimal() {
        let parsed = parse("42.123, -71.456").unwrap();
        assert_eq!(parsed.format(), CoordinateFormat::Decimal);
        assert_eq!(parsed.position().lat(), 42.123);
        assert_eq!(parsed.position().lon(), -71.456);
        assert_eq!(parsed.mgrs_zone(), None);
    }

    #[test]
    fn test_decimal_space_separated() {
        let parsed = parse("23.241 -83.424").unwrap();
        assert_eq!(parsed.format(), CoordinateFormat::Decimal);
        assert_eq!(parsed.position().lat(), 23.241);
        assert_eq!(parsed.position().lon(), -83.424);
    }

    #[test]
    fn test_decimal_suffix_cardinals() {
        let parsed = parse("10.25N, 67.6498W").unwrap();
        assert_eq!(parsed.format(), CoordinateFormat::Decimal);
        assert_eq!(parsed.position().lat(), 10.25);
        assert_eq!(parsed.position().lon(), -67.6498);
    }

    #[test]
    fn test_decimal_prefix_cardinals() {
        let parsed = parse("S33.8688 E151.2093").unwrap();
        assert_eq!(parsed.position().lat(), -33.8688);
        assert_eq!(parsed.position().lon(), 151.2093);
    }

    #[test]
    fn test_mgrs_spaced() {
        let parsed = parse("38T PM 12345 67890").unwrap();
        assert_eq!(parsed.format(), CoordinateFormat::Mgrs);
        assert_eq!(parsed.mgrs_zone(), Some(38));
    }

    #[test]
    fn test_mgrs_compact() {
        let parsed = parse("38TPM3046282643").unwrap();
        assert_eq!(parsed.format(), CoordinateFormat::Mgrs);
        assert_eq!(parsed.mgrs_zone(), Some(38));
        assert!((40.0..48.0).contains(&parsed.position().lat()));
    }

    #[test]
    fn test_ddm() {
        let parsed = parse("N42 15.5 W071 20.2").unwrap();
        assert_eq!(parsed.format(), CoordinateFormat::Ddm);
        assert!((parsed.position().lat() - (42.0 + 15.5 / 60.0)).abs() < 1e-12);
        assert!((parsed.position().lon() + (71.0 + 20.2 / 60.0)).abs() < 1e-12);
    }

    #[test]
    fn test_ddm_with_degree_symbols() {
        let parsed = parse("N 25°06.333' E 056°20.417'").unwrap();
        assert_eq!(parsed.format(), CoordinateFormat::Ddm);
        assert!((parsed.position().lat() - (25.0 + 6.333 / 60.0)).abs() < 1e-12);
    }

    #[test]
    fn test_dms() {
        let parsed = parse("N23 12 14 E52 32 12").unwrap();
        assert_eq!(parsed.format(), CoordinateFormat::Dms);
        assert!((parsed.position().lat() - (23.0 + 12.0 / 60.0 + 14.0 / 3600.0)).abs() < 1e-12);
        assert!((parsed.position().lon() - (52.0 + 32.0 / 60.0 + 12.0 / 3600.0)).abs() < 1e-12);
    }

    #[test]
    fn test_dms_decimal_seconds() {
        let parsed = parse("S23 12 14.5, W052 32 12.25").unwrap();
        assert_eq!(parsed.format(), CoordinateFormat::Dms);
        assert!(parsed.position().lat() < 0.0);
        assert!(parsed.position().lon() < 0.0);
    }

    #[test]
    fn test_lowercase_input() {
        let parsed = parse("n42 15.5 w071 20.2").unwrap();
        assert_eq!(parsed.format(), CoordinateFormat::Ddm);
    }

    #[test]
    fn test_surrounding_whitespace() {
        let parsed = parse("   38TPM1234567890   ").unwrap();
        assert_eq!(parsed.format(), CoordinateFormat::Mgrs);
    }

    #[test]
    fn test_garbage_is_syntax_error() {
        assert!(matches!(parse("hello world"), Err(NavError::Syntax(_))));
    }

    #[test]
    fn test_empty_is_syntax_error() {
        assert!(matches!(parse("   "), Err(NavError::Syntax(_))));
    }

    #[test]
    fn test_single_number_is_syntax_error() {
        assert!(matches!(parse("42.123"), Err(NavError::Syntax(_))));
    }

    #[test]
    fn test_missing_hemisphere_letter_fails() {
        // One axis carries a cardinal, the other doesn't. Refuse to guess.
        assert!(matches!(parse("N42 15.5 071 20.2"), Err(NavError::Syntax(_))));
    }

    #[test]
    fn test_decimal_latitude_out_of_range() {
        assert!(matches!(parse("91.0, 10.0"), Err(NavError::Range(_))));
    }

    #[test]
    fn test_decimal_longitude_out_of_range() {
        assert!(matches!(parse("45.0, 190.0"), Err(NavError::Range(_))));
    }

    #[test]
    fn test_ddm_minutes_out_of_range() {
        assert!(matches!(parse("N42 75.0 W071 20.2"), Err(NavError::Range(_))));
    }

    #[test]
    fn test_dms_seconds_out_of_range() {
        assert!(matches!(parse("N23 12 75 E52 32 12"), Err(NavError::Range(_))));
    }

    #[test]
    fn test_mgrs_bad_zone_is_range_error() {
        assert!(matches!(parse("61TPM1234567890"), Err(NavError::Range(_))));
    }

    #[test]
    fn test_six_bare_numbers_fail() {
        // DMS without cardinal letters is ambiguous and gets rejected.
        assert!(matches!(parse("42 15 30 71 20 10"), Err(NavError::Syntax(_))));
    }
}
