use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{NavError, Result};
use crate::position::GeoPosition;

mod utm;

/// Latitude band letters, 8° each from 80°S (band X covers 72°N–84°N).
const BAND_LETTERS: &[u8] = b"CDEFGHJKLMNPQRSTUVWX";

/// 100 km square row letters, a 20-letter cycle repeating every 2,000 km.
const ROW_CYCLE: &[u8] = b"ABCDEFGHJKLMNPQRSTUV";

/// 100 km square column letter sets, indexed by `zone % 3`.
const COLUMN_SETS: [&[u8]; 3] = [b"STUVWXYZ", b"ABCDEFGH", b"JKLMNPQR"];

/// Digit count emitted per easting/northing half when encoding.
///
/// Fixed at 5 (1 m resolution); the CNI-MU accepts full-precision
/// references and anything coarser loses accuracy for no benefit.
pub const ENCODE_DIGITS: usize = 5;

/// One 100 km grid square side in meters.
const SQUARE: f64 = 100_000.0;

/// A Military Grid Reference System grid reference.
///
/// Zone, latitude band, 100 km square letters and the meter offsets within
/// the square. Letters and ranges are validated at construction; the offsets
/// always hold full 1 m values, with `digits` recording the precision the
/// reference was parsed at so it can be reprinted identically.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MgrsGrid {
    zone: u8,
    band: char,
    column: char,
    row: char,
    easting: u32,
    northing: u32,
    digits: usize,
}

impl MgrsGrid {
    /// Create a grid reference from its components.
    ///
    /// `easting`/`northing` are meter offsets within the 100 km square
    /// (0–99,999). Fails with a range error on a zone outside 1–60, a letter
    /// outside the valid set for the zone, or an offset of 100 km or more.
    pub fn new(
        zone: u8,
        band: char,
        column: char,
        row: char,
        easting: u32,
        northing: u32,
    ) -> Result<Self> {
        if !(1..=60).contains(&zone) {
            return Err(NavError::Range(format!("MGRS zone {zone} outside 1–60")));
        }
        if !BAND_LETTERS.contains(&(band as u8)) {
            return Err(NavError::Range(format!("invalid latitude band {band:?}")));
        }
        if !column_set(zone).contains(&(column as u8)) {
            return Err(NavError::Range(format!(
                "column letter {column:?} not valid in zone {zone}"
            )));
        }
        if !ROW_CYCLE.contains(&(row as u8)) {
            return Err(NavError::Range(format!("invalid row letter {row:?}")));
        }
        if easting >= SQUARE as u32 || northing >= SQUARE as u32 {
            return Err(NavError::Range(format!(
                "square offset {easting}/{northing} exceeds 100 km"
            )));
        }
        Ok(Self {
            zone,
            band,
            column,
            row,
            easting,
            northing,
            digits: ENCODE_DIGITS,
        })
    }

    /// Parse a grid string such as `38T PM 12345 67890`, `38TPM1234567890`
    /// or the truncated `38T PM 123 456`.
    ///
    /// Easting/northing halves of 1–5 digits are scaled to meters by their
    /// digit count (`123` → 12,300 m). The halves must be the same length;
    /// a lone digit run must split evenly.
    pub fn parse(text: &str) -> Result<Self> {
        static GRID_RE: Lazy<Regex> = Lazy::new(|| {
            Regex::new(r"^(\d{1,2})\s*([A-Z])\s*([A-Z])\s*([A-Z])\s*(\d[\d\s]*)$").unwrap()
        });

        let text = text.trim().to_uppercase();
        let caps = GRID_RE
            .captures(&text)
            .ok_or_else(|| NavError::Syntax(text.clone()))?;

        let zone: u8 = caps[1]
            .parse()
            .map_err(|_| NavError::Syntax(text.clone()))?;
        let band = caps[2].chars().next().unwrap_or_default();
        let column = caps[3].chars().next().unwrap_or_default();
        let row = caps[4].chars().next().unwrap_or_default();

        let halves: Vec<&str> = caps[5].split_whitespace().collect();
        let (east_str, north_str) = match halves.as_slice() {
            [all] => {
                if all.len() % 2 != 0 {
                    return Err(NavError::Syntax(format!(
                        "odd digit count in grid reference {text:?}"
                    )));
                }
                all.split_at(all.len() / 2)
            }
            [e, n] if e.len() == n.len() => (*e, *n),
            _ => {
                return Err(NavError::Syntax(format!(
                    "easting/northing halves differ in {text:?}"
                )));
            }
        };
        if east_str.is_empty() || east_str.len() > ENCODE_DIGITS {
            return Err(NavError::Syntax(format!(
                "easting/northing must be 1–5 digits in {text:?}"
            )));
        }

        let digits = east_str.len();
        let scale = 10u32.pow((ENCODE_DIGITS - digits) as u32);
        let easting: u32 = east_str
            .parse::<u32>()
            .map_err(|_| NavError::Syntax(text.clone()))?
            * scale;
        let northing: u32 = north_str
            .parse::<u32>()
            .map_err(|_| NavError::Syntax(text.clone()))?
            * scale;

        let mut grid = Self::new(zone, band, column, row, easting, northing)?;
        grid.digits = digits;
        Ok(grid)
    }

    /// Encode a position as a 5-digit (1 m) grid reference.
    ///
    /// Fails outside the banded latitudes (80°S–84°N).
    pub fn from_position(pos: GeoPosition) -> Result<Self> {
        let band = band_for(pos.lat())?;
        let zone = utm::zone_for(pos.lat(), pos.lon());
        let (e, n) = utm::forward(pos.lat(), pos.lon(), zone);
        // Round to whole meters before splitting, so a value a hair under a
        // square boundary does not shift the letters.
        let (e, n) = (e.round(), n.round());

        let col_idx = (e / SQUARE).floor() as usize;
        if !(1..=8).contains(&col_idx) {
            return Err(NavError::Range(format!(
                "easting {e:.0} outside zone {zone} grid"
            )));
        }
        let column = column_set(zone)[col_idx - 1] as char;
        let row_100k = (n / SQUARE).floor() as usize;
        let row = ROW_CYCLE[(row_100k + row_offset(zone)) % 20] as char;

        Self::new(
            zone,
            band,
            column,
            row,
            (e - col_idx as f64 * SQUARE) as u32,
            (n - row_100k as f64 * SQUARE) as u32,
        )
    }

    /// Decode to a geodetic position (SW corner of the implied square at the
    /// reference's precision).
    pub fn to_position(&self) -> Result<GeoPosition> {
        let col_idx = column_set(self.zone)
            .iter()
            .position(|&c| c == self.column as u8)
            .unwrap_or_default();
        let easting = (col_idx as f64 + 1.0) * SQUARE + self.easting as f64;

        let row_idx = ROW_CYCLE
            .iter()
            .position(|&c| c == self.row as u8)
            .unwrap_or_default();
        let row_base = ((row_idx + 20 - row_offset(self.zone)) % 20) as f64 * SQUARE;

        // The row cycle repeats every 2,000 km; the latitude band pins down
        // which repetition is meant. The band minimum is floored to a square
        // boundary so squares straddling the band edge still resolve.
        let min_base = min_northing_base(self.zone, self.band);
        let mut cycle = row_base;
        while cycle < min_base {
            cycle += 2_000_000.0;
        }
        let northing = cycle + self.northing as f64;

        let (lat, lon) = utm::inverse(self.zone, easting, northing, is_northern(self.band));
        GeoPosition::new(lat, lon)
    }

    pub fn zone(&self) -> u8 {
        self.zone
    }

    pub fn band(&self) -> char {
        self.band
    }

    /// The 100 km square (column, row) letters.
    pub fn square(&self) -> (char, char) {
        (self.column, self.row)
    }

    /// Easting offset within the square, meters.
    pub fn easting(&self) -> u32 {
        self.easting
    }

    /// Northing offset within the square, meters.
    pub fn northing(&self) -> u32 {
        self.northing
    }

    /// Digit count this reference was parsed or encoded at.
    pub fn precision_digits(&self) -> usize {
        self.digits
    }

    /// Reprint at a different digit count (1–5). Coarser digits truncate
    /// toward the SW corner of the larger square.
    pub fn with_precision(mut self, digits: usize) -> Result<Self> {
        if !(1..=ENCODE_DIGITS).contains(&digits) {
            return Err(NavError::Range(format!(
                "precision {digits} outside 1–{ENCODE_DIGITS} digits"
            )));
        }
        let scale = 10u32.pow((ENCODE_DIGITS - digits) as u32);
        self.easting = self.easting / scale * scale;
        self.northing = self.northing / scale * scale;
        self.digits = digits;
        Ok(self)
    }

    /// Space-less full-precision form, e.g. `38TPM3046282643`, the shape
    /// the CNI-MU scratchpad accepts.
    pub fn compact(&self) -> String {
        format!(
            "{}{}{}{}{:05}{:05}",
            self.zone, self.band, self.column, self.row, self.easting, self.northing
        )
    }
}

impl fmt::Display for MgrsGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scale = 10u32.pow((ENCODE_DIGITS - self.digits) as u32);
        write!(
            f,
            "{}{} {}{} {:0width$} {:0width$}",
            self.zone,
            self.band,
            self.column,
            self.row,
            self.easting / scale,
            self.northing / scale,
            width = self.digits
        )
    }
}

/// The UTM zone a position naturally falls in (with the Norway/Svalbard
/// exceptions), without requiring a full MGRS encode.
pub fn natural_zone(pos: GeoPosition) -> u8 {
    utm::zone_for(pos.lat(), pos.lon())
}

fn column_set(zone: u8) -> &'static [u8] {
    COLUMN_SETS[(zone % 3) as usize]
}

/// Row lettering starts at A in odd zones and F in even zones.
fn row_offset(zone: u8) -> usize {
    if zone % 2 == 0 { 5 } else { 0 }
}

fn band_for(lat: f64) -> Result<char> {
    if !(-80.0..=84.0).contains(&lat) {
        return Err(NavError::Range(format!(
            "latitude {lat} outside MGRS bands (80°S–84°N)"
        )));
    }
    let idx = (((lat + 80.0) / 8.0).floor() as isize).clamp(0, 19) as usize;
    Ok(BAND_LETTERS[idx] as char)
}

fn band_lower_lat(band: char) -> f64 {
    let idx = BAND_LETTERS
        .iter()
        .position(|&b| b == band as u8)
        .unwrap_or_default();
    idx as f64 * 8.0 - 80.0
}

fn is_northern(band: char) -> bool {
    band >= 'N'
}

/// Lowest full-square northing of a latitude band, used to resolve the
/// 2,000 km row-letter ambiguity.
fn min_northing_base(zone: u8, band: char) -> f64 {
    let (_, n) = utm::forward(band_lower_lat(band), utm::central_meridian(zone), zone);
    (n / SQUARE).floor() * SQUARE
}
