//! WGS84 Universal Transverse Mercator projection.
//!
//! Forward/inverse series per USGS Professional Paper 1395 (Snyder).
//! Accuracy is well under a meter inside a zone, which is finer than the
//! 1 m resolution of a 5-digit grid reference.

/// WGS84 semi-major axis in meters.
const SEMI_MAJOR: f64 = 6_378_137.0;
/// WGS84 flattening.
const FLATTENING: f64 = 1.0 / 298.257_223_563;
/// UTM central meridian scale factor.
const K0: f64 = 0.9996;
/// False easting applied to every zone.
const FALSE_EASTING: f64 = 500_000.0;
/// False northing applied in the southern hemisphere.
const FALSE_NORTHING: f64 = 10_000_000.0;

/// First eccentricity squared.
const E2: f64 = FLATTENING * (2.0 - FLATTENING);

/// UTM zone number for a position, including the Norway (32V) and
/// Svalbard (31X/33X/35X/37X) exceptions.
pub(crate) fn zone_for(lat: f64, lon: f64) -> u8 {
    // The antimeridian belongs to zone 1.
    let lon = if lon >= 180.0 { lon - 360.0 } else { lon };
    let mut zone = ((lon + 180.0) / 6.0).floor() as i32 + 1;
    zone = zone.clamp(1, 60);

    // Southwest Norway extension of zone 32.
    if (56.0..64.0).contains(&lat) && (3.0..12.0).contains(&lon) {
        zone = 32;
    }
    // Svalbard zones skip 32, 34 and 36.
    if (72.0..=84.0).contains(&lat) {
        if (0.0..9.0).contains(&lon) {
            zone = 31;
        } else if (9.0..21.0).contains(&lon) {
            zone = 33;
        } else if (21.0..33.0).contains(&lon) {
            zone = 35;
        } else if (33.0..42.0).contains(&lon) {
            zone = 37;
        }
    }
    zone as u8
}

/// Central meridian of a zone in degrees.
pub(crate) fn central_meridian(zone: u8) -> f64 {
    (zone as f64 - 1.0) * 6.0 - 180.0 + 3.0
}

/// Meridional arc length from the equator to `phi` (radians).
fn meridional_arc(phi: f64) -> f64 {
    let e4 = E2 * E2;
    let e6 = e4 * E2;
    SEMI_MAJOR
        * ((1.0 - E2 / 4.0 - 3.0 * e4 / 64.0 - 5.0 * e6 / 256.0) * phi
            - (3.0 * E2 / 8.0 + 3.0 * e4 / 32.0 + 45.0 * e6 / 1024.0) * (2.0 * phi).sin()
            + (15.0 * e4 / 256.0 + 45.0 * e6 / 1024.0) * (4.0 * phi).sin()
            - (35.0 * e6 / 3072.0) * (6.0 * phi).sin())
}

/// Project a position into the given UTM zone.
///
/// Returns (easting, northing) in meters. Southern-hemisphere northings
/// include the 10,000,000 m false northing, matching the convention the
/// MGRS row lettering is built on.
pub(crate) fn forward(lat: f64, lon: f64, zone: u8) -> (f64, f64) {
    let phi = lat.to_radians();
    let lambda = lon.to_radians();
    let lambda0 = central_meridian(zone).to_radians();
    let ep2 = E2 / (1.0 - E2);

    let sin_phi = phi.sin();
    let cos_phi = phi.cos();
    let tan_phi = phi.tan();

    let n = SEMI_MAJOR / (1.0 - E2 * sin_phi * sin_phi).sqrt();
    let t = tan_phi * tan_phi;
    let c = ep2 * cos_phi * cos_phi;
    let a = cos_phi * (lambda - lambda0);
    let m = meridional_arc(phi);

    let easting = K0
        * n
        * (a
            + (1.0 - t + c) * a.powi(3) / 6.0
            + (5.0 - 18.0 * t + t * t + 72.0 * c - 58.0 * ep2) * a.powi(5) / 120.0)
        + FALSE_EASTING;

    let mut northing = K0
        * (m + n
            * tan_phi
            * (a * a / 2.0
                + (5.0 - t + 9.0 * c + 4.0 * c * c) * a.powi(4) / 24.0
                + (61.0 - 58.0 * t + t * t + 600.0 * c - 330.0 * ep2) * a.powi(6) / 720.0));

    if lat < 0.0 {
        northing += FALSE_NORTHING;
    }
    (easting, northing)
}

/// Invert a UTM coordinate back to (latitude, longitude) in degrees.
///
/// `northern` selects the hemisphere; southern northings are expected to
/// carry the false northing, as produced by [`forward`].
pub(crate) fn inverse(zone: u8, easting: f64, northing: f64, northern: bool) -> (f64, f64) {
    let x = easting - FALSE_EASTING;
    let y = if northern {
        northing
    } else {
        northing - FALSE_NORTHING
    };

    let e4 = E2 * E2;
    let e6 = e4 * E2;
    let ep2 = E2 / (1.0 - E2);

    let m = y / K0;
    let mu = m / (SEMI_MAJOR * (1.0 - E2 / 4.0 - 3.0 * e4 / 64.0 - 5.0 * e6 / 256.0));
    let e1 = (1.0 - (1.0 - E2).sqrt()) / (1.0 + (1.0 - E2).sqrt());

    // Footpoint latitude.
    let phi1 = mu
        + (3.0 * e1 / 2.0 - 27.0 * e1.powi(3) / 32.0) * (2.0 * mu).sin()
        + (21.0 * e1 * e1 / 16.0 - 55.0 * e1.powi(4) / 32.0) * (4.0 * mu).sin()
        + (151.0 * e1.powi(3) / 96.0) * (6.0 * mu).sin()
        + (1097.0 * e1.powi(4) / 512.0) * (8.0 * mu).sin();

    let sin1 = phi1.sin();
    let cos1 = phi1.cos();
    let tan1 = phi1.tan();

    let c1 = ep2 * cos1 * cos1;
    let t1 = tan1 * tan1;
    let n1 = SEMI_MAJOR / (1.0 - E2 * sin1 * sin1).sqrt();
    let r1 = SEMI_MAJOR * (1.0 - E2) / (1.0 - E2 * sin1 * sin1).powf(1.5);
    let d = x / (n1 * K0);

    let lat = phi1
        - (n1 * tan1 / r1)
            * (d * d / 2.0
                - (5.0 + 3.0 * t1 + 10.0 * c1 - 4.0 * c1 * c1 - 9.0 * ep2) * d.powi(4) / 24.0
                + (61.0 + 90.0 * t1 + 298.0 * c1 + 45.0 * t1 * t1 - 252.0 * ep2 - 3.0 * c1 * c1)
                    * d.powi(6)
                    / 720.0);

    let lon = central_meridian(zone).to_radians()
        + (d - (1.0 + 2.0 * t1 + c1) * d.powi(3) / 6.0
            + (5.0 - 2.0 * c1 + 28.0 * t1 - 3.0 * c1 * c1 + 8.0 * ep2 + 24.0 * t1 * t1)
                * d.powi(5)
                / 120.0)
            / cos1;

    (lat.to_degrees(), lon.to_degrees())
}
