//! EXIF-style GPS coordinate conversion
//!
//! Embedded coordinates arrive as degree/minute/second triples plus a
//! hemisphere reference flag; decoders use these helpers to hand the core a
//! signed decimal-degree `GeoPoint`.

use ecoverify_core::GeoPoint;

/// Degree/minute/second triple to decimal degrees
pub fn dms_to_decimal(degrees: f64, minutes: f64, seconds: f64) -> f64 {
    degrees + minutes / 60.0 + seconds / 3600.0
}

/// Sign-correct a DMS triple by its hemisphere reference (`N`/`S`/`E`/`W`)
pub fn signed_degrees(degrees: f64, minutes: f64, seconds: f64, hemisphere: char) -> f64 {
    let value = dms_to_decimal(degrees, minutes, seconds);
    match hemisphere.to_ascii_uppercase() {
        'S' | 'W' => -value,
        _ => value,
    }
}

/// Build a `GeoPoint` from latitude and longitude DMS triples with their
/// hemisphere flags
pub fn point_from_dms(
    lat: (f64, f64, f64),
    lat_ref: char,
    lon: (f64, f64, f64),
    lon_ref: char,
) -> GeoPoint {
    GeoPoint::new(
        signed_degrees(lat.0, lat.1, lat.2, lat_ref),
        signed_degrees(lon.0, lon.1, lon.2, lon_ref),
    )
}
