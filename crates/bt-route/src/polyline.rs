//! Encoded-polyline decoding.
//!
//! Directions services ship route geometry as an encoded polyline: each
//! coordinate is a zig-zag, 5-bit-chunked delta from the previous one,
//! offset into printable ASCII (`'?'..='~'`).  Decoding happens here, at the
//! provider boundary; the rest of the workspace only sees `GeoPoint`s.

use bt_core::GeoPoint;

use crate::{RouteError, RouteResult};

/// Printable offset added to every 5-bit chunk.
const CHUNK_OFFSET: u8 = 63;

/// Continuation flag in a decoded chunk.
const CONTINUATION: i64 = 0x20;

/// Decode a polyline encoded with the standard 1e5 precision.
pub fn decode(encoded: &str) -> RouteResult<Vec<GeoPoint>> {
    decode_with_precision(encoded, 5)
}

/// Decode a polyline whose coordinates were scaled by `10^precision`
/// (5 for Google, 6 for OSRM/Valhalla `polyline6`).
///
/// # Errors
///
/// [`RouteError::Polyline`] with the byte offset of the first character
/// outside the encoding alphabet, or of the end of input when a value is
/// truncated mid-sequence.
pub fn decode_with_precision(encoded: &str, precision: u32) -> RouteResult<Vec<GeoPoint>> {
    let factor = 10f64.powi(precision as i32);
    let bytes = encoded.as_bytes();

    let mut pos = 0;
    let mut lat: i64 = 0;
    let mut lon: i64 = 0;
    let mut points = Vec::with_capacity(bytes.len() / 4);

    while pos < bytes.len() {
        lat += next_delta(bytes, &mut pos)?;
        lon += next_delta(bytes, &mut pos)?;
        points.push(GeoPoint::new(lat as f64 / factor, lon as f64 / factor));
    }
    Ok(points)
}

/// Read one zig-zag encoded signed delta starting at `*pos`.
fn next_delta(bytes: &[u8], pos: &mut usize) -> RouteResult<i64> {
    let mut result: i64 = 0;
    let mut shift = 0u32;
    loop {
        let Some(&b) = bytes.get(*pos) else {
            return Err(RouteError::Polyline(*pos));
        };
        if !(CHUNK_OFFSET..=b'~').contains(&b) || shift > 60 {
            return Err(RouteError::Polyline(*pos));
        }
        let chunk = (b - CHUNK_OFFSET) as i64;
        *pos += 1;

        result |= (chunk & 0x1f) << shift;
        shift += 5;
        if chunk < CONTINUATION {
            break;
        }
    }
    Ok(if result & 1 != 0 { !(result >> 1) } else { result >> 1 })
}
