//! Encoded polyline decoding (precision 5)

/// Decode an encoded polyline into `[lng, lat]` positions.
///
/// Returns `None` when the input ends inside a value, contains bytes
/// outside the encoding alphabet, or accumulates past the `i64` range.
pub fn decode_polyline(encoded: &str) -> Option<Vec<[f64; 2]>> {
    let bytes = encoded.as_bytes();
    let mut index = 0;
    let mut lat: i64 = 0;
    let mut lng: i64 = 0;
    let mut positions = Vec::new();

    while index < bytes.len() {
        lat = lat.checked_add(next_delta(bytes, &mut index)?)?;
        lng = lng.checked_add(next_delta(bytes, &mut index)?)?;
        positions.push([lng as f64 / 1e5, lat as f64 / 1e5]);
    }

    Some(positions)
}

fn next_delta(bytes: &[u8], index: &mut usize) -> Option<i64> {
    let mut result: i64 = 0;
    let mut shift = 0;

    loop {
        let chunk = i64::from(*bytes.get(*index)?) - 63;
        *index += 1;
        if !(0..64).contains(&chunk) || shift > 60 {
            return None;
        }

        result |= (chunk & 0x1f) << shift;
        shift += 5;
        if chunk < 0x20 {
            break;
        }
    }

    Some(if result & 1 == 1 { !(result >> 1) } else { result >> 1 })
}
