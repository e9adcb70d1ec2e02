//! Page and limit normalization.
//!
//! Two policies coexist on purpose. The initiate path snaps limits onto a
//! fixed allowed set; the listing endpoints use a plain clamp with
//! per-resource defaults. Both mirror their existing call sites exactly.

/// Limits a client may request on the initiate path.
pub const ALLOWED_LIMITS: [i64; 4] = [10, 20, 50, 100];

/// Initiate-path page: floor to an integer, default 1 when absent,
/// unparseable or below 1.
pub fn normalize_page(raw: Option<&str>) -> i64 {
    match raw.and_then(|s| s.trim().parse::<f64>().ok()) {
        Some(n) if n.is_finite() && n.floor() >= 1.0 => n.floor() as i64,
        _ => 1,
    }
}

/// Initiate-path limit: always a member of [`ALLOWED_LIMITS`].
///
/// Absent, unparseable or non-positive input defaults to 10. Otherwise the
/// floored value clamps into [10, 100] and snaps to the numerically nearest
/// member; ties resolve toward the earlier member in declaration order.
pub fn normalize_limit(raw: Option<&str>) -> i64 {
    let floored = match raw.and_then(|s| s.trim().parse::<f64>().ok()) {
        Some(n) if n.is_finite() && n.floor() > 0.0 => n.floor() as i64,
        _ => return 10,
    };
    let clamped = floored.clamp(10, 100);
    let mut nearest = ALLOWED_LIMITS[0];
    let mut nearest_distance = (clamped - nearest).abs();
    for candidate in ALLOWED_LIMITS.into_iter().skip(1) {
        let distance = (clamped - candidate).abs();
        if distance < nearest_distance {
            nearest = candidate;
            nearest_distance = distance;
        }
    }
    nearest
}

/// Listing-path page: default 1, floor at 1.
pub fn clamp_page(raw: Option<&str>) -> i64 {
    match raw.and_then(|s| s.trim().parse::<i64>().ok()) {
        Some(n) => n.max(1),
        None => 1,
    }
}

/// Listing-path per-page: `min(max(input, 1), max)`, falling back to the
/// resource default when absent or unparseable.
pub fn clamp_per_page(raw: Option<&str>, default: i64, max: i64) -> i64 {
    match raw.and_then(|s| s.trim().parse::<i64>().ok()) {
        Some(n) => n.max(1).min(max),
        None => default,
    }
}
