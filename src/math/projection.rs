//! Stereo separation and horopter geometry
//!
//! Depth values are normalized floats in [0, 1], 0 at the far plane and 1
//! nearest the viewer. The image plane is addressed in working (possibly
//! oversampled) pixels throughout.

use crate::io::configuration::HOROPTER_RADIUS_FACTOR;

/// Stereo separation in pixels of a point at normalized depth `z`
///
/// `z` is clamped to [0, 1] before evaluation. At `z = 0` the result equals
/// `separation`; it decreases strictly as `z` rises for any field depth in
/// (0, 1].
pub fn stereo_separation(z: f64, field_depth: f64, separation: f64) -> f64 {
    let z = z.clamp(0.0, 1.0);
    (1.0 - field_depth * z) * (2.0 * separation) / (2.0 - field_depth * z)
}

/// Depth of the horopter at horizontal offset `i` from the row midpoint
///
/// The horopter is approximated as a sphere of radius
/// `HOROPTER_RADIUS_FACTOR * separation` centred on the viewer; the result
/// is scaled to [0, 1] as a displacement from the far plane. Offsets beyond
/// the sphere radius clamp to the far plane rather than going imaginary.
pub fn horopter_depth(i: usize, midpoint: usize, separation: f64) -> f64 {
    let radius = HOROPTER_RADIUS_FACTOR * separation;
    let dx = i.abs_diff(midpoint) as f64;
    1.0 - (radius * radius - dx * dx).max(0.0).sqrt() / radius
}

/// Slope of the line of sight through a point at normalized depth `z`
///
/// Used by the hidden-surface walk: the sight line advances by this much
/// depth per horizontal pixel stepped away from the point.
pub fn sight_line_slope(z: f64, field_depth: f64, separation: f64) -> f64 {
    2.0 * (2.0 - field_depth * z) / (field_depth * separation * 2.0)
}
