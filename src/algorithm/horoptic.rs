//! Horoptic constraint-propagation row algorithm
//!
//! Each row is solved independently. Pixels are visited center-out so an
//! occluder is always processed before anything it can hide, and each
//! visible depth sample links the outer of its two eye pixels to the inner
//! one. Chains therefore always point inward, which rules out cycles; the
//! chain walk is still bounded defensively and a bound violation is treated
//! as a fatal defect.

use crate::algorithm::generator::FrameBuffers;
use crate::algorithm::variants::RowAlgorithm;
use crate::io::error::{Result, invariant_violation};
use crate::math::projection;

/// Geometry of one synthesis shared by every row
#[derive(Debug, Clone, Copy)]
pub struct HoropticParams {
    /// Working row width in pixels
    pub line_width: usize,
    /// Index of the row midpoint
    pub midpoint: usize,
    /// Eye separation in working pixels
    pub separation: f64,
    /// Depth of field in [0, 1]
    pub field_depth: f64,
    /// Discard points occluded along the line of sight
    pub remove_hidden_surfaces: bool,
}

/// Constraint links for one solved row
#[derive(Debug)]
pub struct RowConstraints {
    /// Per-pixel link; a pixel linking to itself is unconstrained
    pub links: Vec<usize>,
    /// Pixels discarded by the hidden-surface test
    pub hidden: usize,
}

/// Horoptic row algorithm with its precomputed traversal order
#[derive(Debug)]
pub struct HoropticRows {
    params: HoropticParams,
    centre_out: Vec<usize>,
}

impl HoropticRows {
    /// Build the algorithm for a fixed line geometry
    ///
    /// Precomputes the center-out traversal order: index 0 is the midpoint
    /// and processing alternates outward left and right by increasing
    /// distance. The order is fixed per line width and reused across rows.
    pub fn new(params: HoropticParams) -> Self {
        let mut centre_out = Vec::with_capacity(params.line_width);
        let mut offset = params.midpoint as isize;
        let mut flip = -1isize;
        for i in 0..params.line_width {
            centre_out.push(offset.max(0) as usize);
            offset += (i as isize + 1) * flip;
            flip = -flip;
        }
        Self { params, centre_out }
    }

    /// The fixed center-out traversal order
    pub fn centre_out(&self) -> &[usize] {
        &self.centre_out
    }

    /// Solve the constraint links for one row of normalized depths
    ///
    /// # Errors
    ///
    /// Returns `InvariantViolation` if `depth_line` does not match the line
    /// width or a constraint chain fails to terminate within the hop bound.
    pub fn solve_row(&self, depth_line: &[f32]) -> Result<RowConstraints> {
        let p = &self.params;
        if depth_line.len() != p.line_width {
            return Err(invariant_violation(
                "row solve",
                &format!(
                    "depth line has {} samples for line width {}",
                    depth_line.len(),
                    p.line_width
                ),
            ));
        }

        let mut links: Vec<usize> = (0..p.line_width).collect();
        let mut hidden = 0usize;
        let mut max_depth = 0.0f32;

        for &i in &self.centre_out {
            let z = depth_line.get(i).copied().unwrap_or(0.0);

            // Horopter depth at this pixel; divide by the field depth since
            // the horopter is independent of it but the separation model is not
            let zh = projection::horopter_depth(i, p.midpoint, p.separation);
            let s = projection::stereo_separation(
                f64::from(z) - zh / p.field_depth,
                p.field_depth,
                p.separation,
            )
            .round() as isize;

            // Image-plane pixels seen by the left and right eye
            let left = i as isize - s / 2;
            let right = left + s;

            if left < 0 || right >= p.line_width as isize {
                continue;
            }
            let left = left.max(0) as usize;
            let right = right.max(0) as usize;

            let visible =
                !p.remove_hidden_surfaces || self.sight_line_clear(depth_line, i, z, max_depth);

            if visible {
                // Constrain the outermost pixel to the innermost one; with
                // the center-out visit order this keeps chains acyclic
                let constrainee = outermost(left, right, p.midpoint);
                let constrainer = if constrainee == left { right } else { left };
                let root = follow_chain(&links, constrainer)?;
                if let Some(link) = links.get_mut(constrainee) {
                    *link = root;
                }
            } else {
                hidden += 1;
            }

            // Points can only be hidden by a point closer to the center,
            // i.e. one already processed
            if z > max_depth {
                max_depth = z;
            }
        }

        Ok(RowConstraints { links, hidden })
    }

    /// Walk the line of sight outward from `i`, checking both neighbors
    ///
    /// Returns false as soon as either neighbor's depth reaches the
    /// advancing sight depth. The walk stops once the sight depth passes
    /// the maximum depth seen so far on this row, or at the image edge
    /// where nothing remains to occlude.
    fn sight_line_clear(&self, depth_line: &[f32], i: usize, z: f32, max_depth: f32) -> bool {
        let p = &self.params;
        let delta = projection::sight_line_slope(f64::from(z), p.field_depth, p.separation);
        let mut zt = f64::from(z);
        let mut t = 1usize;
        loop {
            zt += delta;
            let left = i.checked_sub(t).and_then(|x| depth_line.get(x));
            let right = depth_line.get(i + t);
            let (Some(&dl), Some(&dr)) = (left, right) else {
                return true;
            };
            if f64::from(dl) >= zt || f64::from(dr) >= zt {
                return false;
            }
            if zt >= f64::from(max_depth) {
                return true;
            }
            t += 1;
        }
    }
}

impl RowAlgorithm for HoropticRows {
    fn process_row(&self, y: usize, frame: &FrameBuffers<'_>, row: &mut [u8]) -> Result<usize> {
        let depth_line = frame.sample_depth_row(y, self.params.line_width);
        let constraints = self.solve_row(&depth_line)?;

        let texture = frame.texture;
        let tex_width = texture.width() as usize;
        let tex_height = texture.height() as usize;

        for (i, pixel) in row.chunks_exact_mut(4).enumerate() {
            let root = follow_chain(&constraints.links, i)?;
            let tx = ((root + self.params.midpoint) % tex_width) as u32;
            let ty = (y % tex_height) as u32;
            pixel.copy_from_slice(&texture.get_pixel(tx, ty).0);
        }

        Ok(constraints.hidden)
    }
}

/// Follow a constraint chain to its root
///
/// Chains built by the center-out direction rule terminate in well under
/// `links.len()` hops; exceeding that bound means the links contain a cycle
/// and the synthesis is defective.
///
/// # Errors
///
/// Returns `InvariantViolation` when the hop bound is exceeded.
pub fn follow_chain(links: &[usize], start: usize) -> Result<usize> {
    let mut index = start;
    for _ in 0..=links.len() {
        let next = links.get(index).copied().unwrap_or(index);
        if next == index {
            return Ok(index);
        }
        index = next;
    }
    Err(invariant_violation(
        "constraint chain",
        &format!("no root within {} hops from pixel {start}", links.len()),
    ))
}

// Which of two values is furthest from a midpoint (ties go to the second)
const fn outermost(a: usize, b: usize, midpoint: usize) -> usize {
    if a.abs_diff(midpoint) > b.abs_diff(midpoint) {
        a
    } else {
        b
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centre_out_order_starts_at_midpoint_and_covers_the_line() {
        let rows = HoropticRows::new(HoropticParams {
            line_width: 8,
            midpoint: 4,
            separation: 128.0,
            field_depth: 0.3333,
            remove_hidden_surfaces: false,
        });

        let order = rows.centre_out();
        assert_eq!(order.first().copied(), Some(4));

        let mut seen: Vec<usize> = order.to_vec();
        seen.sort_unstable();
        assert_eq!(seen, (0..8).collect::<Vec<_>>());
    }

    #[test]
    fn test_follow_chain_detects_cycles() {
        // 0 -> 1 -> 0 is impossible under the direction rule; the walk must
        // fail rather than spin
        let links = vec![1usize, 0];
        assert!(follow_chain(&links, 0).is_err());
    }

    #[test]
    fn test_outermost_prefers_the_farther_pixel() {
        assert_eq!(outermost(2, 9, 5), 9);
        assert_eq!(outermost(0, 9, 5), 0);
        // Equidistant pixels resolve to the second argument
        assert_eq!(outermost(3, 7, 5), 7);
    }
}
