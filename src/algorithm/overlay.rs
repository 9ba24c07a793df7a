//! Convergence guide overlay
//!
//! Two small dots at the correct separation give the viewer something to
//! converge on before the depth illusion locks in. Drawn after any
//! downsampling, so all geometry is in final output pixels.

use crate::io::configuration::{
    CONVERGENCE_DOT_HEIGHT_DIVISOR, CONVERGENCE_DOT_MIN_RADIUS, CONVERGENCE_DOT_RADIUS_DIVISOR,
};
use image::{Rgba, RgbaImage};

/// Draw the two convergence dots onto a finished stereogram
///
/// Opaque black filled circles of radius `max(2, separation / 16)`,
/// vertically at one sixteenth of the image height, horizontally centred
/// half a separation either side of the midpoint.
pub fn draw_convergence_dots(image: &mut RgbaImage, separation: f64) {
    let radius = (separation / CONVERGENCE_DOT_RADIUS_DIVISOR).max(CONVERGENCE_DOT_MIN_RADIUS);
    let midpoint = f64::from(image.width()) / 2.0;
    let cy = f64::from(image.height()) / CONVERGENCE_DOT_HEIGHT_DIVISOR;

    for cx in [midpoint - separation / 2.0, midpoint + separation / 2.0] {
        fill_circle(image, cx, cy, radius);
    }
}

// Scanline fill of an opaque black disc, clipped to the image bounds
fn fill_circle(image: &mut RgbaImage, cx: f64, cy: f64, radius: f64) {
    let x_min = ((cx - radius).floor().max(0.0)) as u32;
    let x_max = ((cx + radius).ceil().min(f64::from(image.width()) - 1.0)).max(0.0) as u32;
    let y_min = ((cy - radius).floor().max(0.0)) as u32;
    let y_max = ((cy + radius).ceil().min(f64::from(image.height()) - 1.0)).max(0.0) as u32;

    let r_squared = radius * radius;
    for y in y_min..=y_max {
        for x in x_min..=x_max {
            let dx = f64::from(x) - cx;
            let dy = f64::from(y) - cy;
            if dx * dx + dy * dy <= r_squared {
                image.put_pixel(x, y, Rgba([0, 0, 0, 255]));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dots_are_opaque_black_at_the_expected_centres() {
        let mut image = RgbaImage::from_pixel(256, 128, Rgba([255, 255, 255, 255]));
        draw_convergence_dots(&mut image, 64.0);

        // Centres at 128 -/+ 32, y = 128 / 16 = 8
        assert_eq!(image.get_pixel(96, 8).0, [0, 0, 0, 255]);
        assert_eq!(image.get_pixel(160, 8).0, [0, 0, 0, 255]);
        // Far corner untouched
        assert_eq!(image.get_pixel(0, 127).0, [255, 255, 255, 255]);
    }

    #[test]
    fn test_tiny_separation_still_draws_a_two_pixel_dot() {
        let mut image = RgbaImage::from_pixel(64, 64, Rgba([255, 255, 255, 255]));
        draw_convergence_dots(&mut image, 8.0);

        // Radius floor is 2: one pixel either side of the centre is filled
        assert_eq!(image.get_pixel(28, 4).0, [0, 0, 0, 255]);
        assert_eq!(image.get_pixel(29, 4).0, [0, 0, 0, 255]);
        assert_eq!(image.get_pixel(36, 4).0, [0, 0, 0, 255]);
    }
}
