//! Validates stereogram export, including parent directory creation

use image::RgbaImage;
use std::sync::Arc;
use stereogrammer::algorithm::generator::{Outcome, StereogramGenerator};
use stereogrammer::algorithm::options::{Options, Oversample};
use stereogrammer::buffers::{DepthMap, Texture};
use stereogrammer::io::image::{export_stereogram, load_depthmap};
use stereogrammer::io::progress::GenerationProgress;

#[test]
fn test_export_creates_directories_and_round_trips_through_png() {
    let Ok(depth) = DepthMap::flat(48, 24, 100) else {
        unreachable!("flat depth map has non-zero dimensions");
    };
    let Ok(texture) = Texture::from_image(RgbaImage::from_fn(12, 12, |x, y| {
        image::Rgba([(x * 20) as u8, (y * 20) as u8, 60, 255])
    })) else {
        unreachable!("texture has non-zero dimensions");
    };

    let options = Options {
        resolution_x: 48,
        resolution_y: 24,
        separation: 12.0,
        oversample: Oversample::X1,
        preserve_aspect_ratio: false,
        ..Options::default()
    };

    let Ok(generator) = StereogramGenerator::new(options, Arc::new(depth), &texture) else {
        unreachable!("options are valid");
    };
    let Ok(Outcome::Complete(stereogram)) = generator.generate(&GenerationProgress::new()) else {
        unreachable!("synthesis must complete");
    };

    let Ok(dir) = tempfile::tempdir() else {
        unreachable!("temp directory creation must succeed");
    };
    let output = dir.path().join("nested/out.png");

    assert!(export_stereogram(&stereogram, &output).is_ok());
    assert!(output.exists(), "export must create the parent directory");

    // The PNG decodes back to a grayscale-compatible depth-sized image
    let Ok(reloaded) = load_depthmap(&output) else {
        unreachable!("the exported PNG must decode");
    };
    assert_eq!((reloaded.width(), reloaded.height()), (48, 24));
}

#[test]
fn test_loading_a_missing_file_reports_the_path() {
    let error = match load_depthmap(std::path::Path::new("does/not/exist.png")) {
        Err(e) => e.to_string(),
        Ok(_) => unreachable!("loading a missing file must fail"),
    };
    assert!(
        error.contains("exist.png"),
        "the error message must name the file, got: {error}"
    );
}
