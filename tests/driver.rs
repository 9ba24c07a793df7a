//! Validates the background preview driver: completion callbacks and
//! last-writer-wins request replacement

use std::sync::Arc;
use std::sync::mpsc;
use std::time::Duration;
use stereogrammer::algorithm::options::{Options, Oversample};
use stereogrammer::buffers::{DepthMap, Texture};
use stereogrammer::driver::{PreviewDriver, PreviewEvent, PreviewRequest};

fn small_options(resolution_x: u32) -> Options {
    Options {
        resolution_x,
        resolution_y: 24,
        separation: 12.0,
        oversample: Oversample::X1,
        preserve_aspect_ratio: false,
        ..Options::default()
    }
}

fn inputs() -> (Arc<DepthMap>, Texture) {
    let Ok(depth) = DepthMap::flat(64, 24, 128) else {
        unreachable!("flat depth map has non-zero dimensions");
    };
    let Ok(texture) = Texture::grey_dots(12, 24) else {
        unreachable!("dot texture has non-zero dimensions");
    };
    (Arc::new(depth), texture)
}

#[test]
fn test_preview_driver_delivers_a_completed_stereogram() {
    let (sender, receiver) = mpsc::channel();
    let driver = PreviewDriver::new(move |event| {
        let _ = sender.send(event);
    });

    let (depthmap, texture) = inputs();
    driver.request(PreviewRequest::new(small_options(64), depthmap, texture));

    match receiver.recv_timeout(Duration::from_secs(10)) {
        Ok(PreviewEvent::Completed(stereogram)) => {
            assert_eq!((stereogram.width(), stereogram.height()), (64, 24));
        }
        _ => unreachable!("the driver must deliver a completed preview"),
    }
}

#[test]
fn test_newer_request_supersedes_a_delayed_one() {
    let (sender, receiver) = mpsc::channel();
    let driver = PreviewDriver::new(move |event| {
        let _ = sender.send(event);
    });

    let (depthmap, texture) = inputs();

    // The delayed request should be discarded before it starts
    driver.request(PreviewRequest::delayed(
        small_options(48),
        Arc::clone(&depthmap),
        texture.clone(),
        Duration::from_millis(400),
    ));
    driver.request(PreviewRequest::new(small_options(96), depthmap, texture));

    match receiver.recv_timeout(Duration::from_secs(10)) {
        Ok(PreviewEvent::Completed(stereogram)) => {
            assert_eq!(
                stereogram.width(),
                96,
                "only the superseding request may generate"
            );
        }
        _ => unreachable!("the superseding request must complete"),
    }

    // The superseded request must never surface
    assert!(
        receiver.recv_timeout(Duration::from_millis(600)).is_err(),
        "the delayed request was replaced and must not generate"
    );
}

#[test]
fn test_failed_generation_is_reported_distinctly() {
    let (sender, receiver) = mpsc::channel();
    let driver = PreviewDriver::new(move |event| {
        let _ = sender.send(event);
    });

    let (depthmap, texture) = inputs();
    let options = Options {
        algorithm: stereogrammer::algorithm::Algorithm::Techmind,
        ..small_options(64)
    };
    driver.request(PreviewRequest::new(options, depthmap, texture));

    match receiver.recv_timeout(Duration::from_secs(10)) {
        Ok(PreviewEvent::Failed(_)) => {}
        _ => unreachable!("an unimplemented variant must surface as a failure"),
    }
}
