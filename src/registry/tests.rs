use super::*;
use crate::color::to_gray;
use crate::image::codec::encode;
use crate::image::Bgr;
use std::thread;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn gradient_image(w: usize, h: usize) -> RasterImage {
    RasterImage::from_fn(w, h, |x, y| {
        Bgr::new((x * 255 / w.max(1)) as u8, (y * 255 / h.max(1)) as u8, 90)
    })
}

#[test]
fn default_registry_lists_catalog_order() {
    let registry = TransformRegistry::new();
    assert_eq!(
        registry.list_operations(),
        vec![
            "Canny Edge Detection",
            "Contour And Shape",
            "K-Means",
            "Gaussian Blur",
            "Median Blur",
            "ORB Features",
            "Detect Circles",
        ]
    );
}

#[test]
fn unknown_name_fails_before_decoding() {
    init_logger();
    let registry = TransformRegistry::new();
    // garbage bytes would be a DecodeFailure if they were ever decoded
    let err = registry.execute("nonexistent-name", b"not an image").unwrap_err();
    assert_eq!(err, CatalogError::UnknownOperation("nonexistent-name".to_string()));
}

#[test]
fn disabled_operation_is_unknown() {
    let registry = TransformRegistry::new();
    let bytes = encode(&gradient_image(8, 8)).unwrap();
    let err = registry.execute("DFT", &bytes).unwrap_err();
    assert!(matches!(err, CatalogError::UnknownOperation(name) if name == "DFT"));
    assert!(matches!(
        registry.apply(Operation::Histogram, gradient_image(4, 4)),
        Err(CatalogError::UnknownOperation(_))
    ));
}

#[test]
fn bad_bytes_are_a_decode_failure() {
    let registry = TransformRegistry::new();
    let err = registry.execute("Gaussian Blur", &[1, 2, 3, 4]).unwrap_err();
    assert!(matches!(err, CatalogError::DecodeFailure(_)));
}

#[test]
fn zero_area_raster_is_rejected() {
    let registry = TransformRegistry::new();
    let err = registry
        .apply(Operation::GaussianBlur, RasterImage::new(0, 5))
        .unwrap_err();
    assert!(matches!(err, CatalogError::InvalidParameters(_)));
}

#[test]
fn every_operation_preserves_dimensions() {
    init_logger();
    let registry = TransformRegistry::with_config(RegistryConfig::all_operations());
    let src = gradient_image(37, 29);
    for &op in registry.operations() {
        let out = registry.apply(op, src.clone()).unwrap();
        assert_eq!((out.width(), out.height()), (37, 29), "{op}");
    }
}

#[test]
fn execute_round_trips_through_bmp() {
    let registry = TransformRegistry::with_config(RegistryConfig::default().with_enabled(Operation::TestLoop));
    let src = gradient_image(13, 7);
    let bytes = encode(&src).unwrap();
    let (out, report) = registry.execute_with_report("Test Loop", &bytes).unwrap();
    assert_eq!(decode(&out).unwrap(), src);
    assert_eq!(report.operation, Operation::TestLoop);
    assert_eq!((report.width, report.height), (13, 7));
    let labels: Vec<&str> = report.timing.stages.iter().map(|s| s.label.as_str()).collect();
    assert_eq!(labels, vec!["decode", "kernel", "encode"]);
}

#[test]
fn uniform_gray_is_fixed_by_gaussian_blur() {
    let registry = TransformRegistry::new();
    let src = RasterImage::filled(64, 64, Bgr::gray(117));
    let bytes = encode(&src).unwrap();
    let out = decode(&registry.execute("Gaussian Blur", &bytes).unwrap()).unwrap();
    assert_eq!(out, src);
}

#[test]
fn flow_state_is_owned_by_the_registry() {
    let registry = TransformRegistry::with_config(RegistryConfig::default().with_enabled(Operation::OpticalFlow));
    let a = gradient_image(24, 24);
    let first = registry.apply(Operation::OpticalFlow, a.clone()).unwrap();
    assert_eq!(first, RasterImage::new(24, 24));

    let shifted = RasterImage::from_fn(24, 24, |x, y| a.pixel(x.saturating_sub(1), y));
    let second = registry.apply(Operation::OpticalFlow, shifted).unwrap();
    assert_eq!((second.width(), second.height()), (24, 24));

    registry.reset_flow();
    let after_reset = registry.apply(Operation::OpticalFlow, a).unwrap();
    assert_eq!(after_reset, RasterImage::new(24, 24));
}

#[test]
fn config_params_reach_the_kernels() {
    let mut config = RegistryConfig::default();
    config.params.median.ksize = 4;
    let registry = TransformRegistry::with_config(config);
    assert_eq!(registry.params().median.ksize, 4);
    let err = registry
        .apply(Operation::MedianBlur, gradient_image(10, 10))
        .unwrap_err();
    assert!(matches!(err, CatalogError::InvalidParameters(_)));
}

#[test]
fn registry_is_shareable_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<TransformRegistry>();
}

#[test]
fn concurrent_flow_calls_leave_one_submitted_frame() {
    let registry = TransformRegistry::with_config(RegistryConfig::default().with_enabled(Operation::OpticalFlow));
    let frames: Vec<RasterImage> = (0..6)
        .map(|i| RasterImage::from_fn(20, 16, |x, y| Bgr::gray(((x * 9 + y * 5 + i * 31) % 256) as u8)))
        .collect();

    thread::scope(|s| {
        for frame in &frames {
            let registry = &registry;
            s.spawn(move || {
                for _ in 0..3 {
                    let out = registry.apply(Operation::OpticalFlow, frame.clone()).unwrap();
                    assert_eq!((out.width(), out.height()), (20, 16));
                }
            });
        }
    });

    let cache = registry.flow_cache.lock().unwrap();
    let last = cache.previous().expect("cache holds a frame");
    assert!(frames.iter().any(|f| to_gray(f) == *last));
}
