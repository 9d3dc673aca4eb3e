use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use refmatch::{similarity, ExtractorConfig, FeatureExtractor, RasterImage, DESCRIPTOR_BYTES};

/// Random overlapping rectangles on a flat background with mild noise.
fn make_scene(width: usize, height: usize, seed: u64) -> RasterImage {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut data = vec![rng.random::<u8>(); width * height];
    for _ in 0..60 {
        let w = rng.random_range(8..50);
        let h = rng.random_range(8..50);
        let x0 = rng.random_range(0..width - w);
        let y0 = rng.random_range(0..height - h);
        let value: u8 = rng.random();
        for y in y0..y0 + h {
            for x in x0..x0 + w {
                data[y * width + x] = value;
            }
        }
    }
    for value in data.iter_mut() {
        let noise: i16 = rng.random_range(-4..=4);
        *value = (i16::from(*value) + noise).clamp(0, 255) as u8;
    }
    RasterImage::new(data, width, height).unwrap()
}

#[test]
fn flat_raster_yields_empty_canonical_set() {
    let raster = RasterImage::new(vec![100u8; 200 * 150], 200, 150).unwrap();
    let set = FeatureExtractor::default().extract(&raster);
    assert!(set.is_empty());
    assert_eq!(set.width(), DESCRIPTOR_BYTES);
}

#[test]
fn tiny_raster_yields_empty_set() {
    let raster = RasterImage::new(vec![0u8; 1], 1, 1).unwrap();
    let (keypoints, set) = FeatureExtractor::default().detect_and_compute(&raster);
    assert!(keypoints.is_empty());
    assert!(set.is_empty());
}

#[test]
fn scene_produces_aligned_keypoints_and_descriptors() {
    let raster = make_scene(320, 240, 1);
    let (keypoints, set) = FeatureExtractor::default().detect_and_compute(&raster);
    assert!(!set.is_empty());
    assert_eq!(keypoints.len(), set.len());
    assert!(set.len() <= 1000);
    for kp in &keypoints {
        assert!(kp.x >= 0.0 && kp.x < 320.0);
        assert!(kp.y >= 0.0 && kp.y < 240.0);
        let angle = kp.angle.unwrap();
        assert!((0.0..std::f32::consts::TAU).contains(&angle));
    }
    for pair in keypoints.windows(2) {
        assert!(pair[0].response >= pair[1].response);
    }
}

#[test]
fn keypoint_cap_keeps_strongest() {
    let raster = make_scene(320, 240, 2);
    let all = FeatureExtractor::default().detect_and_compute(&raster).0;
    let capped = FeatureExtractor::new(ExtractorConfig {
        max_features: 10,
        ..ExtractorConfig::default()
    })
    .unwrap()
    .detect_and_compute(&raster)
    .0;
    assert!(all.len() > 10);
    assert_eq!(capped.len(), 10);
    assert_eq!(capped[..], all[..10]);
}

#[test]
fn zero_cap_yields_empty_set() {
    let raster = make_scene(160, 120, 3);
    let extractor = FeatureExtractor::new(ExtractorConfig {
        max_features: 0,
        ..ExtractorConfig::default()
    })
    .unwrap();
    assert!(extractor.extract(&raster).is_empty());
}

#[test]
fn extraction_is_deterministic_and_self_matches() {
    let raster = make_scene(320, 240, 4);
    let extractor = FeatureExtractor::default();
    let first = extractor.extract(&raster);
    let second = extractor.extract(&raster);
    assert_eq!(first, second);
    let score = similarity(&first, &second).unwrap();
    assert!(score > 0.9, "self-match score {score}");
}

#[test]
fn invalid_configs_are_rejected() {
    for cfg in [
        ExtractorConfig {
            fast_threshold: 0,
            ..ExtractorConfig::default()
        },
        ExtractorConfig {
            pyramid_levels: 0,
            ..ExtractorConfig::default()
        },
        ExtractorConfig {
            scale_factor: f32::INFINITY,
            ..ExtractorConfig::default()
        },
    ] {
        assert!(FeatureExtractor::new(cfg).is_err());
    }
}
