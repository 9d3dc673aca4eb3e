use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use refmatch::{PreprocessConfig, Preprocessor, RefMatchError};
use std::io::Cursor;

fn encode(img: RgbImage, format: ImageFormat) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(img).write_to(&mut buf, format).unwrap();
    buf.into_inner()
}

fn gradient(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
    })
}

#[test]
fn empty_input_is_a_format_error() {
    let pre = Preprocessor::default();
    let err = pre.normalize(b"").err().unwrap();
    match err {
        RefMatchError::ImageFormat { reason } => assert!(reason.contains("empty image data")),
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn truncated_png_is_a_format_error() {
    let bytes = encode(gradient(64, 64), ImageFormat::Png);
    let pre = Preprocessor::default();
    let err = pre.normalize(&bytes[..20]).err().unwrap();
    match err {
        RefMatchError::ImageFormat { reason } => {
            assert!(reason.contains("decode failed or unsupported format"))
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn garbage_bytes_are_a_format_error() {
    let pre = Preprocessor::default();
    let err = pre.normalize(&[0x13u8; 256]).err().unwrap();
    assert!(matches!(err, RefMatchError::ImageFormat { .. }));
}

#[test]
fn landscape_image_is_bounded_to_max_dimension() {
    let bytes = encode(gradient(1024, 600), ImageFormat::Png);
    let raster = Preprocessor::default().normalize(&bytes).unwrap();
    assert_eq!((raster.width(), raster.height()), (512, 300));
}

#[test]
fn portrait_image_keeps_aspect_ratio() {
    let bytes = encode(gradient(700, 1000), ImageFormat::Png);
    let raster = Preprocessor::default().normalize(&bytes).unwrap();
    assert_eq!(raster.height(), 512);
    assert_eq!(raster.width(), 358);
    let aspect_in = 700.0 / 1000.0;
    let aspect_out = raster.width() as f64 / raster.height() as f64;
    assert!((aspect_in - aspect_out).abs() < 1.0 / 512.0);
}

#[test]
fn small_images_are_not_upscaled() {
    let bytes = encode(gradient(40, 30), ImageFormat::Png);
    let raster = Preprocessor::default().normalize(&bytes).unwrap();
    assert_eq!((raster.width(), raster.height()), (40, 30));
}

#[test]
fn custom_max_dimension_is_honoured() {
    let pre = Preprocessor::new(PreprocessConfig { max_dimension: 100 }).unwrap();
    let bytes = encode(gradient(300, 150), ImageFormat::Png);
    let raster = pre.normalize(&bytes).unwrap();
    assert_eq!((raster.width(), raster.height()), (100, 50));
}

#[test]
fn zero_max_dimension_is_rejected() {
    let err = Preprocessor::new(PreprocessConfig { max_dimension: 0 })
        .err()
        .unwrap();
    assert!(matches!(err, RefMatchError::InvalidConfig { .. }));
}

#[test]
fn color_is_converted_with_luminance_weights() {
    let red = RgbImage::from_pixel(8, 8, Rgb([255, 0, 0]));
    let raster = Preprocessor::default()
        .normalize(&encode(red, ImageFormat::Png))
        .unwrap();
    assert!(raster.data().iter().all(|&v| v == 76));

    let green = RgbImage::from_pixel(8, 8, Rgb([0, 255, 0]));
    let raster = Preprocessor::default()
        .normalize(&encode(green, ImageFormat::Bmp))
        .unwrap();
    assert!(raster.data().iter().all(|&v| v == 150));
}

#[test]
fn uniform_image_stays_uniform_after_downscale() {
    let gray = RgbImage::from_pixel(2000, 1000, Rgb([90, 90, 90]));
    let raster = Preprocessor::default()
        .normalize(&encode(gray, ImageFormat::Png))
        .unwrap();
    assert_eq!((raster.width(), raster.height()), (512, 256));
    assert!(raster.data().iter().all(|&v| v == 90));
}
