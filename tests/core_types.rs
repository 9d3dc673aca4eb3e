use refmatch::{
    DescriptorSet, ImagePyramid, ImageView, RasterImage, RefMatchError, DESCRIPTOR_BYTES,
};

#[test]
fn image_view_rejects_invalid_dimensions() {
    let data = [0u8; 4];

    let err = ImageView::from_slice(&data, 0, 1).err().unwrap();
    assert_eq!(
        err,
        RefMatchError::InvalidDimensions {
            width: 0,
            height: 1,
        }
    );
}

#[test]
fn image_view_rejects_small_buffer() {
    let small = [0u8; 3];
    let err = ImageView::from_slice(&small, 2, 2).err().unwrap();
    assert_eq!(err, RefMatchError::BufferTooSmall { needed: 4, got: 3 });

    let data = [7u8; 6];
    let view = ImageView::from_slice(&data, 3, 2).unwrap();
    assert_eq!((view.width(), view.height()), (3, 2));
}

#[test]
fn raster_requires_exact_buffer() {
    let err = RasterImage::new(vec![0u8; 5], 2, 3).err().unwrap();
    assert_eq!(err, RefMatchError::BufferTooSmall { needed: 6, got: 5 });

    let err = RasterImage::new(vec![0u8; 7], 2, 3).err().unwrap();
    assert_eq!(
        err,
        RefMatchError::InvalidDimensions {
            width: 2,
            height: 3,
        }
    );

    let raster = RasterImage::new(vec![9u8; 6], 2, 3).unwrap();
    assert_eq!((raster.width(), raster.height()), (2, 3));
    assert_eq!(raster.data(), &[9u8; 6]);
}

#[test]
fn empty_descriptor_set_keeps_canonical_width() {
    let empty = DescriptorSet::empty();
    assert_eq!(empty.len(), 0);
    assert!(empty.is_empty());
    assert_eq!(empty.width(), DESCRIPTOR_BYTES);
    assert_eq!(empty.rows().count(), 0);
}

#[test]
fn descriptor_set_rejects_ragged_storage() {
    let err = DescriptorSet::from_raw(vec![0u8; 33], 32).err().unwrap();
    assert_eq!(
        err,
        RefMatchError::InvalidDescriptorData { len: 33, width: 32 }
    );
    let err = DescriptorSet::from_raw(Vec::new(), 0).err().unwrap();
    assert_eq!(err, RefMatchError::InvalidDescriptorData { len: 0, width: 0 });
}

#[test]
fn descriptor_set_rows_are_ordered() {
    let set = DescriptorSet::from_rows([[1u8; 32], [2u8; 32], [3u8; 32]]);
    assert_eq!(set.len(), 3);
    assert_eq!(set.row(1).unwrap(), &[2u8; 32]);
    assert!(set.row(3).is_none());
    let firsts: Vec<u8> = set.rows().map(|row| row[0]).collect();
    assert_eq!(firsts, vec![1, 2, 3]);
}

#[test]
fn descriptor_width_mismatch_is_reported() {
    let a = DescriptorSet::empty();
    let b = DescriptorSet::from_raw(vec![0u8; 16], 16).unwrap();
    assert_eq!(
        a.ensure_same_width(&b),
        Err(RefMatchError::DescriptorWidthMismatch {
            left: 32,
            right: 16,
        })
    );
}

#[test]
fn pyramid_levels_shrink_by_scale_factor() {
    let raster = RasterImage::new(vec![128u8; 100 * 80], 100, 80).unwrap();
    let pyramid = ImagePyramid::build(&raster, 8, 1.2, 41);
    assert_eq!(pyramid.len(), 4);

    let level1 = pyramid.level(1).unwrap();
    assert_eq!((level1.width(), level1.height()), (83, 67));
    assert!((pyramid.levels()[1].scale() - 1.2).abs() < 1e-5);
    for level in pyramid.levels() {
        assert!(level.image().data().iter().all(|&v| v == 128));
    }
}

#[test]
fn pyramid_is_empty_for_tiny_rasters() {
    let raster = RasterImage::new(vec![0u8; 1], 1, 1).unwrap();
    let pyramid = ImagePyramid::build(&raster, 8, 1.2, 41);
    assert!(pyramid.is_empty());
}
