use criterion::{criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use refmatch::{
    DescriptorMatcher, DescriptorSet, EngineConfig, ExtractorConfig, FeatureExtractor,
    RasterImage, RecognitionEngine, ReferenceEntry, ReferenceIndex, DESCRIPTOR_BYTES,
};
use std::hint::black_box;

fn make_image(width: usize, height: usize) -> Vec<u8> {
    let mut data = Vec::with_capacity(width * height);
    for y in 0..height {
        for x in 0..width {
            let value = ((x * 13) ^ (y * 7) ^ (x * y)) & 0xFF;
            data.push(value as u8);
        }
    }
    data
}

fn random_set(rng: &mut StdRng, rows: usize) -> DescriptorSet {
    let mut data = vec![0u8; rows * DESCRIPTOR_BYTES];
    rng.fill(&mut data[..]);
    DescriptorSet::from_raw(data, DESCRIPTOR_BYTES).unwrap()
}

fn encode_png(data: Vec<u8>, width: u32, height: u32) -> Vec<u8> {
    let img = image::GrayImage::from_raw(width, height, data).unwrap();
    let mut buf = std::io::Cursor::new(Vec::new());
    image::DynamicImage::ImageLuma8(img)
        .write_to(&mut buf, image::ImageFormat::Png)
        .unwrap();
    buf.into_inner()
}

fn bench_similarity(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(7);
    let query = random_set(&mut rng, 500);
    let train = random_set(&mut rng, 500);
    let matcher = DescriptorMatcher::new();

    c.bench_function("similarity_500x500", |b| {
        b.iter(|| matcher.similarity(black_box(&query), black_box(&train)).unwrap())
    });

    if cfg!(feature = "rayon") {
        let parallel = DescriptorMatcher::new().with_parallel(true);
        c.bench_function("similarity_500x500_parallel", |b| {
            b.iter(|| parallel.similarity(black_box(&query), black_box(&train)).unwrap())
        });
    }
}

fn bench_extract(c: &mut Criterion) {
    let width = 512;
    let height = 384;
    let raster = RasterImage::new(make_image(width, height), width, height).unwrap();
    let extractor = FeatureExtractor::new(ExtractorConfig::default()).unwrap();

    c.bench_function("extract_512x384", |b| {
        b.iter(|| extractor.extract(black_box(&raster)))
    });
}

fn bench_recognize(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(11);
    let engine = RecognitionEngine::new(EngineConfig::default()).unwrap();
    let entries = (0..16)
        .map(|i| ReferenceEntry::new(format!("ref-{i}"), "default", random_set(&mut rng, 500)))
        .collect();
    let index = ReferenceIndex::build(entries);
    let query = encode_png(make_image(512, 384), 512, 384);

    c.bench_function("recognize_16_references", |b| {
        b.iter(|| engine.recognize(black_box(&query), &index, None).unwrap())
    });
}

criterion_group!(benches, bench_similarity, bench_extract, bench_recognize);
criterion_main!(benches);
