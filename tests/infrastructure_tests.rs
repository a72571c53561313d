//! Infrastructure layer tests
//!
//! Tests for disk image sources, the output sink and manifest persistence.

use rand::SeedableRng;
use rand::rngs::StdRng;
use relic::domain::entities::{CarvedFile, FileType, GroundTruthEntry};
use relic::domain::repositories::{CarvedFileWriter, DiskImageError, DiskImageSource};
use relic::domain::services::CarveEngine;
use relic::infrastructure::disk_image::{DiskImageBuilder, MemoryDiskImage, MmapDiskImage};
use relic::infrastructure::persistence::{
    GroundTruthError, LocalFileWriter, read_ground_truth, write_ground_truth,
};
use rstest::*;
use std::fs;
use tempfile::TempDir;

#[fixture]
fn temp_dir() -> TempDir {
    TempDir::new().unwrap()
}

// ============================================================================
// Disk Image Tests
// ============================================================================

#[rstest]
fn test_mmap_and_memory_images_agree(temp_dir: TempDir) {
    let path = temp_dir.path().join("disk.img");
    let bytes: Vec<u8> = (0..=255u8).cycle().take(4096).collect();
    fs::write(&path, &bytes).unwrap();

    let mapped = MmapDiskImage::open(&path).unwrap();
    let loaded = MemoryDiskImage::open(&path).unwrap();

    assert_eq!(mapped.as_bytes(), loaded.as_bytes());
    assert_eq!(mapped.size(), 4096);
    assert_eq!(mapped.path(), path.as_path());
    assert_eq!(mapped.slice_at(4094, 2), Some(&[254u8, 255][..]));
    assert_eq!(mapped.slice_at(4095, 2), None);
    assert_eq!(mapped.slice_at(u64::MAX, 1), None);
}

#[rstest]
fn test_missing_image_is_not_found(temp_dir: TempDir) {
    let path = temp_dir.path().join("absent.img");
    assert!(matches!(
        MmapDiskImage::open(&path),
        Err(DiskImageError::NotFound(_))
    ));
    assert!(matches!(
        MemoryDiskImage::open(&path),
        Err(DiskImageError::NotFound(_))
    ));
}

#[rstest]
fn test_empty_image_maps_to_empty_slice(temp_dir: TempDir) {
    let path = temp_dir.path().join("empty.img");
    fs::write(&path, b"").unwrap();

    let image = MmapDiskImage::open(&path).unwrap();
    assert_eq!(image.size(), 0);
    assert!(CarveEngine::with_default_signatures()
        .carve(image.as_bytes())
        .is_empty());
}

#[rstest]
fn test_memory_image_write_to_round_trips(temp_dir: TempDir) {
    let image = MemoryDiskImage::from_bytes("synthetic.img", vec![7u8; 100]);
    let path = temp_dir.path().join("out.img");
    image.write_to(&path).unwrap();
    assert_eq!(fs::read(&path).unwrap(), vec![7u8; 100]);
}

// ============================================================================
// DiskImageBuilder Tests
// ============================================================================

#[rstest]
fn test_builder_is_reproducible_with_a_seed() {
    let build = |seed| {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut builder = DiskImageBuilder::new(8192);
        let a = builder.inject(&[1u8; 500], 100, &mut rng).unwrap();
        let b = builder.inject(&[2u8; 700], 100, &mut rng).unwrap();
        builder.fill_noise(&mut rng);
        (a, b, builder.finish("seeded.img"))
    };

    let (a1, b1, image1) = build(42);
    let (a2, b2, image2) = build(42);
    assert_eq!((a1, b1), (a2, b2));
    assert_eq!(image1.as_bytes(), image2.as_bytes());
}

#[rstest]
fn test_builder_never_overlaps_payloads() {
    let mut rng = StdRng::seed_from_u64(3);
    let mut builder = DiskImageBuilder::new(64 * 1024);
    let mut placed = 0;
    for i in 0..40u8 {
        if builder.inject(&[i; 1000], 100, &mut rng).is_ok() {
            placed += 1;
        }
    }

    let ranges = builder.occupied();
    assert_eq!(ranges.len(), placed);
    for pair in ranges.windows(2) {
        assert!(pair[0].end <= pair[1].start);
    }
    assert_eq!(builder.injected_bytes(), placed as u64 * 1000);
}

#[rstest]
fn test_builder_output_contains_carvable_payload() {
    let mut jpeg = vec![0x11u8; 300];
    jpeg[..2].copy_from_slice(&[0xFF, 0xD8]);
    jpeg[298..].copy_from_slice(&[0xFF, 0xD9]);

    let mut rng = StdRng::seed_from_u64(11);
    let mut builder = DiskImageBuilder::new(4096);
    let offset = builder.inject(&jpeg, 100, &mut rng).unwrap();
    let image = builder.finish("one.img");

    // without noise the only markers are the payload's own
    let files = CarveEngine::with_default_signatures().carve(image.as_bytes());
    assert_eq!(files, [CarvedFile::new(FileType::Jpeg, offset, offset + 300)]);
}

// ============================================================================
// LocalFileWriter Tests
// ============================================================================

#[rstest]
fn test_writer_names_files_by_offset(temp_dir: TempDir) {
    let writer = LocalFileWriter::new(temp_dir.path()).unwrap();

    writer
        .write(&CarvedFile::new(FileType::Jpeg, 4096, 4100), &[1, 2, 3, 4])
        .unwrap();
    writer
        .write(&CarvedFile::new(FileType::Png, 0, 2), &[5, 6])
        .unwrap();

    assert_eq!(
        fs::read(temp_dir.path().join("recovered_4096.jpg")).unwrap(),
        [1, 2, 3, 4]
    );
    assert_eq!(
        fs::read(temp_dir.path().join("recovered_0.png")).unwrap(),
        [5, 6]
    );
    assert_eq!(writer.files_written(), 2);
    assert_eq!(writer.bytes_written(), 6);
}

#[rstest]
fn test_writer_overwrites_by_default(temp_dir: TempDir) {
    let writer = LocalFileWriter::new(temp_dir.path()).unwrap();
    let file = CarvedFile::new(FileType::Jpeg, 10, 12);
    writer.write(&file, &[1, 1]).unwrap();
    writer.write(&file, &[2, 2]).unwrap();
    assert_eq!(fs::read(writer.output_path(&file)).unwrap(), [2, 2]);
}

// ============================================================================
// Ground Truth Tests
// ============================================================================

#[rstest]
fn test_ground_truth_round_trip(temp_dir: TempDir) {
    let path = temp_dir.path().join("ground_truth.csv");
    let entries = vec![
        GroundTruthEntry {
            filename: "cat.jpg".to_string(),
            content_hash: "ab".repeat(32),
            start_offset: 1024,
            size: 2048,
        },
        GroundTruthEntry {
            filename: "dog, spotted.png".to_string(),
            content_hash: "cd".repeat(32),
            start_offset: 9000,
            size: 100,
        },
    ];

    write_ground_truth(&path, &entries).unwrap();
    let read = read_ground_truth(&path).unwrap();
    assert_eq!(read, entries);
    assert_eq!(read[0].end_offset(), 3072);
}

#[rstest]
fn test_ground_truth_rejects_bad_rows(temp_dir: TempDir) {
    let path = temp_dir.path().join("bad.csv");
    fs::write(
        &path,
        "filename,sha256_hash,start_offset_decimal,file_size_bytes\na.jpg,abc,not-a-number,5\n",
    )
    .unwrap();
    assert!(matches!(
        read_ground_truth(&path),
        Err(GroundTruthError::Malformed { .. })
    ));
}
