//! End-to-end tests
//!
//! Generate a disk image, carve it and score the result.

use relic::application::dto::{
    CarveOptions, FALSE_POSITIVES_DIR, GenerateOptions, VERIFIED_DIR, ValidateOptions,
};
use relic::application::{CarveImageUseCase, GenerateDiskUseCase, ValidateRecoveryUseCase};
use relic::domain::entities::{CarvedFile, FileType, GroundTruthEntry, PersistStatus, ScanProgress};
use relic::domain::repositories::{CarvedFileWriter, FileWriterError, WriteResult};
use relic::domain::services::CarveEngine;
use relic::infrastructure::persistence::{read_ground_truth, write_ground_truth};
use relic::utils::content_hash;
use rstest::*;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tempfile::TempDir;

/// A JPEG-shaped payload whose body never contains 0xFF
fn jpeg_payload(len: usize, fill: u8) -> Vec<u8> {
    assert_ne!(fill, 0xFF);
    let mut data = vec![fill; len];
    data[..2].copy_from_slice(&[0xFF, 0xD8]);
    data[len - 2..].copy_from_slice(&[0xFF, 0xD9]);
    data
}

/// A PNG-shaped payload ending in a well-formed IEND chunk
fn png_payload(len: usize, fill: u8) -> Vec<u8> {
    let mut data = vec![fill; len];
    data[..8].copy_from_slice(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]);
    data[len - 12..].copy_from_slice(&[0, 0, 0, 0, b'I', b'E', b'N', b'D', 0xAE, 0x42, 0x60, 0x82]);
    data
}

fn list_dir(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_file())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[fixture]
fn workspace() -> TempDir {
    TempDir::new().unwrap()
}

// ============================================================================
// Carve Pipeline Tests
// ============================================================================

#[rstest]
fn test_clean_image_scores_perfectly(workspace: TempDir) {
    let root = workspace.path();
    let jpeg = jpeg_payload(400, 0x10);
    let png = png_payload(300, 0x20);

    let mut disk = vec![0u8; 8192];
    disk[1000..1400].copy_from_slice(&jpeg);
    disk[5000..5300].copy_from_slice(&png);
    let image_path = root.join("disk.img");
    fs::write(&image_path, &disk).unwrap();

    let truth = root.join("ground_truth.csv");
    write_ground_truth(
        &truth,
        &[
            GroundTruthEntry {
                filename: "a.jpg".into(),
                content_hash: content_hash(&jpeg),
                start_offset: 1000,
                size: 400,
            },
            GroundTruthEntry {
                filename: "b.png".into(),
                content_hash: content_hash(&png),
                start_offset: 5000,
                size: 300,
            },
        ],
    )
    .unwrap();

    let recovered = root.join("recovered");
    let options = CarveOptions::new(&image_path, &recovered);
    let (summary, report) = CarveImageUseCase::from_options(&options)
        .unwrap()
        .execute(&options, &ScanProgress::new(), &AtomicBool::new(true))
        .unwrap();

    assert_eq!(summary.files_recovered, 2);
    assert_eq!(summary.bytes_recovered, 700);
    assert_eq!(summary.bytes_scanned, 8192);
    assert!(!summary.cancelled);
    assert_eq!(summary.files_by_type.get(&FileType::Jpeg), Some(&1));
    assert_eq!(summary.files_by_type.get(&FileType::Png), Some(&1));
    assert_eq!(report.records().len(), 2);
    assert_eq!(
        list_dir(&recovered),
        ["recovered_1000.jpg", "recovered_5000.png"]
    );

    let validation = ValidateRecoveryUseCase::new()
        .execute(&ValidateOptions::new(&recovered, &truth).sorted())
        .unwrap();
    assert_eq!(validation.true_positives, 2);
    assert_eq!(validation.false_positives, 0);
    assert_eq!(validation.false_negatives, 0);
    assert_eq!(validation.precision(), 1.0);
    assert_eq!(validation.recall(), 1.0);
    assert_eq!(
        list_dir(&recovered.join(VERIFIED_DIR)),
        ["recovered_1000.jpg", "recovered_5000.png"]
    );
    assert!(list_dir(&recovered.join(FALSE_POSITIVES_DIR)).is_empty());
}

#[rstest]
fn test_generate_carve_validate_round_trip(workspace: TempDir) {
    let root = workspace.path();
    let source = root.join("dataset_source");
    fs::create_dir(&source).unwrap();
    let payloads = [
        ("one.jpg", jpeg_payload(3000, 0x01)),
        ("two.JPEG", jpeg_payload(5000, 0x02)),
        ("three.png", png_payload(4000, 0x03)),
    ];
    for (name, data) in &payloads {
        fs::write(source.join(name), data).unwrap();
    }
    fs::write(source.join("readme.txt"), b"ignored").unwrap();

    let image_path = root.join("test_disk.img");
    let truth = root.join("ground_truth.csv");
    let options = GenerateOptions::new(&source, &image_path, &truth)
        .with_disk_size(256 * 1024)
        .with_seed(7);
    let generation = GenerateDiskUseCase::new().execute(&options).unwrap();

    assert_eq!(generation.candidates, 3);
    assert_eq!(generation.injected, 3);
    assert_eq!(generation.injected_bytes, 12_000);
    assert!(generation.skipped.is_empty());

    let disk = fs::read(&image_path).unwrap();
    assert_eq!(disk.len(), 256 * 1024);

    let entries = read_ground_truth(&truth).unwrap();
    assert_eq!(entries.len(), 3);
    for entry in &entries {
        let (_, data) = payloads
            .iter()
            .find(|(name, _)| *name == entry.filename)
            .unwrap();
        let start = entry.start_offset as usize;
        assert_eq!(&disk[start..start + data.len()], data.as_slice());
        assert_eq!(entry.content_hash, content_hash(data));
    }

    // same seed, same image
    let again = root.join("again.img");
    GenerateDiskUseCase::new()
        .execute(&GenerateOptions::new(&source, &again, root.join("again.csv"))
            .with_disk_size(256 * 1024)
            .with_seed(7))
        .unwrap();
    assert_eq!(fs::read(&again).unwrap(), disk);

    let recovered = root.join("recovered_files");
    let carve = CarveOptions::new(&image_path, &recovered);
    let (summary, _) = CarveImageUseCase::from_options(&carve)
        .unwrap()
        .execute(&carve, &ScanProgress::new(), &AtomicBool::new(true))
        .unwrap();
    assert_eq!(list_dir(&recovered).len(), summary.files_recovered);

    // noise may add or swallow candidates; score against an independent carve
    let known: HashSet<&str> = entries.iter().map(|e| e.content_hash.as_str()).collect();
    let carved = CarveEngine::with_default_signatures().carve(&disk);
    let matched: HashSet<String> = carved
        .iter()
        .map(|f| content_hash(&disk[f.range()]))
        .filter(|h| known.contains(h.as_str()))
        .collect();
    let expected_tp = carved
        .iter()
        .filter(|f| known.contains(content_hash(&disk[f.range()]).as_str()))
        .count();

    let report_path = root.join("results_report.txt");
    let validation = ValidateRecoveryUseCase::new()
        .execute(&ValidateOptions::new(&recovered, &truth).with_report(&report_path))
        .unwrap();

    assert_eq!(validation.total_ground_truth, 3);
    assert_eq!(validation.total_recovered, carved.len());
    assert_eq!(validation.true_positives, expected_tp);
    assert_eq!(
        validation.true_positives + validation.false_positives,
        validation.total_recovered
    );
    assert_eq!(validation.false_negatives, 3 - matched.len());
    assert!(fs::read_to_string(&report_path)
        .unwrap()
        .contains("Recall:"));
}

#[rstest]
fn test_records_file_lists_every_extraction(workspace: TempDir) {
    let root = workspace.path();
    let mut disk = vec![0u8; 2048];
    disk[100..400].copy_from_slice(&jpeg_payload(300, 0x42));
    let image_path = root.join("disk.img");
    fs::write(&image_path, &disk).unwrap();

    let records = root.join("records.json");
    let options = CarveOptions::new(&image_path, root.join("out")).with_records(&records);
    CarveImageUseCase::from_options(&options)
        .unwrap()
        .execute(&options, &ScanProgress::new(), &AtomicBool::new(true))
        .unwrap();

    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&records).unwrap()).unwrap();
    let list = json.as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["start_offset"], 100);
    assert_eq!(list[0]["end_offset"], 400);
    assert_eq!(list[0]["status"], "persisted");
    assert_eq!(list[0]["file_type"], "JPG");
    assert_eq!(list[0]["file_name"], "recovered_100.jpg");
}

#[rstest]
fn test_type_filter_limits_output(workspace: TempDir) {
    let root = workspace.path();
    let mut disk = vec![0u8; 4096];
    disk[0..200].copy_from_slice(&jpeg_payload(200, 0x05));
    disk[1000..1200].copy_from_slice(&png_payload(200, 0x06));
    let image_path = root.join("disk.img");
    fs::write(&image_path, &disk).unwrap();

    let out = root.join("png_only");
    let options = CarveOptions::new(&image_path, &out).with_types(vec![FileType::Png]);
    let (summary, _) = CarveImageUseCase::from_options(&options)
        .unwrap()
        .execute(&options, &ScanProgress::new(), &AtomicBool::new(true))
        .unwrap();

    assert_eq!(summary.files_recovered, 1);
    assert_eq!(list_dir(&out), ["recovered_1000.png"]);
}

// ============================================================================
// Failure Handling Tests
// ============================================================================

#[rstest]
fn test_missing_input_is_fatal_and_writes_nothing(workspace: TempDir) {
    let out = workspace.path().join("never_created");
    let options = CarveOptions::new(workspace.path().join("missing.img"), &out);

    let result = CarveImageUseCase::from_options(&options)
        .unwrap()
        .execute(&options, &ScanProgress::new(), &AtomicBool::new(true));

    assert!(result.is_err());
    assert!(!out.exists());
}

/// Sink whose first `failures` writes fail
struct FlakyWriter {
    failures: usize,
    calls: AtomicUsize,
}

impl CarvedFileWriter for FlakyWriter {
    fn write(&self, file: &CarvedFile, bytes: &[u8]) -> Result<WriteResult, FileWriterError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if call < self.failures {
            return Err(FileWriterError::PermissionDenied(file.file_name()));
        }
        Ok(WriteResult {
            saved_path: PathBuf::from(file.file_name()),
            saved_size: bytes.len() as u64,
        })
    }

    fn output_dir(&self) -> &Path {
        Path::new("flaky")
    }

    fn files_written(&self) -> usize {
        self.calls.load(Ordering::SeqCst).saturating_sub(self.failures)
    }

    fn bytes_written(&self) -> u64 {
        0
    }
}

#[rstest]
fn test_write_failure_does_not_stop_the_scan() {
    let mut disk = vec![0u8; 1000];
    disk[0..100].copy_from_slice(&jpeg_payload(100, 0x07));
    disk[500..600].copy_from_slice(&jpeg_payload(100, 0x08));

    let writer = FlakyWriter {
        failures: 1,
        calls: AtomicUsize::new(0),
    };
    let report = CarveEngine::with_default_signatures()
        .session(&disk)
        .run(&writer, &AtomicBool::new(true));

    assert_eq!(report.extracted(), 2);
    assert_eq!(report.persisted(), 1);
    assert_eq!(report.write_failures(), 1);
    assert_eq!(report.bytes_scanned(), 1000);
    assert!(matches!(
        report.records()[0].persist,
        PersistStatus::Failed { .. }
    ));
    assert_eq!(report.records()[0].file_name, "recovered_0.jpg");
    assert_eq!(report.records()[1].file.start_offset(), 500);
    assert!(report.records()[1].persist.is_persisted());
}
