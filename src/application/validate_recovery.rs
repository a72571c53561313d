//! Validate recovery use case
//!
//! Scores recovered files against the ground-truth manifest by content hash
//! and optionally sorts them into evidence folders.

use crate::application::dto::{
    FALSE_POSITIVES_DIR, VERIFIED_DIR, ValidateOptions, ValidationReport,
};
use crate::infrastructure::persistence::read_ground_truth;
use crate::utils::HashAlgorithm;
use anyhow::{Context, Result, bail};
use rayon::prelude::*;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

/// Validate recovery use case
#[derive(Debug, Default)]
pub struct ValidateRecoveryUseCase;

impl ValidateRecoveryUseCase {
    pub fn new() -> Self {
        Self
    }

    /// Executes the validation
    pub fn execute(&self, options: &ValidateOptions) -> Result<ValidationReport> {
        let entries = read_ground_truth(&options.ground_truth)?;

        let mut expected: HashMap<String, String> = HashMap::with_capacity(entries.len());
        for entry in entries {
            expected
                .entry(entry.content_hash.to_ascii_lowercase())
                .or_insert(entry.filename);
        }
        // legacy manifests carry MD5 digests
        let algorithms: BTreeSet<HashAlgorithm> =
            expected.keys().map(|hash| HashAlgorithm::of_hex(hash)).collect();

        if !options.recovered_dir.is_dir() {
            bail!(
                "Recovered directory {} not found",
                options.recovered_dir.display()
            );
        }

        let files = list_files(&options.recovered_dir)?;
        tracing::info!(
            "Validating {} recovered files against {} hashes",
            files.len(),
            expected.len()
        );

        let hashed: Vec<(PathBuf, Option<Vec<String>>)> = files
            .into_par_iter()
            .map(|path| {
                let hashes = match fs::read(&path) {
                    Ok(data) => Some(
                        algorithms
                            .iter()
                            .map(|algorithm| algorithm.hex_digest(&data))
                            .collect(),
                    ),
                    Err(e) => {
                        tracing::warn!("Cannot read {}: {}", path.display(), e);
                        None
                    }
                };
                (path, hashes)
            })
            .collect();

        let mut report = ValidationReport {
            total_ground_truth: expected.len(),
            total_recovered: hashed.len(),
            sorted: options.sort,
            ..Default::default()
        };
        let mut found: HashSet<&str> = HashSet::new();
        let mut moves: Vec<(PathBuf, &str)> = Vec::new();

        for (path, hashes) in &hashed {
            let Some(hashes) = hashes else {
                report.unreadable += 1;
                continue;
            };

            let matched = hashes
                .iter()
                .find_map(|hash| expected.get_key_value(hash.as_str()));
            if let Some((known, _)) = matched {
                report.true_positives += 1;
                found.insert(known.as_str());
                moves.push((path.clone(), VERIFIED_DIR));
            } else {
                report.false_positives += 1;
                moves.push((path.clone(), FALSE_POSITIVES_DIR));
            }
        }

        let mut missed: Vec<String> = expected
            .iter()
            .filter(|(hash, _)| !found.contains(hash.as_str()))
            .map(|(_, name)| name.clone())
            .collect();
        missed.sort();
        report.false_negatives = missed.len();
        report.missed = missed;

        if options.sort {
            sort_into_folders(&options.recovered_dir, &moves)?;
        }

        if let Some(path) = &options.report_path {
            fs::write(path, report.render())
                .with_context(|| format!("Cannot write report {}", path.display()))?;
        }

        Ok(report)
    }
}

fn list_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)
        .with_context(|| format!("Cannot list {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file())
        .collect();
    files.sort();
    Ok(files)
}

/// Moves each file into its folder; a failed move is logged and skipped
fn sort_into_folders(root: &Path, moves: &[(PathBuf, &str)]) -> Result<()> {
    for folder in [VERIFIED_DIR, FALSE_POSITIVES_DIR] {
        let dir = root.join(folder);
        fs::create_dir_all(&dir).with_context(|| format!("Cannot create {}", dir.display()))?;
    }

    for (path, folder) in moves {
        let Some(name) = path.file_name() else {
            continue;
        };
        let target = root.join(folder).join(name);
        if let Err(e) = fs::rename(path, &target) {
            tracing::warn!("Cannot move {} to {}: {}", path.display(), folder, e);
        }
    }
    Ok(())
}
