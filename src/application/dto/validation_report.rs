//! Recovery validation report

use serde::Serialize;
use std::fmt::Write;

/// Content-hash comparison of recovered files against a ground truth
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    /// Distinct hashes in the ground truth
    pub total_ground_truth: usize,
    /// Files found in the recovered directory
    pub total_recovered: usize,
    /// Recovered files whose hash is in the ground truth
    pub true_positives: usize,
    /// Recovered files whose hash is not
    pub false_positives: usize,
    /// Ground-truth files with no recovered match
    pub false_negatives: usize,
    /// Recovered files that could not be read
    pub unreadable: usize,
    /// Names of ground-truth files that were not recovered
    pub missed: Vec<String>,
    /// Whether files were sorted into evidence folders
    pub sorted: bool,
}

impl ValidationReport {
    /// `TP / (TP + FP)`, 0 when nothing was recovered
    pub fn precision(&self) -> f64 {
        ratio(self.true_positives, self.true_positives + self.false_positives)
    }

    /// `TP / (TP + FN)`, 0 when the ground truth is empty
    pub fn recall(&self) -> f64 {
        ratio(self.true_positives, self.true_positives + self.false_negatives)
    }

    /// Renders the plain-text report
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Recovery validation report");
        let _ = writeln!(out, "==========================");
        let _ = writeln!(out, "Ground truth files:   {}", self.total_ground_truth);
        let _ = writeln!(out, "Recovered files:      {}", self.total_recovered);
        let _ = writeln!(out, "True positives:       {}", self.true_positives);
        let _ = writeln!(out, "False positives:      {}", self.false_positives);
        let _ = writeln!(out, "False negatives:      {}", self.false_negatives);
        if self.unreadable > 0 {
            let _ = writeln!(out, "Unreadable files:     {}", self.unreadable);
        }
        let _ = writeln!(out, "Precision:            {:.2}%", self.precision() * 100.0);
        let _ = writeln!(out, "Recall:               {:.2}%", self.recall() * 100.0);

        if !self.missed.is_empty() {
            let _ = writeln!(out);
            let _ = writeln!(out, "Missed files:");
            for name in &self.missed {
                let _ = writeln!(out, "  {}", name);
            }
        }

        if self.sorted {
            let _ = writeln!(out);
            let _ = writeln!(
                out,
                "Files sorted into verified_evidence/ and false_positives/"
            );
        }

        out
    }
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}
