//! Interpretation of Calibre output files.
//!
//! Calibre's FASTXOR summary has no machine-readable status. The only
//! signal is the final message it prints, so classification compares the
//! last non-blank line against a known sentinel.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{Result, SvsError};

pub const FASTXOR_SAME: &str = "--- FASTXOR: DESIGNS ARE SAME";

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum VerificationOutcome {
    Match,
    Mismatch,
}

impl VerificationOutcome {
    #[inline]
    pub fn is_match(&self) -> bool {
        matches!(self, VerificationOutcome::Match)
    }
}

pub trait SummaryClassifier {
    fn classify(&self, summary: &str) -> VerificationOutcome;
}

/// Matches when the last non-blank line of the summary is exactly the
/// sentinel, ignoring trailing whitespace.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct FastXorClassifier {
    sentinel: String,
}

impl FastXorClassifier {
    pub fn new(sentinel: impl Into<String>) -> Self {
        Self {
            sentinel: sentinel.into(),
        }
    }
}

impl Default for FastXorClassifier {
    fn default() -> Self {
        Self::new(FASTXOR_SAME)
    }
}

impl SummaryClassifier for FastXorClassifier {
    fn classify(&self, summary: &str) -> VerificationOutcome {
        match last_nonblank_line(summary) {
            Some(line) if line == self.sentinel => VerificationOutcome::Match,
            _ => VerificationOutcome::Mismatch,
        }
    }
}

/// The last line of `contents` with any non-whitespace characters,
/// with trailing whitespace removed.
pub fn last_nonblank_line(contents: &str) -> Option<&str> {
    contents
        .lines()
        .rev()
        .map(str::trim_end)
        .find(|line| !line.is_empty())
}

/// The final `n` lines of `contents`.
pub fn tail(contents: &str, n: usize) -> Vec<&str> {
    let lines: Vec<&str> = contents.lines().collect();
    let start = lines.len().saturating_sub(n);
    lines[start..].to_vec()
}

#[inline]
pub fn classify_summary(summary: &str) -> VerificationOutcome {
    FastXorClassifier::default().classify(summary)
}

/// Reads a report file produced by Calibre.
///
/// A missing or unreadable file is reported as [`SvsError::Report`], never
/// as a mismatch.
pub fn read_report(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    fs::read_to_string(path).map_err(|source| SvsError::Report {
        path: path.to_owned(),
        source,
    })
}

pub fn read_fxor_summary(
    path: impl AsRef<Path>,
    classifier: &impl SummaryClassifier,
) -> Result<VerificationOutcome> {
    let summary = read_report(path)?;
    Ok(classifier.classify(&summary))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_same() {
        let summary = "--- FASTXOR: running\n\n--- FASTXOR: DESIGNS ARE SAME\n";
        assert_eq!(classify_summary(summary), VerificationOutcome::Match);
    }

    #[test]
    fn test_classify_skips_trailing_blank_lines() {
        let summary = "header\n--- FASTXOR: DESIGNS ARE SAME   \n\n   \n\n";
        assert_eq!(classify_summary(summary), VerificationOutcome::Match);
    }

    #[test]
    fn test_classify_differ() {
        let summary = "--- FASTXOR: DESIGNS ARE SAME\n--- FASTXOR: DESIGNS DIFFER\n";
        assert_eq!(classify_summary(summary), VerificationOutcome::Mismatch);
        assert_eq!(classify_summary(""), VerificationOutcome::Mismatch);
        assert_eq!(classify_summary("\n\n  \n"), VerificationOutcome::Mismatch);
    }

    #[test]
    fn test_classify_is_exact() {
        assert_eq!(
            classify_summary("  --- FASTXOR: DESIGNS ARE SAME\n"),
            VerificationOutcome::Mismatch
        );
        assert_eq!(
            classify_summary("--- FASTXOR: DESIGNS ARE SAME.\n"),
            VerificationOutcome::Mismatch
        );
    }

    #[test]
    fn test_custom_sentinel() {
        let classifier = FastXorClassifier::new("OK");
        assert!(classifier.classify("a\nOK\n").is_match());
        assert!(!classifier.classify(FASTXOR_SAME).is_match());
    }

    #[test]
    fn test_tail() {
        assert_eq!(tail("a\nb\nc\n", 2), vec!["b", "c"]);
        assert_eq!(tail("a\nb\n", 20), vec!["a", "b"]);
        assert!(tail("", 20).is_empty());
    }

    #[test]
    fn test_read_summary() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("rules.fxor.summary");

        let err = read_fxor_summary(&path, &FastXorClassifier::default()).unwrap_err();
        assert!(matches!(err, SvsError::Report { .. }));

        fs::write(&path, "")?;
        assert_eq!(
            read_fxor_summary(&path, &FastXorClassifier::default())?,
            VerificationOutcome::Mismatch
        );

        fs::write(&path, format!("{FASTXOR_SAME}\n"))?;
        assert_eq!(
            read_fxor_summary(&path, &FastXorClassifier::default())?,
            VerificationOutcome::Match
        );
        Ok(())
    }
}
