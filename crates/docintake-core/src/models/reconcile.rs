use serde::{Deserialize, Serialize};

/// A row whose stored file length disagrees with the recorded `file_size`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeMismatch {
    pub id: String,
    pub recorded: i64,
    pub actual: u64,
}

/// Outcome of comparing the metadata rows with the files under the storage root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileReport {
    /// Ids of rows whose file is gone
    pub missing_files: Vec<String>,
    pub size_mismatches: Vec<SizeMismatch>,
    /// Stored file names with no matching row
    pub orphaned_files: Vec<String>,
    /// Rows deleted during repair
    pub rows_removed: usize,
    /// Orphaned files deleted during repair
    pub files_removed: usize,
}

impl ReconcileReport {
    pub fn is_consistent(&self) -> bool {
        self.missing_files.is_empty()
            && self.size_mismatches.is_empty()
            && self.orphaned_files.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_report_is_consistent() {
        assert!(ReconcileReport::default().is_consistent());
    }

    #[test]
    fn test_any_gap_makes_report_inconsistent() {
        let report = ReconcileReport {
            orphaned_files: vec!["stray.pdf".to_string()],
            ..Default::default()
        };
        assert!(!report.is_consistent());

        let report = ReconcileReport {
            size_mismatches: vec![SizeMismatch {
                id: "doc1".to_string(),
                recorded: 10,
                actual: 12,
            }],
            ..Default::default()
        };
        assert!(!report.is_consistent());
    }
}
