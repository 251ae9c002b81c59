// Result Storage Service
// Persists graded submissions and the exported result records

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::models::AssignmentRecord;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("failed to create results dir: {0}")]
    CreateDir(std::io::Error),
    #[error("failed to serialize record: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("failed to write record: {0}")]
    Write(std::io::Error),
}

/// Metadata stored alongside a graded submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionMetadata {
    pub student_name: String,
    pub question: String,
    pub grade: String,
    pub timestamp: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredSubmission {
    id: String,
    #[serde(flatten)]
    metadata: SubmissionMetadata,
    content: String,
}

pub struct ResultStore {
    base_dir: PathBuf,
}

impl ResultStore {
    pub fn new(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get default results directory
    pub fn default_dir() -> Option<PathBuf> {
        dirs::data_local_dir().map(|p| p.join("gradeguard"))
    }

    /// Store a graded submission and return its document id.
    pub fn store_submission(
        &self,
        content: &str,
        metadata: &SubmissionMetadata,
    ) -> Result<String, StoreError> {
        let dir = self.base_dir.join("submissions");
        fs::create_dir_all(&dir).map_err(StoreError::CreateDir)?;

        let doc_id = Uuid::new_v4().to_string();
        let stored = StoredSubmission {
            id: doc_id.clone(),
            metadata: metadata.clone(),
            content: content.to_string(),
        };

        let path = dir.join(format!("{}.json", doc_id));
        let json = serde_json::to_string_pretty(&stored)?;
        fs::write(&path, json).map_err(StoreError::Write)?;

        info!(document_id = %doc_id, student = %metadata.student_name, "submission stored");
        Ok(doc_id)
    }

    /// Write the final record as pretty JSON; returns the file path.
    pub fn save_record(&self, record: &AssignmentRecord) -> Result<PathBuf, StoreError> {
        let dir = self.base_dir.join("results");
        fs::create_dir_all(&dir).map_err(StoreError::CreateDir)?;

        let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        let path = dir.join(record_filename(&record.student_name, &stamp.to_string()));

        let json = serde_json::to_string_pretty(record)?;
        fs::write(&path, json).map_err(StoreError::Write)?;

        info!(path = %path.display(), "result record saved");
        Ok(path)
    }
}

/// File-system safe record name for a student + timestamp.
fn record_filename(student_name: &str, stamp: &str) -> String {
    let safe: String = student_name
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect();
    format!("assignment_result_{}_{}.json", safe, stamp)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store() -> ResultStore {
        let dir = std::env::temp_dir()
            .join("gradeguard-tests")
            .join(Uuid::new_v4().to_string());
        ResultStore::new(dir)
    }

    #[test]
    fn test_record_filename_sanitizes() {
        assert_eq!(
            record_filename("Ada Lovelace", "20260301_140211"),
            "assignment_result_Ada_Lovelace_20260301_140211.json"
        );
    }

    #[test]
    fn test_store_submission_writes_file() {
        let store = temp_store();
        let metadata = SubmissionMetadata {
            student_name: "Test Student".to_string(),
            question: "Explain ownership.".to_string(),
            grade: "88".to_string(),
            timestamp: "2026-03-01 14:02:11".to_string(),
        };

        let doc_id = store.store_submission("the answer text", &metadata).unwrap();
        let path = store
            .base_dir
            .join("submissions")
            .join(format!("{}.json", doc_id));
        assert!(path.exists());

        let raw = fs::read_to_string(path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["id"], serde_json::Value::String(doc_id));
        assert_eq!(value["student_name"], "Test Student");
    }

    #[test]
    fn test_save_record_writes_file() {
        let store = temp_store();
        let record = AssignmentRecord {
            student_name: "Test Student".to_string(),
            grade: "88".to_string(),
            feedback: "Good.".to_string(),
            analysis: String::new(),
            plagiarism_score: 8.0,
            ai_generated: false,
            timestamp: "2026-03-01 14:02:11".to_string(),
        };

        let path = store.save_record(&record).unwrap();
        assert!(path.exists());

        let raw = fs::read_to_string(path).unwrap();
        let parsed: AssignmentRecord = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed, record);
    }
}
