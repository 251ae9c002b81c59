// Assignment Pipeline
// Detect, gate, then grade (or reject) a single submission

use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::{
    AssignmentResult, Disposition, GradingRequest, IntegrityReport, Submission,
};
use crate::services::config_store::DetectionThresholds;
use crate::services::detection::{self, gate, DetectionError};
use crate::services::grader::{AssignmentGrader, GraderError};
use crate::services::result_store::{ResultStore, StoreError, SubmissionMetadata};
use crate::services::text_extractor::{extract_pdf_text, ExtractError};

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("detection failed: {0}")]
    Detection(#[from] DetectionError),
    #[error("text extraction failed: {0}")]
    Extraction(#[from] ExtractError),
    #[error("grading failed: {0}")]
    Grading(#[from] GraderError),
}

/// One pipeline per grader handle. Stateless between submissions; distinct
/// submissions may be checked concurrently.
pub struct AssignmentPipeline<G> {
    grader: G,
    thresholds: DetectionThresholds,
    store: Option<ResultStore>,
}

impl<G: AssignmentGrader> AssignmentPipeline<G> {
    pub fn new(grader: G, thresholds: DetectionThresholds) -> Self {
        Self {
            grader,
            thresholds,
            store: None,
        }
    }

    /// Persist graded submissions through the given store.
    pub fn with_store(mut self, store: ResultStore) -> Self {
        self.store = Some(store);
        self
    }

    pub fn thresholds(&self) -> &DetectionThresholds {
        &self.thresholds
    }

    /// Display summary for a result's detection, using this pipeline's thresholds.
    pub fn integrity_report(&self, result: &AssignmentResult) -> IntegrityReport {
        gate::integrity_report(&result.detection, &self.thresholds)
    }

    /// Check a text submission: detect, gate, then grade or reject.
    ///
    /// A rejection is a valid terminal outcome carrying the canned failing
    /// grade; a grader failure is an error and yields no result at all.
    pub async fn check_text(
        &self,
        submission: &Submission,
    ) -> Result<AssignmentResult, PipelineError> {
        info!(student = %submission.student_name, "checking text assignment");

        let references = submission.reference_texts();
        let detection =
            detection::analyze_submission(&submission.answer, &references, &self.thresholds)?;

        match gate::decide(&detection, &self.thresholds) {
            Disposition::RejectForIntegrity => {
                info!(
                    student = %submission.student_name,
                    score = %format!("{:.2}", detection.score),
                    "submission rejected for integrity"
                );
                Ok(AssignmentResult {
                    student_name: submission.student_name.clone(),
                    detection,
                    outcome: gate::rejection_outcome(),
                })
            }
            Disposition::Proceed => {
                let request = GradingRequest {
                    question: submission.question.clone(),
                    answer: submission.answer.clone(),
                    student_name: submission.student_name.clone(),
                    reference_material: submission
                        .reference_material
                        .clone()
                        .unwrap_or_default(),
                };

                let mut outcome = self.grader.check_assignment(&request).await?;

                if let Some(store) = &self.store {
                    match self.persist(store, submission, &outcome.grade) {
                        Ok(doc_id) => outcome.document_id = Some(doc_id),
                        // Grading already succeeded; a storage problem must not undo it.
                        Err(e) => warn!(error = %e, "failed to store graded submission"),
                    }
                }

                Ok(AssignmentResult {
                    student_name: submission.student_name.clone(),
                    detection,
                    outcome,
                })
            }
        }
    }

    /// Check a PDF submission: extract the text, then run the text flow with
    /// the whole-assignment grading preamble.
    pub async fn check_pdf(
        &self,
        student_name: &str,
        assignment_prompt: &str,
        pdf_bytes: &[u8],
        reference_material: Option<String>,
    ) -> Result<AssignmentResult, PipelineError> {
        let extracted = extract_pdf_text(pdf_bytes)?;
        let file_id = Uuid::new_v4().to_string();
        info!(student = %student_name, file_id = %file_id, "pdf extracted for checking");

        let submission = Submission::new(
            student_name,
            wrap_pdf_prompt(assignment_prompt),
            extracted,
            reference_material,
        );

        let mut result = self.check_text(&submission).await?;
        result.outcome.file_id = Some(file_id);
        Ok(result)
    }

    fn persist(
        &self,
        store: &ResultStore,
        submission: &Submission,
        grade: &str,
    ) -> Result<String, StoreError> {
        let metadata = SubmissionMetadata {
            student_name: submission.student_name.clone(),
            question: submission.question.clone(),
            grade: grade.to_string(),
            timestamp: chrono::Local::now().to_rfc3339(),
        };
        store.store_submission(&submission.answer, &metadata)
    }
}

/// A PDF may bundle several questions; ask the grader to treat the whole
/// document as one submission.
pub(crate) fn wrap_pdf_prompt(assignment_prompt: &str) -> String {
    format!(
        "ASSIGNMENT INSTRUCTIONS:\n{}\n\n\
         Please evaluate this entire assignment submission. The assignment may contain \
         multiple questions or parts that need to be addressed. Consider all aspects of \
         the submission when providing feedback.",
        assignment_prompt
    )
}
