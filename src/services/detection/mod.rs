// Detection Module
// AI/plagiarism detection core organized into specialized submodules:
// - statistics: perplexity and burstiness estimates
// - classifier: pattern-based AI verdict
// - scoring: composite originality score and reference similarity
// - gate: disposition, severity tiering and the canned rejection

pub mod classifier;
pub mod gate;
pub mod scoring;
pub mod statistics;

use thiserror::Error;

use crate::models::DetectionResult;
use crate::services::config_store::DetectionThresholds;

pub use classifier::{analyze_ai_content, classify};
pub use gate::{decide, integrity_report, is_flagged, rejection_outcome, severity};
pub use scoring::{composite_score, score_against_references};
pub use statistics::{burstiness, estimate_perplexity};

#[derive(Error, Debug)]
pub enum DetectionError {
    #[error("submission text is empty; nothing to analyze")]
    EmptyText,
}

/// Run the full detector over a submission's answer text.
///
/// Fails fast on empty input instead of reporting a silently-zero score.
/// Pure function of its inputs; safe to call concurrently for distinct
/// submissions.
pub fn analyze_submission(
    answer: &str,
    references: &[&str],
    thresholds: &DetectionThresholds,
) -> Result<DetectionResult, DetectionError> {
    if answer.trim().is_empty() {
        return Err(DetectionError::EmptyText);
    }

    let analysis = analyze_ai_content(answer, thresholds);
    let (score, similarity_scores) = score_against_references(answer, references, thresholds);

    tracing::info!(
        score = %format!("{:.2}", score),
        verdict = analysis.verdict.label(),
        "detection complete"
    );

    Ok(DetectionResult {
        score,
        similarity_scores,
        verdict: analysis.verdict,
        perplexity: analysis.perplexity,
        burstiness: analysis.burstiness,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_answer_fails_fast() {
        let result = analyze_submission("   ", &[], &DetectionThresholds::default());
        assert!(matches!(result, Err(DetectionError::EmptyText)));
    }

    #[test]
    fn test_detection_is_deterministic() {
        let answer = "Photosynthesis converts light energy into chemical energy \
            stored in glucose, releasing oxygen as a byproduct.";
        let thresholds = DetectionThresholds::default();
        let a = analyze_submission(answer, &["Textbook chapter on photosynthesis."], &thresholds)
            .unwrap();
        let b = analyze_submission(answer, &["Textbook chapter on photosynthesis."], &thresholds)
            .unwrap();
        assert_eq!(a.score, b.score);
        assert_eq!(a.verdict, b.verdict);
        assert_eq!(a.similarity_scores, b.similarity_scores);
    }

    #[test]
    fn test_similarity_count_matches_references() {
        let result = analyze_submission(
            "An answer about operating systems and process scheduling policies.",
            &["first reference text", "second reference text"],
            &DetectionThresholds::default(),
        )
        .unwrap();
        assert_eq!(result.similarity_scores.len(), 2);
    }
}
