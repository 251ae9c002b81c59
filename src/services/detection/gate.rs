// Integrity Gate
// Converts a detection result into a disposition and a display report

use crate::models::{DetectionResult, Disposition, GradingOutcome, IntegrityReport, Severity};
use crate::services::config_store::DetectionThresholds;

/// Canned rejection text. Wording is part of the external behavior.
const REJECTION_FEEDBACK: &str = "This submission appears to be generated by AI tools or \
    contains significant plagiarism. Our analysis indicates unusual language patterns. \
    Please submit original work.";
const REJECTION_ANALYSIS: &str = "Automatic grading skipped due to academic integrity \
    concerns. The text demonstrates unusual perplexity and burstiness patterns consistent \
    with AI-generated text.";
const REJECTION_GRADE: &str = "Failed";

/// Either signal alone is enough to flag: the pattern verdict OR the score
/// threshold. Trades false positives for recall.
pub fn is_flagged(detection: &DetectionResult, thresholds: &DetectionThresholds) -> bool {
    detection.verdict.indicates_ai() || detection.score > thresholds.flag_score
}

/// Decide whether grading may proceed. Pure and idempotent: identical input
/// always yields the identical disposition.
pub fn decide(detection: &DetectionResult, thresholds: &DetectionThresholds) -> Disposition {
    if is_flagged(detection, thresholds) && detection.score > thresholds.reject_score {
        Disposition::RejectForIntegrity
    } else {
        Disposition::Proceed
    }
}

/// Display tier for a score.
pub fn severity(score: f64, thresholds: &DetectionThresholds) -> Severity {
    if score > thresholds.reject_score {
        Severity::High
    } else if score > thresholds.flag_score {
        Severity::Medium
    } else {
        Severity::Low
    }
}

/// Build the display summary for a detection result.
pub fn integrity_report(
    detection: &DetectionResult,
    thresholds: &DetectionThresholds,
) -> IntegrityReport {
    let flagged = is_flagged(detection, thresholds);
    let tier = severity(detection.score, thresholds);

    // "Likely original" is reserved for clean low scores with a human verdict.
    let likely_original = !flagged
        && detection.score < thresholds.original_score
        && !detection.verdict.indicates_ai();

    let headline = if likely_original {
        format!("{} - likely original work", tier.headline())
    } else {
        tier.headline().to_string()
    };

    let warning = if flagged {
        let mut text = "This submission contains AI-generated content!".to_string();
        if detection.score <= thresholds.flag_score {
            text.push_str(" (Detected based on text patterns rather than statistical measures)");
        } else if detection.verdict.is_high_confidence() {
            text.push_str(" (High confidence detection)");
        }
        Some(text)
    } else {
        None
    };

    IntegrityReport {
        severity: tier,
        flagged,
        likely_original,
        headline,
        warning,
    }
}

/// The fixed outcome for a rejected submission. The grading capability is
/// never consulted on this path.
pub fn rejection_outcome() -> GradingOutcome {
    GradingOutcome {
        grade: REJECTION_GRADE.to_string(),
        feedback: REJECTION_FEEDBACK.to_string(),
        analysis: Some(REJECTION_ANALYSIS.to_string()),
        document_id: None,
        file_id: None,
        success: false,
    }
}
