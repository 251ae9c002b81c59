// AI Content Classifier
// Pattern-based verdict over perplexity and burstiness statistics

use crate::models::{AiAnalysis, AiVerdict};
use crate::services::config_store::DetectionThresholds;

use super::statistics::{burstiness, estimate_perplexity};

/// Classify a (perplexity, burstiness) pair into a verdict.
///
/// Very low perplexity alone is a strong AI signal; burstiness is a
/// secondary indicator that only matters in the middle band.
pub fn classify(perplexity: f64, burstiness: f64, thresholds: &DetectionThresholds) -> AiVerdict {
    if perplexity < thresholds.high_confidence_perplexity {
        AiVerdict::AiGeneratedHighConfidence
    } else if perplexity < thresholds.medium_confidence_perplexity {
        AiVerdict::AiGeneratedMediumConfidence
    } else if burstiness >= thresholds.burstiness_threshold
        || perplexity < thresholds.pattern_perplexity
    {
        AiVerdict::PotentialAiGenerated
    } else {
        AiVerdict::LikelyHuman
    }
}

/// Analyze whether a text reads as AI-generated or human-written.
/// Deterministic for identical input.
pub fn analyze_ai_content(text: &str, thresholds: &DetectionThresholds) -> AiAnalysis {
    let perplexity = estimate_perplexity(text);
    let bursty = burstiness(text);
    let verdict = classify(perplexity, bursty, thresholds);

    tracing::debug!(
        perplexity,
        burstiness = bursty,
        verdict = verdict.label(),
        "ai content analysis"
    );

    AiAnalysis {
        perplexity,
        burstiness: bursty,
        verdict,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn thresholds() -> DetectionThresholds {
        DetectionThresholds::default()
    }

    #[test]
    fn test_high_confidence_band() {
        assert_eq!(
            classify(150.0, 0.0, &thresholds()),
            AiVerdict::AiGeneratedHighConfidence
        );
    }

    #[test]
    fn test_medium_confidence_band() {
        assert_eq!(
            classify(350.0, 0.0, &thresholds()),
            AiVerdict::AiGeneratedMediumConfidence
        );
    }

    #[test]
    fn test_potential_band_via_perplexity() {
        assert_eq!(
            classify(600.0, 0.05, &thresholds()),
            AiVerdict::PotentialAiGenerated
        );
    }

    #[test]
    fn test_potential_band_via_burstiness() {
        // High perplexity but repetitive vocabulary still reads as suspicious.
        assert_eq!(
            classify(900.0, 0.2, &thresholds()),
            AiVerdict::PotentialAiGenerated
        );
    }

    #[test]
    fn test_human_band() {
        assert_eq!(classify(1200.0, 0.05, &thresholds()), AiVerdict::LikelyHuman);
    }

    #[test]
    fn test_analyze_returns_consistent_structure() {
        let analysis = analyze_ai_content(
            "A short but complete sentence about gardening in early spring.",
            &thresholds(),
        );
        assert!(analysis.perplexity > 0.0);
        assert!((0.0..=1.0).contains(&analysis.burstiness));
        assert_eq!(
            analysis.verdict,
            classify(analysis.perplexity, analysis.burstiness, &thresholds())
        );
    }
}
