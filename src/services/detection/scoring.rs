// Originality Scoring
// Composite plagiarism/AI score plus per-reference similarity

use crate::services::config_store::DetectionThresholds;

use super::statistics::{burstiness, estimate_perplexity};

/// Weight of the perplexity component in the composite score.
const PERPLEXITY_WEIGHT: f64 = 0.9;
/// Weight of the burstiness component.
const BURSTINESS_WEIGHT: f64 = 0.1;

/// Map perplexity onto the 0-100 suspicion scale. Lower perplexity is more
/// suspicious, so the scale is inverted, with hard steps for the very low
/// bands where the signal is strongest.
pub(crate) fn perplexity_component(perplexity: f64, thresholds: &DetectionThresholds) -> f64 {
    if perplexity < 100.0 {
        95.0
    } else if perplexity < thresholds.high_confidence_perplexity {
        85.0
    } else if perplexity < 400.0 {
        70.0
    } else {
        let scaled = (perplexity / thresholds.max_perplexity) * 100.0;
        (100.0 - scaled.min(100.0)).max(0.0)
    }
}

/// Composite originality score for a text, 0-100.
pub fn composite_score(perplexity: f64, burstiness: f64, thresholds: &DetectionThresholds) -> f64 {
    let ppl_score = perplexity_component(perplexity, thresholds);
    let burstiness_score = burstiness * 100.0;
    ppl_score * PERPLEXITY_WEIGHT + burstiness_score * BURSTINESS_WEIGHT
}

/// Score a document against each reference text.
///
/// Returns the composite score and one similarity value per reference.
/// A blank reference contributes similarity 0 rather than an error so a
/// partially filled knowledge base still yields a full vector.
pub fn score_against_references(
    document_text: &str,
    references: &[&str],
    thresholds: &DetectionThresholds,
) -> (f64, Vec<f64>) {
    let perplexity = estimate_perplexity(document_text);
    let bursty = burstiness(document_text);
    let score = composite_score(perplexity, bursty, thresholds);

    let similarities = references
        .iter()
        .map(|reference| {
            if reference.trim().is_empty() {
                return 0.0;
            }
            let reference_perplexity = estimate_perplexity(reference);
            similarity_from_perplexity(perplexity, reference_perplexity, thresholds)
        })
        .collect();

    tracing::debug!(perplexity, score, "originality scoring");

    (score, similarities)
}

/// Similarity on a 0-100 scale; closer perplexities suggest similar text.
fn similarity_from_perplexity(a: f64, b: f64, thresholds: &DetectionThresholds) -> f64 {
    let diff = (a - b).abs();
    let scaled = (diff / thresholds.max_perplexity) * 100.0;
    (100.0 - scaled.min(100.0)).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn thresholds() -> DetectionThresholds {
        DetectionThresholds::default()
    }

    #[test]
    fn test_perplexity_component_bands() {
        let t = thresholds();
        assert_eq!(perplexity_component(50.0, &t), 95.0);
        assert_eq!(perplexity_component(150.0, &t), 85.0);
        assert_eq!(perplexity_component(300.0, &t), 70.0);
        assert_eq!(perplexity_component(600.0, &t), 40.0);
        assert_eq!(perplexity_component(2500.0, &t), 0.0);
    }

    #[test]
    fn test_composite_weighting() {
        // ppl 50 -> 95, burstiness 0.5 -> 50: 95*0.9 + 50*0.1
        let score = composite_score(50.0, 0.5, &thresholds());
        assert!((score - 90.5).abs() < 1e-9);
    }

    #[test]
    fn test_identical_texts_read_fully_similar() {
        let text = "Rust compiles ahead of time and checks borrows statically.";
        let (_, similarities) = score_against_references(text, &[text], &thresholds());
        assert_eq!(similarities, vec![100.0]);
    }

    #[test]
    fn test_blank_reference_contributes_zero() {
        let reference = "Lecture notes covering borrowing rules and compile time guarantees.";
        let (_, similarities) = score_against_references(
            "Borrow checking happens entirely at compile time in Rust.",
            &["", reference],
            &thresholds(),
        );
        assert_eq!(similarities.len(), 2);
        assert_eq!(similarities[0], 0.0);
        assert!(similarities[1] > 0.0);
    }

    #[test]
    fn test_no_references_yields_empty_vector_but_scored_text() {
        let repetitive = "The model produces the answer. ".repeat(40);
        let (score, similarities) = score_against_references(&repetitive, &[], &thresholds());
        assert!(similarities.is_empty());
        assert!(score > 50.0);
    }
}
