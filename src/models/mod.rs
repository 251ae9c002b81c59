// Gradeguard Data Models
// Shapes shared by the detection pipeline, the grading boundary and the CLI

use serde::{Deserialize, Serialize};

// ============ Submission ============

/// A captured assignment submission. Immutable once constructed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Submission {
    pub student_name: String,
    pub question: String,
    pub answer: String,
    #[serde(default)]
    pub reference_material: Option<String>,
}

impl Submission {
    pub fn new(
        student_name: impl Into<String>,
        question: impl Into<String>,
        answer: impl Into<String>,
        reference_material: Option<String>,
    ) -> Self {
        Self {
            student_name: student_name.into(),
            question: question.into(),
            answer: answer.into(),
            reference_material,
        }
    }

    /// Reference corpus for similarity scoring. Empty when no material was supplied.
    pub fn reference_texts(&self) -> Vec<&str> {
        self.reference_material
            .as_deref()
            .filter(|r| !r.trim().is_empty())
            .into_iter()
            .collect()
    }
}

// ============ Detection ============

/// Pattern-classifier verdict over a submission's text.
/// Serialized as the exact display labels consumed by downstream tooling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AiVerdict {
    #[serde(rename = "AI Generated Content (High Confidence)")]
    AiGeneratedHighConfidence,
    #[serde(rename = "AI Generated Content (Medium Confidence)")]
    AiGeneratedMediumConfidence,
    #[serde(rename = "Potential AI Generated Content")]
    PotentialAiGenerated,
    #[serde(rename = "Likely Human-Written Content")]
    LikelyHuman,
}

impl AiVerdict {
    /// Every verdict except the human one counts as an AI signal.
    pub fn indicates_ai(&self) -> bool {
        !matches!(self, AiVerdict::LikelyHuman)
    }

    pub fn is_high_confidence(&self) -> bool {
        matches!(self, AiVerdict::AiGeneratedHighConfidence)
    }

    pub fn label(&self) -> &'static str {
        match self {
            AiVerdict::AiGeneratedHighConfidence => "AI Generated Content (High Confidence)",
            AiVerdict::AiGeneratedMediumConfidence => "AI Generated Content (Medium Confidence)",
            AiVerdict::PotentialAiGenerated => "Potential AI Generated Content",
            AiVerdict::LikelyHuman => "Likely Human-Written Content",
        }
    }
}

impl std::fmt::Display for AiVerdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Statistics behind a verdict.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiAnalysis {
    pub perplexity: f64,
    pub burstiness: f64,
    pub verdict: AiVerdict,
}

/// Output of the detector for one submission. Read-only after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionResult {
    /// Composite originality score, 0-100. Higher means more suspicious.
    pub score: f64,
    /// One similarity score (0-100) per supplied reference text.
    pub similarity_scores: Vec<f64>,
    pub verdict: AiVerdict,
    pub perplexity: f64,
    pub burstiness: f64,
}

// ============ Gate ============

/// Terminal decision for a submission. Derived once, never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Disposition {
    Proceed,
    RejectForIntegrity,
}

/// Display tier for the integrity score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        }
    }

    pub fn headline(&self) -> &'static str {
        match self {
            Severity::High => "High likelihood of AI-generated content",
            Severity::Medium => "Medium likelihood of AI-generated content",
            Severity::Low => "Low likelihood of AI-generated content",
        }
    }
}

/// Display-oriented summary of the gate's view of a detection result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntegrityReport {
    pub severity: Severity,
    pub flagged: bool,
    pub likely_original: bool,
    pub headline: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

// ============ Grading ============

/// Request consumed by the grading capability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradingRequest {
    pub question: String,
    pub answer: String,
    pub student_name: String,
    #[serde(default)]
    pub reference_material: String,
}

/// Result of grading one submission, or the synthesized rejection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradingOutcome {
    pub grade: String,
    pub feedback: String,
    #[serde(default)]
    pub analysis: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_id: Option<String>,
    pub success: bool,
}

// ============ Final artifact ============

/// Everything known about a checked submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignmentResult {
    pub student_name: String,
    pub detection: DetectionResult,
    pub outcome: GradingOutcome,
}

impl AssignmentResult {
    /// Flatten into the persisted record shape, stamped with the given time.
    pub fn to_record(
        &self,
        flagged: bool,
        timestamp: chrono::DateTime<chrono::Local>,
    ) -> AssignmentRecord {
        AssignmentRecord {
            student_name: self.student_name.clone(),
            grade: self.outcome.grade.clone(),
            feedback: self.outcome.feedback.clone(),
            analysis: self.outcome.analysis.clone().unwrap_or_default(),
            plagiarism_score: self.detection.score,
            ai_generated: flagged,
            timestamp: timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

/// The flat JSON export shape. Key set and timestamp format are a frozen
/// external contract; do not rename fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignmentRecord {
    pub student_name: String,
    pub grade: String,
    pub feedback: String,
    pub analysis: String,
    pub plagiarism_score: f64,
    pub ai_generated: bool,
    pub timestamp: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verdict_labels() {
        assert_eq!(
            AiVerdict::AiGeneratedHighConfidence.label(),
            "AI Generated Content (High Confidence)"
        );
        assert!(AiVerdict::PotentialAiGenerated.indicates_ai());
        assert!(!AiVerdict::LikelyHuman.indicates_ai());
    }

    #[test]
    fn test_verdict_serializes_as_label() {
        let json = serde_json::to_string(&AiVerdict::LikelyHuman).unwrap();
        assert_eq!(json, "\"Likely Human-Written Content\"");
        let parsed: AiVerdict = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, AiVerdict::LikelyHuman);
    }

    #[test]
    fn test_record_round_trip() {
        let record = AssignmentRecord {
            student_name: "Ada Lovelace".to_string(),
            grade: "92".to_string(),
            feedback: "Strong grasp of the material.".to_string(),
            analysis: "Accurate and well structured.".to_string(),
            plagiarism_score: 12.5,
            ai_generated: false,
            timestamp: "2026-03-01 14:02:11".to_string(),
        };

        let json = serde_json::to_string(&record).unwrap();
        let parsed: AssignmentRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, record);
    }

    #[test]
    fn test_record_key_names_are_stable() {
        let record = AssignmentRecord {
            student_name: "s".to_string(),
            grade: "g".to_string(),
            feedback: "f".to_string(),
            analysis: "a".to_string(),
            plagiarism_score: 0.0,
            ai_generated: true,
            timestamp: "2026-01-01 00:00:00".to_string(),
        };

        let value: serde_json::Value = serde_json::to_value(&record).unwrap();
        let obj = value.as_object().unwrap();
        for key in [
            "student_name",
            "grade",
            "feedback",
            "analysis",
            "plagiarism_score",
            "ai_generated",
            "timestamp",
        ] {
            assert!(obj.contains_key(key), "missing key {}", key);
        }
        assert_eq!(obj.len(), 7);
    }

    #[test]
    fn test_reference_texts_skips_blank_material() {
        let sub = Submission::new("A", "Q", "answer", Some("   ".to_string()));
        assert!(sub.reference_texts().is_empty());

        let sub = Submission::new("A", "Q", "answer", Some("notes".to_string()));
        assert_eq!(sub.reference_texts(), vec!["notes"]);
    }
}
