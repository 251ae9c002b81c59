// Gradeguard Core Services

pub mod config_store;
pub mod detection;
pub mod grader;
pub mod pipeline;
pub mod result_store;
pub mod text_extractor;

pub use config_store::*;
pub use result_store::*;
pub use text_extractor::*;

// Re-export detection module functions
pub use detection::{
    analyze_ai_content,
    analyze_submission,
    burstiness,
    classify,
    composite_score,
    decide,
    estimate_perplexity,
    integrity_report,
    is_flagged,
    rejection_outcome,
    score_against_references,
    severity,
    DetectionError,
};

pub use grader::{get_api_key, AssignmentGrader, GraderError, HttpGrader};
pub use pipeline::{AssignmentPipeline, PipelineError};
