// Grading Service
// The external grading capability behind a small injected trait

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::env;
use std::future::Future;
use std::time::Instant;
use thiserror::Error;
use tracing::{info, warn};

use crate::models::{GradingOutcome, GradingRequest};
use crate::services::config_store::GraderConfig;

const DEFAULT_API_URL: &str =
    "https://generativelanguage.googleapis.com/v1beta/openai/chat/completions";

const MAX_ATTEMPTS: u32 = 3;
/// Answers above these lengths are truncated before being sent out.
const ANALYSIS_MAX_CHARS: usize = 8000;
const GRADING_MAX_CHARS: usize = 6000;

#[derive(Error, Debug)]
pub enum GraderError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },
    #[error("Missing content in response")]
    MissingContent,
    #[error("API key not configured")]
    MissingApiKey,
}

/// The grading capability consumed by the pipeline. Implementations hold no
/// per-submission state and may be called concurrently.
pub trait AssignmentGrader {
    fn check_assignment(
        &self,
        request: &GradingRequest,
    ) -> impl Future<Output = Result<GradingOutcome, GraderError>> + Send;
}

/// Get the grading API key from the environment.
pub fn get_api_key() -> Option<String> {
    for key in ["GRADEGUARD_API_KEY", "GOOGLE_API_KEY"] {
        if let Ok(v) = env::var(key) {
            if !v.trim().is_empty() {
                return Some(v);
            }
        }
    }
    None
}

#[derive(Debug, Clone, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Clone, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: i32,
    temperature: f64,
}

#[derive(Debug, Clone, Deserialize)]
struct ChatResponse {
    choices: Option<Vec<ChatChoice>>,
}

#[derive(Debug, Clone, Deserialize)]
struct ChatChoice {
    message: Option<ChatMessageResponse>,
}

#[derive(Debug, Clone, Deserialize)]
struct ChatMessageResponse {
    content: Option<String>,
}

/// HTTP-backed grader against an OpenAI-style chat completions endpoint.
/// Runs an analysis pass, then a grading pass that yields grade + feedback.
pub struct HttpGrader {
    client: Client,
    url: String,
    model: String,
    api_key: String,
    max_tokens: i32,
}

impl HttpGrader {
    pub fn new(config: &GraderConfig, api_key: String) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .unwrap_or_default();

        let url = env::var("GRADEGUARD_API_URL")
            .ok()
            .or_else(|| config.base_url.clone())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        Self {
            client,
            url,
            model: config.model.clone(),
            api_key,
            max_tokens: config.max_tokens,
        }
    }

    async fn call_chat(&self, system: &str, user: &str) -> Result<String, GraderError> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: system.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: user.to_string(),
                },
            ],
            max_tokens: self.max_tokens,
            // Low temperature for consistent, factual responses.
            temperature: 0.1,
        };

        let start = Instant::now();

        let response = self
            .client
            .post(&self.url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        let latency_ms = start.elapsed().as_millis() as i64;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GraderError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let data: ChatResponse = response.json().await?;
        let content = data
            .choices
            .as_ref()
            .and_then(|c| c.first())
            .and_then(|c| c.message.as_ref())
            .and_then(|m| m.content.clone())
            .ok_or(GraderError::MissingContent)?;

        info!(latency_ms, model = %self.model, "grading api call ok");
        Ok(content)
    }

    async fn call_chat_with_retry(&self, system: &str, user: &str) -> Result<String, GraderError> {
        for attempt in 0..MAX_ATTEMPTS {
            match self.call_chat(system, user).await {
                Ok(content) => return Ok(content),
                Err(e) => {
                    warn!(attempt = attempt + 1, error = %e, "grading api call failed");
                    if attempt + 1 < MAX_ATTEMPTS {
                        let backoff = std::time::Duration::from_secs(1 << attempt);
                        tokio::time::sleep(backoff).await;
                    } else {
                        return Err(e);
                    }
                }
            }
        }
        Err(GraderError::MissingContent)
    }
}

impl AssignmentGrader for HttpGrader {
    async fn check_assignment(
        &self,
        request: &GradingRequest,
    ) -> Result<GradingOutcome, GraderError> {
        let analysis_answer = truncate_answer(&request.answer, ANALYSIS_MAX_CHARS);
        let analysis_prompt = format!(
            "Please analyze this student's answer thoroughly.\n\n\
             Assignment question: {}\n\n\
             Student's answer: {}\n\n\
             Reference material: {}\n\n\
             Analyze:\n\
             1. Accuracy: Are the facts, concepts, and information correct?\n\
             2. Completeness: Does the answer address all aspects of the question?\n\
             3. Understanding: Does the student demonstrate understanding of the core concepts?\n\
             4. Critical thinking: Is there evidence of analysis, evaluation, or original thought?\n\
             5. Structure: Is the answer well-organized and clearly expressed?\n\n\
             Provide a detailed analysis that identifies specific strengths and weaknesses. \
             Use plain text formatting without asterisks, bullet points, or other markdown.",
            request.question, analysis_answer, request.reference_material
        );

        let analysis = self
            .call_chat_with_retry(
                "You are an expert educational analyst with deep subject matter expertise. \
                 Analyze student work with precision and insight. Use plain text formatting \
                 in your response.",
                &analysis_prompt,
            )
            .await?;

        let grading_answer = truncate_answer(&request.answer, GRADING_MAX_CHARS);
        let grading_prompt = format!(
            "Based on your analysis, please:\n\n\
             1. Assign a numerical grade (0-100) to this answer\n\
             2. Provide detailed, constructive feedback that will help the student improve\n\
             3. Include specific examples from their answer to illustrate your points\n\
             4. Suggest concrete steps for improvement\n\
             5. Highlight strengths to reinforce positive aspects\n\n\
             Assignment question: {}\n\n\
             Student's answer: {}\n\n\
             Your analysis: {}\n\n\
             Format your response as follows:\n\n\
             GRADE: [numerical grade]\n\n\
             FEEDBACK:\n\
             [Your detailed feedback here, in plain text.]",
            request.question, grading_answer, analysis
        );

        let feedback_text = self
            .call_chat_with_retry(
                "You are an experienced teacher providing fair and constructive feedback. \
                 Be specific, balanced, and focused on helping the student improve. Use plain \
                 text formatting only.",
                &grading_prompt,
            )
            .await?;

        let grade = extract_grade(&feedback_text);
        info!(student = %request.student_name, grade = %grade, "assignment graded");

        Ok(GradingOutcome {
            grade,
            feedback: feedback_text,
            analysis: Some(analysis),
            document_id: None,
            file_id: None,
            success: true,
        })
    }
}

/// Pull the grade out of a "GRADE: xx" line, falling back to a pointer at
/// the feedback body when the model did not follow the format.
pub(crate) fn extract_grade(feedback_text: &str) -> String {
    for line in feedback_text.lines() {
        if let Some(rest) = line.split_once("GRADE:").map(|(_, rest)| rest) {
            let grade = rest.trim();
            if !grade.is_empty() {
                return grade.to_string();
            }
        }
    }
    "See detailed feedback".to_string()
}

pub(crate) fn truncate_answer(answer: &str, max_chars: usize) -> String {
    let char_count = answer.chars().count();
    if char_count <= max_chars {
        return answer.to_string();
    }

    info!(chars = char_count, max_chars, "truncating oversized answer");
    let truncated: String = answer.chars().take(max_chars).collect();
    format!(
        "{}\n\n[Note: Answer truncated from {} characters due to length limits]",
        truncated, char_count
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_grade() {
        let text = "GRADE: 85\n\nFEEDBACK:\nSolid work overall.";
        assert_eq!(extract_grade(text), "85");
    }

    #[test]
    fn test_extract_grade_mid_document() {
        let text = "Summary first.\nGRADE: B+\nFEEDBACK: fine";
        assert_eq!(extract_grade(text), "B+");
    }

    #[test]
    fn test_extract_grade_fallback() {
        assert_eq!(extract_grade("no grade line here"), "See detailed feedback");
        assert_eq!(extract_grade("GRADE:"), "See detailed feedback");
    }

    #[test]
    fn test_truncate_answer() {
        let short = truncate_answer("short answer", 100);
        assert_eq!(short, "short answer");

        let long_input = "x".repeat(150);
        let truncated = truncate_answer(&long_input, 100);
        assert!(truncated.starts_with(&"x".repeat(100)));
        assert!(truncated.contains("truncated from 150 characters"));
    }
}
