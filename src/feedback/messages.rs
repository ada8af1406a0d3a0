use serde::{Deserialize, Serialize};

/// Request body sent to the scoring endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackRequest {
    pub question: String,
    pub answer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub rubric_dimensions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,

    /// Candidate resume, for coaching tailored to their background
    #[serde(
        default,
        rename = "resume_text",
        alias = "resumeText",
        skip_serializing_if = "Option::is_none"
    )]
    pub resume_text: Option<String>,

    /// Job description the answers are coached against
    #[serde(
        default,
        rename = "jd_text",
        alias = "jdText",
        skip_serializing_if = "Option::is_none"
    )]
    pub jd_text: Option<String>,
}

/// Score for one (question, answer) pair
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackResult {
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default, alias = "improvements")]
    pub gaps: Vec<String>,
    #[serde(default, alias = "improved_answer", skip_serializing_if = "Option::is_none")]
    pub improved_answer: Option<String>,
}

/// Error payload the backend returns on failure
#[derive(Debug, Deserialize)]
pub struct ErrorPayload {
    pub detail: Option<String>,
    pub error: Option<String>,
}

impl ErrorPayload {
    pub fn message(self) -> Option<String> {
        self.detail.or(self.error)
    }
}
