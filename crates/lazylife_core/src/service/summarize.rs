//! Note summarization boundary.
//!
//! The core only shapes requests and validates responses; transport to a
//! hosted model lives behind the `Summarizer` trait.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Summarization input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummarizeRequest {
    pub note_content: String,
    /// Free-text instruction from the user.
    pub user_prompt: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummarizeResponse {
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummarizeError {
    EmptyInstruction,
    /// Backend returned no usable text.
    EmptySummary,
    /// Backend call failed; message is shown to the user as-is.
    Backend(String),
}

impl Display for SummarizeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyInstruction => write!(f, "summarization instruction must not be blank"),
            Self::EmptySummary => write!(f, "summarizer returned an empty summary"),
            Self::Backend(message) => write!(f, "summarizer failed: {message}"),
        }
    }
}

impl Error for SummarizeError {}

/// Port to a summarization backend. Called once per request; no retries.
pub trait Summarizer {
    fn summarize(&self, request: &SummarizeRequest) -> Result<SummarizeResponse, SummarizeError>;
}

impl<F> Summarizer for F
where
    F: Fn(&SummarizeRequest) -> Result<SummarizeResponse, SummarizeError>,
{
    fn summarize(&self, request: &SummarizeRequest) -> Result<SummarizeResponse, SummarizeError> {
        self(request)
    }
}

/// Adapts a text-completion backend into a `Summarizer`.
///
/// The backend receives the rendered prompt and returns raw model text.
pub struct PromptSummarizer<F> {
    complete: F,
}

impl<F> PromptSummarizer<F>
where
    F: Fn(&str) -> Result<String, SummarizeError>,
{
    pub fn new(complete: F) -> Self {
        Self { complete }
    }
}

impl<F> Summarizer for PromptSummarizer<F>
where
    F: Fn(&str) -> Result<String, SummarizeError>,
{
    fn summarize(&self, request: &SummarizeRequest) -> Result<SummarizeResponse, SummarizeError> {
        let summary = (self.complete)(&render_prompt(request))?;
        Ok(SummarizeResponse { summary })
    }
}

/// Renders the model prompt for one request.
pub fn render_prompt(request: &SummarizeRequest) -> String {
    format!(
        "Summarize the following note content based on the user prompt.\n\n\
         Note Content: {}\n\n\
         User Prompt: {}\n\n\
         Summary:",
        request.note_content, request.user_prompt
    )
}

#[cfg(test)]
mod tests {
    use super::{render_prompt, PromptSummarizer, SummarizeError, SummarizeRequest, Summarizer};

    #[test]
    fn prompt_embeds_content_and_instruction() {
        let prompt = render_prompt(&SummarizeRequest {
            note_content: "groceries: milk, eggs".to_string(),
            user_prompt: "one line".to_string(),
        });
        assert!(prompt.contains("Note Content: groceries: milk, eggs"));
        assert!(prompt.contains("User Prompt: one line"));
        assert!(prompt.ends_with("Summary:"));
    }

    #[test]
    fn prompt_summarizer_sends_rendered_prompt_once() {
        let seen = std::cell::RefCell::new(Vec::new());
        let summarizer = PromptSummarizer::new(|prompt: &str| {
            seen.borrow_mut().push(prompt.to_string());
            Ok("milk and eggs".to_string())
        });
        let request = SummarizeRequest {
            note_content: "groceries: milk, eggs".to_string(),
            user_prompt: "short".to_string(),
        };

        let response = summarizer.summarize(&request).unwrap();
        assert_eq!(response.summary, "milk and eggs");
        assert_eq!(*seen.borrow(), vec![render_prompt(&request)]);
    }

    #[test]
    fn prompt_summarizer_passes_backend_errors_through() {
        let summarizer =
            PromptSummarizer::new(|_: &str| Err(SummarizeError::Backend("offline".to_string())));
        let request = SummarizeRequest {
            note_content: String::new(),
            user_prompt: "anything".to_string(),
        };
        assert_eq!(
            summarizer.summarize(&request).unwrap_err(),
            SummarizeError::Backend("offline".to_string())
        );
    }
}
