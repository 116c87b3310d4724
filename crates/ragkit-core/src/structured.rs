//! Schema-validated structured output with self-correction.
//!
//! The model is asked for a JSON object matching [`StructuredOutput`]. Each
//! reply goes through the same steps:
//!
//! ```text
//!  Ready ──chat(t=0)──▶ Strip ──▶ Validate ──ok──▶ Done
//!    ▲                               │
//!    │                             error
//!    │                               ▼
//!    └──── Correct ◀── attempts left? ──no──▶ Failed
//! ```
//!
//! Every attempt sends the initial system and user messages followed by
//! all correction turns accumulated so far (the rejected reply as an
//! assistant turn, then a user turn quoting the validation error).
//!
//! Only validation failures are retried. Provider and transport errors are
//! returned immediately from whichever attempt hit them.

use crate::chat::{ChatMessage, ChatProvider};
use crate::error::{Error, Result, ValidationError};
use crate::models::StructuredOutput;

/// Retries after the first attempt (three calls in total).
pub const DEFAULT_MAX_RETRIES: usize = 2;

/// System instruction describing the fixed schema.
pub const SCHEMA_INSTRUCTION: &str = "Return ONLY valid JSON with keys: title, summary, keywords. \
Do not wrap the JSON in markdown or add extra text.";

const STRUCTURED_TEMPERATURE: f32 = 0.0;

/// Conversation state for one structured request.
///
/// `base` never changes; `corrections` only grows.
struct CorrectionSession {
    base: [ChatMessage; 2],
    corrections: Vec<ChatMessage>,
}

impl CorrectionSession {
    fn new(prompt: &str) -> Self {
        Self {
            base: [
                ChatMessage::system(SCHEMA_INSTRUCTION),
                ChatMessage::user(prompt),
            ],
            corrections: Vec::new(),
        }
    }

    fn messages(&self) -> Vec<ChatMessage> {
        self.base
            .iter()
            .chain(self.corrections.iter())
            .cloned()
            .collect()
    }

    fn push_correction(&mut self, rejected: String, reason: &ValidationError) {
        self.corrections.push(ChatMessage::assistant(rejected));
        self.corrections.push(ChatMessage::user(correction_message(reason)));
    }
}

/// The follow-up user turn sent after a rejected reply.
pub fn correction_message(reason: &ValidationError) -> String {
    format!(
        "The previous response was invalid JSON or did not match the schema. \
         Error: {}. Return ONLY valid JSON with keys: title, summary, keywords.",
        reason
    )
}

/// Request a [`StructuredOutput`] for `prompt`, allowing `max_retries`
/// corrective follow-ups.
///
/// # Errors
///
/// - Any provider error, unchanged, from the attempt that hit it.
/// - [`Error::Validation`] wrapping the last rejection reason once
///   `max_retries + 1` replies have all failed validation.
pub fn structured_json(
    provider: &dyn ChatProvider,
    prompt: &str,
    max_retries: usize,
) -> Result<StructuredOutput> {
    let max_attempts = max_retries.saturating_add(1);
    let mut session = CorrectionSession::new(prompt);
    let mut attempt = 1;

    loop {
        let raw = provider.chat(&session.messages(), STRUCTURED_TEMPERATURE)?;

        let reason = match parse_structured(&raw) {
            Ok(output) => {
                tracing::debug!(attempt, "structured output accepted");
                return Ok(output);
            }
            Err(reason) => reason,
        };

        tracing::warn!(attempt, max_attempts, error = %reason, "structured output rejected");
        if attempt >= max_attempts {
            return Err(Error::Validation(reason));
        }

        session.push_correction(raw, &reason);
        attempt += 1;
    }
}

/// Strip an optional code fence, then validate against the schema.
pub fn parse_structured(raw: &str) -> std::result::Result<StructuredOutput, ValidationError> {
    let output: StructuredOutput = serde_json::from_str(strip_json_fence(raw))?;

    if output.title.trim().is_empty() {
        return Err(ValidationError::EmptyField("title"));
    }
    if output.summary.trim().is_empty() {
        return Err(ValidationError::EmptyField("summary"));
    }
    Ok(output)
}

/// Remove a surrounding ```` ``` ```` fence and an optional `json` tag.
///
/// Text without a leading fence is only trimmed.
pub fn strip_json_fence(text: &str) -> &str {
    let cleaned = text.trim();
    if !cleaned.starts_with("```") {
        return cleaned;
    }

    let inner = cleaned.trim_matches('`').trim();
    match inner.get(..4) {
        Some(tag) if tag.eq_ignore_ascii_case("json") => inner[4..].trim(),
        _ => inner,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::Role;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Replays canned replies and records every message list it receives.
    struct ScriptedChat {
        replies: Mutex<VecDeque<Result<String>>>,
        calls: Mutex<Vec<Vec<ChatMessage>>>,
    }

    impl ScriptedChat {
        fn new(replies: Vec<Result<String>>) -> Self {
            Self {
                replies: Mutex::new(replies.into()),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn replying(replies: &[&str]) -> Self {
            Self::new(replies.iter().map(|r| Ok(r.to_string())).collect())
        }

        fn calls(&self) -> Vec<Vec<ChatMessage>> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl ChatProvider for ScriptedChat {
        fn model_name(&self) -> &str {
            "scripted"
        }

        fn chat(&self, messages: &[ChatMessage], temperature: f32) -> Result<String> {
            assert_eq!(temperature, 0.0);
            self.calls.lock().unwrap().push(messages.to_vec());
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .expect("more chat calls than scripted replies")
        }
    }

    const VALID: &str = r#"{"title":"T","summary":"S","keywords":[]}"#;

    #[test]
    fn test_fenced_json_accepted_on_first_attempt() {
        let chat = ScriptedChat::replying(&["```json\n{\"title\":\"T\",\"summary\":\"S\",\"keywords\":[]}\n```"]);

        let output = structured_json(&chat, "Summarize", DEFAULT_MAX_RETRIES).unwrap();
        assert_eq!(
            output,
            StructuredOutput {
                title: "T".to_string(),
                summary: "S".to_string(),
                keywords: Vec::new(),
            }
        );

        let calls = chat.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0][0], ChatMessage::system(SCHEMA_INSTRUCTION));
        assert_eq!(calls[0][1], ChatMessage::user("Summarize"));
    }

    #[test]
    fn test_malformed_then_valid_succeeds_on_second_attempt() {
        let malformed = "{\"title\": \"T\", \"summary\": ";
        let chat = ScriptedChat::replying(&[malformed, VALID]);

        let output = structured_json(&chat, "Summarize", DEFAULT_MAX_RETRIES).unwrap();
        assert_eq!(output.title, "T");

        let calls = chat.calls();
        assert_eq!(calls.len(), 2);

        let parse_error = parse_structured(malformed).unwrap_err().to_string();
        let second = &calls[1];
        assert_eq!(second.len(), 4);
        assert_eq!(second[2], ChatMessage::assistant(malformed));
        assert_eq!(second[3].role, Role::User);
        assert!(second[3].content.contains(&parse_error));
        assert!(second[3].content.contains("Return ONLY valid JSON"));
    }

    #[test]
    fn test_three_failures_stop_after_exactly_three_calls() {
        let chat = ScriptedChat::replying(&["nope", "still nope", "never", VALID]);

        let err = structured_json(&chat, "Summarize", DEFAULT_MAX_RETRIES).unwrap_err();
        assert!(matches!(err, Error::Validation(ValidationError::Json(_))));
        assert!(err.to_string().starts_with("structured output validation failed"));
        assert_eq!(chat.calls().len(), 3);
    }

    #[test]
    fn test_corrections_accumulate_on_top_of_base() {
        let chat = ScriptedChat::replying(&["bad one", "bad two", VALID]);
        structured_json(&chat, "Summarize", DEFAULT_MAX_RETRIES).unwrap();

        let calls = chat.calls();
        assert_eq!(calls[0].len(), 2);
        assert_eq!(calls[1].len(), 4);
        assert_eq!(calls[2].len(), 6);
        assert_eq!(calls[2][..2], calls[0][..]);
        assert_eq!(calls[2][2], ChatMessage::assistant("bad one"));
        assert_eq!(calls[2][4], ChatMessage::assistant("bad two"));
    }

    #[test]
    fn test_provider_error_is_not_retried() {
        let chat = ScriptedChat::new(vec![
            Ok("garbage".to_string()),
            Err(Error::Provider {
                status: 503,
                body: "unavailable".to_string(),
            }),
            Ok(VALID.to_string()),
        ]);

        let err = structured_json(&chat, "Summarize", DEFAULT_MAX_RETRIES).unwrap_err();
        assert!(matches!(err, Error::Provider { status: 503, .. }));
        assert_eq!(chat.calls().len(), 2);
    }

    #[test]
    fn test_zero_retries_means_one_call() {
        let chat = ScriptedChat::replying(&["bad", VALID]);
        assert!(structured_json(&chat, "p", 0).is_err());
        assert_eq!(chat.calls().len(), 1);
    }

    #[test]
    fn test_unbounded_retries_do_not_overflow() {
        let chat = ScriptedChat::replying(&["bad", VALID]);
        let output = structured_json(&chat, "p", usize::MAX).unwrap();
        assert_eq!(output.summary, "S");
        assert_eq!(chat.calls().len(), 2);
    }

    #[test]
    fn test_rejects_unknown_fields() {
        let err = parse_structured(r#"{"title":"T","summary":"S","keywords":[],"extra":1}"#)
            .unwrap_err();
        assert!(err.to_string().contains("unknown field"));
    }

    #[test]
    fn test_rejects_trailing_content() {
        let err = parse_structured(r#"{"title":"T","summary":"S","keywords":[]} and more"#)
            .unwrap_err();
        assert!(err.to_string().contains("trailing characters"));
    }

    #[test]
    fn test_allows_trailing_whitespace() {
        assert!(parse_structured("{\"title\":\"T\",\"summary\":\"S\"}\n\n  ").is_ok());
    }

    #[test]
    fn test_rejects_blank_required_fields() {
        let err = parse_structured(r#"{"title":"  ","summary":"S","keywords":[]}"#).unwrap_err();
        assert!(matches!(err, ValidationError::EmptyField("title")));

        let err = parse_structured(r#"{"title":"T","summary":"\n","keywords":["k"]}"#).unwrap_err();
        assert!(matches!(err, ValidationError::EmptyField("summary")));
    }

    #[test]
    fn test_missing_keywords_defaults_to_empty() {
        let output = parse_structured(r#"{"title":"T","summary":"S"}"#).unwrap();
        assert!(output.keywords.is_empty());
    }

    #[test]
    fn test_strip_json_fence_variants() {
        assert_eq!(strip_json_fence("```json\n{}\n```"), "{}");
        assert_eq!(strip_json_fence("```JSON {} ```"), "{}");
        assert_eq!(strip_json_fence("```\n{}\n```"), "{}");
        assert_eq!(strip_json_fence("  {\"a\":1}  "), "{\"a\":1}");
        assert_eq!(strip_json_fence("```"), "");
    }
}
