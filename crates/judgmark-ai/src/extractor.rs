//! Judgment field extraction: one prompt, one completion, one JSON object.
//!
//! Every failure degrades to an empty result. [`Extraction`] keeps the reason
//! so callers can tell a skipped request from a bad reply or a failed call,
//! while [`Extraction::into_result`] gives the plain mapping.

use judgmark_core::{EMPTY_VALUE, ExtractionResult, is_schema_field};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::client::{ChatCompletion, ChatRequest, CompletionError};
use crate::prompt::build_messages;

/// Outcome of a single [`Extractor::extract`] call.
#[derive(Debug)]
pub enum Extraction {
    /// Input text was empty; no request was sent.
    Skipped,
    /// Reply parsed. `dropped` lists reply keys that are not schema fields.
    Parsed {
        result: ExtractionResult,
        dropped: Vec<String>,
    },
    /// Reply was not a JSON object.
    ParseFailed { error: String, raw: String },
    /// The request itself failed.
    TransportFailed(CompletionError),
}

impl Extraction {
    pub fn is_parsed(&self) -> bool {
        matches!(self, Self::Parsed { .. })
    }

    /// The extracted mapping; empty for every outcome except `Parsed`.
    pub fn into_result(self) -> ExtractionResult {
        match self {
            Self::Parsed { result, .. } => result,
            _ => ExtractionResult::new(),
        }
    }
}

/// Extracts schema fields from judgment text through a chat-completion backend.
pub struct Extractor<C> {
    client: C,
    model: String,
}

impl<C: ChatCompletion> Extractor<C> {
    pub fn new(client: C, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub async fn extract(&self, judgment_text: &str) -> Extraction {
        if judgment_text.trim().is_empty() {
            debug!("empty judgment text, skipping extraction");
            return Extraction::Skipped;
        }

        let request = ChatRequest::new(self.model.clone(), build_messages(judgment_text));
        info!(model = %self.model, chars = judgment_text.chars().count(), "extracting judgment fields");

        let response = match self.client.complete(&request).await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "chat completion failed");
                return Extraction::TransportFailed(e);
            }
        };

        let content = response.first_content();
        debug!(reply = %content, "model reply");

        match parse_reply(content) {
            Ok((result, dropped)) => {
                if !dropped.is_empty() {
                    warn!(?dropped, "reply contained fields outside the schema");
                }
                info!(fields = result.len(), "extraction complete");
                Extraction::Parsed { result, dropped }
            }
            Err(error) => {
                warn!(error = %error, "model reply is not a JSON object");
                Extraction::ParseFailed {
                    error,
                    raw: content.to_string(),
                }
            }
        }
    }
}

/// Parse a reply into schema fields (reply order) and non-schema keys.
pub fn parse_reply(content: &str) -> Result<(ExtractionResult, Vec<String>), String> {
    let value: Value = serde_json::from_str(content).map_err(|e| e.to_string())?;
    let map = match value {
        Value::Object(map) => map,
        other => return Err(format!("expected a JSON object, got {}", kind(&other))),
    };

    let mut result = ExtractionResult::new();
    let mut dropped = Vec::new();
    for (key, value) in map {
        if is_schema_field(&key) {
            result.insert(key, value_text(value));
        } else {
            dropped.push(key);
        }
    }
    Ok((result, dropped))
}

fn value_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => EMPTY_VALUE.to_string(),
        other => other.to_string(),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{ChatResponse, Role};
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Canned backend that records how often it was called.
    struct MockBackend {
        reply: Mutex<Option<Result<ChatResponse, CompletionError>>>,
        calls: AtomicUsize,
        last_request: Mutex<Option<ChatRequest>>,
    }

    impl MockBackend {
        fn replying(content: &str) -> Self {
            Self::with(Ok(ChatResponse::from_content(content)))
        }

        fn with(reply: Result<ChatResponse, CompletionError>) -> Self {
            Self {
                reply: Mutex::new(Some(reply)),
                calls: AtomicUsize::new(0),
                last_request: Mutex::new(None),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ChatCompletion for MockBackend {
        async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, CompletionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_request.lock().unwrap() = Some(request.clone());
            self.reply
                .lock()
                .unwrap()
                .take()
                .expect("mock called more than once")
        }
    }

    const JUDGMENT: &str = "被告人张某，男，1985年3月2日出生，汉族，初中文化。";

    #[tokio::test]
    async fn empty_text_skips_remote_call() {
        let backend = MockBackend::replying("{}");
        let extractor = Extractor::new(backend, "deepseek-chat");

        let outcome = extractor.extract("").await;
        assert!(matches!(outcome, Extraction::Skipped));
        assert!(outcome.into_result().is_empty());
        assert_eq!(extractor.client().calls(), 0);

        assert!(matches!(extractor.extract("  \n ").await, Extraction::Skipped));
        assert_eq!(extractor.client().calls(), 0);
    }

    #[tokio::test]
    async fn valid_reply_keeps_reply_order() {
        let backend = MockBackend::replying(r#"{"肇事人": "张某", "性别": "男", "案件类型": "刑事案件", "酒精": "空"}"#);
        let extractor = Extractor::new(backend, "deepseek-chat");

        let outcome = extractor.extract(JUDGMENT).await;
        assert!(outcome.is_parsed());
        let result = outcome.into_result();
        let rows: Vec<(&str, &str)> = result.iter().collect();
        assert_eq!(
            rows,
            [
                ("肇事人", "张某"),
                ("性别", "男"),
                ("案件类型", "刑事案件"),
                ("酒精", "空"),
            ]
        );
        assert_eq!(extractor.client().calls(), 1);
    }

    #[tokio::test]
    async fn request_carries_model_and_prompt() {
        let backend = MockBackend::replying("{}");
        let extractor = Extractor::new(backend, "deepseek-chat");
        extractor.extract(JUDGMENT).await;

        let request = extractor.client().last_request.lock().unwrap().clone().unwrap();
        assert_eq!(request.model, "deepseek-chat");
        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.messages[0].role, Role::System);
        assert!(request.messages[1].content.ends_with(JUDGMENT));
    }

    #[tokio::test]
    async fn unknown_keys_are_dropped() {
        let backend = MockBackend::replying(r#"{"性别": "男", "法官": "李某", "民族": "汉族"}"#);
        let extractor = Extractor::new(backend, "deepseek-chat");

        match extractor.extract(JUDGMENT).await {
            Extraction::Parsed { result, dropped } => {
                assert_eq!(result.len(), 2);
                assert_eq!(result.get("民族"), Some("汉族"));
                assert_eq!(dropped, ["法官"]);
            }
            other => panic!("expected Parsed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn non_string_values_are_stringified() {
        let backend = MockBackend::replying(r#"{"伤亡数量": 2, "经济损失": null, "酒精": false}"#);
        let extractor = Extractor::new(backend, "deepseek-chat");

        let result = extractor.extract(JUDGMENT).await.into_result();
        assert_eq!(result.get("伤亡数量"), Some("2"));
        assert_eq!(result.get("经济损失"), Some("空"));
        assert_eq!(result.get("酒精"), Some("false"));
    }

    #[tokio::test]
    async fn prose_reply_is_parse_failure() {
        let backend = MockBackend::replying("抱歉，我无法从该文书中提取信息。");
        let extractor = Extractor::new(backend, "deepseek-chat");

        let outcome = extractor.extract(JUDGMENT).await;
        match &outcome {
            Extraction::ParseFailed { raw, .. } => assert!(raw.starts_with("抱歉")),
            other => panic!("expected ParseFailed, got {other:?}"),
        }
        assert!(outcome.into_result().is_empty());
    }

    #[tokio::test]
    async fn fenced_json_is_parse_failure() {
        let backend = MockBackend::replying("```json\n{\"性别\": \"男\"}\n```");
        let extractor = Extractor::new(backend, "deepseek-chat");

        let outcome = extractor.extract(JUDGMENT).await;
        assert!(matches!(outcome, Extraction::ParseFailed { .. }));
        assert!(outcome.into_result().is_empty());
    }

    #[tokio::test]
    async fn non_object_json_is_parse_failure() {
        let backend = MockBackend::replying(r#"["性别", "男"]"#);
        let extractor = Extractor::new(backend, "deepseek-chat");

        match extractor.extract(JUDGMENT).await {
            Extraction::ParseFailed { error, .. } => assert!(error.contains("an array")),
            other => panic!("expected ParseFailed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn no_choices_is_parse_failure() {
        let backend = MockBackend::with(Ok(ChatResponse::default()));
        let extractor = Extractor::new(backend, "deepseek-chat");

        let outcome = extractor.extract(JUDGMENT).await;
        assert!(matches!(outcome, Extraction::ParseFailed { ref raw, .. } if raw.is_empty()));
    }

    #[tokio::test]
    async fn transport_failure_degrades_to_empty() {
        let backend = MockBackend::with(Err(CompletionError::Server {
            status: 401,
            body: "Authentication Fails".into(),
        }));
        let extractor = Extractor::new(backend, "deepseek-chat");

        let outcome = extractor.extract(JUDGMENT).await;
        assert!(matches!(
            outcome,
            Extraction::TransportFailed(CompletionError::Server { status: 401, .. })
        ));
        assert!(outcome.into_result().is_empty());
        assert_eq!(extractor.client().calls(), 1);
    }

    #[test]
    fn parse_reply_preserves_order() {
        let (result, dropped) = parse_reply(r#"{"维持案件号": "空", "案件类型": "刑事"}"#).unwrap();
        assert!(dropped.is_empty());
        assert_eq!(result.rows()[0].0, "维持案件号");
        assert_eq!(result.rows()[1].0, "案件类型");
    }
}
