//! Remote text-analysis client (OpenAI-style chat completions).
//!
//! The model is asked to reply with a bare JSON object matching
//! [`Analysis`]; anything else is a [`FeedbackError::Malformed`] and the
//! service above falls back.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use super::{Analysis, AnalysisRequest, DanceAnalyzer, FeedbackError};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-4o-mini";

const SYSTEM_PROMPT: &str = "You are a dance coach scoring a described practice video. \
Reply with ONLY a JSON object: {\"overallScore\": 0-100, \"rhythmScore\": 0-100, \
\"formScore\": 0-100, \"energyScore\": 0-100, \"suggestions\": [\"...\"]}. \
No prose, no markdown fences.";

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: String,
}

/// Chat-completions-backed analyzer.
pub struct RemoteAnalyzer {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl RemoteAnalyzer {
    /// Analyzer against the default provider endpoint.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.into(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.into(),
        }
    }

    /// Override the endpoint (tests point this at a local mock).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Override the model name.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

#[async_trait]
impl DanceAnalyzer for RemoteAnalyzer {
    async fn analyze(&self, request: &AnalysisRequest) -> Result<Analysis, FeedbackError> {
        let depth = if request.is_premium {
            "Give at least three specific suggestions."
        } else {
            "Give one or two suggestions."
        };
        let body = json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": SYSTEM_PROMPT},
                {"role": "user", "content": format!("{} {depth}", request.video_description)},
            ],
            "temperature": 0.4,
        });

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        let chat: ChatResponse = response.json().await?;
        let content = chat
            .choices
            .first()
            .map(|c| c.message.content.trim())
            .ok_or_else(|| FeedbackError::Malformed("empty choices".into()))?;
        debug!(len = content.len(), "received analysis content");

        serde_json::from_str(content)
            .map_err(|e| FeedbackError::Malformed(format!("content is not an analysis: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request() -> AnalysisRequest {
        AnalysisRequest {
            video_description: "solo hiphop freestyle, 60 seconds".into(),
            is_premium: false,
        }
    }

    fn chat_reply(content: &str) -> serde_json::Value {
        serde_json::json!({
            "choices": [{"message": {"role": "assistant", "content": content}}]
        })
    }

    #[tokio::test]
    async fn parses_well_formed_analysis() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(chat_reply(
                r#"{"overallScore":84,"rhythmScore":80,"formScore":86,"energyScore":90,"suggestions":["Land softer on the drop"]}"#,
            )))
            .mount(&server)
            .await;

        let analyzer = RemoteAnalyzer::new("test-key").with_base_url(server.uri());
        let analysis = analyzer.analyze(&request()).await.unwrap();
        assert_eq!(analysis.overall_score, 84);
        assert_eq!(analysis.suggestions, vec!["Land softer on the drop"]);
    }

    #[tokio::test]
    async fn sends_the_configured_model() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(serde_json::json!({"model": "test-model"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(chat_reply(
                r#"{"overallScore":1,"rhythmScore":1,"formScore":1,"energyScore":1,"suggestions":[]}"#,
            )))
            .expect(1)
            .mount(&server)
            .await;

        let analyzer = RemoteAnalyzer::new("k")
            .with_base_url(server.uri())
            .with_model("test-model");
        let _ = analyzer.analyze(&request()).await.unwrap();
    }

    #[tokio::test]
    async fn http_error_is_surfaced() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let analyzer = RemoteAnalyzer::new("k").with_base_url(server.uri());
        let result = analyzer.analyze(&request()).await;
        assert!(matches!(result, Err(FeedbackError::Http(_))));
    }

    #[tokio::test]
    async fn prose_content_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(chat_reply("Great dancing! I'd score it about 80.")),
            )
            .mount(&server)
            .await;

        let analyzer = RemoteAnalyzer::new("k").with_base_url(server.uri());
        let result = analyzer.analyze(&request()).await;
        assert!(matches!(result, Err(FeedbackError::Malformed(_))));
    }

    #[tokio::test]
    async fn empty_choices_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"choices": []})),
            )
            .mount(&server)
            .await;

        let analyzer = RemoteAnalyzer::new("k").with_base_url(server.uri());
        let result = analyzer.analyze(&request()).await;
        assert!(matches!(result, Err(FeedbackError::Malformed(_))));
    }
}
