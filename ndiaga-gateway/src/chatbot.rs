//! Client for the travel-assistant endpoint.
//!
//! Unlike the booking calls, the assistant never surfaces an error to the
//! caller: it retries transient failures with a linear backoff and falls
//! back to a canned reply in the traveller's language when the service
//! stays unreachable.

use ndiaga_core::{ClientError, ClientResult};
use serde::Serialize;
use std::time::Duration;

/// Languages the assistant answers in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatLanguage {
    French,
    Wolof,
}

impl ChatLanguage {
    fn as_str(self) -> &'static str {
        match self {
            ChatLanguage::French => "fr",
            ChatLanguage::Wolof => "wolof",
        }
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    message: &'a str,
    language: &'a str,
}

pub struct ChatbotClient {
    http: reqwest::Client,
    base_url: String,
    max_retries: u32,
}

impl ChatbotClient {
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
        max_retries: u32,
    ) -> ClientResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::Network(e.to_string()))?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            max_retries,
        })
    }

    /// Asks the assistant a question. Always yields a displayable reply:
    /// transport failures are retried up to `max_retries` times with a
    /// linear backoff, except timeouts which abort immediately since the
    /// traveller has already waited a full attempt.
    pub async fn ask(&self, message: &str, language: ChatLanguage) -> String {
        let mut timed_out = false;

        for attempt in 0..=self.max_retries {
            match self.send(message, language).await {
                Ok(body) => return extract_reply(&body, language),
                Err(e) => {
                    tracing::warn!(
                        attempt = attempt + 1,
                        "Chat assistant request failed: {}",
                        e
                    );
                    if e.is_timeout() {
                        timed_out = true;
                        break;
                    }
                    if attempt < self.max_retries {
                        tokio::time::sleep(backoff_delay(attempt)).await;
                    }
                }
            }
        }

        if timed_out {
            timeout_fallback(language).to_string()
        } else {
            error_fallback(language).to_string()
        }
    }

    async fn send(&self, message: &str, language: ChatLanguage) -> Result<String, reqwest::Error> {
        let response = self
            .http
            .post(format!("{}/chatbot/chat", self.base_url))
            .json(&ChatRequest {
                message,
                language: language.as_str(),
            })
            .send()
            .await?
            .error_for_status()?;
        response.text().await
    }
}

/// Delay before retry `attempt + 2`: 1s after the first failure, 2s after
/// the second, and so on.
fn backoff_delay(attempt: u32) -> Duration {
    Duration::from_secs(u64::from(attempt) + 1)
}

/// The service answers either as JSON with a `response` (or legacy
/// `message`) field or as plain text. An empty reply still gets a canned
/// incomprehension message so the chat window never shows a blank bubble.
fn extract_reply(body: &str, language: ChatLanguage) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(reply) = value
            .get("response")
            .or_else(|| value.get("message"))
            .and_then(|r| r.as_str())
        {
            if !reply.is_empty() {
                return reply.to_string();
            }
            return empty_fallback(language).to_string();
        }
    }
    if body.trim().is_empty() {
        empty_fallback(language).to_string()
    } else {
        body.to_string()
    }
}

fn empty_fallback(language: ChatLanguage) -> &'static str {
    match language {
        ChatLanguage::French => "Désolé, je n'ai pas compris votre message.",
        ChatLanguage::Wolof => "Naka nga def, xamuma li nga wax.",
    }
}

fn timeout_fallback(language: ChatLanguage) -> &'static str {
    match language {
        ChatLanguage::French => {
            "Désolé, le chatbot met trop de temps à répondre. Veuillez réessayer."
        }
        ChatLanguage::Wolof => "Naka nga def, bot bi am ci bokk. Jéemaatal ci kanam.",
    }
}

fn error_fallback(language: ChatLanguage) -> &'static str {
    match language {
        ChatLanguage::French => {
            "Désolé, je rencontre des difficultés techniques. Veuillez réessayer plus tard."
        }
        ChatLanguage::Wolof => "Naka nga def, ma nga am ci bokk. Jéemaatal ci kanam.",
    }
}
