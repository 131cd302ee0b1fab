use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use tokio::sync::RwLock;

use crate::core::config::Settings;
use crate::services::prompts::{build_chat_prompt, build_prompt, GenerationParams, PromptKind};

/// Anything that can turn a prompt into text. Injected so tests and the
/// router can run without a live model endpoint.
#[async_trait]
pub(crate) trait CompletionBackend: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String>;
}

#[derive(Debug, Clone)]
pub(crate) struct OpenAiBackend {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    max_tokens: u32,
}

impl OpenAiBackend {
    pub(crate) fn from_settings(settings: &Settings) -> Result<Self> {
        let timeout = Duration::from_secs(settings.ai().ai_request_timeout);
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(30))
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            api_key: settings.ai().openai_api_key.clone(),
            base_url: settings.ai().openai_base_url.trim_end_matches('/').to_string(),
            model: settings.ai().ai_model.clone(),
            max_tokens: settings.ai().ai_max_tokens,
        })
    }
}

#[async_trait]
impl CompletionBackend for OpenAiBackend {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let payload = json!({
            "model": self.model,
            "messages": [{"role": "user", "content": prompt}],
            "max_completion_tokens": self.max_tokens,
        });

        let url = format!("{}/chat/completions", self.base_url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .context("Failed to call completion API")?;

        let status = response.status();
        let body: Value = response.json().await.unwrap_or(Value::Null);
        if !status.is_success() {
            anyhow::bail!("Completion API error ({status}): {body}");
        }

        let content = body
            .get("choices")
            .and_then(|choices| choices.get(0))
            .and_then(|choice| choice.get("message"))
            .and_then(|message| message.get("content"))
            .and_then(|value| value.as_str())
            .unwrap_or_default();

        Ok(content.to_string())
    }
}

/// Generation gateway: prompt building, one in-process response cache and a
/// pluggable completion backend.
#[derive(Clone)]
pub(crate) struct GenerationService {
    backend: Arc<dyn CompletionBackend>,
    cache: Arc<RwLock<HashMap<String, String>>>,
    cache_max_entries: usize,
}

impl GenerationService {
    pub(crate) fn from_settings(settings: &Settings) -> Result<Self> {
        let backend = OpenAiBackend::from_settings(settings)?;
        Ok(Self::new(Arc::new(backend), settings.ai().cache_max_entries as usize))
    }

    pub(crate) fn new(backend: Arc<dyn CompletionBackend>, cache_max_entries: usize) -> Self {
        Self { backend, cache: Arc::new(RwLock::new(HashMap::new())), cache_max_entries }
    }

    /// Cached path. The key covers every parameter that changes the prompt,
    /// so a hit is byte-identical to the first answer for that tuple.
    pub(crate) async fn generate(&self, params: &GenerationParams) -> Result<String> {
        let key = cache_key(params);

        if let Some(hit) = self.cache.read().await.get(&key) {
            metrics::counter!("generation_cache_hits_total").increment(1);
            return Ok(hit.clone());
        }

        let text = self.backend.complete(&build_prompt(params)).await?;
        metrics::counter!("generation_backend_calls_total").increment(1);

        let mut cache = self.cache.write().await;
        if cache.len() >= self.cache_max_entries {
            tracing::debug!(entries = cache.len(), "Resetting generation cache");
            cache.clear();
        }
        cache.insert(key, text.clone());

        Ok(text)
    }

    /// Chat turns depend on the running message, so they always hit the
    /// backend.
    pub(crate) async fn chat(&self, params: &GenerationParams, message: &str) -> Result<String> {
        metrics::counter!("generation_backend_calls_total").increment(1);
        self.backend.complete(&build_chat_prompt(params, message)).await
    }

    pub(crate) fn is_chat(params: &GenerationParams, message: Option<&str>) -> bool {
        message.is_some_and(|m| !m.trim().is_empty()) || params.kind() == PromptKind::Chat
    }
}

fn cache_key(params: &GenerationParams) -> String {
    [
        params.student_class.as_str(),
        params.subject.as_str(),
        params.topic.as_str(),
        params.difficulty.as_str(),
        params.type_label.as_str(),
    ]
    .join("\u{1f}")
        + "\u{1f}"
        + &params.count.to_string()
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use anyhow::Result;
    use async_trait::async_trait;

    use super::{CompletionBackend, GenerationService};
    use crate::services::prompts::GenerationParams;

    struct CountingBackend {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl CompletionBackend for CountingBackend {
        async fn complete(&self, prompt: &str) -> Result<String> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            Ok(format!("answer #{n} for: {}", prompt.lines().next().unwrap_or_default()))
        }
    }

    fn params(topic: &str) -> GenerationParams {
        GenerationParams {
            student_class: "Class 5".to_string(),
            subject: "Math".to_string(),
            topic: topic.to_string(),
            difficulty: "Easy".to_string(),
            type_label: "MCQ".to_string(),
            count: 5,
        }
    }

    fn service(cap: usize) -> (GenerationService, Arc<CountingBackend>) {
        let backend = Arc::new(CountingBackend { calls: AtomicUsize::new(0) });
        (GenerationService::new(backend.clone(), cap), backend)
    }

    #[tokio::test]
    async fn repeated_tuple_hits_cache_and_returns_identical_text() {
        let (service, backend) = service(16);

        let first = service.generate(&params("Fractions")).await.unwrap();
        let second = service.generate(&params("Fractions")).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn different_tuples_get_separate_entries() {
        let (service, backend) = service(16);

        let fractions = service.generate(&params("Fractions")).await.unwrap();
        let decimals = service.generate(&params("Decimals")).await.unwrap();

        assert_ne!(fractions, decimals);
        assert_eq!(backend.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn cache_resets_when_full() {
        let (service, backend) = service(1);

        service.generate(&params("Fractions")).await.unwrap();
        // Second tuple evicts the whole map before inserting.
        service.generate(&params("Decimals")).await.unwrap();
        service.generate(&params("Fractions")).await.unwrap();

        assert_eq!(backend.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn chat_bypasses_the_cache() {
        let (service, backend) = service(16);

        service.chat(&params("Fractions"), "hello").await.unwrap();
        service.chat(&params("Fractions"), "hello").await.unwrap();

        assert_eq!(backend.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn chat_detection_covers_message_and_type() {
        let mut p = params("Fractions");
        assert!(!GenerationService::is_chat(&p, None));
        assert!(!GenerationService::is_chat(&p, Some("  ")));
        assert!(GenerationService::is_chat(&p, Some("hi")));

        p.type_label = "CONVERSATION".to_string();
        assert!(GenerationService::is_chat(&p, None));
    }
}
