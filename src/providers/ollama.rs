//! Ollama client implementing the LLM and embedding provider traits

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::LlmConfig;
use crate::error::{Error, Result};

use super::embedding::EmbeddingProvider;
use super::llm::LlmProvider;

/// Client for a local Ollama server, used for both generation and embeddings
pub struct OllamaClient {
    client: reqwest::Client,
    base_url: String,
    generate_model: String,
    embed_model: String,
    temperature: f32,
    max_retries: u32,
    dimensions: usize,
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    embedding: Vec<f32>,
}

impl OllamaClient {
    /// Create a new client from configuration
    pub fn new(config: &LlmConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_default();

        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            generate_model: config.generate_model.clone(),
            embed_model: config.embed_model.clone(),
            temperature: config.temperature,
            max_retries: config.max_retries,
            dimensions: config.embed_dimensions,
        }
    }

    /// Map a reqwest failure to the crate error taxonomy
    fn map_error(e: reqwest::Error) -> Error {
        if e.is_timeout() {
            Error::BackendTimeout
        } else {
            Error::Backend(e.to_string())
        }
    }

    async fn generate_once(&self, prompt: &str) -> Result<String> {
        let request = GenerateRequest {
            model: &self.generate_model,
            prompt,
            stream: false,
            options: GenerateOptions {
                temperature: self.temperature,
            },
        };

        let response = self
            .client
            .post(format!("{}/api/generate", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(Self::map_error)?;

        if !response.status().is_success() {
            return Err(Error::Backend(format!(
                "Ollama returned HTTP {}",
                response.status()
            )));
        }

        let body: GenerateResponse = response.json().await.map_err(Self::map_error)?;
        Ok(body.response)
    }

    async fn embed_once(&self, text: &str) -> Result<Vec<f32>> {
        let request = EmbeddingRequest {
            model: &self.embed_model,
            prompt: text,
        };

        let response = self
            .client
            .post(format!("{}/api/embeddings", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(Self::map_error)?;

        if !response.status().is_success() {
            return Err(Error::Backend(format!(
                "Ollama returned HTTP {}",
                response.status()
            )));
        }

        let body: EmbeddingResponse = response.json().await.map_err(Self::map_error)?;
        Ok(body.embedding)
    }
}

#[async_trait]
impl LlmProvider for OllamaClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let mut attempt = 0;
        loop {
            match self.generate_once(prompt).await {
                Ok(text) => return Ok(text),
                // Timeouts bound client-visible latency; do not retry them
                Err(Error::BackendTimeout) => return Err(Error::BackendTimeout),
                Err(e) if attempt < self.max_retries => {
                    attempt += 1;
                    tracing::warn!(
                        "Generation attempt {}/{} failed: {}",
                        attempt,
                        self.max_retries,
                        e
                    );
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn health_check(&self) -> Result<bool> {
        let response = self
            .client
            .get(format!("{}/api/tags", self.base_url))
            .send()
            .await;
        Ok(matches!(response, Ok(r) if r.status().is_success()))
    }

    fn name(&self) -> &str {
        "ollama"
    }

    fn model(&self) -> &str {
        &self.generate_model
    }
}

#[async_trait]
impl EmbeddingProvider for OllamaClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut attempt = 0;
        loop {
            match self.embed_once(text).await {
                Ok(embedding) => return Ok(embedding),
                Err(Error::BackendTimeout) => return Err(Error::BackendTimeout),
                Err(e) if attempt < self.max_retries => {
                    attempt += 1;
                    tracing::warn!(
                        "Embedding attempt {}/{} failed: {}",
                        attempt,
                        self.max_retries,
                        e
                    );
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        "ollama"
    }
}
