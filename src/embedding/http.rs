// file: src/embedding/http.rs
// description: OpenAI-compatible embeddings endpoint client
// reference: https://platform.openai.com/docs/api-reference/embeddings

use super::{Embedder, Embedding};
use crate::config::EmbeddingConfig;
use crate::error::{RankerError, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    input: &'a [String],
    model: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
    #[serde(default)]
    index: Option<usize>,
}

pub struct HttpEmbeddingClient {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
    model: String,
    dimension: usize,
}

impl HttpEmbeddingClient {
    pub fn new(config: &EmbeddingConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                RankerError::ModelUnavailable(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            dimension: config.dimension,
        })
    }

    /// Sort by `index`, which must cover `0..data.len()` exactly once.
    fn order_by_index(data: &mut [EmbeddingData]) -> Result<()> {
        let mut seen = vec![false; data.len()];
        for item in data.iter() {
            let slot = item
                .index
                .and_then(|index| seen.get_mut(index))
                .ok_or_else(|| {
                    RankerError::Embedding(format!(
                        "Embedding index {:?} is missing or out of range for {} inputs",
                        item.index,
                        data.len()
                    ))
                })?;

            if *slot {
                return Err(RankerError::Embedding(format!(
                    "Duplicate embedding index {:?} in response",
                    item.index
                )));
            }
            *slot = true;
        }

        data.sort_by_key(|d| d.index);
        Ok(())
    }

    fn status_error(status: StatusCode, body: String) -> RankerError {
        let message = format!("Embedding request failed with status {}: {}", status, body);
        if status.is_server_error()
            || matches!(
                status,
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN | StatusCode::NOT_FOUND
            )
        {
            RankerError::ModelUnavailable(message)
        } else {
            RankerError::Embedding(message)
        }
    }
}

#[async_trait]
impl Embedder for HttpEmbeddingClient {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Embedding>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let request = EmbeddingRequest {
            input: texts,
            model: &self.model,
        };

        debug!(
            "Requesting {} embeddings from {} ({})",
            texts.len(),
            self.endpoint,
            self.model
        );

        let mut builder = self.client.post(&self.endpoint).json(&request);
        if let Some(api_key) = &self.api_key {
            builder = builder.bearer_auth(api_key);
        }

        let response = builder.send().await.map_err(|e| {
            RankerError::ModelUnavailable(format!(
                "Failed to reach embeddings endpoint {}: {}",
                self.endpoint, e
            ))
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(Self::status_error(status, error_text));
        }

        let embedding_response: EmbeddingResponse = response.json().await.map_err(|e| {
            RankerError::Embedding(format!("Failed to parse embeddings response: {}", e))
        })?;

        let mut data = embedding_response.data;
        if data.len() != texts.len() {
            return Err(RankerError::Embedding(format!(
                "Endpoint returned {} embeddings for {} inputs",
                data.len(),
                texts.len()
            )));
        }

        if data.iter().any(|d| d.index.is_some()) {
            Self::order_by_index(&mut data)?;
        }

        debug!(
            "Received {} embeddings of dimension {}",
            data.len(),
            data.first().map(|d| d.embedding.len()).unwrap_or(0)
        );

        Ok(data.into_iter().map(|d| d.embedding).collect())
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve a single HTTP response on a random local port and return the endpoint URL.
    async fn serve_once(status_line: &'static str, body: String) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();

            let mut request = Vec::new();
            let mut buf = [0u8; 4096];
            loop {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);

                let text = String::from_utf8_lossy(&request);
                if let Some(header_end) = text.find("\r\n\r\n") {
                    let content_length = text[..header_end]
                        .lines()
                        .find_map(|line| {
                            let lower = line.to_ascii_lowercase();
                            lower
                                .strip_prefix("content-length:")
                                .map(|v| v.trim().parse::<usize>().unwrap())
                        })
                        .unwrap_or(0);
                    if request.len() >= header_end + 4 + content_length {
                        break;
                    }
                }
            }

            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
        });

        format!("http://{}/v1/embeddings", addr)
    }

    fn client_for(endpoint: String) -> HttpEmbeddingClient {
        let mut config = Config::default_config().embedding;
        config.endpoint = endpoint;
        config.dimension = 3;
        config.timeout_secs = 5;
        HttpEmbeddingClient::new(&config).unwrap()
    }

    #[tokio::test]
    async fn test_embeddings_are_reordered_by_index() {
        let body = r#"{"data":[
            {"embedding":[0.0,1.0,0.0],"index":1},
            {"embedding":[1.0,0.0,0.0],"index":0}
        ]}"#
        .to_string();
        let endpoint = serve_once("200 OK", body).await;
        let client = client_for(endpoint);

        let embeddings = client
            .embed(&["first".to_string(), "second".to_string()])
            .await
            .unwrap();

        assert_eq!(embeddings, vec![vec![1.0, 0.0, 0.0], vec![0.0, 1.0, 0.0]]);
    }

    #[tokio::test]
    async fn test_refused_connection_is_model_unavailable() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = client_for(format!("http://{}/v1/embeddings", addr));
        let result = client.embed(&["text".to_string()]).await;

        assert!(matches!(result, Err(RankerError::ModelUnavailable(_))));
    }

    #[tokio::test]
    async fn test_server_error_is_model_unavailable() {
        let endpoint = serve_once("503 Service Unavailable", "{}".to_string()).await;
        let client = client_for(endpoint);

        let result = client.embed(&["text".to_string()]).await;
        assert!(matches!(result, Err(RankerError::ModelUnavailable(_))));
    }

    #[tokio::test]
    async fn test_count_mismatch_is_embedding_error() {
        let body = r#"{"data":[{"embedding":[1.0,0.0,0.0],"index":0}]}"#.to_string();
        let endpoint = serve_once("200 OK", body).await;
        let client = client_for(endpoint);

        let result = client
            .embed(&["one".to_string(), "two".to_string()])
            .await;
        assert!(matches!(result, Err(RankerError::Embedding(_))));
    }

    #[tokio::test]
    async fn test_duplicate_index_is_embedding_error() {
        let body = r#"{"data":[
            {"embedding":[1.0,0.0,0.0],"index":0},
            {"embedding":[0.0,1.0,0.0],"index":0}
        ]}"#
        .to_string();
        let endpoint = serve_once("200 OK", body).await;
        let client = client_for(endpoint);

        let result = client.embed(&["a".to_string(), "b".to_string()]).await;
        assert!(matches!(result, Err(RankerError::Embedding(_))));
    }

    #[tokio::test]
    async fn test_out_of_range_index_is_embedding_error() {
        let body = r#"{"data":[
            {"embedding":[1.0,0.0,0.0],"index":0},
            {"embedding":[0.0,1.0,0.0],"index":5}
        ]}"#
        .to_string();
        let endpoint = serve_once("200 OK", body).await;
        let client = client_for(endpoint);

        let result = client.embed(&["a".to_string(), "b".to_string()]).await;
        assert!(matches!(result, Err(RankerError::Embedding(_))));
    }

    #[tokio::test]
    async fn test_empty_batch_skips_request() {
        let client = client_for("http://127.0.0.1:9/v1/embeddings".to_string());
        assert!(client.embed(&[]).await.unwrap().is_empty());
    }
}
