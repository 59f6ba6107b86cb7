//! Task API client - asks the optimizer to start a GA run.
//!
//! A task is created with a single POST; its id then names the WebSocket
//! channel the optimizer streams populations over.

use super::error::{ClientError, Result};
use evoplat_core::config::{ClientConfig, OptimizationConfig};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::time::Duration;

/// Body of `POST /api/tasks`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationRequest {
    pub problem_type: String,
    pub population_size: usize,
    pub dimension: usize,
    pub mutation_rate: f64,
    pub crossover_rate: f64,
    pub max_generations: u32,
    #[serde(default)]
    pub parameters: Map<String, Value>,
}

impl OptimizationRequest {
    #[must_use]
    pub fn from_config(config: &OptimizationConfig) -> Self {
        Self {
            problem_type: config.problem_type.clone(),
            population_size: config.population_size,
            dimension: config.dimension,
            mutation_rate: config.mutation_rate,
            crossover_rate: config.crossover_rate,
            max_generations: config.max_generations,
            parameters: Map::new(),
        }
    }

    /// Checks the bounds the optimizer enforces, so a bad request fails
    /// locally with a readable message.
    pub fn validate(&self) -> Result<()> {
        if !(10..=1000).contains(&self.population_size) {
            return Err(ClientError::validation(format!(
                "population_size {} not in [10, 1000]",
                self.population_size
            )));
        }
        if !(2..=100).contains(&self.dimension) {
            return Err(ClientError::validation(format!(
                "dimension {} not in [2, 100]",
                self.dimension
            )));
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) || !(0.0..=1.0).contains(&self.crossover_rate)
        {
            return Err(ClientError::validation("rates must be in [0, 1]"));
        }
        if !(1..=1000).contains(&self.max_generations) {
            return Err(ClientError::validation(format!(
                "max_generations {} not in [1, 1000]",
                self.max_generations
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskResponse {
    pub task_id: String,
    pub status: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// WebSocket URL of a task's evaluation channel.
#[must_use]
pub fn channel_url(ws_url: &str, task_id: &str) -> String {
    format!("{}/ws/tasks/{}", ws_url.trim_end_matches('/'), task_id)
}

pub struct TaskClient {
    client: Client,
    api_url: String,
}

impl TaskClient {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self {
            client,
            api_url: config.api_url.trim_end_matches('/').to_string(),
        })
    }

    #[must_use]
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Creates an optimization task.
    ///
    /// HTTP 429 maps to [`ClientError::TaskLimit`]; nothing is retried.
    pub async fn create_task(&self, request: &OptimizationRequest) -> Result<TaskResponse> {
        request.validate()?;
        let url = format!("{}/api/tasks", self.api_url);
        tracing::info!(
            url = %url,
            population = request.population_size,
            dimension = request.dimension,
            "Creating optimization task"
        );

        let response = self.client.post(&url).json(request).send().await?;
        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::TaskLimit(body));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::rejected(status.as_u16(), body));
        }

        let task: TaskResponse = response.json().await?;
        tracing::info!(task_id = %task.task_id, status = %task.status, "Task created");
        Ok(task)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serves one request with a canned response and returns the raw request.
    async fn serve_once(status_line: &'static str, body: &'static str) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("addr");
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.expect("accept");
            let mut buf = Vec::new();
            let mut chunk = [0u8; 1024];
            loop {
                let n = socket.read(&mut chunk).await.expect("read");
                if n == 0 {
                    break;
                }
                buf.extend_from_slice(&chunk[..n]);
                let text = String::from_utf8_lossy(&buf);
                if let Some(end) = text.find("\r\n\r\n") {
                    let content_length = text[..end]
                        .lines()
                        .find_map(|l| {
                            let (k, v) = l.split_once(':')?;
                            k.eq_ignore_ascii_case("content-length")
                                .then(|| v.trim().parse::<usize>().ok())
                                .flatten()
                        })
                        .unwrap_or(0);
                    if buf.len() >= end + 4 + content_length {
                        break;
                    }
                }
            }
            let response = format!(
                "{status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.expect("write");
            socket.shutdown().await.ok();
            String::from_utf8_lossy(&buf).into_owned()
        });
        (format!("http://{addr}"), handle)
    }

    fn client_for(api_url: String) -> TaskClient {
        TaskClient::new(&ClientConfig {
            api_url,
            ..Default::default()
        })
        .expect("Client should build")
    }

    #[test]
    fn test_channel_url() {
        assert_eq!(
            channel_url("ws://localhost:8000/", "abc"),
            "ws://localhost:8000/ws/tasks/abc"
        );
    }

    #[test]
    fn test_request_from_default_config_is_valid() {
        let request = OptimizationRequest::from_config(&OptimizationConfig::default());
        assert_eq!(request.problem_type, "GPA");
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_request_bounds() {
        let mut request = OptimizationRequest::from_config(&OptimizationConfig::default());
        request.population_size = 5;
        assert!(matches!(request.validate(), Err(ClientError::Validation(_))));

        let mut request = OptimizationRequest::from_config(&OptimizationConfig::default());
        request.crossover_rate = 1.5;
        assert!(request.validate().is_err());
    }

    #[tokio::test]
    async fn test_create_task_success() {
        let (url, server) = serve_once(
            "HTTP/1.1 200 OK",
            r#"{"task_id":"t-42","status":"created","created_at":"2024-01-01T00:00:00"}"#,
        )
        .await;
        let client = client_for(url);
        let request = OptimizationRequest::from_config(&OptimizationConfig::default());
        let task = client.create_task(&request).await.expect("Task should be created");
        assert_eq!(task.task_id, "t-42");
        assert_eq!(task.message, None);

        let raw = server.await.expect("server task");
        assert!(raw.starts_with("POST /api/tasks"));
        assert!(raw.contains("\"problem_type\":\"GPA\""));
    }

    #[tokio::test]
    async fn test_create_task_at_limit() {
        let (url, _server) = serve_once(
            "HTTP/1.1 429 Too Many Requests",
            r#"{"detail":"Maximum concurrent tasks reached"}"#,
        )
        .await;
        let client = client_for(url);
        let request = OptimizationRequest::from_config(&OptimizationConfig::default());
        let err = client.create_task(&request).await.expect_err("Should be rejected");
        assert!(matches!(err, ClientError::TaskLimit(ref body) if body.contains("Maximum")));
    }
}
