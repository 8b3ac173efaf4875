//! HTTP client for a running scorer server.

use crate::api::dto::ScorerDto;
use crate::utils::error::{Result, ScorerError};
use crate::utils::validation::validate_url;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode};
use std::path::Path;
use url::Url;

const API_PREFIX: &str = "api/TopScorers/";

#[derive(Debug, Clone)]
pub struct ScorerClient {
    base_url: Url,
    client: Client,
}

impl ScorerClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let mut base_url = validate_url("base_url", base_url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self {
            base_url,
            client: Client::new(),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(API_PREFIX)
            .and_then(|api| api.join(path))
            .map_err(|e| ScorerError::ConfigError {
                message: format!("Invalid endpoint {}: {}", path, e),
            })
    }

    pub async fn upload_content(&self, content: &str) -> Result<Vec<ScorerDto>> {
        let url = self.endpoint("scorers/content")?;
        tracing::debug!("POST {}", url);
        let response = self
            .client
            .post(url)
            .header(reqwest::header::CONTENT_TYPE, "text/plain; charset=utf-8")
            .body(content.to_string())
            .send()
            .await?;
        Self::read_json(response).await
    }

    pub async fn upload_file<P: AsRef<Path>>(&self, path: P) -> Result<Vec<ScorerDto>> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("upload.csv")
            .to_string();

        let part = Part::bytes(bytes)
            .file_name(file_name)
            .mime_str("text/csv")?;
        let form = Form::new().part("file", part);

        let url = self.endpoint("scorers/file")?;
        tracing::debug!("POST {} (multipart)", url);
        let response = self.client.post(url).multipart(form).send().await?;
        Self::read_json(response).await
    }

    pub async fn top_scorers(&self) -> Result<Vec<ScorerDto>> {
        let response = self.client.get(self.endpoint("topScorers")?).send().await?;
        Self::read_json(response).await
    }

    /// `Ok(None)` when the server reports no scorer with that name.
    pub async fn find_by_name(&self, name: &str) -> Result<Option<ScorerDto>> {
        let mut url = self.endpoint("topScorerByName/")?;
        url.path_segments_mut()
            .map_err(|_| ScorerError::ConfigError {
                message: "base URL cannot carry a path".to_string(),
            })?
            .pop_if_empty()
            .push(name);

        let response = self.client.get(url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        Self::read_json(response).await.map(Some)
    }

    pub async fn export_csv(&self) -> Result<String> {
        let response = self
            .client
            .get(self.endpoint("topScorers/csv")?)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.text().await?)
    }

    async fn read_json<T: serde::de::DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
            .unwrap_or(body);

        if status.is_client_error() {
            Err(ScorerError::InvalidInput { message })
        } else {
            Err(ScorerError::StoreError {
                message: format!("server returned {}: {}", status, message),
            })
        }
    }
}
