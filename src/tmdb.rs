use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use crate::config::CatalogConfig;

/// A list endpoint plus its query parameters, minus the api key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub path: String,
    pub params: Vec<(String, String)>,
}

impl ListQuery {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            params: Vec::new(),
        }
    }

    pub fn param(mut self, key: &str, value: impl ToString) -> Self {
        self.params.push((key.to_string(), value.to_string()));
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Raw access to the upstream movie API. Every method hands back the
/// untouched JSON body; shaping it is the normalizer's job.
#[async_trait]
pub trait MovieApi: Send + Sync {
    /// Movie record with credits and videos appended.
    async fn movie(&self, id: &str) -> Result<Value>;
    async fn similar(&self, id: &str) -> Result<Value>;
    async fn reviews(&self, id: &str) -> Result<Value>;
    async fn videos(&self, id: &str) -> Result<Value>;
    async fn search(&self, query: &str, page: u32) -> Result<Value>;
    async fn list(&self, query: &ListQuery) -> Result<Value>;
}

#[derive(Debug, Clone)]
pub struct TmdbClient {
    client: Client,
    api_key: String,
    base: String,
}

impl TmdbClient {
    pub fn new(config: &CatalogConfig) -> Result<Self> {
        let user_agent = format!("cinescope/{}", env!("CARGO_PKG_VERSION"));
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(config.request_timeout)
            .user_agent(user_agent)
            .build()
            .context("Failed to build TMDB HTTP client")?;
        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            base: config.api_base.clone(),
        })
    }

    pub fn from_env() -> Result<Self> {
        Self::new(&CatalogConfig::from_env()?)
    }

    fn url(&self, path: &str, params: &[(String, String)]) -> String {
        let mut url = format!(
            "{}{path}?api_key={}",
            self.base,
            urlencoding::encode(&self.api_key)
        );
        for (key, value) in params {
            url.push('&');
            url.push_str(key);
            url.push('=');
            url.push_str(&urlencoding::encode(value));
        }
        url
    }

    async fn get_json(&self, path: &str, params: &[(String, String)]) -> Result<Value> {
        debug!(path, "TMDB request");
        let res = self
            .client
            .get(self.url(path, params))
            .send()
            .await
            .with_context(|| format!("request to {path} failed"))?;
        let status = res.status();
        let text = res.text().await.context("reading body failed")?;
        if !status.is_success() {
            return Err(anyhow!("{path} -> {status}: {text}"));
        }
        let parsed: Value = serde_json::from_str(&text).context("JSON parse failed")?;
        Ok(parsed)
    }
}

#[async_trait]
impl MovieApi for TmdbClient {
    async fn movie(&self, id: &str) -> Result<Value> {
        let params = [(
            "append_to_response".to_string(),
            "credits,videos".to_string(),
        )];
        self.get_json(&format!("/movie/{}", urlencoding::encode(id)), &params)
            .await
    }

    async fn similar(&self, id: &str) -> Result<Value> {
        self.get_json(&format!("/movie/{}/similar", urlencoding::encode(id)), &[])
            .await
    }

    async fn reviews(&self, id: &str) -> Result<Value> {
        self.get_json(&format!("/movie/{}/reviews", urlencoding::encode(id)), &[])
            .await
    }

    async fn videos(&self, id: &str) -> Result<Value> {
        self.get_json(&format!("/movie/{}/videos", urlencoding::encode(id)), &[])
            .await
    }

    async fn search(&self, query: &str, page: u32) -> Result<Value> {
        let params = [
            ("query".to_string(), query.to_string()),
            ("page".to_string(), page.to_string()),
        ];
        self.get_json("/search/movie", &params).await
    }

    async fn list(&self, query: &ListQuery) -> Result<Value> {
        self.get_json(&query.path, &query.params).await
    }
}
