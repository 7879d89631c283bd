use anyhow::{anyhow, Result};
use registry_core::models::{NewToken, TokenRecord};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Clone)]
pub struct RegistryClient {
    pub client: reqwest::Client,
    base_url: String,
}

impl RegistryClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn tokens_url(&self) -> String {
        format!("{}/api/tokens", self.base_url)
    }

    pub async fn fetch_tokens(&self) -> Result<Vec<TokenRecord>> {
        let response = self.client.get(self.tokens_url()).send().await?;
        if !response.status().is_success() {
            return Err(error_from(response).await);
        }
        let tokens = response.json::<Vec<TokenRecord>>().await?;
        Ok(tokens)
    }

    pub async fn create_token(&self, token: &NewToken) -> Result<TokenRecord> {
        let response = self.client.post(self.tokens_url()).json(token).send().await?;
        if !response.status().is_success() {
            return Err(error_from(response).await);
        }
        let created = response.json::<TokenRecord>().await?;
        Ok(created)
    }
}

async fn error_from(response: reqwest::Response) -> anyhow::Error {
    let status = response.status();
    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&text)
        .map(|body| body.error)
        .unwrap_or(text);
    anyhow!("{} ({})", message, status)
}
