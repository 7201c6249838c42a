///! API client for the dbdeploy server

use anyhow::Result;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// Error body returned by the server on failed requests
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
    message: String,
}

pub struct ApiClient {
    base_url: String,
    client: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str, query: &[(&str, &str)]) -> String {
        let mut url = format!("{}{}", self.base_url, path);
        for (i, (key, value)) in query.iter().enumerate() {
            url.push(if i == 0 { '?' } else { '&' });
            url.push_str(&urlencoding::encode(key));
            url.push('=');
            url.push_str(&urlencoding::encode(value));
        }
        url
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response> {
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status();
        let error_text = response.text().await.unwrap_or_default();
        match serde_json::from_str::<ErrorBody>(&error_text) {
            Ok(body) => anyhow::bail!("{} ({}): {}", body.error, status.as_u16(), body.message),
            Err(_) => anyhow::bail!("API request failed: {} - {}", status, error_text),
        }
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.client.get(self.url(path, &[])).send().await?;
        let data = Self::check(response).await?.json().await?;
        Ok(data)
    }

    /// GET that hands back the status alongside the body, for endpoints that
    /// report a JSON payload on non-success codes
    pub async fn get_with_status<T: DeserializeOwned>(&self, path: &str) -> Result<(StatusCode, T)> {
        let response = self.client.get(self.url(path, &[])).send().await?;
        let status = response.status();
        let data = response.json().await?;
        Ok((status, data))
    }

    /// POST with parameters in the query string and no body
    pub async fn post_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T> {
        let response = self.client.post(self.url(path, query)).send().await?;
        let data = Self::check(response).await?.json().await?;
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_without_query() {
        let api = ApiClient::new("http://localhost:8000/");
        assert_eq!(api.url("/api/databases", &[]), "http://localhost:8000/api/databases");
    }

    #[test]
    fn test_url_encodes_query() {
        let api = ApiClient::new("http://localhost:8000");
        let url = api.url(
            "/deploy_stateful",
            &[("db_name", "orders"), ("db_type", "my sql&x")],
        );
        assert_eq!(
            url,
            "http://localhost:8000/deploy_stateful?db_name=orders&db_type=my%20sql%26x"
        );
    }
}
