// file: src/azure/rest.rs
// version: 1.0.0
// guid: 5a92e74c-16d8-4b30-9fe1-c04b83d627a9

//! Management-plane REST client

use crate::{error::SubmitAgentError, Result};
use reqwest::Method;
use serde_json::Value;
use tracing::{debug, error};
use uuid::Uuid;

/// Base endpoint for relative request paths
pub const MANAGEMENT_ENDPOINT: &str = "https://management.azure.com";

/// Authenticated client for Azure Resource Manager calls
pub struct RestClient {
    http: reqwest::Client,
    token: String,
}

impl RestClient {
    /// Build a client with a bearer token from the logged-in Azure CLI
    pub async fn connect() -> Result<Self> {
        let token = super::auth::get_access_token().await?;
        Ok(Self {
            http: reqwest::Client::new(),
            token: token.access_token,
        })
    }

    /// Build a client around an existing bearer token
    pub fn with_token(token: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            token,
        }
    }

    /// PUT a JSON body to an ARM path
    pub async fn put(&self, path: &str, body: &Value) -> Result<Value> {
        self.request(Method::PUT, path, Some(body)).await
    }

    /// GET an ARM path
    pub async fn get(&self, path: &str) -> Result<Value> {
        self.request(Method::GET, path, None).await
    }

    async fn request(&self, method: Method, path: &str, body: Option<&Value>) -> Result<Value> {
        let url = if path.starts_with("http") {
            path.to_string()
        } else {
            format!("{}{}", MANAGEMENT_ENDPOINT, path)
        };

        debug!("REST > {} {}", method, url);

        let mut request = self
            .http
            .request(method.clone(), &url)
            .bearer_auth(&self.token)
            .header("Content-Type", "application/json")
            .header("x-ms-client-request-id", Uuid::new_v4().to_string());
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            error!("REST {} {} failed with {}", method, url, status);
            return Err(SubmitAgentError::RestError {
                status: status.as_u16(),
                body: text,
            });
        }

        debug!("REST < {}", text);
        if text.is_empty() {
            Ok(Value::Null)
        } else {
            Ok(serde_json::from_str(&text)?)
        }
    }
}
