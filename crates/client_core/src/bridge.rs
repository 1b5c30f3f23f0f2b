use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use shared::{
    domain::{DistributionEntry, ValueTriple},
    error::ApiError,
    protocol::{ApiEnvelope, CreateEntryRequest, LoginRequest, LoginResponse, SignupRequest},
};
use tracing::debug;

use crate::error::BridgeError;

/// Remote store of confirmed entries.
#[async_trait]
pub trait PersistenceBridge: Send + Sync {
    async fn fetch_history(&self, token: &str) -> Result<Vec<DistributionEntry>, BridgeError>;
    async fn create_entry(
        &self,
        triple: ValueTriple,
        token: &str,
    ) -> Result<DistributionEntry, BridgeError>;
}

/// Code-based sign-in. Successful calls also return the server's message.
#[async_trait]
pub trait AuthBridge: Send + Sync {
    async fn login(&self, code: &str) -> Result<(LoginResponse, Option<String>), BridgeError>;
    async fn signup(&self, name: &str, code: &str) -> Result<Option<String>, BridgeError>;
}

pub struct HttpPersistenceBridge {
    http: Client,
    base_url: String,
}

impl HttpPersistenceBridge {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }
}

#[async_trait]
impl PersistenceBridge for HttpPersistenceBridge {
    async fn fetch_history(&self, token: &str) -> Result<Vec<DistributionEntry>, BridgeError> {
        let res = self
            .http
            .get(self.endpoint("user/get-data"))
            .bearer_auth(token)
            .send()
            .await?;
        let entries: Vec<DistributionEntry> = require_data(read_envelope(res).await?)?;
        debug!(entries = entries.len(), "bridge: fetched history");
        Ok(entries)
    }

    async fn create_entry(
        &self,
        triple: ValueTriple,
        token: &str,
    ) -> Result<DistributionEntry, BridgeError> {
        let res = self
            .http
            .post(self.endpoint("user/create-data"))
            .bearer_auth(token)
            .json(&CreateEntryRequest::from(triple))
            .send()
            .await?;
        let entry: DistributionEntry = require_data(read_envelope(res).await?)?;
        debug!(entry_id = entry.id.0, "bridge: created entry");
        Ok(entry)
    }
}

#[async_trait]
impl AuthBridge for HttpPersistenceBridge {
    async fn login(&self, code: &str) -> Result<(LoginResponse, Option<String>), BridgeError> {
        let res = self
            .http
            .post(self.endpoint("auth/login"))
            .json(&LoginRequest {
                code: code.to_string(),
            })
            .send()
            .await?;
        let envelope: ApiEnvelope<LoginResponse> = read_envelope(res).await?;
        let message = envelope.message.clone();
        Ok((require_data(envelope)?, message))
    }

    async fn signup(&self, name: &str, code: &str) -> Result<Option<String>, BridgeError> {
        let res = self
            .http
            .post(self.endpoint("auth/signup"))
            .json(&SignupRequest {
                name: name.to_string(),
                code: code.to_string(),
            })
            .send()
            .await?;
        let envelope: ApiEnvelope<serde_json::Value> = read_envelope(res).await?;
        Ok(envelope.message)
    }
}

/// Decodes a response into its envelope. Non-2xx statuses and `success: false`
/// bodies become `Rejected`, keeping whatever message the server included.
async fn read_envelope<T: DeserializeOwned>(res: Response) -> Result<ApiEnvelope<T>, BridgeError> {
    let status = res.status();
    let body = res.bytes().await?;

    if !status.is_success() {
        let failure: ApiError = serde_json::from_slice(&body).unwrap_or_default();
        return Err(BridgeError::Rejected {
            status: Some(status.as_u16()),
            message: failure.message().map(str::to_owned),
        });
    }

    let envelope: ApiEnvelope<T> =
        serde_json::from_slice(&body).map_err(|err| BridgeError::Decode(err.to_string()))?;
    if !envelope.success {
        return Err(BridgeError::Rejected {
            status: Some(status.as_u16()),
            message: envelope.message,
        });
    }
    Ok(envelope)
}

fn require_data<T>(envelope: ApiEnvelope<T>) -> Result<T, BridgeError> {
    envelope
        .data
        .ok_or_else(|| BridgeError::Decode("response is missing its data field".into()))
}

#[cfg(test)]
#[path = "tests/bridge_tests.rs"]
mod tests;
