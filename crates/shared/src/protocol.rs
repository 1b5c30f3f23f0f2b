use serde::{Deserialize, Serialize};

use crate::domain::{DistributionEntry, UserProfile, ValueTriple};

/// `{ success, message?, data? }` wrapper used by every backend endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiEnvelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            data: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEntryRequest {
    pub value_a: f64,
    pub value_b: f64,
    pub value_c: f64,
}

impl From<ValueTriple> for CreateEntryRequest {
    fn from(triple: ValueTriple) -> Self {
        Self {
            value_a: triple.a,
            value_b: triple.b,
            value_c: triple.c,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub user: UserProfile,
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignupRequest {
    pub name: String,
    pub code: String,
}

pub type HistoryResponse = ApiEnvelope<Vec<DistributionEntry>>;
pub type CreateEntryResponse = ApiEnvelope<DistributionEntry>;

#[cfg(test)]
#[path = "tests/protocol_tests.rs"]
mod tests;
