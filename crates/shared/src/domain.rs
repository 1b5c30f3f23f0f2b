use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);
    };
}

id_newtype!(EntryId);

/// Three percentage values A, B and C.
///
/// Produced by the triple validator; a triple that came out of validation has
/// every component in `(0, 100)` and components summing to exactly 100.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueTriple {
    #[serde(rename = "valueA")]
    pub a: f64,
    #[serde(rename = "valueB")]
    pub b: f64,
    #[serde(rename = "valueC")]
    pub c: f64,
}

impl ValueTriple {
    pub fn new(a: f64, b: f64, c: f64) -> Self {
        Self { a, b, c }
    }

    pub fn sum(&self) -> f64 {
        self.a + self.b + self.c
    }

    pub fn components(&self) -> [f64; 3] {
        [self.a, self.b, self.c]
    }
}

/// A server-confirmed submission. The server assigns `id` and `recorded_at`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributionEntry {
    pub id: EntryId,
    pub value_a: f64,
    pub value_b: f64,
    pub value_c: f64,
    pub recorded_at: DateTime<Utc>,
}

impl DistributionEntry {
    pub fn triple(&self) -> ValueTriple {
        ValueTriple::new(self.value_a, self.value_b, self.value_c)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: String,
    pub code: String,
}

/// Authenticated session as handed out by the login endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<UserProfile>,
}

impl SessionState {
    pub fn new(token: impl Into<String>, user: UserProfile) -> Self {
        Self {
            token: Some(token.into()),
            user: Some(user),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}
