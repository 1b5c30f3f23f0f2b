use thiserror::Error;

pub const MSG_SAVED: &str = "Data saved successfully!";
pub const MSG_SAVE_FAILED: &str = "Failed to save data";
pub const MSG_LOGIN_FAILED: &str = "Login failed";
pub const MSG_SIGNUP_FAILED: &str = "Signup failed";
pub const MSG_SIGNED_UP: &str = "Account created successfully";
pub const MSG_LOGGED_OUT: &str = "Logged out successfully";

/// Why a candidate triple was rejected. `Display` is the user-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ValidationError {
    #[error("All fields are required")]
    MissingField,
    #[error("All values must be valid numbers")]
    NotANumber,
    #[error("All values must be greater than zero")]
    NonPositiveValue,
    #[error("No single value can be 100 or more")]
    ValueTooLarge,
    #[error("Sum is {}. Need {} more to reach 100", number(.sum), number(.deficit))]
    SumTooLow { sum: f64, deficit: f64 },
    #[error("Sum is {}. Reduce by {} to reach 100", number(.sum), number(.excess))]
    SumTooHigh { sum: f64, excess: f64 },
}

impl ValidationError {
    /// Sum mismatches are the only rejections that clear the displayed chart.
    pub fn is_sum_mismatch(&self) -> bool {
        matches!(self, Self::SumTooLow { .. } | Self::SumTooHigh { .. })
    }
}

/// Shortest round-trip form; magnitudes below 1e-6 switch to exponent
/// notation (`8.000000661922968e-8`) as ECMAScript number strings do.
fn number(value: &f64) -> String {
    let magnitude = value.abs();
    if magnitude > 0.0 && magnitude < 1e-6 {
        format!("{value:e}")
    } else {
        value.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BridgeError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("server rejected request (status {status:?}): {}", .message.as_deref().unwrap_or("no message"))]
    Rejected {
        status: Option<u16>,
        message: Option<String>,
    },
    #[error("malformed server response: {0}")]
    Decode(String),
}

impl BridgeError {
    /// Human-readable message supplied by the server, if it sent one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Rejected {
                message: Some(message),
                ..
            } => Some(message.as_str()),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for BridgeError {
    fn from(value: reqwest::Error) -> Self {
        Self::Transport(value.to_string())
    }
}

/// Terminal outcome of a failed submission attempt. Never retried automatically.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SubmitError {
    #[error("{0}")]
    ValidationFailed(#[from] ValidationError),
    #[error("{0}")]
    PersistenceFailed(String),
}

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("failed to encode cached value: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("durable cache operation failed: {0:#}")]
    Backend(#[from] anyhow::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Please enter a valid 4-digit code")]
    InvalidCode,
    #[error("Please enter your name")]
    MissingName,
    #[error("{0}")]
    Rejected(String),
    #[error("session could not be stored: {0}")]
    Cache(String),
}
