//! Pure checks applied to raw form input before anything is displayed or sent.

use shared::domain::ValueTriple;

use crate::error::{AuthError, ValidationError};

pub const TARGET_SUM: f64 = 100.0;
const ACCESS_CODE_LEN: usize = 4;

/// Validates three raw field values as a percentage split.
///
/// Rules run in a fixed order across all three fields and the first failing
/// rule decides the error: presence, numeric parse, `> 0`, `< 100`, then the
/// sum. The sum is compared to 100 with exact floating-point equality, so
/// `33.33 + 33.33 + 33.34` is judged on its binary value.
pub fn validate(a_raw: &str, b_raw: &str, c_raw: &str) -> Result<ValueTriple, ValidationError> {
    let raw = [a_raw.trim(), b_raw.trim(), c_raw.trim()];
    if raw.iter().any(|field| field.is_empty()) {
        return Err(ValidationError::MissingField);
    }

    let mut parsed = [0.0_f64; 3];
    for (slot, field) in parsed.iter_mut().zip(raw) {
        *slot = parse_decimal(field).ok_or(ValidationError::NotANumber)?;
    }
    let [a, b, c] = parsed;

    if parsed.iter().any(|value| *value <= 0.0) {
        return Err(ValidationError::NonPositiveValue);
    }
    if parsed.iter().any(|value| *value >= TARGET_SUM) {
        return Err(ValidationError::ValueTooLarge);
    }

    let sum = a + b + c;
    if sum == TARGET_SUM {
        Ok(ValueTriple::new(a, b, c))
    } else if sum < TARGET_SUM {
        Err(ValidationError::SumTooLow {
            sum,
            deficit: TARGET_SUM - sum,
        })
    } else {
        Err(ValidationError::SumTooHigh {
            sum,
            excess: sum - TARGET_SUM,
        })
    }
}

fn parse_decimal(field: &str) -> Option<f64> {
    field.parse::<f64>().ok().filter(|value| value.is_finite())
}

/// Access codes are exactly four ASCII digits.
pub fn validate_access_code(code: &str) -> Result<&str, AuthError> {
    let code = code.trim();
    if code.len() == ACCESS_CODE_LEN && code.bytes().all(|b| b.is_ascii_digit()) {
        Ok(code)
    } else {
        Err(AuthError::InvalidCode)
    }
}

pub fn validate_display_name(name: &str) -> Result<&str, AuthError> {
    let name = name.trim();
    if name.is_empty() {
        Err(AuthError::MissingName)
    } else {
        Ok(name)
    }
}

#[cfg(test)]
#[path = "tests/validator_tests.rs"]
mod tests;
