//! Expert consultation form.
//!
//! Validates the farmer's phone number and returns the localized
//! acknowledgement. Nothing is transmitted anywhere.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::i18n;
use crate::models::Language;

/// Longest issue description accepted.
pub const MAX_MESSAGE_CHARS: usize = 2000;

#[derive(Error, Debug, PartialEq)]
pub enum ExpertError {
    #[error("Phone number is required")]
    MissingPhone,

    #[error("Invalid phone number: '{0}'")]
    InvalidPhone(String),

    #[error("Issue description exceeds {} characters", MAX_MESSAGE_CHARS)]
    MessageTooLong,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExpertRequest {
    pub phone: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub language: Language,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExpertAcknowledgement {
    pub message: String,
    pub phone: String,
    /// Always `false`: the request is acknowledged, not delivered.
    pub sent: bool,
}

static PHONE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9][0-9 \-]*[0-9]$").unwrap());

/// Accepts digits with an optional leading `+`, spaces and dashes; 7–15 digits.
pub fn validate_phone(phone: &str) -> Result<String, ExpertError> {
    let trimmed = phone.trim();
    if trimmed.is_empty() {
        return Err(ExpertError::MissingPhone);
    }
    let digits = trimmed.chars().filter(|c| c.is_ascii_digit()).count();
    if !PHONE_PATTERN.is_match(trimmed) || !(7..=15).contains(&digits) {
        return Err(ExpertError::InvalidPhone(trimmed.to_string()));
    }
    Ok(trimmed.to_string())
}

pub fn acknowledge(request: &ExpertRequest) -> Result<ExpertAcknowledgement, ExpertError> {
    let phone = validate_phone(&request.phone)?;
    if request.message.chars().count() > MAX_MESSAGE_CHARS {
        return Err(ExpertError::MessageTooLong);
    }

    tracing::info!(
        language = request.language.as_str(),
        message_chars = request.message.chars().count(),
        "Expert consultation request acknowledged"
    );

    let prefix = i18n::strings(request.language).expert_success;
    Ok(ExpertAcknowledgement {
        message: format!("{prefix}{phone}"),
        phone,
        sent: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(phone: &str, language: Language) -> ExpertRequest {
        ExpertRequest {
            phone: phone.into(),
            message: "Leaves turning yellow".into(),
            language,
        }
    }

    #[test]
    fn accepts_indian_mobile() {
        assert_eq!(validate_phone(" +91 98765-43210 ").unwrap(), "+91 98765-43210");
    }

    #[test]
    fn rejects_letters() {
        assert!(matches!(
            validate_phone("call me"),
            Err(ExpertError::InvalidPhone(_))
        ));
    }

    #[test]
    fn rejects_too_few_digits() {
        assert!(validate_phone("12345").is_err());
    }

    #[test]
    fn rejects_too_many_digits() {
        assert!(validate_phone("1234567890123456").is_err());
    }

    #[test]
    fn empty_phone_is_missing() {
        assert_eq!(validate_phone("   "), Err(ExpertError::MissingPhone));
    }

    #[test]
    fn acknowledgement_is_localized() {
        let ack = acknowledge(&request("9876543210", Language::English)).unwrap();
        assert_eq!(
            ack.message,
            "Request sent! An expert will contact you at 9876543210"
        );
        assert!(!ack.sent);

        let ack = acknowledge(&request("9876543210", Language::Hindi)).unwrap();
        assert!(ack.message.starts_with("अनुरोध भेज दिया गया!"));
    }

    #[test]
    fn long_message_rejected() {
        let mut req = request("9876543210", Language::English);
        req.message = "x".repeat(MAX_MESSAGE_CHARS + 1);
        assert_eq!(acknowledge(&req).unwrap_err(), ExpertError::MessageTooLong);
    }
}
