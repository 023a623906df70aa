//! CLI Types

use serde::Serialize;
use tonvault_error::{ErrorCode, VaultError};
use tonvault_ton::TonError;

/// JSON printed on failure
#[derive(Debug, Serialize)]
pub struct ErrorOutput {
    pub success: bool,
    pub error: String,
    pub code: ErrorCode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<&'static str>,
}

impl ErrorOutput {
    pub fn from_error(err: &anyhow::Error) -> Self {
        let vault_error = err
            .downcast_ref::<VaultError>()
            .map(|e| (e.code(), e.suggestion()))
            .or_else(|| {
                err.downcast_ref::<TonError>().map(|e| {
                    let converted = VaultError::from(e.clone());
                    (converted.code(), converted.suggestion())
                })
            });
        let (code, suggestion) = vault_error.unwrap_or((ErrorCode::Unknown, None));

        Self {
            success: false,
            error: err.to_string(),
            code,
            suggestion,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vault_error_mapping() {
        let err = anyhow::Error::new(VaultError::WalletNotFound("main".into()));
        let out = ErrorOutput::from_error(&err);
        assert_eq!(out.code, ErrorCode::WalletNotFound);
        assert!(out.suggestion.is_some());
        assert!(out.error.contains("main"));

        let json = serde_json::to_value(&out).unwrap();
        assert_eq!(json["code"], "wallet_not_found");
        assert_eq!(json["success"], false);
    }

    #[test]
    fn test_ton_error_mapping() {
        let err = anyhow::Error::new(TonError::InvalidMnemonic("20 words".into()));
        let out = ErrorOutput::from_error(&err);
        assert_eq!(out.code, ErrorCode::InvalidMnemonic);
    }

    #[test]
    fn test_other_error_mapping() {
        let out = ErrorOutput::from_error(&anyhow::anyhow!("boom"));
        assert_eq!(out.code, ErrorCode::Unknown);
        assert!(out.suggestion.is_none());
        let json = serde_json::to_value(&out).unwrap();
        assert!(!json.as_object().unwrap().contains_key("suggestion"));
    }
}
