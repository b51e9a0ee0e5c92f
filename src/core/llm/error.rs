//! Generation Error Types

/// Errors that can occur while generating platform adaptations.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("API key not configured (set the {env_var} environment variable)")]
    NotConfigured { env_var: String },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Empty response from Gemini")]
    EmptyResponse,

    #[error("Invalid response: {0}")]
    InvalidResponse(#[from] serde_json::Error),
}

impl GenerationError {
    /// Configuration errors are detected before any network I/O.
    pub fn is_configuration(&self) -> bool {
        matches!(self, GenerationError::NotConfigured { .. })
    }
}

pub type Result<T> = std::result::Result<T, GenerationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_kind() {
        let err = GenerationError::NotConfigured {
            env_var: "API_KEY".to_string(),
        };
        assert!(err.is_configuration());
        assert!(err.to_string().contains("API_KEY"));

        assert!(!GenerationError::EmptyResponse.is_configuration());
        let api = GenerationError::Api {
            status: 500,
            message: "boom".to_string(),
        };
        assert!(!api.is_configuration());
        assert_eq!(api.to_string(), "API error: 500 - boom");
    }

    #[test]
    fn test_invalid_json_converts() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: GenerationError = parse_err.into();
        assert!(matches!(err, GenerationError::InvalidResponse(_)));
    }
}
