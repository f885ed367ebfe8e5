#[cfg(test)]
mod tests {
    use crate::theming::errors::{ThemingError, TokenValidationError};
    use crate::theming::types::TokenId;
    use std::error::Error;
    use triton_core::error::CoreError;

    #[test]
    fn invalid_value_helper_builds_variant() {
        let err = ThemingError::invalid_value("button.padding.x", "Value must be at least 0");
        match &err {
            ThemingError::InvalidTokenValue { token_id, message } => {
                assert_eq!(token_id.as_str(), "button.padding.x");
                assert_eq!(message, "Value must be at least 0");
            }
            e => panic!("Unexpected error: {:?}", e),
        }
        assert_eq!(
            err.to_string(),
            "Invalid token value for token 'button.padding.x': Value must be at least 0"
        );
    }

    #[test]
    fn cyclic_reference_lists_path() {
        let err = ThemingError::CyclicTokenReference {
            token_id: TokenId::new("a"),
            path: vec![TokenId::new("a"), TokenId::new("b"), TokenId::new("a")],
        };
        let text = err.to_string();
        assert!(text.starts_with("Cyclic token reference detected involving token 'a'"));
        assert!(text.contains("\"b\""));
    }

    #[test]
    fn capacity_messages_match_user_text() {
        assert_eq!(
            ThemingError::PresetLimitExceeded { limit: 20 }.to_string(),
            "Maximum preset limit (20) reached. Please delete some presets first."
        );
        assert_eq!(
            ThemingError::PackageNameRequired.to_string(),
            "Package name is required for package format"
        );
        assert_eq!(
            ThemingError::UnsupportedFormat { format: "xml".into() }.to_string(),
            "Unsupported export format: xml"
        );
    }

    #[test]
    fn storage_error_keeps_source() {
        let err = ThemingError::storage(
            "save user presets",
            CoreError::Storage { key: "triton-user-presets".into(), message: "disk full".into() },
        );
        assert!(err.source().is_some());
        assert!(err.to_string().contains("save user presets"));
    }

    #[test]
    fn validation_messages() {
        assert_eq!(TokenValidationError::BelowMinimum { min: 0.0 }.to_string(), "Value must be at least 0");
        assert_eq!(TokenValidationError::AboveMaximum { max: 10.0 }.to_string(), "Value must be at most 10");
        assert_eq!(
            TokenValidationError::NotAllowed { allowed: vec!["solid".into(), "dashed".into()] }.to_string(),
            "Value must be one of: solid, dashed"
        );
        assert_eq!(TokenValidationError::Custom("Too loud".into()).to_string(), "Too loud");
    }
}
