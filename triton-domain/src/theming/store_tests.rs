#[cfg(test)]
mod tests {
    use crate::theming::errors::{ThemingError, TokenValidationError};
    use crate::theming::store::{StoreSnapshot, TokenStore};
    use crate::theming::types::{DesignToken, TokenCategory, TokenId, TokenType, TokenValidation, TokenValue};
    use pretty_assertions::assert_eq;

    fn button_background() -> DesignToken {
        DesignToken::new("button.background", TokenCategory::Component, "background", "#007bff", TokenType::Color)
            .with_subcategory("button")
            .with_affects(["button", "splitbutton"])
    }

    fn button_hover_background() -> DesignToken {
        DesignToken::new(
            "button.hover.background",
            TokenCategory::Component,
            "hover.background",
            "{button.background}",
            TokenType::Color,
        )
        .with_subcategory("button")
        .with_dependencies(["button.background"])
    }

    fn button_padding() -> DesignToken {
        DesignToken::new("button.padding.x", TokenCategory::Component, "padding.x", "1rem", TokenType::Spacing)
            .with_subcategory("button")
            .with_validation(TokenValidation::range(0.0, 4.0))
    }

    fn primitive_radius() -> DesignToken {
        DesignToken::new("primitive.borderRadius.md", TokenCategory::Primitive, "borderRadius.md", "6px", TokenType::BorderRadius)
            .with_subcategory("borderRadius")
    }

    fn ids(tokens: Vec<&DesignToken>) -> Vec<&str> {
        tokens.into_iter().map(|t| t.id.as_str()).collect()
    }

    #[test]
    fn dependents_and_relationships_follow_declared_dependencies() {
        let mut store = TokenStore::new();
        store.register_batch([button_background(), button_hover_background()]).unwrap();

        assert_eq!(ids(store.get_dependent_tokens("button.background")), vec!["button.hover.background"]);
        assert!(store.get_dependent_tokens("button.hover.background").is_empty());

        let relationship = store.get_relationships("button.background").unwrap();
        assert_eq!(relationship.children, vec![TokenId::new("button.hover.background")]);
        assert_eq!(relationship.affects.len(), 2);
        assert!(store.get_relationships("missing.token").is_none());
    }

    #[test]
    fn reregistering_an_id_keeps_one_entry_per_index() {
        let mut store = TokenStore::new();
        store.register(button_background()).unwrap();
        store.register(button_background().with_description("Changed")).unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(store.get_tokens_by_category(TokenCategory::Component).len(), 1);
        assert_eq!(store.get_tokens_by_component("button").len(), 1);
        assert_eq!(store.get_tokens_by_type(TokenType::Color).len(), 1);
        assert_eq!(store.get_token("button.background").unwrap().description.as_deref(), Some("Changed"));
    }

    #[test]
    fn reregistration_drops_stale_index_entries() {
        let mut store = TokenStore::new();
        store.register_batch([button_background(), button_hover_background()]).unwrap();

        let moved = DesignToken::new(
            "button.hover.background",
            TokenCategory::Component,
            "hover.background",
            "1px",
            TokenType::Size,
        )
        .with_subcategory("card");
        store.register(moved).unwrap();

        assert!(store.get_dependent_tokens("button.background").is_empty());
        assert_eq!(ids(store.get_tokens_by_component("button")), vec!["button.background"]);
        assert_eq!(ids(store.get_tokens_by_component("card")), vec!["button.hover.background"]);
        assert_eq!(ids(store.get_tokens_by_type(TokenType::Color)), vec!["button.background"]);
        assert_eq!(store.components(), vec!["button", "card"]);
    }

    #[test]
    fn validation_reports_the_first_failing_rule() {
        let mut store = TokenStore::new();
        store.register(button_padding()).unwrap();

        assert_eq!(
            store.validate_token_value("button.padding.x", &TokenValue::from(-1)),
            Err(TokenValidationError::BelowMinimum { min: 0.0 })
        );
        let too_big = store
            .validate_token_value("button.padding.x", &TokenValue::from(5))
            .unwrap_err();
        assert_eq!(too_big.to_string(), "Value must be at most 4");
        assert!(store.validate_token_value("button.padding.x", &TokenValue::from(2)).is_ok());
        assert!(store.validate_token_value("unknown.token", &TokenValue::from(-100)).is_ok());
    }

    #[test]
    fn cyclic_registration_is_rejected_and_leaves_store_unchanged() {
        let mut store = TokenStore::new();
        let a = DesignToken::new("custom.a", TokenCategory::Custom, "a", "{custom.b}", TokenType::Color)
            .with_dependencies(["custom.b"]);
        let b = DesignToken::new("custom.b", TokenCategory::Custom, "b", "#000", TokenType::Color);
        store.register_batch([a, b]).unwrap();

        let closing = DesignToken::new("custom.b", TokenCategory::Custom, "b", "{custom.a}", TokenType::Color)
            .with_dependencies(["custom.a"]);
        match store.register(closing) {
            Err(ThemingError::CyclicTokenReference { path, .. }) => {
                assert_eq!(path.first().map(TokenId::as_str), Some("custom.b"));
                assert_eq!(path.last().map(TokenId::as_str), Some("custom.b"));
            }
            other => panic!("Expected a cycle error, got {:?}", other),
        }

        assert_eq!(store.get_token("custom.b").unwrap().value, TokenValue::from("#000"));
        assert!(store.get_dependent_tokens("custom.a").is_empty());

        let self_loop = DesignToken::new("custom.c", TokenCategory::Custom, "c", "{custom.c}", TokenType::Color)
            .with_dependencies(["custom.c"]);
        assert!(store.register(self_loop).is_err());
        assert!(!store.has_token("custom.c"));
    }

    #[test]
    fn update_signals_transitive_dependents_nearest_first() {
        let mut store = TokenStore::new();
        let focus = DesignToken::new(
            "button.focus.ring",
            TokenCategory::Component,
            "focus.ring",
            "0 0 0 2px {button.hover.background}",
            TokenType::Shadow,
        )
        .with_subcategory("button")
        .with_dependencies(["button.hover.background"]);
        store
            .register_batch([button_background(), button_hover_background(), focus])
            .unwrap();

        let notified = store.update_token_value("button.background", TokenValue::from("#ff0000"));
        assert_eq!(
            notified,
            vec![TokenId::new("button.hover.background"), TokenId::new("button.focus.ring")]
        );
        assert_eq!(store.get_token("button.background").unwrap().value, TokenValue::from("#ff0000"));
        assert_eq!(store.get_token("button.background").unwrap().default_value, TokenValue::from("#007bff"));

        assert!(store.update_token_value("missing", TokenValue::from("x")).is_empty());
    }

    #[test]
    fn search_matches_id_label_path_and_description() {
        let mut store = TokenStore::new();
        store
            .register_batch([
                button_background().with_description("Primary action fill"),
                button_padding(),
                primitive_radius(),
            ])
            .unwrap();

        assert_eq!(ids(store.search_tokens("PADDING")), vec!["button.padding.x"]);
        assert_eq!(ids(store.search_tokens("action")), vec!["button.background"]);
        assert_eq!(ids(store.search_tokens("button")), vec!["button.background", "button.padding.x"]);
        assert!(store.search_tokens("nothing-like-this").is_empty());
    }

    #[test]
    fn stats_list_every_category_and_type() {
        let mut store = TokenStore::new();
        store.register_batch([button_background(), button_padding(), primitive_radius()]).unwrap();

        let stats = store.get_stats();
        assert_eq!(stats.total_tokens, 3);
        assert_eq!(stats.components, 1);
        assert_eq!(stats.by_category.len(), 4);
        assert_eq!(stats.by_category[&TokenCategory::Component], 2);
        assert_eq!(stats.by_category[&TokenCategory::Semantic], 0);
        assert_eq!(stats.by_type.len(), 6);
        assert_eq!(stats.by_type[&TokenType::Shadow], 0);
        assert_eq!(stats.by_type[&TokenType::BorderRadius], 1);
    }

    #[test]
    fn export_then_import_rebuilds_indexes() {
        let mut store = TokenStore::new();
        store
            .register_batch([button_background(), button_hover_background(), primitive_radius()])
            .unwrap();
        let snapshot = store.export();
        assert_eq!(snapshot.tokens.len(), 3);
        assert_eq!(
            snapshot.relationships[&TokenId::new("button.background")].children,
            vec![TokenId::new("button.hover.background")]
        );

        let json = serde_json::to_string(&snapshot).unwrap();
        let mut restored = TokenStore::new();
        restored.import(serde_json::from_str(&json).unwrap()).unwrap();

        assert_eq!(restored.get_stats(), store.get_stats());
        assert_eq!(ids(restored.get_dependent_tokens("button.background")), vec!["button.hover.background"]);
    }

    #[test]
    fn rejected_import_keeps_current_state() {
        let mut store = TokenStore::new();
        store.register(primitive_radius()).unwrap();

        let cyclic = StoreSnapshot {
            tokens: vec![
                DesignToken::new("custom.a", TokenCategory::Custom, "a", "{custom.b}", TokenType::Color)
                    .with_dependencies(["custom.b"]),
                DesignToken::new("custom.b", TokenCategory::Custom, "b", "{custom.a}", TokenType::Color)
                    .with_dependencies(["custom.a"]),
            ],
            ..Default::default()
        };
        assert!(store.import(cyclic).is_err());
        assert_eq!(ids(store.get_all_tokens()), vec!["primitive.borderRadius.md"]);

        store.clear();
        assert!(store.is_empty());
        assert_eq!(store.get_stats().by_category[&TokenCategory::Primitive], 0);
    }
}
