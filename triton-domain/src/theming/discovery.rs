//! Token discovery.
//!
//! Walks a base theme object (`primitive`, `semantic`, `components`) plus the
//! application's custom preset overrides and turns every leaf into a
//! [`DesignToken`]. The result is grouped by `primitive`, `semantic` and one group
//! per component, memoized in memory and persisted through [`DiscoveryCache`].

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::cache::{CacheStats, DiscoveryCache};
use super::errors::ThemingError;
use super::inference::{generate_description, humanize_token_name, infer_token_type};
use super::types::{BaseTheme, DesignToken, TokenCategory, TokenGroups, TokenType, TokenValue};

const AURA_JSON: &str = include_str!("default_themes/aura.json");
const MATERIAL_JSON: &str = include_str!("default_themes/material.json");
const LARA_JSON: &str = include_str!("default_themes/lara.json");
const NORA_JSON: &str = include_str!("default_themes/nora.json");
const CUSTOM_PRESET_JSON: &str = include_str!("default_themes/custom_preset.json");

pub const PRIMITIVE_GROUP: &str = "primitive";
pub const SEMANTIC_GROUP: &str = "semantic";

/// Component names the design system knows about.
pub const KNOWN_COMPONENTS: &[&str] = &[
    "accordion", "autocomplete", "avatar", "avatargroup", "badge",
    "blockui", "breadcrumb", "button", "buttongroup", "card",
    "carousel", "cascadeselect", "checkbox", "chip", "colorpicker",
    "confirmdialog", "confirmpopup", "contextmenu", "datatable", "dataview",
    "datepicker", "dialog", "divider", "dock", "drawer",
    "dropdown", "editor", "fieldset", "fileupload", "floatlabel",
    "galleria", "iconfield", "image", "inlinemessage", "inplace",
    "inputchips", "inputgroup", "inputmask", "inputnumber", "inputotp",
    "inputtext", "knob", "listbox", "megamenu", "menu",
    "menubar", "message", "metergroup", "multiselect", "orderlist",
    "organizationchart", "overlaybadge", "overlaypanel", "paginator", "panel",
    "panelmenu", "password", "picklist", "popover", "progressbar",
    "progressspinner", "radiobutton", "rating", "ripple", "scrollpanel",
    "scrolltop", "select", "selectbutton", "skeleton", "slider",
    "speeddial", "splitbutton", "splitter", "stepper", "steps",
    "tabmenu", "tabs", "tabview", "tag", "terminal",
    "textarea", "tieredmenu", "timeline", "toast", "togglebutton",
    "toggleswitch", "toolbar", "tooltip", "tree", "treeselect",
    "treetable", "virtualscroller",
];

const SEMANTIC_FAMILIES: &[&str] = &["primary", "secondary", "success", "info", "warning", "danger", "surface"];
pub const SHADES: [u16; 11] = [50, 100, 200, 300, 400, 500, 600, 700, 800, 900, 950];

const COMMON_RADII: &[(&str, &str)] = &[
    ("none", "0"),
    ("xs", "2px"),
    ("sm", "4px"),
    ("md", "6px"),
    ("lg", "8px"),
    ("xl", "12px"),
];

/// Supplies base theme objects and the application's custom preset.
#[async_trait]
pub trait BaseThemeSource: Send + Sync {
    async fn load_base_theme(&self, theme: BaseTheme) -> Result<Value, ThemingError>;

    /// Component overrides layered on the base theme. `None` when there are none.
    async fn load_custom_preset(&self) -> Result<Option<Value>, ThemingError>;
}

/// Theme snapshots compiled into the binary.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedThemeSource;

fn parse_embedded(theme: BaseTheme, raw: &str) -> Result<Value, ThemingError> {
    serde_json::from_str(raw).map_err(|e| ThemingError::BaseThemeLoad {
        theme,
        reason: e.to_string(),
    })
}

#[async_trait]
impl BaseThemeSource for EmbeddedThemeSource {
    async fn load_base_theme(&self, theme: BaseTheme) -> Result<Value, ThemingError> {
        let raw = match theme {
            BaseTheme::Aura => AURA_JSON,
            BaseTheme::Material => MATERIAL_JSON,
            BaseTheme::Lara => LARA_JSON,
            BaseTheme::Nora => NORA_JSON,
        };
        parse_embedded(theme, raw)
    }

    async fn load_custom_preset(&self) -> Result<Option<Value>, ThemingError> {
        serde_json::from_str(CUSTOM_PRESET_JSON)
            .map(Some)
            .map_err(|e| ThemingError::Internal {
                context: format!("Embedded custom preset is invalid: {}", e),
            })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveryStats {
    pub total_components: usize,
    pub discovered_components: usize,
    pub total_tokens: usize,
    pub tokens_by_category: BTreeMap<TokenCategory, usize>,
    pub cache: CacheStats,
}

pub struct TokenDiscovery {
    source: Arc<dyn BaseThemeSource>,
    cache: DiscoveryCache,
    discovered: Mutex<Option<TokenGroups>>,
}

impl TokenDiscovery {
    pub fn new(source: Arc<dyn BaseThemeSource>, cache: DiscoveryCache) -> Self {
        Self {
            source,
            cache,
            discovered: Mutex::new(None),
        }
    }

    pub fn cache(&self) -> &DiscoveryCache {
        &self.cache
    }

    /// Discovers every token group for `base_theme`.
    ///
    /// A previous in-memory result or a valid persisted cache is returned as is, even
    /// if it was produced for another base theme; call [`clear_cache`](Self::clear_cache)
    /// before switching themes.
    pub async fn discover_all_tokens(&self, base_theme: BaseTheme) -> TokenGroups {
        let mut discovered = self.discovered.lock().await;
        if let Some(groups) = discovered.as_ref() {
            if !groups.is_empty() {
                return groups.clone();
            }
        }

        if let Some(cached) = self.cache.load().await {
            if !cached.is_empty() {
                info!("Loaded {} token groups from discovery cache", cached.len());
                *discovered = Some(cached.clone());
                return cached;
            }
        }

        info!("Starting token discovery for {} theme", base_theme);
        let theme = self.load_theme(base_theme).await;
        let mut groups = TokenGroups::new();

        let primitive = primitive_tokens(theme.as_ref());
        if !primitive.is_empty() {
            groups.insert(PRIMITIVE_GROUP.to_string(), primitive);
        }
        let semantic = semantic_tokens(theme.as_ref());
        if !semantic.is_empty() {
            groups.insert(SEMANTIC_GROUP.to_string(), semantic);
        }

        let custom = match self.source.load_custom_preset().await {
            Ok(custom) => custom,
            Err(e) => {
                warn!("Could not load custom preset for component discovery: {}", e);
                None
            }
        };
        for (component, tokens) in component_tokens_from_theme(theme.as_ref(), custom.as_ref()) {
            groups.insert(component, tokens);
        }
        merge_catalog(&mut groups);

        info!("Token discovery complete for {}: {} token groups", base_theme, groups.len());
        self.cache.save(&groups).await;
        *discovered = Some(groups.clone());
        groups
    }

    async fn load_theme(&self, base_theme: BaseTheme) -> Option<Value> {
        match self.source.load_base_theme(base_theme).await {
            Ok(theme) => Some(theme),
            Err(e) => {
                warn!("Could not load {} theme for token discovery: {}", base_theme, e);
                None
            }
        }
    }

    pub async fn discover_primitive_tokens(&self, base_theme: BaseTheme) -> Vec<DesignToken> {
        primitive_tokens(self.load_theme(base_theme).await.as_ref())
    }

    pub async fn discover_semantic_tokens(&self, base_theme: BaseTheme) -> Vec<DesignToken> {
        semantic_tokens(self.load_theme(base_theme).await.as_ref())
    }

    /// Tokens of one component, running discovery for the default base theme first
    /// if nothing has been discovered yet. Unknown components yield an empty list.
    pub async fn discover_component_tokens(&self, component: &str) -> Vec<DesignToken> {
        let cached = {
            let discovered = self.discovered.lock().await;
            discovered.as_ref().map(|groups| groups.get(component).cloned().unwrap_or_default())
        };
        match cached {
            Some(tokens) => tokens,
            None => self
                .discover_all_tokens(BaseTheme::default())
                .await
                .remove(component)
                .unwrap_or_default(),
        }
    }

    /// Drops the in-memory result and the persisted cache.
    pub async fn clear_cache(&self) {
        *self.discovered.lock().await = None;
        self.cache.clear().await;
        debug!("Token discovery cache cleared");
    }

    pub async fn discovery_stats(&self) -> DiscoveryStats {
        let mut tokens_by_category: BTreeMap<TokenCategory, usize> =
            TokenCategory::ALL.into_iter().map(|c| (c, 0)).collect();
        let mut total_tokens = 0;
        let mut discovered_components = 0;

        if let Some(groups) = self.discovered.lock().await.as_ref() {
            for (group, tokens) in groups {
                total_tokens += tokens.len();
                let category = match group.as_str() {
                    PRIMITIVE_GROUP => TokenCategory::Primitive,
                    SEMANTIC_GROUP => TokenCategory::Semantic,
                    _ => {
                        discovered_components += 1;
                        TokenCategory::Component
                    }
                };
                *tokens_by_category.entry(category).or_default() += tokens.len();
            }
        }

        DiscoveryStats {
            total_components: KNOWN_COMPONENTS.len(),
            discovered_components,
            total_tokens,
            tokens_by_category,
            cache: self.cache.stats().await,
        }
    }
}

/// Primitive tokens of `theme`, plus the common border radii it does not define.
pub fn primitive_tokens(theme: Option<&Value>) -> Vec<DesignToken> {
    let mut tokens = Vec::new();
    if let Some(Value::Object(primitive)) = theme.and_then(|t| t.get("primitive")) {
        extract_tokens(primitive, None, "", &mut tokens, TokenCategory::Primitive);
    }

    for (name, value) in COMMON_RADII {
        let path = format!("borderRadius.{}", name);
        if tokens.iter().any(|t| t.path == path) {
            continue;
        }
        tokens.push(
            DesignToken::new(
                format!("primitive.{}", path),
                TokenCategory::Primitive,
                path,
                *value,
                TokenType::BorderRadius,
            )
            .with_subcategory("borderRadius")
            .with_description(format!("Primitive {} token", TokenType::BorderRadius)),
        );
    }
    tokens
}

/// Semantic tokens of `theme`, plus `{family}.{shade}` entries for the standard
/// families it does not define.
pub fn semantic_tokens(theme: Option<&Value>) -> Vec<DesignToken> {
    let mut tokens = Vec::new();
    if let Some(Value::Object(semantic)) = theme.and_then(|t| t.get("semantic")) {
        extract_tokens(semantic, None, "", &mut tokens, TokenCategory::Semantic);
    }

    for family in SEMANTIC_FAMILIES {
        for shade in SHADES {
            let path = format!("{}.{}", family, shade);
            if tokens.iter().any(|t| t.path == path) {
                continue;
            }
            let reference = format!("{{{}}}", path);
            tokens.push(
                DesignToken::new(format!("semantic.{}", path), TokenCategory::Semantic, path, reference, TokenType::Color)
                    .with_label(format!("{} {}", humanize_token_name(family), shade))
                    .with_subcategory(*family)
                    .with_description(format!("{} color shade {}", family, shade)),
            );
        }
    }
    tokens
}

/// One token list per component found in the base theme's `components` map and in
/// the custom preset's `components` map. A custom preset entry replaces the base
/// theme's list for that component.
pub fn component_tokens_from_theme(theme: Option<&Value>, custom: Option<&Value>) -> TokenGroups {
    let mut groups = TokenGroups::new();
    for source in [theme, custom].into_iter().flatten() {
        if let Some(Value::Object(components)) = source.get("components") {
            for (component, component_theme) in components {
                if let Value::Object(component_theme) = component_theme {
                    let mut tokens = Vec::new();
                    extract_tokens(component_theme, Some(component), "", &mut tokens, TokenCategory::Component);
                    if !tokens.is_empty() {
                        groups.insert(component.clone(), tokens);
                    }
                }
            }
        }
    }
    groups
}

fn extract_tokens(
    object: &Map<String, Value>,
    component: Option<&str>,
    path: &str,
    tokens: &mut Vec<DesignToken>,
    category: TokenCategory,
) {
    for (key, value) in object {
        let full_path = if path.is_empty() { key.clone() } else { format!("{}.{}", path, key) };

        match (key.as_str(), value) {
            ("colorScheme", Value::Object(schemes)) => {
                for scheme in ["light", "dark"] {
                    if let Some(Value::Object(variant)) = schemes.get(scheme) {
                        extract_tokens(variant, component, &format!("{}.{}", full_path, scheme), tokens, category);
                    }
                }
            }
            ("css", _) | ("_extend", _) => {}
            (_, Value::Object(nested)) => extract_tokens(nested, component, &full_path, tokens, category),
            _ => {
                let Some(token_value) = TokenValue::from_json(value) else {
                    continue;
                };
                let (id, subcategory) = match component {
                    Some(component) => (format!("{}.{}", component, full_path), component.to_string()),
                    None => (
                        format!("{}.{}", category, full_path),
                        full_path.split('.').next().unwrap_or(&full_path).to_string(),
                    ),
                };
                let token_type = infer_token_type(&full_path, &token_value);
                let mut token = DesignToken::new(id, category, full_path.clone(), token_value, token_type)
                    .with_label(humanize_token_name(key))
                    .with_subcategory(subcategory)
                    .with_description(generate_description(&full_path, component));
                if let Some(component) = component {
                    token = token.with_affects([component]);
                }
                tokens.push(token);
            }
        }
    }
}

fn catalog_token(
    component: &str,
    path: &str,
    label: &str,
    value: &str,
    token_type: TokenType,
    description: &str,
) -> DesignToken {
    DesignToken::new(format!("{}.{}", component, path), TokenCategory::Component, path, value, token_type)
        .with_label(label)
        .with_subcategory(component)
        .with_affects([component])
        .with_description(description)
}

/// Hand-authored baseline tokens for `button` and `datatable`.
pub fn known_component_tokens() -> TokenGroups {
    let button = vec![
        catalog_token("button", "background", "Background", "{primary.500}", TokenType::Color, "Default button background color"),
        catalog_token("button", "hover.background", "Hover Background", "{primary.600}", TokenType::Color, "Button background color on hover")
            .with_dependencies(["button.background"]),
        catalog_token("button", "active.background", "Active Background", "{primary.700}", TokenType::Color, "Button background color when pressed")
            .with_dependencies(["button.background"]),
        catalog_token("button", "color", "Text Color", "#ffffff", TokenType::Color, "Button text color"),
        catalog_token("button", "padding.x", "Horizontal Padding", "1rem", TokenType::Spacing, "Button horizontal padding"),
        catalog_token("button", "padding.y", "Vertical Padding", "0.5rem", TokenType::Spacing, "Button vertical padding"),
        catalog_token("button", "borderRadius", "Border Radius", "{borderRadius.md}", TokenType::BorderRadius, "Button corner radius"),
        catalog_token("button", "fontSize", "Font Size", "1rem", TokenType::Typography, "Button text size"),
        catalog_token("button", "fontWeight", "Font Weight", "500", TokenType::Typography, "Button text weight"),
    ];
    let datatable = vec![
        catalog_token("datatable", "header.background", "Header Background", "{surface.50}", TokenType::Color, "Table header background color"),
        catalog_token("datatable", "header.color", "Header Text Color", "{surface.700}", TokenType::Color, "Table header text color"),
        catalog_token("datatable", "row.background", "Row Background", "{surface.0}", TokenType::Color, "Table row background color"),
        catalog_token("datatable", "row.stripedBackground", "Striped Row Background", "{surface.50}", TokenType::Color, "Alternating row background color"),
        catalog_token("datatable", "row.hoverBackground", "Row Hover Background", "{surface.100}", TokenType::Color, "Row background on hover"),
    ];

    let mut groups = TokenGroups::new();
    groups.insert("button".to_string(), button);
    groups.insert("datatable".to_string(), datatable);
    groups
}

/// Unions the catalog into `groups`; a catalog token replaces a discovered one with the same id.
fn merge_catalog(groups: &mut TokenGroups) {
    for (component, catalog) in known_component_tokens() {
        let tokens = groups.entry(component).or_default();
        for token in catalog {
            match tokens.iter_mut().find(|t| t.id == token.id) {
                Some(existing) => *existing = token,
                None => tokens.push(token),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use triton_core::storage::MemoryKeyValueStore;

    struct StaticThemeSource {
        theme: Value,
        custom: Option<Value>,
        loads: AtomicUsize,
    }

    impl StaticThemeSource {
        fn new(theme: Value, custom: Option<Value>) -> Self {
            Self { theme, custom, loads: AtomicUsize::new(0) }
        }
    }

    #[async_trait]
    impl BaseThemeSource for StaticThemeSource {
        async fn load_base_theme(&self, _theme: BaseTheme) -> Result<Value, ThemingError> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            Ok(self.theme.clone())
        }

        async fn load_custom_preset(&self) -> Result<Option<Value>, ThemingError> {
            Ok(self.custom.clone())
        }
    }

    struct FailingThemeSource;

    #[async_trait]
    impl BaseThemeSource for FailingThemeSource {
        async fn load_base_theme(&self, theme: BaseTheme) -> Result<Value, ThemingError> {
            Err(ThemingError::BaseThemeLoad { theme, reason: "module missing".into() })
        }

        async fn load_custom_preset(&self) -> Result<Option<Value>, ThemingError> {
            Ok(None)
        }
    }

    fn sample_theme() -> Value {
        json!({
            "primitive": {
                "borderRadius": { "md": "5px" },
                "emerald": { "500": "#10b981" }
            },
            "semantic": {
                "primary": { "500": "{emerald.500}" },
                "colorScheme": {
                    "light": { "surface": { "0": "#ffffff" } },
                    "dark": { "surface": { "0": "#09090b" } }
                }
            },
            "components": {
                "button": {
                    "root": { "paddingX": "1rem" },
                    "css": ".p-button {}"
                },
                "card": {
                    "root": { "background": "{content.background}", "shadow": "none" }
                }
            }
        })
    }

    fn discovery_with(source: Arc<dyn BaseThemeSource>) -> (TokenDiscovery, Arc<MemoryKeyValueStore>) {
        let store = Arc::new(MemoryKeyValueStore::new());
        let cache = DiscoveryCache::new(store.clone(), Duration::from_secs(24 * 60 * 60));
        (TokenDiscovery::new(source, cache), store)
    }

    #[test]
    fn primitive_tokens_keep_theme_values_and_fill_missing_radii() {
        let theme = sample_theme();
        let tokens = primitive_tokens(Some(&theme));

        let md = tokens.iter().find(|t| t.path == "borderRadius.md").unwrap();
        assert_eq!(md.value, TokenValue::from("5px"));
        assert_eq!(tokens.iter().filter(|t| t.path == "borderRadius.md").count(), 1);

        let xl = tokens.iter().find(|t| t.id.as_str() == "primitive.borderRadius.xl").unwrap();
        assert_eq!(xl.value, TokenValue::from("12px"));
        assert_eq!(xl.token_type, TokenType::BorderRadius);
        assert_eq!(xl.subcategory.as_deref(), Some("borderRadius"));

        let emerald = tokens.iter().find(|t| t.id.as_str() == "primitive.emerald.500").unwrap();
        assert_eq!(emerald.token_type, TokenType::Color);
        assert_eq!(emerald.subcategory.as_deref(), Some("emerald"));
        assert_eq!(emerald.label, "500");
    }

    #[test]
    fn semantic_tokens_walk_color_schemes_and_add_shades() {
        let theme = sample_theme();
        let tokens = semantic_tokens(Some(&theme));

        assert!(tokens.iter().any(|t| t.path == "colorScheme.light.surface.0"));
        assert!(tokens.iter().any(|t| t.path == "colorScheme.dark.surface.0"));

        let primary_500: Vec<_> = tokens.iter().filter(|t| t.path == "primary.500").collect();
        assert_eq!(primary_500.len(), 1);
        assert_eq!(primary_500[0].value, TokenValue::from("{emerald.500}"));

        let danger_950 = tokens.iter().find(|t| t.id.as_str() == "semantic.danger.950").unwrap();
        assert_eq!(danger_950.value, TokenValue::from("{danger.950}"));
        assert_eq!(danger_950.label, "Danger 950");
        // 7 families x 11 shades, minus the one the theme defines, plus 3 theme leaves.
        assert_eq!(tokens.len(), 7 * 11 - 1 + 3);
    }

    #[test]
    fn component_walk_skips_css_and_custom_preset_replaces_group() {
        let theme = sample_theme();
        let custom = json!({ "components": { "card": { "root": { "borderRadius": "12px" } } } });
        let groups = component_tokens_from_theme(Some(&theme), Some(&custom));

        let button = &groups["button"];
        assert_eq!(button.len(), 1);
        assert_eq!(button[0].id.as_str(), "button.root.paddingX");
        assert_eq!(button[0].token_type, TokenType::Spacing);
        assert!(button[0].affects.contains("button"));

        let card = &groups["card"];
        assert_eq!(card.len(), 1);
        assert_eq!(card[0].id.as_str(), "card.root.borderRadius");
    }

    #[test]
    fn catalog_has_button_and_datatable_baselines() {
        let catalog = known_component_tokens();
        assert_eq!(catalog["button"].len(), 9);
        assert_eq!(catalog["datatable"].len(), 5);
        let hover = catalog["button"].iter().find(|t| t.id.as_str() == "button.hover.background").unwrap();
        assert!(hover.dependencies.contains("button.background"));
    }

    #[tokio::test]
    async fn discover_all_tokens_groups_and_caches() {
        let source = Arc::new(StaticThemeSource::new(sample_theme(), None));
        let (discovery, _) = discovery_with(source.clone());

        let groups = discovery.discover_all_tokens(BaseTheme::Aura).await;
        assert!(groups.contains_key(PRIMITIVE_GROUP));
        assert!(groups.contains_key(SEMANTIC_GROUP));
        assert!(groups.contains_key("card"));
        // Discovered button token plus the 9 catalog tokens.
        assert_eq!(groups["button"].len(), 10);
        assert_eq!(groups["datatable"].len(), 5);
        assert!(discovery.cache().is_valid().await);

        let again = discovery.discover_all_tokens(BaseTheme::Aura).await;
        assert_eq!(again, groups);
        assert_eq!(source.loads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn persisted_cache_short_circuits_discovery() {
        let store = Arc::new(MemoryKeyValueStore::new());
        let ttl = Duration::from_secs(60);
        let first = TokenDiscovery::new(
            Arc::new(StaticThemeSource::new(sample_theme(), None)),
            DiscoveryCache::new(store.clone(), ttl),
        );
        let groups = first.discover_all_tokens(BaseTheme::Aura).await;

        let source = Arc::new(StaticThemeSource::new(json!({}), None));
        let second = TokenDiscovery::new(source.clone(), DiscoveryCache::new(store, ttl));
        assert_eq!(second.discover_all_tokens(BaseTheme::Lara).await, groups);
        assert_eq!(source.loads.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn failing_source_still_yields_supplements_and_catalog() {
        let (discovery, _) = discovery_with(Arc::new(FailingThemeSource));
        let groups = discovery.discover_all_tokens(BaseTheme::Nora).await;
        assert_eq!(groups[PRIMITIVE_GROUP].len(), COMMON_RADII.len());
        assert_eq!(groups[SEMANTIC_GROUP].len(), SEMANTIC_FAMILIES.len() * SHADES.len());
        assert_eq!(groups.len(), 4);
    }

    #[tokio::test]
    async fn unknown_component_is_empty_and_stats_count_groups() {
        let (discovery, _) = discovery_with(Arc::new(StaticThemeSource::new(sample_theme(), None)));
        assert!(discovery.discover_component_tokens("not-a-component").await.is_empty());
        assert_eq!(discovery.discover_component_tokens("datatable").await.len(), 5);

        let stats = discovery.discovery_stats().await;
        assert_eq!(stats.total_components, KNOWN_COMPONENTS.len());
        assert_eq!(stats.discovered_components, 3);
        assert_eq!(stats.tokens_by_category[&TokenCategory::Custom], 0);
        assert_eq!(stats.tokens_by_category[&TokenCategory::Component], 10 + 5 + 2);
        assert!(stats.cache.exists);

        discovery.clear_cache().await;
        let cleared = discovery.discovery_stats().await;
        assert_eq!(cleared.total_tokens, 0);
        assert!(!cleared.cache.exists);
    }

    #[tokio::test]
    async fn embedded_themes_all_parse() {
        let source = EmbeddedThemeSource;
        for theme in BaseTheme::ALL {
            let value = source.load_base_theme(theme).await.unwrap();
            assert!(value.get("primitive").is_some(), "{} has no primitive section", theme);
        }
        assert!(source.load_custom_preset().await.unwrap().is_some());
    }
}
