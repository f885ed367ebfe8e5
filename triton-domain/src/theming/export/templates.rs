//! Text artifacts written into exported theme archives.

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use std::fmt::Write as _;
use tracing::warn;

use super::{ExportMetadata, PackageOptions, DEFAULT_PACKAGE_VERSION, EXPORTED_BY};
use crate::theming::preset::ThemePreset;
use crate::theming::types::{DesignToken, TokenCategory};

lazy_static! {
    static ref JS_IDENTIFIER: Regex = Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").unwrap();
}

/// Everything a template needs to render.
pub(crate) struct ExportContext<'a> {
    pub preset: &'a ThemePreset,
    pub tokens: &'a [DesignToken],
    pub metadata: &'a ExportMetadata,
}

impl ExportContext<'_> {
    fn component_groups(&self) -> BTreeMap<&str, Vec<&DesignToken>> {
        let mut groups: BTreeMap<&str, Vec<&DesignToken>> = BTreeMap::new();
        for token in self.tokens {
            if let Some(component) = token.component() {
                groups.entry(component).or_default().push(token);
            }
        }
        groups
    }
}

/// Places `value` at the dotted `path` below `root`. A path that runs into an
/// existing leaf (or a leaf that lands on an existing object) keeps the first entry.
fn insert_path(root: &mut Map<String, Value>, path: &str, value: Value) {
    let segments: Vec<&str> = path.split('.').filter(|s| !s.is_empty()).collect();
    let Some((last, parents)) = segments.split_last() else {
        return;
    };
    let mut current = root;
    for segment in parents {
        let entry = current
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        match entry {
            Value::Object(next) => current = next,
            _ => {
                warn!("Skipping token at '{}': '{}' already holds a value", path, segment);
                return;
            }
        }
    }
    if current.contains_key(*last) {
        warn!("Skipping token at '{}': path already defined", path);
        return;
    }
    current.insert(last.to_string(), value);
}

fn section<'t, I>(tokens: I) -> Map<String, Value>
where
    I: IntoIterator<Item = &'t DesignToken>,
{
    let mut map = Map::new();
    for token in tokens {
        insert_path(&mut map, &token.path, token.value.to_json());
    }
    map
}

/// The theme object as JSON: `primitive`, `semantic`, `components` and, when
/// present, `custom`.
pub(crate) fn theme_object(ctx: &ExportContext<'_>) -> Value {
    let by_category = |category: TokenCategory| ctx.tokens.iter().filter(move |t| t.category == category);

    let mut components = Map::new();
    for (component, tokens) in ctx.component_groups() {
        components.insert(component.to_string(), Value::Object(section(tokens)));
    }

    let mut theme = Map::new();
    theme.insert("primitive".into(), Value::Object(section(by_category(TokenCategory::Primitive))));
    theme.insert("semantic".into(), Value::Object(section(by_category(TokenCategory::Semantic))));
    theme.insert("components".into(), Value::Object(components));
    let custom = section(by_category(TokenCategory::Custom));
    if !custom.is_empty() {
        theme.insert("custom".into(), Value::Object(custom));
    }
    Value::Object(theme)
}

fn js_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('\'');
    out
}

fn js_key(key: &str) -> String {
    if JS_IDENTIFIER.is_match(key) {
        key.to_string()
    } else {
        js_string(key)
    }
}

/// Renders a JSON value as a JavaScript literal with two-space indentation.
pub(crate) fn js_literal(value: &Value, indent: usize) -> String {
    match value {
        Value::Object(map) if map.is_empty() => "{}".to_string(),
        Value::Object(map) => {
            let pad = "  ".repeat(indent + 1);
            let mut out = String::from("{\n");
            for (i, (key, child)) in map.iter().enumerate() {
                let _ = write!(out, "{}{}: {}", pad, js_key(key), js_literal(child, indent + 1));
                out.push_str(if i + 1 < map.len() { ",\n" } else { "\n" });
            }
            out.push_str(&"  ".repeat(indent));
            out.push('}');
            out
        }
        Value::Array(items) => {
            let rendered: Vec<String> = items.iter().map(|v| js_literal(v, indent)).collect();
            format!("[{}]", rendered.join(", "))
        }
        Value::String(s) => js_string(s),
        other => other.to_string(),
    }
}

pub(crate) fn theme_js(ctx: &ExportContext<'_>) -> String {
    format!(
        "/**\n * {} Theme\n * Generated by {}\n * {}\n */\n\nexport default {}\n",
        ctx.preset.name,
        EXPORTED_BY,
        ctx.metadata.exported_at.to_rfc3339(),
        js_literal(&theme_object(ctx), 0)
    )
}

/// One `<component>.js` module per component, keyed by file name.
pub(crate) fn component_files(ctx: &ExportContext<'_>) -> BTreeMap<String, String> {
    ctx.component_groups()
        .into_iter()
        .map(|(component, tokens)| {
            let body = js_literal(&Value::Object(section(tokens)), 0);
            let content = format!(
                "/**\n * {} Component Theme\n * Part of {}\n */\n\nexport default {}\n",
                component, ctx.preset.name, body
            );
            (format!("{}.js", component), content)
        })
        .collect()
}

pub(crate) fn type_definitions(ctx: &ExportContext<'_>) -> String {
    format!(
        r#"/**
 * {name} Theme Types
 * Generated by {by}
 */

type TokenTree = {{ [key: string]: string | number | TokenTree }}

export interface ThemeTokens {{
  primitive: TokenTree
  semantic: TokenTree
  components: {{
    [componentName: string]: TokenTree
  }}
  custom?: TokenTree
}}

declare const theme: ThemeTokens
export default theme
"#,
        name = ctx.preset.name,
        by = EXPORTED_BY
    )
}

pub(crate) fn package_json(ctx: &ExportContext<'_>, options: &PackageOptions) -> Value {
    json!({
        "name": options.name,
        "version": options.version.as_deref().unwrap_or(DEFAULT_PACKAGE_VERSION),
        "description": options
            .description
            .clone()
            .unwrap_or_else(|| format!("{} theme for PrimeVue", ctx.preset.name)),
        "main": "index.js",
        "types": "index.d.ts",
        "files": ["dist/", "src/", "index.js", "index.d.ts", "README.md"],
        "keywords": ["primevue", "theme", "css", "vue", "design-tokens", ctx.preset.name.to_lowercase()],
        "author": options
            .author
            .clone()
            .unwrap_or_else(|| format!("Generated by {}", EXPORTED_BY)),
        "license": options.license.as_deref().unwrap_or("MIT"),
        "peerDependencies": {
            "primevue": "^4.0.0",
            "vue": "^3.0.0"
        }
    })
}

fn js_export_name(component: &str) -> String {
    let mut name: String = component
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '$' { c } else { '_' })
        .collect();
    if name.chars().next().map_or(true, |c| c.is_ascii_digit()) {
        name.insert(0, '_');
    }
    name
}

/// Entry module. `theme_path` and `components_dir` are relative to the module itself.
pub(crate) fn package_index(ctx: &ExportContext<'_>, theme_path: &str, components_dir: &str) -> String {
    let mut out = format!(
        "/**\n * {} Theme Package\n * Generated by {}\n */\n\nimport theme from '{}'\n\nexport default theme\nexport {{ theme }}\n",
        ctx.preset.name, EXPORTED_BY, theme_path
    );
    let components = ctx.component_groups();
    if !components.is_empty() {
        out.push('\n');
        for component in components.keys() {
            let _ = writeln!(
                out,
                "export {{ default as {} }} from '{}/{}.js'",
                js_export_name(component),
                components_dir,
                component
            );
        }
    }
    out
}

pub(crate) fn readme(ctx: &ExportContext<'_>, package: Option<&PackageOptions>) -> String {
    let mut out = format!(
        "# {}\n\n{}\n\nGenerated by {} on {}\n\n## Installation\n\n",
        ctx.preset.name,
        ctx.preset
            .description
            .as_deref()
            .unwrap_or("A custom theme for PrimeVue applications."),
        EXPORTED_BY,
        ctx.metadata.exported_at.to_rfc3339()
    );

    match package {
        Some(options) => {
            let _ = write!(
                out,
                "```bash\nnpm install {name}\n```\n\n## Usage\n\n```javascript\nimport {{ createApp }} from 'vue'\nimport PrimeVue from 'primevue/config'\nimport theme from '{name}'\n\nconst app = createApp(App)\napp.use(PrimeVue, {{ theme: {{ preset: theme }} }})\n```\n",
                name = options.name
            );
        }
        None => {
            out.push_str(
                "1. Copy the theme files into your project.\n2. Register the theme with PrimeVue:\n\n```javascript\nimport PrimeVue from 'primevue/config'\nimport theme from './theme.js'\n\napp.use(PrimeVue, { theme: { preset: theme } })\n```\n",
            );
        }
    }

    let _ = write!(
        out,
        "\n## Theme Tokens\n\nThis theme contains {} design tokens:\n\n- **Primitive tokens**: raw palette, radius and size values\n- **Semantic tokens**: meaning-bearing colors such as primary and surface\n- **Component tokens**: per-component styling values\n\n## Customization\n\nOverride any value on the theme object before passing it to PrimeVue.\n",
        ctx.tokens.len()
    );
    out
}

pub(crate) fn token_documentation(ctx: &ExportContext<'_>) -> String {
    let mut out = format!(
        "# Token Documentation\n\n## {} Theme Tokens\n\nTotal tokens: {}\n\n",
        ctx.preset.name,
        ctx.tokens.len()
    );

    for category in TokenCategory::ALL {
        let tokens: Vec<&DesignToken> = ctx.tokens.iter().filter(|t| t.category == category).collect();
        if tokens.is_empty() {
            continue;
        }
        let name = category.as_str();
        let title: String = name[..1].to_uppercase() + &name[1..];
        let _ = write!(out, "## {} Tokens ({})\n\n", title, tokens.len());

        for token in tokens {
            let _ = writeln!(out, "### {}", token.label);
            let _ = writeln!(out, "- **Path**: `{}`", token.path);
            let _ = writeln!(out, "- **Type**: {}", token.token_type);
            let _ = writeln!(out, "- **Value**: `{}`", token.value);
            if let Some(description) = &token.description {
                let _ = writeln!(out, "- **Description**: {}", description);
            }
            if !token.affects.is_empty() {
                let affects: Vec<&str> = token.affects.iter().map(String::as_str).collect();
                let _ = writeln!(out, "- **Affects**: {}", affects.join(", "));
            }
            out.push('\n');
        }
    }
    out
}

pub(crate) fn example_html(ctx: &ExportContext<'_>) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{name} Theme Example</title>
    <script src="https://unpkg.com/vue@3/dist/vue.global.js"></script>
    <script src="https://unpkg.com/primevue@4/umd/primevue.min.js"></script>
</head>
<body>
    <div id="app">
        <h1>{name} Theme Demo</h1>
        <p-button label="Primary"></p-button>
        <p-button label="Secondary" severity="secondary"></p-button>
        <p-input-text placeholder="Input field"></p-input-text>
    </div>
    <script type="module" src="main.js"></script>
</body>
</html>
"#,
        name = ctx.preset.name
    )
}

pub(crate) fn example_js() -> &'static str {
    r#"import theme from '../index.js'

const { createApp } = Vue
const app = createApp({})

app.use(PrimeVue.Config, { theme: { preset: theme } })
app.component('p-button', PrimeVue.Button)
app.component('p-input-text', PrimeVue.InputText)

app.mount('#app')
"#
}

pub(crate) fn package_tests(ctx: &ExportContext<'_>) -> String {
    format!(
        r#"/**
 * {name} Theme Tests
 */

import assert from 'assert'
import theme from '../index.js'

describe('{name} Theme', () => {{
  it('exports a theme object', () => {{
    assert.strictEqual(typeof theme, 'object')
    assert.ok(theme.primitive)
    assert.ok(theme.semantic)
    assert.ok(theme.components)
  }})

  it('defines primitive tokens', () => {{
    assert.ok(Object.keys(theme.primitive).length > 0)
  }})

  it('defines semantic tokens', () => {{
    assert.ok(Object.keys(theme.semantic).length > 0)
  }})
}})
"#,
        name = ctx.preset.name
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theming::types::{BaseTheme, TokenType};
    use chrono::Utc;
    use pretty_assertions::assert_eq;

    fn metadata() -> ExportMetadata {
        ExportMetadata::new(super::super::ExportFormat::Primevue, None, Vec::new(), Utc::now())
    }

    fn tokens() -> Vec<DesignToken> {
        vec![
            DesignToken::new("primitive.borderRadius.md", TokenCategory::Primitive, "borderRadius.md", "6px", TokenType::BorderRadius),
            DesignToken::new("semantic.primary.500", TokenCategory::Semantic, "primary.500", "#0b2244", TokenType::Color),
            DesignToken::new("button.hover.background", TokenCategory::Component, "hover.background", "{primary.600}", TokenType::Color)
                .with_subcategory("button")
                .with_affects(["button"]),
        ]
    }

    #[test]
    fn theme_object_nests_paths_by_section() {
        let preset = ThemePreset::new("p", "Harbor", BaseTheme::Aura);
        let tokens = tokens();
        let metadata = metadata();
        let ctx = ExportContext { preset: &preset, tokens: &tokens, metadata: &metadata };

        let theme = theme_object(&ctx);
        assert_eq!(theme["primitive"]["borderRadius"]["md"], "6px");
        assert_eq!(theme["semantic"]["primary"]["500"], "#0b2244");
        assert_eq!(theme["components"]["button"]["hover"]["background"], "{primary.600}");
        assert!(theme.get("custom").is_none());
    }

    #[test]
    fn js_literal_quotes_non_identifier_keys_and_escapes_strings() {
        let value = json!({ "500": "it's", "fontWeight": 500 });
        assert_eq!(js_literal(&value, 0), "{\n  '500': 'it\\'s',\n  fontWeight: 500\n}");
    }

    #[test]
    fn theme_js_starts_with_name_header() {
        let preset = ThemePreset::new("p", "Harbor", BaseTheme::Aura);
        let tokens = tokens();
        let metadata = metadata();
        let ctx = ExportContext { preset: &preset, tokens: &tokens, metadata: &metadata };

        let js = theme_js(&ctx);
        assert!(js.starts_with("/**\n * Harbor Theme\n * Generated by Triton Theme System\n"));
        assert!(js.contains("export default {"));
    }

    #[test]
    fn leaf_and_branch_on_same_path_keep_first() {
        let mut root = Map::new();
        insert_path(&mut root, "primary", json!("#000"));
        insert_path(&mut root, "primary.500", json!("#111"));
        assert_eq!(Value::Object(root), json!({ "primary": "#000" }));
    }

    #[test]
    fn token_documentation_lists_categories_with_counts() {
        let preset = ThemePreset::new("p", "Harbor", BaseTheme::Aura);
        let tokens = tokens();
        let metadata = metadata();
        let ctx = ExportContext { preset: &preset, tokens: &tokens, metadata: &metadata };

        let docs = token_documentation(&ctx);
        assert!(docs.contains("## Primitive Tokens (1)"));
        assert!(docs.contains("## Component Tokens (1)"));
        assert!(docs.contains("- **Affects**: button"));
        assert!(!docs.contains("## Custom Tokens"));
    }

    #[test]
    fn package_index_exports_each_component() {
        let preset = ThemePreset::new("p", "Harbor", BaseTheme::Aura);
        let tokens = tokens();
        let metadata = metadata();
        let ctx = ExportContext { preset: &preset, tokens: &tokens, metadata: &metadata };

        let index = package_index(&ctx, "./src/theme.js", "./src/components");
        assert!(index.contains("import theme from './src/theme.js'"));
        assert!(index.contains("export { default as button } from './src/components/button.js'"));
    }
}
