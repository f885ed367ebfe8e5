//! A small parser for the JavaScript theme modules found in theme archives.
//!
//! Only literal data is understood: objects, arrays, strings (single, double or
//! back-quoted without interpolation), numbers, `true`, `false` and `null`. Keys may
//! be identifiers, dotted identifier chains (`borderRadius.md`), numbers or strings.
//! Anything else (identifiers as values, spreads, calls) is a parse error; nothing is
//! ever evaluated.

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::{Map, Number, Value};
use thiserror::Error;

lazy_static! {
    static ref STRING_PAIR: Regex = Regex::new(r#"(\w+(?:\.\w+)*)\s*:\s*['"]([^'"]+)['"]"#).unwrap();
    static ref HEADER_NAME: Regex = Regex::new(r"^\s*/\*\*\s*\n\s*\*\s*([^*\n]+)").unwrap();
}

/// Objects and arrays nested deeper than this are rejected.
pub const MAX_NESTING_DEPTH: usize = 128;

#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message} at offset {offset}")]
pub struct JsParseError {
    pub offset: usize,
    pub message: String,
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
    depth: usize,
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '$'
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}

impl Parser {
    fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            pos: 0,
            depth: 0,
        }
    }

    fn error<T>(&self, message: impl Into<String>) -> Result<T, JsParseError> {
        Err(JsParseError {
            offset: self.pos,
            message: message.into(),
        })
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn skip_trivia(&mut self) -> Result<(), JsParseError> {
        loop {
            match (self.peek(), self.peek_at(1)) {
                (Some(c), _) if c.is_whitespace() => self.pos += 1,
                (Some('/'), Some('/')) => {
                    while let Some(c) = self.peek() {
                        if c == '\n' {
                            break;
                        }
                        self.pos += 1;
                    }
                }
                (Some('/'), Some('*')) => {
                    let start = self.pos;
                    self.pos += 2;
                    loop {
                        match (self.peek(), self.peek_at(1)) {
                            (Some('*'), Some('/')) => {
                                self.pos += 2;
                                break;
                            }
                            (Some(_), _) => self.pos += 1,
                            (None, _) => {
                                self.pos = start;
                                return self.error("Unterminated comment");
                            }
                        }
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    fn expect(&mut self, expected: char) -> Result<(), JsParseError> {
        self.skip_trivia()?;
        match self.peek() {
            Some(c) if c == expected => {
                self.pos += 1;
                Ok(())
            }
            Some(c) => self.error(format!("Expected '{}' but found '{}'", expected, c)),
            None => self.error(format!("Expected '{}' but reached end of input", expected)),
        }
    }

    fn enter_nested(&mut self) -> Result<(), JsParseError> {
        if self.depth >= MAX_NESTING_DEPTH {
            return self.error("Nesting too deep");
        }
        self.depth += 1;
        Ok(())
    }

    fn parse_value(&mut self) -> Result<Value, JsParseError> {
        self.skip_trivia()?;
        match self.peek() {
            Some('{') => self.parse_object(),
            Some('[') => self.parse_array(),
            Some(q @ ('\'' | '"' | '`')) => self.parse_string(q).map(Value::String),
            Some(c) if c == '-' || c == '.' || c.is_ascii_digit() => self.parse_number(),
            Some(c) if is_ident_start(c) => {
                let word = self.parse_identifier();
                match word.as_str() {
                    "true" => Ok(Value::Bool(true)),
                    "false" => Ok(Value::Bool(false)),
                    "null" => Ok(Value::Null),
                    _ => self.error(format!("Unsupported expression '{}'", word)),
                }
            }
            Some(c) => self.error(format!("Unexpected character '{}'", c)),
            None => self.error("Unexpected end of input"),
        }
    }

    fn parse_object(&mut self) -> Result<Value, JsParseError> {
        self.expect('{')?;
        self.enter_nested()?;
        let mut map = Map::new();
        loop {
            self.skip_trivia()?;
            if self.peek() == Some('}') {
                self.pos += 1;
                self.depth -= 1;
                return Ok(Value::Object(map));
            }
            let key = self.parse_key()?;
            self.expect(':')?;
            let value = self.parse_value()?;
            map.insert(key, value);

            self.skip_trivia()?;
            match self.peek() {
                Some(',') => self.pos += 1,
                Some('}') => {}
                Some(c) => return self.error(format!("Expected ',' or '}}' but found '{}'", c)),
                None => return self.error("Unterminated object"),
            }
        }
    }

    fn parse_array(&mut self) -> Result<Value, JsParseError> {
        self.expect('[')?;
        self.enter_nested()?;
        let mut items = Vec::new();
        loop {
            self.skip_trivia()?;
            if self.peek() == Some(']') {
                self.pos += 1;
                self.depth -= 1;
                return Ok(Value::Array(items));
            }
            items.push(self.parse_value()?);
            self.skip_trivia()?;
            match self.peek() {
                Some(',') => self.pos += 1,
                Some(']') => {}
                Some(c) => return self.error(format!("Expected ',' or ']' but found '{}'", c)),
                None => return self.error("Unterminated array"),
            }
        }
    }

    fn parse_key(&mut self) -> Result<String, JsParseError> {
        self.skip_trivia()?;
        match self.peek() {
            Some(q @ ('\'' | '"')) => self.parse_string(q),
            Some(c) if c.is_ascii_digit() => {
                let start = self.pos;
                while self.peek().is_some_and(|c| c.is_ascii_digit() || c == '.') {
                    self.pos += 1;
                }
                Ok(self.chars[start..self.pos].iter().collect())
            }
            Some(c) if is_ident_start(c) => {
                let mut key = self.parse_identifier();
                while self.peek() == Some('.') && self.peek_at(1).is_some_and(is_ident_char) {
                    self.pos += 1;
                    key.push('.');
                    let start = self.pos;
                    while self.peek().is_some_and(is_ident_char) {
                        self.pos += 1;
                    }
                    key.extend(&self.chars[start..self.pos]);
                }
                Ok(key)
            }
            Some('[') => self.error("Computed keys are not supported"),
            Some('.') => self.error("Spread elements are not supported"),
            Some(c) => self.error(format!("Unexpected character '{}' in key", c)),
            None => self.error("Unexpected end of input"),
        }
    }

    fn parse_identifier(&mut self) -> String {
        let start = self.pos;
        while self.peek().is_some_and(is_ident_char) {
            self.pos += 1;
        }
        self.chars[start..self.pos].iter().collect()
    }

    fn parse_string(&mut self, quote: char) -> Result<String, JsParseError> {
        let start = self.pos;
        self.pos += 1;
        let mut out = String::new();
        loop {
            let Some(c) = self.peek() else {
                self.pos = start;
                return self.error("Unterminated string");
            };
            self.pos += 1;
            match c {
                c if c == quote => return Ok(out),
                '$' if quote == '`' && self.peek() == Some('{') => {
                    return self.error("Template interpolation is not supported");
                }
                '\\' => {
                    let Some(escaped) = self.peek() else {
                        return self.error("Unterminated escape");
                    };
                    self.pos += 1;
                    match escaped {
                        'n' => out.push('\n'),
                        'r' => out.push('\r'),
                        't' => out.push('\t'),
                        '0' => out.push('\0'),
                        'u' => {
                            let hex: String = self.chars.iter().skip(self.pos).take(4).collect();
                            match u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                                Some(ch) if hex.len() == 4 => {
                                    out.push(ch);
                                    self.pos += 4;
                                }
                                _ => return self.error("Invalid unicode escape"),
                            }
                        }
                        '\n' => {}
                        other => out.push(other),
                    }
                }
                '\n' if quote != '`' => return self.error("Line break in string"),
                c => out.push(c),
            }
        }
    }

    fn parse_number(&mut self) -> Result<Value, JsParseError> {
        let start = self.pos;
        if self.peek() == Some('-') {
            self.pos += 1;
        }
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'))
        {
            self.pos += 1;
        }
        let text: String = self.chars[start..self.pos].iter().collect();
        if let Ok(int) = text.parse::<i64>() {
            return Ok(Value::Number(int.into()));
        }
        match text.parse::<f64>().ok().and_then(Number::from_f64) {
            Some(number) => Ok(Value::Number(number)),
            None => {
                self.pos = start;
                self.error(format!("Invalid number '{}'", text))
            }
        }
    }
}

/// Parses a single object literal. Trailing input after the closing brace is ignored.
pub fn parse_object_literal(source: &str) -> Result<Value, JsParseError> {
    let mut parser = Parser::new(source);
    parser.skip_trivia()?;
    if parser.peek() != Some('{') {
        return parser.error("Expected an object literal");
    }
    parser.parse_object()
}

/// Byte offset just past the default export marker, if the module has one.
fn export_start(source: &str) -> Option<usize> {
    if let Some(i) = source.find("export default") {
        return Some(i + "export default".len());
    }
    let i = source.find("module.exports")?;
    let rest = &source[i + "module.exports".len()..];
    let eq = rest.find('=')?;
    Some(i + "module.exports".len() + eq + 1)
}

/// The text following `export default` (or `module.exports =`), or the whole source.
pub fn export_body(source: &str) -> &str {
    export_start(source).map_or(source, |i| &source[i..])
}

/// Parses the object exported by a theme module.
pub fn parse_default_export(source: &str) -> Result<Value, JsParseError> {
    match export_start(source) {
        Some(start) => parse_object_literal(&source[start..]),
        None => Err(JsParseError {
            offset: 0,
            message: "No default export found".to_string(),
        }),
    }
}

/// Degraded extraction of `key: 'value'` pairs. Keys keep their dotted form as written.
pub fn extract_string_pairs(source: &str) -> Vec<(String, String)> {
    STRING_PAIR
        .captures_iter(source)
        .map(|c| (c[1].to_string(), c[2].to_string()))
        .collect()
}

/// Theme name from a leading `/** Name Theme ... */` header.
pub fn header_name(source: &str) -> Option<String> {
    let line = HEADER_NAME.captures(source)?.get(1)?.as_str().trim();
    let name = line.strip_suffix(" Theme").unwrap_or(line).trim();
    (!name.is_empty()).then(|| name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn parses_nested_theme_module() {
        let source = r#"/**
 * Harbor Theme
 * Generated by Triton Theme System
 */

export default {
  primitive: {
    borderRadius: { md: '6px', 'x-large': "12px" }, // trailing comment
  },
  semantic: { primary: { 500: '#0b2244' } },
  components: { button: { fontWeight: 500, ratio: -1.5, hidden: false } },
}
"#;
        let theme = parse_default_export(source).unwrap();
        assert_eq!(
            theme,
            json!({
                "primitive": { "borderRadius": { "md": "6px", "x-large": "12px" } },
                "semantic": { "primary": { "500": "#0b2244" } },
                "components": { "button": { "fontWeight": 500, "ratio": -1.5, "hidden": false } }
            })
        );
        assert_eq!(header_name(source).as_deref(), Some("Harbor"));
    }

    #[test]
    fn dotted_keys_stay_flat() {
        let theme = parse_object_literal("{ borderRadius.md: '6px', 'a.b': `c` }").unwrap();
        assert_eq!(theme, json!({ "borderRadius.md": "6px", "a.b": "c" }));
    }

    #[test]
    fn module_exports_is_accepted() {
        let theme = parse_default_export("module.exports = { color: 'red' };").unwrap();
        assert_eq!(theme, json!({ "color": "red" }));
    }

    #[test]
    fn expressions_are_rejected() {
        let err = parse_default_export("export default { primary: palette.blue }").unwrap_err();
        assert!(err.message.contains("Unsupported expression"), "{}", err);

        assert!(parse_object_literal("{ ...base, a: 'b' }").is_err());
        assert!(parse_object_literal("{ a: `${x}` }").is_err());
        assert!(parse_object_literal("{ a: 'b'").is_err());
        assert!(parse_default_export("const theme = {}").is_err());
    }

    #[test]
    fn deep_nesting_is_an_error_not_a_crash() {
        let hostile = format!("export default {}", "{a:".repeat(100_000));
        let err = parse_default_export(&hostile).unwrap_err();
        assert_eq!(err.message, "Nesting too deep");

        let arrays = format!("{{ a: {}1{} }}", "[".repeat(MAX_NESTING_DEPTH), "]".repeat(MAX_NESTING_DEPTH));
        assert_eq!(parse_object_literal(&arrays).unwrap_err().message, "Nesting too deep");

        let allowed = format!("{{ a: {}1{} }}", "[".repeat(MAX_NESTING_DEPTH - 1), "]".repeat(MAX_NESTING_DEPTH - 1));
        assert!(parse_object_literal(&allowed).is_ok());
    }

    #[test]
    fn string_pairs_fallback_finds_quoted_values() {
        let pairs = extract_string_pairs("{ primary: palette.blue, button.background: '#fff', size: \"2rem\" }");
        assert_eq!(
            pairs,
            vec![
                ("button.background".to_string(), "#fff".to_string()),
                ("size".to_string(), "2rem".to_string()),
            ]
        );
    }

    #[test]
    fn header_name_requires_doc_comment() {
        assert_eq!(header_name("export default {}"), None);
        assert_eq!(header_name("/**\n * Ocean\n */").as_deref(), Some("Ocean"));
    }
}
