//! Literal value inference
//!
//! Converts a raw token into a typed [`Value`] using a fixed precedence:
//! keywords, integer, float, composite literal, raw string. Parsing never
//! fails past this module; anything unrecognized degrades to the raw
//! string with one pair of surrounding quotes stripped.

use regex::Regex;

use crate::core::token::strip_quotes;
use crate::value::Value;

/// Token-shape gates for numbers.
///
/// `f64::from_str` accepts `inf`, `nan`, and similar spellings that must
/// stay strings, so numeric parsing is gated on explicit token shapes.
pub struct LiteralParser {
    re_int: Regex,
    re_float: Regex,
}

impl LiteralParser {
    pub fn new() -> Self {
        Self {
            re_int: Regex::new(r"^-?\d+$").expect("static integer pattern"),
            re_float: Regex::new(r"^-?(\d+\.\d*|\.\d+|\d+(\.\d+)?[eE][+-]?\d+)$")
                .expect("static float pattern"),
        }
    }

    /// Infer a typed value from one raw token
    pub fn parse(&self, token: &str) -> Value {
        match token {
            "true" | "True" => return Value::Bool(true),
            "false" | "False" => return Value::Bool(false),
            "none" | "None" | "null" => return Value::Unit,
            _ => {}
        }
        if self.re_int.is_match(token) {
            if let Ok(n) = token.parse::<i64>() {
                return Value::Int(n);
            }
            // Out of integer range; fall through to the float reading
            if let Ok(x) = token.parse::<f64>() {
                return Value::Float(x);
            }
        }
        if self.re_float.is_match(token) {
            if let Ok(x) = token.parse::<f64>() {
                return Value::Float(x);
            }
        }
        if token.starts_with(['[', '(', '{']) {
            if let Some(value) = self.parse_composite(token) {
                return value;
            }
        }
        Value::Str(strip_quotes(token).to_string())
    }

    /// Parse a composite literal (list/tuple/map/set syntax), recursively
    /// applying the same inference to elements. Any structural error makes
    /// the whole token fall back to a raw string.
    fn parse_composite(&self, token: &str) -> Option<Value> {
        let mut scanner = Scanner {
            chars: token.chars().collect(),
            pos: 0,
            parser: self,
        };
        let value = scanner.scan_value()?;
        scanner.skip_whitespace();
        if scanner.at_end() { Some(value) } else { None }
    }
}

impl Default for LiteralParser {
    fn default() -> Self {
        Self::new()
    }
}

struct Scanner<'a> {
    chars: Vec<char>,
    pos: usize,
    parser: &'a LiteralParser,
}

impl Scanner<'_> {
    fn scan_value(&mut self) -> Option<Value> {
        self.skip_whitespace();
        match self.peek()? {
            '[' => self.scan_sequence(']'),
            '(' => self.scan_sequence(')'),
            '{' => self.scan_braces(),
            '"' | '\'' => self.scan_quoted(),
            _ => self.scan_atom(),
        }
    }

    /// `[..]` and `(..)` both produce lists
    fn scan_sequence(&mut self, close: char) -> Option<Value> {
        self.advance();
        let mut items = Vec::new();
        loop {
            self.skip_whitespace();
            if self.peek()? == close {
                self.advance();
                return Some(Value::List(items));
            }
            items.push(self.scan_value()?);
            self.skip_whitespace();
            match self.peek()? {
                ',' => {
                    self.advance();
                }
                c if c == close => {}
                _ => return None,
            }
        }
    }

    /// `{k: v, ..}` produces a map, `{a, b}` a set rendered as a list
    fn scan_braces(&mut self) -> Option<Value> {
        self.advance();
        self.skip_whitespace();
        if self.peek()? == '}' {
            self.advance();
            return Some(Value::Map(Vec::new()));
        }
        let first = self.scan_value()?;
        self.skip_whitespace();
        if self.peek()? == ':' {
            self.advance();
            let mut entries = vec![(key_string(&first), self.scan_value()?)];
            loop {
                self.skip_whitespace();
                match self.peek()? {
                    '}' => {
                        self.advance();
                        return Some(Value::Map(entries));
                    }
                    ',' => {
                        self.advance();
                        self.skip_whitespace();
                        if self.peek()? == '}' {
                            self.advance();
                            return Some(Value::Map(entries));
                        }
                        let key = self.scan_value()?;
                        self.skip_whitespace();
                        if self.peek()? != ':' {
                            return None;
                        }
                        self.advance();
                        entries.push((key_string(&key), self.scan_value()?));
                    }
                    _ => return None,
                }
            }
        }
        let mut items = vec![first];
        loop {
            self.skip_whitespace();
            match self.peek()? {
                '}' => {
                    self.advance();
                    return Some(Value::List(items));
                }
                ',' => {
                    self.advance();
                    self.skip_whitespace();
                    if self.peek()? == '}' {
                        self.advance();
                        return Some(Value::List(items));
                    }
                    items.push(self.scan_value()?);
                }
                _ => return None,
            }
        }
    }

    fn scan_quoted(&mut self) -> Option<Value> {
        let quote = self.advance()?;
        let mut text = String::new();
        loop {
            let c = self.advance()?;
            if c == quote {
                return Some(Value::Str(text));
            }
            if c == '\\' {
                text.push(self.advance()?);
            } else {
                text.push(c);
            }
        }
    }

    fn scan_atom(&mut self) -> Option<Value> {
        let mut text = String::new();
        while let Some(c) = self.peek() {
            if matches!(c, ',' | ':' | ']' | ')' | '}') || c.is_whitespace() {
                break;
            }
            text.push(c);
            self.advance();
        }
        if text.is_empty() {
            return None;
        }
        Some(self.parser.parse(&text))
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }
}

fn key_string(value: &Value) -> String {
    match value {
        Value::Str(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(token: &str) -> Value {
        LiteralParser::new().parse(token)
    }

    #[test]
    fn test_keywords() {
        assert_eq!(parse("True"), Value::Bool(true));
        assert_eq!(parse("true"), Value::Bool(true));
        assert_eq!(parse("False"), Value::Bool(false));
        assert_eq!(parse("None"), Value::Unit);
        assert_eq!(parse("null"), Value::Unit);
        // Other spellings stay strings
        assert_eq!(parse("TRUE"), Value::from("TRUE"));
    }

    #[test]
    fn test_integers() {
        assert_eq!(parse("5"), Value::Int(5));
        assert_eq!(parse("-3"), Value::Int(-3));
        assert_eq!(parse("0"), Value::Int(0));
    }

    #[test]
    fn test_floats() {
        assert_eq!(parse("2.2"), Value::Float(2.2));
        assert_eq!(parse("-4.0"), Value::Float(-4.0));
        assert_eq!(parse("5.0"), Value::Float(5.0));
        assert_eq!(parse("1e3"), Value::Float(1000.0));
    }

    #[test]
    fn test_number_lookalikes_stay_strings() {
        assert_eq!(parse("inf"), Value::from("inf"));
        assert_eq!(parse("nan"), Value::from("nan"));
        assert_eq!(parse("1.2.3"), Value::from("1.2.3"));
    }

    #[test]
    fn test_quoted_strings() {
        assert_eq!(parse("\"Hello\""), Value::from("Hello"));
        assert_eq!(parse("'world'"), Value::from("world"));
        assert_eq!(parse("\"--test\""), Value::from("--test"));
        assert_eq!(parse("\"5\""), Value::from("5"));
    }

    #[test]
    fn test_list_literals() {
        assert_eq!(
            parse("[1, 2, 3]"),
            Value::List(vec![Value::Int(1), Value::Int(2), Value::Int(3)])
        );
        assert_eq!(parse("[]"), Value::List(vec![]));
        assert_eq!(
            parse("[a, 'b c']"),
            Value::List(vec![Value::from("a"), Value::from("b c")])
        );
        assert_eq!(
            parse("[[1], [2]]"),
            Value::List(vec![
                Value::List(vec![Value::Int(1)]),
                Value::List(vec![Value::Int(2)]),
            ])
        );
    }

    #[test]
    fn test_tuple_and_set_literals_become_lists() {
        assert_eq!(
            parse("(1, 2)"),
            Value::List(vec![Value::Int(1), Value::Int(2)])
        );
        assert_eq!(
            parse("{1, 2}"),
            Value::List(vec![Value::Int(1), Value::Int(2)])
        );
    }

    #[test]
    fn test_map_literals() {
        assert_eq!(
            parse("{a: 1, b: 2}"),
            Value::Map(vec![
                ("a".to_string(), Value::Int(1)),
                ("b".to_string(), Value::Int(2)),
            ])
        );
        assert_eq!(parse("{}"), Value::Map(vec![]));
        assert_eq!(
            parse("{'name': 'David', 'age': 24}"),
            Value::Map(vec![
                ("name".to_string(), Value::from("David")),
                ("age".to_string(), Value::Int(24)),
            ])
        );
    }

    #[test]
    fn test_malformed_composites_fall_back_to_strings() {
        assert_eq!(parse("[1, 2"), Value::from("[1, 2"));
        assert_eq!(parse("{a: }"), Value::from("{a: }"));
        assert_eq!(parse("[1] extra"), Value::from("[1] extra"));
    }
}
