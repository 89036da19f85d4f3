//! Directive annotation syntax.
//!
//! Parses annotations such as `@constraint(minLength: 1, format: "email")`
//! into [`Directive`] values. Argument values use literal syntax: integers,
//! floats, double-quoted strings, `true`, `false`, `null`, lists and objects.
//! Commas are insignificant, as in SDL.

use constraint_core::{Directive, Value};
use std::collections::BTreeMap;
use thiserror::Error;

/// A syntax error in a directive annotation.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message} at position {position}")]
pub struct SyntaxError {
    /// What went wrong
    pub message: String,
    /// Character offset in the input
    pub position: usize,
}

/// Parses exactly one directive, e.g. `@constraint(min: 3)`. The `@` is optional.
///
/// # Example
///
/// ```rust
/// use constraint_core::Value;
/// use constraint_parser::parse_directive;
///
/// let directive = parse_directive(r#"@constraint(min: 3, format: "email")"#).unwrap();
/// assert_eq!(directive.name, "constraint");
/// assert_eq!(directive.arguments["min"], Value::Int(3));
/// ```
pub fn parse_directive(input: &str) -> Result<Directive, SyntaxError> {
    let mut parser = Parser::new(input);
    parser.skip_ignored();
    let directive = parser.directive()?;
    parser.skip_ignored();
    parser.expect_end()?;
    Ok(directive)
}

/// Parses zero or more directives separated by whitespace.
pub fn parse_directives(input: &str) -> Result<Vec<Directive>, SyntaxError> {
    let mut parser = Parser::new(input);
    let mut directives = Vec::new();
    parser.skip_ignored();
    while !parser.at_end() {
        directives.push(parser.directive()?);
        parser.skip_ignored();
    }
    Ok(directives)
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
}

impl Parser {
    fn new(input: &str) -> Self {
        Self {
            chars: input.chars().collect(),
            pos: 0,
        }
    }

    fn error(&self, message: impl Into<String>) -> SyntaxError {
        SyntaxError {
            message: message.into(),
            position: self.pos,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    fn at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }

    fn expect_end(&self) -> Result<(), SyntaxError> {
        match self.peek() {
            None => Ok(()),
            Some(c) => Err(self.error(format!("Unexpected character '{c}'"))),
        }
    }

    fn expect(&mut self, expected: char) -> Result<(), SyntaxError> {
        match self.peek() {
            Some(c) if c == expected => {
                self.pos += 1;
                Ok(())
            }
            Some(c) => Err(self.error(format!("Expected '{expected}', found '{c}'"))),
            None => Err(self.error(format!("Expected '{expected}', found end of input"))),
        }
    }

    fn skip_ignored(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace() || c == ',') {
            self.pos += 1;
        }
    }

    fn name(&mut self) -> Result<String, SyntaxError> {
        let start = self.pos;
        match self.peek() {
            Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
            Some(c) => return Err(self.error(format!("Expected a name, found '{c}'"))),
            None => return Err(self.error("Expected a name, found end of input")),
        }
        while matches!(self.peek(), Some(c) if c.is_ascii_alphanumeric() || c == '_') {
            self.pos += 1;
        }
        Ok(self.chars[start..self.pos].iter().collect())
    }

    fn directive(&mut self) -> Result<Directive, SyntaxError> {
        if self.peek() == Some('@') {
            self.pos += 1;
        }
        let mut directive = Directive::new(self.name()?);

        let save = self.pos;
        self.skip_ignored();
        if self.peek() != Some('(') {
            self.pos = save;
            return Ok(directive);
        }
        self.pos += 1;

        loop {
            self.skip_ignored();
            if self.peek() == Some(')') {
                self.pos += 1;
                break;
            }
            let start = self.pos;
            let name = self.name()?;
            self.skip_ignored();
            self.expect(':')?;
            self.skip_ignored();
            let value = self.value()?;
            if directive.arguments.insert(name.clone(), value).is_some() {
                return Err(SyntaxError {
                    message: format!("Duplicate argument '{name}'"),
                    position: start,
                });
            }
        }

        Ok(directive)
    }

    fn value(&mut self) -> Result<Value, SyntaxError> {
        match self.peek() {
            Some('"') => self.string().map(Value::String),
            Some('[') => self.list(),
            Some('{') => self.object(),
            Some(c) if c == '-' || c.is_ascii_digit() => self.number(),
            Some(c) if c.is_ascii_alphabetic() || c == '_' => {
                let start = self.pos;
                match self.name()?.as_str() {
                    "true" => Ok(Value::Boolean(true)),
                    "false" => Ok(Value::Boolean(false)),
                    "null" => Ok(Value::Null),
                    other => Err(SyntaxError {
                        message: format!("Unexpected name '{other}', expected a value"),
                        position: start,
                    }),
                }
            }
            Some(c) => Err(self.error(format!("Unexpected character '{c}'"))),
            None => Err(self.error("Expected a value, found end of input")),
        }
    }

    fn list(&mut self) -> Result<Value, SyntaxError> {
        self.expect('[')?;
        let mut items = Vec::new();
        loop {
            self.skip_ignored();
            if self.peek() == Some(']') {
                self.pos += 1;
                return Ok(Value::List(items));
            }
            items.push(self.value()?);
        }
    }

    fn object(&mut self) -> Result<Value, SyntaxError> {
        self.expect('{')?;
        let mut fields = BTreeMap::new();
        loop {
            self.skip_ignored();
            if self.peek() == Some('}') {
                self.pos += 1;
                return Ok(Value::Object(fields));
            }
            let name = self.name()?;
            self.skip_ignored();
            self.expect(':')?;
            self.skip_ignored();
            let value = self.value()?;
            fields.insert(name, value);
        }
    }

    fn digits(&mut self) -> usize {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
            self.pos += 1;
        }
        self.pos - start
    }

    fn number(&mut self) -> Result<Value, SyntaxError> {
        let start = self.pos;
        if self.peek() == Some('-') {
            self.pos += 1;
        }
        if self.digits() == 0 {
            return Err(self.error("Expected digits"));
        }

        let mut is_float = false;
        if self.peek() == Some('.') {
            is_float = true;
            self.pos += 1;
            if self.digits() == 0 {
                return Err(self.error("Expected digits after '.'"));
            }
        }
        if matches!(self.peek(), Some('e' | 'E')) {
            is_float = true;
            self.pos += 1;
            if matches!(self.peek(), Some('+' | '-')) {
                self.pos += 1;
            }
            if self.digits() == 0 {
                return Err(self.error("Expected exponent digits"));
            }
        }

        let text: String = self.chars[start..self.pos].iter().collect();
        let invalid = || SyntaxError {
            message: format!("Invalid number '{text}'"),
            position: start,
        };
        if is_float {
            text.parse::<f64>().map(Value::Float).map_err(|_| invalid())
        } else {
            text.parse::<i64>().map(Value::Int).map_err(|_| invalid())
        }
    }

    fn string(&mut self) -> Result<String, SyntaxError> {
        self.expect('"')?;
        let mut out = String::new();
        loop {
            match self.bump() {
                None => return Err(self.error("Unterminated string")),
                Some('"') => return Ok(out),
                Some('\\') => {
                    let escaped = match self.bump() {
                        Some('"') => '"',
                        Some('\\') => '\\',
                        Some('/') => '/',
                        Some('b') => '\u{0008}',
                        Some('f') => '\u{000C}',
                        Some('n') => '\n',
                        Some('r') => '\r',
                        Some('t') => '\t',
                        Some('u') => self.unicode_escape()?,
                        Some(c) => return Err(self.error(format!("Invalid escape '\\{c}'"))),
                        None => return Err(self.error("Unterminated string")),
                    };
                    out.push(escaped);
                }
                Some(c) => out.push(c),
            }
        }
    }

    fn unicode_escape(&mut self) -> Result<char, SyntaxError> {
        let start = self.pos;
        let braced = self.peek() == Some('{');
        if braced {
            self.pos += 1;
        }
        let digits_start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_ascii_hexdigit()) {
            self.pos += 1;
        }
        let hex: String = self.chars[digits_start..self.pos].iter().collect();
        if braced {
            self.expect('}')?;
        } else if hex.len() != 4 {
            self.pos = digits_start + hex.len().min(4);
            return Err(self.error("Expected four hex digits in unicode escape"));
        }

        u32::from_str_radix(&hex, 16)
            .ok()
            .and_then(char::from_u32)
            .ok_or_else(|| SyntaxError {
                message: format!("Invalid unicode escape '{hex}'"),
                position: start,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_numeric_arguments() {
        let directive = parse_directive("@constraint(min: 3, max: 10.5, exclusiveMin: -1e2)").unwrap();
        assert_eq!(directive.name, "constraint");
        assert_eq!(directive.arguments["min"], Value::Int(3));
        assert_eq!(directive.arguments["max"], Value::Float(10.5));
        assert_eq!(directive.arguments["exclusiveMin"], Value::Float(-100.0));
    }

    #[test]
    fn test_parse_string_arguments_with_escapes() {
        let directive =
            parse_directive(r#"constraint(pattern: "^\\d+$", contains: "a\"b", startsWith: "é")"#)
                .unwrap();
        assert_eq!(directive.arguments["pattern"], Value::String(r"^\d+$".to_string()));
        assert_eq!(directive.arguments["contains"], Value::String("a\"b".to_string()));
        assert_eq!(directive.arguments["startsWith"], Value::String("é".to_string()));
    }

    #[test]
    fn test_parse_without_arguments() {
        let directive = parse_directive("@deprecated").unwrap();
        assert_eq!(directive.name, "deprecated");
        assert!(directive.arguments.is_empty());
    }

    #[test]
    fn test_parse_multiple_directives() {
        let directives =
            parse_directives(r#"@constraint(minLength: 1) @deprecated @tag(names: ["a", "b"])"#).unwrap();
        assert_eq!(directives.len(), 3);
        assert_eq!(
            directives[2].arguments["names"],
            Value::List(vec![Value::from("a"), Value::from("b")])
        );
    }

    #[test]
    fn test_parse_commas_are_optional() {
        let directive = parse_directive("@constraint(min: 1 max: 2,)").unwrap();
        assert_eq!(directive.arguments.len(), 2);
    }

    #[test]
    fn test_duplicate_argument_is_an_error() {
        let err = parse_directive("@constraint(min: 1, min: 2)").unwrap_err();
        assert_eq!(err.message, "Duplicate argument 'min'");
        assert_eq!(err.position, 20);
    }

    #[test]
    fn test_syntax_errors() {
        assert!(parse_directive("@constraint(min 3)").is_err());
        assert!(parse_directive("@constraint(min: )").is_err());
        assert!(parse_directive("@constraint(min: 3").is_err());
        assert!(parse_directive(r#"@constraint(pattern: "abc)"#).is_err());
        assert!(parse_directive("@constraint(format: email)").is_err());
        assert!(parse_directive("@constraint(min: 1.)").is_err());
        assert!(parse_directive("@constraint(min: 3) trailing(").is_err());
    }
}
