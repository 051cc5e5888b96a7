//! Safe literal parsing.
//!
//! [`LiteralParser`] accepts a closed set of literal forms and nothing else:
//! no names besides `True`, `False` and `None`, no calls besides the empty
//! `set()`, no operators besides a single sign in front of a number. Input
//! that falls outside the grammar is rejected with a positioned
//! [`Error::Syntax`]; it is never evaluated.
//!
//! ## Accepted Forms
//!
//! | Form | Examples |
//! |------|----------|
//! | Constants | `True`, `False`, `None` |
//! | Integers | `42`, `-7`, `1_000`, `0xff`, `0o17`, `0b101`, arbitrarily large |
//! | Floats | `1.5`, `.5`, `1.`, `2e-3`, `1_0.0_1` |
//! | Text | `'a'`, `"a"`, `'''multi\nline'''`, `r'\d'`, `u'x'` |
//! | Bytes | `b'\x00'`, `rb'\d'` |
//! | Tuples | `()`, `(1,)`, `(1, 2)` |
//! | Lists | `[]`, `[1, 'a',]` |
//! | Sets | `{1, 2}`, `set()` |
//! | Dicts | `{}`, `{'a': 1}` |
//!
//! Whitespace, newlines and `#` comments between tokens are ignored, and
//! adjacent string literals are concatenated.
//!
//! ## Examples
//!
//! ```rust
//! use latex2pydata::{parse_literal, Value};
//!
//! let value = parse_literal("[1, 2.5, 'three', None]").unwrap();
//! assert_eq!(value.to_string(), "[1, 2.5, 'three', None]");
//!
//! assert!(parse_literal("__import__('os')").is_err());
//! ```

use crate::{Error, PyDict, PySet, Result, Value};
use num_bigint::BigInt;

/// Default limit on container nesting.
pub const DEFAULT_MAX_DEPTH: usize = 100;

/// Parses a complete literal, rejecting trailing input.
///
/// # Errors
///
/// Returns [`Error::Syntax`] if the input is not a single literal.
pub fn parse_literal(input: &str) -> Result<Value> {
    LiteralParser::new(input).parse()
}

/// Single-pass recursive-descent parser for literals.
///
/// Created via [`LiteralParser::new`]; consumed by [`LiteralParser::parse`].
pub struct LiteralParser<'a> {
    input: &'a str,
    position: usize,
    line: usize,
    column: usize,
    depth: usize,
    max_depth: usize,
}

#[derive(Clone, Copy)]
struct Mark {
    position: usize,
    line: usize,
    column: usize,
}

enum Sink {
    Text(String),
    Bytes(Vec<u8>),
}

impl Sink {
    fn push_char(&mut self, ch: char) {
        match self {
            Sink::Text(s) => s.push(ch),
            // only ASCII reaches a bytes sink
            Sink::Bytes(b) => b.push(ch as u8),
        }
    }
}

impl<'a> LiteralParser<'a> {
    #[must_use]
    pub fn new(input: &'a str) -> Self {
        LiteralParser {
            input,
            position: 0,
            line: 1,
            column: 1,
            depth: 0,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Sets the maximum container nesting depth.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Parses the whole input as one literal.
    ///
    /// A bare top-level comma list such as `1, 2` is read as a tuple.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Syntax`] with line and column on any deviation from
    /// the literal grammar.
    pub fn parse(mut self) -> Result<Value> {
        self.skip_trivia();
        if self.at_end() {
            return Err(self.error("Expected a literal, found end of input"));
        }

        let first = self.parse_value()?;
        self.skip_trivia();

        let value = if self.peek_char() == Some(',') {
            let mut items = vec![first];
            while self.peek_char() == Some(',') {
                self.next_char();
                self.skip_trivia();
                if self.at_end() {
                    break;
                }
                items.push(self.parse_value()?);
                self.skip_trivia();
            }
            Value::Tuple(items)
        } else {
            first
        };

        match self.peek_char() {
            None => Ok(value),
            Some(ch) => Err(self.error(&format!("Unexpected character '{}'", ch))),
        }
    }

    // `\r\n` and a lone `\r` are read as a single `\n`.
    fn peek_char(&self) -> Option<char> {
        self.rest().chars().next().map(newline)
    }

    fn peek_second(&self) -> Option<char> {
        let rest = self.rest();
        let first = rest.chars().next()?;
        rest[char_width(rest, first)..].chars().next().map(newline)
    }

    fn next_char(&mut self) -> Option<char> {
        let rest = self.rest();
        if let Some(ch) = rest.chars().next() {
            self.position += char_width(rest, ch);
            let ch = newline(ch);
            if ch == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
            Some(ch)
        } else {
            None
        }
    }

    fn at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    fn rest(&self) -> &'a str {
        &self.input[self.position..]
    }

    fn mark(&self) -> Mark {
        Mark {
            position: self.position,
            line: self.line,
            column: self.column,
        }
    }

    fn reset(&mut self, mark: Mark) {
        self.position = mark.position;
        self.line = mark.line;
        self.column = mark.column;
    }

    fn error(&self, msg: &str) -> Error {
        self.error_at(self.mark(), msg)
    }

    fn error_at(&self, mark: Mark, msg: &str) -> Error {
        let start = self.input[..mark.position]
            .rfind('\n')
            .map_or(0, |i| i + 1);
        let end = self.input[mark.position..]
            .find('\n')
            .map_or(self.input.len(), |i| mark.position + i);
        let context = self.input[start..end].trim_end_matches('\r');
        Error::syntax(mark.line, mark.column, msg, context)
    }

    /// Skips whitespace, comments and backslash line continuations.
    fn skip_trivia(&mut self) {
        while let Some(ch) = self.peek_char() {
            match ch {
                ' ' | '\t' | '\n' | '\r' | '\x0c' => {
                    self.next_char();
                }
                '#' => {
                    while let Some(c) = self.peek_char() {
                        if c == '\n' {
                            break;
                        }
                        self.next_char();
                    }
                }
                '\\' if self.peek_second() == Some('\n') => {
                    self.next_char();
                    self.next_char();
                }
                _ => break,
            }
        }
    }

    fn parse_value(&mut self) -> Result<Value> {
        self.skip_trivia();

        match self.peek_char() {
            None => Err(self.error("Unexpected end of input")),
            Some('(') => self.nested(Self::parse_tuple),
            Some('[') => self.nested(Self::parse_list),
            Some('{') => self.nested(Self::parse_brace),
            Some('\'') | Some('"') => self.parse_strings(),
            Some('+') | Some('-') => self.parse_signed(),
            Some(ch) if ch.is_ascii_digit() => self.parse_number(),
            Some('.') if self.peek_second().is_some_and(|c| c.is_ascii_digit()) => {
                self.parse_number()
            }
            Some(ch) if is_identifier_start(ch) => self.parse_name(),
            Some(ch) => Err(self.error(&format!("Unexpected character '{}'", ch))),
        }
    }

    fn nested(&mut self, parse: fn(&mut Self) -> Result<Value>) -> Result<Value> {
        if self.depth >= self.max_depth {
            return Err(self.error(&format!(
                "Literal nesting exceeds the maximum depth of {}",
                self.max_depth
            )));
        }
        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    fn parse_name(&mut self) -> Result<Value> {
        if self.string_prefix_len().is_some() {
            return self.parse_strings();
        }

        let start = self.mark();
        while let Some(ch) = self.peek_char() {
            if is_identifier_continue(ch) {
                self.next_char();
            } else {
                break;
            }
        }
        let name = &self.input[start.position..self.position];

        match name {
            "True" => Ok(Value::Bool(true)),
            "False" => Ok(Value::Bool(false)),
            "None" => Ok(Value::None),
            "set" => {
                self.skip_trivia();
                if self.peek_char() == Some('(') {
                    self.next_char();
                    self.skip_trivia();
                    if self.peek_char() == Some(')') {
                        self.next_char();
                        return Ok(Value::Set(PySet::new()));
                    }
                }
                Err(self.error_at(start, "Only the empty call set() is allowed"))
            }
            _ if matches!(self.peek_char(), Some('\'') | Some('"'))
                && name.to_ascii_lowercase().contains('f') =>
            {
                Err(self.error_at(start, "f-strings are not literals"))
            }
            _ => Err(self.error_at(start, &format!("Name '{}' is not a literal", name))),
        }
    }

    /// Length of a valid string prefix (`r`, `u`, `b`, `br`, `rb`) directly
    /// followed by a quote, if the input is positioned at one.
    fn string_prefix_len(&self) -> Option<usize> {
        let bytes = self.rest().as_bytes();
        let mut len = 0;
        while len < 2
            && len < bytes.len()
            && matches!(bytes[len].to_ascii_lowercase(), b'r' | b'u' | b'b')
        {
            len += 1;
        }
        if !matches!(bytes.get(len), Some(b'\'') | Some(b'"')) {
            return None;
        }
        let prefix = self.rest()[..len].to_ascii_lowercase();
        match prefix.as_str() {
            "" | "r" | "u" | "b" | "br" | "rb" => Some(len),
            _ => None,
        }
    }

    /// Parses one or more adjacent string literals and concatenates them.
    fn parse_strings(&mut self) -> Result<Value> {
        let start = self.mark();
        let mut combined = self.parse_string_piece()?;

        loop {
            let before = self.mark();
            self.skip_trivia();
            if self.string_prefix_len().is_none() {
                self.reset(before);
                break;
            }
            let piece = self.parse_string_piece()?;
            match (&mut combined, piece) {
                (Sink::Text(acc), Sink::Text(s)) => acc.push_str(&s),
                (Sink::Bytes(acc), Sink::Bytes(b)) => acc.extend_from_slice(&b),
                _ => return Err(self.error_at(start, "Cannot mix bytes and nonbytes literals")),
            }
        }

        Ok(match combined {
            Sink::Text(s) => Value::Str(s),
            Sink::Bytes(b) => Value::Bytes(b),
        })
    }

    fn parse_string_piece(&mut self) -> Result<Sink> {
        let start = self.mark();
        let mut raw = false;
        let mut sink = Sink::Text(String::new());

        while let Some(ch) = self.peek_char() {
            match ch.to_ascii_lowercase() {
                'r' => raw = true,
                'b' => sink = Sink::Bytes(Vec::new()),
                'u' => {}
                _ => break,
            }
            self.next_char();
        }

        let quote = match self.next_char() {
            Some(q @ ('\'' | '"')) => q,
            _ => return Err(self.error_at(start, "Expected string literal")),
        };
        let closing: String = [quote, quote].iter().collect();
        let triple = self.rest().starts_with(&closing);
        if triple {
            self.next_char();
            self.next_char();
        }

        loop {
            let ch = match self.next_char() {
                Some(ch) => ch,
                None => return Err(self.error_at(start, "Unterminated string literal")),
            };

            if ch == quote {
                if !triple {
                    break;
                }
                if self.rest().starts_with(&closing) {
                    self.next_char();
                    self.next_char();
                    break;
                }
                sink.push_char(ch);
                continue;
            }

            if ch == '\n' && !triple {
                return Err(self.error_at(start, "Unterminated string literal"));
            }

            if ch == '\\' {
                let escaped = match self.next_char() {
                    Some(c) => c,
                    None => return Err(self.error_at(start, "Unterminated string literal")),
                };
                if raw {
                    sink.push_char('\\');
                    self.push_literal_char(&mut sink, escaped)?;
                } else {
                    self.unescape(&mut sink, escaped)?;
                }
                continue;
            }

            self.push_literal_char(&mut sink, ch)?;
        }

        Ok(sink)
    }

    fn push_literal_char(&self, sink: &mut Sink, ch: char) -> Result<()> {
        if matches!(sink, Sink::Bytes(_)) && !ch.is_ascii() {
            return Err(self.error("Bytes can only contain ASCII literal characters"));
        }
        sink.push_char(ch);
        Ok(())
    }

    fn unescape(&mut self, sink: &mut Sink, escaped: char) -> Result<()> {
        let is_bytes = matches!(sink, Sink::Bytes(_));
        match escaped {
            '\n' => {}
            '\\' | '\'' | '"' => sink.push_char(escaped),
            'a' => sink.push_char('\u{07}'),
            'b' => sink.push_char('\u{08}'),
            'f' => sink.push_char('\u{0C}'),
            'n' => sink.push_char('\n'),
            'r' => sink.push_char('\r'),
            't' => sink.push_char('\t'),
            'v' => sink.push_char('\u{0B}'),
            '0'..='7' => {
                let mut code = escaped.to_digit(8).unwrap_or(0);
                for _ in 0..2 {
                    match self.peek_char().and_then(|c| c.to_digit(8)) {
                        Some(d) => {
                            code = code * 8 + d;
                            self.next_char();
                        }
                        None => break,
                    }
                }
                self.push_code(sink, code)?;
            }
            'x' => {
                let code = self.read_hex(2, "Truncated \\xXX escape")?;
                self.push_code(sink, code)?;
            }
            'u' if !is_bytes => {
                let code = self.read_hex(4, "Truncated \\uXXXX escape")?;
                self.push_code(sink, code)?;
            }
            'U' if !is_bytes => {
                let code = self.read_hex(8, "Truncated \\UXXXXXXXX escape")?;
                self.push_code(sink, code)?;
            }
            'N' if !is_bytes => {
                return Err(self.error("Named Unicode escapes are not supported"));
            }
            other => {
                sink.push_char('\\');
                self.push_literal_char(sink, other)?;
            }
        }
        Ok(())
    }

    fn read_hex(&mut self, digits: usize, msg: &str) -> Result<u32> {
        let mut code = 0u32;
        for _ in 0..digits {
            match self.peek_char().and_then(|c| c.to_digit(16)) {
                Some(d) => {
                    code = code * 16 + d;
                    self.next_char();
                }
                None => return Err(self.error(msg)),
            }
        }
        Ok(code)
    }

    fn push_code(&self, sink: &mut Sink, code: u32) -> Result<()> {
        match sink {
            Sink::Bytes(b) => {
                let byte = u8::try_from(code)
                    .map_err(|_| self.error("Escape value out of range for bytes"))?;
                b.push(byte);
            }
            Sink::Text(s) => {
                let ch = char::from_u32(code)
                    .ok_or_else(|| self.error("Illegal Unicode character in escape"))?;
                s.push(ch);
            }
        }
        Ok(())
    }

    fn parse_signed(&mut self) -> Result<Value> {
        let start = self.mark();
        let negative = self.next_char() == Some('-');
        self.skip_trivia();

        // `-(1)` and `-((1))` are signed numbers; parentheses are transparent
        let mut parens = 0;
        while self.peek_char() == Some('(') {
            self.next_char();
            self.skip_trivia();
            parens += 1;
        }

        let numeric = match self.peek_char() {
            Some(ch) if ch.is_ascii_digit() => true,
            Some('.') => self.peek_second().is_some_and(|c| c.is_ascii_digit()),
            _ => false,
        };
        if !numeric {
            return Err(self.error_at(
                start,
                "Unary operators are only allowed on numeric literals",
            ));
        }

        let value = self.parse_number()?;
        for _ in 0..parens {
            self.skip_trivia();
            if self.peek_char() != Some(')') {
                return Err(self.error_at(
                    start,
                    "Unary operators are only allowed on numeric literals",
                ));
            }
            self.next_char();
        }
        Ok(if negative { negate(value) } else { value })
    }

    fn parse_number(&mut self) -> Result<Value> {
        let start = self.mark();
        let bytes = self.rest().as_bytes();

        if bytes.len() >= 2 && bytes[0] == b'0' {
            let radix = match bytes[1].to_ascii_lowercase() {
                b'x' => Some(16),
                b'o' => Some(8),
                b'b' => Some(2),
                _ => None,
            };
            if let Some(radix) = radix {
                self.next_char();
                self.next_char();
                let digits_start = self.position;
                while let Some(ch) = self.peek_char() {
                    if ch.is_ascii_alphanumeric() || ch == '_' {
                        self.next_char();
                    } else {
                        break;
                    }
                }
                let digits = &self.input[digits_start..self.position];
                let digits = digits.strip_prefix('_').unwrap_or(digits);
                let cleaned = self.strip_separators(start, digits, radix)?;
                return BigInt::parse_bytes(cleaned.as_bytes(), radix)
                    .map(Value::from)
                    .ok_or_else(|| self.error_at(start, "Invalid integer literal"));
            }
        }

        let mut is_float = false;
        self.skip_digits();
        if self.peek_char() == Some('.') {
            is_float = true;
            self.next_char();
            self.skip_digits();
        }
        if matches!(self.peek_char(), Some('e') | Some('E')) {
            let exponent_follows = match self.peek_second() {
                Some(c) if c.is_ascii_digit() => true,
                Some('+') | Some('-') => self.rest()[2..]
                    .chars()
                    .next()
                    .is_some_and(|c| c.is_ascii_digit()),
                _ => false,
            };
            if exponent_follows {
                is_float = true;
                self.next_char();
                if matches!(self.peek_char(), Some('+') | Some('-')) {
                    self.next_char();
                }
                self.skip_digits();
            }
        }

        match self.peek_char() {
            Some('j') | Some('J') => {
                return Err(self.error_at(start, "Complex literals are not supported"));
            }
            Some(ch) if is_identifier_continue(ch) => {
                return Err(self.error_at(start, "Invalid numeric literal"));
            }
            _ => {}
        }

        let text = &self.input[start.position..self.position];
        let cleaned = self.strip_separators(start, text, 10)?;

        if is_float {
            return cleaned
                .parse::<f64>()
                .map(Value::Float)
                .map_err(|_| self.error_at(start, "Invalid float literal"));
        }

        if cleaned.len() > 1 && cleaned.starts_with('0') && cleaned.bytes().any(|b| b != b'0') {
            return Err(self.error_at(
                start,
                "Leading zeros in decimal integer literals are not permitted",
            ));
        }

        match cleaned.parse::<i64>() {
            Ok(i) => Ok(Value::Int(i)),
            Err(_) => BigInt::parse_bytes(cleaned.as_bytes(), 10)
                .map(Value::from)
                .ok_or_else(|| self.error_at(start, "Invalid integer literal")),
        }
    }

    fn skip_digits(&mut self) {
        while let Some(ch) = self.peek_char() {
            if ch.is_ascii_digit() || ch == '_' {
                self.next_char();
            } else {
                break;
            }
        }
    }

    /// Removes `_` digit separators, which are only valid between two digits
    /// of the given radix.
    fn strip_separators(&self, start: Mark, text: &str, radix: u32) -> Result<String> {
        let is_digit = |b: &u8| char::from(*b).is_digit(radix);
        let bytes = text.as_bytes();
        for (i, &b) in bytes.iter().enumerate() {
            if b == b'_' {
                let before = i > 0 && is_digit(&bytes[i - 1]);
                let after = bytes.get(i + 1).is_some_and(is_digit);
                if !before || !after {
                    return Err(self.error_at(start, "Invalid digit separator in numeric literal"));
                }
            }
        }
        Ok(text.replace('_', ""))
    }

    fn parse_tuple(&mut self) -> Result<Value> {
        self.next_char(); // consume '('
        self.skip_trivia();
        if self.peek_char() == Some(')') {
            self.next_char();
            return Ok(Value::Tuple(Vec::new()));
        }

        let first = self.parse_value()?;
        self.skip_trivia();
        match self.peek_char() {
            // parenthesized expression, not a tuple
            Some(')') => {
                self.next_char();
                Ok(first)
            }
            Some(',') => {
                self.next_char();
                let mut items = vec![first];
                items.extend(self.parse_sequence(')')?);
                Ok(Value::Tuple(items))
            }
            Some(ch) => Err(self.error(&format!("Expected ',' or ')', found '{}'", ch))),
            None => Err(self.error("Expected ')', found end of input")),
        }
    }

    fn parse_list(&mut self) -> Result<Value> {
        self.next_char(); // consume '['
        Ok(Value::List(self.parse_sequence(']')?))
    }

    /// Parses comma-separated values up to and including `close`. A trailing
    /// comma is allowed.
    fn parse_sequence(&mut self, close: char) -> Result<Vec<Value>> {
        let mut items = Vec::new();
        loop {
            self.skip_trivia();
            if self.peek_char() == Some(close) {
                self.next_char();
                return Ok(items);
            }
            items.push(self.parse_value()?);
            if self.expect_separator(close)? {
                return Ok(items);
            }
        }
    }

    /// Consumes `,` (returns `false`) or `close` (returns `true`).
    fn expect_separator(&mut self, close: char) -> Result<bool> {
        self.skip_trivia();
        match self.peek_char() {
            Some(',') => {
                self.next_char();
                Ok(false)
            }
            Some(ch) if ch == close => {
                self.next_char();
                Ok(true)
            }
            Some(ch) => Err(self.error(&format!(
                "Expected ',' or '{}', found '{}'",
                close, ch
            ))),
            None => Err(self.error(&format!("Expected '{}', found end of input", close))),
        }
    }

    fn parse_brace(&mut self) -> Result<Value> {
        self.next_char(); // consume '{'
        self.skip_trivia();
        if self.peek_char() == Some('}') {
            self.next_char();
            return Ok(Value::Dict(PyDict::new()));
        }

        let first = self.parse_value()?;
        self.skip_trivia();

        if self.peek_char() != Some(':') {
            let mut set = PySet::new();
            set.insert(first);
            if !self.expect_separator('}')? {
                for item in self.parse_sequence('}')? {
                    set.insert(item);
                }
            }
            return Ok(Value::Set(set));
        }

        let mut dict = PyDict::new();
        let mut key = first;
        loop {
            self.next_char(); // consume ':'
            let value = self.parse_value()?;
            dict.insert(key, value);

            if self.expect_separator('}')? {
                return Ok(Value::Dict(dict));
            }
            self.skip_trivia();
            if self.peek_char() == Some('}') {
                self.next_char();
                return Ok(Value::Dict(dict));
            }
            key = self.parse_value()?;
            self.skip_trivia();
            if self.peek_char() != Some(':') {
                return Err(self.error("Expected ':' after dict key"));
            }
        }
    }
}

fn negate(value: Value) -> Value {
    match value {
        Value::Int(i) => match i.checked_neg() {
            Some(n) => Value::Int(n),
            None => Value::from(-BigInt::from(i)),
        },
        Value::BigInt(bi) => Value::from(-bi),
        Value::Float(f) => Value::Float(-f),
        other => other,
    }
}

fn is_identifier_start(ch: char) -> bool {
    ch == '_' || ch.is_alphabetic()
}

fn is_identifier_continue(ch: char) -> bool {
    ch == '_' || ch.is_alphanumeric()
}

fn newline(ch: char) -> char {
    if ch == '\r' {
        '\n'
    } else {
        ch
    }
}

/// Bytes taken by `ch` at the start of `rest`, counting `\r\n` as one.
fn char_width(rest: &str, ch: char) -> usize {
    if rest.starts_with("\r\n") {
        2
    } else {
        ch.len_utf8()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> Value {
        parse_literal(s).unwrap()
    }

    fn fails(s: &str) -> String {
        match parse_literal(s) {
            Ok(v) => panic!("expected {:?} to fail, got {:?}", s, v),
            Err(e) => e.to_string(),
        }
    }

    #[test]
    fn test_constants() {
        assert_eq!(parse("True"), Value::Bool(true));
        assert_eq!(parse("False"), Value::Bool(false));
        assert_eq!(parse("None"), Value::None);
        assert_eq!(parse("  None  "), Value::None);
    }

    #[test]
    fn test_integers() {
        assert_eq!(parse("123"), Value::Int(123));
        assert_eq!(parse("-7"), Value::Int(-7));
        assert_eq!(parse("+7"), Value::Int(7));
        assert_eq!(parse("- 7"), Value::Int(-7));
        assert_eq!(parse("1_000_000"), Value::Int(1_000_000));
        assert_eq!(parse("0xff"), Value::Int(255));
        assert_eq!(parse("0o17"), Value::Int(15));
        assert_eq!(parse("0B101"), Value::Int(5));
        assert_eq!(parse("000"), Value::Int(0));
    }

    #[test]
    fn test_big_integers() {
        let v = parse("123456789012345678901234567890");
        assert!(matches!(v, Value::BigInt(_)));
        assert_eq!(v.to_string(), "123456789012345678901234567890");
        assert_eq!(parse("-9223372036854775808"), Value::Int(i64::MIN));
    }

    #[test]
    fn test_floats() {
        assert_eq!(parse("1.23"), Value::Float(1.23));
        assert_eq!(parse(".5"), Value::Float(0.5));
        assert_eq!(parse("1."), Value::Float(1.0));
        assert_eq!(parse("2e3"), Value::Float(2000.0));
        assert_eq!(parse("-1.5E-1"), Value::Float(-0.15));
        assert_eq!(parse("1e999"), Value::Float(f64::INFINITY));
    }

    #[test]
    fn test_invalid_numbers() {
        assert!(fails("0123").contains("Leading zeros"));
        assert!(fails("1j").contains("Complex"));
        assert!(fails("1__0").contains("separator"));
        assert!(fails("1_").contains("separator"));
        assert!(fails("12abc").contains("Invalid numeric literal"));
        assert!(fails("0xfg").contains("Invalid integer literal"));
        fails("--1");
    }

    #[test]
    fn test_separators_need_digits_on_both_sides() {
        assert!(fails("1_e5").contains("separator"));
        assert!(fails("1.5_e3").contains("separator"));
        assert!(fails("1_.5").contains("separator"));
        assert!(fails("1._5").contains("separator"));
        assert!(fails("0b1_2").contains("separator"));
        assert_eq!(parse("1_0.2_5e1_0"), Value::Float(10.25e10));
        assert_eq!(parse("0x_ff_ff"), Value::Int(0xffff));
        assert_eq!(parse("0o1_7"), Value::Int(15));
    }

    #[test]
    fn test_sign_on_parenthesized_number() {
        assert_eq!(parse("-(1)"), Value::Int(-1));
        assert_eq!(parse("+( 2.5 )"), Value::Float(2.5));
        assert_eq!(parse("-((0x10))"), Value::Int(-16));
        assert_eq!(parse("[-(1), (-2)]").to_string(), "[-1, -2]");
        assert!(fails("-(1,)").contains("Unary"));
        assert!(fails("-(-1)").contains("Unary"));
        assert!(fails("-('a')").contains("Unary"));
        assert!(fails("-(1").contains("Unary"));
    }

    #[test]
    fn test_carriage_returns_read_as_newlines() {
        assert_eq!(parse("'''a\r\nb'''"), Value::from("a\nb"));
        assert_eq!(parse("'''a\rb'''"), Value::from("a\nb"));
        assert_eq!(parse("r'''a\r\nb'''"), Value::from("a\nb"));
        assert_eq!(parse("'a\\\r\nb'"), Value::from("ab"));
        assert_eq!(parse("[1, \\\r\n 2]").to_string(), "[1, 2]");
        assert_eq!(parse("{\r'a': 1,\r\n}").to_string(), "{'a': 1}");
        assert!(fails("'a\r\nb'").contains("Unterminated"));
    }

    #[test]
    fn test_error_position_with_crlf() {
        match parse_literal("[1,\r\n 2 3]").unwrap_err() {
            Error::Syntax {
                line, col, context, ..
            } => {
                assert_eq!(line, 2);
                assert_eq!(col, 4);
                assert_eq!(context, " 2 3]");
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_strings() {
        assert_eq!(parse("'abc'"), Value::from("abc"));
        assert_eq!(parse("\"abc\""), Value::from("abc"));
        assert_eq!(parse(r"'a\nb\t\'c\''"), Value::from("a\nb\t'c'"));
        assert_eq!(parse(r"'\x41\101é\U0001F600'"), Value::from("AAé😀"));
        assert_eq!(parse(r"'\d'"), Value::from("\\d"));
        assert_eq!(parse(r"r'\d\n'"), Value::from("\\d\\n"));
        assert_eq!(parse("'''a\n'b'\n'''"), Value::from("a\n'b'\n"));
        assert_eq!(parse("u'x' \"y\"  'z'"), Value::from("xyz"));
        assert_eq!(parse("''"), Value::from(""));
    }

    #[test]
    fn test_bytes() {
        assert_eq!(parse(r"b'\x00a'"), Value::Bytes(vec![0, b'a']));
        assert_eq!(parse(r"Rb'\x00'"), Value::Bytes(b"\\x00".to_vec()));
        assert_eq!(parse(r"b'\u1234'"), Value::Bytes(b"\\u1234".to_vec()));
        assert!(fails("b'é'").contains("ASCII"));
        assert!(fails("b'a' 'b'").contains("mix"));
    }

    #[test]
    fn test_invalid_strings() {
        assert!(fails("'abc").contains("Unterminated"));
        assert!(fails("'a\nb'").contains("Unterminated"));
        assert!(fails("f'{x}'").contains("f-strings"));
        assert!(fails(r"'\x4'").contains("Truncated"));
        assert!(fails(r"'\N{DASH}'").contains("Named"));
    }

    #[test]
    fn test_tuples() {
        assert_eq!(parse("()"), Value::Tuple(vec![]));
        assert_eq!(parse("(1)"), Value::Int(1));
        assert_eq!(parse("(1,)"), Value::Tuple(vec![Value::Int(1)]));
        assert_eq!(
            parse("(1, 'a', )"),
            Value::Tuple(vec![Value::Int(1), Value::from("a")])
        );
        assert_eq!(parse("1, 2"), Value::Tuple(vec![Value::Int(1), Value::Int(2)]));
    }

    #[test]
    fn test_lists_sets_dicts() {
        assert_eq!(parse("[]"), Value::List(vec![]));
        assert_eq!(parse("[1, [2]]").to_string(), "[1, [2]]");
        assert_eq!(parse("set()"), Value::Set(PySet::new()));
        assert_eq!(parse("set ( )"), Value::Set(PySet::new()));
        assert_eq!(parse("{1, 2, 1}").to_string(), "{1, 2}");
        assert_eq!(parse("{}"), Value::Dict(PyDict::new()));
        assert_eq!(parse("{'a': 1, 'b': 2, 'a': 3,}").to_string(), "{'a': 3, 'b': 2}");
        assert_eq!(parse("{(1, 2): {3}}").to_string(), "{(1, 2): {3}}");
    }

    #[test]
    fn test_comments_and_newlines() {
        let v = parse("# leading comment\n{\n  'a': '1',  # trailing\n  'b': '2'\n}\n");
        assert_eq!(v.to_string(), "{'a': '1', 'b': '2'}");
    }

    #[test]
    fn test_rejects_code() {
        assert!(fails("x").contains("Name 'x'"));
        assert!(fails("__import__('os')").contains("Name '__import__'"));
        assert!(fails("set([1])").contains("set()"));
        fails("1 + 2");
        fails("[1, 2][0]");
        fails("-'a'");
        fails("lambda: 1");
    }

    #[test]
    fn test_structural_errors() {
        fails("");
        fails("[1, 2");
        fails("[1 2]");
        fails("{'a' 1}");
        fails("{'a': 1, 'b'}");
        fails("(1 2)");
        fails("[,]");
        fails("1 2");
    }

    #[test]
    fn test_error_position() {
        let err = parse_literal("{\n  'a': ?\n}").unwrap_err();
        match err {
            Error::Syntax {
                line, col, context, ..
            } => {
                assert_eq!(line, 2);
                assert_eq!(col, 8);
                assert_eq!(context, "  'a': ?");
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_depth_limit() {
        let deep = format!("{}{}", "[".repeat(20), "]".repeat(20));
        assert!(LiteralParser::new(&deep).with_max_depth(20).parse().is_ok());
        let err = LiteralParser::new(&deep)
            .with_max_depth(19)
            .parse()
            .unwrap_err();
        assert!(err.to_string().contains("maximum depth"));
    }
}
