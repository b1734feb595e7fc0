//! Typed argument tokenizer.
//!
//! Command bodies are scanned in a single forward pass, one token at a time,
//! with space/tab skipped between tokens. Consumers never see the raw token
//! stream: they request an expected kind (`scan_word`, `scan_int`,
//! `scan_bool`) or walk mixed key/value arguments with [`ArgParser::next`],
//! and get an error on mismatch. Word and key tokens borrow directly from
//! the frame body.
//!
//! Grammar, checked in order:
//!
//! 1. A word-start run (`a-z A-Z _ !`, continuing over `a-z A-Z 0-9 _ . / ? !`).
//!    `on`/`yes`/`true` and `off`/`no`/`false` lex as booleans; a run
//!    immediately followed by `:` is a key and must be followed by a value
//!    token; anything else is a word.
//! 2. A digit run, optionally preceded by `-`. A `0x` prefix selects hex;
//!    a `.` plus a further digit run makes the token a float.
//! 3. Anything else is a syntax error; the caller must stop consuming.

use thiserror::Error;

/// Errors produced by the argument tokenizer.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ArgError {
    /// No input remains.
    #[error("unexpected end of arguments")]
    Eof,
    /// The input does not lex as any token.
    #[error("malformed argument")]
    Syntax,
    /// The next token is not of the requested kind.
    #[error("unexpected argument type")]
    Mismatch,
    /// A key was not followed by a value token.
    #[error("missing value after key")]
    MissingValue,
}

/// A typed argument value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value<'a> {
    /// A bare word.
    Str(&'a str),
    /// A decimal or `0x`-prefixed hex integer.
    Int(i32),
    /// A decimal number with a fractional part.
    Float(f32),
    /// One of the boolean words (`on`/`yes`/`true`, `off`/`no`/`false`).
    Bool(bool),
}

/// One argument: a value, optionally preceded by a `key:` prefix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arg<'a> {
    /// The key, for `key:value` arguments.
    pub key: Option<&'a str>,
    /// The argument value.
    pub value: Value<'a>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token<'a> {
    Word(&'a str),
    Key(&'a str),
    Int(i32),
    Float(f32),
    Bool(bool),
}

fn is_word_start(ch: u8) -> bool {
    ch.is_ascii_alphabetic() || ch == b'_' || ch == b'!'
}

fn is_word_tail(ch: u8) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, b'_' | b'.' | b'/' | b'?' | b'!')
}

/// Single-pass, non-backtracking scanner over one frame body.
#[derive(Debug)]
pub struct ArgParser<'a> {
    buf: &'a [u8],
    rp: usize,
}

impl<'a> ArgParser<'a> {
    /// Create a parser over a frame body.
    pub fn new(body: &'a [u8]) -> Self {
        let mut p = ArgParser { buf: body, rp: 0 };
        p.skip_space();
        p
    }

    /// Whether any input remains.
    pub fn remain(&self) -> bool {
        self.rp < self.buf.len()
    }

    /// Whether the input is exhausted. Handlers should treat leftover
    /// tokens after their last expected argument as a malformed command.
    pub fn end(&self) -> bool {
        !self.remain()
    }

    /// Scan a word token.
    pub fn scan_word(&mut self) -> Result<&'a str, ArgError> {
        match self.lex()? {
            Token::Word(w) => Ok(w),
            _ => Err(ArgError::Mismatch),
        }
    }

    /// Scan an integer token (decimal or hex).
    pub fn scan_int(&mut self) -> Result<i32, ArgError> {
        match self.lex()? {
            Token::Int(v) => Ok(v),
            _ => Err(ArgError::Mismatch),
        }
    }

    /// Scan a boolean token.
    pub fn scan_bool(&mut self) -> Result<bool, ArgError> {
        match self.lex()? {
            Token::Bool(b) => Ok(b),
            _ => Err(ArgError::Mismatch),
        }
    }

    /// Scan the next argument of any kind, pairing `key:` prefixes with the
    /// value token that follows them.
    pub fn next(&mut self) -> Result<Arg<'a>, ArgError> {
        match self.lex()? {
            Token::Key(key) => {
                let value = match self.lex() {
                    Ok(Token::Word(w)) => Value::Str(w),
                    Ok(Token::Int(v)) => Value::Int(v),
                    Ok(Token::Float(v)) => Value::Float(v),
                    Ok(Token::Bool(b)) => Value::Bool(b),
                    Ok(Token::Key(_)) | Err(ArgError::Eof) => {
                        return Err(ArgError::MissingValue)
                    }
                    Err(e) => return Err(e),
                };
                Ok(Arg {
                    key: Some(key),
                    value,
                })
            }
            Token::Word(w) => Ok(Arg {
                key: None,
                value: Value::Str(w),
            }),
            Token::Int(v) => Ok(Arg {
                key: None,
                value: Value::Int(v),
            }),
            Token::Float(v) => Ok(Arg {
                key: None,
                value: Value::Float(v),
            }),
            Token::Bool(b) => Ok(Arg {
                key: None,
                value: Value::Bool(b),
            }),
        }
    }

    fn lex(&mut self) -> Result<Token<'a>, ArgError> {
        let ch = self.curr().ok_or(ArgError::Eof)?;
        if is_word_start(ch) {
            self.lex_word()
        } else if ch.is_ascii_digit() {
            self.lex_number(false)
        } else if ch == b'-' {
            self.adv();
            self.lex_number(true)
        } else {
            Err(ArgError::Syntax)
        }
    }

    fn lex_word(&mut self) -> Result<Token<'a>, ArgError> {
        let start = self.rp;
        self.adv();
        while self.curr().is_some_and(is_word_tail) {
            self.adv();
        }
        // The run is all ASCII, so this cannot fail.
        let word =
            std::str::from_utf8(&self.buf[start..self.rp]).map_err(|_| ArgError::Syntax)?;

        let tok = match word {
            "on" | "yes" | "true" => Token::Bool(true),
            "off" | "no" | "false" => Token::Bool(false),
            _ => {
                if self.curr() == Some(b':') {
                    self.adv();
                    Token::Key(word)
                } else {
                    Token::Word(word)
                }
            }
        };
        self.skip_space();
        Ok(tok)
    }

    fn lex_number(&mut self, negate: bool) -> Result<Token<'a>, ArgError> {
        if self.curr() == Some(b'0') && self.peek() == Some(b'x') {
            self.adv();
            self.adv();
            let v = self.lex_hex_int()? as i32;
            self.skip_space();
            return Ok(Token::Int(if negate { v.wrapping_neg() } else { v }));
        }

        let (ipart, _) = self.lex_dec_int()?;

        if self.curr() == Some(b'.') {
            self.adv();
            let (fpart, digits) = self.lex_dec_int()?;
            let mut v = ipart as f32 + fpart as f32 / 10f32.powi(digits as i32);
            if negate {
                v = -v;
            }
            self.skip_space();
            Ok(Token::Float(v))
        } else {
            let v = ipart.min(i32::MAX as i64) as i32;
            self.skip_space();
            Ok(Token::Int(if negate { v.wrapping_neg() } else { v }))
        }
    }

    /// Lex a decimal digit run. Returns the value and the number of digits.
    fn lex_dec_int(&mut self) -> Result<(i64, u32), ArgError> {
        if !self.curr().is_some_and(|ch| ch.is_ascii_digit()) {
            return Err(ArgError::Syntax);
        }
        let mut v: i64 = 0;
        let mut digits = 0;
        while let Some(ch) = self.curr() {
            if !ch.is_ascii_digit() {
                break;
            }
            v = v.saturating_mul(10).saturating_add((ch - b'0') as i64);
            digits += 1;
            self.adv();
        }
        Ok((v, digits))
    }

    fn lex_hex_int(&mut self) -> Result<u32, ArgError> {
        if !self.curr().is_some_and(|ch| ch.is_ascii_hexdigit()) {
            return Err(ArgError::Syntax);
        }
        let mut v: u32 = 0;
        while let Some(d) = self.curr().and_then(crate::hex::from_hexit) {
            v = (v << 4) | d as u32;
            self.adv();
        }
        Ok(v)
    }

    fn skip_space(&mut self) {
        while matches!(self.curr(), Some(b' ') | Some(b'\t')) {
            self.adv();
        }
    }

    fn curr(&self) -> Option<u8> {
        self.buf.get(self.rp).copied()
    }

    fn peek(&self) -> Option<u8> {
        self.buf.get(self.rp + 1).copied()
    }

    fn adv(&mut self) {
        self.rp += 1;
    }
}
