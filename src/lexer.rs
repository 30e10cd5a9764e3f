//! Module `lexer` implements a one‑pass, streaming lexer for the Monkey language.
//!
//! It turns a `&str` into a sequence of [`Token`]s, skipping whitespace and
//! `//` comments. After the input is exhausted [`Lexer::next_token`] returns an
//! `EOF` token on every call; the [`Iterator`] view yields that `EOF` exactly
//! once and then stops, so it is safe to chain with other adapters.
//!
//! # Core Phases
//!
//! 1. **Trivia** (`skip_trivia`)
//!    - Spaces, tabs, `\r` and `\n` are skipped, with `\n` bumping the line.
//!    - `// …` runs to the end of the line; bulk‑skipped with `memchr`.
//!    - Repeats until a significant byte, so comments may follow comments.
//!
//! 2. **Token Recognition** (`next_token`)
//!    - Single‑character tokens: `+ - * / < > , ; : ( ) { } [ ]`.
//!    - Two‑character operators `==` and `!=` via one byte of lookahead.
//!    - String literals `"…"` with `\\`, `\"`, `\n`, `\t` escapes.
//!    - Integers: maximal `[0-9]` runs.
//!    - Identifiers/keywords: maximal `[A-Za-z_]` runs, resolved through the
//!      perfect‑hash `KEYWORDS` map.
//!    - Anything else becomes an `ILLEGAL` token holding that one character.
//!
//! The only lexer *failure* is an unterminated string, reported as
//! [`MonkeyError::Lex`].

use crate::error::{MonkeyError, Result};
use crate::token::{Token, TokenKind};
use log::{debug, info};
use memchr::{memchr, memchr2};
use phf::phf_map;
use std::iter::FusedIterator;

// ─────────────────────────────────────────────────────────────────────────────
// Static keyword map (compile‑time perfect hash)
// ─────────────────────────────────────────────────────────────────────────────

static KEYWORDS: phf::Map<&'static str, TokenKind> = phf_map! {
    "fn"     => TokenKind::FUNCTION,
    "let"    => TokenKind::LET,
    "true"   => TokenKind::TRUE,
    "false"  => TokenKind::FALSE,
    "if"     => TokenKind::IF,
    "else"   => TokenKind::ELSE,
    "return" => TokenKind::RETURN,
};

/// Resolve an identifier‑shaped word to its keyword kind, or `IDENT`.
pub fn lookup_ident(ident: &str) -> TokenKind {
    KEYWORDS.get(ident).copied().unwrap_or(TokenKind::IDENT)
}

/// A single pass **lexer** over Monkey source text.
pub struct Lexer<'a> {
    src: &'a str,       // entire source text
    start: usize,       // byte index of the first byte of the current token
    curr: usize,        // byte index one past the last byte examined
    line: usize,        // 1‑based line counter (\n increments)
    eof_emitted: bool,  // iterator view has already handed out EOF
}

impl<'a> Lexer<'a> {
    /// Create a new lexer over `src`.
    #[inline]
    pub fn new(src: &'a str) -> Self {
        info!("Lexer created over {} bytes", src.len());

        Self {
            src,
            start: 0,
            curr: 0,
            line: 1,
            eof_emitted: false,
        }
    }

    // ───────────────────────────── primitive helpers ────────────────────────

    #[inline(always)]
    fn bytes(&self) -> &'a [u8] {
        self.src.as_bytes()
    }

    /// Are we at (or past) the end of input?
    #[inline(always)]
    fn is_at_end(&self) -> bool {
        self.curr >= self.src.len()
    }

    /// Peek at the current byte without consuming it.  Returns `0` at EOF.
    #[inline(always)]
    fn peek(&self) -> u8 {
        self.bytes().get(self.curr).copied().unwrap_or(0)
    }

    /// Peek one byte beyond [`peek`].  Safe at EOF.
    #[inline(always)]
    fn peek_next(&self) -> u8 {
        self.bytes().get(self.curr + 1).copied().unwrap_or(0)
    }

    /// Conditionally consume a byte **iff** it matches `expected`.
    #[inline(always)]
    fn match_byte(&mut self, expected: u8) -> bool {
        if !self.is_at_end() && self.peek() == expected {
            self.curr += 1;
            true
        } else {
            false
        }
    }

    /// Source text of the token scanned so far.
    #[inline(always)]
    fn lexeme(&self) -> &'a str {
        &self.src[self.start..self.curr]
    }

    #[inline(always)]
    fn token(&self, kind: TokenKind) -> Token {
        Token::new(kind, self.lexeme(), self.line)
    }

    // ───────────────────────────── core lexing ─────────────────────────────

    /// Skip whitespace and `//` comments, in a loop.
    fn skip_trivia(&mut self) {
        loop {
            match self.peek() {
                b' ' | b'\t' | b'\r' => self.curr += 1,

                b'\n' => {
                    self.line += 1;
                    self.curr += 1;
                }

                b'/' if self.peek_next() == b'/' => {
                    // Leave the newline in place so the arm above counts it.
                    match memchr(b'\n', &self.bytes()[self.curr..]) {
                        Some(pos) => self.curr += pos,
                        None => self.curr = self.src.len(),
                    }
                }

                _ => return,
            }
        }
    }

    /// Produce the next token.  Once the input is exhausted every call
    /// returns `EOF`.
    pub fn next_token(&mut self) -> Result<Token> {
        self.skip_trivia();

        self.start = self.curr;

        if self.is_at_end() {
            return Ok(Token::eof(self.line));
        }

        let b = self.peek();
        self.curr += 1;

        let kind = match b {
            b'+' => TokenKind::PLUS,
            b'-' => TokenKind::MINUS,
            b'*' => TokenKind::ASTERISK,
            b'/' => TokenKind::SLASH,
            b'<' => TokenKind::LT,
            b'>' => TokenKind::GT,
            b',' => TokenKind::COMMA,
            b';' => TokenKind::SEMICOLON,
            b':' => TokenKind::COLON,
            b'(' => TokenKind::LPAREN,
            b')' => TokenKind::RPAREN,
            b'{' => TokenKind::LBRACE,
            b'}' => TokenKind::RBRACE,
            b'[' => TokenKind::LBRACKET,
            b']' => TokenKind::RBRACKET,

            // ── two‑character operators (==, !=) ─────────────────────────
            b'=' => {
                if self.match_byte(b'=') {
                    TokenKind::EQ
                } else {
                    TokenKind::ASSIGN
                }
            }

            b'!' => {
                if self.match_byte(b'=') {
                    TokenKind::NOT_EQ
                } else {
                    TokenKind::BANG
                }
            }

            b'"' => return self.read_string(),

            b'0'..=b'9' => {
                while self.peek().is_ascii_digit() {
                    self.curr += 1;
                }

                TokenKind::INT
            }

            b'a'..=b'z' | b'A'..=b'Z' | b'_' => {
                while matches!(self.peek(), b'a'..=b'z' | b'A'..=b'Z' | b'_') {
                    self.curr += 1;
                }

                lookup_ident(self.lexeme())
            }

            _ => {
                // Widen to the full code point so the literal stays valid UTF‑8.
                let width = self.src[self.start..]
                    .chars()
                    .next()
                    .map_or(1, char::len_utf8);
                self.curr = self.start + width;

                debug!("Illegal character {:?} on line {}", self.lexeme(), self.line);

                TokenKind::ILLEGAL
            }
        };

        Ok(self.token(kind))
    }

    /// Read a double‑quoted string literal; the opening `"` is consumed.
    fn read_string(&mut self) -> Result<Token> {
        let start_line = self.line;
        let mut value = String::new();

        loop {
            let rest = &self.bytes()[self.curr..];

            let Some(pos) = memchr2(b'"', b'\\', rest) else {
                self.curr = self.src.len();
                return Err(MonkeyError::lex(start_line, "unterminated string"));
            };

            let chunk = &self.src[self.curr..self.curr + pos];
            self.line += memchr::memchr_iter(b'\n', chunk.as_bytes()).count();
            value.push_str(chunk);
            self.curr += pos;

            if self.peek() == b'"' {
                self.curr += 1;
                break;
            }

            // Backslash: look at the escaped character.
            self.curr += 1;
            let Some(escaped) = self.src[self.curr..].chars().next() else {
                return Err(MonkeyError::lex(start_line, "unterminated string"));
            };
            self.curr += escaped.len_utf8();

            match escaped {
                '\\' => value.push('\\'),
                '"' => value.push('"'),
                'n' => value.push('\n'),
                't' => value.push('\t'),
                other => {
                    if other == '\n' {
                        self.line += 1;
                    }
                    value.push('\\');
                    value.push(other);
                }
            }
        }

        Ok(Token::new(TokenKind::STRING, value, start_line))
    }
}

// ───────────────────────── Iterator implementation ─────────────────────────

impl<'a> Iterator for Lexer<'a> {
    type Item = Result<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.eof_emitted {
            return None;
        }

        let result = self.next_token();

        if matches!(&result, Ok(token) if token.kind == TokenKind::EOF) {
            self.eof_emitted = true;
        }

        Some(result)
    }
}

impl<'a> FusedIterator for Lexer<'a> {}
