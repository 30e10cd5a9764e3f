use log::debug;
use serde::Serialize;
use std::fmt;

/// The different kinds of tokens recognized by the Monkey lexer.
///
/// Literal payloads are not stored in the kind; the [`Token`] carries the
/// literal text (already unescaped for `STRING`).
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenKind {
    /// A character the lexer has no rule for
    ILLEGAL,

    /// End‑of‑file marker
    EOF,

    /// A user‑defined identifier
    IDENT,

    /// An integer literal
    INT,

    /// A string literal (contents without quotes)
    STRING,

    /// '='
    ASSIGN,

    /// '+'
    PLUS,

    /// '-'
    MINUS,

    /// '!'
    BANG,

    /// '*'
    ASTERISK,

    /// '/'
    SLASH,

    /// '<'
    LT,

    /// '>'
    GT,

    /// '=='
    EQ,

    /// '!='
    NOT_EQ,

    /// ','
    COMMA,

    /// ';'
    SEMICOLON,

    /// ':'
    COLON,

    /// '('
    LPAREN,

    /// ')'
    RPAREN,

    /// '{'
    LBRACE,

    /// '}'
    RBRACE,

    /// '['
    LBRACKET,

    /// ']'
    RBRACKET,

    /// 'fn'
    FUNCTION,

    /// 'let'
    LET,

    /// 'true'
    TRUE,

    /// 'false'
    FALSE,

    /// 'if'
    IF,

    /// 'else'
    ELSE,

    /// 'return'
    RETURN,
}

impl TokenKind {
    /// Name used in parser diagnostics: punctuation renders as itself,
    /// everything else as its upper‑case tag.
    pub const fn name(self) -> &'static str {
        match self {
            TokenKind::ILLEGAL => "ILLEGAL",
            TokenKind::EOF => "EOF",
            TokenKind::IDENT => "IDENT",
            TokenKind::INT => "INT",
            TokenKind::STRING => "STRING",
            TokenKind::ASSIGN => "=",
            TokenKind::PLUS => "+",
            TokenKind::MINUS => "-",
            TokenKind::BANG => "!",
            TokenKind::ASTERISK => "*",
            TokenKind::SLASH => "/",
            TokenKind::LT => "<",
            TokenKind::GT => ">",
            TokenKind::EQ => "==",
            TokenKind::NOT_EQ => "!=",
            TokenKind::COMMA => ",",
            TokenKind::SEMICOLON => ";",
            TokenKind::COLON => ":",
            TokenKind::LPAREN => "(",
            TokenKind::RPAREN => ")",
            TokenKind::LBRACE => "{",
            TokenKind::RBRACE => "}",
            TokenKind::LBRACKET => "[",
            TokenKind::RBRACKET => "]",
            TokenKind::FUNCTION => "FUNCTION",
            TokenKind::LET => "LET",
            TokenKind::TRUE => "TRUE",
            TokenKind::FALSE => "FALSE",
            TokenKind::IF => "IF",
            TokenKind::ELSE => "ELSE",
            TokenKind::RETURN => "RETURN",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A scanned token: its kind, the literal text that produced it, and the
/// line number where it was found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    /// The category of this token.
    pub kind: TokenKind,

    /// Source text of the token; for strings the unescaped contents.
    pub literal: String,

    /// 1‑based line number in the source.
    pub line: usize,
}

impl Token {
    /// Create a new Token with the given kind, literal, and line.
    pub fn new<S: Into<String>>(kind: TokenKind, literal: S, line: usize) -> Self {
        let literal: String = literal.into();

        debug!(
            "Creating new token: kind={:?}, literal={}, line={}",
            kind, literal, line
        );

        Self {
            kind,
            literal,
            line,
        }
    }

    /// The end‑of‑input token for `line`.
    pub fn eof(line: usize) -> Self {
        Self::new(TokenKind::EOF, "", line)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} {}", self.kind, self.literal)
    }
}
