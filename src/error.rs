//! Centralised error hierarchy for the **Monkey interpreter**.
//!
//! Only *structural* failures live here: input the lexer cannot tokenize, input
//! the parser gives up on, and I/O around the CLI. Failures of a running Monkey
//! program are ordinary values (`Object::Error`) and never become a
//! [`MonkeyError`].
//!
//! The module **does not** print diagnostics itself

use std::io;
use thiserror::Error;

use log::info;

/// Canonical error type used throughout the interpreter.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum MonkeyError {
    /// Lexical error with source line information.
    #[error("{message}")]
    Lex {
        /// Human‑readable description.
        message: String,

        /// 1‑based line where the error occurred.
        line: usize,
    },

    /// Fatal syntactic error; aborts the current parse.
    #[error("{message}")]
    Parse { message: String },

    /// Wrapper around `std::io::Error` (transparent).  Enables `?` on I/O ops.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// UTF‑8 decoding failure when ingesting external text.
    #[error(transparent)]
    Utf8(#[from] std::string::FromUtf8Error),
}

impl MonkeyError {
    /// Helper constructor for the **lexer**.
    pub fn lex<S: Into<String>>(line: usize, msg: S) -> Self {
        let message: String = msg.into();

        info!("Creating Lex error: line={}, msg={}", line, message);

        MonkeyError::Lex { message, line }
    }

    /// Helper constructor for the **parser**.
    pub fn parse<S: Into<String>>(msg: S) -> Self {
        let message: String = msg.into();

        info!("Creating Parse error: msg={}", message);

        MonkeyError::Parse { message }
    }
}

/// Crate‑wide `Result` alias.
pub type Result<T> = std::result::Result<T, MonkeyError>;
