//! Error types for item key parsing
//!
//! Every failure of the parser is a local validation failure. The variants of
//! [`KeyError`] carry the byte offset they point at, so callers can render a
//! snippet with a caret under the offending character.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Message used for every key that does not follow the `id[params]` layout.
pub const INVALID_FORMAT_MESSAGE: &str = "Invalid item key format.";

/// Classification of a key validation failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Zero-length input
    EmptyKey,
    /// Key-id segment is empty, or the parameter list is left unterminated
    InvalidFormat,
    /// Characters follow the key-id but the first one is not `[`
    MissingOpeningBracket,
    /// A closing bracket or quote is not followed by a valid continuation
    UnexpectedCharacter,
    /// Content follows the closing `]` of the parameter list
    TrailingCharactersAfterClose,
    /// Input is longer than the configured maximum
    KeyTooLong,
    /// A parameter value cannot be represented in quoted form
    UnquotableParameter,
}

impl ErrorKind {
    /// Stable machine-readable name of the kind
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::EmptyKey => "empty_key",
            ErrorKind::InvalidFormat => "invalid_format",
            ErrorKind::MissingOpeningBracket => "missing_opening_bracket",
            ErrorKind::UnexpectedCharacter => "unexpected_character",
            ErrorKind::TrailingCharactersAfterClose => "trailing_characters_after_close",
            ErrorKind::KeyTooLong => "key_too_long",
            ErrorKind::UnquotableParameter => "unquotable_parameter",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Item key validation error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyError {
    /// The key has no characters at all
    #[error("Invalid item key: key is empty.")]
    EmptyKey,

    /// The key does not follow the `id[params]` layout
    #[error("Invalid item key format.")]
    InvalidFormat { position: usize },

    /// The key-id is followed by something other than `[`
    #[error("Invalid item key format. Expected '[' but found '{character}' at position {position}.")]
    MissingOpeningBracket { character: char, position: usize },

    /// A closed nested list or quoted parameter is followed by garbage
    #[error("Incorrect syntax near '{character}' at position {position}.")]
    UnexpectedCharacter { character: char, position: usize },

    /// Something follows the closing bracket of the parameter list
    #[error("Incorrect symbol '{character}' follows after closing bracket at position {position}.")]
    TrailingCharactersAfterClose { character: char, position: usize },

    /// The key is longer than allowed
    #[error("Invalid item key: key is {length} bytes long, maximum is {max}.")]
    KeyTooLong { length: usize, max: usize },

    /// `\` at the end of a value would escape the closing quote
    #[error("Cannot quote parameter '{param}': it ends with a backslash.")]
    UnquotableParameter { param: String },
}

impl KeyError {
    /// Returns the classification of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            KeyError::EmptyKey => ErrorKind::EmptyKey,
            KeyError::InvalidFormat { .. } => ErrorKind::InvalidFormat,
            KeyError::MissingOpeningBracket { .. } => ErrorKind::MissingOpeningBracket,
            KeyError::UnexpectedCharacter { .. } => ErrorKind::UnexpectedCharacter,
            KeyError::TrailingCharactersAfterClose { .. } => {
                ErrorKind::TrailingCharactersAfterClose
            }
            KeyError::KeyTooLong { .. } => ErrorKind::KeyTooLong,
            KeyError::UnquotableParameter { .. } => ErrorKind::UnquotableParameter,
        }
    }

    /// Byte offset in the key the error points at, if any
    pub fn position(&self) -> Option<usize> {
        match self {
            KeyError::InvalidFormat { position }
            | KeyError::MissingOpeningBracket { position, .. }
            | KeyError::UnexpectedCharacter { position, .. }
            | KeyError::TrailingCharactersAfterClose { position, .. } => Some(*position),
            KeyError::EmptyKey
            | KeyError::KeyTooLong { .. }
            | KeyError::UnquotableParameter { .. } => None,
        }
    }

    /// Builds a `MissingOpeningBracket` error for the byte at `position`.
    ///
    /// The character is decoded from the key so that multi-byte characters
    /// show up whole in the message.
    pub(crate) fn missing_bracket_at(key: &str, position: usize) -> Self {
        KeyError::MissingOpeningBracket {
            character: char_at(key, position),
            position,
        }
    }

    pub(crate) fn unexpected_at(key: &str, position: usize) -> Self {
        KeyError::UnexpectedCharacter {
            character: char_at(key, position),
            position,
        }
    }

    pub(crate) fn trailing_at(key: &str, position: usize) -> Self {
        KeyError::TrailingCharactersAfterClose {
            character: char_at(key, position),
            position,
        }
    }

    /// Renders the key with a caret under the offending character.
    ///
    /// ```
    /// use item_key::parse_key;
    ///
    /// let error = parse_key("key[a]x").into_item_key().unwrap_err();
    /// assert_eq!(error.snippet("key[a]x"), "key[a]x\n      ^");
    /// ```
    pub fn snippet(&self, key: &str) -> String {
        let Some(position) = self.position() else {
            return key.to_string();
        };

        // Column counted in characters, the position is a byte offset
        let column = key
            .char_indices()
            .take_while(|(offset, _)| *offset < position)
            .count();

        format!("{}\n{}^", key, " ".repeat(column))
    }
}

fn char_at(key: &str, position: usize) -> char {
    key.get(position..)
        .and_then(|rest| rest.chars().next())
        .unwrap_or(char::REPLACEMENT_CHARACTER)
}
