//! Item key parser
//!
//! A key is a key-id optionally followed by a bracketed parameter list:
//!
//! ```text
//! net.if.in[eth0, bytes]
//! vfs.file.regexp["/var/log/app.log", "error, fatal", [1, 2]]
//! ```
//!
//! Parsing is a single forward pass. The key-id is consumed first, then the
//! parameter list is driven by a three-state machine (initial, quoted,
//! unquoted) with a counter for the nesting depth of `[` inside the list.
//! Only top-level commas split parameters; nested lists and their quotes are
//! kept verbatim in the parameter that contains them.

use crate::classifier::{DefaultKeyIdChars, KeyIdClassifier};
use crate::error::KeyError;
use crate::key::{ItemKey, Parameters, ParseResult};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Legacy separator: `key[a][b]` is read as `key[a,b]`.
///
/// Zapcat agents name their checks this way, so the sequence is accepted as a
/// top-level parameter separator while [`ParserConfig::zapcat_compatibility`]
/// is on.
pub const ZAPCAT_SEPARATOR: &[u8; 2] = b"][";

/// Configuration for the key parser
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Accept `][` as a top-level parameter separator
    pub zapcat_compatibility: bool,
    /// Reject keys longer than this many bytes before scanning
    pub max_key_length: Option<usize>,
}

impl ParserConfig {
    /// Creates a new parser configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether `][` separates parameters
    pub fn with_zapcat_compatibility(mut self, enabled: bool) -> Self {
        self.zapcat_compatibility = enabled;
        self
    }

    /// Sets the maximum accepted key length in bytes
    pub fn with_max_key_length(mut self, max: usize) -> Self {
        self.max_key_length = Some(max);
        self
    }
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            zapcat_compatibility: true,
            max_key_length: None,
        }
    }
}

/// Sub-state of the parameter list scanner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    /// At a parameter boundary or between tokens
    Initial,
    /// Inside a double-quoted parameter
    Quoted,
    /// Inside a bare parameter token
    Unquoted,
}

/// What the scan loop does after handling one byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    /// Move on to the next byte
    Next,
    /// Hand the current byte to the new state without advancing
    Reprocess,
    /// The parameter list is closed and the key is valid
    Done,
}

/// Per-call scanning state
struct ScanCursor<'k> {
    text: &'k str,
    key: &'k [u8],
    pos: usize,
    nest_level: usize,
    state: ScanState,
    key_id_end: usize,
    params: Vec<Vec<u8>>,
}

impl<'k> ScanCursor<'k> {
    fn new(text: &'k str) -> Self {
        Self {
            text,
            key: text.as_bytes(),
            pos: 0,
            nest_level: 0,
            state: ScanState::Initial,
            key_id_end: 0,
            params: Vec::new(),
        }
    }

    #[inline]
    fn byte_at(&self, offset: usize) -> Option<u8> {
        self.key.get(offset).copied()
    }

    #[inline]
    fn is_last(&self, offset: usize) -> bool {
        offset + 1 == self.key.len()
    }

    fn open_param(&mut self) {
        self.params.push(Vec::new());
    }

    #[inline]
    fn append(&mut self, byte: u8) {
        if let Some(param) = self.params.last_mut() {
            param.push(byte);
        }
    }

    /// Skips the spaces after the current byte, keeping them while nested.
    fn skip_spaces(&mut self) {
        while self.byte_at(self.pos + 1) == Some(b' ') {
            self.pos += 1;
            if self.nest_level > 0 {
                self.append(b' ');
            }
        }
    }

    /// Builds the result from whatever has been scanned so far
    fn finish(self, outcome: Result<(), KeyError>) -> ParseResult {
        let key_id = String::from_utf8_lossy(&self.key[..self.key_id_end]).into_owned();
        let parameters: Parameters = self
            .params
            .into_iter()
            .map(|bytes| {
                // Only ASCII delimiters are ever dropped, so this stays valid UTF-8
                String::from_utf8(bytes)
                    .unwrap_or_else(|err| String::from_utf8_lossy(err.as_bytes()).into_owned())
            })
            .collect();

        match outcome {
            Ok(()) => ParseResult::success(key_id, parameters),
            Err(error) => ParseResult::failure(error, key_id, parameters),
        }
    }
}

/// Item key parser with an injected key-id character classifier
#[derive(Debug, Clone, Default)]
pub struct KeyParser<C = DefaultKeyIdChars> {
    classifier: C,
    config: ParserConfig,
}

impl KeyParser<DefaultKeyIdChars> {
    /// Creates a parser using the platform's default key-id characters
    pub fn new() -> Self {
        Self {
            classifier: DefaultKeyIdChars,
            config: ParserConfig::default(),
        }
    }
}

impl<C: KeyIdClassifier> KeyParser<C> {
    /// Creates a parser that asks `classifier` which bytes form a key-id
    pub fn with_classifier(classifier: C) -> Self {
        Self {
            classifier,
            config: ParserConfig::default(),
        }
    }

    /// Sets the parser configuration
    pub fn with_config(mut self, config: ParserConfig) -> Self {
        self.config = config;
        self
    }

    /// Returns the parser configuration
    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Parses a key. Never panics; a rejected key has `valid == false`.
    pub fn parse(&self, key: &str) -> ParseResult {
        let mut cursor = ScanCursor::new(key);
        let outcome = self.scan(&mut cursor);

        match &outcome {
            Ok(()) => trace!(key = %key, params = cursor.params.len(), "item key accepted"),
            Err(error) => debug!(
                key = %key,
                kind = %error.kind(),
                position = ?error.position(),
                "item key rejected"
            ),
        }

        cursor.finish(outcome)
    }

    /// Parses a key into an [`ItemKey`]
    pub fn try_parse(&self, key: &str) -> Result<ItemKey, KeyError> {
        self.parse(key).into_item_key()
    }

    fn scan(&self, cursor: &mut ScanCursor<'_>) -> Result<(), KeyError> {
        let len = cursor.key.len();
        if len == 0 {
            return Err(KeyError::EmptyKey);
        }
        if let Some(max) = self.config.max_key_length {
            if len > max {
                return Err(KeyError::KeyTooLong { length: len, max });
            }
        }

        cursor.key_id_end = self.scan_key_id(cursor.key);
        if cursor.key_id_end == 0 {
            return Err(KeyError::InvalidFormat { position: 0 });
        }
        if cursor.key_id_end == len {
            return Ok(());
        }

        cursor.pos = cursor.key_id_end;
        self.scan_parameters(cursor)
    }

    /// Returns the offset of the first byte that is not a key-id byte
    fn scan_key_id(&self, key: &[u8]) -> usize {
        key.iter()
            .position(|byte| !self.classifier.is_key_id_char(*byte))
            .unwrap_or(key.len())
    }

    fn scan_parameters(&self, cursor: &mut ScanCursor<'_>) -> Result<(), KeyError> {
        if cursor.byte_at(cursor.pos) != Some(b'[') {
            return Err(KeyError::missing_bracket_at(cursor.text, cursor.pos));
        }

        cursor.open_param();
        cursor.pos += 1;

        while cursor.pos < cursor.key.len() {
            let step = match cursor.state {
                ScanState::Initial => self.scan_initial(cursor)?,
                ScanState::Quoted => self.scan_quoted(cursor)?,
                ScanState::Unquoted => self.scan_unquoted(cursor)?,
            };

            match step {
                Step::Next => cursor.pos += 1,
                Step::Reprocess => {}
                Step::Done => return Ok(()),
            }
        }

        Err(KeyError::InvalidFormat {
            position: cursor.key.len(),
        })
    }

    #[inline]
    fn chained_at(&self, cursor: &ScanCursor<'_>, offset: usize) -> bool {
        self.config.zapcat_compatibility
            && cursor.nest_level == 0
            && cursor.key[offset..].starts_with(ZAPCAT_SEPARATOR)
    }

    fn scan_initial(&self, cursor: &mut ScanCursor<'_>) -> Result<Step, KeyError> {
        let pos = cursor.pos;
        let byte = cursor.key[pos];

        match byte {
            b',' if cursor.nest_level == 0 => cursor.open_param(),
            b',' => cursor.append(byte),
            b']' if self.chained_at(cursor, pos) => {
                cursor.open_param();
                cursor.pos += 1;
            }
            b'"' => {
                if cursor.nest_level > 0 {
                    cursor.append(byte);
                }
                cursor.state = ScanState::Quoted;
            }
            b'[' => {
                cursor.append(byte);
                cursor.nest_level += 1;
            }
            b']' if cursor.nest_level > 0 => {
                cursor.nest_level -= 1;
                cursor.append(byte);
                cursor.skip_spaces();
                return self.after_nested_close(cursor);
            }
            b']' => return self.close_list(cursor, pos),
            b' ' => {
                if cursor.nest_level > 0 {
                    cursor.append(byte);
                }
            }
            _ => {
                cursor.append(byte);
                cursor.state = ScanState::Unquoted;
            }
        }

        Ok(Step::Next)
    }

    /// Checks what follows a `]` that closed a nested list
    fn after_nested_close(&self, cursor: &mut ScanCursor<'_>) -> Result<Step, KeyError> {
        let next = cursor.pos + 1;

        match cursor.byte_at(next) {
            None => Err(KeyError::InvalidFormat { position: next }),
            Some(b']') if cursor.nest_level == 0 => {
                if cursor.is_last(next) {
                    cursor.pos = next;
                    Ok(Step::Done)
                } else if self.chained_at(cursor, next) {
                    Ok(Step::Next)
                } else {
                    Err(KeyError::unexpected_at(cursor.text, next))
                }
            }
            Some(b',') | Some(b']') => Ok(Step::Next),
            Some(_) => Err(KeyError::unexpected_at(cursor.text, next)),
        }
    }

    fn scan_quoted(&self, cursor: &mut ScanCursor<'_>) -> Result<Step, KeyError> {
        let byte = cursor.key[cursor.pos];

        // The opening quote sits before this byte, so pos - 1 is in bounds
        if byte == b'"' && cursor.key[cursor.pos - 1] != b'\\' {
            if cursor.nest_level > 0 {
                cursor.append(byte);
            }
            cursor.skip_spaces();
            cursor.state = ScanState::Initial;
            return self.after_quoted_close(cursor);
        }

        if byte == b'\\' && cursor.byte_at(cursor.pos + 1) == Some(b'"') {
            // The quote itself is appended on the next step
            if cursor.nest_level > 0 {
                cursor.append(byte);
            }
            return Ok(Step::Next);
        }

        cursor.append(byte);
        Ok(Step::Next)
    }

    /// Checks what follows the closing quote of a quoted parameter
    fn after_quoted_close(&self, cursor: &mut ScanCursor<'_>) -> Result<Step, KeyError> {
        let next = cursor.pos + 1;

        match cursor.byte_at(next) {
            None => Err(KeyError::InvalidFormat { position: next }),
            Some(b']') if cursor.nest_level == 0 => {
                if self.chained_at(cursor, next) {
                    Ok(Step::Next)
                } else {
                    self.close_list(cursor, next)
                }
            }
            Some(b',') | Some(b']') => Ok(Step::Next),
            Some(_) if cursor.nest_level == 0 => {
                Err(KeyError::trailing_at(cursor.text, next))
            }
            Some(_) => Err(KeyError::unexpected_at(cursor.text, next)),
        }
    }

    fn scan_unquoted(&self, cursor: &mut ScanCursor<'_>) -> Result<Step, KeyError> {
        let pos = cursor.pos;
        let byte = cursor.key[pos];

        match byte {
            b']' if self.chained_at(cursor, pos) => {
                cursor.state = ScanState::Initial;
                Ok(Step::Reprocess)
            }
            b',' => {
                cursor.state = ScanState::Initial;
                Ok(Step::Reprocess)
            }
            b']' if cursor.nest_level > 0 => {
                cursor.state = ScanState::Initial;
                Ok(Step::Reprocess)
            }
            b']' => self.close_list(cursor, pos),
            _ => {
                cursor.append(byte);
                Ok(Step::Next)
            }
        }
    }

    /// Handles the top-level `]` at `offset`: it must be the last byte
    fn close_list(&self, cursor: &mut ScanCursor<'_>, offset: usize) -> Result<Step, KeyError> {
        if cursor.is_last(offset) {
            cursor.pos = offset;
            Ok(Step::Done)
        } else {
            Err(KeyError::trailing_at(cursor.text, offset + 1))
        }
    }
}

/// Parses a key with the default key-id characters and configuration.
///
/// ```
/// use item_key::parse_key;
///
/// let result = parse_key("net.if.in[eth0,bytes]");
/// assert!(result.valid);
/// assert_eq!(result.key_id, "net.if.in");
/// assert_eq!(result.parameters.as_slice(), ["eth0", "bytes"]);
/// ```
pub fn parse_key(key: &str) -> ParseResult {
    KeyParser::new().parse(key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn params(result: &ParseResult) -> Vec<&str> {
        result.parameters.iter().map(String::as_str).collect()
    }

    #[test]
    fn test_reprocess_hands_separator_to_initial() {
        let result = parse_key("key[abc,def]");
        assert!(result.valid, "{}", result.error);
        assert_eq!(params(&result), vec!["abc", "def"]);
    }

    #[test]
    fn test_partial_state_on_failure() {
        let result = parse_key("key[a,b");
        assert!(!result.valid);
        assert_eq!(result.error_kind, Some(ErrorKind::InvalidFormat));
        assert_eq!(result.key_id, "key");
        assert_eq!(params(&result), vec!["a", "b"]);
    }

    #[test]
    fn test_config_from_json() {
        let config: ParserConfig =
            serde_json::from_str(r#"{"zapcat_compatibility": false}"#).unwrap();
        assert!(!config.zapcat_compatibility);
        assert_eq!(config.max_key_length, None);

        let config: ParserConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, ParserConfig::default());
    }

    #[test]
    fn test_parser_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<KeyParser>();
    }
}
