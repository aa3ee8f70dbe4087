//! Parsed item key representations

use crate::error::{ErrorKind, KeyError};
use crate::param::quote_param;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Top-level parameters of a key in source order.
///
/// Most keys carry a handful of parameters, so they are stored inline.
pub type Parameters = SmallVec<[String; 4]>;

/// A successfully decomposed item key
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemKey {
    /// Identifier before any `[`
    pub key_id: String,
    /// Top-level parameters, empty when the key has no bracketed list
    pub parameters: Parameters,
}

impl ItemKey {
    /// Creates a key from its parts
    pub fn new(key_id: impl Into<String>, parameters: impl IntoIterator<Item = String>) -> Self {
        Self {
            key_id: key_id.into(),
            parameters: parameters.into_iter().collect(),
        }
    }

    /// Returns the parameter at `index`, if present
    pub fn param(&self, index: usize) -> Option<&str> {
        self.parameters.get(index).map(String::as_str)
    }

    /// Number of top-level parameters
    pub fn param_count(&self) -> usize {
        self.parameters.len()
    }

    /// Returns true if the key has a parameter list
    pub fn has_parameters(&self) -> bool {
        !self.parameters.is_empty()
    }

    /// Renders the key back to text as `key_id[p1,p2,...]`.
    ///
    /// Parameters are quoted only where the parser would otherwise split or
    /// reinterpret them. The output need not match the original key byte for
    /// byte, but it parses back to the same parameter count.
    pub fn to_key_string(&self) -> Result<String, KeyError> {
        if self.parameters.is_empty() {
            return Ok(self.key_id.clone());
        }

        let mut out = String::with_capacity(self.key_id.len() + 2);
        out.push_str(&self.key_id);
        out.push('[');
        for (i, param) in self.parameters.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            out.push_str(&quote_param(param, false)?);
        }
        out.push(']');

        Ok(out)
    }
}

/// Outcome of a single parse call.
///
/// When `valid` is false, `key_id` and `parameters` hold whatever had been
/// scanned before the failure and must not be relied upon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseResult {
    pub valid: bool,
    /// Empty when valid
    pub error: String,
    pub error_kind: Option<ErrorKind>,
    /// Byte offset the error points at
    pub error_position: Option<usize>,
    pub key_id: String,
    pub parameters: Parameters,
    /// Not serialized; a deserialized failure falls back to `InvalidFormat`
    #[serde(skip)]
    cause: Option<KeyError>,
}

impl ParseResult {
    pub(crate) fn success(key_id: String, parameters: Parameters) -> Self {
        Self {
            valid: true,
            error: String::new(),
            error_kind: None,
            error_position: None,
            key_id,
            parameters,
            cause: None,
        }
    }

    pub(crate) fn failure(error: KeyError, key_id: String, parameters: Parameters) -> Self {
        Self {
            valid: false,
            error: error.to_string(),
            error_kind: Some(error.kind()),
            error_position: error.position(),
            key_id,
            parameters,
            cause: Some(error),
        }
    }

    /// Returns true if the key was accepted
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Returns the error that rejected the key
    pub fn key_error(&self) -> Option<&KeyError> {
        self.cause.as_ref()
    }

    /// Converts the result into the typed key, or the error that rejected it.
    pub fn into_item_key(self) -> Result<ItemKey, KeyError> {
        if self.valid {
            return Ok(ItemKey {
                key_id: self.key_id,
                parameters: self.parameters,
            });
        }

        Err(self.cause.unwrap_or(KeyError::InvalidFormat {
            position: self.error_position.unwrap_or(0),
        }))
    }
}

impl From<ItemKey> for ParseResult {
    fn from(key: ItemKey) -> Self {
        ParseResult::success(key.key_id, key.parameters)
    }
}
