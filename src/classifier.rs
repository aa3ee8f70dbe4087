//! Key-id character classification
//!
//! Which bytes may appear in the bare identifier before `[` is a platform-wide
//! convention, so the parser takes it as an injected [`KeyIdClassifier`].

/// Decides whether a byte may appear in the key-id segment of an item key
pub trait KeyIdClassifier {
    /// Returns true if `byte` is allowed in a key-id
    fn is_key_id_char(&self, byte: u8) -> bool;
}

impl<F> KeyIdClassifier for F
where
    F: Fn(u8) -> bool,
{
    fn is_key_id_char(&self, byte: u8) -> bool {
        self(byte)
    }
}

/// Lookup table for O(1) key-id byte classification
#[derive(Debug, Clone)]
pub struct KeyCharTable([bool; 256]);

impl KeyCharTable {
    /// Creates the table for the platform convention: ASCII letters, digits,
    /// `.`, `_` and `-`
    pub const fn new() -> Self {
        let mut table = [false; 256];
        let mut i = 0;

        while i < 256 {
            let ch = i as u8;
            table[i] = matches!(ch, b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'.' | b'_' | b'-');
            i += 1;
        }

        Self(table)
    }

    /// Creates a table that accepts no bytes at all
    pub const fn empty() -> Self {
        Self([false; 256])
    }

    /// Returns a copy of the table that also accepts every byte of `extra`
    pub const fn with_extra(mut self, extra: &[u8]) -> Self {
        let mut i = 0;
        while i < extra.len() {
            self.0[extra[i] as usize] = true;
            i += 1;
        }
        self
    }

    /// Returns a copy of the table that rejects every byte of `bytes`
    pub const fn without(mut self, bytes: &[u8]) -> Self {
        let mut i = 0;
        while i < bytes.len() {
            self.0[bytes[i] as usize] = false;
            i += 1;
        }
        self
    }

    /// Looks up a byte
    #[inline]
    pub const fn contains(&self, byte: u8) -> bool {
        self.0[byte as usize]
    }
}

impl Default for KeyCharTable {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyIdClassifier for KeyCharTable {
    #[inline]
    fn is_key_id_char(&self, byte: u8) -> bool {
        self.contains(byte)
    }
}

static DEFAULT_TABLE: KeyCharTable = KeyCharTable::new();

/// The platform's default key-id character set
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultKeyIdChars;

impl KeyIdClassifier for DefaultKeyIdChars {
    #[inline]
    fn is_key_id_char(&self, byte: u8) -> bool {
        DEFAULT_TABLE.contains(byte)
    }
}
