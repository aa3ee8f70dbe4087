//! Helpers for single key parameters
//!
//! Callers that build keys from user values need to quote parameters the same
//! way the parser expects to read them back.

use crate::error::KeyError;

/// Returns true if `param` must be quoted to survive as one parameter.
///
/// A leading `"`, space or `[` would be read as a quote, skipped, or opened
/// as a nested list. A `,` or `]` anywhere would end the parameter early.
pub fn needs_quoting(param: &str) -> bool {
    matches!(param.as_bytes().first(), Some(b'"' | b' ' | b'['))
        || param.bytes().any(|b| b == b',' || b == b']')
}

/// Quotes a parameter value for use inside a key's brackets.
///
/// The value is quoted when `forced` is set or when [`needs_quoting`] says so;
/// otherwise it is returned as is. Embedded `"` are escaped as `\"`.
///
/// ```
/// use item_key::quote_param;
///
/// assert_eq!(quote_param("eth0", false).unwrap(), "eth0");
/// assert_eq!(quote_param("a,b", false).unwrap(), "\"a,b\"");
/// assert_eq!(quote_param("say \"hi\"", true).unwrap(), "\"say \\\"hi\\\"\"");
/// ```
pub fn quote_param(param: &str, forced: bool) -> Result<String, KeyError> {
    if !forced && !needs_quoting(param) {
        return Ok(param.to_string());
    }

    // A trailing backslash would escape the closing quote
    if param.ends_with('\\') {
        return Err(KeyError::UnquotableParameter {
            param: param.to_string(),
        });
    }

    let quotes = param.bytes().filter(|b| *b == b'"').count();
    let mut out = String::with_capacity(param.len() + quotes + 2);
    out.push('"');
    for ch in param.chars() {
        if ch == '"' {
            out.push('\\');
        }
        out.push(ch);
    }
    out.push('"');

    Ok(out)
}

/// Strips the enclosing quotes of a quoted parameter and unescapes `\"`.
///
/// Values that do not start with `"` are returned unchanged. A missing
/// closing quote is tolerated.
pub fn unquote_param(param: &str) -> String {
    let Some(inner) = param.strip_prefix('"') else {
        return param.to_string();
    };
    let inner = inner.strip_suffix('"').unwrap_or(inner);

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == '\\' && chars.peek() == Some(&'"') {
            continue;
        }
        out.push(ch);
    }

    out
}

/// Compares the key-id portion of two keys.
///
/// The key-id ends at the first `[` or at the end of the string, so
/// `net.if.in[eth0]` and `net.if.in[lo,bytes]` share a key-id.
pub fn same_key_id(key_1: &str, key_2: &str) -> bool {
    fn key_id(key: &str) -> &str {
        key.split_once('[').map_or(key, |(id, _)| id)
    }

    key_id(key_1) == key_id(key_2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_needs_quoting() {
        assert!(!needs_quoting(""));
        assert!(!needs_quoting("eth0"));
        assert!(!needs_quoting("a b"));
        assert!(!needs_quoting("a\"b"));
        assert!(needs_quoting("\"a"));
        assert!(needs_quoting(" a"));
        assert!(needs_quoting("[a"));
        assert!(needs_quoting("a,b"));
        assert!(needs_quoting("a]"));
    }

    #[test]
    fn test_quote_rejects_trailing_backslash() {
        let error = quote_param("C:\\", true).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::UnquotableParameter);

        // No quoting needed, so the backslash is harmless
        assert_eq!(quote_param("C:\\", false).unwrap(), "C:\\");
    }

    #[test]
    fn test_unquote() {
        assert_eq!(unquote_param("plain"), "plain");
        assert_eq!(unquote_param("\"a,b\""), "a,b");
        assert_eq!(unquote_param("\"say \\\"hi\\\"\""), "say \"hi\"");
        assert_eq!(unquote_param("\"open"), "open");
        assert_eq!(unquote_param("\"\""), "");
        assert_eq!(unquote_param("\"a\\b\""), "a\\b");
    }

    #[test]
    fn test_quote_unquote() {
        for value in ["a,b", " padded", "[x]", "with \"quotes\"", "ünïcode, too"] {
            let quoted = quote_param(value, false).unwrap();
            assert_eq!(unquote_param(&quoted), value, "quoted form {}", quoted);
        }
    }

    #[test]
    fn test_same_key_id() {
        assert!(same_key_id("net.if.in[eth0]", "net.if.in[lo,bytes]"));
        assert!(same_key_id("agent.ping", "agent.ping"));
        assert!(same_key_id("agent.ping", "agent.ping[]"));
        assert!(!same_key_id("net.if.in[eth0]", "net.if.out[eth0]"));
        assert!(!same_key_id("net.if", "net.if.in"));
    }
}
