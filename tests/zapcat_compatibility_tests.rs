//! Legacy bracket chaining: `key[a][b]` is read as `key[a,b]`

use item_key::{ErrorKind, KeyParser, ParseResult, ParserConfig, ZAPCAT_SEPARATOR, parse_key};

#[cfg(test)]
mod zapcat_compatibility_tests {
    use super::*;

    fn params(result: &ParseResult) -> Vec<&str> {
        result.parameters.iter().map(String::as_str).collect()
    }

    fn strict_parser() -> KeyParser {
        KeyParser::new().with_config(ParserConfig::new().with_zapcat_compatibility(false))
    }

    #[test]
    fn test_separator_constant() {
        assert_eq!(ZAPCAT_SEPARATOR, b"][");
        assert!(ParserConfig::default().zapcat_compatibility);
    }

    #[test]
    fn test_chained_brackets() {
        let cases: &[(&str, &[&str])] = &[
            ("key[a][b]", &["a", "b"]),
            ("key[a][b][c]", &["a", "b", "c"]),
            ("key[][]", &["", ""]),
            ("key[\"a\"][b]", &["a", "b"]),
            ("key[\"a\" ][b]", &["a", "b"]),
            ("key[[a]][b]", &["[a]", "b"]),
            ("key[a,b][c]", &["a", "b", "c"]),
            ("zabbix[\"process\",\"poller\"][avg,busy]", &["process", "poller", "avg", "busy"]),
        ];

        for (key, expected) in cases {
            let result = parse_key(key);
            assert!(result.valid, "Expected {:?} to parse, got: {}", key, result.error);
            assert_eq!(params(&result), *expected, "key {:?}", key);
        }
    }

    #[test]
    fn test_chaining_is_top_level_only() {
        // Inside a nested list "][" is not a separator
        let result = parse_key("key[[a][b]]");
        assert!(!result.valid);
        assert_eq!(result.error_kind, Some(ErrorKind::UnexpectedCharacter));

        let result = parse_key("key[\"a][b\"]");
        assert!(result.valid);
        assert_eq!(params(&result), vec!["a][b"]);
    }

    #[test]
    fn test_chaining_disabled() {
        let parser = strict_parser();

        for key in ["key[a][b]", "key[\"a\"][b]", "key[][]"] {
            let result = parser.parse(key);
            assert!(!result.valid, "key {:?}", key);
            assert_eq!(
                result.error_kind,
                Some(ErrorKind::TrailingCharactersAfterClose),
                "key {:?}",
                key
            );
        }

        // After a nested list the stray `]` is itself the error
        let result = parser.parse("key[[a]][b]");
        assert_eq!(result.error_kind, Some(ErrorKind::UnexpectedCharacter));
        assert_eq!(result.error_position, Some(7));

        // Everything else behaves the same
        let result = parser.parse("key[a,[b,c],\"d\"]");
        assert!(result.valid, "{}", result.error);
        assert_eq!(params(&result), vec!["a", "[b,c]", "d"]);
    }

    #[test]
    fn test_chained_result_matches_comma_form() {
        let chained = parse_key("net.tcp.service[tcp][localhost][80]");
        let commas = parse_key("net.tcp.service[tcp,localhost,80]");
        assert!(chained.valid && commas.valid);
        assert_eq!(chained.key_id, commas.key_id);
        assert_eq!(chained.parameters, commas.parameters);
    }
}
