use item_key::{ItemKey, parse_key, quote_param, unquote_param};
use proptest::prelude::*;

fn key_id() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9._-]{0,12}"
}

fn parameter() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z0-9/._-]{0,10}",
        "[a-z0-9 ,\\[\\]\"\\\\.]{0,10}",
        "[\\[\\] ]{0,4}[a-zäöü,]{0,4}",
    ]
}

proptest! {
    #[test]
    fn parse_is_total(key in "\\PC{0,40}") {
        let result = parse_key(&key);
        if result.valid {
            prop_assert!(result.error.is_empty());
            prop_assert!(!result.key_id.is_empty());
            prop_assert!(result.error_kind.is_none());
        } else {
            prop_assert!(!result.error.is_empty());
            prop_assert!(result.error_kind.is_some());
        }
    }

    #[test]
    fn bracket_heavy_input_never_panics(key in "k[\\[\\],\" \\\\a]{0,30}") {
        let result = parse_key(&key);
        prop_assert_eq!(result.valid, result.error.is_empty());
    }

    #[test]
    fn key_without_brackets_is_its_own_key_id(key in key_id()) {
        let result = parse_key(&key);
        prop_assert!(result.valid, "{}", result.error);
        prop_assert_eq!(&result.key_id, &key);
        prop_assert!(result.parameters.is_empty());
    }

    #[test]
    fn canonical_form_reparses(id in key_id(), params in prop::collection::vec(parameter(), 1..6)) {
        let key = ItemKey::new(id, params);
        let text = key.to_key_string();
        prop_assume!(text.is_ok());
        let text = text.unwrap();

        let result = parse_key(&text);
        prop_assert!(result.valid, "{:?}: {}", text, result.error);
        prop_assert_eq!(&result.key_id, &key.key_id);
        prop_assert_eq!(result.parameters.len(), key.parameters.len(), "{:?}", text);
        prop_assert_eq!(&result.parameters, &key.parameters, "{:?}", text);
    }

    #[test]
    fn quote_then_unquote(value in "[a-z ,\\]\"]{0,12}") {
        let quoted = quote_param(&value, true).unwrap();
        prop_assert_eq!(unquote_param(&quoted), value);
    }
}
