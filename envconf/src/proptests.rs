//! Property-based tests for filling and validation rules.

use crate::error::Error;
use crate::fill::{fill, parse_bool, split_list};
use crate::source::{merge, EnvMap};
use crate::validate::rules::{is_alphanumeric, matches_pattern, parse_int};
use crate::validate::validate;
use crate::Record;
use proptest::prelude::*;

#[derive(Record, Default, Debug)]
struct Unconstrained {
    pub name: String,
    pub count: i64,
    pub enabled: bool,
    pub tags: Vec<String>,
    pub inner: Inner,
    pub optional: Option<Inner>,
}

#[derive(Record, Default, Debug, Clone, PartialEq)]
struct Inner {
    pub value: String,
}

#[derive(Record, Default, Debug)]
struct Outer {
    pub middle: Middle,
}

#[derive(Record, Default, Debug)]
struct Middle {
    pub leaf: Leaf,
}

#[derive(Record, Default, Debug)]
struct Leaf {
    #[envconf(required)]
    pub value: String,
}

proptest! {
    // Records without annotations always validate
    #[test]
    fn unannotated_records_always_validate(
        name in ".*",
        count in any::<i64>(),
        enabled in any::<bool>(),
        tags in prop::collection::vec(".*", 0..5),
        inner in ".*",
        optional in prop::option::of(".*"),
    ) {
        let config = Unconstrained {
            name,
            count,
            enabled,
            tags,
            inner: Inner { value: inner },
            optional: optional.map(|value| Inner { value }),
        };
        prop_assert!(validate(&config).is_ok());
    }

    // is_alphanumeric holds iff every character is an ASCII letter or digit
    #[test]
    fn alphanumeric_matches_char_definition(s in ".{0,32}") {
        let expected = s.chars().all(|c| c.is_ascii_alphanumeric());
        prop_assert_eq!(is_alphanumeric(&s), expected);
        prop_assert_eq!(matches_pattern(&s, "alphanumeric"), expected);
    }

    // Unknown patterns always match
    #[test]
    fn unknown_patterns_always_match(s in ".*", pattern in "[a-z]{1,12}") {
        prop_assume!(pattern != "alphanumeric");
        prop_assert!(matches_pattern(&s, &pattern));
    }

    // parse_int reads any integer followed by a non-digit suffix
    #[test]
    fn parse_int_reads_leading_integer(n in any::<i64>(), suffix in "([.a-z][0-9a-z]*)?") {
        let text = format!("{n}{suffix}");
        prop_assert_eq!(parse_int(&text, 0), n);
    }

    // parse_int falls back to the default when there are no digits
    #[test]
    fn parse_int_default_without_digits(text in "[a-z .]*", default in any::<i64>()) {
        prop_assert_eq!(parse_int(&text, default), default);
    }

    // Boolean parsing is case-insensitive
    #[test]
    fn bool_parsing_case_insensitive(value in any::<bool>(), upper in any::<bool>()) {
        for word in if value { ["true", "yes", "on"] } else { ["false", "no", "off"] } {
            let input = if upper { word.to_uppercase() } else { word.to_string() };
            prop_assert_eq!(parse_bool(&input), Some(value));
        }
    }

    // Integers round-trip through the filler
    #[test]
    fn integer_fill_roundtrip(n in any::<i64>()) {
        let env: EnvMap = [("COUNT", n.to_string())].into_iter().collect();
        let mut config = Unconstrained::default();
        fill("", &mut config, &env).unwrap();
        prop_assert_eq!(config.count, n);
    }

    // Non-numeric text never fills an integer field
    #[test]
    fn non_numeric_integer_fails(text in "[a-z]{1,10}") {
        let env: EnvMap = [("COUNT", text)].into_iter().collect();
        let mut config = Unconstrained::default();
        let is_coercion_error = matches!(
            fill("", &mut config, &env),
            Err(Error::FieldCoercion { ref field, .. }) if field == "count"
        );
        prop_assert!(is_coercion_error);
    }

    // List splitting keeps order and element count
    #[test]
    fn list_split_preserves_order(items in prop::collection::vec("[a-z0-9]{1,8}", 1..6)) {
        let raw = items.join(" , ");
        prop_assert_eq!(split_list(&raw), items);
    }

    // An optional record stays unset unless one of its keys is present
    #[test]
    fn optional_record_only_allocated_on_write(
        key in "[A-Z]{1,8}",
        value in "[a-z]{0,8}",
    ) {
        let env: EnvMap = [(key, value)].into_iter().collect();
        let mut config = Unconstrained::default();
        fill("", &mut config, &env).unwrap_or_default();
        prop_assert!(config.optional.is_none());
    }

    // Later sources always win on conflicting keys
    #[test]
    fn merge_later_wins(key in "[A-Z]{1,8}", low in ".*", high in ".*") {
        let first: EnvMap = [(key.as_str(), low)].into_iter().collect();
        let second: EnvMap = [(key.as_str(), high.clone())].into_iter().collect();
        let merged = merge([first, second]);
        prop_assert_eq!(merged.get(&key), Some(high.as_str()));
    }

    // A violation k levels deep is reported under the dotted ancestor chain
    #[test]
    fn nested_violation_path(_dummy in any::<u8>()) {
        let errors = match validate(&Outer::default()) {
            Err(Error::Validation(errors)) => errors,
            other => return Err(TestCaseError::fail(format!("unexpected: {other:?}"))),
        };
        prop_assert_eq!(errors.fields(), vec!["middle.leaf.value"]);
    }
}
