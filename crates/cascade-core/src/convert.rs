//! Built-in string conversions and list splitting

use std::path::PathBuf;

/// Error type produced by value converters.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Conversion from a raw configured string into a typed value.
///
/// Implemented for the built-in types a [`TypedResolver`](crate::TypedResolver)
/// understands out of the box. Applications implement it for their own
/// types or pass a closure to `with_converter` instead.
pub trait FromConfigValue: Sized {
    fn from_config_value(value: &str) -> Result<Self, BoxError>;
}

impl FromConfigValue for String {
    fn from_config_value(value: &str) -> Result<Self, BoxError> {
        Ok(value.to_string())
    }
}

impl FromConfigValue for bool {
    fn from_config_value(value: &str) -> Result<Self, BoxError> {
        Ok(parse_bool(value))
    }
}

impl FromConfigValue for PathBuf {
    fn from_config_value(value: &str) -> Result<Self, BoxError> {
        Ok(PathBuf::from(value))
    }
}

macro_rules! from_str_conversion {
    ($($ty:ty),* $(,)?) => {
        $(
            impl FromConfigValue for $ty {
                fn from_config_value(value: &str) -> Result<Self, BoxError> {
                    value.parse::<$ty>().map_err(Into::into)
                }
            }
        )*
    };
}

from_str_conversion!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

/// Tokens accepted as `true`, compared case-insensitively.
pub const TRUE_TOKENS: [&str; 7] = ["TRUE", "1", "YES", "Y", "JA", "J", "OUI"];

/// Boolean recognition: any of [`TRUE_TOKENS`] is true, anything else false.
pub fn parse_bool(value: &str) -> bool {
    TRUE_TOKENS.iter().any(|token| token.eq_ignore_ascii_case(value))
}

/// Split a list value on unescaped commas.
///
/// A backslash takes the following character literally (including `,`
/// and `\`). Segments are trimmed and empty segments are dropped.
pub fn split_list(value: &str) -> Vec<String> {
    let mut items = Vec::new();
    let mut current = String::new();
    let mut chars = value.chars();

    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                if let Some(next) = chars.next() {
                    current.push(next);
                }
            }
            ',' => {
                push_trimmed(&mut items, &current);
                current.clear();
            }
            other => current.push(other),
        }
    }
    push_trimmed(&mut items, &current);

    items
}

fn push_trimmed(items: &mut Vec<String>, segment: &str) {
    let trimmed = segment.trim();
    if !trimmed.is_empty() {
        items.push(trimmed.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("TRUE", true)]
    #[case("true", true)]
    #[case("1", true)]
    #[case("yes", true)]
    #[case("Y", true)]
    #[case("ja", true)]
    #[case("J", true)]
    #[case("Oui", true)]
    #[case("false", false)]
    #[case("0", false)]
    #[case("on", false)]
    #[case("", false)]
    fn boolean_tokens(#[case] input: &str, #[case] expected: bool) {
        assert_eq!(parse_bool(input), expected);
    }

    #[test]
    fn escaped_comma_stays_in_segment() {
        assert_eq!(split_list("a,b\\,c,d"), vec!["a", "b,c", "d"]);
    }

    #[test]
    fn segments_are_trimmed_and_empties_dropped() {
        assert_eq!(
            split_list("test1@apache.org, test2@apache.org, \n  test3@apache.org"),
            vec!["test1@apache.org", "test2@apache.org", "test3@apache.org"]
        );
        assert_eq!(split_list(" , a,,b , "), vec!["a", "b"]);
    }

    #[test]
    fn escaped_backslash_is_kept_once() {
        assert_eq!(
            split_list("val\\,ue1,value2, val\\\\ue3"),
            vec!["val,ue1", "value2", "val\\ue3"]
        );
    }

    #[test]
    fn trailing_backslash_is_dropped() {
        assert_eq!(split_list("a,b\\"), vec!["a", "b"]);
    }

    #[test]
    fn numeric_conversion_reports_parse_failure() {
        assert_eq!(i64::from_config_value("8589934592").unwrap(), 8_589_934_592);
        assert!(i32::from_config_value("five").is_err());
        assert_eq!(f64::from_config_value("4e40").unwrap(), 4e40);
    }
}
