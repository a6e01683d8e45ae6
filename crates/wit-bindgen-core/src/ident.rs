//! Identifier formation from WIT (kebab-case) names into target-language
//! casing conventions.

use heck::{ToShoutySnakeCase, ToSnakeCase, ToUpperCamelCase};

/// Words forced to uppercase wherever they appear as a whole path segment,
/// regardless of the casing convention otherwise in effect.
const INITIALISMS: &[&str] =
    &["id", "url", "uri", "http", "https", "json", "html", "xml", "api", "uuid", "cpu", "io", "os", "tcp", "udp", "ip"];

fn is_initialism(word: &str) -> Option<&'static str> {
    INITIALISMS.iter().find(|&&i| i.eq_ignore_ascii_case(word)).copied()
}

fn prefix_leading_digit(mut s: String) -> String {
    if s.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        s.insert(0, 'w');
    }
    s
}

fn words(name: &str) -> impl Iterator<Item = &str> {
    name.split(['-', '_']).filter(|w| !w.is_empty())
}

/// `kebab-name` -> `PascalCase`, honoring [`INITIALISMS`].
pub fn to_pascal_case(name: &str) -> String {
    let mut out = String::new();
    for word in words(name) {
        match is_initialism(word) {
            Some(forced) => out.push_str(&forced.to_uppercase()),
            None => out.push_str(&word.to_upper_camel_case()),
        }
    }
    prefix_leading_digit(out)
}

/// `kebab-name` -> `camelCase`: like [`to_pascal_case`], but the first word
/// is lowercased (even if it is an initialism -- `url-for-page` ->
/// `urlForPage`, not `URLForPage`).
pub fn to_camel_case(name: &str) -> String {
    let mut out = String::new();
    for (i, word) in words(name).enumerate() {
        let forced = is_initialism(word);
        match (i, forced) {
            (0, Some(forced)) => out.push_str(&forced.to_lowercase()),
            (0, None) => out.push_str(&word.to_lowercase()),
            (_, Some(forced)) => out.push_str(&forced.to_uppercase()),
            (_, None) => out.push_str(&word.to_upper_camel_case()),
        }
    }
    prefix_leading_digit(out)
}

/// `kebab-name` -> `snake_case`.
pub fn to_snake_case(name: &str) -> String {
    prefix_leading_digit(name.to_snake_case())
}

/// `kebab-name` -> `SCREAMING_SNAKE_CASE`.
pub fn to_shouty_snake_case(name: &str) -> String {
    prefix_leading_digit(name.to_shouty_snake_case())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pascal_case_basic() {
        assert_eq!(to_pascal_case("wall-clock"), "WallClock");
    }

    #[test]
    fn pascal_case_forces_initialisms_uppercase() {
        assert_eq!(to_pascal_case("parse-json-body"), "ParseJSONBody");
        assert_eq!(to_pascal_case("http-client"), "HTTPClient");
    }

    #[test]
    fn snake_case_basic() {
        assert_eq!(to_snake_case("WallClock"), "wall_clock");
    }

    #[test]
    fn leading_digit_gets_a_letter_prefix() {
        assert_eq!(to_snake_case("2d-point"), "w2d_point");
        assert!(to_pascal_case("2d-point").starts_with('w'));
    }

    #[test]
    fn camel_case_lowercases_only_the_leading_word() {
        assert_eq!(to_camel_case("wall-clock"), "wallClock");
        assert_eq!(to_camel_case("url-for-page"), "urlForPage");
        assert_eq!(to_camel_case("page-url"), "pageURL");
    }
}
