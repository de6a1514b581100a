//! Routing identifiers for task types.
//!
//! A task type is addressed by a lowercase, underscore-separated key derived
//! from its Rust type name: `my_agent::tasks::FetchPackage` -> `fetch_package`.
//! The same key stamps outgoing jobs (`task`) and names chain continuations
//! (`_chain`).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable routing key of a task type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskIdentifier(String);

impl TaskIdentifier {
    /// Wrap an already-resolved identifier as is (e.g. an entry of `_chain`).
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Resolve the identifier of a (possibly namespaced) type name.
    pub fn from_type_name(type_name: &str) -> Self {
        Self(resolve(type_name))
    }

    /// Identifier of `T` derived from its compile-time type name.
    pub fn of<T: ?Sized>() -> Self {
        Self::from_type_name(std::any::type_name::<T>())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for TaskIdentifier {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl PartialEq<str> for TaskIdentifier {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for TaskIdentifier {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Map a type name to its snake_case routing key.
///
/// - generic arguments are dropped (`Wrapper<Inner>` -> `Wrapper`)
/// - everything through the last `::` is stripped
/// - an underscore goes before an uppercase letter that follows a lowercase
///   letter or digit (`FooBar` -> `foo_bar`), and before the last letter of an
///   uppercase run when a lowercase letter follows (`HTTPServer` -> `http_server`)
///
/// Total and idempotent: `resolve(&resolve(x)) == resolve(x)`.
pub fn resolve(type_name: &str) -> String {
    let base = type_name.split('<').next().unwrap_or(type_name);
    let base = base.rsplit("::").next().unwrap_or(base);

    let chars: Vec<char> = base.chars().collect();
    let mut out = String::with_capacity(base.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if i > 0 && c.is_uppercase() {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if prev.is_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_uppercase() && next_is_lower)
            {
                out.push('_');
            }
        }
        out.extend(c.to_lowercase());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    struct FooBar;

    mod nested {
        pub struct Foo;
    }

    #[rstest]
    #[case::single_word("Foo", "foo")]
    #[case::camel_case("FooBar", "foo_bar")]
    #[case::namespaced("Agent::Tasks::Foo", "foo")]
    #[case::namespaced_camel("agent::tasks::FooBar", "foo_bar")]
    #[case::acronym_prefix("HTTPServer", "http_server")]
    #[case::acronym_suffix("FetchURL", "fetch_url")]
    #[case::digit_boundary("Sha256Digest", "sha256_digest")]
    #[case::generic("crate::jobs::Wrapper<crate::jobs::Inner>", "wrapper")]
    #[case::already_snake("foo_bar", "foo_bar")]
    #[case::empty("", "")]
    fn resolves_type_names(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(resolve(input), expected);
    }

    #[rstest]
    #[case("FooBar")]
    #[case("HTTPServer")]
    #[case("a::b::ExtractArchive")]
    fn resolve_is_idempotent(#[case] input: &str) {
        let once = resolve(input);
        assert_eq!(resolve(&once), once);
    }

    #[test]
    fn identifier_of_type_strips_module_path() {
        assert_eq!(TaskIdentifier::of::<FooBar>(), "foo_bar");
        assert_eq!(TaskIdentifier::of::<nested::Foo>(), "foo");
    }

    #[test]
    fn identifier_of_type_is_stable_across_calls() {
        let first = TaskIdentifier::of::<FooBar>();
        for _ in 0..3 {
            assert_eq!(TaskIdentifier::of::<FooBar>(), first);
        }
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = TaskIdentifier::new("fetch");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"fetch\"");
    }
}
