// src/core/prefix_filter.rs

use crate::models::EnvMap;

/// Keeps only the variables whose name starts with one of `prefixes`.
///
/// Matching is literal and case-sensitive. Empty prefixes are ignored, so an
/// empty list (or a list of only empty strings) disables filtering.
pub fn filter(env: EnvMap, prefixes: &[String]) -> EnvMap {
    let active: Vec<&str> = prefixes
        .iter()
        .map(String::as_str)
        .filter(|prefix| !prefix.is_empty())
        .collect();

    if active.is_empty() {
        return env;
    }

    env.into_iter()
        .filter(|(key, _)| active.iter().any(|prefix| key.starts_with(prefix)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &[(&str, &str)]) -> EnvMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn prefixes(list: &[&str]) -> Vec<String> {
        list.iter().map(|p| p.to_string()).collect()
    }

    #[test]
    fn single_prefix() {
        let filtered = filter(env(&[("VITE_X", "1"), ("OTHER", "2")]), &prefixes(&["VITE_"]));
        assert_eq!(filtered, env(&[("VITE_X", "1")]));
    }

    #[test]
    fn multiple_prefixes_are_ored() {
        let input = env(&[("VITE_FOO", "bar"), ("PUBLIC_BAZ", "qux"), ("SECRET", "hidden")]);
        let filtered = filter(input, &prefixes(&["VITE_", "PUBLIC_"]));
        assert_eq!(filtered, env(&[("VITE_FOO", "bar"), ("PUBLIC_BAZ", "qux")]));
    }

    #[test]
    fn no_prefixes_returns_input_unchanged() {
        let input = env(&[("A", "1"), ("B", "2")]);
        assert_eq!(filter(input.clone(), &[]), input);
    }

    #[test]
    fn empty_string_sentinel_means_no_filter() {
        let input = env(&[("A", "1"), ("B", "2")]);
        assert_eq!(filter(input.clone(), &prefixes(&[""])), input);
    }

    #[test]
    fn matching_is_case_sensitive_and_literal() {
        let input = env(&[("vite_lower", "1"), ("VITE_UPPER", "2"), ("VITE*", "3")]);
        let filtered = filter(input, &prefixes(&["VITE_"]));
        assert_eq!(filtered, env(&[("VITE_UPPER", "2")]));
    }
}
