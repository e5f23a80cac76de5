// src/core/interpolator.rs

use crate::models::EnvMap;
use lazy_static::lazy_static;
use regex::{Captures, Regex};
use std::collections::HashMap;
use std::fmt::Debug;

lazy_static! {
    /// `${NAME}` or `${NAME:-fallback}`.
    static ref PLACEHOLDER: Regex =
        Regex::new(r"\$\{([^{}:\s]+)(?::-([^}]*))?\}").expect("placeholder pattern is valid");
}

/// Where placeholders look when the definition files do not define a name.
///
/// The process environment is the production source; tests substitute a fixed map.
pub trait AmbientLookup: Debug {
    /// Returns the value of `name`, if defined.
    fn lookup(&self, name: &str) -> Option<String>;

    /// Returns every variable of this source.
    fn entries(&self) -> EnvMap;
}

/// The environment of the running process.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessEnv;

impl AmbientLookup for ProcessEnv {
    fn lookup(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }

    fn entries(&self) -> EnvMap {
        // Non-UTF-8 variables cannot be represented in an `EnvMap`; they are dropped.
        std::env::vars_os()
            .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
            .collect()
    }
}

impl AmbientLookup for HashMap<String, String> {
    fn lookup(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }

    fn entries(&self) -> EnvMap {
        self.clone()
    }
}

/// Expands `${NAME}` placeholders in one pass over the merge order.
///
/// A value can only see keys resolved before it and the ambient source. The
/// text substituted into a value is never scanned again, so reference cycles
/// and forward references stay literal instead of looping.
#[derive(Debug)]
pub struct Interpolator<'a> {
    ambient: &'a dyn AmbientLookup,
    resolved: EnvMap,
}

impl<'a> Interpolator<'a> {
    /// Creates an interpolator with nothing resolved yet.
    pub fn new(ambient: &'a dyn AmbientLookup) -> Self {
        Self {
            ambient,
            resolved: EnvMap::new(),
        }
    }

    /// Expands `raw` and records the result as the value of `key`, making it
    /// visible to every key resolved afterwards.
    pub fn resolve(&mut self, key: &str, raw: &str) -> String {
        let expanded = self.expand_string(raw);
        self.resolved.insert(key.to_string(), expanded.clone());
        expanded
    }

    /// Records `value` for `key` as-is, without expanding it.
    pub fn define(&mut self, key: &str, value: String) {
        self.resolved.insert(key.to_string(), value);
    }

    /// Expands every placeholder of `template` against the current state.
    ///
    /// Unknown names keep their placeholder text unless a `:-` fallback is given.
    pub fn expand_string(&self, template: &str) -> String {
        PLACEHOLDER
            .replace_all(template, |caps: &Captures<'_>| {
                let name = caps.get(1).map_or("", |m| m.as_str());
                if let Some(value) = self.lookup(name) {
                    return value;
                }
                match caps.get(2) {
                    Some(fallback) => fallback.as_str().to_string(),
                    None => caps.get(0).map_or("", |m| m.as_str()).to_string(),
                }
            })
            .into_owned()
    }

    /// Consumes the interpolator, returning every resolved key.
    pub fn into_resolved(self) -> EnvMap {
        self.resolved
    }

    fn lookup(&self, name: &str) -> Option<String> {
        self.resolved
            .get(name)
            .cloned()
            .or_else(|| self.ambient.lookup(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ambient(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn expands_previously_resolved_key() {
        let fixed = ambient(&[]);
        let mut interpolator = Interpolator::new(&fixed);
        interpolator.resolve("A", "1");
        assert_eq!(interpolator.resolve("B", "${A}"), "1");
    }

    #[test]
    fn expands_inside_surrounding_text() {
        let fixed = ambient(&[]);
        let mut interpolator = Interpolator::new(&fixed);
        interpolator.resolve("BASE_PORT", "3000");
        assert_eq!(
            interpolator.resolve("EXPANDED_PORT", "http://localhost:${BASE_PORT}/api"),
            "http://localhost:3000/api"
        );
    }

    #[test]
    fn unknown_name_stays_literal() {
        let fixed = ambient(&[]);
        let mut interpolator = Interpolator::new(&fixed);
        assert_eq!(
            interpolator.resolve("B", "${UNDEFINED_NAME}"),
            "${UNDEFINED_NAME}"
        );
    }

    #[test]
    fn falls_back_to_ambient() {
        let fixed = ambient(&[("HOME", "/home/dev")]);
        let mut interpolator = Interpolator::new(&fixed);
        assert_eq!(interpolator.resolve("CACHE", "${HOME}/.cache"), "/home/dev/.cache");
    }

    #[test]
    fn resolved_keys_shadow_ambient() {
        let fixed = ambient(&[("PORT", "80")]);
        let mut interpolator = Interpolator::new(&fixed);
        interpolator.resolve("PORT", "8080");
        assert_eq!(interpolator.resolve("URL", ":${PORT}"), ":8080");
    }

    #[test]
    fn forward_reference_stays_literal() {
        let fixed = ambient(&[]);
        let mut interpolator = Interpolator::new(&fixed);
        assert_eq!(interpolator.resolve("B", "${A}"), "${A}");
        interpolator.resolve("A", "1");
        assert_eq!(interpolator.into_resolved().get("B").map(String::as_str), Some("${A}"));
    }

    #[test]
    fn reference_cycle_terminates_with_literal_text() {
        let fixed = ambient(&[]);
        let mut interpolator = Interpolator::new(&fixed);
        assert_eq!(interpolator.resolve("A", "${B}"), "${B}");
        // `A` now holds the literal `${B}`; it is substituted but not rescanned.
        assert_eq!(interpolator.resolve("B", "${A}"), "${B}");
    }

    #[test]
    fn self_reference_uses_ambient_value() {
        let fixed = ambient(&[("PATH", "/usr/bin")]);
        let mut interpolator = Interpolator::new(&fixed);
        assert_eq!(
            interpolator.resolve("PATH", "/opt/tool/bin:${PATH}"),
            "/opt/tool/bin:/usr/bin"
        );
    }

    #[test]
    fn defined_values_are_not_expanded() {
        let fixed = ambient(&[("A", "1")]);
        let mut interpolator = Interpolator::new(&fixed);
        interpolator.define("RAW", "${A}".to_string());
        assert_eq!(interpolator.resolve("COPY", "${RAW}"), "${A}");
    }

    #[test]
    fn fallback_applies_only_when_unresolved() {
        let fixed = ambient(&[("SET", "yes")]);
        let interpolator = Interpolator::new(&fixed);
        assert_eq!(interpolator.expand_string("${UNSET:-default}"), "default");
        assert_eq!(interpolator.expand_string("${SET:-default}"), "yes");
        assert_eq!(interpolator.expand_string("${UNSET:-}"), "");
    }

    #[test]
    fn leaves_bare_dollar_text_untouched() {
        let fixed = ambient(&[("A", "1")]);
        let interpolator = Interpolator::new(&fixed);
        assert_eq!(interpolator.expand_string("$A costs $5"), "$A costs $5");
    }
}
