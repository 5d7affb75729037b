//! Environment variables resolved per lookup.

use figment::providers::Env;
use serde_json::Value;

use crate::LazyLayer;

/// Lazy layer mapping key paths onto upper-cased variable names.
///
/// Path `["db", "host"]` with prefix `app` reads `APP_DB_HOST`; without a
/// prefix it reads `DB_HOST`. Unset and empty variables are misses. The
/// environment is consulted on every lookup, so changes show up immediately
/// without any reload.
#[derive(Debug, Clone)]
pub struct PrefixedEnvLayer {
    prefix: String,
    name: String,
}

impl PrefixedEnvLayer {
    /// Resolve keys under `prefix`. An empty prefix reads bare names.
    #[must_use]
    pub fn new(prefix: &str) -> Self {
        let prefix = prefix.to_ascii_uppercase();
        let name = if prefix.is_empty() {
            "environment".to_owned()
        } else {
            format!("environment ({prefix}_*)")
        };
        Self { prefix, name }
    }

    /// Variable consulted for `path`.
    #[must_use]
    pub fn variable_for(&self, path: &[&str]) -> String {
        let joined = path.join("_").to_ascii_uppercase();
        if self.prefix.is_empty() {
            joined
        } else {
            format!("{}_{joined}", self.prefix)
        }
    }
}

impl LazyLayer for PrefixedEnvLayer {
    fn name(&self) -> &str {
        &self.name
    }

    fn get(&self, path: &[&str]) -> Option<Value> {
        let variable = self.variable_for(path);
        if variable.is_empty() {
            return None;
        }
        Env::var(&variable)
            .filter(|value| !value.is_empty())
            .map(Value::String)
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use rstest::rstest;
    use serde_json::json;
    use test_helpers::figment::with_jail;

    use super::PrefixedEnvLayer;
    use crate::LazyLayer;

    #[rstest]
    #[case("app", &["db", "host"], "APP_DB_HOST")]
    #[case("", &["db", "host"], "DB_HOST")]
    #[case("Svc", &["Port"], "SVC_PORT")]
    fn builds_variable_names(#[case] prefix: &str, #[case] path: &[&str], #[case] expected: &str) {
        assert_eq!(PrefixedEnvLayer::new(prefix).variable_for(path), expected);
    }

    #[rstest]
    fn resolves_set_variables_only() -> Result<()> {
        let (hit, empty, unset) = with_jail(|jail| {
            jail.set_env("ONIONTEST_DB_HOST", "db.local");
            jail.set_env("ONIONTEST_DB_USER", "");
            let layer = PrefixedEnvLayer::new("oniontest");
            Ok((
                layer.get(&["db", "host"]),
                layer.get(&["db", "user"]),
                layer.get(&["db", "pass"]),
            ))
        })?;
        assert_eq!(hit, Some(json!("db.local")));
        assert_eq!(empty, None);
        assert_eq!(unset, None);
        Ok(())
    }
}
