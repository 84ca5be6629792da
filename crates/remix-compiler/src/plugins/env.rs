//! Build-time environment substitution.

use indexmap::IndexMap;

use crate::target::BuildMode;

/// Expressions replaced with JSON literals at build time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvReplacements {
    values: IndexMap<String, String>,
}

impl EnvReplacements {
    pub fn for_mode(mode: BuildMode) -> Self {
        let mut values = IndexMap::new();
        values.insert(
            "process.env.NODE_ENV".to_string(),
            serde_json::Value::String(mode.as_str().to_string()).to_string(),
        );
        Self { values }
    }

    pub fn get(&self, expression: &str) -> Option<&str> {
        self.values.get(expression).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Rewritten source, or `None` when nothing matched.
    ///
    /// Matches are textual but must not be followed by an identifier
    /// character, so `process.env.NODE_ENVIRONMENT` is left alone.
    pub fn apply(&self, code: &str) -> Option<String> {
        let mut changed = false;
        let mut output = code.to_string();
        for (expression, value) in &self.values {
            if !output.contains(expression.as_str()) {
                continue;
            }
            let mut rewritten = String::with_capacity(output.len());
            let mut rest = output.as_str();
            while let Some(at) = rest.find(expression.as_str()) {
                let end = at + expression.len();
                let continues = rest[end..]
                    .chars()
                    .next()
                    .is_some_and(|c| c.is_alphanumeric() || c == '_' || c == '$');
                rewritten.push_str(&rest[..at]);
                if continues {
                    rewritten.push_str(expression);
                } else {
                    rewritten.push_str(value);
                    changed = true;
                }
                rest = &rest[end..];
            }
            rewritten.push_str(rest);
            output = rewritten;
        }
        changed.then_some(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaces_node_env_with_quoted_mode() {
        let env = EnvReplacements::for_mode(BuildMode::Production);
        let code = "if (process.env.NODE_ENV !== \"production\") warn();";
        assert_eq!(
            env.apply(code).as_deref(),
            Some("if (\"production\" !== \"production\") warn();")
        );
    }

    #[test]
    fn leaves_longer_identifiers_and_unrelated_code() {
        let env = EnvReplacements::for_mode(BuildMode::Development);
        assert_eq!(env.apply("process.env.NODE_ENVIRONMENT"), None);
        assert_eq!(env.apply("const x = 1;"), None);
        assert_eq!(env.get("process.env.NODE_ENV"), Some("\"development\""));
    }
}
