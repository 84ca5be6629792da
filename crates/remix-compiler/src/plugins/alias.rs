//! Browser-only module aliases.

use indexmap::IndexMap;

/// Runtime packages that ship a separate browser entry point.
const BROWSER_ALIASES: &[(&str, &str)] = &[("@remix-run/react", "@remix-run/react/browser")];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasMap {
    aliases: IndexMap<String, String>,
}

impl AliasMap {
    pub fn browser() -> Self {
        Self {
            aliases: BROWSER_ALIASES
                .iter()
                .map(|(from, to)| ((*from).to_string(), (*to).to_string()))
                .collect(),
        }
    }

    /// Exact-match lookup; subpath imports are not rewritten.
    pub fn rewrite(&self, specifier: &str) -> Option<&str> {
        self.aliases.get(specifier).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.aliases.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}
