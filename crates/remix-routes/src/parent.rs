//! Parent inference for convention routes.
//!
//! Nesting is inferred purely from id strings. The policy sits behind
//! [`ParentStrategy`] so it can be swapped without touching the resolver.

/// Chooses the parent of a route id among the other known ids.
pub trait ParentStrategy: Send + Sync {
    /// Returns the parent of `id` among `candidates`, or `None` for a top-level route.
    ///
    /// `candidates` may contain `id` itself; implementations must never return it.
    fn find_parent<'a>(&self, id: &str, candidates: &'a [String]) -> Option<&'a str>;
}

/// Longest-prefix-wins parent inference.
///
/// `A` is the parent of `B` when `B` starts with `A/` and no other candidate is a
/// longer such prefix.
///
/// Known limitation: ids are compared as text, so any id that happens to be a
/// `/`-terminated prefix of another is treated as its parent even when the two
/// files were not meant to nest.
#[derive(Debug, Clone, Copy, Default)]
pub struct LongestPrefix;

impl ParentStrategy for LongestPrefix {
    fn find_parent<'a>(&self, id: &str, candidates: &'a [String]) -> Option<&'a str> {
        candidates
            .iter()
            .filter(|candidate| {
                id.len() > candidate.len()
                    && id.starts_with(candidate.as_str())
                    && id.as_bytes()[candidate.len()] == b'/'
            })
            .max_by_key(|candidate| candidate.len())
            .map(String::as_str)
    }
}
