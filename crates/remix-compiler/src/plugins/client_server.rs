//! `.client` / `.server` module stripping.

use std::path::Path;

use crate::target::BuildTarget;

/// Replacement source for a stripped module.
pub const EMPTY_MODULE: &str = "export {};\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientServerFilter {
    target: BuildTarget,
}

impl ClientServerFilter {
    pub fn for_target(target: BuildTarget) -> Self {
        Self { target }
    }

    /// Marker of the modules this target must not contain.
    pub fn stripped_marker(&self) -> &'static str {
        match self.target {
            BuildTarget::Browser => "server",
            BuildTarget::Server => "client",
        }
    }

    /// True when the module at `id` is replaced with [`EMPTY_MODULE`].
    ///
    /// `foo.server.ts` is stripped from the browser build and `foo.client.tsx`
    /// from the server build; a marker anywhere but just before the extension
    /// does not count.
    pub fn strips(&self, id: &str) -> bool {
        Path::new(id)
            .file_stem()
            .and_then(|stem| stem.to_str())
            .and_then(|stem| stem.rsplit_once('.'))
            .is_some_and(|(_, marker)| marker == self.stripped_marker())
    }
}
