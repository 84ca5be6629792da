//! Tree-shaking hints per target.

use crate::target::BuildTarget;

const DEPENDENCY_DIR: &str = "node_modules";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TreeshakePolicy {
    /// Leave side-effect detection to the engine.
    #[default]
    Default,
    /// Treat app modules as side-effect free; dependency packages keep theirs.
    Aggressive,
}

impl TreeshakePolicy {
    pub fn for_target(target: BuildTarget) -> Self {
        match target {
            BuildTarget::Server => Self::Default,
            BuildTarget::Browser => Self::Aggressive,
        }
    }

    /// Side-effect override for a resolved module id; `None` defers to the engine.
    pub fn module_side_effects(&self, id: &str) -> Option<bool> {
        match self {
            Self::Default => None,
            Self::Aggressive => Some(is_dependency_module(id)),
        }
    }
}

/// True when `id` lives inside an installed package.
pub fn is_dependency_module(id: &str) -> bool {
    id.split(['/', '\\']).any(|segment| segment == DEPENDENCY_DIR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_defers_to_engine() {
        let policy = TreeshakePolicy::for_target(BuildTarget::Server);
        assert_eq!(policy.module_side_effects("/app/routes/index.tsx"), None);
        assert_eq!(policy.module_side_effects("/app/node_modules/react/index.js"), None);
    }

    #[test]
    fn browser_marks_only_dependencies_as_effectful() {
        let policy = TreeshakePolicy::for_target(BuildTarget::Browser);
        assert_eq!(policy.module_side_effects("/app/routes/index.tsx"), Some(false));
        assert_eq!(
            policy.module_side_effects("/app/node_modules/react/index.js"),
            Some(true)
        );
        assert_eq!(
            policy.module_side_effects(r"C:\app\node_modules\react\index.js"),
            Some(true)
        );
        assert_eq!(policy.module_side_effects("/app/my_node_modules/x.js"), Some(false));
    }
}
