//! Engine-independent bundle diagnostics.
//!
//! Engines report failures in their own types; adapters convert them into
//! [`BundleDiagnostic`] so callers never depend on a particular bundler.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Failure category, mirroring the kinds bundlers commonly report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    ParseError,
    UnresolvedEntry,
    UnresolvedImport,
    MissingExport,
    Plugin,
    Transform,
    Other(String),
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ParseError => f.write_str("ParseError"),
            Self::UnresolvedEntry => f.write_str("UnresolvedEntry"),
            Self::UnresolvedImport => f.write_str("UnresolvedImport"),
            Self::MissingExport => f.write_str("MissingExport"),
            Self::Plugin => f.write_str("Plugin"),
            Self::Transform => f.write_str("Transform"),
            Self::Other(kind) => f.write_str(kind),
        }
    }
}

/// One error raised by the bundling engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleDiagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
}

impl BundleDiagnostic {
    pub fn new(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            file: None,
            help: None,
        }
    }

    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Classifies an opaque engine error by its debug rendering.
    pub fn from_debug(error: &dyn fmt::Debug) -> Self {
        let message = format!("{error:?}");
        let kind = classify(&message);
        let help = match kind {
            DiagnosticKind::UnresolvedImport => {
                Some("Check that the package is installed and the import path is correct.")
            }
            DiagnosticKind::UnresolvedEntry => {
                Some("Check that every route module listed in the manifest exists.")
            }
            DiagnosticKind::ParseError => Some("Check the module for syntax errors."),
            _ => None,
        };
        Self {
            kind,
            message,
            file: None,
            help: help.map(str::to_string),
        }
    }
}

impl fmt::Display for BundleDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.file {
            Some(file) => write!(f, "{}: {} ({file})", self.kind, self.message),
            None => write!(f, "{}: {}", self.kind, self.message),
        }
    }
}

fn classify(message: &str) -> DiagnosticKind {
    if message.contains("UnresolvedEntry") {
        DiagnosticKind::UnresolvedEntry
    } else if message.contains("UnresolvedImport") || message.contains("Could not resolve") {
        DiagnosticKind::UnresolvedImport
    } else if message.contains("MissingExport") {
        DiagnosticKind::MissingExport
    } else if message.contains("Parse") || message.contains("Syntax") {
        DiagnosticKind::ParseError
    } else if message.contains("Plugin") {
        DiagnosticKind::Plugin
    } else {
        DiagnosticKind::Other("Bundle".to_string())
    }
}

pub(crate) fn format_diagnostics(diagnostics: &[BundleDiagnostic]) -> String {
    match diagnostics {
        [] => "Unknown bundler error".to_string(),
        [single] => single.to_string(),
        many => format!(
            "{} errors: {}",
            many.len(),
            many.iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; ")
        ),
    }
}
