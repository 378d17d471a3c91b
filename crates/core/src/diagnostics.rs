//! Diagnostics reported to the host when a target fails.

use std::fmt;
use std::mem;
use std::sync::{Mutex, PoisonError};

use crate::model::SourceLocation;

/// Diagnostic severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// Generation failed for the target.
    Error,
    /// Generation succeeded with a caveat.
    Warning,
    /// Informational.
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
        })
    }
}

/// Static description of one kind of diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiagnosticDescriptor {
    /// Stable identifier, e.g. `NOG002`.
    pub id: &'static str,
    /// Short title.
    pub title: &'static str,
    /// Message template with positional `{0}`, `{1}` placeholders.
    pub message_format: &'static str,
    /// Category.
    pub category: &'static str,
    /// Default severity.
    pub severity: Severity,
}

const CATEGORY: &str = "NullObjectGenerator";

/// Unexpected failure while generating a companion.
pub const UNEXPECTED: DiagnosticDescriptor = DiagnosticDescriptor {
    id: "NOG001",
    title: "Unexpected error during null object generation",
    message_format: "Unexpected error occurred during null object generation: {0}",
    category: "Usage",
    severity: Severity::Error,
};

/// Annotated type or one of its interfaces could not be resolved.
pub const TARGET_UNRESOLVED: DiagnosticDescriptor = DiagnosticDescriptor {
    id: "NOG002",
    title: "Null object target not found",
    message_format: "Type '{0}' referenced by a null object annotation could not be resolved",
    category: CATEGORY,
    severity: Severity::Error,
};

/// Annotated type cannot host a companion.
pub const NOT_EXTENSIBLE: DiagnosticDescriptor = DiagnosticDescriptor {
    id: "NOG003",
    title: "Null object target is not extensible",
    message_format: "Type '{0}' cannot have a null object companion: {1}",
    category: CATEGORY,
    severity: Severity::Error,
};

/// A name needed for emission is empty.
pub const REQUIRED_NAME_MISSING: DiagnosticDescriptor = DiagnosticDescriptor {
    id: "NOG004",
    title: "Null object name not found",
    message_format: "Required name not found in {0}",
    category: CATEGORY,
    severity: Severity::Error,
};

/// Every descriptor the generator can report.
pub const ALL: [&DiagnosticDescriptor; 4] = [
    &UNEXPECTED,
    &TARGET_UNRESOLVED,
    &NOT_EXTENSIBLE,
    &REQUIRED_NAME_MISSING,
];

/// One reported diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// What kind of diagnostic this is.
    pub descriptor: &'static DiagnosticDescriptor,
    /// Where it applies, when known.
    pub location: Option<SourceLocation>,
    /// Values substituted into the message template.
    pub arguments: Vec<String>,
}

impl Diagnostic {
    /// Create a diagnostic.
    pub fn new(
        descriptor: &'static DiagnosticDescriptor,
        location: Option<SourceLocation>,
        arguments: Vec<String>,
    ) -> Self {
        Self {
            descriptor,
            location,
            arguments,
        }
    }

    /// Severity of the descriptor.
    pub fn severity(&self) -> Severity {
        self.descriptor.severity
    }

    /// Message with every `{n}` placeholder replaced by its argument.
    /// Placeholders without an argument are left as written.
    pub fn message(&self) -> String {
        let mut message = self.descriptor.message_format.to_string();
        for (i, argument) in self.arguments.iter().enumerate() {
            message = message.replace(&format!("{{{i}}}"), argument);
        }
        message
    }
}

/// Compiler style: `path(line,col): error NOG002: message`.
impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(location) = &self.location {
            write!(f, "{location}: ")?;
        }
        write!(
            f,
            "{} {}: {}",
            self.descriptor.severity,
            self.descriptor.id,
            self.message()
        )
    }
}

/// Receiver for diagnostics. Reports may arrive from several threads.
pub trait DiagnosticSink: Send + Sync {
    /// Deliver one diagnostic.
    fn report(&self, diagnostic: Diagnostic);
}

/// Sink that keeps every diagnostic in memory.
#[derive(Debug, Default)]
pub struct CollectingSink {
    diagnostics: Mutex<Vec<Diagnostic>>,
}

impl CollectingSink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the diagnostics reported so far.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Remove and return every collected diagnostic.
    pub fn drain(&self) -> Vec<Diagnostic> {
        let mut guard = self
            .diagnostics
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        mem::take(&mut *guard)
    }

    /// Whether any error-severity diagnostic was reported.
    pub fn has_errors(&self) -> bool {
        self.diagnostics()
            .iter()
            .any(|diagnostic| diagnostic.severity() == Severity::Error)
    }
}

impl DiagnosticSink for CollectingSink {
    fn report(&self, diagnostic: Diagnostic) {
        let mut guard = self
            .diagnostics
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        guard.push(diagnostic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_ids_are_unique() {
        let mut ids: Vec<_> = ALL.iter().map(|descriptor| descriptor.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), ALL.len());
    }

    #[test]
    fn test_message_substitutes_arguments() {
        let diagnostic = Diagnostic::new(
            &NOT_EXTENSIBLE,
            None,
            vec!["Demo.Util".into(), "static classes cannot implement interfaces".into()],
        );
        assert_eq!(
            diagnostic.message(),
            "Type 'Demo.Util' cannot have a null object companion: static classes cannot implement interfaces"
        );
    }

    #[test]
    fn test_message_keeps_missing_placeholders() {
        let diagnostic = Diagnostic::new(&NOT_EXTENSIBLE, None, vec!["Demo.Util".into()]);
        assert!(diagnostic.message().ends_with(": {1}"));
    }

    #[test]
    fn test_display_compiler_style() {
        let diagnostic = Diagnostic::new(
            &TARGET_UNRESOLVED,
            Some(SourceLocation {
                path: "Class1.cs".into(),
                line: 7,
                column: 5,
            }),
            vec!["Demo.IMissing".into()],
        );
        assert_eq!(
            diagnostic.to_string(),
            "Class1.cs(7,5): error NOG002: Type 'Demo.IMissing' referenced by a null object annotation could not be resolved"
        );
    }

    #[test]
    fn test_collecting_sink() {
        let sink = CollectingSink::new();
        assert!(!sink.has_errors());
        sink.report(Diagnostic::new(&UNEXPECTED, None, vec!["x".into()]));
        assert!(sink.has_errors());
        assert_eq!(sink.diagnostics().len(), 1);
        assert_eq!(sink.drain().len(), 1);
        assert!(sink.diagnostics().is_empty());
    }
}
