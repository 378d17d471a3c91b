//! Error types for companion generation.

use thiserror::Error;

use crate::diagnostics::{self, Diagnostic};
use crate::model::SourceLocation;

/// Reasons generation of one target can fail.
///
/// A failure never crosses targets: the pipeline turns it into a
/// [`Diagnostic`] and moves on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerateError {
    /// The target, or an interface it references, has no declaration.
    #[error("type '{name}' could not be resolved")]
    TargetUnresolved {
        /// Unresolved type reference.
        name: String,
        /// Annotation location.
        location: Option<SourceLocation>,
    },

    /// The target cannot host a companion type.
    #[error("type '{name}' cannot have a null object companion: {reason}")]
    NotExtensible {
        /// Target name.
        name: String,
        /// Why the declaration is not eligible.
        reason: String,
        /// Annotation location.
        location: Option<SourceLocation>,
    },

    /// A type, member or parameter name required for emission is empty.
    #[error("required name missing in {context}")]
    RequiredNameMissing {
        /// What was being emitted.
        context: String,
        /// Annotation location.
        location: Option<SourceLocation>,
    },

    /// Anything else: malformed policy argument, unsupported member shape,
    /// colliding output file.
    #[error("unexpected error: {detail}")]
    Unexpected {
        /// Description of the failure.
        detail: String,
        /// Annotation location.
        location: Option<SourceLocation>,
    },
}

/// Result type for generation operations.
pub type GenerateResult<T> = Result<T, GenerateError>;

impl GenerateError {
    /// Shorthand for [`GenerateError::Unexpected`] without a location.
    pub fn unexpected(detail: impl Into<String>) -> Self {
        GenerateError::Unexpected {
            detail: detail.into(),
            location: None,
        }
    }

    /// Location the error is reported at.
    pub fn location(&self) -> Option<&SourceLocation> {
        match self {
            GenerateError::TargetUnresolved { location, .. }
            | GenerateError::NotExtensible { location, .. }
            | GenerateError::RequiredNameMissing { location, .. }
            | GenerateError::Unexpected { location, .. } => location.as_ref(),
        }
    }

    /// Fill in `fallback` when the error carries no location yet.
    pub fn or_location(mut self, fallback: Option<&SourceLocation>) -> Self {
        let slot = match &mut self {
            GenerateError::TargetUnresolved { location, .. }
            | GenerateError::NotExtensible { location, .. }
            | GenerateError::RequiredNameMissing { location, .. }
            | GenerateError::Unexpected { location, .. } => location,
        };
        if slot.is_none() {
            *slot = fallback.cloned();
        }
        self
    }

    /// Convert into the diagnostic reported to the host.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let location = self.location().cloned();
        match self {
            GenerateError::TargetUnresolved { name, .. } => {
                Diagnostic::new(&diagnostics::TARGET_UNRESOLVED, location, vec![name.clone()])
            }
            GenerateError::NotExtensible { name, reason, .. } => Diagnostic::new(
                &diagnostics::NOT_EXTENSIBLE,
                location,
                vec![name.clone(), reason.clone()],
            ),
            GenerateError::RequiredNameMissing { context, .. } => Diagnostic::new(
                &diagnostics::REQUIRED_NAME_MISSING,
                location,
                vec![context.clone()],
            ),
            GenerateError::Unexpected { detail, .. } => {
                Diagnostic::new(&diagnostics::UNEXPECTED, location, vec![detail.clone()])
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn location() -> SourceLocation {
        SourceLocation {
            path: "Foo.cs".into(),
            line: 4,
            column: 2,
        }
    }

    #[test]
    fn error_display_messages() {
        let err = GenerateError::TargetUnresolved {
            name: "Demo.IFoo".into(),
            location: None,
        };
        assert_eq!(err.to_string(), "type 'Demo.IFoo' could not be resolved");

        let err = GenerateError::RequiredNameMissing {
            context: "method parameter".into(),
            location: None,
        };
        assert_eq!(err.to_string(), "required name missing in method parameter");

        let err = GenerateError::unexpected("bad flag");
        assert_eq!(err.to_string(), "unexpected error: bad flag");
    }

    #[test]
    fn or_location_keeps_existing_location() {
        let own = SourceLocation {
            path: "Bar.cs".into(),
            line: 1,
            column: 1,
        };
        let err = GenerateError::Unexpected {
            detail: "x".into(),
            location: Some(own.clone()),
        }
        .or_location(Some(&location()));
        assert_eq!(err.location(), Some(&own));

        let err = GenerateError::unexpected("x").or_location(Some(&location()));
        assert_eq!(err.location(), Some(&location()));
    }

    #[test]
    fn diagnostic_ids_per_variant() {
        let cases = [
            (
                GenerateError::Unexpected {
                    detail: "x".into(),
                    location: None,
                },
                "NOG001",
            ),
            (
                GenerateError::TargetUnresolved {
                    name: "x".into(),
                    location: None,
                },
                "NOG002",
            ),
            (
                GenerateError::NotExtensible {
                    name: "x".into(),
                    reason: "static".into(),
                    location: None,
                },
                "NOG003",
            ),
            (
                GenerateError::RequiredNameMissing {
                    context: "x".into(),
                    location: None,
                },
                "NOG004",
            ),
        ];
        for (err, id) in cases {
            assert_eq!(err.to_diagnostic().descriptor.id, id);
        }
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<GenerateError>();
    }
}
