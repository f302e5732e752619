//! Diagnostics and error reporting for Wren
//!
//! Every check failure is a [`CompileError`]. The first one aborts the pass. The only non-fatal diagnostic is a
//! [`Warning`], which the checker collects and also logs.
//!
//! ## Notes
//! - [`ErrorKind::Internal`] marks a broken checker invariant, not a problem in user source. Use
//!   [`CompileError::is_internal`] to tell the two apart.
//! - `CompileError` implements [`miette::Diagnostic`], so a harness holding the source text can render it with
//!   `miette::Report::new(err).with_source_code(src)`.

use std::fmt;

use miette::{Diagnostic, LabeledSpan, Severity};
use wren_syntax::ast::Span;

/// A compile-time error with optional location information
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct CompileError {
    pub message: String,
    pub span: Option<Span>,
    pub kind: ErrorKind,
    pub notes: Vec<String>,
    pub hints: Vec<String>,
}

impl CompileError {
    pub fn new(kind: ErrorKind, message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span: Some(span),
            kind,
            notes: Vec::new(),
            hints: Vec::new(),
        }
    }

    /// An error with no source position attached.
    pub fn unlocated(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            span: None,
            kind,
            notes: Vec::new(),
            hints: Vec::new(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::unlocated(ErrorKind::Internal, message)
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hints.push(hint.into());
        self
    }

    pub fn is_internal(&self) -> bool {
        self.kind == ErrorKind::Internal
    }
}

impl Diagnostic for CompileError {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(format!("wren::{}", self.kind.code())))
    }

    fn severity(&self) -> Option<Severity> {
        Some(Severity::Error)
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        if self.hints.is_empty() && self.notes.is_empty() {
            return None;
        }
        let lines: Vec<String> = self
            .hints
            .iter()
            .cloned()
            .chain(self.notes.iter().map(|n| format!("note: {}", n)))
            .collect();
        Some(Box::new(lines.join("\n")))
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let span = self.span?;
        let label = LabeledSpan::new(Some(self.kind.to_string()), span.start, span.len());
        Some(Box::new(std::iter::once(label)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NameResolution,
    TypeMismatch,
    ArgumentMismatch,
    ArityMismatch,
    ReturnTypeMismatch,
    TooManyReturnTypes,
    MissingAnnotation,
    NonLiteralDefault,
    NotAnInstance,
    UnknownProperty,
    DuplicateProperty,
    NotConstructible,
    NoInitializer,
    InitializerCollision,
    NoAssociatedMulti,
    MultipleDefaults,
    BlockAlreadyReturned,
    InvalidStatement,
    InvalidExpression,
    UnresolvedType,
    /// A checker invariant was violated
    Internal,
}

impl ErrorKind {
    pub fn code(self) -> &'static str {
        match self {
            ErrorKind::NameResolution => "name_resolution",
            ErrorKind::TypeMismatch => "type_mismatch",
            ErrorKind::ArgumentMismatch => "argument_mismatch",
            ErrorKind::ArityMismatch => "arity_mismatch",
            ErrorKind::ReturnTypeMismatch => "return_type_mismatch",
            ErrorKind::TooManyReturnTypes => "too_many_return_types",
            ErrorKind::MissingAnnotation => "missing_annotation",
            ErrorKind::NonLiteralDefault => "non_literal_default",
            ErrorKind::NotAnInstance => "not_an_instance",
            ErrorKind::UnknownProperty => "unknown_property",
            ErrorKind::DuplicateProperty => "duplicate_property",
            ErrorKind::NotConstructible => "not_constructible",
            ErrorKind::NoInitializer => "no_initializer",
            ErrorKind::InitializerCollision => "initializer_collision",
            ErrorKind::NoAssociatedMulti => "no_associated_multi",
            ErrorKind::MultipleDefaults => "multiple_defaults",
            ErrorKind::BlockAlreadyReturned => "block_already_returned",
            ErrorKind::InvalidStatement => "invalid_statement",
            ErrorKind::InvalidExpression => "invalid_expression",
            ErrorKind::UnresolvedType => "unresolved_type",
            ErrorKind::Internal => "internal",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Internal => write!(f, "internal error"),
            ErrorKind::NameResolution => write!(f, "name error"),
            _ => write!(f, "type error"),
        }
    }
}

/// Advisory diagnostic; checking continues after it is raised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    pub message: String,
    pub span: Option<Span>,
}

impl Warning {
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span: Some(span),
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "warning: {}", self.message)
    }
}

// ============================================================================
// Error catalog
// ============================================================================

/// Constructors for every user-facing error, so wording stays consistent.
pub mod errors {
    use super::*;

    pub fn unknown_symbol(name: &str, span: Span) -> CompileError {
        CompileError::new(ErrorKind::NameResolution, format!("Unknown symbol '{}'", name), span)
            .with_hint("Declare it with `let` or `var` before using it")
    }

    pub fn assign_to_undeclared(name: &str, span: Span) -> CompileError {
        CompileError::new(
            ErrorKind::NameResolution,
            format!("Cannot assign to undeclared name '{}'", name),
            span,
        )
        .with_hint(format!("Declare it first: var {} = ...", name))
    }

    pub fn type_mismatch(expected: impl fmt::Display, found: impl fmt::Display, span: Span) -> CompileError {
        CompileError::new(
            ErrorKind::TypeMismatch,
            format!("Type mismatch: expected '{}', found '{}'", expected, found),
            span,
        )
    }

    pub fn argument_mismatch(
        index: usize,
        expected: impl fmt::Display,
        found: impl fmt::Display,
        span: Span,
    ) -> CompileError {
        CompileError::new(
            ErrorKind::ArgumentMismatch,
            format!(
                "Argument {} has the wrong type: expected '{}', found '{}'",
                index, expected, found
            ),
            span,
        )
    }

    pub fn arity_mismatch(expected: usize, found: usize, span: Span) -> CompileError {
        CompileError::new(
            ErrorKind::ArityMismatch,
            format!("Wrong number of arguments: expected {}, got {}", expected, found),
            span,
        )
    }

    pub fn return_type_mismatch(expected: impl fmt::Display, found: impl fmt::Display, span: Span) -> CompileError {
        CompileError::new(
            ErrorKind::ReturnTypeMismatch,
            format!("Return type mismatch: declared '{}', found '{}'", expected, found),
            span,
        )
    }

    pub fn too_many_return_types(found: &[String], span: Span) -> CompileError {
        CompileError::new(
            ErrorKind::TooManyReturnTypes,
            format!("Too many return types (have {})", found.join(", ")),
            span,
        )
        .with_hint("Declare a return type, or make every return produce the same type")
    }

    pub fn missing_annotation(what: &str, span: Span) -> CompileError {
        CompileError::new(ErrorKind::MissingAnnotation, format!("Missing type annotation for {}", what), span)
    }

    pub fn non_literal_default(property: &str, span: Span) -> CompileError {
        CompileError::new(
            ErrorKind::NonLiteralDefault,
            format!("Default value for property '{}' must be a literal", property),
            span,
        )
        .with_note("Computed property defaults are not supported; assign them in an `init` block")
    }

    pub fn not_an_instance(found: impl fmt::Display, span: Span) -> CompileError {
        CompileError::new(
            ErrorKind::NotAnInstance,
            format!("Expected a value, found {}", found),
            span,
        )
    }

    pub fn unknown_property(owner: impl fmt::Display, property: &str, span: Span) -> CompileError {
        CompileError::new(
            ErrorKind::UnknownProperty,
            format!("'{}' has no property '{}'", owner, property),
            span,
        )
    }

    pub fn duplicate_property(class: &str, property: &str, span: Span) -> CompileError {
        CompileError::new(
            ErrorKind::DuplicateProperty,
            format!("Property '{}' is already defined on class '{}'", property, class),
            span,
        )
    }

    pub fn not_constructible(name: &str, found: impl fmt::Display, span: Span) -> CompileError {
        CompileError::new(
            ErrorKind::NotConstructible,
            format!("Cannot construct '{}': it is {}, not a class", name, found),
            span,
        )
    }

    pub fn no_initializer(class: &str, span: Span) -> CompileError {
        CompileError::new(
            ErrorKind::NoInitializer,
            format!("Class '{}' has no initializers", class),
            span,
        )
        .with_hint("Add an `init` block to the class body")
    }

    pub fn initializer_collision(class: &str, arity: usize, span: Span) -> CompileError {
        CompileError::new(
            ErrorKind::InitializerCollision,
            format!("Class '{}' has more than one initializer taking {} arguments", class, arity),
            span,
        )
        .with_note("Initializers are selected by argument count")
    }

    pub fn no_associated_multi(name: &str, span: Span) -> CompileError {
        CompileError::new(
            ErrorKind::NoAssociatedMulti,
            format!("Failed to find associated multi statement for function '{}'", name),
            span,
        )
        .with_hint(format!("Declare `multi {} (...)` in the same block", name))
    }

    pub fn multiple_defaults(multi: &str, count: usize) -> CompileError {
        CompileError::unlocated(
            ErrorKind::MultipleDefaults,
            format!("Multi '{}' has more than 1 default branch (has {})", multi, count),
        )
        .with_hint("Give all but one implementation a `when` guard")
    }

    pub fn block_already_returned(span: Span) -> CompileError {
        CompileError::new(ErrorKind::BlockAlreadyReturned, "Block already has a return statement", span)
    }

    pub fn invalid_statement(what: &str, span: Span) -> CompileError {
        CompileError::new(ErrorKind::InvalidStatement, what.to_string(), span)
    }

    pub fn invalid_expression(what: &str, span: Span) -> CompileError {
        CompileError::new(ErrorKind::InvalidExpression, what.to_string(), span)
    }

    pub fn not_callable(found: impl fmt::Display, span: Span) -> CompileError {
        CompileError::new(
            ErrorKind::TypeMismatch,
            format!("'{}' is not a function and cannot be called", found),
            span,
        )
    }

    pub fn unresolved_return(span: Span) -> CompileError {
        CompileError::new(
            ErrorKind::UnresolvedType,
            "Return type of the called function has not been inferred yet",
            span,
        )
        .with_hint("Declare the function's return type to call it recursively")
    }

    pub fn unresolved_type(name: &str, span: Span) -> CompileError {
        CompileError::new(
            ErrorKind::UnresolvedType,
            format!("Type of '{}' is not known yet", name),
            span,
        )
        .with_hint("Give the binding an explicit type annotation")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_sets_kind_and_span() {
        let err = errors::type_mismatch("Int", "String", Span::new(3, 9));
        assert_eq!(err.kind, ErrorKind::TypeMismatch);
        assert_eq!(err.span, Some(Span::new(3, 9)));
        assert_eq!(err.to_string(), "type error: Type mismatch: expected 'Int', found 'String'");
    }

    #[test]
    fn test_internal_errors_are_flagged() {
        assert!(CompileError::internal("boom").is_internal());
        assert!(!errors::unknown_symbol("x", Span::default()).is_internal());
    }

    #[test]
    fn test_diagnostic_code_and_label() {
        let err = errors::unknown_symbol("y", Span::new(10, 11));
        let code = err.code().map(|c| c.to_string());
        assert_eq!(code.as_deref(), Some("wren::name_resolution"));

        let labels: Vec<LabeledSpan> = err.labels().into_iter().flatten().collect();
        assert_eq!(labels.len(), 1);
        assert_eq!(labels[0].offset(), 10);
        assert_eq!(labels[0].len(), 1);
    }

    #[test]
    fn test_help_joins_hints_and_notes() {
        let err = errors::initializer_collision("Point", 2, Span::default());
        let help = err.help().map(|h| h.to_string()).unwrap_or_default();
        assert!(help.contains("note: Initializers are selected by argument count"));
    }

    #[test]
    fn test_unlocated_error_has_no_labels() {
        let err = errors::multiple_defaults("fib", 2);
        assert!(err.labels().is_none());
        assert!(err.message.contains("has 2"));
    }
}
