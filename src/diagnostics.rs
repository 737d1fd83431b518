//! Diagnostics collected while extracting emotes
//!
//! Extraction never prints. Every stage pushes notices, warnings and errors
//! into a [`Diagnostics`] collector owned by the caller, which decides how to
//! report them (the CLI prints them to stderr).

/// Severity of a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Notice,
    Warning,
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Notice => write!(f, "NOTICE"),
            Severity::Warning => write!(f, "WARNING"),
            Severity::Error => write!(f, "ERROR"),
        }
    }
}

/// What a diagnostic is about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// A selector occurs both inside and outside an ignore region
    SplitSelector,
    /// Selector carries a pseudo-class both before and after the href
    MultiplePseudoClasses,
    /// Pseudo-class other than :hover, :active or :nth-of-type(n)
    UnknownPseudoClass,
    /// A later rule changed a property an earlier rule already set
    RedefinedProperty,
    /// Spritesheet emote has a property that isn't geometry
    ExtraProperty,
    /// More than one emote in a spritesheet has no background-position
    UnpositionedEmotes,
    /// An ignored emote is extracted because it was requested
    ExplicitExtraction,
}

impl std::fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DiagnosticKind::SplitSelector => write!(f, "split_selector"),
            DiagnosticKind::MultiplePseudoClasses => write!(f, "multiple_pseudo_classes"),
            DiagnosticKind::UnknownPseudoClass => write!(f, "unknown_pseudo_class"),
            DiagnosticKind::RedefinedProperty => write!(f, "redefined_property"),
            DiagnosticKind::ExtraProperty => write!(f, "extra_property"),
            DiagnosticKind::UnpositionedEmotes => write!(f, "unpositioned_emotes"),
            DiagnosticKind::ExplicitExtraction => write!(f, "explicit_extraction"),
        }
    }
}

/// A single reported issue
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub kind: DiagnosticKind,
    /// Human-readable message
    pub message: String,
    /// Selector, emote identifier or spritesheet url the issue refers to
    pub context: Option<String>,
}

impl Diagnostic {
    pub fn notice(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self { severity: Severity::Notice, kind, message: message.into(), context: None }
    }

    pub fn warning(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self { severity: Severity::Warning, kind, message: message.into(), context: None }
    }

    pub fn error(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self { severity: Severity::Error, kind, message: message.into(), context: None }
    }

    /// Attach context to this diagnostic
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.severity, self.message)?;
        if let Some(context) = &self.context {
            write!(f, " ({})", context)?;
        }
        Ok(())
    }
}

/// Ordered collector of diagnostics
#[derive(Debug, Default, Clone)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.entries.push(diagnostic);
    }

    /// All diagnostics in the order they were reported
    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Diagnostics of one kind, in report order
    pub fn of_kind(&self, kind: DiagnosticKind) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter().filter(move |d| d.kind == kind)
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.entries.iter().filter(|d| d.severity == severity).count()
    }

    pub fn has_errors(&self) -> bool {
        self.count(Severity::Error) > 0
    }

    pub fn has_warnings(&self) -> bool {
        self.count(Severity::Warning) > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_with_context() {
        let d = Diagnostic::warning(DiagnosticKind::ExtraProperty, "extra property 'color'")
            .with_context("smile");
        assert_eq!(d.to_string(), "WARNING: extra property 'color' (smile)");
    }

    #[test]
    fn test_display_without_context() {
        let d = Diagnostic::notice(DiagnosticKind::ExplicitExtraction, "extracting ignored emote");
        assert_eq!(d.to_string(), "NOTICE: extracting ignored emote");
    }

    #[test]
    fn test_counts() {
        let mut diags = Diagnostics::new();
        assert!(diags.is_empty());
        diags.push(Diagnostic::warning(DiagnosticKind::SplitSelector, "a"));
        diags.push(Diagnostic::warning(DiagnosticKind::RedefinedProperty, "b"));
        diags.push(Diagnostic::error(DiagnosticKind::UnpositionedEmotes, "c"));

        assert_eq!(diags.len(), 3);
        assert_eq!(diags.count(Severity::Warning), 2);
        assert_eq!(diags.count(Severity::Notice), 0);
        assert!(diags.has_errors());
        assert!(diags.has_warnings());
        assert_eq!(diags.of_kind(DiagnosticKind::SplitSelector).count(), 1);
    }

    #[test]
    fn test_order_preserved() {
        let mut diags = Diagnostics::new();
        diags.push(Diagnostic::error(DiagnosticKind::UnpositionedEmotes, "first"));
        diags.push(Diagnostic::notice(DiagnosticKind::ExplicitExtraction, "second"));
        let messages: Vec<_> = diags.entries().iter().map(|d| d.message.as_str()).collect();
        assert_eq!(messages, vec!["first", "second"]);
    }
}
