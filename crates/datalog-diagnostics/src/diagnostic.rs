use datalog_ast::Span;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DiagnosticKind {
    Warning,
    Error,
}

/// A message anchored at a source location.
#[derive(Debug, Clone, PartialEq)]
pub struct DiagnosticMessage {
    pub message: String,
    pub span: Span,
}

impl DiagnosticMessage {
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        DiagnosticMessage {
            message: message.into(),
            span,
        }
    }
}

impl fmt::Display for DiagnosticMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} in {}:{}-{}",
            self.message,
            self.span.src(),
            self.span.start(),
            self.span.end()
        )
    }
}

/// A single reported problem: a primary message plus any number of
/// secondary notes (e.g. the previous definition in a redefinition error).
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub primary: DiagnosticMessage,
    pub secondaries: Vec<DiagnosticMessage>,
}

impl Diagnostic {
    pub fn error(message: impl Into<String>, span: Span) -> Self {
        Diagnostic {
            kind: DiagnosticKind::Error,
            primary: DiagnosticMessage::new(message, span),
            secondaries: Vec::new(),
        }
    }

    pub fn warning(message: impl Into<String>, span: Span) -> Self {
        Diagnostic {
            kind: DiagnosticKind::Warning,
            primary: DiagnosticMessage::new(message, span),
            secondaries: Vec::new(),
        }
    }

    pub fn with_note(mut self, message: impl Into<String>, span: Span) -> Self {
        self.secondaries.push(DiagnosticMessage::new(message, span));
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            DiagnosticKind::Error => write!(f, "Error: {}", self.primary)?,
            DiagnosticKind::Warning => write!(f, "Warning: {}", self.primary)?,
        }
        for secondary in &self.secondaries {
            write!(f, "\n  {}", secondary)?;
        }
        Ok(())
    }
}
