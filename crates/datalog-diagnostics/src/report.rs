use crate::{Diagnostic, DiagnosticKind};
use ariadne::{Label, Report, ReportKind, Source};
use datalog_ast::{Span, SrcId};
use std::collections::HashMap;
use std::fmt;

/// Accumulator for the diagnostics of a whole compilation.
#[derive(Debug, Clone, Default)]
pub struct ErrorReport {
    diagnostics: Vec<Diagnostic>,
}

impl ErrorReport {
    pub fn new() -> Self {
        ErrorReport::default()
    }

    pub fn add_diagnostic(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn add_error(&mut self, message: impl Into<String>, span: Span) {
        self.add_diagnostic(Diagnostic::error(message, span));
    }

    pub fn add_warning(&mut self, message: impl Into<String>, span: Span) {
        self.add_diagnostic(Diagnostic::warning(message, span));
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|diag| diag.kind == DiagnosticKind::Error)
    }

    pub fn num_errors(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|diag| diag.kind == DiagnosticKind::Error)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }

    /// Diagnostics sorted into source order (by file, then start offset),
    /// errors before warnings at the same location.
    pub fn sorted(&self) -> Vec<&Diagnostic> {
        let mut sorted: Vec<&Diagnostic> = self.diagnostics.iter().collect();
        sorted.sort_by(|a, b| {
            let key = |d: &Diagnostic| {
                (
                    d.primary.span.src().to_path(),
                    d.primary.span.start(),
                    std::cmp::Reverse(d.kind),
                )
            };
            key(a).cmp(&key(b))
        });
        sorted
    }

    /// Render every diagnostic as an ariadne report against the given
    /// source cache, in source order.
    pub fn write(&self, cache: &mut SourceCache, out: &mut impl std::io::Write) -> std::io::Result<()> {
        for diagnostic in self.sorted() {
            let kind = match diagnostic.kind {
                DiagnosticKind::Error => ReportKind::Error,
                DiagnosticKind::Warning => ReportKind::Warning,
            };
            let span = diagnostic.primary.span;
            let mut report = Report::build(kind, span.src(), span.start())
                .with_message(&diagnostic.primary.message)
                .with_label(Label::new(span).with_message(&diagnostic.primary.message));
            for secondary in &diagnostic.secondaries {
                report = report.with_label(
                    Label::new(secondary.span).with_message(&secondary.message),
                );
            }
            report.finish().write(&mut *cache, &mut *out)?;
        }
        Ok(())
    }
}

impl fmt::Display for ErrorReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for diagnostic in self.sorted() {
            writeln!(f, "{}", diagnostic)?;
        }
        Ok(())
    }
}

/// Maps source ids to their text for ariadne rendering.
#[derive(Default)]
pub struct SourceCache {
    sources: HashMap<SrcId, Source<String>>,
}

impl SourceCache {
    pub fn new() -> Self {
        SourceCache::default()
    }

    pub fn insert(&mut self, src: SrcId, text: impl Into<String>) {
        self.sources.insert(src, Source::from(text.into()));
    }
}

impl ariadne::Cache<SrcId> for SourceCache {
    type Storage = String;

    fn fetch(&mut self, id: &SrcId) -> Result<&Source<String>, Box<dyn fmt::Debug + '_>> {
        self.sources
            .get(id)
            .ok_or_else(|| Box::new(format!("unknown source {}", id)) as Box<dyn fmt::Debug>)
    }

    fn display<'a>(&self, id: &'a SrcId) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(*id))
    }
}
