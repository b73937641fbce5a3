//! Builder-pattern printer for rendering diagnostics.

use std::fmt::Write;

use annotate_snippets::{AnnotationKind, Group, Level, Renderer, Snippet};
use indexmap::IndexMap;

use super::Diagnostics;
use super::kind::Severity;
use crate::syntax::Span;

/// Renders diagnostics, annotated against source text where available.
///
/// Without sources every diagnostic renders on one line. Diagnostics whose
/// file has a registered source get an annotated snippet.
pub struct DiagnosticsPrinter<'s> {
    diagnostics: &'s Diagnostics,
    sources: IndexMap<&'s str, &'s str>,
    colored: bool,
}

impl<'s> DiagnosticsPrinter<'s> {
    pub fn new(diagnostics: &'s Diagnostics) -> Self {
        Self {
            diagnostics,
            sources: IndexMap::new(),
            colored: false,
        }
    }

    /// Register the text of `path`.
    pub fn source(mut self, path: &'s str, text: &'s str) -> Self {
        self.sources.insert(path, text);
        self
    }

    pub fn colored(mut self, value: bool) -> Self {
        self.colored = value;
        self
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        self.format(&mut out).expect("String write never fails");
        out
    }

    pub fn format(&self, w: &mut impl Write) -> std::fmt::Result {
        let renderer = if self.colored {
            Renderer::styled()
        } else {
            Renderer::plain()
        };

        for (i, diag) in self.diagnostics.sorted().iter().enumerate() {
            if i > 0 {
                w.write_char('\n')?;
            }

            let source = diag
                .file()
                .and_then(|f| self.sources.get(f).map(|text| (f, *text)));
            let (Some((path, text)), Some(span)) = (source, diag.span()) else {
                write!(w, "{diag}")?;
                continue;
            };

            let message = diag.text();
            let mut snippet = Snippet::source(text)
                .line_start(1)
                .path(path)
                .annotation(
                    AnnotationKind::Primary
                        .span(adjust_range(span, text.len()))
                        .label(&message),
                );

            for related in diag.related() {
                if related.file.as_deref().is_some_and(|f| f != path) {
                    continue;
                }
                snippet = snippet.annotation(
                    AnnotationKind::Context
                        .span(adjust_range(related.span, text.len()))
                        .label(&related.message),
                );
            }

            let level = severity_to_level(diag.severity());
            let title_group = level
                .primary_title(&message)
                .element(snippet)
                .elements(diag.hints().iter().map(|h| Level::HELP.message(h.as_str())));
            let report: Vec<Group> = vec![title_group];
            write!(w, "{}", renderer.render(&report))?;
        }

        Ok(())
    }
}

fn severity_to_level(severity: Severity) -> Level<'static> {
    match severity {
        Severity::Error => Level::ERROR,
        Severity::Warning => Level::WARNING,
    }
}

fn adjust_range(span: Span, limit: usize) -> std::ops::Range<usize> {
    let range = span.byte_range();
    let start = range.start.min(limit);
    let end = range.end.min(limit);

    if start == end {
        return start..(start + 1).min(limit);
    }

    start..end
}
