//! Diagnostic sink shared by every phase.
//!
//! Phases report through `&Diagnostics`; appends are serialized by an
//! internal lock so parallel declaration collection can report freely.

mod kind;
mod message;
mod printer;


use std::sync::Arc;

use parking_lot::Mutex;

pub use kind::{Category, DiagnosticKind, Severity};
pub use message::{DiagnosticMessage, RelatedInfo};
pub use printer::DiagnosticsPrinter;

use crate::syntax::Span;

#[derive(Debug, Default)]
pub struct Diagnostics {
    messages: Mutex<Vec<DiagnosticMessage>>,
}

#[must_use = "diagnostic not emitted, call .emit()"]
pub struct DiagnosticBuilder<'a> {
    diagnostics: &'a Diagnostics,
    message: DiagnosticMessage,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a diagnostic of `kind` located at `span`.
    pub fn report(&self, kind: DiagnosticKind, span: Span) -> DiagnosticBuilder<'_> {
        DiagnosticBuilder {
            diagnostics: self,
            message: DiagnosticMessage::new(kind, Some(span)),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.messages.lock().is_empty()
    }

    pub fn len(&self) -> usize {
        self.messages.lock().len()
    }

    pub fn has_errors(&self) -> bool {
        self.messages.lock().iter().any(|d| d.is_error())
    }

    pub fn has_warnings(&self) -> bool {
        self.messages.lock().iter().any(|d| d.is_warning())
    }

    pub fn error_count(&self) -> usize {
        self.messages.lock().iter().filter(|d| d.is_error()).count()
    }

    pub fn warning_count(&self) -> usize {
        self.messages.lock().iter().filter(|d| d.is_warning()).count()
    }

    /// All diagnostics in emission order.
    pub fn messages(&self) -> Vec<DiagnosticMessage> {
        self.messages.lock().clone()
    }

    /// All diagnostics ordered by file, then position, then emission order.
    pub fn sorted(&self) -> Vec<DiagnosticMessage> {
        let mut out = self.messages();
        out.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
        out
    }

    pub fn of_kind(&self, kind: DiagnosticKind) -> Vec<DiagnosticMessage> {
        self.messages
            .lock()
            .iter()
            .filter(|d| d.kind == kind)
            .cloned()
            .collect()
    }

    pub fn count_of(&self, kind: DiagnosticKind) -> usize {
        self.messages.lock().iter().filter(|d| d.kind == kind).count()
    }

    pub fn printer(&self) -> DiagnosticsPrinter<'_> {
        DiagnosticsPrinter::new(self)
    }

    /// Plain one-line-per-diagnostic rendering, sorted.
    pub fn render(&self) -> String {
        self.printer().render()
    }
}

impl Clone for Diagnostics {
    fn clone(&self) -> Self {
        Self {
            messages: Mutex::new(self.messages()),
        }
    }
}

impl<'a> DiagnosticBuilder<'a> {
    /// Append a template argument.
    pub fn arg(mut self, value: impl ToString) -> Self {
        self.message.args.push(value.to_string());
        self
    }

    pub fn file(mut self, file: Option<Arc<str>>) -> Self {
        self.message.file = file;
        self
    }

    pub fn severity(mut self, severity: Severity) -> Self {
        self.message.severity = severity;
        self
    }

    pub fn related_to(
        mut self,
        msg: impl Into<String>,
        file: Option<Arc<str>>,
        span: Span,
    ) -> Self {
        self.message.related.push(RelatedInfo {
            file,
            span,
            message: msg.into(),
        });
        self
    }

    /// Extra context rendered under the message.
    pub fn hint(mut self, hint: impl Into<String>) -> Self {
        self.message.hints.push(hint.into());
        self
    }

    pub fn emit(self) {
        let mut messages = self.diagnostics.messages.lock();
        let mut message = self.message;
        message.seq = messages.len() as u64;
        messages.push(message);
    }
}
