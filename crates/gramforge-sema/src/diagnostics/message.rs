use std::fmt;
use std::sync::Arc;

use serde::{Serialize, Serializer};

use super::kind::{DiagnosticKind, Severity};
use crate::syntax::Span;

/// Secondary location attached to a diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelatedInfo {
    #[serde(
        serialize_with = "serialize_file",
        skip_serializing_if = "Option::is_none"
    )]
    pub file: Option<Arc<str>>,
    pub span: Span,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticMessage {
    pub(crate) kind: DiagnosticKind,
    pub(crate) severity: Severity,
    pub(crate) file: Option<Arc<str>>,
    pub(crate) span: Option<Span>,
    pub(crate) args: Vec<String>,
    pub(crate) related: Vec<RelatedInfo>,
    pub(crate) hints: Vec<String>,
    pub(crate) seq: u64,
}

impl DiagnosticMessage {
    pub(crate) fn new(kind: DiagnosticKind, span: Option<Span>) -> Self {
        Self {
            kind,
            severity: kind.default_severity(),
            file: None,
            span,
            args: Vec::new(),
            related: Vec::new(),
            hints: Vec::new(),
            seq: 0,
        }
    }

    pub fn kind(&self) -> DiagnosticKind {
        self.kind
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn file(&self) -> Option<&str> {
        self.file.as_deref()
    }

    pub fn span(&self) -> Option<Span> {
        self.span
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn related(&self) -> &[RelatedInfo] {
        &self.related
    }

    pub fn hints(&self) -> &[String] {
        &self.hints
    }

    /// Message text with arguments substituted into the kind's template.
    pub fn text(&self) -> String {
        self.kind.render(&self.args)
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    pub fn is_warning(&self) -> bool {
        self.severity == Severity::Warning
    }

    pub(crate) fn sort_key(&self) -> (Option<&str>, Option<u32>, Option<u32>, u64) {
        (
            self.file.as_deref(),
            self.span.map(|s| s.start.offset),
            self.span.map(|s| s.end.offset),
            self.seq,
        )
    }
}

impl fmt::Display for DiagnosticMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.severity, self.text())?;
        match (&self.file, self.span) {
            (Some(file), Some(span)) => write!(f, " at {file}:{span}")?,
            (None, Some(span)) => write!(f, " at {span}")?,
            (Some(file), None) => write!(f, " in {file}")?,
            (None, None) => {}
        }
        for related in &self.related {
            match &related.file {
                Some(file) => write!(f, "\n  note: {} at {file}:{}", related.message, related.span)?,
                None => write!(f, "\n  note: {} at {}", related.message, related.span)?,
            }
        }
        for hint in &self.hints {
            write!(f, "\n  help: {hint}")?;
        }
        Ok(())
    }
}

impl Serialize for DiagnosticMessage {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;
        let mut state = s.serialize_struct("DiagnosticMessage", 7)?;
        state.serialize_field("kind", &self.kind)?;
        state.serialize_field("severity", &self.severity)?;
        state.serialize_field("message", &self.text())?;
        if let Some(file) = self.file() {
            state.serialize_field("file", file)?;
        } else {
            state.skip_field("file")?;
        }
        if let Some(span) = &self.span {
            state.serialize_field("span", span)?;
        } else {
            state.skip_field("span")?;
        }
        if self.related.is_empty() {
            state.skip_field("related")?;
        } else {
            state.serialize_field("related", &self.related)?;
        }
        if self.hints.is_empty() {
            state.skip_field("hints")?;
        } else {
            state.serialize_field("hints", &self.hints)?;
        }
        state.end()
    }
}

fn serialize_file<S: Serializer>(file: &Option<Arc<str>>, s: S) -> Result<S::Ok, S::Error> {
    match file.as_deref() {
        Some(file) => s.serialize_str(file),
        None => s.serialize_none(),
    }
}
