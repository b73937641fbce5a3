use std::fmt;

use serde::Serialize;

/// Diagnostic kinds, grouped by the phase that detects them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    // Structural declaration errors
    CannotContain,
    DuplicateDeclaration,
    KindClash,

    // Reference errors
    UnresolvedReference,
    AmbiguousReference,
    UnusedImport,

    // Grammar-shape errors
    CyclicInheritance,
    DuplicateLabel,
    IllegalActionDecoration,
    EmptyNonterminal,

    // Type errors
    LubConflict,
    TypeMismatch,
}

/// Coarse grouping of [`DiagnosticKind`]s.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Declaration,
    Reference,
    GrammarShape,
    Type,
}

impl DiagnosticKind {
    pub fn default_severity(&self) -> Severity {
        match self {
            Self::UnusedImport | Self::EmptyNonterminal => Severity::Warning,
            _ => Severity::Error,
        }
    }

    pub fn category(&self) -> Category {
        match self {
            Self::CannotContain | Self::DuplicateDeclaration | Self::KindClash => {
                Category::Declaration
            }
            Self::UnresolvedReference | Self::AmbiguousReference | Self::UnusedImport => {
                Category::Reference
            }
            Self::CyclicInheritance
            | Self::DuplicateLabel
            | Self::IllegalActionDecoration
            | Self::EmptyNonterminal => Category::GrammarShape,
            Self::LubConflict | Self::TypeMismatch => Category::Type,
        }
    }

    /// Message template. `{N}` is replaced by the N-th argument.
    pub fn template(&self) -> &'static str {
        match self {
            Self::CannotContain => "{0} `{1}` cannot contain {2} `{3}`",
            Self::DuplicateDeclaration => "{0} `{1}` is declared {2} times",
            Self::KindClash => "`{0}` is declared both as {1} and as {2}",

            Self::UnresolvedReference => "cannot resolve `{0}`",
            Self::AmbiguousReference => "`{0}` is ambiguous",
            Self::UnusedImport => "import `{0}` is never used",

            Self::CyclicInheritance => "{0} `{1}` inherits from itself",
            Self::DuplicateLabel => "label `{0}` is already defined",
            Self::IllegalActionDecoration => "{0} cannot be labeled or quantified",
            Self::EmptyNonterminal => "non-terminal `{0}` only derives the empty string",

            Self::LubConflict => "label `{0}` has incompatible types `{1}` and `{2}`",
            Self::TypeMismatch => "label `{0}` is declared as `{1}` but holds `{2}`",
        }
    }

    /// Render the template with `args`. Placeholders without an argument
    /// are kept verbatim.
    pub fn render(&self, args: &[String]) -> String {
        let template = self.template();
        let mut out = String::with_capacity(template.len() + 16);
        let mut rest = template;

        while let Some(open) = rest.find('{') {
            out.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            let Some(close) = after.find('}') else {
                out.push_str(&rest[open..]);
                return out;
            };
            match after[..close].parse::<usize>().ok().and_then(|i| args.get(i)) {
                Some(arg) => out.push_str(arg),
                None => out.push_str(&rest[open..open + close + 2]),
            }
            rest = &after[close + 1..];
        }
        out.push_str(rest);
        out
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}
