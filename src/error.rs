//! Error types for reading template metadata

use std::path::{Path, PathBuf};

use ariadne::{Color, Label, Report, ReportKind, Source};
use thiserror::Error;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

#[derive(Error, Debug)]
pub enum ParseError {
    /// The metadata block is not a valid JSON record
    #[error("malformed metadata block in {}: {source}", .path.display())]
    Metadata {
        path: PathBuf,
        span: Span,
        #[source]
        source: serde_json::Error,
    },

    /// A begin marker without a matching end marker
    #[error("unterminated metadata block in {} (opened on line {line})", .path.display())]
    Unterminated { path: PathBuf, line: usize, span: Span },
}

impl ParseError {
    /// Path of the template file that failed to parse
    pub fn path(&self) -> &Path {
        match self {
            ParseError::Metadata { path, .. } | ParseError::Unterminated { path, .. } => path,
        }
    }

    /// Location of the failure in the template file
    pub fn span(&self) -> &Span {
        match self {
            ParseError::Metadata { span, .. } | ParseError::Unterminated { span, .. } => span,
        }
    }

    /// Format the error with source context using ariadne
    pub fn format(&self, source: &str, filename: &str) -> String {
        let (message, label) = match self {
            ParseError::Metadata { source: err, .. } => (
                "malformed metadata block".to_string(),
                err.to_string(),
            ),
            ParseError::Unterminated { .. } => (
                "unterminated metadata block".to_string(),
                "block opened here is never closed".to_string(),
            ),
        };
        let span = clamp(self.span(), source.len());

        let mut buf = Vec::new();
        let written = Report::build(ReportKind::Error, filename, span.start)
            .with_message(&message)
            .with_label(
                Label::new((filename, span))
                    .with_message(label)
                    .with_color(Color::Red),
            )
            .finish()
            .write((filename, Source::from(source)), &mut buf);

        match written {
            Ok(()) => String::from_utf8_lossy(&buf).into_owned(),
            Err(_) => format!("{}: {}", filename, self),
        }
    }
}

/// Keep a span inside the source it points into
fn clamp(span: &Span, len: usize) -> Span {
    let start = span.start.min(len);
    let end = span.end.clamp(start, len);
    start..end
}
