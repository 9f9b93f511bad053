//! Per-element drop reports returned next to load/validate results.

use std::fmt;

use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Severity {
    Warning,
    Error,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Position {
    /// 1-based source line.
    Line(usize),
    /// 0-based index into the loaded records, plus the line it came from.
    Sample { index: usize, line: usize },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum SkipReason {
    InvalidJson(String),
    Read(String),
    MissingMessages,
    EmptyMessages,
    NotAnArray,
    MalformedMessage { message: usize },
    NonStringField { message: usize, field: &'static str },
}

impl SkipReason {
    pub fn severity(&self) -> Severity {
        match self {
            SkipReason::InvalidJson(_) | SkipReason::Read(_) => Severity::Error,
            _ => Severity::Warning,
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::InvalidJson(e) => write!(f, "JSON parse error: {e}"),
            SkipReason::Read(e) => write!(f, "IO read error: {e}"),
            SkipReason::MissingMessages => f.write_str("Missing 'messages' key"),
            SkipReason::EmptyMessages => f.write_str("No messages"),
            SkipReason::NotAnArray => f.write_str("'messages' is not a list"),
            SkipReason::MalformedMessage { message } => {
                write!(f, "Invalid message structure (message {message})")
            }
            SkipReason::NonStringField { message, field } => {
                write!(f, "'{field}' is not a string (message {message})")
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub position: Position,
    pub reason: SkipReason,
}

impl Diagnostic {
    pub fn severity(&self) -> Severity {
        self.reason.severity()
    }

    /// Emit the matching tracing event. Called once per drop.
    pub(crate) fn log(&self) {
        match self.severity() {
            Severity::Warning => tracing::warn!("{self}"),
            Severity::Error => tracing::error!("{self}"),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.position {
            Position::Line(n) => write!(f, "Line {n}: {}", self.reason),
            Position::Sample { index, line } => {
                write!(f, "Sample {index} (line {line}): {}", self.reason)
            }
        }
    }
}

pub fn count_by_severity(diagnostics: &[Diagnostic], severity: Severity) -> usize {
    diagnostics.iter().filter(|d| d.severity() == severity).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_formats() {
        let d = Diagnostic { position: Position::Line(3), reason: SkipReason::MissingMessages };
        assert_eq!(d.to_string(), "Line 3: Missing 'messages' key");

        let d = Diagnostic {
            position: Position::Sample { index: 0, line: 2 },
            reason: SkipReason::EmptyMessages,
        };
        assert_eq!(d.to_string(), "Sample 0 (line 2): No messages");

        let d = Diagnostic {
            position: Position::Sample { index: 4, line: 9 },
            reason: SkipReason::NonStringField { message: 1, field: "content" },
        };
        assert_eq!(d.to_string(), "Sample 4 (line 9): 'content' is not a string (message 1)");
        assert_eq!(d.severity(), Severity::Warning);
    }

    #[test]
    fn test_severity_split() {
        let ds = vec![
            Diagnostic { position: Position::Line(1), reason: SkipReason::InvalidJson("eof".into()) },
            Diagnostic { position: Position::Line(2), reason: SkipReason::MissingMessages },
            Diagnostic { position: Position::Line(3), reason: SkipReason::Read("bad utf-8".into()) },
        ];
        assert_eq!(count_by_severity(&ds, Severity::Error), 2);
        assert_eq!(count_by_severity(&ds, Severity::Warning), 1);
    }
}
