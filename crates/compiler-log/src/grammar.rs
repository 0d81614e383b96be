//! Compiler log grammars.
//!
//! Each grammar is a regular expression with named capture groups drawn from
//! `path`, `line`, `level`, `position` and `message`. Grammars are tried in a
//! fixed order and the first match wins, so a line is attributed to at most
//! one dialect.

use crate::diagnostic::{DiagnosticRecord, Dialect, Severity};
use regex::Regex;
use std::sync::OnceLock;

/// `<path>:<line>: <error|warning>:<message>`
const JAVA_COMPILER_PATTERN: &str =
    r"(?P<path>.*):(?P<line>\d+): (?P<level>error|warning):(?P<message>.*)";

/// `<e|w>: <path>: (<line>, <position>): <message>`
const KOTLIN_COMPILER_PATTERN: &str =
    r"(?P<level>e|w): (?P<path>.*): \((?P<line>\d+), (?P<position>\d+)\): (?P<message>.*)";

/// `Note: <path>.java <rest>`
const JAVA_NOTICE_PATTERN: &str = r"Note: (?P<path>.*\.java) .*";

/// The outcome of matching one grammar against one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// The grammar recognized the line.
    Matched(DiagnosticRecord),
    /// The grammar does not apply to the line.
    NoMatch,
}

impl Classification {
    /// Returns the record if the line matched.
    pub fn into_record(self) -> Option<DiagnosticRecord> {
        match self {
            Classification::Matched(record) => Some(record),
            Classification::NoMatch => None,
        }
    }
}

/// A single recognized log dialect.
#[derive(Debug, Clone)]
pub struct LineGrammar {
    dialect: Dialect,
    pattern: Regex,
    fixed_severity: Option<Severity>,
}

impl LineGrammar {
    /// Creates a grammar whose severity is read from the `level` group.
    pub fn new(dialect: Dialect, pattern: Regex) -> Self {
        Self {
            dialect,
            pattern,
            fixed_severity: None,
        }
    }

    /// Forces every match of this grammar to the given severity.
    pub fn with_fixed_severity(mut self, severity: Severity) -> Self {
        self.fixed_severity = Some(severity);
        self
    }

    /// Returns the dialect this grammar recognizes.
    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Returns the severity override, if any.
    pub fn fixed_severity(&self) -> Option<Severity> {
        self.fixed_severity
    }

    /// Matches this grammar against a line.
    pub fn try_match(&self, line: &str) -> Classification {
        let Some(caps) = self.pattern.captures(line) else {
            return Classification::NoMatch;
        };

        let severity = match self.fixed_severity {
            Some(severity) => severity,
            None => match caps
                .name("level")
                .and_then(|level| Severity::from_level(level.as_str()))
            {
                Some(severity) => severity,
                None => return Classification::NoMatch,
            },
        };

        let Some(path) = caps.name("path") else {
            return Classification::NoMatch;
        };

        Classification::Matched(DiagnosticRecord {
            severity,
            file_path: path.as_str().to_string(),
            line: caps.name("line").and_then(|m| parse_position(m.as_str())),
            column: caps.name("position").and_then(|m| parse_position(m.as_str())),
            message: caps
                .name("message")
                .map_or(line, |m| m.as_str())
                .to_string(),
            dialect: self.dialect,
        })
    }
}

/// Parses a 1-based line or column. Zero and overflowing values are dropped.
fn parse_position(digits: &str) -> Option<u32> {
    digits.parse::<u32>().ok().filter(|value| *value > 0)
}

/// An ordered, immutable collection of grammars.
#[derive(Debug, Clone)]
pub struct PatternSet {
    grammars: Vec<LineGrammar>,
}

impl PatternSet {
    /// Creates a pattern set that tries `grammars` in the given order.
    pub fn new(grammars: Vec<LineGrammar>) -> Self {
        Self { grammars }
    }

    /// The javac/kotlinc pattern set: Java compiler, Kotlin compiler, Java notice.
    pub fn standard() -> &'static PatternSet {
        static STANDARD: OnceLock<PatternSet> = OnceLock::new();
        STANDARD.get_or_init(|| {
            PatternSet::new(vec![
                LineGrammar::new(
                    Dialect::JavaCompiler,
                    Regex::new(JAVA_COMPILER_PATTERN).expect("valid regex"),
                ),
                LineGrammar::new(
                    Dialect::KotlinCompiler,
                    Regex::new(KOTLIN_COMPILER_PATTERN).expect("valid regex"),
                ),
                LineGrammar::new(
                    Dialect::JavaNotice,
                    Regex::new(JAVA_NOTICE_PATTERN).expect("valid regex"),
                )
                .with_fixed_severity(Severity::Notice),
            ])
        })
    }

    /// Returns the grammars in priority order.
    pub fn grammars(&self) -> &[LineGrammar] {
        &self.grammars
    }

    /// Classifies a line using the first grammar that matches it.
    pub fn classify(&self, line: &str) -> Option<DiagnosticRecord> {
        self.grammars
            .iter()
            .find_map(|grammar| grammar.try_match(line).into_record())
    }
}
