//! Diagnostic types.

use serde::Serialize;
use std::fmt;

/// The severity of a classified compiler line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational output such as javac's `Note:` lines.
    Notice,
    /// A warning that doesn't fail compilation.
    Warning,
    /// A compilation error.
    Error,
}

impl Severity {
    /// Maps a level captured from a compiler line (`e`, `error`, `w`, `warning`).
    pub fn from_level(level: &str) -> Option<Self> {
        match level {
            "e" | "error" => Some(Severity::Error),
            "w" | "warning" => Some(Severity::Warning),
            _ => None,
        }
    }

    /// Returns the severity as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Notice => "notice",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The log dialect a diagnostic was recognized in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Dialect {
    /// `Foo.java:10: error: message`
    JavaCompiler,
    /// `e: Foo.kt: (10, 4): message`
    KotlinCompiler,
    /// `Note: Foo.java uses unchecked or unsafe operations.`
    JavaNotice,
}

impl Dialect {
    /// Returns the dialect name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Dialect::JavaCompiler => "java-compiler",
            Dialect::KotlinCompiler => "kotlin-compiler",
            Dialect::JavaNotice => "java-notice",
        }
    }
}

/// One classified line of compiler output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiagnosticRecord {
    /// The severity.
    pub severity: Severity,
    /// The source file, exactly as the compiler printed it.
    pub file_path: String,
    /// 1-indexed line number, if the dialect reports one.
    pub line: Option<u32>,
    /// 1-indexed column number, if the dialect reports one.
    pub column: Option<u32>,
    /// The message, or the whole raw line for dialects without a message field.
    pub message: String,
    /// The grammar that produced this record.
    pub dialect: Dialect,
}
