//! Streaming classifier for Java and Kotlin compiler console output.
//!
//! Console output from a build tool arrives in arbitrary chunks. This crate
//! splits those chunks into lines, matches each line against a fixed set of
//! compiler log grammars, and reports the resulting diagnostics to a
//! [`DiagnosticSink`].
//!
//! # Example
//!
//! ```
//! use compiler_log::{PatternSet, Severity};
//!
//! let record = PatternSet::standard()
//!     .classify("e: /src/Bar.kt: (5, 12): unresolved reference")
//!     .unwrap();
//!
//! assert_eq!(record.severity, Severity::Error);
//! assert_eq!(record.file_path, "/src/Bar.kt");
//! assert_eq!(record.line, Some(5));
//! assert_eq!(record.column, Some(12));
//! ```

mod diagnostic;
mod emitter;
mod grammar;
mod processor;
mod sink;
mod splitter;

pub use diagnostic::{DiagnosticRecord, Dialect, Severity};
pub use emitter::emit;
pub use grammar::{Classification, LineGrammar, PatternSet};
pub use processor::LogProcessor;
pub use sink::{Annotation, AnnotationKind, AnnotationProperties, DiagnosticSink, MemorySink};
pub use splitter::{split_chunk, LineBuffer, SplitMode, Stream, MAX_PENDING_LINE};
