//! Chains splitting, classification and emission for one build.

use crate::emitter::emit;
use crate::grammar::PatternSet;
use crate::sink::{AnnotationKind, AnnotationProperties, DiagnosticSink};
use crate::splitter::{split_chunk, LineBuffer, SplitMode, Stream};

/// Processes child output chunks as they arrive.
///
/// Lines that match a grammar are emitted as located annotations. Unmatched
/// stderr lines are reported as plain errors; unmatched stdout lines are
/// dropped.
#[derive(Debug)]
pub struct LogProcessor<'a> {
    patterns: &'a PatternSet,
    mode: SplitMode,
    stdout: LineBuffer,
    stderr: LineBuffer,
}

impl LogProcessor<'static> {
    /// Creates a processor over the standard javac/kotlinc grammars.
    pub fn new(mode: SplitMode) -> Self {
        Self::with_patterns(PatternSet::standard(), mode)
    }
}

impl<'a> LogProcessor<'a> {
    /// Creates a processor over a custom pattern set.
    pub fn with_patterns(patterns: &'a PatternSet, mode: SplitMode) -> Self {
        Self {
            patterns,
            mode,
            stdout: LineBuffer::new(),
            stderr: LineBuffer::new(),
        }
    }

    /// Returns the split mode.
    pub fn mode(&self) -> SplitMode {
        self.mode
    }

    /// Handles one chunk of output. The chunk is fully reported before returning.
    pub fn process<S: DiagnosticSink + ?Sized>(&mut self, stream: Stream, chunk: &str, sink: &mut S) {
        sink.transcript(stream, chunk);

        match self.mode {
            SplitMode::Tokens => {
                for (line, stream) in split_chunk(chunk, stream) {
                    self.process_line(line, stream, sink);
                }
            }
            SplitMode::Lines => {
                let lines = self.buffer(stream).push(chunk);
                for line in &lines {
                    self.process_line(line, stream, sink);
                }
            }
        }
    }

    /// Flushes fragments still waiting for a newline. Call once both streams have closed.
    pub fn finish<S: DiagnosticSink + ?Sized>(&mut self, sink: &mut S) {
        for stream in [Stream::Stdout, Stream::Stderr] {
            if let Some(line) = self.buffer(stream).finish() {
                self.process_line(&line, stream, sink);
            }
        }
    }

    /// Classifies and reports a single line.
    pub fn process_line<S: DiagnosticSink + ?Sized>(&self, line: &str, stream: Stream, sink: &mut S) {
        match self.patterns.classify(line) {
            Some(record) => {
                tracing::trace!(dialect = record.dialect.as_str(), %stream, "classified line");
                emit(&record, sink);
            }
            None if stream.is_stderr() => {
                sink.annotate(AnnotationKind::Error, line, &AnnotationProperties::default());
            }
            None => {}
        }
    }

    fn buffer(&mut self, stream: Stream) -> &mut LineBuffer {
        match stream {
            Stream::Stdout => &mut self.stdout,
            Stream::Stderr => &mut self.stderr,
        }
    }
}
