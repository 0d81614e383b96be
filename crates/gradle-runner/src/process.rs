//! Child process execution.

use crate::runner::RunnerError;
use camino::Utf8Path;
use compiler_log::Stream;
use std::process::Stdio;
use tokio::io::AsyncReadExt;
use tokio::process::Command;

const CHUNK_SIZE: usize = 8 * 1024;

/// Runs a program and delivers its output as it arrives.
#[allow(async_fn_in_trait)]
pub trait ProcessExecutor {
    /// Runs `program` in `cwd` and returns its exit code.
    ///
    /// Every chunk is handed to `on_output` and fully handled before the next
    /// one is read. Chunks from the two streams may interleave. A non-zero
    /// exit code is returned, not raised.
    async fn run(
        &self,
        program: &Utf8Path,
        args: &[String],
        cwd: &Utf8Path,
        on_output: &mut dyn FnMut(Stream, &str),
    ) -> Result<i32, RunnerError>;
}

/// Spawns the program with tokio and reads both pipes on the current task.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioExecutor;

impl ProcessExecutor for TokioExecutor {
    async fn run(
        &self,
        program: &Utf8Path,
        args: &[String],
        cwd: &Utf8Path,
        on_output: &mut dyn FnMut(Stream, &str),
    ) -> Result<i32, RunnerError> {
        let mut child = Command::new(program)
            .args(args)
            .current_dir(cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(RunnerError::SpawnFailed)?;

        let mut stdout = child
            .stdout
            .take()
            .ok_or_else(|| RunnerError::ProcessFailed("failed to open gradle stdout".to_string()))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| RunnerError::ProcessFailed("failed to open gradle stderr".to_string()))?;

        let mut stdout_buf = vec![0u8; CHUNK_SIZE];
        let mut stderr_buf = vec![0u8; CHUNK_SIZE];
        let mut stdout_text = Utf8Chunker::default();
        let mut stderr_text = Utf8Chunker::default();
        let mut stdout_open = true;
        let mut stderr_open = true;

        while stdout_open || stderr_open {
            tokio::select! {
                read = stdout.read(&mut stdout_buf), if stdout_open => {
                    let n = read.map_err(|e| {
                        RunnerError::ProcessFailed(format!("failed to read gradle stdout: {e}"))
                    })?;
                    let text = if n == 0 {
                        stdout_open = false;
                        stdout_text.finish()
                    } else {
                        stdout_text.decode(&stdout_buf[..n])
                    };
                    if !text.is_empty() {
                        on_output(Stream::Stdout, &text);
                    }
                }
                read = stderr.read(&mut stderr_buf), if stderr_open => {
                    let n = read.map_err(|e| {
                        RunnerError::ProcessFailed(format!("failed to read gradle stderr: {e}"))
                    })?;
                    let text = if n == 0 {
                        stderr_open = false;
                        stderr_text.finish()
                    } else {
                        stderr_text.decode(&stderr_buf[..n])
                    };
                    if !text.is_empty() {
                        on_output(Stream::Stderr, &text);
                    }
                }
            }
        }

        let status = child
            .wait()
            .await
            .map_err(|e| RunnerError::ProcessFailed(format!("failed to wait for gradle: {e}")))?;

        Ok(status.code().unwrap_or(-1))
    }
}

/// Decodes one output pipe, holding back a character cut off by the end of a read.
///
/// Invalid sequences become `U+FFFD`.
#[derive(Debug, Default)]
struct Utf8Chunker {
    pending: Vec<u8>,
}

impl Utf8Chunker {
    /// Decodes `bytes` after any held-back prefix.
    fn decode(&mut self, bytes: &[u8]) -> String {
        let mut input = std::mem::take(&mut self.pending);
        input.extend_from_slice(bytes);

        let mut text = String::with_capacity(input.len());
        let mut rest = input.as_slice();
        loop {
            match std::str::from_utf8(rest) {
                Ok(valid) => {
                    text.push_str(valid);
                    break;
                }
                Err(e) => {
                    let (valid, after) = rest.split_at(e.valid_up_to());
                    text.push_str(std::str::from_utf8(valid).unwrap_or_default());
                    match e.error_len() {
                        Some(len) => {
                            text.push(char::REPLACEMENT_CHARACTER);
                            rest = &after[len..];
                        }
                        None => {
                            self.pending = after.to_vec();
                            break;
                        }
                    }
                }
            }
        }

        text
    }

    /// Flushes a truncated trailing sequence once the pipe has closed.
    fn finish(&mut self) -> String {
        let pending = std::mem::take(&mut self.pending);
        String::from_utf8_lossy(&pending).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_character_split_across_reads() {
        let bytes = "w: /src/Über.kt".as_bytes();
        let cut = "w: /src/".len() + 1;
        let mut chunker = Utf8Chunker::default();

        assert_eq!(chunker.decode(&bytes[..cut]), "w: /src/");
        assert_eq!(chunker.decode(&bytes[cut..]), "Über.kt");
        assert_eq!(chunker.finish(), "");
    }

    #[test]
    fn test_invalid_bytes_are_replaced() {
        let mut chunker = Utf8Chunker::default();
        assert_eq!(chunker.decode(b"a\xffb"), "a\u{fffd}b");
        assert_eq!(chunker.decode(b"c"), "c");
    }

    #[test]
    fn test_truncated_tail_at_end_of_stream() {
        let mut chunker = Utf8Chunker::default();
        assert_eq!(chunker.decode(b"ok \xe2\x82"), "ok ");
        assert_eq!(chunker.finish(), "\u{fffd}");
    }
}
