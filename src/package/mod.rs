//! Package inspection and installation
//!
//! The coordinator only depends on the [`PackageManager`] trait. The
//! concrete [`PipInstaller`] drives `python -m pip`.

mod pip;

pub use pip::PipInstaller;

use crate::requirements::{InstallOptions, Requirement};
use async_trait::async_trait;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::debug;

/// Max number of installer output lines kept for failure diagnostics.
const ERROR_TAIL_LINES: usize = 30;

/// External package inspection/installation primitive
#[async_trait]
pub trait PackageManager: Send + Sync {
    /// Whether the specifier is already satisfied
    async fn is_installed(&self, requirement: &Requirement) -> bool;

    /// Install one specifier, returning whether the installer succeeded
    async fn install_package(&self, requirement: &Requirement, options: &InstallOptions) -> bool;

    /// Human-readable installer name for display
    fn name(&self) -> &'static str;
}

/// Keep the useful tail of installer output for error diagnostics.
pub(crate) fn output_tail(lines: &[String]) -> String {
    let start = lines.len().saturating_sub(ERROR_TAIL_LINES);
    lines[start..].join("\n")
}

#[derive(Debug, Clone, Copy)]
enum Pipe {
    Stdout,
    Stderr,
}

impl Pipe {
    fn close<O, E>(self, stdout: &mut Option<O>, stderr: &mut Option<E>) {
        match self {
            Pipe::Stdout => *stdout = None,
            Pipe::Stderr => *stderr = None,
        }
    }
}

/// Read one line, replacing invalid UTF-8 rather than failing on it.
///
/// Bytes left in `buf` by a read cancelled inside `select!` are kept and
/// completed by the next call. Returns `None` at end of stream.
async fn next_line_lossy<R>(reader: &mut R, buf: &mut Vec<u8>) -> std::io::Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
{
    let read = reader.read_until(b'\n', buf).await?;
    if read == 0 && buf.is_empty() {
        return Ok(None);
    }
    let line = String::from_utf8_lossy(buf)
        .trim_end_matches(['\n', '\r'])
        .to_string();
    buf.clear();
    Ok(Some(line))
}

/// Stream stdout+stderr from a child process, calling `on_output` for each line.
///
/// Both pipes are drained to end of stream so the child never blocks on a
/// full pipe. A pipe that fails to read is dropped, which closes it.
/// Returns all collected output lines for error reporting.
pub(crate) async fn stream_child_output(
    child: &mut tokio::process::Child,
    on_output: &(dyn Fn(&str) + Send + Sync),
) -> Vec<String> {
    let mut stdout_reader = child.stdout.take().map(BufReader::new);
    let mut stderr_reader = child.stderr.take().map(BufReader::new);
    let mut stdout_buf = Vec::new();
    let mut stderr_buf = Vec::new();

    let mut all_output = Vec::new();

    while stderr_reader.is_some() || stdout_reader.is_some() {
        let (line, pipe) = tokio::select! {
            line = async {
                match stderr_reader.as_mut() {
                    Some(reader) => next_line_lossy(reader, &mut stderr_buf).await,
                    None => Ok(None),
                }
            }, if stderr_reader.is_some() => (line, Pipe::Stderr),
            line = async {
                match stdout_reader.as_mut() {
                    Some(reader) => next_line_lossy(reader, &mut stdout_buf).await,
                    None => Ok(None),
                }
            }, if stdout_reader.is_some() => (line, Pipe::Stdout),
        };

        match line {
            Ok(Some(line)) => {
                on_output(&line);
                all_output.push(line);
            }
            Ok(None) => pipe.close(&mut stdout_reader, &mut stderr_reader),
            Err(e) => {
                debug!("Stopped reading installer {:?}: {}", pipe, e);
                pipe.close(&mut stdout_reader, &mut stderr_reader);
            }
        }
    }

    all_output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_tail_keeps_last_lines() {
        let lines: Vec<String> = (0..100).map(|i| format!("line {i}")).collect();
        let tail = output_tail(&lines);
        assert_eq!(tail.lines().count(), ERROR_TAIL_LINES);
        assert!(tail.ends_with("line 99"));
        assert!(tail.starts_with("line 70"));
    }

    #[test]
    fn output_tail_short_input() {
        let lines = vec!["only".to_string()];
        assert_eq!(output_tail(&lines), "only");
    }

    #[tokio::test]
    async fn next_line_lossy_replaces_invalid_utf8() {
        let mut reader = BufReader::new(&b"ok\r\n\xff\xfe tail\nlast"[..]);
        let mut buf = Vec::new();

        let first = next_line_lossy(&mut reader, &mut buf).await.unwrap();
        assert_eq!(first.as_deref(), Some("ok"));
        let second = next_line_lossy(&mut reader, &mut buf).await.unwrap();
        assert_eq!(second.as_deref(), Some("\u{fffd}\u{fffd} tail"));
        let third = next_line_lossy(&mut reader, &mut buf).await.unwrap();
        assert_eq!(third.as_deref(), Some("last"));
        assert!(next_line_lossy(&mut reader, &mut buf).await.unwrap().is_none());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn stream_drains_both_pipes_past_invalid_utf8() {
        use std::process::Stdio;
        use std::sync::atomic::{AtomicUsize, Ordering};
        use std::time::Duration;

        // Invalid bytes first, then far more stderr than a pipe buffer holds
        let script = r"printf 'bad \377\376 bytes\n'; \
            i=0; while [ $i -lt 5000 ]; do \
            echo 'progress line padding padding padding padding padding' >&2; \
            i=$((i+1)); done; echo done";
        let mut child = tokio::process::Command::new("sh")
            .args(["-c", script])
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .unwrap();

        let seen = AtomicUsize::new(0);
        let on_output = |_: &str| {
            seen.fetch_add(1, Ordering::SeqCst);
        };
        let lines = tokio::time::timeout(
            Duration::from_secs(10),
            stream_child_output(&mut child, &on_output),
        )
        .await
        .expect("output streaming stalled");
        let status = child.wait().await.unwrap();

        assert!(status.success());
        assert_eq!(lines.len(), 5002);
        assert_eq!(seen.load(Ordering::SeqCst), 5002);
        assert!(lines.iter().any(|line| line == "bad \u{fffd}\u{fffd} bytes"));
        assert!(lines.iter().any(|line| line == "done"));
    }
}
