// aaxsplit - AAX audiobook to per-chapter MP3 converter
// Copyright (C) 2025 Henning Berge
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.


//! External process execution with concurrent stream draining
//!
//! # Pipe-deadlock invariant
//!
//! A child process writing to a full pipe blocks until the parent reads
//! from it. Reading one stream to exhaustion before touching the other
//! therefore deadlocks as soon as the child emits more than the kernel
//! pipe buffer (~64 KiB) on the unread stream. Both streams are drained
//! here by independently scheduled tasks, joined before the process exit
//! status is collected. Nothing in this module must ever await one stream
//! while the other is left unread.
//!
//! # Capture semantics
//!
//! Each stream is read in chunks of up to 1 MiB and decoded as UTF-8 with
//! undecodable bytes replaced, never failing the capture. Chunk order is
//! preserved within a stream; the two streams carry no ordering relative
//! to each other.

use crate::error::{AaxSplitError, Result};
use std::ffi::OsStr;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::AsyncReadExt;
use tokio::process::Command;
use tracing::trace;

/// Maximum bytes consumed per read call while draining a stream
const READ_CHUNK_BYTES: usize = 1024 * 1024;

/// Captured result of a completed child process
///
/// Owned exclusively by the caller; the runner keeps nothing across
/// invocations.
#[derive(Debug)]
pub struct ProcessResult {
    /// Child exit code (-1 if terminated by signal)
    pub exit_code: i32,
    /// Concatenated standard-output capture
    pub stdout: String,
    /// Concatenated standard-error capture
    pub stderr: String,
}

impl ProcessResult {
    /// Whether the child reported success
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Render a program + argument list the way a shell user would type it,
/// for logging and error reporting.
pub fn render_command(program: &OsStr, args: &[String]) -> String {
    let mut rendered = program.to_string_lossy().into_owned();
    for arg in args {
        rendered.push(' ');
        rendered.push_str(arg);
    }
    rendered
}

/// Launches external programs and captures their output
///
/// The runner does not interpret exit codes; callers decide what a
/// non-zero status means for them.
pub struct ProcessRunner;

impl ProcessRunner {
    /// Run `program` with `args` to completion, capturing both output
    /// streams concurrently.
    ///
    /// # Errors
    /// - `ToolNotFound` if the program does not exist
    /// - `Launch` for any other spawn failure
    pub async fn run(program: impl AsRef<OsStr>, args: &[String]) -> Result<ProcessResult> {
        let program = program.as_ref();
        let program_name = program.to_string_lossy().into_owned();

        let mut child = Command::new(program)
            .args(args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            // Lets a dropped run future (e.g. an expired deadline in
            // run_with_timeout) take the child down with it.
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    AaxSplitError::ToolNotFound(program_name.clone())
                } else {
                    AaxSplitError::Launch {
                        program: program_name.clone(),
                        source: e,
                    }
                }
            })?;

        let stdout = child.stdout.take().ok_or_else(|| AaxSplitError::Launch {
            program: program_name.clone(),
            source: std::io::Error::new(std::io::ErrorKind::Other, "stdout pipe not captured"),
        })?;
        let stderr = child.stderr.take().ok_or_else(|| AaxSplitError::Launch {
            program: program_name.clone(),
            source: std::io::Error::new(std::io::ErrorKind::Other, "stderr pipe not captured"),
        })?;

        // Both pipes drained concurrently; see module docs.
        let stdout_task = tokio::spawn(drain_stream(stdout));
        let stderr_task = tokio::spawn(drain_stream(stderr));

        let stdout_chunks = stdout_task.await.unwrap_or_default();
        let stderr_chunks = stderr_task.await.unwrap_or_default();

        let status = child.wait().await.map_err(|e| AaxSplitError::Launch {
            program: program_name.clone(),
            source: e,
        })?;
        let exit_code = status.code().unwrap_or(-1);

        trace!(program = %program_name, exit_code, "child process finished");

        Ok(ProcessResult {
            exit_code,
            stdout: stdout_chunks.concat(),
            stderr: stderr_chunks.concat(),
        })
    }

    /// Run with a deadline. On expiry the in-flight run future is dropped,
    /// which kills the child, and `Timeout` is returned.
    pub async fn run_with_timeout(
        program: impl AsRef<OsStr>,
        args: &[String],
        deadline: Duration,
    ) -> Result<ProcessResult> {
        let program = program.as_ref();
        match tokio::time::timeout(deadline, Self::run(program, args)).await {
            Ok(result) => result,
            Err(_) => Err(AaxSplitError::Timeout {
                program: program.to_string_lossy().into_owned(),
                elapsed: deadline,
            }),
        }
    }
}

/// Read a stream to end-of-stream in chunks, decoding each chunk as text
/// with replacement for undecodable bytes.
async fn drain_stream<R>(mut reader: R) -> Vec<String>
where
    R: tokio::io::AsyncRead + Unpin,
{
    let mut chunks = Vec::new();
    let mut buf = vec![0u8; READ_CHUNK_BYTES];
    loop {
        match reader.read(&mut buf).await {
            Ok(0) => break,
            Ok(n) => chunks.push(String::from_utf8_lossy(&buf[..n]).into_owned()),
            // A read error means the pipe is gone; treat as end-of-stream
            Err(_) => break,
        }
    }
    chunks
}
