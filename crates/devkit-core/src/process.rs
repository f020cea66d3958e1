//! Process execution capability.
//!
//! Everything that leaves the process goes through [`ProcessRunner`]. The
//! production [`SystemRunner`] spawns real children; [`RecordingRunner`]
//! records invocations and replies with a canned output (dry runs, tests).

use std::io::{Read, Write};
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use std::sync::Mutex;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{debug, warn};

const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// One external command: executable, discrete argv entries, working dir.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: PathBuf,
    pub stdin: Option<String>,
    pub timeout: Option<Duration>,
}

impl Invocation {
    pub fn new(program: impl Into<String>, args: Vec<String>, cwd: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args,
            cwd: cwd.into(),
            stdin: None,
            timeout: None,
        }
    }

    pub fn with_stdin(mut self, input: impl Into<String>) -> Self {
        self.stdin = Some(input.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Human-readable form for logs and dry runs. Never executed by a shell.
    pub fn display(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProcessOutput {
    /// `None` only when the child was killed after a timeout. Signal deaths
    /// are reported as `128 + signal`.
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
    pub timed_out: bool,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

pub fn timeout_notice(timeout: Duration) -> String {
    format!(
        "process timed out after {:.1}s and was terminated",
        timeout.as_secs_f64()
    )
}

pub trait ProcessRunner: Send + Sync {
    /// Run the invocation to completion (or timeout).
    ///
    /// `Err` only when the child could not be started or waited on; a
    /// non-zero exit is a normal `Ok`.
    fn run(&self, invocation: &Invocation) -> std::io::Result<ProcessOutput>;
}

// ─── SystemRunner ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    fn run(&self, invocation: &Invocation) -> std::io::Result<ProcessOutput> {
        debug!(command = %invocation.display(), cwd = %invocation.cwd.display(), "spawning");

        let mut cmd = Command::new(&invocation.program);
        cmd.args(&invocation.args)
            .current_dir(&invocation.cwd)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        if invocation.stdin.is_some() {
            cmd.stdin(Stdio::piped());
        } else {
            cmd.stdin(Stdio::null());
        }

        // Own process group so a timeout takes down the whole tree
        // (npx → node → eslint, lifecycle scripts of the package manager).
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            cmd.process_group(0);
        }

        let mut child = cmd.spawn()?;

        let stdin_writer = match (invocation.stdin.clone(), child.stdin.take()) {
            (Some(input), Some(mut pipe)) => Some(thread::spawn(move || {
                // The child may exit without reading; a broken pipe is fine.
                let _ = pipe.write_all(input.as_bytes());
            })),
            _ => None,
        };
        let stdout_reader = drain(child.stdout.take());
        let stderr_reader = drain(child.stderr.take());

        let exit_code = match invocation.timeout {
            None => {
                let status = child.wait()?;
                Some(status.code().unwrap_or_else(|| signal_exit_code(&status)))
            }
            Some(timeout) => wait_with_deadline(&mut child, timeout)?,
        };
        // wait_with_deadline only yields `None` after killing the child.
        let timed_out = invocation.timeout.is_some() && exit_code.is_none();

        // Anything the leader left running in its group (a backgrounded
        // lifecycle script) still holds the output pipes.
        kill_group(&child);

        if let Some(handle) = stdin_writer {
            let _ = handle.join();
        }
        let stdout = join_reader(stdout_reader);
        let mut stderr = join_reader(stderr_reader);

        if timed_out {
            if let Some(timeout) = invocation.timeout {
                warn!(command = %invocation.display(), "timed out");
                if !stderr.is_empty() && !stderr.ends_with('\n') {
                    stderr.push('\n');
                }
                stderr.push_str(&timeout_notice(timeout));
            }
        }

        Ok(ProcessOutput {
            exit_code,
            stdout,
            stderr,
            timed_out,
        })
    }
}

/// Poll until the child exits or the deadline passes. Returns the exit code,
/// or `None` after the child was killed.
fn wait_with_deadline(child: &mut Child, timeout: Duration) -> std::io::Result<Option<i32>> {
    let deadline = Instant::now() + timeout;
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(
                status.code().unwrap_or_else(|| signal_exit_code(&status)),
            ));
        }
        if Instant::now() >= deadline {
            terminate(child);
            let _ = child.wait();
            return Ok(None);
        }
        thread::sleep(POLL_INTERVAL);
    }
}

#[cfg(unix)]
fn signal_exit_code(status: &std::process::ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;
    // Shell convention: 128 + signal number.
    128 + status.signal().unwrap_or(0)
}

#[cfg(not(unix))]
fn signal_exit_code(_status: &std::process::ExitStatus) -> i32 {
    -1
}

#[cfg(unix)]
fn terminate(child: &mut Child) {
    if !kill_group(child) {
        let _ = child.kill();
    }
}

#[cfg(not(unix))]
fn terminate(child: &mut Child) {
    let _ = child.kill();
}

/// SIGKILL every process in the child's group. The group id stays reserved
/// while any member is alive, so this is safe after the leader was reaped.
#[cfg(unix)]
fn kill_group(child: &Child) -> bool {
    let pgid = child.id() as libc::pid_t;
    unsafe { libc::kill(-pgid, libc::SIGKILL) == 0 }
}

#[cfg(not(unix))]
fn kill_group(_child: &Child) -> bool {
    false
}

fn drain<R: Read + Send + 'static>(stream: Option<R>) -> Option<JoinHandle<String>> {
    stream.map(|mut reader| {
        thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = reader.read_to_end(&mut buf);
            String::from_utf8_lossy(&buf).into_owned()
        })
    })
}

fn join_reader(handle: Option<JoinHandle<String>>) -> String {
    handle
        .and_then(|h| h.join().ok())
        .unwrap_or_default()
}

// ─── RecordingRunner ──────────────────────────────────────────────────────

/// Records every invocation and answers with a fixed output without
/// spawning anything.
#[derive(Debug, Default)]
pub struct RecordingRunner {
    calls: Mutex<Vec<Invocation>>,
    reply: ProcessOutput,
}

impl RecordingRunner {
    /// A runner whose commands all "succeed" with empty output.
    pub fn new() -> Self {
        Self::with_output(ProcessOutput {
            exit_code: Some(0),
            ..ProcessOutput::default()
        })
    }

    pub fn with_output(reply: ProcessOutput) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            reply,
        }
    }

    pub fn calls(&self) -> Vec<Invocation> {
        self.calls
            .lock()
            .map(|c| c.clone())
            .unwrap_or_default()
    }
}

impl ProcessRunner for RecordingRunner {
    fn run(&self, invocation: &Invocation) -> std::io::Result<ProcessOutput> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(invocation.clone());
        }
        Ok(self.reply.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invocation_display_joins_tokens() {
        let inv = Invocation::new("pnpm", vec!["add".into(), "left-pad".into()], "/tmp");
        assert_eq!(inv.display(), "pnpm add left-pad");
    }

    #[test]
    fn recording_runner_records_and_replies() {
        let runner = RecordingRunner::with_output(ProcessOutput {
            exit_code: Some(3),
            stdout: "out".into(),
            stderr: "err".into(),
            timed_out: false,
        });
        let inv = Invocation::new("npm", vec!["install".into()], "/tmp");

        let out = runner.run(&inv).unwrap();
        assert_eq!(out.exit_code, Some(3));
        assert!(!out.success());
        assert_eq!(runner.calls(), vec![inv]);
    }

    #[cfg(unix)]
    mod system {
        use super::super::*;
        use tempfile::TempDir;

        fn sh(script: &str, cwd: &std::path::Path) -> Invocation {
            Invocation::new("sh", vec!["-c".into(), script.into()], cwd)
        }

        #[test]
        fn captures_exit_code_and_streams() {
            let dir = TempDir::new().unwrap();
            let out = SystemRunner
                .run(&sh("echo hello; echo not found >&2; exit 1", dir.path()))
                .unwrap();

            assert_eq!(out.exit_code, Some(1));
            assert_eq!(out.stdout.trim(), "hello");
            assert_eq!(out.stderr.trim(), "not found");
            assert!(!out.timed_out);
        }

        #[test]
        fn runs_in_working_directory() {
            let dir = TempDir::new().unwrap();
            std::fs::write(dir.path().join("marker.txt"), "").unwrap();
            let out = SystemRunner.run(&sh("ls", dir.path())).unwrap();

            assert!(out.success());
            assert!(out.stdout.contains("marker.txt"));
        }

        #[test]
        fn feeds_stdin() {
            let dir = TempDir::new().unwrap();
            let inv = Invocation::new("cat", vec![], dir.path()).with_stdin("piped text");
            let out = SystemRunner.run(&inv).unwrap();

            assert_eq!(out.stdout, "piped text");
        }

        #[test]
        fn timeout_kills_child_and_marks_stderr() {
            let dir = TempDir::new().unwrap();
            let inv = sh("sleep 5", dir.path()).with_timeout(Some(Duration::from_millis(100)));

            let started = Instant::now();
            let out = SystemRunner.run(&inv).unwrap();

            assert!(started.elapsed() < Duration::from_secs(4));
            assert!(out.timed_out);
            assert_eq!(out.exit_code, None);
            assert!(out.stderr.contains("timed out"));
        }

        #[test]
        fn backgrounded_grandchild_does_not_outlive_timeout() {
            let dir = TempDir::new().unwrap();
            let inv = sh("sleep 8 & exit 0", dir.path())
                .with_timeout(Some(Duration::from_millis(200)));

            let started = Instant::now();
            let out = SystemRunner.run(&inv).unwrap();

            assert!(started.elapsed() < Duration::from_secs(3));
            assert_eq!(out.exit_code, Some(0));
            assert!(!out.timed_out);
        }

        #[test]
        fn backgrounded_grandchild_does_not_block_without_timeout() {
            let dir = TempDir::new().unwrap();
            let started = Instant::now();
            let out = SystemRunner
                .run(&sh("sleep 8 & echo done", dir.path()))
                .unwrap();

            assert!(started.elapsed() < Duration::from_secs(3));
            assert!(out.success());
            assert_eq!(out.stdout.trim(), "done");
        }

        #[test]
        fn timeout_not_reached_reports_normally() {
            let dir = TempDir::new().unwrap();
            let inv = sh("exit 0", dir.path()).with_timeout(Some(Duration::from_secs(10)));
            let out = SystemRunner.run(&inv).unwrap();

            assert!(out.success());
            assert!(!out.timed_out);
        }

        #[test]
        fn missing_executable_is_an_io_error() {
            let dir = TempDir::new().unwrap();
            let inv = Invocation::new("devkit-no-such-binary", vec![], dir.path());
            assert!(SystemRunner.run(&inv).is_err());
        }
    }
}
