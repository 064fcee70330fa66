/*!
 * gpg process invocation
 *
 * One call spawns exactly one gpg child. Standard input is written while
 * stdout and the status stream are drained, each on its own scoped thread,
 * so a payload larger than the pipe buffer cannot deadlock the exchange.
 * The child is always waited for before returning.
 */

use std::io::{self, Read, Write};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;

use crate::config::GnupgConfig;
use crate::error::{error_codes, GnupgError, GnupgResult};
use crate::secure_memory::SecureBytes;
use crate::status::{self, StatusLog};

#[cfg(test)]
mod tests;

/// Number of trailing diagnostic lines attached to a failed invocation
const DIAGNOSTIC_TAIL: usize = 8;

/// Arguments and stdin payload for one gpg run
#[derive(Debug, Clone)]
pub struct Invocation {
    operation: &'static str,
    args: Vec<String>,
    input: SecureBytes,
}

impl Invocation {
    /// Start an invocation labelled with the operation it serves
    pub fn new(operation: &'static str) -> Self {
        Self {
            operation,
            args: Vec::new(),
            input: SecureBytes::default(),
        }
    }

    pub fn arg<S: Into<String>>(mut self, arg: S) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Data to feed on stdin; an empty payload leaves stdin closed
    pub fn input(mut self, input: SecureBytes) -> Self {
        self.input = input;
        self
    }

    pub fn operation(&self) -> &'static str {
        self.operation
    }

    /// Operation arguments, without the configuration's base flags
    pub fn arguments(&self) -> &[String] {
        &self.args
    }

    pub fn payload(&self) -> &[u8] {
        self.input.as_bytes()
    }
}

/// Captured output of a successful gpg run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    pub stdout: Vec<u8>,
    /// Raw status-channel text, protocol lines mixed with diagnostics
    pub status: String,
}

impl ProcessOutput {
    pub fn new(stdout: Vec<u8>, status: &str) -> Self {
        Self {
            stdout,
            status: status.to_string(),
        }
    }

    /// Decode the status channel of this run
    pub fn status_log(&self) -> StatusLog {
        StatusLog::parse(&self.status)
    }
}

/// Something that can execute a gpg invocation.
///
/// [`GpgProcess`] runs the real executable; tests substitute recording
/// stubs.
pub trait CommandRunner {
    fn run(&self, config: &GnupgConfig, invocation: &Invocation) -> GnupgResult<ProcessOutput>;
}

impl<R: CommandRunner + ?Sized> CommandRunner for &R {
    fn run(&self, config: &GnupgConfig, invocation: &Invocation) -> GnupgResult<ProcessOutput> {
        (**self).run(config, invocation)
    }
}

/// Runs the configured gpg executable as a child process
#[derive(Debug, Clone, Copy, Default)]
pub struct GpgProcess;

impl CommandRunner for GpgProcess {
    fn run(&self, config: &GnupgConfig, invocation: &Invocation) -> GnupgResult<ProcessOutput> {
        let operation = invocation.operation();
        let payload = invocation.payload();

        log::debug!(
            "Running {} for {}: {:?} ({} bytes on stdin)",
            config.binary().display(),
            operation,
            invocation.arguments(),
            payload.len()
        );

        let mut command = Command::new(config.binary());
        command
            .args(config.base_args())
            .args(invocation.arguments())
            .stdin(if payload.is_empty() {
                Stdio::null()
            } else {
                Stdio::piped()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let mut child = command.spawn().map_err(|e| {
            GnupgError::process_error(
                operation,
                &format!("failed to start {}: {}", config.binary().display(), e),
                error_codes::PROCESS_SPAWN_FAILED,
            )
        })?;

        let exchange = exchange(&mut child, payload);

        let (exit, stdout, stderr, written) = match exchange {
            Ok(parts) => parts,
            Err(e) => {
                return Err(GnupgError::process_error(
                    operation,
                    &format!("lost contact with gpg: {}", e),
                    error_codes::PROCESS_IO_FAILED,
                ))
            }
        };

        let status_text = String::from_utf8_lossy(&stderr).into_owned();

        if !exit.success() {
            let diagnostics = diagnostic_tail(&status_text);
            log::debug!("{} exited with {}: {}", operation, exit, diagnostics);
            return Err(GnupgError::process_exit(operation, exit.code(), &diagnostics));
        }

        if let Err(e) = written {
            return Err(GnupgError::process_error(
                operation,
                &format!("could not write {} bytes to stdin: {}", payload.len(), e),
                error_codes::PROCESS_STDIN_FAILED,
            ));
        }

        Ok(ProcessOutput {
            stdout,
            status: status_text,
        })
    }
}

type Exchange = (ExitStatus, Vec<u8>, Vec<u8>, io::Result<()>);

/// Feed stdin and drain stdout/stderr concurrently, then reap the child.
///
/// The child is waited for even when a pipe fails; only a failing `wait`
/// itself is reported as an error here.
fn exchange(child: &mut Child, payload: &[u8]) -> io::Result<Exchange> {
    let stdin = child.stdin.take();
    let stdout = child.stdout.take();
    let stderr = child.stderr.take();

    thread::scope(|scope| {
        // the writer owns the pipe; dropping it closes gpg's stdin
        let writer = stdin.map(|mut pipe| {
            scope.spawn(move || -> io::Result<()> {
                pipe.write_all(payload)?;
                pipe.flush()
            })
        });
        let out_reader = stdout.map(|pipe| scope.spawn(move || drain(pipe)));
        let err_reader = stderr.map(|pipe| scope.spawn(move || drain(pipe)));

        let exit = child.wait();

        let written = match writer {
            Some(handle) => handle.join().unwrap_or_else(|_| Err(panicked("stdin writer"))),
            None => Ok(()),
        };
        let out = match out_reader {
            Some(handle) => handle.join().unwrap_or_else(|_| Err(panicked("stdout reader"))),
            None => Ok(Vec::new()),
        };
        let err = match err_reader {
            Some(handle) => handle.join().unwrap_or_else(|_| Err(panicked("stderr reader"))),
            None => Ok(Vec::new()),
        };

        Ok((exit?, out?, err?, written))
    })
}

fn drain<R: Read>(mut pipe: R) -> io::Result<Vec<u8>> {
    let mut buffer = Vec::new();
    pipe.read_to_end(&mut buffer)?;
    Ok(buffer)
}

fn panicked(what: &str) -> io::Error {
    io::Error::new(io::ErrorKind::Other, format!("{} thread panicked", what))
}

/// Last few human-readable lines of the status stream
fn diagnostic_tail(status_text: &str) -> String {
    let lines: Vec<&str> = status::diagnostic_lines(status_text).collect();
    let start = lines.len().saturating_sub(DIAGNOSTIC_TAIL);
    lines[start..].join("\n")
}
