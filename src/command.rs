use std::{
    ffi::OsStr,
    io::{self, BufReader, Read},
    process::{Command, ExitStatus, Stdio},
    sync::Arc,
    thread,
};

use crate::{
    error::{Error, Result},
    progress::{OutputPolicy, ProgressLogger, StepId},
};

/// A wrapper around `std::process::Command` that captures output and streams
/// it to a progress sink.
pub struct ManagedCommand {
    command: Command,
    program: String,
    step_id: StepId,
    sink: Arc<dyn ProgressLogger>,
}

impl ManagedCommand {
    /// Create a new `ManagedCommand`.
    #[must_use]
    pub fn new<S: AsRef<OsStr>>(program: S, step_id: StepId, sink: Arc<dyn ProgressLogger>) -> Self {
        let mut command = Command::new(program.as_ref());
        command.stdout(Stdio::piped());
        command.stderr(Stdio::piped());

        Self {
            command,
            program: program.as_ref().to_string_lossy().into_owned(),
            step_id,
            sink,
        }
    }

    /// Add arguments to the command.
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.command.args(args);
        self
    }

    /// Add a single argument to the command.
    #[must_use]
    pub fn arg<S: AsRef<OsStr>>(mut self, arg: S) -> Self {
        self.command.arg(arg);
        self
    }

    /// Set an environment variable for the command.
    #[must_use]
    pub fn env<K, V>(mut self, key: K, val: V) -> Self
    where
        K: AsRef<OsStr>,
        V: AsRef<OsStr>,
    {
        self.command.env(key, val);
        self
    }

    /// Set multiple environment variables for the command.
    #[must_use]
    pub fn envs<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<OsStr>,
        V: AsRef<OsStr>,
    {
        self.command.envs(vars);
        self
    }

    /// Execute the command and wait for it to complete, streaming output to
    /// the progress sink.
    ///
    /// # Errors
    ///
    /// Returns an error if the child process cannot be spawned or waited on.
    pub fn status(mut self) -> io::Result<ExitStatus> {
        match self.sink.output_policy() {
            OutputPolicy::Inherit => {
                self.command.stdout(Stdio::inherit());
                self.command.stderr(Stdio::inherit());
                return self.command.status();
            }
            OutputPolicy::Capture => {}
        }

        let mut child = self.command.spawn()?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| io::Error::other("Failed to capture stdout"))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| io::Error::other("Failed to capture stderr"))?;

        let stdout_handle = self.spawn_reader_thread(stdout);
        let stderr_handle = self.spawn_reader_thread(stderr);

        let status = child.wait()?;

        let _ = stdout_handle.join();
        let _ = stderr_handle.join();

        Ok(status)
    }

    /// Execute the command and require a successful exit.
    ///
    /// `label` names the invocation in diagnostics (e.g. `pyenv install`).
    ///
    /// # Errors
    ///
    /// Returns an error if the child cannot be spawned or exits non-zero.
    pub fn run_checked(self, label: &str) -> Result<()> {
        let program = self.program.clone();
        let status = self.status().map_err(|source| Error::Spawn {
            program,
            source,
        })?;
        if status.success() {
            Ok(())
        } else {
            Err(Error::CommandFailed {
                program: label.to_string(),
                status,
            })
        }
    }

    /// Spawn a thread to read output chunks and stream them to the sink.
    fn spawn_reader_thread<R: io::Read + Send + 'static>(
        &self,
        reader: R,
    ) -> thread::JoinHandle<()> {
        let step_id = self.step_id.clone();
        let sink = Arc::clone(&self.sink);

        thread::spawn(move || {
            let mut buf_reader = BufReader::new(reader);
            let mut buffer = [0u8; 4096];

            loop {
                match buf_reader.read(&mut buffer) {
                    Ok(0) => break,
                    Ok(n) => sink.append_output_chunk(&step_id, &buffer[..n]),
                    Err(e) => {
                        sink.append_output(&step_id, format!("[Error reading output: {e}]"));
                        break;
                    }
                }
            }

            sink.flush_output(&step_id);
        })
    }
}
