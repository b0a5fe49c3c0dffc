//! External command execution
//!
//! Everything the watchdog observes comes from OS utilities consumed as
//! opaque commands. `CommandRunner` is the single seam between the
//! decision logic and those utilities; `ScriptedRunner` replays canned
//! output so the logic can be tested against fixtures without touching
//! a real routing table or process list.

use std::collections::{HashMap, VecDeque};
use std::io;
use std::process::Command;
use std::sync::Mutex;
use tracing::debug;

/// Captured result of one external command invocation
#[derive(Debug, Clone)]
pub struct CmdOutput {
    /// Whether the command exited with status zero
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

impl CmdOutput {
    /// A zero-exit result with the given stdout
    pub fn ok<S: Into<String>>(stdout: S) -> Self {
        Self {
            success: true,
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// A nonzero-exit result with the given stderr
    pub fn failed<S: Into<String>>(stderr: S) -> Self {
        Self {
            success: false,
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }
}

/// Runs an external command to completion and captures its output
///
/// `Err` means the command could not be invoked at all (missing binary,
/// permissions); a command that ran but failed is `Ok` with
/// `success == false`.
pub trait CommandRunner {
    fn run(&self, program: &str, args: &[&str]) -> io::Result<CmdOutput>;
}

impl<T: CommandRunner + ?Sized> CommandRunner for &T {
    fn run(&self, program: &str, args: &[&str]) -> io::Result<CmdOutput> {
        (**self).run(program, args)
    }
}

/// `CommandRunner` backed by real OS processes
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[&str]) -> io::Result<CmdOutput> {
        debug!("Running command: {} {}", program, args.join(" "));
        let output = Command::new(program).args(args).output()?;
        Ok(CmdOutput {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// Scripted outcome of one command invocation
#[derive(Debug, Clone)]
pub enum ScriptedOutcome {
    /// The command runs and exits zero with this stdout
    Succeeds(String),
    /// The command runs but exits nonzero with this stderr
    Fails(String),
    /// The command cannot be invoked at all
    Unrunnable,
}

/// In-memory `CommandRunner` driven by per-program outcome queues
///
/// Each `run` pops the next queued outcome for the program and records
/// the full argv. An unscripted program behaves like a missing binary.
#[derive(Debug, Default)]
pub struct ScriptedRunner {
    outcomes: Mutex<HashMap<String, VecDeque<ScriptedOutcome>>>,
    calls: Mutex<Vec<Vec<String>>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the next outcome for `program`
    pub fn enqueue(&self, program: &str, outcome: ScriptedOutcome) {
        self.outcomes
            .lock()
            .expect("outcomes lock poisoned")
            .entry(program.to_string())
            .or_default()
            .push_back(outcome);
    }

    /// Every invocation seen so far, each as `[program, args...]`
    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().expect("calls lock poisoned").clone()
    }

    /// Number of invocations of `program` so far
    pub fn call_count(&self, program: &str) -> usize {
        self.calls()
            .iter()
            .filter(|call| call.first().map(String::as_str) == Some(program))
            .count()
    }
}

impl CommandRunner for ScriptedRunner {
    fn run(&self, program: &str, args: &[&str]) -> io::Result<CmdOutput> {
        let mut call = vec![program.to_string()];
        call.extend(args.iter().map(|a| a.to_string()));
        self.calls.lock().expect("calls lock poisoned").push(call);

        let outcome = self
            .outcomes
            .lock()
            .expect("outcomes lock poisoned")
            .get_mut(program)
            .and_then(VecDeque::pop_front);

        match outcome {
            Some(ScriptedOutcome::Succeeds(stdout)) => Ok(CmdOutput::ok(stdout)),
            Some(ScriptedOutcome::Fails(stderr)) => Ok(CmdOutput::failed(stderr)),
            Some(ScriptedOutcome::Unrunnable) | None => Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no such command: {}", program),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_runner_captures_stdout() {
        let output = SystemRunner.run("sh", &["-c", "echo hello"]).unwrap();
        assert!(output.success);
        assert_eq!(output.stdout.trim(), "hello");
    }

    #[test]
    fn test_system_runner_reports_nonzero_exit() {
        let output = SystemRunner.run("sh", &["-c", "exit 3"]).unwrap();
        assert!(!output.success);
    }

    #[test]
    fn test_system_runner_missing_binary_is_an_error() {
        assert!(SystemRunner
            .run("tunwatch-no-such-binary", &[])
            .is_err());
    }

    #[test]
    fn test_scripted_runner_pops_outcomes_in_order() {
        let runner = ScriptedRunner::new();
        runner.enqueue("ping", ScriptedOutcome::Succeeds("first".into()));
        runner.enqueue("ping", ScriptedOutcome::Fails("second".into()));

        assert!(runner.run("ping", &[]).unwrap().success);
        assert!(!runner.run("ping", &[]).unwrap().success);
        assert!(runner.run("ping", &[]).is_err());
    }

    #[test]
    fn test_scripted_runner_records_argv() {
        let runner = ScriptedRunner::new();
        runner.enqueue("route", ScriptedOutcome::Succeeds(String::new()));
        runner.run("route", &["delete", "10.8.0.0"]).unwrap();

        assert_eq!(runner.calls(), vec![vec![
            "route".to_string(),
            "delete".to_string(),
            "10.8.0.0".to_string(),
        ]]);
        assert_eq!(runner.call_count("route"), 1);
        assert_eq!(runner.call_count("netstat"), 0);
    }
}
