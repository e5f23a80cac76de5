// src/system/executor.rs

use crate::{models::EnvMap, system::signals};
use std::process::{ExitStatus, Stdio};
use std::time::Duration;
use thiserror::Error;
use tokio::process::Command;

#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("Could not start the async runtime: {0}")]
    Runtime(#[source] std::io::Error),
    #[error("Could not install signal handlers: {0}")]
    SignalSetup(#[source] std::io::Error),
    #[error("Lost track of '{command}' while waiting for it: {source}")]
    Wait {
        command: String,
        #[source]
        source: std::io::Error,
    },
}

/// How a supervised run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing was spawned.
    DryRun,
    /// The child exited with a code.
    Exited {
        /// The child's exit code.
        code: i32,
    },
    /// The child was terminated by a signal.
    Signaled {
        /// Raw signal number.
        signal: i32,
    },
    /// The command could not be started. Already logged.
    SpawnFailed,
}

/// Switches for [`run`].
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Log the child's exit code.
    pub debug: bool,
    /// Log the command line instead of spawning it.
    pub dry_run: bool,
}

/// Runs `command` with exactly `env` as its environment and waits for it.
///
/// Standard streams are inherited. Every signal in
/// [`signals::FORWARDED_SIGNALS`] received meanwhile is relayed to the child
/// instead of acting on this process. A command that cannot be started is
/// logged and reported as [`Outcome::SpawnFailed`], not as an error.
pub fn run(
    command: &str,
    args: &[String],
    env: &EnvMap,
    options: RunOptions,
) -> Result<Outcome, ExecutionError> {
    let command_line = render_command_line(command, args);

    if options.dry_run {
        log::info!(t!("executor.info.dry_run"), command = command_line);
        return Ok(Outcome::DryRun);
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(ExecutionError::Runtime)?;

    runtime.block_on(supervise(command, args, env, &command_line, options))
}

async fn supervise(
    command: &str,
    args: &[String],
    env: &EnvMap,
    command_line: &str,
    options: RunOptions,
) -> Result<Outcome, ExecutionError> {
    // Listen before spawning so a signal sent right after the spawn is queued.
    let mut queued_signals = signals::listen().map_err(ExecutionError::SignalSetup)?;

    let mut cmd = Command::new(command);
    cmd.args(args)
        .env_clear()
        .envs(env)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit());

    let mut child = match cmd.spawn() {
        Ok(child) => child,
        Err(e) => {
            log::error!(t!("executor.error.spawn_failed"), command = command, error = e);
            return Ok(Outcome::SpawnFailed);
        }
    };

    let mut relay = signals::SignalRelay::default();
    if let Some(pid) = child.id() {
        relay.attach(pid);
        log::debug!(t!("executor.debug.spawned"), command = command_line, pid = pid);
    }

    let status = loop {
        tokio::select! {
            status = child.wait() => {
                break status.map_err(|source| ExecutionError::Wait {
                    command: command_line.to_string(),
                    source,
                })?;
            }
            Some(signal) = queued_signals.recv() => {
                relay.forward(signal);
            }
        }
    };

    Ok(outcome_from_status(status, options))
}

fn outcome_from_status(status: ExitStatus, options: RunOptions) -> Outcome {
    if let Some(code) = status.code() {
        if options.debug {
            log::debug!(t!("executor.debug.exit_code"), code = code);
        }
        return Outcome::Exited { code };
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            log::info!(
                t!("executor.info.terminated_by_signal"),
                signal = signals::signal_name(signal)
            );
            return Outcome::Signaled { signal };
        }
    }

    // Neither a code nor a signal: treat as a generic failure.
    Outcome::Exited { code: 1 }
}

/// The command and its arguments joined by spaces, as shown in logs.
pub fn render_command_line(command: &str, args: &[String]) -> String {
    std::iter::once(command)
        .chain(args.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Ends this process the same way the supervised run ended.
///
/// Dry runs and spawn failures exit with 0. A signaled child is mirrored by
/// delivering the same signal to this process; if that does not terminate it,
/// the shell convention `128 + signal` is used.
pub fn exit_with(outcome: Outcome) -> ! {
    match outcome {
        Outcome::DryRun | Outcome::SpawnFailed => std::process::exit(0),
        Outcome::Exited { code } => std::process::exit(code),
        Outcome::Signaled { signal } => {
            #[cfg(unix)]
            {
                if let Err(e) = signals::reraise(signal) {
                    log::warn!(
                        t!("executor.warning.reraise_failed"),
                        signal = signals::signal_name(signal),
                        error = e
                    );
                }
                // Delivery to another thread may take a moment.
                std::thread::sleep(Duration::from_millis(200));
            }
            std::process::exit(128 + signal)
        }
    }
}
