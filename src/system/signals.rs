// src/system/signals.rs

//! Signal relay between this process and its single child.
//!
//! Listener tasks only enqueue what they receive. The supervisor loop drains
//! the queue and hands every signal to a [`SignalRelay`], which knows the
//! child's pid once it has been spawned.

use std::io;
use tokio::sync::mpsc::{self, UnboundedReceiver};

#[cfg(unix)]
use nix::{
    sys::signal::{self, SigHandler, Signal},
    unistd::Pid,
};

/// Signals relayed verbatim to the child.
#[cfg(unix)]
pub const FORWARDED_SIGNALS: &[Signal] = &[
    Signal::SIGINT,
    Signal::SIGTERM,
    Signal::SIGPIPE,
    Signal::SIGHUP,
    Signal::SIGUSR1,
    Signal::SIGUSR2,
    Signal::SIGWINCH,
];

/// Console control events observed on Windows, using the CRT numbering.
#[cfg(windows)]
pub const CTRL_C: i32 = 2;
/// See [`CTRL_C`].
#[cfg(windows)]
pub const CTRL_BREAK: i32 = 21;

/// The single child handle shared by every relayed signal.
///
/// Empty until [`SignalRelay::attach`] is called; the first pid attached is
/// never replaced.
#[derive(Debug, Default)]
pub struct SignalRelay {
    child: Option<u32>,
}

impl SignalRelay {
    /// Records the child's pid. Later calls are ignored.
    pub fn attach(&mut self, pid: u32) {
        if self.child.is_none() {
            self.child = Some(pid);
        }
    }

    /// Delivers `signal` to the child. Returns whether it was delivered.
    pub fn forward(&self, signal: i32) -> bool {
        let Some(pid) = self.child else {
            log::debug!(t!("signals.debug.no_child"), signal = signal_name(signal));
            return false;
        };
        deliver(pid, signal)
    }
}

#[cfg(unix)]
fn deliver(pid: u32, raw: i32) -> bool {
    let Ok(sig) = Signal::try_from(raw) else {
        return false;
    };
    let Ok(pid) = i32::try_from(pid) else {
        return false;
    };

    match signal::kill(Pid::from_raw(pid), sig) {
        Ok(()) => {
            log::debug!(t!("signals.debug.forwarded"), signal = sig.as_str(), pid = pid);
            true
        }
        Err(e) => {
            // ESRCH: the child is already gone and its exit is about to be observed.
            log::debug!(t!("signals.debug.forward_failed"), signal = sig.as_str(), error = e);
            false
        }
    }
}

#[cfg(not(unix))]
fn deliver(_pid: u32, raw: i32) -> bool {
    // The console already delivers control events to every attached process.
    log::debug!(t!("signals.debug.console_event"), signal = signal_name(raw));
    false
}

/// Installs the listeners and returns the queue they feed.
///
/// Must be called from inside a tokio runtime, before the child is spawned,
/// so that nothing sent in between is lost.
#[cfg(unix)]
pub fn listen() -> io::Result<UnboundedReceiver<i32>> {
    use tokio::signal::unix::{SignalKind, signal as install};

    let (tx, rx) = mpsc::unbounded_channel();
    for sig in FORWARDED_SIGNALS {
        let raw = *sig as i32;
        let mut stream = install(SignalKind::from_raw(raw))?;
        let tx = tx.clone();
        tokio::spawn(async move {
            while stream.recv().await.is_some() {
                if tx.send(raw).is_err() {
                    break;
                }
            }
        });
    }
    Ok(rx)
}

/// Installs the listeners and returns the queue they feed.
#[cfg(windows)]
pub fn listen() -> io::Result<UnboundedReceiver<i32>> {
    use tokio::signal::windows::{ctrl_break, ctrl_c};

    let (tx, rx) = mpsc::unbounded_channel();

    let mut interrupt = ctrl_c()?;
    let interrupt_tx = tx.clone();
    tokio::spawn(async move {
        while interrupt.recv().await.is_some() {
            if interrupt_tx.send(CTRL_C).is_err() {
                break;
            }
        }
    });

    let mut brk = ctrl_break()?;
    tokio::spawn(async move {
        while brk.recv().await.is_some() {
            if tx.send(CTRL_BREAK).is_err() {
                break;
            }
        }
    });

    Ok(rx)
}

/// Terminates this process with `raw`, the way the child died.
///
/// The default disposition is restored first, since the listeners installed
/// by [`listen`] would otherwise swallow the signal. Only returns if the
/// signal could not be delivered or did not terminate the process.
#[cfg(unix)]
#[allow(unsafe_code)]
pub fn reraise(raw: i32) -> nix::Result<()> {
    let sig = Signal::try_from(raw)?;
    // SAFETY: installing SIG_DFL does not run any code in signal context.
    if let Err(e) = unsafe { signal::signal(sig, SigHandler::SigDfl) } {
        // SIGKILL and SIGSTOP cannot be changed; they are fatal by default anyway.
        log::debug!(t!("signals.debug.reset_failed"), signal = sig.as_str(), error = e);
    }
    signal::kill(Pid::this(), sig)
}

/// Human readable name of a raw signal number.
#[cfg(unix)]
pub fn signal_name(raw: i32) -> String {
    Signal::try_from(raw)
        .map(|sig| sig.as_str().to_string())
        .unwrap_or_else(|_| format!("signal {raw}"))
}

/// Human readable name of a raw console event number.
#[cfg(not(unix))]
pub fn signal_name(raw: i32) -> String {
    match raw {
        2 => "CTRL_C".to_string(),
        21 => "CTRL_BREAK".to_string(),
        other => format!("signal {other}"),
    }
}
