//! # System Interaction Layer
//!
//! Boundary between the resolved environment and the operating system.
//!
//! ## Modules
//!
//! - **`executor`**: spawns the single child process with the resolved
//!   environment, waits for it and turns its termination into this process's own.
//! - **`signals`**: relays termination signals to the child and re-raises the
//!   child's fatal signal on this process.
//! - **`logging`**: the `env_logger` setup with colored level badges.

pub mod executor;
pub mod logging;
pub mod signals;
