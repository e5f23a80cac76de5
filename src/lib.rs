//! loadenv: run a command with the `.env` cascade of a mode.
//!
//! The crate is layered the same way an invocation flows:
//! [`core`] resolves and filters the environment, [`system`] supervises the
//! child process, and [`cli`] ties both to the command line.

include!(concat!(env!("OUT_DIR"), "/translations.rs"));

pub mod cli;
pub mod constants;
pub mod core;
pub mod models;
pub mod system;
