// src/cli/handlers/launch.rs

use crate::{
    cli::Cli,
    constants::MODE_ENV_VAR,
    core::{
        env_resolver::{self, EnvResolver},
        interpolator::{AmbientLookup, ProcessEnv},
        paths, prefix_filter,
    },
    models::EnvMap,
    system::executor::{self, Outcome, RunOptions},
};
use anyhow::{Context, Result, anyhow};
use std::collections::BTreeMap;

/// Main entry point: one invocation against the real process environment.
pub fn handle(cli: &Cli) -> Result<Outcome> {
    handle_with(cli, &ProcessEnv)
}

/// Resolves, filters and runs, reading ambient variables from `ambient`.
///
/// Resolution failures are returned as errors. Everything that happens after
/// the environment is built is reported through the returned [`Outcome`].
pub fn handle_with(cli: &Cli, ambient: &dyn AmbientLookup) -> Result<Outcome> {
    report_mode(&cli.mode, ambient);

    if cli.debug {
        log::debug!(
            t!("launch.debug.invocation"),
            invocation = serde_json::to_string_pretty(cli)?
        );
    }

    let (command, args) = cli
        .command
        .split_first()
        .ok_or_else(|| anyhow!(t!("launch.error.no_command")))?;

    // 1. Locate the definition files.
    let envdir = paths::resolve_envdir(cli.envdir.as_deref())?;

    // 2. Load, merge and expand the cascade.
    let resolved = EnvResolver::new(ambient)
        .resolve(&envdir, &cli.mode)
        .with_context(|| format!(t!("launch.error.resolve_failed"), envdir = envdir.display()))?;

    if cli.debug {
        log::debug!(
            t!("launch.debug.resolved_env"),
            envdir = envdir.display(),
            env = render_env(&resolved)?
        );
    }

    // 3. Put it on top of the caller's environment and apply the prefixes.
    let env = prefix_filter::filter(env_resolver::compose(ambient.entries(), resolved), &cli.prefix);
    log::debug!(t!("launch.debug.child_env_size"), count = env.len());

    // 4. Hand over to the supervisor.
    let outcome = executor::run(
        command,
        args,
        &env,
        RunOptions {
            debug: cli.debug,
            dry_run: cli.dry_run,
        },
    )?;

    Ok(outcome)
}

fn report_mode(mode: &str, ambient: &dyn AmbientLookup) {
    if mode.is_empty() {
        log::warn!(t!("launch.warning.empty_mode"));
    } else if ambient.lookup(MODE_ENV_VAR).as_deref() == Some(mode) {
        log::info!(t!("launch.info.mode_from_env"), mode = mode);
    }
}

fn render_env(env: &EnvMap) -> Result<String> {
    let sorted: BTreeMap<&String, &String> = env.iter().collect();
    Ok(serde_json::to_string_pretty(&sorted)?)
}
