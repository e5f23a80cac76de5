use clap::Parser;
use serde::Serialize;

pub mod handlers;

/// loadenv: load the `.env` cascade of a mode and run a command with it.
///
/// Files are read from the env directory in increasing precedence:
/// `.env`, `.env.local`, `.env.<mode>`, `.env.<mode>.local`.
/// `${NAME}` placeholders are expanded, and the result is passed to
/// `<COMMAND>` as its environment. The exit code or terminating signal of the
/// command becomes the exit status of loadenv.
#[derive(Parser, Debug, Serialize)]
#[command(name = "loadenv", author, version, about, long_about = None)]
#[command(
    styles = clap::builder::Styles::styled()
        .header(clap::builder::styling::AnsiColor::Yellow.on_default().bold())
        .usage(clap::builder::styling::AnsiColor::Yellow.on_default().bold())
        .literal(clap::builder::styling::AnsiColor::Cyan.on_default().bold())
        .placeholder(clap::builder::styling::AnsiColor::Green.on_default()),
)]
pub struct Cli {
    /// Mode that selects `.env.<mode>` and `.env.<mode>.local`.
    #[arg(short, long, env = "MODE", help_heading = "Env Loading")]
    pub mode: String,

    /// Directory to load the `.env` files from. Defaults to the current directory.
    #[arg(short, long, value_name = "DIR", help_heading = "Env Loading")]
    pub envdir: Option<String>,

    /// Only pass variables starting with one of these prefixes.
    #[arg(
        short,
        long,
        num_args = 1..,
        value_name = "PREFIX",
        help_heading = "Env Loading"
    )]
    pub prefix: Vec<String>,

    /// Print additional debug output.
    #[arg(short = 'D', long, help_heading = "Advanced Options")]
    pub debug: bool,

    /// Resolve everything but skip executing the command.
    #[arg(short = 'R', long, help_heading = "Advanced Options")]
    pub dry_run: bool,

    /// The command to run, followed by its arguments. Flags after the command
    /// are passed through to it untouched.
    #[arg(
        value_name = "COMMAND",
        required = true,
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub command: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("loadenv").chain(args.iter().copied()))
            .expect("arguments parse")
    }

    #[test]
    fn definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_full_invocation() {
        let cli = parse(&[
            "--mode", "test", "--envdir", "/tmp/env", "-p", "VITE_", "PUBLIC_", "-D", "-R", "--",
            "node", "print-env.js",
        ]);
        assert_eq!(cli.mode, "test");
        assert_eq!(cli.envdir.as_deref(), Some("/tmp/env"));
        assert_eq!(cli.prefix, vec!["VITE_", "PUBLIC_"]);
        assert!(cli.debug);
        assert!(cli.dry_run);
        assert_eq!(cli.command, vec!["node", "print-env.js"]);
    }

    #[test]
    fn flags_after_the_command_belong_to_it() {
        let cli = parse(&["-m", "test", "node", "echo-args.js", "--unknown-flag", "value", "-D"]);
        assert!(!cli.debug);
        assert_eq!(
            cli.command,
            vec!["node", "echo-args.js", "--unknown-flag", "value", "-D"]
        );
    }

    #[test]
    fn empty_mode_is_accepted() {
        let cli = parse(&["--mode", "", "--", "true"]);
        assert_eq!(cli.mode, "");
    }

    #[test]
    fn command_is_required() {
        let result = Cli::try_parse_from(["loadenv", "--mode", "test"]);
        assert!(result.is_err());
    }
}
