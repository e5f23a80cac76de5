// src/constants.rs

/// The name of the base definition file, always loaded.
pub const BASE_ENV_FILENAME: &str = ".env";

/// Suffix of the untracked override files (`.env.local`, `.env.<mode>.local`).
pub const LOCAL_SUFFIX: &str = ".local";

/// Environment variable the mode falls back to when `--mode` is not given.
pub const MODE_ENV_VAR: &str = "MODE";

/// Environment variable that overrides the log filter (env_logger syntax).
pub const LOG_ENV_VAR: &str = "LOADENV_LOG";
