// src/core/mod.rs

pub mod dotenv_parser;
pub mod env_resolver;
pub mod interpolator;
pub mod paths;
pub mod prefix_filter;
