//! archscribe: command-line front end for [`archscribe_core`].
//!
//! Configuration loading and export writing live here; everything else is in the core
//! crate.

pub mod cli;
pub mod load_config;
pub mod output;

pub use cli::{run, Cli, Commands};
