//! Toolchain detection and shell `PATH` bootstrapping for Solana development.
//!
//! - [`probe`] runs version commands and reports what is installed.
//! - [`rcfile`] exposes directories on `PATH` through `~/.bashrc` and `~/.zshrc`.
//! - [`ui`] formats console messages and command outros.
//! - [`solana_toml`] holds the `Solana.toml` project config shapes.

pub mod cli;
pub mod config;
pub mod platform;
pub mod probe;
pub mod rcfile;
pub mod solana_toml;
pub mod types;
pub mod ui;

#[cfg(test)]
mod tests;
