//! Pokedex Library
//!
//! This module exposes the cache, data, session and command modules for use in
//! the binary and in integration tests.

pub mod cache;
pub mod catch;
pub mod cli;
pub mod commands;
pub mod data;
pub mod repl;
pub mod session;
