// src/cli/handlers/mod.rs

// One module per CLI command.

pub mod basic;
pub mod check;
pub mod commons;
pub mod funcs;
pub mod generate;
pub mod init;
pub mod preview;
