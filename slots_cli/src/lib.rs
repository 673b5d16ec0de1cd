//! Internal modules for the terminal slot machine.
//!
//! This library provides input parsing and the interactive game loop used by
//! the slots_cli binary.

pub mod commands;
pub mod terminal;
