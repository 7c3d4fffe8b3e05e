//! CLI subcommand implementations.

pub mod cart;
pub mod menu;
pub mod migrate;
pub mod seed;
