//! CLI command implementations.

pub mod args;
pub mod output;

pub mod blocks;
pub mod headings;
pub mod links;
pub mod lint;
pub mod list;
pub mod properties;
pub mod search;
pub mod tags;
pub mod tasks;

pub use args::{Cli, Commands};
pub use output::Output;
