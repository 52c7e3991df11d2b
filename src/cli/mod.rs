pub mod commands;
pub mod extract;
pub mod serve;

pub use commands::{Cli, Commands};
