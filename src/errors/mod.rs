pub mod types;

pub use types::VulnexError;
