//! Subcommand implementations.

pub mod info;
pub mod outline;
pub mod smooth;
