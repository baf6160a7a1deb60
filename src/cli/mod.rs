//! Command line interface for the plantilla classifier.

pub mod args;
pub mod commands;

pub use args::*;
pub use commands::*;
