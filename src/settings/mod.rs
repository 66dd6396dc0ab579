//! Settings are read once at startup and never change afterwards.

mod cli;
pub use clap::Parser;
pub use cli::*;

mod settings;
pub use settings::*;
