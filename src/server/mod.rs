mod purger;
mod server;

pub use purger::*;
pub use server::*;
