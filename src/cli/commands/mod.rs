//! CLI command implementations

pub mod config;
pub mod dump;
pub mod extract;
pub mod locate;

pub use config::execute as config;
pub use dump::execute as dump;
pub use extract::execute as extract;
pub use locate::execute as locate;
