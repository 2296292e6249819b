// Library exports for testing and potential library use
//
// The tab manager is single-threaded: it is only touched from the shell's
// main thread. Searches run on the tokio blocking pool and report back through
// a channel, and `parking_lot::Mutex` guards the debug log file.

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod app;
pub mod chat;
pub mod cli;
pub mod command;
pub mod debug;
pub mod format;
pub mod search;
pub mod tab;
pub mod view;

pub use protein_explorer_api as api;
pub use protein_explorer_config as config;
