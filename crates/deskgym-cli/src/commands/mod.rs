pub mod config;
pub mod log;
pub mod replay;
pub mod roster;
mod session;
pub mod stats;
pub mod watch;
