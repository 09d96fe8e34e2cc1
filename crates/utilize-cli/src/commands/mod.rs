//! Command implementations

mod init;

pub use init::run_init;
