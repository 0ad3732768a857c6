//! CLI command implementations

pub mod config;
pub mod init;
pub mod refresh;
pub mod status;

pub use config::execute as config;
pub use init::execute as init;
pub use refresh::execute as refresh;
pub use status::execute as status;
