//! CLI command implementations

pub mod init;
pub mod script;
pub mod simulate;
pub mod validate;
