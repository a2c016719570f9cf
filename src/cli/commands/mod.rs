//! CLI command implementations

pub mod cat;
pub mod completions;
pub mod explore;
pub mod init;
pub mod po;
pub mod prod;
pub mod status;
pub mod sup;
