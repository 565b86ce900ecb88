pub mod build;
pub mod context;
pub mod init;
pub mod plan;
