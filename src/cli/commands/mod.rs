//! Command implementations, one module per subcommand.

pub mod add;
pub mod delete;
pub mod edit;
pub mod export;
pub mod get;
pub mod import_cmd;
pub mod init;
pub mod list;
