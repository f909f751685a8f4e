pub mod error;
pub mod format;
pub mod indexer;
pub mod messages;
pub mod model;
pub mod provider;
pub mod server;
pub mod tokens;
pub mod tools;
