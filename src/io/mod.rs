pub mod config_io;
pub mod lock;
pub mod oplog;
pub mod session;
pub mod store;
pub mod watcher;
pub mod workspace;
