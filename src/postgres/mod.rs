//! PostgreSQL infrastructure
//!
//! Backs the leader lookup and the bot log when `database.url` is set.

mod pool;

pub use pool::PostgresPool;
