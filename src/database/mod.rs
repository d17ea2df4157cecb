/// Pool management and idempotent schema creation
pub mod connection;
/// Row types and their queries
pub mod models;
