pub mod config;
pub(crate) mod guard;
pub mod pool;
pub mod scheduler;
pub mod time;
