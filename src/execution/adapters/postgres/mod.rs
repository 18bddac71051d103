//! `PostgreSQL` adapters for execution and task persistence.

mod models;
mod repository;
mod schema;

pub use repository::{JobPgPool, PostgresJobStore};
