//! `db` crate — Postgres persistence layer.
//!
//! Provides a connection pool, typed row structs, repository functions for
//! every table in the talentflow schema, and [`PgStore`], the production
//! implementation of `engine::EngineStore`.  No business logic lives here.

pub mod error;
pub mod pool;
pub mod models;
pub mod repository;
pub mod store;

pub use pool::DbPool;
pub use error::DbError;
pub use store::PgStore;
