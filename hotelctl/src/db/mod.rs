//! Database access for the reservation schema.
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  (auth, operations)
//! └──────┬──────┘
//!        │  Statement + bound Values
//!        ↓
//! ┌─────────────┐
//! │   Gateway   │  (db::gateway - trait, db::postgres - sqlx impl)
//! └──────┬──────┘
//!        │  one PgConnection
//!        ↓
//! ┌─────────────┐
//! │  PostgreSQL │
//! └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`gateway`]: the [`gateway::Gateway`] trait, statements and result sets
//! - [`postgres`]: the sqlx-backed implementation over a single connection
//! - [`table`]: fixed-width rendering of result sets
//! - [`errors`]: [`errors::DbError`], mapped from sqlx errors

pub mod errors;
pub mod gateway;
pub mod postgres;
pub mod table;
