//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the user and loan repository ports backed by
//! `diesel-async` over a `bb8` pool.
//!
//! - Repository implementations only translate between Diesel rows and domain
//!   types; no business rules live here.
//! - Row structs (`models.rs`) and the schema (`schema.rs`) stay private to
//!   this module.
//!
//! # Example
//!
//! ```no_run
//! # async fn wire() -> Result<(), Box<dyn std::error::Error>> {
//! use loan_origination::outbound::persistence::{DbPool, DieselLoanRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/loans")).await?;
//! let loans = DieselLoanRepository::new(pool);
//! # let _ = loans;
//! # Ok(())
//! # }
//! ```

mod diesel_basic_error_mapping;
mod diesel_loan_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_loan_repository::DieselLoanRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MIGRATIONS, MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
