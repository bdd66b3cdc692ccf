//! # Fintrack Database Crate
//!
//! This crate acts as a high-level, application-specific interface to the
//! SQLite database that stores users, sessions, financial records and comments.
//!
//! ## Architectural Principles
//!
//! - **Layer 2 Adapter:** All SQL lives here. The rest of the application talks
//!   to `DbRepository` and never sees a query string.
//! - **Explicit handle:** The pool is created once by `connect` and passed in;
//!   there is no global connection.
//! - **Owner scoping:** Record and comment queries always filter by the owning user.
//!
//! ## Public API
//!
//! - `connect`: Opens the connection pool from `DatabaseSettings`.
//! - `run_migrations`: Applies the embedded schema migrations.
//! - `DbRepository`: The data access methods.
//! - `DbError`: The specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod connection;
pub mod error;
pub mod repository;

// Re-export the key components to create a clean, public-facing API.
pub use connection::{connect, run_migrations};
pub use error::DbError;
pub use repository::DbRepository;
